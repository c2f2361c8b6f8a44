//! # qrstudio - Styled QR Code Designer
//!
//! qrstudio turns a piece of data plus a set of design choices into a styled
//! QR code, keeps a live preview in sync while the settings change, and
//! exports the result. It provides:
//!
//! - **Settings**: one observable customization record with clamped ranges
//! - **Rendering**: QR matrix encoding and styled SVG output (dot shapes,
//!   gradients, centered logo)
//! - **Labels**: wrapped caption text laid out under the graphic
//! - **Export**: PNG, SVG and a 2× "screenshot" PNG
//! - **Server**: a small web editor with a JSON API
//!
//! ## Quick Start
//!
//! ```no_run
//! use qrstudio::{
//!     export::{ExportKind, Exporter},
//!     render::{Render, RenderOptions, StyledRenderer},
//!     settings::Settings,
//! };
//!
//! let settings = Settings {
//!     data: "https://example.com".to_string(),
//!     label_text: "Scan me!".to_string(),
//!     ..Default::default()
//! };
//!
//! // Render the graphic
//! let qr = StyledRenderer::new().render(&RenderOptions::from_settings(&settings))?;
//!
//! // Export it with its label
//! let png = Exporter::new().export(ExportKind::Png, Some(&qr.svg), &settings)?;
//! if let Some(artifact) = png {
//!     std::fs::write(artifact.filename, &artifact.bytes)?;
//! }
//!
//! # Ok::<(), qrstudio::error::QrStudioError>(())
//! ```
//!
//! ## Module Overview
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`settings`] | Settings record, enums, patches |
//! | [`store`] | Observable settings store |
//! | [`render`] | Renderer adapter, styled SVG, debounced scheduler |
//! | [`label`] | Label wrapping and layout |
//! | [`export`] | PNG / SVG / screenshot exports |
//! | [`preview`] | Live preview composition |
//! | [`logo`] | Logo upload validation |
//! | [`clipboard`] | Copy with a transient indicator |
//! | [`server`] | HTTP editor and API |
//! | [`error`] | Error types |

pub mod clipboard;
pub mod error;
pub mod export;
pub mod label;
pub mod logo;
pub mod preview;
pub mod render;
pub mod server;
pub mod settings;
pub mod store;
pub mod svg;

// Re-exports for convenience
pub use error::QrStudioError;
pub use settings::Settings;
pub use store::SettingsStore;
