//! # qrstudio CLI
//!
//! Command-line interface for exporting styled QR codes and running the
//! web editor.
//!
//! ## Usage
//!
//! ```bash
//! # Export a PNG with a caption
//! qrstudio export png --data https://example.com --label "Scan me!"
//!
//! # Export an SVG using a saved settings file, overriding the dot style
//! qrstudio export svg --settings brand.json --dot-style rounded --out brand.svg
//!
//! # Social-media screenshot of an email QR with a logo
//! qrstudio export screenshot --type email --data hi@example.com --logo logo.png
//!
//! # Copy the data from a settings file to the system clipboard
//! qrstudio copy --settings brand.json
//!
//! # Run the web editor
//! qrstudio serve --listen 127.0.0.1:8080
//! ```
//!
//! Log verbosity follows `RUST_LOG` (default `qrstudio=info`).

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

use qrstudio::{
    QrStudioError,
    clipboard::{CommandClipboard, CopyFeedback},
    export::{ExportKind, Exporter},
    render::{Render, RenderOptions, StyledRenderer},
    server::{self, ServerConfig},
    settings::{ContentType, DotStyle, ErrorCorrection, Settings, SettingsPatch},
};

/// qrstudio - Styled QR code designer
#[derive(Parser, Debug)]
#[command(name = "qrstudio")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Render a QR code and write it as png, svg or screenshot
    Export {
        /// Export kind: png, svg or screenshot
        kind: ExportKind,

        /// Start from a JSON settings file
        #[arg(long, value_name = "FILE")]
        settings: Option<PathBuf>,

        /// Data to encode
        #[arg(long)]
        data: Option<String>,

        /// Content type: url, text, email or phone
        #[arg(long = "type", value_name = "TYPE")]
        content_type: Option<ContentType>,

        /// Caption under the code
        #[arg(long)]
        label: Option<String>,

        /// Foreground (dot) color
        #[arg(long)]
        fg: Option<String>,

        /// Background color
        #[arg(long)]
        bg: Option<String>,

        /// Size in pixels (200-500)
        #[arg(long)]
        size: Option<u32>,

        /// Quiet-zone margin in pixels (0-20)
        #[arg(long)]
        margin: Option<u32>,

        /// Error correction level: L, M, Q or H
        #[arg(long)]
        ec: Option<ErrorCorrection>,

        /// Dot style: square, rounded, circle or sharp
        #[arg(long)]
        dot_style: Option<DotStyle>,

        /// Logo image placed in the center
        #[arg(long, value_name = "FILE")]
        logo: Option<PathBuf>,

        /// Output path (defaults to the standard file name)
        #[arg(long, value_name = "PATH")]
        out: Option<PathBuf>,
    },

    /// Copy the raw data to the system clipboard
    Copy {
        /// Start from a JSON settings file
        #[arg(long, value_name = "FILE")]
        settings: Option<PathBuf>,

        /// Data to copy
        #[arg(long)]
        data: Option<String>,
    },

    /// Run the web editor
    Serve {
        /// Address to listen on
        #[arg(long, default_value = "127.0.0.1:8080")]
        listen: String,

        /// Re-render delay after the last change, in milliseconds
        #[arg(long, default_value = "300")]
        debounce_ms: u64,

        /// Start from a JSON settings file
        #[arg(long, value_name = "FILE")]
        settings: Option<PathBuf>,
    },
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("qrstudio=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = run() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn load_settings(path: Option<&PathBuf>) -> Result<Settings, QrStudioError> {
    match path {
        Some(path) => Settings::from_json_file(path),
        None => Ok(Settings::default()),
    }
}

fn run() -> Result<(), QrStudioError> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Export {
            kind,
            settings,
            data,
            content_type,
            label,
            fg,
            bg,
            size,
            margin,
            ec,
            dot_style,
            logo,
            out,
        } => {
            let mut current = load_settings(settings.as_ref())?;
            let logo = logo
                .map(|path| qrstudio::logo::from_path(&path))
                .transpose()?;
            SettingsPatch {
                content_type,
                data,
                label_text: label,
                foreground_color: fg,
                background_color: bg,
                size,
                margin,
                error_correction_level: ec,
                dot_style,
                logo: logo.map(Some),
                ..Default::default()
            }
            .apply(&mut current);

            if !current.has_data() {
                println!("Nothing to export: no data given (use --data)");
                return Ok(());
            }

            let qr = StyledRenderer::new().render(&RenderOptions::from_settings(&current))?;
            let Some(artifact) = Exporter::new().export(kind, Some(&qr.svg), &current)? else {
                return Ok(());
            };

            let path = out.unwrap_or_else(|| PathBuf::from(artifact.filename));
            std::fs::write(&path, &artifact.bytes)?;
            println!("Saved {} to {}", kind, path.display());
        }

        Commands::Copy { settings, data } => {
            let mut current = load_settings(settings.as_ref())?;
            SettingsPatch {
                data,
                ..Default::default()
            }
            .apply(&mut current);

            if !current.has_data() {
                println!("Nothing to copy: no data given (use --data)");
                return Ok(());
            }

            let mut feedback = CopyFeedback::new();
            if !feedback.copy(&mut CommandClipboard::new(), &current.data) {
                return Err(QrStudioError::Clipboard(
                    "Failed to copy to the clipboard".to_string(),
                ));
            }
            println!("Copied {} characters", current.data.chars().count());
        }

        Commands::Serve {
            listen,
            debounce_ms,
            settings,
        } => {
            let config = ServerConfig {
                listen_addr: listen,
                debounce: Duration::from_millis(debounce_ms),
                initial: load_settings(settings.as_ref())?,
            };
            tokio::runtime::Runtime::new()?.block_on(server::serve(config))?;
        }
    }

    Ok(())
}
