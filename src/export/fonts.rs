//! Font database shared by every usvg parse.
//!
//! System fonts are loaded once. Generic families used by label styles
//! (`sans-serif`, `serif`, `monospace`) are pointed at the first installed
//! candidate.

use std::collections::HashSet;
use std::sync::{Arc, OnceLock};

use usvg::fontdb;

static FONT_DB: OnceLock<Arc<fontdb::Database>> = OnceLock::new();

fn init_fontdb() -> fontdb::Database {
    let mut db = fontdb::Database::new();
    db.load_system_fonts();

    let families: HashSet<String> = db
        .faces()
        .flat_map(|face| face.families.iter().map(|(name, _)| name.clone()))
        .collect();

    for family in ["Inter", "Helvetica", "Arial", "Liberation Sans", "DejaVu Sans"] {
        if families.contains(family) {
            db.set_sans_serif_family(family);
            break;
        }
    }

    for family in ["Georgia", "Times New Roman", "Times", "Liberation Serif", "DejaVu Serif"] {
        if families.contains(family) {
            db.set_serif_family(family);
            break;
        }
    }

    for family in ["JetBrains Mono", "Courier New", "Courier", "Liberation Mono", "DejaVu Sans Mono"] {
        if families.contains(family) {
            db.set_monospace_family(family);
            break;
        }
    }

    tracing::debug!(faces = db.len(), "font database loaded");
    db
}

pub fn fontdb() -> Arc<fontdb::Database> {
    FONT_DB.get_or_init(|| Arc::new(init_fontdb())).clone()
}

/// Parse options with the shared font database.
pub fn usvg_options() -> usvg::Options<'static> {
    usvg::Options {
        fontdb: fontdb(),
        ..usvg::Options::default()
    }
}
