//! Loading a system from a folder of JSON dictionaries
//!
//! A system folder holds up to five files:
//!
//! | File | Shape |
//! |------|-------|
//! | `glyphs.json` | `{"key": [[[x, y], ...], ...]}` |
//! | `modes.json` | `{"name": {"pattern": "...", "points": [...]}}` |
//! | `phrases.json` | `{"phrase": [[[x, y], ...], ...]}` |
//! | `rules.json` | `[{"name": "...", "regex": "...", "replacement": "..."}]` |
//! | `options.json` | `{"tie_breaks": ["pattern_length"]}` |
//!
//! A missing dictionary file leaves that dictionary out of the source; the
//! system then treats it as empty and records a warning. A missing
//! `options.json` just means default options.

use std::fs;
use std::io::ErrorKind;
use std::path::Path;

use serde::de::DeserializeOwned;

use quill_core::{error::SystemError, QuillError, Result, System, SystemSource};

pub const GLYPHS_FILE: &str = "glyphs.json";
pub const MODES_FILE: &str = "modes.json";
pub const PHRASES_FILE: &str = "phrases.json";
pub const RULES_FILE: &str = "rules.json";
pub const OPTIONS_FILE: &str = "options.json";

/// Read the dictionaries in `dir` into a [`SystemSource`]
pub fn load_source(dir: &Path) -> Result<SystemSource> {
    if !dir.is_dir() {
        return Err(QuillError::Config(format!(
            "System folder {} does not exist",
            dir.display()
        )));
    }

    let source = SystemSource {
        glyphs: read_optional(dir, GLYPHS_FILE)?,
        modes: read_optional(dir, MODES_FILE)?,
        phrases: read_optional(dir, PHRASES_FILE)?,
        rules: read_optional(dir, RULES_FILE)?,
        options: read_optional(dir, OPTIONS_FILE)?.unwrap_or_default(),
    };
    log::debug!("Loaded system source from {}", dir.display());
    Ok(source)
}

/// Read and build the system in `dir`
pub fn load(dir: &Path) -> Result<System> {
    let system = System::from_source(load_source(dir)?)?;
    log::info!(
        "Loaded system {} with {} glyphs, {} modes, {} phrases, {} rules",
        dir.display(),
        system.glyphs().len(),
        system.modes().len(),
        system.phrases().len(),
        system.rules().len()
    );
    Ok(system)
}

fn read_optional<T: DeserializeOwned>(dir: &Path, name: &str) -> Result<Option<T>> {
    let path = dir.join(name);
    let bytes = match fs::read(&path) {
        Ok(bytes) => bytes,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            log::debug!("{} not found", path.display());
            return Ok(None);
        },
        Err(e) => return Err(e.into()),
    };

    serde_json::from_slice(&bytes)
        .map(Some)
        .map_err(|e| SystemError::Malformed(format!("{}: {e}", path.display())).into())
}
