//! Exporters for rendered Quill documents
//!
//! Quill stops at placed strokes; drawing them is up to a renderer. The
//! exporters here hand a [`Document`] over in a format those renderers read.

use quill_core::{
    document::Document,
    error::{ExportError, Result},
    traits::Exporter,
};

/// JSON exporter for documents
///
/// Points serialize as `[x, y]` pairs. Control points only appear when the
/// document was composed with knots enabled.
///
/// # Examples
///
/// ```
/// use quill_core::{document::Document, traits::Exporter};
/// use quill_export::JsonExporter;
///
/// let bytes = JsonExporter::new().export(&Document::default()).unwrap();
/// assert!(bytes.starts_with(b"{\"lines\":[]"));
/// ```
pub struct JsonExporter {
    pretty: bool,
}

impl JsonExporter {
    pub fn new() -> Self {
        Self { pretty: false }
    }

    /// Indented output, handy for diffs and eyeballing
    pub fn with_pretty_print() -> Self {
        Self { pretty: true }
    }
}

impl Default for JsonExporter {
    fn default() -> Self {
        Self::new()
    }
}

impl Exporter for JsonExporter {
    fn name(&self) -> &'static str {
        "json"
    }

    fn export(&self, document: &Document) -> Result<Vec<u8>> {
        let bytes = if self.pretty {
            serde_json::to_vec_pretty(document)
        } else {
            serde_json::to_vec(document)
        }
        .map_err(|e| ExportError::EncodingFailed(e.to_string()))?;

        log::trace!("Exported {} bytes of JSON", bytes.len());
        Ok(bytes)
    }

    fn extension(&self) -> &'static str {
        "json"
    }

    fn mime_type(&self) -> &'static str {
        "application/json"
    }
}
