//! Input documents

use crate::error::{ProvisionError, Result};
use sbmod_types::RawNamespaceConfig;
use std::path::Path;
use tracing::debug;

/// Encoding of an input document
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentFormat {
    Json,
    Yaml,
}

impl DocumentFormat {
    /// Format from a file extension; anything but `.yaml`/`.yml` is JSON
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some("yaml") | Some("yml") => DocumentFormat::Yaml,
            _ => DocumentFormat::Json,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            DocumentFormat::Json => "JSON",
            DocumentFormat::Yaml => "YAML",
        }
    }
}

/// Parse a raw namespace document
pub fn parse_document(text: &str, format: DocumentFormat) -> Result<RawNamespaceConfig> {
    let parsed = match format {
        DocumentFormat::Json => serde_json::from_str(text).map_err(|e| e.to_string()),
        DocumentFormat::Yaml => serde_yaml::from_str(text).map_err(|e| e.to_string()),
    };

    parsed.map_err(|message| ProvisionError::Parse {
        format: format.as_str(),
        message,
    })
}

/// Read and parse a raw namespace document from disk
pub fn load_document(path: impl AsRef<Path>) -> Result<RawNamespaceConfig> {
    let path = path.as_ref();
    let format = DocumentFormat::from_path(path);
    debug!(path = %path.display(), format = format.as_str(), "Loading document");

    let text = std::fs::read_to_string(path)?;
    parse_document(&text, format)
}
