//! Raw YAML settings document.

use serde_yaml::{Mapping, Value};
use std::fs;
use std::path::Path;

use super::error::LoadError;

/// Read a settings file and return its top-level mapping.
///
/// An empty file yields an empty mapping so missing keys surface as
/// `NotFound` rather than as a parse failure.
pub fn read_document(path: &Path) -> Result<Mapping, LoadError> {
    let content = fs::read_to_string(path).map_err(|source| LoadError::Read {
        path: path.to_path_buf(),
        source,
    })?;

    parse_document(&content, path)
}

/// Parse settings text. `origin` is only used in error messages.
pub fn parse_document(content: &str, origin: &Path) -> Result<Mapping, LoadError> {
    let value: Value = serde_yaml::from_str(content).map_err(|source| LoadError::Parse {
        path: origin.to_path_buf(),
        source,
    })?;

    match value {
        Value::Mapping(mapping) => Ok(mapping),
        Value::Null => Ok(Mapping::new()),
        _ => Err(LoadError::NotAMapping {
            path: origin.to_path_buf(),
        }),
    }
}
