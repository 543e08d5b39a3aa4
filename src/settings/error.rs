//! Error types for settings loading.

use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

/// The three ways a single setting can be rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SettingErrorKind {
    /// A required key is absent from the document
    NotFound,
    /// The key is present but its value is null or empty
    NullValue,
    /// The value is present but unusable (wrong type, out of range, bad path)
    Invalid,
}

impl fmt::Display for SettingErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::NotFound => "setting not found",
            Self::NullValue => "null setting",
            Self::Invalid => "invalid setting",
        };
        f.write_str(label)
    }
}

/// A rejected setting: what went wrong, where, and why.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{kind}: {message}")]
pub struct SettingError {
    pub kind: SettingErrorKind,
    /// Dotted path of the offending field, e.g. `rest_api.port`
    pub field: String,
    pub message: String,
}

impl SettingError {
    /// Required key is missing.
    pub fn not_found(field: impl Into<String>) -> Self {
        let field = field.into();
        Self {
            kind: SettingErrorKind::NotFound,
            message: format!("{} setting not found", field),
            field,
        }
    }

    /// Key is present but null.
    pub fn null_value(field: impl Into<String>) -> Self {
        let field = field.into();
        Self {
            kind: SettingErrorKind::NullValue,
            message: format!("{} setting cannot be null", field),
            field,
        }
    }

    /// Key is present with an unacceptable value.
    pub fn invalid(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            kind: SettingErrorKind::Invalid,
            field: field.into(),
            message: reason.into(),
        }
    }

    /// Replace the default message, keeping kind and field.
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }
}

/// Everything that can abort a settings load.
#[derive(Debug, Error)]
pub enum LoadError {
    /// The settings file could not be read
    #[error("failed to read settings file {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The settings file is not valid YAML
    #[error("failed to parse settings file {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    /// The document root is a scalar or a list
    #[error("settings file {} must contain a mapping at its root", path.display())]
    NotAMapping { path: PathBuf },

    /// A field failed validation
    #[error(transparent)]
    Setting(#[from] SettingError),
}

impl LoadError {
    /// The setting failure behind this error, if any.
    pub fn setting(&self) -> Option<&SettingError> {
        match self {
            Self::Setting(e) => Some(e),
            _ => None,
        }
    }
}
