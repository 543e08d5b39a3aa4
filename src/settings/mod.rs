//! Settings management module.
//!
//! Handles YAML settings loading, field validation, and load-once caching.

mod components;
mod document;
mod error;
mod extract;
mod loader;
mod paths;
mod types;

pub use document::{parse_document, read_document};
pub use error::{LoadError, SettingError, SettingErrorKind};
pub use loader::{global, load_settings, resolve_path, SettingsLoader, DEFAULT_FILE_NAME};
pub use paths::{FsPathCheck, PathCheck};
pub use types::{NamedComponent, RestApi, Settings};
