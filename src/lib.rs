//! assistant-settings: settings loader for a voice assistant runtime
//!
//! Turns a YAML settings document into validated, immutable [`Settings`]:
//! default engine names, speech-to-text / text-to-speech engines, wake-word
//! triggers, the embedded REST API and the audio cache directory.
//!
//! ```no_run
//! use assistant_settings::SettingsLoader;
//!
//! let loader = SettingsLoader::new();
//! let settings = loader.load(None)?; // reads ./settings.yml once
//! println!("default trigger: {}", settings.default_trigger_name);
//! # Ok::<(), assistant_settings::LoadError>(())
//! ```

pub mod logger;
pub mod settings;

pub use settings::{
    load_settings, LoadError, NamedComponent, RestApi, SettingError, SettingErrorKind, Settings,
    SettingsLoader,
};
