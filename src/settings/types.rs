//! Typed settings produced by a successful load.

use serde::Serialize;
use serde_yaml::Mapping;
use std::path::PathBuf;

/// Fully validated assistant settings.
///
/// Built once by the loader and never mutated afterwards; share it behind an `Arc`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Settings {
    /// Name of the speech-to-text engine used by default
    pub default_stt_name: String,

    /// Name of the text-to-speech engine used by default
    pub default_tts_name: String,

    /// Name of the wake-word trigger used by default
    pub default_trigger_name: String,

    /// Configured speech-to-text engines, in document order
    pub stts: Vec<NamedComponent>,

    /// Configured text-to-speech engines, in document order
    pub ttss: Vec<NamedComponent>,

    /// Configured wake-word triggers, in document order
    pub triggers: Vec<NamedComponent>,

    /// Phrases spoken when the assistant wakes up (optional)
    pub random_wake_up_answers: Option<Vec<String>>,

    /// Sound files played when the assistant wakes up (optional)
    pub random_wake_up_sounds: Option<Vec<String>>,

    /// Embedded REST API settings
    pub rest_api: RestApi,

    /// Directory for generated audio
    pub cache_path: PathBuf,
}

/// A speech-to-text engine, text-to-speech engine or trigger entry.
///
/// Two document shapes map onto this:
///
/// ```yaml
/// speech_to_text:
///   - google                # bare name, no parameters
///   - bing:                 # name with parameters
///       key: "..."
/// ```
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NamedComponent {
    pub name: String,

    /// Backend specific parameters; `None` for bare entries
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parameters: Option<Mapping>,
}

impl NamedComponent {
    /// Component without parameters.
    pub fn bare(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            parameters: None,
        }
    }

    /// Component with a parameter mapping.
    pub fn with_parameters(name: impl Into<String>, parameters: Mapping) -> Self {
        Self {
            name: name.into(),
            parameters: Some(parameters),
        }
    }
}

/// REST API descriptor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RestApi {
    pub password_protected: bool,

    /// Required when `password_protected` is set
    pub login: Option<String>,

    /// Required when `password_protected` is set
    #[serde(skip_serializing)]
    pub password: Option<String>,

    pub active: bool,

    /// Listening port, 1024-65535
    pub port: u16,
}
