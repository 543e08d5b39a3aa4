//! Per-field extraction and validation.
//!
//! Each function reads one field from the raw document and either returns
//! its typed value or the first rule it breaks.

use serde_yaml::{Mapping, Value};
use std::path::PathBuf;
use tracing::debug;

use super::components::named_components;
use super::error::SettingError;
use super::paths::PathCheck;
use super::types::{NamedComponent, RestApi};

const REST_API: &str = "rest_api";
const MIN_PORT: i64 = 1024;
const MAX_PORT: i64 = 65535;

pub fn default_speech_to_text(doc: &Mapping) -> Result<String, SettingError> {
    let name = required_string(doc, "default_speech_to_text")?;
    debug!("Default STT: {}", name);
    Ok(name)
}

pub fn default_text_to_speech(doc: &Mapping) -> Result<String, SettingError> {
    let name = required_string(doc, "default_text_to_speech")?;
    debug!("Default TTS: {}", name);
    Ok(name)
}

pub fn default_trigger(doc: &Mapping) -> Result<String, SettingError> {
    let name = required_string(doc, "default_trigger")?;
    debug!("Default trigger: {}", name);
    Ok(name)
}

pub fn speech_to_text_engines(doc: &Mapping) -> Result<Vec<NamedComponent>, SettingError> {
    named_components(doc, "speech_to_text")
}

pub fn text_to_speech_engines(doc: &Mapping) -> Result<Vec<NamedComponent>, SettingError> {
    named_components(doc, "text_to_speech")
}

pub fn triggers(doc: &Mapping) -> Result<Vec<NamedComponent>, SettingError> {
    named_components(doc, "triggers")
}

pub fn random_wake_up_answers(doc: &Mapping) -> Result<Option<Vec<String>>, SettingError> {
    optional_string_list(doc, "random_wake_up_answers")
}

pub fn random_wake_up_sounds(doc: &Mapping) -> Result<Option<Vec<String>>, SettingError> {
    optional_string_list(doc, "random_wake_up_sounds")
}

/// Extract the REST API block.
///
/// Fields are checked in a fixed order so the first broken one is reported:
/// `password_protected`, `login`, `password`, then credential nullness when
/// protected, `active`, `port`.
pub fn rest_api(doc: &Mapping) -> Result<RestApi, SettingError> {
    let api = match doc.get(REST_API) {
        None => return Err(SettingError::not_found(REST_API)),
        Some(Value::Null) => return Err(SettingError::null_value(REST_API)),
        Some(Value::Mapping(api)) => api,
        Some(_) => return Err(SettingError::invalid(REST_API, "rest_api must be a mapping")),
    };

    let password_protected = required_bool(api, "password_protected")?;

    let login = credential(api, "login")?;
    let password = credential(api, "password")?;
    if password_protected {
        require_credential("login", &login)?;
        require_credential("password", &password)?;
    }

    let active = required_bool(api, "active")?;
    let port = port(api)?;

    Ok(RestApi {
        password_protected,
        login,
        password,
        active,
        port,
    })
}

/// Extract `cache_path` and make sure it can be used.
pub fn cache_path(doc: &Mapping, check: &dyn PathCheck) -> Result<PathBuf, SettingError> {
    let raw = required_string(doc, "cache_path")?;
    let path = PathBuf::from(&raw);

    if !check.is_usable(&path) {
        return Err(SettingError::invalid(
            "cache_path",
            format!("The cache_path seems to be invalid: {}", raw),
        ));
    }

    debug!("Cache path: {}", path.display());
    Ok(path)
}

fn nested(field: &str) -> String {
    format!("{}.{}", REST_API, field)
}

/// Required, non-null, non-empty string.
fn required_string(doc: &Mapping, key: &str) -> Result<String, SettingError> {
    match doc.get(key) {
        None => Err(SettingError::not_found(key)),
        Some(Value::Null) => Err(SettingError::null_value(key)),
        Some(Value::String(s)) if s.is_empty() => Err(SettingError::null_value(key)
            .with_message(format!("{} setting cannot be empty", key))),
        Some(Value::String(s)) => Ok(s.clone()),
        Some(_) => Err(SettingError::invalid(key, format!("{} must be a string", key))),
    }
}

fn required_bool(api: &Mapping, key: &str) -> Result<bool, SettingError> {
    let field = nested(key);
    match api.get(key) {
        None => Err(SettingError::not_found(field)),
        Some(Value::Null) => Err(SettingError::null_value(field)),
        Some(Value::Bool(b)) => Ok(*b),
        Some(_) => Err(SettingError::invalid(
            field,
            format!("{} must be a boolean", key),
        )),
    }
}

/// The key must be present; a null value reads as `None`.
fn credential(api: &Mapping, key: &str) -> Result<Option<String>, SettingError> {
    match api.get(key) {
        None => Err(SettingError::not_found(nested(key))),
        Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => Ok(Some(s.clone())),
        Some(_) => Err(SettingError::invalid(
            nested(key),
            format!("{} must be a string", key),
        )),
    }
}

fn require_credential(key: &str, value: &Option<String>) -> Result<(), SettingError> {
    if value.is_none() {
        return Err(SettingError::null_value(nested(key)).with_message(format!(
            "{} setting cannot be null if password_protected is True",
            key
        )));
    }
    Ok(())
}

fn port(api: &Mapping) -> Result<u16, SettingError> {
    let field = nested("port");
    let raw = match api.get("port") {
        None => return Err(SettingError::not_found(field)),
        Some(Value::Null) => return Err(SettingError::null_value(field)),
        Some(raw) => raw,
    };

    let not_integer = || SettingError::invalid(nested("port"), "port must be an integer");
    let out_of_range = || SettingError::invalid(nested("port"), "port must be in range 1024-65535");

    let port = match raw {
        Value::Number(n) if n.is_i64() => n.as_i64().ok_or_else(not_integer)?,
        // Larger than i64 but still an integer
        Value::Number(n) if n.is_u64() => return Err(out_of_range()),
        // Whole floats such as 5000.0
        Value::Number(n) => match n.as_f64() {
            Some(f) if f.is_finite() && f.fract() == 0.0 => f as i64,
            _ => return Err(not_integer()),
        },
        Value::String(s) => s.trim().parse::<i64>().map_err(|_| not_integer())?,
        _ => return Err(not_integer()),
    };

    if !(MIN_PORT..=MAX_PORT).contains(&port) {
        return Err(out_of_range());
    }

    u16::try_from(port).map_err(|_| out_of_range())
}

fn optional_string_list(doc: &Mapping, key: &str) -> Result<Option<Vec<String>>, SettingError> {
    let items = match doc.get(key) {
        // Not configured by the user
        None => return Ok(None),
        Some(Value::Null) => return Err(SettingError::null_value(key)),
        Some(Value::Sequence(items)) => items,
        Some(_) => return Err(SettingError::invalid(key, format!("{} must be a list", key))),
    };

    items
        .iter()
        .enumerate()
        .map(|(i, item)| match item {
            Value::String(s) => Ok(s.clone()),
            _ => Err(SettingError::invalid(
                format!("{}[{}]", key, i),
                format!("{}[{}] must be a string", key, i),
            )),
        })
        .collect::<Result<Vec<_>, _>>()
        .map(Some)
}
