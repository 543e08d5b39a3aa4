//! Normalisation of engine and trigger lists.
//!
//! `speech_to_text`, `text_to_speech` and `triggers` all accept the same two
//! entry shapes, a bare name or a single-key mapping of name to parameters.

use serde_yaml::{Mapping, Value};

use super::error::SettingError;
use super::types::NamedComponent;

/// Read the required component list stored under `key`.
pub fn named_components(doc: &Mapping, key: &str) -> Result<Vec<NamedComponent>, SettingError> {
    let entries = match doc.get(key) {
        None => return Err(SettingError::not_found(key)),
        Some(Value::Null) => return Err(SettingError::null_value(key)),
        Some(Value::Sequence(entries)) => entries,
        Some(_) => return Err(SettingError::invalid(key, format!("{} must be a list", key))),
    };

    entries
        .iter()
        .enumerate()
        .map(|(i, entry)| parse_entry(entry, &format!("{}[{}]", key, i)))
        .collect()
}

/// Turn one list entry into a component.
fn parse_entry(entry: &Value, field: &str) -> Result<NamedComponent, SettingError> {
    match entry {
        Value::String(name) => Ok(NamedComponent::bare(name.clone())),
        Value::Mapping(mapping) => {
            let mut pairs = mapping.iter();
            let (name, parameters) = match (pairs.next(), pairs.next()) {
                (Some(pair), None) => pair,
                _ => {
                    return Err(SettingError::invalid(
                        field,
                        format!("{} must map exactly one name to its parameters", field),
                    ))
                }
            };

            let name = match name {
                Value::String(name) => name.clone(),
                _ => {
                    return Err(SettingError::invalid(
                        field,
                        format!("{}: component name must be a string", field),
                    ))
                }
            };

            match parameters {
                Value::Null => Ok(NamedComponent::bare(name)),
                Value::Mapping(params) => Ok(NamedComponent::with_parameters(name, params.clone())),
                _ => Err(SettingError::invalid(
                    field,
                    format!("{}: parameters of '{}' must be a mapping", field, name),
                )),
            }
        }
        _ => Err(SettingError::invalid(
            field,
            format!("{} must be a name or a name with parameters", field),
        )),
    }
}
