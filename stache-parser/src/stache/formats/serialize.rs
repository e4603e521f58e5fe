//! JSON and YAML output through serde

use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum FormatError {
    #[error("unknown format '{0}', expected one of: treeviz, json, yaml")]
    UnknownFormat(String),
    #[error("JSON serialization failed: {0}")]
    Json(#[from] serde_json::Error),
    #[error("YAML serialization failed: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

pub fn to_json<T: Serialize + ?Sized>(value: &T) -> Result<String, FormatError> {
    Ok(serde_json::to_string_pretty(value)?)
}

pub fn to_yaml<T: Serialize + ?Sized>(value: &T) -> Result<String, FormatError> {
    Ok(serde_yaml::to_string(value)?)
}
