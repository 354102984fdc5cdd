use serde::de::DeserializeOwned;
use std::fs;
use std::path::Path;

use crate::api::config_dto::ExpanderConfigDto;
use crate::api::decision_dto::DecisionDto;
use crate::domain::expander::remote::config::ExpanderConfig;
use crate::error::Result;

/// Reads `file_path` and parses it as JSON into `T`.
///
/// I/O failures become `Error::IoError`, malformed JSON becomes
/// `Error::DeserializationError`.
pub fn parse_json_file<T: DeserializeOwned>(file_path: impl AsRef<Path>) -> Result<T> {
    let data = fs::read_to_string(file_path.as_ref())?;
    Ok(serde_json::from_str(&data)?)
}

/// Loads and validates the remote expander configuration.
pub fn load_expander_config(file_path: impl AsRef<Path>) -> Result<ExpanderConfig> {
    let dto: ExpanderConfigDto = parse_json_file(&file_path)?;
    let config = ExpanderConfig::try_from(dto)?;
    log::info!("Loaded remote expander configuration from '{}' (endpoint {}).", file_path.as_ref().display(), config.endpoint);
    Ok(config)
}

pub fn load_decision(file_path: impl AsRef<Path>) -> Result<DecisionDto> {
    parse_json_file(file_path)
}
