use serde::{Deserialize, Serialize};

pub const DEFAULT_CALL_TIMEOUT_MS: u64 = 5_000;

#[derive(Debug, Deserialize, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ExpanderConfigDto {
    #[serde(default)]
    pub endpoint: String,
    #[serde(default)]
    pub transport: TransportDto,
    #[serde(default = "default_call_timeout_ms")]
    pub call_timeout_ms: u64,
}

#[derive(Debug, Deserialize, Clone, Serialize, PartialEq, Default)]
#[serde(tag = "mode", rename_all = "camelCase")]
pub enum TransportDto {
    #[default]
    Plaintext,
    #[serde(rename_all = "camelCase")]
    Encrypted {
        trust_path: String,
        #[serde(default)]
        expected_identity: Option<String>,
    },
}

fn default_call_timeout_ms() -> u64 {
    DEFAULT_CALL_TIMEOUT_MS
}
