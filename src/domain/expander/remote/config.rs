use std::path::PathBuf;
use std::time::Duration;

use crate::api::config_dto::{DEFAULT_CALL_TIMEOUT_MS, ExpanderConfigDto, TransportDto};
use crate::error::ConstructionError;

/// How the channel to the remote expander is secured.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransportMode {
    Plaintext,
    /// TLS, trusting the certificates in `trust_path`. The server must present
    /// `expected_identity`, or the endpoint's host when that is `None`.
    Encrypted { trust_path: PathBuf, expected_identity: Option<String> },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExpanderConfig {
    /// `host:port` of the remote expander.
    pub endpoint: String,
    pub transport: TransportMode,
    pub call_timeout: Duration,
}

impl ExpanderConfig {
    pub fn plaintext(endpoint: impl Into<String>) -> Self {
        Self { endpoint: endpoint.into(), transport: TransportMode::Plaintext, call_timeout: Duration::from_millis(DEFAULT_CALL_TIMEOUT_MS) }
    }

    pub fn with_transport(mut self, transport: TransportMode) -> Self {
        self.transport = transport;
        self
    }

    pub fn with_call_timeout(mut self, call_timeout: Duration) -> Self {
        self.call_timeout = call_timeout;
        self
    }

    /// Host part of the endpoint, without brackets for IPv6 literals.
    pub fn host(&self) -> Result<&str, ConstructionError> {
        let (host, port) = self.endpoint.rsplit_once(':').ok_or_else(|| ConstructionError::InvalidEndpoint(self.endpoint.clone()))?;
        let host = host.trim_start_matches('[').trim_end_matches(']');
        if host.is_empty() || port.parse::<u16>().is_err() {
            return Err(ConstructionError::InvalidEndpoint(self.endpoint.clone()));
        }
        Ok(host)
    }

    pub fn validate(&self) -> Result<(), ConstructionError> {
        if self.endpoint.trim().is_empty() {
            return Err(ConstructionError::MissingEndpoint);
        }
        if self.call_timeout.is_zero() {
            return Err(ConstructionError::ZeroCallTimeout);
        }
        self.host().map(|_| ())
    }
}

impl TryFrom<ExpanderConfigDto> for ExpanderConfig {
    type Error = ConstructionError;

    fn try_from(dto: ExpanderConfigDto) -> Result<Self, Self::Error> {
        let transport = match dto.transport {
            TransportDto::Plaintext => TransportMode::Plaintext,
            TransportDto::Encrypted { trust_path, expected_identity } => {
                TransportMode::Encrypted { trust_path: PathBuf::from(trust_path), expected_identity: expected_identity.filter(|id| !id.is_empty()) }
            }
        };

        let config = ExpanderConfig { endpoint: dto.endpoint, transport, call_timeout: Duration::from_millis(dto.call_timeout_ms) };
        config.validate()?;
        Ok(config)
    }
}
