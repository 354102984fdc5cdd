use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("File not found or could not be read: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Failed to parse expander JSON: {0}")]
    DeserializationError(#[from] serde_json::Error),

    #[error("Failed to build remote expander: {0}")]
    Construction(#[from] ConstructionError),
}

/// Failures while building the channel to the remote expander. These are
/// reported to the host, which decides whether to run fallback-only.
#[derive(Debug, Error)]
pub enum ConstructionError {
    #[error("Remote expander endpoint not provided")]
    MissingEndpoint,

    #[error("Remote expander endpoint '{0}' is not of the form host:port")]
    InvalidEndpoint(String),

    #[error("Failed to read trust material from '{path}': {source}")]
    TrustMaterial {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("No certificates found in trust material '{0}'")]
    NoTrustAnchors(PathBuf),

    #[error("TLS configuration rejected: {0}")]
    Tls(#[from] rustls::Error),

    #[error("Expected server identity '{0}' is not a valid server name")]
    InvalidServerIdentity(String),

    #[error("Call timeout must be greater than zero")]
    ZeroCallTimeout,

    #[error("Failed to start expander runtime: {0}")]
    Runtime(#[source] std::io::Error),
}

/// Everything that can go wrong on the remote path of a single decision.
/// Never surfaced past the strategy facade: each one routes to the fallback.
#[derive(Debug, Error)]
pub enum RemoteCallError {
    #[error("No expansion options to choose from")]
    EmptyOptions,

    #[error("Node group '{0}' appears more than once in the expansion options")]
    DuplicateNodeGroup(String),

    #[error("Node count {node_count} of node group '{node_group}' does not fit into the wire format")]
    NodeCountOverflow { node_group: String, node_count: usize },

    #[error("Remote expander did not answer within {0:?}")]
    DeadlineExceeded(Duration),

    #[error("Transport error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Connection closed before a response arrived")]
    ConnectionClosed,

    #[error("Response belongs to a different request")]
    RequestIdMismatch,

    #[error("Unexpected payload in response: {0}")]
    UnexpectedPayload(&'static str),

    #[error("Remote expander reported an error: {0}")]
    Remote(String),

    #[error("Remote expander returned no option")]
    NoOptionReturned,

    #[error("Remote expander returned unknown node group '{0}'")]
    UnknownNodeGroup(String),

    #[error("Expander call task failed: {0}")]
    Task(#[from] tokio::task::JoinError),

    #[error("Expander runtime has been shut down")]
    ShutDown,
}

pub type Result<T> = std::result::Result<T, Error>;
