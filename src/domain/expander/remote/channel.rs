use std::fmt;
use std::fs;
use std::io;
use std::path::Path;
use std::sync::{Arc, Mutex, PoisonError};

use futures::{FutureExt, StreamExt};
use rustls::pki_types::ServerName;
use rustls::{ClientConfig, RootCertStore};
use tokio::io::{AsyncRead, AsyncWrite};
use tokio::net::TcpStream;
use tokio_rustls::TlsConnector;
use tokio_util::codec::Framed;

use crate::domain::communication::codec::ExpanderCodec;
use crate::domain::expander::remote::config::{ExpanderConfig, TransportMode};
use crate::error::ConstructionError;

/// Idle connections kept for reuse. Extra connections are closed on return.
pub const MAX_IDLE_CONNECTIONS: usize = 4;

pub trait ExpanderIo: AsyncRead + AsyncWrite + Send + Unpin {}

impl<T: AsyncRead + AsyncWrite + Send + Unpin> ExpanderIo for T {}

/// A framed, possibly TLS-wrapped connection to the remote expander.
pub type Connection = Framed<Box<dyn ExpanderIo>, ExpanderCodec>;

enum Security {
    Plaintext,
    Tls { connector: TlsConnector, server_name: ServerName<'static> },
}

/// Long-lived channel to the remote expander, shared by every decision.
///
/// Credentials are loaded once at construction. Connections are dialed
/// lazily and each call checks one out exclusively, so concurrent decisions
/// never share a connection.
pub struct Channel {
    endpoint: String,
    security: Security,
    idle: Mutex<Vec<Connection>>,
}

impl Channel {
    pub fn new(config: &ExpanderConfig) -> Result<Self, ConstructionError> {
        config.validate()?;

        let security = match &config.transport {
            TransportMode::Plaintext => {
                log::info!("Remote expander trust material not provided, using plaintext connection to {}.", config.endpoint);
                Security::Plaintext
            }
            TransportMode::Encrypted { trust_path, expected_identity } => {
                let identity = match expected_identity {
                    Some(identity) => identity.clone(),
                    None => config.host()?.to_string(),
                };
                let security = tls_security(trust_path, identity.clone())?;
                log::info!("Using TLS connection to remote expander {} (server identity '{}').", config.endpoint, identity);
                security
            }
        };

        Ok(Self { endpoint: config.endpoint.clone(), security, idle: Mutex::new(Vec::new()) })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    pub fn is_encrypted(&self) -> bool {
        matches!(self.security, Security::Tls { .. })
    }

    pub fn idle_connections(&self) -> usize {
        self.idle.lock().unwrap_or_else(PoisonError::into_inner).len()
    }

    /// Takes an idle connection that is still open or dials a new one.
    pub async fn checkout(&self) -> io::Result<Connection> {
        loop {
            let reused = self.idle.lock().unwrap_or_else(PoisonError::into_inner).pop();
            let Some(mut connection) = reused else {
                return self.dial().await;
            };
            if is_open(&mut connection) {
                return Ok(connection);
            }
            log::debug!("Discarding idle connection closed by remote expander {}.", self.endpoint);
        }
    }

    /// Returns a healthy connection after a completed call.
    pub fn checkin(&self, connection: Connection) {
        let mut idle = self.idle.lock().unwrap_or_else(PoisonError::into_inner);
        if idle.len() < MAX_IDLE_CONNECTIONS {
            idle.push(connection);
        }
    }

    async fn dial(&self) -> io::Result<Connection> {
        log::debug!("Dialing remote expander at {}.", self.endpoint);
        let tcp = TcpStream::connect(&self.endpoint).await?;
        tcp.set_nodelay(true)?;

        let io: Box<dyn ExpanderIo> = match &self.security {
            Security::Plaintext => Box::new(tcp),
            Security::Tls { connector, server_name } => Box::new(connector.connect(server_name.clone(), tcp).await?),
        };

        Ok(Framed::new(io, ExpanderCodec::new()))
    }
}

impl fmt::Debug for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Channel")
            .field("endpoint", &self.endpoint)
            .field("encrypted", &self.is_encrypted())
            .field("idle_connections", &self.idle_connections())
            .finish()
    }
}

/// An idle connection has nothing to read. EOF, an error or an unsolicited
/// frame all mean it cannot carry the next exchange.
fn is_open(connection: &mut Connection) -> bool {
    connection.next().now_or_never().is_none()
}

fn tls_security(trust_path: &Path, identity: String) -> Result<Security, ConstructionError> {
    let roots = load_trust_anchors(trust_path)?;
    let server_name = ServerName::try_from(identity.as_str())
        .map(|name| name.to_owned())
        .map_err(|_| ConstructionError::InvalidServerIdentity(identity.clone()))?;

    let provider = Arc::new(rustls::crypto::ring::default_provider());
    let config = ClientConfig::builder_with_provider(provider)
        .with_safe_default_protocol_versions()?
        .with_root_certificates(roots)
        .with_no_client_auth();

    Ok(Security::Tls { connector: TlsConnector::from(Arc::new(config)), server_name })
}

/// Reads every PEM certificate in `path` into a root store.
fn load_trust_anchors(path: &Path) -> Result<RootCertStore, ConstructionError> {
    let trust_error = |source: io::Error| ConstructionError::TrustMaterial { path: path.to_path_buf(), source };

    let pem = fs::read(path).map_err(trust_error)?;
    let mut reader = pem.as_slice();
    let mut roots = RootCertStore::empty();
    for cert in rustls_pemfile::certs(&mut reader) {
        roots.add(cert.map_err(trust_error)?)?;
    }

    if roots.is_empty() {
        return Err(ConstructionError::NoTrustAnchors(path.to_path_buf()));
    }
    Ok(roots)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use std::path::PathBuf;

    fn fixture(name: &str) -> PathBuf {
        PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests").join("fixtures").join(name)
    }

    fn encrypted(trust_path: PathBuf, expected_identity: Option<&str>) -> ExpanderConfig {
        ExpanderConfig::plaintext("127.0.0.1:7000")
            .with_transport(TransportMode::Encrypted { trust_path, expected_identity: expected_identity.map(String::from) })
    }

    #[test]
    fn plaintext_channel_does_not_dial_on_construction() {
        let channel = Channel::new(&ExpanderConfig::plaintext("127.0.0.1:1")).unwrap();
        assert!(!channel.is_encrypted());
        assert_eq!(channel.idle_connections(), 0);
        assert_eq!(channel.endpoint(), "127.0.0.1:1");
    }

    #[test]
    fn encrypted_channel_loads_trust_material() {
        let channel = Channel::new(&encrypted(fixture("ca.pem"), Some("expander.local"))).unwrap();
        assert!(channel.is_encrypted());
    }

    #[test]
    fn encrypted_channel_defaults_identity_to_endpoint_host() {
        assert!(Channel::new(&encrypted(fixture("ca.pem"), None)).is_ok());
    }

    #[test]
    fn missing_trust_file_is_a_construction_error() {
        let err = Channel::new(&encrypted(fixture("does-not-exist.pem"), None)).unwrap_err();
        assert!(matches!(err, ConstructionError::TrustMaterial { .. }), "{err}");
    }

    #[test]
    fn trust_file_without_certificates_is_rejected() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "not a certificate").unwrap();

        let err = Channel::new(&encrypted(file.path().to_path_buf(), None)).unwrap_err();
        assert!(matches!(err, ConstructionError::NoTrustAnchors(_)), "{err}");
    }

    #[test]
    fn invalid_server_identity_is_rejected() {
        let err = Channel::new(&encrypted(fixture("ca.pem"), Some("not a host name!"))).unwrap_err();
        assert!(matches!(err, ConstructionError::InvalidServerIdentity(_)), "{err}");
    }

    #[test]
    fn missing_endpoint_is_rejected() {
        let err = Channel::new(&ExpanderConfig::plaintext("")).unwrap_err();
        assert!(matches!(err, ConstructionError::MissingEndpoint));
    }
}
