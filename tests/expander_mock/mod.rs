//! In-process expander server used by the integration tests.
#![allow(dead_code)]

use std::net::TcpListener as StdTcpListener;
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::thread;

use futures::{SinkExt, StreamExt};
use remote_expander::domain::communication::codec::ExpanderCodec;
use remote_expander::domain::communication::protocol::{BestOptionResponse, BestOptionsResponse, Payload};
use remote_expander::domain::expander::remote::channel::ExpanderIo;
use rustls::ServerConfig;
use rustls::pki_types::PrivateKeyDer;
use tokio::io::AsyncWriteExt;
use tokio::net::TcpListener;
use tokio_rustls::TlsAcceptor;
use tokio_util::codec::Framed;

/// What the mock does with one request.
pub enum Action {
    Reply(Payload),
    /// Answer, then close the connection like an idle-reaping server.
    ReplyAndClose(Payload),
    /// Keep the connection open and never answer.
    Ignore,
    HangUp,
    /// Answer with a frame that does not decode.
    Garbage,
}

pub type Handler = Arc<dyn Fn(&Payload) -> Action + Send + Sync>;

pub struct MockExpander {
    pub addr: String,
    requests: Arc<Mutex<Vec<Payload>>>,
    connections: Arc<AtomicUsize>,
}

impl MockExpander {
    pub fn start(handler: impl Fn(&Payload) -> Action + Send + Sync + 'static) -> Self {
        Self::spawn(Arc::new(handler), None)
    }

    /// Serves TLS with the certificate and PKCS#8 key in `tests/fixtures`.
    pub fn start_tls(handler: impl Fn(&Payload) -> Action + Send + Sync + 'static) -> Self {
        Self::spawn(Arc::new(handler), Some(tls_acceptor(&fixture("server.pem"), &fixture("server.key"))))
    }

    /// Always picks `node_group_id` (or the filter list for filter requests).
    pub fn choosing(node_group_id: &'static str) -> Self {
        Self::start(move |payload| match payload {
            Payload::BestOptionRequest(_) => {
                Action::Reply(Payload::BestOptionResponse(BestOptionResponse { node_group_id: Some(node_group_id.to_string()) }))
            }
            Payload::BestOptionsRequest(_) => {
                Action::Reply(Payload::BestOptionsResponse(BestOptionsResponse { node_group_ids: vec![node_group_id.to_string()] }))
            }
            _ => Action::HangUp,
        })
    }

    pub fn requests(&self) -> Vec<Payload> {
        self.requests.lock().unwrap().clone()
    }

    pub fn connections(&self) -> usize {
        self.connections.load(Ordering::SeqCst)
    }

    fn spawn(handler: Handler, acceptor: Option<TlsAcceptor>) -> Self {
        let listener = StdTcpListener::bind("127.0.0.1:0").unwrap();
        listener.set_nonblocking(true).unwrap();
        let addr = listener.local_addr().unwrap().to_string();

        let requests = Arc::new(Mutex::new(Vec::new()));
        let connections = Arc::new(AtomicUsize::new(0));
        let (requests_clone, connections_clone) = (requests.clone(), connections.clone());

        thread::spawn(move || {
            let runtime = tokio::runtime::Builder::new_current_thread().enable_all().build().unwrap();
            runtime.block_on(async move {
                let listener = TcpListener::from_std(listener).unwrap();
                loop {
                    let Ok((stream, _)) = listener.accept().await else { continue };
                    connections_clone.fetch_add(1, Ordering::SeqCst);

                    let (handler, requests, acceptor) = (handler.clone(), requests_clone.clone(), acceptor.clone());
                    tokio::spawn(async move {
                        let io: Box<dyn ExpanderIo> = match acceptor {
                            Some(acceptor) => match acceptor.accept(stream).await {
                                Ok(tls) => Box::new(tls),
                                Err(_) => return,
                            },
                            None => Box::new(stream),
                        };
                        serve_connection(io, handler, requests).await;
                    });
                }
            });
        });

        Self { addr, requests, connections }
    }
}

async fn serve_connection(io: Box<dyn ExpanderIo>, handler: Handler, requests: Arc<Mutex<Vec<Payload>>>) {
    let mut framed = Framed::new(io, ExpanderCodec::new());
    while let Some(Ok(request)) = framed.next().await {
        requests.lock().unwrap().push(request.payload.clone());
        match handler(&request.payload) {
            Action::Reply(payload) => {
                if framed.send(request.reply_to(payload)).await.is_err() {
                    return;
                }
            }
            Action::ReplyAndClose(payload) => {
                let _ = framed.send(request.reply_to(payload)).await;
                return;
            }
            Action::Ignore => {}
            Action::HangUp => return,
            Action::Garbage => {
                let _ = framed.get_mut().write_all(&[0, 0, 0, 4, 0xde, 0xad, 0xbe, 0xef]).await;
                let _ = framed.get_mut().flush().await;
            }
        }
    }
}

pub fn fixture(name: &str) -> std::path::PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("tests").join("fixtures").join(name)
}

/// Address nobody listens on.
pub fn unused_addr() -> String {
    let listener = StdTcpListener::bind("127.0.0.1:0").unwrap();
    listener.local_addr().unwrap().to_string()
}

fn tls_acceptor(cert_path: &Path, key_path: &Path) -> TlsAcceptor {
    let certs = rustls_pemfile::certs(&mut std::fs::read(cert_path).unwrap().as_slice()).collect::<Result<Vec<_>, _>>().unwrap();
    let key = rustls_pemfile::pkcs8_private_keys(&mut std::fs::read(key_path).unwrap().as_slice()).next().unwrap().unwrap();

    let config = ServerConfig::builder_with_provider(Arc::new(rustls::crypto::ring::default_provider()))
        .with_safe_default_protocol_versions()
        .unwrap()
        .with_no_client_auth()
        .with_single_cert(certs, PrivateKeyDer::Pkcs8(key))
        .unwrap();
    TlsAcceptor::from(Arc::new(config))
}
