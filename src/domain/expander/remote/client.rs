use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use futures::{SinkExt, StreamExt};

use crate::domain::communication::protocol::{BestOptionRequest, BestOptionResponse, BestOptionsRequest, BestOptionsResponse, Envelope, Payload};
use crate::domain::expander::remote::channel::Channel;
use crate::error::RemoteCallError;

/// Unary calls offered by a remote expander.
#[async_trait]
pub trait ExpanderClient: Send + Sync {
    async fn best_option(&self, request: BestOptionRequest) -> Result<BestOptionResponse, RemoteCallError>;

    async fn best_options(&self, request: BestOptionsRequest) -> Result<BestOptionsResponse, RemoteCallError>;
}

/// Runs `call`, giving up once `deadline` has passed since the start.
pub async fn with_deadline<T, F>(deadline: Duration, call: F) -> Result<T, RemoteCallError>
where
    F: Future<Output = Result<T, RemoteCallError>>,
{
    match tokio::time::timeout(deadline, call).await {
        Ok(result) => result,
        Err(_) => Err(RemoteCallError::DeadlineExceeded(deadline)),
    }
}

/// Expander client speaking the framed protocol over a shared [`Channel`].
///
/// Exactly one request/response exchange per call, no retries. A connection
/// goes back to the channel only after a complete, well-formed exchange;
/// anything else (including cancellation by the deadline) drops it.
#[derive(Debug, Clone)]
pub struct RpcExpanderClient {
    channel: Arc<Channel>,
}

impl RpcExpanderClient {
    pub fn new(channel: Arc<Channel>) -> Self {
        Self { channel }
    }

    pub fn channel(&self) -> &Arc<Channel> {
        &self.channel
    }

    async fn call(&self, payload: Payload) -> Result<Payload, RemoteCallError> {
        let mut connection = self.channel.checkout().await?;

        let request = Envelope::request(payload);
        let request_id = request.request_id;
        connection.send(request).await?;

        let reply = match connection.next().await {
            Some(reply) => reply?,
            None => return Err(RemoteCallError::ConnectionClosed),
        };
        if reply.request_id != request_id {
            return Err(RemoteCallError::RequestIdMismatch);
        }
        self.channel.checkin(connection);

        match reply.payload {
            Payload::Error { message } => Err(RemoteCallError::Remote(message)),
            payload => Ok(payload),
        }
    }
}

#[async_trait]
impl ExpanderClient for RpcExpanderClient {
    async fn best_option(&self, request: BestOptionRequest) -> Result<BestOptionResponse, RemoteCallError> {
        match self.call(Payload::BestOptionRequest(request)).await? {
            Payload::BestOptionResponse(response) => Ok(response),
            other => Err(RemoteCallError::UnexpectedPayload(other.kind())),
        }
    }

    async fn best_options(&self, request: BestOptionsRequest) -> Result<BestOptionsResponse, RemoteCallError> {
        match self.call(Payload::BestOptionsRequest(request)).await? {
            Payload::BestOptionsResponse(response) => Ok(response),
            other => Err(RemoteCallError::UnexpectedPayload(other.kind())),
        }
    }
}
