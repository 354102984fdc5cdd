use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use uuid::Uuid;

use crate::domain::cluster::node::Node;
use crate::domain::cluster::pod::Pod;

/// Flat wire form of an expansion option.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct WireOption {
    pub node_group_id: String,
    pub node_count: i32,
    pub debug: String,
    pub pods: Vec<Pod>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
pub struct BestOptionRequest {
    pub options: Vec<WireOption>,
    /// Node descriptors keyed by node name.
    pub node_map: HashMap<String, Node>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
pub struct BestOptionResponse {
    pub node_group_id: Option<String>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
pub struct BestOptionsRequest {
    pub options: Vec<WireOption>,
    pub node_map: HashMap<String, Node>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
pub struct BestOptionsResponse {
    pub node_group_ids: Vec<String>,
}

/// The messages the expander protocol understands.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub enum Payload {
    BestOptionRequest(BestOptionRequest),
    BestOptionResponse(BestOptionResponse),
    BestOptionsRequest(BestOptionsRequest),
    BestOptionsResponse(BestOptionsResponse),
    /// The server could not produce an answer.
    Error { message: String },
}

impl Payload {
    pub fn kind(&self) -> &'static str {
        match self {
            Payload::BestOptionRequest(_) => "BestOptionRequest",
            Payload::BestOptionResponse(_) => "BestOptionResponse",
            Payload::BestOptionsRequest(_) => "BestOptionsRequest",
            Payload::BestOptionsResponse(_) => "BestOptionsResponse",
            Payload::Error { .. } => "Error",
        }
    }
}

/// Frame body. A response carries the `request_id` of the request it answers.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Envelope {
    pub request_id: Uuid,
    pub payload: Payload,
}

impl Envelope {
    pub fn request(payload: Payload) -> Self {
        Envelope { request_id: Uuid::new_v4(), payload }
    }

    pub fn reply_to(&self, payload: Payload) -> Self {
        Envelope { request_id: self.request_id, payload }
    }
}
