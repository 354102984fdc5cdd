use std::collections::HashMap;
use std::sync::Arc;

use crate::domain::cluster::node::Node;
use crate::domain::cluster::pod::Pod;
use crate::domain::cluster::resources::Resources;
use crate::domain::utils::id::NodeName;

/// Snapshot of the scheduling state of a single node.
///
/// Only `node` is consulted by the remote expander; the remaining fields are
/// scheduler bookkeeping and stay local.
#[derive(Debug, Clone, Default)]
pub struct NodeInfo {
    node: Option<Arc<Node>>,
    pods: Vec<Arc<Pod>>,
    requested: Resources,
    generation: i64,
}

/// Node snapshots keyed by node name, as handed to a strategy.
pub type NodeInfos = HashMap<NodeName, NodeInfo>;

impl NodeInfo {
    pub fn new(node: Node) -> Self {
        Self { node: Some(Arc::new(node)), ..Self::default() }
    }

    pub fn node(&self) -> Option<&Arc<Node>> {
        self.node.as_ref()
    }

    pub fn pods(&self) -> &[Arc<Pod>] {
        &self.pods
    }

    pub fn requested(&self) -> Resources {
        self.requested
    }

    pub fn generation(&self) -> i64 {
        self.generation
    }

    pub fn add_pod(&mut self, pod: Arc<Pod>) {
        self.requested += pod.requests;
        self.requested.pods += 1;
        self.pods.push(pod);
        self.generation += 1;
    }
}
