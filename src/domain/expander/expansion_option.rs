use std::sync::Arc;

use crate::domain::cluster::pod::Pod;
use crate::domain::utils::id::NodeGroupId;

/// One way to grow the cluster: add `node_count` nodes to `node_group` so that
/// `pods` can be scheduled.
#[derive(Debug, Clone, PartialEq)]
pub struct ExpansionOption {
    pub node_group: NodeGroupId,
    /// Node groups that could absorb the same scale-up. Local bookkeeping only.
    pub similar_node_groups: Vec<NodeGroupId>,
    pub node_count: usize,
    pub debug: String,
    pub pods: Vec<Arc<Pod>>,
}

impl ExpansionOption {
    pub fn new(node_group: impl Into<NodeGroupId>, node_count: usize) -> Self {
        Self { node_group: node_group.into(), similar_node_groups: Vec::new(), node_count, debug: String::new(), pods: Vec::new() }
    }

    pub fn with_debug(mut self, debug: impl Into<String>) -> Self {
        self.debug = debug.into();
        self
    }

    pub fn with_pods(mut self, pods: Vec<Arc<Pod>>) -> Self {
        self.pods = pods;
        self
    }

    pub fn with_similar_node_groups(mut self, similar: Vec<NodeGroupId>) -> Self {
        self.similar_node_groups = similar;
        self
    }
}
