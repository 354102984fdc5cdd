use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;

use crate::domain::cluster::node::Node;
use crate::domain::cluster::node_info::{NodeInfo, NodeInfos};
use crate::domain::cluster::pod::Pod;
use crate::domain::expander::expansion_option::ExpansionOption;
use crate::domain::utils::id::{NodeGroupId, NodeName};

/// Input of a single expansion decision as read from JSON.
#[derive(Debug, Deserialize, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DecisionDto {
    pub options: Vec<ExpansionOptionDto>,
    #[serde(default)]
    pub node_infos: HashMap<String, NodeInfoDto>,
}

#[derive(Debug, Deserialize, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ExpansionOptionDto {
    pub node_group: String,
    #[serde(default)]
    pub similar_node_groups: Vec<String>,
    pub node_count: usize,
    #[serde(default)]
    pub debug: String,
    #[serde(default)]
    pub pods: Vec<Pod>,
}

#[derive(Debug, Deserialize, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeInfoDto {
    #[serde(default)]
    pub node: Option<Node>,
    #[serde(default)]
    pub pods: Vec<Pod>,
}

impl DecisionDto {
    pub fn into_domain(self) -> (Vec<ExpansionOption>, NodeInfos) {
        let options = self.options.into_iter().map(ExpansionOption::from).collect();
        let node_infos = self.node_infos.into_iter().map(|(name, dto)| (NodeName::new(name), NodeInfo::from(dto))).collect();
        (options, node_infos)
    }
}

impl From<ExpansionOptionDto> for ExpansionOption {
    fn from(dto: ExpansionOptionDto) -> Self {
        ExpansionOption::new(NodeGroupId::new(dto.node_group), dto.node_count)
            .with_debug(dto.debug)
            .with_pods(dto.pods.into_iter().map(Arc::new).collect())
            .with_similar_node_groups(dto.similar_node_groups.into_iter().map(NodeGroupId::new).collect())
    }
}

impl From<&ExpansionOption> for ExpansionOptionDto {
    fn from(option: &ExpansionOption) -> Self {
        ExpansionOptionDto {
            node_group: option.node_group.to_string(),
            similar_node_groups: option.similar_node_groups.iter().map(ToString::to_string).collect(),
            node_count: option.node_count,
            debug: option.debug.clone(),
            pods: option.pods.iter().map(|pod| (**pod).clone()).collect(),
        }
    }
}

impl From<NodeInfoDto> for NodeInfo {
    fn from(dto: NodeInfoDto) -> Self {
        let mut info = match dto.node {
            Some(node) => NodeInfo::new(node),
            None => NodeInfo::default(),
        };
        for pod in dto.pods {
            info.add_pod(Arc::new(pod));
        }
        info
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DECISION: &str = r#"{
        "options": [
            { "nodeGroup": "group-a", "nodeCount": 3, "debug": "three",
              "pods": [ { "namespace": "default", "name": "web-0", "requests": { "milliCpu": 500 } } ] },
            { "nodeGroup": "group-b", "nodeCount": 1, "similarNodeGroups": ["group-c"] }
        ],
        "nodeInfos": {
            "node-1": { "node": { "name": "node-1", "allocatable": { "milliCpu": 4000, "memory": 17179869184, "pods": 110 } },
                        "pods": [ { "namespace": "kube-system", "name": "dns", "requests": { "milliCpu": 100 } } ] }
        }
    }"#;

    #[test]
    fn decision_converts_to_domain() {
        let dto: DecisionDto = serde_json::from_str(DECISION).unwrap();
        let (options, node_infos) = dto.into_domain();

        assert_eq!(options.len(), 2);
        assert_eq!(options[0].node_group, NodeGroupId::new("group-a"));
        assert_eq!(options[0].pods[0].requests.milli_cpu, 500);
        assert_eq!(options[1].similar_node_groups, vec![NodeGroupId::new("group-c")]);

        let info = &node_infos[&NodeName::new("node-1")];
        assert_eq!(info.node().unwrap().allocatable.pods, 110);
        assert_eq!(info.requested().milli_cpu, 100);
    }

    #[test]
    fn option_dto_round_trips_through_domain() {
        let dto: DecisionDto = serde_json::from_str(DECISION).unwrap();
        let original = dto.options[0].clone();
        let option = ExpansionOption::from(original.clone());
        assert_eq!(ExpansionOptionDto::from(&option), original);
    }
}
