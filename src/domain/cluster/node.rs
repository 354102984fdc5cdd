use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::domain::cluster::resources::Resources;

/// Node descriptor. This is the part of a node snapshot the remote expander
/// gets to see.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Node {
    pub name: String,
    #[serde(default)]
    pub labels: BTreeMap<String, String>,
    #[serde(default)]
    pub capacity: Resources,
    #[serde(default)]
    pub allocatable: Resources,
    #[serde(default)]
    pub unschedulable: bool,
}

impl Node {
    pub fn new(name: impl Into<String>, allocatable: Resources) -> Self {
        Self { name: name.into(), labels: BTreeMap::new(), capacity: allocatable, allocatable, unschedulable: false }
    }

    pub fn with_label(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.labels.insert(key.into(), value.into());
        self
    }
}
