//! Pending workload references carried by expansion options.

use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

use crate::domain::cluster::resources::Resources;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pod {
    pub namespace: String,
    pub name: String,
    #[serde(default)]
    pub uid: String,
    #[serde(default)]
    pub requests: Resources,
}

impl Pod {
    pub fn new(namespace: impl Into<String>, name: impl Into<String>, requests: Resources) -> Self {
        Self { namespace: namespace.into(), name: name.into(), uid: String::new(), requests }
    }
}

impl Display for Pod {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "{}/{}", self.namespace, self.name)
    }
}
