use serde::{Deserialize, Serialize};
use std::ops::AddAssign;

/// Amount of schedulable resources. CPU in millicores, memory in bytes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Resources {
    #[serde(default)]
    pub milli_cpu: i64,
    #[serde(default)]
    pub memory: i64,
    #[serde(default)]
    pub pods: i64,
}

impl Resources {
    pub fn new(milli_cpu: i64, memory: i64, pods: i64) -> Self {
        Self { milli_cpu, memory, pods }
    }
}

impl AddAssign for Resources {
    fn add_assign(&mut self, other: Self) {
        self.milli_cpu += other.milli_cpu;
        self.memory += other.memory;
        self.pods += other.pods;
    }
}
