pub mod node;
pub mod node_info;
pub mod pod;
pub mod resources;
