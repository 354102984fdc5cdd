pub mod cluster;
pub mod communication;
pub mod expander;
pub mod utils;
