pub mod channel;
pub mod client;
pub mod config;
pub mod marshal;
pub mod remote_strategy;
