use std::path::Path;
use std::sync::Arc;

use crate::error::Result;
use crate::loader::parser::load_expander_config;

pub mod api;
pub mod domain;
pub mod error;
pub mod loader;
pub mod logger;

pub use crate::domain::expander::expansion_option::ExpansionOption;
pub use crate::domain::expander::random_strategy::RandomStrategy;
pub use crate::domain::expander::remote::config::{ExpanderConfig, TransportMode};
pub use crate::domain::expander::remote::remote_strategy::{RemoteStrategy, remote_or_fallback};
pub use crate::domain::expander::strategy_trait::{Filter, Strategy};

/// Builds a remote strategy from the JSON configuration at `config_path`.
pub fn generate_remote_strategy(config_path: impl AsRef<Path>, fallback: Arc<dyn Strategy>) -> Result<RemoteStrategy> {
    let config = load_expander_config(config_path)?;
    let strategy = RemoteStrategy::new(&config, fallback)?;
    log::info!("Remote expander strategy constructed for {}.", config.endpoint);
    Ok(strategy)
}
