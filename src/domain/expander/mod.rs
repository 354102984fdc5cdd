pub mod expansion_option;
pub mod random_strategy;
pub mod remote;
pub mod strategy_trait;
