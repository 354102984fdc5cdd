use rand::seq::IndexedRandom;

use crate::domain::cluster::node_info::NodeInfos;
use crate::domain::expander::expansion_option::ExpansionOption;
use crate::domain::expander::strategy_trait::Strategy;

/// Picks uniformly among the options. Default local fallback.
#[derive(Debug, Default, Clone, Copy)]
pub struct RandomStrategy;

impl RandomStrategy {
    pub fn new() -> Self {
        Self
    }
}

impl Strategy for RandomStrategy {
    fn best_option<'a>(&self, options: &'a [ExpansionOption], _node_infos: &NodeInfos) -> Option<&'a ExpansionOption> {
        options.choose(&mut rand::rng())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn returns_none_for_empty_options() {
        assert!(RandomStrategy::new().best_option(&[], &NodeInfos::new()).is_none());
    }

    #[test]
    fn always_picks_one_of_the_inputs() {
        let options = vec![ExpansionOption::new("a", 1), ExpansionOption::new("b", 2), ExpansionOption::new("c", 3)];
        for _ in 0..50 {
            let picked = RandomStrategy::new().best_option(&options, &NodeInfos::new()).unwrap();
            assert!(options.iter().any(|o| std::ptr::eq(o, picked)));
        }
    }
}
