use crate::domain::cluster::node_info::NodeInfos;
use crate::domain::expander::expansion_option::ExpansionOption;

/// Picks the expansion option to carry out.
///
/// The returned reference points into `options`, so callers can rely on
/// getting back one of their own objects. Strategies compose: any strategy
/// can serve as another one's fallback.
pub trait Strategy: Send + Sync {
    fn best_option<'a>(&self, options: &'a [ExpansionOption], node_infos: &NodeInfos) -> Option<&'a ExpansionOption>;
}

/// Narrows a set of expansion options down to the acceptable ones.
pub trait Filter: Send + Sync {
    fn best_options<'a>(&self, options: &'a [ExpansionOption], node_infos: &NodeInfos) -> Vec<&'a ExpansionOption>;
}
