//! Translation between expansion options / node snapshots and their wire form.

use std::collections::HashMap;
use std::collections::hash_map::Entry;

use crate::domain::cluster::node::Node;
use crate::domain::cluster::node_info::NodeInfos;
use crate::domain::communication::protocol::WireOption;
use crate::domain::expander::expansion_option::ExpansionOption;
use crate::error::RemoteCallError;

/// Maps node group ids back to the caller's own options for the duration of
/// one decision.
#[derive(Debug)]
pub struct CorrelationMap<'a> {
    by_node_group: HashMap<&'a str, &'a ExpansionOption>,
}

impl<'a> CorrelationMap<'a> {
    pub fn len(&self) -> usize {
        self.by_node_group.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_node_group.is_empty()
    }

    /// Returns the original option for `node_group_id`.
    pub fn resolve(&self, node_group_id: &str) -> Result<&'a ExpansionOption, RemoteCallError> {
        self.by_node_group
            .get(node_group_id)
            .copied()
            .ok_or_else(|| RemoteCallError::UnknownNodeGroup(node_group_id.to_string()))
    }
}

/// Converts `options` into wire options and builds the correlation map.
///
/// Options without a node group id are skipped. Fails on a duplicate node
/// group id or a node count that does not fit the wire's `i32`.
pub fn options_to_wire(options: &[ExpansionOption]) -> Result<(Vec<WireOption>, CorrelationMap<'_>), RemoteCallError> {
    let mut wire_options = Vec::with_capacity(options.len());
    let mut by_node_group = HashMap::with_capacity(options.len());

    for option in options {
        if option.node_group.is_empty() {
            log::warn!("Skipping expansion option without node group (node count {}).", option.node_count);
            continue;
        }

        match by_node_group.entry(option.node_group.as_str()) {
            Entry::Occupied(_) => return Err(RemoteCallError::DuplicateNodeGroup(option.node_group.to_string())),
            Entry::Vacant(slot) => {
                slot.insert(option);
            }
        }

        wire_options.push(option_to_wire(option)?);
    }

    Ok((wire_options, CorrelationMap { by_node_group }))
}

fn option_to_wire(option: &ExpansionOption) -> Result<WireOption, RemoteCallError> {
    let node_count = i32::try_from(option.node_count).map_err(|_| RemoteCallError::NodeCountOverflow {
        node_group: option.node_group.to_string(),
        node_count: option.node_count,
    })?;

    Ok(WireOption {
        node_group_id: option.node_group.to_string(),
        node_count,
        debug: option.debug.clone(),
        pods: option.pods.iter().map(|pod| (**pod).clone()).collect(),
    })
}

/// Extracts the node descriptor of every snapshot. Scheduling metadata is
/// dropped; snapshots without a descriptor are skipped.
pub fn node_infos_to_wire(node_infos: &NodeInfos) -> HashMap<String, Node> {
    let mut node_map = HashMap::with_capacity(node_infos.len());
    for (name, info) in node_infos {
        match info.node() {
            Some(node) => {
                node_map.insert(name.to_string(), (**node).clone());
            }
            None => log::debug!("Node snapshot {} has no node descriptor, not sending it.", name),
        }
    }
    node_map
}
