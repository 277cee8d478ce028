//! Ordered registry of the current output blocks.

use std::collections::BTreeMap;

use crate::prefix::Prefix;
use crate::trie::NodeId;

/// Leaves keyed by (length, value).
///
/// Ascending iteration gives emission order; [`LeafRegistry::pop_max`] picks
/// the next collapse target: the longest prefix, ties going to the
/// numerically largest.
#[derive(Debug, Clone, Default)]
pub struct LeafRegistry {
    leaves: BTreeMap<Prefix, NodeId>,
}

impl LeafRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a leaf. Returns `false` if the prefix was already present.
    pub fn insert(&mut self, prefix: Prefix, node: NodeId) -> bool {
        match self.leaves.entry(prefix) {
            std::collections::btree_map::Entry::Occupied(_) => false,
            std::collections::btree_map::Entry::Vacant(slot) => {
                slot.insert(node);
                true
            }
        }
    }

    pub fn remove(&mut self, prefix: &Prefix) -> Option<NodeId> {
        self.leaves.remove(prefix)
    }

    pub fn pop_max(&mut self) -> Option<(Prefix, NodeId)> {
        self.leaves.pop_last()
    }

    pub fn len(&self) -> usize {
        self.leaves.len()
    }

    pub fn is_empty(&self) -> bool {
        self.leaves.is_empty()
    }

    pub fn prefixes(&self) -> Vec<Prefix> {
        self.leaves.keys().copied().collect()
    }
}
