//! One node of the move-prefix trie.
//!
//! A node represents one partial move sequence. Nodes are pure data: all
//! structural and activation logic lives in `openings_trie` so that invariant
//! maintenance stays centralized.

use std::collections::BTreeMap;

use crate::trie::move_key::MoveKey;

/// Arena index of a trie node.
pub type NodeId = usize;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TrieNode {
    /// Catalog indices of the openings whose full move sequence ends exactly
    /// at this node.
    pub openings_here: Vec<usize>,

    /// Child node per canonical move key. A BTreeMap keeps continuation
    /// iteration in ascending key order, which makes ranking tie-breaks and
    /// random-selection candidate lists deterministic.
    pub children: BTreeMap<MoveKey, NodeId>,

    /// True iff an enabled opening terminates at this node or anywhere in the
    /// subtree below it. Derived state, maintained by the index.
    pub active: bool,

    /// Enabled openings terminating strictly below this node. Used only to
    /// rank continuations for display.
    pub active_openings_below: u32,

    /// All openings terminating strictly below this node.
    pub total_openings_below: u32,
}

impl TrieNode {
    pub fn new() -> Self {
        Self::default()
    }
}
