//! The opening index: a move-prefix trie over the catalog with
//! activation-state maintenance.
//!
//! The trie is built once from the full catalog and lives for the index's
//! lifetime; afterwards only `enabled`/`active` flags change. Nodes live in
//! an arena addressed by `NodeId` with the root at index 0, so upward
//! recomputation walks an explicit root-to-terminal path instead of parent
//! back-pointers. The central consistency rule, restored after every
//! mutation: a node is active iff an enabled opening terminates at it or at
//! some descendant.

use rand::prelude::IndexedRandom;
use rand::Rng;

use crate::catalog::opening::Opening;
use crate::errors::OpeningsError;
use crate::trie::move_key::{decode_move, encode_move, BoardMove, MoveKey};
use crate::trie::trie_node::{NodeId, TrieNode};

pub const ROOT: NodeId = 0;

/// Result of resolving a board move history against the trie.
///
/// Off-trie positions are not errors: every query degrades to empty/false
/// once the game departs from all cataloged lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PositionLookup {
    OnTrie(NodeId),
    OffTrie,
}

/// Name-matching behavior for [`OpeningsTrie::filter_by_search`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchMode {
    StartsWith,
    Contains,
}

/// One active continuation from the current position, ranked for display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RankedContinuation {
    pub board_move: BoardMove,
    /// Enabled openings reachable through this continuation.
    pub active_openings: u32,
    /// All openings reachable through this continuation, enabled or not.
    pub total_openings: u32,
    /// Name of one enabled opening reachable through this continuation,
    /// preferring lines terminating closest to it.
    pub example_opening: String,
}

#[derive(Debug, Clone)]
pub struct OpeningsTrie {
    nodes: Vec<TrieNode>,
    catalog: Vec<Opening>,
}

impl OpeningsTrie {
    /// Build the index from an already-validated catalog. Each opening is
    /// inserted along its encoded move sequence (creating nodes on demand),
    /// then activation and ranking counters are initialized from the
    /// openings' `enabled` flags.
    pub fn build(openings: Vec<Opening>) -> Self {
        let mut trie = Self {
            nodes: vec![TrieNode::new()],
            catalog: openings,
        };

        for index in 0..trie.catalog.len() {
            trie.insert_terminal(index);
        }
        trie.refresh_activation();

        trie
    }

    fn insert_terminal(&mut self, opening_index: usize) {
        let sequence = self.catalog[opening_index].move_sequence.clone();
        let mut node = ROOT;

        for key in sequence {
            node = match self.nodes[node].children.get(&key) {
                Some(&child) => child,
                None => {
                    let child = self.nodes.len();
                    self.nodes.push(TrieNode::new());
                    self.nodes[node].children.insert(key, child);
                    child
                }
            };
        }

        self.nodes[node].openings_here.push(opening_index);
    }

    /// Recompute `active` and the ranking counters for the whole tree from
    /// the catalog's `enabled` flags. O(trie size); used at build time and by
    /// the bulk operations, where every node may change anyway.
    fn refresh_activation(&mut self) {
        self.refresh_node(ROOT);
    }

    /// Returns (active, enabled openings here and below, all openings here
    /// and below) so the parent can fold its children in one pass.
    fn refresh_node(&mut self, node: NodeId) -> (bool, u32, u32) {
        let children: Vec<NodeId> = self.nodes[node].children.values().copied().collect();

        let mut any_child_active = false;
        let mut enabled_below = 0u32;
        let mut total_below = 0u32;
        for child in children {
            let (child_active, child_enabled, child_total) = self.refresh_node(child);
            any_child_active |= child_active;
            enabled_below += child_enabled;
            total_below += child_total;
        }

        let enabled_here = self.enabled_here(node);
        let total_here = self.nodes[node].openings_here.len() as u32;
        let active = enabled_here > 0 || any_child_active;

        let record = &mut self.nodes[node];
        record.active = active;
        record.active_openings_below = enabled_below;
        record.total_openings_below = total_below;

        (
            active,
            enabled_below + enabled_here,
            total_below + total_here,
        )
    }

    fn enabled_here(&self, node: NodeId) -> u32 {
        self.nodes[node]
            .openings_here
            .iter()
            .filter(|&&index| self.catalog[index].enabled)
            .count() as u32
    }

    // --- Position-relative queries -------------------------------------

    /// Replay the board's move history through the trie. `OffTrie` once any
    /// played move has no corresponding child.
    pub fn resolve(&self, history: &[BoardMove]) -> PositionLookup {
        let mut node = ROOT;
        for board_move in history {
            match self.nodes[node].children.get(&encode_move(*board_move)) {
                Some(&child) => node = child,
                None => return PositionLookup::OffTrie,
            }
        }
        PositionLookup::OnTrie(node)
    }

    /// True iff `board_move` continues some enabled opening from the current
    /// position. Structural presence is not enough: a continuation whose
    /// entire subtree is disabled is reported invalid.
    pub fn is_valid_move(&self, history: &[BoardMove], board_move: BoardMove) -> bool {
        let PositionLookup::OnTrie(node) = self.resolve(history) else {
            return false;
        };
        self.nodes[node]
            .children
            .get(&encode_move(board_move))
            .is_some_and(|&child| self.nodes[child].active)
    }

    /// True iff at least one active continuation exists from the current
    /// position.
    pub fn has_moves_to_make(&self, history: &[BoardMove]) -> bool {
        match self.resolve(history) {
            PositionLookup::OnTrie(node) => !self.active_children(node).is_empty(),
            PositionLookup::OffTrie => false,
        }
    }

    /// Select a continuation uniformly at random among the active children of
    /// the current position. Uniform over continuations, not over the opening
    /// counts below them: a child with many lines is not weighted more
    /// heavily.
    pub fn next_move_with<R: Rng + ?Sized>(
        &self,
        history: &[BoardMove],
        rng: &mut R,
    ) -> Result<BoardMove, OpeningsError> {
        let PositionLookup::OnTrie(node) = self.resolve(history) else {
            return Err(OpeningsError::NoActiveContinuation);
        };

        let candidates = self.active_children(node);
        let &(key, _) = candidates
            .choose(rng)
            .ok_or(OpeningsError::NoActiveContinuation)?;
        Ok(decode_move(key))
    }

    /// [`Self::next_move_with`] using the thread-local generator.
    pub fn next_move(&self, history: &[BoardMove]) -> Result<BoardMove, OpeningsError> {
        self.next_move_with(history, &mut rand::rng())
    }

    /// Enabled openings still reachable strictly below the current position.
    /// Inactive subtrees are pruned without being visited.
    pub fn possible_openings(&self, history: &[BoardMove]) -> Vec<&Opening> {
        let PositionLookup::OnTrie(node) = self.resolve(history) else {
            return Vec::new();
        };

        let mut found = Vec::new();
        for &child in self.nodes[node].children.values() {
            self.collect_enabled_under(child, &mut found);
        }
        // Catalog load order, not traversal order.
        found.sort_unstable();
        found.into_iter().map(|index| &self.catalog[index]).collect()
    }

    fn collect_enabled_under(&self, node: NodeId, out: &mut Vec<usize>) {
        if !self.nodes[node].active {
            return;
        }

        out.extend(
            self.nodes[node]
                .openings_here
                .iter()
                .copied()
                .filter(|&index| self.catalog[index].enabled),
        );
        for &child in self.nodes[node].children.values() {
            self.collect_enabled_under(child, out);
        }
    }

    /// Enabled openings whose full move sequence equals the moves played so
    /// far (terminating exactly at the current position).
    pub fn completed_openings(&self, history: &[BoardMove]) -> Vec<&Opening> {
        let PositionLookup::OnTrie(node) = self.resolve(history) else {
            return Vec::new();
        };

        self.nodes[node]
            .openings_here
            .iter()
            .map(|&index| &self.catalog[index])
            .filter(|opening| opening.enabled)
            .collect()
    }

    /// Active continuations from the current position with the number of
    /// enabled openings reachable through each, most popular first. Ties keep
    /// ascending move-key order.
    pub fn ranked_continuations(&self, history: &[BoardMove]) -> Vec<RankedContinuation> {
        let PositionLookup::OnTrie(node) = self.resolve(history) else {
            return Vec::new();
        };

        let mut ranked: Vec<(MoveKey, NodeId, u32)> = self
            .active_children(node)
            .into_iter()
            .map(|(key, child)| (key, child, self.active_openings_here_and_below(child)))
            .collect();
        ranked.sort_by(|a, b| b.2.cmp(&a.2).then(a.0.cmp(&b.0)));

        ranked
            .into_iter()
            .map(|(key, child, count)| RankedContinuation {
                board_move: decode_move(key),
                active_openings: count,
                total_openings: self.total_openings_here_and_below(child),
                example_opening: self
                    .first_enabled_under(child)
                    .map(|index| self.catalog[index].name.clone())
                    .unwrap_or_default(),
            })
            .collect()
    }

    /// Enabled openings terminating at `node` or anywhere below it.
    pub fn active_openings_here_and_below(&self, node: NodeId) -> u32 {
        self.nodes[node].active_openings_below + self.enabled_here(node)
    }

    /// All openings terminating at `node` or anywhere below it, enabled or
    /// not. Fixed after construction.
    pub fn total_openings_here_and_below(&self, node: NodeId) -> u32 {
        self.nodes[node].total_openings_below + self.nodes[node].openings_here.len() as u32
    }

    fn first_enabled_under(&self, node: NodeId) -> Option<usize> {
        if let Some(&index) = self.nodes[node]
            .openings_here
            .iter()
            .find(|&&index| self.catalog[index].enabled)
        {
            return Some(index);
        }

        for &child in self.nodes[node].children.values() {
            if !self.nodes[child].active {
                continue;
            }
            if let Some(found) = self.first_enabled_under(child) {
                return Some(found);
            }
        }
        None
    }

    fn active_children(&self, node: NodeId) -> Vec<(MoveKey, NodeId)> {
        self.nodes[node]
            .children
            .iter()
            .filter(|&(_, &child)| self.nodes[child].active)
            .map(|(&key, &child)| (key, child))
            .collect()
    }

    // --- Toggling ------------------------------------------------------

    /// Enable or disable one opening, identified by (name, starting
    /// position), restoring activation consistency while touching only the
    /// nodes on the path to its terminal node.
    ///
    /// Enabling marks the whole path active unconditionally: new activity can
    /// only propagate upward. Disabling recomputes each path node bottom-up
    /// and stops at the first node that is still active, since that node's
    /// ancestors are then unaffected.
    pub fn set_enabled(
        &mut self,
        name: &str,
        starting_position: &str,
        value: bool,
    ) -> Result<(), OpeningsError> {
        let index = self.find_opening(name, starting_position)?;
        if self.catalog[index].enabled == value {
            return Ok(());
        }
        self.catalog[index].enabled = value;

        let path = self.path_to_terminal(index);
        let ancestors = &path[..path.len() - 1];

        if value {
            for &node in &path {
                self.nodes[node].active = true;
            }
            for &node in ancestors {
                self.nodes[node].active_openings_below += 1;
            }
        } else {
            for &node in ancestors {
                self.nodes[node].active_openings_below -= 1;
            }
            for &node in path.iter().rev() {
                let still_active = self.enabled_here(node) > 0
                    || self.nodes[node]
                        .children
                        .values()
                        .any(|&child| self.nodes[child].active);
                if still_active {
                    break;
                }
                self.nodes[node].active = false;
            }
        }

        Ok(())
    }

    /// Flip one opening's enabled state, returning the new value.
    pub fn toggle(&mut self, name: &str, starting_position: &str) -> Result<bool, OpeningsError> {
        let index = self.find_opening(name, starting_position)?;
        let value = !self.catalog[index].enabled;
        self.set_enabled(name, starting_position, value)?;
        Ok(value)
    }

    pub fn enable_all(&mut self) {
        for opening in &mut self.catalog {
            opening.enabled = true;
        }
        self.refresh_activation();
    }

    pub fn disable_all(&mut self) {
        for opening in &mut self.catalog {
            opening.enabled = false;
        }
        self.refresh_activation();
    }

    /// Leave exactly the openings satisfying `predicate` enabled. Equivalent
    /// to `disable_all` followed by enabling each match, done in one pass.
    pub fn enable_matching(&mut self, predicate: impl Fn(&Opening) -> bool) {
        for opening in &mut self.catalog {
            let value = predicate(&*opening);
            opening.enabled = value;
        }
        self.refresh_activation();
    }

    /// Name search, case-insensitive. `exclude` drops any match whose name
    /// contains the given substring (e.g. hiding every "Gambit" line). An
    /// empty exclusion is no exclusion; every name contains "".
    pub fn filter_by_search(&mut self, text: &str, mode: SearchMode, exclude: Option<&str>) {
        let needle = text.to_ascii_lowercase();
        let excluded = exclude
            .map(str::to_ascii_lowercase)
            .filter(|e| !e.is_empty());

        self.enable_matching(|opening| {
            let name = opening.name.to_ascii_lowercase();
            let matched = match mode {
                SearchMode::StartsWith => name.starts_with(&needle),
                SearchMode::Contains => name.contains(&needle),
            };
            matched && !excluded.as_ref().is_some_and(|e| name.contains(e))
        });
    }

    // --- Catalog access ------------------------------------------------

    /// The full catalog in load order, for rendering selection lists.
    pub fn openings(&self) -> &[Opening] {
        &self.catalog
    }

    pub fn enabled_count(&self) -> usize {
        self.catalog.iter().filter(|opening| opening.enabled).count()
    }

    fn find_opening(&self, name: &str, starting_position: &str) -> Result<usize, OpeningsError> {
        self.catalog
            .iter()
            .position(|opening| opening.is_same_opening(name, starting_position))
            .ok_or_else(|| OpeningsError::UnknownOpening {
                name: name.to_owned(),
                starting_position: starting_position.to_owned(),
            })
    }

    /// Nodes from the root to an opening's terminal node, inclusive. The path
    /// exists for every cataloged opening by construction.
    fn path_to_terminal(&self, opening_index: usize) -> Vec<NodeId> {
        let mut path = vec![ROOT];
        let mut node = ROOT;

        for key in &self.catalog[opening_index].move_sequence {
            node = *self.nodes[node]
                .children
                .get(key)
                .expect("every cataloged opening keeps its terminal path");
            path.push(node);
        }

        path
    }
}
