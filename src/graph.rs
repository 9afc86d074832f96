//! The block graph (C2): an arena of block nodes with a stable index.
//!
//! `spec.md`'s design notes (§9) recommend an arena + index scheme over a
//! pointer graph for a Rust re-implementation: an append-only `Vec<Node>`
//! with a `HashMap<Id, NodeIndex>` for lookup, children as `Vec<NodeIndex>`,
//! and `Option<NodeIndex>` for the preference pointer. This module is that
//! scheme. It replaces the teacher's raw-pointer `TreeNode` (see
//! `DESIGN.md`) while keeping its `head`/`depth`-style traversal idioms.

use std::collections::HashMap;

use crate::types::{Block, Id, Status};

/// The all-zero id, reserved for the synthetic genesis block.
pub const GENESIS_ID: Id = [0u8; 32];

/// A stable handle into the graph's arena. Indices are never reused or
/// invalidated for the lifetime of the engine (the arena is append-only),
/// so `NodeIndex` values may be held long-term by the preference tracker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeIndex(pub(crate) usize);

/// A block node as stored in the graph, carrying both the immutable block
/// record and the mutable consensus counters/status (`spec.md` §3).
#[derive(Debug, Clone)]
pub struct BlockNode {
  pub id: Id,
  pub parent_id: Id,
  pub height: u64,
  pub timestamp: u64,
  pub payload: Vec<u8>,

  pub parent: NodeIndex,
  pub children: Vec<NodeIndex>,

  pub preference_count: u64,
  pub confidence_count: u64,
  pub status: Status,
}

impl BlockNode {
  fn genesis() -> Self {
    Self {
      id: GENESIS_ID,
      parent_id: GENESIS_ID,
      height: 0,
      timestamp: 0,
      payload: Vec::new(),
      parent: NodeIndex(0),
      children: Vec::new(),
      preference_count: 0,
      confidence_count: 0,
      status: Status::Accepted,
    }
  }
}

/// Result of [`BlockGraph::insert`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Insertion {
  Added(NodeIndex),
  AlreadyPresent(NodeIndex),
}

/// Append-only arena of block nodes plus an id index.
///
/// Invariant 1 (`spec.md` §3): every node's parent is either genesis or
/// another node present in the graph — enforced by `insert` always
/// resolving unknown `parent_id`s to genesis (index 0).
///
/// Invariant 2: at most one node per id — enforced by `insert` being a
/// no-op on a repeat id (first write wins, including payload).
pub struct BlockGraph {
  nodes: Vec<BlockNode>,
  index: HashMap<Id, NodeIndex>,
}

impl BlockGraph {
  pub fn new() -> Self {
    let genesis = BlockNode::genesis();
    let mut index = HashMap::new();
    index.insert(GENESIS_ID, NodeIndex(0));
    Self { nodes: vec![genesis], index }
  }

  pub fn genesis_index(&self) -> NodeIndex {
    NodeIndex(0)
  }

  /// Idempotent insertion keyed on `block.id`. A repeat insert with the
  /// same id but a different payload does not overwrite the stored node.
  /// Unresolved parents attach to genesis rather than a phantom node
  /// (`spec.md` §4.1); a later `insert` of the true parent does not
  /// retroactively relink (Open Question 4, resolved as "no").
  pub fn insert(&mut self, block: Block) -> Insertion {
    if let Some(&existing) = self.index.get(&block.id) {
      return Insertion::AlreadyPresent(existing);
    }

    let parent = self.index.get(&block.parent_id).copied().unwrap_or(NodeIndex(0));

    let node = BlockNode {
      id: block.id,
      parent_id: block.parent_id,
      height: block.height,
      timestamp: block.timestamp,
      payload: block.payload,
      parent,
      children: Vec::new(),
      preference_count: 0,
      confidence_count: 0,
      status: Status::Processing,
    };

    let new_index = NodeIndex(self.nodes.len());
    self.nodes.push(node);
    self.index.insert(block.id, new_index);
    self.nodes[parent.0].children.push(new_index);
    Insertion::Added(new_index)
  }

  pub fn lookup(&self, id: &Id) -> Option<NodeIndex> {
    self.index.get(id).copied()
  }

  pub fn get(&self, idx: NodeIndex) -> &BlockNode {
    &self.nodes[idx.0]
  }

  pub fn get_mut(&mut self, idx: NodeIndex) -> &mut BlockNode {
    &mut self.nodes[idx.0]
  }

  /// Children of `idx`, in insertion order.
  pub fn children(&self, idx: NodeIndex) -> &[NodeIndex] {
    &self.nodes[idx.0].children
  }

  pub fn len(&self) -> usize {
    self.nodes.len()
  }

  pub fn is_empty(&self) -> bool {
    false // genesis always present
  }

  /// Is `descendant` equal to `ancestor` or reachable from it by following
  /// parent links? Used by the preference-update rule (`spec.md` §4.4),
  /// which only advances the tip to a descendant of the current one.
  pub fn is_descendant_or_self(&self, ancestor: NodeIndex, descendant: NodeIndex) -> bool {
    let mut current = descendant;
    loop {
      if current == ancestor {
        return true;
      }
      if current == NodeIndex(0) {
        return ancestor == NodeIndex(0);
      }
      let parent = self.nodes[current.0].parent;
      if parent == current {
        return false;
      }
      current = parent;
    }
  }
}

impl Default for BlockGraph {
  fn default() -> Self {
    Self::new()
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn block(id: u8, parent: u8) -> Block {
    Block::new([id; 32], [parent; 32], 1, 0, vec![])
  }

  #[test]
  fn genesis_is_present_and_accepted() {
    let g = BlockGraph::new();
    let genesis = g.get(g.genesis_index());
    assert_eq!(genesis.id, GENESIS_ID);
    assert_eq!(genesis.status, Status::Accepted);
  }

  #[test]
  fn insert_is_idempotent_first_write_wins() {
    let mut g = BlockGraph::new();
    let a = g.insert(Block::new([1; 32], [0; 32], 1, 0, vec![1, 2, 3]));
    let a2 = g.insert(Block::new([1; 32], [0; 32], 1, 0, vec![9, 9, 9]));
    let idx = match a {
      Insertion::Added(i) => i,
      _ => panic!("expected Added"),
    };
    assert!(matches!(a2, Insertion::AlreadyPresent(i) if i == idx));
    assert_eq!(g.get(idx).payload, vec![1, 2, 3]);
    assert_eq!(g.len(), 2); // genesis + one block
  }

  #[test]
  fn unresolved_parent_attaches_to_genesis() {
    let mut g = BlockGraph::new();
    let unknown_parent = [42u8; 32];
    let idx = match g.insert(Block::new([7; 32], unknown_parent, 1, 0, vec![])) {
      Insertion::Added(i) => i,
      _ => panic!(),
    };
    assert_eq!(g.get(idx).parent, g.genesis_index());
    assert!(g.children(g.genesis_index()).contains(&idx));
  }

  #[test]
  fn late_arriving_parent_does_not_relink() {
    let mut g = BlockGraph::new();
    let child_idx = match g.insert(block(2, 1)) {
      Insertion::Added(i) => i,
      _ => panic!(),
    };
    assert_eq!(g.get(child_idx).parent, g.genesis_index());

    let parent_idx = match g.insert(block(1, 0)) {
      Insertion::Added(i) => i,
      _ => panic!(),
    };
    // child still points at genesis, not at the now-present parent
    assert_eq!(g.get(child_idx).parent, g.genesis_index());
    assert!(!g.children(parent_idx).contains(&child_idx));
  }

  #[test]
  fn children_are_in_insertion_order() {
    let mut g = BlockGraph::new();
    let a = match g.insert(block(1, 0)) {
      Insertion::Added(i) => i,
      _ => panic!(),
    };
    let b = match g.insert(block(2, 0)) {
      Insertion::Added(i) => i,
      _ => panic!(),
    };
    assert_eq!(g.children(g.genesis_index()), &[a, b]);
  }

  #[test]
  fn descendant_check() {
    let mut g = BlockGraph::new();
    let a = match g.insert(block(1, 0)) {
      Insertion::Added(i) => i,
      _ => panic!(),
    };
    let b = match g.insert(Block::new([2; 32], [1; 32], 2, 0, vec![])) {
      Insertion::Added(i) => i,
      _ => panic!(),
    };
    assert!(g.is_descendant_or_self(a, b));
    assert!(g.is_descendant_or_self(a, a));
    assert!(!g.is_descendant_or_self(b, a));
    assert!(g.is_descendant_or_self(g.genesis_index(), b));
  }
}
