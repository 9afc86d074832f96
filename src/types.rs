//! Identifier and payload primitives shared by the whole crate.

use serde::{Deserialize, Serialize};

/// A 32-byte opaque identifier. Used for both block ids and voter ids.
///
/// Equality is byte-wise. The all-zero id is reserved for the synthetic
/// genesis block (see [`crate::graph::GENESIS_ID`]).
pub type Id = [u8; 32];

/// Status of a block in the per-block state machine (`spec.md` §4.6).
///
/// `Accepted` and `Rejected` are terminal: once entered, a block never
/// leaves them (enforced in [`crate::engine`]).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Status {
  /// Accepting votes; no decision has been reached yet.
  Processing,
  /// Terminal: confidence crossed `beta`.
  Accepted,
  /// Terminal: a sibling was accepted first, under the engine's
  /// sibling-rejection policy.
  Rejected,
}

/// Which sibling-rejection / verify-hook semantics an [`crate::Engine`]
/// uses (`spec.md` §4.5).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EngineKind {
  /// Linear-chain finality: all `Processing` descendants of a rejected
  /// sibling are rejected transitively.
  Chain,
  /// Only direct siblings are rejected; their descendants may still be
  /// accepted on their own branch.
  Dag,
  /// Graph semantics identical to `Chain`; the verify hook is expected to
  /// perform post-quantum signature checks.
  Pq,
}

/// A block proposal as submitted by the host, before it is adopted into
/// the graph as a [`crate::graph::BlockNode`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Block {
  pub id: Id,
  pub parent_id: Id,
  /// Monotonic hint, not enforced by the core.
  pub height: u64,
  /// Opaque to the core; not interpreted.
  pub timestamp: u64,
  /// Opaque payload bytes, possibly empty. Copied into engine ownership.
  pub payload: Vec<u8>,
}

impl Block {
  pub fn new(id: Id, parent_id: Id, height: u64, timestamp: u64, payload: Vec<u8>) -> Self {
    Self { id, parent_id, height, timestamp, payload }
  }
}

/// An opinion from an identified voter about a block (`spec.md` §3).
///
/// Votes are ephemeral inputs: only their effect on counters is retained
/// by the engine, plus a dedup-log entry (see [`crate::dedup`]).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Vote {
  pub voter_id: Id,
  pub block_id: Id,
  /// `true` for a preference vote, `false` for a confidence vote.
  pub is_preference: bool,
}

impl Vote {
  pub fn new(voter_id: Id, block_id: Id, is_preference: bool) -> Self {
    Self { voter_id, block_id, is_preference }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn block_roundtrips_through_bincode() {
    let b = Block::new([1u8; 32], [0u8; 32], 7, 42, vec![1, 2, 3]);
    let bytes = bincode::serialize(&b).unwrap();
    let back: Block = bincode::deserialize(&bytes).unwrap();
    assert_eq!(b, back);
  }

  #[test]
  fn empty_payload_roundtrips() {
    let b = Block::new([9u8; 32], [0u8; 32], 0, 0, vec![]);
    let bytes = bincode::serialize(&b).unwrap();
    let back: Block = bincode::deserialize(&bytes).unwrap();
    assert_eq!(b.payload, back.payload);
  }
}
