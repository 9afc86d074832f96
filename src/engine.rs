//! The engine handle (C4-C7): decision core, preference tracker, and the
//! concurrency envelope that ties the whole core together.
//!
//! `spec.md` §5 flags the source's split mutex/rwlock discipline as racy
//! (Open Question 2) and requires a single RW lock over the graph,
//! counters, preference pointer, and dedup log. This module is that lock:
//! one [`std::sync::RwLock<State>`] guards everything mutable, mutating
//! operations take it exclusively, queries take it shared.

use std::sync::RwLock;

use tracing::{debug, info, warn};

use crate::callbacks::Hooks;
use crate::config::Config;
use crate::dedup::{VoteLog, DEFAULT_CAPACITY};
use crate::error::{Error, Result};
use crate::graph::{BlockGraph, Insertion, NodeIndex};
use crate::stats::{Counters, Stats};
use crate::types::{Block, EngineKind, Id, Status, Vote};

/// Everything mutable, guarded by a single reader-writer lock.
struct State {
  graph: BlockGraph,
  dedup: VoteLog,
  preference: NodeIndex,
  counters: Counters,
  hooks: Hooks,
}

/// An embeddable consensus engine.
///
/// `Engine` is `Send + Sync` and intended to be shared across threads as
/// `Arc<Engine>` (`spec.md` §5's "parallel threads; the engine is a shared
/// object accessed by many").
pub struct Engine {
  config: Config,
  state: RwLock<State>,
}

impl Engine {
  /// Creates a new engine. Installs genesis, marks it `Accepted`, and sets
  /// it as the initial preferred tip (`spec.md` §3 "Lifecycle").
  ///
  /// Infallible in safe Rust: the spec's `InvalidParams`/`OutOfMemory`
  /// failure modes for `engine_create` model a null config pointer or a
  /// failed heap allocation in C, neither of which is representable for an
  /// owned `Config` value here (see `DESIGN.md`).
  pub fn create(config: Config) -> Self {
    let graph = BlockGraph::new();
    let preference = graph.genesis_index();
    info!(engine_kind = ?config.engine_kind, "consensus engine created");
    Self {
      config,
      state: RwLock::new(State {
        graph,
        dedup: VoteLog::new(DEFAULT_CAPACITY),
        preference,
        counters: Counters::new(),
        hooks: Hooks::default(),
      }),
    }
  }

  pub fn config(&self) -> &Config {
    &self.config
  }

  fn read(&self) -> std::sync::RwLockReadGuard<'_, State> {
    self.state.read().unwrap_or_else(|poisoned| {
      warn!("recovering from a poisoned read lock");
      poisoned.into_inner()
    })
  }

  fn write(&self) -> std::sync::RwLockWriteGuard<'_, State> {
    self.state.write().unwrap_or_else(|poisoned| {
      warn!("recovering from a poisoned write lock");
      poisoned.into_inner()
    })
  }

  /// Adds a block to the graph (`spec.md` §4.1, §4.7).
  ///
  /// Idempotent on `block.id`: a repeat call with the same id succeeds
  /// without re-running verification or overwriting the stored payload.
  /// The verify hook, if registered, is consulted once before the node is
  /// created; a verification failure leaves the graph untouched.
  pub fn add_block(&self, block: Block) -> Result<()> {
    let mut state = self.write();

    if state.graph.lookup(&block.id).is_some() {
      debug!(id = %hex_prefix(&block.id), "add_block: already present, idempotent no-op");
      return Ok(());
    }

    if !state.hooks.call_verify(&block) {
      warn!(id = %hex_prefix(&block.id), "add_block: verification failed");
      return Err(Error::VerificationFailed);
    }

    let (id, parent_id) = (block.id, block.parent_id);
    match state.graph.insert(block) {
      Insertion::Added(_) => {
        debug!(id = %hex_prefix(&id), parent = %hex_prefix(&parent_id), "block added");
        Ok(())
      }
      Insertion::AlreadyPresent(_) => Ok(()),
    }
  }

  /// Processes a vote (`spec.md` §4.2).
  ///
  /// Returns `InvalidState` for a vote on an unknown block id without
  /// incrementing `votes_processed`. A vote for a terminal block, or a
  /// duplicate `(voter_id, block_id)` pair already in the dedup log, is
  /// discarded: the counter does not move, but the call still succeeds and
  /// still counts as a processed vote (it reached a known block).
  pub fn process_vote(&self, vote: Vote) -> Result<()> {
    let mut state = self.write();

    let idx = state
      .graph
      .lookup(&vote.block_id)
      .ok_or(Error::InvalidState)?;

    state.counters.votes_processed += 1;

    if state.graph.get(idx).status != Status::Processing {
      debug!(id = %hex_prefix(&vote.block_id), "vote discarded: block is terminal");
      return Ok(());
    }

    if state.dedup.contains(&vote.voter_id, &vote.block_id) {
      debug!(id = %hex_prefix(&vote.block_id), "vote discarded: duplicate (voter, block) pair");
      return Ok(());
    }
    state.dedup.record(vote.voter_id, vote.block_id);

    if vote.is_preference {
      state.graph.get_mut(idx).preference_count += 1;
      self.maybe_advance_preference(&mut state, idx);
    } else {
      state.graph.get_mut(idx).confidence_count += 1;
      self.maybe_accept(&mut state, idx);
    }

    Ok(())
  }

  /// `spec.md` §4.4: preference-count threshold crossing advances the tip
  /// to a strict descendant of (or the current tip itself).
  fn maybe_advance_preference(&self, state: &mut State, idx: NodeIndex) {
    let node = state.graph.get(idx);
    if (node.preference_count as u32) < self.config.alpha_preference {
      return;
    }
    if state.graph.is_descendant_or_self(state.preference, idx) {
      state.preference = idx;
      debug!(id = %hex_prefix(&state.graph.get(idx).id), "preference tip advanced");
    }
  }

  /// `spec.md` §4.2, §4.4, §4.5: confidence-count threshold crossing
  /// accepts the block, advances preference unconditionally, invokes the
  /// decision hook while the writer lock is held, then applies the
  /// engine-kind-dependent sibling-rejection policy.
  fn maybe_accept(&self, state: &mut State, idx: NodeIndex) {
    let node = state.graph.get(idx);
    if (node.confidence_count as u32) < self.config.beta {
      return;
    }

    state.graph.get_mut(idx).status = Status::Accepted;
    state.counters.blocks_accepted += 1;
    state.preference = idx;

    let id = state.graph.get(idx).id;
    info!(id = %hex_prefix(&id), "block accepted");
    state.hooks.call_decision(&id);

    self.reject_siblings(state, idx);
  }

  fn reject_siblings(&self, state: &mut State, accepted: NodeIndex) {
    let parent = state.graph.get(accepted).parent;
    let siblings: Vec<NodeIndex> =
      state.graph.children(parent).iter().copied().filter(|&c| c != accepted).collect();

    for sibling in siblings {
      if state.graph.get(sibling).status != Status::Processing {
        continue;
      }
      state.graph.get_mut(sibling).status = Status::Rejected;
      state.counters.blocks_rejected += 1;
      let id = state.graph.get(sibling).id;
      info!(id = %hex_prefix(&id), "sibling rejected");
      state.hooks.call_notify(&format!("block_rejected:{}", hex_prefix(&id)));

      if matches!(self.config.engine_kind, EngineKind::Chain | EngineKind::Pq) {
        self.reject_descendants(state, sibling);
      }
    }
  }

  /// Chain/PQ semantics: rejection cascades transitively down the whole
  /// subtree of a rejected sibling. DAG semantics never call this: a
  /// rejected sibling's descendants remain `Processing`.
  fn reject_descendants(&self, state: &mut State, root: NodeIndex) {
    let mut stack: Vec<NodeIndex> = state.graph.children(root).to_vec();
    while let Some(idx) = stack.pop() {
      stack.extend(state.graph.children(idx).iter().copied());

      if state.graph.get(idx).status != Status::Processing {
        continue;
      }
      state.graph.get_mut(idx).status = Status::Rejected;
      state.counters.blocks_rejected += 1;
      let id = state.graph.get(idx).id;
      state.hooks.call_notify(&format!("block_rejected:{}", hex_prefix(&id)));
    }
  }

  /// `spec.md` §4.2 boundary: unknown block id -> `InvalidState`.
  pub fn is_accepted(&self, id: &Id) -> Result<bool> {
    let state = self.read();
    let idx = state.graph.lookup(id).ok_or(Error::InvalidState)?;
    Ok(state.graph.get(idx).status == Status::Accepted)
  }

  /// Returns the 32-byte id of the current preferred tip. Genesis
  /// (all-zero) before any block has been accepted or reached preference
  /// threshold.
  pub fn get_preference(&self) -> Id {
    let state = self.read();
    state.graph.get(state.preference).id
  }

  /// Records a poll round. The core does not itself contact `voter_ids`;
  /// it only records the outcome count (`spec.md` §6, §9: "the core's
  /// process_votes_batch is simply a loop over process_vote").
  pub fn poll(&self, voter_ids: &[Id]) -> Result<()> {
    let _ = voter_ids;
    let mut state = self.write();
    state.counters.polls_completed += 1;
    Ok(())
  }

  /// Convenience: processes a batch of votes in a loop, no batch-specific
  /// semantics (`spec.md` §9).
  pub fn process_votes_batch(&self, votes: &[Vote]) -> Result<()> {
    for vote in votes {
      self.process_vote(*vote)?;
    }
    Ok(())
  }

  pub fn get_stats(&self) -> Stats {
    self.read().counters.snapshot()
  }

  pub fn register_decision_callback<F>(&self, f: F)
  where
    F: Fn(&Id) + Send + Sync + 'static,
  {
    self.write().hooks.decision = Some(std::sync::Arc::new(f));
  }

  pub fn register_verify_callback<F>(&self, f: F)
  where
    F: Fn(&Block) -> bool + Send + Sync + 'static,
  {
    self.write().hooks.verify = Some(std::sync::Arc::new(f));
  }

  pub fn register_notify_callback<F>(&self, f: F)
  where
    F: Fn(&str) + Send + Sync + 'static,
  {
    self.write().hooks.notify = Some(std::sync::Arc::new(f));
  }
}

fn hex_prefix(id: &Id) -> String {
  id[..4].iter().map(|b| format!("{b:02x}")).collect()
}
