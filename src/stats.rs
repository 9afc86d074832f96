//! Counters and derived statistics (C7), `spec.md` §4.7.

use std::time::Instant;

use serde::{Deserialize, Serialize};

/// Snapshot of the engine's counters, returned by `get_stats`.
///
/// `average_decision_time_ms` is derived at query time as the original
/// source computes it: wall-clock time elapsed since engine creation,
/// divided by the total number of accepted blocks — a lifetime average,
/// not a per-decision latency (see `SPEC_FULL.md` §C.1).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Stats {
  pub blocks_accepted: u64,
  pub blocks_rejected: u64,
  pub votes_processed: u64,
  pub polls_completed: u64,
  pub average_decision_time_ms: f64,
}

/// Mutable counters plus the engine's creation time, held inside the
/// writer-guarded state.
#[derive(Debug)]
pub struct Counters {
  pub blocks_accepted: u64,
  pub blocks_rejected: u64,
  pub votes_processed: u64,
  pub polls_completed: u64,
  start_time: Instant,
}

impl Counters {
  pub fn new() -> Self {
    Self {
      blocks_accepted: 0,
      blocks_rejected: 0,
      votes_processed: 0,
      polls_completed: 0,
      start_time: Instant::now(),
    }
  }

  pub fn snapshot(&self) -> Stats {
    let elapsed_ms = self.start_time.elapsed().as_secs_f64() * 1000.0;
    let average_decision_time_ms = elapsed_ms / (self.blocks_accepted.max(1) as f64);
    Stats {
      blocks_accepted: self.blocks_accepted,
      blocks_rejected: self.blocks_rejected,
      votes_processed: self.votes_processed,
      polls_completed: self.polls_completed,
      average_decision_time_ms,
    }
  }
}

impl Default for Counters {
  fn default() -> Self {
    Self::new()
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn average_decision_time_uses_max_one_denominator() {
    let c = Counters::new();
    let s = c.snapshot();
    assert_eq!(s.blocks_accepted, 0);
    assert!(s.average_decision_time_ms.is_finite());
  }
}
