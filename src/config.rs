//! Immutable engine configuration (`spec.md` §3, §6).

use serde::{Deserialize, Serialize};

use crate::types::EngineKind;

/// Configuration installed at [`crate::Engine::create`] time; immutable for
/// the lifetime of the engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
  /// Sample size used by the external poller. Informational to the core.
  pub k: u32,
  /// Preference-count threshold at which a block becomes the preferred tip.
  pub alpha_preference: u32,
  /// Confidence-count threshold contributing to acceptance.
  pub alpha_confidence: u32,
  /// Confidence-count threshold at which a block becomes `Accepted`.
  pub beta: u32,
  /// Advisory host-side polling parallelism.
  pub concurrent_polls: u32,
  /// Advisory batching hint.
  pub optimal_processing: u32,
  /// Advisory backpressure limit; not enforced by the core.
  pub max_outstanding_items: u32,
  /// Advisory per-item deadline; not enforced by the core.
  pub max_item_processing_time_ns: u64,
  /// Sibling-rejection / verify-hook semantics.
  pub engine_kind: EngineKind,
}

impl Default for Config {
  fn default() -> Self {
    Self {
      k: 20,
      alpha_preference: 15,
      alpha_confidence: 15,
      beta: 20,
      concurrent_polls: 1,
      optimal_processing: 1,
      max_outstanding_items: 1024,
      max_item_processing_time_ns: 2_000_000_000,
      engine_kind: EngineKind::Chain,
    }
  }
}

impl Config {
  /// Convenience constructor that derives `k`/`alpha_preference`/
  /// `alpha_confidence`/`beta` from a validator-set size, mirroring the
  /// original source's `lux_chain_new` auto-calculation. Not part of the
  /// spec's required surface; see `SPEC_FULL.md` §C.2.
  pub fn from_node_count(node_count: u32, engine_kind: EngineKind) -> Self {
    let k = if node_count > 1 { node_count / 2 } else { 1 };
    let alpha = if node_count > 1 { (node_count * 2) / 3 } else { 1 };
    let beta = if node_count > 2 { node_count - 2 } else { 1 };
    Self {
      k,
      alpha_preference: alpha,
      alpha_confidence: alpha,
      beta,
      engine_kind,
      ..Self::default()
    }
  }
}
