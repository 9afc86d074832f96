//! `snowcore`: an embeddable consensus engine implementing a metastable
//! Snow*-family protocol (Snowball/Avalanche-style) over an append-only
//! block graph.
//!
//! The engine tracks each block's preference/confidence state, decides
//! acceptance or rejection in finite time under an honest majority,
//! exposes the currently preferred tip, and emits decision callbacks. It
//! is deliberately narrow: the network transport that delivers votes, the
//! validator-sampling policy, cryptographic payload validation, and
//! persistence are all the host's responsibility (see `SPEC_FULL.md`).
//!
//! ```
//! use snowcore::{Block, Config, Engine, Vote};
//!
//! let config = Config { alpha_preference: 2, alpha_confidence: 2, beta: 3, ..Config::default() };
//! let engine = Engine::create(config);
//!
//! engine.add_block(Block::new([1; 32], [0; 32], 1, 0, vec![])).unwrap();
//! for voter in 0..3u8 {
//!   engine.process_vote(Vote::new([voter; 32], [1; 32], false)).unwrap();
//! }
//!
//! assert!(engine.is_accepted(&[1; 32]).unwrap());
//! assert_eq!(engine.get_preference(), [1; 32]);
//! ```

mod callbacks;
mod config;
mod dedup;
mod engine;
mod error;
mod graph;
mod init;
mod stats;
mod types;
pub mod wire;

pub use config::Config;
pub use engine::Engine;
pub use error::{Error, Result};
pub use graph::GENESIS_ID;
pub use init::{cleanup, init};
pub use stats::Stats;
pub use types::{Block, EngineKind, Id, Status, Vote};
