//! A thin demonstration host around `snowcore::Engine`.
//!
//! This binary is an external collaborator, not part of the core
//! (`spec.md` §6: "No CLI, no files, no environment variables belong to
//! the core"). It exists only to show how a host wires up blocks, votes,
//! and callbacks; a real node would replace the random vote generator
//! below with network-delivered votes from a validator-sampling policy.

use clap::Parser;
use snowcore::{Block, Config, Engine, EngineKind, Vote};
use tracing::info;

#[derive(Parser, Debug)]
#[clap(author, version, about = "snowcore demo host")]
struct Args {
  /// Number of blocks to propose off genesis.
  #[clap(long, default_value_t = 5)]
  blocks: u8,

  /// Number of distinct voters simulated per block.
  #[clap(long, default_value_t = 5)]
  voters: u8,

  /// Confidence threshold for acceptance.
  #[clap(long, default_value_t = 3)]
  beta: u32,

  #[clap(long, value_enum, default_value = "chain")]
  engine: EngineArg,
}

#[derive(Clone, Debug, clap::ValueEnum)]
enum EngineArg {
  Chain,
  Dag,
  Pq,
}

impl From<EngineArg> for EngineKind {
  fn from(value: EngineArg) -> Self {
    match value {
      EngineArg::Chain => EngineKind::Chain,
      EngineArg::Dag => EngineKind::Dag,
      EngineArg::Pq => EngineKind::Pq,
    }
  }
}

fn main() -> anyhow::Result<()> {
  tracing_subscriber::fmt()
    .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
    .init();

  let args = Args::parse();
  snowcore::init();

  let config = Config {
    beta: args.beta,
    alpha_preference: args.beta,
    alpha_confidence: args.beta,
    engine_kind: args.engine.into(),
    ..Config::default()
  };
  let engine = Engine::create(config);

  engine.register_decision_callback(|id| {
    info!(id = ?&id[..4], "decided: accepted");
  });

  let mut parent = [0u8; 32];
  for i in 0..args.blocks {
    let mut id = [0u8; 32];
    id[0] = i + 1;
    engine.add_block(Block::new(id, parent, i as u64 + 1, 0, vec![]))?;

    for voter in 0..args.voters {
      engine.process_vote(Vote::new([voter; 32], id, false))?;
    }
    parent = id;
  }

  let stats = engine.get_stats();
  println!("{stats:#?}");
  snowcore::cleanup();
  Ok(())
}
