//! Stable error taxonomy for the consensus core.
//!
//! Mirrors the fixed integer codes of the embedding interface (`spec.md`
//! §6-§7) so that an FFI shim sitting on top of this crate can map
//! [`Error`] back to `lux_error_t`-style codes without inventing new ones.

use thiserror::Error;

/// Errors returned by [`crate::engine::Engine`] operations.
///
/// `Success` is not a variant here: Rust represents it as `Ok(())` /
/// `Ok(T)`, which is the idiomatic analogue of the source's `LUX_SUCCESS`.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum Error {
  /// Null/absent handle, malformed input, or a required field missing.
  #[error("invalid parameters")]
  InvalidParams,

  /// Allocation failure while growing the graph or dedup log.
  ///
  /// In safe Rust this can only be synthesized deliberately (e.g. by a
  /// host-level capacity policy); it is kept as a variant because the
  /// spec's interface promises it and a re-implementation must not collapse
  /// the taxonomy.
  #[error("out of memory")]
  OutOfMemory,

  /// Operation targets a block id that is not present in the graph.
  #[error("invalid state: unknown block")]
  InvalidState,

  /// The host's verify hook rejected a block; it was not stored.
  #[error("verification failed")]
  VerificationFailed,

  /// Reserved for engine-kind semantics not yet implemented.
  #[error("not implemented")]
  NotImplemented,
}

impl Error {
  /// Stable integer code matching the C ABI's `lux_error_t`.
  pub const fn code(&self) -> i32 {
    match self {
      Error::InvalidParams => -1,
      Error::OutOfMemory => -2,
      Error::InvalidState => -3,
      Error::VerificationFailed => -4,
      Error::NotImplemented => -5,
    }
  }

  /// Human string for the error, stable across releases.
  pub const fn as_str(&self) -> &'static str {
    match self {
      Error::InvalidParams => "Invalid parameters",
      Error::OutOfMemory => "Out of memory",
      Error::InvalidState => "Invalid state",
      Error::VerificationFailed => "Verification failed",
      Error::NotImplemented => "Not implemented",
    }
  }
}

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn codes_match_spec() {
    assert_eq!(Error::InvalidParams.code(), -1);
    assert_eq!(Error::OutOfMemory.code(), -2);
    assert_eq!(Error::InvalidState.code(), -3);
    assert_eq!(Error::VerificationFailed.code(), -4);
    assert_eq!(Error::NotImplemented.code(), -5);
  }

  #[test]
  fn strings_are_human_readable() {
    assert_eq!(Error::InvalidState.as_str(), "Invalid state");
    assert_eq!(Error::InvalidState.to_string(), "invalid state: unknown block");
  }
}
