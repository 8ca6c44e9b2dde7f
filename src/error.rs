//! Error taxonomy for the pipeline (spec §7).
//!
//! Almost every error here is recovered locally by the component that
//! produces it — logged and the offending item dropped — rather than
//! propagated. `HandlerError` is the one exception: it is the only error
//! a caller of this crate ever sees, and only from the solicited path.

use thiserror::Error;

/// Raised by `TransactionPool::test` / `TransactionPool::remember`.
///
/// Both rejections (duplicate, fee too low, pool full) and mutation
/// failures are folded into this single kind: the handler treats them
/// identically (a benign drop), so the collaborator need not distinguish
/// them any further.
#[derive(Debug, Error)]
pub enum PoolError {
  #[error("rejected by transaction pool: {0}")]
  Rejected(String),
}

/// Raised by `Ledger::block_header` / `Ledger::committed`.
#[derive(Debug, Error)]
pub enum LedgerError {
  #[error("ledger lookup failed: {0}")]
  Lookup(String),
}

/// Raised by `WireCodec::decode`.
#[derive(Debug, Error)]
pub enum DecodeError {
  #[error("malformed transaction payload: {0}")]
  Malformed(#[from] bincode::Error),
}

/// Raised by `VerificationPool::verify`, recorded into a `BacklogItem`'s
/// error slot rather than returned.
#[derive(Debug, Error)]
pub enum VerifyError {
  #[error("signature verification failed")]
  InvalidSignature,
}

/// The only error surfaced to a caller of this crate: the solicited entry
/// point's "invalid transaction" result (spec §4.5, §7).
#[derive(Debug, Error)]
pub enum HandlerError {
  #[error("invalid transaction: {0}")]
  InvalidTransaction(#[from] VerifyError),
}
