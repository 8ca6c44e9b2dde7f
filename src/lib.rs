//! Incoming gossip transaction handler (spec §1): decodes, filters,
//! verifies and relays transactions arriving over gossip, and offers a
//! synchronous entry point for locally-solicited transactions.

mod collaborators;
mod config;
mod error;
mod handler;
mod metrics;
mod primitives;
mod types;
mod verify;
mod wire;

#[cfg(test)]
pub mod test;

pub use {
  collaborators::{GossipNetwork, Ledger, TransactionPool},
  config::{Config, HandlerOpts, DEFAULT_QUEUE_CAPACITY},
  error::{DecodeError, HandlerError, LedgerError, PoolError, VerifyError},
  handler::{IngressOutcome, SolicitedTxHandler, TxHandler},
  metrics::Metrics,
  primitives::{Keypair, KeypairError, Pubkey, ToBase58String},
  types::{
    BacklogItem,
    BlockHeader,
    ConsensusParams,
    Hash,
    PeerId,
    RawMessage,
    Round,
    SignedTransaction,
    TxId,
    UnsignedTransaction,
    VerificationContext,
  },
  verify::{RayonVerificationPool, VerificationPool},
  wire::{BincodeCodec, WireCodec},
};

/// Installs a `tracing` subscriber at the given verbosity, the same
/// `registry` + `fmt` layer + level filter bootstrap the teacher's own
/// binary uses. Binaries embedding this crate may install their own
/// subscriber instead and skip this entirely.
pub fn init_tracing(verbosity: u8) {
  use tracing_subscriber::{filter::filter_fn, prelude::*, Layer};

  let loglevel = match verbosity {
    0 => tracing::Level::INFO,
    1 => tracing::Level::DEBUG,
    _ => tracing::Level::TRACE,
  };

  tracing_subscriber::registry()
    .with(
      tracing_subscriber::fmt::layer()
        .with_filter(filter_fn(move |metadata| metadata.level() <= &loglevel)),
    )
    .init();
}
