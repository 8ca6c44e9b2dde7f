//! The external collaborators this crate consumes (spec §1, §6).
//!
//! These traits are the *only* contract this crate has with the gossip
//! network, the ledger and the transaction pool — their internals (wire
//! format, storage engine, consensus rules) are out of scope. Production
//! binaries wire a concrete implementation of each in; the test suite
//! wires in fakes.

use {
  crate::{
    error::{LedgerError, PoolError},
    types::{BlockHeader, PeerId, Round, SignedTransaction},
  },
  async_trait::async_trait,
};

/// The transaction pool's admission and insertion predicates (spec §6).
///
/// `test` is non-mutating: it answers "would this be accepted" without
/// changing pool state, and is used by the commit-check to reject
/// duplicates and already-rejected transactions before spending any CPU
/// on signature verification. `remember` is the mutating insertion that
/// runs only after a successful verification.
#[async_trait]
pub trait TransactionPool: Send + Sync {
  async fn test(&self, txn: &SignedTransaction) -> Result<(), PoolError>;
  async fn remember(&self, txn: &SignedTransaction) -> Result<(), PoolError>;
}

/// The ledger's read-only view of chain state (spec §6).
#[async_trait]
pub trait Ledger: Send + Sync {
  /// The latest round this node has reached consensus on.
  async fn latest(&self) -> Round;

  /// The header of a given round, exposing the fields the verification
  /// context needs: current protocol params, fee sink, rewards pool.
  async fn block_header(
    &self,
    round: Round,
  ) -> Result<BlockHeader, LedgerError>;

  /// Whether this transaction has already been committed to the ledger.
  async fn committed(
    &self,
    txn: &SignedTransaction,
  ) -> Result<bool, LedgerError>;
}

/// The gossip network's outbound actions (spec §6).
///
/// Both methods are fire-and-forget from this crate's point of view: the
/// network layer owns delivery, retries and its own failure handling.
pub trait GossipNetwork: Send + Sync {
  /// Drop the connection to a peer that published malformed or invalid
  /// data.
  fn disconnect(&self, sender: PeerId);

  /// Forward `bytes` to every peer except `except` — the peer this
  /// message was originally received from (spec §4.4 "exclude origin").
  fn relay(&self, tag: &'static str, bytes: Vec<u8>, except: PeerId);
}
