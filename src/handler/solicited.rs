//! The solicited entry point (spec §4.5): the synchronous path for
//! transactions submitted locally (e.g. by an RPC endpoint on this same
//! node), rather than received over gossip. It shares the commit-check
//! predicate chain with the gossip path but calls the verification pool
//! directly instead of going through either queue, and reports the
//! outcome back to its caller instead of just logging and moving on.

use {
  super::{
    commit_check::{check_already_committed, CommitCheckOutcome},
    TxHandler,
  },
  crate::{
    error::HandlerError,
    types::{BacklogItem, RawMessage, SignedTransaction},
  },
  std::sync::Arc,
  tracing::debug,
};

/// Handed out by [`TxHandler`] to whatever component accepts
/// locally-originated transactions.
pub struct SolicitedTxHandler {
  pub(crate) handler: Arc<TxHandler>,
}

impl SolicitedTxHandler {
  /// Verifies and, if valid, remembers `txn` (no relay — see below).
  /// Unlike the gossip path, a bad signature here is reported back to
  /// the caller instead of merely disconnecting a peer — there is no
  /// peer to disconnect.
  pub async fn handle(&self, txn: SignedTransaction) -> Result<(), HandlerError> {
    let ctx = match check_already_committed(&self.handler, &txn).await {
      CommitCheckOutcome::Dropped => return Ok(()),
      CommitCheckOutcome::Context(ctx) => ctx,
    };

    let item = BacklogItem {
      rawmsg: RawMessage::local(),
      unverified_txn: txn,
      context: Some(ctx),
      verify_error: None,
    };

    let verified = self.handler.verification_pool.verify(item).await;
    if let Some(err) = verified.verify_error {
      return Err(HandlerError::InvalidTransaction(err));
    }

    self.handler.metrics.inc_handled();

    // No relay here: a solicited transaction was never received from a
    // peer, so there is no origin to exclude and nothing for this
    // caller to forward (spec §4.5 step 4 stops at `Remember`).
    if let Err(e) = self.handler.pool.remember(&verified.unverified_txn).await {
      debug!(tx = ?verified.unverified_txn.id(), error = %e, "pool rejected solicited transaction at remember time");
      self.handler.metrics.inc_remember_failed();
    }

    Ok(())
  }
}
