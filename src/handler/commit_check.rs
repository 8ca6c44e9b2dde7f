//! `checkAlreadyCommitted` (spec §4.3): the ordered predicate chain a
//! transaction must survive before signature verification is worth
//! spending CPU on. Shared verbatim between the gossip path (backlog
//! worker) and the solicited path, since spec §4.5 requires the same
//! filter predicates there too.

use {
  super::TxHandler,
  crate::types::{SignedTransaction, VerificationContext},
  tracing::{debug, warn},
};

/// `Dropped` corresponds to the spec's `done = true`; `Context` carries
/// the verification-context snapshot the transaction survived with.
pub(crate) enum CommitCheckOutcome {
  Dropped,
  Context(VerificationContext),
}

pub(crate) async fn check_already_committed(
  handler: &TxHandler,
  txn: &SignedTransaction,
) -> CommitCheckOutcome {
  if let Err(e) = handler.pool.test(txn).await {
    debug!(tx = ?txn.id(), error = %e, "pool rejected transaction");
    return CommitCheckOutcome::Dropped;
  }

  let latest = handler.ledger.latest().await;
  let header = match handler.ledger.block_header(latest).await {
    Ok(header) => header,
    Err(e) => {
      warn!(round = latest, error = %e, "failed to fetch block header");
      return CommitCheckOutcome::Dropped;
    }
  };

  let ctx = VerificationContext {
    round: latest + 1,
    consensus_params: header.protocol,
    fee_sink: header.fee_sink,
    rewards_pool: header.rewards_pool,
    genesis_id: handler.genesis_id.clone(),
    genesis_hash: handler.genesis_hash,
  };

  if !txn.txn.is_alive(&ctx) {
    debug!(tx = ?txn.id(), round = ctx.round, "transaction not alive at this round");
    return CommitCheckOutcome::Dropped;
  }

  match handler.ledger.committed(txn).await {
    Ok(false) => CommitCheckOutcome::Context(ctx),
    Ok(true) => {
      debug!(tx = ?txn.id(), "transaction already committed");
      CommitCheckOutcome::Dropped
    }
    Err(e) => {
      debug!(tx = ?txn.id(), error = %e, "commitment lookup failed");
      CommitCheckOutcome::Dropped
    }
  }
}
