//! The backlog worker (spec §4.3, §4.4, §5): the single task that drains
//! both queues. Post-verification items are always drained ahead of
//! fresh backlog items — letting a verified transaction sit behind a
//! growing backlog would hold signature-verification results hostage to
//! whatever commit-check happens to be slow this tick.

use {
  super::{
    commit_check::{check_already_committed, CommitCheckOutcome},
    TxHandler,
  },
  crate::types::BacklogItem,
  std::sync::Arc,
  tracing::debug,
};

pub(crate) async fn run(handler: Arc<TxHandler>) {
  let mut backlog_rx = handler
    .backlog_rx
    .lock()
    .expect("backlog receiver mutex poisoned")
    .take()
    .expect("backlog worker started more than once");
  let mut post_rx = handler
    .post_rx
    .lock()
    .expect("post-verification receiver mutex poisoned")
    .take()
    .expect("backlog worker started more than once");

  loop {
    // Priority drain: never let a verified item wait behind a backlog
    // item that hasn't even passed commit-check yet.
    if let Ok(item) = post_rx.try_recv() {
      handle_post_verified(&handler, item).await;
      continue;
    }

    tokio::select! {
      biased;

      _ = handler.cancel.cancelled() => return,

      item = post_rx.recv() => match item {
        Some(item) => handle_post_verified(&handler, item).await,
        None => return,
      },

      item = backlog_rx.recv() => match item {
        Some(item) => process_backlog_item(&handler, item).await,
        None => return,
      },
    }
  }
}

async fn process_backlog_item(handler: &Arc<TxHandler>, mut item: BacklogItem) {
  match check_already_committed(handler, &item.unverified_txn).await {
    CommitCheckOutcome::Dropped => {}
    CommitCheckOutcome::Context(ctx) => {
      item.context = Some(ctx);
      submit_for_verification(handler, item);
    }
  }
}

/// Hands the item to the verification pool on its own task so the
/// backlog worker keeps draining while the CPU-bound check runs, then
/// enqueues the result onto the post-verification queue itself (spec
/// §4.4: the verification step is responsible for its own hand-off).
fn submit_for_verification(handler: &Arc<TxHandler>, item: BacklogItem) {
  let handler = Arc::clone(handler);
  tokio::spawn(async move {
    let verified = handler.verification_pool.verify(item).await;
    if handler.post_tx.try_send(verified).is_err() {
      handler.metrics.inc_dropped_from_pool();
    }
  });
}

/// Shared by both the priority-drain and the regular branch above, so a
/// post-verified item is counted as handled exactly once no matter which
/// path drained it.
pub(crate) async fn handle_post_verified(handler: &Arc<TxHandler>, item: BacklogItem) {
  if item.verify_error.is_some() {
    debug!(tx = ?item.unverified_txn.id(), "dropping transaction with invalid signature");
    handler.network.disconnect(item.rawmsg.sender);
    return;
  }

  handler.metrics.inc_handled();

  match handler.pool.remember(&item.unverified_txn).await {
    Ok(()) => handler.network.relay(
      super::GOSSIP_TAG,
      item.rawmsg.bytes,
      item.rawmsg.sender,
    ),
    Err(e) => {
      debug!(tx = ?item.unverified_txn.id(), error = %e, "pool rejected transaction at remember time");
      handler.metrics.inc_remember_failed();
    }
  }
}
