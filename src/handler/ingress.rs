//! The ingress filter (spec §4.2): the only code that runs directly on
//! the gossip receive callback. Its entire job is to decode and hand off
//! as cheaply as possible — it never awaits anything, so a slow backlog
//! never slows gossip receipt itself.

use {super::TxHandler, crate::types::BacklogItem, tracing::warn};

/// What the gossip layer should do with the peer that sent this message.
#[derive(Debug, PartialEq, Eq)]
pub enum IngressOutcome {
  /// Keep the connection open; the message was either queued or
  /// silently dropped as benign backpressure.
  Ignore,
  /// The sender published bytes this node cannot even decode.
  Disconnect,
}

pub(crate) fn receive(
  handler: &TxHandler,
  sender: crate::types::PeerId,
  bytes: Vec<u8>,
) -> IngressOutcome {
  let txn = match handler.codec.decode(&bytes) {
    Ok(txn) => txn,
    Err(e) => {
      warn!(peer = %sender, error = %e, "failed to decode gossiped transaction");
      return IngressOutcome::Disconnect;
    }
  };

  let item = BacklogItem::new(
    crate::types::RawMessage { sender, bytes },
    txn,
  );

  if handler.backlog_tx.try_send(item).is_err() {
    handler.metrics.inc_dropped_from_backlog();
  }

  IngressOutcome::Ignore
}
