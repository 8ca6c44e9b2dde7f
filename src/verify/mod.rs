//! The verification adapter (spec §4.4) and the verification pool
//! contract it submits to (spec §6 `EnqueueBacklog`).
//!
//! The pool's generality — `EnqueueBacklog(ctx, fn, arg, done)` running an
//! arbitrary `fn` — collapses to a single call site in this crate (the
//! backlog worker only ever submits a signature check), so
//! [`VerificationPool`] exposes that one operation directly instead of a
//! generic task-submission API.

use {
  crate::types::{BacklogItem, VerificationContext},
  async_trait::async_trait,
};

/// A CPU-bound worker pool that verifies one backlog item's signature and
/// returns it with `verify_error` populated. Implementations must treat
/// `item.context` as fixed: re-reading live ledger state here instead of
/// using the snapshot races against round advancement (spec §9).
#[async_trait]
pub trait VerificationPool: Send + Sync {
  async fn verify(&self, item: BacklogItem) -> BacklogItem;
}

/// A `rayon`-backed [`VerificationPool`].
///
/// `rayon` already pulls its weight in this codebase for CPU-bound
/// parallel work (block-producer transaction generation uses
/// `par_iter`); a dedicated thread pool sized independently from the
/// global rayon pool is the natural extension for signature
/// verification, which must not compete with or be starved by other
/// rayon consumers in the same process.
pub struct RayonVerificationPool {
  pool: rayon::ThreadPool,
}

impl RayonVerificationPool {
  pub fn new(threads: usize) -> anyhow::Result<Self> {
    let pool = rayon::ThreadPoolBuilder::new()
      .num_threads(threads)
      .thread_name(|i| format!("txverify-{i}"))
      .build()?;
    Ok(Self { pool })
  }
}

#[async_trait]
impl VerificationPool for RayonVerificationPool {
  async fn verify(&self, mut item: BacklogItem) -> BacklogItem {
    let (done_tx, done_rx) = tokio::sync::oneshot::channel();

    self.pool.spawn(move || {
      item.verify_error = verify_one(&item).err();
      // the receiving end only drops if the handler has already shut
      // down; there is nothing useful to do with that here.
      let _ = done_tx.send(item);
    });

    done_rx
      .await
      .expect("verification worker pool dropped its result")
  }
}

fn verify_one(
  item: &BacklogItem,
) -> Result<(), crate::error::VerifyError> {
  let ctx: &VerificationContext = item
    .context
    .as_ref()
    .expect("backlog item submitted for verification without a context snapshot");
  item.unverified_txn.verify_signature(ctx)
}
