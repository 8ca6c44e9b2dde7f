//! The counters spec §6 requires, plus the one spec §9's second Open
//! Question suggests ("Consider a dedicated counter" for `Remember`
//! failures — see DESIGN.md). Plain atomics: there is no metrics backend
//! in scope here, so this crate exposes the raw numbers and lets whatever
//! embeds it forward them to Prometheus, statsd or whatever it already
//! uses.

use std::sync::atomic::{AtomicU64, Ordering};

#[derive(Default)]
pub struct Metrics {
  transaction_messages_handled: AtomicU64,
  transaction_messages_dropped_from_backlog: AtomicU64,
  transaction_messages_dropped_from_pool: AtomicU64,
  transaction_messages_remember_failed: AtomicU64,
}

impl Metrics {
  pub(crate) fn inc_handled(&self) {
    self.transaction_messages_handled.fetch_add(1, Ordering::Relaxed);
  }

  pub(crate) fn inc_dropped_from_backlog(&self) {
    self
      .transaction_messages_dropped_from_backlog
      .fetch_add(1, Ordering::Relaxed);
  }

  pub(crate) fn inc_dropped_from_pool(&self) {
    self
      .transaction_messages_dropped_from_pool
      .fetch_add(1, Ordering::Relaxed);
  }

  pub(crate) fn inc_remember_failed(&self) {
    self
      .transaction_messages_remember_failed
      .fetch_add(1, Ordering::Relaxed);
  }

  pub fn transaction_messages_handled(&self) -> u64 {
    self.transaction_messages_handled.load(Ordering::Relaxed)
  }

  pub fn transaction_messages_dropped_from_backlog(&self) -> u64 {
    self
      .transaction_messages_dropped_from_backlog
      .load(Ordering::Relaxed)
  }

  pub fn transaction_messages_dropped_from_pool(&self) -> u64 {
    self
      .transaction_messages_dropped_from_pool
      .load(Ordering::Relaxed)
  }

  /// Not named in spec §6; added per spec §9's second Open Question.
  pub fn transaction_messages_remember_failed(&self) -> u64 {
    self
      .transaction_messages_remember_failed
      .load(Ordering::Relaxed)
  }
}
