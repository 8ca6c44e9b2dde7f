//! Handler configuration (ambient addition — ungrounded in spec.md, which
//! fixes these as compile-time constants; grounded in the teacher's
//! `cli::CliOpts` pattern of a `clap`-derived options struct that
//! converts into a plain config type).

use clap::Parser;

/// Capacity of the backlog and post-verification queues (spec §5: "a
/// compile-time constant of 1000 on each queue"). Exposed as a default
/// rather than hard-coded so tests can exercise backpressure with a
/// small queue.
pub const DEFAULT_QUEUE_CAPACITY: usize = 1000;

/// Sizes the two bounded queues `TxHandler::new` creates. The
/// verification pool is a separately-constructed collaborator (spec
/// §6), sized by whoever builds it, not by this struct — see
/// `HandlerOpts::verification_threads` for the CLI-facing equivalent.
#[derive(Debug, Clone)]
pub struct Config {
  pub backlog_capacity: usize,
  pub post_verification_capacity: usize,
}

impl Default for Config {
  fn default() -> Self {
    Self {
      backlog_capacity: DEFAULT_QUEUE_CAPACITY,
      post_verification_capacity: DEFAULT_QUEUE_CAPACITY,
    }
  }
}

/// Command-line surface for processes that embed this crate directly,
/// mirroring the teacher's top-level `CliOpts`.
#[derive(Debug, Parser)]
#[clap(version, about)]
pub struct HandlerOpts {
  #[clap(
    long,
    help = "maximum number of backlog items awaiting commit-check",
    default_value_t = DEFAULT_QUEUE_CAPACITY
  )]
  pub backlog_capacity: usize,

  #[clap(
    long,
    help = "maximum number of items awaiting post-verification processing",
    default_value_t = DEFAULT_QUEUE_CAPACITY
  )]
  pub post_verification_capacity: usize,

  #[clap(
    long,
    help = "number of worker threads in the signature-verification pool (default: number of cpus)"
  )]
  pub verification_threads: Option<usize>,
}

impl From<HandlerOpts> for Config {
  fn from(opts: HandlerOpts) -> Self {
    Self {
      backlog_capacity: opts.backlog_capacity,
      post_verification_capacity: opts.post_verification_capacity,
    }
  }
}
