//! A thin runnable demonstration of the handler's lifecycle: wires a
//! `TxHandler` to no-op collaborator stand-ins, submits one transaction
//! through the gossip path and one through the solicited path, then
//! shuts down. Not a production validator node — the real collaborators
//! (gossip transport, ledger, transaction pool) are out of scope for
//! this crate.

use {
  clap::Parser,
  ed25519_dalek::Signer,
  multihash::Hasher,
  rand::rngs::OsRng,
  std::sync::Arc,
  tracing::info,
  txhandler::{
    BincodeCodec,
    BlockHeader,
    ConsensusParams,
    GossipNetwork,
    HandlerOpts,
    Keypair,
    Ledger,
    LedgerError,
    PeerId,
    PoolError,
    Pubkey,
    RayonVerificationPool,
    Round,
    SignedTransaction,
    TransactionPool,
    TxHandler,
    UnsignedTransaction,
  },
};

const GENESIS_ID: &str = "demo-chain";
const GENESIS_HASH: [u8; 32] = [1u8; 32];

struct NoopPool;

#[async_trait::async_trait]
impl TransactionPool for NoopPool {
  async fn test(&self, _txn: &SignedTransaction) -> Result<(), PoolError> {
    Ok(())
  }

  async fn remember(&self, txn: &SignedTransaction) -> Result<(), PoolError> {
    info!(tx = ?txn.id(), "remembered transaction");
    Ok(())
  }
}

struct StaticLedger;

#[async_trait::async_trait]
impl Ledger for StaticLedger {
  async fn latest(&self) -> Round {
    0
  }

  async fn block_header(&self, _round: Round) -> Result<BlockHeader, LedgerError> {
    Ok(BlockHeader {
      protocol: ConsensusParams::default(),
      fee_sink: Pubkey::zero(),
      rewards_pool: Pubkey::zero(),
    })
  }

  async fn committed(&self, _txn: &SignedTransaction) -> Result<bool, LedgerError> {
    Ok(false)
  }
}

struct LoggingNetwork;

impl GossipNetwork for LoggingNetwork {
  fn disconnect(&self, sender: PeerId) {
    info!(peer = %sender, "disconnect");
  }

  fn relay(&self, tag: &'static str, bytes: Vec<u8>, except: PeerId) {
    info!(tag, bytes = bytes.len(), except = %except, "relay");
  }
}

fn signed_transaction(keypair: &Keypair) -> SignedTransaction {
  let txn = UnsignedTransaction {
    sender: keypair.public(),
    first_valid: 0,
    last_valid: 1000,
    fee: 10,
    payload: b"hello".to_vec(),
  };
  let mut hasher = multihash::Sha3_256::default();
  hasher.update(GENESIS_ID.as_bytes());
  hasher.update(&GENESIS_HASH);
  hasher.update(txn.sender.as_bytes());
  hasher.update(&txn.first_valid.to_le_bytes());
  hasher.update(&txn.last_valid.to_le_bytes());
  hasher.update(&txn.fee.to_le_bytes());
  hasher.update(&txn.payload);
  let signature = keypair.sign(hasher.finalize().as_ref());
  SignedTransaction { txn, signature }
}

#[tokio::main(flavor = "multi_thread")]
async fn main() -> anyhow::Result<()> {
  let opts = HandlerOpts::parse();
  txhandler::init_tracing(0);

  let handler = TxHandler::new(
    Arc::new(NoopPool),
    Arc::new(StaticLedger),
    Arc::new(LoggingNetwork),
    Arc::new(RayonVerificationPool::new(
      opts.verification_threads.unwrap_or_else(num_cpus::get),
    )?),
    Arc::new(BincodeCodec),
    GENESIS_ID,
    GENESIS_HASH,
    opts.into(),
  )?;
  handler.start();

  let keypair = Keypair::generate(&mut OsRng);
  let txn = signed_transaction(&keypair);
  let bytes = bincode::serialize(&txn)?;
  handler.receive(keypair.public(), bytes);

  let solicited = handler.solicited();
  let second = signed_transaction(&Keypair::generate(&mut OsRng));
  solicited.handle(second).await?;

  tokio::time::sleep(std::time::Duration::from_millis(200)).await;

  info!(
    handled = handler.metrics().transaction_messages_handled(),
    "shutting down"
  );
  handler.stop().await;
  Ok(())
}
