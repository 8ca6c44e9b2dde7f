//! Test-only harness: in-memory stand-ins for the four external
//! collaborators, used by the `#[cfg(test)]` modules beside the code
//! they exercise.

use {
  crate::{
    collaborators::{GossipNetwork, Ledger, TransactionPool},
    config::Config,
    error::{LedgerError, PoolError},
    primitives::{Keypair, Pubkey},
    types::{BlockHeader, ConsensusParams, PeerId, Round, SignedTransaction, UnsignedTransaction},
    verify::RayonVerificationPool,
    wire::BincodeCodec,
    TxHandler,
  },
  dashmap::{DashMap, DashSet},
  ed25519_dalek::Signer,
  multihash::Hasher,
  std::sync::Arc,
};

pub const GENESIS_ID: &str = "test-chain";
pub const GENESIS_HASH: [u8; 32] = [9u8; 32];

fn signable_bytes(txn: &UnsignedTransaction) -> Vec<u8> {
  let mut hasher = multihash::Sha3_256::default();
  hasher.update(GENESIS_ID.as_bytes());
  hasher.update(&GENESIS_HASH);
  hasher.update(txn.sender.as_bytes());
  hasher.update(&txn.first_valid.to_le_bytes());
  hasher.update(&txn.last_valid.to_le_bytes());
  hasher.update(&txn.fee.to_le_bytes());
  hasher.update(&txn.payload);
  hasher.finalize().as_ref().to_vec()
}

pub fn sign(keypair: &Keypair, first_valid: u64, last_valid: u64, fee: u64) -> SignedTransaction {
  let txn = UnsignedTransaction {
    sender: keypair.public(),
    first_valid,
    last_valid,
    fee,
    payload: vec![1, 2, 3],
  };
  let signature = keypair.sign(&signable_bytes(&txn));
  SignedTransaction { txn, signature }
}

#[derive(Default)]
pub struct FakePool {
  pub known: DashSet<[u8; 32]>,
  pub reject_remember: DashSet<[u8; 32]>,
  pub remembered: DashSet<[u8; 32]>,
}

#[async_trait::async_trait]
impl TransactionPool for FakePool {
  async fn test(&self, txn: &SignedTransaction) -> Result<(), PoolError> {
    if self.known.contains(&txn.id()) {
      Err(PoolError::Rejected("duplicate".into()))
    } else {
      Ok(())
    }
  }

  async fn remember(&self, txn: &SignedTransaction) -> Result<(), PoolError> {
    if self.reject_remember.contains(&txn.id()) {
      return Err(PoolError::Rejected("rejected at remember".into()));
    }
    self.known.insert(txn.id());
    self.remembered.insert(txn.id());
    Ok(())
  }
}

pub struct FakeLedger {
  pub round: u64,
  pub committed: DashSet<[u8; 32]>,
  pub fail_lookup: bool,
}

impl Default for FakeLedger {
  fn default() -> Self {
    Self {
      round: 5,
      committed: DashSet::new(),
      fail_lookup: false,
    }
  }
}

#[async_trait::async_trait]
impl Ledger for FakeLedger {
  async fn latest(&self) -> Round {
    self.round
  }

  async fn block_header(&self, _round: Round) -> Result<BlockHeader, LedgerError> {
    if self.fail_lookup {
      return Err(LedgerError::Lookup("unavailable".into()));
    }
    Ok(BlockHeader {
      protocol: ConsensusParams::default(),
      fee_sink: Pubkey::zero(),
      rewards_pool: Pubkey::zero(),
    })
  }

  async fn committed(&self, txn: &SignedTransaction) -> Result<bool, LedgerError> {
    Ok(self.committed.contains(&txn.id()))
  }
}

#[derive(Default)]
pub struct FakeNetwork {
  pub disconnected: DashMap<PeerId, u64>,
  pub relayed: DashMap<PeerId, u64>,
}

impl GossipNetwork for FakeNetwork {
  fn disconnect(&self, sender: PeerId) {
    *self.disconnected.entry(sender).or_insert(0) += 1;
  }

  fn relay(&self, _tag: &'static str, _bytes: Vec<u8>, except: PeerId) {
    *self.relayed.entry(except).or_insert(0) += 1;
  }
}

pub struct Harness {
  pub handler: Arc<TxHandler>,
  pub pool: Arc<FakePool>,
  pub ledger: Arc<FakeLedger>,
  pub network: Arc<FakeNetwork>,
}

pub fn harness(config: Config) -> Harness {
  let pool = Arc::new(FakePool::default());
  let ledger = Arc::new(FakeLedger::default());
  let network = Arc::new(FakeNetwork::default());
  let verify_pool = Arc::new(RayonVerificationPool::new(2).unwrap());
  let codec = Arc::new(BincodeCodec);

  let handler = TxHandler::new(
    pool.clone(),
    ledger.clone(),
    network.clone(),
    verify_pool,
    codec,
    GENESIS_ID,
    GENESIS_HASH,
    config,
  )
  .unwrap();

  Harness {
    handler,
    pool,
    ledger,
    network,
  }
}
