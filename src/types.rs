//! The data model of the pipeline (spec §3).
//!
//! A [`BacklogItem`] is created once by the ingress filter, mutated once
//! by the backlog worker (its `context` is filled in) and once by the
//! verification pool (its `verify_error` is filled in), then consumed
//! exactly once. It is never shared between two consumers at the same
//! time: ownership transfers along the queues that carry it.

use {
  crate::{error::VerifyError, primitives::Pubkey},
  multihash::{Hasher, Sha3_256},
  serde::{Deserialize, Serialize},
};

/// A validator's gossip identity doubles as its signing pubkey in this
/// crate, so peers are addressed the same way accounts are.
pub type PeerId = Pubkey;

/// A consensus round number.
pub type Round = u64;

/// The genesis hash pinned into every verification context.
pub type Hash = [u8; 32];

/// The content-addressed id of a transaction, used for pool membership
/// and logging. Distinct from the signature: two transactions that differ
/// only in signature (impossible here, since the signature covers the
/// whole body) would still collide, but nothing in this crate relies on
/// that not happening.
pub type TxId = [u8; 32];

/// The raw bytes and sender identity of an inbound gossip message.
///
/// Both fields are opaque to this crate: `bytes` is only re-encoded back
/// out on relay, and `sender` is only ever handed back to the network
/// layer's `disconnect`/`relay` calls.
#[derive(Debug, Clone)]
pub struct RawMessage {
  pub sender: PeerId,
  pub bytes: Vec<u8>,
}

impl RawMessage {
  /// Placeholder used by the solicited entry point, which never touches
  /// the network layer and so never needs a real sender or payload.
  pub fn local() -> Self {
    Self {
      sender: Pubkey::zero(),
      bytes: Vec::new(),
    }
  }
}

/// Protocol parameters snapshotted from a block header at commit-check
/// time. Scoped down to what signature/liveness verification needs;
/// fee prioritisation and the rest of consensus are out of scope here.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConsensusParams {
  pub min_txn_fee: u64,
}

/// What the ledger returns for a given round (spec §6).
#[derive(Debug, Clone)]
pub struct BlockHeader {
  pub protocol: ConsensusParams,
  pub fee_sink: Pubkey,
  pub rewards_pool: Pubkey,
}

/// The verification context: everything needed to check a transaction's
/// signature and liveness, pinned at commit-check time so a later round
/// change cannot invalidate an in-flight verification (spec §3 invariant
/// 5, spec §9 "Context snapshot vs. live read").
#[derive(Debug, Clone)]
pub struct VerificationContext {
  pub round: Round,
  pub consensus_params: ConsensusParams,
  pub fee_sink: Pubkey,
  pub rewards_pool: Pubkey,
  pub genesis_id: String,
  pub genesis_hash: Hash,
}

/// The body of a transaction before signing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnsignedTransaction {
  pub sender: Pubkey,
  pub first_valid: Round,
  pub last_valid: Round,
  pub fee: u64,
  pub payload: Vec<u8>,
}

impl UnsignedTransaction {
  /// The liveness predicate of spec §4.3 step 4: not expired, not
  /// premature, measured against the round pinned in `ctx`.
  pub fn is_alive(&self, ctx: &VerificationContext) -> bool {
    self.first_valid <= ctx.round && ctx.round <= self.last_valid
  }

  /// Bytes actually signed: the transaction body plus the chain identity
  /// it was signed for, so a signature cannot be replayed across chains
  /// or forks that share a validator set but not a genesis.
  fn signable_bytes(&self, ctx: &VerificationContext) -> Vec<u8> {
    let mut hasher = Sha3_256::default();
    hasher.update(ctx.genesis_id.as_bytes());
    hasher.update(&ctx.genesis_hash);
    hasher.update(self.sender.as_bytes());
    hasher.update(&self.first_valid.to_le_bytes());
    hasher.update(&self.last_valid.to_le_bytes());
    hasher.update(&self.fee.to_le_bytes());
    hasher.update(&self.payload);
    hasher.finalize().as_ref().to_vec()
  }
}

/// A transaction and the signature authorizing it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SignedTransaction {
  pub txn: UnsignedTransaction,
  pub signature: ed25519_dalek::Signature,
}

impl SignedTransaction {
  pub fn id(&self) -> TxId {
    let mut hasher = Sha3_256::default();
    hasher.update(self.txn.sender.as_bytes());
    hasher.update(&self.txn.first_valid.to_le_bytes());
    hasher.update(&self.txn.last_valid.to_le_bytes());
    hasher.update(&self.txn.fee.to_le_bytes());
    hasher.update(&self.txn.payload);
    hasher.update(self.signature.as_ref());
    hasher.finalize().as_ref().try_into().unwrap()
  }

  /// The signature check performed by the verification pool (spec §4.4).
  /// Must run against `ctx`, never against a freshly-read ledger state —
  /// see spec §9's warning about racing round advancement.
  pub fn verify_signature(
    &self,
    ctx: &VerificationContext,
  ) -> Result<(), VerifyError> {
    use ed25519_dalek::Verifier;

    let public = ed25519_dalek::PublicKey::from_bytes(self.txn.sender.as_bytes())
      .map_err(|_| VerifyError::InvalidSignature)?;
    let message = self.txn.signable_bytes(ctx);
    public
      .verify(&message, &self.signature)
      .map_err(|_| VerifyError::InvalidSignature)
  }
}

/// The unit that flows through the pipeline (spec §3 "Backlog item").
#[derive(Debug)]
pub struct BacklogItem {
  pub rawmsg: RawMessage,
  pub unverified_txn: SignedTransaction,
  pub context: Option<VerificationContext>,
  pub verify_error: Option<VerifyError>,
}

impl BacklogItem {
  pub fn new(rawmsg: RawMessage, unverified_txn: SignedTransaction) -> Self {
    Self {
      rawmsg,
      unverified_txn,
      context: None,
      verify_error: None,
    }
  }
}
