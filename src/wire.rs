//! The wire codec (spec §6): decoding raw gossip bytes into a
//! [`SignedTransaction`]. The wire format itself is out of scope (spec
//! §1) — this module only defines the seam the ingress filter calls
//! through, plus a default `bincode` implementation in the teacher's
//! style (`network::mod` already leans on `bincode` for gossip payloads).

use crate::{error::DecodeError, types::SignedTransaction};

pub trait WireCodec: Send + Sync {
  fn decode(&self, bytes: &[u8]) -> Result<SignedTransaction, DecodeError>;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct BincodeCodec;

impl WireCodec for BincodeCodec {
  fn decode(&self, bytes: &[u8]) -> Result<SignedTransaction, DecodeError> {
    bincode::deserialize(bytes).map_err(DecodeError::Malformed)
  }
}
