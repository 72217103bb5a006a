//! Core ledger types for epoch validation

use serde::{Deserialize, Serialize};

/// Hash type: 256-bit hash
pub type Hash = [u8; 32];

/// Byte string type
pub type ByteString = Vec<u8>;

/// Natural number type
pub type Natural = u64;

/// Integer type
pub type Integer = i64;

/// UtxoKey: 𝒦 = ℍ × ℕ
///
/// Identifies one unspent output by the transaction that produced it and
/// the output's position within that transaction. Two keys are equal iff
/// both fields are equal.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UtxoKey {
    pub txid: Hash,
    pub index: Natural,
}

/// Transaction Input: ℐ = 𝒦 × 𝕊
///
/// References exactly one prior output and carries the DER-encoded ECDSA
/// signature authorizing its consumption.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionInput {
    pub prevout: UtxoKey,
    pub signature: ByteString,
}

/// Transaction Output: 𝒯ₒ = ℤ × 𝕊
///
/// Value in integer minor units and the serialized secp256k1 public key
/// of the owner. Immutable once created.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionOutput {
    pub value: Integer,
    pub pubkey: ByteString,
}

/// Transaction: 𝒯𝒳 = ℐ* × 𝒯ₒ*
///
/// Inputs and outputs are fixed at construction; the content-derived id
/// (see `transaction::transaction_id`) is therefore stable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    pub inputs: Vec<TransactionInput>,
    pub outputs: Vec<TransactionOutput>,
}

/// Validation result
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationResult {
    Valid,
    Invalid(String),
}
