//! Signature verification and hashing primitives
//!
//! The ledger only verifies; key generation and signing live with the
//! callers. Signatures are ECDSA over secp256k1, messages are hashed
//! with SHA-256 before verification, transaction ids use double SHA-256.

use bitcoin_hashes::{sha256d, Hash as BitcoinHash, HashEngine};
use secp256k1::{ecdsa::Signature, Message, PublicKey, Secp256k1};
use sha2::{Digest, Sha256};

use crate::types::Hash;

/// Sha256: 𝔹* → ℍ
pub fn sha256(data: &[u8]) -> Hash {
    let mut hasher = Sha256::new();
    hasher.update(data);
    hasher.finalize().into()
}

/// Sha256d: 𝔹* → ℍ
///
/// Double SHA-256, the digest used for transaction ids.
pub fn double_sha256(data: &[u8]) -> Hash {
    let mut engine = sha256d::Hash::engine();
    engine.input(data);
    sha256d::Hash::from_engine(engine).into_inner()
}

/// VerifySignature: 𝔹* × 𝔹* × 𝔹* → {true, false}
///
/// Verify `signature` (DER) over the SHA-256 digest of `message` under
/// `pubkey` (serialized SEC1 form). Every parse failure is a
/// verification failure, never a fault.
pub fn verify_signature(message: &[u8], signature: &[u8], pubkey: &[u8]) -> bool {
    // Parse public key
    let pubkey = match PublicKey::from_slice(pubkey) {
        Ok(pk) => pk,
        Err(_) => return false,
    };

    // Parse signature (DER format)
    let signature = match Signature::from_der(signature) {
        Ok(sig) => sig,
        Err(_) => return false,
    };

    let digest = sha256(message);
    let message = match Message::from_digest_slice(&digest) {
        Ok(msg) => msg,
        Err(_) => return false,
    };

    let secp = Secp256k1::verification_only();
    secp.verify_ecdsa(&message, &signature, &pubkey).is_ok()
}
