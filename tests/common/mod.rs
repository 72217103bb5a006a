//! Shared fixtures: deterministic keys, input signing, pool seeding.

use epoch_ledger::transaction::signable_bytes;
use epoch_ledger::types::*;
use epoch_ledger::utxo::UtxoSet;
use secp256k1::{Message, PublicKey, Secp256k1, SecretKey};
use sha2::{Digest, Sha256};

pub struct Keypair {
    pub secret: SecretKey,
    pub pubkey: Vec<u8>,
}

/// Deterministic keypair from a non-zero seed byte.
pub fn keypair(seed: u8) -> Keypair {
    let secret = SecretKey::from_slice(&[seed; 32]).expect("seed within curve order");
    let secp = Secp256k1::new();
    let pubkey = PublicKey::from_secret_key(&secp, &secret)
        .serialize()
        .to_vec();
    Keypair { secret, pubkey }
}

/// Produce a DER signature for input `index` of `tx` with `signer`.
pub fn sign_input(tx: &Transaction, index: usize, signer: &Keypair) -> Vec<u8> {
    let secp = Secp256k1::new();
    let message = signable_bytes(tx, index).expect("index in range");
    let digest: [u8; 32] = Sha256::digest(&message).into();
    let msg = Message::from_digest_slice(&digest).expect("32-byte digest");
    secp.sign_ecdsa(&msg, &signer.secret).serialize_der().to_vec()
}

/// Sign every input of `tx`, input i with `signers[i]`.
pub fn sign_inputs(tx: &mut Transaction, signers: &[&Keypair]) {
    assert_eq!(tx.inputs.len(), signers.len());
    let signatures: Vec<Vec<u8>> = (0..tx.inputs.len())
        .map(|i| sign_input(tx, i, signers[i]))
        .collect();
    for (input, signature) in tx.inputs.iter_mut().zip(signatures) {
        input.signature = signature;
    }
}

pub fn outpoint(byte: u8, index: u64) -> UtxoKey {
    UtxoKey {
        txid: [byte; 32],
        index,
    }
}

/// Seed a pool with (key, value, owner) entries.
pub fn seed_pool(entries: &[(UtxoKey, i64, &Keypair)]) -> UtxoSet {
    let mut pool = UtxoSet::new();
    for (key, value, owner) in entries {
        pool.insert(
            key.clone(),
            TransactionOutput {
                value: *value,
                pubkey: owner.pubkey.clone(),
            },
        )
        .expect("fresh key");
    }
    pool
}

/// An unsigned transaction spending `prevouts` into `outputs`.
pub fn transfer(prevouts: &[UtxoKey], outputs: &[(i64, &Keypair)]) -> Transaction {
    Transaction {
        inputs: prevouts
            .iter()
            .map(|prevout| TransactionInput {
                prevout: prevout.clone(),
                signature: vec![],
            })
            .collect(),
        outputs: outputs
            .iter()
            .map(|(value, owner)| TransactionOutput {
                value: *value,
                pubkey: owner.pubkey.clone(),
            })
            .collect(),
    }
}
