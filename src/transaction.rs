//! Transaction encoding, identity, and validation

use std::collections::HashSet;

use crate::crypto::{double_sha256, verify_signature};
use crate::error::{LedgerError, Result};
use crate::types::*;
use crate::utxo::UtxoSet;

/// SignableBytes: 𝒯𝒳 × ℕ → 𝔹*
///
/// The canonical byte sequence signed for input `input_index`: the
/// referenced outpoint of that input followed by the complete outputs
/// list, signatures excluded. Each input signs its own outpoint over the
/// shared outputs, so every input carries an independent signature.
///
/// An out-of-range index is a caller error, not an invalid transaction.
pub fn signable_bytes(tx: &Transaction, input_index: usize) -> Result<ByteString> {
    let input = tx.inputs.get(input_index).ok_or_else(|| {
        LedgerError::InvalidArgument(format!(
            "input index {} out of range for transaction with {} inputs",
            input_index,
            tx.inputs.len()
        ))
    })?;

    let mut data = Vec::new();
    data.extend_from_slice(&input.prevout.txid);
    data.extend_from_slice(&input.prevout.index.to_le_bytes());
    encode_outputs(&mut data, &tx.outputs);
    Ok(data)
}

/// TransactionId: 𝒯𝒳 → ℍ
///
/// Double SHA-256 over the full canonical encoding, signatures included.
/// The id keys this transaction's own outputs in the UTXO set.
pub fn transaction_id(tx: &Transaction) -> Hash {
    let mut data = Vec::new();
    data.extend_from_slice(&(tx.inputs.len() as u64).to_le_bytes());
    for input in &tx.inputs {
        data.extend_from_slice(&input.prevout.txid);
        data.extend_from_slice(&input.prevout.index.to_le_bytes());
        data.extend_from_slice(&(input.signature.len() as u64).to_le_bytes());
        data.extend_from_slice(&input.signature);
    }
    encode_outputs(&mut data, &tx.outputs);
    double_sha256(&data)
}

fn encode_outputs(data: &mut ByteString, outputs: &[TransactionOutput]) {
    data.extend_from_slice(&(outputs.len() as u64).to_le_bytes());
    for output in outputs {
        data.extend_from_slice(&output.value.to_le_bytes());
        data.extend_from_slice(&(output.pubkey.len() as u64).to_le_bytes());
        data.extend_from_slice(&output.pubkey);
    }
}

/// CheckTransaction: 𝒰𝒮 × 𝒯𝒳 → {valid, invalid}
///
/// A transaction tx is valid against UTXO set us if and only if:
/// 1. ∀i ∈ tx.inputs: i.prevout ∈ us
/// 2. no two inputs of tx share a prevout
/// 3. ∀i: VerifySignature(SignableBytes(tx, idx(i)), i.signature, us(i.prevout).pubkey)
/// 4. ∀o ∈ tx.outputs: o.value ≥ 0
/// 5. Σᵢ us(i.prevout).value ≥ Σₒ o.value
///
/// Checks run inputs first, in input order, then outputs, and
/// short-circuit on the first violation. Signatures verify against the
/// owner recorded on the referenced output, not anything the input
/// carries. Rule violations are reported as Invalid, never as an error.
pub fn check_transaction(utxo_set: &UtxoSet, tx: &Transaction) -> Result<ValidationResult> {
    let mut claimed: HashSet<UtxoKey> = HashSet::new();
    let mut input_sum: Integer = 0;

    for (i, input) in tx.inputs.iter().enumerate() {
        // 1. The referenced output must be unspent
        let output = match utxo_set.get(&input.prevout) {
            Some(output) => output,
            None => {
                return Ok(ValidationResult::Invalid(format!(
                    "input {} references unknown output {}:{}",
                    i,
                    hex::encode(input.prevout.txid),
                    input.prevout.index
                )));
            }
        };

        // 2. No outpoint may be claimed twice within one transaction
        if !claimed.insert(input.prevout.clone()) {
            return Ok(ValidationResult::Invalid(format!(
                "input {} claims output {}:{} a second time",
                i,
                hex::encode(input.prevout.txid),
                input.prevout.index
            )));
        }

        // 3. The signature must verify under the referenced output's owner
        let message = signable_bytes(tx, i)?;
        if !verify_signature(&message, &input.signature, &output.pubkey) {
            return Ok(ValidationResult::Invalid(format!(
                "invalid signature on input {}",
                i
            )));
        }

        input_sum = match input_sum.checked_add(output.value) {
            Some(sum) => sum,
            None => {
                return Ok(ValidationResult::Invalid(
                    "input value sum overflows".to_string(),
                ));
            }
        };
    }

    let mut output_sum: Integer = 0;
    for (i, output) in tx.outputs.iter().enumerate() {
        // 4. Output values are non-negative
        if output.value < 0 {
            return Ok(ValidationResult::Invalid(format!(
                "negative value {} at output {}",
                output.value, i
            )));
        }

        output_sum = match output_sum.checked_add(output.value) {
            Some(sum) => sum,
            None => {
                return Ok(ValidationResult::Invalid(
                    "output value sum overflows".to_string(),
                ));
            }
        };
    }

    // 5. Conservation: inputs cover outputs, any surplus is the implicit fee
    if input_sum < output_sum {
        return Ok(ValidationResult::Invalid(format!(
            "output sum {} exceeds input sum {}",
            output_sum, input_sum
        )));
    }

    Ok(ValidationResult::Valid)
}

/// Convenience predicate over CheckTransaction.
pub fn is_valid_transaction(utxo_set: &UtxoSet, tx: &Transaction) -> Result<bool> {
    Ok(matches!(
        check_transaction(utxo_set, tx)?,
        ValidationResult::Valid
    ))
}

/// TransactionFee: 𝒰𝒮 × 𝒯𝒳 → ℤ
///
/// Fee = Σᵢ us(i.prevout).value − Σₒ o.value. Defined only for valid
/// transactions, where conservation guarantees the fee is non-negative.
pub fn transaction_fee(utxo_set: &UtxoSet, tx: &Transaction) -> Result<Integer> {
    if !is_valid_transaction(utxo_set, tx)? {
        return Err(LedgerError::InvalidTransaction(
            "fee is defined only for valid transactions".to_string(),
        ));
    }

    let input_sum: Integer = tx
        .inputs
        .iter()
        .filter_map(|input| utxo_set.get(&input.prevout))
        .map(|output| output.value)
        .sum();
    let output_sum: Integer = tx.outputs.iter().map(|output| output.value).sum();

    Ok(input_sum - output_sum)
}
