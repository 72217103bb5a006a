//! The pool of unspent transaction outputs

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::error::{LedgerError, Result};
use crate::types::{TransactionOutput, UtxoKey};

/// UtxoSet: 𝒰𝒮 = 𝒦 → 𝒯ₒ
///
/// Every key present refers to an output not yet consumed by any accepted
/// transaction. All operations are O(1) expected. `clone()` is the
/// defensive copy: the result shares no mutable state with the original.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UtxoSet {
    utxos: HashMap<UtxoKey, TransactionOutput>,
}

impl UtxoSet {
    pub fn new() -> Self {
        Self {
            utxos: HashMap::new(),
        }
    }

    /// Membership test for an unspent output.
    pub fn contains(&self, key: &UtxoKey) -> bool {
        self.utxos.contains_key(key)
    }

    /// Look up the output a key refers to.
    pub fn get(&self, key: &UtxoKey) -> Option<&TransactionOutput> {
        self.utxos.get(key)
    }

    /// Record a newly created output as unspent.
    ///
    /// A key that is already unspent is never overwritten; it must be
    /// removed first. Insertion after removal is the only mutation path
    /// the resolver uses.
    pub fn insert(&mut self, key: UtxoKey, output: TransactionOutput) -> Result<()> {
        if self.utxos.contains_key(&key) {
            return Err(LedgerError::OutputAlreadyUnspent(format!(
                "{}:{}",
                hex::encode(key.txid),
                key.index
            )));
        }
        self.utxos.insert(key, output);
        Ok(())
    }

    /// Remove a consumed output. Returns the output if the key was present.
    pub fn remove(&mut self, key: &UtxoKey) -> Option<TransactionOutput> {
        self.utxos.remove(key)
    }

    pub fn len(&self) -> usize {
        self.utxos.len()
    }

    pub fn is_empty(&self) -> bool {
        self.utxos.is_empty()
    }

    /// Iterate over the unspent outputs in no particular order.
    pub fn iter(&self) -> impl Iterator<Item = (&UtxoKey, &TransactionOutput)> {
        self.utxos.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(byte: u8, index: u64) -> UtxoKey {
        UtxoKey {
            txid: [byte; 32],
            index,
        }
    }

    fn output(value: i64) -> TransactionOutput {
        TransactionOutput {
            value,
            pubkey: vec![0x02; 33],
        }
    }

    #[test]
    fn test_insert_and_lookup() {
        let mut set = UtxoSet::new();
        set.insert(key(1, 0), output(50)).unwrap();

        assert!(set.contains(&key(1, 0)));
        assert_eq!(set.get(&key(1, 0)).unwrap().value, 50);
        assert!(!set.contains(&key(1, 1)));
        assert!(set.get(&key(2, 0)).is_none());
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn test_insert_refuses_to_clobber() {
        let mut set = UtxoSet::new();
        set.insert(key(1, 0), output(50)).unwrap();

        let result = set.insert(key(1, 0), output(99));
        assert!(matches!(result, Err(LedgerError::OutputAlreadyUnspent(_))));
        assert_eq!(set.get(&key(1, 0)).unwrap().value, 50);
    }

    #[test]
    fn test_remove_then_insert() {
        let mut set = UtxoSet::new();
        set.insert(key(1, 0), output(50)).unwrap();

        let removed = set.remove(&key(1, 0)).unwrap();
        assert_eq!(removed.value, 50);
        assert!(set.is_empty());

        set.insert(key(1, 0), output(99)).unwrap();
        assert_eq!(set.get(&key(1, 0)).unwrap().value, 99);
    }

    #[test]
    fn test_remove_missing_key() {
        let mut set = UtxoSet::new();
        assert!(set.remove(&key(1, 0)).is_none());
    }

    #[test]
    fn test_clone_is_independent() {
        let mut original = UtxoSet::new();
        original.insert(key(1, 0), output(50)).unwrap();

        let mut copy = original.clone();
        copy.remove(&key(1, 0));
        copy.insert(key(2, 0), output(10)).unwrap();

        assert!(original.contains(&key(1, 0)));
        assert!(!original.contains(&key(2, 0)));
        assert!(!copy.contains(&key(1, 0)));
    }

    #[test]
    fn test_content_equality() {
        let mut a = UtxoSet::new();
        let mut b = UtxoSet::new();
        a.insert(key(1, 0), output(50)).unwrap();
        b.insert(key(1, 0), output(50)).unwrap();

        assert_eq!(a, b);

        b.remove(&key(1, 0));
        assert_ne!(a, b);
    }
}
