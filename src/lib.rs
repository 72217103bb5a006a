//! # Epoch Ledger
//!
//! Transaction validation and UTXO-pool resolution for a single epoch of
//! a simple ledger: given a set of unspent transaction outputs and a
//! batch of proposed transactions, determine which transactions are
//! individually valid, which are mutually compatible, and produce the
//! maximal accepted subset together with the updated UTXO set.
//!
//! ## Architecture
//!
//! The crate is layered leaves-first:
//! - `crypto`: signature oracle (secp256k1 ECDSA) and hashing
//! - `types`: transactions, outputs, outpoint keys
//! - `utxo`: the pool of unspent outputs
//! - `transaction`: canonical encoding, ids, the five-rule validator
//! - `epoch`: conflict graph, maximal-independent-set search, commit
//!
//! ## Design Principles
//!
//! 1. **Pure Functions**: validation is deterministic and side-effect-free
//! 2. **Violations Are Values**: a rule violation is `Invalid`, never a
//!    fault, so batch processing continues past bad transactions
//! 3. **Exact Arithmetic**: values are integer minor units; conservation
//!    never compares binary floating point
//! 4. **Exact Version Pinning**: consensus-critical cryptography is
//!    pinned to exact versions
//!
//! ## Usage
//!
//! ```rust
//! use epoch_ledger::EpochLedger;
//! use epoch_ledger::types::*;
//! use epoch_ledger::utxo::UtxoSet;
//!
//! let ledger = EpochLedger::new();
//! let pool = UtxoSet::new();
//! let tx = Transaction {
//!     inputs: vec![TransactionInput {
//!         prevout: UtxoKey { txid: [1; 32], index: 0 },
//!         signature: vec![],
//!     }],
//!     outputs: vec![],
//! };
//!
//! // The referenced output is not in the pool, so the transaction is
//! // invalid -- but that is a verdict, not an error.
//! let result = ledger.validate_transaction(&pool, &tx).unwrap();
//! assert!(matches!(result, ValidationResult::Invalid(_)));
//! ```

pub mod crypto;
pub mod epoch;
pub mod error;
pub mod transaction;
pub mod types;
pub mod utxo;

// Re-export commonly used types
pub use error::{LedgerError, Result};
pub use types::*;
pub use utxo::UtxoSet;

/// Main epoch ledger implementation
///
/// # Examples
///
/// ```
/// use epoch_ledger::EpochLedger;
/// use epoch_ledger::utxo::UtxoSet;
///
/// let ledger = EpochLedger::new();
/// let pool = UtxoSet::new();
///
/// // An empty batch resolves to an empty accepted sequence and an
/// // unchanged copy of the pool.
/// let (accepted, resolved) = ledger.resolve_epoch(&pool, &[]).unwrap();
/// assert!(accepted.is_empty());
/// assert_eq!(resolved, pool);
/// ```
pub struct EpochLedger;

impl EpochLedger {
    /// Create a new epoch ledger instance
    ///
    /// # Examples
    ///
    /// ```
    /// use epoch_ledger::EpochLedger;
    ///
    /// let ledger = EpochLedger::new();
    /// ```
    pub fn new() -> Self {
        Self
    }

    /// Validate a single transaction against a UTXO set
    ///
    /// Checks all five correctness conditions in order: referenced
    /// outputs exist, no outpoint is claimed twice, signatures verify
    /// under the referenced owners, output values are non-negative, and
    /// inputs cover outputs.
    ///
    /// # Examples
    ///
    /// ```
    /// use epoch_ledger::EpochLedger;
    /// use epoch_ledger::types::*;
    /// use epoch_ledger::utxo::UtxoSet;
    ///
    /// let ledger = EpochLedger::new();
    /// let pool = UtxoSet::new();
    ///
    /// // Zero inputs and zero outputs: both sums are empty, 0 >= 0 holds.
    /// let tx = Transaction { inputs: vec![], outputs: vec![] };
    /// let result = ledger.validate_transaction(&pool, &tx).unwrap();
    /// assert_eq!(result, ValidationResult::Valid);
    ///
    /// // A negative output value is always invalid.
    /// let tx = Transaction {
    ///     inputs: vec![],
    ///     outputs: vec![TransactionOutput { value: -1, pubkey: vec![0x02; 33] }],
    /// };
    /// let result = ledger.validate_transaction(&pool, &tx).unwrap();
    /// assert!(matches!(result, ValidationResult::Invalid(_)));
    /// ```
    pub fn validate_transaction(
        &self,
        utxo_set: &UtxoSet,
        tx: &Transaction,
    ) -> Result<ValidationResult> {
        transaction::check_transaction(utxo_set, tx)
    }

    /// Compute the implicit fee of a valid transaction
    ///
    /// # Examples
    ///
    /// ```
    /// use epoch_ledger::EpochLedger;
    /// use epoch_ledger::types::*;
    /// use epoch_ledger::utxo::UtxoSet;
    ///
    /// let ledger = EpochLedger::new();
    /// let pool = UtxoSet::new();
    ///
    /// let tx = Transaction { inputs: vec![], outputs: vec![] };
    /// assert_eq!(ledger.transaction_fee(&pool, &tx).unwrap(), 0);
    ///
    /// // Fees are only defined for valid transactions.
    /// let tx = Transaction {
    ///     inputs: vec![TransactionInput {
    ///         prevout: UtxoKey { txid: [1; 32], index: 0 },
    ///         signature: vec![],
    ///     }],
    ///     outputs: vec![],
    /// };
    /// assert!(ledger.transaction_fee(&pool, &tx).is_err());
    /// ```
    pub fn transaction_fee(&self, utxo_set: &UtxoSet, tx: &Transaction) -> Result<Integer> {
        transaction::transaction_fee(utxo_set, tx)
    }

    /// Resolve one epoch: maximal mutually compatible subset of a batch
    ///
    /// Returns the accepted transactions in batch order and the UTXO set
    /// after applying them. The input set is never mutated.
    ///
    /// # Examples
    ///
    /// ```
    /// use epoch_ledger::EpochLedger;
    /// use epoch_ledger::types::*;
    /// use epoch_ledger::utxo::UtxoSet;
    ///
    /// let ledger = EpochLedger::new();
    /// let mut pool = UtxoSet::new();
    /// pool.insert(
    ///     UtxoKey { txid: [1; 32], index: 0 },
    ///     TransactionOutput { value: 10, pubkey: vec![0x02; 33] },
    /// ).unwrap();
    ///
    /// // A transaction with a missing signature is rejected; the epoch
    /// // still resolves.
    /// let tx = Transaction {
    ///     inputs: vec![TransactionInput {
    ///         prevout: UtxoKey { txid: [1; 32], index: 0 },
    ///         signature: vec![],
    ///     }],
    ///     outputs: vec![TransactionOutput { value: 10, pubkey: vec![0x03; 33] }],
    /// };
    /// let (accepted, resolved) = ledger.resolve_epoch(&pool, &[tx]).unwrap();
    /// assert!(accepted.is_empty());
    /// assert_eq!(resolved, pool);
    /// ```
    pub fn resolve_epoch(
        &self,
        utxo_set: &UtxoSet,
        batch: &[Transaction],
    ) -> Result<(Vec<Transaction>, UtxoSet)> {
        epoch::resolve_epoch(utxo_set, batch)
    }

    /// Verify a signature over a message under a public key
    ///
    /// # Examples
    ///
    /// ```
    /// use epoch_ledger::EpochLedger;
    ///
    /// let ledger = EpochLedger::new();
    /// assert!(!ledger.verify_signature(b"message", b"garbage", b"garbage"));
    /// ```
    pub fn verify_signature(&self, message: &[u8], signature: &[u8], pubkey: &[u8]) -> bool {
        crypto::verify_signature(message, signature, pubkey)
    }

    /// Derive the content hash identifying a transaction
    ///
    /// # Examples
    ///
    /// ```
    /// use epoch_ledger::EpochLedger;
    /// use epoch_ledger::types::*;
    ///
    /// let ledger = EpochLedger::new();
    /// let tx = Transaction { inputs: vec![], outputs: vec![] };
    /// assert_eq!(ledger.transaction_id(&tx), ledger.transaction_id(&tx));
    /// ```
    pub fn transaction_id(&self, tx: &Transaction) -> Hash {
        transaction::transaction_id(tx)
    }
}

impl Default for EpochLedger {
    fn default() -> Self {
        Self::new()
    }
}
