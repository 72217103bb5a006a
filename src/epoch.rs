//! Epoch resolution: conflict graph, maximal independent sets, commit

use std::collections::{HashMap, HashSet};

use rayon::prelude::*;
use tracing::{debug, trace};

use crate::error::Result;
use crate::transaction::{is_valid_transaction, transaction_id};
use crate::types::{Hash, Natural, Transaction, UtxoKey};
use crate::utxo::UtxoSet;

/// ResolveEpoch: 𝒰𝒮 × 𝒯𝒳* → 𝒯𝒳* × 𝒰𝒮
///
/// For UTXO set us and an unordered batch of proposed transactions:
/// 1. De-duplicate the batch by transaction id, first occurrence wins
/// 2. Keep the individually valid candidates (CheckTransaction against us)
/// 3. Build the conflict graph: candidates are adjacent iff their
///    consumed outpoint sets intersect
/// 4. Enumerate maximal independent sets of the conflict graph
/// 5. Select the largest one; ties fall back to earliest batch order
/// 6. Commit the selection, in batch order, against a private copy of us
///
/// The returned transactions are pairwise non-conflicting, each valid at
/// its position in the returned order, and the set is maximal: no
/// rejected candidate could be added without a conflict or an individual
/// validity violation. Only outpoints present in the starting set are
/// spendable within one epoch; a transaction spending another batch
/// member's outputs waits for a later epoch.
///
/// The caller's set is never mutated. Partial failure is not a fault:
/// transactions that lose a conflict or fail validation are simply absent
/// from the accepted sequence.
pub fn resolve_epoch(
    utxo_set: &UtxoSet,
    batch: &[Transaction],
) -> Result<(Vec<Transaction>, UtxoSet)> {
    let mut pool = utxo_set.clone();
    if batch.is_empty() {
        return Ok((Vec::new(), pool));
    }

    // Content-identical duplicates are one transaction, not two
    // conflicting ones.
    let mut seen: HashSet<Hash> = HashSet::new();
    let candidates: Vec<&Transaction> = batch
        .iter()
        .filter(|tx| seen.insert(transaction_id(tx)))
        .collect();

    // Individually invalid transactions are out regardless of conflicts.
    // Validation only reads the snapshot, so it parallelizes cleanly.
    let verdicts = candidates
        .par_iter()
        .map(|tx| is_valid_transaction(&pool, tx))
        .collect::<Result<Vec<bool>>>()?;
    let valid: Vec<&Transaction> = candidates
        .iter()
        .zip(&verdicts)
        .filter(|(_, &ok)| ok)
        .map(|(tx, _)| *tx)
        .collect();
    debug!(
        batch = batch.len(),
        candidates = candidates.len(),
        valid = valid.len(),
        "validated epoch candidates"
    );

    let adjacency = conflict_graph(&valid);

    // Conflict-free candidates belong to every maximal independent set;
    // the search only has to cover the conflicted subgraph.
    let conflicted: Vec<usize> = (0..valid.len())
        .filter(|&v| !adjacency[v].is_empty())
        .collect();
    trace!(conflicted = conflicted.len(), "built conflict graph");

    let chosen = if conflicted.is_empty() {
        Vec::new()
    } else {
        select_candidate(maximal_independent_sets(&conflicted, &adjacency))
    };

    let mut accepted_indices: Vec<usize> = (0..valid.len())
        .filter(|&v| adjacency[v].is_empty())
        .chain(chosen)
        .collect();
    accepted_indices.sort_unstable();

    let mut accepted = Vec::with_capacity(accepted_indices.len());
    for v in accepted_indices {
        apply_transaction(&mut pool, valid[v])?;
        accepted.push(valid[v].clone());
    }

    debug!(accepted = accepted.len(), "resolved epoch");
    Ok((accepted, pool))
}

/// ApplyTransaction: 𝒰𝒮 × 𝒯𝒳 → 𝒰𝒮
///
/// Remove every outpoint the transaction consumes, then record each of
/// its outputs as unspent under (id, position).
pub fn apply_transaction(pool: &mut UtxoSet, tx: &Transaction) -> Result<()> {
    for input in &tx.inputs {
        pool.remove(&input.prevout);
    }

    let txid = transaction_id(tx);
    for (i, output) in tx.outputs.iter().enumerate() {
        pool.insert(
            UtxoKey {
                txid,
                index: i as Natural,
            },
            output.clone(),
        )?;
    }
    Ok(())
}

/// Conflict graph over the candidates: group the claimants of every
/// consumed outpoint; any outpoint claimed by more than one candidate
/// makes all of its claimants pairwise adjacent.
fn conflict_graph(candidates: &[&Transaction]) -> Vec<HashSet<usize>> {
    let mut claimants: HashMap<&UtxoKey, Vec<usize>> = HashMap::new();
    for (v, tx) in candidates.iter().enumerate() {
        for input in &tx.inputs {
            claimants.entry(&input.prevout).or_default().push(v);
        }
    }

    let mut adjacency: Vec<HashSet<usize>> = vec![HashSet::new(); candidates.len()];
    for group in claimants.values() {
        if group.len() > 1 {
            for &a in group {
                for &b in group {
                    if a != b {
                        adjacency[a].insert(b);
                    }
                }
            }
        }
    }
    adjacency
}

/// Maximal independent sets of the conflict graph, restricted to
/// `vertices`. An independent set is a clique of the complement graph,
/// so this runs Bron–Kerbosch over complement adjacency. Each returned
/// set is sorted.
fn maximal_independent_sets(
    vertices: &[usize],
    conflicts: &[HashSet<usize>],
) -> Vec<Vec<usize>> {
    let complement: HashMap<usize, HashSet<usize>> = vertices
        .iter()
        .map(|&v| {
            let neighbours = vertices
                .iter()
                .copied()
                .filter(|&u| u != v && !conflicts[v].contains(&u))
                .collect();
            (v, neighbours)
        })
        .collect();

    let mut found = Vec::new();
    bron_kerbosch(
        &mut Vec::new(),
        vertices.iter().copied().collect(),
        HashSet::new(),
        &complement,
        &mut found,
    );
    found
}

/// Bron–Kerbosch with pivoting. Reports every maximal clique of the
/// graph given by `neighbours` exactly once.
fn bron_kerbosch(
    taken: &mut Vec<usize>,
    remaining: HashSet<usize>,
    excluded: HashSet<usize>,
    neighbours: &HashMap<usize, HashSet<usize>>,
    found: &mut Vec<Vec<usize>>,
) {
    if remaining.is_empty() && excluded.is_empty() {
        let mut set = taken.clone();
        set.sort_unstable();
        found.push(set);
        return;
    }

    // Expand only vertices outside the pivot's neighbourhood; cliques
    // through the pivot's neighbours are found via the pivot itself.
    let pivot_neighbours = remaining
        .iter()
        .chain(excluded.iter())
        .max_by_key(|&&u| neighbours[&u].intersection(&remaining).count())
        .map(|u| neighbours[u].clone())
        .unwrap_or_default();
    let expand: Vec<usize> = remaining
        .iter()
        .copied()
        .filter(|v| !pivot_neighbours.contains(v))
        .collect();

    let mut remaining = remaining;
    let mut excluded = excluded;
    for v in expand {
        let n = &neighbours[&v];
        taken.push(v);
        bron_kerbosch(
            taken,
            remaining.intersection(n).copied().collect(),
            excluded.intersection(n).copied().collect(),
            neighbours,
            found,
        );
        taken.pop();
        remaining.remove(&v);
        excluded.insert(v);
    }
}

/// The largest set wins; equal sizes fall back to the earliest batch
/// order, i.e. the lexicographically smallest sorted index sequence.
/// This makes the resolution deterministic for downstream consumers.
fn select_candidate(mut sets: Vec<Vec<usize>>) -> Vec<usize> {
    sets.sort_by(|a, b| b.len().cmp(&a.len()).then_with(|| a.cmp(b)));
    sets.into_iter().next().unwrap_or_default()
}
