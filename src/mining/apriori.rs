//! Level-wise (Apriori) frequent itemset miner.
//!
//! Candidates of size k+1 are joined from frequent k-itemsets sharing their
//! first k-1 items, and discarded unless every k-subset is frequent. Counts
//! come from intersecting the sorted transaction-id lists of the two parents.

use std::collections::HashSet;

use super::{EncodedCorpus, ItemId, RawItemset, SupportThreshold};

type TidList = Vec<u32>;

fn intersect(left: &[u32], right: &[u32]) -> TidList {
    let mut out = Vec::with_capacity(left.len().min(right.len()));
    let (mut i, mut j) = (0, 0);
    while i < left.len() && j < right.len() {
        match left[i].cmp(&right[j]) {
            std::cmp::Ordering::Less => i += 1,
            std::cmp::Ordering::Greater => j += 1,
            std::cmp::Ordering::Equal => {
                out.push(left[i]);
                i += 1;
                j += 1;
            }
        }
    }
    out
}

/// The two subsets obtained by dropping either of the last two items are the
/// join parents and are frequent by construction.
fn all_subsets_frequent(candidate: &[ItemId], frequent: &HashSet<&[ItemId]>) -> bool {
    let k = candidate.len();
    let mut subset = Vec::with_capacity(k - 1);
    (0..k.saturating_sub(2)).all(|skip| {
        subset.clear();
        subset.extend(
            candidate
                .iter()
                .enumerate()
                .filter(|&(position, _)| position != skip)
                .map(|(_, &item)| item),
        );
        frequent.contains(subset.as_slice())
    })
}

pub(crate) fn mine(
    corpus: &EncodedCorpus,
    threshold: SupportThreshold,
    max_len: Option<usize>,
) -> Vec<RawItemset> {
    let mut tidlists: Vec<TidList> = vec![Vec::new(); corpus.vocabulary_len()];
    for (tid, transaction) in corpus.transactions().iter().enumerate() {
        for &item in transaction {
            tidlists[item as usize].push(tid as u32);
        }
    }

    // Level 1, ordered by id.
    let mut level: Vec<(Vec<ItemId>, TidList)> = tidlists
        .into_iter()
        .enumerate()
        .filter(|(_, tids)| threshold.is_frequent(tids.len()))
        .map(|(item, tids)| (vec![item as ItemId], tids))
        .collect();

    let mut out: Vec<RawItemset> = level
        .iter()
        .map(|(items, tids)| (items.clone(), tids.len()))
        .collect();

    let mut size = 1;
    while !level.is_empty() && max_len.map_or(true, |limit| size < limit) {
        let next = {
            let known: HashSet<&[ItemId]> = level.iter().map(|(items, _)| items.as_slice()).collect();
            let mut next: Vec<(Vec<ItemId>, TidList)> = Vec::new();
            for (i, (left, left_tids)) in level.iter().enumerate() {
                for (right, right_tids) in &level[i + 1..] {
                    // Levels stay lexicographically sorted, so the shared-prefix block is contiguous.
                    if left[..size - 1] != right[..size - 1] {
                        break;
                    }
                    let mut candidate = left.clone();
                    candidate.push(right[size - 1]);
                    if !all_subsets_frequent(&candidate, &known) {
                        continue;
                    }
                    let tids = intersect(left_tids, right_tids);
                    if threshold.is_frequent(tids.len()) {
                        next.push((candidate, tids));
                    }
                }
            }
            next
        };

        out.extend(next.iter().map(|(items, tids)| (items.clone(), tids.len())));
        level = next;
        size += 1;
    }
    out
}
