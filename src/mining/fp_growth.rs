//! Prefix-tree (FP-Growth) frequent itemset miner.
//!
//! Transactions are compressed into a tree whose paths share common prefixes,
//! items ordered by descending frequency. Mining walks the header table from the
//! least frequent item upwards, building a conditional tree for each suffix.
//! Items that are infrequent together with the current suffix never enter the
//! conditional tree, so no superset of an infrequent itemset is ever counted.

use std::collections::HashMap;

use super::{EncodedCorpus, ItemId, RawItemset, SupportThreshold};

const ROOT: usize = 0;

#[derive(Debug)]
struct FpNode {
    item: ItemId,
    count: usize,
    parent: usize,
    children: Vec<(ItemId, usize)>,
}

#[derive(Debug, Clone, Copy)]
struct HeaderEntry {
    item: ItemId,
    count: usize,
}

#[derive(Debug)]
struct FpTree {
    nodes: Vec<FpNode>,
    /// Frequent items, most frequent first.
    header: Vec<HeaderEntry>,
    /// Every node carrying a given item.
    links: HashMap<ItemId, Vec<usize>>,
}

impl FpTree {
    /// Builds a tree from weighted item paths, keeping only items that pass `threshold`.
    fn build<P: AsRef<[ItemId]>>(paths: &[(P, usize)], threshold: SupportThreshold) -> Self {
        let mut counts: HashMap<ItemId, usize> = HashMap::new();
        for (path, weight) in paths {
            for &item in path.as_ref() {
                *counts.entry(item).or_insert(0) += weight;
            }
        }

        let mut header: Vec<HeaderEntry> = counts
            .into_iter()
            .filter(|&(_, count)| threshold.is_frequent(count))
            .map(|(item, count)| HeaderEntry { item, count })
            .collect();
        // Ties broken by id so the tree shape never depends on hash order.
        header.sort_by(|a, b| b.count.cmp(&a.count).then(a.item.cmp(&b.item)));
        let rank: HashMap<ItemId, usize> = header
            .iter()
            .enumerate()
            .map(|(position, entry)| (entry.item, position))
            .collect();

        let mut tree = FpTree {
            nodes: vec![FpNode {
                item: ItemId::MAX,
                count: 0,
                parent: ROOT,
                children: Vec::new(),
            }],
            header,
            links: HashMap::new(),
        };

        let mut ordered: Vec<ItemId> = Vec::new();
        for (path, weight) in paths {
            ordered.clear();
            ordered.extend(path.as_ref().iter().copied().filter(|item| rank.contains_key(item)));
            if ordered.is_empty() {
                continue;
            }
            ordered.sort_by_key(|item| rank[item]);
            tree.insert(&ordered, *weight);
        }
        tree
    }

    fn insert(&mut self, items: &[ItemId], weight: usize) {
        let mut current = ROOT;
        for &item in items {
            let existing = self.nodes[current]
                .children
                .iter()
                .find(|(child_item, _)| *child_item == item)
                .map(|&(_, index)| index);
            current = match existing {
                Some(index) => {
                    self.nodes[index].count += weight;
                    index
                }
                None => {
                    let index = self.nodes.len();
                    self.nodes.push(FpNode {
                        item,
                        count: weight,
                        parent: current,
                        children: Vec::new(),
                    });
                    self.nodes[current].children.push((item, index));
                    self.links.entry(item).or_default().push(index);
                    index
                }
            };
        }
    }

    fn is_empty(&self) -> bool {
        self.header.is_empty()
    }

    /// Prefix paths ending just above each node of `item`, weighted by that node's count.
    fn conditional_pattern_base(&self, item: ItemId) -> Vec<(Vec<ItemId>, usize)> {
        let Some(nodes) = self.links.get(&item) else {
            return Vec::new();
        };
        nodes
            .iter()
            .filter_map(|&index| {
                let node = &self.nodes[index];
                let mut path = Vec::new();
                let mut cursor = node.parent;
                while cursor != ROOT {
                    path.push(self.nodes[cursor].item);
                    cursor = self.nodes[cursor].parent;
                }
                if path.is_empty() {
                    None
                } else {
                    Some((path, node.count))
                }
            })
            .collect()
    }
}

fn mine_tree(
    tree: &FpTree,
    suffix: &mut Vec<ItemId>,
    threshold: SupportThreshold,
    max_len: Option<usize>,
    out: &mut Vec<RawItemset>,
) {
    for entry in tree.header.iter().rev() {
        suffix.push(entry.item);
        out.push((suffix.clone(), entry.count));

        if max_len.map_or(true, |limit| suffix.len() < limit) {
            let base = tree.conditional_pattern_base(entry.item);
            if !base.is_empty() {
                let conditional = FpTree::build(&base, threshold);
                if !conditional.is_empty() {
                    mine_tree(&conditional, suffix, threshold, max_len, out);
                }
            }
        }
        suffix.pop();
    }
}

pub(crate) fn mine(
    corpus: &EncodedCorpus,
    threshold: SupportThreshold,
    max_len: Option<usize>,
) -> Vec<RawItemset> {
    let paths: Vec<(&[ItemId], usize)> = corpus
        .transactions()
        .iter()
        .map(|transaction| (transaction.as_slice(), 1))
        .collect();
    let tree = FpTree::build(&paths, threshold);

    let mut out = Vec::new();
    let mut suffix = Vec::new();
    mine_tree(&tree, &mut suffix, threshold, max_len, &mut out);
    out
}
