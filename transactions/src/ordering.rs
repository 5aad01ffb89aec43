//! Topological ordering of a transaction batch.

use std::collections::{HashMap, HashSet};

use dashkit_types::TxHash;

use crate::FullTransaction;

/// Orders `transactions` so every parent in the batch precedes the children
/// spending it. Unrelated transactions keep their relative order.
pub fn in_topological_order(transactions: Vec<FullTransaction>) -> Vec<FullTransaction> {
    let positions: HashMap<TxHash, usize> = transactions
        .iter()
        .enumerate()
        .map(|(i, tx)| (tx.hash(), i))
        .collect();

    let mut visited = HashSet::with_capacity(transactions.len());
    let mut order = Vec::with_capacity(transactions.len());

    for start in 0..transactions.len() {
        // Iterative post-order DFS over in-batch parents.
        let mut stack = vec![(start, false)];
        while let Some((index, expanded)) = stack.pop() {
            if expanded {
                order.push(index);
                continue;
            }
            if !visited.insert(index) {
                continue;
            }
            stack.push((index, true));
            for input in transactions[index].inputs.iter().rev() {
                if let Some(&parent) = positions.get(&input.previous_output.hash) {
                    if !visited.contains(&parent) {
                        stack.push((parent, false));
                    }
                }
            }
        }
    }

    let mut slots: Vec<Option<FullTransaction>> = transactions.into_iter().map(Some).collect();
    order
        .into_iter()
        .filter_map(|index| slots[index].take())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{script, Input, Outpoint, Output, Transaction};

    fn tx(parents: &[TxHash], marker: u8) -> FullTransaction {
        let inputs = if parents.is_empty() {
            vec![Input::new(Outpoint::new(TxHash::new([marker; 32]), 0), vec![], 0)]
        } else {
            parents
                .iter()
                .map(|p| Input::new(Outpoint::new(*p, 0), vec![], 0))
                .collect()
        };
        FullTransaction::new(
            Transaction::new(1, 0, u32::from(marker)),
            inputs,
            vec![Output::new(1, 0, script::p2pkh(&[marker; 20]))],
        )
    }

    #[test]
    fn parents_precede_children() {
        let a = tx(&[], 1);
        let b = tx(&[a.hash()], 2);
        let c = tx(&[b.hash()], 3);
        let sorted = in_topological_order(vec![c.clone(), b.clone(), a.clone()]);
        let hashes: Vec<_> = sorted.iter().map(|t| t.hash()).collect();
        assert_eq!(hashes, vec![a.hash(), b.hash(), c.hash()]);
    }

    #[test]
    fn unrelated_keep_order() {
        let a = tx(&[], 1);
        let b = tx(&[], 2);
        let sorted = in_topological_order(vec![b.clone(), a.clone()]);
        assert_eq!(sorted[0].hash(), b.hash());
        assert_eq!(sorted[1].hash(), a.hash());
    }

    #[test]
    fn diamond_dependency() {
        let root = tx(&[], 1);
        let left = tx(&[root.hash()], 2);
        let right = tx(&[root.hash()], 3);
        let join = tx(&[left.hash(), right.hash()], 4);
        let sorted = in_topological_order(vec![join.clone(), right.clone(), left.clone(), root.clone()]);
        let pos = |h: TxHash| sorted.iter().position(|t| t.hash() == h).unwrap();
        assert_eq!(sorted.len(), 4);
        assert!(pos(root.hash()) < pos(left.hash()));
        assert!(pos(root.hash()) < pos(right.hash()));
        assert!(pos(left.hash()) < pos(join.hash()));
        assert!(pos(right.hash()) < pos(join.hash()));
    }
}
