//! Identity-keyed registries with deterministic iteration order.
//!
//! Entries are keyed by their identity alone; an incoming entry with an
//! identity already present replaces the stored one wholesale.

use std::collections::BTreeMap;

use dashkit_types::{Masternode, Quorum, QuorumId, TxHash};

/// An entry with a registry identity.
pub trait Identified {
    type Id: Ord + Clone;

    fn identity(&self) -> Self::Id;
}

impl Identified for Masternode {
    type Id = TxHash;

    fn identity(&self) -> TxHash {
        self.pro_reg_tx_hash
    }
}

impl Identified for Quorum {
    type Id = QuorumId;

    fn identity(&self) -> QuorumId {
        QuorumId::new(self.quorum_type, self.quorum_hash)
    }
}

#[derive(Clone, Debug)]
pub struct SortedList<T: Identified> {
    entries: BTreeMap<T::Id, T>,
}

pub type MasternodeSortedList = SortedList<Masternode>;
pub type QuorumSortedList = SortedList<Quorum>;

impl<T: Identified> Default for SortedList<T> {
    fn default() -> Self {
        Self {
            entries: BTreeMap::new(),
        }
    }
}

impl<T: Identified + Clone> SortedList<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, items: impl IntoIterator<Item = T>) {
        for item in items {
            self.entries.insert(item.identity(), item);
        }
    }

    pub fn remove(&mut self, items: &[T]) {
        for item in items {
            self.entries.remove(&item.identity());
        }
    }

    pub fn remove_by_ids<'a>(&mut self, ids: impl IntoIterator<Item = &'a T::Id>)
    where
        T::Id: 'a,
    {
        for id in ids {
            self.entries.remove(id);
        }
    }

    pub fn remove_all(&mut self) {
        self.entries.clear();
    }

    pub fn contains(&self, id: &T::Id) -> bool {
        self.entries.contains_key(id)
    }

    pub fn get(&self, id: &T::Id) -> Option<&T> {
        self.entries.get(id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries in ascending identity order.
    pub fn items(&self) -> Vec<T> {
        self.entries.values().cloned().collect()
    }
}

impl<T: Identified + Clone> FromIterator<T> for SortedList<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut list = Self::new();
        list.add(iter);
        list
    }
}
