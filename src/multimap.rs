/*
   Copyright 2024 James Forster

   This file is part of intervalidus.

   intervalidus is free software: you can redistribute it and/or
   modify it under the terms of the GNU Affero General Public License
   as published by the Free Software Foundation, either version 3 of
   the License, or (at your option) any later version.

   intervalidus is distributed in the hope that it will be useful,
   but WITHOUT ANY WARRANTY; without even the implied warranty of
   MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE. See the GNU
   Affero General Public License for more details.

   You should have received a copy of the GNU Affero General Public
   License along with intervalidus. If not, see
   <https://www.gnu.org/licenses/>.
*/

use std::collections::{BTreeMap, BTreeSet};

/// A sorted multimap: each key owns a sorted set of values. Ascending
/// iteration on both levels is what makes compression deterministic.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SortedMultiMap<K, V> {
    inner: BTreeMap<K, BTreeSet<V>>,
}

impl<K: Ord, V: Ord> SortedMultiMap<K, V> {
    pub fn new() -> Self {
        Self {
            inner: BTreeMap::new(),
        }
    }

    /// `false` when the pairing was already present.
    pub fn add(&mut self, key: K, value: V) -> bool {
        self.inner.entry(key).or_default().insert(value)
    }

    /// Removes one pairing, dropping the key once its set drains.
    /// `false` when the pairing was absent.
    pub fn remove(&mut self, key: &K, value: &V) -> bool {
        let Some(values) = self.inner.get_mut(key) else {
            return false;
        };
        let removed = values.remove(value);
        if values.is_empty() {
            self.inner.remove(key);
        }
        removed
    }

    /// The values of one key, ascending.
    pub fn get(&self, key: &K) -> impl Iterator<Item = &V> {
        self.inner.get(key).into_iter().flatten()
    }

    /// All keys with at least one value, ascending.
    pub fn keys(&self) -> impl Iterator<Item = &K> {
        self.inner.keys()
    }

    /// Total pairing count across all keys.
    pub fn value_count(&self) -> usize {
        self.inner.values().map(BTreeSet::len).sum()
    }

    pub fn clear(&mut self) {
        self.inner.clear();
    }
}

impl<K: Ord, V: Ord> Default for SortedMultiMap<K, V> {
    fn default() -> Self {
        Self::new()
    }
}
