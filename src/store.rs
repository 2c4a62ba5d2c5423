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

use std::collections::BTreeMap;

use itertools::{EitherOrBoth, Itertools};
use serde::{Deserialize, Serialize};

use crate::box_tree::{BoxTree, BoxedPayload};
use crate::config::StoreConfig;
use crate::data::ValidData;
use crate::diff::DiffAction;
use crate::dimensional::{IntervalType, ValueType};
use crate::error::StoreError;
use crate::geometry::DataBox;
use crate::interval::Interval;
use crate::interval2::Interval2;
use crate::interval3::Interval3;
use crate::multimap::SortedMultiMap;

/// One-dimensional store.
pub type DataIn1D<T, V> = DataStore<Interval<T>, V>;
/// Two-dimensional store.
pub type DataIn2D<A, B, V> = DataStore<Interval2<A, B>, V>;
/// Three-dimensional store.
pub type DataIn3D<A, B, C, V> = DataStore<Interval3<A, B, C>, V>;

/// A partial function from points to values, stored as a disjoint
/// set of interval-value records.
///
/// Three indices are kept in lockstep: an ordered map keyed by each
/// record's interval start (iteration order), a value multi-index
/// (compression order), and a box search tree over the conservative
/// hash boxes (interval queries). Mutating operations keep all three
/// coherent and every record interval disjoint from the others.
///
/// Mutations work in place; for the immutable style, `Clone` first;
/// the clone shares nothing with its source, so either side can keep
/// mutating without affecting the other. Concurrent readers of one
/// unchanging store are fine, anything else needs outside
/// synchronization.
#[derive(Clone, Debug)]
pub struct DataStore<I: IntervalType, V: ValueType> {
    records: BTreeMap<I::Point, ValidData<I, V>>,
    by_value: SortedMultiMap<V, I::Point>,
    tree: BoxTree<I::Point>,
    config: StoreConfig,
}

impl<I: IntervalType, V: ValueType> DataStore<I, V> {
    pub fn new() -> Self {
        Self::with_config(StoreConfig::default())
    }

    pub fn with_config(config: StoreConfig) -> Self {
        Self {
            records: BTreeMap::new(),
            by_value: SortedMultiMap::new(),
            tree: BoxTree::new(I::DIM, config.node_capacity, config.depth_limit),
            config,
        }
    }

    /// A store where `value` is valid everywhere.
    pub fn of(value: V) -> Self {
        let mut store = Self::new();
        store.insert_record(ValidData::new(I::unbounded(), value));
        store
    }

    /// Builds a store from records that must already be disjoint.
    /// Disjointness is fully validated when `require_disjoint` is
    /// set; colliding start keys are rejected either way.
    pub fn from_records(
        records: impl IntoIterator<Item = ValidData<I, V>>,
        config: StoreConfig,
    ) -> Result<Self, StoreError> {
        let mut store = Self::with_config(config);
        for data in records {
            let conflict = store.records.contains_key(&data.interval.start())
                || (store.config.require_disjoint && store.intersects(&data.interval));
            if conflict {
                return Err(StoreError::ArgumentInvalid(format!(
                    "records are not disjoint at {data}"
                )));
            }
            store.insert_record(data);
        }
        Ok(store)
    }

    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    // --- queries ---

    /// The single value valid everywhere, when the store consists of
    /// exactly one unbounded record.
    pub fn get(&self) -> Result<&V, StoreError> {
        let mut values = self.records.values();
        match (values.next(), values.next()) {
            (Some(data), None) if data.interval == I::unbounded() => Ok(&data.value),
            _ => Err(StoreError::NotFound),
        }
    }

    /// [`get`](Self::get) with the failure flattened away.
    pub fn get_option(&self) -> Option<&V> {
        self.get().ok()
    }

    /// The value at a point, if any.
    pub fn get_at(&self, p: &I::Point) -> Option<&V> {
        self.get_data_at(p).map(|data| &data.value)
    }

    /// The record covering a point, if any.
    pub fn get_data_at(&self, p: &I::Point) -> Option<&ValidData<I, V>> {
        self.candidate_keys(&I::point_to_box(p))
            .into_iter()
            .find_map(|key| {
                self.records
                    .get(&key)
                    .filter(|data| data.interval.contains_point(p))
            })
    }

    /// The record stored under an interval start key, if any.
    pub fn get_data_by_key(&self, key: &I::Point) -> Option<&ValidData<I, V>> {
        self.records.get(key)
    }

    /// All records, ascending by interval start.
    pub fn get_all(&self) -> impl Iterator<Item = &ValidData<I, V>> {
        self.records.values()
    }

    /// All records whose interval intersects the query, ascending by
    /// interval start.
    pub fn get_intersecting(&self, interval: &I) -> Vec<&ValidData<I, V>> {
        self.intersecting_keys(interval)
            .into_iter()
            .filter_map(|key| self.records.get(&key))
            .collect()
    }

    pub fn intersects(&self, interval: &I) -> bool {
        !self.intersecting_keys(interval).is_empty()
    }

    pub fn is_defined_at(&self, p: &I::Point) -> bool {
        self.get_at(p).is_some()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// The union of all record intervals as a compressed disjoint
    /// cover, ascending.
    pub fn domain(&self) -> Vec<I> {
        let mut unit: DataStore<I, ()> = DataStore::with_config(self.config.clone());
        for data in self.records.values() {
            unit.insert_record(ValidData::new(data.interval.clone(), ()));
        }
        unit.compress_all();
        unit.records.into_values().map(|data| data.interval).collect()
    }

    /// Folds over all records in start-ascending order.
    pub fn fold<B>(&self, init: B, mut f: impl FnMut(B, &ValidData<I, V>) -> B) -> B {
        self.records.values().fold(init, |acc, data| f(acc, data))
    }

    /// The minimal Create/Update/Delete sequence that, applied to
    /// `other`, yields `self`. Records pair up by start key; actions
    /// come out ascending by key.
    pub fn diff_actions_from(&self, other: &Self) -> Vec<DiffAction<I, V>> {
        self.records
            .iter()
            .merge_join_by(other.records.iter(), |(mine, _), (theirs, _)| {
                mine.cmp(theirs)
            })
            .filter_map(|pair| match pair {
                EitherOrBoth::Left((_, data)) => Some(DiffAction::Create {
                    valid_data: data.clone(),
                }),
                EitherOrBoth::Right((key, _)) => Some(DiffAction::Delete { key: key.clone() }),
                EitherOrBoth::Both((_, mine), (_, theirs)) => {
                    (mine != theirs).then(|| DiffAction::Update {
                        valid_data: mine.clone(),
                    })
                }
            })
            .collect()
    }

    // --- mutations ---

    /// Makes `data.value` valid over exactly `data.interval`:
    /// existing coverage there is cut away first, then the value's
    /// records are compressed.
    pub fn set(&mut self, data: ValidData<I, V>) {
        self.remove(&data.interval);
        let value = data.value.clone();
        self.insert_record(data);
        self.compress(&value);
    }

    /// Like [`set`](Self::set), but leaves the store untouched and
    /// answers `false` when anything already intersects the interval.
    pub fn set_if_no_conflict(&mut self, data: ValidData<I, V>) -> bool {
        if self.intersects(&data.interval) {
            return false;
        }
        let value = data.value.clone();
        self.insert_record(data);
        self.compress(&value);
        true
    }

    /// Clears all coverage of an interval, splitting boundary records
    /// into their remainders.
    pub fn remove(&mut self, interval: &I) {
        for key in self.intersecting_keys(interval) {
            let Some(old) = self.take_record(&key) else {
                continue;
            };
            for piece in old.interval.excluding(interval) {
                self.insert_record(ValidData::new(piece, old.value.clone()));
            }
        }
    }

    /// Rewrites existing coverage of `data.interval` to `data.value`,
    /// without introducing coverage where there was none. Remainders
    /// of split records keep their old value.
    pub fn update(&mut self, data: ValidData<I, V>) {
        if self.config.brute_force_update {
            if self.config.print_experimental {
                log::debug!("update: brute force path for {data}");
            }
            self.update_brute_force(data);
        } else {
            self.update_in_place(data);
        }
    }

    fn update_brute_force(&mut self, data: ValidData<I, V>) {
        for key in self.intersecting_keys(&data.interval) {
            let Some(old) = self.records.get(&key) else {
                continue;
            };
            // overlap already carries the value, remainders keep it
            if old.value == data.value {
                continue;
            }
            let Some(old) = self.take_record(&key) else {
                continue;
            };
            for piece in old.interval.excluding(&data.interval) {
                self.insert_record(ValidData::new(piece, old.value.clone()));
            }
            if let Some(overlap) = old.interval.intersection(&data.interval) {
                self.insert_record(ValidData::new(overlap, data.value.clone()));
            }
        }
        self.compress(&data.value);
    }

    fn update_in_place(&mut self, data: ValidData<I, V>) {
        for key in self.intersecting_keys(&data.interval) {
            let Some(old) = self.records.get(&key) else {
                continue;
            };
            // overlap already carries the value, remainders keep it
            if old.value == data.value {
                continue;
            }
            if data.interval.contains_interval(&old.interval) {
                // whole record flips value; keys and boxes are
                // untouched so only the value index moves
                if self.config.print_experimental {
                    log::debug!("update: in-place value flip at {old}");
                }
                let old_value = old.value.clone();
                self.by_value.remove(&old_value, &key);
                self.by_value.add(data.value.clone(), key.clone());
                if let Some(record) = self.records.get_mut(&key) {
                    record.value = data.value.clone();
                }
            } else {
                let Some(old) = self.take_record(&key) else {
                    continue;
                };
                for piece in old.interval.excluding(&data.interval) {
                    self.insert_record(ValidData::new(piece, old.value.clone()));
                }
                if let Some(overlap) = old.interval.intersection(&data.interval) {
                    self.insert_record(ValidData::new(overlap, data.value.clone()));
                }
            }
        }
        self.compress(&data.value);
    }

    /// Deletes the record keyed like `old`, then sets `new`.
    pub fn replace(&mut self, old: &ValidData<I, V>, new: ValidData<I, V>) {
        self.replace_by_key(&old.interval.start(), new);
    }

    /// Deletes the record at `key`, then sets `new`.
    pub fn replace_by_key(&mut self, key: &I::Point, new: ValidData<I, V>) {
        self.take_record(key);
        self.set(new);
    }

    /// Sets `data.value` only over the parts of `data.interval` that
    /// are currently uncovered.
    pub fn fill(&mut self, data: ValidData<I, V>) {
        let mut pieces = vec![data.interval.clone()];
        for key in self.intersecting_keys(&data.interval) {
            let Some(existing) = self.records.get(&key) else {
                continue;
            };
            pieces = pieces
                .into_iter()
                .flat_map(|piece| piece.excluding(&existing.interval))
                .collect();
        }
        for piece in pieces {
            self.insert_record(ValidData::new(piece, data.value.clone()));
        }
        self.compress(&data.value);
    }

    /// Folds another store into this one: values combine through
    /// `merge_op(existing, incoming)` where both are defined, and
    /// incoming records fill whatever they cover that was empty.
    pub fn merge(&mut self, other: &Self, merge_op: impl Fn(&V, &V) -> V) {
        let incoming: Vec<ValidData<I, V>> = other.records.values().cloned().collect();
        for data in incoming {
            let combined: Vec<ValidData<I, V>> = self
                .intersecting_keys(&data.interval)
                .into_iter()
                .filter_map(|key| {
                    let existing = self.records.get(&key)?;
                    let overlap = existing.interval.intersection(&data.interval)?;
                    Some(ValidData::new(
                        overlap,
                        merge_op(&existing.value, &data.value),
                    ))
                })
                .collect();
            for piece in combined {
                self.update(piece);
            }
            self.fill(data);
        }
    }

    /// Repeatedly joins joinable records of one value, walking them
    /// ascending by start. Idempotent.
    pub fn compress(&mut self, value: &V) {
        loop {
            let keys: Vec<I::Point> = self.by_value.get(value).cloned().collect();
            let mut joinable = None;
            'search: for (i, a_key) in keys.iter().enumerate() {
                for b_key in &keys[i + 1..] {
                    let (Some(a), Some(b)) =
                        (self.records.get(a_key), self.records.get(b_key))
                    else {
                        continue;
                    };
                    if a.interval.is_joinable_with(&b.interval) {
                        joinable = Some((a_key.clone(), b_key.clone()));
                        break 'search;
                    }
                }
            }
            let Some((a_key, b_key)) = joinable else {
                break;
            };
            let (Some(a), Some(b)) = (self.take_record(&a_key), self.take_record(&b_key)) else {
                break;
            };
            self.insert_record(ValidData::new(a.interval.join_with(&b.interval), a.value));
        }
    }

    /// Compresses every distinct value once.
    pub fn compress_all(&mut self) {
        let values: Vec<V> = self.by_value.keys().cloned().collect();
        for value in values {
            self.compress(&value);
        }
    }

    /// Decomposes the partition into the atoms of the common axis
    /// grid, then compresses everything, yielding the canonical
    /// physical form: logically equal stores come out with identical
    /// records.
    pub fn recompress_all(&mut self) {
        let grid: Vec<I> = self.records.values().map(|data| data.interval.clone()).collect();
        let entries: Vec<ValidData<I, V>> =
            std::mem::take(&mut self.records).into_values().collect();
        self.by_value.clear();
        self.tree = BoxTree::new(I::DIM, self.config.node_capacity, self.config.depth_limit);
        for data in entries {
            for atom in data.interval.refined_by(&grid) {
                self.insert_record(ValidData::new(atom, data.value.clone()));
            }
        }
        self.compress_all();
    }

    /// Drops every record that fails the predicate.
    pub fn filter(&mut self, pred: impl Fn(&ValidData<I, V>) -> bool) {
        let doomed: Vec<I::Point> = self
            .records
            .values()
            .filter(|data| !pred(data))
            .map(|data| data.interval.start())
            .collect();
        for key in doomed {
            self.take_record(&key);
        }
    }

    /// A new store with every record transformed. Fails fast when the
    /// mapping makes intervals overlap; the result is compressed.
    pub fn map<J, W, F>(&self, f: F) -> Result<DataStore<J, W>, StoreError>
    where
        J: IntervalType,
        W: ValueType,
        F: Fn(&ValidData<I, V>) -> ValidData<J, W>,
    {
        self.flat_map(|data| Some(f(data)))
    }

    /// A new store with the values transformed and the intervals
    /// untouched; compressed, since merging values can make neighbors
    /// joinable.
    pub fn map_values<W, F>(&self, f: F) -> DataStore<I, W>
    where
        W: ValueType,
        F: Fn(&V) -> W,
    {
        let mut out = DataStore::with_config(self.config.clone());
        for data in self.records.values() {
            out.insert_record(ValidData::new(data.interval.clone(), f(&data.value)));
        }
        out.compress_all();
        out
    }

    /// A new store with every record expanded to any number of
    /// records. Fails fast when the produced intervals overlap.
    pub fn flat_map<J, W, F, R>(&self, f: F) -> Result<DataStore<J, W>, StoreError>
    where
        J: IntervalType,
        W: ValueType,
        F: Fn(&ValidData<I, V>) -> R,
        R: IntoIterator<Item = ValidData<J, W>>,
    {
        let mut out = DataStore::with_config(self.config.clone());
        for data in self.records.values().flat_map(|data| f(data)) {
            if let Some(existing) = out.get_intersecting(&data.interval).first() {
                return Err(StoreError::DisjointnessViolated {
                    first: data.to_string(),
                    second: existing.to_string(),
                });
            }
            out.insert_record(data);
        }
        out.compress_all();
        Ok(out)
    }

    /// Replays diff actions: `Create` inserts, `Update` replaces by
    /// its record's start key, `Delete` removes by key.
    pub fn apply_diff_actions(&mut self, actions: impl IntoIterator<Item = DiffAction<I, V>>) {
        for action in actions {
            match action {
                DiffAction::Create { valid_data } => self.insert_record(valid_data),
                DiffAction::Update { valid_data } => {
                    self.take_record(&valid_data.interval.start());
                    self.insert_record(valid_data);
                }
                DiffAction::Delete { key } => {
                    self.take_record(&key);
                }
            }
        }
    }

    /// Makes this store record-identical to `other`.
    pub fn sync_with(&mut self, other: &Self) {
        self.apply_diff_actions(other.diff_actions_from(self));
    }

    // --- zipping ---

    /// Pairs up values over every non-empty intersection of a record
    /// from each side.
    pub fn zip<W: ValueType>(&self, other: &DataStore<I, W>) -> DataStore<I, (V, W)> {
        let mut out = DataStore::with_config(self.config.clone());
        for a in self.records.values() {
            for key in other.intersecting_keys(&a.interval) {
                let Some(b) = other.records.get(&key) else {
                    continue;
                };
                if let Some(overlap) = a.interval.intersection(&b.interval) {
                    out.insert_record(ValidData::new(
                        overlap,
                        (a.value.clone(), b.value.clone()),
                    ));
                }
            }
        }
        out
    }

    /// [`zip`](Self::zip), plus records over the parts covered by
    /// only one side, with the missing half substituted by a default.
    pub fn zip_all<W: ValueType>(
        &self,
        other: &DataStore<I, W>,
        this_default: V,
        other_default: W,
    ) -> DataStore<I, (V, W)> {
        let mut out = self.zip(other);
        for a in self.records.values() {
            for piece in other.uncovered_parts(&a.interval) {
                out.insert_record(ValidData::new(
                    piece,
                    (a.value.clone(), other_default.clone()),
                ));
            }
        }
        for b in other.records.values() {
            for piece in self.uncovered_parts(&b.interval) {
                out.insert_record(ValidData::new(
                    piece,
                    (this_default.clone(), b.value.clone()),
                ));
            }
        }
        out
    }

    /// The parts of an interval this store does not cover.
    fn uncovered_parts(&self, interval: &I) -> Vec<I> {
        let mut pieces = vec![interval.clone()];
        for key in self.intersecting_keys(interval) {
            let Some(existing) = self.records.get(&key) else {
                continue;
            };
            pieces = pieces
                .into_iter()
                .flat_map(|piece| piece.excluding(&existing.interval))
                .collect();
        }
        pieces
    }

    // --- validation ---

    /// Checks every store invariant: key/record agreement, pairwise
    /// disjointness, and value-index/search-tree coherence. Meant for
    /// debugging and tests; operations maintain all of this.
    pub fn validate(&self) -> Result<(), StoreError> {
        for (key, data) in &self.records {
            if *key != data.interval.start() {
                return Err(StoreError::InvariantViolated(format!(
                    "record {data} keyed off its start"
                )));
            }
        }
        let all: Vec<&ValidData<I, V>> = self.records.values().collect();
        for (i, a) in all.iter().enumerate() {
            for b in &all[i + 1..] {
                if a.interval.intersects(&b.interval) {
                    return Err(StoreError::DisjointnessViolated {
                        first: a.to_string(),
                        second: b.to_string(),
                    });
                }
            }
        }
        if self.by_value.value_count() != self.records.len() {
            return Err(StoreError::InvariantViolated(
                "value index size drifted from the record map".to_string(),
            ));
        }
        let value_keys: Vec<(V, I::Point)> = self
            .by_value
            .keys()
            .flat_map(|value| {
                self.by_value
                    .get(value)
                    .map(|key| (value.clone(), key.clone()))
            })
            .collect();
        for (value, key) in value_keys {
            if self.records.get(&key).map(|data| &data.value) != Some(&value) {
                return Err(StoreError::InvariantViolated(format!(
                    "value index pairing {value:?} missing from the record map"
                )));
            }
        }
        let tracked = self.tree.originals();
        if tracked.len() != self.records.len() {
            return Err(StoreError::InvariantViolated(
                "search tree size drifted from the record map".to_string(),
            ));
        }
        for payload in tracked {
            let matches = self
                .records
                .get(payload.payload())
                .is_some_and(|data| data.interval.to_box() == *payload.original_box());
            if !matches {
                return Err(StoreError::InvariantViolated(
                    "search tree payload missing from the record map".to_string(),
                ));
            }
        }
        Ok(())
    }

    // --- index plumbing ---

    pub(crate) fn insert_record(&mut self, data: ValidData<I, V>) {
        let key = data.interval.start();
        self.tree
            .insert(BoxedPayload::new(data.interval.to_box(), key.clone()));
        self.by_value.add(data.value.clone(), key.clone());
        self.records.insert(key, data);
        debug_assert_eq!(self.by_value.value_count(), self.records.len());
    }

    pub(crate) fn take_record(&mut self, key: &I::Point) -> Option<ValidData<I, V>> {
        let data = self.records.remove(key)?;
        self.by_value.remove(&data.value, key);
        self.tree.remove(&data.interval.to_box(), key);
        debug_assert_eq!(self.by_value.value_count(), self.records.len());
        Some(data)
    }

    fn candidate_keys(&self, query: &DataBox) -> Vec<I::Point> {
        if self.config.no_search_tree {
            return self.records.keys().cloned().collect();
        }
        let mut keys: Vec<I::Point> = self
            .tree
            .query(query)
            .into_iter()
            .map(|payload| payload.payload().clone())
            .collect();
        keys.sort();
        keys.dedup();
        keys
    }

    pub(crate) fn intersecting_keys(&self, interval: &I) -> Vec<I::Point> {
        self.candidate_keys(&interval.to_box())
            .into_iter()
            .filter(|key| {
                self.records
                    .get(key)
                    .is_some_and(|data| data.interval.intersects(interval))
            })
            .collect()
    }
}

impl<I: IntervalType, V: ValueType> Default for DataStore<I, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<I: IntervalType, V: ValueType> PartialEq for DataStore<I, V> {
    fn eq(&self, other: &Self) -> bool {
        self.records == other.records
    }
}

impl<I: IntervalType, V: ValueType> Eq for DataStore<I, V> {}

impl<I, V> Serialize for DataStore<I, V>
where
    I: IntervalType + Serialize,
    V: ValueType + Serialize,
{
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(self.records.values())
    }
}

impl<'de, I, V> Deserialize<'de> for DataStore<I, V>
where
    I: IntervalType + Deserialize<'de>,
    V: ValueType + Deserialize<'de>,
{
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let records = Vec::<ValidData<I, V>>::deserialize(deserializer)?;
        let config = StoreConfig {
            require_disjoint: true,
            ..StoreConfig::default()
        };
        Self::from_records(records, config).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interval::{ii, iu, ui, uu};

    fn store1d() -> DataIn1D<i32, String> {
        DataStore::new()
    }

    fn hello_world() -> DataIn1D<i32, String> {
        let mut store = store1d();
        store.set(ValidData::new(ii(0, 9), "Hello".to_string()));
        store.set(ValidData::new(iu(10), "World".to_string()));
        store
    }

    fn rendered(store: &DataIn1D<i32, String>) -> Vec<String> {
        store.get_all().map(|data| data.to_string()).collect()
    }

    #[test]
    fn set_splits_overlapped_records() {
        let mut store = hello_world();
        store.set(ValidData::new(ii(5, 15), "to".to_string()));
        store.set(ValidData::new(ii(20, 25), "!".to_string()));
        assert_eq!(
            rendered(&store),
            vec![
                "[0..4] -> \"Hello\"",
                "[5..15] -> \"to\"",
                "[16..19] -> \"World\"",
                "[20..25] -> \"!\"",
                "[26..+inf] -> \"World\"",
            ]
        );
        store.validate().unwrap();
    }

    #[test]
    fn remove_splits_around_the_hole() {
        let mut store = DataStore::of("v".to_string());
        store.remove(&ii(0, 0));
        assert_eq!(rendered(&store), vec!["[-inf..-1] -> \"v\"", "[1..+inf] -> \"v\""]);
        store.validate().unwrap();
    }

    #[test]
    fn removing_the_domain_maximum_leaves_no_phantom_record() {
        let mut store: DataIn1D<i32, &str> = DataStore::new();
        store.set(ValidData::new(iu(5), "Hello"));
        store.remove(&ii(i32::MAX, i32::MAX));
        let intervals: Vec<Interval<i32>> =
            store.get_all().map(|data| data.interval.clone()).collect();
        assert_eq!(intervals, vec![ii(5, i32::MAX - 1)]);
        store.validate().unwrap();

        let mut store: DataIn1D<i32, &str> = DataStore::new();
        store.set(ValidData::new(ui(5), "Hello"));
        store.remove(&ii(i32::MIN, i32::MIN));
        let intervals: Vec<Interval<i32>> =
            store.get_all().map(|data| data.interval.clone()).collect();
        assert_eq!(intervals, vec![ii(i32::MIN + 1, 5)]);
        store.validate().unwrap();
    }

    #[test]
    fn two_dimensional_hole() {
        let mut store: DataIn2D<i32, i32, String> = DataStore::new();
        store.set(ValidData::new(
            Interval2::new(ii(-14, 14), ii(4, 7)),
            "World".to_string(),
        ));
        store.remove(&Interval2::new(ii(-6, 6), ii(5, 6)));
        let intervals: Vec<Interval2<i32, i32>> =
            store.get_all().map(|data| data.interval.clone()).collect();
        assert_eq!(
            intervals,
            vec![
                Interval2::new(ii(-14, 14), ii(4, 4)),
                Interval2::new(ii(-14, -7), ii(5, 6)),
                Interval2::new(ii(-14, 14), ii(7, 7)),
                Interval2::new(ii(7, 14), ii(5, 6)),
            ]
        );
        store.validate().unwrap();
    }

    #[test]
    fn compression_scenario() {
        let records = vec![
            ValidData::new(ui(4), "Hello".to_string()),
            ValidData::new(ii(5, 5), "World".to_string()),
            ValidData::new(ii(6, 6), "World".to_string()),
            ValidData::new(ii(7, 7), "Hello".to_string()),
            ValidData::new(ii(8, 9), "Hello".to_string()),
            ValidData::new(iu(10), "Hello".to_string()),
        ];
        let mut store = DataStore::from_records(records, StoreConfig::default()).unwrap();
        store.compress(&"Hello".to_string());
        assert_eq!(store.get_all().count(), 4);
        store.compress_all();
        assert_eq!(
            rendered(&store),
            vec![
                "[-inf..4] -> \"Hello\"",
                "[5..6] -> \"World\"",
                "[7..+inf] -> \"Hello\"",
            ]
        );
        store.validate().unwrap();
    }

    #[test]
    fn point_queries() {
        let store = hello_world();
        assert_eq!(store.get_at(&crate::DomainPoint::Point(3)), Some(&"Hello".to_string()));
        assert_eq!(store.get_at(&crate::DomainPoint::Point(100)), Some(&"World".to_string()));
        assert!(store.is_defined_at(&crate::DomainPoint::Top));
        assert!(!store.is_defined_at(&crate::DomainPoint::Point(-1)));
        assert!(store.get_option().is_none());
        assert_eq!(
            DataStore::<Interval<i32>, _>::of(42).get().copied().unwrap(),
            42
        );
    }

    #[test]
    fn intersecting_queries_agree_with_a_scan(){
        let store = hello_world();
        let query = ii(8, 12);
        let scanned: Vec<&ValidData<Interval<i32>, String>> = store
            .get_all()
            .filter(|data| data.interval.intersects(&query))
            .collect();
        assert_eq!(store.get_intersecting(&query), scanned);
        assert_eq!(scanned.len(), 2);
        assert!(store.intersects(&query));
        assert!(!store.intersects(&ii(-10, -1)));
    }

    #[test]
    fn domain_is_a_compressed_cover() {
        let mut store = hello_world();
        store.remove(&ii(3, 4));
        assert_eq!(store.domain(), vec![ii(0, 2), iu(5)]);
    }

    #[test]
    fn set_if_no_conflict_respects_existing_coverage() {
        let mut store = hello_world();
        assert!(!store.set_if_no_conflict(ValidData::new(ii(5, 15), "to".to_string())));
        assert!(store.set_if_no_conflict(ValidData::new(ii(-10, -1), "to".to_string())));
        assert_eq!(store.get_all().count(), 3);
    }

    #[test]
    fn update_keeps_remainders_and_adds_no_coverage() {
        let mut store = hello_world();
        store.remove(&ii(12, 14));
        // [0..9]=Hello, [10..11]=World, [15..inf]=World
        store.update(ValidData::new(ii(5, 20), "to".to_string()));
        assert_eq!(
            rendered(&store),
            vec![
                "[0..4] -> \"Hello\"",
                "[5..11] -> \"to\"",
                "[15..20] -> \"to\"",
                "[21..+inf] -> \"World\"",
            ]
        );
        store.validate().unwrap();
    }

    #[test]
    fn update_paths_agree() {
        let brute_config = StoreConfig {
            brute_force_update: true,
            ..StoreConfig::default()
        };
        for cut in [ii(5, 20), ii(0, 9), ii(10, 10), ii(-5, 40)] {
            let mut fast = hello_world();
            let mut brute = DataStore::from_records(
                fast.get_all().cloned().collect::<Vec<_>>(),
                brute_config.clone(),
            )
            .unwrap();
            fast.update(ValidData::new(cut.clone(), "to".to_string()));
            brute.update(ValidData::new(cut, "to".to_string()));
            assert_eq!(fast, brute);
            fast.validate().unwrap();
            brute.validate().unwrap();
        }
    }

    #[test]
    fn fill_only_touches_gaps() {
        let mut store = hello_world();
        store.remove(&ii(3, 6));
        store.fill(ValidData::new(ii(0, 20), "gap".to_string()));
        assert_eq!(
            rendered(&store),
            vec![
                "[0..2] -> \"Hello\"",
                "[3..6] -> \"gap\"",
                "[7..9] -> \"Hello\"",
                "[10..+inf] -> \"World\"",
            ]
        );
    }

    #[test]
    fn merge_combines_overlaps_and_fills_gaps() {
        let mut left: DataIn1D<i32, i32> = DataStore::new();
        left.set(ValidData::new(ii(0, 9), 1));
        let mut right: DataIn1D<i32, i32> = DataStore::new();
        right.set(ValidData::new(ii(5, 14), 10));
        left.merge(&right, |a, b| a + b);
        let rendered: Vec<String> = left.get_all().map(|d| d.to_string()).collect();
        assert_eq!(rendered, vec!["[0..4] -> 1", "[5..9] -> 11", "[10..14] -> 10"]);
        left.validate().unwrap();
    }

    #[test]
    fn replace_swaps_records() {
        let mut store = hello_world();
        let old = ValidData::new(ii(0, 9), "Hello".to_string());
        store.replace(&old, ValidData::new(ii(0, 5), "Hi".to_string()));
        assert_eq!(
            rendered(&store),
            vec!["[0..5] -> \"Hi\"", "[10..+inf] -> \"World\""]
        );
    }

    #[test]
    fn diff_round_trip() {
        let mut a = hello_world();
        a.set(ValidData::new(ii(5, 15), "to".to_string()));
        let b = hello_world();

        // same construction ends in an empty diff
        assert!(hello_world().diff_actions_from(&b).is_empty());

        let forward = a.diff_actions_from(&b);
        assert!(!forward.is_empty());
        let mut rebuilt = b.clone();
        rebuilt.apply_diff_actions(forward);
        assert_eq!(rebuilt, a);

        let mut synced = hello_world();
        synced.sync_with(&a);
        assert_eq!(synced, a);
    }

    #[test]
    fn diff_keys_ascend() {
        let mut a = hello_world();
        a.set(ValidData::new(ii(5, 15), "to".to_string()));
        let diff = a.diff_actions_from(&hello_world());
        let keys: Vec<_> = diff.iter().map(DiffAction::key).collect();
        let mut sorted = keys.clone();
        sorted.sort();
        assert_eq!(keys, sorted);
    }

    #[test]
    fn recompress_is_canonical_and_idempotent() {
        // same logical content reached two different physical forms;
        // from_records keeps b fragmented where set would compress
        let mut a: DataIn2D<i32, i32, i32> = DataStore::new();
        a.set(ValidData::new(Interval2::new(ii(0, 9), ii(0, 9)), 7));
        let mut b = DataStore::from_records(
            vec![
                ValidData::new(Interval2::new(ii(0, 9), ii(0, 4)), 7),
                ValidData::new(Interval2::new(ii(0, 9), ii(5, 9)), 7),
            ],
            StoreConfig::default(),
        )
        .unwrap();
        assert_ne!(a, b);

        a.recompress_all();
        b.recompress_all();
        assert_eq!(a, b);

        let again = {
            let mut c = a.clone();
            c.recompress_all();
            c
        };
        assert_eq!(again, a);
    }

    #[test]
    fn removing_a_union_equals_the_op_sequence() {
        let q = ii(2, 6);
        let rec = ValidData::new(ii(4, 11), "x".to_string());

        let mut sequenced = hello_world();
        sequenced.remove(&q);
        sequenced.set(rec.clone());
        sequenced.remove(&rec.interval);

        let mut direct = hello_world();
        direct.remove(&q);
        direct.remove(&rec.interval);

        assert_eq!(sequenced, direct);
    }

    #[test]
    fn zip_pairs_intersections() {
        let mut left: DataIn1D<i32, i32> = DataStore::new();
        left.set(ValidData::new(ii(0, 9), 1));
        let mut right: DataIn1D<i32, char> = DataStore::new();
        right.set(ValidData::new(ii(5, 14), 'a'));
        right.set(ValidData::new(ii(15, 20), 'b'));

        let zipped = left.zip(&right);
        let records: Vec<_> = zipped.get_all().cloned().collect();
        assert_eq!(records, vec![ValidData::new(ii(5, 9), (1, 'a'))]);

        let zipped_all = left.zip_all(&right, 0, '?');
        let rendered: Vec<String> = zipped_all.get_all().map(|d| d.to_string()).collect();
        assert_eq!(
            rendered,
            vec![
                "[0..4] -> (1, '?')",
                "[5..9] -> (1, 'a')",
                "[10..14] -> (0, 'a')",
                "[15..20] -> (0, 'b')",
            ]
        );
        zipped_all.validate().unwrap();
    }

    #[test]
    fn mapping_rejects_overlaps() {
        let store = hello_world();
        let widened = store.map(|data| {
            ValidData::new(uu::<i32>(), data.value.clone())
        });
        assert!(matches!(
            widened,
            Err(StoreError::DisjointnessViolated { .. })
        ));

        // both values map to the same length, and the adjacent
        // intervals compress away after the mapping
        let lengths = store
            .map(|data| ValidData::new(data.interval.clone(), data.value.len()))
            .unwrap();
        assert_eq!(lengths.get_all().count(), 1);
        assert_eq!(lengths.domain(), vec![iu(0)]);
    }

    #[test]
    fn map_values_compresses_newly_equal_neighbors() {
        let mut store = hello_world();
        store.set(ValidData::new(ii(5, 9), "World".to_string()));
        // [0..4]=Hello, [5..9]=World, [10..inf]=World would already be
        // compressed; force distinct values then collapse them
        let constant = store.map_values(|_| 1u8);
        assert_eq!(constant.get_all().count(), 1);
        assert_eq!(constant.domain(), vec![iu(0)]);
    }

    #[test]
    fn filter_retains_matching_records() {
        let mut store = hello_world();
        store.filter(|data| data.value == "World");
        assert_eq!(rendered(&store), vec!["[10..+inf] -> \"World\""]);
        store.validate().unwrap();
    }

    #[test]
    fn serde_is_the_record_array() {
        let store = hello_world();
        let json = serde_json::to_value(&store).unwrap();
        assert_eq!(
            json,
            serde_json::json!([
                {"interval": {"start": {"point": 0}, "end": {"point": 9}}, "value": "Hello"},
                {"interval": {"start": {"point": 10}, "end": "Top"}, "value": "World"},
            ])
        );
        let back: DataIn1D<i32, String> = serde_json::from_value(json).unwrap();
        assert_eq!(back, store);

        let overlapping = serde_json::json!([
            {"interval": {"start": {"point": 0}, "end": {"point": 9}}, "value": "a"},
            {"interval": {"start": {"point": 5}, "end": {"point": 15}}, "value": "b"},
        ]);
        assert!(serde_json::from_value::<DataIn1D<i32, String>>(overlapping).is_err());
    }

    #[test]
    fn construction_validates_when_asked() {
        let config = StoreConfig {
            require_disjoint: true,
            ..StoreConfig::default()
        };
        let overlapping = vec![
            ValidData::new(ii(0, 9), 'a'),
            ValidData::new(ii(5, 15), 'b'),
        ];
        assert!(matches!(
            DataStore::from_records(overlapping, config),
            Err(StoreError::ArgumentInvalid(_))
        ));
    }
}
