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

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::config::StoreConfig;
use crate::data::ValidData;
use crate::dimensional::{IntervalType, ValueType};
use crate::domain::DomainValue;
use crate::error::StoreError;
use crate::interval::Interval;
use crate::interval2::Interval2;
use crate::interval3::Interval3;
use crate::point::DomainPoint;
use crate::store::DataStore;

/// The version axis.
pub type VersionValue = i32;

/// Writes under [`VersionSelection::Unapproved`] land exactly on this
/// version, the axis maximum, keeping them clear of any real version.
pub const UNAPPROVED_VERSION: VersionValue = VersionValue::MAX;

/// Which version plane an operation addresses.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum VersionSelection {
    /// The store's current version.
    Current,
    /// The unapproved staging plane at the axis maximum.
    Unapproved,
    /// An explicit version.
    Specific(VersionValue),
}

/// Lifts an interval type one dimension by appending the version
/// axis, and projects lifted records back down.
pub trait LiftWithVersion: IntervalType {
    type Lifted: IntervalType;

    fn with_version(&self, versions: Interval<VersionValue>) -> Self::Lifted;

    fn from_lifted(lifted: &Self::Lifted) -> (Self, Interval<VersionValue>);

    fn lift_point(
        p: &Self::Point,
        version: DomainPoint<VersionValue>,
    ) -> <Self::Lifted as IntervalType>::Point;
}

impl<T: DomainValue> LiftWithVersion for Interval<T> {
    type Lifted = Interval2<T, VersionValue>;

    fn with_version(&self, versions: Interval<VersionValue>) -> Self::Lifted {
        Interval2::new(self.clone(), versions)
    }

    fn from_lifted(lifted: &Self::Lifted) -> (Self, Interval<VersionValue>) {
        (lifted.horizontal().clone(), lifted.vertical().clone())
    }

    fn lift_point(
        p: &Self::Point,
        version: DomainPoint<VersionValue>,
    ) -> <Self::Lifted as IntervalType>::Point {
        (p.clone(), version)
    }
}

impl<A: DomainValue, B: DomainValue> LiftWithVersion for Interval2<A, B> {
    type Lifted = Interval3<A, B, VersionValue>;

    fn with_version(&self, versions: Interval<VersionValue>) -> Self::Lifted {
        Interval3::new(self.horizontal().clone(), self.vertical().clone(), versions)
    }

    fn from_lifted(lifted: &Self::Lifted) -> (Self, Interval<VersionValue>) {
        (
            Interval2::new(lifted.horizontal().clone(), lifted.vertical().clone()),
            lifted.depth().clone(),
        )
    }

    fn lift_point(
        (a, b): &Self::Point,
        version: DomainPoint<VersionValue>,
    ) -> <Self::Lifted as IntervalType>::Point {
        (a.clone(), b.clone(), version)
    }
}

/// A 1-D store with version history.
pub type VersionedDataIn1D<T, V> = VersionedStore<Interval<T>, V>;
/// A 2-D store with version history.
pub type VersionedDataIn2D<A, B, V> = VersionedStore<Interval2<A, B>, V>;

/// An n-D store lifted to n+1 dimensions by a trailing integer
/// version axis.
///
/// A record set under [`VersionSelection::Current`] is written over
/// `[current, +inf]`, so later versions inherit it until something
/// overwrites or removes it; removal under `Current` truncates the
/// version interval, preserving what earlier versions saw. Writes
/// under [`VersionSelection::Unapproved`] land on the marker plane at
/// the axis maximum and only become current through approval.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[serde(bound(
    serialize = "I::Lifted: Serialize, V: Serialize",
    deserialize = "I::Lifted: Deserialize<'de>, V: Deserialize<'de>"
))]
pub struct VersionedStore<I: LiftWithVersion, V: ValueType> {
    initial_version: VersionValue,
    current_version: VersionValue,
    version_timestamps: BTreeMap<VersionValue, NaiveDateTime>,
    #[serde(rename = "data")]
    store: DataStore<I::Lifted, V>,
}

impl<I: LiftWithVersion, V: ValueType> VersionedStore<I, V> {
    pub fn new() -> Self {
        Self::with_config(StoreConfig::default())
    }

    pub fn with_config(config: StoreConfig) -> Self {
        Self::with_initial_version(0, config)
            .unwrap_or_else(|_| panic!("version 0 is always in range"))
    }

    /// Starts history at an arbitrary version below the unapproved
    /// marker.
    pub fn with_initial_version(
        initial_version: VersionValue,
        config: StoreConfig,
    ) -> Result<Self, StoreError> {
        if initial_version >= UNAPPROVED_VERSION {
            return Err(StoreError::ArgumentInvalid(format!(
                "initial version {initial_version} collides with the unapproved marker"
            )));
        }
        let mut version_timestamps = BTreeMap::new();
        version_timestamps.insert(initial_version, now());
        Ok(Self {
            initial_version,
            current_version: initial_version,
            version_timestamps,
            store: DataStore::with_config(config),
        })
    }

    pub fn initial_version(&self) -> VersionValue {
        self.initial_version
    }

    pub fn current_version(&self) -> VersionValue {
        self.current_version
    }

    pub fn version_timestamps(&self) -> &BTreeMap<VersionValue, NaiveDateTime> {
        &self.version_timestamps
    }

    /// The lifted store underneath, for direct n+1-dimensional
    /// queries.
    pub fn underlying(&self) -> &DataStore<I::Lifted, V> {
        &self.store
    }

    // --- version management ---

    /// Steps to the next version, stamping it. Fails with
    /// [`StoreError::VersionExhausted`] once the next version would
    /// reach the unapproved marker.
    pub fn increment_current_version(&mut self) -> Result<VersionValue, StoreError> {
        let next = self.current_version + 1;
        if next == UNAPPROVED_VERSION {
            return Err(StoreError::VersionExhausted);
        }
        self.current_version = next;
        self.version_timestamps.insert(next, now());
        Ok(next)
    }

    /// Moves the current version pointer without touching data.
    pub fn set_current_version(&mut self, version: VersionValue) -> Result<(), StoreError> {
        if version < self.initial_version || version >= UNAPPROVED_VERSION {
            return Err(StoreError::ArgumentInvalid(format!(
                "version {version} outside [{}, {UNAPPROVED_VERSION})",
                self.initial_version
            )));
        }
        self.current_version = version;
        Ok(())
    }

    /// Discards all history after `version`: records created later
    /// are dropped, and deletions that happened later are undone by
    /// re-extending their records to the top of the version axis.
    pub fn reset_to_version(&mut self, version: VersionValue) -> Result<(), StoreError> {
        self.set_current_version(version)?;
        let boundary = DomainPoint::Point(version);
        let keys: Vec<_> = self
            .store
            .get_all()
            .map(|data| data.interval.start())
            .collect();
        for key in keys {
            let Some(data) = self.store.get_data_by_key(&key) else {
                continue;
            };
            let (base, versions) = I::from_lifted(&data.interval);
            if versions.start() > boundary {
                self.store.take_record(&key);
            } else if versions.end() != DomainPoint::Top && versions.end() >= boundary {
                let value = data.value.clone();
                self.store.take_record(&key);
                self.store.insert_record(ValidData::new(
                    base.with_version(Interval::new(versions.start(), DomainPoint::Top)),
                    value,
                ));
            }
        }
        self.version_timestamps.retain(|v, _| *v <= version);
        Ok(())
    }

    /// Flattens history to just the current slice, restarting at the
    /// initial version.
    pub fn collapse_version_history(&mut self) {
        let current = self.get_all(VersionSelection::Current);
        let from_initial = Interval::new(
            DomainPoint::Point(self.initial_version),
            DomainPoint::Top,
        );
        let mut store = DataStore::with_config(self.store.config().clone());
        for data in current {
            store.insert_record(ValidData::new(
                data.interval.with_version(from_initial.clone()),
                data.value,
            ));
        }
        self.store = store;
        self.current_version = self.initial_version;
        self.version_timestamps = BTreeMap::new();
        self.version_timestamps.insert(self.initial_version, now());
    }

    // --- queries ---

    /// The value at a point in the selected version plane.
    pub fn get_at(&self, p: &I::Point, selection: VersionSelection) -> Option<&V> {
        self.store
            .get_at(&I::lift_point(p, self.version_point(selection)))
    }

    pub fn is_defined_at(&self, p: &I::Point, selection: VersionSelection) -> bool {
        self.get_at(p, selection).is_some()
    }

    /// All records valid in the selected version plane, stripped of
    /// the version axis, ascending by interval start.
    pub fn get_all(&self, selection: VersionSelection) -> Vec<ValidData<I, V>> {
        let plane = self.version_point(selection);
        self.store
            .get_all()
            .filter_map(|data| {
                let (base, versions) = I::from_lifted(&data.interval);
                versions
                    .contains_point(&plane)
                    .then(|| ValidData::new(base, data.value.clone()))
            })
            .collect()
    }

    /// The records of the selected version plane intersecting an
    /// interval, stripped of the version axis.
    pub fn get_intersecting(
        &self,
        interval: &I,
        selection: VersionSelection,
    ) -> Vec<ValidData<I, V>> {
        let plane = Interval::at(self.version_point(selection));
        self.store
            .get_intersecting(&interval.with_version(plane))
            .into_iter()
            .map(|data| {
                let (base, _) = I::from_lifted(&data.interval);
                ValidData::new(base, data.value.clone())
            })
            .collect()
    }

    // --- mutations ---

    /// Sets a record in the selected plane: `Current` and
    /// `Specific(v)` write onward from that version so later versions
    /// inherit it, `Unapproved` stages it on the marker plane.
    pub fn set(&mut self, data: ValidData<I, V>, selection: VersionSelection) {
        self.store.set(ValidData::new(
            data.interval.with_version(self.write_interval(selection)),
            data.value,
        ));
    }

    /// [`set`](Self::set) that backs off when the write region
    /// already holds data, answering whether it wrote.
    pub fn set_if_no_conflict(
        &mut self,
        data: ValidData<I, V>,
        selection: VersionSelection,
    ) -> bool {
        self.store.set_if_no_conflict(ValidData::new(
            data.interval.with_version(self.write_interval(selection)),
            data.value,
        ))
    }

    /// Rewrites existing coverage in the selected plane onward,
    /// leaving uncovered parts uncovered.
    pub fn update(&mut self, data: ValidData<I, V>, selection: VersionSelection) {
        self.store.update(ValidData::new(
            data.interval.with_version(self.write_interval(selection)),
            data.value,
        ));
    }

    /// Removes coverage from the selected version onward. Under
    /// `Current` this is how deletion preserves history: earlier
    /// versions keep seeing the truncated records.
    pub fn remove(&mut self, interval: &I, selection: VersionSelection) {
        self.store
            .remove(&interval.with_version(self.write_interval(selection)));
    }

    /// Promotes the staged record exactly matching `data` to current,
    /// answering whether anything was approved. The promotion is a
    /// plain set under `Current`, which overwrites the staging copy.
    pub fn approve(&mut self, data: ValidData<I, V>) -> bool {
        let marker = DomainPoint::Point(UNAPPROVED_VERSION);
        let key = I::lift_point(&data.interval.start(), marker.clone());
        let staged = self.store.get_data_by_key(&key).is_some_and(|found| {
            let (base, versions) = I::from_lifted(&found.interval);
            base == data.interval
                && versions == Interval::at(marker)
                && found.value == data.value
        });
        if staged {
            self.set(data, VersionSelection::Current);
        }
        staged
    }

    /// Approves every staged record intersecting `region`, then
    /// applies staged deletions there: records whose version interval
    /// stops right before the marker were truncated by an unapproved
    /// remove, and the overlap with `region` is now removed for real.
    /// Answers the number of records approved.
    pub fn approve_all(&mut self, region: &I) -> usize {
        let staging = Interval::at(DomainPoint::Point(UNAPPROVED_VERSION));
        let staged: Vec<ValidData<I, V>> = self
            .store
            .get_all()
            .filter_map(|data| {
                let (base, versions) = I::from_lifted(&data.interval);
                (versions == staging && base.intersects(region))
                    .then(|| ValidData::new(base, data.value.clone()))
            })
            .collect();
        let mut approved = 0;
        for data in staged {
            if self.approve(data) {
                approved += 1;
            }
        }

        let deletion_end = DomainPoint::Point(UNAPPROVED_VERSION - 1);
        let deletions: Vec<I> = self
            .store
            .get_all()
            .filter_map(|data| {
                let (base, versions) = I::from_lifted(&data.interval);
                (versions.end() == deletion_end)
                    .then(|| base.intersection(region))
                    .flatten()
            })
            .collect();
        for region in deletions {
            self.remove(&region, VersionSelection::Current);
        }
        approved
    }

    fn version_point(&self, selection: VersionSelection) -> DomainPoint<VersionValue> {
        DomainPoint::Point(match selection {
            VersionSelection::Current => self.current_version,
            VersionSelection::Unapproved => UNAPPROVED_VERSION,
            VersionSelection::Specific(version) => version,
        })
    }

    fn write_interval(&self, selection: VersionSelection) -> Interval<VersionValue> {
        match selection {
            VersionSelection::Current => Interval::new(
                DomainPoint::Point(self.current_version),
                DomainPoint::Top,
            ),
            VersionSelection::Unapproved => {
                Interval::at(DomainPoint::Point(UNAPPROVED_VERSION))
            }
            VersionSelection::Specific(version) => {
                Interval::new(DomainPoint::Point(version), DomainPoint::Top)
            }
        }
    }
}

impl<I: LiftWithVersion, V: ValueType> Default for VersionedStore<I, V> {
    fn default() -> Self {
        Self::new()
    }
}

// wall-clock stamps carry no data, equality is versions plus records
impl<I: LiftWithVersion, V: ValueType> PartialEq for VersionedStore<I, V> {
    fn eq(&self, other: &Self) -> bool {
        self.initial_version == other.initial_version
            && self.current_version == other.current_version
            && self.store == other.store
    }
}

fn now() -> NaiveDateTime {
    chrono::Utc::now().naive_utc()
}
