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

//! Randomized lock-step tests: the indexed store (small tree nodes to
//! force subdivision and splitting) and a reference store (map scans,
//! brute-force update) run the same operation sequences, and must
//! agree record-for-record after every step while holding all store
//! invariants.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::config::StoreConfig;
use crate::data::ValidData;
use crate::dimensional::IntervalType;
use crate::interval::{ii, iu, ui, Interval};
use crate::interval2::Interval2;
use crate::store::{DataIn1D, DataIn2D, DataStore};

fn indexed_config() -> StoreConfig {
    StoreConfig {
        node_capacity: 4,
        depth_limit: 8,
        ..StoreConfig::default()
    }
}

fn reference_config() -> StoreConfig {
    StoreConfig {
        no_search_tree: true,
        brute_force_update: true,
        ..StoreConfig::default()
    }
}

fn random_interval(rng: &mut ChaCha8Rng) -> Interval<i32> {
    let a = rng.gen_range(-50..50);
    let len = rng.gen_range(0..20);
    match rng.gen_range(0..10) {
        0 => iu(a),
        1 => ui(a),
        _ => ii(a, a + len),
    }
}

fn random_rect(rng: &mut ChaCha8Rng) -> Interval2<i32, i32> {
    let h = {
        let a = rng.gen_range(-20..20);
        let len = rng.gen_range(0..8);
        ii(a, a + len)
    };
    let v = {
        let a = rng.gen_range(-20..20);
        let len = rng.gen_range(0..8);
        ii(a, a + len)
    };
    Interval2::new(h, v)
}

struct LockStep<I: IntervalType> {
    indexed: DataStore<I, u8>,
    reference: DataStore<I, u8>,
}

impl<I: IntervalType> LockStep<I> {
    fn new() -> Self {
        Self {
            indexed: DataStore::with_config(indexed_config()),
            reference: DataStore::with_config(reference_config()),
        }
    }

    fn apply(&mut self, op: impl Fn(&mut DataStore<I, u8>)) {
        op(&mut self.indexed);
        op(&mut self.reference);
        self.check();
    }

    fn check(&self) {
        assert_eq!(self.indexed, self.reference);
        self.indexed.validate().unwrap();
        self.reference.validate().unwrap();
    }

    fn check_query(&self, query: &I) {
        let scanned: Vec<&ValidData<I, u8>> = self
            .indexed
            .get_all()
            .filter(|data| data.interval.intersects(query))
            .collect();
        assert_eq!(self.indexed.get_intersecting(query), scanned);
        assert_eq!(self.reference.get_intersecting(query), scanned);
    }
}

#[test]
fn one_dimensional_operations_agree_with_the_reference() {
    let mut rng = ChaCha8Rng::seed_from_u64(12345);
    let mut pair: LockStep<Interval<i32>> = LockStep::new();
    let mut snapshot = pair.indexed.clone();

    for step in 0..400 {
        let interval = random_interval(&mut rng);
        let value = rng.gen_range(0..4u8);
        let data = ValidData::new(interval.clone(), value);
        match rng.gen_range(0..12) {
            0 | 1 | 2 | 3 => pair.apply(|s| s.set(data.clone())),
            4 | 5 => pair.apply(|s| s.remove(&interval)),
            6 | 7 => pair.apply(|s| s.update(data.clone())),
            8 => pair.apply(|s| s.fill(data.clone())),
            9 => pair.apply(|s| {
                s.set_if_no_conflict(data.clone());
            }),
            10 => pair.apply(|s| s.compress_all()),
            _ => pair.apply(|s| s.recompress_all()),
        }
        pair.check_query(&random_interval(&mut rng));

        // diff round-trip against an earlier state
        if step % 50 == 49 {
            let diff = pair.indexed.diff_actions_from(&snapshot);
            let mut rebuilt = snapshot.clone();
            rebuilt.apply_diff_actions(diff);
            assert_eq!(rebuilt, pair.indexed);
            snapshot = pair.indexed.clone();
        }
    }
}

#[test]
fn two_dimensional_operations_agree_with_the_reference() {
    let mut rng = ChaCha8Rng::seed_from_u64(54321);
    let mut pair: LockStep<Interval2<i32, i32>> = LockStep::new();

    for step in 0..250 {
        let rect = random_rect(&mut rng);
        let value = rng.gen_range(0..3u8);
        let data = ValidData::new(rect.clone(), value);
        match rng.gen_range(0..10) {
            0 | 1 | 2 | 3 => pair.apply(|s| s.set(data.clone())),
            4 | 5 => pair.apply(|s| s.remove(&rect)),
            6 | 7 => pair.apply(|s| s.update(data.clone())),
            8 => pair.apply(|s| s.fill(data.clone())),
            _ => pair.apply(|s| s.compress_all()),
        }
        pair.check_query(&random_rect(&mut rng));

        if step % 60 == 59 {
            // the canonical form is stable under another recompress
            let mut once = pair.indexed.clone();
            once.recompress_all();
            let mut twice = once.clone();
            twice.recompress_all();
            assert_eq!(once, twice);
            once.validate().unwrap();
        }
    }
}

#[test]
fn continuous_domains_hold_invariants() {
    use crate::interval::{ee, ie};
    use ordered_float::NotNan;

    let nn = |x: i32| NotNan::new(f64::from(x)).unwrap();
    let mut rng = ChaCha8Rng::seed_from_u64(9999);
    let mut store: DataIn1D<NotNan<f64>, u8> = DataStore::with_config(indexed_config());

    for _ in 0..200 {
        let a = rng.gen_range(-30..30);
        let len = rng.gen_range(1..10);
        let interval = match rng.gen_range(0..3) {
            0 => ii(nn(a), nn(a + len)),
            1 => ie(nn(a), nn(a + len)),
            _ => ee(nn(a), nn(a + len)),
        };
        let value = rng.gen_range(0..3u8);
        if rng.gen_bool(0.7) {
            store.set(ValidData::new(interval, value));
        } else {
            store.remove(&interval);
        }
        store.validate().unwrap();
    }
}

#[test]
fn large_stores_answer_point_queries_like_a_scan() {
    let mut rng = ChaCha8Rng::seed_from_u64(777);
    let mut store: DataIn1D<i32, u8> = DataStore::with_config(indexed_config());
    for _ in 0..300 {
        store.set(ValidData::new(random_interval(&mut rng), rng.gen_range(0..5)));
    }
    store.validate().unwrap();

    for p in -60..60 {
        let point = crate::DomainPoint::Point(p);
        let scanned = store
            .get_all()
            .find(|data| data.interval.contains_point(&point))
            .map(|data| &data.value);
        assert_eq!(store.get_at(&point), scanned);
    }
}

#[test]
fn multi_index_walk_matches_record_walk() {
    let mut rng = ChaCha8Rng::seed_from_u64(31337);
    let mut store: DataIn2D<i32, i32, u8> = DataStore::with_config(indexed_config());
    for _ in 0..120 {
        store.set(ValidData::new(random_rect(&mut rng), rng.gen_range(0..3)));
    }
    // the sorted record walk and the value-index walk hold the same
    // multiset of records; validate() checks the pairings one by one
    store.validate().unwrap();
    assert!(!store.is_empty());
    let via_domain: usize = store.domain().len();
    assert!(via_domain <= store.get_all().count());
}
