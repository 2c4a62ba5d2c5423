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

//! Storage and querying of values that are valid only over intervals
//! of some ordered domain (dates, integers, timestamps) in one,
//! two, or three dimensions.
//!
//! A [`DataStore`] maintains a disjoint set of interval-value records
//! under every mutation, splitting and joining records as coverage
//! changes:
//!
//! ```
//! use intervalidus::interval::{ii, iu};
//! use intervalidus::{DataIn1D, DataStore, ValidData};
//!
//! let mut store: DataIn1D<i32, &str> = DataStore::new();
//! store.set(ValidData::new(ii(0, 9), "Hello"));
//! store.set(ValidData::new(iu(10), "World"));
//! store.set(ValidData::new(ii(5, 15), "to"));
//!
//! let rendered: Vec<String> = store.get_all().map(|data| data.to_string()).collect();
//! assert_eq!(
//! 	rendered,
//! 	vec![
//! 		"[0..4] -> \"Hello\"",
//! 		"[5..15] -> \"to\"",
//! 		"[16..+inf] -> \"World\"",
//! 	]
//! );
//! ```
//!
//! [`VersionedStore`] lifts a store by one integer version dimension,
//! adding current-version and approval semantics on top of the same
//! engine.

pub mod box_tree;
pub mod config;
pub mod data;
pub mod diff;
pub mod dimensional;
pub mod domain;
pub mod error;
pub mod geometry;
pub mod interval;
pub mod interval2;
pub mod interval3;
pub mod multimap;
pub mod point;
mod projections;
pub mod store;
pub mod version;

#[cfg(test)]
mod tests;

pub use config::StoreConfig;
pub use data::ValidData;
pub use diff::DiffAction;
pub use dimensional::{IntervalType, ValueType};
pub use domain::DomainValue;
pub use error::StoreError;
pub use interval::Interval;
pub use interval2::Interval2;
pub use interval3::Interval3;
pub use point::DomainPoint;
pub use store::{DataIn1D, DataIn2D, DataIn3D, DataStore};
pub use version::{
    LiftWithVersion, VersionSelection, VersionValue, VersionedDataIn1D, VersionedDataIn2D,
    VersionedStore, UNAPPROVED_VERSION,
};
