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

use thiserror::Error;

/// Errors surfaced by store and versioned-store operations.
///
/// Recoverable lookups return `Option` instead; the variants here are
/// either caller mistakes or internal bugs, and an operation that
/// returns one of them leaves the store unmodified.
#[derive(Debug, Error)]
pub enum StoreError {
    /// A constructor or setter was handed data it cannot accept, such
    /// as overlapping records when disjointness validation is on, or
    /// a version outside the valid range.
    #[error("invalid argument: {0}")]
    ArgumentInvalid(String),

    /// `get` was called on a store that is not covered by exactly one
    /// unbounded record.
    #[error("no single value covers the full domain")]
    NotFound,

    /// A mapping produced records with overlapping intervals.
    #[error("disjointness violated: {first} overlaps {second}")]
    DisjointnessViolated {
        /// The record that was being inserted, rendered for display.
        first: String,
        /// The already-present record it overlaps.
        second: String,
    },

    /// `increment_current_version` would have reached the unapproved
    /// version marker.
    #[error("no versions remain before the unapproved marker")]
    VersionExhausted,

    /// An internal index fell out of coherence. Indicates a bug in
    /// this crate, never in caller code.
    #[error("internal invariant violated: {0}")]
    InvariantViolated(String),
}
