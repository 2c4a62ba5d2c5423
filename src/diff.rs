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

use serde::{Deserialize, Serialize};

use crate::data::ValidData;
use crate::dimensional::IntervalType;

/// One step of replicating a store onto another: records are
/// identified by their interval start, and a minimal diff is a
/// sequence of these applied in ascending key order.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(
    tag = "action",
    bound(
        serialize = "I: Serialize, I::Point: Serialize, V: Serialize",
        deserialize = "I: Deserialize<'de>, I::Point: Deserialize<'de>, V: Deserialize<'de>"
    )
)]
pub enum DiffAction<I: IntervalType, V> {
    /// Insert a record at a key the target does not have.
    Create {
        #[serde(rename = "validData")]
        valid_data: ValidData<I, V>,
    },
    /// Replace the record at an existing key.
    Update {
        #[serde(rename = "validData")]
        valid_data: ValidData<I, V>,
    },
    /// Drop the record at a key.
    Delete { key: I::Point },
}

impl<I: IntervalType, V> DiffAction<I, V> {
    /// The start key this action applies to.
    pub fn key(&self) -> I::Point {
        match self {
            DiffAction::Create { valid_data } | DiffAction::Update { valid_data } => {
                valid_data.interval.start()
            }
            DiffAction::Delete { key } => key.clone(),
        }
    }
}
