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

use core::fmt;

use serde::{Deserialize, Serialize};

/// The unit of storage: a value paired with the interval over which
/// it is valid.
#[derive(Clone, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
pub struct ValidData<I, V> {
    pub interval: I,
    pub value: V,
}

impl<I, V> ValidData<I, V> {
    pub fn new(interval: I, value: V) -> Self {
        Self { interval, value }
    }
}

impl<I: fmt::Display, V: fmt::Debug> fmt::Display for ValidData<I, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} -> {:?}", self.interval, self.value)
    }
}
