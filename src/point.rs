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

use core::cmp::Ordering;
use core::fmt;

use serde::de::Deserializer;
use serde::ser::{SerializeMap, Serializer};
use serde::{Deserialize, Serialize};

use crate::domain::DomainValue;

/// A point along one axis: unbounded below, unbounded above, a closed
/// point, or an open point.
///
/// `OpenPoint` only arises over continuous domain values; it is the
/// endpoint of an interval that approaches `t` without reaching it.
/// Discrete domains express exclusion by stepping to the neighboring
/// value instead.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum DomainPoint<T> {
    /// Below every other point.
    Bottom,
    /// The value itself, included.
    Point(T),
    /// The value itself, excluded (continuous domains only).
    OpenPoint(T),
    /// Above every other point.
    Top,
}

/// Which end of an interval a point is playing. An `OpenPoint(t)`
/// ranks just above `Point(t)` as a start and just below it as an
/// end; `Bottom`, `Top` and closed points rank the same either way.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Side {
    Start,
    End,
}

impl<T: DomainValue> DomainPoint<T> {
    fn rank(&self, side: Side) -> i8 {
        match (self, side) {
            (DomainPoint::OpenPoint(_), Side::Start) => 1,
            (DomainPoint::OpenPoint(_), Side::End) => -1,
            _ => 0,
        }
    }

    fn cmp_ranked(&self, my_rank: i8, other: &Self, other_rank: i8) -> Ordering {
        use DomainPoint::{Bottom, OpenPoint, Point, Top};
        match (self, other) {
            (Bottom, Bottom) | (Top, Top) => Ordering::Equal,
            (Bottom, _) | (_, Top) => Ordering::Less,
            (_, Bottom) | (Top, _) => Ordering::Greater,
            (Point(x) | OpenPoint(x), Point(y) | OpenPoint(y)) => {
                x.cmp(y).then(my_rank.cmp(&other_rank))
            }
        }
    }

    /// Compares two points both playing the same interval side.
    pub(crate) fn cmp_in_role(&self, side: Side, other: &Self) -> Ordering {
        self.cmp_ranked(self.rank(side), other, other.rank(side))
    }

    /// Compares a start against an end. `Greater` means an interval
    /// with these endpoints would be empty.
    pub(crate) fn cmp_start_to_end(&self, end: &Self) -> Ordering {
        self.cmp_ranked(self.rank(Side::Start), end, end.rank(Side::End))
    }

    /// The first point after an interval ending here, or `None` when
    /// nothing follows. Discrete domains step, and a domain value
    /// with no representable successor has nothing after it;
    /// continuous domains flip openness.
    pub fn after_end(&self) -> Option<Self> {
        match self {
            DomainPoint::Top => None,
            DomainPoint::Bottom => T::DISCRETE.then(|| DomainPoint::Point(T::min_value())),
            DomainPoint::Point(t) => {
                if T::DISCRETE {
                    t.successor().map(DomainPoint::Point)
                } else {
                    Some(DomainPoint::OpenPoint(t.clone()))
                }
            }
            DomainPoint::OpenPoint(t) => Some(DomainPoint::Point(t.clone())),
        }
    }

    /// The last point before an interval starting here; the mirror of
    /// [`after_end`](Self::after_end), `None` below the least
    /// representable value.
    pub fn before_start(&self) -> Option<Self> {
        match self {
            DomainPoint::Bottom => None,
            DomainPoint::Top => T::DISCRETE.then(|| DomainPoint::Point(T::max_value())),
            DomainPoint::Point(t) => {
                if T::DISCRETE {
                    t.predecessor().map(DomainPoint::Point)
                } else {
                    Some(DomainPoint::OpenPoint(t.clone()))
                }
            }
            DomainPoint::OpenPoint(t) => Some(DomainPoint::Point(t.clone())),
        }
    }

    /// Order-preserving projection of this point onto the double
    /// line, with the unbounded markers at the finite extremes so box
    /// arithmetic stays well-defined.
    pub fn ordered_hash(&self) -> f64 {
        match self {
            DomainPoint::Bottom => f64::MIN,
            DomainPoint::Top => f64::MAX,
            DomainPoint::Point(t) | DomainPoint::OpenPoint(t) => {
                t.ordered_hash().clamp(f64::MIN, f64::MAX)
            }
        }
    }

    /// The wrapped domain value, if any.
    pub fn value(&self) -> Option<&T> {
        match self {
            DomainPoint::Point(t) | DomainPoint::OpenPoint(t) => Some(t),
            _ => None,
        }
    }
}

// The canonical order is the start role, so that map keys and
// `get_all` walk records ascending by where they begin.
impl<T: DomainValue> Ord for DomainPoint<T> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.cmp_in_role(Side::Start, other)
    }
}

impl<T: DomainValue> PartialOrd for DomainPoint<T> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<T: fmt::Debug> fmt::Display for DomainPoint<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DomainPoint::Bottom => write!(f, "-inf"),
            DomainPoint::Top => write!(f, "+inf"),
            DomainPoint::Point(t) => write!(f, "{t:?}"),
            DomainPoint::OpenPoint(t) => write!(f, "open({t:?})"),
        }
    }
}

impl<T: Serialize> Serialize for DomainPoint<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            DomainPoint::Bottom => serializer.serialize_str("Bottom"),
            DomainPoint::Top => serializer.serialize_str("Top"),
            DomainPoint::Point(t) => {
                let mut map = serializer.serialize_map(Some(1))?;
                map.serialize_entry("point", t)?;
                map.end()
            }
            DomainPoint::OpenPoint(t) => {
                let mut map = serializer.serialize_map(Some(1))?;
                map.serialize_entry("open", t)?;
                map.end()
            }
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum DomainPointRepr<T> {
    Extreme(ExtremeRepr),
    Closed { point: T },
    Open { open: T },
}

#[derive(Deserialize)]
enum ExtremeRepr {
    Bottom,
    Top,
}

impl<'de, T: Deserialize<'de>> Deserialize<'de> for DomainPoint<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Ok(match DomainPointRepr::deserialize(deserializer)? {
            DomainPointRepr::Extreme(ExtremeRepr::Bottom) => DomainPoint::Bottom,
            DomainPointRepr::Extreme(ExtremeRepr::Top) => DomainPoint::Top,
            DomainPointRepr::Closed { point } => DomainPoint::Point(point),
            DomainPointRepr::Open { open } => DomainPoint::OpenPoint(open),
        })
    }
}
