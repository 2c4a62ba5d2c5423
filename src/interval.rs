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

use serde::{Deserialize, Serialize};

use crate::dimensional::IntervalType;
use crate::domain::DomainValue;
use crate::geometry::DataBox;
use crate::point::{DomainPoint, Side};

/// A non-empty interval along one axis, `start <= end`.
#[derive(Clone, PartialEq, Eq, Hash, Debug)]
pub struct Interval<T> {
    start: DomainPoint<T>,
    end: DomainPoint<T>,
}

/// `[a..b]`
pub fn ii<T: DomainValue>(a: T, b: T) -> Interval<T> {
    Interval::new(DomainPoint::Point(a), DomainPoint::Point(b))
}

/// `[a..+inf]`
pub fn iu<T: DomainValue>(a: T) -> Interval<T> {
    Interval::new(DomainPoint::Point(a), DomainPoint::Top)
}

/// `[-inf..b]`
pub fn ui<T: DomainValue>(b: T) -> Interval<T> {
    Interval::new(DomainPoint::Bottom, DomainPoint::Point(b))
}

/// `[-inf..+inf]`
pub fn uu<T: DomainValue>() -> Interval<T> {
    Interval::unbounded()
}

/// `(a..b)`, continuous domains only
pub fn ee<T: DomainValue>(a: T, b: T) -> Interval<T> {
    Interval::new(DomainPoint::OpenPoint(a), DomainPoint::OpenPoint(b))
}

/// `(a..b]`, continuous domains only
pub fn ei<T: DomainValue>(a: T, b: T) -> Interval<T> {
    Interval::new(DomainPoint::OpenPoint(a), DomainPoint::Point(b))
}

/// `[a..b)`, continuous domains only
pub fn ie<T: DomainValue>(a: T, b: T) -> Interval<T> {
    Interval::new(DomainPoint::Point(a), DomainPoint::OpenPoint(b))
}

/// `(a..+inf]`, continuous domains only
pub fn eu<T: DomainValue>(a: T) -> Interval<T> {
    Interval::new(DomainPoint::OpenPoint(a), DomainPoint::Top)
}

/// `[-inf..b)`, continuous domains only
pub fn ue<T: DomainValue>(b: T) -> Interval<T> {
    Interval::new(DomainPoint::Bottom, DomainPoint::OpenPoint(b))
}

impl<T: DomainValue> Interval<T> {
    /// Creates an interval from its endpoints.
    ///
    /// # Panics
    ///
    /// Panics if the endpoints describe an empty interval, such as a
    /// start after its end or a degenerate open interval.
    pub fn new(start: DomainPoint<T>, end: DomainPoint<T>) -> Self {
        Self::checked(start, end)
            .unwrap_or_else(|| panic!("interval start must not be after its end"))
    }

    /// Creates an interval from its endpoints, `None` when they
    /// describe an empty interval.
    pub fn checked(start: DomainPoint<T>, end: DomainPoint<T>) -> Option<Self> {
        (start.cmp_start_to_end(&end) != Ordering::Greater).then_some(Self { start, end })
    }

    /// The single-point interval `[p..p]`.
    pub fn at(p: DomainPoint<T>) -> Self {
        Self::new(p.clone(), p)
    }

    /// Everything before `other`, or `None` when `other` starts at
    /// the bottom.
    pub fn before(other: &Self) -> Option<Self> {
        Self::checked(DomainPoint::Bottom, other.start.before_start()?)
    }

    /// Everything after `other`, or `None` when `other` ends at the
    /// top.
    pub fn after(other: &Self) -> Option<Self> {
        Self::checked(other.end.after_end()?, DomainPoint::Top)
    }

    /// `true` when `other` begins right where this interval stops,
    /// with nothing between and no overlap.
    pub fn is_left_adjacent_to(&self, other: &Self) -> bool {
        self.end.after_end().as_ref() == Some(&other.start)
    }

    /// `true` when this interval begins right where `other` stops.
    pub fn is_right_adjacent_to(&self, other: &Self) -> bool {
        other.is_left_adjacent_to(self)
    }

    /// `true` when the two intervals touch on either side without
    /// overlapping.
    pub fn is_adjacent_to(&self, other: &Self) -> bool {
        self.is_left_adjacent_to(other) || self.is_right_adjacent_to(other)
    }

    /// The union of two adjacent or intersecting intervals, `None`
    /// when there would be a gap between them.
    pub fn join(&self, other: &Self) -> Option<Self> {
        (self.intersects(other) || self.is_adjacent_to(other)).then(|| self.hull(other))
    }

    /// The interval strictly between two intervals, `None` when they
    /// intersect or touch.
    pub fn gap_with(&self, other: &Self) -> Option<Self> {
        if self.intersects(other) || self.is_adjacent_to(other) {
            return None;
        }
        let (first, second) =
            if self.start.cmp_in_role(Side::Start, &other.start) == Ordering::Less {
                (self, other)
            } else {
                (other, self)
            };
        Self::checked(first.end.after_end()?, second.start.before_start()?)
    }

    /// Splits around an interior point, keeping the point in the left
    /// piece. `None` when `p` is not interior.
    pub fn split_at(&self, p: &DomainPoint<T>) -> Option<(Self, Self)> {
        if !self.contains_point(p) {
            return None;
        }
        let left = Self::checked(self.start.clone(), p.clone())?;
        let right = Self::checked(p.after_end()?, self.end.clone())?;
        Some((left, right))
    }

    fn hull(&self, other: &Self) -> Self {
        let start = if self.start.cmp_in_role(Side::Start, &other.start) == Ordering::Greater {
            other.start.clone()
        } else {
            self.start.clone()
        };
        let end = if self.end.cmp_in_role(Side::End, &other.end) == Ordering::Less {
            other.end.clone()
        } else {
            self.end.clone()
        };
        Self { start, end }
    }
}

impl<T: DomainValue> IntervalType for Interval<T> {
    type Point = DomainPoint<T>;

    const DIM: usize = 1;

    fn unbounded() -> Self {
        Self {
            start: DomainPoint::Bottom,
            end: DomainPoint::Top,
        }
    }

    fn start(&self) -> Self::Point {
        self.start.clone()
    }

    fn end(&self) -> Self::Point {
        self.end.clone()
    }

    fn contains_point(&self, p: &Self::Point) -> bool {
        self.start.cmp_in_role(Side::Start, p) != Ordering::Greater
            && self.end.cmp_in_role(Side::End, p) != Ordering::Less
    }

    fn contains_interval(&self, other: &Self) -> bool {
        self.start.cmp_in_role(Side::Start, &other.start) != Ordering::Greater
            && self.end.cmp_in_role(Side::End, &other.end) != Ordering::Less
    }

    fn intersects(&self, other: &Self) -> bool {
        self.intersection(other).is_some()
    }

    fn intersection(&self, other: &Self) -> Option<Self> {
        let start = if self.start.cmp_in_role(Side::Start, &other.start) == Ordering::Less {
            other.start.clone()
        } else {
            self.start.clone()
        };
        let end = if self.end.cmp_in_role(Side::End, &other.end) == Ordering::Greater {
            other.end.clone()
        } else {
            self.end.clone()
        };
        Self::checked(start, end)
    }

    fn excluding(&self, other: &Self) -> Vec<Self> {
        if !self.intersects(other) {
            return vec![self.clone()];
        }
        let mut remainders = Vec::new();
        if other.start.cmp_in_role(Side::Start, &self.start) == Ordering::Greater {
            if let Some(end) = other.start.before_start() {
                if let Some(left) = Self::checked(self.start.clone(), end) {
                    remainders.push(left);
                }
            }
        }
        if other.end.cmp_in_role(Side::End, &self.end) == Ordering::Less {
            if let Some(start) = other.end.after_end() {
                if let Some(right) = Self::checked(start, self.end.clone()) {
                    remainders.push(right);
                }
            }
        }
        remainders
    }

    fn is_joinable_with(&self, other: &Self) -> bool {
        self.intersects(other) || self.is_adjacent_to(other)
    }

    fn join_with(&self, other: &Self) -> Self {
        self.hull(other)
    }

    fn refined_by(&self, others: &[Self]) -> Vec<Self> {
        let mut pieces = vec![self.clone()];
        for other in others {
            pieces = pieces
                .into_iter()
                .flat_map(|piece| match piece.intersection(other) {
                    None => vec![piece],
                    Some(inside) => {
                        let mut split = piece.excluding(other);
                        split.push(inside);
                        split
                    }
                })
                .collect();
        }
        pieces.sort();
        pieces
    }

    fn to_box(&self) -> DataBox {
        DataBox::from_bounds(&[self.start.ordered_hash()], &[self.end.ordered_hash()])
    }

    fn point_to_box(p: &Self::Point) -> DataBox {
        DataBox::degenerate(&[p.ordered_hash()])
    }
}

impl<T: DomainValue> Ord for Interval<T> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.start
            .cmp(&other.start)
            .then_with(|| self.end.cmp(&other.end))
    }
}

impl<T: DomainValue> PartialOrd for Interval<T> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<T: fmt::Debug> fmt::Display for Interval<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (open_bracket, start) = match &self.start {
            DomainPoint::Bottom => ('[', "-inf".to_string()),
            DomainPoint::Top => ('[', "+inf".to_string()),
            DomainPoint::Point(t) => ('[', format!("{t:?}")),
            DomainPoint::OpenPoint(t) => ('(', format!("{t:?}")),
        };
        let (close_bracket, end) = match &self.end {
            DomainPoint::Bottom => (']', "-inf".to_string()),
            DomainPoint::Top => (']', "+inf".to_string()),
            DomainPoint::Point(t) => (']', format!("{t:?}")),
            DomainPoint::OpenPoint(t) => (')', format!("{t:?}")),
        };
        write!(f, "{open_bracket}{start}..{end}{close_bracket}")
    }
}

impl<T: Serialize> Serialize for Interval<T> {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        use serde::ser::SerializeStruct;
        let mut s = serializer.serialize_struct("Interval", 2)?;
        s.serialize_field("start", &self.start)?;
        s.serialize_field("end", &self.end)?;
        s.end()
    }
}

#[derive(Deserialize)]
struct IntervalRepr<T> {
    start: DomainPoint<T>,
    end: DomainPoint<T>,
}

impl<'de, T: DomainValue + Deserialize<'de>> Deserialize<'de> for Interval<T> {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let repr = IntervalRepr::deserialize(deserializer)?;
        Self::checked(repr.start, repr.end)
            .ok_or_else(|| serde::de::Error::custom("interval start is after its end"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ordered_float::NotNan;

    fn nn(x: f64) -> NotNan<f64> {
        NotNan::new(x).unwrap()
    }

    #[test]
    fn containment() {
        let interval = ii(0, 9);
        assert!(interval.contains_point(&DomainPoint::Point(0)));
        assert!(interval.contains_point(&DomainPoint::Point(9)));
        assert!(!interval.contains_point(&DomainPoint::Point(10)));
        assert!(interval.contains_interval(&ii(3, 5)));
        assert!(!interval.contains_interval(&ii(3, 10)));
        assert!(uu::<i32>().contains_point(&DomainPoint::Top));
    }

    #[test]
    fn open_endpoints_exclude_their_value() {
        let interval = ie(nn(0.0), nn(5.0));
        assert!(interval.contains_point(&DomainPoint::Point(nn(0.0))));
        assert!(!interval.contains_point(&DomainPoint::Point(nn(5.0))));
        assert!(interval.contains_point(&DomainPoint::Point(nn(4.999))));
    }

    #[test]
    fn intersection_and_disjointness() {
        assert_eq!(ii(0, 9).intersection(&ii(5, 15)), Some(ii(5, 9)));
        assert_eq!(ii(0, 4).intersection(&ii(5, 15)), None);
        // touching closed-open endpoints share no point
        assert_eq!(ie(nn(0.0), nn(5.0)).intersection(&ii(nn(5.0), nn(9.0))), None);
        // touching closed-closed endpoints share one
        assert_eq!(ii(0, 5).intersection(&ii(5, 9)), Some(ii(5, 5)));
    }

    #[test]
    fn adjacency() {
        assert!(ii(0, 5).is_left_adjacent_to(&ii(6, 9)));
        assert!(!ii(0, 5).is_left_adjacent_to(&ii(7, 9)));
        assert!(!ii(0, 5).is_left_adjacent_to(&ii(5, 9)));
        assert!(ie(nn(0.0), nn(5.0)).is_left_adjacent_to(&ii(nn(5.0), nn(9.0))));
        assert!(ii(nn(0.0), nn(5.0)).is_left_adjacent_to(&ei(nn(5.0), nn(9.0))));
        assert!(!ii(nn(0.0), nn(5.0)).is_left_adjacent_to(&ii(nn(5.0), nn(9.0))));
    }

    #[test]
    fn join_and_gap() {
        assert_eq!(ii(0, 5).join(&ii(6, 9)), Some(ii(0, 9)));
        assert_eq!(ii(0, 5).join(&ii(3, 9)), Some(ii(0, 9)));
        assert_eq!(ii(0, 5).join(&ii(7, 9)), None);
        assert_eq!(ii(0, 5).gap_with(&ii(8, 9)), Some(ii(6, 7)));
        assert_eq!(ii(0, 5).gap_with(&ii(6, 9)), None);
    }

    #[test]
    fn excluding_pieces() {
        assert_eq!(ii(0, 9).excluding(&ii(3, 5)), vec![ii(0, 2), ii(6, 9)]);
        assert_eq!(ii(0, 9).excluding(&ii(0, 5)), vec![ii(6, 9)]);
        assert_eq!(ii(0, 9).excluding(&ii(5, 9)), vec![ii(0, 4)]);
        assert_eq!(ii(0, 9).excluding(&ui(20)), Vec::<Interval<i32>>::new());
        assert_eq!(ii(0, 9).excluding(&ii(20, 30)), vec![ii(0, 9)]);
        // removing a point from the unbounded interval
        assert_eq!(uu::<i32>().excluding(&ii(0, 0)), vec![ui(-1), iu(1)]);
    }

    #[test]
    fn excluding_continuous_keeps_open_boundaries() {
        let whole = ii(nn(0.0), nn(10.0));
        let cut = ii(nn(3.0), nn(5.0));
        assert_eq!(
            whole.excluding(&cut),
            vec![ie(nn(0.0), nn(3.0)), ei(nn(5.0), nn(10.0))]
        );
    }

    #[test]
    fn excluding_at_the_domain_extremes_adds_no_phantom_pieces() {
        // no successor past the maximum, so only the left remainder
        assert_eq!(
            iu(5).excluding(&ii(i32::MAX, i32::MAX)),
            vec![ii(5, i32::MAX - 1)]
        );
        // and symmetrically at the minimum
        assert_eq!(
            ui(5).excluding(&ii(i32::MIN, i32::MIN)),
            vec![ii(i32::MIN + 1, 5)]
        );
        assert_eq!(
            iu(i32::MAX).excluding(&ii(i32::MAX, i32::MAX)),
            Vec::<Interval<i32>>::new()
        );
    }

    #[test]
    fn split_interior() {
        let (left, right) = ii(0, 9).split_at(&DomainPoint::Point(4)).unwrap();
        assert_eq!(left, ii(0, 4));
        assert_eq!(right, ii(5, 9));
        assert_eq!(ii(0, 9).split_at(&DomainPoint::Point(9)), None);
        assert_eq!(ii(0, 9).split_at(&DomainPoint::Point(12)), None);
    }

    #[test]
    fn before_and_after() {
        assert_eq!(Interval::before(&iu(10)), Some(ui(9)));
        assert_eq!(Interval::after(&ui(4)), Some(iu(5)));
        assert_eq!(Interval::before(&uu::<i32>()), None);
    }

    #[test]
    fn refinement_is_a_partition() {
        let atoms = ii(0, 9).refined_by(&[ii(3, 5), ii(5, 12)]);
        assert_eq!(atoms, vec![ii(0, 2), ii(3, 4), ii(5, 5), ii(6, 9)]);
    }

    #[test]
    fn boxes_are_conservative() {
        let a = ii(0, 5);
        let b = ii(5, 9);
        assert!(a.to_box().intersects(&b.to_box()));
        let c = iu(1000);
        assert!(uu::<i32>().to_box().intersects(&c.to_box()));
    }

    #[test]
    fn serde_shape() {
        let json = serde_json::to_value(ii(0, 9)).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"start": {"point": 0}, "end": {"point": 9}})
        );
        let back: Interval<i32> = serde_json::from_value(json).unwrap();
        assert_eq!(back, ii(0, 9));
        assert!(serde_json::from_str::<Interval<i32>>(
            r#"{"start": {"point": 9}, "end": {"point": 0}}"#
        )
        .is_err());
    }
}
