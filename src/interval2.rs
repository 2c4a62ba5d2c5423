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

use itertools::iproduct;
use serde::{Deserialize, Serialize};

use crate::dimensional::IntervalType;
use crate::domain::DomainValue;
use crate::geometry::DataBox;
use crate::interval::Interval;
use crate::point::DomainPoint;

/// A rectangle: the product of a horizontal and a vertical interval.
#[derive(Clone, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
#[serde(bound(
    deserialize = "A: DomainValue + Deserialize<'de>, B: DomainValue + Deserialize<'de>"
))]
pub struct Interval2<A, B> {
    horizontal: Interval<A>,
    vertical: Interval<B>,
}

impl<A: DomainValue, B: DomainValue> Interval2<A, B> {
    pub fn new(horizontal: Interval<A>, vertical: Interval<B>) -> Self {
        Self {
            horizontal,
            vertical,
        }
    }

    pub fn horizontal(&self) -> &Interval<A> {
        &self.horizontal
    }

    pub fn vertical(&self) -> &Interval<B> {
        &self.vertical
    }

    /// The same rectangle with the axes swapped.
    pub fn flipped(&self) -> Interval2<B, A> {
        Interval2::new(self.vertical.clone(), self.horizontal.clone())
    }
}

impl<A: DomainValue, B: DomainValue> IntervalType for Interval2<A, B> {
    type Point = (DomainPoint<A>, DomainPoint<B>);

    const DIM: usize = 2;

    fn unbounded() -> Self {
        Self::new(Interval::unbounded(), Interval::unbounded())
    }

    fn start(&self) -> Self::Point {
        (self.horizontal.start(), self.vertical.start())
    }

    fn end(&self) -> Self::Point {
        (self.horizontal.end(), self.vertical.end())
    }

    fn contains_point(&self, (h, v): &Self::Point) -> bool {
        self.horizontal.contains_point(h) && self.vertical.contains_point(v)
    }

    fn contains_interval(&self, other: &Self) -> bool {
        self.horizontal.contains_interval(&other.horizontal)
            && self.vertical.contains_interval(&other.vertical)
    }

    fn intersects(&self, other: &Self) -> bool {
        self.horizontal.intersects(&other.horizontal) && self.vertical.intersects(&other.vertical)
    }

    fn intersection(&self, other: &Self) -> Option<Self> {
        Some(Self::new(
            self.horizontal.intersection(&other.horizontal)?,
            self.vertical.intersection(&other.vertical)?,
        ))
    }

    fn excluding(&self, other: &Self) -> Vec<Self> {
        if !self.intersects(other) {
            return vec![self.clone()];
        }
        let mut remainders = Vec::new();
        // vertical remainders span the full horizontal extent
        for v in self.vertical.excluding(&other.vertical) {
            remainders.push(Self::new(self.horizontal.clone(), v));
        }
        // horizontal remainders are narrowed to the vertical overlap;
        // intersects() above guarantees it exists
        if let Some(v_overlap) = self.vertical.intersection(&other.vertical) {
            for h in self.horizontal.excluding(&other.horizontal) {
                remainders.push(Self::new(h, v_overlap.clone()));
            }
        }
        remainders
    }

    fn is_joinable_with(&self, other: &Self) -> bool {
        (self.horizontal == other.horizontal
            && self.vertical.is_joinable_with(&other.vertical))
            || (self.vertical == other.vertical
                && self.horizontal.is_joinable_with(&other.horizontal))
    }

    fn join_with(&self, other: &Self) -> Self {
        Self::new(
            self.horizontal.join_with(&other.horizontal),
            self.vertical.join_with(&other.vertical),
        )
    }

    fn refined_by(&self, others: &[Self]) -> Vec<Self> {
        let hs: Vec<_> = others.iter().map(|o| o.horizontal.clone()).collect();
        let vs: Vec<_> = others.iter().map(|o| o.vertical.clone()).collect();
        let h_pieces = self.horizontal.refined_by(&hs);
        let v_pieces = self.vertical.refined_by(&vs);
        iproduct!(h_pieces.iter(), v_pieces.iter())
            .map(|(h, v)| Self::new(h.clone(), v.clone()))
            .collect()
    }

    fn to_box(&self) -> DataBox {
        let h = self.horizontal.to_box();
        let v = self.vertical.to_box();
        DataBox::from_bounds(&[h.lo(0), v.lo(0)], &[h.hi(0), v.hi(0)])
    }

    fn point_to_box((h, v): &Self::Point) -> DataBox {
        DataBox::degenerate(&[h.ordered_hash(), v.ordered_hash()])
    }
}

impl<A: DomainValue, B: DomainValue> Ord for Interval2<A, B> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.horizontal
            .cmp(&other.horizontal)
            .then_with(|| self.vertical.cmp(&other.vertical))
    }
}

impl<A: DomainValue, B: DomainValue> PartialOrd for Interval2<A, B> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<A: fmt::Debug, B: fmt::Debug> fmt::Display for Interval2<A, B> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} x {}", self.horizontal, self.vertical)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interval::{ii, iu, uu};

    fn rect(h: Interval<i32>, v: Interval<i32>) -> Interval2<i32, i32> {
        Interval2::new(h, v)
    }

    #[test]
    fn relations_are_per_axis_conjunctions() {
        let a = rect(ii(0, 9), ii(0, 9));
        let b = rect(ii(5, 15), ii(20, 30));
        // horizontal overlap alone is not intersection
        assert!(!a.intersects(&b));
        let c = rect(ii(5, 15), ii(5, 15));
        assert!(a.intersects(&c));
        assert_eq!(a.intersection(&c), Some(rect(ii(5, 9), ii(5, 9))));
        assert!(a.contains_point(&(DomainPoint::Point(3), DomainPoint::Point(9))));
        assert!(!a.contains_point(&(DomainPoint::Point(3), DomainPoint::Point(10))));
    }

    #[test]
    fn excluding_a_hole_leaves_four_pieces() {
        let whole = rect(ii(-14, 14), ii(4, 7));
        let hole = rect(ii(-6, 6), ii(5, 6));
        assert_eq!(
            whole.excluding(&hole),
            vec![
                rect(ii(-14, 14), ii(4, 4)),
                rect(ii(-14, 14), ii(7, 7)),
                rect(ii(-14, -7), ii(5, 6)),
                rect(ii(7, 14), ii(5, 6)),
            ]
        );
    }

    #[test]
    fn excluding_a_corner_leaves_two_pieces() {
        let whole = rect(ii(0, 9), ii(0, 9));
        let corner = rect(ii(5, 20), ii(5, 20));
        assert_eq!(
            whole.excluding(&corner),
            vec![rect(ii(0, 9), ii(0, 4)), rect(ii(0, 4), ii(5, 9))]
        );
    }

    #[test]
    fn joinability_needs_one_free_axis() {
        let a = rect(ii(0, 4), ii(0, 9));
        let touching_same_height = rect(ii(5, 9), ii(0, 9));
        let touching_other_height = rect(ii(5, 9), ii(0, 8));
        let diagonal = rect(ii(5, 9), ii(10, 19));
        assert!(a.is_joinable_with(&touching_same_height));
        assert_eq!(
            a.join_with(&touching_same_height),
            rect(ii(0, 9), ii(0, 9))
        );
        assert!(!a.is_joinable_with(&touching_other_height));
        assert!(!a.is_joinable_with(&diagonal));
    }

    #[test]
    fn refinement_builds_the_common_grid() {
        let a = rect(ii(0, 9), ii(0, 9));
        let atoms = a.refined_by(&[rect(ii(5, 9), ii(0, 4))]);
        assert_eq!(
            atoms,
            vec![
                rect(ii(0, 4), ii(0, 4)),
                rect(ii(0, 4), ii(5, 9)),
                rect(ii(5, 9), ii(0, 4)),
                rect(ii(5, 9), ii(5, 9)),
            ]
        );
    }

    #[test]
    fn flipping_swaps_axes() {
        let a = rect(ii(0, 4), iu(7));
        assert_eq!(a.flipped(), Interval2::new(iu(7), ii(0, 4)));
        assert_eq!(uu::<i32>().to_box().dim(), 1);
        assert_eq!(a.to_box().dim(), 2);
    }
}
