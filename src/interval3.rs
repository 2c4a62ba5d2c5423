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

/// A cuboid: the product of a horizontal, a vertical and a depth
/// interval.
#[derive(Clone, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
#[serde(bound(
    deserialize = "A: DomainValue + Deserialize<'de>, B: DomainValue + Deserialize<'de>, \
                   C: DomainValue + Deserialize<'de>"
))]
pub struct Interval3<A, B, C> {
    horizontal: Interval<A>,
    vertical: Interval<B>,
    depth: Interval<C>,
}

impl<A: DomainValue, B: DomainValue, C: DomainValue> Interval3<A, B, C> {
    pub fn new(horizontal: Interval<A>, vertical: Interval<B>, depth: Interval<C>) -> Self {
        Self {
            horizontal,
            vertical,
            depth,
        }
    }

    pub fn horizontal(&self) -> &Interval<A> {
        &self.horizontal
    }

    pub fn vertical(&self) -> &Interval<B> {
        &self.vertical
    }

    pub fn depth(&self) -> &Interval<C> {
        &self.depth
    }

    /// Swaps the vertical and depth axes, keeping horizontal fixed.
    pub fn flipped_about_horizontal(&self) -> Interval3<A, C, B> {
        Interval3::new(
            self.horizontal.clone(),
            self.depth.clone(),
            self.vertical.clone(),
        )
    }

    /// Swaps the horizontal and depth axes, keeping vertical fixed.
    pub fn flipped_about_vertical(&self) -> Interval3<C, B, A> {
        Interval3::new(
            self.depth.clone(),
            self.vertical.clone(),
            self.horizontal.clone(),
        )
    }

    /// Swaps the horizontal and vertical axes, keeping depth fixed.
    pub fn flipped_about_depth(&self) -> Interval3<B, A, C> {
        Interval3::new(
            self.vertical.clone(),
            self.horizontal.clone(),
            self.depth.clone(),
        )
    }
}

impl<A: DomainValue, B: DomainValue, C: DomainValue> IntervalType for Interval3<A, B, C> {
    type Point = (DomainPoint<A>, DomainPoint<B>, DomainPoint<C>);

    const DIM: usize = 3;

    fn unbounded() -> Self {
        Self::new(
            Interval::unbounded(),
            Interval::unbounded(),
            Interval::unbounded(),
        )
    }

    fn start(&self) -> Self::Point {
        (
            self.horizontal.start(),
            self.vertical.start(),
            self.depth.start(),
        )
    }

    fn end(&self) -> Self::Point {
        (self.horizontal.end(), self.vertical.end(), self.depth.end())
    }

    fn contains_point(&self, (h, v, d): &Self::Point) -> bool {
        self.horizontal.contains_point(h)
            && self.vertical.contains_point(v)
            && self.depth.contains_point(d)
    }

    fn contains_interval(&self, other: &Self) -> bool {
        self.horizontal.contains_interval(&other.horizontal)
            && self.vertical.contains_interval(&other.vertical)
            && self.depth.contains_interval(&other.depth)
    }

    fn intersects(&self, other: &Self) -> bool {
        self.horizontal.intersects(&other.horizontal)
            && self.vertical.intersects(&other.vertical)
            && self.depth.intersects(&other.depth)
    }

    fn intersection(&self, other: &Self) -> Option<Self> {
        Some(Self::new(
            self.horizontal.intersection(&other.horizontal)?,
            self.vertical.intersection(&other.vertical)?,
            self.depth.intersection(&other.depth)?,
        ))
    }

    fn excluding(&self, other: &Self) -> Vec<Self> {
        if !self.intersects(other) {
            return vec![self.clone()];
        }
        let mut remainders = Vec::new();
        // depth remainders span the full horizontal and vertical
        for d in self.depth.excluding(&other.depth) {
            remainders.push(Self::new(
                self.horizontal.clone(),
                self.vertical.clone(),
                d,
            ));
        }
        // the overlaps exist, intersects() above checked each axis
        let Some(d_overlap) = self.depth.intersection(&other.depth) else {
            return remainders;
        };
        for v in self.vertical.excluding(&other.vertical) {
            remainders.push(Self::new(self.horizontal.clone(), v, d_overlap.clone()));
        }
        let Some(v_overlap) = self.vertical.intersection(&other.vertical) else {
            return remainders;
        };
        for h in self.horizontal.excluding(&other.horizontal) {
            remainders.push(Self::new(h, v_overlap.clone(), d_overlap.clone()));
        }
        remainders
    }

    fn is_joinable_with(&self, other: &Self) -> bool {
        (self.horizontal == other.horizontal
            && self.vertical == other.vertical
            && self.depth.is_joinable_with(&other.depth))
            || (self.horizontal == other.horizontal
                && self.depth == other.depth
                && self.vertical.is_joinable_with(&other.vertical))
            || (self.vertical == other.vertical
                && self.depth == other.depth
                && self.horizontal.is_joinable_with(&other.horizontal))
    }

    fn join_with(&self, other: &Self) -> Self {
        Self::new(
            self.horizontal.join_with(&other.horizontal),
            self.vertical.join_with(&other.vertical),
            self.depth.join_with(&other.depth),
        )
    }

    fn refined_by(&self, others: &[Self]) -> Vec<Self> {
        let hs: Vec<_> = others.iter().map(|o| o.horizontal.clone()).collect();
        let vs: Vec<_> = others.iter().map(|o| o.vertical.clone()).collect();
        let ds: Vec<_> = others.iter().map(|o| o.depth.clone()).collect();
        let h_pieces = self.horizontal.refined_by(&hs);
        let v_pieces = self.vertical.refined_by(&vs);
        let d_pieces = self.depth.refined_by(&ds);
        iproduct!(h_pieces.iter(), v_pieces.iter(), d_pieces.iter())
            .map(|(h, v, d)| Self::new(h.clone(), v.clone(), d.clone()))
            .collect()
    }

    fn to_box(&self) -> DataBox {
        let h = self.horizontal.to_box();
        let v = self.vertical.to_box();
        let d = self.depth.to_box();
        DataBox::from_bounds(&[h.lo(0), v.lo(0), d.lo(0)], &[h.hi(0), v.hi(0), d.hi(0)])
    }

    fn point_to_box((h, v, d): &Self::Point) -> DataBox {
        DataBox::degenerate(&[h.ordered_hash(), v.ordered_hash(), d.ordered_hash()])
    }
}

impl<A: DomainValue, B: DomainValue, C: DomainValue> Ord for Interval3<A, B, C> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.horizontal
            .cmp(&other.horizontal)
            .then_with(|| self.vertical.cmp(&other.vertical))
            .then_with(|| self.depth.cmp(&other.depth))
    }
}

impl<A: DomainValue, B: DomainValue, C: DomainValue> PartialOrd for Interval3<A, B, C> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<A: fmt::Debug, B: fmt::Debug, C: fmt::Debug> fmt::Display for Interval3<A, B, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} x {} x {}", self.horizontal, self.vertical, self.depth)
    }
}
