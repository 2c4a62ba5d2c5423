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

use core::fmt::{Debug, Display};

use crate::geometry::DataBox;

/// Dimension-generic interval behavior.
///
/// Implemented by [`Interval`](crate::Interval),
/// [`Interval2`](crate::Interval2) and [`Interval3`](crate::Interval3);
/// the store is written against this trait so the algebra exists once
/// while dimensionality stays in the type. Every n-dimensional
/// relation is the conjunction of its per-axis 1-dimensional
/// relations.
pub trait IntervalType: Clone + PartialEq + Eq + Debug + Display + Sized {
    /// The position of one corner: a domain point, or a tuple of
    /// them ordered lexicographically.
    type Point: Clone + Ord + Debug;

    /// Number of axes.
    const DIM: usize;

    /// The interval covering the whole space.
    fn unbounded() -> Self;

    /// The least corner; record keys and iteration order come from
    /// this.
    fn start(&self) -> Self::Point;

    /// The greatest corner.
    fn end(&self) -> Self::Point;

    fn contains_point(&self, p: &Self::Point) -> bool;

    fn contains_interval(&self, other: &Self) -> bool;

    fn intersects(&self, other: &Self) -> bool;

    fn intersection(&self, other: &Self) -> Option<Self>;

    /// The minimal axis-aligned partition of `self \ other`, at most
    /// `2 * DIM` disjoint pieces. Remainders on the trailing axis
    /// keep all other axes full; remainders on earlier axes carry the
    /// intersection on the later ones.
    fn excluding(&self, other: &Self) -> Vec<Self>;

    /// `true` when the two intervals agree on every axis except one,
    /// and touch or overlap on that one, so that their hull covers
    /// exactly their union.
    fn is_joinable_with(&self, other: &Self) -> bool;

    /// The per-axis hull. Only the union of the inputs when
    /// [`is_joinable_with`](Self::is_joinable_with) holds.
    fn join_with(&self, other: &Self) -> Self;

    /// Splits this interval at every axis boundary of `others`,
    /// producing the atoms of the common grid, sorted ascending.
    fn refined_by(&self, others: &[Self]) -> Vec<Self>;

    /// The conservative bounding box: ordered hashes of the
    /// endpoints, so interval intersection always implies box
    /// intersection.
    fn to_box(&self) -> DataBox;

    /// The degenerate box of a single point, for point queries.
    fn point_to_box(p: &Self::Point) -> DataBox;
}

/// Blanket alias for the bounds a stored value must satisfy: `Ord`
/// keys the value multi-index, the rest keeps records printable and
/// comparable.
pub trait ValueType: Clone + Eq + Ord + Debug {}
impl<V> ValueType for V where V: Clone + Eq + Ord + Debug {}
