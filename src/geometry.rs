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

/// Highest dimensionality the crate supports; boxes carry fixed
/// arrays of this width and ignore the slots past their `dim`.
pub const MAX_DIM: usize = 3;

/// An axis-aligned box in double space of runtime dimension 1 to 3.
///
/// Endpoints are compared closed on both sides: a shared face counts
/// as intersection, because closed intervals sharing an endpoint do
/// intersect and the box projection must never miss that.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DataBox {
    dim: usize,
    min: [f64; MAX_DIM],
    max: [f64; MAX_DIM],
}

impl DataBox {
    /// Creates a box from per-axis bounds, `min[d] <= max[d]`.
    pub fn from_bounds(min: &[f64], max: &[f64]) -> Self {
        debug_assert!(min.len() == max.len());
        debug_assert!((1..=MAX_DIM).contains(&min.len()));
        let dim = min.len();
        let mut boxed = Self {
            dim,
            min: [0.0; MAX_DIM],
            max: [0.0; MAX_DIM],
        };
        boxed.min[..dim].copy_from_slice(min);
        boxed.max[..dim].copy_from_slice(max);
        boxed
    }

    /// The zero-extent box of a single coordinate.
    pub fn degenerate(at: &[f64]) -> Self {
        Self::from_bounds(at, at)
    }

    pub fn dim(&self) -> usize {
        self.dim
    }

    pub fn lo(&self, d: usize) -> f64 {
        self.min[d]
    }

    pub fn hi(&self, d: usize) -> f64 {
        self.max[d]
    }

    pub fn intersects(&self, other: &Self) -> bool {
        (0..self.dim).all(|d| self.min[d] <= other.max[d] && other.min[d] <= self.max[d])
    }

    pub fn intersection(&self, other: &Self) -> Option<Self> {
        self.intersects(other).then(|| {
            let mut out = *self;
            for d in 0..self.dim {
                out.min[d] = self.min[d].max(other.min[d]);
                out.max[d] = self.max[d].min(other.max[d]);
            }
            out
        })
    }

    pub fn contains_box(&self, other: &Self) -> bool {
        (0..self.dim).all(|d| self.min[d] <= other.min[d] && other.max[d] <= self.max[d])
    }

    /// The smallest box covering both inputs.
    pub fn hull(&self, other: &Self) -> Self {
        let mut out = *self;
        for d in 0..self.dim {
            out.min[d] = self.min[d].min(other.min[d]);
            out.max[d] = self.max[d].max(other.max[d]);
        }
        out
    }

    /// Midpoint of one axis, computed without overflowing on extreme
    /// bounds.
    pub fn midpoint(&self, d: usize) -> f64 {
        self.min[d] / 2.0 + self.max[d] / 2.0
    }

    /// `true` when some axis cannot be bisected into two strictly
    /// smaller halves, which happens once bounds collapse to (nearly)
    /// a single representable double.
    pub fn too_small_to_subdivide(&self) -> bool {
        (0..self.dim).any(|d| {
            let mid = self.midpoint(d);
            mid <= self.min[d] || mid >= self.max[d]
        })
    }

    /// Bisects every axis at its midpoint, yielding `2^dim` children
    /// in binary-counter order (bit `d` set means the upper half of
    /// axis `d`).
    pub fn subdivide(&self) -> Vec<Self> {
        (0..1usize << self.dim)
            .map(|quadrant| {
                let mut child = *self;
                for d in 0..self.dim {
                    let mid = self.midpoint(d);
                    if quadrant & (1 << d) == 0 {
                        child.max[d] = mid;
                    } else {
                        child.min[d] = mid;
                    }
                }
                child
            })
            .collect()
    }
}
