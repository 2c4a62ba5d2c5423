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

//! Lower-dimensional views of 2-D and 3-D stores: fixing one axis at
//! a point strips that axis from every record containing the point.
//! The surviving records were disjoint in full dimensionality and all
//! share the fixed point, so they stay disjoint after projection.

use crate::data::ValidData;
use crate::dimensional::{IntervalType, ValueType};
use crate::domain::DomainValue;
use crate::interval2::Interval2;
use crate::point::DomainPoint;
use crate::store::{DataIn1D, DataIn2D, DataIn3D, DataStore};

impl<A: DomainValue, B: DomainValue, V: ValueType> DataIn2D<A, B, V> {
    /// The vertical slice of all records containing `p` horizontally.
    pub fn get_by_horizontal_index(&self, p: &DomainPoint<A>) -> DataIn1D<B, V> {
        let mut out = DataStore::with_config(self.config().clone());
        for data in self.get_all() {
            if data.interval.horizontal().contains_point(p) {
                out.insert_record(ValidData::new(
                    data.interval.vertical().clone(),
                    data.value.clone(),
                ));
            }
        }
        out
    }

    /// The horizontal slice of all records containing `p` vertically.
    pub fn get_by_vertical_index(&self, p: &DomainPoint<B>) -> DataIn1D<A, V> {
        let mut out = DataStore::with_config(self.config().clone());
        for data in self.get_all() {
            if data.interval.vertical().contains_point(p) {
                out.insert_record(ValidData::new(
                    data.interval.horizontal().clone(),
                    data.value.clone(),
                ));
            }
        }
        out
    }

    /// The same data with the axes swapped.
    pub fn flip(&self) -> DataIn2D<B, A, V> {
        let mut out = DataStore::with_config(self.config().clone());
        for data in self.get_all() {
            out.insert_record(ValidData::new(data.interval.flipped(), data.value.clone()));
        }
        out
    }
}

impl<A: DomainValue, B: DomainValue, C: DomainValue, V: ValueType> DataIn3D<A, B, C, V> {
    /// The vertical-by-depth slice of all records containing `p`
    /// horizontally.
    pub fn get_by_horizontal_index(&self, p: &DomainPoint<A>) -> DataIn2D<B, C, V> {
        let mut out = DataStore::with_config(self.config().clone());
        for data in self.get_all() {
            if data.interval.horizontal().contains_point(p) {
                out.insert_record(ValidData::new(
                    Interval2::new(
                        data.interval.vertical().clone(),
                        data.interval.depth().clone(),
                    ),
                    data.value.clone(),
                ));
            }
        }
        out
    }

    /// The horizontal-by-depth slice of all records containing `p`
    /// vertically.
    pub fn get_by_vertical_index(&self, p: &DomainPoint<B>) -> DataIn2D<A, C, V> {
        let mut out = DataStore::with_config(self.config().clone());
        for data in self.get_all() {
            if data.interval.vertical().contains_point(p) {
                out.insert_record(ValidData::new(
                    Interval2::new(
                        data.interval.horizontal().clone(),
                        data.interval.depth().clone(),
                    ),
                    data.value.clone(),
                ));
            }
        }
        out
    }

    /// The horizontal-by-vertical slice of all records containing `p`
    /// in depth.
    pub fn get_by_depth_index(&self, p: &DomainPoint<C>) -> DataIn2D<A, B, V> {
        let mut out = DataStore::with_config(self.config().clone());
        for data in self.get_all() {
            if data.interval.depth().contains_point(p) {
                out.insert_record(ValidData::new(
                    Interval2::new(
                        data.interval.horizontal().clone(),
                        data.interval.vertical().clone(),
                    ),
                    data.value.clone(),
                ));
            }
        }
        out
    }

    /// Swaps the vertical and depth axes of every record.
    pub fn flip_about_horizontal(&self) -> DataIn3D<A, C, B, V> {
        let mut out = DataStore::with_config(self.config().clone());
        for data in self.get_all() {
            out.insert_record(ValidData::new(
                data.interval.flipped_about_horizontal(),
                data.value.clone(),
            ));
        }
        out
    }

    /// Swaps the horizontal and depth axes of every record.
    pub fn flip_about_vertical(&self) -> DataIn3D<C, B, A, V> {
        let mut out = DataStore::with_config(self.config().clone());
        for data in self.get_all() {
            out.insert_record(ValidData::new(
                data.interval.flipped_about_vertical(),
                data.value.clone(),
            ));
        }
        out
    }

    /// Swaps the horizontal and vertical axes of every record.
    pub fn flip_about_depth(&self) -> DataIn3D<B, A, C, V> {
        let mut out = DataStore::with_config(self.config().clone());
        for data in self.get_all() {
            out.insert_record(ValidData::new(
                data.interval.flipped_about_depth(),
                data.value.clone(),
            ));
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interval::{ii, iu};

    fn sample2d() -> DataIn2D<i32, i32, char> {
        let mut store = DataStore::new();
        store.set(ValidData::new(Interval2::new(ii(0, 9), ii(0, 4)), 'a'));
        store.set(ValidData::new(Interval2::new(ii(0, 9), ii(5, 9)), 'b'));
        store.set(ValidData::new(Interval2::new(ii(10, 19), iu(0)), 'c'));
        store
    }

    #[test]
    fn slicing_strips_the_fixed_axis() {
        let store = sample2d();
        let column = store.get_by_horizontal_index(&DomainPoint::Point(3));
        let rendered: Vec<String> = column.get_all().map(|d| d.to_string()).collect();
        assert_eq!(rendered, vec!["[0..4] -> 'a'", "[5..9] -> 'b'"]);
        column.validate().unwrap();

        let row = store.get_by_vertical_index(&DomainPoint::Point(7));
        let rendered: Vec<String> = row.get_all().map(|d| d.to_string()).collect();
        assert_eq!(rendered, vec!["[0..9] -> 'b'", "[10..19] -> 'c'"]);

        let empty = store.get_by_horizontal_index(&DomainPoint::Point(50));
        assert!(empty.is_empty());
    }

    #[test]
    fn flipping_twice_is_identity() {
        let store = sample2d();
        assert_eq!(store.flip().flip(), store);
        let flipped = store.flip();
        assert_eq!(
            flipped.get_at(&(DomainPoint::Point(7), DomainPoint::Point(3))),
            store.get_at(&(DomainPoint::Point(3), DomainPoint::Point(7)))
        );
        flipped.validate().unwrap();
    }

    #[test]
    fn three_dimensional_slices_and_flips() {
        let mut store: DataIn3D<i32, i32, i32, char> = DataStore::new();
        store.set(ValidData::new(
            crate::Interval3::new(ii(0, 4), ii(10, 14), ii(20, 24)),
            'x',
        ));

        let plane = store.get_by_depth_index(&DomainPoint::Point(22));
        assert_eq!(
            plane.get_at(&(DomainPoint::Point(2), DomainPoint::Point(12))),
            Some(&'x')
        );
        assert!(store.get_by_depth_index(&DomainPoint::Point(19)).is_empty());

        let swapped = store.flip_about_horizontal();
        assert_eq!(
            swapped.get_at(&(
                DomainPoint::Point(2),
                DomainPoint::Point(22),
                DomainPoint::Point(12)
            )),
            Some(&'x')
        );
        assert_eq!(swapped.flip_about_horizontal(), store);
    }
}
