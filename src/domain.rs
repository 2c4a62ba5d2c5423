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

use core::fmt::Debug;

use chrono::{Datelike, NaiveDate, NaiveDateTime};
use num_bigint::{BigInt, Sign};
use num_traits::{Bounded, ToPrimitive};
use ordered_float::NotNan;

/// A totally ordered, bounded value type usable as one axis of an
/// interval.
///
/// Implementations must keep `ordered_hash` non-decreasing with the
/// order: `a <= b` implies `a.ordered_hash() <= b.ordered_hash()`.
/// Collisions are fine, the hash is only used to build conservative
/// bounding boxes, but a hash that inverts the order would make the
/// box search tree drop results.
///
/// Discrete types additionally provide `successor`/`predecessor`,
/// partial at the extremes. Continuous types leave the defaults,
/// adjacency for them is handled by the open/closed flip on
/// [`DomainPoint`](crate::DomainPoint) instead.
pub trait DomainValue: Clone + Ord + Debug {
    /// Whether stepping by `successor`/`predecessor` is meaningful.
    const DISCRETE: bool;

    /// The least representable value.
    fn min_value() -> Self;

    /// The greatest representable value.
    fn max_value() -> Self;

    /// Order-preserving projection onto the double-precision line.
    fn ordered_hash(&self) -> f64;

    /// The next value up, `None` at `max_value`. Only meaningful when
    /// `DISCRETE`.
    fn successor(&self) -> Option<Self> {
        None
    }

    /// The next value down, `None` at `min_value`. Only meaningful
    /// when `DISCRETE`.
    fn predecessor(&self) -> Option<Self> {
        None
    }
}

impl DomainValue for i32 {
    const DISCRETE: bool = true;

    fn min_value() -> Self {
        i32::MIN
    }

    fn max_value() -> Self {
        i32::MAX
    }

    fn ordered_hash(&self) -> f64 {
        f64::from(*self)
    }

    fn successor(&self) -> Option<Self> {
        self.checked_add(1)
    }

    fn predecessor(&self) -> Option<Self> {
        self.checked_sub(1)
    }
}

impl DomainValue for i64 {
    const DISCRETE: bool = true;

    fn min_value() -> Self {
        i64::MIN
    }

    fn max_value() -> Self {
        i64::MAX
    }

    fn ordered_hash(&self) -> f64 {
        // lossy above 2^53 but rounding is monotone
        *self as f64
    }

    fn successor(&self) -> Option<Self> {
        self.checked_add(1)
    }

    fn predecessor(&self) -> Option<Self> {
        self.checked_sub(1)
    }
}

/// Working range of the `BigInt` instance. `BigInt` itself is
/// unbounded so an instance has to pick its extremes; +/-2^1024 is
/// far outside anything the ordered hash can distinguish anyway.
fn bigint_bound() -> BigInt {
    BigInt::from(1u8) << 1024u32
}

impl DomainValue for BigInt {
    const DISCRETE: bool = true;

    fn min_value() -> Self {
        -bigint_bound()
    }

    fn max_value() -> Self {
        bigint_bound()
    }

    fn ordered_hash(&self) -> f64 {
        self.to_f64().unwrap_or_else(|| {
            if self.sign() == Sign::Minus {
                f64::NEG_INFINITY
            } else {
                f64::INFINITY
            }
        })
    }

    fn successor(&self) -> Option<Self> {
        (*self < Self::max_value()).then(|| self.clone() + 1)
    }

    fn predecessor(&self) -> Option<Self> {
        (*self > Self::min_value()).then(|| self.clone() - 1)
    }
}

impl DomainValue for NaiveDate {
    const DISCRETE: bool = true;

    fn min_value() -> Self {
        NaiveDate::MIN
    }

    fn max_value() -> Self {
        NaiveDate::MAX
    }

    fn ordered_hash(&self) -> f64 {
        f64::from(self.num_days_from_ce())
    }

    fn successor(&self) -> Option<Self> {
        self.succ_opt()
    }

    fn predecessor(&self) -> Option<Self> {
        self.pred_opt()
    }
}

impl DomainValue for NotNan<f64> {
    const DISCRETE: bool = false;

    fn min_value() -> Self {
        Bounded::min_value()
    }

    fn max_value() -> Self {
        Bounded::max_value()
    }

    fn ordered_hash(&self) -> f64 {
        self.into_inner()
    }
}

impl DomainValue for NaiveDateTime {
    const DISCRETE: bool = false;

    fn min_value() -> Self {
        NaiveDateTime::MIN
    }

    fn max_value() -> Self {
        NaiveDateTime::MAX
    }

    fn ordered_hash(&self) -> f64 {
        let utc = self.and_utc();
        utc.timestamp() as f64 + f64::from(utc.timestamp_subsec_nanos()) * 1e-9
    }
}

/// Derives a [`DomainValue`] instance for a C-like enum from its
/// ordered variant list, hashing each variant to its position.
///
/// ```
/// use intervalidus::discrete_domain;
///
/// #[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Debug)]
/// enum Weekday {
/// 	Mon,
/// 	Tue,
/// 	Wed,
/// 	Thu,
/// 	Fri,
/// }
///
/// discrete_domain!(Weekday { Mon, Tue, Wed, Thu, Fri });
///
/// use intervalidus::DomainValue;
/// assert_eq!(Weekday::min_value(), Weekday::Mon);
/// assert_eq!(Weekday::Thu.successor(), Some(Weekday::Fri));
/// assert_eq!(Weekday::Fri.successor(), None);
/// ```
#[macro_export]
macro_rules! discrete_domain {
    ($ty:ty { $($variant:ident),+ $(,)? }) => {
        impl $crate::DomainValue for $ty {
            const DISCRETE: bool = true;

            fn min_value() -> Self {
                const SEQ: &[$ty] = &[$(<$ty>::$variant),+];
                SEQ[0].clone()
            }

            fn max_value() -> Self {
                const SEQ: &[$ty] = &[$(<$ty>::$variant),+];
                SEQ[SEQ.len() - 1].clone()
            }

            fn ordered_hash(&self) -> f64 {
                const SEQ: &[$ty] = &[$(<$ty>::$variant),+];
                SEQ.iter().position(|v| v == self).map_or(f64::NAN, |i| i as f64)
            }

            fn successor(&self) -> Option<Self> {
                const SEQ: &[$ty] = &[$(<$ty>::$variant),+];
                let at = SEQ.iter().position(|v| v == self)?;
                SEQ.get(at + 1).cloned()
            }

            fn predecessor(&self) -> Option<Self> {
                const SEQ: &[$ty] = &[$(<$ty>::$variant),+];
                let at = SEQ.iter().position(|v| v == self)?;
                at.checked_sub(1).and_then(|i| SEQ.get(i)).cloned()
            }
        }
    };
}
