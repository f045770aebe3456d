use std::fmt::{Debug, Display};

use num::{PrimInt, Signed};

/// Per-unit cost of routing flow along an edge.
///
/// Only signed integers qualify: reverse edges carry the negated cost, and the
/// potential bookkeeping relies on exact arithmetic.
pub trait Cost: PrimInt + Signed + Debug + Display {}

macro_rules! impl_cost {
    ($($t:ty),*) => {
        $(
            impl Cost for $t {}
        )*
    };
}

impl_cost!(i8, i16, i32, i64, i128, isize);
