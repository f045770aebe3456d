use std::fmt::{Debug, Display};

use num::{PrimInt, Signed};

/// Amount of flow (and capacity) on an edge. Signed, since a reverse edge holds
/// the negation of its forward edge's flow.
pub trait Flow: PrimInt + Signed + Debug + Display {}

impl<T> Flow for T where T: PrimInt + Signed + Debug + Display {}
