use std::fmt;

use crate::{Cost, Flow, NodeHandle};

/// One arc of the residual graph. Forward and reverse edges share this record;
/// a reverse edge starts with zero capacity and negated cost.
#[derive(Clone, Debug)]
pub(crate) struct FlowEdge<F, C>
where
    F: Flow,
    C: Cost,
{
    pub(crate) from: NodeHandle,
    pub(crate) to: NodeHandle,
    pub(crate) capacity: F,
    pub(crate) flow: F,
    pub(crate) cost: C,
}

impl<F, C> FlowEdge<F, C>
where
    F: Flow,
    C: Cost,
{
    pub(crate) fn residual_capacity(&self) -> F {
        self.capacity - self.flow
    }

    pub(crate) fn has_residual_capacity(&self) -> bool {
        self.residual_capacity() > F::zero()
    }
}

/// Index of an edge in the graph's edge arena.
///
/// Edges are stored in pairs: the forward edge at an even slot, its reverse at
/// the following odd slot.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct EdgeHandle {
    pub(crate) index: usize,
}

impl EdgeHandle {
    pub fn reverse(&self) -> EdgeHandle {
        EdgeHandle {
            index: self.index ^ 1,
        }
    }

    pub fn is_forward(&self) -> bool {
        self.index & 1 == 0
    }

    pub fn index(&self) -> usize {
        self.index
    }
}

impl fmt::Display for EdgeHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "e{}", self.index)
    }
}

/// Read-only view of an edge.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct EdgeRef<F, C> {
    pub handle: EdgeHandle,
    pub from: NodeHandle,
    pub to: NodeHandle,
    pub capacity: F,
    pub flow: F,
    pub cost: C,
}

impl<F, C> EdgeRef<F, C>
where
    F: Flow,
    C: Cost,
{
    pub(crate) fn new(handle: EdgeHandle, edge: &FlowEdge<F, C>) -> Self {
        EdgeRef {
            handle,
            from: edge.from,
            to: edge.to,
            capacity: edge.capacity,
            flow: edge.flow,
            cost: edge.cost,
        }
    }

    pub fn residual_capacity(&self) -> F {
        self.capacity - self.flow
    }
}

/// Entry of the final flow table: a forward edge carrying positive flow.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct EdgeFlow<F, C> {
    pub edge: EdgeHandle,
    pub from: NodeHandle,
    pub to: NodeHandle,
    pub flow: F,
    pub cost: C,
}
