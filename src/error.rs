use crate::{EdgeHandle, NodeHandle};

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// Malformed input: out-of-range vertex, negative capacity or limit, or a
    /// source that equals the sink.
    #[error("invalid argument `{arg}`: {reason}")]
    InvalidArgument { arg: &'static str, reason: String },

    /// A flow update would violate the edge's bounds: `[0, capacity]` for a
    /// forward edge, `[-capacity, 0]` for its reverse. Indicates a defect in
    /// the bottleneck computation.
    #[error("flow {flow} on edge {edge} outside of [{lower}, {upper}]")]
    CapacityExceeded {
        edge: EdgeHandle,
        flow: String,
        lower: String,
        upper: String,
    },

    #[error("arithmetic overflow while computing {context}")]
    Overflow { context: &'static str },

    /// Dijkstra met an edge whose reduced cost is negative, i.e. the graph has
    /// negative raw costs but potentials were not seeded.
    #[error("negative reduced cost on residual edge {from} -> {to}")]
    NegativeReducedCost { from: NodeHandle, to: NodeHandle },

    #[error("negative-cost cycle reachable from the source")]
    NegativeCycle,

    #[error("no optimal flow within {limit} augmentations")]
    AugmentationLimit { limit: usize },
}

pub type Result<T> = std::result::Result<T, Error>;

pub(crate) fn overflow(context: &'static str) -> Error {
    Error::Overflow { context }
}
