//! Minimum-cost maximum flow by successive shortest augmenting paths.
//!
//! Build a [`FlowGraph`] over a dense vertex range, add capacitated and costed
//! arcs, then call [`FlowGraph::min_cost_max_flow`] or
//! [`FlowGraph::min_cost_flow`]. Shortest paths are found with Dijkstra over
//! reduced costs, kept non-negative by Johnson potentials.
//!
//! ```
//! use mincost_flow::{FlowGraph, SolverOptions};
//!
//! let mut graph: FlowGraph<i64, i64> = FlowGraph::with_nodes(4);
//! let n: Vec<_> = graph.nodes().collect();
//! graph.add_edge(n[0], n[1], 2, 1)?;
//! graph.add_edge(n[1], n[3], 2, 1)?;
//! graph.add_edge(n[0], n[2], 3, 5)?;
//! graph.add_edge(n[2], n[3], 3, 5)?;
//!
//! let options = SolverOptions::default().with_flow_limit(5);
//! let summary = graph.min_cost_flow(n[0], n[3], &options)?;
//! assert_eq!((summary.flow, summary.cost), (5, 34));
//! # Ok::<(), mincost_flow::Error>(())
//! ```

mod cost;
mod edge;
mod error;
mod flow;
mod graph;
mod node;
mod potential;
mod search;
mod solver;

pub use cost::Cost;
pub use edge::{EdgeFlow, EdgeHandle, EdgeRef};
pub(crate) use edge::FlowEdge;
pub use error::{Error, Result};
pub use flow::Flow;
pub use graph::FlowGraph;
pub use node::NodeHandle;
pub use potential::{PotentialSeed, Potentials};
pub use search::ShortestPaths;
pub use solver::{Augmentation, FlowSummary, SolverOptions};
