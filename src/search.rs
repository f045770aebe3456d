use std::cmp::Reverse;
use std::collections::BinaryHeap;

use crate::{
    Cost, EdgeHandle, Flow, FlowGraph, NodeHandle, Potentials,
    error::{Error, Result, overflow},
};

/// Result of one Dijkstra pass over reduced costs.
#[derive(Clone, Debug)]
pub struct ShortestPaths<C>
where
    C: Cost,
{
    source: NodeHandle,
    /// Reduced-cost distance from the source; `None` if unreached.
    distances: Vec<Option<C>>,
    /// Edge used to reach each vertex.
    predecessors: Vec<Option<EdgeHandle>>,
}

impl<C> ShortestPaths<C>
where
    C: Cost,
{
    /// Dijkstra from `source` over edges with residual capacity, weighting each
    /// edge by `cost + h[from] - h[to]`.
    ///
    /// Fails with [`Error::NegativeReducedCost`] if such a weight is negative.
    pub fn dijkstra<F>(
        graph: &FlowGraph<F, C>,
        source: NodeHandle,
        potentials: &Potentials<C>,
    ) -> Result<Self>
    where
        F: Flow,
    {
        graph.check_node("source", source.index)?;
        potentials.check_len(graph)?;

        let nodes = graph.node_count();
        let mut distances: Vec<Option<C>> = vec![None; nodes];
        let mut predecessors = vec![None; nodes];
        distances[source.index] = Some(C::zero());

        let mut heap = BinaryHeap::new();
        heap.push(Reverse((C::zero(), source.index)));

        while let Some(Reverse((distance, u))) = heap.pop() {
            // Stale entry, a shorter distance was already settled
            if distances[u].is_some_and(|best| best < distance) {
                continue;
            }

            for handle in graph.neighbors(NodeHandle { index: u }) {
                let edge = graph.raw_edge(handle);
                if !edge.has_residual_capacity() {
                    continue;
                }

                let weight = potentials.reduced_cost_unchecked(edge.cost, edge.from, edge.to)?;
                if weight < C::zero() {
                    return Err(Error::NegativeReducedCost {
                        from: edge.from,
                        to: edge.to,
                    });
                }

                let candidate = distance
                    .checked_add(&weight)
                    .ok_or(overflow("path distance"))?;
                let v = edge.to.index;
                if distances[v].is_none_or(|current| candidate < current) {
                    distances[v] = Some(candidate);
                    predecessors[v] = Some(handle);
                    heap.push(Reverse((candidate, v)));
                }
            }
        }

        Ok(ShortestPaths {
            source,
            distances,
            predecessors,
        })
    }

    pub fn distance(&self, node: NodeHandle) -> Option<C> {
        self.distances.get(node.index).copied().flatten()
    }

    pub fn distances(&self) -> &[Option<C>] {
        &self.distances
    }

    pub fn predecessor(&self, node: NodeHandle) -> Option<EdgeHandle> {
        self.predecessors.get(node.index).copied().flatten()
    }

    /// Edges of the shortest path from the source to `target`, in order, or
    /// `None` if `target` was not reached.
    pub fn path_to<F>(&self, graph: &FlowGraph<F, C>, target: NodeHandle) -> Option<Vec<EdgeHandle>>
    where
        F: Flow,
    {
        self.distance(target)?;

        let mut path = Vec::new();
        let mut current = target;
        while current != self.source {
            let edge = self.predecessors[current.index]?;
            path.push(edge);
            current = graph.raw_edge(edge).from;
        }
        path.reverse();

        Some(path)
    }
}
