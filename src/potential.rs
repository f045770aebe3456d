use std::collections::VecDeque;

use log::trace;

use crate::{
    Cost, EdgeHandle, Flow, FlowGraph, NodeHandle,
    error::{Error, Result, overflow},
};

/// How the potentials are initialised before the first Dijkstra pass.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum PotentialSeed {
    /// All zero. Every edge with residual capacity must have a non-negative cost.
    Zero,
    /// Bellman-Ford distances from the source.
    BellmanFord,
    /// Bellman-Ford only if some residual edge has a negative cost.
    #[default]
    Auto,
}

/// Johnson potentials, one per vertex.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Potentials<C>
where
    C: Cost,
{
    values: Vec<C>,
}

impl<C> Potentials<C>
where
    C: Cost,
{
    pub fn zero(nodes: usize) -> Self {
        Potentials {
            values: vec![C::zero(); nodes],
        }
    }

    /// Builds the starting potentials for a run from `source`.
    pub fn seed<F>(graph: &FlowGraph<F, C>, source: NodeHandle, seed: PotentialSeed) -> Result<Self>
    where
        F: Flow,
    {
        graph.check_node("source", source.index)?;

        let bellman_ford = match seed {
            PotentialSeed::Zero => false,
            PotentialSeed::BellmanFord => true,
            PotentialSeed::Auto => graph
                .raw_edges()
                .any(|(_, edge)| edge.has_residual_capacity() && edge.cost < C::zero()),
        };

        if bellman_ford {
            Self::bellman_ford(graph, source)
        } else {
            Ok(Self::zero(graph.node_count()))
        }
    }

    /// Shortest raw-cost distances from `source` over residual edges. Vertices
    /// out of reach keep potential zero; they can never become reachable later.
    fn bellman_ford<F>(graph: &FlowGraph<F, C>, source: NodeHandle) -> Result<Self>
    where
        F: Flow,
    {
        let nodes = graph.node_count();
        let mut distances: Vec<Option<C>> = vec![None; nodes];
        distances[source.index] = Some(C::zero());

        // Relax edges |V| times (an extra iteration to detect negative cycles)
        for i in 0..nodes {
            let mut updated = false;

            for (_, edge) in graph.raw_edges() {
                if !edge.has_residual_capacity() {
                    continue;
                }
                let Some(distance) = distances[edge.from.index] else {
                    continue;
                };
                let candidate = distance
                    .checked_add(&edge.cost)
                    .ok_or(overflow("initial potentials"))?;

                if distances[edge.to.index].is_none_or(|current| candidate < current) {
                    if i == nodes - 1 {
                        return Err(Error::NegativeCycle);
                    }
                    distances[edge.to.index] = Some(candidate);
                    updated = true;
                }
            }

            if !updated {
                trace!("potentials seeded after {} Bellman-Ford rounds", i + 1);
                break;
            }
        }

        Ok(Potentials {
            values: distances
                .into_iter()
                .map(|distance| distance.unwrap_or_else(C::zero))
                .collect(),
        })
    }

    pub fn get(&self, node: NodeHandle) -> Result<C> {
        self.values
            .get(node.index)
            .copied()
            .ok_or_else(|| Error::InvalidArgument {
                arg: "node",
                reason: format!("{node} has no potential, only {} known", self.values.len()),
            })
    }

    /// Fails unless there is exactly one potential per vertex of `graph`.
    pub fn check_len<F>(&self, graph: &FlowGraph<F, C>) -> Result<()>
    where
        F: Flow,
    {
        if self.values.len() != graph.node_count() {
            return Err(Error::InvalidArgument {
                arg: "potentials",
                reason: format!(
                    "{} potentials for a graph with {} nodes",
                    self.values.len(),
                    graph.node_count()
                ),
            });
        }
        Ok(())
    }

    pub fn as_slice(&self) -> &[C] {
        &self.values
    }

    /// `cost(u, v) + h[u] - h[v]` for the given edge.
    pub fn reduced_cost<F>(&self, graph: &FlowGraph<F, C>, edge: EdgeHandle) -> Result<C>
    where
        F: Flow,
    {
        self.check_len(graph)?;
        let edge = graph.edge(edge)?;
        self.reduced_cost_unchecked(edge.cost, edge.from, edge.to)
    }

    /// Reduced cost with indices already validated against the graph.
    pub(crate) fn reduced_cost_unchecked(
        &self,
        cost: C,
        from: NodeHandle,
        to: NodeHandle,
    ) -> Result<C> {
        let (h_from, h_to) = (self.values[from.index], self.values[to.index]);

        // Exact whenever the result fits: with h[u], h[v] of equal sign their
        // difference fits, otherwise cost and h[u] carry opposite signs or the
        // result overflows anyway.
        h_from
            .checked_sub(&h_to)
            .and_then(|difference| cost.checked_add(&difference))
            .or_else(|| {
                cost.checked_add(&h_from)
                    .and_then(|sum| sum.checked_sub(&h_to))
            })
            .ok_or(overflow("reduced cost"))
    }

    /// `h[v] += dist[v]` for every vertex the last search reached.
    pub fn absorb(&mut self, distances: &[Option<C>]) -> Result<()> {
        if distances.len() != self.values.len() {
            return Err(Error::InvalidArgument {
                arg: "distances",
                reason: format!(
                    "{} distances for {} potentials",
                    distances.len(),
                    self.values.len()
                ),
            });
        }

        for (value, distance) in self.values.iter_mut().zip(distances) {
            if let Some(distance) = distance {
                *value = value
                    .checked_add(distance)
                    .ok_or(overflow("potential update"))?;
            }
        }
        Ok(())
    }

    /// Whether every residual edge leaving a vertex reachable from `source` has
    /// a non-negative reduced cost.
    pub fn feasible_for<F>(&self, graph: &FlowGraph<F, C>, source: NodeHandle) -> Result<bool>
    where
        F: Flow,
    {
        graph.check_node("source", source.index)?;
        self.check_len(graph)?;

        let mut reached = vec![false; graph.node_count()];
        let mut queue = VecDeque::from([source]);
        reached[source.index] = true;

        while let Some(node) = queue.pop_front() {
            for handle in graph.neighbors(node) {
                let edge = graph.raw_edge(handle);
                if !edge.has_residual_capacity() {
                    continue;
                }
                if self.reduced_cost_unchecked(edge.cost, edge.from, edge.to)? < C::zero() {
                    return Ok(false);
                }
                if !reached[edge.to.index] {
                    reached[edge.to.index] = true;
                    queue.push_back(edge.to);
                }
            }
        }

        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn nodes<F: Flow, C: Cost>(graph: &FlowGraph<F, C>) -> Vec<NodeHandle> {
        graph.nodes().collect()
    }

    #[test]
    fn test_auto_seed_skips_bellman_ford_for_non_negative_costs() {
        let mut graph = FlowGraph::<i32, i64>::with_nodes(3);
        let n = nodes(&graph);
        graph.add_edge(n[0], n[1], 4, 3).unwrap();
        graph.add_edge(n[1], n[2], 4, 2).unwrap();

        let potentials = Potentials::seed(&graph, n[0], PotentialSeed::Auto).unwrap();
        assert_eq!(potentials.as_slice(), &[0, 0, 0]);
    }

    #[test]
    fn test_bellman_ford_with_cheaper_path() {
        let mut graph = FlowGraph::<i32, i64>::with_nodes(4);
        let n = nodes(&graph);
        graph.add_edge(n[0], n[1], 10, 5).unwrap();
        graph.add_edge(n[1], n[2], 5, 10).unwrap();
        graph.add_edge(n[1], n[2], 5, -1).unwrap();
        graph.add_edge(n[2], n[3], 10, 1).unwrap();

        let potentials = Potentials::seed(&graph, n[0], PotentialSeed::Auto).unwrap();
        assert_eq!(potentials.as_slice(), &[0, 5, 4, 5]);
        assert!(potentials.feasible_for(&graph, n[0]).unwrap());
    }

    #[test]
    fn test_bellman_ford_ignores_edges_without_capacity() {
        let mut graph = FlowGraph::<i32, i64>::with_nodes(3);
        let n = nodes(&graph);
        graph.add_edge(n[0], n[1], 10, 5).unwrap();
        graph.add_edge(n[0], n[2], 0, -50).unwrap();

        let potentials = Potentials::seed(&graph, n[0], PotentialSeed::BellmanFord).unwrap();
        assert_eq!(potentials.as_slice(), &[0, 5, 0]);
    }

    #[test]
    fn test_bellman_ford_with_negative_cycle() {
        let mut graph = FlowGraph::<i32, i64>::with_nodes(4);
        let n = nodes(&graph);
        graph.add_edge(n[0], n[1], 10, 5).unwrap();
        graph.add_edge(n[1], n[2], 5, 10).unwrap();
        graph.add_edge(n[2], n[1], 5, -11).unwrap();
        graph.add_edge(n[2], n[3], 10, 1).unwrap();

        let err = Potentials::seed(&graph, n[0], PotentialSeed::Auto).unwrap_err();
        assert_eq!(err, Error::NegativeCycle);
    }

    #[test]
    fn test_absorb_skips_unreached() {
        let mut potentials = Potentials::<i64>::zero(3);
        potentials.absorb(&[Some(0), None, Some(4)]).unwrap();
        potentials.absorb(&[Some(0), Some(2), Some(1)]).unwrap();
        assert_eq!(potentials.as_slice(), &[0, 2, 5]);
    }

    #[test]
    fn test_absorb_reports_overflow() {
        let mut potentials = Potentials::<i8>::zero(1);
        potentials.absorb(&[Some(100)]).unwrap();
        let err = potentials.absorb(&[Some(100)]).unwrap_err();
        assert!(matches!(err, Error::Overflow { .. }));
    }

    #[test]
    fn test_absorb_rejects_mismatched_distances() {
        let mut potentials = Potentials::<i64>::zero(3);
        let err = potentials.absorb(&[Some(1), Some(2)]).unwrap_err();
        assert!(matches!(err, Error::InvalidArgument { arg: "distances", .. }));
        assert_eq!(potentials.as_slice(), &[0, 0, 0]);
    }

    #[test]
    fn test_potentials_must_cover_every_node() {
        let mut graph = FlowGraph::<i32, i64>::with_nodes(2);
        let n = nodes(&graph);
        let edge = graph.add_edge(n[0], n[1], 1, 3).unwrap();
        let potentials = Potentials::zero(2);
        assert!(potentials.feasible_for(&graph, n[0]).unwrap());

        let extra = graph.add_node();
        graph.add_edge(n[1], extra, 1, 1).unwrap();

        let err = potentials.feasible_for(&graph, n[0]).unwrap_err();
        assert!(matches!(err, Error::InvalidArgument { arg: "potentials", .. }));
        let err = potentials.reduced_cost(&graph, edge).unwrap_err();
        assert!(matches!(err, Error::InvalidArgument { arg: "potentials", .. }));
        let err = potentials.get(extra).unwrap_err();
        assert!(matches!(err, Error::InvalidArgument { arg: "node", .. }));
    }

    #[test]
    fn test_reduced_cost_avoids_intermediate_overflow() {
        let mut graph = FlowGraph::<i32, i8>::with_nodes(3);
        let n = nodes(&graph);
        let edge = graph.add_edge(n[1], n[2], 1, 100).unwrap();
        let back = graph.add_edge(n[2], n[0], 1, -100).unwrap();

        let mut potentials = Potentials::<i8>::zero(3);
        potentials.absorb(&[Some(-100), Some(100), Some(100)]).unwrap();

        // 100 + 100 - 100 and -100 + 100 - (-100)
        assert_eq!(potentials.reduced_cost(&graph, edge).unwrap(), 100);
        assert_eq!(potentials.reduced_cost(&graph, back).unwrap(), 100);
    }

    #[test]
    fn test_zero_potentials_infeasible_with_negative_cost() {
        let mut graph = FlowGraph::<i32, i64>::with_nodes(2);
        let n = nodes(&graph);
        let edge = graph.add_edge(n[0], n[1], 1, -2).unwrap();

        let potentials = Potentials::zero(2);
        assert_eq!(potentials.reduced_cost(&graph, edge).unwrap(), -2);
        assert!(!potentials.feasible_for(&graph, n[0]).unwrap());
    }
}
