use crate::{
    Cost, EdgeFlow, EdgeHandle, EdgeRef, Flow, FlowEdge, NodeHandle,
    error::{Error, Result, overflow},
};

/// Residual graph over a dense vertex range `[0, N)`.
///
/// Edges live in a single arena; each vertex keeps the handles of the edges
/// leaving it, reverse edges included.
#[derive(Clone, Debug)]
pub struct FlowGraph<F, C>
where
    F: Flow,
    C: Cost,
{
    adjacency: Vec<Vec<EdgeHandle>>,
    edges: Vec<FlowEdge<F, C>>,
}

impl<F, C> Default for FlowGraph<F, C>
where
    F: Flow,
    C: Cost,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<F, C> FlowGraph<F, C>
where
    F: Flow,
    C: Cost,
{
    pub fn new() -> Self {
        FlowGraph {
            adjacency: Vec::new(),
            edges: Vec::new(),
        }
    }

    pub fn with_nodes(count: usize) -> Self {
        FlowGraph {
            adjacency: vec![Vec::new(); count],
            edges: Vec::new(),
        }
    }

    pub fn add_node(&mut self) -> NodeHandle {
        let index = self.adjacency.len();
        self.adjacency.push(Vec::new());
        NodeHandle { index }
    }

    /// Handle of vertex `index`, if it exists.
    pub fn node(&self, index: usize) -> Result<NodeHandle> {
        self.check_node("node", index)?;
        Ok(NodeHandle { index })
    }

    pub fn nodes(&self) -> impl Iterator<Item = NodeHandle> + '_ {
        (0..self.adjacency.len()).map(|index| NodeHandle { index })
    }

    pub fn node_count(&self) -> usize {
        self.adjacency.len()
    }

    /// Number of edges added by the caller, reverse edges not included.
    pub fn edge_count(&self) -> usize {
        self.edges.len() / 2
    }

    pub(crate) fn check_node(&self, arg: &'static str, index: usize) -> Result<()> {
        if index >= self.adjacency.len() {
            return Err(Error::InvalidArgument {
                arg,
                reason: format!("node {index} >= node count {}", self.adjacency.len()),
            });
        }
        Ok(())
    }

    fn check_edge(&self, edge: EdgeHandle) -> Result<()> {
        if edge.index >= self.edges.len() {
            return Err(Error::InvalidArgument {
                arg: "edge",
                reason: format!("{edge} not in graph with {} edges", self.edges.len()),
            });
        }
        Ok(())
    }

    /// Adds the arc `from -> to` together with its zero-capacity reverse edge
    /// and returns the forward handle.
    pub fn add_edge(
        &mut self,
        from: NodeHandle,
        to: NodeHandle,
        capacity: F,
        cost: C,
    ) -> Result<EdgeHandle> {
        self.check_node("from", from.index)?;
        self.check_node("to", to.index)?;
        if capacity < F::zero() {
            return Err(Error::InvalidArgument {
                arg: "capacity",
                reason: format!("{capacity} is negative"),
            });
        }

        let forward = EdgeHandle {
            index: self.edges.len(),
        };

        self.edges.push(FlowEdge {
            from,
            to,
            capacity,
            flow: F::zero(),
            cost,
        });
        self.edges.push(FlowEdge {
            from: to,
            to: from,
            capacity: F::zero(),
            flow: F::zero(),
            cost: -cost,
        });

        self.adjacency[from.index].push(forward);
        self.adjacency[to.index].push(forward.reverse());

        Ok(forward)
    }

    /// Edges leaving `node`, forward and reverse alike.
    pub fn neighbors(&self, node: NodeHandle) -> impl Iterator<Item = EdgeHandle> + '_ {
        self.adjacency
            .get(node.index)
            .map(|edges| edges.iter().copied())
            .into_iter()
            .flatten()
    }

    pub(crate) fn raw_edge(&self, edge: EdgeHandle) -> &FlowEdge<F, C> {
        &self.edges[edge.index]
    }

    pub(crate) fn raw_edges(&self) -> impl Iterator<Item = (EdgeHandle, &FlowEdge<F, C>)> {
        self.edges
            .iter()
            .enumerate()
            .map(|(index, edge)| (EdgeHandle { index }, edge))
    }

    pub fn edge(&self, edge: EdgeHandle) -> Result<EdgeRef<F, C>> {
        self.check_edge(edge)?;
        Ok(EdgeRef::new(edge, self.raw_edge(edge)))
    }

    /// All edges of the residual graph, reverse edges included.
    pub fn edges(&self) -> impl Iterator<Item = EdgeRef<F, C>> + '_ {
        self.raw_edges()
            .map(|(handle, edge)| EdgeRef::new(handle, edge))
    }

    pub fn residual_capacity(&self, edge: EdgeHandle) -> Result<F> {
        self.check_edge(edge)?;
        Ok(self.raw_edge(edge).residual_capacity())
    }

    /// Flow currently routed along `edge`. Negative for a reverse edge whose
    /// forward counterpart carries flow.
    pub fn flow(&self, edge: EdgeHandle) -> Result<F> {
        self.check_edge(edge)?;
        Ok(self.raw_edge(edge).flow)
    }

    /// Pushes `amount` along `edge` and takes it back from the paired reverse
    /// edge. Nothing is modified if either edge would leave its bounds.
    pub fn apply_flow(&mut self, edge: EdgeHandle, amount: F) -> Result<()> {
        self.check_edge(edge)?;

        let forward_flow = self.edges[edge.index]
            .flow
            .checked_add(&amount)
            .ok_or(overflow("edge flow"))?;
        let reverse = edge.reverse();
        let reverse_flow = self.edges[reverse.index]
            .flow
            .checked_sub(&amount)
            .ok_or(overflow("edge flow"))?;

        self.check_bounds(edge, forward_flow)?;
        self.check_bounds(reverse, reverse_flow)?;

        self.edges[edge.index].flow = forward_flow;
        self.edges[reverse.index].flow = reverse_flow;
        Ok(())
    }

    /// A forward edge of capacity `c` carries flow in `[0, c]`, its reverse in `[-c, 0]`.
    fn check_bounds(&self, edge: EdgeHandle, flow: F) -> Result<()> {
        let (lower, upper) = if edge.is_forward() {
            (F::zero(), self.edges[edge.index].capacity)
        } else {
            (-self.edges[edge.reverse().index].capacity, F::zero())
        };

        if flow < lower || flow > upper {
            return Err(Error::CapacityExceeded {
                edge,
                flow: flow.to_string(),
                lower: lower.to_string(),
                upper: upper.to_string(),
            });
        }
        Ok(())
    }

    /// Forward edges with positive flow, in insertion order.
    pub fn flow_table(&self) -> Vec<EdgeFlow<F, C>> {
        self.raw_edges()
            .filter(|(handle, edge)| handle.is_forward() && edge.flow > F::zero())
            .map(|(handle, edge)| EdgeFlow {
                edge: handle,
                from: edge.from,
                to: edge.to,
                flow: edge.flow,
                cost: edge.cost,
            })
            .collect()
    }

    /// Clears all flow so the graph can be solved again.
    pub fn reset_flow(&mut self) {
        for edge in &mut self.edges {
            edge.flow = F::zero();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn graph(nodes: usize) -> (FlowGraph<i32, i64>, Vec<NodeHandle>) {
        let graph = FlowGraph::with_nodes(nodes);
        let handles = graph.nodes().collect();
        (graph, handles)
    }

    #[test]
    fn test_graph_creation() {
        let (graph, nodes) = graph(3);
        assert_eq!(graph.node_count(), 3);
        assert_eq!(graph.edge_count(), 0);
        assert_eq!(nodes[2].index(), 2);
    }

    #[test]
    fn test_add_node_and_edge() {
        let mut graph: FlowGraph<i32, i64> = FlowGraph::new();
        let node_a = graph.add_node();
        let node_b = graph.add_node();
        let edge = graph.add_edge(node_a, node_b, 10, 3).unwrap();

        assert_eq!(graph.edge_count(), 1);
        let forward = graph.edge(edge).unwrap();
        assert_eq!((forward.from, forward.to), (node_a, node_b));
        assert_eq!((forward.capacity, forward.cost), (10, 3));

        let reverse = graph.edge(edge.reverse()).unwrap();
        assert_eq!((reverse.from, reverse.to), (node_b, node_a));
        assert_eq!((reverse.capacity, reverse.cost), (0, -3));
        assert_eq!(graph.residual_capacity(edge.reverse()).unwrap(), 0);
    }

    #[test]
    fn test_add_edge_rejects_negative_capacity() {
        let (mut graph, nodes) = graph(2);
        let err = graph.add_edge(nodes[0], nodes[1], -1, 0).unwrap_err();
        assert!(matches!(err, Error::InvalidArgument { arg: "capacity", .. }));
        assert_eq!(graph.edge_count(), 0);
    }

    #[test]
    fn test_add_edge_rejects_unknown_node() {
        let (mut graph, nodes) = graph(2);
        let outside = NodeHandle { index: 7 };
        let err = graph.add_edge(nodes[0], outside, 1, 0).unwrap_err();
        assert!(matches!(err, Error::InvalidArgument { arg: "to", .. }));
        assert!(graph.node(2).is_err());
    }

    #[test]
    fn test_neighbors_include_reverse_edges() {
        let (mut graph, nodes) = graph(3);
        let a_to_b = graph.add_edge(nodes[0], nodes[1], 4, 1).unwrap();
        let c_to_b = graph.add_edge(nodes[2], nodes[1], 4, 1).unwrap();

        let from_b: Vec<_> = graph.neighbors(nodes[1]).collect();
        assert_eq!(from_b, vec![a_to_b.reverse(), c_to_b.reverse()]);
        assert_eq!(graph.neighbors(nodes[0]).collect::<Vec<_>>(), vec![a_to_b]);
    }

    #[test]
    fn test_apply_flow_keeps_pair_coupled() {
        let (mut graph, nodes) = graph(2);
        let edge = graph.add_edge(nodes[0], nodes[1], 5, 2).unwrap();

        graph.apply_flow(edge, 3).unwrap();
        assert_eq!(graph.flow(edge).unwrap(), 3);
        assert_eq!(graph.flow(edge.reverse()).unwrap(), -3);
        assert_eq!(graph.residual_capacity(edge).unwrap(), 2);
        assert_eq!(graph.residual_capacity(edge.reverse()).unwrap(), 3);

        // Cancelling through the reverse edge.
        graph.apply_flow(edge.reverse(), 2).unwrap();
        assert_eq!(graph.flow(edge).unwrap(), 1);
        assert_eq!(graph.flow(edge.reverse()).unwrap(), -1);
    }

    #[test]
    fn test_apply_flow_rejects_overflowing_capacity() {
        let (mut graph, nodes) = graph(2);
        let edge = graph.add_edge(nodes[0], nodes[1], 5, 2).unwrap();

        let err = graph.apply_flow(edge, 6).unwrap_err();
        assert!(matches!(err, Error::CapacityExceeded { .. }));
        assert_eq!(graph.flow(edge).unwrap(), 0);

        let err = graph.apply_flow(edge.reverse(), 1).unwrap_err();
        assert_eq!(
            err,
            Error::CapacityExceeded {
                edge: edge.reverse(),
                flow: "1".to_string(),
                lower: "-5".to_string(),
                upper: "0".to_string(),
            }
        );
        assert_eq!(graph.flow(edge.reverse()).unwrap(), 0);
    }

    #[test]
    fn test_reverse_edge_bounds_use_forward_capacity() {
        let (mut graph, nodes) = graph(2);
        let edge = graph.add_edge(nodes[0], nodes[1], 5, 2).unwrap();
        graph.apply_flow(edge, 5).unwrap();

        let reverse = graph.edge(edge.reverse()).unwrap();
        assert_eq!(reverse.residual_capacity(), 5);
        assert_eq!(graph.edge(edge).unwrap().residual_capacity(), 0);

        let err = graph.apply_flow(edge, 1).unwrap_err();
        assert_eq!(
            err,
            Error::CapacityExceeded {
                edge,
                flow: "6".to_string(),
                lower: "0".to_string(),
                upper: "5".to_string(),
            }
        );
    }

    #[test]
    fn test_flow_table_and_reset() {
        let (mut graph, nodes) = graph(3);
        let a_to_b = graph.add_edge(nodes[0], nodes[1], 5, 2).unwrap();
        let _unused = graph.add_edge(nodes[0], nodes[2], 5, 2).unwrap();
        let b_to_c = graph.add_edge(nodes[1], nodes[2], 5, 7).unwrap();

        graph.apply_flow(a_to_b, 4).unwrap();
        graph.apply_flow(b_to_c, 4).unwrap();

        let table = graph.flow_table();
        assert_eq!(table.len(), 2);
        assert_eq!((table[0].edge, table[0].flow, table[0].cost), (a_to_b, 4, 2));
        assert_eq!((table[1].from, table[1].to), (nodes[1], nodes[2]));

        graph.reset_flow();
        assert!(graph.flow_table().is_empty());
        assert!(graph.edges().all(|edge| edge.flow == 0));
    }
}
