use log::{debug, info, trace, warn};

use crate::{
    Cost, EdgeHandle, Flow, FlowGraph, NodeHandle, PotentialSeed, Potentials, ShortestPaths,
    error::{Error, Result, overflow},
};

/// Options for a min-cost flow run.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SolverOptions<F> {
    /// Maximum flow to push. If `None`, finds the min-cost maximum flow.
    pub flow_limit: Option<F>,
    pub seed: PotentialSeed,
    /// Abort with [`Error::AugmentationLimit`] instead of augmenting more often
    /// than this.
    pub augmentation_limit: Option<usize>,
    /// Keep every augmenting path in [`FlowSummary::paths`].
    pub record_paths: bool,
}

impl<F> Default for SolverOptions<F> {
    fn default() -> Self {
        SolverOptions {
            flow_limit: None,
            seed: PotentialSeed::default(),
            augmentation_limit: None,
            record_paths: false,
        }
    }
}

impl<F> SolverOptions<F> {
    pub fn with_flow_limit(mut self, limit: F) -> Self {
        self.flow_limit = Some(limit);
        self
    }

    pub fn with_seed(mut self, seed: PotentialSeed) -> Self {
        self.seed = seed;
        self
    }

    pub fn with_augmentation_limit(mut self, limit: usize) -> Self {
        self.augmentation_limit = Some(limit);
        self
    }

    pub fn with_recorded_paths(mut self) -> Self {
        self.record_paths = true;
        self
    }
}

/// A single augmentation: `amount` units pushed along `edges` at `unit_cost` each.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Augmentation<F, C> {
    pub edges: Vec<EdgeHandle>,
    pub amount: F,
    pub unit_cost: C,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FlowSummary<F, C>
where
    C: Cost,
{
    pub flow: F,
    pub cost: C,
    pub augmentations: usize,
    /// Final potentials; reduced costs of all reachable residual edges are
    /// non-negative under them.
    pub potentials: Potentials<C>,
    /// Empty unless [`SolverOptions::record_paths`] was set.
    pub paths: Vec<Augmentation<F, C>>,
}

impl<F, C> FlowGraph<F, C>
where
    F: Flow,
    C: Cost,
{
    /// Maximize flow from `source` to `sink` while minimizing cost.
    pub fn min_cost_max_flow(
        &mut self,
        source: NodeHandle,
        sink: NodeHandle,
    ) -> Result<FlowSummary<F, C>> {
        self.min_cost_flow(source, sink, &SolverOptions::default())
    }

    /// Successive shortest paths with Johnson potentials.
    ///
    /// Each round runs Dijkstra over reduced costs, folds the distances into the
    /// potentials and pushes the bottleneck amount along the path found. The
    /// loop ends when the sink is unreachable or `flow_limit` is met.
    ///
    /// If `flow_limit` exceeds the maximum flow, the result is the maximum flow
    /// at minimum cost. This is not an error; compare [`FlowSummary::flow`]
    /// with the limit when exact saturation matters.
    ///
    /// The routed flow stays in the graph afterwards. An error leaves the flow of
    /// the augmentations completed before it; reset or discard the graph.
    pub fn min_cost_flow(
        &mut self,
        source: NodeHandle,
        sink: NodeHandle,
        options: &SolverOptions<F>,
    ) -> Result<FlowSummary<F, C>> {
        self.check_node("source", source.index)?;
        self.check_node("sink", sink.index)?;
        if source == sink {
            return Err(Error::InvalidArgument {
                arg: "sink",
                reason: format!("sink {sink} equals the source"),
            });
        }
        if let Some(limit) = options.flow_limit
            && limit < F::zero()
        {
            return Err(Error::InvalidArgument {
                arg: "flow_limit",
                reason: format!("{limit} is negative"),
            });
        }

        let mut summary = FlowSummary {
            flow: F::zero(),
            cost: C::zero(),
            augmentations: 0,
            potentials: Potentials::seed(self, source, options.seed)?,
            paths: Vec::new(),
        };

        loop {
            if let Some(limit) = options.flow_limit
                && summary.flow >= limit
            {
                break;
            }

            let shortest = ShortestPaths::dijkstra(self, source, &summary.potentials)?;
            let Some(path) = shortest.path_to(self, sink) else {
                break;
            };

            if let Some(limit) = options.augmentation_limit
                && summary.augmentations >= limit
            {
                return Err(Error::AugmentationLimit { limit });
            }

            summary.potentials.absorb(shortest.distances())?;

            let Some(mut amount) = path
                .iter()
                .map(|&edge| self.raw_edge(edge).residual_capacity())
                .min()
            else {
                break;
            };
            if let Some(limit) = options.flow_limit {
                amount = amount.min(limit - summary.flow);
            }

            // h[sink] is the true shortest path cost, since h[source] stays zero
            let unit_cost = summary.potentials.get(sink)?;
            let path_cost = num::cast::<F, C>(amount)
                .and_then(|amount| amount.checked_mul(&unit_cost))
                .ok_or(overflow("path cost"))?;
            let flow = summary
                .flow
                .checked_add(&amount)
                .ok_or(overflow("total flow"))?;
            let cost = summary
                .cost
                .checked_add(&path_cost)
                .ok_or(overflow("total cost"))?;

            for &edge in &path {
                let arc = self.raw_edge(edge);
                trace!("augmenting {} along {} -> {}", amount, arc.from, arc.to);
                self.apply_flow(edge, amount)?;
            }

            summary.flow = flow;
            summary.cost = cost;
            summary.augmentations += 1;

            debug!(
                "augmentation {}: {} units over {} edges at {} each (flow {}, cost {})",
                summary.augmentations,
                amount,
                path.len(),
                unit_cost,
                summary.flow,
                summary.cost
            );

            if options.record_paths {
                summary.paths.push(Augmentation {
                    edges: path,
                    amount,
                    unit_cost,
                });
            }
        }

        if let Some(limit) = options.flow_limit
            && summary.flow < limit
        {
            warn!("flow limit {} not reached, maximum flow is {}", limit, summary.flow);
        }
        info!(
            "min cost flow finished after {} augmentations: flow {}, cost {}",
            summary.augmentations, summary.flow, summary.cost
        );

        Ok(summary)
    }
}
