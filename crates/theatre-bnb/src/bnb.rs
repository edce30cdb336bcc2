// Copyright (c) 2025 Felix Kahle.
//
// Permission is hereby granted, free of charge, to any person obtaining
// a copy of this software and associated documentation files (the
// "Software"), to deal in the Software without restriction, including
// without limitation the rights to use, copy, modify, merge, publish,
// distribute, sublicense, and/or sell copies of the Software, and to
// permit persons to whom the Software is furnished to do so, subject to
// the following conditions:
//
// The above copyright notice and this permission notice shall be
// included in all copies or substantial portions of the Software.
//
// THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND,
// EXPRESS OR IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF
// MERCHANTABILITY, FITNESS FOR A PARTICULAR PURPOSE AND
// NONINFRINGEMENT. IN NO EVENT SHALL THE AUTHORS OR COPYRIGHT HOLDERS BE
// LIABLE FOR ANY CLAIM, DAMAGES OR OTHER LIABILITY, WHETHER IN AN ACTION
// OF CONTRACT, TORT OR OTHERWISE, ARISING FROM, OUT OF OR IN CONNECTION
// WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE SOFTWARE.

//! Branch-and-bound driver for integer allocations.
//!
//! `BnbSolver` owns the reusable pieces of a search: the relaxation solver
//! with its tableau storage, the node arena and the frontier. Each call to
//! `solve*` runs one search session over them and resets them afterwards,
//! keeping capacities. A preallocation path sizes the tableau up front for
//! repeated solves of similar catalogs.
//!
//! A session repeatedly takes the node with the highest bound off the
//! frontier. A node whose inherited bound cannot beat the incumbent is
//! pruned without solving. Otherwise its relaxation decides: infeasible
//! nodes are pruned, integral vertices become candidate solutions, and
//! fractional vertices are split by the branching rule into a floor and a
//! ceil child that inherit the node's bound. When the frontier empties the
//! incumbent is optimal. Node and time limits from `BnbConfig` are enforced
//! by monitors that run ahead of the caller's monitor.

use crate::{
    branching::{BranchDecision, BranchingRule, MostFractionalBranching},
    config::BnbConfig,
    error::AllocationError,
    frontier::Frontier,
    incumbent::Incumbent,
    monitor::{
        composite::CompositeTreeSearchMonitor,
        no_op::NoOperationMonitor,
        node_limit::NodeLimitMonitor,
        time_limit::TimeLimitMonitor,
        tree_search_monitor::{PruneReason, SearchCommand, SearchProgress, TreeSearchMonitor},
    },
    node::{NodeArena, NodeIndex, NodeStatus},
    result::{BnbOutcome, LimitReached},
    stats::BnbStatistics,
};
use std::time::Instant;
use theatre_lp::{error::LpError, result::RelaxationResult, simplex::RelaxationSolver};
use theatre_model::{allocation::Allocation, budget::ResourceBudget, catalog::Catalog};

/// Exact solver for integer allocations.
#[derive(Debug, Clone)]
pub struct BnbSolver {
    relaxation: RelaxationSolver,
    arena: NodeArena,
    frontier: Frontier,
    config: BnbConfig,
}

impl Default for BnbSolver {
    fn default() -> Self {
        Self::new(BnbConfig::default())
    }
}

impl BnbSolver {
    pub fn new(config: BnbConfig) -> Self {
        Self {
            relaxation: RelaxationSolver::new(config.lp),
            arena: NodeArena::new(),
            frontier: Frontier::new(),
            config,
        }
    }

    /// Creates a solver whose tableau already fits catalogs of
    /// `num_procedures` procedures over `num_dimensions` resources.
    pub fn preallocated(config: BnbConfig, num_procedures: usize, num_dimensions: usize) -> Self {
        Self {
            relaxation: RelaxationSolver::preallocated(config.lp, num_procedures, num_dimensions),
            arena: NodeArena::new(),
            frontier: Frontier::new(),
            config,
        }
    }

    #[inline]
    pub fn config(&self) -> &BnbConfig {
        &self.config
    }

    /// Solves with most-fractional branching and no monitor.
    pub fn solve(
        &mut self,
        catalog: &Catalog,
        budget: &ResourceBudget,
    ) -> Result<BnbOutcome, AllocationError> {
        self.solve_with(
            catalog,
            budget,
            &mut MostFractionalBranching::new(),
            NoOperationMonitor::new(),
        )
    }

    /// Solves with most-fractional branching, reporting to `monitor`.
    pub fn solve_with_monitor<S>(
        &mut self,
        catalog: &Catalog,
        budget: &ResourceBudget,
        monitor: S,
    ) -> Result<BnbOutcome, AllocationError>
    where
        S: TreeSearchMonitor,
    {
        self.solve_with(catalog, budget, &mut MostFractionalBranching::new(), monitor)
    }

    pub fn solve_with<B, S>(
        &mut self,
        catalog: &Catalog,
        budget: &ResourceBudget,
        branching: &mut B,
        monitor: S,
    ) -> Result<BnbOutcome, AllocationError>
    where
        B: BranchingRule,
        S: TreeSearchMonitor,
    {
        catalog.validate_against(budget)?;

        let mut monitors = CompositeTreeSearchMonitor::with_capacity(3);
        if let Some(limit) = self.config.node_limit {
            monitors.add_monitor(NodeLimitMonitor::new(limit));
        }
        if let Some(limit) = self.config.time_limit {
            monitors.add_monitor(TimeLimitMonitor::new(limit, 1));
        }
        monitors.add_monitor(monitor);

        let session = BnbSearchSession::new(self, catalog, budget, branching, &mut monitors);
        let result = session.run();
        self.reset();
        result
    }

    fn reset(&mut self) {
        self.arena.clear();
        self.frontier.clear();
    }
}

/// State of a single search run.
struct BnbSearchSession<'a, B, S> {
    solver: &'a mut BnbSolver,
    catalog: &'a Catalog,
    budget: &'a ResourceBudget,
    branching: &'a mut B,
    monitor: &'a mut S,
    incumbent: Incumbent,
    root_infeasible: bool,
    stats: BnbStatistics,
    start_time: Instant,
}

impl<B, S> std::fmt::Debug for BnbSearchSession<'_, B, S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BnbSearchSession")
            .field("procedures", &self.catalog.len())
            .field("nodes", &self.solver.arena.len())
            .field("frontier", &self.solver.frontier.len())
            .field("incumbent", &self.incumbent)
            .field("stats", &self.stats)
            .finish()
    }
}

impl<'a, B, S> BnbSearchSession<'a, B, S>
where
    B: BranchingRule,
    S: TreeSearchMonitor,
{
    fn new(
        solver: &'a mut BnbSolver,
        catalog: &'a Catalog,
        budget: &'a ResourceBudget,
        branching: &'a mut B,
        monitor: &'a mut S,
    ) -> Self {
        Self {
            solver,
            catalog,
            budget,
            branching,
            monitor,
            incumbent: Incumbent::new(),
            root_infeasible: false,
            stats: BnbStatistics::default(),
            start_time: Instant::now(),
        }
    }

    fn run(mut self) -> Result<BnbOutcome, AllocationError> {
        self.monitor
            .on_enter_search(self.catalog, self.budget, &self.stats);

        let root = self.solver.arena.push_root();
        self.solver.frontier.push(root, f64::INFINITY);
        self.stats.on_frontier_size(1);

        let searched = self.search();

        self.stats.set_total_time(self.start_time.elapsed());
        self.monitor.on_exit_search(&self.stats);
        let limit = searched?;
        Ok(self.finalize_result(limit))
    }

    /// Runs until the frontier is empty or a monitor stops the search.
    fn search(&mut self) -> Result<Option<LimitReached>, AllocationError> {
        while !self.solver.frontier.is_empty() {
            let progress = self.progress();
            if let SearchCommand::Terminate(limit) =
                self.monitor.search_command(&progress, &self.stats)
            {
                tracing::debug!(%limit, "search stopped early");
                return Ok(Some(limit));
            }

            let Some((node, key)) = self.solver.frontier.pop() else {
                break;
            };
            self.stats.on_node_explored();
            self.stats
                .on_depth_update(self.solver.arena.get(node).depth() as u64);

            let progress = self.progress();
            self.monitor
                .on_step(self.solver.arena.get(node), &progress, &self.stats);

            self.process(node, key)?;
        }
        Ok(None)
    }

    fn process(&mut self, node: NodeIndex, key: f64) -> Result<(), AllocationError> {
        if self
            .incumbent
            .dominates(key, self.solver.config.objective_tolerance)
        {
            self.prune(node, PruneReason::BoundDominated);
            return Ok(());
        }

        let outcome = match self.solver.relaxation.solve(
            self.catalog,
            self.budget,
            self.solver.arena.get(node).overrides(),
        ) {
            Ok(outcome) => outcome,
            Err(LpError::NumericDegeneracy { iterations }) => {
                tracing::warn!(
                    node = node.get(),
                    iterations,
                    "relaxation did not converge, discarding node"
                );
                self.prune(node, PruneReason::NumericDegeneracy);
                return Ok(());
            }
            Err(other) => return Err(AllocationError::Relaxation(other)),
        };
        self.stats.on_relaxation_solved(outcome.pivots());

        match outcome.into_result() {
            RelaxationResult::Infeasible => {
                if self.solver.arena.get(node).is_root() {
                    self.root_infeasible = true;
                }
                self.prune(node, PruneReason::Infeasible);
            }
            RelaxationResult::Unbounded { procedure } => {
                return Err(AllocationError::Unbounded {
                    procedure: self.catalog.entry(procedure).id().to_string(),
                });
            }
            RelaxationResult::Optimal {
                allocation,
                objective,
            } => self.expand(node, &allocation, objective),
        }
        Ok(())
    }

    fn expand(&mut self, node: NodeIndex, relaxed: &Allocation<f64>, bound: f64) {
        self.solver.arena.set_bound(node, bound);
        if self.solver.arena.get(node).is_root() {
            self.stats.set_root_bound(bound);
        }
        self.monitor
            .on_relaxation_solved(self.solver.arena.get(node), bound, &self.stats);

        let config = self.solver.config;
        if self.incumbent.dominates(bound, config.objective_tolerance) {
            self.prune(node, PruneReason::BoundDominated);
            return;
        }

        match self.branching.select(relaxed, config.integrality_tolerance) {
            Some(decision) => self.branch(node, decision),
            None => self.accept_integral(node, relaxed),
        }
    }

    fn accept_integral(&mut self, node: NodeIndex, relaxed: &Allocation<f64>) {
        let config = self.solver.config;
        let candidate = relaxed.to_integral();
        if !candidate.is_feasible(self.catalog, self.budget, config.lp.feasibility_tolerance) {
            if let Some(decision) = rounded_up(relaxed, &candidate) {
                tracing::debug!(
                    node = node.get(),
                    procedure = decision.procedure().get(),
                    value = decision.value(),
                    "rounding up violates the budget, branching"
                );
                self.branch(node, decision);
                return;
            }
            tracing::warn!(
                node = node.get(),
                %candidate,
                "rounded relaxation violates the budget, discarding node"
            );
            self.prune(node, PruneReason::NumericDegeneracy);
            return;
        }

        let objective = candidate.objective(self.catalog);
        if self.incumbent.dominates(objective, config.objective_tolerance) {
            self.prune(node, PruneReason::BoundDominated);
            return;
        }

        self.stats.on_solution_found();
        self.monitor
            .on_solution_found(&candidate, objective, &self.stats);
        self.incumbent
            .try_install(candidate, objective, config.objective_tolerance);
        self.solver.arena.retire(node, NodeStatus::SolvedInteger);
    }

    fn branch(&mut self, node: NodeIndex, decision: BranchDecision) {
        let procedure = decision.procedure();
        let (down, up) = {
            let overrides = self.solver.arena.get(node).overrides();
            (
                overrides.with_upper(procedure, decision.floor()),
                overrides.with_lower(procedure, decision.ceil()),
            )
        };

        self.stats.on_branching();
        self.monitor
            .on_branch(self.solver.arena.get(node), &decision, &self.stats);

        let bound = self.solver.arena.get(node).bound();
        self.solver.arena.retire(node, NodeStatus::Branched);

        // Down child first: equal keys pop in creation order.
        let down = self.solver.arena.push_child(node, down);
        let up = self.solver.arena.push_child(node, up);
        self.solver.frontier.push(down, bound);
        self.solver.frontier.push(up, bound);
        self.stats.on_frontier_size(self.solver.frontier.len());
    }

    fn prune(&mut self, node: NodeIndex, reason: PruneReason) {
        match reason {
            PruneReason::Infeasible => self.stats.on_pruning_infeasible(),
            PruneReason::BoundDominated => self.stats.on_pruning_bound(),
            PruneReason::NumericDegeneracy => self.stats.on_pruning_degenerate(),
        }
        self.monitor
            .on_prune(self.solver.arena.get(node), reason, &self.stats);
        self.solver.arena.retire(node, NodeStatus::Pruned(reason));
    }

    fn progress(&self) -> SearchProgress {
        SearchProgress {
            frontier_len: self.solver.frontier.len(),
            best_bound: self.solver.frontier.best_bound(),
            incumbent: self.incumbent.get().map(|(_, objective)| objective),
        }
    }

    /// Turns the final search state into an outcome. Discarded degenerate
    /// nodes void the optimality proof even when the frontier emptied.
    fn finalize_result(self, limit: Option<LimitReached>) -> BnbOutcome {
        let degenerate = self.stats.prunings_degenerate;
        let limit = limit.or_else(|| {
            (degenerate > 0).then_some(LimitReached::NumericDegeneracy {
                pruned_nodes: degenerate,
            })
        });

        match (limit, self.incumbent.into_inner()) {
            (Some(limit), best) => BnbOutcome::aborted(best, self.catalog.len(), limit, self.stats),
            (None, Some((allocation, objective))) => {
                BnbOutcome::optimal(allocation, objective, self.stats)
            }
            (None, None) => {
                debug_assert!(self.root_infeasible, "search ended without incumbent");
                BnbOutcome::infeasible(self.stats)
            }
        }
    }
}

/// The procedure whose rounding moved furthest up, lowest index on ties.
/// Only upward rounding can push an integral-looking relaxation over a
/// limit, so splitting there separates the two neighbouring integers.
fn rounded_up(relaxed: &Allocation<f64>, candidate: &Allocation<u64>) -> Option<BranchDecision> {
    relaxed
        .iter()
        .zip(candidate.quantities())
        .map(|((procedure, value), &rounded)| (procedure, value, rounded as f64 - value))
        .filter(|&(_, _, excess)| excess > 0.0)
        .fold(None, |best: Option<(_, f64, f64)>, current| match best {
            Some((_, _, best_excess)) if current.2 <= best_excess => best,
            _ => Some(current),
        })
        .map(|(procedure, value, _)| BranchDecision::new(procedure, value))
}
