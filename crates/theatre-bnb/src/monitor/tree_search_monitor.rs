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

//! Tree search monitoring interface
//!
//! Declares the `TreeSearchMonitor` trait for observing and controlling
//! branch-and-bound. Callbacks track the solver lifecycle, and a monitor can
//! stop the search through `SearchCommand` (default: Continue).
//!
//! Lifecycle
//! - enter → {command → step → relaxation → prune | solution | branch}* → exit
//! - `BnbStatistics` is provided to every callback.
//!
//! Methods take `&mut self`; a monitor belongs to one search. Keep callbacks
//! cheap, they run once per node.

use crate::{
    branching::BranchDecision, node::SearchNode, result::LimitReached, stats::BnbStatistics,
};
use theatre_model::{allocation::Allocation, budget::ResourceBudget, catalog::Catalog};

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum PruneReason {
    /// The node's relaxation has no feasible point.
    Infeasible,
    /// The node's bound cannot beat the incumbent.
    BoundDominated,
    /// The node's relaxation failed numerically.
    NumericDegeneracy,
}

impl std::fmt::Display for PruneReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PruneReason::Infeasible => write!(f, "Infeasible"),
            PruneReason::BoundDominated => write!(f, "BoundDominated"),
            PruneReason::NumericDegeneracy => write!(f, "NumericDegeneracy"),
        }
    }
}

#[derive(Clone, PartialEq, Eq, Debug, Default)]
pub enum SearchCommand {
    #[default]
    Continue,
    Terminate(LimitReached),
}

impl std::fmt::Display for SearchCommand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SearchCommand::Continue => write!(f, "Continue"),
            SearchCommand::Terminate(reason) => write!(f, "Terminate: {}", reason),
        }
    }
}

/// A snapshot of the search between two nodes.
#[derive(Clone, Copy, PartialEq, Debug)]
pub struct SearchProgress {
    /// Nodes waiting on the frontier.
    pub frontier_len: usize,
    /// Highest bound on the frontier, if it is not empty.
    pub best_bound: Option<f64>,
    /// Objective of the incumbent, if one exists.
    pub incumbent: Option<f64>,
}

impl SearchProgress {
    /// Absolute distance between the best open bound and the incumbent.
    #[inline]
    pub fn gap(&self) -> Option<f64> {
        match (self.best_bound, self.incumbent) {
            (Some(bound), Some(incumbent)) => Some((bound - incumbent).max(0.0)),
            _ => None,
        }
    }
}

impl std::fmt::Display for SearchProgress {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "SearchProgress(frontier: {}", self.frontier_len)?;
        match self.best_bound {
            Some(b) => write!(f, ", bound: {}", b)?,
            None => write!(f, ", bound: -")?,
        }
        match self.incumbent {
            Some(i) => write!(f, ", incumbent: {})", i),
            None => write!(f, ", incumbent: -)"),
        }
    }
}

pub trait TreeSearchMonitor {
    fn name(&self) -> &str;
    fn on_enter_search(
        &mut self,
        catalog: &Catalog,
        budget: &ResourceBudget,
        statistics: &BnbStatistics,
    );
    fn on_exit_search(&mut self, statistics: &BnbStatistics);
    fn search_command(
        &mut self,
        _progress: &SearchProgress,
        _statistics: &BnbStatistics,
    ) -> SearchCommand {
        SearchCommand::Continue
    }
    /// Called for every node taken off the frontier, before it is processed.
    fn on_step(&mut self, node: &SearchNode, progress: &SearchProgress, statistics: &BnbStatistics);
    fn on_relaxation_solved(
        &mut self,
        _node: &SearchNode,
        _bound: f64,
        _statistics: &BnbStatistics,
    ) {
    }
    fn on_prune(&mut self, _node: &SearchNode, _reason: PruneReason, _statistics: &BnbStatistics) {}
    fn on_branch(
        &mut self,
        _node: &SearchNode,
        _decision: &BranchDecision,
        _statistics: &BnbStatistics,
    ) {
    }
    /// Called whenever the incumbent improves.
    fn on_solution_found(
        &mut self,
        allocation: &Allocation<u64>,
        objective: f64,
        statistics: &BnbStatistics,
    );
}

impl<M> TreeSearchMonitor for &mut M
where
    M: TreeSearchMonitor + ?Sized,
{
    fn name(&self) -> &str {
        (**self).name()
    }

    fn on_enter_search(
        &mut self,
        catalog: &Catalog,
        budget: &ResourceBudget,
        statistics: &BnbStatistics,
    ) {
        (**self).on_enter_search(catalog, budget, statistics)
    }

    fn on_exit_search(&mut self, statistics: &BnbStatistics) {
        (**self).on_exit_search(statistics)
    }

    fn search_command(
        &mut self,
        progress: &SearchProgress,
        statistics: &BnbStatistics,
    ) -> SearchCommand {
        (**self).search_command(progress, statistics)
    }

    fn on_step(
        &mut self,
        node: &SearchNode,
        progress: &SearchProgress,
        statistics: &BnbStatistics,
    ) {
        (**self).on_step(node, progress, statistics)
    }

    fn on_relaxation_solved(&mut self, node: &SearchNode, bound: f64, statistics: &BnbStatistics) {
        (**self).on_relaxation_solved(node, bound, statistics)
    }

    fn on_prune(&mut self, node: &SearchNode, reason: PruneReason, statistics: &BnbStatistics) {
        (**self).on_prune(node, reason, statistics)
    }

    fn on_branch(
        &mut self,
        node: &SearchNode,
        decision: &BranchDecision,
        statistics: &BnbStatistics,
    ) {
        (**self).on_branch(node, decision, statistics)
    }

    fn on_solution_found(
        &mut self,
        allocation: &Allocation<u64>,
        objective: f64,
        statistics: &BnbStatistics,
    ) {
        (**self).on_solution_found(allocation, objective, statistics)
    }
}

impl std::fmt::Debug for dyn TreeSearchMonitor + '_ {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "TreeSearchMonitor({})", self.name())
    }
}

impl std::fmt::Display for dyn TreeSearchMonitor + '_ {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "TreeSearchMonitor({})", self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gap_needs_bound_and_incumbent() {
        let mut progress = SearchProgress {
            frontier_len: 3,
            best_bound: Some(15.0),
            incumbent: None,
        };
        assert_eq!(progress.gap(), None);
        progress.incumbent = Some(12.0);
        assert_eq!(progress.gap(), Some(3.0));
        assert_eq!(
            progress.to_string(),
            "SearchProgress(frontier: 3, bound: 15, incumbent: 12)"
        );
    }

    #[test]
    fn test_command_default_and_display() {
        assert_eq!(SearchCommand::default(), SearchCommand::Continue);
        let stop = SearchCommand::Terminate(LimitReached::NodeLimit { limit: 5 });
        assert_eq!(stop.to_string(), "Terminate: node limit of 5 reached");
        assert_eq!(PruneReason::BoundDominated.to_string(), "BoundDominated");
    }
}
