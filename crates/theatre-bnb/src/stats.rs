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

use std::time::Duration;

/// Statistics collected during one branch-and-bound search.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct BnbStatistics {
    /// Nodes taken off the frontier, including those pruned on arrival.
    pub nodes_explored: u64,
    /// Relaxations solved to a definite result.
    pub relaxations_solved: u64,
    /// Simplex pivots over all relaxations.
    pub simplex_pivots: u64,
    /// Nodes split into two children.
    pub branchings: u64,
    /// The deepest node explored.
    pub max_depth: u64,
    /// The most nodes waiting on the frontier at once.
    pub max_frontier: u64,
    /// Pruned because the relaxation had no feasible point.
    pub prunings_infeasible: u64,
    /// Pruned because the bound could not beat the incumbent.
    pub prunings_bound: u64,
    /// Pruned because the relaxation failed numerically.
    pub prunings_degenerate: u64,
    /// Times the incumbent was replaced by a strictly better allocation.
    pub solutions_found: u64,
    /// Relaxation objective at the root, an upper bound on any allocation.
    pub root_bound: Option<f64>,
    /// Total time spent in the solver.
    pub time_total: Duration,
}

impl BnbStatistics {
    #[inline]
    pub fn on_node_explored(&mut self) {
        self.nodes_explored = self.nodes_explored.saturating_add(1);
    }

    #[inline]
    pub fn on_relaxation_solved(&mut self, pivots: usize) {
        self.relaxations_solved = self.relaxations_solved.saturating_add(1);
        self.simplex_pivots = self.simplex_pivots.saturating_add(pivots as u64);
    }

    #[inline]
    pub fn on_branching(&mut self) {
        self.branchings = self.branchings.saturating_add(1);
    }

    #[inline]
    pub fn on_depth_update(&mut self, depth: u64) {
        self.max_depth = self.max_depth.max(depth);
    }

    #[inline]
    pub fn on_frontier_size(&mut self, len: usize) {
        self.max_frontier = self.max_frontier.max(len as u64);
    }

    #[inline]
    pub fn on_pruning_infeasible(&mut self) {
        self.prunings_infeasible = self.prunings_infeasible.saturating_add(1);
    }

    #[inline]
    pub fn on_pruning_bound(&mut self) {
        self.prunings_bound = self.prunings_bound.saturating_add(1);
    }

    #[inline]
    pub fn on_pruning_degenerate(&mut self) {
        self.prunings_degenerate = self.prunings_degenerate.saturating_add(1);
    }

    #[inline]
    pub fn on_solution_found(&mut self) {
        self.solutions_found = self.solutions_found.saturating_add(1);
    }

    #[inline]
    pub fn set_root_bound(&mut self, bound: f64) {
        self.root_bound = Some(bound);
    }

    #[inline]
    pub fn set_total_time(&mut self, duration: Duration) {
        self.time_total = duration;
    }
}

impl std::fmt::Display for BnbStatistics {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Theatre-BnB Solver Statistics:")?;
        writeln!(f, "  Nodes explored:        {}", self.nodes_explored)?;
        writeln!(f, "  Relaxations solved:    {}", self.relaxations_solved)?;
        writeln!(f, "  Simplex pivots:        {}", self.simplex_pivots)?;
        writeln!(f, "  Branchings:            {}", self.branchings)?;
        writeln!(f, "  Max depth reached:     {}", self.max_depth)?;
        writeln!(f, "  Max frontier size:     {}", self.max_frontier)?;
        writeln!(f, "  Prunings (infeasible): {}", self.prunings_infeasible)?;
        writeln!(f, "  Prunings (bound):      {}", self.prunings_bound)?;
        writeln!(f, "  Prunings (degenerate): {}", self.prunings_degenerate)?;
        writeln!(f, "  Solutions found:       {}", self.solutions_found)?;
        match self.root_bound {
            Some(bound) => writeln!(f, "  Root bound:            {}", bound)?,
            None => writeln!(f, "  Root bound:            -")?,
        }
        writeln!(f, "  Total time:            {:.2?}", self.time_total)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counters_accumulate() {
        let mut stats = BnbStatistics::default();
        stats.on_node_explored();
        stats.on_node_explored();
        stats.on_relaxation_solved(5);
        stats.on_relaxation_solved(3);
        stats.on_pruning_bound();
        stats.on_pruning_degenerate();
        stats.on_depth_update(4);
        stats.on_depth_update(2);
        stats.on_frontier_size(7);
        stats.on_frontier_size(1);

        assert_eq!(stats.nodes_explored, 2);
        assert_eq!(stats.relaxations_solved, 2);
        assert_eq!(stats.simplex_pivots, 8);
        assert_eq!(stats.prunings_bound, 1);
        assert_eq!(stats.prunings_degenerate, 1);
        assert_eq!(stats.max_depth, 4);
        assert_eq!(stats.max_frontier, 7);
    }

    #[test]
    fn test_counters_saturate() {
        let mut stats = BnbStatistics {
            nodes_explored: u64::MAX,
            ..Default::default()
        };
        stats.on_node_explored();
        assert_eq!(stats.nodes_explored, u64::MAX);
    }

    #[test]
    fn test_display_lists_root_bound() {
        let mut stats = BnbStatistics::default();
        assert!(stats.to_string().contains("Root bound:            -"));
        stats.set_root_bound(18.0);
        assert!(stats.to_string().contains("Root bound:            18"));
    }
}
