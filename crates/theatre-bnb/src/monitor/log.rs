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

//! Progress reporting through `tracing`.
//!
//! Emits an `info` event when the search starts and ends, a `debug` event
//! for every incumbent improvement, and a periodic `info` progress line.
//! The clock is read only on nodes whose count matches `clock_check_mask`.

use crate::{
    monitor::tree_search_monitor::{SearchProgress, TreeSearchMonitor},
    node::SearchNode,
    stats::BnbStatistics,
};
use std::time::{Duration, Instant};
use theatre_model::{allocation::Allocation, budget::ResourceBudget, catalog::Catalog};

#[derive(Debug, Clone)]
pub struct LogTreeSearchMonitor {
    start_time: Instant,
    last_log_time: Instant,
    log_interval: Duration,
    clock_check_mask: u64,
    best_objective: Option<f64>,
}

impl LogTreeSearchMonitor {
    pub fn new(log_interval: Duration, clock_check_mask: u64) -> Self {
        Self {
            start_time: Instant::now(),
            last_log_time: Instant::now(),
            log_interval,
            clock_check_mask,
            best_objective: None,
        }
    }

    /// Objective of the best allocation reported so far.
    #[inline]
    pub fn best_objective(&self) -> Option<f64> {
        self.best_objective
    }

    fn log_line(&mut self, node: &SearchNode, progress: &SearchProgress, stats: &BnbStatistics) {
        let now = Instant::now();
        tracing::info!(
            elapsed = ?now.duration_since(self.start_time),
            nodes = stats.nodes_explored,
            depth = node.depth(),
            frontier = progress.frontier_len,
            bound = ?progress.best_bound,
            incumbent = ?self.best_objective,
            pruned = stats.prunings_bound + stats.prunings_infeasible,
            "branch-and-bound progress"
        );
        self.last_log_time = now;
    }
}

impl Default for LogTreeSearchMonitor {
    fn default() -> Self {
        Self::new(Duration::from_secs(1), 255)
    }
}

impl std::fmt::Display for LogTreeSearchMonitor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "LogTreeSearchMonitor(log_interval: {}s, clock_check_mask: {})",
            self.log_interval.as_secs(),
            self.clock_check_mask
        )
    }
}

impl TreeSearchMonitor for LogTreeSearchMonitor {
    fn name(&self) -> &str {
        "LogTreeSearchMonitor"
    }

    fn on_enter_search(
        &mut self,
        catalog: &Catalog,
        budget: &ResourceBudget,
        _statistics: &BnbStatistics,
    ) {
        self.start_time = Instant::now();
        self.last_log_time = self.start_time;
        self.best_objective = None;
        tracing::info!(
            procedures = catalog.len(),
            dimensions = budget.len(),
            "branch-and-bound started"
        );
    }

    fn on_exit_search(&mut self, statistics: &BnbStatistics) {
        tracing::info!(
            elapsed = ?self.start_time.elapsed(),
            nodes = statistics.nodes_explored,
            relaxations = statistics.relaxations_solved,
            incumbent = ?self.best_objective,
            "branch-and-bound finished"
        );
    }

    fn on_step(
        &mut self,
        node: &SearchNode,
        progress: &SearchProgress,
        statistics: &BnbStatistics,
    ) {
        if (statistics.nodes_explored & self.clock_check_mask) == 0
            && self.last_log_time.elapsed() >= self.log_interval
        {
            self.log_line(node, progress, statistics);
        }
    }

    fn on_solution_found(
        &mut self,
        allocation: &Allocation<u64>,
        objective: f64,
        statistics: &BnbStatistics,
    ) {
        self.best_objective = Some(objective);
        tracing::debug!(
            objective,
            nodes = statistics.nodes_explored,
            %allocation,
            "new incumbent"
        );
    }
}
