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

use crate::{
    monitor::tree_search_monitor::{SearchCommand, SearchProgress, TreeSearchMonitor},
    node::SearchNode,
    result::LimitReached,
    stats::BnbStatistics,
};
use theatre_model::{allocation::Allocation, budget::ResourceBudget, catalog::Catalog};

/// A monitor that terminates the search once `limit` nodes were explored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NodeLimitMonitor {
    limit: u64,
}

impl NodeLimitMonitor {
    #[inline]
    pub fn new(limit: u64) -> Self {
        Self { limit }
    }

    #[inline]
    pub fn limit(&self) -> u64 {
        self.limit
    }
}

impl std::fmt::Display for NodeLimitMonitor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "NodeLimitMonitor(limit: {})", self.limit)
    }
}

impl TreeSearchMonitor for NodeLimitMonitor {
    fn name(&self) -> &str {
        "NodeLimitMonitor"
    }

    fn on_enter_search(
        &mut self,
        _catalog: &Catalog,
        _budget: &ResourceBudget,
        _statistics: &BnbStatistics,
    ) {
    }

    fn on_exit_search(&mut self, _statistics: &BnbStatistics) {}

    fn search_command(
        &mut self,
        _progress: &SearchProgress,
        statistics: &BnbStatistics,
    ) -> SearchCommand {
        if statistics.nodes_explored >= self.limit {
            SearchCommand::Terminate(LimitReached::NodeLimit { limit: self.limit })
        } else {
            SearchCommand::Continue
        }
    }

    fn on_step(
        &mut self,
        _node: &SearchNode,
        _progress: &SearchProgress,
        _statistics: &BnbStatistics,
    ) {
    }

    fn on_solution_found(
        &mut self,
        _allocation: &Allocation<u64>,
        _objective: f64,
        _statistics: &BnbStatistics,
    ) {
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn progress() -> SearchProgress {
        SearchProgress {
            frontier_len: 1,
            best_bound: Some(1.0),
            incumbent: None,
        }
    }

    #[test]
    fn test_terminates_at_limit() {
        let mut monitor = NodeLimitMonitor::new(2);
        let mut stats = BnbStatistics::default();
        assert_eq!(monitor.search_command(&progress(), &stats), SearchCommand::Continue);
        stats.on_node_explored();
        assert_eq!(monitor.search_command(&progress(), &stats), SearchCommand::Continue);
        stats.on_node_explored();
        assert_eq!(
            monitor.search_command(&progress(), &stats),
            SearchCommand::Terminate(LimitReached::NodeLimit { limit: 2 })
        );
    }

    #[test]
    fn test_zero_limit_terminates_immediately() {
        let mut monitor = NodeLimitMonitor::new(0);
        assert!(matches!(
            monitor.search_command(&progress(), &BnbStatistics::default()),
            SearchCommand::Terminate(_)
        ));
    }
}
