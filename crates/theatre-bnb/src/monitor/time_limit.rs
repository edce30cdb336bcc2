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
use std::time::{Duration, Instant};
use theatre_model::{allocation::Allocation, budget::ResourceBudget, catalog::Catalog};

/// A monitor that terminates the search after a specified duration.
///
/// Checks the clock only every `check_interval` commands.
#[derive(Debug, Clone)]
pub struct TimeLimitMonitor {
    time_limit: Duration,
    start_time: Option<Instant>,
    check_interval: u64,
    ops_since_last_check: u64,
}

impl TimeLimitMonitor {
    /// Creates a new `TimeLimitMonitor`. A higher `check_interval` reduces
    /// overhead but may overshoot the limit by that many nodes.
    pub fn new(time_limit: Duration, check_interval: u64) -> Self {
        Self {
            time_limit,
            start_time: None,
            check_interval: check_interval.max(1),
            ops_since_last_check: 0,
        }
    }

    /// Creates a new `TimeLimitMonitor` that checks the clock every 16 nodes.
    pub fn with_default_check_interval(time_limit: Duration) -> Self {
        Self::new(time_limit, 16)
    }

    #[inline]
    pub fn time_limit(&self) -> Duration {
        self.time_limit
    }
}

impl std::fmt::Display for TimeLimitMonitor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "TimeLimitMonitor(limit: {:.3}s, check_interval: {})",
            self.time_limit.as_secs_f64(),
            self.check_interval
        )
    }
}

impl TreeSearchMonitor for TimeLimitMonitor {
    fn name(&self) -> &str {
        "TimeLimitMonitor"
    }

    fn on_enter_search(
        &mut self,
        _catalog: &Catalog,
        _budget: &ResourceBudget,
        _statistics: &BnbStatistics,
    ) {
        self.start_time = Some(Instant::now());
        self.ops_since_last_check = 0;
    }

    fn on_exit_search(&mut self, _statistics: &BnbStatistics) {
        self.start_time = None;
    }

    fn search_command(
        &mut self,
        _progress: &SearchProgress,
        _statistics: &BnbStatistics,
    ) -> SearchCommand {
        self.ops_since_last_check = self.ops_since_last_check.saturating_add(1);

        if self.ops_since_last_check >= self.check_interval {
            self.ops_since_last_check = 0;

            if let Some(start) = self.start_time
                && start.elapsed() >= self.time_limit
            {
                return SearchCommand::Terminate(LimitReached::TimeLimit {
                    limit: self.time_limit,
                });
            }
        }

        SearchCommand::Continue
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
    use theatre_model::catalog::CatalogEntry;

    fn progress() -> SearchProgress {
        SearchProgress {
            frontier_len: 1,
            best_bound: None,
            incumbent: None,
        }
    }

    fn enter(monitor: &mut TimeLimitMonitor) {
        let catalog = Catalog::new(vec![CatalogEntry::new("A", 1.0, [1.0])]).unwrap();
        let budget = ResourceBudget::from_pairs([("cost", 1.0)]).unwrap();
        monitor.on_enter_search(&catalog, &budget, &BnbStatistics::default());
    }

    #[test]
    fn test_zero_limit_terminates_on_first_check() {
        let mut monitor = TimeLimitMonitor::new(Duration::ZERO, 1);
        enter(&mut monitor);
        assert_eq!(
            monitor.search_command(&progress(), &BnbStatistics::default()),
            SearchCommand::Terminate(LimitReached::TimeLimit {
                limit: Duration::ZERO
            })
        );
    }

    #[test]
    fn test_generous_limit_continues() {
        let mut monitor = TimeLimitMonitor::with_default_check_interval(Duration::from_secs(3600));
        enter(&mut monitor);
        for _ in 0..100 {
            assert_eq!(
                monitor.search_command(&progress(), &BnbStatistics::default()),
                SearchCommand::Continue
            );
        }
    }

    #[test]
    fn test_not_started_never_terminates() {
        let mut monitor = TimeLimitMonitor::new(Duration::ZERO, 1);
        assert_eq!(
            monitor.search_command(&progress(), &BnbStatistics::default()),
            SearchCommand::Continue
        );
    }
}
