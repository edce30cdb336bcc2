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

//! Fan-out monitor
//!
//! `CompositeTreeSearchMonitor` forwards every event to its children in
//! insertion order. `search_command` short-circuits on the first
//! non-`Continue` response, so stricter stop conditions go first.

use crate::{
    branching::BranchDecision,
    monitor::tree_search_monitor::{PruneReason, SearchCommand, SearchProgress, TreeSearchMonitor},
    node::SearchNode,
    stats::BnbStatistics,
};
use theatre_model::{allocation::Allocation, budget::ResourceBudget, catalog::Catalog};

/// A tree search monitor that forwards events to all of its children.
pub struct CompositeTreeSearchMonitor<'a> {
    monitors: Vec<Box<dyn TreeSearchMonitor + 'a>>,
}

impl Default for CompositeTreeSearchMonitor<'_> {
    fn default() -> Self {
        Self::new()
    }
}

impl<'a> CompositeTreeSearchMonitor<'a> {
    #[inline]
    pub fn new() -> Self {
        Self {
            monitors: Vec::new(),
        }
    }

    #[inline]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            monitors: Vec::with_capacity(capacity),
        }
    }

    #[inline]
    pub fn add_monitor<M>(&mut self, monitor: M)
    where
        M: TreeSearchMonitor + 'a,
    {
        self.monitors.push(Box::new(monitor));
    }

    #[inline]
    pub fn add_monitor_boxed(&mut self, monitor: Box<dyn TreeSearchMonitor + 'a>) {
        self.monitors.push(monitor);
    }

    #[inline]
    pub fn monitors(&self) -> &[Box<dyn TreeSearchMonitor + 'a>] {
        &self.monitors
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.monitors.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.monitors.is_empty()
    }
}

impl<'a> FromIterator<Box<dyn TreeSearchMonitor + 'a>> for CompositeTreeSearchMonitor<'a> {
    fn from_iter<I>(iter: I) -> Self
    where
        I: IntoIterator<Item = Box<dyn TreeSearchMonitor + 'a>>,
    {
        Self {
            monitors: iter.into_iter().collect(),
        }
    }
}

impl std::fmt::Debug for CompositeTreeSearchMonitor<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(self.monitors.iter().map(|m| m.name())).finish()
    }
}

impl TreeSearchMonitor for CompositeTreeSearchMonitor<'_> {
    fn name(&self) -> &str {
        "CompositeTreeSearchMonitor"
    }

    fn on_enter_search(
        &mut self,
        catalog: &Catalog,
        budget: &ResourceBudget,
        statistics: &BnbStatistics,
    ) {
        for monitor in &mut self.monitors {
            monitor.on_enter_search(catalog, budget, statistics);
        }
    }

    fn on_exit_search(&mut self, statistics: &BnbStatistics) {
        for monitor in &mut self.monitors {
            monitor.on_exit_search(statistics);
        }
    }

    fn search_command(
        &mut self,
        progress: &SearchProgress,
        statistics: &BnbStatistics,
    ) -> SearchCommand {
        for monitor in &mut self.monitors {
            let command = monitor.search_command(progress, statistics);
            if command != SearchCommand::Continue {
                return command;
            }
        }
        SearchCommand::Continue
    }

    fn on_step(
        &mut self,
        node: &SearchNode,
        progress: &SearchProgress,
        statistics: &BnbStatistics,
    ) {
        for monitor in &mut self.monitors {
            monitor.on_step(node, progress, statistics);
        }
    }

    fn on_relaxation_solved(&mut self, node: &SearchNode, bound: f64, statistics: &BnbStatistics) {
        for monitor in &mut self.monitors {
            monitor.on_relaxation_solved(node, bound, statistics);
        }
    }

    fn on_prune(&mut self, node: &SearchNode, reason: PruneReason, statistics: &BnbStatistics) {
        for monitor in &mut self.monitors {
            monitor.on_prune(node, reason, statistics);
        }
    }

    fn on_branch(
        &mut self,
        node: &SearchNode,
        decision: &BranchDecision,
        statistics: &BnbStatistics,
    ) {
        for monitor in &mut self.monitors {
            monitor.on_branch(node, decision, statistics);
        }
    }

    fn on_solution_found(
        &mut self,
        allocation: &Allocation<u64>,
        objective: f64,
        statistics: &BnbStatistics,
    ) {
        for monitor in &mut self.monitors {
            monitor.on_solution_found(allocation, objective, statistics);
        }
    }
}
