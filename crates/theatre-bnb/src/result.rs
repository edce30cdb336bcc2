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

//! Outcomes of an integer allocation search.

use crate::stats::BnbStatistics;
use std::time::Duration;
use theatre_model::allocation::Allocation;

/// Why a search stopped before proving optimality.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LimitReached {
    /// The configured number of explored nodes was reached.
    NodeLimit { limit: u64 },
    /// The configured wall-clock budget elapsed.
    TimeLimit { limit: Duration },
    /// The search finished, but some relaxations failed numerically and
    /// their subtrees were discarded unexplored.
    NumericDegeneracy { pruned_nodes: u64 },
    /// A monitor asked the search to stop.
    Interrupted(String),
}

impl std::fmt::Display for LimitReached {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LimitReached::NodeLimit { limit } => write!(f, "node limit of {} reached", limit),
            LimitReached::TimeLimit { limit } => {
                write!(f, "time limit of {:.3}s reached", limit.as_secs_f64())
            }
            LimitReached::NumericDegeneracy { pruned_nodes } => {
                write!(f, "{} node(s) discarded after numeric degeneracy", pruned_nodes)
            }
            LimitReached::Interrupted(reason) => write!(f, "interrupted: {}", reason),
        }
    }
}

/// The allocation produced by a search.
#[derive(Debug, Clone, PartialEq)]
pub enum AllocationResult {
    /// Provably maximal among all feasible integer allocations.
    Optimal {
        allocation: Allocation<u64>,
        objective: f64,
    },
    /// Feasible, but not proven optimal. Without any integer solution found
    /// before stopping this is the all-zero allocation.
    BestEffort {
        allocation: Allocation<u64>,
        objective: f64,
        explored: u64,
        limit_reached: LimitReached,
    },
    /// The root relaxation admits no allocation at all.
    Infeasible,
}

impl AllocationResult {
    #[inline]
    pub fn is_optimal(&self) -> bool {
        matches!(self, AllocationResult::Optimal { .. })
    }

    #[inline]
    pub fn is_best_effort(&self) -> bool {
        matches!(self, AllocationResult::BestEffort { .. })
    }

    #[inline]
    pub fn is_infeasible(&self) -> bool {
        matches!(self, AllocationResult::Infeasible)
    }

    #[inline]
    pub fn allocation(&self) -> Option<&Allocation<u64>> {
        match self {
            AllocationResult::Optimal { allocation, .. }
            | AllocationResult::BestEffort { allocation, .. } => Some(allocation),
            AllocationResult::Infeasible => None,
        }
    }

    #[inline]
    pub fn objective(&self) -> Option<f64> {
        match self {
            AllocationResult::Optimal { objective, .. }
            | AllocationResult::BestEffort { objective, .. } => Some(*objective),
            AllocationResult::Infeasible => None,
        }
    }

    #[inline]
    pub fn limit_reached(&self) -> Option<&LimitReached> {
        match self {
            AllocationResult::BestEffort { limit_reached, .. } => Some(limit_reached),
            _ => None,
        }
    }
}

impl std::fmt::Display for AllocationResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AllocationResult::Optimal {
                allocation,
                objective,
            } => write!(f, "Optimal({}, objective: {})", allocation, objective),
            AllocationResult::BestEffort {
                allocation,
                objective,
                explored,
                limit_reached,
            } => write!(
                f,
                "BestEffort({}, objective: {}, explored: {}, {})",
                allocation, objective, explored, limit_reached
            ),
            AllocationResult::Infeasible => write!(f, "Infeasible"),
        }
    }
}

/// Reason a search terminated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TerminationReason {
    OptimalityProven,
    InfeasibilityProven,
    Aborted(LimitReached),
}

impl std::fmt::Display for TerminationReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TerminationReason::OptimalityProven => write!(f, "Optimality Proven"),
            TerminationReason::InfeasibilityProven => write!(f, "Infeasibility Proven"),
            TerminationReason::Aborted(limit) => write!(f, "Aborted: {}", limit),
        }
    }
}

/// Result of the solver after termination.
#[derive(Debug, Clone)]
pub struct BnbOutcome {
    result: AllocationResult,
    termination_reason: TerminationReason,
    statistics: BnbStatistics,
}

impl BnbOutcome {
    #[inline]
    pub fn optimal(allocation: Allocation<u64>, objective: f64, statistics: BnbStatistics) -> Self {
        Self {
            result: AllocationResult::Optimal {
                allocation,
                objective,
            },
            termination_reason: TerminationReason::OptimalityProven,
            statistics,
        }
    }

    #[inline]
    pub fn infeasible(statistics: BnbStatistics) -> Self {
        Self {
            result: AllocationResult::Infeasible,
            termination_reason: TerminationReason::InfeasibilityProven,
            statistics,
        }
    }

    /// A search that stopped early. `best` is the incumbent, if any; without
    /// one the all-zero allocation over `num_procedures` is reported.
    pub fn aborted(
        best: Option<(Allocation<u64>, f64)>,
        num_procedures: usize,
        limit_reached: LimitReached,
        statistics: BnbStatistics,
    ) -> Self {
        let (allocation, objective) =
            best.unwrap_or_else(|| (Allocation::zeros(num_procedures), 0.0));
        Self {
            result: AllocationResult::BestEffort {
                allocation,
                objective,
                explored: statistics.nodes_explored,
                limit_reached: limit_reached.clone(),
            },
            termination_reason: TerminationReason::Aborted(limit_reached),
            statistics,
        }
    }

    #[inline]
    pub fn result(&self) -> &AllocationResult {
        &self.result
    }

    #[inline]
    pub fn termination_reason(&self) -> &TerminationReason {
        &self.termination_reason
    }

    #[inline]
    pub fn statistics(&self) -> &BnbStatistics {
        &self.statistics
    }

    #[inline]
    pub fn into_result(self) -> AllocationResult {
        self.result
    }
}

impl std::fmt::Display for BnbOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.result, self.termination_reason)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stats(nodes: u64) -> BnbStatistics {
        BnbStatistics {
            nodes_explored: nodes,
            ..Default::default()
        }
    }

    #[test]
    fn test_aborted_without_incumbent_reports_zero_allocation() {
        let outcome = BnbOutcome::aborted(None, 3, LimitReached::NodeLimit { limit: 1 }, stats(1));
        match outcome.result() {
            AllocationResult::BestEffort {
                allocation,
                objective,
                explored,
                limit_reached,
            } => {
                assert_eq!(allocation.quantities(), &[0, 0, 0]);
                assert_eq!(*objective, 0.0);
                assert_eq!(*explored, 1);
                assert_eq!(limit_reached, &LimitReached::NodeLimit { limit: 1 });
            }
            other => panic!("expected BestEffort, got {}", other),
        }
        assert_eq!(
            outcome.termination_reason(),
            &TerminationReason::Aborted(LimitReached::NodeLimit { limit: 1 })
        );
    }

    #[test]
    fn test_aborted_keeps_incumbent() {
        let best = (Allocation::new(vec![1, 0, 2]), 16.0);
        let outcome = BnbOutcome::aborted(
            Some(best),
            3,
            LimitReached::Interrupted("user".into()),
            stats(9),
        );
        assert!(outcome.result().is_best_effort());
        assert_eq!(outcome.result().objective(), Some(16.0));
        assert_eq!(
            outcome.result().allocation().map(|a| a.quantities().to_vec()),
            Some(vec![1, 0, 2])
        );
    }

    #[test]
    fn test_optimal_and_infeasible_accessors() {
        let optimal = BnbOutcome::optimal(Allocation::new(vec![0, 0, 3]), 18.0, stats(1));
        assert!(optimal.result().is_optimal());
        assert_eq!(optimal.result().limit_reached(), None);
        assert_eq!(
            optimal.termination_reason(),
            &TerminationReason::OptimalityProven
        );

        let infeasible = BnbOutcome::infeasible(stats(1));
        assert!(infeasible.result().is_infeasible());
        assert_eq!(infeasible.result().allocation(), None);
        assert_eq!(infeasible.into_result().objective(), None);
    }

    #[test]
    fn test_display() {
        let outcome = BnbOutcome::optimal(Allocation::new(vec![1, 0]), 10.0, stats(1));
        assert_eq!(
            outcome.to_string(),
            "Optimal(Allocation[1, 0], objective: 10) (Optimality Proven)"
        );
        assert_eq!(
            LimitReached::NumericDegeneracy { pruned_nodes: 2 }.to_string(),
            "2 node(s) discarded after numeric degeneracy"
        );
    }
}
