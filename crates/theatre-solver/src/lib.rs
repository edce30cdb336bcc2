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

//! # Theatre Solver
//!
//! Public entry points of the surgical resource allocator. Given a catalog
//! of procedures (priority weight and per-unit resource consumption) and a
//! budget of named resource limits, it computes the integer quantities that
//! maximize total weight within every limit, proven optimal or explicitly
//! tagged best-effort.
//!
//! Entry points
//! - `solve_allocation`: exact integer allocation with default settings.
//! - `solve_allocation_with`: the same with a `SolverConfig` and a monitor,
//!   returning statistics alongside the result.
//! - `solve_relaxation`: the continuous relaxation with bound overrides.
//! - `sensitivity::run_sensitivity_sweep`: one allocation per variant of a
//!   budget dimension.
//!
//! Modules
//! - `config`: serialisable configuration.
//! - `logging`: `tracing` subscriber setup for binaries and tests.
//! - `sensitivity`: budget sweeps, sequential and parallel.
//!
//! ```rust
//! use theatre_model::{catalog::{Catalog, CatalogEntry}, budget::ResourceBudget};
//! use theatre_solver::solve_allocation;
//!
//! let catalog = Catalog::new(vec![
//!     CatalogEntry::surgical("A", 10.0, 0.0, 6.0, 1.0),
//!     CatalogEntry::surgical("B", 8.0, 0.0, 3.0, 1.0),
//!     CatalogEntry::surgical("C", 6.0, 0.0, 2.0, 1.0),
//! ]).unwrap();
//! let budget = ResourceBudget::from_pairs([
//!     ("cost", f64::INFINITY),
//!     ("time", 6.0),
//!     ("icu", 1.0),
//! ]).unwrap();
//!
//! let result = solve_allocation(&catalog, &budget).unwrap();
//! assert!(result.is_optimal());
//! assert_eq!(result.objective(), Some(10.0));
//! ```

pub mod config;
pub mod logging;
pub mod sensitivity;

use crate::config::SolverConfig;
use theatre_bnb::{
    bnb::BnbSolver,
    error::AllocationError,
    monitor::{
        composite::CompositeTreeSearchMonitor, log::LogTreeSearchMonitor,
        tree_search_monitor::TreeSearchMonitor,
    },
    result::{AllocationResult, BnbOutcome},
};
use theatre_model::{budget::ResourceBudget, catalog::Catalog};

pub use theatre_lp::solve_relaxation;

/// Computes the optimal integer allocation of `catalog` under `budget`.
///
/// Invalid inputs are rejected before any search starts. Without limits
/// the result is `Optimal` unless a relaxation failed numerically, in which
/// case it is `BestEffort`.
pub fn solve_allocation(
    catalog: &Catalog,
    budget: &ResourceBudget,
) -> Result<AllocationResult, AllocationError> {
    BnbSolver::default()
        .solve(catalog, budget)
        .map(BnbOutcome::into_result)
}

/// Computes an allocation under `config`, reporting search events to
/// `monitor`.
pub fn solve_allocation_with<S>(
    catalog: &Catalog,
    budget: &ResourceBudget,
    config: &SolverConfig,
    monitor: S,
) -> Result<BnbOutcome, AllocationError>
where
    S: TreeSearchMonitor,
{
    let mut solver = BnbSolver::new(config.into());
    if config.log_progress {
        let mut monitors = CompositeTreeSearchMonitor::with_capacity(2);
        monitors.add_monitor(LogTreeSearchMonitor::default());
        monitors.add_monitor(monitor);
        solver.solve_with_monitor(catalog, budget, monitors)
    } else {
        solver.solve_with_monitor(catalog, budget, monitor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use theatre_bnb::{monitor::no_op::NoOperationMonitor, result::LimitReached};
    use theatre_lp::{bounds::BoundOverrides, result::RelaxationResult};
    use theatre_model::{
        catalog::CatalogEntry,
        scenario::{Scenario, reference_procedures},
    };

    fn assert_close(actual: Option<f64>, expected: f64) {
        let actual = actual.expect("an objective");
        assert!((actual - expected).abs() < 1e-6, "expected {expected}, got {actual}");
    }

    #[test]
    fn test_reference_scenarios_are_solved_to_optimality() {
        for (scenario, expected) in Scenario::presets().into_iter().zip([254.75, 441.5, 165.5]) {
            let catalog = scenario.catalog().unwrap();
            let budget = scenario.resource_budget().unwrap();
            let result = solve_allocation(&catalog, &budget).unwrap();

            assert!(result.is_optimal(), "{} was not optimal: {}", scenario, result);
            assert_close(result.objective(), expected);
            let allocation = result.allocation().unwrap();
            assert!(allocation.is_feasible(&catalog, &budget, 0.0));
            assert_eq!(allocation.len(), reference_procedures().len());
        }
    }

    #[test]
    fn test_pessimistic_scenario_allocation() {
        let scenario = Scenario::pessimistic();
        let catalog = scenario.catalog().unwrap();
        let budget = scenario.resource_budget().unwrap();
        let result = solve_allocation(&catalog, &budget).unwrap();
        let allocation = result.allocation().unwrap();

        assert_eq!(allocation.quantity_of(&catalog, "P1"), Some(8));
        assert_eq!(allocation.quantity_of(&catalog, "P7"), Some(15));
        assert_eq!(allocation.total_quantity(), 23.0);
    }

    #[test]
    fn test_relaxation_bounds_the_integer_optimum() {
        let scenario = Scenario::optimistic();
        let catalog = scenario.catalog().unwrap();
        let budget = scenario.resource_budget().unwrap();

        let relaxed = solve_relaxation(&catalog, &budget, &BoundOverrides::new()).unwrap();
        let integer = solve_allocation(&catalog, &budget).unwrap();
        match relaxed {
            RelaxationResult::Optimal { objective, .. } => {
                assert!(objective + 1e-9 >= integer.objective().unwrap());
            }
            other => panic!("expected an optimal relaxation, got {other}"),
        }
    }

    #[test]
    fn test_solve_with_config_limits() {
        let scenario = Scenario::optimistic();
        let catalog = scenario.catalog().unwrap();
        let budget = scenario.resource_budget().unwrap();
        let config = SolverConfig {
            node_limit: Some(1),
            log_progress: true,
            ..Default::default()
        };

        let outcome =
            solve_allocation_with(&catalog, &budget, &config, NoOperationMonitor::new()).unwrap();
        assert_eq!(outcome.statistics().nodes_explored, 1);
        assert_eq!(
            outcome.result().limit_reached(),
            Some(&LimitReached::NodeLimit { limit: 1 })
        );
        assert!(outcome.result().allocation().unwrap().is_feasible(&catalog, &budget, 0.0));
    }

    #[test]
    fn test_unit_icu_catalog() {
        let catalog = Catalog::new(vec![
            CatalogEntry::surgical("A", 10.0, 0.0, 6.0, 1.0),
            CatalogEntry::surgical("B", 8.0, 0.0, 3.0, 1.0),
            CatalogEntry::surgical("C", 6.0, 0.0, 2.0, 0.0),
        ])
        .unwrap();
        let budget =
            ResourceBudget::from_pairs([("cost", f64::INFINITY), ("time", 6.0), ("icu", 1.0)])
                .unwrap();
        let result = solve_allocation(&catalog, &budget).unwrap();
        assert_eq!(result.allocation().unwrap().quantities(), &[0, 0, 3]);
    }
}
