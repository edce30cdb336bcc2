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

//! Property tests for the exact allocator on small random catalogs.
//!
//! Every generated procedure consumes a positive amount of every resource,
//! so every budget is finite and the search always terminates with a proof.

use proptest::prelude::*;
use theatre_lp::{bounds::BoundOverrides, result::RelaxationResult};
use theatre_model::{
    budget::ResourceBudget,
    catalog::{Catalog, CatalogEntry},
    index::DimensionIndex,
};
use theatre_solver::{solve_allocation, solve_relaxation};

type Entry = (u32, Vec<u32>);

fn build(entries: Vec<Entry>, limits: Vec<u32>) -> (Catalog, ResourceBudget) {
    let catalog = Catalog::new(
        entries
            .into_iter()
            .enumerate()
            .map(|(i, (weight, consumption))| {
                let consumption = consumption.into_iter().map(f64::from);
                CatalogEntry::new(format!("P{i}"), f64::from(weight), consumption)
            })
            .collect(),
    )
    .unwrap();
    let budget = ResourceBudget::from_pairs(
        limits
            .into_iter()
            .enumerate()
            .map(|(d, limit)| (format!("r{d}"), f64::from(limit))),
    )
    .unwrap();
    (catalog, budget)
}

fn instance(
    max_procedures: usize,
    max_limit: u32,
) -> impl Strategy<Value = (Catalog, ResourceBudget)> {
    (1usize..=max_procedures, 1usize..=3)
        .prop_flat_map(move |(n, dims)| {
            (
                prop::collection::vec((0u32..20, prop::collection::vec(1u32..10, dims)), n),
                prop::collection::vec(0u32..max_limit, dims),
            )
        })
        .prop_map(|(entries, limits)| build(entries, limits))
}

/// Catalogs priced like the reference data: fractional weights and limits,
/// costs in the thousands and cost limits in the hundreds of thousands. Some
/// cost limits sit a few hundred-thousandths below a whole multiple of the
/// first procedure's cost, where the relaxation is integral only up to
/// rounding.
fn priced_instance() -> impl Strategy<Value = (Catalog, ResourceBudget)> {
    prop::collection::vec((1u32..2_000, 1u32..10, 1_000u32..30_000), 1..=3)
        .prop_flat_map(|entries| {
            let anchor = f64::from(entries[0].2);
            let cost_limit = prop_oneof![
                (0u32..50_000_000).prop_map(|cents| f64::from(cents) / 100.0),
                (1u32..20, 0u32..3).prop_map(move |(units, shave)| {
                    anchor * f64::from(units) - f64::from(shave) * 1e-5
                }),
            ];
            (Just(entries), 0u32..4_000, cost_limit)
        })
        .prop_map(|(entries, time_cents, cost_limit)| {
            let catalog = Catalog::new(
                entries
                    .into_iter()
                    .enumerate()
                    .map(|(i, (weight_cents, time, cost))| {
                        let weight = f64::from(weight_cents) / 100.0;
                        let consumption = [f64::from(time), f64::from(cost)];
                        CatalogEntry::new(format!("P{i}"), weight, consumption)
                    })
                    .collect(),
            )
            .unwrap();
            let budget = ResourceBudget::from_pairs([
                ("time", f64::from(time_cents) / 100.0),
                ("cost", cost_limit),
            ])
            .unwrap();
            (catalog, budget)
        })
}

/// Exhaustive optimum over the box `0 ..= limit / consumption`.
fn brute_force(catalog: &Catalog, budget: &ResourceBudget) -> f64 {
    let caps: Vec<u64> = catalog
        .entries()
        .iter()
        .map(|entry| {
            budget
                .iter()
                .map(|(d, limit)| (limit.limit() / entry.consumption_in(d)).floor() as u64)
                .min()
                .unwrap_or(0)
        })
        .collect();

    let mut best = 0.0_f64;
    let mut point = vec![0u64; caps.len()];
    loop {
        let fits = budget.iter().all(|(d, limit)| {
            let used: f64 = catalog
                .entries()
                .iter()
                .zip(&point)
                .map(|(entry, &q)| entry.consumption_in(d) * q as f64)
                .sum();
            used <= limit.limit()
        });
        if fits {
            let value: f64 = catalog.weights().zip(&point).map(|(w, &q)| w * q as f64).sum();
            best = best.max(value);
        }

        let mut position = 0;
        loop {
            if position == point.len() {
                return best;
            }
            if point[position] < caps[position] {
                point[position] += 1;
                break;
            }
            point[position] = 0;
            position += 1;
        }
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn allocation_matches_exhaustive_enumeration((catalog, budget) in instance(3, 16)) {
        let result = solve_allocation(&catalog, &budget).unwrap();
        prop_assert!(result.is_optimal(), "{}", result);

        let expected = brute_force(&catalog, &budget);
        let objective = result.objective().unwrap();
        prop_assert!(
            (objective - expected).abs() < 1e-6,
            "expected {}, got {}",
            expected,
            objective
        );
    }

    #[test]
    fn priced_allocation_matches_exhaustive_enumeration((catalog, budget) in priced_instance()) {
        let result = solve_allocation(&catalog, &budget).unwrap();
        prop_assert!(result.is_optimal(), "{}", result);

        let allocation = result.allocation().unwrap();
        prop_assert!(allocation.is_feasible(&catalog, &budget, 1e-7));

        let expected = brute_force(&catalog, &budget);
        let objective = result.objective().unwrap();
        prop_assert!(
            (objective - expected).abs() < 1e-6,
            "expected {}, got {}",
            expected,
            objective
        );
    }

    #[test]
    fn allocation_is_feasible_and_consistent((catalog, budget) in instance(4, 30)) {
        let result = solve_allocation(&catalog, &budget).unwrap();
        let allocation = result.allocation().unwrap();

        prop_assert_eq!(allocation.len(), catalog.len());
        prop_assert!(allocation.is_feasible(&catalog, &budget, 1e-9));
        prop_assert!((allocation.objective(&catalog) - result.objective().unwrap()).abs() < 1e-6);
    }

    #[test]
    fn relaxation_bounds_the_integer_optimum((catalog, budget) in instance(4, 30)) {
        let relaxed = solve_relaxation(&catalog, &budget, &BoundOverrides::new()).unwrap();
        let bound = match relaxed {
            RelaxationResult::Optimal { objective, .. } => objective,
            other => panic!("unexpected relaxation result {other}"),
        };
        let objective = solve_allocation(&catalog, &budget).unwrap().objective().unwrap();
        prop_assert!(bound >= objective - 1e-6, "bound {} below optimum {}", bound, objective);
    }

    #[test]
    fn zero_budget_schedules_nothing((catalog, budget) in instance(4, 30)) {
        let zero =
            ResourceBudget::from_pairs(budget.iter().map(|(_, l)| (l.name().to_string(), 0.0)))
                .unwrap();
        let result = solve_allocation(&catalog, &zero).unwrap();

        prop_assert!(result.is_optimal());
        prop_assert_eq!(result.objective(), Some(0.0));
        prop_assert!(result.allocation().unwrap().quantities().iter().all(|&q| q == 0));
    }

    #[test]
    fn more_resource_never_lowers_the_optimum(
        (catalog, budget) in instance(4, 24),
        dimension in any::<prop::sample::Index>(),
        extra in 0u32..10,
    ) {
        let d = DimensionIndex::new(dimension.index(budget.len()));
        let larger = budget.with_limit(d, budget.limit(d) + f64::from(extra)).unwrap();

        let base = solve_allocation(&catalog, &budget).unwrap().objective().unwrap();
        let grown = solve_allocation(&catalog, &larger).unwrap().objective().unwrap();
        prop_assert!(grown >= base - 1e-9, "{} dropped to {}", base, grown);
    }

    #[test]
    fn repeated_solves_are_identical((catalog, budget) in instance(4, 30)) {
        let first = solve_allocation(&catalog, &budget).unwrap();
        let second = solve_allocation(&catalog, &budget).unwrap();
        prop_assert_eq!(first, second);
    }
}
