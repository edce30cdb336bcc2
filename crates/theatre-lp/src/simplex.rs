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

//! Dense two-phase tableau simplex.
//!
//! Column layout of the tableau, left to right:
//!
//! ```text
//! | structural x_j (n) | slack s_i (<=) | surplus e_k (>=) | artificial a_k (>=) | rhs |
//! ```
//!
//! Rows are the finite resource limits, then one `x_j <= u_j` row per upper
//! bound, then one `x_j - e_k + a_k = l_j` row per positive lower bound. The
//! `<=` rows start with their slack in the basis, the `>=` rows with their
//! artificial. Phase one maximizes `-sum(a_k)`; a negative optimum proves
//! infeasibility. Artificial columns never re-enter the basis.
//!
//! The objective row stores reduced costs `c_j - c_B B^-1 A_j`; a column may
//! enter while its reduced cost is positive. The last cell holds `-z`.

use crate::{
    bounds::BoundOverrides,
    config::LpConfig,
    error::LpError,
    result::{RelaxationOutcome, RelaxationResult},
};
use theatre_model::{
    allocation::Allocation, budget::ResourceBudget, catalog::Catalog, index::ProcedureIndex,
};
use tracing::{debug, trace, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PhaseStatus {
    Optimal,
    Unbounded,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PivotRule {
    /// Most positive reduced cost, lowest column on ties.
    Dantzig,
    /// Lowest improving column, lowest basic variable on ratio ties.
    Bland,
}

#[derive(Debug, Clone, Default)]
struct Tableau {
    num_rows: usize,
    num_cols: usize,
    num_structural: usize,
    first_artificial: usize,
    /// Largest resource coefficient, at least one.
    resource_scale: f64,
    cells: Vec<f64>,
    objective: Vec<f64>,
    basis: Vec<usize>,
    pivot_row: Vec<f64>,
}

impl Tableau {
    #[inline(always)]
    fn width(&self) -> usize {
        self.num_cols + 1
    }

    #[inline(always)]
    fn at(&self, row: usize, col: usize) -> f64 {
        self.cells[row * self.width() + col]
    }

    #[inline(always)]
    fn rhs(&self, row: usize) -> f64 {
        self.at(row, self.num_cols)
    }

    #[inline(always)]
    fn has_artificials(&self) -> bool {
        self.first_artificial < self.num_cols
    }

    /// Lays out the constraint rows for the given bounds. Buffers keep their
    /// capacity between calls.
    fn load(
        &mut self,
        catalog: &Catalog,
        budget: &ResourceBudget,
        uppers: &[Option<u64>],
        lowers: &[u64],
    ) {
        let n = catalog.len();
        let resource_rows = budget.limits().iter().filter(|l| !l.is_unbounded()).count();
        let upper_rows = uppers.iter().filter(|u| u.is_some()).count();
        let lower_rows = lowers.iter().filter(|&&l| l > 0).count();
        let le_rows = resource_rows + upper_rows;

        self.num_rows = le_rows + lower_rows;
        self.num_structural = n;
        self.first_artificial = n + le_rows + lower_rows;
        self.num_cols = n + le_rows + 2 * lower_rows;

        let width = self.width();
        self.cells.clear();
        self.cells.resize(self.num_rows * width, 0.0);
        self.objective.clear();
        self.objective.resize(width, 0.0);
        self.basis.clear();
        self.resource_scale = 1.0;

        let mut row = 0;
        for (dimension, limit) in budget.iter() {
            if limit.is_unbounded() {
                continue;
            }
            let offset = row * width;
            for (procedure, entry) in catalog.iter() {
                let coefficient = entry.consumption_in(dimension);
                self.cells[offset + procedure.get()] = coefficient;
                self.resource_scale = self.resource_scale.max(coefficient);
            }
            self.finish_le_row(row, limit.limit());
            row += 1;
        }

        for (j, upper) in uppers.iter().enumerate() {
            if let Some(u) = upper {
                self.cells[row * width + j] = 1.0;
                self.finish_le_row(row, *u as f64);
                row += 1;
            }
        }

        for (j, &lower) in lowers.iter().enumerate() {
            if lower == 0 {
                continue;
            }
            let k = row - le_rows;
            let offset = row * width;
            let artificial = self.first_artificial + k;
            self.cells[offset + j] = 1.0;
            self.cells[offset + n + le_rows + k] = -1.0;
            self.cells[offset + artificial] = 1.0;
            self.cells[offset + self.num_cols] = lower as f64;
            self.basis.push(artificial);
            row += 1;
        }

        debug_assert_eq!(row, self.num_rows);
    }

    #[inline]
    fn finish_le_row(&mut self, row: usize, rhs: f64) {
        let offset = row * self.width();
        let slack = self.num_structural + row;
        self.cells[offset + slack] = 1.0;
        self.cells[offset + self.num_cols] = rhs;
        self.basis.push(slack);
    }

    /// Phase one: maximize `-sum(a_k)`, priced out against the initial basis.
    fn install_phase_one_objective(&mut self) {
        let width = self.width();
        self.objective.fill(0.0);
        for col in self.first_artificial..self.num_cols {
            self.objective[col] = -1.0;
        }
        for row in 0..self.num_rows {
            if self.basis[row] < self.first_artificial {
                continue;
            }
            let offset = row * width;
            for col in 0..width {
                self.objective[col] += self.cells[offset + col];
            }
        }
    }

    /// Phase two: maximize the priority weight, priced out against the
    /// current basis.
    fn install_phase_two_objective(&mut self, catalog: &Catalog) {
        let width = self.width();
        self.objective.fill(0.0);
        for (procedure, entry) in catalog.iter() {
            self.objective[procedure.get()] = entry.weight();
        }
        for row in 0..self.num_rows {
            let basic = self.basis[row];
            if basic >= self.num_structural {
                continue;
            }
            let cost = catalog.entry(ProcedureIndex::new(basic)).weight();
            if cost == 0.0 {
                continue;
            }
            let offset = row * width;
            for col in 0..width {
                self.objective[col] -= cost * self.cells[offset + col];
            }
        }
    }

    /// Sum of the artificial variables after phase one.
    #[inline]
    fn artificial_residual(&self) -> f64 {
        self.objective[self.num_cols]
    }

    /// The phase one residual in resource units. Artificials measure
    /// quantities, and one unit of quantity can consume up to
    /// `resource_scale` of a resource.
    #[inline]
    fn resource_violation(&self) -> f64 {
        self.artificial_residual() * self.resource_scale
    }

    fn entering_column(&self, rule: PivotRule, tolerance: f64) -> Option<usize> {
        let mut candidates = self.objective[..self.first_artificial]
            .iter()
            .enumerate()
            .filter(|(_, reduced)| **reduced > tolerance);

        match rule {
            PivotRule::Bland => candidates.next().map(|(col, _)| col),
            PivotRule::Dantzig => candidates
                .fold(None, |best: Option<(usize, f64)>, (col, &reduced)| match best {
                    Some((_, best_reduced)) if reduced <= best_reduced => best,
                    _ => Some((col, reduced)),
                })
                .map(|(col, _)| col),
        }
    }

    /// Minimum ratio test. A row may replace the row of the true minimum
    /// ratio only if pivoting on it leaves no basic variable below
    /// `-tolerance`; among those rows the rule decides.
    fn leaving_row(&self, col: usize, rule: PivotRule, tolerance: f64) -> Option<usize> {
        let candidates = || {
            (0..self.num_rows).filter_map(move |row| {
                let coefficient = self.at(row, col);
                (coefficient > tolerance).then(|| (row, coefficient, self.rhs(row) / coefficient))
            })
        };

        let (min_ratio, max_coefficient) = candidates()
            .fold(None, |acc: Option<(f64, f64)>, (_, coefficient, ratio)| match acc {
                None => Some((ratio, coefficient)),
                Some((r, c)) => Some((r.min(ratio), c.max(coefficient))),
            })?;
        let window = min_ratio + tolerance / max_coefficient;
        let mut ties = candidates().filter(|&(_, _, ratio)| ratio <= window);

        match rule {
            PivotRule::Dantzig => ties.next().map(|(row, _, _)| row),
            PivotRule::Bland => ties
                .min_by_key(|&(row, _, _)| self.basis[row])
                .map(|(row, _, _)| row),
        }
    }

    fn pivot(&mut self, row: usize, col: usize, tolerance: f64) {
        let width = self.width();
        let start = row * width;
        let inverse = 1.0 / self.cells[start + col];

        self.pivot_row.clear();
        self.pivot_row
            .extend(self.cells[start..start + width].iter().map(|v| v * inverse));
        self.pivot_row[col] = 1.0;
        self.cells[start..start + width].copy_from_slice(&self.pivot_row);

        for other in 0..self.num_rows {
            if other == row {
                continue;
            }
            let offset = other * width;
            let factor = self.cells[offset + col];
            if factor == 0.0 {
                continue;
            }
            let scale = self.cells[offset + self.num_cols]
                .abs()
                .max((factor * self.pivot_row[self.num_cols]).abs())
                .max(1.0);
            for (cell, &p) in self.cells[offset..offset + width]
                .iter_mut()
                .zip(self.pivot_row.iter())
            {
                *cell -= factor * p;
            }
            self.cells[offset + col] = 0.0;
            let rhs = &mut self.cells[offset + self.num_cols];
            if *rhs < 0.0 && *rhs > -tolerance * scale {
                *rhs = 0.0;
            }
        }

        let factor = self.objective[col];
        if factor != 0.0 {
            for (cell, &p) in self.objective.iter_mut().zip(self.pivot_row.iter()) {
                *cell -= factor * p;
            }
            self.objective[col] = 0.0;
        }

        self.basis[row] = col;
    }

    /// Pivots artificials that are still basic (at level zero) out of the
    /// basis on the largest available coefficient. Rows with no usable
    /// column are redundant and keep their artificial, which can never grow
    /// again.
    fn drive_out_artificials(&mut self, tolerance: f64) -> usize {
        let mut pivots = 0;
        for row in 0..self.num_rows {
            if self.basis[row] < self.first_artificial {
                continue;
            }
            let largest = (0..self.first_artificial)
                .map(|col| (col, self.at(row, col).abs()))
                .filter(|&(_, magnitude)| magnitude > tolerance)
                .fold(None, |best: Option<(usize, f64)>, (col, magnitude)| match best {
                    Some((_, best_magnitude)) if magnitude <= best_magnitude => best,
                    _ => Some((col, magnitude)),
                });
            if let Some((col, _)) = largest {
                self.pivot(row, col, tolerance);
                pivots += 1;
            }
        }
        pivots
    }

    fn primal(&self, tolerance: f64) -> Allocation<f64> {
        let mut quantities = vec![0.0; self.num_structural];
        for (row, &basic) in self.basis.iter().enumerate() {
            if basic < self.num_structural {
                quantities[basic] = self.rhs(row);
            }
        }
        Allocation::new(quantities).cleaned(tolerance)
    }
}

/// Reusable relaxation solver.
///
/// Holds the tableau buffers so that repeated solves over the same catalog
/// (one per branch-and-bound node) do not reallocate.
#[derive(Debug, Clone, Default)]
pub struct RelaxationSolver {
    config: LpConfig,
    tableau: Tableau,
    uppers: Vec<Option<u64>>,
    lowers: Vec<u64>,
}

impl RelaxationSolver {
    #[inline]
    pub fn new(config: LpConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    /// Creates a solver with buffers sized for a catalog of `num_procedures`
    /// entries over `num_dimensions` resources.
    pub fn preallocated(config: LpConfig, num_procedures: usize, num_dimensions: usize) -> Self {
        let rows = num_dimensions + 2 * num_procedures;
        let cols = num_procedures + rows + num_procedures + 1;
        let mut solver = Self::new(config);
        solver.tableau.cells.reserve(rows * cols);
        solver.tableau.objective.reserve(cols);
        solver.tableau.basis.reserve(rows);
        solver.tableau.pivot_row.reserve(cols);
        solver.uppers.reserve(num_procedures);
        solver.lowers.reserve(num_procedures);
        solver
    }

    #[inline]
    pub fn config(&self) -> &LpConfig {
        &self.config
    }

    /// Solves the relaxation of `catalog` under `budget`, tightened by
    /// `overrides` and by every entry's demand cap.
    pub fn solve(
        &mut self,
        catalog: &Catalog,
        budget: &ResourceBudget,
        overrides: &BoundOverrides,
    ) -> Result<RelaxationOutcome, LpError> {
        catalog.validate_against(budget)?;
        let len = catalog.len();
        if let Some(procedure) = overrides.first_out_of_range(len) {
            return Err(LpError::OverrideOutOfRange { procedure, len });
        }

        self.collect_bounds(catalog, overrides);
        if let Some(j) = (0..len).find(|&j| self.uppers[j].is_some_and(|u| self.lowers[j] > u)) {
            trace!(procedure = catalog.entries()[j].id(), "contradictory bounds");
            return Ok(RelaxationOutcome::new(RelaxationResult::Infeasible, 0));
        }

        self.tableau.load(catalog, budget, &self.uppers, &self.lowers);
        let tolerance = self.config.pivot_tolerance;
        let mut pivots = 0;

        if self.tableau.has_artificials() {
            self.tableau.install_phase_one_objective();
            // Phase one is bounded by zero; running out of leaving rows here
            // is numerical breakdown.
            if self.run_phase(&mut pivots)? == PhaseStatus::Unbounded {
                return Err(LpError::NumericDegeneracy { iterations: pivots });
            }
            let residual = self.tableau.artificial_residual();
            if self.tableau.resource_violation() > self.config.feasibility_tolerance {
                trace!(residual, pivots, "phase one proved infeasibility");
                return Ok(RelaxationOutcome::new(RelaxationResult::Infeasible, pivots));
            }
            pivots += self.tableau.drive_out_artificials(tolerance);
        }

        if let Some(procedure) = self.unbounded_direction(catalog, budget) {
            warn!(
                procedure = catalog.entry(procedure).id(),
                "relaxation is unbounded: positive weight without any finite resource consumption"
            );
            return Ok(RelaxationOutcome::new(
                RelaxationResult::Unbounded { procedure },
                pivots,
            ));
        }

        self.tableau.install_phase_two_objective(catalog);
        if self.run_phase(&mut pivots)? == PhaseStatus::Unbounded {
            return Err(LpError::NumericDegeneracy { iterations: pivots });
        }

        let allocation = self.tableau.primal(tolerance);
        let objective = allocation.objective(catalog);
        debug!(
            rows = self.tableau.num_rows,
            cols = self.tableau.num_cols,
            pivots,
            objective,
            "relaxation solved"
        );

        Ok(RelaxationOutcome::new(
            RelaxationResult::Optimal {
                allocation,
                objective,
            },
            pivots,
        ))
    }

    /// Effective bounds: override bounds combined with demand caps.
    fn collect_bounds(&mut self, catalog: &Catalog, overrides: &BoundOverrides) {
        self.uppers.clear();
        self.lowers.clear();
        for (procedure, entry) in catalog.iter() {
            let bounds = overrides.get(procedure);
            let upper = match (entry.demand(), bounds.upper) {
                (Some(d), Some(u)) => Some(d.min(u)),
                (d, u) => d.or(u),
            };
            self.uppers.push(upper);
            self.lowers.push(bounds.lower);
        }
    }

    /// The first procedure along which the objective can grow forever: it has
    /// a positive weight, no upper bound and consumes nothing in any finite
    /// dimension. Every other procedure is bounded by some row.
    fn unbounded_direction(
        &self,
        catalog: &Catalog,
        budget: &ResourceBudget,
    ) -> Option<ProcedureIndex> {
        catalog
            .iter()
            .find(|(procedure, entry)| {
                entry.weight() > 0.0
                    && self.uppers[procedure.get()].is_none()
                    && budget
                        .iter()
                        .all(|(d, limit)| limit.is_unbounded() || entry.consumption_in(d) == 0.0)
            })
            .map(|(procedure, _)| procedure)
    }

    fn run_phase(&mut self, pivots: &mut usize) -> Result<PhaseStatus, LpError> {
        let tolerance = self.config.pivot_tolerance;
        let mut rule = PivotRule::Dantzig;
        let mut degenerate_streak = 0usize;

        loop {
            let Some(col) = self.tableau.entering_column(rule, tolerance) else {
                return Ok(PhaseStatus::Optimal);
            };
            let Some(row) = self.tableau.leaving_row(col, rule, tolerance) else {
                return Ok(PhaseStatus::Unbounded);
            };
            if *pivots >= self.config.max_iterations {
                debug!(pivots = *pivots, "pivot limit reached");
                return Err(LpError::NumericDegeneracy {
                    iterations: *pivots,
                });
            }

            let degenerate = self.tableau.rhs(row) <= tolerance;
            self.tableau.pivot(row, col, tolerance);
            *pivots += 1;

            if degenerate {
                degenerate_streak += 1;
                if rule == PivotRule::Dantzig
                    && degenerate_streak >= self.config.degenerate_pivots_before_bland
                {
                    trace!(degenerate_streak, "switching to Bland's rule");
                    rule = PivotRule::Bland;
                }
            } else {
                degenerate_streak = 0;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use theatre_model::{
        catalog::CatalogEntry,
        error::{CatalogViolation, ModelError},
    };

    fn p(i: usize) -> ProcedureIndex {
        ProcedureIndex::new(i)
    }

    fn budget(cost: f64, time: f64, icu: f64) -> ResourceBudget {
        ResourceBudget::from_pairs([("cost", cost), ("time", time), ("icu", icu)])
            .expect("valid budget")
    }

    fn solve(
        catalog: &Catalog,
        budget: &ResourceBudget,
        overrides: &BoundOverrides,
    ) -> RelaxationOutcome {
        RelaxationSolver::new(LpConfig::default())
            .solve(catalog, budget, overrides)
            .expect("relaxation should not fail")
    }

    fn optimal(outcome: RelaxationOutcome) -> (Allocation<f64>, f64) {
        match outcome.into_result() {
            RelaxationResult::Optimal {
                allocation,
                objective,
            } => (allocation, objective),
            other => panic!("expected an optimal relaxation, got {other}"),
        }
    }

    fn assert_close(actual: f64, expected: f64) {
        assert!(
            (actual - expected).abs() < 1e-7,
            "expected {expected}, got {actual}"
        );
    }

    #[test]
    fn test_time_bound_relaxation_prefers_best_ratio() {
        let catalog = Catalog::new(vec![
            CatalogEntry::surgical("A", 10.0, 0.0, 6.0, 1.0),
            CatalogEntry::surgical("B", 8.0, 0.0, 3.0, 1.0),
            CatalogEntry::surgical("C", 6.0, 0.0, 2.0, 0.0),
        ])
        .expect("valid catalog");
        let outcome = solve(&catalog, &budget(f64::INFINITY, 6.0, 1.0), &BoundOverrides::new());
        assert!(outcome.pivots() >= 1);
        let (allocation, objective) = optimal(outcome);

        assert_close(objective, 18.0);
        assert_close(allocation.quantity(p(0)), 0.0);
        assert_close(allocation.quantity(p(1)), 0.0);
        assert_close(allocation.quantity(p(2)), 3.0);
    }

    #[test]
    fn test_icu_bound_relaxation_is_integral() {
        let catalog = Catalog::new(vec![
            CatalogEntry::surgical("A", 10.0, 0.0, 6.0, 1.0),
            CatalogEntry::surgical("B", 8.0, 0.0, 3.0, 1.0),
            CatalogEntry::surgical("C", 6.0, 0.0, 2.0, 1.0),
        ])
        .expect("valid catalog");
        let (allocation, objective) = optimal(solve(
            &catalog,
            &budget(f64::INFINITY, 6.0, 1.0),
            &BoundOverrides::new(),
        ));

        assert_close(objective, 10.0);
        assert!(allocation.is_integral(1e-9));
        assert_eq!(allocation.to_integral().quantities(), &[1, 0, 0]);
    }

    #[test]
    fn test_fractional_vertex_and_overrides() {
        let catalog = Catalog::new(vec![CatalogEntry::new("A", 5.0, [2.0])]).expect("valid");
        let budget = ResourceBudget::from_pairs([("time", 3.0)]).expect("valid");

        let (allocation, objective) = optimal(solve(&catalog, &budget, &BoundOverrides::new()));
        assert_close(allocation.quantity(p(0)), 1.5);
        assert_close(objective, 7.5);

        let down = BoundOverrides::new().with_upper(p(0), 1);
        let (allocation, objective) = optimal(solve(&catalog, &budget, &down));
        assert_close(allocation.quantity(p(0)), 1.0);
        assert_close(objective, 5.0);

        let up_ok = BoundOverrides::new().with_lower(p(0), 1);
        let (allocation, _) = optimal(solve(&catalog, &budget, &up_ok));
        assert_close(allocation.quantity(p(0)), 1.5);

        let up_too_far = BoundOverrides::new().with_lower(p(0), 2);
        assert!(solve(&catalog, &budget, &up_too_far).result().is_infeasible());
    }

    #[test]
    fn test_contradictory_overrides_are_infeasible_without_pivots() {
        let catalog = Catalog::new(vec![CatalogEntry::new("A", 5.0, [2.0])]).expect("valid");
        let budget = ResourceBudget::from_pairs([("time", 3.0)]).expect("valid");
        let overrides = BoundOverrides::new().with_upper(p(0), 0).with_lower(p(0), 1);

        let outcome = solve(&catalog, &budget, &overrides);
        assert!(outcome.result().is_infeasible());
        assert_eq!(outcome.pivots(), 0);
    }

    #[test]
    fn test_lower_bound_on_free_procedure_is_feasible() {
        let catalog = Catalog::new(vec![
            CatalogEntry::new("A", 1.0, [1.0, 0.0]),
            CatalogEntry::new("B", 3.0, [0.0, 2.0]),
        ])
        .expect("valid");
        let budget = ResourceBudget::from_pairs([("cost", 4.0), ("time", 4.0)]).expect("valid");
        let overrides = BoundOverrides::new().with_lower(p(0), 3);

        let (allocation, objective) = optimal(solve(&catalog, &budget, &overrides));
        assert_close(allocation.quantity(p(0)), 4.0);
        assert_close(allocation.quantity(p(1)), 2.0);
        assert_close(objective, 10.0);
    }

    #[test]
    fn test_unbounded_relaxation_is_reported() {
        let catalog = Catalog::new(vec![
            CatalogEntry::surgical("A", 1.0, 5.0, 1.0, 0.0),
            CatalogEntry::surgical("B", 2.0, 5.0, 0.0, 0.0),
        ])
        .expect("valid");
        let budget = budget(f64::INFINITY, 10.0, 1.0);

        let outcome = solve(&catalog, &budget, &BoundOverrides::new());
        assert_eq!(
            outcome.result(),
            &RelaxationResult::Unbounded { procedure: p(1) }
        );

        let capped = BoundOverrides::new().with_upper(p(1), 3);
        let (_, objective) = optimal(solve(&catalog, &budget, &capped));
        assert_close(objective, 10.0 + 6.0);
    }

    #[test]
    fn test_demand_caps_bound_the_relaxation() {
        let catalog = Catalog::new(vec![
            CatalogEntry::surgical("A", 2.0, 0.0, 0.0, 0.0).with_demand(3),
        ])
        .expect("valid");
        let (allocation, objective) = optimal(solve(
            &catalog,
            &budget(f64::INFINITY, 1.0, 1.0),
            &BoundOverrides::new(),
        ));
        assert_close(allocation.quantity(p(0)), 3.0);
        assert_close(objective, 6.0);
    }

    #[test]
    fn test_zero_budget_gives_zero_vertex() {
        let catalog = Catalog::new(vec![
            CatalogEntry::surgical("A", 10.0, 100.0, 6.0, 1.0),
            CatalogEntry::surgical("B", 8.0, 50.0, 3.0, 0.0),
        ])
        .expect("valid");
        let (allocation, objective) =
            optimal(solve(&catalog, &budget(0.0, 0.0, 0.0), &BoundOverrides::new()));
        assert_eq!(allocation.quantities(), &[0.0, 0.0]);
        assert_eq!(objective, 0.0);
    }

    #[test]
    fn test_empty_catalog() {
        let catalog = Catalog::new(Vec::new()).expect("valid");
        let (allocation, objective) =
            optimal(solve(&catalog, &budget(1.0, 1.0, 1.0), &BoundOverrides::new()));
        assert!(allocation.is_empty());
        assert_eq!(objective, 0.0);
    }

    #[test]
    fn test_ties_go_to_lowest_catalog_position() {
        let catalog = Catalog::new(vec![
            CatalogEntry::new("A", 1.0, [1.0]),
            CatalogEntry::new("B", 1.0, [1.0]),
        ])
        .expect("valid");
        let budget = ResourceBudget::from_pairs([("time", 1.0)]).expect("valid");
        let (allocation, _) =
            optimal(solve(&catalog, &budget, &BoundOverrides::new()));
        assert_eq!(allocation.quantities(), &[1.0, 0.0]);
    }

    #[test]
    fn test_dimension_mismatch_is_rejected() {
        let catalog = Catalog::new(vec![CatalogEntry::new("A", 1.0, [1.0])]).expect("valid");
        let err = RelaxationSolver::default()
            .solve(&catalog, &budget(1.0, 1.0, 1.0), &BoundOverrides::new())
            .expect_err("mismatch must be rejected");
        assert!(matches!(
            err,
            LpError::Model(ModelError::InvalidCatalog(
                CatalogViolation::DimensionMismatch { .. }
            ))
        ));
    }

    #[test]
    fn test_override_out_of_range_is_rejected() {
        let catalog = Catalog::new(vec![CatalogEntry::new("A", 1.0, [1.0])]).expect("valid");
        let budget = ResourceBudget::from_pairs([("time", 1.0)]).expect("valid");
        let err = RelaxationSolver::default()
            .solve(&catalog, &budget, &BoundOverrides::new().with_upper(p(3), 1))
            .expect_err("out of range override must be rejected");
        assert_eq!(
            err,
            LpError::OverrideOutOfRange {
                procedure: p(3),
                len: 1
            }
        );
    }

    #[test]
    fn test_pivot_limit_reports_degeneracy() {
        let catalog = Catalog::new(vec![CatalogEntry::new("A", 5.0, [2.0])]).expect("valid");
        let budget = ResourceBudget::from_pairs([("time", 3.0)]).expect("valid");
        let mut solver = RelaxationSolver::new(LpConfig::default().with_max_iterations(0));
        assert_eq!(
            solver.solve(&catalog, &budget, &BoundOverrides::new()),
            Err(LpError::NumericDegeneracy { iterations: 0 })
        );
    }

    fn near_tie_instance() -> (Catalog, ResourceBudget) {
        let catalog = Catalog::new(vec![CatalogEntry::new("P3", 13.71, [5.0, 25_000.0])])
            .expect("valid catalog");
        let budget = ResourceBudget::from_pairs([("time", 110.0), ("cost", 549_999.999_99)])
            .expect("valid budget");
        (catalog, budget)
    }

    #[test]
    fn test_near_tied_ratios_leave_on_the_true_minimum() {
        let (catalog, budget) = near_tie_instance();
        let (allocation, objective) = optimal(solve(&catalog, &budget, &BoundOverrides::new()));

        assert!(allocation.is_feasible(&catalog, &budget, 1e-7));
        assert!(allocation.quantity(p(0)) < 22.0);
        assert!(objective < 13.71 * 22.0);
        assert_close(objective, 13.71 * 549_999.999_99 / 25_000.0);
    }

    #[test]
    fn test_lower_bound_just_past_an_expensive_limit_is_infeasible() {
        let (catalog, budget) = near_tie_instance();
        let overrides = BoundOverrides::new().with_lower(p(0), 22);
        assert!(solve(&catalog, &budget, &overrides).result().is_infeasible());

        let overrides = BoundOverrides::new().with_upper(p(0), 21);
        let (allocation, objective) = optimal(solve(&catalog, &budget, &overrides));
        assert_close(allocation.quantity(p(0)), 21.0);
        assert_close(objective, 13.71 * 21.0);
    }

    #[test]
    fn test_solver_reuse_gives_identical_results() {
        let catalog = Catalog::new(vec![
            CatalogEntry::surgical("A", 10.0, 0.0, 6.0, 1.0),
            CatalogEntry::surgical("B", 8.0, 0.0, 3.0, 1.0),
            CatalogEntry::surgical("C", 6.0, 0.0, 2.0, 0.0),
        ])
        .expect("valid catalog");
        let budget = budget(f64::INFINITY, 6.0, 1.0);
        let mut solver = RelaxationSolver::preallocated(LpConfig::default(), 3, 3);

        let first = solver
            .solve(&catalog, &budget, &BoundOverrides::new())
            .expect("solve");
        let _ = solver
            .solve(&catalog, &budget, &BoundOverrides::new().with_lower(p(0), 1))
            .expect("solve");
        let again = solver
            .solve(&catalog, &budget, &BoundOverrides::new())
            .expect("solve");
        assert_eq!(first, again);
    }
}
