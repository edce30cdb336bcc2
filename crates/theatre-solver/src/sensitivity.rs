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

//! Budget sensitivity sweeps.
//!
//! A sweep varies one resource dimension of a base budget and solves the
//! integer allocation once per variant. Every run builds its own budget and
//! its own `BnbSolver`; nothing is shared between runs, so the parallel
//! sweep returns exactly what the sequential one does.
//!
//! Deltas that land on the same limit are solved once per sweep.

use rustc_hash::FxHashMap;
use theatre_bnb::{
    bnb::BnbSolver, config::BnbConfig, error::AllocationError, result::AllocationResult,
};
use theatre_model::{budget::ResourceBudget, catalog::Catalog, index::DimensionIndex};

/// How a sweep step derives a limit from the base limit.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BudgetDelta {
    /// `base * factor`.
    Multiplicative(f64),
    /// `base + amount`.
    Additive(f64),
    /// `value`, ignoring the base.
    Absolute(f64),
}

impl BudgetDelta {
    #[inline]
    pub fn apply(&self, base: f64) -> f64 {
        match *self {
            BudgetDelta::Multiplicative(factor) => base * factor,
            BudgetDelta::Additive(amount) => base + amount,
            BudgetDelta::Absolute(value) => value,
        }
    }

    /// `count` evenly spaced factors from `1 - spread` to `1 + spread`.
    ///
    /// `BudgetDelta::symmetric(0.2, 5)` gives ×0.8, ×0.9, ×1.0, ×1.1, ×1.2.
    pub fn symmetric(spread: f64, count: usize) -> Vec<BudgetDelta> {
        match count {
            0 => Vec::new(),
            1 => vec![BudgetDelta::Multiplicative(1.0)],
            _ => {
                let step = 2.0 * spread / (count - 1) as f64;
                (0..count)
                    .map(|i| BudgetDelta::Multiplicative(1.0 - spread + step * i as f64))
                    .collect()
            }
        }
    }
}

impl std::fmt::Display for BudgetDelta {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BudgetDelta::Multiplicative(factor) => write!(f, "x{}", factor),
            BudgetDelta::Additive(amount) if *amount < 0.0 => write!(f, "-{}", -amount),
            BudgetDelta::Additive(amount) => write!(f, "+{}", amount),
            BudgetDelta::Absolute(value) => write!(f, "={}", value),
        }
    }
}

/// One step of a sweep.
#[derive(Debug, Clone, PartialEq)]
pub struct SweepPoint {
    pub delta: BudgetDelta,
    /// The limit the delta produced for the swept dimension.
    pub limit: f64,
    /// The allocation under that limit, or why there is none. A delta that
    /// drives the limit negative yields `InvalidBudget` here without
    /// affecting the other points.
    pub outcome: Result<AllocationResult, AllocationError>,
}

impl SweepPoint {
    #[inline]
    pub fn objective(&self) -> Option<f64> {
        self.outcome.as_ref().ok().and_then(AllocationResult::objective)
    }
}

impl std::fmt::Display for SweepPoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.outcome {
            Ok(result) => write!(f, "{} (limit {}): {}", self.delta, self.limit, result),
            Err(err) => write!(f, "{} (limit {}): error: {}", self.delta, self.limit, err),
        }
    }
}

/// Solves allocations across variants of one budget dimension.
#[derive(Debug, Clone, Default)]
pub struct SensitivityAnalyzer {
    config: BnbConfig,
}

/// The distinct limits of a sweep, in order of first appearance, and for
/// every delta the position of its limit in that list.
struct SweepPlan {
    dimension: DimensionIndex,
    limits: Vec<f64>,
    slots: Vec<usize>,
}

impl SweepPlan {
    fn new(
        catalog: &Catalog,
        base: &ResourceBudget,
        dimension: &str,
        deltas: &[BudgetDelta],
    ) -> Result<Self, AllocationError> {
        catalog.validate_against(base)?;
        let dimension = base
            .dimension_by_name(dimension)
            .ok_or_else(|| AllocationError::UnknownDimension(dimension.to_string()))?;
        let base_limit = base.limit(dimension);

        let mut seen: FxHashMap<u64, usize> = FxHashMap::default();
        let mut limits = Vec::new();
        let slots = deltas
            .iter()
            .map(|delta| {
                let limit = delta.apply(base_limit);
                // 0.0 and -0.0 are the same budget.
                let key = (if limit == 0.0 { 0.0f64 } else { limit }).to_bits();
                *seen.entry(key).or_insert_with(|| {
                    limits.push(limit);
                    limits.len() - 1
                })
            })
            .collect();

        Ok(Self {
            dimension,
            limits,
            slots,
        })
    }

    fn assemble(
        self,
        deltas: &[BudgetDelta],
        solved: Vec<Result<AllocationResult, AllocationError>>,
    ) -> Vec<SweepPoint> {
        deltas
            .iter()
            .zip(self.slots)
            .map(|(&delta, slot)| SweepPoint {
                delta,
                limit: self.limits[slot],
                outcome: solved[slot].clone(),
            })
            .collect()
    }
}

impl SensitivityAnalyzer {
    #[inline]
    pub fn new(config: BnbConfig) -> Self {
        Self { config }
    }

    #[inline]
    pub fn config(&self) -> &BnbConfig {
        &self.config
    }

    fn solve_one(
        solver: &mut BnbSolver,
        catalog: &Catalog,
        base: &ResourceBudget,
        dimension: DimensionIndex,
        limit: f64,
    ) -> Result<AllocationResult, AllocationError> {
        let budget = base.with_limit(dimension, limit)?;
        let result = solver.solve(catalog, &budget)?.into_result();
        tracing::debug!(limit, %result, "sweep point solved");
        Ok(result)
    }

    /// Runs the sweep on the calling thread. Points come back in the order
    /// of `deltas`.
    pub fn run(
        &self,
        catalog: &Catalog,
        base: &ResourceBudget,
        dimension: &str,
        deltas: &[BudgetDelta],
    ) -> Result<Vec<SweepPoint>, AllocationError> {
        let plan = SweepPlan::new(catalog, base, dimension, deltas)?;
        tracing::info!(
            dimension,
            deltas = deltas.len(),
            distinct = plan.limits.len(),
            "sensitivity sweep started"
        );

        let mut solver = BnbSolver::new(self.config);
        let solved = plan
            .limits
            .iter()
            .map(|&limit| Self::solve_one(&mut solver, catalog, base, plan.dimension, limit))
            .collect();
        Ok(plan.assemble(deltas, solved))
    }

    /// Runs the sweep on up to `threads` scoped threads. Each thread owns a
    /// solver and works through a contiguous block of the distinct limits.
    pub fn run_parallel(
        &self,
        catalog: &Catalog,
        base: &ResourceBudget,
        dimension: &str,
        deltas: &[BudgetDelta],
        threads: usize,
    ) -> Result<Vec<SweepPoint>, AllocationError> {
        let plan = SweepPlan::new(catalog, base, dimension, deltas)?;
        let threads = threads.clamp(1, plan.limits.len().max(1));
        tracing::info!(
            dimension,
            deltas = deltas.len(),
            distinct = plan.limits.len(),
            threads,
            "parallel sensitivity sweep started"
        );

        let chunk = plan.limits.len().div_ceil(threads).max(1);
        let config = self.config;
        let target = plan.dimension;

        let solved = std::thread::scope(|scope| {
            let handles: Vec<_> = plan
                .limits
                .chunks(chunk)
                .map(|limits| {
                    scope.spawn(move || {
                        let mut solver = BnbSolver::new(config);
                        limits
                            .iter()
                            .map(|&limit| {
                                Self::solve_one(&mut solver, catalog, base, target, limit)
                            })
                            .collect::<Vec<_>>()
                    })
                })
                .collect();

            handles
                .into_iter()
                .flat_map(|handle| {
                    handle
                        .join()
                        .unwrap_or_else(|panic| std::panic::resume_unwind(panic))
                })
                .collect()
        });
        Ok(plan.assemble(deltas, solved))
    }
}

/// Runs a sequential sweep with the default configuration.
pub fn run_sensitivity_sweep(
    catalog: &Catalog,
    base: &ResourceBudget,
    dimension: &str,
    deltas: &[BudgetDelta],
) -> Result<Vec<SweepPoint>, AllocationError> {
    SensitivityAnalyzer::default().run(catalog, base, dimension, deltas)
}

/// Runs a sweep with the default configuration on all available cores.
pub fn run_sensitivity_sweep_parallel(
    catalog: &Catalog,
    base: &ResourceBudget,
    dimension: &str,
    deltas: &[BudgetDelta],
) -> Result<Vec<SweepPoint>, AllocationError> {
    let threads = std::thread::available_parallelism().map_or(1, |n| n.get());
    SensitivityAnalyzer::default().run_parallel(catalog, base, dimension, deltas, threads)
}
