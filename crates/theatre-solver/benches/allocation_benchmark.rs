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

use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use std::hint::black_box;
use theatre_bnb::{bnb::BnbSolver, config::BnbConfig};
use theatre_lp::{bounds::BoundOverrides, config::LpConfig, simplex::RelaxationSolver};
use theatre_model::scenario::{COST, Scenario};
use theatre_solver::sensitivity::{BudgetDelta, SensitivityAnalyzer};

fn bench_relaxation(c: &mut Criterion) {
    let mut group = c.benchmark_group("relaxation");
    let overrides = BoundOverrides::new();

    for scenario in Scenario::presets() {
        let catalog = scenario.catalog().expect("reference catalog");
        let budget = scenario.resource_budget().expect("reference budget");
        let mut solver =
            RelaxationSolver::preallocated(LpConfig::default(), catalog.len(), budget.len());

        group.bench_with_input(BenchmarkId::from_parameter(&scenario.name), &scenario, |b, _| {
            b.iter(|| {
                solver
                    .solve(black_box(&catalog), black_box(&budget), black_box(&overrides))
                    .expect("relaxation")
            })
        });
    }
    group.finish();
}

fn bench_allocation(c: &mut Criterion) {
    let mut group = c.benchmark_group("allocation");

    for scenario in Scenario::presets() {
        let catalog = scenario.catalog().expect("reference catalog");
        let budget = scenario.resource_budget().expect("reference budget");
        let mut solver = BnbSolver::preallocated(BnbConfig::default(), catalog.len(), budget.len());

        group.bench_with_input(BenchmarkId::from_parameter(&scenario.name), &scenario, |b, _| {
            b.iter(|| solver.solve(black_box(&catalog), black_box(&budget)).expect("allocation"))
        });
    }
    group.finish();
}

fn bench_sweep(c: &mut Criterion) {
    let scenario = Scenario::current();
    let catalog = scenario.catalog().expect("reference catalog");
    let budget = scenario.resource_budget().expect("reference budget");
    let deltas = BudgetDelta::symmetric(0.2, 9);
    let analyzer = SensitivityAnalyzer::default();

    let mut group = c.benchmark_group("cost_sweep");
    group.bench_function("sequential", |b| {
        b.iter(|| {
            analyzer
                .run(black_box(&catalog), black_box(&budget), COST, &deltas)
                .expect("sweep")
        })
    });
    group.bench_function("parallel", |b| {
        b.iter(|| {
            analyzer
                .run_parallel(black_box(&catalog), black_box(&budget), COST, &deltas, 4)
                .expect("sweep")
        })
    });
    group.finish();
}

criterion_group!(benches, bench_relaxation, bench_allocation, bench_sweep);
criterion_main!(benches);
