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

//! # Theatre LP
//!
//! Solves the continuous relaxation of the surgical allocation problem
//!
//! ```text
//! maximize    sum_j w_j x_j
//! subject to  sum_j a_dj x_j <= b_d      for every finite resource limit d
//!             x_j <= u_j                 for demand caps and upper overrides
//!             x_j >= l_j                 for lower overrides (l_j > 0)
//!             x_j >= 0
//! ```
//!
//! with a dense two-phase tableau simplex. The model is small (a handful of
//! resource rows over a catalog of tens of procedures), so the tableau is
//! rebuilt for every call and its buffers are reused across calls.
//!
//! Pivoting is deterministic: Dantzig's most positive reduced cost with ties
//! going to the lowest catalog position, the minimum ratio test with ties
//! going to the lowest row. After a run of degenerate pivots the solver
//! falls back to Bland's rule for the remainder of the phase, which cannot
//! cycle. A hard pivot limit turns any remaining numerical trouble into
//! `LpError::NumericDegeneracy` instead of a hang.
//!
//! Module map
//! - `bounds`: per-procedure integer bound overrides layered on a catalog.
//! - `config`: pivot limits and tolerances.
//! - `error`: `LpError`.
//! - `result`: `RelaxationResult` and `RelaxationOutcome`.
//! - `simplex`: the tableau and `RelaxationSolver`.

pub mod bounds;
pub mod config;
pub mod error;
pub mod result;
pub mod simplex;

use crate::{bounds::BoundOverrides, config::LpConfig, error::LpError, result::RelaxationResult};
use theatre_model::{budget::ResourceBudget, catalog::Catalog};

/// Solves the relaxation once with the default configuration.
///
/// Callers solving many relaxations (such as a branch-and-bound driver)
/// should keep a `simplex::RelaxationSolver` around to reuse its buffers.
pub fn solve_relaxation(
    catalog: &Catalog,
    budget: &ResourceBudget,
    overrides: &BoundOverrides,
) -> Result<RelaxationResult, LpError> {
    simplex::RelaxationSolver::new(LpConfig::default())
        .solve(catalog, budget, overrides)
        .map(result::RelaxationOutcome::into_result)
}
