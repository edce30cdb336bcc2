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

use serde::{Deserialize, Serialize};
use theatre_core::num::DEFAULT_TOLERANCE;

/// Pivot limits and tolerances of the relaxation solver.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LpConfig {
    /// Hard limit on pivots (both phases) for a single relaxation.
    pub max_iterations: usize,
    /// Smallest magnitude accepted as a pivot element or improving reduced cost.
    pub pivot_tolerance: f64,
    /// Largest phase one residual still treated as feasible.
    pub feasibility_tolerance: f64,
    /// Consecutive degenerate pivots before switching to Bland's rule.
    pub degenerate_pivots_before_bland: usize,
}

impl Default for LpConfig {
    fn default() -> Self {
        Self {
            max_iterations: 10_000,
            pivot_tolerance: DEFAULT_TOLERANCE,
            feasibility_tolerance: 1e-7,
            degenerate_pivots_before_bland: 32,
        }
    }
}

impl LpConfig {
    #[inline]
    pub fn with_max_iterations(mut self, max_iterations: usize) -> Self {
        self.max_iterations = max_iterations;
        self
    }

    #[inline]
    pub fn with_pivot_tolerance(mut self, tolerance: f64) -> Self {
        self.pivot_tolerance = tolerance;
        self
    }

    #[inline]
    pub fn with_feasibility_tolerance(mut self, tolerance: f64) -> Self {
        self.feasibility_tolerance = tolerance;
        self
    }

    #[inline]
    pub fn with_degenerate_pivots_before_bland(mut self, pivots: usize) -> Self {
        self.degenerate_pivots_before_bland = pivots;
        self
    }
}

impl std::fmt::Display for LpConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "LpConfig(max_iterations: {}, pivot_tolerance: {:e}, \
             feasibility_tolerance: {:e}, bland_after: {})",
            self.max_iterations,
            self.pivot_tolerance,
            self.feasibility_tolerance,
            self.degenerate_pivots_before_bland
        )
    }
}
