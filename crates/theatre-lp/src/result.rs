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

use theatre_model::{allocation::Allocation, index::ProcedureIndex};

/// Outcome of one relaxation.
#[derive(Debug, Clone, PartialEq)]
pub enum RelaxationResult {
    /// An optimal vertex of the relaxed region.
    Optimal {
        allocation: Allocation<f64>,
        objective: f64,
    },
    /// No non-negative real allocation satisfies the constraints and bounds.
    Infeasible,
    /// The objective grows without limit along `procedure`, which has a
    /// positive weight and consumes nothing in any finite dimension.
    Unbounded { procedure: ProcedureIndex },
}

impl RelaxationResult {
    #[inline]
    pub fn is_optimal(&self) -> bool {
        matches!(self, RelaxationResult::Optimal { .. })
    }

    #[inline]
    pub fn is_infeasible(&self) -> bool {
        matches!(self, RelaxationResult::Infeasible)
    }

    /// The relaxation bound, if the relaxation has an optimum.
    #[inline]
    pub fn objective(&self) -> Option<f64> {
        match self {
            RelaxationResult::Optimal { objective, .. } => Some(*objective),
            _ => None,
        }
    }

    #[inline]
    pub fn allocation(&self) -> Option<&Allocation<f64>> {
        match self {
            RelaxationResult::Optimal { allocation, .. } => Some(allocation),
            _ => None,
        }
    }
}

impl std::fmt::Display for RelaxationResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RelaxationResult::Optimal { objective, .. } => {
                write!(f, "Optimal(objective={})", objective)
            }
            RelaxationResult::Infeasible => write!(f, "Infeasible"),
            RelaxationResult::Unbounded { procedure } => write!(f, "Unbounded({})", procedure),
        }
    }
}

/// A relaxation result together with the work it took.
#[derive(Debug, Clone, PartialEq)]
pub struct RelaxationOutcome {
    result: RelaxationResult,
    pivots: usize,
}

impl RelaxationOutcome {
    #[inline]
    pub fn new(result: RelaxationResult, pivots: usize) -> Self {
        Self { result, pivots }
    }

    #[inline]
    pub fn result(&self) -> &RelaxationResult {
        &self.result
    }

    /// Simplex pivots performed over both phases.
    #[inline]
    pub fn pivots(&self) -> usize {
        self.pivots
    }

    #[inline]
    pub fn into_result(self) -> RelaxationResult {
        self.result
    }
}
