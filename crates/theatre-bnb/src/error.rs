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

use theatre_lp::error::LpError;
use theatre_model::error::ModelError;
use thiserror::Error;

/// Failure of an allocation request.
///
/// Infeasibility and limit hits are outcomes, not errors; see
/// `AllocationResult`.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum AllocationError {
    #[error(transparent)]
    Model(#[from] ModelError),

    /// The relaxation objective is unbounded along `procedure`. A valid
    /// catalog cannot produce this unless a budget dimension is unlimited.
    #[error("allocation is unbounded: procedure `{procedure}` consumes no limited resource")]
    Unbounded { procedure: String },

    #[error("unknown resource dimension `{0}`")]
    UnknownDimension(String),

    #[error(transparent)]
    Relaxation(LpError),
}

/// Coarse classification of failures and non-optimal outcomes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    InvalidCatalog,
    InvalidBudget,
    Infeasible,
    Unbounded,
    NumericDegeneracy,
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorKind::InvalidCatalog => write!(f, "InvalidCatalog"),
            ErrorKind::InvalidBudget => write!(f, "InvalidBudget"),
            ErrorKind::Infeasible => write!(f, "Infeasible"),
            ErrorKind::Unbounded => write!(f, "Unbounded"),
            ErrorKind::NumericDegeneracy => write!(f, "NumericDegeneracy"),
        }
    }
}

fn model_kind(error: &ModelError) -> ErrorKind {
    match error {
        ModelError::InvalidCatalog(_) => ErrorKind::InvalidCatalog,
        ModelError::InvalidBudget(_) => ErrorKind::InvalidBudget,
    }
}

impl AllocationError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            AllocationError::Model(e) => model_kind(e),
            AllocationError::Unbounded { .. } => ErrorKind::Unbounded,
            AllocationError::UnknownDimension(_) => ErrorKind::InvalidBudget,
            AllocationError::Relaxation(LpError::Model(e)) => model_kind(e),
            AllocationError::Relaxation(LpError::OverrideOutOfRange { .. }) => {
                ErrorKind::InvalidCatalog
            }
            AllocationError::Relaxation(LpError::NumericDegeneracy { .. }) => {
                ErrorKind::NumericDegeneracy
            }
        }
    }
}
