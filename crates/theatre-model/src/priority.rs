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

//! Priority weighting from clinical attributes.
//!
//! The solver treats a procedure's weight as an opaque non-negative scalar.
//! Planners, however, usually derive it from clinical data with one of a few
//! criteria; `PriorityCriterion` captures those so callers do not reinvent
//! them. Non-finite results (for example cost-effectiveness of a free
//! procedure) are rejected later by catalog validation.

use serde::{Deserialize, Serialize};

/// Clinical attributes of one procedure.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ClinicalProfile {
    /// Clinical severity on a 0 to 10 scale.
    pub severity: f64,
    /// Incidence per 100 000 inhabitants.
    pub incidence: f64,
    /// Cost of one procedure, in currency units.
    pub cost: f64,
}

impl ClinicalProfile {
    #[inline]
    pub const fn new(severity: f64, incidence: f64, cost: f64) -> Self {
        Self {
            severity,
            incidence,
            cost,
        }
    }
}

/// How a priority weight is derived from a `ClinicalProfile`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PriorityCriterion {
    /// Weight equals clinical severity.
    #[default]
    Severity,
    /// Weight equals incidence.
    Incidence,
    /// Severity per 10 000 currency units spent.
    CostEffectiveness,
}

impl PriorityCriterion {
    /// Scale applied to `severity / cost` so weights land in a readable range.
    pub const COST_EFFECTIVENESS_SCALE: f64 = 10_000.0;

    /// Computes the weight of `profile` under this criterion.
    #[inline]
    pub fn weight(&self, profile: &ClinicalProfile) -> f64 {
        match self {
            PriorityCriterion::Severity => profile.severity,
            PriorityCriterion::Incidence => profile.incidence,
            PriorityCriterion::CostEffectiveness => {
                profile.severity / profile.cost * Self::COST_EFFECTIVENESS_SCALE
            }
        }
    }
}

impl std::fmt::Display for PriorityCriterion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PriorityCriterion::Severity => write!(f, "Severity"),
            PriorityCriterion::Incidence => write!(f, "Incidence"),
            PriorityCriterion::CostEffectiveness => write!(f, "CostEffectiveness"),
        }
    }
}
