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

//! Branching rules.
//!
//! A rule inspects a fractional relaxation vertex and names the procedure
//! to split on. The floor child caps the procedure at `floor(value)`, the
//! ceil child requires at least `ceil(value)`.

use theatre_core::num::{distance_from_half, is_integral};
use theatre_model::{allocation::Allocation, index::ProcedureIndex};

/// A split of one procedure's quantity around a fractional value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BranchDecision {
    procedure: ProcedureIndex,
    value: f64,
}

impl BranchDecision {
    #[inline]
    pub fn new(procedure: ProcedureIndex, value: f64) -> Self {
        debug_assert!(value.is_finite() && value >= 0.0);
        Self { procedure, value }
    }

    #[inline]
    pub fn procedure(&self) -> ProcedureIndex {
        self.procedure
    }

    /// The relaxed quantity being split.
    #[inline]
    pub fn value(&self) -> f64 {
        self.value
    }

    /// Upper bound of the down branch.
    #[inline]
    pub fn floor(&self) -> u64 {
        self.value.floor() as u64
    }

    /// Lower bound of the up branch.
    #[inline]
    pub fn ceil(&self) -> u64 {
        self.value.ceil() as u64
    }
}

impl std::fmt::Display for BranchDecision {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} <= {} | {} >= {}",
            self.procedure,
            self.floor(),
            self.procedure,
            self.ceil()
        )
    }
}

pub trait BranchingRule {
    fn name(&self) -> &str;

    /// Picks the procedure to branch on, or `None` if every quantity is
    /// within `tolerance` of an integer.
    fn select(&mut self, relaxed: &Allocation<f64>, tolerance: f64) -> Option<BranchDecision>;
}

impl std::fmt::Debug for dyn BranchingRule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "BranchingRule({})", self.name())
    }
}

/// Branches on the quantity whose fractional part is closest to one half.
/// Ties go to the lowest catalog position.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MostFractionalBranching;

impl MostFractionalBranching {
    #[inline]
    pub fn new() -> Self {
        Self
    }
}

impl BranchingRule for MostFractionalBranching {
    fn name(&self) -> &str {
        "MostFractionalBranching"
    }

    fn select(&mut self, relaxed: &Allocation<f64>, tolerance: f64) -> Option<BranchDecision> {
        let mut best: Option<(f64, BranchDecision)> = None;
        for (procedure, value) in relaxed.iter() {
            if is_integral(value, tolerance) {
                continue;
            }
            let distance = distance_from_half(value);
            if best.as_ref().is_none_or(|(d, _)| distance < *d) {
                best = Some((distance, BranchDecision::new(procedure, value)));
            }
        }
        best.map(|(_, decision)| decision)
    }
}

/// Branches on the fractional quantity with the lowest catalog position.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FirstFractionalBranching;

impl FirstFractionalBranching {
    #[inline]
    pub fn new() -> Self {
        Self
    }
}

impl BranchingRule for FirstFractionalBranching {
    fn name(&self) -> &str {
        "FirstFractionalBranching"
    }

    fn select(&mut self, relaxed: &Allocation<f64>, tolerance: f64) -> Option<BranchDecision> {
        relaxed
            .iter()
            .find(|(_, value)| !is_integral(*value, tolerance))
            .map(|(procedure, value)| BranchDecision::new(procedure, value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TOL: f64 = 1e-6;

    #[test]
    fn test_integral_vertex_needs_no_branching() {
        let relaxed = Allocation::new(vec![0.0, 3.0, 1.0 - 1e-9]);
        assert_eq!(MostFractionalBranching::new().select(&relaxed, TOL), None);
        assert_eq!(FirstFractionalBranching::new().select(&relaxed, TOL), None);
    }

    #[test]
    fn test_most_fractional_picks_closest_to_half() {
        let relaxed = Allocation::new(vec![0.9, 2.4, 1.5, 0.2]);
        let decision = MostFractionalBranching::new().select(&relaxed, TOL).unwrap();
        assert_eq!(decision.procedure(), ProcedureIndex::new(2));
        assert_eq!(decision.floor(), 1);
        assert_eq!(decision.ceil(), 2);
    }

    #[test]
    fn test_most_fractional_ties_go_to_lowest_position() {
        let relaxed = Allocation::new(vec![0.0, 0.25, 3.75, 0.25]);
        let decision = MostFractionalBranching::new().select(&relaxed, TOL).unwrap();
        assert_eq!(decision.procedure(), ProcedureIndex::new(1));
    }

    #[test]
    fn test_first_fractional() {
        let relaxed = Allocation::new(vec![2.0, 0.1, 1.5]);
        let decision = FirstFractionalBranching::new().select(&relaxed, TOL).unwrap();
        assert_eq!(decision.procedure(), ProcedureIndex::new(1));
        assert_eq!(decision.value(), 0.1);
        assert_eq!(decision.to_string(), "ProcedureIndex(1) <= 0 | ProcedureIndex(1) >= 1");
    }
}
