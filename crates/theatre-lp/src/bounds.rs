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

//! Integer bound overrides.
//!
//! A branch-and-bound node is the root problem plus a set of tightened
//! per-procedure bounds. `BoundOverrides` stores only the procedures that
//! carry a bound, ordered by catalog position so that the rows the simplex
//! builds from them come out in a deterministic order.

use std::collections::BTreeMap;
use theatre_model::index::ProcedureIndex;

/// Integer bounds on one procedure's quantity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct VariableBounds {
    /// Minimum quantity. Zero is the implicit non-negativity bound.
    pub lower: u64,
    /// Maximum quantity, if bounded.
    pub upper: Option<u64>,
}

impl VariableBounds {
    /// Returns `true` if no quantity satisfies both bounds.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.upper.is_some_and(|u| self.lower > u)
    }
}

impl std::fmt::Display for VariableBounds {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.upper {
            Some(u) => write!(f, "[{}, {}]", self.lower, u),
            None => write!(f, "[{}, inf)", self.lower),
        }
    }
}

/// A sparse set of per-procedure bound overrides.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct BoundOverrides {
    bounds: BTreeMap<ProcedureIndex, VariableBounds>,
}

impl BoundOverrides {
    /// Overrides that leave every procedure at its natural bounds.
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.bounds.is_empty()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.bounds.len()
    }

    /// The bounds currently imposed on `procedure`.
    #[inline]
    pub fn get(&self, procedure: ProcedureIndex) -> VariableBounds {
        self.bounds.get(&procedure).copied().unwrap_or_default()
    }

    #[inline]
    pub fn lower(&self, procedure: ProcedureIndex) -> u64 {
        self.get(procedure).lower
    }

    #[inline]
    pub fn upper(&self, procedure: ProcedureIndex) -> Option<u64> {
        self.get(procedure).upper
    }

    /// Tightens the upper bound of `procedure` to at most `upper`.
    pub fn tighten_upper(&mut self, procedure: ProcedureIndex, upper: u64) {
        let bounds = self.bounds.entry(procedure).or_default();
        bounds.upper = Some(bounds.upper.map_or(upper, |u| u.min(upper)));
    }

    /// Tightens the lower bound of `procedure` to at least `lower`.
    pub fn tighten_lower(&mut self, procedure: ProcedureIndex, lower: u64) {
        let bounds = self.bounds.entry(procedure).or_default();
        bounds.lower = bounds.lower.max(lower);
    }

    /// Copy of `self` with the upper bound of `procedure` tightened.
    #[inline]
    pub fn with_upper(&self, procedure: ProcedureIndex, upper: u64) -> Self {
        let mut child = self.clone();
        child.tighten_upper(procedure, upper);
        child
    }

    /// Copy of `self` with the lower bound of `procedure` tightened.
    #[inline]
    pub fn with_lower(&self, procedure: ProcedureIndex, lower: u64) -> Self {
        let mut child = self.clone();
        child.tighten_lower(procedure, lower);
        child
    }

    /// Iterates over the overridden procedures in catalog order.
    #[inline]
    pub fn iter(&self) -> impl Iterator<Item = (ProcedureIndex, VariableBounds)> + '_ {
        self.bounds.iter().map(|(&p, &b)| (p, b))
    }

    /// The first procedure whose lower bound exceeds its upper bound.
    pub fn first_contradiction(&self) -> Option<ProcedureIndex> {
        self.iter().find(|(_, b)| b.is_empty()).map(|(p, _)| p)
    }

    /// The first overridden procedure not covered by a catalog of `len`
    /// procedures.
    pub fn first_out_of_range(&self, len: usize) -> Option<ProcedureIndex> {
        self.bounds
            .keys()
            .next_back()
            .copied()
            .filter(|p| p.get() >= len)
    }
}

impl std::fmt::Display for BoundOverrides {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "BoundOverrides{{")?;
        for (i, (p, b)) in self.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}: {}", p.get(), b)?;
        }
        write!(f, "}}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn p(i: usize) -> ProcedureIndex {
        ProcedureIndex::new(i)
    }

    #[test]
    fn test_defaults_are_natural_bounds() {
        let overrides = BoundOverrides::new();
        assert!(overrides.is_empty());
        assert_eq!(overrides.lower(p(3)), 0);
        assert_eq!(overrides.upper(p(3)), None);
        assert_eq!(overrides.first_contradiction(), None);
    }

    #[test]
    fn test_tightening_never_loosens() {
        let mut overrides = BoundOverrides::new();
        overrides.tighten_upper(p(0), 5);
        overrides.tighten_upper(p(0), 7);
        assert_eq!(overrides.upper(p(0)), Some(5));
        overrides.tighten_upper(p(0), 2);
        assert_eq!(overrides.upper(p(0)), Some(2));

        overrides.tighten_lower(p(0), 1);
        overrides.tighten_lower(p(0), 0);
        assert_eq!(overrides.lower(p(0)), 1);
        assert_eq!(overrides.len(), 1);
    }

    #[test]
    fn test_children_are_independent() {
        let parent = BoundOverrides::new().with_upper(p(1), 3);
        let down = parent.with_upper(p(2), 0);
        let up = parent.with_lower(p(2), 1);

        assert_eq!(parent.len(), 1);
        assert_eq!(down.upper(p(2)), Some(0));
        assert_eq!(up.lower(p(2)), 1);
        assert_eq!(up.upper(p(2)), None);
    }

    #[test]
    fn test_contradiction_detection() {
        let overrides = BoundOverrides::new()
            .with_upper(p(4), 1)
            .with_lower(p(4), 2)
            .with_lower(p(1), 1);
        assert_eq!(overrides.first_contradiction(), Some(p(4)));
    }

    #[test]
    fn test_out_of_range_and_display() {
        let overrides = BoundOverrides::new().with_upper(p(0), 1).with_lower(p(5), 2);
        assert_eq!(overrides.first_out_of_range(6), None);
        assert_eq!(overrides.first_out_of_range(5), Some(p(5)));
        assert_eq!(overrides.to_string(), "BoundOverrides{0: [0, 1], 5: [2, inf)}");
    }
}
