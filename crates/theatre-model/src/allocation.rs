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

//! # Allocations
//!
//! `Allocation<Q>` holds one quantity per catalog position. Relaxation
//! vertices use `Allocation<f64>`, final integer answers `Allocation<u64>`.
//! Everything derived from an allocation (objective, consumption, slack,
//! feasibility) is computed on demand against the catalog and budget it was
//! produced for; nothing derived is stored.

use crate::{
    budget::ResourceBudget,
    catalog::Catalog,
    index::{DimensionIndex, ProcedureIndex},
};
use num_traits::{ToPrimitive, Zero};
use serde::{Deserialize, Serialize};
use theatre_core::num::{approx_le, clean_zero, is_integral};

/// A quantity per procedure, indexed by catalog position.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(transparent)]
pub struct Allocation<Q> {
    quantities: Vec<Q>,
}

impl<Q> Allocation<Q>
where
    Q: ToPrimitive + Copy,
{
    #[inline]
    pub fn new(quantities: Vec<Q>) -> Self {
        Self { quantities }
    }

    /// The allocation that schedules nothing.
    #[inline]
    pub fn zeros(len: usize) -> Self
    where
        Q: Zero,
    {
        Self {
            quantities: vec![Q::zero(); len],
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.quantities.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.quantities.is_empty()
    }

    /// # Panics
    ///
    /// Panics if `procedure` is out of bounds.
    #[inline]
    pub fn quantity(&self, procedure: ProcedureIndex) -> Q {
        self.quantities[procedure.get()]
    }

    #[inline]
    pub fn quantities(&self) -> &[Q] {
        &self.quantities
    }

    #[inline]
    pub fn into_quantities(self) -> Vec<Q> {
        self.quantities
    }

    #[inline]
    pub fn iter(&self) -> impl ExactSizeIterator<Item = (ProcedureIndex, Q)> + '_ {
        self.quantities
            .iter()
            .enumerate()
            .map(|(i, &q)| (ProcedureIndex::new(i), q))
    }

    /// Iterates over the procedures with a strictly positive quantity.
    #[inline]
    pub fn scheduled(&self) -> impl Iterator<Item = (ProcedureIndex, Q)> + '_ {
        self.iter().filter(|(_, q)| as_f64(*q) > 0.0)
    }

    /// Iterates over `(procedure id, quantity)` pairs in catalog order.
    pub fn named<'a>(&'a self, catalog: &'a Catalog) -> impl Iterator<Item = (&'a str, Q)> + 'a {
        debug_assert_eq!(
            self.quantities.len(),
            catalog.len(),
            "called `Allocation::named` with a catalog of a different size"
        );
        catalog
            .entries()
            .iter()
            .zip(self.quantities.iter())
            .map(|(entry, &q)| (entry.id(), q))
    }

    /// Quantity scheduled for the procedure with the given id.
    pub fn quantity_of(&self, catalog: &Catalog, id: &str) -> Option<Q> {
        catalog
            .index_of(id)
            .and_then(|i| self.quantities.get(i.get()).copied())
    }

    /// Total number of procedure units scheduled.
    pub fn total_quantity(&self) -> f64 {
        self.quantities.iter().map(|&q| as_f64(q)).sum()
    }

    /// Total priority weight `sum(weight_i * q_i)`.
    pub fn objective(&self, catalog: &Catalog) -> f64 {
        debug_assert_eq!(
            self.quantities.len(),
            catalog.len(),
            "called `Allocation::objective` with a catalog of a different size"
        );
        catalog
            .weights()
            .zip(self.quantities.iter())
            .map(|(w, &q)| w * as_f64(q))
            .sum()
    }

    /// Total consumption of one resource dimension.
    pub fn consumption(&self, catalog: &Catalog, dimension: DimensionIndex) -> f64 {
        catalog
            .entries()
            .iter()
            .zip(self.quantities.iter())
            .map(|(e, &q)| e.consumption_in(dimension) * as_f64(q))
            .sum()
    }

    /// `limit - consumption` of one dimension. Infinite for unbounded limits.
    pub fn slack(
        &self,
        catalog: &Catalog,
        budget: &ResourceBudget,
        dimension: DimensionIndex,
    ) -> f64 {
        budget.limit(dimension) - self.consumption(catalog, dimension)
    }

    /// Share of a dimension's limit in use, or `None` if the limit is zero or
    /// unbounded.
    pub fn utilization(
        &self,
        catalog: &Catalog,
        budget: &ResourceBudget,
        dimension: DimensionIndex,
    ) -> Option<f64> {
        let limit = budget.limit(dimension);
        if limit <= 0.0 || !limit.is_finite() {
            return None;
        }
        Some(self.consumption(catalog, dimension) / limit)
    }

    /// Returns `true` if no quantity is negative, no procedure exceeds its
    /// demand and every dimension's consumption stays within its limit (up
    /// to `tolerance`).
    pub fn is_feasible(&self, catalog: &Catalog, budget: &ResourceBudget, tolerance: f64) -> bool {
        if self.quantities.len() != catalog.len() {
            return false;
        }
        if self.quantities.iter().any(|&q| as_f64(q) < -tolerance) {
            return false;
        }
        let within_demand = catalog
            .entries()
            .iter()
            .zip(self.quantities.iter())
            .all(|(e, &q)| e.demand().is_none_or(|d| approx_le(as_f64(q), d as f64, tolerance)));
        if !within_demand {
            return false;
        }
        DimensionIndex::range(budget.len()).all(|d| {
            approx_le(
                self.consumption(catalog, d),
                budget.limit(d),
                tolerance,
            )
        })
    }
}

impl Allocation<f64> {
    /// Returns `true` if every quantity is within `tolerance` of an integer.
    pub fn is_integral(&self, tolerance: f64) -> bool {
        self.quantities.iter().all(|&q| is_integral(q, tolerance))
    }

    /// Rounds every quantity to the nearest non-negative integer.
    ///
    /// Only meaningful for allocations that pass `is_integral`.
    pub fn to_integral(&self) -> Allocation<u64> {
        Allocation {
            quantities: self
                .quantities
                .iter()
                .map(|&q| q.round().max(0.0) as u64)
                .collect(),
        }
    }

    /// Snaps near-zero noise to exactly zero.
    pub fn cleaned(mut self, tolerance: f64) -> Self {
        for q in &mut self.quantities {
            *q = clean_zero(*q, tolerance);
        }
        self
    }
}

#[inline(always)]
fn as_f64<Q: ToPrimitive>(q: Q) -> f64 {
    q.to_f64().unwrap_or(f64::NAN)
}

impl<Q> std::fmt::Display for Allocation<Q>
where
    Q: std::fmt::Display,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Allocation[")?;
        for (i, q) in self.quantities.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", q)?;
        }
        write!(f, "]")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::CatalogEntry;

    fn setup() -> (Catalog, ResourceBudget) {
        let catalog = Catalog::new(vec![
            CatalogEntry::surgical("A", 10.0, 0.0, 6.0, 1.0),
            CatalogEntry::surgical("B", 8.0, 0.0, 3.0, 1.0),
            CatalogEntry::surgical("C", 6.0, 0.0, 2.0, 0.0),
        ])
        .expect("valid catalog");
        let budget =
            ResourceBudget::from_pairs([("cost", f64::INFINITY), ("time", 6.0), ("icu", 1.0)])
                .expect("valid budget");
        (catalog, budget)
    }

    #[test]
    fn test_derived_quantities() {
        let (catalog, budget) = setup();
        let alloc = Allocation::<u64>::new(vec![0, 1, 1]);
        let time = DimensionIndex::new(1);
        let icu = DimensionIndex::new(2);

        assert_eq!(alloc.objective(&catalog), 14.0);
        assert_eq!(alloc.consumption(&catalog, time), 5.0);
        assert_eq!(alloc.slack(&catalog, &budget, time), 1.0);
        assert_eq!(alloc.consumption(&catalog, icu), 1.0);
        assert_eq!(alloc.total_quantity(), 2.0);
        assert!(alloc.is_feasible(&catalog, &budget, 0.0));
        assert_eq!(alloc.utilization(&catalog, &budget, DimensionIndex::new(0)), None);
        assert_eq!(alloc.utilization(&catalog, &budget, icu), Some(1.0));
    }

    #[test]
    fn test_infeasible_allocation_detected() {
        let (catalog, budget) = setup();
        let alloc = Allocation::<u64>::new(vec![1, 1, 0]);
        assert!(!alloc.is_feasible(&catalog, &budget, 0.0));
        assert_eq!(alloc.slack(&catalog, &budget, DimensionIndex::new(2)), -1.0);
    }

    #[test]
    fn test_demand_is_part_of_feasibility() {
        let catalog = Catalog::new(vec![
            CatalogEntry::surgical("A", 1.0, 0.0, 1.0, 0.0).with_demand(1),
        ])
        .expect("valid catalog");
        let budget = ResourceBudget::from_pairs([("cost", 10.0), ("time", 10.0), ("icu", 0.0)])
            .expect("valid budget");
        assert!(Allocation::<u64>::new(vec![1]).is_feasible(&catalog, &budget, 0.0));
        assert!(!Allocation::<u64>::new(vec![2]).is_feasible(&catalog, &budget, 0.0));
    }

    #[test]
    fn test_zeros_and_named() {
        let (catalog, budget) = setup();
        let alloc = Allocation::<u64>::zeros(catalog.len());
        assert_eq!(alloc.objective(&catalog), 0.0);
        assert!(alloc.is_feasible(&catalog, &budget, 0.0));
        assert_eq!(alloc.scheduled().count(), 0);
        let named: Vec<(&str, u64)> = alloc.named(&catalog).collect();
        assert_eq!(named, vec![("A", 0), ("B", 0), ("C", 0)]);
        assert_eq!(alloc.quantity_of(&catalog, "B"), Some(0));
        assert_eq!(alloc.quantity_of(&catalog, "Z"), None);
    }

    #[test]
    fn test_relaxed_integrality_and_rounding() {
        let relaxed = Allocation::<f64>::new(vec![0.999_999_99, 0.0, 2.000_000_01]);
        assert!(relaxed.is_integral(1e-6));
        assert_eq!(relaxed.to_integral().quantities(), &[1, 0, 2]);

        let fractional = Allocation::<f64>::new(vec![0.5, 1.0]);
        assert!(!fractional.is_integral(1e-6));
    }

    #[test]
    fn test_cleaned_removes_noise() {
        let relaxed = Allocation::<f64>::new(vec![-1e-14, 3.0]).cleaned(1e-9);
        assert_eq!(relaxed.quantities(), &[0.0, 3.0]);
    }

    #[test]
    fn test_display() {
        let alloc = Allocation::<u64>::new(vec![1, 0, 2]);
        assert_eq!(alloc.to_string(), "Allocation[1, 0, 2]");
    }
}
