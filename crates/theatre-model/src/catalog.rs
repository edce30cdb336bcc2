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

//! # Procedure Catalog
//!
//! A `CatalogEntry` describes one procedure: a stable id, a non-negative
//! priority weight and the per-unit consumption of every resource dimension,
//! in the same order as the `ResourceBudget` it will be solved against.
//!
//! A `Catalog` is an ordered, validated collection of entries. Its order is
//! significant: the catalog position (`ProcedureIndex`) is the tie-breaker
//! wherever the solver has to choose between equally good procedures, so the
//! same catalog always produces the same answer.
//!
//! ## Usage
//!
//! ```rust
//! use theatre_model::catalog::{Catalog, CatalogEntry};
//!
//! let catalog = Catalog::new(vec![
//!     CatalogEntry::surgical("P1", 8.5, 15_000.0, 3.5, 1.0),
//!     CatalogEntry::surgical("P7", 6.5, 12_000.0, 2.5, 0.0),
//! ])
//! .unwrap();
//!
//! assert_eq!(catalog.len(), 2);
//! assert_eq!(catalog.num_dimensions(), Some(3));
//! assert_eq!(catalog.index_of("P7").map(|i| i.get()), Some(1));
//! ```

use crate::{
    budget::ResourceBudget,
    error::{CatalogViolation, ModelError},
    index::{DimensionIndex, ProcedureIndex},
};
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use theatre_core::num::is_finite_non_negative;

/// Inline capacity for per-entry consumption vectors. Surgical planning
/// typically uses three dimensions (cost, time, ICU beds).
const INLINE_DIMENSIONS: usize = 4;

/// One procedure of the catalog.
///
/// Fields are private so the id and the consumption profile cannot change
/// after construction. Values are checked by `Catalog::new`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogEntry {
    id: String,
    weight: f64,
    consumption: SmallVec<[f64; INLINE_DIMENSIONS]>,
    /// Maximum number of units that may be scheduled (queue length).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    demand: Option<u64>,
}

impl CatalogEntry {
    /// Creates an entry with an arbitrary number of resource dimensions.
    #[inline]
    pub fn new<S, C>(id: S, weight: f64, consumption: C) -> Self
    where
        S: Into<String>,
        C: IntoIterator<Item = f64>,
    {
        Self {
            id: id.into(),
            weight,
            consumption: consumption.into_iter().collect(),
            demand: None,
        }
    }

    /// Caps the number of units of this procedure, e.g. at the length of
    /// its waiting list.
    #[inline]
    pub fn with_demand(mut self, demand: u64) -> Self {
        self.demand = Some(demand);
        self
    }

    /// Creates an entry over the classic `cost`, `time`, `icu` dimensions.
    #[inline]
    pub fn surgical<S>(id: S, weight: f64, cost: f64, time: f64, icu_units: f64) -> Self
    where
        S: Into<String>,
    {
        Self::new(id, weight, [cost, time, icu_units])
    }

    #[inline]
    pub fn id(&self) -> &str {
        &self.id
    }

    #[inline]
    pub fn weight(&self) -> f64 {
        self.weight
    }

    /// Per-unit consumption, one value per resource dimension.
    #[inline]
    pub fn consumption(&self) -> &[f64] {
        &self.consumption
    }

    /// Per-unit consumption of a single dimension.
    ///
    /// # Panics
    ///
    /// Panics if `dimension` is out of range for this entry.
    #[inline]
    pub fn consumption_in(&self, dimension: DimensionIndex) -> f64 {
        self.consumption[dimension.get()]
    }

    #[inline]
    pub fn num_dimensions(&self) -> usize {
        self.consumption.len()
    }

    /// Upper limit on the scheduled quantity, if any.
    #[inline]
    pub fn demand(&self) -> Option<u64> {
        self.demand
    }

    fn validate(&self, position: usize) -> Result<(), CatalogViolation> {
        if self.id.trim().is_empty() {
            return Err(CatalogViolation::EmptyId { position });
        }
        if !is_finite_non_negative(self.weight) {
            return Err(CatalogViolation::InvalidValue {
                id: self.id.clone(),
                field: "weight".to_string(),
                value: self.weight,
            });
        }
        if let Some((dim, &value)) = self
            .consumption
            .iter()
            .enumerate()
            .find(|(_, v)| !is_finite_non_negative(**v))
        {
            return Err(CatalogViolation::InvalidValue {
                id: self.id.clone(),
                field: format!("consumption[{}]", dim),
                value,
            });
        }
        Ok(())
    }
}

impl std::fmt::Display for CatalogEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}(weight: {}, consumption: [", self.id, self.weight)?;
        for (i, c) in self.consumption.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", c)?;
        }
        write!(f, "]")?;
        if let Some(demand) = self.demand {
            write!(f, ", demand: {}", demand)?;
        }
        write!(f, ")")
    }
}

/// An ordered, validated set of procedures.
///
/// Invariants upheld by construction:
/// - every id is non-empty and unique,
/// - every weight and consumption value is finite and non-negative,
/// - every entry declares the same number of resource dimensions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<CatalogEntry>", into = "Vec<CatalogEntry>")]
pub struct Catalog {
    entries: Vec<CatalogEntry>,
    positions: FxHashMap<String, ProcedureIndex>,
}

impl Catalog {
    /// Validates `entries` and builds the catalog.
    pub fn new(entries: Vec<CatalogEntry>) -> Result<Self, ModelError> {
        let mut positions =
            FxHashMap::with_capacity_and_hasher(entries.len(), Default::default());
        let expected_dimensions = entries.first().map(CatalogEntry::num_dimensions);

        for (position, entry) in entries.iter().enumerate() {
            entry.validate(position)?;

            if let Some(expected) = expected_dimensions
                && entry.num_dimensions() != expected
            {
                return Err(CatalogViolation::DimensionMismatch {
                    id: entry.id.clone(),
                    expected,
                    found: entry.num_dimensions(),
                }
                .into());
            }

            if positions
                .insert(entry.id.clone(), ProcedureIndex::new(position))
                .is_some()
            {
                return Err(CatalogViolation::DuplicateId {
                    id: entry.id.clone(),
                }
                .into());
            }
        }

        Ok(Self { entries, positions })
    }

    /// Checks that every entry has one consumption value per budget dimension.
    pub fn validate_against(&self, budget: &ResourceBudget) -> Result<(), ModelError> {
        let expected = budget.len();
        match self.entries.iter().find(|e| e.num_dimensions() != expected) {
            Some(entry) => Err(CatalogViolation::DimensionMismatch {
                id: entry.id.clone(),
                expected,
                found: entry.num_dimensions(),
            }
            .into()),
            None => Ok(()),
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of resource dimensions, or `None` for an empty catalog.
    #[inline]
    pub fn num_dimensions(&self) -> Option<usize> {
        self.entries.first().map(CatalogEntry::num_dimensions)
    }

    #[inline]
    pub fn entries(&self) -> &[CatalogEntry] {
        &self.entries
    }

    /// # Panics
    ///
    /// Panics if `index` is out of bounds.
    #[inline]
    pub fn entry(&self, index: ProcedureIndex) -> &CatalogEntry {
        &self.entries[index.get()]
    }

    #[inline]
    pub fn get(&self, index: ProcedureIndex) -> Option<&CatalogEntry> {
        index.lookup(&self.entries)
    }

    /// Looks up the catalog position of a procedure id.
    #[inline]
    pub fn index_of(&self, id: &str) -> Option<ProcedureIndex> {
        self.positions.get(id).copied()
    }

    #[inline]
    pub fn iter(&self) -> impl ExactSizeIterator<Item = (ProcedureIndex, &CatalogEntry)> {
        self.entries
            .iter()
            .enumerate()
            .map(|(i, e)| (ProcedureIndex::new(i), e))
    }

    #[inline]
    pub fn weights(&self) -> impl ExactSizeIterator<Item = f64> + '_ {
        self.entries.iter().map(CatalogEntry::weight)
    }
}

impl TryFrom<Vec<CatalogEntry>> for Catalog {
    type Error = ModelError;

    fn try_from(entries: Vec<CatalogEntry>) -> Result<Self, Self::Error> {
        Self::new(entries)
    }
}

impl From<Catalog> for Vec<CatalogEntry> {
    fn from(catalog: Catalog) -> Self {
        catalog.entries
    }
}

impl std::fmt::Display for Catalog {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Catalog ({} procedures):", self.entries.len())?;
        for entry in &self.entries {
            writeln!(f, "  {}", entry)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Catalog {
        Catalog::new(vec![
            CatalogEntry::surgical("A", 10.0, 0.0, 6.0, 1.0),
            CatalogEntry::surgical("B", 8.0, 0.0, 3.0, 1.0),
            CatalogEntry::surgical("C", 6.0, 0.0, 2.0, 0.0),
        ])
        .expect("valid catalog")
    }

    #[test]
    fn test_lookup_and_order() {
        let catalog = sample();
        assert_eq!(catalog.len(), 3);
        assert_eq!(catalog.index_of("B"), Some(ProcedureIndex::new(1)));
        assert_eq!(catalog.index_of("Z"), None);
        let ids: Vec<&str> = catalog.iter().map(|(_, e)| e.id()).collect();
        assert_eq!(ids, vec!["A", "B", "C"]);
        assert_eq!(
            catalog
                .entry(ProcedureIndex::new(2))
                .consumption_in(DimensionIndex::new(1)),
            2.0
        );
    }

    #[test]
    fn test_empty_catalog_is_valid() {
        let catalog = Catalog::new(Vec::new()).expect("empty catalog is valid");
        assert!(catalog.is_empty());
        assert_eq!(catalog.num_dimensions(), None);
    }

    #[test]
    fn test_rejects_negative_weight() {
        let err = Catalog::new(vec![CatalogEntry::surgical("A", -1.0, 0.0, 1.0, 0.0)])
            .expect_err("negative weight must be rejected");
        assert!(matches!(
            err,
            ModelError::InvalidCatalog(CatalogViolation::InvalidValue { ref field, .. })
                if field == "weight"
        ));
    }

    #[test]
    fn test_rejects_non_finite_consumption() {
        let err = Catalog::new(vec![CatalogEntry::surgical(
            "A",
            1.0,
            f64::INFINITY,
            1.0,
            0.0,
        )])
        .expect_err("infinite cost must be rejected");
        match err {
            ModelError::InvalidCatalog(CatalogViolation::InvalidValue { id, field, .. }) => {
                assert_eq!(id, "A");
                assert_eq!(field, "consumption[0]");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_rejects_duplicates_and_empty_ids() {
        let dup = Catalog::new(vec![
            CatalogEntry::surgical("A", 1.0, 0.0, 1.0, 0.0),
            CatalogEntry::surgical("A", 2.0, 0.0, 1.0, 0.0),
        ]);
        assert!(matches!(
            dup,
            Err(ModelError::InvalidCatalog(CatalogViolation::DuplicateId { .. }))
        ));

        let empty = Catalog::new(vec![CatalogEntry::surgical(" ", 1.0, 0.0, 1.0, 0.0)]);
        assert_eq!(
            empty,
            Err(ModelError::InvalidCatalog(CatalogViolation::EmptyId {
                position: 0
            }))
        );
    }

    #[test]
    fn test_rejects_ragged_dimensions() {
        let err = Catalog::new(vec![
            CatalogEntry::new("A", 1.0, [1.0, 2.0]),
            CatalogEntry::new("B", 1.0, [1.0]),
        ])
        .expect_err("ragged catalog must be rejected");
        assert_eq!(
            err,
            ModelError::InvalidCatalog(CatalogViolation::DimensionMismatch {
                id: "B".to_string(),
                expected: 2,
                found: 1,
            })
        );
    }

    #[test]
    fn test_validate_against_budget() {
        let catalog = sample();
        let three = ResourceBudget::from_pairs([("cost", 1.0), ("time", 1.0), ("icu", 1.0)])
            .expect("valid budget");
        assert!(catalog.validate_against(&three).is_ok());

        let two = ResourceBudget::from_pairs([("cost", 1.0), ("time", 1.0)]).expect("valid");
        assert!(matches!(
            catalog.validate_against(&two),
            Err(ModelError::InvalidCatalog(CatalogViolation::DimensionMismatch {
                expected: 2,
                found: 3,
                ..
            }))
        ));
    }

    #[test]
    fn test_deserialization_validates() {
        let json = r#"[{"id":"A","weight":1.0,"consumption":[1.0,2.0]},
                       {"id":"A","weight":2.0,"consumption":[1.0,2.0]}]"#;
        let parsed: Result<Catalog, _> = serde_json::from_str(json);
        assert!(parsed.is_err());

        let json = r#"[{"id":"A","weight":1.0,"consumption":[1.0,2.0]},
                       {"id":"B","weight":1.0,"consumption":[0.5,0.0],"demand":4}]"#;
        let catalog: Catalog = serde_json::from_str(json).expect("valid json catalog");
        assert_eq!(catalog.index_of("A"), Some(ProcedureIndex::new(0)));
        assert_eq!(catalog.entry(ProcedureIndex::new(0)).demand(), None);
        assert_eq!(catalog.entry(ProcedureIndex::new(1)).demand(), Some(4));
    }

    #[test]
    fn test_entry_display() {
        let entry = CatalogEntry::surgical("A", 10.0, 0.0, 6.0, 1.0).with_demand(2);
        assert_eq!(entry.to_string(), "A(weight: 10, consumption: [0, 6, 1], demand: 2)");
    }
}
