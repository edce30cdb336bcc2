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

//! # Resource Budget
//!
//! An ordered list of named, non-negative resource limits. The position of a
//! limit in the list is its `DimensionIndex`, and every `CatalogEntry` lists
//! its consumption in the same order.
//!
//! A limit of `f64::INFINITY` marks a dimension as unconstrained; the
//! relaxation solver drops such rows entirely. A limit of zero forbids every
//! procedure with positive consumption in that dimension.

use crate::{
    error::{BudgetViolation, ModelError},
    index::DimensionIndex,
};
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

/// One named resource limit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResourceLimit {
    name: String,
    limit: f64,
}

impl ResourceLimit {
    #[inline]
    pub fn new<S>(name: S, limit: f64) -> Self
    where
        S: Into<String>,
    {
        Self {
            name: name.into(),
            limit,
        }
    }

    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[inline]
    pub fn limit(&self) -> f64 {
        self.limit
    }

    /// Returns `true` if this dimension does not constrain the allocation.
    #[inline]
    pub fn is_unbounded(&self) -> bool {
        self.limit == f64::INFINITY
    }

    fn validate(&self, position: usize) -> Result<(), BudgetViolation> {
        if self.name.trim().is_empty() {
            return Err(BudgetViolation::EmptyName { position });
        }
        if self.limit.is_nan() {
            return Err(BudgetViolation::NotANumber {
                name: self.name.clone(),
            });
        }
        if self.limit < 0.0 {
            return Err(BudgetViolation::NegativeLimit {
                name: self.name.clone(),
                value: self.limit,
            });
        }
        Ok(())
    }
}

impl std::fmt::Display for ResourceLimit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.is_unbounded() {
            write!(f, "{} <= unbounded", self.name)
        } else {
            write!(f, "{} <= {}", self.name, self.limit)
        }
    }
}

/// The validated pool of available resources.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<ResourceLimit>", into = "Vec<ResourceLimit>")]
pub struct ResourceBudget {
    limits: SmallVec<[ResourceLimit; 4]>,
}

impl ResourceBudget {
    /// Validates and builds a budget from its limits, in dimension order.
    pub fn new<I>(limits: I) -> Result<Self, ModelError>
    where
        I: IntoIterator<Item = ResourceLimit>,
    {
        let limits: SmallVec<[ResourceLimit; 4]> = limits.into_iter().collect();
        for (position, limit) in limits.iter().enumerate() {
            limit.validate(position)?;
            if limits[..position].iter().any(|l| l.name == limit.name) {
                return Err(BudgetViolation::DuplicateName {
                    name: limit.name.clone(),
                }
                .into());
            }
        }
        Ok(Self { limits })
    }

    /// Convenience constructor from `(name, limit)` pairs.
    ///
    /// ```rust
    /// use theatre_model::budget::ResourceBudget;
    ///
    /// let budget = ResourceBudget::from_pairs([
    ///     ("cost", 500_000.0),
    ///     ("time", 480.0),
    ///     ("icu", 15.0),
    /// ])
    /// .unwrap();
    /// assert_eq!(budget.len(), 3);
    /// ```
    pub fn from_pairs<I, S>(pairs: I) -> Result<Self, ModelError>
    where
        I: IntoIterator<Item = (S, f64)>,
        S: Into<String>,
    {
        Self::new(
            pairs
                .into_iter()
                .map(|(name, limit)| ResourceLimit::new(name, limit)),
        )
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.limits.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.limits.is_empty()
    }

    #[inline]
    pub fn limits(&self) -> &[ResourceLimit] {
        &self.limits
    }

    /// # Panics
    ///
    /// Panics if `dimension` is out of bounds.
    #[inline]
    pub fn limit(&self, dimension: DimensionIndex) -> f64 {
        self.limits[dimension.get()].limit
    }

    /// # Panics
    ///
    /// Panics if `dimension` is out of bounds.
    #[inline]
    pub fn name(&self, dimension: DimensionIndex) -> &str {
        &self.limits[dimension.get()].name
    }

    #[inline]
    pub fn dimension_by_name(&self, name: &str) -> Option<DimensionIndex> {
        self.limits
            .iter()
            .position(|l| l.name == name)
            .map(DimensionIndex::new)
    }

    #[inline]
    pub fn iter(&self) -> impl ExactSizeIterator<Item = (DimensionIndex, &ResourceLimit)> {
        self.limits
            .iter()
            .enumerate()
            .map(|(i, l)| (DimensionIndex::new(i), l))
    }

    /// Returns a copy of this budget with one limit replaced.
    ///
    /// The original budget is left untouched, so independent variants can be
    /// derived from one base budget.
    ///
    /// # Panics
    ///
    /// Panics if `dimension` is out of bounds.
    pub fn with_limit(&self, dimension: DimensionIndex, limit: f64) -> Result<Self, ModelError> {
        let mut limits = self.limits.clone();
        let slot = &mut limits[dimension.get()];
        slot.limit = limit;
        slot.validate(dimension.get())?;
        Ok(Self { limits })
    }
}

impl TryFrom<Vec<ResourceLimit>> for ResourceBudget {
    type Error = ModelError;

    fn try_from(limits: Vec<ResourceLimit>) -> Result<Self, Self::Error> {
        Self::new(limits)
    }
}

impl From<ResourceBudget> for Vec<ResourceLimit> {
    fn from(budget: ResourceBudget) -> Self {
        budget.limits.into_vec()
    }
}

impl std::fmt::Display for ResourceBudget {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "ResourceBudget[")?;
        for (i, limit) in self.limits.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", limit)?;
        }
        write!(f, "]")
    }
}
