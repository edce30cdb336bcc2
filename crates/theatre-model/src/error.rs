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

//! Validation errors for catalogs and budgets.
//!
//! Both are detected when the value is constructed (or deserialized), and
//! once more at the solver entry point for the catalog/budget pairing.

use thiserror::Error;

/// Why a catalog was rejected.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CatalogViolation {
    #[error("catalog entry at position {position} has an empty id")]
    EmptyId { position: usize },

    #[error("procedure `{id}` appears more than once in the catalog")]
    DuplicateId { id: String },

    #[error("procedure `{id}` has {field} = {value}, expected a finite non-negative number")]
    InvalidValue {
        id: String,
        field: String,
        value: f64,
    },

    #[error(
        "procedure `{id}` declares {found} resource consumptions, expected {expected} dimensions"
    )]
    DimensionMismatch {
        id: String,
        expected: usize,
        found: usize,
    },
}

/// Why a resource budget was rejected.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum BudgetViolation {
    #[error("resource dimension at position {position} has an empty name")]
    EmptyName { position: usize },

    #[error("resource dimension `{name}` is declared more than once")]
    DuplicateName { name: String },

    #[error("resource limit `{name}` is negative ({value})")]
    NegativeLimit { name: String, value: f64 },

    #[error("resource limit `{name}` is not a number")]
    NotANumber { name: String },
}

/// Top level model validation error.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ModelError {
    #[error("invalid catalog: {0}")]
    InvalidCatalog(#[from] CatalogViolation),

    #[error("invalid budget: {0}")]
    InvalidBudget(#[from] BudgetViolation),
}
