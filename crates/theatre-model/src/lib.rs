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

//! # Theatre Model
//!
//! Immutable input and output types of the surgical allocation problem.
//!
//! - `catalog`: `CatalogEntry` (one procedure: priority weight plus per-unit
//!   consumption of every resource dimension) and the validated `Catalog`.
//! - `budget`: `ResourceBudget`, an ordered list of named resource limits.
//!   Limits may be `+inf` to mark a dimension as unconstrained.
//! - `allocation`: `Allocation<Q>`, a quantity per procedure. `Allocation<f64>`
//!   carries relaxation vertices, `Allocation<u64>` integer answers.
//! - `error`: `ModelError` and the violation details it reports.
//! - `priority`: helpers turning clinical attributes into a priority weight.
//! - `scenario`: the reference oncological catalog and planning scenarios.
//!
//! Everything here is plain data. Construction validates eagerly, so a
//! `Catalog` or `ResourceBudget` that exists is always well formed; the only
//! check left to the solver is that both agree on the number of dimensions.

pub mod allocation;
pub mod budget;
pub mod catalog;
pub mod error;
pub mod index;
pub mod priority;
pub mod scenario;
