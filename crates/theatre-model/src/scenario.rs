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

//! # Reference Catalog and Planning Scenarios
//!
//! Eight high-volume oncological procedures with their clinical profile and
//! per-unit resource needs, plus three monthly capacity scenarios (current,
//! optimistic expansion, pessimistic cut). They serve as realistic inputs for
//! tests, benchmarks and demonstrations.
//!
//! Every scenario solves over the dimensions `cost`, `time` (operating-room
//! hours) and `icu` (ICU beds), in that order.

use crate::{
    budget::{ResourceBudget, ResourceLimit},
    catalog::{Catalog, CatalogEntry},
    error::ModelError,
    priority::{ClinicalProfile, PriorityCriterion},
};
use serde::{Deserialize, Serialize};

/// Name of the monetary dimension.
pub const COST: &str = "cost";
/// Name of the operating-room hours dimension.
pub const TIME: &str = "time";
/// Name of the ICU bed dimension.
pub const ICU: &str = "icu";

/// One procedure of the reference catalog.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReferenceProcedure {
    pub id: &'static str,
    pub name: &'static str,
    pub profile: ClinicalProfile,
    /// Operating-room hours per procedure.
    pub hours: f64,
    /// ICU beds occupied per procedure.
    pub icu_units: f64,
}

const fn procedure(
    id: &'static str,
    name: &'static str,
    severity: f64,
    hours: f64,
    cost: f64,
    icu_units: f64,
    incidence: f64,
) -> ReferenceProcedure {
    ReferenceProcedure {
        id,
        name,
        profile: ClinicalProfile::new(severity, incidence, cost),
        hours,
        icu_units,
    }
}

const REFERENCE_PROCEDURES: [ReferenceProcedure; 8] = [
    procedure("P1", "Mastectomy", 8.5, 3.5, 15_000.0, 1.0, 3.62),
    procedure("P2", "Prostatectomy", 7.8, 4.0, 18_000.0, 1.0, 10.01),
    procedure("P3", "Colectomy", 9.2, 5.0, 25_000.0, 1.0, 13.71),
    procedure("P4", "Gastrectomy", 9.5, 6.0, 28_000.0, 1.0, 7.36),
    procedure("P5", "Lobectomy", 9.8, 5.5, 35_000.0, 1.0, 3.09),
    procedure("P6", "Hysterectomy", 7.5, 3.0, 14_000.0, 1.0, 5.20),
    procedure("P7", "Thyroidectomy", 6.5, 2.5, 12_000.0, 0.0, 4.80),
    procedure("P8", "Nephrectomy", 8.0, 4.5, 22_000.0, 1.0, 6.15),
];

/// The reference oncological procedures, in catalog order.
#[inline]
pub fn reference_procedures() -> &'static [ReferenceProcedure] {
    &REFERENCE_PROCEDURES
}

/// Builds the reference catalog weighted by `criterion`.
pub fn reference_catalog(criterion: PriorityCriterion) -> Result<Catalog, ModelError> {
    Catalog::new(
        REFERENCE_PROCEDURES
            .iter()
            .map(|p| {
                CatalogEntry::surgical(
                    p.id,
                    criterion.weight(&p.profile),
                    p.profile.cost,
                    p.hours,
                    p.icu_units,
                )
            })
            .collect(),
    )
}

/// A monthly capacity scenario.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scenario {
    pub name: String,
    /// Monetary budget.
    pub budget: f64,
    /// Operating-room hours.
    pub hours: f64,
    /// ICU beds.
    pub icu_beds: f64,
    pub criterion: PriorityCriterion,
}

impl Scenario {
    /// Current capacity, weighted by incidence.
    pub fn current() -> Self {
        Self {
            name: "current".to_string(),
            budget: 500_000.0,
            hours: 480.0,
            icu_beds: 15.0,
            criterion: PriorityCriterion::Incidence,
        }
    }

    /// Expanded capacity, weighted by severity.
    pub fn optimistic() -> Self {
        Self {
            name: "optimistic".to_string(),
            budget: 800_000.0,
            hours: 720.0,
            icu_beds: 25.0,
            criterion: PriorityCriterion::Severity,
        }
    }

    /// Reduced capacity, weighted by severity.
    pub fn pessimistic() -> Self {
        Self {
            name: "pessimistic".to_string(),
            budget: 300_000.0,
            hours: 320.0,
            icu_beds: 8.0,
            criterion: PriorityCriterion::Severity,
        }
    }

    /// The three preset scenarios.
    pub fn presets() -> [Scenario; 3] {
        [Self::current(), Self::optimistic(), Self::pessimistic()]
    }

    /// The reference catalog weighted by this scenario's criterion.
    pub fn catalog(&self) -> Result<Catalog, ModelError> {
        reference_catalog(self.criterion)
    }

    /// The `cost`, `time`, `icu` budget of this scenario.
    pub fn resource_budget(&self) -> Result<ResourceBudget, ModelError> {
        ResourceBudget::new([
            ResourceLimit::new(COST, self.budget),
            ResourceLimit::new(TIME, self.hours),
            ResourceLimit::new(ICU, self.icu_beds),
        ])
    }
}

impl std::fmt::Display for Scenario {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Scenario({}: budget {}, {} h, {} ICU beds, criterion {})",
            self.name, self.budget, self.hours, self.icu_beds, self.criterion
        )
    }
}
