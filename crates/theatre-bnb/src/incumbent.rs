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

//! The best integer allocation found so far.
//!
//! Owned by a single search session and passed nowhere else; separate
//! searches never observe each other's incumbents.

use theatre_core::num::{approx_le, definitely_gt};
use theatre_model::allocation::Allocation;

#[derive(Debug, Clone, Default)]
pub(crate) struct Incumbent {
    best: Option<(Allocation<u64>, f64)>,
}

impl Incumbent {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Objective of the incumbent, `-inf` while there is none.
    #[inline]
    pub fn objective(&self) -> f64 {
        self.best.as_ref().map_or(f64::NEG_INFINITY, |(_, obj)| *obj)
    }

    #[inline]
    pub fn get(&self) -> Option<(&Allocation<u64>, f64)> {
        self.best.as_ref().map(|(a, obj)| (a, *obj))
    }

    /// Returns `true` if a node bounded by `bound` cannot produce an
    /// allocation better than the incumbent by more than `tolerance`.
    #[inline]
    pub fn dominates(&self, bound: f64, tolerance: f64) -> bool {
        self.best.is_some() && approx_le(bound, self.objective(), tolerance)
    }

    /// Installs `allocation` if it beats the incumbent by more than
    /// `tolerance`. Returns `true` if it was installed.
    pub fn try_install(
        &mut self,
        allocation: Allocation<u64>,
        objective: f64,
        tolerance: f64,
    ) -> bool {
        if self.best.is_some() && !definitely_gt(objective, self.objective(), tolerance) {
            return false;
        }
        self.best = Some((allocation, objective));
        true
    }

    #[inline]
    pub fn into_inner(self) -> Option<(Allocation<u64>, f64)> {
        self.best
    }
}
