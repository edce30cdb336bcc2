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

//! Tolerance-aware floating point helpers.
//!
//! The simplex tableau and the integrality test of the branch-and-bound
//! driver both work on `f64` values that accumulate rounding error. All
//! comparisons that decide control flow go through the helpers here so the
//! same absolute tolerance is applied everywhere.

use num_traits::Float;

/// Absolute tolerance used for pivot and feasibility decisions.
pub const DEFAULT_TOLERANCE: f64 = 1e-9;

/// Absolute tolerance used to decide whether a relaxed quantity is integral.
pub const DEFAULT_INTEGRALITY_TOLERANCE: f64 = 1e-6;

/// Returns `true` if `a` and `b` differ by at most `eps`.
#[inline]
pub fn approx_eq<F: Float>(a: F, b: F, eps: F) -> bool {
    (a - b).abs() <= eps
}

/// Returns `true` if `a <= b + eps`.
#[inline]
pub fn approx_le<F: Float>(a: F, b: F, eps: F) -> bool {
    a <= b + eps
}

/// Returns `true` if `a > b + eps`, i.e. `a` is strictly greater beyond noise.
#[inline]
pub fn definitely_gt<F: Float>(a: F, b: F, eps: F) -> bool {
    a > b + eps
}

/// Returns `true` if `value` is finite and not negative.
#[inline]
pub fn is_finite_non_negative<F: Float>(value: F) -> bool {
    value.is_finite() && value >= F::zero()
}

/// Returns `true` if `value` lies within `eps` of the nearest integer.
#[inline]
pub fn is_integral<F: Float>(value: F, eps: F) -> bool {
    (value - value.round()).abs() <= eps
}

/// Distance of the fractional part of `value` from one half.
///
/// Zero means "as fractional as it gets", one half means integral. Branching
/// picks the variable with the smallest distance.
#[inline]
pub fn distance_from_half<F: Float>(value: F) -> F {
    let half = F::one() / (F::one() + F::one());
    (value - value.floor() - half).abs()
}

/// Snaps values within `eps` of zero to exactly zero.
///
/// Keeps `-0.0` and `1e-17` style noise out of reported allocations.
#[inline]
pub fn clean_zero<F: Float>(value: F, eps: F) -> F {
    if value.abs() <= eps { F::zero() } else { value }
}
