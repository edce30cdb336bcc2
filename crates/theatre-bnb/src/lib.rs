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

//! # Theatre BnB: exact integer allocation
//!
//! Best-bound-first branch-and-bound over the LP relaxation of
//! `theatre_lp`. Every node is the root problem plus tightened integer
//! bounds; its relaxation objective bounds every integer allocation below
//! it. The node with the highest bound is always expanded next, and nodes
//! whose bound cannot beat the incumbent are pruned. When the frontier
//! empties the incumbent is provably optimal.
//!
//! Core flow
//! - Provide a validated `Catalog` and `ResourceBudget`.
//! - Optionally pick a `branching::BranchingRule` (default: most fractional).
//! - Optionally attach `monitor`s for logging, limits or early stopping.
//! - Run `bnb::BnbSolver`, read the `result::BnbOutcome`.
//!
//! Design highlights
//! - Nodes live in an arena; the frontier holds `(bound, node)` keys only.
//! - The incumbent is a value owned by one search session. Separate runs
//!   share nothing and may execute in parallel.
//! - Deterministic: frontier ties go to the older node, branching and
//!   pivoting ties to the lowest catalog position.
//! - A relaxation that fails numerically prunes only its own node. The run
//!   then reports a best-effort result instead of claiming optimality.
//!
//! Module map
//! - `bnb`: the solver engine and search session.
//! - `branching`: branching rules.
//! - `config`: node/time limits and tolerances.
//! - `error`: `AllocationError` and `ErrorKind`.
//! - `frontier`: the best-bound-first priority queue.
//! - `incumbent`: the best integer allocation found so far.
//! - `monitor`: tree search monitors (log, limits, composite).
//! - `node`: search nodes and their arena.
//! - `result`: outcomes, best-effort reasons.
//! - `stats`: counters and timing.

pub mod bnb;
pub mod branching;
pub mod config;
pub mod error;
mod frontier;
mod incumbent;
pub mod monitor;
pub mod node;
pub mod result;
pub mod stats;
