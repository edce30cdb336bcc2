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

use std::time::Duration;
use theatre_core::num::{DEFAULT_INTEGRALITY_TOLERANCE, DEFAULT_TOLERANCE};
use theatre_lp::config::LpConfig;

/// Limits and tolerances of the branch-and-bound search.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BnbConfig {
    /// Stop after this many explored nodes.
    pub node_limit: Option<u64>,
    /// Stop after this much wall-clock time.
    pub time_limit: Option<Duration>,
    /// A relaxed quantity within this distance of an integer is integral.
    pub integrality_tolerance: f64,
    /// A bound or candidate must beat the incumbent by more than this.
    pub objective_tolerance: f64,
    /// Settings of the relaxation solved at every node.
    pub lp: LpConfig,
}

impl Default for BnbConfig {
    fn default() -> Self {
        Self {
            node_limit: None,
            time_limit: None,
            integrality_tolerance: DEFAULT_INTEGRALITY_TOLERANCE,
            objective_tolerance: DEFAULT_TOLERANCE,
            lp: LpConfig::default(),
        }
    }
}

impl BnbConfig {
    #[inline]
    pub fn with_node_limit(mut self, limit: u64) -> Self {
        self.node_limit = Some(limit);
        self
    }

    #[inline]
    pub fn with_time_limit(mut self, limit: Duration) -> Self {
        self.time_limit = Some(limit);
        self
    }

    #[inline]
    pub fn with_integrality_tolerance(mut self, tolerance: f64) -> Self {
        self.integrality_tolerance = tolerance;
        self
    }

    #[inline]
    pub fn with_objective_tolerance(mut self, tolerance: f64) -> Self {
        self.objective_tolerance = tolerance;
        self
    }

    #[inline]
    pub fn with_lp(mut self, lp: LpConfig) -> Self {
        self.lp = lp;
        self
    }
}

impl std::fmt::Display for BnbConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "BnbConfig(node_limit: ")?;
        match self.node_limit {
            Some(n) => write!(f, "{}", n)?,
            None => write!(f, "none")?,
        }
        write!(f, ", time_limit: ")?;
        match self.time_limit {
            Some(t) => write!(f, "{:.3}s", t.as_secs_f64())?,
            None => write!(f, "none")?,
        }
        write!(
            f,
            ", integrality_tolerance: {:e}, objective_tolerance: {:e}, {})",
            self.integrality_tolerance, self.objective_tolerance, self.lp
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builders() {
        let config = BnbConfig::default()
            .with_node_limit(50)
            .with_time_limit(Duration::from_millis(250))
            .with_lp(LpConfig::default().with_max_iterations(7));
        assert_eq!(config.node_limit, Some(50));
        assert_eq!(config.time_limit, Some(Duration::from_millis(250)));
        assert_eq!(config.lp.max_iterations, 7);
        assert_eq!(config.integrality_tolerance, DEFAULT_INTEGRALITY_TOLERANCE);
    }

    #[test]
    fn test_display_without_limits() {
        let text = BnbConfig::default().to_string();
        assert!(text.starts_with("BnbConfig(node_limit: none, time_limit: none"));
    }
}
