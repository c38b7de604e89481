use serde::Serialize;

/// Signed percentage change from `previous` to `current`.
///
/// Returns 0 when `previous` is 0. Not rounded.
pub fn growth(current: f64, previous: f64) -> f64 {
    if previous == 0.0 {
        return 0.0;
    }
    (current - previous) / previous * 100.0
}

/// A metric for the current period next to the previous one.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Comparison {
    pub current: f64,
    pub previous: f64,
    pub growth: f64,
}

impl Comparison {
    pub fn new(current: f64, previous: f64) -> Self {
        Self {
            current,
            previous,
            growth: growth(current, previous),
        }
    }

    pub fn from_counts(current: u64, previous: u64) -> Self {
        Self::new(current as f64, previous as f64)
    }

    pub fn improved(&self) -> bool {
        self.current > self.previous
    }

    /// Growth with sign and one decimal, e.g. `+20.0%`.
    pub fn growth_text(&self) -> String {
        format!("{:+.1}%", self.growth)
    }
}
