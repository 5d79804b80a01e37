use indexmap::IndexMap;
use serde::{Serialize, Serializer};

use crate::Offender;

/// Metric values keyed by metric name, in registration order
pub type Metrics = IndexMap<String, MetricValue>;

/// Offenders keyed by metric name, in the order they were first reported
pub type Offenders<T> = IndexMap<String, Vec<T>>;

/// The value of a single metric
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MetricValue {
    /// A plain count or size
    Count(u64),
    /// An average, kept with two decimals
    Average(f64),
}

impl MetricValue {
    /// Average of `total` over `count`, rounded to two decimals.
    /// An empty set averages to zero.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn average(total: u64, count: u64) -> Self {
        if count == 0 {
            return Self::Count(0);
        }
        let avg = (total as f64 / count as f64 * 100.0).round() / 100.0;
        Self::Average(avg)
    }

    /// The value as a float, for comparisons in tests and callers
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn as_f64(&self) -> f64 {
        match *self {
            Self::Count(n) => n as f64,
            Self::Average(n) => n,
        }
    }
}

impl Default for MetricValue {
    fn default() -> Self {
        Self::Count(0)
    }
}

impl From<u64> for MetricValue {
    fn from(n: u64) -> Self {
        Self::Count(n)
    }
}

// Integral averages are written as integers, so `2.0` shows up as `2`.
impl Serialize for MetricValue {
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match *self {
            Self::Count(n) => serializer.serialize_u64(n),
            Self::Average(n) if n.fract() == 0.0 && n >= 0.0 => serializer.serialize_u64(n as u64),
            Self::Average(n) => serializer.serialize_f64(n),
        }
    }
}

/// Raw analyzer output
///
/// `offenders` is `None` when the analyzer was told not to collect them,
/// which is different from `Some` with an empty map.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AnalysisResult {
    /// All metrics
    pub metrics: Metrics,
    /// Offenders per metric, if collected
    pub offenders: Option<Offenders<Offender>>,
}
