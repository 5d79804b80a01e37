use indexmap::IndexMap;

use crate::{AnalysisResult, MetricValue, Metrics, Offender};

/// Gathers metric values and offenders while the rules run
#[derive(Debug)]
pub(crate) struct Collector {
    metrics: Metrics,
    offenders: Option<IndexMap<String, Vec<Offender>>>,
}

impl Collector {
    pub(crate) fn new(collect_offenders: bool) -> Self {
        Self {
            metrics: Metrics::new(),
            offenders: collect_offenders.then(IndexMap::new),
        }
    }

    /// Register a metric with a value of zero. This fixes its position in
    /// the output.
    pub(crate) fn register(&mut self, name: &str) {
        self.metrics.entry(name.to_string()).or_default();
    }

    pub(crate) fn set<V: Into<MetricValue>>(&mut self, name: &str, value: V) {
        self.metrics.insert(name.to_string(), value.into());
    }

    pub(crate) fn add(&mut self, name: &str, delta: u64) {
        let entry = self.metrics.entry(name.to_string()).or_default();
        *entry = match *entry {
            MetricValue::Count(n) => MetricValue::Count(n + delta),
            #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
            MetricValue::Average(n) => MetricValue::Count(n as u64 + delta),
        };
    }

    pub(crate) fn incr(&mut self, name: &str) {
        self.add(name, 1);
    }

    /// Record an offender. Does nothing if offenders are not collected.
    pub(crate) fn offend(&mut self, name: &str, offender: Offender) {
        if let Some(offenders) = self.offenders.as_mut() {
            offenders.entry(name.to_string()).or_default().push(offender);
        }
    }

    /// Increment a metric and record the offender in one go
    pub(crate) fn incr_with(&mut self, name: &str, offender: Offender) {
        self.incr(name);
        self.offend(name, offender);
    }

    pub(crate) fn finish(self) -> AnalysisResult {
        AnalysisResult {
            metrics: self.metrics,
            offenders: self.offenders,
        }
    }
}
