//! The analysis engine.
//!
//! Anything implementing [`Analyzer`] can be plugged into the runner. The
//! built-in [`CssAnalyzer`] parses the stylesheet once and hands it to a
//! list of rules, each of which reports a fixed set of metrics.

mod metrics;
mod parser;
mod rules;
mod selector;

use log::debug;

use crate::{AnalysisResult, Result};
use metrics::Collector;
use rules::Rule;

/// Per-run analyzer settings
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Options {
    /// Record which parts of the stylesheet triggered a metric
    pub collect_offenders: bool,
}

/// Computes metrics for a stylesheet
pub trait Analyzer {
    /// Analyze `css`.
    ///
    /// # Errors
    ///
    /// Returns [`crate::ErrorKind::EmptyCss`] for blank input and
    /// [`crate::ErrorKind::CssParsing`] if the stylesheet can't be parsed.
    fn analyze(&self, css: &str, options: &Options) -> Result<AnalysisResult>;
}

/// The built-in rule based analyzer
#[derive(Debug)]
pub struct CssAnalyzer {
    rules: Vec<Box<dyn Rule>>,
}

impl Default for CssAnalyzer {
    fn default() -> Self {
        Self {
            rules: rules::default_rules(),
        }
    }
}

impl Analyzer for CssAnalyzer {
    fn analyze(&self, css: &str, options: &Options) -> Result<AnalysisResult> {
        let sheet = parser::parse(css)?;
        debug!(
            "Parsed {} bytes: {} rules, {} at-rules, {} comments",
            sheet.length,
            sheet.rules.len(),
            sheet.at_rules.len(),
            sheet.comments.len()
        );

        let mut collector = Collector::new(options.collect_offenders);
        for rule in &self.rules {
            for metric in rule.metrics() {
                collector.register(metric);
            }
        }
        for rule in &self.rules {
            debug!("Running {rule:?}");
            rule.check(&sheet, &mut collector);
        }

        Ok(collector.finish())
    }
}
