//! The built-in rule set.
//!
//! Each rule owns a fixed list of metrics. All metrics are registered
//! before any rule runs, so the report lists them in registry order no
//! matter which rules end up reporting something.

mod blocks;
mod declarations;
mod selectors;
mod specificity;
mod stylesheet;

use std::fmt::Debug;

use super::metrics::Collector;
use super::parser::Stylesheet;

/// A check over a parsed stylesheet
pub(crate) trait Rule: Debug + Send + Sync {
    /// Metrics this rule reports, in output order
    fn metrics(&self) -> &'static [&'static str];

    fn check(&self, sheet: &Stylesheet, collector: &mut Collector);
}

/// All built-in rules in output order
pub(crate) fn default_rules() -> Vec<Box<dyn Rule>> {
    vec![
        Box::new(stylesheet::StylesheetRule),
        Box::new(blocks::BlocksRule),
        Box::new(selectors::SelectorsRule),
        Box::new(specificity::SpecificityRule),
        Box::new(declarations::DeclarationsRule),
    ]
}

/// Shorten long offender messages, e.g. comment bodies
pub(crate) fn truncate(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    let head: String = text.chars().take(max_chars).collect();
    format!("{head}...")
}
