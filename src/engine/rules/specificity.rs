use super::Rule;
use crate::engine::metrics::Collector;
use crate::engine::parser::Stylesheet;
use crate::engine::selector;
use crate::MetricValue;

/// Totals and averages of selector specificity, per component
#[derive(Debug, Clone, Copy)]
pub(crate) struct SpecificityRule;

impl Rule for SpecificityRule {
    fn metrics(&self) -> &'static [&'static str] {
        &[
            "specificityIdAvg",
            "specificityIdTotal",
            "specificityClassAvg",
            "specificityClassTotal",
            "specificityTagAvg",
            "specificityTagTotal",
        ]
    }

    fn check(&self, sheet: &Stylesheet, collector: &mut Collector) {
        let mut count = 0;
        let (mut ids, mut classes, mut tags) = (0, 0, 0);

        for selector in sheet.rules.iter().flat_map(|rule| &rule.selectors) {
            let (a, b, c) = selector::parse(&selector.text).specificity();
            ids += a;
            classes += b;
            tags += c;
            count += 1;
        }

        for (name, total) in [("Id", ids), ("Class", classes), ("Tag", tags)] {
            collector.set(&format!("specificity{name}Avg"), MetricValue::average(total, count));
            collector.set(&format!("specificity{name}Total"), total);
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::test_utils::{analyze, metric};
    use crate::MetricValue;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_specificity_totals_and_averages() {
        let result = analyze("#nav a { }\n.foo .bar, li { }\nul li:hover { }");
        assert_eq!(metric(&result, "specificityIdTotal"), 1.0);
        assert_eq!(metric(&result, "specificityIdAvg"), 0.25);
        assert_eq!(metric(&result, "specificityClassTotal"), 3.0);
        assert_eq!(metric(&result, "specificityClassAvg"), 0.75);
        assert_eq!(metric(&result, "specificityTagTotal"), 4.0);
        assert_eq!(metric(&result, "specificityTagAvg"), 1.0);
    }

    #[test]
    fn test_averages_are_rounded() {
        let result = analyze(".a { }\nb { }\ni { }");
        assert_eq!(metric(&result, "specificityClassAvg"), 0.33);
        assert_eq!(metric(&result, "specificityTagAvg"), 0.67);
    }

    #[test]
    fn test_no_selectors() {
        let result = analyze("/* nothing to see */");
        assert_eq!(result.metrics["specificityIdAvg"], MetricValue::Count(0));
        assert_eq!(result.metrics["specificityTagTotal"], MetricValue::Count(0));
    }
}
