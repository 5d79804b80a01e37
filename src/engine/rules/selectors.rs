use super::Rule;
use crate::engine::metrics::Collector;
use crate::engine::parser::Stylesheet;
use crate::engine::selector::{self, Compound};
use crate::Offender;

/// Selectors with more compound parts than this are complex
const MAX_COMPOUNDS: usize = 3;

/// Counts selectors by kind and reports the expensive ones
#[derive(Debug, Clone, Copy)]
pub(crate) struct SelectorsRule;

impl Rule for SelectorsRule {
    fn metrics(&self) -> &'static [&'static str] {
        &[
            "selectors",
            "selectorsByAttribute",
            "selectorsByClass",
            "selectorsById",
            "selectorsByPseudo",
            "selectorsByTag",
            "universalSelectors",
            "complexSelectors",
            "qualifiedSelectors",
            "multiClassesSelectors",
        ]
    }

    fn check(&self, sheet: &Stylesheet, collector: &mut Collector) {
        for selector in sheet.rules.iter().flat_map(|rule| &rule.selectors) {
            let parsed = selector::parse(&selector.text);
            let offender = || Offender::new(selector.text.clone(), selector.position);

            collector.incr("selectors");
            let by_kind = [
                ("selectorsByAttribute", parsed.has_attribute()),
                ("selectorsByClass", parsed.has_class()),
                ("selectorsById", parsed.has_id()),
                ("selectorsByPseudo", parsed.has_pseudo()),
                ("selectorsByTag", parsed.has_type()),
            ];
            for (metric, matches) in by_kind {
                if matches {
                    collector.incr(metric);
                }
            }

            if parsed.compounds.iter().any(Compound::is_universal) {
                collector.incr_with("universalSelectors", offender());
            }
            if parsed.compounds.len() > MAX_COMPOUNDS {
                collector.incr_with("complexSelectors", offender());
            }
            if parsed.compounds.iter().any(is_qualified) {
                collector.incr_with("qualifiedSelectors", offender());
            }
            if parsed.compounds.iter().any(|c| c.classes > 1) {
                collector.incr_with("multiClassesSelectors", offender());
            }
        }
    }
}

/// An id or class narrowed down any further, e.g. `div#foo`, `a.bar` or `#foo.bar`
fn is_qualified(compound: &Compound) -> bool {
    (compound.ids > 0 && (compound.has_type() || compound.classes > 0))
        || (compound.classes > 0 && compound.has_type())
}
