use indexmap::IndexMap;
use std::collections::HashSet;

use super::Rule;
use crate::engine::metrics::Collector;
use crate::engine::parser::Stylesheet;
use crate::{Offender, Position};

/// Rule blocks: how many, how big, and which ones repeat themselves
#[derive(Debug, Clone, Copy)]
pub(crate) struct BlocksRule;

impl Rule for BlocksRule {
    fn metrics(&self) -> &'static [&'static str] {
        &[
            "rules",
            "declarations",
            "emptyRules",
            "duplicatedSelectors",
            "duplicatedProperties",
        ]
    }

    fn check(&self, sheet: &Stylesheet, collector: &mut Collector) {
        // (media, selector list) -> (first position, occurrences)
        let mut seen: IndexMap<(Option<&str>, String), (Position, u64)> = IndexMap::new();

        for rule in &sheet.rules {
            let selectors = rule.selector_list();
            collector.incr("rules");
            collector.add("declarations", rule.declarations.len() as u64);

            if rule.declarations.is_empty() {
                collector.incr_with("emptyRules", Offender::new(selectors.clone(), rule.position));
            }

            let mut properties = HashSet::new();
            for declaration in &rule.declarations {
                if !properties.insert(declaration.property.to_lowercase()) {
                    collector.incr_with(
                        "duplicatedProperties",
                        Offender::new(
                            format!(
                                "{selectors} {{{}: {}}}",
                                declaration.property, declaration.value
                            ),
                            declaration.position,
                        ),
                    );
                }
            }

            seen.entry((rule.media.as_deref(), selectors))
                .or_insert((rule.position, 0))
                .1 += 1;
        }

        for ((_, selectors), (position, count)) in seen {
            if count > 1 {
                collector.incr_with(
                    "duplicatedSelectors",
                    Offender::new(format!("{selectors} ({count} times)"), position),
                );
            }
        }
    }
}
