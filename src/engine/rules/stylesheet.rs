use super::{truncate, Rule};
use crate::engine::metrics::Collector;
use crate::engine::parser::{AtRuleBlock, Stylesheet};
use crate::Offender;

const MAX_COMMENT_CHARS: usize = 100;

/// Document-wide numbers: size, comments, imports and media queries
#[derive(Debug, Clone, Copy)]
pub(crate) struct StylesheetRule;

impl Rule for StylesheetRule {
    fn metrics(&self) -> &'static [&'static str] {
        &["length", "comments", "commentsLength", "imports", "mediaQueries"]
    }

    fn check(&self, sheet: &Stylesheet, collector: &mut Collector) {
        collector.set("length", sheet.length as u64);

        for comment in &sheet.comments {
            collector.add("commentsLength", comment.text.encode_utf16().count() as u64);
            collector.incr_with(
                "comments",
                Offender::new(
                    format!("/* {} */", truncate(comment.text.trim(), MAX_COMMENT_CHARS)),
                    comment.position,
                ),
            );
        }

        for at_rule in &sheet.at_rules {
            match (at_rule.name.as_str(), &at_rule.block) {
                ("import", _) => collector.incr_with(
                    "imports",
                    Offender::new(format!("@import {}", at_rule.prelude), at_rule.position),
                ),
                ("media", AtRuleBlock::Rules(count)) => collector.incr_with(
                    "mediaQueries",
                    Offender::new(
                        format!("@media {} ({count} rules)", at_rule.prelude),
                        at_rule.position,
                    ),
                ),
                _ => {}
            }
        }
    }
}
