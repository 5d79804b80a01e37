use indexmap::IndexMap;
use regex::Regex;
use std::sync::LazyLock;

use super::Rule;
use crate::engine::metrics::Collector;
use crate::engine::parser::{Declaration, Stylesheet};
use crate::{Offender, Position};

static COLOR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)#(?:[0-9a-f]{8}|[0-9a-f]{6}|[0-9a-f]{3,4})\b|(?:rgba?|hsla?)\([^)]*\)")
        .unwrap()
});

static BASE64: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"data:[^;,)]*;base64,([A-Za-z0-9+/=]+)").unwrap());

/// Suspicious declarations: `!important`, colors, inlined images and
/// old IE hacks
#[derive(Debug, Clone, Copy)]
pub(crate) struct DeclarationsRule;

impl Rule for DeclarationsRule {
    fn metrics(&self) -> &'static [&'static str] {
        &["importants", "colors", "base64Length", "oldIEFixes"]
    }

    fn check(&self, sheet: &Stylesheet, collector: &mut Collector) {
        // normalized color -> (first position, occurrences)
        let mut colors: IndexMap<String, (Position, u64)> = IndexMap::new();

        for rule in &sheet.rules {
            let selectors = rule.selector_list();

            for declaration in &rule.declarations {
                let Declaration {
                    property, value, ..
                } = declaration;
                let at = declaration.position;

                if declaration.important {
                    collector.incr_with(
                        "importants",
                        Offender::new(format!("{selectors} {{{property}: {value} !important}}"), at),
                    );
                }

                for color in COLOR.find_iter(value) {
                    colors
                        .entry(normalize_color(color.as_str()))
                        .or_insert((at, 0))
                        .1 += 1;
                }

                let encoded: usize = BASE64
                    .captures_iter(value)
                    .filter_map(|captures| captures.get(1))
                    .map(|payload| payload.as_str().len())
                    .sum();
                if encoded > 0 {
                    collector.add("base64Length", encoded as u64);
                    collector.offend(
                        "base64Length",
                        Offender::new(
                            format!("{selectors} {{{property}: url(data:...)}} ({encoded} bytes)"),
                            at,
                        ),
                    );
                }

                if is_old_ie_fix(declaration) {
                    collector.incr_with(
                        "oldIEFixes",
                        Offender::new(format!("{selectors} {{{property}: {value}}}"), at),
                    );
                }
            }
        }

        collector.set("colors", colors.len() as u64);
        for (color, (position, count)) in colors {
            collector.offend(
                "colors",
                Offender::new(format!("{color} ({count} times)"), position),
            );
        }
    }
}

/// `#FFF` and `#fff` are the same color, so are `rgb(0, 0, 0)` and `rgb(0,0,0)`
fn normalize_color(color: &str) -> String {
    color
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect::<String>()
        .to_lowercase()
}

/// Star and underscore property hacks, and the `\9` value hack
fn is_old_ie_fix(declaration: &Declaration) -> bool {
    declaration.property.starts_with(['*', '_']) || declaration.value.ends_with("\\9")
}

#[cfg(test)]
mod tests {
    use super::normalize_color;
    use crate::test_utils::{analyze, metric, offenders};
    use pretty_assertions::assert_eq;

    #[test]
    fn test_importants() {
        let result = analyze(".foo { color: red !important; margin: 0 }\n.bar { padding: 0 ! IMPORTANT }");
        assert_eq!(metric(&result, "importants"), 2.0);
        assert_eq!(
            offenders(&result, "importants"),
            vec![
                ".foo {color: red !important} @ 1:8",
                ".bar {padding: 0 !important} @ 2:8"
            ]
        );
    }

    #[test]
    fn test_colors_are_counted_once() {
        let css = "a { color: #FFF }\nb { color: #fff; background: rgb(0, 0, 0) }\n\
                   i { border: 1px solid rgb(0,0,0) }\nu { color: #abcdef80 }";
        let result = analyze(css);
        assert_eq!(metric(&result, "colors"), 3.0);
        assert_eq!(
            offenders(&result, "colors"),
            vec![
                "#fff (2 times) @ 1:5",
                "rgb(0,0,0) (2 times) @ 2:18",
                "#abcdef80 (1 times) @ 4:5"
            ]
        );
    }

    #[test]
    fn test_no_colors_in_partial_hex() {
        let result = analyze("a { color: #abcde }");
        assert_eq!(metric(&result, "colors"), 0.0);
    }

    #[test]
    fn test_base64_length() {
        let css = ".icon { background: url(data:image/png;base64,iVBORw0KGgo=) }\n\
                   .plain { background: url(foo.png) }";
        let result = analyze(css);
        assert_eq!(metric(&result, "base64Length"), 12.0);
        assert_eq!(
            offenders(&result, "base64Length"),
            vec![".icon {background: url(data:...)} (12 bytes) @ 1:9"]
        );
    }

    #[test]
    fn test_old_ie_fixes() {
        let css = ".a { *zoom: 1 }\n.b { _height: 1px }\n.c { width: 100px\\9 }\n.d { width: 1px }";
        let result = analyze(css);
        assert_eq!(metric(&result, "oldIEFixes"), 3.0);
        assert_eq!(
            offenders(&result, "oldIEFixes"),
            vec![
                ".a {*zoom: 1} @ 1:6",
                ".b {_height: 1px} @ 2:6",
                ".c {width: 100px\\9} @ 3:6"
            ]
        );
    }

    #[test]
    fn test_normalize_color() {
        assert_eq!(normalize_color("RGBA(0, 0, 0, .5)"), "rgba(0,0,0,.5)");
    }
}
