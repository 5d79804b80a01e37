//! A small, forgiving stylesheet parser.
//!
//! It only understands as much CSS as the rules need: comments, style
//! rules with their selectors and declarations, and at-rules. Values and
//! selectors are kept as text. Every node remembers where it starts.

use crate::{ErrorKind, Position, Result};

/// Conditional group rules whose block contains further rules
const GROUP_AT_RULES: &[&str] = &[
    "media",
    "supports",
    "document",
    "-moz-document",
    "layer",
    "container",
    "scope",
    "starting-style",
];

/// A parsed stylesheet
#[derive(Debug, Default)]
pub(crate) struct Stylesheet {
    /// Size of the source in UTF-16 code units
    pub(crate) length: usize,
    pub(crate) comments: Vec<Comment>,
    /// Style rules in source order, including the ones inside group rules
    pub(crate) rules: Vec<StyleRule>,
    /// At-rules in source order
    pub(crate) at_rules: Vec<AtRule>,
}

/// `/* ... */`
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Comment {
    /// Text between the delimiters
    pub(crate) text: String,
    pub(crate) position: Position,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Selector {
    /// Selector text with whitespace runs collapsed
    pub(crate) text: String,
    pub(crate) position: Position,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Declaration {
    pub(crate) property: String,
    /// Value without a trailing `!important`
    pub(crate) value: String,
    pub(crate) important: bool,
    pub(crate) position: Position,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct StyleRule {
    pub(crate) selectors: Vec<Selector>,
    pub(crate) declarations: Vec<Declaration>,
    pub(crate) position: Position,
    /// Prelude of the innermost enclosing `@media`, if any
    pub(crate) media: Option<String>,
}

impl StyleRule {
    /// All selectors joined the way they'd be written on one line
    pub(crate) fn selector_list(&self) -> String {
        self.selectors
            .iter()
            .map(|s| s.text.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum AtRuleBlock {
    /// Statement at-rule, e.g. `@import` or `@charset`
    None,
    /// Group rule and the number of style rules directly inside it
    Rules(usize),
    /// Keyframe blocks of `@keyframes`
    Keyframes(Vec<StyleRule>),
    /// Declaration block, e.g. `@font-face` or `@page`
    Declarations(Vec<Declaration>),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct AtRule {
    /// Lowercase name without the `@`
    pub(crate) name: String,
    pub(crate) prelude: String,
    pub(crate) position: Position,
    pub(crate) block: AtRuleBlock,
}

/// Where a list of rules lives
#[derive(Debug, Clone)]
struct Context {
    /// `Some` with the position of the opening brace when inside a block
    block_start: Option<Position>,
    media: Option<String>,
    keyframes: bool,
}

impl Context {
    const fn top_level() -> Self {
        Self {
            block_start: None,
            media: None,
            keyframes: false,
        }
    }
}

/// Parse stylesheet text.
///
/// # Errors
///
/// Fails with [`ErrorKind::EmptyCss`] for blank input and with
/// [`ErrorKind::CssParsing`] for unbalanced blocks, unterminated comments
/// or strings, and rules without a declaration block.
pub(crate) fn parse(css: &str) -> Result<Stylesheet> {
    if css.trim().is_empty() {
        return Err(ErrorKind::EmptyCss);
    }

    let mut parser = Parser::new(css);
    let mut unused = Vec::new();
    parser.parse_rule_list(&Context::top_level(), &mut unused)?;
    Ok(parser.sheet)
}

struct Parser {
    chars: Vec<char>,
    pos: usize,
    line: usize,
    column: usize,
    sheet: Stylesheet,
}

impl Parser {
    fn new(css: &str) -> Self {
        Self {
            chars: css.chars().collect(),
            pos: 0,
            line: 1,
            column: 1,
            sheet: Stylesheet {
                length: css.encode_utf16().count(),
                ..Stylesheet::default()
            },
        }
    }

    fn peek(&self) -> Option<char> {
        self.chars.get(self.pos).copied()
    }

    fn peek_at(&self, offset: usize) -> Option<char> {
        self.chars.get(self.pos + offset).copied()
    }

    fn at_comment(&self) -> bool {
        self.peek() == Some('/') && self.peek_at(1) == Some('*')
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += 1;
        if c == '\n' {
            self.line += 1;
            self.column = 1;
        } else {
            self.column += 1;
        }
        Some(c)
    }

    const fn position(&self) -> Position {
        Position::new(self.line, self.column)
    }

    fn error_at<S: Into<String>>(position: Position, message: S) -> ErrorKind {
        ErrorKind::CssParsing {
            message: message.into(),
            line: position.line,
            column: position.column,
        }
    }

    fn skip_whitespace_and_comments(&mut self) -> Result<()> {
        loop {
            match self.peek() {
                Some(c) if c.is_whitespace() => {
                    self.bump();
                }
                Some('/') if self.at_comment() => self.read_comment()?,
                _ => return Ok(()),
            }
        }
    }

    /// Consume a comment starting at `/*` and record it
    fn read_comment(&mut self) -> Result<()> {
        let position = self.position();
        self.bump();
        self.bump();

        let mut text = String::new();
        loop {
            match self.bump() {
                Some('*') if self.peek() == Some('/') => {
                    self.bump();
                    self.sheet.comments.push(Comment { text, position });
                    return Ok(());
                }
                Some(c) => text.push(c),
                None => return Err(Self::error_at(position, "Unclosed comment")),
            }
        }
    }

    /// Consume a quoted string, including its quotes, into `out`
    fn read_string(&mut self, out: &mut Vec<(char, Position)>) -> Result<()> {
        let position = self.position();
        let Some(quote) = self.bump() else {
            return Ok(());
        };
        out.push((quote, position));

        loop {
            let here = self.position();
            match self.bump() {
                Some('\\') => {
                    out.push(('\\', here));
                    let escaped_at = self.position();
                    if let Some(c) = self.bump() {
                        out.push((c, escaped_at));
                    }
                }
                Some('\n') | None => return Err(Self::error_at(position, "Unclosed string")),
                Some(c) => {
                    out.push((c, here));
                    if c == quote {
                        return Ok(());
                    }
                }
            }
        }
    }

    /// Read up to (but not including) the first top-level character in
    /// `stops`. Strings and parenthesized/bracketed groups are kept intact,
    /// comments are recorded and dropped.
    fn read_until(&mut self, stops: &[char]) -> Result<Vec<(char, Position)>> {
        let mut out = Vec::new();
        let mut depth = 0usize;

        loop {
            match self.peek() {
                None => return Ok(out),
                Some('/') if self.at_comment() => self.read_comment()?,
                Some('"' | '\'') => self.read_string(&mut out)?,
                Some(c) if depth == 0 && stops.contains(&c) => return Ok(out),
                Some(c) => {
                    match c {
                        '(' | '[' => depth += 1,
                        ')' | ']' => depth = depth.saturating_sub(1),
                        _ => {}
                    }
                    let position = self.position();
                    self.bump();
                    out.push((c, position));
                }
            }
        }
    }

    /// Parse rules until the end of input (top level) or the closing brace
    /// of the current block. Returns the number of style rules found.
    fn parse_rule_list(&mut self, ctx: &Context, frames: &mut Vec<StyleRule>) -> Result<usize> {
        let mut count = 0;
        loop {
            self.skip_whitespace_and_comments()?;
            match (self.peek(), ctx.block_start) {
                (None, None) => return Ok(count),
                (None, Some(start)) => return Err(Self::error_at(start, "Unclosed block")),
                (Some('}'), None) => {
                    return Err(Self::error_at(self.position(), "Unexpected '}'"));
                }
                (Some('}'), Some(_)) => {
                    self.bump();
                    return Ok(count);
                }
                (Some('@'), _) => self.parse_at_rule(ctx)?,
                (Some(_), _) => {
                    let rule = self.parse_style_rule(ctx)?;
                    count += 1;
                    if ctx.keyframes {
                        frames.push(rule);
                    } else {
                        self.sheet.rules.push(rule);
                    }
                }
            }
        }
    }

    fn parse_style_rule(&mut self, ctx: &Context) -> Result<StyleRule> {
        let position = self.position();
        let prelude = self.read_until(&['{', '}', ';'])?;
        if self.peek() != Some('{') {
            return Err(Self::error_at(position, "Missing '{' after selector"));
        }
        let block_start = self.position();
        self.bump();

        let declarations = self.parse_declarations(block_start)?;

        Ok(StyleRule {
            selectors: split_selectors(&prelude),
            declarations,
            position,
            media: ctx.media.clone(),
        })
    }

    /// Parse a declaration block. The opening brace has been consumed
    /// already, the closing one is consumed here.
    fn parse_declarations(&mut self, block_start: Position) -> Result<Vec<Declaration>> {
        let mut declarations = Vec::new();
        loop {
            self.skip_whitespace_and_comments()?;
            match self.peek() {
                None => return Err(Self::error_at(block_start, "Unclosed block")),
                Some('}') => {
                    self.bump();
                    return Ok(declarations);
                }
                Some(';') => {
                    self.bump();
                }
                Some('{') => return Err(Self::error_at(self.position(), "Unexpected '{'")),
                Some(_) => declarations.push(self.parse_declaration()?),
            }
        }
    }

    fn parse_declaration(&mut self) -> Result<Declaration> {
        let position = self.position();
        let property = collect_text(&self.read_until(&[':', ';', '{', '}'])?);
        if self.peek() != Some(':') {
            return Err(Self::error_at(
                position,
                format!("Missing ':' after property `{}`", property.trim()),
            ));
        }
        self.bump();

        let raw = collect_text(&self.read_until(&[';', '{', '}'])?);
        if self.peek() == Some('{') {
            return Err(Self::error_at(self.position(), "Unexpected '{'"));
        }
        let (value, important) = strip_important(raw.trim());

        Ok(Declaration {
            property: property.trim().to_string(),
            value,
            important,
            position,
        })
    }

    fn parse_at_rule(&mut self, ctx: &Context) -> Result<()> {
        let position = self.position();
        self.bump();

        let mut name = String::new();
        while let Some(c) = self.peek() {
            if c.is_alphanumeric() || c == '-' || c == '_' {
                name.push(c);
                self.bump();
            } else {
                break;
            }
        }
        let name = name.to_lowercase();
        let prelude = collapse_whitespace(&collect_text(&self.read_until(&[';', '{', '}'])?));

        let index = self.sheet.at_rules.len();
        self.sheet.at_rules.push(AtRule {
            name: name.clone(),
            prelude: prelude.clone(),
            position,
            block: AtRuleBlock::None,
        });

        // `}` ends the enclosing block and is left for the caller
        if self.peek() != Some('{') {
            if self.peek() == Some(';') {
                self.bump();
            }
            return Ok(());
        }
        let block_start = self.position();
        self.bump();

        let block = if GROUP_AT_RULES.contains(&name.as_str()) {
            let nested = Context {
                block_start: Some(block_start),
                media: if name == "media" {
                    Some(prelude)
                } else {
                    ctx.media.clone()
                },
                keyframes: false,
            };
            let mut unused = Vec::new();
            AtRuleBlock::Rules(self.parse_rule_list(&nested, &mut unused)?)
        } else if name.ends_with("keyframes") {
            let nested = Context {
                block_start: Some(block_start),
                media: ctx.media.clone(),
                keyframes: true,
            };
            let mut frames = Vec::new();
            self.parse_rule_list(&nested, &mut frames)?;
            AtRuleBlock::Keyframes(frames)
        } else {
            AtRuleBlock::Declarations(self.parse_declarations(block_start)?)
        };

        self.sheet.at_rules[index].block = block;
        Ok(())
    }
}

fn collect_text(chars: &[(char, Position)]) -> String {
    chars.iter().map(|(c, _)| c).collect()
}

fn collapse_whitespace(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Split a rule prelude at top-level commas
fn split_selectors(prelude: &[(char, Position)]) -> Vec<Selector> {
    let mut selectors = Vec::new();
    let mut depth = 0usize;
    let mut quote: Option<char> = None;
    let mut current: Vec<(char, Position)> = Vec::new();

    for &(c, position) in prelude {
        match (quote, c) {
            (Some(q), c) if c == q => quote = None,
            (Some(_), _) => {}
            (None, '"' | '\'') => quote = Some(c),
            (None, '(' | '[') => depth += 1,
            (None, ')' | ']') => depth = depth.saturating_sub(1),
            (None, ',') if depth == 0 => {
                selectors.extend(to_selector(&current));
                current.clear();
                continue;
            }
            _ => {}
        }
        current.push((c, position));
    }
    selectors.extend(to_selector(&current));
    selectors
}

fn to_selector(chars: &[(char, Position)]) -> Option<Selector> {
    let (_, position) = chars.iter().find(|(c, _)| !c.is_whitespace())?;
    Some(Selector {
        text: collapse_whitespace(&collect_text(chars)),
        position: *position,
    })
}

/// Split off a trailing `!important` (case and whitespace insensitive)
fn strip_important(value: &str) -> (String, bool) {
    if let Some(index) = value.rfind('!') {
        if value[index + 1..].trim().eq_ignore_ascii_case("important") {
            return (value[..index].trim_end().to_string(), true);
        }
    }
    (value.to_string(), false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn parse_error(css: &str) -> (String, usize, usize) {
        match parse(css) {
            Err(ErrorKind::CssParsing {
                message,
                line,
                column,
            }) => (message, line, column),
            other => panic!("Expected a parsing error, got {other:?}"),
        }
    }

    #[test]
    fn test_empty_css() {
        assert!(matches!(parse(""), Err(ErrorKind::EmptyCss)));
        assert!(matches!(parse(" \n\t "), Err(ErrorKind::EmptyCss)));
    }

    #[test]
    fn test_style_rule() {
        let sheet = parse(".foo, #bar > a {\n  color: red;\n  margin: 0 !important\n}").unwrap();
        assert_eq!(sheet.rules.len(), 1);

        let rule = &sheet.rules[0];
        assert_eq!(rule.position, Position::new(1, 1));
        assert_eq!(
            rule.selectors,
            vec![
                Selector {
                    text: ".foo".to_string(),
                    position: Position::new(1, 1),
                },
                Selector {
                    text: "#bar > a".to_string(),
                    position: Position::new(1, 7),
                },
            ]
        );
        assert_eq!(
            rule.declarations,
            vec![
                Declaration {
                    property: "color".to_string(),
                    value: "red".to_string(),
                    important: false,
                    position: Position::new(2, 3),
                },
                Declaration {
                    property: "margin".to_string(),
                    value: "0".to_string(),
                    important: true,
                    position: Position::new(3, 3),
                },
            ]
        );
    }

    #[test]
    fn test_multiline_selector_is_collapsed() {
        let sheet = parse("ul\n  li,\n\ta {}").unwrap();
        let texts: Vec<_> = sheet.rules[0]
            .selectors
            .iter()
            .map(|s| s.text.as_str())
            .collect();
        assert_eq!(texts, vec!["ul li", "a"]);
        assert_eq!(sheet.rules[0].selectors[1].position, Position::new(3, 2));
    }

    #[test]
    fn test_comma_inside_pseudo_class() {
        let sheet = parse(":is(h1, h2) span, a[title=\"a,b\"] { color: red }").unwrap();
        let texts: Vec<_> = sheet.rules[0]
            .selectors
            .iter()
            .map(|s| s.text.as_str())
            .collect();
        assert_eq!(texts, vec![":is(h1, h2) span", "a[title=\"a,b\"]"]);
    }

    #[test]
    fn test_comments() {
        let sheet = parse("/* header */\na { /* inline */ color: red }").unwrap();
        assert_eq!(
            sheet.comments,
            vec![
                Comment {
                    text: " header ".to_string(),
                    position: Position::new(1, 1),
                },
                Comment {
                    text: " inline ".to_string(),
                    position: Position::new(2, 5),
                },
            ]
        );
        assert_eq!(sheet.rules[0].declarations.len(), 1);
    }

    #[test]
    fn test_strings_may_contain_braces() {
        let sheet = parse("a:after { content: \"}{;\" }").unwrap();
        assert_eq!(sheet.rules[0].declarations[0].value, "\"}{;\"");
    }

    #[test]
    fn test_data_uri_value() {
        let sheet =
            parse(".icon { background: url(data:image/png;base64,iVBORw0KGgo=) }").unwrap();
        assert_eq!(
            sheet.rules[0].declarations[0].value,
            "url(data:image/png;base64,iVBORw0KGgo=)"
        );
    }

    #[test]
    fn test_media_query() {
        let sheet =
            parse("@media screen and (max-width: 600px) {\n  a { color: red }\n  b { }\n}\np {}")
                .unwrap();
        assert_eq!(sheet.at_rules.len(), 1);
        assert_eq!(sheet.at_rules[0].name, "media");
        assert_eq!(sheet.at_rules[0].prelude, "screen and (max-width: 600px)");
        assert_eq!(sheet.at_rules[0].block, AtRuleBlock::Rules(2));

        assert_eq!(sheet.rules.len(), 3);
        assert_eq!(
            sheet.rules[0].media.as_deref(),
            Some("screen and (max-width: 600px)")
        );
        assert_eq!(sheet.rules[2].media, None);
    }

    #[test]
    fn test_statement_at_rules() {
        let sheet = parse("@charset \"utf-8\";\n@import url(\"foo.css\") screen;\na {}").unwrap();
        let names: Vec<_> = sheet.at_rules.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["charset", "import"]);
        assert_eq!(sheet.at_rules[1].prelude, "url(\"foo.css\") screen");
        assert_eq!(sheet.at_rules[1].position, Position::new(2, 1));
    }

    #[test]
    fn test_keyframes_are_not_style_rules() {
        let sheet = parse("@-webkit-keyframes spin { from { opacity: 0 } to { opacity: 1 } }")
            .unwrap();
        assert!(sheet.rules.is_empty());
        match &sheet.at_rules[0].block {
            AtRuleBlock::Keyframes(frames) => assert_eq!(frames.len(), 2),
            other => panic!("Expected keyframes, got {other:?}"),
        }
    }

    #[test]
    fn test_font_face() {
        let sheet = parse("@font-face { font-family: Foo; src: url(foo.woff) }").unwrap();
        match &sheet.at_rules[0].block {
            AtRuleBlock::Declarations(declarations) => assert_eq!(declarations.len(), 2),
            other => panic!("Expected declarations, got {other:?}"),
        }
    }

    #[test]
    fn test_unclosed_block() {
        assert_eq!(
            parse_error("a {\n  color: red;\n"),
            ("Unclosed block".to_string(), 1, 3)
        );
        assert_eq!(
            parse_error("@media print {\n a { }"),
            ("Unclosed block".to_string(), 1, 14)
        );
    }

    #[test]
    fn test_unexpected_closing_brace() {
        assert_eq!(
            parse_error("a { }\n}"),
            ("Unexpected '}'".to_string(), 2, 1)
        );
    }

    #[test]
    fn test_missing_block() {
        assert_eq!(
            parse_error("a, b;"),
            ("Missing '{' after selector".to_string(), 1, 1)
        );
    }

    #[test]
    fn test_unclosed_comment() {
        assert_eq!(
            parse_error("a { }\n/* oops"),
            ("Unclosed comment".to_string(), 2, 1)
        );
    }

    #[test]
    fn test_missing_colon() {
        let (message, line, column) = parse_error("a { color red }");
        assert_eq!(message, "Missing ':' after property `color red`");
        assert_eq!((line, column), (1, 5));
    }

    #[test]
    fn test_strip_important() {
        assert_eq!(strip_important("red !important"), ("red".to_string(), true));
        assert_eq!(strip_important("red!IMPORTANT"), ("red".to_string(), true));
        assert_eq!(strip_important("red ! important"), ("red".to_string(), true));
        assert_eq!(strip_important("red"), ("red".to_string(), false));
    }
}
