//! Breaks a single selector into compound selectors and counts what each
//! of them is made of.

/// Pseudo-elements which may still be written with a single colon
const LEGACY_PSEUDO_ELEMENTS: &[&str] = &["before", "after", "first-line", "first-letter"];

/// One compound selector, e.g. `a.foo:hover` in `ul > a.foo:hover`
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub(crate) struct Compound {
    /// Type selector, `*` for the universal selector
    pub(crate) tag: Option<String>,
    pub(crate) ids: u64,
    pub(crate) classes: u64,
    pub(crate) attributes: u64,
    pub(crate) pseudo_classes: u64,
    pub(crate) pseudo_elements: u64,
}

impl Compound {
    fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// `true` for a type selector other than `*`
    pub(crate) fn has_type(&self) -> bool {
        self.tag.as_deref().is_some_and(|tag| tag != "*")
    }

    /// `*` on its own, possibly with pseudo-classes
    pub(crate) fn is_universal(&self) -> bool {
        self.tag.as_deref() == Some("*") && self.ids == 0 && self.classes == 0 && self.attributes == 0
    }
}

/// `(ids, classes, tags)`
pub(crate) type Specificity = (u64, u64, u64);

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub(crate) struct ParsedSelector {
    pub(crate) compounds: Vec<Compound>,
}

impl ParsedSelector {
    fn any(&self, f: impl Fn(&Compound) -> bool) -> bool {
        self.compounds.iter().any(f)
    }

    pub(crate) fn has_id(&self) -> bool {
        self.any(|c| c.ids > 0)
    }

    pub(crate) fn has_class(&self) -> bool {
        self.any(|c| c.classes > 0)
    }

    pub(crate) fn has_attribute(&self) -> bool {
        self.any(|c| c.attributes > 0)
    }

    pub(crate) fn has_pseudo(&self) -> bool {
        self.any(|c| c.pseudo_classes > 0 || c.pseudo_elements > 0)
    }

    pub(crate) fn has_type(&self) -> bool {
        self.any(Compound::has_type)
    }

    pub(crate) fn specificity(&self) -> Specificity {
        self.compounds.iter().fold((0, 0, 0), |(a, b, c), compound| {
            (
                a + compound.ids,
                b + compound.classes + compound.attributes + compound.pseudo_classes,
                c + u64::from(compound.has_type()) + compound.pseudo_elements,
            )
        })
    }
}

/// Parse selector text. Unknown characters are skipped.
pub(crate) fn parse(selector: &str) -> ParsedSelector {
    let chars: Vec<char> = selector.chars().collect();
    let mut compounds = Vec::new();
    let mut current = Compound::default();
    let mut i = 0;

    while i < chars.len() {
        match chars[i] {
            c if c.is_whitespace() || matches!(c, '>' | '+' | '~') => {
                if !current.is_empty() {
                    compounds.push(std::mem::take(&mut current));
                }
                i += 1;
            }
            '#' => {
                current.ids += 1;
                i = skip_ident(&chars, i + 1);
            }
            '.' => {
                current.classes += 1;
                i = skip_ident(&chars, i + 1);
            }
            '[' => {
                current.attributes += 1;
                i = skip_group(&chars, i, '[', ']');
            }
            ':' => {
                let double = chars.get(i + 1) == Some(&':');
                let start = if double { i + 2 } else { i + 1 };
                let end = skip_ident(&chars, start);
                let name: String = chars[start..end].iter().collect::<String>().to_lowercase();
                if double || LEGACY_PSEUDO_ELEMENTS.contains(&name.as_str()) {
                    current.pseudo_elements += 1;
                } else {
                    current.pseudo_classes += 1;
                }
                i = if chars.get(end) == Some(&'(') {
                    skip_group(&chars, end, '(', ')')
                } else {
                    end
                };
            }
            '*' => {
                current.tag = Some("*".to_string());
                i += 1;
            }
            c if is_ident_char(c) => {
                let end = skip_ident(&chars, i);
                current.tag = Some(chars[i..end].iter().collect::<String>().to_lowercase());
                i = end;
            }
            _ => i += 1,
        }
    }
    if !current.is_empty() {
        compounds.push(current);
    }

    ParsedSelector { compounds }
}

fn is_ident_char(c: char) -> bool {
    c.is_alphanumeric() || c == '-' || c == '_' || !c.is_ascii()
}

fn skip_ident(chars: &[char], mut i: usize) -> usize {
    while i < chars.len() {
        match chars[i] {
            '\\' => i += 2,
            c if is_ident_char(c) => i += 1,
            _ => break,
        }
    }
    i.min(chars.len())
}

/// Index right after the bracket closing the one at `start`
fn skip_group(chars: &[char], start: usize, open: char, close: char) -> usize {
    let mut depth = 0usize;
    let mut quote: Option<char> = None;
    let mut i = start;

    while i < chars.len() {
        let c = chars[i];
        match quote {
            Some(q) if c == q => quote = None,
            Some(_) => {}
            None if c == '"' || c == '\'' => quote = Some(c),
            None if c == open => depth += 1,
            None if c == close => {
                depth -= 1;
                if depth == 0 {
                    return i + 1;
                }
            }
            None => {}
        }
        i += 1;
    }
    chars.len()
}
