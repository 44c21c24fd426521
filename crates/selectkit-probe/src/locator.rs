//! Locator abstraction for element selection.
//!
//! Locators are descriptions, not handles: they are resolved against a
//! [`Document`] every time they are used, so a locator built before a
//! re-render still finds the freshly rendered nodes.
//!
//! - **Strict Selection**: [`Locator::resolve`] fails if several elements match
//! - **Scoping**: [`Locator::of`] searches inside whatever another locator finds
//! - **Text Filtering**: [`Locator::where_text_includes`] keeps matches whose
//!   text contains a fragment

use crate::result::{ProbeError, ProbeResult};
use cssparser::{ParseError, Parser, ParserInput, Token};
use selectkit::dom::{Document, Element, NodeId};
use std::fmt;

/// One `[name]` or `[name="value"]` condition
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttrMatch {
    /// Attribute name
    pub name: String,
    /// Required value, or `None` for presence only
    pub value: Option<String>,
}

/// A parsed compound CSS selector: `tag.class.class[attr][attr="v"]`.
///
/// Combinators (descendant, child, sibling), pseudo-classes and selector
/// lists are not supported; use [`Locator::of`] for nesting.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CssSelector {
    tag: Option<String>,
    classes: Vec<String>,
    attributes: Vec<AttrMatch>,
}

impl CssSelector {
    /// Parses a compound selector.
    ///
    /// Attribute values may be identifiers or quoted strings; a quoted value
    /// can hold any character, `]` included.
    pub fn parse(source: &str) -> ProbeResult<Self> {
        let invalid = |reason: &str| ProbeError::InvalidSelector {
            selector: source.to_string(),
            reason: reason.to_string(),
        };

        let mut input = ParserInput::new(source);
        let mut parser = Parser::new(&mut input);
        let mut selector = Self {
            tag: None,
            classes: Vec::new(),
            attributes: Vec::new(),
        };
        let mut leading = true;

        loop {
            let token = match parser.next_including_whitespace() {
                Ok(token) => token.clone(),
                Err(_) => break,
            };
            match token {
                Token::Ident(tag) if leading => selector.tag = Some(tag.to_ascii_lowercase()),
                Token::Delim('*') if leading => {}
                Token::Delim('*') => return Err(invalid("misplaced '*'")),
                Token::Delim('.') => match parser.next_including_whitespace() {
                    Ok(Token::Ident(class)) => selector.classes.push(class.to_string()),
                    _ => return Err(invalid("expected a class name after '.'")),
                },
                Token::SquareBracketBlock => {
                    let condition = parser
                        .parse_nested_block(parse_attr)
                        .map_err(|_: ParseError<'_, ()>| invalid("malformed attribute condition"))?;
                    selector.attributes.push(condition);
                }
                Token::WhiteSpace(_) => {
                    return Err(invalid("combinators are not supported, use Locator::of"));
                }
                other => return Err(invalid(&format!("unexpected token {other:?}"))),
            }
            leading = false;
        }

        if leading {
            return Err(invalid("empty selector"));
        }
        Ok(selector)
    }

    /// Whether `element` satisfies every condition
    #[must_use]
    pub fn matches(&self, element: &Element) -> bool {
        self.tag
            .as_ref()
            .map_or(true, |tag| element.tag.eq_ignore_ascii_case(tag))
            && self.classes.iter().all(|class| element.has_class(class))
            && self.attributes.iter().all(|condition| {
                match (element.attr(&condition.name), &condition.value) {
                    (Some(actual), Some(expected)) => actual == expected,
                    (Some(_), None) => true,
                    (None, _) => false,
                }
            })
    }
}

fn parse_attr<'i>(parser: &mut Parser<'i, '_>) -> Result<AttrMatch, ParseError<'i, ()>> {
    let name = parser.expect_ident()?.to_string();
    let value = if parser.try_parse(|p| p.expect_delim('=')).is_ok() {
        Some(parser.expect_ident_or_string()?.to_string())
    } else {
        None
    };
    parser.expect_exhausted()?;
    Ok(AttrMatch { name, value })
}

/// What a locator looks for
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selector {
    /// CSS compound selector, parsed on resolution
    Css(String),
    /// A specific node, e.g. a mounted widget root
    Node(NodeId),
}

impl Selector {
    /// Create a CSS selector
    #[must_use]
    pub fn css(selector: impl Into<String>) -> Self {
        Self::Css(selector.into())
    }
}

impl fmt::Display for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Css(css) => write!(f, "`{css}`"),
            Self::Node(id) => write!(f, "node {id}"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Pick {
    All,
    First,
    Nth(usize),
}

/// A locator for finding elements.
#[derive(Debug, Clone)]
pub struct Locator {
    selector: Selector,
    scope: Option<Box<Locator>>,
    text_filter: Option<String>,
    pick: Pick,
    strict: bool,
    description: Option<String>,
}

impl Locator {
    /// Create a new locator with a CSS selector
    #[must_use]
    pub fn new(selector: impl Into<String>) -> Self {
        Self::from_selector(Selector::Css(selector.into()))
    }

    /// Create a locator from a selector
    #[must_use]
    pub const fn from_selector(selector: Selector) -> Self {
        Self {
            selector,
            scope: None,
            text_filter: None,
            pick: Pick::All,
            strict: true,
            description: None,
        }
    }

    /// Locates exactly the given node
    #[must_use]
    pub const fn node(id: NodeId) -> Self {
        Self::from_selector(Selector::Node(id))
    }

    /// Restricts the search to descendants of whatever `parent` resolves to
    #[must_use]
    pub fn of(mut self, parent: &Locator) -> Self {
        self.scope = Some(Box::new(parent.clone()));
        self
    }

    /// Keeps only matches whose text content includes `fragment`
    #[must_use]
    pub fn where_text_includes(mut self, fragment: impl Into<String>) -> Self {
        self.text_filter = Some(fragment.into());
        self
    }

    /// Narrows to the first match
    #[must_use]
    pub const fn first(mut self) -> Self {
        self.pick = Pick::First;
        self
    }

    /// Narrows to the match at `index` (zero-based)
    #[must_use]
    pub const fn nth(mut self, index: usize) -> Self {
        self.pick = Pick::Nth(index);
        self
    }

    /// Disable strict mode (allow multiple matches)
    #[must_use]
    pub const fn with_strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    /// Human-readable name used in errors and task logs
    #[must_use]
    pub fn described_as(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Get the selector
    #[must_use]
    pub const fn selector(&self) -> &Selector {
        &self.selector
    }

    /// Whether resolution rejects multiple matches
    #[must_use]
    pub const fn is_strict(&self) -> bool {
        self.strict
    }

    /// The description, explicit or derived from the selector chain
    #[must_use]
    pub fn description(&self) -> String {
        if let Some(description) = &self.description {
            return description.clone();
        }
        let mut out = self.selector.to_string();
        if let Some(text) = &self.text_filter {
            out.push_str(&format!(" with text {text:?}"));
        }
        match self.pick {
            Pick::All => {}
            Pick::First => out.push_str(" (first)"),
            Pick::Nth(n) => out.push_str(&format!(" (#{n})")),
        }
        if let Some(scope) = &self.scope {
            out.push_str(" of ");
            out.push_str(&scope.description());
        }
        out
    }

    /// All matches in document order
    pub fn resolve_all(&self, doc: &Document) -> ProbeResult<Vec<NodeId>> {
        let scopes = match &self.scope {
            Some(scope) => scope.resolve_all(doc)?,
            None => vec![doc.body()],
        };
        let inside_scope = |id: NodeId| scopes.iter().any(|s| doc.contains(*s, id) && *s != id);

        let mut matches: Vec<NodeId> = match &self.selector {
            Selector::Node(id) => {
                let reachable = doc.is_attached(*id) && (self.scope.is_none() || inside_scope(*id));
                if reachable {
                    vec![*id]
                } else {
                    Vec::new()
                }
            }
            Selector::Css(css) => {
                let css = CssSelector::parse(css)?;
                let mut all = doc.descendants(doc.body());
                all.insert(0, doc.body());
                all.into_iter()
                    .filter(|id| self.scope.is_none() || inside_scope(*id))
                    .filter(|id| doc.element(*id).is_some_and(|e| css.matches(e)))
                    .collect()
            }
        };

        if let Some(fragment) = &self.text_filter {
            matches.retain(|id| doc.text_content(*id).contains(fragment.as_str()));
        }

        Ok(match self.pick {
            Pick::All => matches,
            Pick::First => matches.into_iter().take(1).collect(),
            Pick::Nth(n) => matches.into_iter().nth(n).into_iter().collect(),
        })
    }

    /// The single match.
    ///
    /// Zero matches is [`ProbeError::ElementNotFound`]; several matches on a
    /// strict locator is [`ProbeError::StrictModeViolation`].
    pub fn resolve(&self, doc: &Document) -> ProbeResult<NodeId> {
        let matches = self.resolve_all(doc)?;
        match matches.as_slice() {
            [] => Err(ProbeError::ElementNotFound {
                locator: self.description(),
            }),
            [only] => Ok(*only),
            [first, ..] if !self.strict => Ok(*first),
            _ => Err(ProbeError::StrictModeViolation {
                locator: self.description(),
                count: matches.len(),
            }),
        }
    }
}

impl fmt::Display for Locator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.description())
    }
}
