//! Selector rewriting
//!
//! animate.css attaches everything to one shared base class (`.animated`)
//! and combines it with modifier classes through compound selectors such as
//! `.animated.infinite` or `.animated.flip`. Utility frameworks key generated
//! CSS by a single class, so each class of a selector is rewritten as follows
//! (first match wins):
//!
//! 1. the whole selector list is exactly `.animated` → `.{prefix}`
//! 2. the class is `animated` → removed from its compound
//! 3. prefixing enabled → `.{prefix}-{class}`
//! 4. otherwise → unchanged
//!
//! ```
//! use animatecss::selector::SelectorRewriter;
//!
//! let utilities = SelectorRewriter::new("animatecss", true);
//! assert_eq!(utilities.rewrite(".animated").unwrap(), ".animatecss");
//! assert_eq!(utilities.rewrite(".animated.infinite").unwrap(), ".animatecss-infinite");
//!
//! let animations = SelectorRewriter::new("animatecss", false);
//! assert_eq!(animations.rewrite(".animated.flip").unwrap(), ".flip");
//! ```

use cssparser::{serialize_identifier, ParseError, Parser, ParserInput, Token};
use std::fmt;

use crate::error::PluginError;

/// Class animate.css uses as its shared base
pub const BASE_CLASS: &str = "animated";

/// One piece of a tokenized selector list
#[derive(Debug, Clone, PartialEq, Eq)]
enum Component {
    /// `.name`, stored unescaped
    Class(String),
    /// Top-level `,` separating selectors of a list
    Comma,
    /// Whitespace, which is a descendant combinator between compounds
    Space,
    /// Anything else, kept as written (`:root`, `[class*='Out']`, `50%`, `>`)
    Raw(String),
}

/// A selector list split into classes and opaque pieces.
///
/// Only classes are ever edited; every other piece keeps its source text.
/// Arguments of functional pseudo-classes (`:not(.a)`) are opaque.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectorList {
    components: Vec<Component>,
}

impl SelectorList {
    pub fn parse(selector: &str) -> Result<Self, PluginError> {
        let mut input = ParserInput::new(selector);
        let mut parser = Parser::new(&mut input);
        tokenize(&mut parser).map_err(|error| PluginError::Selector {
            selector: selector.to_string(),
            message: format!("{:?}", error.kind),
        })
    }

    /// Unescaped names of every class in the list, in source order
    pub fn class_names(&self) -> impl Iterator<Item = &str> {
        self.components.iter().filter_map(|component| match component {
            Component::Class(name) => Some(name.as_str()),
            _ => None,
        })
    }

    pub fn has_class(&self, name: &str) -> bool {
        self.class_names().any(|class| class == name)
    }

    /// True when the list is a single selector made of one class
    fn is_single_class(&self, name: &str) -> bool {
        let mut significant = self.components.iter().filter(|c| **c != Component::Space);
        matches!(
            (significant.next(), significant.next()),
            (Some(Component::Class(class)), None) if class == name
        )
    }
}

fn tokenize<'i>(parser: &mut Parser<'i, '_>) -> Result<SelectorList, ParseError<'i, ()>> {
    let mut components = Vec::new();
    loop {
        let start = parser.position();
        let token = match parser.next_including_whitespace() {
            Ok(token) => token.clone(),
            Err(_) => break,
        };

        let component = match token {
            Token::WhiteSpace(_) => Component::Space,
            Token::Comma => Component::Comma,
            Token::Delim('.') => {
                let state = parser.state();
                let class = match parser.next_including_whitespace() {
                    Ok(Token::Ident(name)) => Some(String::from(&**name)),
                    _ => None,
                };
                match class {
                    Some(name) => Component::Class(name),
                    None => {
                        parser.reset(&state);
                        Component::Raw(parser.slice_from(start).to_string())
                    }
                }
            }
            Token::Function(_)
            | Token::ParenthesisBlock
            | Token::SquareBracketBlock
            | Token::CurlyBracketBlock => {
                parser.parse_nested_block(|nested| {
                    while nested.next_including_whitespace().is_ok() {}
                    Ok::<(), ParseError<'i, ()>>(())
                })?;
                Component::Raw(parser.slice_from(start).to_string())
            }
            _ => Component::Raw(parser.slice_from(start).to_string()),
        };
        components.push(component);
    }
    Ok(SelectorList { components })
}

impl fmt::Display for SelectorList {
    /// Writes the list with normalized whitespace: selectors are joined by
    /// `", "`, runs of whitespace collapse to one space and empty selectors
    /// (left behind by removed classes) are skipped.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut wrote_selector = false;
        for selector in self.components.split(|c| *c == Component::Comma) {
            let mut text = String::new();
            let mut pending_space = false;
            for component in selector {
                match component {
                    Component::Space => pending_space = !text.is_empty(),
                    Component::Class(name) => {
                        if pending_space {
                            text.push(' ');
                            pending_space = false;
                        }
                        text.push('.');
                        serialize_identifier(name, &mut text)?;
                    }
                    Component::Raw(raw) => {
                        if pending_space {
                            text.push(' ');
                            pending_space = false;
                        }
                        text.push_str(raw);
                    }
                    Component::Comma => unreachable!("split on commas"),
                }
            }
            if text.is_empty() {
                continue;
            }
            if wrote_selector {
                f.write_str(", ")?;
            }
            f.write_str(&text)?;
            wrote_selector = true;
        }
        Ok(())
    }
}

/// Rewrites animate.css selectors under a class-name prefix
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectorRewriter {
    base: String,
    prefix: String,
    use_prefix: bool,
}

impl SelectorRewriter {
    pub fn new(prefix: impl Into<String>, use_prefix: bool) -> Self {
        Self { base: BASE_CLASS.to_string(), prefix: prefix.into(), use_prefix }
    }

    /// Use a base class other than `animated`
    pub fn with_base(mut self, base: impl Into<String>) -> Self {
        self.base = base.into();
        self
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    pub fn use_prefix(&self) -> bool {
        self.use_prefix
    }

    /// Rewrite every class of a selector list
    pub fn rewrite(&self, selector: &str) -> Result<String, PluginError> {
        let mut list = SelectorList::parse(selector)?;
        self.rewrite_list(&mut list);
        Ok(list.to_string())
    }

    pub fn rewrite_list(&self, list: &mut SelectorList) {
        if list.is_single_class(&self.base) {
            for component in &mut list.components {
                if let Component::Class(name) = component {
                    *name = self.prefix.clone();
                }
            }
            return;
        }

        let base = &self.base;
        list.components.retain(|c| !matches!(c, Component::Class(name) if name == base));

        if self.use_prefix {
            for component in &mut list.components {
                if let Component::Class(name) = component {
                    *name = format!("{}-{}", self.prefix, name);
                }
            }
        }
    }
}
