//! CSS source parsing
//!
//! Parses a stylesheet into a small syntax tree of rules, at-rules and
//! declarations using `cssparser` for tokenizing. Preludes and values are
//! kept exactly as written (trimmed), so `calc(var(--animate-duration) * 0.8)`
//! comes out the way animate.css spells it.
//!
//! Nested bodies accept both declarations and rules, which covers `@media`
//! blocks, `@keyframes` stops and nested style rules alike.

use cssparser::{
    parse_important, AtRuleParser, CowRcStr, DeclarationParser, ParseError, Parser, ParserInput,
    ParserState, QualifiedRuleParser, RuleBodyItemParser, RuleBodyParser, StyleSheetParser,
};
use thiserror::Error;

use crate::declarations::DeclarationBlock;

/// Error raised for CSS that cannot be parsed
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message} at line {line}, column {column}")]
pub struct CssError {
    pub message: String,
    /// 1-based line number
    pub line: u32,
    /// 1-based column number
    pub column: u32,
}

impl CssError {
    fn from_parse_error(error: &ParseError<'_, ()>) -> Self {
        Self {
            message: format!("{:?}", error.kind),
            line: error.location.line + 1,
            column: error.location.column,
        }
    }
}

/// A node of the parsed syntax tree
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CssNode {
    Rule(Rule),
    AtRule(AtRule),
    Declaration(Declaration),
}

/// A style rule (`selector { ... }`), including keyframe stops
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rule {
    pub selector: String,
    pub nodes: Vec<CssNode>,
}

/// An at-rule. `nodes` is `None` for statements such as `@import`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AtRule {
    pub name: String,
    pub params: String,
    pub nodes: Option<Vec<CssNode>>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Declaration {
    pub property: String,
    pub value: String,
    pub important: bool,
}

impl Declaration {
    /// Value as it appears in a declaration block, `!important` included
    pub fn block_value(&self) -> String {
        if self.important {
            format!("{} !important", self.value)
        } else {
            self.value.clone()
        }
    }
}

/// A parsed stylesheet
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Stylesheet {
    pub nodes: Vec<CssNode>,
}

impl Stylesheet {
    /// Parse CSS text. The first malformed rule aborts parsing.
    pub fn parse(css: &str) -> Result<Self, CssError> {
        let mut input = ParserInput::new(css);
        let mut parser = Parser::new(&mut input);
        let mut node_parser = NodeParser;

        let mut nodes = Vec::new();
        for result in StyleSheetParser::new(&mut parser, &mut node_parser) {
            match result {
                Ok(node) => nodes.push(node),
                Err((error, _)) => return Err(CssError::from_parse_error(&error)),
            }
        }
        Ok(Self { nodes })
    }

    /// Visit every style rule, nested ones included, in source order.
    /// Stops at the first error returned by `visit`.
    pub fn walk_rules_mut<E>(
        &mut self,
        mut visit: impl FnMut(&mut Rule) -> Result<(), E>,
    ) -> Result<(), E> {
        walk_nodes(&mut self.nodes, &mut visit)
    }

    /// Flatten the tree into a nested declaration block.
    ///
    /// Rules are keyed by selector and at-rules by `@name params`. Entries
    /// sharing a key are merged, later declarations winning.
    pub fn to_declarations(&self) -> DeclarationBlock {
        objectify(&self.nodes)
    }
}

fn walk_nodes<E>(
    nodes: &mut [CssNode],
    visit: &mut impl FnMut(&mut Rule) -> Result<(), E>,
) -> Result<(), E> {
    for node in nodes {
        match node {
            CssNode::Rule(rule) => {
                visit(rule)?;
                walk_nodes(&mut rule.nodes, visit)?;
            }
            CssNode::AtRule(AtRule { nodes: Some(children), .. }) => walk_nodes(children, visit)?,
            _ => {}
        }
    }
    Ok(())
}

fn objectify(nodes: &[CssNode]) -> DeclarationBlock {
    let mut block = DeclarationBlock::new();
    for node in nodes {
        match node {
            CssNode::Declaration(decl) => block.push_declaration(&decl.property, decl.block_value()),
            CssNode::Rule(rule) => block.merge_block(&rule.selector, objectify(&rule.nodes)),
            CssNode::AtRule(at_rule) => {
                let key = if at_rule.params.is_empty() {
                    format!("@{}", at_rule.name)
                } else {
                    format!("@{} {}", at_rule.name, at_rule.params)
                };
                match &at_rule.nodes {
                    Some(children) => block.merge_block(key, objectify(children)),
                    None => {
                        block.insert(format!("@{}", at_rule.name), at_rule.params.clone());
                    }
                }
            }
        }
    }
    block
}

/// Consume every remaining token of `input`
fn consume_all<'i>(input: &mut Parser<'i, '_>) -> Result<(), ParseError<'i, ()>> {
    while input.next().is_ok() {}
    Ok(())
}

/// Raw text of everything left in `input`, trimmed
fn raw_text<'i>(input: &mut Parser<'i, '_>) -> Result<String, ParseError<'i, ()>> {
    let start = input.position();
    consume_all(input)?;
    Ok(input.slice_from(start).trim().to_string())
}

fn parse_body<'i>(input: &mut Parser<'i, '_>) -> Result<Vec<CssNode>, ParseError<'i, ()>> {
    let mut node_parser = NodeParser;
    let mut nodes = Vec::new();
    for result in RuleBodyParser::new(input, &mut node_parser) {
        nodes.push(result.map_err(|(error, _)| error)?);
    }
    Ok(nodes)
}

struct NodeParser;

impl<'i> QualifiedRuleParser<'i> for NodeParser {
    type Prelude = String;
    type QualifiedRule = CssNode;
    type Error = ();

    fn parse_prelude<'t>(
        &mut self,
        input: &mut Parser<'i, 't>,
    ) -> Result<Self::Prelude, ParseError<'i, Self::Error>> {
        raw_text(input)
    }

    fn parse_block<'t>(
        &mut self,
        selector: Self::Prelude,
        _start: &ParserState,
        input: &mut Parser<'i, 't>,
    ) -> Result<Self::QualifiedRule, ParseError<'i, Self::Error>> {
        let nodes = parse_body(input)?;
        Ok(CssNode::Rule(Rule { selector, nodes }))
    }
}

impl<'i> AtRuleParser<'i> for NodeParser {
    type Prelude = (String, String);
    type AtRule = CssNode;
    type Error = ();

    fn parse_prelude<'t>(
        &mut self,
        name: CowRcStr<'i>,
        input: &mut Parser<'i, 't>,
    ) -> Result<Self::Prelude, ParseError<'i, Self::Error>> {
        Ok(((*name).to_owned(), raw_text(input)?))
    }

    fn rule_without_block(
        &mut self,
        (name, params): Self::Prelude,
        _start: &ParserState,
    ) -> Result<Self::AtRule, ()> {
        Ok(CssNode::AtRule(AtRule { name, params, nodes: None }))
    }

    fn parse_block<'t>(
        &mut self,
        (name, params): Self::Prelude,
        _start: &ParserState,
        input: &mut Parser<'i, 't>,
    ) -> Result<Self::AtRule, ParseError<'i, Self::Error>> {
        let nodes = parse_body(input)?;
        Ok(CssNode::AtRule(AtRule { name, params, nodes: Some(nodes) }))
    }
}

impl<'i> DeclarationParser<'i> for NodeParser {
    type Declaration = CssNode;
    type Error = ();

    fn parse_value<'t>(
        &mut self,
        name: CowRcStr<'i>,
        input: &mut Parser<'i, 't>,
        _declaration_start: &ParserState,
    ) -> Result<Self::Declaration, ParseError<'i, Self::Error>> {
        let start = input.position();
        let mut important_at = None;
        loop {
            let before = input.position();
            if input.try_parse(|i| parse_important(i).and_then(|_| i.expect_exhausted())).is_ok() {
                important_at = Some(before);
                break;
            }
            if input.next().is_err() {
                break;
            }
        }

        let value = match important_at {
            Some(end) => input.slice(start..end),
            None => input.slice_from(start),
        };
        Ok(CssNode::Declaration(Declaration {
            property: (*name).to_owned(),
            value: value.trim().to_string(),
            important: important_at.is_some(),
        }))
    }
}

impl<'i> RuleBodyItemParser<'i, CssNode, ()> for NodeParser {
    fn parse_declarations(&self) -> bool {
        true
    }

    fn parse_qualified(&self) -> bool {
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_rule_with_declarations() {
        let sheet = Stylesheet::parse(".fast { animation-duration: calc(var(--animate-duration) * 0.8); }")
            .unwrap();

        assert_eq!(
            sheet.nodes,
            vec![CssNode::Rule(Rule {
                selector: ".fast".to_string(),
                nodes: vec![CssNode::Declaration(Declaration {
                    property: "animation-duration".to_string(),
                    value: "calc(var(--animate-duration) * 0.8)".to_string(),
                    important: false,
                })],
            })]
        );
    }

    #[test]
    fn test_parse_important() {
        let sheet = Stylesheet::parse(".a { animation-duration: 1ms !important; opacity: 0 }").unwrap();
        let block = sheet.to_declarations();
        let rule = block.block(".a").unwrap();

        assert_eq!(rule.value("animation-duration"), Some("1ms !important"));
        assert_eq!(rule.value("opacity"), Some("0"));
    }

    #[test]
    fn test_parse_custom_properties() {
        let css = ":root {\n  --animate-duration: 1s;\n  --animate-delay: 1s;\n  --animate-repeat: 1;\n}\n";
        let block = Stylesheet::parse(css).unwrap().to_declarations();
        let root = block.block(":root").unwrap();

        assert_eq!(root.len(), 3);
        assert_eq!(root.value("--animate-duration"), Some("1s"));
        assert_eq!(root.value("--animate-repeat"), Some("1"));
    }

    #[test]
    fn test_parse_media_block() {
        let css = r#"
@media print, (prefers-reduced-motion: reduce) {
  .animated {
    transition-duration: 1ms !important;
  }

  .animated[class*='Out'] {
    opacity: 0;
  }
}
"#;
        let block = Stylesheet::parse(css).unwrap().to_declarations();
        let media = block.block("@media print, (prefers-reduced-motion: reduce)").unwrap();

        assert_eq!(media.keys().collect::<Vec<_>>(), vec![".animated", ".animated[class*='Out']"]);
    }

    #[test]
    fn test_parse_keyframes() {
        let css = r#"
@keyframes flash {
  from,
  50%,
  to {
    opacity: 1;
  }

  25%,
  75% {
    opacity: 0;
  }
}

.flash {
  animation-name: flash;
}
"#;
        let sheet = Stylesheet::parse(css).unwrap();
        assert_eq!(sheet.nodes.len(), 2);

        let CssNode::AtRule(keyframes) = &sheet.nodes[0] else {
            panic!("expected at-rule, got {:?}", sheet.nodes[0]);
        };
        assert_eq!(keyframes.name, "keyframes");
        assert_eq!(keyframes.params, "flash");

        let stops = keyframes.nodes.as_ref().unwrap();
        assert_eq!(stops.len(), 2);
        let CssNode::Rule(first) = &stops[0] else {
            panic!("expected keyframe rule");
        };
        assert!(first.selector.starts_with("from,"));
        assert!(first.selector.ends_with("to"));
    }

    #[test]
    fn test_parse_statement_at_rule() {
        let block = Stylesheet::parse("@import '_vars.css';").unwrap().to_declarations();
        assert_eq!(block.value("@import"), Some("'_vars.css'"));
    }

    #[test]
    fn test_repeated_selector_merges() {
        let css = ".a { color: red; margin: 0 } .a { color: blue }";
        let block = Stylesheet::parse(css).unwrap().to_declarations();
        let rule = block.block(".a").unwrap();

        assert_eq!(rule.value("color"), Some("blue"));
        assert_eq!(rule.value("margin"), Some("0"));
    }

    #[test]
    fn test_walk_rules_visits_nested() {
        let css = "@media print { .a { opacity: 0 } } @keyframes k { from { opacity: 0 } } .b { }";
        let mut sheet = Stylesheet::parse(css).unwrap();
        let mut seen = Vec::new();
        sheet
            .walk_rules_mut(|rule| {
                seen.push(rule.selector.clone());
                Ok::<(), ()>(())
            })
            .unwrap();

        assert_eq!(seen, vec![".a", "from", ".b"]);
    }

    #[test]
    fn test_malformed_declaration_is_error() {
        let err = Stylesheet::parse(".a { opacity 1; }").unwrap_err();
        assert_eq!(err.line, 1);
    }
}
