//! Nested declaration blocks
//!
//! A [`DeclarationBlock`] is the key/value form a stylesheet is flattened into
//! before it is handed to a host:
//!
//! ```text
//! :root                                  -> { --animate-duration: 1s, ... }
//! @media print, (prefers-reduced-motion) -> { .animatecss -> { ... } }
//! animation-name                         -> flash
//! ```
//!
//! Keys are selectors, at-rule headers (`@name params`) or property names.
//! Entries keep insertion order; overlaying an existing key keeps its
//! position and replaces its value.

use indexmap::map::Entry;
use indexmap::IndexMap;
use serde::Serialize;
use std::fmt::Write as _;

/// A single entry value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum Node {
    /// A declaration value, `!important` included as a suffix
    Value(String),
    /// A property declared more than once in the same rule
    Values(Vec<String>),
    /// A nested rule or at-rule body
    Block(DeclarationBlock),
}

impl Node {
    pub fn as_value(&self) -> Option<&str> {
        match self {
            Node::Value(value) => Some(value),
            _ => None,
        }
    }

    pub fn as_block(&self) -> Option<&DeclarationBlock> {
        match self {
            Node::Block(block) => Some(block),
            _ => None,
        }
    }
}

impl From<&str> for Node {
    fn from(value: &str) -> Self {
        Node::Value(value.to_string())
    }
}

impl From<String> for Node {
    fn from(value: String) -> Self {
        Node::Value(value)
    }
}

impl From<DeclarationBlock> for Node {
    fn from(block: DeclarationBlock) -> Self {
        Node::Block(block)
    }
}

/// Ordered mapping of keys to values or nested blocks
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct DeclarationBlock {
    entries: IndexMap<String, Node>,
}

impl DeclarationBlock {
    pub fn new() -> Self {
        Self { entries: IndexMap::new() }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, key: &str) -> Option<&Node> {
        self.entries.get(key)
    }

    /// Get the nested block stored under `key`, if that entry is a block
    pub fn block(&self, key: &str) -> Option<&DeclarationBlock> {
        self.get(key).and_then(Node::as_block)
    }

    /// Get the plain value stored under `key`, if that entry is a value
    pub fn value(&self, key: &str) -> Option<&str> {
        self.get(key).and_then(Node::as_value)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Node)> {
        self.entries.iter().map(|(key, node)| (key.as_str(), node))
    }

    /// Insert or replace an entry. A replaced entry keeps its position.
    pub fn insert(&mut self, key: impl Into<String>, node: impl Into<Node>) -> Option<Node> {
        self.entries.insert(key.into(), node.into())
    }

    /// Remove an entry, preserving the order of the remaining ones
    pub fn remove(&mut self, key: &str) -> Option<Node> {
        self.entries.shift_remove(key)
    }

    /// Record a declaration. Repeating a property collects its values into
    /// [`Node::Values`] instead of dropping the earlier one.
    pub fn push_declaration(&mut self, property: impl Into<String>, value: impl Into<String>) {
        let value = value.into();
        match self.entries.entry(property.into()) {
            Entry::Vacant(slot) => {
                slot.insert(Node::Value(value));
            }
            Entry::Occupied(mut slot) => {
                let merged = match slot.get_mut() {
                    Node::Values(values) => {
                        values.push(value);
                        return;
                    }
                    Node::Value(first) => Node::Values(vec![std::mem::take(first), value]),
                    Node::Block(_) => Node::Value(value),
                };
                slot.insert(merged);
            }
        }
    }

    /// Merge a nested block under `key`. When `key` already holds a block
    /// the new entries are overlaid onto it, otherwise the block is inserted.
    pub fn merge_block(&mut self, key: impl Into<String>, block: DeclarationBlock) {
        match self.entries.entry(key.into()) {
            Entry::Occupied(mut slot) => match slot.get_mut() {
                Node::Block(existing) => existing.overlay(block),
                other => *other = Node::Block(block),
            },
            Entry::Vacant(slot) => {
                slot.insert(Node::Block(block));
            }
        }
    }

    /// Shallow overlay: every entry of `other` replaces (or is appended to)
    /// the entries of `self`.
    pub fn overlay(&mut self, other: DeclarationBlock) {
        for (key, node) in other.entries {
            self.entries.insert(key, node);
        }
    }

    /// Render the block as CSS text.
    ///
    /// Top-level blocks become rules; plain values become declarations.
    /// A blockless at-rule (`@import`) is stored as a value and rendered
    /// as a statement.
    pub fn to_css(&self) -> String {
        let mut out = String::new();
        self.write_css(&mut out, 0);
        out
    }

    fn write_css(&self, out: &mut String, depth: usize) {
        let indent = "  ".repeat(depth);
        for (index, (key, node)) in self.entries.iter().enumerate() {
            match node {
                Node::Value(value) if key.starts_with('@') => {
                    if value.is_empty() {
                        let _ = writeln!(out, "{}{};", indent, key);
                    } else {
                        let _ = writeln!(out, "{}{} {};", indent, key, value);
                    }
                }
                Node::Value(value) => {
                    let _ = writeln!(out, "{}{}: {};", indent, key, value);
                }
                Node::Values(values) => {
                    for value in values {
                        let _ = writeln!(out, "{}{}: {};", indent, key, value);
                    }
                }
                Node::Block(block) => {
                    if depth == 0 && index > 0 {
                        out.push('\n');
                    }
                    let _ = writeln!(out, "{}{} {{", indent, key);
                    block.write_css(out, depth + 1);
                    let _ = writeln!(out, "{}}}", indent);
                }
            }
        }
    }
}

impl<K: Into<String>, V: Into<Node>> FromIterator<(K, V)> for DeclarationBlock {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut block = DeclarationBlock::new();
        for (key, node) in iter {
            block.insert(key, node);
        }
        block
    }
}

impl IntoIterator for DeclarationBlock {
    type Item = (String, Node);
    type IntoIter = indexmap::map::IntoIter<String, Node>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rule(decls: &[(&str, &str)]) -> DeclarationBlock {
        decls.iter().map(|(k, v)| (*k, *v)).collect()
    }

    #[test]
    fn test_insert_keeps_position_on_replace() {
        let mut block = rule(&[("a", "1"), ("b", "2"), ("c", "3")]);
        block.insert("a", "9");

        assert_eq!(block.keys().collect::<Vec<_>>(), vec!["a", "b", "c"]);
        assert_eq!(block.value("a"), Some("9"));
    }

    #[test]
    fn test_remove_preserves_order() {
        let mut block = rule(&[("a", "1"), ("b", "2"), ("c", "3")]);
        assert_eq!(block.remove("b"), Some(Node::from("2")));
        assert_eq!(block.keys().collect::<Vec<_>>(), vec!["a", "c"]);
        assert_eq!(block.remove("missing"), None);
    }

    #[test]
    fn test_overlay_replaces_and_appends() {
        let mut base = rule(&[("opacity", "0"), ("color", "red")]);
        base.overlay(rule(&[("opacity", "1"), ("animation-name", "fadeIn")]));

        assert_eq!(base.keys().collect::<Vec<_>>(), vec!["opacity", "color", "animation-name"]);
        assert_eq!(base.value("opacity"), Some("1"));
    }

    #[test]
    fn test_push_declaration_collects_repeats() {
        let mut block = DeclarationBlock::new();
        block.push_declaration("display", "-webkit-box");
        block.push_declaration("display", "flex");
        block.push_declaration("display", "grid");

        assert_eq!(
            block.get("display"),
            Some(&Node::Values(vec![
                "-webkit-box".to_string(),
                "flex".to_string(),
                "grid".to_string()
            ]))
        );
    }

    #[test]
    fn test_merge_block_overlays_existing() {
        let mut sheet = DeclarationBlock::new();
        sheet.merge_block(".a", rule(&[("color", "red"), ("margin", "0")]));
        sheet.merge_block(".a", rule(&[("color", "blue")]));

        let merged = sheet.block(".a").unwrap();
        assert_eq!(merged.value("color"), Some("blue"));
        assert_eq!(merged.value("margin"), Some("0"));
    }

    #[test]
    fn test_to_css_nested() {
        let mut sheet = DeclarationBlock::new();
        sheet.merge_block(":root", rule(&[("--animate-duration", "1s")]));
        let mut media = DeclarationBlock::new();
        media.merge_block(".x", rule(&[("animation-duration", "1ms !important")]));
        sheet.merge_block("@media print", media);

        assert_eq!(
            sheet.to_css(),
            ":root {\n  --animate-duration: 1s;\n}\n\n@media print {\n  .x {\n    animation-duration: 1ms !important;\n  }\n}\n"
        );
    }

    #[test]
    fn test_to_css_statement_at_rule() {
        let mut sheet = DeclarationBlock::new();
        sheet.insert("@import", "url(a.css)");
        assert_eq!(sheet.to_css(), "@import url(a.css);\n");
    }

    #[test]
    fn test_serialize_json() {
        let mut sheet = DeclarationBlock::new();
        sheet.merge_block(".flash", rule(&[("animation-name", "flash")]));
        let json = serde_json::to_string(&sheet).unwrap();
        assert_eq!(json, r#"{".flash":{"animation-name":"flash"}}"#);
    }
}
