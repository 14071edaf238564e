//! Reference utility host
//!
//! [`UtilityRegistry`] implements [`PluginApi`] and generates CSS for class
//! candidates the way a utility-first framework does:
//!
//! - top-level rules without a class (`:root`) are always emitted
//! - a static rule is emitted when its selector contains the candidate class,
//!   wrapped in the at-rules it was nested in
//! - a candidate `{family}-{value}` emits the family's declarations for that
//!   value; `@keyframes` are hoisted to the top level and plain declarations
//!   form the candidate's own rule

use cssparser::serialize_identifier;
use indexmap::IndexSet;

use crate::config::{lookup_path, ProjectConfig};
use crate::declarations::{DeclarationBlock, Node};
use crate::error::PluginError;
use crate::plugin::{MatchUtilities, PluginApi};
use crate::selector::SelectorList;

/// Collects registered utilities and generates stylesheets from them
#[derive(Debug, Default)]
pub struct UtilityRegistry {
    theme: toml::Table,
    utilities: Vec<DeclarationBlock>,
    families: Vec<MatchUtilities>,
}

impl UtilityRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry whose theme lookups resolve against `theme`
    pub fn with_theme(theme: toml::Table) -> Self {
        Self { theme, ..Self::default() }
    }

    /// Registry using the `[theme]` section of a project config
    pub fn from_config(config: &ProjectConfig) -> Self {
        Self::with_theme(config.theme.clone())
    }

    pub fn utilities(&self) -> &[DeclarationBlock] {
        &self.utilities
    }

    pub fn families(&self) -> &[MatchUtilities] {
        &self.families
    }

    /// Every class name this registry can generate CSS for: classes of
    /// static rules first, then `{family}-{value}` for each family value.
    pub fn candidates(&self) -> Result<Vec<String>, PluginError> {
        let mut names = IndexSet::new();
        for block in &self.utilities {
            collect_classes(block, &mut names)?;
        }
        for family in &self.families {
            for value in family.values.keys() {
                names.insert(format!("{}-{}", family.name, value));
            }
        }
        Ok(names.into_iter().collect())
    }

    /// Generate the stylesheet for the given class candidates.
    ///
    /// Unknown candidates produce nothing. Each candidate is processed once,
    /// in the order given.
    pub fn generate<S: AsRef<str>>(&self, candidates: &[S]) -> Result<DeclarationBlock, PluginError> {
        let mut out = DeclarationBlock::new();

        for block in &self.utilities {
            for (key, node) in block.iter() {
                if let Node::Block(rule) = node {
                    if !key.starts_with('@') && SelectorList::parse(key)?.class_names().next().is_none() {
                        out.merge_block(key, rule.clone());
                    }
                }
            }
        }

        let unique: IndexSet<&str> = candidates.iter().map(|candidate| candidate.as_ref()).collect();
        for candidate in unique {
            let mut matched = false;
            for block in &self.utilities {
                matched |= collect_matching(block, candidate, &mut out)?;
            }
            for family in &self.families {
                if let Some(generated) = family_value(family, candidate) {
                    place_generated(generated, candidate, &mut out);
                    matched = true;
                }
            }
            if !matched {
                tracing::debug!(candidate, "no utility matches candidate");
            }
        }

        Ok(out)
    }
}

impl PluginApi for UtilityRegistry {
    fn add_utilities(&mut self, utilities: DeclarationBlock) {
        self.utilities.push(utilities);
    }

    fn match_utilities(&mut self, utilities: MatchUtilities) {
        self.families.push(utilities);
    }

    fn theme(&self, path: &str) -> Option<String> {
        match lookup_path(&self.theme, path)? {
            toml::Value::String(s) => Some(s.clone()),
            toml::Value::Integer(i) => Some(i.to_string()),
            toml::Value::Float(f) => Some(f.to_string()),
            toml::Value::Boolean(b) => Some(b.to_string()),
            _ => None,
        }
    }
}

fn collect_classes(block: &DeclarationBlock, names: &mut IndexSet<String>) -> Result<(), PluginError> {
    for (key, node) in block.iter() {
        let Node::Block(inner) = node else {
            continue;
        };
        if key.starts_with('@') {
            collect_classes(inner, names)?;
        } else {
            names.extend(SelectorList::parse(key)?.class_names().map(str::to_string));
        }
    }
    Ok(())
}

/// Copy every rule of `block` whose selector contains `candidate`, keeping
/// at-rule nesting. Returns whether anything matched.
fn collect_matching(
    block: &DeclarationBlock,
    candidate: &str,
    out: &mut DeclarationBlock,
) -> Result<bool, PluginError> {
    let mut matched = false;
    for (key, node) in block.iter() {
        let Node::Block(inner) = node else {
            continue;
        };
        if key.starts_with('@') {
            let mut nested = DeclarationBlock::new();
            if collect_matching(inner, candidate, &mut nested)? {
                out.merge_block(key, nested);
                matched = true;
            }
        } else if SelectorList::parse(key)?.has_class(candidate) {
            out.merge_block(key, inner.clone());
            matched = true;
        }
    }
    Ok(matched)
}

fn family_value(family: &MatchUtilities, candidate: &str) -> Option<DeclarationBlock> {
    let value = candidate.strip_prefix(family.name.as_str())?.strip_prefix('-')?;
    family.generate(value)
}

fn place_generated(generated: DeclarationBlock, candidate: &str, out: &mut DeclarationBlock) {
    let mut selector = String::from(".");
    // Writing into a String cannot fail
    let _ = serialize_identifier(candidate, &mut selector);

    let mut rule = DeclarationBlock::new();
    for (key, node) in generated {
        match node {
            Node::Block(block) if is_keyframes(&key) => out.merge_block(key, block),
            Node::Block(block) if key.starts_with('@') => {
                let mut wrapped = DeclarationBlock::new();
                wrapped.merge_block(selector.clone(), block);
                out.merge_block(key, wrapped);
            }
            Node::Block(_) => {}
            value => {
                rule.insert(key, value);
            }
        }
    }
    if !rule.is_empty() {
        out.merge_block(selector, rule);
    }
}

fn is_keyframes(key: &str) -> bool {
    key.strip_prefix('@')
        .map(|rest| rest.split_whitespace().next().unwrap_or_default())
        .is_some_and(|name| name == "keyframes" || name.ends_with("-keyframes"))
}
