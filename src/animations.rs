//! Animation lookup table
//!
//! Every animation ships as its own file holding a keyframes block and one
//! rule named after the animation:
//!
//! ```css
//! @keyframes flash { from, 50%, to { opacity: 1; } 25%, 75% { opacity: 0; } }
//! .flash { animation-name: flash; }
//! ```
//!
//! The table maps `flash` to the file's keyframes plus the declarations of
//! `.flash`, hoisted out of their selector:
//!
//! ```text
//! flash -> { @keyframes flash -> {...}, animation-name -> flash }
//! ```

use indexmap::IndexMap;
use std::path::Path;

use crate::config::PluginConfig;
use crate::declarations::{DeclarationBlock, Node};
use crate::error::PluginError;
use crate::source::{AnimateSource, ANIMATIONS_DIR};

/// A single animation file, loaded without the class-name prefix
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Animation {
    /// File stem, e.g. `bounce`
    pub name: String,
    /// Directory the file was found in, e.g. `attention_seekers`
    pub group: String,
    pub rules: DeclarationBlock,
}

impl Animation {
    /// Selector of the rule that names this animation
    pub fn rule_selector(&self) -> String {
        format!(".{}", self.name)
    }

    /// Fold the animation's own rule into the top level.
    ///
    /// The declarations under `.{name}` are overlaid onto the file's block
    /// and the `.{name}` entry is dropped. A file without that rule yields
    /// its keyframes alone.
    pub fn combine_keyframes_and_rule(&self) -> DeclarationBlock {
        let selector = self.rule_selector();
        let mut combined = self.rules.clone();
        if let Some(Node::Block(rule)) = self.rules.get(&selector) {
            combined.overlay(rule.clone());
        }
        combined.remove(&selector);
        combined
    }
}

/// Animation name → merged declaration block
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AnimationTable {
    entries: IndexMap<String, DeclarationBlock>,
}

impl AnimationTable {
    /// Build the table from loaded animations, in order. A later animation
    /// with an already-seen name replaces the earlier entry.
    pub fn from_animations(animations: &[Animation]) -> Self {
        let mut entries = IndexMap::new();
        for animation in animations {
            if entries.insert(animation.name.clone(), animation.combine_keyframes_and_rule()).is_some()
            {
                tracing::warn!(
                    name = %animation.name,
                    group = %animation.group,
                    "duplicate animation name, replacing earlier definition"
                );
            }
        }
        Self { entries }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, name: &str) -> Option<&DeclarationBlock> {
        self.entries.get(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn into_values(self) -> IndexMap<String, DeclarationBlock> {
        self.entries
    }
}

/// Load every animation under `source/`.
///
/// Directories and files are visited in name order so the result does not
/// depend on filesystem listing order.
pub fn collect_animations(
    source: &AnimateSource,
    config: &PluginConfig,
) -> Result<Vec<Animation>, PluginError> {
    let rewriter = config.rewriter(false);
    let mut groups = source.dirs_in_dir(ANIMATIONS_DIR)?;
    groups.sort();

    let mut animations = Vec::new();
    for group in groups {
        let base_path = format!("{}/{}", ANIMATIONS_DIR, group);
        let mut files = source.css_files_in_dir(&base_path)?;
        files.sort();

        for filename in files {
            let name = Path::new(&filename)
                .file_stem()
                .map(|stem| stem.to_string_lossy().into_owned())
                .unwrap_or_else(|| filename.clone());
            let rules = source.load_styles(&format!("{}/{}", base_path, filename), &rewriter)?;
            animations.push(Animation { name, group: group.clone(), rules });
        }
    }

    tracing::debug!(count = animations.len(), "collected animations");
    Ok(animations)
}

/// Load every animation and build the lookup table
pub fn build_animation_table(
    source: &AnimateSource,
    config: &PluginConfig,
) -> Result<AnimationTable, PluginError> {
    let animations = collect_animations(source, config)?;
    Ok(AnimationTable::from_animations(&animations))
}
