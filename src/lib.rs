//! animatecss - animate.css as utility classes
//!
//! This library provides functionality to:
//! - Parse the animate.css source stylesheets into nested declaration blocks
//! - Rewrite the `animated` base class into a configurable prefix
//! - Register variables, generic utilities and a lookup table of animations
//!   with a host utility framework ([`PluginApi`])
//! - Generate CSS for class candidates through the reference host
//!   ([`UtilityRegistry`])

pub mod animations;
pub mod cli;
pub mod config;
pub mod declarations;
pub mod error;
pub mod host;
pub mod output;
pub mod plugin;
pub mod selector;
pub mod source;
pub mod stylesheet;

pub use animations::{build_animation_table, Animation, AnimationTable};
pub use config::PluginConfig;
pub use declarations::{DeclarationBlock, Node};
pub use error::PluginError;
pub use host::UtilityRegistry;
pub use plugin::{AnimateCssPlugin, MatchUtilities, PluginApi};
pub use selector::SelectorRewriter;
pub use source::AnimateSource;
