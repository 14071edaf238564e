//! Access to the animate.css package sources
//!
//! All paths are relative to the package root, the directory holding
//! `package.json` and `source/`:
//!
//! ```text
//! animate.css/
//!   source/
//!     _vars.css                 custom properties
//!     _base.css                 generic utilities
//!     attention_seekers/
//!       bounce.css              @keyframes bounce + .bounce
//!       ...
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use crate::declarations::DeclarationBlock;
use crate::error::PluginError;
use crate::selector::SelectorRewriter;
use crate::stylesheet::Stylesheet;

/// Custom property declarations
pub const VARS_PATH: &str = "source/_vars.css";
/// Generic (non-animation) utilities
pub const BASE_PATH: &str = "source/_base.css";
/// Directory whose subdirectories hold one CSS file per animation
pub const ANIMATIONS_DIR: &str = "source";

const PACKAGE_NAME: &str = "animate.css";

/// An installed animate.css package
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnimateSource {
    root: PathBuf,
}

impl AnimateSource {
    /// Use `root` as the package root
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Locate the package under `node_modules`, walking up from `start`
    pub fn discover(start: &Path) -> Result<Self, PluginError> {
        find_package_root(start)
            .map(Self::new)
            .ok_or_else(|| PluginError::PackageNotFound(start.to_path_buf()))
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Absolute path of a package-relative path
    pub fn resolve_path(&self, path: &str) -> PathBuf {
        if path.is_empty() {
            self.root.clone()
        } else {
            self.root.join(path)
        }
    }

    /// Names of the immediate subdirectories of `path`.
    ///
    /// Order is whatever the filesystem reports.
    pub fn dirs_in_dir(&self, path: &str) -> Result<Vec<String>, PluginError> {
        self.entries_in_dir(path, |entry_path| entry_path.is_dir())
    }

    /// Names of the immediate `.css` files of `path`.
    ///
    /// Order is whatever the filesystem reports.
    pub fn css_files_in_dir(&self, path: &str) -> Result<Vec<String>, PluginError> {
        self.entries_in_dir(path, |entry_path| {
            entry_path.is_file() && entry_path.extension().and_then(|e| e.to_str()) == Some("css")
        })
    }

    fn entries_in_dir(
        &self,
        path: &str,
        keep: impl Fn(&Path) -> bool,
    ) -> Result<Vec<String>, PluginError> {
        let dir = self.resolve_path(path);
        let entries = fs::read_dir(&dir).map_err(|e| PluginError::io(&dir, e))?;

        let mut names = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| PluginError::io(&dir, e))?;
            let entry_path = entry.path();
            if keep(&entry_path) {
                names.push(entry.file_name().to_string_lossy().into_owned());
            }
        }
        Ok(names)
    }

    /// Read, parse and rewrite a stylesheet, returning its declaration block
    pub fn load_styles(
        &self,
        path: &str,
        rewriter: &SelectorRewriter,
    ) -> Result<DeclarationBlock, PluginError> {
        let file = self.resolve_path(path);
        let css = fs::read_to_string(&file).map_err(|e| PluginError::io(&file, e))?;
        let mut sheet =
            Stylesheet::parse(&css).map_err(|source| PluginError::Parse { path: file.clone(), source })?;

        sheet.walk_rules_mut(|rule| {
            rule.selector = rewriter.rewrite(&rule.selector)?;
            Ok::<(), PluginError>(())
        })?;

        tracing::debug!(
            path = %file.display(),
            use_prefix = rewriter.use_prefix(),
            "loaded stylesheet"
        );
        Ok(sheet.to_declarations())
    }
}

/// Find an installed animate.css package by walking up from `start`.
///
/// Looks for `node_modules/animate.css/package.json` in `start` and each of
/// its ancestors and returns the directory holding that `package.json`.
pub fn find_package_root(start: &Path) -> Option<PathBuf> {
    start
        .ancestors()
        .map(|dir| dir.join("node_modules").join(PACKAGE_NAME))
        .find(|candidate| candidate.join("package.json").is_file())
}
