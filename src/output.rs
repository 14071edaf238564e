//! Stylesheet output

use lightningcss::stylesheet::{ParserOptions, PrinterOptions, StyleSheet};
use std::fs;
use std::path::Path;

use crate::declarations::DeclarationBlock;
use crate::error::PluginError;

/// Render a generated stylesheet as CSS text.
///
/// With `minify`, the text is re-printed by lightningcss in minified form.
pub fn render_css(sheet: &DeclarationBlock, minify: bool) -> Result<String, PluginError> {
    let css = sheet.to_css();
    if minify {
        minify_css(&css)
    } else {
        Ok(css)
    }
}

/// Minify CSS text with lightningcss
pub fn minify_css(css: &str) -> Result<String, PluginError> {
    let stylesheet = StyleSheet::parse(css, ParserOptions::default())?;
    let printed = stylesheet.to_css(PrinterOptions { minify: true, ..PrinterOptions::default() })?;
    Ok(printed.code)
}

/// Write CSS to `path`, creating parent directories as needed.
pub fn write_css(css: &str, path: &Path) -> Result<(), PluginError> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).map_err(|e| PluginError::io(parent, e))?;
        }
    }
    fs::write(path, css).map_err(|e| PluginError::io(path, e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stylesheet::Stylesheet;
    use tempfile::TempDir;

    fn sheet() -> DeclarationBlock {
        Stylesheet::parse(
            ".animatecss-fast {\n  animation-duration: calc(var(--animate-duration) * 0.8);\n}\n@keyframes flash { from, 50%, to { opacity: 1; } 25%, 75% { opacity: 0; } }",
        )
        .unwrap()
        .to_declarations()
    }

    #[test]
    fn test_render_pretty() {
        let css = render_css(&sheet(), false).unwrap();
        assert!(css.contains("  animation-duration: calc(var(--animate-duration) * 0.8);\n"));
        assert!(css.contains("@keyframes flash {\n  from, 50%, to {\n    opacity: 1;\n  }\n"));
    }

    #[test]
    fn test_render_minified() {
        let css = render_css(&sheet(), true).unwrap();
        assert!(!css.contains('\n'));
        assert!(css.contains(".animatecss-fast{"));
        assert!(css.contains("@keyframes flash"));
    }

    #[test]
    fn test_write_css_creates_parents() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("dist/css/animate.css");

        write_css(".a{}", &path).unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), ".a{}");
    }
}
