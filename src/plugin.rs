//! Plugin entry point and host contract
//!
//! A host utility framework exposes three capabilities to the plugin:
//! registering static utilities, registering a matchable utility family, and
//! reading theme values. [`AnimateCssPlugin::register`] drives them in three
//! phases:
//!
//! 1. `source/_vars.css` as static utilities
//! 2. `source/_base.css` as static utilities under the prefix
//! 3. every animation file as the matchable family `{prefix}-{name}`

use indexmap::IndexMap;
use std::fmt;

use crate::animations::build_animation_table;
use crate::config::PluginConfig;
use crate::declarations::DeclarationBlock;
use crate::error::PluginError;
use crate::source::{AnimateSource, BASE_PATH, VARS_PATH};

/// Turns a looked-up value into the declarations generated for it
pub type UtilityFactory = Box<dyn Fn(&DeclarationBlock) -> DeclarationBlock>;

/// A parametrized utility family: `{name}-{value}` generates
/// `factory(values[value])`
pub struct MatchUtilities {
    pub name: String,
    pub factory: UtilityFactory,
    pub values: IndexMap<String, DeclarationBlock>,
}

impl MatchUtilities {
    pub fn new(
        name: impl Into<String>,
        factory: impl Fn(&DeclarationBlock) -> DeclarationBlock + 'static,
        values: IndexMap<String, DeclarationBlock>,
    ) -> Self {
        Self { name: name.into(), factory: Box::new(factory), values }
    }

    /// Declarations generated for `value`, if it is a known value
    pub fn generate(&self, value: &str) -> Option<DeclarationBlock> {
        self.values.get(value).map(|block| (self.factory)(block))
    }
}

impl fmt::Debug for MatchUtilities {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MatchUtilities")
            .field("name", &self.name)
            .field("values", &self.values.keys().collect::<Vec<_>>())
            .finish_non_exhaustive()
    }
}

/// Registration capabilities a host framework provides
pub trait PluginApi {
    /// Merge static utility rules into the generated stylesheet
    fn add_utilities(&mut self, utilities: DeclarationBlock);

    /// Register a matchable utility family
    fn match_utilities(&mut self, utilities: MatchUtilities);

    /// Resolve a dotted theme path (`"animatecss.prefix"`)
    fn theme(&self, path: &str) -> Option<String>;
}

/// Registers animate.css with a host
#[derive(Debug, Clone)]
pub struct AnimateCssPlugin {
    source: AnimateSource,
}

impl AnimateCssPlugin {
    pub fn new(source: AnimateSource) -> Self {
        Self { source }
    }

    pub fn source(&self) -> &AnimateSource {
        &self.source
    }

    /// Run all registration phases against `api`.
    ///
    /// The prefix is read from the theme once, before any file is loaded.
    /// The first failing phase aborts registration.
    pub fn register(&self, api: &mut dyn PluginApi) -> Result<PluginConfig, PluginError> {
        let config = PluginConfig::from_theme(|path| api.theme(path));
        tracing::debug!(prefix = %config.prefix, root = %self.source.root().display(), "registering animate.css");

        self.process_vars(api, &config)?;
        self.process_utilities(api, &config)?;
        self.process_animations(api, &config)?;
        Ok(config)
    }

    /// Custom properties from `_vars.css`
    fn process_vars(&self, api: &mut dyn PluginApi, config: &PluginConfig) -> Result<(), PluginError> {
        let rules = self.source.load_styles(VARS_PATH, &config.rewriter(true))?;
        api.add_utilities(rules);
        Ok(())
    }

    /// Generic utilities (`infinite`, `repeat-1`, `delay-1s`, ...) from `_base.css`
    fn process_utilities(
        &self,
        api: &mut dyn PluginApi,
        config: &PluginConfig,
    ) -> Result<(), PluginError> {
        let rules = self.source.load_styles(BASE_PATH, &config.rewriter(true))?;
        api.add_utilities(rules);
        Ok(())
    }

    /// Keyframes and animation rules, matched as `{prefix}-{name}`
    fn process_animations(
        &self,
        api: &mut dyn PluginApi,
        config: &PluginConfig,
    ) -> Result<(), PluginError> {
        let table = build_animation_table(&self.source, config)?;
        tracing::debug!(animations = table.len(), "registering animation family");
        api.match_utilities(MatchUtilities::new(
            config.prefix.clone(),
            |rules: &DeclarationBlock| rules.clone(),
            table.into_values(),
        ));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[derive(Default)]
    struct RecordingApi {
        prefix: Option<String>,
        utilities: Vec<DeclarationBlock>,
        families: Vec<MatchUtilities>,
    }

    impl PluginApi for RecordingApi {
        fn add_utilities(&mut self, utilities: DeclarationBlock) {
            self.utilities.push(utilities);
        }

        fn match_utilities(&mut self, utilities: MatchUtilities) {
            self.families.push(utilities);
        }

        fn theme(&self, path: &str) -> Option<String> {
            assert!(self.utilities.is_empty(), "theme read after registration started");
            assert_eq!(path, "animatecss.prefix");
            self.prefix.clone()
        }
    }

    fn package() -> TempDir {
        let temp = TempDir::new().unwrap();
        let source = temp.path().join("source");
        fs::create_dir_all(source.join("fading_entrances")).unwrap();
        fs::write(source.join("_vars.css"), ":root { --animate-duration: 1s; }").unwrap();
        fs::write(
            source.join("_base.css"),
            ".animated { animation-fill-mode: both; }\n.animated.fast { animation-duration: calc(var(--animate-duration) * 0.8); }",
        )
        .unwrap();
        fs::write(
            source.join("fading_entrances/fadeIn.css"),
            "@keyframes fadeIn { from { opacity: 0; } to { opacity: 1; } }\n.fadeIn { animation-name: fadeIn; }",
        )
        .unwrap();
        temp
    }

    #[test]
    fn test_register_phases_in_order() {
        let temp = package();
        let plugin = AnimateCssPlugin::new(AnimateSource::new(temp.path()));
        let mut api = RecordingApi::default();

        let config = plugin.register(&mut api).unwrap();
        assert_eq!(config.prefix, "animatecss");

        assert_eq!(api.utilities.len(), 2);
        assert_eq!(api.utilities[0].keys().collect::<Vec<_>>(), vec![":root"]);
        assert_eq!(api.utilities[1].keys().collect::<Vec<_>>(), vec![".animatecss", ".animatecss-fast"]);

        assert_eq!(api.families.len(), 1);
        let family = &api.families[0];
        assert_eq!(family.name, "animatecss");
        let fade_in = family.generate("fadeIn").unwrap();
        assert_eq!(fade_in.value("animation-name"), Some("fadeIn"));
        assert!(family.generate("bounce").is_none());
    }

    #[test]
    fn test_register_uses_theme_prefix() {
        let temp = package();
        let plugin = AnimateCssPlugin::new(AnimateSource::new(temp.path()));
        let mut api = RecordingApi { prefix: Some("fx".to_string()), ..Default::default() };

        plugin.register(&mut api).unwrap();
        assert_eq!(api.utilities[1].keys().collect::<Vec<_>>(), vec![".fx", ".fx-fast"]);
        assert_eq!(api.families[0].name, "fx");
    }

    #[test]
    fn test_register_aborts_on_missing_file() {
        let temp = package();
        fs::remove_file(temp.path().join("source/_base.css")).unwrap();
        let plugin = AnimateCssPlugin::new(AnimateSource::new(temp.path()));
        let mut api = RecordingApi::default();

        let err = plugin.register(&mut api).unwrap_err();
        assert!(matches!(err, PluginError::Io { .. }));
        assert_eq!(api.utilities.len(), 1);
        assert!(api.families.is_empty());
    }
}
