use anyhow::{Context, Result};
use figment::{
    Figment,
    providers::{Env, Format, Json, Serialized, Toml, Yaml},
};
use serde::Serialize;

use super::settings::Settings;
use super::smart_load;

// Embed the default config at compile time
const DEFAULT_CONFIG: &str = include_str!("../../default-config.toml");

pub struct UnlatchConfig {
    figment: Figment,
}

impl UnlatchConfig {
    /// Built-in defaults only, ignoring files and environment
    pub fn defaults() -> Self {
        Self {
            figment: Figment::new().merge(Toml::string(DEFAULT_CONFIG)),
        }
    }

    pub fn load<T: Serialize>(custom_config: Option<&str>, cli_overrides: Option<T>) -> Result<Self> {
        tracing::trace!("CONFIG LOAD: Starting");

        let mut figment = Figment::new().merge(Toml::string(DEFAULT_CONFIG)); // Embedded defaults

        // If custom config is specified, use only that + defaults + env vars
        if let Some(custom_path) = custom_config {
            tracing::debug!("CONFIG LOAD: Using custom config {custom_path}");
            figment = figment.merge(smart_load::auto(custom_path));
        } else {
            // Standard priority: user config -> project config
            figment = figment
                .merge(smart_load::auto(Self::user_config_path()))
                .merge(Toml::file("unlatch.toml"))
                .merge(Json::file("unlatch.json"))
                .merge(Yaml::file("unlatch.yaml"))
                .merge(Yaml::file("unlatch.yml"));
        }

        // UNLATCH_SEARCH__WORKERS=4 -> search.workers
        figment = figment.merge(Env::prefixed("UNLATCH_").split("__"));

        if let Some(overrides) = cli_overrides {
            tracing::trace!("CONFIG LOAD: Applying CLI overrides");
            figment = figment.merge(Serialized::defaults(overrides));
        }

        Ok(UnlatchConfig { figment })
    }

    /// Extract the typed settings used by the engine
    pub fn settings(&self) -> Result<Settings> {
        self.figment
            .extract()
            .context("Failed to parse unlatch configuration")
    }

    /// Get a nested object/section as JSON
    pub fn get_section(&self, path: &str) -> Result<serde_json::Value> {
        Ok(self.figment.extract_inner(path)?)
    }

    /// Get the full merged configuration as a structured value
    pub fn get_full_config(&self) -> Result<serde_json::Value> {
        Ok(self.figment.extract()?)
    }

    fn user_config_path() -> String {
        match std::env::var("HOME") {
            Ok(home) => format!("{home}/.config/unlatch/config.toml"),
            Err(_) => "~/.config/unlatch/config.toml".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ExecutionMode;
    use crate::search::TriedPolicy;
    use std::io::Write;

    #[test]
    fn test_config_loading() {
        let config = UnlatchConfig::load(None, None::<&()>);
        assert!(config.is_ok(), "Should load default config successfully");
    }

    #[test]
    fn test_config_loads_defaults() {
        let settings = UnlatchConfig::defaults().settings().expect("Should parse defaults");

        assert_eq!(settings.search.length, 6);
        assert_eq!(settings.search.workers, 0);
        assert_eq!(settings.search.mode, ExecutionMode::Auto);
        assert_eq!(settings.search.tried_policy, TriedPolicy::SequentialOnly);
        assert_eq!(settings.progress.parallel_interval, 100_000);
        assert_eq!(settings.progress.sequential_interval, 1_000);
        assert_eq!(settings.output.password_file.to_str(), Some("password.txt"));
        assert!(settings.stages.is_empty());
    }

    #[test]
    fn test_config_sections() {
        let config = UnlatchConfig::defaults();

        let search = config.get_section("search").unwrap();
        assert_eq!(search.get("chunk_size").and_then(|v| v.as_u64()), Some(512));
        assert!(config.get_full_config().unwrap().get("progress").is_some());
    }

    #[test]
    fn test_custom_config_file_overrides_defaults() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(
            file,
            r#"
[search]
length = 4
tried_policy = "all-stages"

[[stages]]
name = "pin"
segments = [{{ alphabet = "digits", length = 4 }}]
sequential = true
record_tried = true
"#
        )
        .unwrap();

        let path = file.path().to_str().unwrap().to_string();
        let settings = UnlatchConfig::load(Some(&path), None::<&()>)
            .unwrap()
            .settings()
            .unwrap();

        assert_eq!(settings.search.length, 4);
        assert_eq!(settings.search.tried_policy, TriedPolicy::AllStages);
        // Untouched keys keep their defaults
        assert_eq!(settings.search.chunk_size, 512);
        assert_eq!(settings.stages.len(), 1);
        assert!(settings.stages[0].record_tried);
    }

    #[test]
    fn test_cli_overrides_take_priority() {
        let overrides = serde_json::json!({ "search": { "workers": 3, "length": 2 } });
        let settings = UnlatchConfig::load(Some("non_existent.toml"), Some(overrides))
            .unwrap()
            .settings()
            .unwrap();

        assert_eq!(settings.search.workers, 3);
        assert_eq!(settings.search.length, 2);
    }

    #[test]
    fn test_custom_config_loading() {
        // Test with non-existent custom config (should fallback to defaults)
        let config = UnlatchConfig::load(Some("non_existent.toml"), None::<&()>);
        assert!(config.is_ok(), "Should handle missing custom config gracefully");
    }
}
