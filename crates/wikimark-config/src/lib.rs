use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use thiserror::Error;
use wikimark_engine::parsing::refs::MEATBALL_URL;
use wikimark_engine::{EditorOptions, Flavor, InterwikiMap, ParseOptions};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file at {config_path}: {source}")]
    ConfigReadError {
        config_path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse config file at {config_path}: {source}")]
    ConfigParseError {
        config_path: PathBuf,
        source: toml::de::Error,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    /// Column limit for reflowing quoted and listed text.
    pub line_length: usize,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            line_length: EditorOptions::default().line_length,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub flavor: Flavor,
    /// Prefix for internal page links, e.g. `#` or `/wiki/`.
    pub link_format: String,
    pub sections: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pages_path: Option<PathBuf>,
    /// Interwiki prefix to URL prefix.
    pub interwiki: BTreeMap<String, String>,
    pub editor: EditorConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            flavor: Flavor::default(),
            link_format: "#".to_string(),
            sections: false,
            pages_path: None,
            interwiki: BTreeMap::from([("MeatBall".to_string(), MEATBALL_URL.to_string())]),
            editor: EditorConfig::default(),
        }
    }
}

impl Config {
    pub fn load_from_path<P: AsRef<Path>>(config_path: P) -> Result<Option<Self>, ConfigError> {
        let config_path = config_path.as_ref();
        if !config_path.exists() {
            return Ok(None);
        }

        let content = std::fs::read_to_string(config_path).map_err(|source| {
            ConfigError::ConfigReadError {
                config_path: config_path.to_path_buf(),
                source,
            }
        })?;

        let mut config: Config =
            toml::from_str(&content).map_err(|source| ConfigError::ConfigParseError {
                config_path: config_path.to_path_buf(),
                source,
            })?;

        // Expand shell variables and tilde in the pages directory
        config.pages_path = config
            .pages_path
            .map(|path| Self::expand_path(&path).unwrap_or(path));

        Ok(Some(config))
    }

    pub fn load() -> Result<Option<Self>, ConfigError> {
        let config_path = Self::config_path();
        Self::load_from_path(&config_path)
    }

    pub fn save_to_path<P: AsRef<Path>>(&self, config_path: P) -> anyhow::Result<()> {
        let config_path = config_path.as_ref();
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(config_path, content)?;
        Ok(())
    }

    pub fn save(&self) -> anyhow::Result<()> {
        let config_path = Self::config_path();
        self.save_to_path(&config_path)
    }

    pub fn config_path() -> PathBuf {
        let config_dir = shellexpand::tilde("~/.config/wikimark");
        PathBuf::from(config_dir.as_ref()).join("config.toml")
    }

    pub fn parse_options(&self) -> ParseOptions {
        ParseOptions::new(self.flavor)
            .with_interwiki(self.interwiki.iter().collect::<InterwikiMap>())
            .with_link_format(self.link_format.as_str())
            .with_sections(self.sections)
    }

    pub fn editor_options(&self) -> EditorOptions {
        EditorOptions {
            line_length: self.editor.line_length,
            flavor: self.flavor,
        }
    }

    fn expand_path(path: &Path) -> Option<PathBuf> {
        let path_str = path.to_string_lossy();
        match shellexpand::full(&path_str) {
            Ok(expanded) => Some(PathBuf::from(expanded.as_ref())),
            Err(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::env;
    use tempfile::TempDir;

    #[test]
    fn test_config_path() {
        let config_path = Config::config_path();
        let path_str = config_path.to_string_lossy();

        assert!(!path_str.starts_with('~'));
        assert!(path_str.ends_with(".config/wikimark/config.toml"));
    }

    #[test]
    fn test_empty_file_gives_defaults() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.flavor, Flavor::Creole);
        assert_eq!(config.editor.line_length, 40);
        assert_eq!(config.interwiki["MeatBall"], MEATBALL_URL);
    }

    #[test]
    fn test_full_config_parses() {
        let config: Config = toml::from_str(
            r#"
flavor = "markdown"
link_format = "/wiki/"
sections = true

[interwiki]
Wikipedia = "https://en.wikipedia.org/wiki/"

[editor]
line_length = 72
"#,
        )
        .unwrap();

        assert_eq!(config.flavor, Flavor::Markdown);
        assert!(config.sections);
        assert_eq!(config.editor.line_length, 72);
        // A configured table replaces the stock one
        assert_eq!(config.interwiki.len(), 1);
        assert!(config.pages_path.is_none());
    }

    #[test]
    fn test_unknown_flavor_is_a_parse_error() {
        let temp_dir = TempDir::new().unwrap();
        let config_file = temp_dir.path().join("config.toml");
        std::fs::write(&config_file, "flavor = \"textile\"\n").unwrap();

        let err = Config::load_from_path(&config_file).unwrap_err();
        assert!(matches!(err, ConfigError::ConfigParseError { .. }));
        assert!(err.to_string().starts_with("Failed to parse config file"));
    }

    #[test]
    fn test_parse_options_carry_settings() {
        let mut config = Config {
            flavor: Flavor::Markdown,
            link_format: "/w/".to_string(),
            sections: true,
            ..Config::default()
        };
        config
            .interwiki
            .insert("Rust".to_string(), "https://doc.rust-lang.org/".to_string());

        let options = config.parse_options();
        assert_eq!(options.flavor, Flavor::Markdown);
        assert_eq!(options.link_format, "/w/");
        assert!(options.sections);
        assert_eq!(
            options.interwiki.expand("Rust:std").as_deref(),
            Some("https://doc.rust-lang.org/std")
        );
        assert_eq!(options.interwiki.len(), 2);
    }

    #[test]
    fn test_editor_options_follow_flavor() {
        let config = Config {
            flavor: Flavor::Markdown,
            editor: EditorConfig { line_length: 60 },
            ..Config::default()
        };
        assert_eq!(
            config.editor_options(),
            EditorOptions {
                line_length: 60,
                flavor: Flavor::Markdown
            }
        );
    }

    #[test]
    fn test_expand_path_with_env_var() {
        unsafe {
            env::set_var("WIKIMARK_TEST_VAR", "/test/env/path");
        }

        let path = PathBuf::from("$WIKIMARK_TEST_VAR/subdir");
        let expanded = Config::expand_path(&path).unwrap();
        assert_eq!(expanded, PathBuf::from("/test/env/path/subdir"));

        unsafe {
            env::remove_var("WIKIMARK_TEST_VAR");
        }
    }

    #[test]
    fn test_expand_path_with_relative_path() {
        let path = PathBuf::from("relative/path");
        assert_eq!(Config::expand_path(&path).unwrap(), path);
    }

    #[test]
    fn test_load_config_file_not_found() {
        let temp_dir = TempDir::new().unwrap();
        let non_existent_config = temp_dir.path().join("nonexistent.toml");

        let result = Config::load_from_path(&non_existent_config).unwrap();

        assert!(result.is_none());
    }

    #[test]
    fn test_save_and_load_config() {
        let temp_dir = TempDir::new().unwrap();
        let config_file = temp_dir.path().join("nested/config.toml");
        let test_config = Config {
            flavor: Flavor::Markdown,
            pages_path: Some(PathBuf::from("/tmp/test-pages")),
            ..Config::default()
        };

        test_config.save_to_path(&config_file).unwrap();
        let loaded_config = Config::load_from_path(&config_file).unwrap().unwrap();

        assert_eq!(loaded_config, test_config);
    }

    #[test]
    fn test_pages_path_with_tilde_is_expanded_on_load() {
        let temp_dir = TempDir::new().unwrap();
        let config_file = temp_dir.path().join("config.toml");
        std::fs::write(&config_file, "pages_path = \"~/wiki/pages\"\n").unwrap();

        let config = Config::load_from_path(&config_file).unwrap().unwrap();
        let pages = config.pages_path.unwrap();
        assert!(!pages.to_string_lossy().starts_with('~'));
        assert!(pages.to_string_lossy().ends_with("wiki/pages"));
    }
}
