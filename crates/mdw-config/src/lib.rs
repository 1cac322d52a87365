//! Configuration management for mdw.
//!
//! Parses `mdw.toml` configuration files with serde and provides
//! auto-discovery of config files in parent directories.
//!
//! CLI settings can be applied during load via [`CliSettings`].
//!
//! ## Environment Variable Expansion
//!
//! `${VAR}` in string values expands to the value of VAR and errors if it
//! is unset.
//!
//! Expanded fields:
//! - `content.source_dir`
//! - `sitemap.base_url`

mod expand;

use serde::Deserialize;
use std::path::{Path, PathBuf};

/// CLI settings that override configuration file values.
///
/// All fields are optional. Only non-None values override the loaded config.
#[derive(Debug, Default)]
pub struct CliSettings {
    /// Override content source directory.
    pub source_dir: Option<PathBuf>,
    /// Override custom metainf field acceptance.
    pub allow_custom_fields: Option<bool>,
    /// Override metainf delimiter style.
    pub metainf_delimiter: Option<MetaInfDelimiter>,
    /// Override sitemap base URL.
    pub base_url: Option<String>,
}

/// Configuration filename to search for.
const CONFIG_FILENAME: &str = "mdw.toml";

/// Application configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Content directory layout.
    pub content: ContentConfig,
    /// Sitemap generation.
    pub sitemap: SitemapConfig,

    /// Path to the config file (set after loading).
    #[serde(skip)]
    pub config_path: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self::default_with_base(Path::new("."))
    }
}

/// Delimiter style around a content file's metainf block.
#[derive(Clone, Copy, Debug, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum MetaInfDelimiter {
    /// `/*` ... `*/`
    #[default]
    Comment,
    /// ```` ```metainf ```` ... ```` ``` ````
    Fenced,
}

/// Content directory configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct ContentConfig {
    /// Source directory as written in the file (relative to the config file).
    #[serde(rename = "source_dir")]
    source_dir_raw: String,
    /// Resolved source directory (set after loading).
    #[serde(skip)]
    pub source_dir: PathBuf,
    /// Content file extensions, without the dot.
    pub extensions: Vec<String>,
    /// File stem of a navigation level's own page.
    pub index_name: String,
    /// Per-directory navigation metadata file.
    pub nav_metadata_file: String,
    /// Metainf delimiter style.
    pub metainf_delimiter: MetaInfDelimiter,
    /// Keep unknown metainf fields instead of failing the build.
    pub allow_custom_fields: bool,
    /// Number of HTML characters kept as a page abstract.
    pub abstract_length: usize,
    /// Root-level static assets directory, skipped by the scanner.
    pub assets_dir: String,
}

impl Default for ContentConfig {
    fn default() -> Self {
        Self {
            source_dir_raw: "content".to_owned(),
            source_dir: PathBuf::from("content"),
            extensions: vec!["md".to_owned()],
            index_name: "index".to_owned(),
            nav_metadata_file: "_navlevel.txt".to_owned(),
            metainf_delimiter: MetaInfDelimiter::Comment,
            allow_custom_fields: false,
            abstract_length: 100,
            assets_dir: "assets".to_owned(),
        }
    }
}

/// Sitemap configuration.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct SitemapConfig {
    /// Absolute site URL that page paths are appended to.
    pub base_url: Option<String>,
}

/// Configuration error.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// File not found.
    #[error("Configuration file not found: {}", .0.display())]
    NotFound(PathBuf),
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// TOML parsing error.
    #[error("TOML parse error: {0}")]
    Parse(#[from] toml::de::Error),
    /// Validation error.
    #[error("Configuration error: {0}")]
    Validation(String),
    /// Environment variable error during expansion.
    #[error("Environment variable error in {field}: {message}")]
    EnvVar {
        /// Config field path (e.g., "`sitemap.base_url`").
        field: String,
        /// Error message (e.g., "${`SITE_URL`} not set").
        message: String,
    },
}

/// Require a string field to be non-empty.
fn require_non_empty(value: &str, field: &str) -> Result<(), ConfigError> {
    if value.is_empty() {
        return Err(ConfigError::Validation(format!("{field} cannot be empty")));
    }
    Ok(())
}

/// Require a URL field to use http:// or https:// scheme.
fn require_http_url(url: &str, field: &str) -> Result<(), ConfigError> {
    if !url.starts_with("http://") && !url.starts_with("https://") {
        return Err(ConfigError::Validation(format!(
            "{field} must start with http:// or https://"
        )));
    }
    Ok(())
}

impl Config {
    /// Load configuration from file with optional CLI settings.
    ///
    /// If `config_path` is provided, loads from that file.
    /// Otherwise, searches for `mdw.toml` in current directory and parents.
    ///
    /// CLI settings are applied after loading and path resolution, allowing CLI
    /// arguments to take precedence over config file values.
    ///
    /// # Errors
    ///
    /// Returns error if explicit `config_path` doesn't exist, parsing fails,
    /// or the result does not validate.
    pub fn load(
        config_path: Option<&Path>,
        cli_settings: Option<&CliSettings>,
    ) -> Result<Self, ConfigError> {
        let mut config = if let Some(path) = config_path {
            if !path.exists() {
                return Err(ConfigError::NotFound(path.to_path_buf()));
            }
            Self::load_from_file(path)?
        } else if let Some(discovered) = Self::discover_config() {
            Self::load_from_file(&discovered)?
        } else {
            Self::default_with_cwd()
        };

        if let Some(settings) = cli_settings {
            config.apply_cli_settings(settings);
            config.validate()?;
        }

        Ok(config)
    }

    /// Apply CLI settings to the configuration.
    fn apply_cli_settings(&mut self, settings: &CliSettings) {
        if let Some(source_dir) = &settings.source_dir {
            self.content.source_dir.clone_from(source_dir);
        }
        if let Some(allow) = settings.allow_custom_fields {
            self.content.allow_custom_fields = allow;
        }
        if let Some(delimiter) = settings.metainf_delimiter {
            self.content.metainf_delimiter = delimiter;
        }
        if let Some(base_url) = &settings.base_url {
            self.sitemap.base_url = Some(base_url.clone());
        }
    }

    /// Get the validated sitemap base URL.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Validation` if no base URL is configured.
    pub fn require_base_url(&self) -> Result<&str, ConfigError> {
        self.sitemap.base_url.as_deref().ok_or_else(|| {
            ConfigError::Validation("sitemap.base_url required for sitemap generation".into())
        })
    }

    /// Search for config file in current directory and parents.
    fn discover_config() -> Option<PathBuf> {
        let current = std::env::current_dir().ok()?;
        Self::discover_from(&current)
    }

    /// Search for config file in `start` and its parents.
    fn discover_from(start: &Path) -> Option<PathBuf> {
        start
            .ancestors()
            .map(|dir| dir.join(CONFIG_FILENAME))
            .find(|candidate| candidate.is_file())
    }

    /// Create default config with paths relative to current working directory.
    fn default_with_cwd() -> Self {
        let cwd = std::env::current_dir().unwrap_or_default();
        Self::default_with_base(&cwd)
    }

    /// Create default config with paths relative to given base directory.
    fn default_with_base(base: &Path) -> Self {
        let mut content = ContentConfig::default();
        content.source_dir = base.join(&content.source_dir_raw);
        Self {
            content,
            sitemap: SitemapConfig::default(),
            config_path: None,
        }
    }

    /// Load configuration from a specific file.
    fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let mut config: Self = toml::from_str(&content)?;

        // Expand environment variables before path resolution
        config.expand_env_vars()?;

        let config_dir = path.parent().unwrap_or(Path::new("."));
        config.resolve_paths(config_dir);
        config.config_path = Some(path.to_path_buf());

        // Validate configuration after loading and resolution
        config.validate()?;

        Ok(config)
    }

    /// Validate configuration values.
    ///
    /// Called automatically after loading from file and after applying
    /// CLI settings.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Validation` if any validation fails.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.validate_content()?;
        self.validate_sitemap()?;
        Ok(())
    }

    /// Validate content configuration.
    fn validate_content(&self) -> Result<(), ConfigError> {
        let content = &self.content;

        if content.extensions.is_empty() {
            return Err(ConfigError::Validation(
                "content.extensions cannot be empty".to_owned(),
            ));
        }
        for ext in &content.extensions {
            require_non_empty(ext, "content.extensions")?;
            if ext.starts_with('.') {
                return Err(ConfigError::Validation(format!(
                    "content.extensions entry '{ext}' must not start with a dot"
                )));
            }
        }

        require_non_empty(&content.index_name, "content.index_name")?;
        require_non_empty(&content.nav_metadata_file, "content.nav_metadata_file")?;
        require_non_empty(&content.assets_dir, "content.assets_dir")?;

        if content.abstract_length == 0 {
            return Err(ConfigError::Validation(
                "content.abstract_length must be greater than 0".to_owned(),
            ));
        }

        Ok(())
    }

    /// Validate sitemap configuration.
    fn validate_sitemap(&self) -> Result<(), ConfigError> {
        // Only validate base_url if set (sitemap generation enabled)
        if let Some(ref base_url) = self.sitemap.base_url {
            require_non_empty(base_url, "sitemap.base_url")?;
            require_http_url(base_url, "sitemap.base_url")?;
        }
        Ok(())
    }

    /// Expand environment variable references in configuration strings.
    fn expand_env_vars(&mut self) -> Result<(), ConfigError> {
        self.content.source_dir_raw =
            expand::expand_env(&self.content.source_dir_raw, "content.source_dir")?;

        if let Some(ref url) = self.sitemap.base_url {
            self.sitemap.base_url = Some(expand::expand_env(url, "sitemap.base_url")?);
        }

        Ok(())
    }

    /// Resolve relative paths to absolute paths based on config directory.
    fn resolve_paths(&mut self, config_dir: &Path) {
        self.content.source_dir = config_dir.join(&self.content.source_dir_raw);
    }
}
