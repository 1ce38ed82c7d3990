use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::info;

/// Built-in configuration with the `newsletter` and `radar` presets.
/// Checked for syntax and required theme fields by `build.rs`.
static DEFAULT_CONFIG: &str = include_str!("default_config.toml");

/// Characters that would let a theme value escape its CSS declaration.
const CSS_FORBIDDEN: &[char] = &[';', '{', '}', '<', '>', '"'];

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub render: RenderConfig,
    #[serde(default)]
    pub themes: BTreeMap<String, Theme>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    /// HTML-escape text taken from the source before emitting it.
    pub escape_text: bool,
    /// Name of the theme used when none is given explicitly.
    pub theme: String,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            escape_text: false,
            theme: "newsletter".to_string(),
        }
    }
}

/// Visual parameters substituted into the document template.
///
/// Text fields are inserted as-is and must already be valid HTML.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Theme {
    pub title: String,
    #[serde(default)]
    pub subtitle: String,
    pub accent: String,
    /// Solid header color, also the fallback for clients without gradients.
    pub header_color: String,
    #[serde(default)]
    pub header_gradient: Option<String>,
    #[serde(default)]
    pub footer: String,
}

impl Theme {
    /// Background used by the header: the gradient if any, else the solid color.
    pub fn header_background(&self) -> &str {
        self.header_gradient.as_deref().unwrap_or(&self.header_color)
    }

    /// Check that required fields are set and CSS values are safe to inline.
    pub fn validate(&self, name: &str) -> Result<(), ConfigError> {
        require_non_empty(&self.title, &format!("themes.{name}.title"))?;
        require_css_value(&self.accent, &format!("themes.{name}.accent"))?;
        require_css_value(&self.header_color, &format!("themes.{name}.header_color"))?;
        if let Some(gradient) = &self.header_gradient {
            require_css_value(gradient, &format!("themes.{name}.header_gradient"))?;
        }
        Ok(())
    }
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
    /// Requested theme is not defined.
    #[error("Unknown theme: {0}")]
    UnknownTheme(String),
}

fn require_non_empty(value: &str, field: &str) -> Result<(), ConfigError> {
    if value.trim().is_empty() {
        return Err(ConfigError::Validation(format!("{field} cannot be empty")));
    }
    Ok(())
}

fn require_css_value(value: &str, field: &str) -> Result<(), ConfigError> {
    require_non_empty(value, field)?;
    if value.contains(CSS_FORBIDDEN) || value.chars().any(char::is_control) {
        return Err(ConfigError::Validation(format!(
            "{field} contains characters not allowed in a CSS value"
        )));
    }
    Ok(())
}

impl Config {
    /// The configuration compiled into the binary.
    pub fn compiled_default() -> Self {
        toml::from_str(DEFAULT_CONFIG).expect("default_config.toml is checked by build.rs")
    }

    /// Parse a TOML document and layer it over the compiled defaults.
    ///
    /// Themes are merged by name, the `[render]` table replaces the default one.
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        let file: Config = toml::from_str(content)?;

        let mut config = Self::compiled_default();
        config.render = file.render;
        config.themes.extend(file.themes);
        config.validate()?;
        Ok(config)
    }

    /// Load config from a TOML file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Err(ConfigError::NotFound(path.to_path_buf()));
        }
        let content = fs::read_to_string(path)?;
        let config = Self::parse(&content)?;
        info!(
            path = %path.display(),
            themes = config.themes.len(),
            "loaded configuration"
        );
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        for (name, theme) in &self.themes {
            theme.validate(name)?;
        }
        self.default_theme().map(|_| ())
    }

    /// Look up a theme by name.
    pub fn theme(&self, name: &str) -> Result<&Theme, ConfigError> {
        self.themes
            .get(name)
            .ok_or_else(|| ConfigError::UnknownTheme(name.to_string()))
    }

    /// The theme named by `render.theme`.
    pub fn default_theme(&self) -> Result<&Theme, ConfigError> {
        self.theme(&self.render.theme)
    }
}
