use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::VigilError;

/// Top-level configuration loaded from `.vigil.toml`.
///
/// Every field is optional in the file; anything left unset falls back to
/// environment variables and then to defaults, so a bare GitHub Actions
/// invocation needs no config file at all.
///
/// # Examples
///
/// ```
/// use vigil::VigilConfig;
///
/// let config = VigilConfig::default();
/// assert_eq!(config.llm.model, "gpt-4o-mini");
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct VigilConfig {
    /// LLM provider settings.
    #[serde(default)]
    pub llm: LlmConfig,
    /// GitHub API settings.
    #[serde(default)]
    pub github: GithubConfig,
}

impl VigilConfig {
    /// Load configuration from a TOML file at `path`.
    ///
    /// # Errors
    ///
    /// Returns [`VigilError::Io`] if the file cannot be read, or
    /// [`VigilError::Toml`] if the content is not valid TOML.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use vigil::VigilConfig;
    /// use std::path::Path;
    ///
    /// let config = VigilConfig::from_file(Path::new(".vigil.toml")).unwrap();
    /// ```
    pub fn from_file(path: &Path) -> Result<Self, VigilError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    /// Parse configuration from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns [`VigilError::Toml`] if parsing fails.
    ///
    /// # Examples
    ///
    /// ```
    /// use vigil::VigilConfig;
    ///
    /// let toml = r#"
    /// [llm]
    /// model = "gpt-4o"
    /// "#;
    /// let config = VigilConfig::from_toml(toml).unwrap();
    /// assert_eq!(config.llm.model, "gpt-4o");
    /// ```
    pub fn from_toml(content: &str) -> Result<Self, VigilError> {
        let config: Self = toml::from_str(content)?;
        Ok(config)
    }
}

/// LLM provider configuration.
///
/// # Examples
///
/// ```
/// use vigil::LlmConfig;
///
/// let config = LlmConfig::default();
/// assert_eq!(config.model, "gpt-4o-mini");
/// assert!(config.api_key.is_none());
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmConfig {
    /// Model identifier sent in the completion request.
    #[serde(default = "default_model")]
    pub model: String,
    /// API key for the provider. Falls back to `OPEN_AI_KEY` (then
    /// `OPENAI_API_KEY`) when unset.
    pub api_key: Option<String>,
    /// Custom base URL for OpenAI-compatible endpoints.
    pub base_url: Option<String>,
}

fn default_model() -> String {
    "gpt-4o-mini".into()
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            model: default_model(),
            api_key: None,
            base_url: None,
        }
    }
}

impl LlmConfig {
    /// Resolve the API key: config value first, then `OPEN_AI_KEY`, then
    /// `OPENAI_API_KEY`.
    pub fn resolved_api_key(&self) -> Option<String> {
        self.api_key
            .clone()
            .or_else(|| std::env::var("OPEN_AI_KEY").ok())
            .or_else(|| std::env::var("OPENAI_API_KEY").ok())
    }
}

/// GitHub API configuration.
///
/// # Examples
///
/// ```
/// use vigil::GithubConfig;
///
/// let config = GithubConfig::default();
/// assert!(config.token.is_none());
/// assert!(config.api_base.is_none());
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GithubConfig {
    /// Personal access token. Falls back to `GITHUB_TOKEN` when unset.
    pub token: Option<String>,
    /// Custom API base URL (GitHub Enterprise or tests).
    pub api_base: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn default_config_has_expected_values() {
        let config = VigilConfig::default();
        assert_eq!(config.llm.model, "gpt-4o-mini");
        assert!(config.llm.api_key.is_none());
        assert!(config.llm.base_url.is_none());
        assert!(config.github.token.is_none());
        assert!(config.github.api_base.is_none());
    }

    #[test]
    fn parse_minimal_toml() {
        let toml = r#"
[llm]
model = "gpt-4o"
"#;
        let config = VigilConfig::from_toml(toml).unwrap();
        assert_eq!(config.llm.model, "gpt-4o");
        assert!(config.github.token.is_none());
    }

    #[test]
    fn parse_full_toml() {
        let toml = r#"
[llm]
model = "gpt-4.1-mini"
base_url = "http://localhost:11434"

[github]
api_base = "https://github.example.com/api/v3"
"#;
        let config = VigilConfig::from_toml(toml).unwrap();
        assert_eq!(config.llm.model, "gpt-4.1-mini");
        assert_eq!(
            config.llm.base_url.as_deref(),
            Some("http://localhost:11434")
        );
        assert_eq!(
            config.github.api_base.as_deref(),
            Some("https://github.example.com/api/v3")
        );
    }

    #[test]
    fn empty_toml_gives_defaults() {
        let config = VigilConfig::from_toml("").unwrap();
        assert_eq!(config.llm.model, "gpt-4o-mini");
    }

    #[test]
    fn invalid_toml_returns_error() {
        let result = VigilConfig::from_toml("{{invalid}}");
        assert!(result.is_err());
    }

    #[test]
    fn from_file_round_trip() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[llm]\nmodel = \"test-model\"").unwrap();
        let config = VigilConfig::from_file(file.path()).unwrap();
        assert_eq!(config.llm.model, "test-model");
    }

    #[test]
    fn from_file_missing_is_io_error() {
        let result = VigilConfig::from_file(Path::new("/nonexistent/.vigil.toml"));
        assert!(matches!(result, Err(VigilError::Io(_))));
    }

    #[test]
    fn config_api_key_wins_over_env() {
        let config = LlmConfig {
            api_key: Some("from-config".into()),
            ..LlmConfig::default()
        };
        assert_eq!(config.resolved_api_key().as_deref(), Some("from-config"));
    }
}
