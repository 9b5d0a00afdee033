/// Errors that can occur while reviewing a pull request.
///
/// Each variant wraps a specific failure domain. The library returns this
/// type everywhere; the binary converts to a `miette::Report` at the boundary.
///
/// # Examples
///
/// ```
/// use vigil::VigilError;
///
/// let err = VigilError::Config("pull request number not found".into());
/// assert!(err.to_string().contains("pull request number"));
/// ```
#[derive(Debug, thiserror::Error)]
pub enum VigilError {
    /// Filesystem I/O failure.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Invalid or missing configuration, including an unresolvable
    /// pull request number.
    #[error("configuration error: {0}")]
    Config(String),

    /// GitHub API failure (diff fetch or comment post).
    #[error("GitHub error: {0}")]
    GitHub(String),

    /// LLM API or response error.
    #[error("LLM error: {0}")]
    Llm(String),

    /// JSON serialization / deserialization failure.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// TOML deserialization failure.
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
}
