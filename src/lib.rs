//! AI pull request reviewer for GitHub Actions.
//!
//! One pass per invocation: resolve the pull request from the Actions
//! environment, fetch its unified diff, ask an LLM for a review, and post
//! the result back as a PR comment.
//!
//! - [`PrContext`] — which pull request this run operates on
//! - [`GitHubClient`] — diff fetch and comment post
//! - [`llm::LlmClient`] — OpenAI-compatible chat completions
//! - [`pipeline::run_review`] — the fetch → generate → publish sequence

pub mod config;
pub mod context;
pub mod error;
pub mod github;
pub mod llm;
pub mod pipeline;
pub mod prompt;

pub use config::{GithubConfig, LlmConfig, VigilConfig};
pub use context::PrContext;
pub use error::VigilError;
pub use github::GitHubClient;

/// A convenience `Result` type for vigil operations.
pub type Result<T> = std::result::Result<T, VigilError>;
