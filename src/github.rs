use crate::error::VigilError;
use crate::pipeline::{CommentSink, DiffSource};

const DEFAULT_API_BASE: &str = "https://api.github.com";

/// GitHub Pull Request client for fetching diffs and posting comments.
///
/// Uses a raw `reqwest` client for the diff fetch (the diff media type is
/// returned as plain text, not JSON) and `octocrab` for the comment post.
pub struct GitHubClient {
    octocrab: octocrab::Octocrab,
    http: reqwest::Client,
    token: String,
    api_base: String,
}

impl GitHubClient {
    /// Create a client from an explicit token or the `GITHUB_TOKEN`
    /// environment variable.
    ///
    /// # Errors
    ///
    /// Returns [`VigilError::Config`] if no token is available, or
    /// [`VigilError::GitHub`] if the client cannot be built.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use vigil::GitHubClient;
    ///
    /// let client = GitHubClient::new(Some("ghp_xxxx")).unwrap();
    /// ```
    pub fn new(token: Option<&str>) -> Result<Self, VigilError> {
        Self::with_api_base(token, None)
    }

    /// Create a client against a non-default API base (GitHub Enterprise,
    /// or a local stub server in tests).
    ///
    /// # Errors
    ///
    /// Returns [`VigilError::Config`] if no token is available, or
    /// [`VigilError::GitHub`] if the client or base URI is invalid.
    pub fn with_api_base(token: Option<&str>, api_base: Option<&str>) -> Result<Self, VigilError> {
        let token = match token {
            Some(t) => t.to_string(),
            None => std::env::var("GITHUB_TOKEN").map_err(|_| {
                VigilError::Config(
                    "GITHUB_TOKEN not set. Pass --github-token or set GITHUB_TOKEN env var".into(),
                )
            })?,
        };

        let api_base = api_base.unwrap_or(DEFAULT_API_BASE).trim_end_matches('/').to_string();

        let octocrab = octocrab::Octocrab::builder()
            .personal_token(token.clone())
            .base_uri(api_base.clone())
            .map_err(|e| VigilError::GitHub(format!("invalid API base '{api_base}': {e}")))?
            .build()
            .map_err(|e| VigilError::GitHub(format!("failed to create GitHub client: {e}")))?;

        let http = reqwest::Client::new();

        Ok(Self {
            octocrab,
            http,
            token,
            api_base,
        })
    }

    /// Fetch the unified diff for a pull request.
    ///
    /// Requests the `application/vnd.github.v3.diff` media type, so the
    /// whole diff arrives as one text payload.
    ///
    /// # Errors
    ///
    /// Returns [`VigilError::GitHub`] on network or API errors.
    pub async fn fetch_pr_diff(
        &self,
        owner: &str,
        repo: &str,
        pr_number: u64,
    ) -> Result<String, VigilError> {
        let url = format!("{}/repos/{owner}/{repo}/pulls/{pr_number}", self.api_base);

        let response = self
            .http
            .get(&url)
            .header("Accept", "application/vnd.github.v3.diff")
            .header("Authorization", format!("Bearer {}", self.token))
            .header("User-Agent", "vigil")
            .send()
            .await
            .map_err(|e| VigilError::GitHub(format!("failed to fetch PR diff: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(VigilError::GitHub(format!(
                "GitHub API error {status}: {body}"
            )));
        }

        response
            .text()
            .await
            .map_err(|e| VigilError::GitHub(format!("failed to read diff response: {e}")))
    }

    /// Post a comment on a pull request.
    ///
    /// Pull request comments of this kind live on the issue resource, so
    /// the route is `/repos/{owner}/{repo}/issues/{number}/comments`.
    ///
    /// # Errors
    ///
    /// Returns [`VigilError::GitHub`] on API errors.
    pub async fn post_comment(
        &self,
        owner: &str,
        repo: &str,
        pr_number: u64,
        body: &str,
    ) -> Result<(), VigilError> {
        let route = format!("/repos/{owner}/{repo}/issues/{pr_number}/comments");
        let payload = serde_json::json!({ "body": body });

        let _response: serde_json::Value = self
            .octocrab
            .post(route, Some(&payload))
            .await
            .map_err(|e| VigilError::GitHub(format!("failed to post comment: {e}")))?;

        Ok(())
    }
}

#[async_trait::async_trait]
impl DiffSource for GitHubClient {
    async fn fetch_diff(&self, owner: &str, repo: &str, number: u64) -> Result<String, VigilError> {
        self.fetch_pr_diff(owner, repo, number).await
    }
}

#[async_trait::async_trait]
impl CommentSink for GitHubClient {
    async fn publish(
        &self,
        owner: &str,
        repo: &str,
        number: u64,
        body: &str,
    ) -> Result<(), VigilError> {
        self.post_comment(owner, repo, number, body).await
    }
}
