use crate::error::VigilError;

/// The pull request a single run operates on.
///
/// Resolved once at startup, before any client is constructed, so an
/// unresolvable pull request never reaches the network.
///
/// # Examples
///
/// ```
/// use vigil::PrContext;
///
/// let ctx = PrContext::resolve("acme/widgets", "refs/pull/42/merge").unwrap();
/// assert_eq!(ctx.owner, "acme");
/// assert_eq!(ctx.repo, "widgets");
/// assert_eq!(ctx.number, 42);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrContext {
    /// Repository owner.
    pub owner: String,
    /// Repository name.
    pub repo: String,
    /// Pull request number.
    pub number: u64,
}

impl PrContext {
    /// Resolve a context from a repository slug (`owner/repo`) and a git ref
    /// string (`refs/pull/<n>/merge`).
    ///
    /// # Errors
    ///
    /// Returns [`VigilError::Config`] if the slug has no `/` or the ref
    /// carries no resolvable pull request number.
    pub fn resolve(slug: &str, ref_str: &str) -> Result<Self, VigilError> {
        let (owner, repo) = parse_repo_slug(slug)?;
        let number = parse_pull_number(ref_str).ok_or_else(|| {
            VigilError::Config(format!(
                "pull request number not found in ref '{ref_str}'"
            ))
        })?;
        Ok(Self {
            owner,
            repo,
            number,
        })
    }

    /// Resolve a context from the `GITHUB_REPOSITORY` and `GITHUB_REF`
    /// environment variables set by GitHub Actions.
    ///
    /// # Errors
    ///
    /// Returns [`VigilError::Config`] if either variable is unset or the
    /// values do not resolve.
    pub fn from_env() -> Result<Self, VigilError> {
        let slug = std::env::var("GITHUB_REPOSITORY")
            .map_err(|_| VigilError::Config("GITHUB_REPOSITORY not set".into()))?;
        let ref_str = std::env::var("GITHUB_REF")
            .map_err(|_| VigilError::Config("GITHUB_REF not set".into()))?;
        Self::resolve(&slug, &ref_str)
    }
}

/// Split a repository slug into `(owner, repo)` at the first `/`.
///
/// Slugs with extra slashes are not rejected; everything after the first
/// `/` becomes the repository name.
///
/// # Errors
///
/// Returns [`VigilError::Config`] if the slug contains no `/`.
///
/// # Examples
///
/// ```
/// use vigil::context::parse_repo_slug;
///
/// let (owner, repo) = parse_repo_slug("acme/widgets").unwrap();
/// assert_eq!(owner, "acme");
/// assert_eq!(repo, "widgets");
/// ```
pub fn parse_repo_slug(slug: &str) -> Result<(String, String), VigilError> {
    let Some((owner, repo)) = slug.split_once('/') else {
        return Err(VigilError::Config(format!(
            "invalid repository slug '{slug}', expected owner/repo"
        )));
    };
    if owner.is_empty() || repo.is_empty() {
        return Err(VigilError::Config(format!(
            "invalid repository slug '{slug}', expected owner/repo"
        )));
    }
    Ok((owner.to_string(), repo.to_string()))
}

/// Extract the pull request number from a ref string.
///
/// Splits on `/` and looks for the literal token `pull`; the following
/// token is parsed as the number. Returns `None` when there is no `pull`
/// segment, no following token, or the token is not numeric.
///
/// # Examples
///
/// ```
/// use vigil::context::parse_pull_number;
///
/// assert_eq!(parse_pull_number("refs/pull/42/merge"), Some(42));
/// assert_eq!(parse_pull_number("refs/heads/main"), None);
/// ```
pub fn parse_pull_number(ref_str: &str) -> Option<u64> {
    let mut parts = ref_str.split('/');
    while let Some(part) = parts.next() {
        if part == "pull" {
            return parts.next().and_then(|n| n.parse().ok());
        }
    }
    None
}

/// Parse a PR reference string (`owner/repo#number`) into a [`PrContext`].
///
/// Used for local invocation via `--pr`, bypassing the Actions environment.
///
/// # Errors
///
/// Returns [`VigilError::Config`] if the format is invalid.
///
/// # Examples
///
/// ```
/// use vigil::context::parse_pr_reference;
///
/// let ctx = parse_pr_reference("octocat/hello-world#42").unwrap();
/// assert_eq!(ctx.owner, "octocat");
/// assert_eq!(ctx.repo, "hello-world");
/// assert_eq!(ctx.number, 42);
/// ```
pub fn parse_pr_reference(pr_ref: &str) -> Result<PrContext, VigilError> {
    let Some((owner_repo, number_str)) = pr_ref.split_once('#') else {
        return Err(VigilError::Config(format!(
            "invalid PR reference '{pr_ref}', expected owner/repo#number"
        )));
    };
    let (owner, repo) = parse_repo_slug(owner_repo)?;
    let number: u64 = number_str
        .parse()
        .map_err(|_| VigilError::Config(format!("invalid PR number: {number_str}")))?;
    Ok(PrContext {
        owner,
        repo,
        number,
    })
}
