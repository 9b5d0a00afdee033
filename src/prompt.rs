//! Prompt construction for the review request.

const REVIEW_INSTRUCTION: &str = "Please review the following code diff and suggest any \
potential code refactoring, optimizations, or improvements, along with constructive feedback:";

/// Build the user prompt containing the diff to review.
///
/// The diff is embedded verbatim after a fixed instruction. Oversized diffs
/// are forwarded as-is: there is no truncation or chunking, so a very large
/// PR can exceed the model's context window.
///
/// # Examples
///
/// ```
/// use vigil::prompt::build_review_prompt;
///
/// let prompt = build_review_prompt("+new line");
/// assert!(prompt.contains("+new line"));
/// assert!(prompt.starts_with("Please review"));
/// ```
pub fn build_review_prompt(diff: &str) -> String {
    format!("{REVIEW_INSTRUCTION}\n\n{diff}")
}
