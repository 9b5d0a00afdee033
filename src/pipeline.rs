//! The review pipeline: fetch diff, generate review, post comment.
//!
//! Each network boundary is a trait so the orchestrator can be driven with
//! test doubles. The real implementations live in [`crate::github`] and
//! [`crate::llm`].

use crate::context::PrContext;
use crate::error::VigilError;

/// Source of a pull request's unified diff.
#[async_trait::async_trait]
pub trait DiffSource {
    /// Fetch the diff for the given pull request.
    async fn fetch_diff(&self, owner: &str, repo: &str, number: u64)
        -> Result<String, VigilError>;
}

/// Turns a diff into review text.
#[async_trait::async_trait]
pub trait ReviewModel {
    /// Generate a review for the given diff.
    async fn generate_review(&self, diff: &str) -> Result<String, VigilError>;
}

/// Destination for the finished review.
#[async_trait::async_trait]
pub trait CommentSink {
    /// Publish the review as a comment on the pull request.
    async fn publish(
        &self,
        owner: &str,
        repo: &str,
        number: u64,
        body: &str,
    ) -> Result<(), VigilError>;
}

/// Run one review: fetch the diff, generate the review, post the comment.
///
/// Strictly sequential and fail-fast: the first `Err` propagates and no
/// later step runs. A failed publish simply means no comment was posted;
/// there is nothing to roll back. Returns the posted review text.
///
/// # Errors
///
/// Propagates the first failing step's error unchanged.
pub async fn run_review<S, M, P>(
    ctx: &PrContext,
    source: &S,
    model: &M,
    sink: &P,
) -> Result<String, VigilError>
where
    S: DiffSource + Sync,
    M: ReviewModel + Sync,
    P: CommentSink + Sync,
{
    let diff = source.fetch_diff(&ctx.owner, &ctx.repo, ctx.number).await?;
    let review = model.generate_review(&diff).await?;
    sink.publish(&ctx.owner, &ctx.repo, ctx.number, &review)
        .await?;
    Ok(review)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    struct StubSource {
        calls: AtomicUsize,
        result: Result<String, String>,
        seen: Mutex<Option<(String, String, u64)>>,
    }

    impl StubSource {
        fn ok(diff: &str) -> Self {
            Self {
                calls: AtomicUsize::new(0),
                result: Ok(diff.to_string()),
                seen: Mutex::new(None),
            }
        }

        fn failing() -> Self {
            Self {
                calls: AtomicUsize::new(0),
                result: Err("boom".into()),
                seen: Mutex::new(None),
            }
        }
    }

    #[async_trait::async_trait]
    impl DiffSource for StubSource {
        async fn fetch_diff(
            &self,
            owner: &str,
            repo: &str,
            number: u64,
        ) -> Result<String, VigilError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            *self.seen.lock().unwrap() = Some((owner.into(), repo.into(), number));
            self.result
                .clone()
                .map_err(VigilError::GitHub)
        }
    }

    struct StubModel {
        calls: AtomicUsize,
        result: Result<String, String>,
        seen_diff: Mutex<Option<String>>,
    }

    impl StubModel {
        fn ok(review: &str) -> Self {
            Self {
                calls: AtomicUsize::new(0),
                result: Ok(review.to_string()),
                seen_diff: Mutex::new(None),
            }
        }

        fn failing() -> Self {
            Self {
                calls: AtomicUsize::new(0),
                result: Err("model down".into()),
                seen_diff: Mutex::new(None),
            }
        }
    }

    #[async_trait::async_trait]
    impl ReviewModel for StubModel {
        async fn generate_review(&self, diff: &str) -> Result<String, VigilError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            *self.seen_diff.lock().unwrap() = Some(diff.to_string());
            self.result.clone().map_err(VigilError::Llm)
        }
    }

    struct StubSink {
        calls: AtomicUsize,
        seen: Mutex<Option<(String, String, u64, String)>>,
    }

    impl StubSink {
        fn new() -> Self {
            Self {
                calls: AtomicUsize::new(0),
                seen: Mutex::new(None),
            }
        }
    }

    #[async_trait::async_trait]
    impl CommentSink for StubSink {
        async fn publish(
            &self,
            owner: &str,
            repo: &str,
            number: u64,
            body: &str,
        ) -> Result<(), VigilError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            *self.seen.lock().unwrap() =
                Some((owner.into(), repo.into(), number, body.into()));
            Ok(())
        }
    }

    fn ctx() -> PrContext {
        PrContext::resolve("acme/widgets", "refs/pull/42/merge").unwrap()
    }

    #[tokio::test]
    async fn happy_path_threads_values_through() {
        let source = StubSource::ok("diff --git a/x b/x\n+x");
        let model = StubModel::ok("Looks reasonable, one nit.");
        let sink = StubSink::new();

        let review = run_review(&ctx(), &source, &model, &sink).await.unwrap();
        assert_eq!(review, "Looks reasonable, one nit.");

        assert_eq!(source.calls.load(Ordering::SeqCst), 1);
        assert_eq!(model.calls.load(Ordering::SeqCst), 1);
        assert_eq!(sink.calls.load(Ordering::SeqCst), 1);

        assert_eq!(
            source.seen.lock().unwrap().clone(),
            Some(("acme".into(), "widgets".into(), 42))
        );
        assert_eq!(
            model.seen_diff.lock().unwrap().as_deref(),
            Some("diff --git a/x b/x\n+x")
        );
        assert_eq!(
            sink.seen.lock().unwrap().clone(),
            Some((
                "acme".into(),
                "widgets".into(),
                42,
                "Looks reasonable, one nit.".into()
            ))
        );
    }

    #[tokio::test]
    async fn fetch_failure_skips_model_and_sink() {
        let source = StubSource::failing();
        let model = StubModel::ok("unused");
        let sink = StubSink::new();

        let result = run_review(&ctx(), &source, &model, &sink).await;
        assert!(matches!(result, Err(VigilError::GitHub(_))));

        assert_eq!(source.calls.load(Ordering::SeqCst), 1);
        assert_eq!(model.calls.load(Ordering::SeqCst), 0);
        assert_eq!(sink.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn model_failure_skips_sink() {
        let source = StubSource::ok("+x");
        let model = StubModel::failing();
        let sink = StubSink::new();

        let result = run_review(&ctx(), &source, &model, &sink).await;
        assert!(matches!(result, Err(VigilError::Llm(_))));

        assert_eq!(model.calls.load(Ordering::SeqCst), 1);
        assert_eq!(sink.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn unresolvable_ref_never_reaches_the_network() {
        // A PrContext cannot exist without a pull number, so the only thing
        // to verify is that resolution fails before any stub is touched.
        let source = StubSource::ok("+x");
        let model = StubModel::ok("unused");
        let sink = StubSink::new();

        let result = PrContext::resolve("acme/widgets", "refs/heads/main");
        assert!(matches!(result, Err(VigilError::Config(_))));

        assert_eq!(source.calls.load(Ordering::SeqCst), 0);
        assert_eq!(model.calls.load(Ordering::SeqCst), 0);
        assert_eq!(sink.calls.load(Ordering::SeqCst), 0);
    }
}
