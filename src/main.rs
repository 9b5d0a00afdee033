use std::io::IsTerminal;
use std::path::PathBuf;

use clap::Parser;
use miette::{IntoDiagnostic, Result};

use vigil::context::{parse_pr_reference, PrContext};
use vigil::llm::LlmClient;
use vigil::pipeline::{run_review, DiffSource, ReviewModel};
use vigil::{GitHubClient, VigilConfig};

#[derive(Parser)]
#[command(
    name = "vigil",
    version,
    about = "AI pull request reviewer",
    long_about = "Vigil reviews a pull request with an LLM and posts the result as a PR comment.\n\n\
                   Inside GitHub Actions the pull request is resolved from GITHUB_REPOSITORY\n\
                   and GITHUB_REF; elsewhere, name it explicitly with --pr.\n\n\
                   Examples:\n  \
                     vigil                          Review the PR that triggered this workflow\n  \
                     vigil --pr acme/widgets#42     Review a specific PR\n  \
                     vigil --pr acme/widgets#42 --dry-run   Print the review instead of posting"
)]
struct Cli {
    /// Pull request to review (format: owner/repo#123). Defaults to the
    /// GitHub Actions environment.
    #[arg(
        long,
        long_help = "Pull request to review.\n\nFormat: owner/repo#123\nWhen omitted, the PR is resolved from GITHUB_REPOSITORY and GITHUB_REF."
    )]
    pr: Option<String>,

    /// Print the review to stdout instead of posting a comment
    #[arg(long)]
    dry_run: bool,

    /// Path to configuration file (default: .vigil.toml)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Enable verbose output
    #[arg(long, short)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    miette::set_hook(Box::new(|_| {
        Box::new(
            miette::MietteHandlerOpts::new()
                .terminal_links(true)
                .build(),
        )
    }))
    .expect("miette handler");
    human_panic::setup_panic!();

    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => VigilConfig::from_file(path).into_diagnostic()?,
        None => {
            let default_path = std::path::Path::new(".vigil.toml");
            if default_path.exists() {
                VigilConfig::from_file(default_path).into_diagnostic()?
            } else {
                VigilConfig::default()
            }
        }
    };

    // Resolve the pull request before touching the network.
    let ctx = match &cli.pr {
        Some(pr_ref) => parse_pr_reference(pr_ref).into_diagnostic()?,
        None => PrContext::from_env().map_err(|e| {
            miette::miette!(
                help = "Run inside a pull_request workflow, or name the PR with --pr owner/repo#123",
                "{e}"
            )
        })?,
    };

    if cli.verbose {
        eprintln!(
            "Reviewing {}/{}#{} with model {}",
            ctx.owner, ctx.repo, ctx.number, config.llm.model
        );
    }

    // Hint: missing LLM API key — check before any request goes out.
    if config.llm.resolved_api_key().is_none() {
        miette::bail!(miette::miette!(
            help = "export OPEN_AI_KEY=... or set api_key in .vigil.toml under [llm]",
            "No API key configured for the LLM"
        ));
    }

    let github = GitHubClient::with_api_base(
        config.github.token.as_deref(),
        config.github.api_base.as_deref(),
    )
    .into_diagnostic()?;
    let llm = LlmClient::new(&config.llm).into_diagnostic()?;

    let is_tty = std::io::stderr().is_terminal();
    let spinner = if is_tty {
        let pb = indicatif::ProgressBar::new_spinner();
        pb.set_style(
            indicatif::ProgressStyle::with_template("{spinner:.cyan} {msg} ({elapsed})")
                .into_diagnostic()?,
        );
        pb.set_message(format!(
            "Reviewing {}/{}#{}...",
            ctx.owner, ctx.repo, ctx.number
        ));
        pb.enable_steady_tick(std::time::Duration::from_millis(120));
        Some(pb)
    } else {
        None
    };

    let outcome = if cli.dry_run {
        let diff = github
            .fetch_diff(&ctx.owner, &ctx.repo, ctx.number)
            .await;
        match diff {
            Ok(diff) => {
                if cli.verbose {
                    eprintln!("Fetched diff: {} bytes", diff.len());
                }
                llm.generate_review(&diff).await
            }
            Err(e) => Err(e),
        }
    } else {
        run_review(&ctx, &github, &llm, &github).await
    };

    let review = match outcome {
        Ok(review) => {
            if let Some(pb) = spinner {
                pb.finish_with_message("Done");
            }
            review
        }
        Err(e) => {
            if let Some(pb) = spinner {
                pb.finish_with_message("Failed");
            }
            // Propagate a failing exit status so the workflow step is
            // marked red rather than silently green.
            return Err(e).into_diagnostic();
        }
    };

    if cli.dry_run {
        println!("{review}");
    } else {
        eprintln!(
            "Review posted to {}/{}#{}",
            ctx.owner, ctx.repo, ctx.number
        );
    }

    Ok(())
}
