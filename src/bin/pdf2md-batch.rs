//! Batch binary for grobid-pdf2md.
//!
//! Converts one PDF on disk into `<stem>.json` and `<stem>_main_text.md`
//! inside the output directory, then prints the extracted metadata.

use anyhow::{Context, Result};
use clap::Parser;
use grobid_pdf2md::config::DEFAULT_CONVERTER_URL;
use grobid_pdf2md::{run_batch, BatchOptions, GrobidConverter};
use indicatif::{ProgressBar, ProgressStyle};
use std::io;
use std::path::PathBuf;
use std::time::{Duration, Instant};
use tracing_subscriber::EnvFilter;

fn green(s: &str) -> String {
    format!("\x1b[32m{s}\x1b[0m")
}
fn dim(s: &str) -> String {
    format!("\x1b[2m{s}\x1b[0m")
}
fn bold(s: &str) -> String {
    format!("\x1b[1m{s}\x1b[0m")
}

const AFTER_HELP: &str = r#"EXAMPLES:
  # Writes tests/work/paper.json and tests/work/paper_main_text.md
  pdf2md-batch tests/work/paper.pdf

  # Another output directory, with YAML front matter in the Markdown
  pdf2md-batch paper.pdf -o out --metadata

  # Machine-readable summary
  pdf2md-batch paper.pdf --json > summary.json
"#;

/// Convert a PDF to parsed JSON and Markdown body text.
#[derive(Parser, Debug)]
#[command(
    name = "pdf2md-batch",
    version,
    about = "Convert a PDF to parsed JSON and Markdown body text via GROBID/doc2json",
    arg_required_else_help = true,
    color = clap::ColorChoice::Auto,
    after_long_help = AFTER_HELP
)]
struct Cli {
    /// Local PDF file.
    input: PathBuf,

    /// Directory for the JSON and Markdown artifacts.
    #[arg(short, long, env = "PDF2MD_OUTPUT_DIR", default_value = "tests/work")]
    output_dir: PathBuf,

    /// Base URL of the doc2json conversion service.
    #[arg(long, env = "PDF2MD_CONVERTER_URL", default_value = DEFAULT_CONVERTER_URL)]
    converter_url: String,

    /// Conversion timeout in seconds.
    #[arg(long, env = "PDF2MD_CONVERTER_TIMEOUT", default_value_t = 300)]
    converter_timeout: u64,

    /// Prepend YAML front-matter with title, authors and abstract.
    #[arg(long, env = "PDF2MD_METADATA")]
    metadata: bool,

    /// Print metadata and artifact paths as JSON on stdout.
    #[arg(long, env = "PDF2MD_JSON")]
    json: bool,

    /// Disable the spinner.
    #[arg(long, env = "PDF2MD_NO_PROGRESS")]
    no_progress: bool,

    /// Enable DEBUG-level tracing logs.
    #[arg(short, long, env = "PDF2MD_VERBOSE")]
    verbose: bool,

    /// Suppress all output except errors.
    #[arg(short, long, env = "PDF2MD_QUIET")]
    quiet: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    // ── Logging setup ────────────────────────────────────────────────────
    // The spinner covers progress feedback; keep INFO logs out of its way.
    let show_progress = !cli.quiet && !cli.no_progress && !cli.json;
    let filter = if cli.verbose {
        "debug"
    } else if cli.quiet || show_progress {
        "error"
    } else {
        "info"
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(io::stderr)
        .init();

    let converter = GrobidConverter::new(&cli.converter_url, cli.converter_timeout)
        .context("Failed to create converter")?;
    let options = BatchOptions {
        include_metadata: cli.metadata,
    };

    let spinner = show_progress.then(|| {
        let bar = ProgressBar::new_spinner();
        bar.set_style(
            ProgressStyle::with_template("{spinner:.cyan} {prefix:.bold}  {msg}  ⏱ {elapsed}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner())
                .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏", "⠿"]),
        );
        bar.set_prefix("Converting");
        bar.set_message(cli.input.display().to_string());
        bar.enable_steady_tick(Duration::from_millis(80));
        bar
    });

    let start = Instant::now();
    let result = run_batch(&converter, &cli.input, &cli.output_dir, &options).await;
    if let Some(bar) = spinner {
        bar.finish_and_clear();
    }
    let output = result.with_context(|| format!("Failed to convert {}", cli.input.display()))?;

    if cli.json {
        println!(
            "{}",
            serde_json::to_string_pretty(&output).context("Failed to serialise summary")?
        );
        return Ok(());
    }

    if !cli.quiet {
        println!("Title:     {}", output.metadata.title);
        println!("Authors:   {}", output.metadata.authors);
        println!("Abstract:  {}", output.metadata.abstract_text);
        eprintln!(
            "{}  {}ms  →  {}",
            green("✔"),
            start.elapsed().as_millis(),
            bold(&output.markdown_path.display().to_string()),
        );
        eprintln!(
            "   {} {}",
            dim("JSON:"),
            dim(&output.json_path.display().to_string())
        );
    }

    Ok(())
}
