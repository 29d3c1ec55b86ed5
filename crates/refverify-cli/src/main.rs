use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use clap::{Args, Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};
use tracing_subscriber::EnvFilter;

use refverify_core::{CheckStats, Config, Document, ProgressEvent, Verifier, config_file};

mod output;

use output::ColorMode;

/// Reference Verifier - check a paper's references against CrossRef
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Check the references of a .pdf, .docx, .tex, or .bib file
    Check(CheckArgs),
}

#[derive(Args, Debug)]
struct CheckArgs {
    /// Path to the document to check
    file_path: PathBuf,

    /// Print the verdicts as a JSON array instead of a report
    #[arg(long)]
    json: bool,

    /// Disable colored output
    #[arg(long)]
    no_color: bool,

    /// Dry run: extract and print candidate references without querying CrossRef
    #[arg(long)]
    dry_run: bool,

    /// Search endpoint (default: CrossRef works API)
    #[arg(long)]
    endpoint: Option<String>,

    /// Contact email for CrossRef's polite pool
    #[arg(long)]
    mailto: Option<String>,

    /// Per-lookup timeout in seconds
    #[arg(long)]
    timeout: Option<u64>,

    /// Maximum lookups in flight (1 = sequential)
    #[arg(long)]
    concurrency: Option<usize>,

    /// Path to output file
    #[arg(short, long)]
    output: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Command::Check(args) => {
            if args.dry_run {
                dry_run(&args)
            } else {
                check(&args).await
            }
        }
    }
}

/// CLI flags > environment > config file > defaults.
fn resolve_config(args: &CheckArgs) -> Config {
    let mut config = Config::from_config_file(&config_file::load_config());
    config.apply_env();

    if let Some(ref endpoint) = args.endpoint {
        config.search_endpoint = endpoint.clone();
    }
    if args.mailto.is_some() {
        config.mailto = args.mailto.clone();
    }
    if args.timeout.is_some() {
        config.lookup_timeout_secs = args.timeout;
    }
    if let Some(n) = args.concurrency {
        config.max_concurrent_lookups = n;
    }
    config
}

/// Checked before `--output` is created so a typo never clobbers an old report.
fn ensure_input_exists(path: &Path) -> anyhow::Result<()> {
    if !path.exists() {
        anyhow::bail!("File not found: {}", path.display());
    }
    Ok(())
}

fn open_writer(output: Option<&Path>) -> anyhow::Result<Box<dyn Write>> {
    Ok(match output {
        Some(path) => Box::new(std::fs::File::create(path)?),
        None => Box::new(std::io::stdout()),
    })
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| path.display().to_string())
}

fn unsupported_message(path: &Path) -> String {
    format!(
        "Unsupported file type: {} (expected .pdf, .docx, .tex, or .bib)",
        path.display()
    )
}

async fn check(args: &CheckArgs) -> anyhow::Result<()> {
    let config = resolve_config(args);
    tracing::debug!(?config, "resolved configuration");

    let color = ColorMode(!args.no_color && args.output.is_none() && !args.json);
    ensure_input_exists(&args.file_path)?;
    let document = Document::from_path(&args.file_path);
    if document.is_none() && !args.json {
        anyhow::bail!(unsupported_message(&args.file_path));
    }
    let mut writer = open_writer(args.output.as_deref())?;

    let Some(document) = document else {
        output::write_json_error(&mut *writer, "Unsupported file type")?;
        return Ok(());
    };

    let verifier = Verifier::from_config(&config)?;
    let format = document.format;
    let candidates = tokio::task::spawn_blocking(move || refverify_ingest::extract_candidates(&document))
        .await??;

    tracing::info!(
        db = verifier.backend_name(),
        candidates = candidates.len(),
        "checking references"
    );

    let file_name = display_name(&args.file_path);
    if !args.json {
        output::print_extraction_summary(&mut *writer, &file_name, format.name(), candidates.len())?;
        if candidates.is_empty() {
            writeln!(writer, "No references to check.")?;
            return Ok(());
        }
    }

    let verdicts = if args.json {
        let bar = ProgressBar::new(candidates.len() as u64);
        bar.set_style(
            ProgressStyle::with_template("{spinner:.cyan} {msg} [{bar:40.cyan/dim}] {pos}/{len}")?
                .progress_chars("=> "),
        );
        bar.set_message(file_name.clone());
        bar.enable_steady_tick(Duration::from_millis(120));

        let progress_bar = bar.clone();
        let verdicts = verifier
            .verify_candidates(candidates, move |event| {
                if let ProgressEvent::Result { .. } = event {
                    progress_bar.inc(1);
                }
            })
            .await;
        bar.finish_and_clear();
        verdicts
    } else {
        // Progress goes to stdout unless the report itself is redirected.
        let progress_writer: Arc<Mutex<Box<dyn Write + Send>>> = if args.output.is_some() {
            Arc::new(Mutex::new(Box::new(std::io::stderr())))
        } else {
            Arc::new(Mutex::new(Box::new(std::io::stdout())))
        };
        let pw = Arc::clone(&progress_writer);
        verifier
            .verify_candidates(candidates, move |event| {
                if let Ok(mut w) = pw.lock() {
                    let _ = output::print_progress(&mut *w, &event, color);
                    let _ = w.flush();
                }
            })
            .await
    };

    if args.json {
        output::write_json(&mut *writer, &verdicts)?;
    } else {
        output::print_flagged_report(&mut *writer, &verdicts, color)?;
        output::print_summary(&mut *writer, &CheckStats::from_verdicts(&verdicts), color)?;
    }
    writer.flush()?;

    Ok(())
}

fn dry_run(args: &CheckArgs) -> anyhow::Result<()> {
    let color = ColorMode(!args.no_color && args.output.is_none());
    ensure_input_exists(&args.file_path)?;
    let document = Document::from_path(&args.file_path)
        .ok_or_else(|| anyhow::anyhow!(unsupported_message(&args.file_path)))?;

    let candidates = refverify_ingest::extract_candidates(&document)?;
    let mut writer = open_writer(args.output.as_deref())?;
    output::print_dry_run(
        &mut *writer,
        &display_name(&args.file_path),
        &candidates,
        color,
    )?;
    Ok(())
}
