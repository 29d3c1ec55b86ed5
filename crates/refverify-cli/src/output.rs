use std::io::Write;

use owo_colors::OwoColorize;
use serde::Serialize;

use refverify_core::{CheckStats, MatchOutcome, ProgressEvent, VerificationVerdict};

/// Whether to use colored output.
#[derive(Debug, Clone, Copy)]
pub struct ColorMode(pub bool);

impl ColorMode {
    pub fn enabled(&self) -> bool {
        self.0
    }
}

/// JSON shape shared with the web server's `/verify` response.
#[derive(Serialize)]
struct JsonVerdict<'a> {
    reference: &'a str,
    source_found: String,
    is_llm_generated: bool,
}

fn shorten(text: &str, max_chars: usize) -> String {
    if text.chars().count() > max_chars {
        let cut: String = text.chars().take(max_chars).collect();
        format!("{}...", cut)
    } else {
        text.to_string()
    }
}

pub fn print_extraction_summary(
    w: &mut dyn Write,
    file_name: &str,
    format: &str,
    total: usize,
) -> std::io::Result<()> {
    writeln!(w, "Extracting references from {} ({})...", file_name, format)?;
    writeln!(w, "Found {} candidate references to check", total)?;
    writeln!(w)?;
    Ok(())
}

/// Print a real-time progress event.
pub fn print_progress(
    w: &mut dyn Write,
    event: &ProgressEvent,
    color: ColorMode,
) -> std::io::Result<()> {
    match event {
        ProgressEvent::Checking {
            index,
            total,
            reference,
        } => {
            writeln!(
                w,
                "[{}/{}] Checking: \"{}\"",
                index + 1,
                total,
                shorten(reference, 50)
            )?;
        }
        ProgressEvent::Result {
            index,
            total,
            verdict,
        } => {
            let idx = index + 1;
            let (label, detail) = match &verdict.outcome {
                MatchOutcome::FoundWithLink(url) => ("FOUND", Some(url.as_str())),
                MatchOutcome::FoundWithoutLink => ("FOUND", None),
                MatchOutcome::NotFound => ("NOT FOUND", None),
                MatchOutcome::LookupError(msg) => ("ERROR", Some(msg.as_str())),
            };
            let label = if color.enabled() {
                match &verdict.outcome {
                    MatchOutcome::FoundWithLink(_) | MatchOutcome::FoundWithoutLink => {
                        label.green().to_string()
                    }
                    MatchOutcome::NotFound => label.red().to_string(),
                    MatchOutcome::LookupError(_) => label.yellow().to_string(),
                }
            } else {
                label.to_string()
            };
            match detail {
                Some(d) => writeln!(w, "[{}/{}] -> {} ({})", idx, total, label, d)?,
                None => writeln!(w, "[{}/{}] -> {}", idx, total, label)?,
            }
        }
    }
    Ok(())
}

/// One block per reference that was not found or looks synthetic.
pub fn print_flagged_report(
    w: &mut dyn Write,
    verdicts: &[VerificationVerdict],
    color: ColorMode,
) -> std::io::Result<()> {
    for verdict in verdicts {
        let not_found = matches!(verdict.outcome, MatchOutcome::NotFound);
        if !not_found && !verdict.is_likely_synthetic {
            continue;
        }

        writeln!(w)?;
        let sep = "=".repeat(60);
        let heading = if not_found {
            "REFERENCE NOT FOUND"
        } else {
            "POSSIBLY SYNTHETIC REFERENCE"
        };
        if color.enabled() {
            writeln!(w, "{}", sep.bold().red())?;
            writeln!(w, "{}", heading.bold().red())?;
            writeln!(w, "{}", sep.bold().red())?;
            writeln!(w, "{}", verdict.reference.cyan())?;
        } else {
            writeln!(w, "{}", sep)?;
            writeln!(w, "{}", heading)?;
            writeln!(w, "{}", sep)?;
            writeln!(w, "{}", verdict.reference)?;
        }
        writeln!(w, "Source: {}", verdict.source_found())?;
        if verdict.is_likely_synthetic {
            let msg = "Flagged: short or template-like wording";
            if color.enabled() {
                writeln!(w, "{}", msg.yellow())?;
            } else {
                writeln!(w, "{}", msg)?;
            }
        }
    }
    Ok(())
}

pub fn print_summary(w: &mut dyn Write, stats: &CheckStats, color: ColorMode) -> std::io::Result<()> {
    writeln!(w)?;
    let sep = "=".repeat(60);
    if color.enabled() {
        writeln!(w, "{}", sep.bold())?;
        writeln!(w, "{}", "SUMMARY".bold())?;
        writeln!(w, "{}", sep.bold())?;
    } else {
        writeln!(w, "{}", sep)?;
        writeln!(w, "SUMMARY")?;
        writeln!(w, "{}", sep)?;
    }

    writeln!(w, "  References checked: {}", stats.total)?;
    if color.enabled() {
        writeln!(w, "  {} {}", "Found:".green(), stats.found)?;
        writeln!(w, "  {} {}", "Not found:".red(), stats.not_found)?;
        if stats.errors > 0 {
            writeln!(w, "  {} {}", "Lookup errors:".yellow(), stats.errors)?;
        }
        writeln!(w, "  {} {}", "Flagged as synthetic:".yellow(), stats.likely_synthetic)?;
    } else {
        writeln!(w, "  Found: {}", stats.found)?;
        writeln!(w, "  Not found: {}", stats.not_found)?;
        if stats.errors > 0 {
            writeln!(w, "  Lookup errors: {}", stats.errors)?;
        }
        writeln!(w, "  Flagged as synthetic: {}", stats.likely_synthetic)?;
    }
    Ok(())
}

/// Candidates listed without any network access.
pub fn print_dry_run(
    w: &mut dyn Write,
    file_name: &str,
    candidates: &[String],
    color: ColorMode,
) -> std::io::Result<()> {
    if color.enabled() {
        writeln!(
            w,
            "{} {} ({} candidate references)\n",
            "DRY RUN:".bold().cyan(),
            file_name.bold(),
            candidates.len()
        )?;
    } else {
        writeln!(
            w,
            "DRY RUN: {} ({} candidate references)\n",
            file_name,
            candidates.len()
        )?;
    }
    for (i, candidate) in candidates.iter().enumerate() {
        writeln!(w, "[{}] {}", i + 1, candidate)?;
    }
    Ok(())
}

pub fn write_json(w: &mut dyn Write, verdicts: &[VerificationVerdict]) -> anyhow::Result<()> {
    let body: Vec<JsonVerdict<'_>> = verdicts
        .iter()
        .map(|v| JsonVerdict {
            reference: &v.reference,
            source_found: v.source_found(),
            is_llm_generated: v.is_likely_synthetic,
        })
        .collect();
    serde_json::to_writer_pretty(&mut *w, &body)?;
    writeln!(w)?;
    Ok(())
}

pub fn write_json_error(w: &mut dyn Write, message: &str) -> anyhow::Result<()> {
    serde_json::to_writer_pretty(&mut *w, &serde_json::json!([{ "error": message }]))?;
    writeln!(w)?;
    Ok(())
}
