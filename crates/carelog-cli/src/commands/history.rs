use anyhow::Result;
use comfy_table::{Cell, Table};
use serde::Serialize;
use serde_json::json;
use std::sync::Arc;
use tracing::{error, warn};

use crate::cli::HistoryCommands;
use crate::output::{OutputFormat, json::print_json, table::print_table};
use carelog_core::{AppCore, ParsedEntry};

#[derive(Debug, Serialize)]
struct TranscriptView {
    subject: String,
    path: String,
    length: usize,
    entries: Vec<ParsedEntry>,
}

#[derive(Debug, Serialize)]
struct SubjectSummary {
    subject: String,
    length: usize,
    entries: usize,
}

pub async fn run(core: Arc<AppCore>, command: HistoryCommands, format: OutputFormat) -> Result<()> {
    match command {
        HistoryCommands::Show { subject } => show_history(&core, &subject, format).await,
        HistoryCommands::Append {
            subject,
            requester,
            responder,
        } => append_history(&core, &subject, &requester, &responder, format).await,
        HistoryCommands::List => list_subjects(&core, format).await,
        HistoryCommands::Clear { subject } => clear_history(&core, &subject, format).await,
    }
}

async fn show_history(core: &Arc<AppCore>, subject: &str, format: OutputFormat) -> Result<()> {
    let path = core.history.storage_path(subject)?;
    let text = core.history.try_load(subject).await?;

    if format.is_json() {
        return print_json(&TranscriptView {
            subject: subject.to_string(),
            path,
            length: text.chars().count(),
            entries: carelog_core::history::parse_transcript(&text),
        });
    }

    if text.is_empty() {
        println!("No history for {}", subject);
        return Ok(());
    }

    println!("{}", text.trim_start_matches('\n'));
    Ok(())
}

async fn append_history(
    core: &Arc<AppCore>,
    subject: &str,
    requester: &str,
    responder: &str,
    format: OutputFormat,
) -> Result<()> {
    // Recording history is best effort: report failures without failing the command.
    let outcome = match core.history.try_append(subject, requester, responder).await {
        Ok(outcome) => outcome,
        Err(e) => {
            error!(subject, error = %e, "Failed to save AI history");
            if format.is_json() {
                return print_json(&json!({
                    "subject": subject,
                    "saved": false,
                    "error": e.to_string(),
                }));
            }
            eprintln!("History not saved: {}", e);
            return Ok(());
        }
    };

    if format.is_json() {
        return print_json(&json!({
            "subject": subject,
            "saved": true,
            "length": outcome.length,
            "trimmed": outcome.trimmed,
        }));
    }

    if outcome.trimmed {
        println!(
            "Appended entry for {} ({} chars, oldest entries trimmed)",
            subject, outcome.length
        );
    } else {
        println!("Appended entry for {} ({} chars)", subject, outcome.length);
    }
    Ok(())
}

async fn list_subjects(core: &Arc<AppCore>, format: OutputFormat) -> Result<()> {
    let mut summaries = Vec::new();
    for subject in core.history.subjects().await? {
        let text = match core.history.try_load(&subject).await {
            Ok(text) => text,
            Err(e) => {
                warn!(subject = %subject, error = %e, "Skipping unreadable history");
                continue;
            }
        };
        summaries.push(SubjectSummary {
            length: text.chars().count(),
            entries: carelog_core::history::parse_transcript(&text).len(),
            subject,
        });
    }

    if format.is_json() {
        return print_json(&summaries);
    }

    if summaries.is_empty() {
        println!("No history recorded");
        return Ok(());
    }

    let mut table = Table::new();
    table.set_header(vec!["Subject", "Entries", "Characters"]);
    for summary in summaries {
        table.add_row(vec![
            Cell::new(summary.subject),
            Cell::new(summary.entries),
            Cell::new(summary.length),
        ]);
    }

    print_table(table)
}

async fn clear_history(core: &Arc<AppCore>, subject: &str, format: OutputFormat) -> Result<()> {
    let deleted = core.clear_history(subject).await?;

    if format.is_json() {
        return print_json(&json!({
            "deleted": deleted,
            "subject": subject,
        }));
    }

    if deleted {
        println!("Deleted history for {}", subject);
    } else {
        println!("No history for {}", subject);
    }

    Ok(())
}
