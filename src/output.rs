//! Terminal rendering of pipeline results.
//!
//! Everything renders to a `String`; the caller decides where it goes.
//! Color is opt-in so piped output stays plain.

use crate::extraction::entity::EntityCategory;
use crate::extraction::patterns::PatternTable;
use crate::pipeline::audit::{AuditDocument, AuditOutcome, FailureEnvelope};
use crate::pipeline::types::StageStatus;
use owo_colors::OwoColorize;

fn heading(text: &str, color: bool) -> String {
    if color {
        text.bold().cyan().to_string()
    } else {
        text.to_string()
    }
}

fn dim(text: &str, color: bool) -> String {
    if color {
        text.dimmed().to_string()
    } else {
        text.to_string()
    }
}

fn status_badge(status: StageStatus, color: bool) -> String {
    let label = status.as_str();
    if !color {
        return label.to_string();
    }
    match status {
        StageStatus::Success => label.green().to_string(),
        StageStatus::EmptyInput => label.yellow().to_string(),
        StageStatus::Error => label.red().to_string(),
    }
}

/// Render either outcome: the SOAP note of a completed run or the failure.
pub fn render_outcome(outcome: &AuditOutcome, color: bool) -> String {
    match outcome {
        AuditOutcome::Completed(document) => render_note(document, color),
        AuditOutcome::Failed(envelope) => render_failure(envelope, color),
    }
}

/// SOAP note, followed by a short per-stage status line.
pub fn render_note(document: &AuditDocument, color: bool) -> String {
    let note = &document.soap_note;
    let mut out = String::new();

    for (title, body) in [
        ("Subjective", &note.subjective),
        ("Objective", &note.objective),
        ("Assessment", &note.assessment),
        ("Plan", &note.plan),
    ] {
        out.push_str(&format!("{}\n  {body}\n\n", heading(title, color)));
    }

    let entities = &document.medical_entities;
    out.push_str(&format!(
        "{} extraction {} ({} entities), summary {}, sentiment {} ({} / {})\n",
        dim("Stages:", color),
        status_badge(entities.status, color),
        entities.entities.total(),
        status_badge(document.clinical_summary.status, color),
        status_badge(document.sentiment_and_intent.status, color),
        document.sentiment_and_intent.sentiment.label,
        document.sentiment_and_intent.intent.label,
    ));
    out.push_str(&format!(
        "{} {:.4}s at {}\n",
        dim("Processed:", color),
        document.metadata.processing_time_sec,
        document.metadata.timestamp,
    ));
    out
}

pub fn render_failure(envelope: &FailureEnvelope, color: bool) -> String {
    let label = if color {
        "Failed:".red().bold().to_string()
    } else {
        "Failed:".to_string()
    };
    match &envelope.timestamp {
        Some(ts) => format!("{label} {} ({ts})\n", envelope.error),
        None => format!("{label} {}\n", envelope.error),
    }
}

/// One block per category listing its phrases.
pub fn render_patterns(table: &PatternTable, color: bool) -> String {
    let mut out = String::new();
    for category in EntityCategory::ALL {
        let phrases = table.phrases(category);
        out.push_str(&format!(
            "{} {}\n",
            heading(category.collection_key(), color),
            dim(&format!("({})", phrases.len()), color)
        ));
        for phrase in phrases {
            out.push_str(&format!("  {phrase}\n"));
        }
    }
    out
}
