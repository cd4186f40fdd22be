//! Markdown report generation.
//!
//! This module generates Markdown and JSON workout reports from
//! the aggregated results.

use crate::analysis::generate_summary_text;
use crate::models::{
    format_weight, DateLookup, ExerciseSeries, PersonalBest, RepTotal, ReportMetadata,
    SessionDetail, WorkoutReport, DISPLAY_DATE_FORMAT,
};
use anyhow::Result;
use std::io::Write;
use std::path::Path;

/// Message shown when a looked-up day has no sessions.
pub const NO_WORKOUT_MESSAGE: &str = "No workout recorded on this date.";

/// Generate a complete Markdown report.
pub fn generate_markdown_report(report: &WorkoutReport) -> String {
    let unit = report.metadata.weight_unit.as_str();
    let mut output = String::new();

    // Title
    output.push_str("# Training Log Report\n\n");

    output.push_str(&generate_metadata_section(&report.metadata));
    output.push_str(&generate_table_of_contents(report));
    output.push_str(&generate_reps_section(&report.total_reps));
    output.push_str(&generate_personal_bests_section(&report.personal_bests, unit));
    output.push_str(&generate_progress_section(&report.series, unit));

    if let Some(ref lookup) = report.lookup {
        output.push_str(&generate_lookup_section(lookup, unit));
    }

    output.push_str(&generate_footer());

    output
}

/// Generate the metadata section.
fn generate_metadata_section(metadata: &ReportMetadata) -> String {
    let mut section = String::new();

    section.push_str("## Metadata\n\n");
    section.push_str(&format!("- **Source:** {}\n", metadata.source));
    section.push_str(&format!(
        "- **Generated:** {}\n",
        metadata.generated_at.format("%Y-%m-%d %H:%M:%S UTC")
    ));
    section.push_str(&format!("- **Records Loaded:** {}\n", metadata.load.loaded));
    if metadata.load.rejected > 0 {
        section.push_str(&format!(
            "- **Rows Skipped (bad date or exercise):** {}\n",
            metadata.load.rejected
        ));
    }
    if metadata.records_excluded > 0 {
        section.push_str(&format!(
            "- **Records Excluded:** {}\n",
            metadata.records_excluded
        ));
    }
    if let (Some(first), Some(last)) = (metadata.first_date, metadata.last_date) {
        section.push_str(&format!(
            "- **Period:** {} to {}\n",
            first.format(DISPLAY_DATE_FORMAT),
            last.format(DISPLAY_DATE_FORMAT)
        ));
    }
    if !metadata.excluded_exercises.is_empty() {
        section.push_str(&format!(
            "- **Excluded Exercises:** {}\n",
            metadata.excluded_exercises.join(", ")
        ));
    }
    section.push('\n');

    section
}

/// Generate the table of contents.
fn generate_table_of_contents(report: &WorkoutReport) -> String {
    let mut toc = String::new();

    toc.push_str("## Table of Contents\n\n");
    toc.push_str("- [Metadata](#metadata)\n");
    toc.push_str("- [Total Reps](#total-reps)\n");
    toc.push_str("- [Personal Bests](#personal-bests)\n");
    toc.push_str("- [Progress](#progress)\n");
    if report.lookup.is_some() {
        toc.push_str("- [Workout Log](#workout-log)\n");
    }
    toc.push('\n');

    toc
}

/// Generate the total reps table.
fn generate_reps_section(totals: &[RepTotal]) -> String {
    let mut section = String::new();

    section.push_str("## Total Reps\n\n");
    if totals.is_empty() {
        section.push_str("No exercises logged.\n\n");
        return section;
    }

    section.push_str("| Exercise | Total Reps |\n");
    section.push_str("|:---|---:|\n");
    for total in totals {
        section.push_str(&format!(
            "| {} | {} |\n",
            escape_cell(&total.exercise),
            total.total
        ));
    }
    section.push('\n');

    section
}

/// Generate the personal bests table.
fn generate_personal_bests_section(bests: &[PersonalBest], unit: &str) -> String {
    let mut section = String::new();

    section.push_str("## Personal Bests\n\n");
    if bests.is_empty() {
        section.push_str("No weighted sessions logged yet.\n\n");
        return section;
    }

    section.push_str(&format!("| Exercise | Weight ({}) | Date |\n", unit));
    section.push_str("|:---|---:|:---:|\n");
    for best in bests {
        section.push_str(&format!(
            "| {} | {} | {} |\n",
            escape_cell(&best.exercise),
            format_weight(best.weight),
            best.date.format(DISPLAY_DATE_FORMAT)
        ));
    }
    section.push('\n');

    section
}

/// Generate the per-exercise progress table.
fn generate_progress_section(series: &[ExerciseSeries], unit: &str) -> String {
    let mut section = String::new();

    section.push_str("## Progress\n\n");
    if series.is_empty() {
        section.push_str("Nothing to chart.\n\n");
        return section;
    }

    section.push_str("| Exercise | Sessions | First | Latest | Change |\n");
    section.push_str("|:---|:---:|---:|---:|---:|\n");
    for s in series {
        let first = s.first_weight().unwrap_or(0.0);
        let last = s.last_weight().unwrap_or(0.0);
        let change = s.change().unwrap_or(0.0);
        let sign = if change > 0.0 { "+" } else { "" };
        section.push_str(&format!(
            "| {} | {} | {}{} | {}{} | {}{}{} |\n",
            escape_cell(&s.name),
            s.points.len(),
            format_weight(first),
            unit,
            format_weight(last),
            unit,
            sign,
            format_weight(change),
            unit
        ));
    }
    section.push('\n');

    section
}

/// Escape pipes so a name can't split a table row.
fn escape_cell(text: &str) -> String {
    text.replace('|', "\\|")
}

/// Generate the date lookup section.
fn generate_lookup_section(lookup: &DateLookup, unit: &str) -> String {
    let mut section = String::new();

    section.push_str(&format!("## Workout Log\n\n**Date:** {}\n\n", lookup.date));

    if lookup.is_empty() {
        section.push_str(NO_WORKOUT_MESSAGE);
        section.push_str("\n\n");
        return section;
    }

    for session in &lookup.sessions {
        section.push_str(&generate_session_block(session, unit));
    }

    section
}

/// Generate a single session block.
fn generate_session_block(session: &SessionDetail, unit: &str) -> String {
    let mut block = String::new();

    block.push_str(&format!("### {}\n\n", session.exercise));
    block.push_str(&format!("- Warm-ups: {}\n", session.warmups_line(unit)));
    block.push_str(&format!("- Sets: {}\n", session.sets_line(unit)));
    block.push_str(&format!("- Notes: {}\n\n", session.notes));

    block
}

/// Plain-text rendering of a date lookup for the console.
pub fn generate_lookup_text(lookup: &DateLookup, unit: &str) -> String {
    if lookup.is_empty() {
        return NO_WORKOUT_MESSAGE.to_string();
    }

    lookup
        .sessions
        .iter()
        .map(|s| {
            format!(
                "{}\n  Warm-ups: {}\n  Sets: {}\n  Notes: {}",
                s.exercise,
                s.warmups_line(unit),
                s.sets_line(unit),
                s.notes
            )
        })
        .collect::<Vec<_>>()
        .join("\n\n")
}

/// Plain-text summary of the tables for the console.
pub fn generate_console_summary(report: &WorkoutReport) -> String {
    generate_summary_text(
        &report.total_reps,
        &report.personal_bests,
        &report.metadata.weight_unit,
    )
}

/// Generate the report footer.
fn generate_footer() -> String {
    let mut footer = String::new();

    footer.push_str("---\n\n");
    footer.push_str("*Report generated by LiftLog*\n");

    footer
}

/// Write a Markdown report to a file.
pub fn write_report(report: &WorkoutReport, path: &Path) -> Result<()> {
    let content = generate_markdown_report(report);

    let mut file = std::fs::File::create(path)?;
    file.write_all(content.as_bytes())?;

    Ok(())
}

/// Generate a JSON report.
pub fn generate_json_report(report: &WorkoutReport) -> Result<String> {
    serde_json::to_string_pretty(report).map_err(Into::into)
}
