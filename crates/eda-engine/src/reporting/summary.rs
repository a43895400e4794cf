//! Plain-text rendering of an analysis result.

use crate::types::{AnalysisResult, ColumnSummary};
use std::fmt::Write;

const RULE_WIDTH: usize = 80;

/// Render the overview, column table, flags, correlations and ranked
/// recommendations as terminal text.
pub fn render_summary(result: &AnalysisResult) -> String {
    let mut out = String::new();
    // Writing to a String cannot fail
    let _ = write_summary(&mut out, result);
    out
}

fn write_summary(out: &mut String, result: &AnalysisResult) -> std::fmt::Result {
    let overview = result.overview();

    writeln!(out, "{}", "=".repeat(RULE_WIDTH))?;
    writeln!(out, "EXPLORATORY DATA ANALYSIS")?;
    writeln!(out, "{}", "=".repeat(RULE_WIDTH))?;
    writeln!(out)?;

    section(out, "DATASET OVERVIEW")?;
    writeln!(out, "  Rows: {}", overview.rows)?;
    writeln!(out, "  Columns: {}", overview.columns)?;
    writeln!(
        out,
        "  Missing cells: {} of {} ({:.2}%)",
        overview.missing_cells, overview.total_cells, overview.missing_percentage
    )?;
    writeln!(
        out,
        "  Duplicate rows: {} ({:.2}%)",
        overview.duplicate_rows, overview.duplicate_percentage
    )?;
    writeln!(out)?;

    section(out, "COLUMN PROFILES")?;
    writeln!(
        out,
        "{:<20} {:<22} {:<10} {:<8} {}",
        "Column", "Type", "Missing %", "Unique", "Summary"
    )?;
    writeln!(out, "{}", "-".repeat(RULE_WIDTH))?;
    for profile in result.profiles() {
        writeln!(
            out,
            "{:<20} {:<22} {:<10.1} {:<8} {}",
            truncate_str(&profile.name, 19),
            profile.semantic_type.display_name(),
            profile.null_percentage,
            profile.unique_count,
            describe(&profile.summary)
        )?;
    }
    writeln!(out)?;

    section(out, "HEALTH FLAGS")?;
    if result.flags().is_empty() {
        writeln!(out, "  No issues detected")?;
    }
    for flag in result.flags() {
        writeln!(
            out,
            "  - [{:?}] {} ({}): {}",
            flag.severity,
            flag.kind.display_name(),
            flag.column.as_deref().unwrap_or("dataset"),
            flag.detail
        )?;
    }
    writeln!(out)?;

    let correlation = result.correlation();
    if correlation.columns.len() > 1 {
        section(out, "CORRELATIONS")?;
        for (i, a) in correlation.columns.iter().enumerate() {
            for (j, b) in correlation.columns.iter().enumerate().skip(i + 1) {
                match correlation.values[i][j] {
                    Some(r) => writeln!(out, "  {a} ~ {b}: {r:+.3}")?,
                    None => writeln!(out, "  {a} ~ {b}: undefined")?,
                }
            }
        }
        writeln!(out)?;
    }

    section(out, "RECOMMENDATIONS")?;
    if result.recommendations().is_empty() {
        writeln!(out, "  Nothing to suggest")?;
    }
    for (rank, rec) in result.recommendations().iter().enumerate() {
        writeln!(
            out,
            "  {}. [{:?}] {} -> {}: {}",
            rank + 1,
            rec.severity,
            rec.column,
            rec.technique.display_name(),
            rec.rationale
        )?;
    }

    Ok(())
}

fn section(out: &mut String, title: &str) -> std::fmt::Result {
    writeln!(out, "{title}")?;
    writeln!(out, "{}", "-".repeat(40))
}

fn describe(summary: &ColumnSummary) -> String {
    match summary {
        ColumnSummary::Numeric(s) => format!(
            "mean={:.2} median={:.2} std={:.2} range=[{:.2}, {:.2}]",
            s.mean, s.median, s.std_dev, s.min, s.max
        ),
        ColumnSummary::Categorical(table) => match table.most_frequent() {
            Some(top) => format!("top='{}' ({})", top.value, top.count),
            None => String::new(),
        },
        ColumnSummary::Datetime(s) => format!(
            "{} .. {}",
            s.earliest.as_deref().unwrap_or("?"),
            s.latest.as_deref().unwrap_or("?")
        ),
        ColumnSummary::Constant { value } => {
            format!("value={}", value.as_deref().unwrap_or("null"))
        }
        ColumnSummary::Empty => String::new(),
    }
}

/// Truncate a string to max length, adding "..." if truncated.
fn truncate_str(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{kept}...")
    }
}
