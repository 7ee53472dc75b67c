//! Markdown and JSON report generation.

use super::{ReportMetadata, SaveSummary, SavesReport, TextTimingReport};
use crate::operations::text_timing::TextTiming;
use crate::user_data::{Millis, Options, Toggle};
use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::Serialize;

/// Longest text preview shown in a Markdown table.
const PREVIEW_CHARS: usize = 40;

/// Generate the Markdown text-timing report.
pub fn generate_text_timing_markdown(report: &TextTimingReport) -> String {
    let mut output = String::new();

    output.push_str("# Text Timing Report\n\n");
    output.push_str(&generate_metadata_section(&report.metadata));

    output.push_str("## Summary\n\n");
    output.push_str(&format!("- **Texts:** {}\n", report.total));
    output.push_str(&format!("- **Stale:** {}\n\n", report.stale));

    output.push_str(&generate_timings_section(&report.entries));
    output.push_str(&generate_footer());

    output
}

/// Generate the metadata section.
fn generate_metadata_section(metadata: &ReportMetadata) -> String {
    let mut section = String::new();

    section.push_str("## Metadata\n\n");
    section.push_str(&format!("- **Source:** `{}`\n", metadata.source));
    section.push_str(&format!(
        "- **Generated:** {}\n",
        metadata.generated_at.format("%Y-%m-%d %H:%M:%S UTC")
    ));
    section.push('\n');

    section
}

/// One table per layout, in project order.
fn generate_timings_section(entries: &[TextTiming]) -> String {
    let mut section = String::new();

    section.push_str("## Texts by Layout\n\n");

    if entries.is_empty() {
        section.push_str("No text instances matched.\n\n");
        return section;
    }

    let mut current: Option<&str> = None;
    for entry in entries {
        if current != Some(entry.layout.as_str()) {
            if current.is_some() {
                section.push('\n');
            }
            section.push_str(&format!("### {}\n\n", entry.layout));
            section.push_str("| Instance | Text | Chars | Assigned | Recommended |\n");
            section.push_str("|:---|:---|:---:|:---:|:---:|\n");
            current = Some(entry.layout.as_str());
        }

        let assigned = match entry.assigned_ms {
            Some(ms) if !entry.is_stale() => format!("{}", ms),
            Some(ms) => format!("**{}**", ms),
            None => "**-**".to_string(),
        };
        section.push_str(&format!(
            "| {} | {} | {} | {} | {} |\n",
            entry.instance,
            preview(&entry.text),
            entry.chars,
            assigned,
            entry.recommended_ms
        ));
    }
    section.push('\n');

    section
}

/// First line of `text`, shortened and safe inside a table cell.
fn preview(text: &str) -> String {
    let first_line = text.lines().next().unwrap_or_default();
    let mut shown: String = first_line.chars().take(PREVIEW_CHARS).collect();
    if shown.len() < first_line.len() || text.lines().nth(1).is_some() {
        shown.push('…');
    }
    shown.replace('|', "\\|")
}

/// Generate the Markdown saved-games report.
pub fn generate_saves_markdown(report: &SavesReport) -> String {
    let mut output = String::new();

    output.push_str("# Saved Games\n\n");
    output.push_str(&generate_metadata_section(&report.metadata));
    output.push_str(&generate_options_section(&report.options));

    if report.saves.is_empty() {
        output.push_str("No saved games.\n\n");
    }
    for save in &report.saves {
        output.push_str(&generate_save_block(save));
    }

    output.push_str(&generate_footer());

    output
}

fn generate_options_section(options: &Options) -> String {
    let toggle = |t: Toggle| match t {
        Toggle::On => "on",
        Toggle::Off => "off",
    };

    let mut section = String::new();

    section.push_str("## Options\n\n");
    section.push_str("| Fullscreen | Bind Hints | Music | Effects |\n");
    section.push_str("|:---:|:---:|:---:|:---:|\n");
    section.push_str(&format!(
        "| {} | {} | {} | {} |\n\n",
        toggle(options.fullscreen),
        toggle(options.bind_hints),
        options.music_volume,
        options.effects_volume
    ));

    section
}

fn generate_save_block(save: &SaveSummary) -> String {
    let mut block = String::new();

    block.push_str(&format!("## Save {}\n\n", format_millis(save.created_at)));
    block.push_str(&format!("- **Updated:** {}\n", format_millis(save.updated_at)));
    block.push_str(&format!(
        "- **Levels:** {} played, {} completed\n",
        save.levels_played, save.levels_completed
    ));
    if let Some(ref level) = save.last_played_level {
        block.push_str(&format!("- **Last Played:** {}\n", level));
    }
    block.push_str(&format!("- **Collectables:** {}\n", join_or_none(&save.collectables)));
    block.push_str(&format!("- **Top Keys:** {}\n", join_or_none(&save.top_keys)));
    block.push_str(&format!("- **Disabled Keys:** {}\n", join_or_none(&save.disabled_keys)));
    block.push('\n');

    block
}

fn join_or_none<T: ToString>(items: &[T]) -> String {
    if items.is_empty() {
        return "none".to_string();
    }
    items.iter().map(ToString::to_string).collect::<Vec<_>>().join(", ")
}

/// Millisecond timestamps as UTC dates, or the raw number when out of range.
fn format_millis(millis: Millis) -> String {
    DateTime::<Utc>::from_timestamp_millis(millis)
        .map(|at| at.format("%Y-%m-%d %H:%M:%S UTC").to_string())
        .unwrap_or_else(|| millis.to_string())
}

/// Generate the report footer.
fn generate_footer() -> String {
    let mut footer = String::new();

    footer.push_str("---\n\n");
    footer.push_str(&format!("*Report generated by gdrefactor v{}*\n", env!("CARGO_PKG_VERSION")));

    footer
}

/// Generate a JSON report.
pub fn generate_json_report<T: Serialize>(report: &T) -> Result<String> {
    serde_json::to_string_pretty(report).map_err(Into::into)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::ReportMetadata;

    fn timing(layout: &str, instance: &str, text: &str, assigned_ms: Option<u64>) -> TextTiming {
        TextTiming {
            layout: layout.to_string(),
            instance: instance.to_string(),
            text: text.to_string(),
            chars: text.chars().filter(|c| !c.is_whitespace()).count(),
            assigned_ms,
            recommended_ms: 1500,
        }
    }

    fn create_timing_report() -> TextTimingReport {
        TextTimingReport::new(
            ReportMetadata::new("unbound.json"),
            vec![
                timing("L_1", "Hint", "Jump | run", Some(1500)),
                timing("L_1", "Title", "Go", None),
                timing("L_2", "Outro", "Bye\nfor now", Some(900)),
            ],
        )
    }

    #[test]
    fn test_generate_text_timing_markdown() {
        let markdown = generate_text_timing_markdown(&create_timing_report());

        assert!(markdown.contains("# Text Timing Report"));
        assert!(markdown.contains("## Metadata"));
        assert!(markdown.contains("`unbound.json`"));
        assert!(markdown.contains("- **Stale:** 2"));
        assert!(markdown.contains("### L_1"));
        assert!(markdown.contains("### L_2"));
        assert!(markdown.contains("| Hint | Jump \\| run | 8 | 1500 | 1500 |"));
        assert!(markdown.contains("| Title | Go | 2 | **-** | 1500 |"));
        assert!(markdown.contains("| Outro | Bye… | 9 | **900** | 1500 |"));
    }

    #[test]
    fn test_generate_text_timing_markdown_empty() {
        let report = TextTimingReport::new(ReportMetadata::new("unbound.json"), vec![]);
        let markdown = generate_text_timing_markdown(&report);
        assert!(markdown.contains("No text instances matched."));
    }

    #[test]
    fn test_preview_truncates() {
        let long = "a".repeat(60);
        let shown = preview(&long);
        assert_eq!(shown.chars().count(), PREVIEW_CHARS + 1);
        assert!(shown.ends_with('…'));
        assert_eq!(preview("short"), "short");
    }

    #[test]
    fn test_generate_saves_markdown() {
        let report = SavesReport {
            metadata: ReportMetadata::new("user_data.json"),
            options: Options::default(),
            saves: vec![SaveSummary {
                created_at: 0,
                updated_at: 86_400_000,
                levels_played: 3,
                levels_completed: 2,
                last_played_level: Some("L_three".to_string()),
                collectables: vec!["cheese".to_string()],
                top_keys: vec![37, 39],
                disabled_keys: vec![],
            }],
        };

        let markdown = generate_saves_markdown(&report);

        assert!(markdown.contains("# Saved Games"));
        assert!(markdown.contains("| on | off | 75 | 75 |"));
        assert!(markdown.contains("## Save 1970-01-01 00:00:00 UTC"));
        assert!(markdown.contains("- **Updated:** 1970-01-02 00:00:00 UTC"));
        assert!(markdown.contains("- **Levels:** 3 played, 2 completed"));
        assert!(markdown.contains("- **Last Played:** L_three"));
        assert!(markdown.contains("- **Top Keys:** 37, 39"));
        assert!(markdown.contains("- **Disabled Keys:** none"));
    }

    #[test]
    fn test_generate_json_report() {
        let json = generate_json_report(&create_timing_report()).unwrap();

        assert!(json.contains("\"metadata\""));
        assert!(json.contains("\"recommended_ms\": 1500"));
        assert!(json.contains("\"stale\": 2"));
    }
}
