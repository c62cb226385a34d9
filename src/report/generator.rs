//! Text and JSON report generation.
//!
//! The text report has a header with file totals, a brief "Failures
//! summary" section and a "Failure details" section listing the files and
//! messages behind every failure group.

use crate::models::{FailureGroup, Summary};
use anyhow::{Context, Result};
use std::fmt;
use std::iter;
use std::path::Path;

/// Options that only affect the text report.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TextOptions {
    /// Maximum number of filenames listed per group. `None` or zero lists all.
    pub file_limit: Option<usize>,
}

/// An entry of a possibly truncated list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Listed<T> {
    Item(T),
    /// Stands in for the entries removed from the middle of the list.
    Elided,
}

impl<T: fmt::Display> fmt::Display for Listed<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Listed::Item(item) => fmt::Display::fmt(item, f),
            Listed::Elided => write!(f, "..."),
        }
    }
}

/// Prefix every line of `text` with two spaces per `level`.
pub fn indent(text: &str, level: usize) -> String {
    let pad = " ".repeat(2 * level);
    text.split('\n')
        .map(|line| format!("{}{}", pad, line))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Add a line of `ch` as long as `text` below it.
pub fn underline(text: &str, ch: char) -> String {
    let rule: String = iter::repeat(ch).take(text.chars().count()).collect();
    format!("{}\n{}", text, rule)
}

/// `word` with a trailing "s" unless `n` is exactly one.
pub fn pluralise(word: &str, n: usize) -> String {
    if n == 1 {
        word.to_string()
    } else {
        format!("{}s", word)
    }
}

/// Replace the middle of `items` with a single [`Listed::Elided`] marker so
/// that at most `limit` real entries remain. The tail keeps the extra entry
/// for odd limits. A zero limit disables truncation.
pub fn truncate_list<T: Clone>(items: &[T], limit: usize) -> Vec<Listed<T>> {
    if limit == 0 || items.len() <= limit {
        return items.iter().cloned().map(Listed::Item).collect();
    }

    let head = limit / 2;
    let tail = limit - head;

    items[..head]
        .iter()
        .cloned()
        .map(Listed::Item)
        .chain(iter::once(Listed::Elided))
        .chain(items[items.len() - tail..].iter().cloned().map(Listed::Item))
        .collect()
}

/// One line per failure group for the summary section.
fn brief_text(group: &FailureGroup, _options: &TextOptions) -> String {
    format!(
        "- {}: {} {}",
        group.name,
        group.count,
        pluralise("file", group.count)
    )
}

/// Failure group with its filenames and messages for the details section.
fn detailed_text(group: &FailureGroup, options: &TextOptions) -> String {
    let mut lines = vec![format!(
        "- {}: ({} {})",
        group.name,
        group.count,
        pluralise("file", group.count)
    )];

    lines.push(indent("Filenames:", 1));
    for entry in truncate_list(&group.files, options.file_limit.unwrap_or(0)) {
        lines.push(indent(&entry.to_string(), 2));
    }

    if !group.messages.is_empty() {
        lines.push(indent("Messages:", 1));
        for message in &group.messages {
            lines.push(indent(
                &format!(
                    "{} ({} {})",
                    message.text,
                    message.count,
                    pluralise("file", message.count)
                ),
                2,
            ));
        }
    }

    lines.join("\n")
}

/// Generate the human readable text report.
pub fn generate_text_report(summary: &Summary, options: &TextOptions) -> String {
    let mut lines = Vec::new();

    lines.push(format!("Files scanned: {}", summary.file_count));
    lines.push(format!(
        "Number of files with no errors: {}",
        summary.clean_file_count
    ));
    lines.push(String::new());

    let sections: [(&str, fn(&FailureGroup, &TextOptions) -> String); 2] = [
        ("Failures summary", brief_text),
        ("Failure details", detailed_text),
    ];

    for (section_name, render) in sections {
        lines.push(underline(section_name, '='));
        lines.push(String::new());

        for (tier, checks) in &summary.summary {
            lines.push(underline(&format!("{}:", tier.label()), '-'));

            for (check_name, groups) in checks {
                lines.push(indent(&format!("- {}:", check_name), 1));
                for group in groups {
                    lines.push(indent(&render(group, options), 2));
                }
                lines.push(String::new());
            }
        }
    }

    lines.join("\n").trim().to_string()
}

/// Generate the machine readable JSON report.
pub fn generate_json_report(summary: &Summary) -> Result<String> {
    serde_json::to_string_pretty(summary).map_err(Into::into)
}

/// Write rendered report content to a file.
pub fn write_report(content: &str, path: &Path) -> Result<()> {
    std::fs::write(path, content)
        .with_context(|| format!("Failed to write report to {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::summarise_json;
    use crate::models::MessageGroup;

    const TWO_FILES: &str = r#"{
        "file1.nc": {"check_name": {
            "high_priorities": [{"name": "high p error", "msgs": ["h1", "h2"], "value": [4, 5]}],
            "medium_priorities": [],
            "low_priorities": []
        }},
        "file2.nc": {"check_name": {
            "high_priorities": [{"name": "high p error", "msgs": ["h1", "h3"], "value": [4, 5]}],
            "medium_priorities": [],
            "low_priorities": []
        }}
    }"#;

    fn group_with_files(n: usize) -> FailureGroup {
        FailureGroup {
            name: "missing attr".to_string(),
            count: n,
            files: (1..=n).map(|i| format!("f{}.nc", i)).collect(),
            messages: vec![],
        }
    }

    #[test]
    fn test_indent() {
        assert_eq!(indent("hello\nthere", 2), "    hello\n    there");
        assert_eq!(indent("x", 0), "x");
    }

    #[test]
    fn test_underline() {
        assert_eq!(underline("some text", '@'), "some text\n@@@@@@@@@");
    }

    #[test]
    fn test_pluralise() {
        assert_eq!(pluralise("file", 0), "files");
        assert_eq!(pluralise("file", 1), "file");
        assert_eq!(pluralise("file", 2), "files");
    }

    #[test]
    fn test_truncate_list() {
        use Listed::{Elided, Item};

        assert_eq!(truncate_list(&[1, 2, 3], 5), vec![Item(1), Item(2), Item(3)]);
        assert_eq!(truncate_list(&[1, 2, 3], 1), vec![Elided, Item(3)]);
        assert_eq!(
            truncate_list(&[1, 2, 3, 4, 5, 6], 3),
            vec![Item(1), Elided, Item(5), Item(6)]
        );
        assert_eq!(
            truncate_list(&[1, 2, 3, 4, 5, 6], 4),
            vec![Item(1), Item(2), Elided, Item(5), Item(6)]
        );
        assert_eq!(truncate_list(&[1, 2, 3, 4], 0).len(), 4);
        assert_eq!(truncate_list(&[1, 2, 3], 3).len(), 3);
    }

    #[test]
    fn test_text_report_layout() {
        let summary = summarise_json(TWO_FILES).unwrap();
        let text = generate_text_report(&summary, &TextOptions::default());

        let expected = "\
Files scanned: 2
Number of files with no errors: 0

Failures summary
================

HIGH:
-----
  - check_name:
    - high p error: 2 files

Failure details
===============

HIGH:
-----
  - check_name:
    - high p error: (2 files)
      Filenames:
        file1.nc
        file2.nc
      Messages:
        h1 (2 files)
        h2 (1 file)
        h3 (1 file)";

        assert_eq!(text, expected);
    }

    #[test]
    fn test_text_report_without_failures() {
        let summary = Summary {
            file_count: 3,
            clean_file_count: 3,
            ..Default::default()
        };
        let text = generate_text_report(&summary, &TextOptions::default());

        assert!(text.starts_with("Files scanned: 3\nNumber of files with no errors: 3"));
        assert!(text.contains("Failures summary\n================"));
        assert!(text.ends_with("Failure details\n==============="));
        assert!(!text.contains("HIGH:"));
    }

    #[test]
    fn test_detailed_text_truncates_filenames() {
        let options = TextOptions {
            file_limit: Some(3),
        };
        let text = detailed_text(&group_with_files(6), &options);

        assert_eq!(
            text,
            "- missing attr: (6 files)\n  Filenames:\n    f1.nc\n    ...\n    f5.nc\n    f6.nc"
        );
    }

    #[test]
    fn test_detailed_text_indents_multiline_messages() {
        let mut group = group_with_files(1);
        group.messages.push(MessageGroup {
            text: "first line\nsecond line".to_string(),
            count: 1,
            files: vec!["f1.nc".to_string()],
        });

        let text = detailed_text(&group, &TextOptions::default());

        assert!(text.ends_with("  Messages:\n    first line\n    second line (1 file)"));
    }

    #[test]
    fn test_brief_text() {
        assert_eq!(
            brief_text(&group_with_files(1), &TextOptions::default()),
            "- missing attr: 1 file"
        );
    }

    #[test]
    fn test_generate_json_report() {
        let summary = summarise_json(TWO_FILES).unwrap();
        let json = generate_json_report(&summary).unwrap();

        assert!(json.contains("\"file_count\": 2"));
        assert!(json.contains("\"clean_file_count\": 0"));
        assert!(json.contains("\"high_priorities\""));
        assert!(json.contains("\"messages\""));
        assert_eq!(json, generate_json_report(&summary).unwrap());
    }

    #[test]
    fn test_write_report() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("summary.json");

        write_report("{}", &path).unwrap();

        assert_eq!(std::fs::read_to_string(&path).unwrap(), "{}");
    }
}
