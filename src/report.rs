//! Output formatting for langcheck results.
//!
//! Supports two output formats:
//! - Pretty: colored terminal output for human readability
//! - JSON: structured output for programmatic consumption
//!
//! Validator diagnostics go to stderr, one line per finding, so stdout
//! stays clean for tool wrappers.

use colored::*;
use serde::Serialize;
use std::collections::BTreeMap;

use crate::classify::Classification;
use crate::collisions::CollisionReport;
use crate::diff::CatalogDiff;
use crate::validate::ValidationError;

// =============================================================================
// Validation
// =============================================================================

/// JSON report for the `check` command.
#[derive(Serialize)]
pub struct ValidationReport<'a> {
    pub catalog: &'a str,
    pub passed: bool,
    pub errors: &'a [ValidationError],
}

/// Write validation diagnostics in pretty format.
///
/// A clean catalog prints nothing; the exit code is the signal.
pub fn write_validation_pretty(catalog_path: &str, errors: &[ValidationError]) {
    for error in errors {
        eprintln!("{}", error);
    }
    if !errors.is_empty() {
        let plural = if errors.len() != 1 { "s" } else { "" };
        eprintln!(
            "{} {}: {} problem{}",
            "✗".red(),
            catalog_path,
            errors.len(),
            plural
        );
    }
}

/// Write validation diagnostics in JSON format.
pub fn write_validation_json(catalog_path: &str, errors: &[ValidationError]) -> anyhow::Result<()> {
    let report = ValidationReport {
        catalog: catalog_path,
        passed: errors.is_empty(),
        errors,
    };
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}

// =============================================================================
// Collisions
// =============================================================================

/// Write the collision report in pretty format, one line per collision.
pub fn write_collisions_pretty(report: &CollisionReport) {
    for collision in report.iter() {
        println!("{}", collision);
    }
}

/// Write the collision report in JSON format.
pub fn write_collisions_json(report: &CollisionReport) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(report)?);
    Ok(())
}

// =============================================================================
// Classification
// =============================================================================

/// One classified file, for JSON output.
#[derive(Serialize)]
pub struct FileClassification {
    pub path: String,
    pub status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub candidates: Vec<String>,
}

impl FileClassification {
    pub fn new(path: String, result: Classification) -> Self {
        match result {
            Classification::Match(language) => Self {
                path,
                status: "match",
                language: Some(language),
                candidates: Vec::new(),
            },
            Classification::Ambiguous(candidates) => Self {
                path,
                status: "ambiguous",
                language: None,
                candidates,
            },
            Classification::NoMatch => Self {
                path,
                status: "no-match",
                language: None,
                candidates: Vec::new(),
            },
        }
    }
}

/// Write classification results in pretty format.
///
/// One line per file, plus a per-language tally when more than one file
/// was classified.
pub fn write_classifications_pretty(files: &[FileClassification]) {
    for file in files {
        match file.status {
            "match" => {
                let language = file.language.as_deref().unwrap_or_default();
                println!("{}: {}", file.path, language.green());
            }
            "ambiguous" => {
                println!(
                    "{}: {} ({})",
                    file.path,
                    "ambiguous".yellow(),
                    file.candidates.join(", ")
                );
            }
            _ => println!("{}: {}", file.path, "no match".dimmed()),
        }
    }

    if files.len() > 1 {
        println!();
        for (language, count) in language_tally(files) {
            let plural = if count != 1 { "s" } else { "" };
            println!("{:<24} {} file{}", language, count, plural);
        }
    }
}

/// Count classified files per language, name-sorted.
fn language_tally(files: &[FileClassification]) -> BTreeMap<&str, usize> {
    let mut tally = BTreeMap::new();
    for file in files {
        if let Some(language) = file.language.as_deref() {
            *tally.entry(language).or_insert(0) += 1;
        }
    }
    tally
}

/// Write classification results in JSON format.
pub fn write_classifications_json(files: &[FileClassification]) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(files)?);
    Ok(())
}

// =============================================================================
// Release gate
// =============================================================================

/// Write the catalog diff in pretty format.
pub fn write_diff_pretty(diff: &CatalogDiff) {
    for name in &diff.added {
        println!("{} {}", "added:".green(), name);
    }
    for name in &diff.removed {
        println!("{} {}", "removed:".red(), name);
    }
    if diff.warrants_release_tag() {
        println!("{}", "exactly one language added, tag warranted".green());
    } else {
        println!("{}", "no tag warranted".dimmed());
    }
}

/// Write the catalog diff in JSON format.
pub fn write_diff_json(diff: &CatalogDiff) -> anyhow::Result<()> {
    #[derive(Serialize)]
    struct DiffReport<'a> {
        #[serde(flatten)]
        diff: &'a CatalogDiff,
        tag: bool,
    }
    let report = DiffReport {
        diff,
        tag: diff.warrants_release_tag(),
    };
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_classification_shapes() {
        let m = FileClassification::new("a.rs".into(), Classification::Match("Rust".into()));
        assert_eq!(m.status, "match");
        assert_eq!(m.language.as_deref(), Some("Rust"));

        let a = FileClassification::new(
            "x.cake".into(),
            Classification::Ambiguous(vec!["A".into(), "B".into()]),
        );
        assert_eq!(a.status, "ambiguous");
        assert_eq!(a.candidates.len(), 2);

        let n = FileClassification::new("blob".into(), Classification::NoMatch);
        assert_eq!(n.status, "no-match");
        assert!(n.language.is_none());
    }

    #[test]
    fn test_language_tally_counts_matches_only() {
        let files = vec![
            FileClassification::new("a.rs".into(), Classification::Match("Rust".into())),
            FileClassification::new("b.rs".into(), Classification::Match("Rust".into())),
            FileClassification::new("c.py".into(), Classification::Match("Python".into())),
            FileClassification::new("blob".into(), Classification::NoMatch),
        ];
        let tally = language_tally(&files);
        assert_eq!(tally.get("Rust"), Some(&2));
        assert_eq!(tally.get("Python"), Some(&1));
        assert_eq!(tally.len(), 2);
    }
}
