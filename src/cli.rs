//! Command-line interface for langcheck.

use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use crate::catalog::{Catalog, RawCatalog};
use crate::classify::Classifier;
use crate::collisions::detect_collisions;
use crate::diff::diff;
use crate::report::{self, FileClassification};
use crate::validate::validate;

/// Exit codes.
pub const EXIT_SUCCESS: i32 = 0;
pub const EXIT_FAILED: i32 = 1;
pub const EXIT_ERROR: i32 = 2;

/// Default catalog file names to search for.
const DEFAULT_CATALOG_NAMES: &[&str] = &["languages.yaml", "languages.yml"];

/// Language catalog quality gate.
///
/// Langcheck validates a YAML catalog of language definitions, reports
/// matcher values claimed by more than one language, classifies files
/// against the catalog, and gates release tagging on catalog diffs.
#[derive(Parser)]
#[command(name = "langcheck")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Validate a catalog's structure and ordering conventions
    #[command(visible_alias = "lint")]
    Check(CheckArgs),
    /// Report matcher values claimed by more than one language
    Conflicts(ConflictsArgs),
    /// Classify a file or directory tree against a catalog
    Classify(ClassifyArgs),
    /// Check whether a catalog change warrants a release tag
    ReleaseGate(ReleaseGateArgs),
    /// Preview each language's nerd-font glyph
    Glyphs(GlyphsArgs),
}

/// Arguments for the check command.
#[derive(Parser)]
pub struct CheckArgs {
    /// Path to the catalog YAML file
    pub catalog: PathBuf,

    /// Output format: pretty or json
    #[arg(short, long, default_value = "pretty")]
    pub format: String,
}

/// Arguments for the conflicts command.
#[derive(Parser)]
pub struct ConflictsArgs {
    /// Path to the catalog YAML file
    pub catalog: PathBuf,

    /// Output format: pretty or json
    #[arg(short, long, default_value = "pretty")]
    pub format: String,
}

/// Arguments for the classify command.
#[derive(Parser)]
pub struct ClassifyArgs {
    /// File or directory to classify
    pub path: PathBuf,

    /// Path to the catalog YAML file (default: auto-discover)
    #[arg(short, long)]
    pub catalog: Option<PathBuf>,

    /// The maximum number of bytes to read from each file
    #[arg(short = 'l', long, default_value_t = 1_048_576)]
    pub read_limit: usize,

    /// Output format: pretty or json
    #[arg(short, long, default_value = "pretty")]
    pub format: String,
}

/// Arguments for the release-gate command.
#[derive(Parser)]
pub struct ReleaseGateArgs {
    /// Catalog file before the change
    pub old: PathBuf,

    /// Catalog file after the change
    pub new: PathBuf,

    /// Output format: pretty or json
    #[arg(short, long, default_value = "pretty")]
    pub format: String,
}

/// Arguments for the glyphs command.
#[derive(Parser)]
pub struct GlyphsArgs {
    /// Path to the catalog YAML file
    pub catalog: PathBuf,
}

/// Check that a `--format` value is one we can produce.
fn check_format(format: &str) -> Result<(), i32> {
    if format == "pretty" || format == "json" {
        Ok(())
    } else {
        eprintln!(
            "Error: invalid format {:?}, must be 'pretty' or 'json'",
            format
        );
        Err(EXIT_ERROR)
    }
}

/// Discover a catalog file in the current directory.
fn discover_catalog() -> anyhow::Result<PathBuf> {
    for name in DEFAULT_CATALOG_NAMES {
        let path = PathBuf::from(name);
        if path.exists() {
            return Ok(path);
        }
    }
    anyhow::bail!(
        "no catalog file found (looked for {})",
        DEFAULT_CATALOG_NAMES.join(", ")
    )
}

/// Collect every file under a directory, skipping hidden directories.
fn collect_files(root: &Path) -> anyhow::Result<Vec<PathBuf>> {
    let mut files = Vec::new();

    for entry in WalkDir::new(root)
        .follow_links(true)
        .into_iter()
        .filter_entry(|e| {
            let name = e.file_name().to_string_lossy();
            !(e.file_type().is_dir() && name.starts_with('.'))
        })
    {
        let entry = entry?;
        if entry.file_type().is_file() {
            files.push(entry.path().to_path_buf());
        }
    }

    files.sort();
    Ok(files)
}

/// Run the check command.
pub fn run_check(args: &CheckArgs) -> anyhow::Result<i32> {
    if let Err(code) = check_format(&args.format) {
        return Ok(code);
    }

    let raw = match RawCatalog::load(&args.catalog) {
        Ok(raw) => raw,
        Err(e) => {
            eprintln!("Error: {}", e);
            return Ok(EXIT_ERROR);
        }
    };

    let errors = validate(&raw);
    let catalog_path = args.catalog.to_string_lossy();

    match args.format.as_str() {
        "json" => report::write_validation_json(&catalog_path, &errors)?,
        _ => report::write_validation_pretty(&catalog_path, &errors),
    }

    if errors.is_empty() {
        Ok(EXIT_SUCCESS)
    } else {
        Ok(EXIT_FAILED)
    }
}

/// Run the conflicts command.
pub fn run_conflicts(args: &ConflictsArgs) -> anyhow::Result<i32> {
    if let Err(code) = check_format(&args.format) {
        return Ok(code);
    }

    let catalog = match Catalog::load(&args.catalog) {
        Ok(catalog) => catalog,
        Err(e) => {
            eprintln!("Error: {}", e);
            return Ok(EXIT_ERROR);
        }
    };

    let collisions = detect_collisions(&catalog);

    match args.format.as_str() {
        "json" => report::write_collisions_json(&collisions)?,
        _ => report::write_collisions_pretty(&collisions),
    }

    if collisions.is_empty() {
        Ok(EXIT_SUCCESS)
    } else {
        Ok(EXIT_FAILED)
    }
}

/// Run the classify command.
pub fn run_classify(args: &ClassifyArgs) -> anyhow::Result<i32> {
    if let Err(code) = check_format(&args.format) {
        return Ok(code);
    }

    let catalog_path = match &args.catalog {
        Some(path) => path.clone(),
        None => match discover_catalog() {
            Ok(path) => path,
            Err(e) => {
                eprintln!("Error: {}", e);
                return Ok(EXIT_ERROR);
            }
        },
    };

    let catalog = match Catalog::load(&catalog_path) {
        Ok(catalog) => catalog,
        Err(e) => {
            eprintln!("Error: {}", e);
            return Ok(EXIT_ERROR);
        }
    };
    let classifier = match Classifier::new(&catalog) {
        Ok(classifier) => classifier,
        Err(e) => {
            eprintln!("Error: {}", e);
            return Ok(EXIT_ERROR);
        }
    };

    let metadata = match std::fs::metadata(&args.path) {
        Ok(m) => m,
        Err(e) => {
            eprintln!("Error: cannot access path {:?}: {}", args.path, e);
            return Ok(EXIT_ERROR);
        }
    };

    let mut results = Vec::new();
    if metadata.is_dir() {
        for file in collect_files(&args.path)? {
            match classifier.classify_path(&file, args.read_limit) {
                Ok(result) => {
                    results.push(FileClassification::new(
                        file.to_string_lossy().to_string(),
                        result,
                    ));
                }
                Err(e) => eprintln!("Warning: {}", e),
            }
        }
    } else {
        let result = classifier.classify_path(&args.path, args.read_limit)?;
        results.push(FileClassification::new(
            args.path.to_string_lossy().to_string(),
            result,
        ));
    }

    match args.format.as_str() {
        "json" => report::write_classifications_json(&results)?,
        _ => report::write_classifications_pretty(&results),
    }

    Ok(EXIT_SUCCESS)
}

/// Run the release-gate command.
pub fn run_release_gate(args: &ReleaseGateArgs) -> anyhow::Result<i32> {
    if let Err(code) = check_format(&args.format) {
        return Ok(code);
    }

    let old = match Catalog::load(&args.old) {
        Ok(catalog) => catalog,
        Err(e) => {
            eprintln!("Error: {}", e);
            return Ok(EXIT_ERROR);
        }
    };
    let new = match Catalog::load(&args.new) {
        Ok(catalog) => catalog,
        Err(e) => {
            eprintln!("Error: {}", e);
            return Ok(EXIT_ERROR);
        }
    };

    let diff = diff(&old, &new);

    match args.format.as_str() {
        "json" => report::write_diff_json(&diff)?,
        _ => report::write_diff_pretty(&diff),
    }

    if diff.warrants_release_tag() {
        Ok(EXIT_SUCCESS)
    } else {
        Ok(EXIT_FAILED)
    }
}

/// Run the glyphs command.
pub fn run_glyphs(args: &GlyphsArgs) -> anyhow::Result<i32> {
    let catalog = match Catalog::load(&args.catalog) {
        Ok(catalog) => catalog,
        Err(e) => {
            eprintln!("Error: {}", e);
            return Ok(EXIT_ERROR);
        }
    };

    for (name, def) in catalog.iter() {
        println!("{}: {}", name, def.nerd_font_glyph.as_deref().unwrap_or(""));
    }

    Ok(EXIT_SUCCESS)
}
