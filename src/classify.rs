//! File classification against a catalog.
//!
//! The classifier resolves a candidate file to a single language where the
//! catalog allows it, and makes the two failure shapes explicit: a file no
//! language claims is `NoMatch`, a file several languages still claim after
//! heuristics and priority is `Ambiguous`. Neither is silently collapsed to
//! a first match.

use once_cell::sync::Lazy;
use regex::{Regex, RegexSet};
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

use crate::catalog::{Catalog, CatalogError};

/// Longest shebang line considered when extracting an interpreter.
const MAX_SHEBANG_LENGTH: usize = 50;

/// The outcome of classifying one candidate file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Classification {
    /// Exactly one language claimed the candidate.
    Match(String),
    /// More than one language survived heuristics and priority.
    /// Carries the surviving names in catalog order.
    Ambiguous(Vec<String>),
    /// No language claimed the candidate.
    NoMatch,
}

/// A candidate file: any subset of path, interpreter name, and content.
#[derive(Debug, Clone, Default)]
pub struct Candidate<'a> {
    path: Option<&'a Path>,
    interpreter: Option<&'a str>,
    content: Option<&'a [u8]>,
}

impl<'a> Candidate<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_path(mut self, path: &'a Path) -> Self {
        self.path = Some(path);
        self
    }

    /// Supply the interpreter name directly instead of extracting it from
    /// a shebang line in the content.
    pub fn with_interpreter(mut self, interpreter: &'a str) -> Self {
        self.interpreter = Some(interpreter);
        self
    }

    pub fn with_content(mut self, content: &'a [u8]) -> Self {
        self.content = Some(content);
        self
    }

    /// The candidate's basename, when a path was supplied.
    fn filename(&self) -> Option<&str> {
        self.path?.file_name()?.to_str()
    }

    /// The candidate's extension including the leading separator.
    fn extension(&self) -> Option<String> {
        let ext = self.path?.extension()?.to_str()?;
        Some(format!(".{}", ext))
    }
}

/// Per-language matcher state, compiled once from a definition.
#[derive(Debug)]
struct LanguageEntry {
    name: String,
    extensions: Vec<String>,
    filenames: Vec<String>,
    interpreters: Vec<String>,
    patterns: RegexSet,
    heuristics: RegexSet,
    priority: u8,
}

/// Classifies candidate files against a catalog.
///
/// Compiles every language's content patterns and heuristics up front so
/// per-candidate classification is allocation-light and read-only; one
/// classifier can serve any number of candidates.
#[derive(Debug)]
pub struct Classifier {
    languages: Vec<LanguageEntry>,
}

impl Classifier {
    /// Compile a classifier from a catalog.
    pub fn new(catalog: &Catalog) -> Result<Self, CatalogError> {
        let languages = catalog
            .iter()
            .map(|(name, def)| {
                let patterns = RegexSet::new(&def.matchers.patterns).map_err(|e| {
                    CatalogError::InvalidRegex {
                        language: name.to_string(),
                        source: e,
                    }
                })?;
                let heuristics =
                    RegexSet::new(&def.heuristics).map_err(|e| CatalogError::InvalidRegex {
                        language: name.to_string(),
                        source: e,
                    })?;
                Ok(LanguageEntry {
                    name: name.to_string(),
                    extensions: def.matchers.extensions.clone(),
                    filenames: def.matchers.filenames.clone(),
                    interpreters: def.matchers.interpreters.clone(),
                    patterns,
                    heuristics,
                    priority: def.priority(),
                })
            })
            .collect::<Result<_, CatalogError>>()?;
        Ok(Self { languages })
    }

    /// Classify a candidate.
    ///
    /// At most `read_limit` bytes of content are consulted for shebang,
    /// pattern, and heuristic matching.
    pub fn classify(&self, candidate: &Candidate, read_limit: usize) -> Classification {
        let content = candidate
            .content
            .map(|c| &c[..c.len().min(read_limit)]);
        let interpreter = candidate
            .interpreter
            .map(str::to_string)
            .or_else(|| content.and_then(shebang_interpreter));
        let filename = candidate.filename();
        let extension = candidate.extension();

        // Literal matcher pass: filename, extension, and interpreter
        // evidence. An exact filename is stronger evidence than a shared
        // extension, so filename hits discard extension-only candidates.
        let mut hits: Vec<Hit> = self
            .languages
            .iter()
            .enumerate()
            .filter_map(|(index, lang)| {
                let by_filename = filename
                    .map(|f| lang.filenames.iter().any(|n| n == f))
                    .unwrap_or(false);
                let by_extension = extension
                    .as_deref()
                    .map(|e| lang.extensions.iter().any(|x| x == e))
                    .unwrap_or(false);
                let by_interpreter = interpreter
                    .as_deref()
                    .map(|i| lang.interpreters.iter().any(|x| x == i))
                    .unwrap_or(false);
                (by_filename || by_extension || by_interpreter).then_some(Hit {
                    index,
                    by_filename,
                    by_interpreter,
                })
            })
            .collect();
        if hits.iter().any(|h| h.by_filename) {
            hits.retain(|h| h.by_filename || h.by_interpreter);
        }
        let mut candidates: Vec<usize> = hits.into_iter().map(|h| h.index).collect();

        let text = content.map(|c| std::str::from_utf8(c).unwrap_or_default());

        // Content pattern pass, only when no literal matcher claimed the file
        if candidates.is_empty() {
            if let Some(text) = text {
                candidates = self
                    .languages
                    .iter()
                    .enumerate()
                    .filter(|(_, lang)| lang.patterns.is_match(text))
                    .map(|(index, _)| index)
                    .collect();
            }
        }

        match candidates.len() {
            0 => return Classification::NoMatch,
            1 => return Classification::Match(self.languages[candidates[0]].name.clone()),
            _ => {}
        }

        // Heuristic narrowing: any one matching heuristic keeps a
        // candidate. When nothing matches, the set passes through.
        if let Some(text) = text {
            let narrowed: Vec<usize> = candidates
                .iter()
                .copied()
                .filter(|&index| self.languages[index].heuristics.is_match(text))
                .collect();
            if !narrowed.is_empty() {
                candidates = narrowed;
            }
            if candidates.len() == 1 {
                return Classification::Match(self.languages[candidates[0]].name.clone());
            }
        }

        // Priority tiebreak: a unique maximum wins, the rest is ambiguous.
        let top = candidates
            .iter()
            .map(|&index| self.languages[index].priority)
            .max()
            .unwrap_or_default();
        let winners: Vec<&LanguageEntry> = candidates
            .iter()
            .map(|&index| &self.languages[index])
            .filter(|lang| lang.priority == top)
            .collect();
        if winners.len() == 1 {
            Classification::Match(winners[0].name.clone())
        } else {
            Classification::Ambiguous(winners.iter().map(|lang| lang.name.clone()).collect())
        }
    }

    /// Classify a file on disk, reading at most `read_limit` bytes.
    pub fn classify_path(
        &self,
        path: &Path,
        read_limit: usize,
    ) -> Result<Classification, CatalogError> {
        let mut content = Vec::new();
        File::open(path)
            .and_then(|file| file.take(read_limit as u64).read_to_end(&mut content))
            .map_err(|e| CatalogError::Io {
                path: PathBuf::from(path),
                source: e,
            })?;
        let candidate = Candidate::new().with_path(path).with_content(&content);
        Ok(self.classify(&candidate, read_limit))
    }
}

struct Hit {
    index: usize,
    by_filename: bool,
    by_interpreter: bool,
}

/// Extract the interpreter name from a shebang first line, if any.
///
/// Handles `/bin`, `/usr/bin`, and `/usr/local/bin` prefixes with an
/// optional `env` indirection. Reads at most the first 50 bytes of the
/// line.
fn shebang_interpreter(content: &[u8]) -> Option<String> {
    let first_line = content.split(|&c| c == b'\n').next().unwrap_or_default();
    if first_line.len() < 2 || first_line[0] != b'#' || first_line[1] != b'!' {
        return None;
    }
    let first_line = &first_line[..first_line.len().min(MAX_SHEBANG_LENGTH)];
    let first_line = String::from_utf8_lossy(first_line);
    let first_line = first_line.trim_end();
    static RE: Lazy<Regex> = Lazy::new(|| {
        Regex::new(r"^#!(?:/usr(?:/local)?)?/bin/(?:env\s+)?([\w\d]+)\r?$").unwrap()
    });
    RE.captures(first_line)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().to_string())
}
