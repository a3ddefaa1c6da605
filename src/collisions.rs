//! Matcher collision detection across a catalog.
//!
//! A collision is a literal matcher value (extension, filename, or
//! interpreter) claimed by more than one language that has no heuristic to
//! break the tie. Languages that declare heuristics are assumed to resolve
//! their own ambiguity at classification time and are skipped entirely.
//! Pattern matchers are free-form regexes and are not compared.

use serde::Serialize;

use crate::catalog::Catalog;

/// The matcher kind a collision was found in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MatcherKind {
    Extension,
    Filename,
    Interpreter,
}

impl std::fmt::Display for MatcherKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MatcherKind::Extension => write!(f, "Extension"),
            MatcherKind::Filename => write!(f, "Filename"),
            MatcherKind::Interpreter => write!(f, "Interpreter"),
        }
    }
}

/// One matcher value claimed by more than one language.
#[derive(Debug, Clone, Serialize)]
pub struct Collision {
    pub kind: MatcherKind,
    pub value: String,
    /// Owning languages, in catalog encounter order.
    pub languages: Vec<String>,
}

impl std::fmt::Display for Collision {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} {} is used by {}",
            self.kind,
            self.value,
            self.languages.join(", ")
        )
    }
}

/// All collisions found in a catalog, grouped by matcher kind.
#[derive(Debug, Clone, Default, Serialize)]
pub struct CollisionReport {
    pub extensions: Vec<Collision>,
    pub filenames: Vec<Collision>,
    pub interpreters: Vec<Collision>,
}

impl CollisionReport {
    pub fn is_empty(&self) -> bool {
        self.extensions.is_empty() && self.filenames.is_empty() && self.interpreters.is_empty()
    }

    pub fn len(&self) -> usize {
        self.extensions.len() + self.filenames.len() + self.interpreters.len()
    }

    /// Iterate every collision, extensions first.
    pub fn iter(&self) -> impl Iterator<Item = &Collision> {
        self.extensions
            .iter()
            .chain(self.filenames.iter())
            .chain(self.interpreters.iter())
    }
}

/// Value -> owning languages, preserving first-encounter order of values.
#[derive(Default)]
struct Ownership {
    entries: Vec<(String, Vec<String>)>,
}

impl Ownership {
    fn claim(&mut self, value: &str, language: &str) {
        match self.entries.iter_mut().find(|(v, _)| v == value) {
            Some((_, owners)) => owners.push(language.to_string()),
            None => self
                .entries
                .push((value.to_string(), vec![language.to_string()])),
        }
    }

    fn collisions(self, kind: MatcherKind) -> Vec<Collision> {
        self.entries
            .into_iter()
            .filter(|(_, owners)| owners.len() > 1)
            .map(|(value, languages)| Collision {
                kind,
                value,
                languages,
            })
            .collect()
    }
}

/// Find every matcher value claimed by more than one heuristic-less language.
pub fn detect_collisions(catalog: &Catalog) -> CollisionReport {
    let mut extensions = Ownership::default();
    let mut filenames = Ownership::default();
    let mut interpreters = Ownership::default();

    for (name, def) in catalog.iter() {
        if def.has_heuristics() {
            continue;
        }
        for ext in &def.matchers.extensions {
            extensions.claim(ext, name);
        }
        for filename in &def.matchers.filenames {
            filenames.claim(filename, name);
        }
        for interpreter in &def.matchers.interpreters {
            interpreters.claim(interpreter, name);
        }
    }

    CollisionReport {
        extensions: extensions.collisions(MatcherKind::Extension),
        filenames: filenames.collisions(MatcherKind::Filename),
        interpreters: interpreters.collisions(MatcherKind::Interpreter),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Catalog;

    #[test]
    fn test_shared_extension_reported() {
        let catalog = Catalog::from_yaml(
            r##"
Bar:
  category: programming
  color: "#222222"
  matchers:
    extensions:
      - .foo
Foo:
  category: programming
  color: "#111111"
  matchers:
    extensions:
      - .foo
"##,
        )
        .unwrap();
        let report = detect_collisions(&catalog);
        assert_eq!(report.len(), 1);
        let collision = &report.extensions[0];
        assert_eq!(collision.value, ".foo");
        assert_eq!(collision.languages, vec!["Bar", "Foo"]);
        assert_eq!(
            collision.to_string(),
            "Extension .foo is used by Bar, Foo"
        );
    }

    #[test]
    fn test_heuristics_suppress_collision() {
        let catalog = Catalog::from_yaml(
            r##"
Bar:
  category: programming
  color: "#222222"
  heuristics:
    - 'bar::'
  matchers:
    extensions:
      - .foo
Foo:
  category: programming
  color: "#111111"
  matchers:
    extensions:
      - .foo
"##,
        )
        .unwrap();
        let report = detect_collisions(&catalog);
        assert!(report.is_empty());
    }

    #[test]
    fn test_all_kinds_tracked_independently() {
        let catalog = Catalog::from_yaml(
            r##"
A:
  category: programming
  color: "#111111"
  matchers:
    filenames:
      - Justfile
    interpreters:
      - sh
B:
  category: programming
  color: "#222222"
  matchers:
    filenames:
      - Justfile
    interpreters:
      - sh
C:
  category: programming
  color: "#333333"
  matchers:
    interpreters:
      - sh
"##,
        )
        .unwrap();
        let report = detect_collisions(&catalog);
        assert!(report.extensions.is_empty());
        assert_eq!(report.filenames[0].languages, vec!["A", "B"]);
        assert_eq!(report.interpreters[0].languages, vec!["A", "B", "C"]);
        assert_eq!(report.len(), 2);
    }

    #[test]
    fn test_patterns_never_compared() {
        let catalog = Catalog::from_yaml(
            r##"
A:
  category: programming
  color: "#111111"
  matchers:
    patterns:
      - '^shared$'
B:
  category: programming
  color: "#222222"
  matchers:
    patterns:
      - '^shared$'
"##,
        )
        .unwrap();
        assert!(detect_collisions(&catalog).is_empty());
    }

    #[test]
    fn test_value_shared_within_one_language_only() {
        let catalog = Catalog::from_yaml(
            r##"
A:
  category: programming
  color: "#111111"
  matchers:
    extensions:
      - .a
"##,
        )
        .unwrap();
        assert!(detect_collisions(&catalog).is_empty());
    }
}
