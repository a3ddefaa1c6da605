//! Langcheck - language catalog quality gate.
//!
//! Langcheck works with a declarative YAML catalog of language
//! definitions: matching rules (extensions, filenames, interpreters,
//! content patterns), optional disambiguation heuristics, and a priority
//! weight per language. It classifies files against the catalog and
//! checks the catalog itself for structural problems and matcher
//! collisions.
//!
//! # Architecture
//!
//! - `catalog`: raw and typed catalog models, loaded from YAML
//! - `validate`: structural checks over the raw catalog
//! - `collisions`: matcher values claimed by more than one language
//! - `classify`: per-file classification with heuristics and priority
//! - `diff`: catalog snapshot comparison for the release-tag gate
//! - `report`: output formatting (pretty, JSON)
//!
//! Nothing here is ambient: every operation takes the catalog (or a
//! classifier compiled from it) as an explicit argument, so multiple
//! catalogs can coexist in one process.

pub mod catalog;
pub mod classify;
pub mod cli;
pub mod collisions;
pub mod diff;
pub mod report;
pub mod validate;

pub use catalog::{Catalog, CatalogError, LanguageDefinition, Matchers, RawCatalog};
pub use classify::{Candidate, Classification, Classifier};
pub use collisions::{detect_collisions, Collision, CollisionReport, MatcherKind};
pub use diff::{diff, CatalogDiff};
pub use validate::{validate, CheckRule, ValidationError};
