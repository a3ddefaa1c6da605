//! Structural validation of a language catalog.
//!
//! Every check runs over the raw catalog view and all findings are
//! collected; a single pass surfaces every problem at once. Only a
//! document that cannot be decoded at all fails earlier, in the loader.

use serde::Serialize;
use serde_yaml::Value;

use crate::catalog::{value_kind, RawCatalog, MATCHER_KEYS};

/// Required keys of every language definition.
const REQUIRED_KEYS: &[&str] = &["category", "color", "matchers"];

/// The rule a validation finding violated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CheckRule {
    KeyOrder,
    LanguageShape,
    MissingRequiredKey,
    HeuristicsShape,
    HeuristicsOrder,
    MatchersShape,
    MatcherShape,
    MatchersEmpty,
    MatcherKeyOrder,
    MatcherOrder,
    PriorityRange,
}

impl CheckRule {
    pub fn as_str(&self) -> &'static str {
        match self {
            CheckRule::KeyOrder => "key_order",
            CheckRule::LanguageShape => "language_shape",
            CheckRule::MissingRequiredKey => "missing_required_key",
            CheckRule::HeuristicsShape => "heuristics_shape",
            CheckRule::HeuristicsOrder => "heuristics_order",
            CheckRule::MatchersShape => "matchers_shape",
            CheckRule::MatcherShape => "matcher_shape",
            CheckRule::MatchersEmpty => "matchers_empty",
            CheckRule::MatcherKeyOrder => "matcher_key_order",
            CheckRule::MatcherOrder => "matcher_order",
            CheckRule::PriorityRange => "priority_range",
        }
    }
}

impl std::fmt::Display for CheckRule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A single validation finding.
///
/// `language` is `None` for catalog-level findings (top-level key order).
#[derive(Debug, Clone, Serialize)]
pub struct ValidationError {
    pub language: Option<String>,
    pub rule: CheckRule,
    pub message: String,
}

impl ValidationError {
    fn catalog(rule: CheckRule, message: String) -> Self {
        Self {
            language: None,
            rule,
            message,
        }
    }

    fn language(name: &str, rule: CheckRule, message: String) -> Self {
        Self {
            language: Some(name.to_string()),
            rule,
            message,
        }
    }
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.language {
            Some(name) => write!(f, "{}: {}", name, self.message),
            None => write!(f, "{}", self.message),
        }
    }
}

/// Run every structural check over the catalog.
///
/// Data problems never abort the run; the result lists them all.
pub fn validate(catalog: &RawCatalog) -> Vec<ValidationError> {
    let mut errors = Vec::new();

    let names: Vec<&str> = catalog.names().collect();
    for pair in names.windows(2) {
        if pair[0] > pair[1] {
            errors.push(ValidationError::catalog(
                CheckRule::KeyOrder,
                format!("Language '{}' and '{}' are out of order", pair[0], pair[1]),
            ));
        }
    }

    for (name, value) in catalog.iter() {
        validate_language(name, value, &mut errors);
    }

    errors
}

fn validate_language(name: &str, value: &Value, errors: &mut Vec<ValidationError>) {
    let def = match value.as_mapping() {
        Some(m) => m,
        None => {
            errors.push(ValidationError::language(
                name,
                CheckRule::LanguageShape,
                "must be an object".to_string(),
            ));
            return;
        }
    };

    let mut missing_required = false;
    for key in REQUIRED_KEYS {
        if !def.contains_key(*key) {
            errors.push(ValidationError::language(
                name,
                CheckRule::MissingRequiredKey,
                format!("missing required key '{}'", key),
            ));
            missing_required = true;
        }
    }
    if missing_required {
        return;
    }

    if let Some(heuristics) = def.get("heuristics") {
        match heuristics.as_sequence() {
            Some(seq) => {
                check_sorted(seq, errors, |a, b| {
                    ValidationError::language(
                        name,
                        CheckRule::HeuristicsOrder,
                        format!("'heuristics' are out of order: '{}' and '{}'", a, b),
                    )
                });
            }
            None => {
                errors.push(ValidationError::language(
                    name,
                    CheckRule::HeuristicsShape,
                    format!("'heuristics' must be a sequence, got {}", value_kind(heuristics)),
                ));
            }
        }
    }

    let matchers = match def.get("matchers") {
        Some(m) => m,
        // unreachable: required keys were checked above
        None => return,
    };
    let matchers = match matchers.as_mapping() {
        Some(m) => m,
        None => {
            errors.push(ValidationError::language(
                name,
                CheckRule::MatchersShape,
                format!("'matchers' must be an object, got {}", value_kind(matchers)),
            ));
            return;
        }
    };

    let mut bad_matchers = false;
    for key in MATCHER_KEYS {
        if let Some(matcher) = matchers.get(*key) {
            if !matcher.is_sequence() {
                errors.push(ValidationError::language(
                    name,
                    CheckRule::MatcherShape,
                    format!("'matchers.{}' must be a sequence, got {}", key, value_kind(matcher)),
                ));
                bad_matchers = true;
            }
        }
    }

    if !bad_matchers {
        if !MATCHER_KEYS.iter().any(|key| matchers.contains_key(*key)) {
            errors.push(ValidationError::language(
                name,
                CheckRule::MatchersEmpty,
                format!(
                    "'matchers' must have at least one of {}",
                    MATCHER_KEYS.join(", ")
                ),
            ));
        }

        let keys: Vec<String> = matchers.keys().map(scalar_repr).collect();
        for pair in keys.windows(2) {
            if pair[0] > pair[1] {
                errors.push(ValidationError::language(
                    name,
                    CheckRule::MatcherKeyOrder,
                    format!("'matchers' are out of order: '{}' and '{}'", pair[0], pair[1]),
                ));
            }
        }
    }

    for (key, matcher) in matchers {
        let key = scalar_repr(key);
        match matcher.as_sequence() {
            Some(seq) => {
                check_sorted(seq, errors, |a, b| {
                    ValidationError::language(
                        name,
                        CheckRule::MatcherOrder,
                        format!("matcher '{}' is out of order: '{}' and '{}'", key, a, b),
                    )
                });
            }
            None => {
                // Recognized keys were already reported above.
                if !MATCHER_KEYS.contains(&key.as_str()) {
                    errors.push(ValidationError::language(
                        name,
                        CheckRule::MatcherShape,
                        format!("matcher '{}' must be a sequence, got {}", key, value_kind(matcher)),
                    ));
                }
            }
        }
    }

    if let Some(priority) = def.get("priority") {
        let in_range = priority
            .as_i64()
            .map(|p| (0..=100).contains(&p))
            .unwrap_or(false);
        if !in_range {
            errors.push(ValidationError::language(
                name,
                CheckRule::PriorityRange,
                "'priority' must be an integer between 0 and 100".to_string(),
            ));
        }
    }
}

/// Report every adjacent out-of-order pair of a sequence.
fn check_sorted(
    seq: &[Value],
    errors: &mut Vec<ValidationError>,
    make_error: impl Fn(&str, &str) -> ValidationError,
) {
    for pair in seq.windows(2) {
        let a = scalar_repr(&pair[0]);
        let b = scalar_repr(&pair[1]);
        if a > b {
            errors.push(make_error(&a, &b));
        }
    }
}

/// Render a YAML scalar for comparison and diagnostics.
fn scalar_repr(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => String::new(),
        other => serde_yaml::to_string(other)
            .map(|s| s.trim_end().to_string())
            .unwrap_or_default(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::RawCatalog;

    fn validate_yaml(source: &str) -> Vec<ValidationError> {
        validate(&RawCatalog::from_yaml(source).unwrap())
    }

    fn rules(errors: &[ValidationError]) -> Vec<CheckRule> {
        errors.iter().map(|e| e.rule).collect()
    }

    const CONFORMING: &str = r##"
C:
  category: programming
  color: "#555555"
  matchers:
    extensions:
      - .c
      - .h
  priority: 75
Python:
  category: programming
  color: "#3572A5"
  heuristics:
    - 'def \w+\(.*\):'
    - 'import \w+'
  matchers:
    extensions:
      - .py
    filenames:
      - SConstruct
    interpreters:
      - python
      - python3
"##;

    #[test]
    fn test_conforming_catalog_is_clean() {
        let errors = validate_yaml(CONFORMING);
        assert!(errors.is_empty(), "unexpected errors: {:?}", errors);
    }

    #[test]
    fn test_out_of_order_keys() {
        let errors = validate_yaml(
            "b:\n  category: data\n  color: \"#000000\"\n  matchers:\n    extensions: [.b]\na:\n  category: data\n  color: \"#000000\"\n  matchers:\n    extensions: [.a]\n",
        );
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].rule, CheckRule::KeyOrder);
        assert!(errors[0].language.is_none());
        assert_eq!(errors[0].message, "Language 'b' and 'a' are out of order");
    }

    #[test]
    fn test_language_must_be_object() {
        let errors = validate_yaml("Rust: 3\n");
        assert_eq!(rules(&errors), vec![CheckRule::LanguageShape]);
        assert_eq!(errors[0].language.as_deref(), Some("Rust"));
    }

    #[test]
    fn test_missing_color_skips_matcher_checks() {
        // matchers is unsorted, but the missing key must be the only finding
        let errors = validate_yaml(
            "Rust:\n  category: programming\n  matchers:\n    extensions: [.z, .a]\n",
        );
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].rule, CheckRule::MissingRequiredKey);
        assert_eq!(errors[0].message, "missing required key 'color'");
    }

    #[test]
    fn test_each_missing_key_reported() {
        let errors = validate_yaml("Rust: {}\n");
        assert_eq!(errors.len(), 3);
        assert!(errors
            .iter()
            .all(|e| e.rule == CheckRule::MissingRequiredKey));
    }

    #[test]
    fn test_heuristics_must_be_sequence() {
        let errors = validate_yaml(
            "Rust:\n  category: programming\n  color: \"#DEA584\"\n  heuristics: 7\n  matchers:\n    extensions: [.rs]\n",
        );
        assert_eq!(rules(&errors), vec![CheckRule::HeuristicsShape]);
    }

    #[test]
    fn test_heuristics_out_of_order() {
        let errors = validate_yaml(
            "Rust:\n  category: programming\n  color: \"#DEA584\"\n  heuristics:\n    - zz\n    - aa\n  matchers:\n    extensions: [.rs]\n",
        );
        assert_eq!(rules(&errors), vec![CheckRule::HeuristicsOrder]);
        assert!(errors[0].message.contains("'zz' and 'aa'"));
    }

    #[test]
    fn test_matchers_must_be_object() {
        let errors = validate_yaml(
            "Rust:\n  category: programming\n  color: \"#DEA584\"\n  matchers: [.rs]\n",
        );
        assert_eq!(rules(&errors), vec![CheckRule::MatchersShape]);
    }

    #[test]
    fn test_matcher_value_must_be_sequence() {
        let errors = validate_yaml(
            "Rust:\n  category: programming\n  color: \"#DEA584\"\n  matchers:\n    extensions: .rs\n",
        );
        assert_eq!(rules(&errors), vec![CheckRule::MatcherShape]);
        assert!(errors[0].message.contains("'matchers.extensions'"));
    }

    #[test]
    fn test_matchers_need_at_least_one_key() {
        let errors = validate_yaml(
            "Rust:\n  category: programming\n  color: \"#DEA584\"\n  matchers: {}\n",
        );
        assert_eq!(rules(&errors), vec![CheckRule::MatchersEmpty]);
    }

    #[test]
    fn test_matcher_keys_out_of_order() {
        let errors = validate_yaml(
            "Rust:\n  category: programming\n  color: \"#DEA584\"\n  matchers:\n    filenames: [x.rs]\n    extensions: [.rs]\n",
        );
        assert_eq!(rules(&errors), vec![CheckRule::MatcherKeyOrder]);
        assert!(errors[0].message.contains("'filenames' and 'extensions'"));
    }

    #[test]
    fn test_matcher_values_out_of_order() {
        let errors = validate_yaml(
            "Rust:\n  category: programming\n  color: \"#DEA584\"\n  matchers:\n    extensions:\n      - .rs\n      - .ers\n",
        );
        assert_eq!(rules(&errors), vec![CheckRule::MatcherOrder]);
        assert!(errors[0].message.contains("matcher 'extensions'"));
        assert!(errors[0].message.contains("'.rs' and '.ers'"));
    }

    #[test]
    fn test_unrecognized_matcher_must_still_be_sequence() {
        let errors = validate_yaml(
            "Rust:\n  category: programming\n  color: \"#DEA584\"\n  matchers:\n    extensions: [.rs]\n    globs: nope\n",
        );
        assert_eq!(rules(&errors), vec![CheckRule::MatcherShape]);
        assert!(errors[0].message.contains("matcher 'globs'"));
    }

    #[test]
    fn test_priority_out_of_range_rejected() {
        let errors = validate_yaml(
            "Rust:\n  category: programming\n  color: \"#DEA584\"\n  matchers:\n    extensions: [.rs]\n  priority: 150\n",
        );
        assert_eq!(rules(&errors), vec![CheckRule::PriorityRange]);
    }

    #[test]
    fn test_priority_non_integer_rejected() {
        let errors = validate_yaml(
            "Rust:\n  category: programming\n  color: \"#DEA584\"\n  matchers:\n    extensions: [.rs]\n  priority: high\n",
        );
        assert_eq!(rules(&errors), vec![CheckRule::PriorityRange]);
    }

    #[test]
    fn test_priority_boundaries_accepted() {
        for priority in ["0", "100"] {
            let errors = validate_yaml(&format!(
                "Rust:\n  category: programming\n  color: \"#DEA584\"\n  matchers:\n    extensions: [.rs]\n  priority: {}\n",
                priority
            ));
            assert!(errors.is_empty(), "priority {} should pass", priority);
        }
    }

    #[test]
    fn test_bad_matchers_still_check_priority() {
        let errors = validate_yaml(
            "Rust:\n  category: programming\n  color: \"#DEA584\"\n  matchers:\n    extensions: .rs\n  priority: 150\n",
        );
        assert_eq!(
            rules(&errors),
            vec![CheckRule::MatcherShape, CheckRule::PriorityRange]
        );
    }

    #[test]
    fn test_all_languages_checked() {
        let errors = validate_yaml("A: 1\nB: 2\n");
        assert_eq!(errors.len(), 2);
    }
}
