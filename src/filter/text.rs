//! Compiled text predicates.

use regex::{Regex, RegexBuilder};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::accessor::fold_case;
use crate::FilterError;

/// How a text filter compares the coerced property text with its operand.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TextMode {
    Contains,
    Equals,
    StartsWith,
    /// Unanchored regex search.
    Regex,
}

impl std::fmt::Display for TextMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TextMode::Contains => write!(f, "contains"),
            TextMode::Equals => write!(f, "equals"),
            TextMode::StartsWith => write!(f, "starts with"),
            TextMode::Regex => write!(f, "matches"),
        }
    }
}

/// A text predicate ready to run against many values.
#[derive(Debug, Clone)]
pub enum TextMatcher {
    Contains { needle: String, case_sensitive: bool },
    Equals { needle: String, case_sensitive: bool },
    StartsWith { needle: String, case_sensitive: bool },
    Regex(Regex),
}

impl TextMatcher {
    /// Compile once per filter call. Only `Regex` can fail.
    pub fn compile(mode: TextMode, text: &str, case_sensitive: bool) -> Result<Self, FilterError> {
        let needle = fold_case(text, case_sensitive).into_owned();
        Ok(match mode {
            TextMode::Contains => TextMatcher::Contains { needle, case_sensitive },
            TextMode::Equals => TextMatcher::Equals { needle, case_sensitive },
            TextMode::StartsWith => TextMatcher::StartsWith { needle, case_sensitive },
            TextMode::Regex => {
                let re = RegexBuilder::new(text)
                    .case_insensitive(!case_sensitive)
                    .build()
                    .map_err(|e| {
                        warn!(pattern = %text, error = %e, "rejecting text filter");
                        FilterError::InvalidPattern {
                            pattern: text.to_owned(),
                            reason: e.to_string(),
                        }
                    })?;
                TextMatcher::Regex(re)
            }
        })
    }

    pub fn is_match(&self, haystack: &str) -> bool {
        match self {
            TextMatcher::Contains { needle, case_sensitive } => {
                fold_case(haystack, *case_sensitive).contains(needle.as_str())
            }
            TextMatcher::Equals { needle, case_sensitive } => {
                fold_case(haystack, *case_sensitive) == needle.as_str()
            }
            TextMatcher::StartsWith { needle, case_sensitive } => {
                fold_case(haystack, *case_sensitive).starts_with(needle.as_str())
            }
            TextMatcher::Regex(re) => re.is_match(haystack),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_contains_ignores_case_by_request() {
        let m = TextMatcher::compile(TextMode::Contains, "dra", false).unwrap();
        assert!(m.is_match("Drama"));
        let m = TextMatcher::compile(TextMode::Contains, "dra", true).unwrap();
        assert!(!m.is_match("Drama"));
    }

    #[test]
    fn test_equals_and_prefix() {
        let eq = TextMatcher::compile(TextMode::Equals, "drama", false).unwrap();
        assert!(eq.is_match("DRAMA"));
        assert!(!eq.is_match("Drama, Crime"));
        let sw = TextMatcher::compile(TextMode::StartsWith, "The", true).unwrap();
        assert!(sw.is_match("The Matrix"));
        assert!(!sw.is_match("the Matrix"));
    }

    #[test]
    fn test_regex_is_a_search() {
        let m = TextMatcher::compile(TextMode::Regex, "rix$", true).unwrap();
        assert!(m.is_match("The Matrix"));
        let empty = TextMatcher::compile(TextMode::Regex, "^$", true).unwrap();
        assert!(empty.is_match(""));
    }

    #[test]
    fn test_invalid_regex() {
        let err = TextMatcher::compile(TextMode::Regex, "([a-z", false).unwrap_err();
        assert!(matches!(err, FilterError::InvalidPattern { ref pattern, .. } if pattern == "([a-z"));
    }
}
