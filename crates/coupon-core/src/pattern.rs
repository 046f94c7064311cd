//! # Pattern Matcher
//!
//! Wildcard patterns used by combo, product and customer coupons.
//!
//! ## Translation
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Pattern        Regex              Matches            Does not match    │
//! │  ───────        ─────              ───────            ──────────────    │
//! │  SUA*           ^(?:SUA.*)$        SUA, SUA1, SUAXL   XSUA1, sua1       │
//! │  *MILK          ^(?:.*MILK)$       MILK, SOYMILK      MILK2             │
//! │  A.1            ^(?:A.1)$          A.1, AX1           A11X              │
//! │                                                                         │
//! │  Only `*` is translated. Every other character keeps its regex         │
//! │  meaning, so `.` matches any character and `+` repeats.                 │
//! │  The whole candidate must match, never a substring.                    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Matching is case-sensitive. Callers that want case-insensitive matching
//! (loyalty cards) normalise both sides first.

use regex::Regex;

use crate::error::{RuleError, RuleResult};

/// A compiled wildcard pattern.
#[derive(Debug, Clone)]
pub struct WildcardPattern {
    source: String,
    regex: Regex,
}

impl WildcardPattern {
    /// Compiles a wildcard pattern.
    ///
    /// ## Errors
    /// [`RuleError::InvalidPattern`] if the translated pattern is not a valid
    /// regular expression (e.g. `SUA(`).
    pub fn compile(pattern: &str) -> RuleResult<Self> {
        let translated = format!("^(?:{})$", pattern.replace('*', ".*"));
        let regex = Regex::new(&translated).map_err(|err| RuleError::InvalidPattern {
            pattern: pattern.to_string(),
            reason: err.to_string(),
        })?;

        Ok(WildcardPattern {
            source: pattern.to_string(),
            regex,
        })
    }

    /// The pattern as written in the coupon.
    pub fn as_str(&self) -> &str {
        &self.source
    }

    /// Checks whether the whole candidate matches.
    #[inline]
    pub fn is_match(&self, candidate: &str) -> bool {
        self.regex.is_match(candidate)
    }
}

/// Compiles every pattern in a list, failing on the first invalid one.
pub fn compile_all(patterns: &[String]) -> RuleResult<Vec<WildcardPattern>> {
    patterns
        .iter()
        .map(|pattern| WildcardPattern::compile(pattern))
        .collect()
}

/// One-shot match of `candidate` against `pattern`.
///
/// ## Example
/// ```rust
/// use coupon_core::pattern::matches;
///
/// assert_eq!(matches("SUA1", "SUA*"), Ok(true));
/// assert_eq!(matches("XSUA1", "SUA*"), Ok(false));
/// assert!(matches("SUA1", "SUA(").is_err());
/// ```
pub fn matches(candidate: &str, pattern: &str) -> RuleResult<bool> {
    WildcardPattern::compile(pattern).map(|compiled| compiled.is_match(candidate))
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prefix_wildcard() {
        assert_eq!(matches("SUA1", "SUA*"), Ok(true));
        assert_eq!(matches("SUA", "SUA*"), Ok(true));
        assert_eq!(matches("BMI1", "SUA*"), Ok(false));
    }

    #[test]
    fn test_full_string_match_not_substring() {
        assert_eq!(matches("XSUA1", "SUA*"), Ok(false));
        assert_eq!(matches("SUA1", "SUA"), Ok(false));
        assert_eq!(matches("SUA", "SUA"), Ok(true));
    }

    #[test]
    fn test_inner_and_leading_wildcards() {
        assert_eq!(matches("SOYMILK", "*MILK"), Ok(true));
        assert_eq!(matches("MILK2", "*MILK"), Ok(false));
        assert_eq!(matches("A-big-Z", "A*Z"), Ok(true));
        assert_eq!(matches("anything", "*"), Ok(true));
        assert_eq!(matches("", "*"), Ok(true));
    }

    #[test]
    fn test_case_sensitive() {
        assert_eq!(matches("sua1", "SUA*"), Ok(false));
    }

    #[test]
    fn test_regex_metacharacters_stay_active() {
        // `.` is a regex wildcard, not a literal dot
        assert_eq!(matches("AX1", "A.1"), Ok(true));
        assert_eq!(matches("A.1", "A.1"), Ok(true));
        // `+` repeats the previous character
        assert_eq!(matches("AAA", "A+"), Ok(true));
        // alternation is live too
        assert_eq!(matches("BMI1", "SUA1|BMI1"), Ok(true));
    }

    #[test]
    fn test_invalid_pattern_is_an_error() {
        let err = matches("SUA1", "SUA(").unwrap_err();
        assert!(matches!(err, RuleError::InvalidPattern { .. }));
    }

    #[test]
    fn test_compile_all() {
        let ok = compile_all(&["A*".to_string(), "B*".to_string()]).unwrap();
        assert_eq!(ok.len(), 2);
        assert_eq!(ok[1].as_str(), "B*");

        assert!(compile_all(&["A*".to_string(), "[".to_string()]).is_err());
    }
}
