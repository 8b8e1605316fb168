use std::fmt;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::CheckError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StringOperator {
    Full,
    Prefix,
    Suffix,
    Contains,
    Regex,
}

/// Matches a string slot of an event.
///
/// Regexes are unanchored (`contains` semantics) and compiled once at
/// construction. Serialized as `{"operator": "prefix", "value": "/usr/"}` so
/// expectations can live in fixture files.
///
/// ```
/// use eventcheck::StringMatcher;
///
/// assert!(StringMatcher::suffix(".so").is_match("libc.so"));
/// assert!(StringMatcher::regex(r"^curl-\d+$").unwrap().is_match("curl-8"));
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(try_from = "StringMatcherSpec", into = "StringMatcherSpec")]
pub struct StringMatcher {
    operator: StringOperator,
    value: String,
    regex: Option<Regex>,
}

#[derive(Serialize, Deserialize)]
struct StringMatcherSpec {
    operator: StringOperator,
    value: String,
}

impl StringMatcher {
    pub fn full(value: impl Into<String>) -> Self {
        Self::literal(StringOperator::Full, value.into())
    }

    pub fn prefix(value: impl Into<String>) -> Self {
        Self::literal(StringOperator::Prefix, value.into())
    }

    pub fn suffix(value: impl Into<String>) -> Self {
        Self::literal(StringOperator::Suffix, value.into())
    }

    pub fn contains(value: impl Into<String>) -> Self {
        Self::literal(StringOperator::Contains, value.into())
    }

    /// # Errors
    ///
    /// Returns the compile error when `pattern` is not a valid regex.
    pub fn regex(pattern: impl Into<String>) -> Result<Self, regex::Error> {
        let value = pattern.into();
        let regex = Regex::new(&value)?;
        Ok(Self {
            operator: StringOperator::Regex,
            value,
            regex: Some(regex),
        })
    }

    fn literal(operator: StringOperator, value: String) -> Self {
        Self {
            operator,
            value,
            regex: None,
        }
    }

    #[must_use]
    pub fn operator(&self) -> StringOperator {
        self.operator
    }

    #[must_use]
    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn is_match(&self, observed: &str) -> bool {
        match self.operator {
            StringOperator::Full => observed == self.value,
            StringOperator::Prefix => observed.starts_with(&self.value),
            StringOperator::Suffix => observed.ends_with(&self.value),
            StringOperator::Contains => observed.contains(&self.value),
            StringOperator::Regex => self
                .regex
                .as_ref()
                .is_some_and(|regex| regex.is_match(observed)),
        }
    }

    pub fn check(&self, field: &'static str, observed: &str) -> Result<(), CheckError> {
        if self.is_match(observed) {
            return Ok(());
        }
        Err(CheckError::StringMismatch {
            field,
            observed: observed.to_string(),
            expected: self.to_string(),
        })
    }
}

impl PartialEq for StringMatcher {
    fn eq(&self, other: &Self) -> bool {
        self.operator == other.operator && self.value == other.value
    }
}

impl fmt::Display for StringMatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let operator = match self.operator {
            StringOperator::Full => "full",
            StringOperator::Prefix => "prefix",
            StringOperator::Suffix => "suffix",
            StringOperator::Contains => "contains",
            StringOperator::Regex => "regex",
        };
        write!(f, "{operator}({:?})", self.value)
    }
}

impl TryFrom<StringMatcherSpec> for StringMatcher {
    type Error = regex::Error;

    fn try_from(spec: StringMatcherSpec) -> Result<Self, Self::Error> {
        match spec.operator {
            StringOperator::Regex => Self::regex(spec.value),
            operator => Ok(Self::literal(operator, spec.value)),
        }
    }
}

impl From<StringMatcher> for StringMatcherSpec {
    fn from(matcher: StringMatcher) -> Self {
        Self {
            operator: matcher.operator,
            value: matcher.value,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn full_is_exact() {
        let m = StringMatcher::full("/bin/sh");
        assert!(m.is_match("/bin/sh"));
        assert!(!m.is_match("/bin/sh "));
        assert!(!m.is_match("/BIN/SH"));
    }

    #[test]
    fn prefix_suffix_contains() {
        assert!(StringMatcher::prefix("/usr/").is_match("/usr/bin/curl"));
        assert!(!StringMatcher::prefix("/usr/").is_match("/bin/curl"));
        assert!(StringMatcher::suffix("curl").is_match("/usr/bin/curl"));
        assert!(StringMatcher::contains("bin").is_match("/usr/bin/curl"));
        assert!(!StringMatcher::contains("sbin").is_match("/usr/bin/curl"));
    }

    #[test]
    fn regex_is_unanchored() {
        let m = StringMatcher::regex(r"\d+").unwrap();
        assert!(m.is_match("pid 42 exited"));
        assert!(!m.is_match("no digits"));
    }

    #[test]
    fn invalid_regex_is_an_error() {
        assert!(StringMatcher::regex("[bad").is_err());
    }

    #[test]
    fn check_reports_observed_and_expected() {
        let err = StringMatcher::full("/bin/bash")
            .check("binary", "/bin/sh")
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "binary: \"/bin/sh\" does not match full(\"/bin/bash\")"
        );
    }

    #[test]
    fn serde_round_trip_recompiles_regex() {
        let json = r#"{"operator":"regex","value":"^/usr/(s)?bin/"}"#;
        let m: StringMatcher = serde_json::from_str(json).unwrap();
        assert!(m.is_match("/usr/sbin/sshd"));
        assert_eq!(serde_json::to_string(&m).unwrap(), json);
    }

    #[test]
    fn serde_rejects_invalid_regex() {
        let json = r#"{"operator":"regex","value":"(unclosed"}"#;
        assert!(serde_json::from_str::<StringMatcher>(json).is_err());
    }
}
