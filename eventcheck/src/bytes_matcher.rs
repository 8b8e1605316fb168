use std::fmt;

use serde::{Deserialize, Serialize};

use crate::CheckError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BytesOperator {
    Full,
    Prefix,
    Suffix,
    Contains,
}

/// Matches a byte-sequence slot of an event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BytesMatcher {
    pub operator: BytesOperator,
    pub value: Vec<u8>,
}

impl BytesMatcher {
    pub fn full(value: impl Into<Vec<u8>>) -> Self {
        Self::new(BytesOperator::Full, value)
    }

    pub fn prefix(value: impl Into<Vec<u8>>) -> Self {
        Self::new(BytesOperator::Prefix, value)
    }

    pub fn suffix(value: impl Into<Vec<u8>>) -> Self {
        Self::new(BytesOperator::Suffix, value)
    }

    pub fn contains(value: impl Into<Vec<u8>>) -> Self {
        Self::new(BytesOperator::Contains, value)
    }

    fn new(operator: BytesOperator, value: impl Into<Vec<u8>>) -> Self {
        Self {
            operator,
            value: value.into(),
        }
    }

    pub fn is_match(&self, observed: &[u8]) -> bool {
        match self.operator {
            BytesOperator::Full => observed == self.value.as_slice(),
            BytesOperator::Prefix => observed.starts_with(&self.value),
            BytesOperator::Suffix => observed.ends_with(&self.value),
            BytesOperator::Contains => {
                self.value.is_empty()
                    || observed
                        .windows(self.value.len())
                        .any(|window| window == self.value.as_slice())
            }
        }
    }

    pub fn check(&self, field: &'static str, observed: &[u8]) -> Result<(), CheckError> {
        if self.is_match(observed) {
            return Ok(());
        }
        Err(CheckError::BytesMismatch {
            field,
            observed: observed.escape_ascii().to_string(),
            expected: self.to_string(),
        })
    }
}

impl fmt::Display for BytesMatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let operator = match self.operator {
            BytesOperator::Full => "full",
            BytesOperator::Prefix => "prefix",
            BytesOperator::Suffix => "suffix",
            BytesOperator::Contains => "contains",
        };
        write!(f, "{operator}(b\"{}\")", self.value.escape_ascii())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn operators() {
        let data = b"\x7fELF\x02\x01";
        assert!(BytesMatcher::full(data.to_vec()).is_match(data));
        assert!(BytesMatcher::prefix(b"\x7fELF".to_vec()).is_match(data));
        assert!(BytesMatcher::suffix(b"\x02\x01".to_vec()).is_match(data));
        assert!(BytesMatcher::contains(b"LF".to_vec()).is_match(data));
        assert!(!BytesMatcher::contains(b"MZ".to_vec()).is_match(data));
    }

    #[test]
    fn empty_contains_matches_anything() {
        assert!(BytesMatcher::contains(Vec::new()).is_match(b""));
        assert!(BytesMatcher::contains(Vec::new()).is_match(b"abc"));
    }

    #[test]
    fn mismatch_escapes_bytes() {
        let err = BytesMatcher::full(b"ab".to_vec())
            .check("data", b"a\x00")
            .unwrap_err();
        assert_eq!(err.to_string(), "data: b\"a\\x00\" does not match full(b\"ab\")");
    }
}
