use std::fmt;

use thiserror::Error;

/// A structural mismatch between a checker and an observed event.
///
/// Field and checker names are the literals baked into generated code.
/// [`CheckError::Nested`] wraps the failure of a sub-checker with the name of
/// the field it sits behind, so the `Display` of a deep failure reads as a
/// path: `parent: binary: "/bin/sh" does not match full("/bin/bash")`.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CheckError {
    #[error("{field} has value {observed} which does not match expected value {expected}")]
    FieldMismatch {
        field: &'static str,
        observed: String,
        expected: String,
    },

    #[error("{field} is absent and does not match expected {expected}")]
    Absent {
        field: &'static str,
        expected: String,
    },

    #[error("{field}: {observed:?} does not match {expected}")]
    StringMismatch {
        field: &'static str,
        observed: String,
        expected: String,
    },

    #[error("{field}: b\"{observed}\" does not match {expected}")]
    BytesMismatch {
        field: &'static str,
        observed: String,
        expected: String,
    },

    #[error("{checker}: {observed} does not match expected {expected}")]
    EnumMismatch {
        checker: &'static str,
        observed: String,
        expected: String,
    },

    #[error("{field}: timestamp {observed} does not match {expected}")]
    TimestampMismatch {
        field: &'static str,
        observed: String,
        expected: String,
    },

    #[error("{field}: duration {observed} does not match {expected}")]
    DurationMismatch {
        field: &'static str,
        observed: String,
        expected: String,
    },

    #[error("{matcher}: wanted {expected} elements, got {observed}")]
    LengthMismatch {
        matcher: &'static str,
        expected: usize,
        observed: usize,
    },

    #[error("{matcher}: check failed on element {index}: {inner}")]
    ElementMismatch {
        matcher: &'static str,
        index: usize,
        inner: Box<CheckError>,
    },

    #[error("{matcher}: check failed, only matched {matched} elements but wanted {desired}")]
    SubsetShortfall {
        matcher: &'static str,
        matched: usize,
        desired: usize,
    },

    #[error("{field} unmatched: {keys:?}")]
    UnmatchedKeys {
        field: &'static str,
        keys: Vec<String>,
    },

    #[error("{field}[{key}] ({key}={value}) check failed: {inner}")]
    KeyMismatch {
        field: &'static str,
        key: String,
        value: String,
        inner: Box<CheckError>,
    },

    #[error("{checker}: label {label:?} is in an invalid format (want key=value)")]
    InvalidLabel {
        checker: &'static str,
        label: String,
    },

    #[error("{checker}: {field} check failed: {actual} is not a {expected}")]
    WrongVariant {
        checker: &'static str,
        field: &'static str,
        expected: &'static str,
        actual: &'static str,
    },

    #[error("{field}: {inner}")]
    Nested {
        field: &'static str,
        inner: Box<CheckError>,
    },
}

impl CheckError {
    pub fn mismatch(field: &'static str, observed: impl fmt::Debug, expected: impl fmt::Debug) -> Self {
        Self::FieldMismatch {
            field,
            observed: format!("{observed:?}"),
            expected: format!("{expected:?}"),
        }
    }

    pub fn absent(field: &'static str, expected: impl fmt::Display) -> Self {
        Self::Absent {
            field,
            expected: expected.to_string(),
        }
    }

    /// Attribute a sub-checker failure to `field`.
    pub fn nested(field: &'static str, inner: CheckError) -> Self {
        Self::Nested {
            field,
            inner: Box::new(inner),
        }
    }

    pub fn wrong_variant(
        checker: &'static str,
        field: &'static str,
        expected: &'static str,
        actual: &'static str,
    ) -> Self {
        Self::WrongVariant {
            checker,
            field,
            expected,
            actual,
        }
    }

    /// Field names of the `Nested` chain, outermost first.
    pub fn path(&self) -> Vec<&'static str> {
        let mut path = Vec::new();
        let mut current = self;
        while let Self::Nested { field, inner } = current {
            path.push(*field);
            current = inner;
        }
        path
    }

    /// The innermost error, below any `Nested` wrappers.
    pub fn root(&self) -> &CheckError {
        let mut current = self;
        while let Self::Nested { inner, .. } = current {
            current = inner;
        }
        current
    }
}
