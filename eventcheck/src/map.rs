use std::collections::BTreeMap;

use crate::{CheckError, StringMatcher};

/// Check a string-keyed map against per-key matchers.
///
/// Expected keys are visited in sorted order. Each one present in `observed`
/// is checked (first failure wins); the absent ones are reported together.
/// Observed keys without a matcher are ignored.
pub fn check_map<I, K, V>(
    field: &'static str,
    expected: &BTreeMap<String, StringMatcher>,
    observed: I,
) -> Result<(), CheckError>
where
    I: IntoIterator<Item = (K, V)>,
    K: AsRef<str>,
    V: AsRef<str>,
{
    let entries: Vec<(K, V)> = observed.into_iter().collect();
    let observed: BTreeMap<&str, &str> = entries
        .iter()
        .map(|(key, value)| (key.as_ref(), value.as_ref()))
        .collect();

    let mut missing = Vec::new();
    for (key, matcher) in expected {
        let Some(&value) = observed.get(key.as_str()) else {
            missing.push(key.clone());
            continue;
        };
        matcher
            .check(field, value)
            .map_err(|inner| CheckError::KeyMismatch {
                field,
                key: key.clone(),
                value: value.to_string(),
                inner: Box::new(inner),
            })?;
    }

    if !missing.is_empty() {
        return Err(CheckError::UnmatchedKeys { field, keys: missing });
    }
    Ok(())
}

/// Parse `key=value` label entries, splitting on the first `=`.
///
/// Entries without `=` are dropped, unless `expected` has that literal entry
/// as a key: the entry could never be matched, so that is a failure. Later
/// duplicates of a key replace earlier ones.
pub fn split_labels<'a>(
    checker: &'static str,
    expected: &BTreeMap<String, StringMatcher>,
    labels: &'a [String],
) -> Result<BTreeMap<&'a str, &'a str>, CheckError> {
    let mut values = BTreeMap::new();
    for label in labels {
        match label.split_once('=') {
            Some((key, value)) => {
                values.insert(key, value);
            }
            None if expected.contains_key(label) => {
                return Err(CheckError::InvalidLabel {
                    checker,
                    label: label.clone(),
                });
            }
            None => {}
        }
    }
    Ok(values)
}

/// [`split_labels`] followed by [`check_map`].
pub fn check_labels(
    checker: &'static str,
    field: &'static str,
    expected: &BTreeMap<String, StringMatcher>,
    labels: &[String],
) -> Result<(), CheckError> {
    let values = split_labels(checker, expected, labels)?;
    check_map(field, expected, values)
}

/// Well-formed `key=value` pairs of a label list, in order.
pub fn label_pairs(labels: &[String]) -> impl Iterator<Item = (&str, &str)> {
    labels.iter().filter_map(|label| label.split_once('='))
}
