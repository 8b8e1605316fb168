//! The three list-matching algorithms behind every generated `*ListMatcher`.
//!
//! Each function takes the matcher's name (for error messages), the expected
//! element checkers, the observed elements, and the per-element check the
//! generated code supplies.
//!
//! `Unordered` is `Subset` after a length check, and `Subset` never consumes
//! an observed element once it satisfied an expected one. Two expected
//! checkers may therefore be satisfied by the same observed element, so
//! `Unordered` is weaker than a one-to-one pairing.

use serde::{Deserialize, Serialize};

use crate::CheckError;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ListOperator {
    /// Same length, element `i` checked against checker `i`.
    Ordered,
    /// Same length, then [`ListOperator::Subset`].
    Unordered,
    /// Every checker is satisfied by some observed element.
    #[default]
    Subset,
}

pub fn check_ordered<C, V, F>(
    matcher: &'static str,
    expected: &[C],
    observed: &[V],
    check: F,
) -> Result<(), CheckError>
where
    F: Fn(&C, &V) -> Result<(), CheckError>,
{
    if expected.len() != observed.len() {
        return Err(CheckError::LengthMismatch {
            matcher,
            expected: expected.len(),
            observed: observed.len(),
        });
    }
    for (index, (checker, value)) in expected.iter().zip(observed).enumerate() {
        check(checker, value).map_err(|inner| CheckError::ElementMismatch {
            matcher,
            index,
            inner: Box::new(inner),
        })?;
    }
    Ok(())
}

pub fn check_unordered<C, V, F>(
    matcher: &'static str,
    expected: &[C],
    observed: &[V],
    check: F,
) -> Result<(), CheckError>
where
    F: Fn(&C, &V) -> Result<(), CheckError>,
{
    if expected.len() != observed.len() {
        return Err(CheckError::LengthMismatch {
            matcher,
            expected: expected.len(),
            observed: observed.len(),
        });
    }
    check_subset(matcher, expected, observed, check)
}

pub fn check_subset<C, V, F>(
    matcher: &'static str,
    expected: &[C],
    observed: &[V],
    check: F,
) -> Result<(), CheckError>
where
    F: Fn(&C, &V) -> Result<(), CheckError>,
{
    let desired = expected.len();
    let mut matched = 0;
    for checker in expected {
        if observed.iter().any(|value| check(checker, value).is_ok()) {
            matched += 1;
        }
    }
    if matched < desired {
        return Err(CheckError::SubsetShortfall {
            matcher,
            matched,
            desired,
        });
    }
    Ok(())
}
