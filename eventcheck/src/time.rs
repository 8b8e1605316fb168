use std::fmt;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::CheckError;

/// Matches a `google.protobuf.Timestamp` slot.
///
/// `Before` and `After` are strict; `Between` includes both ends. `Day`
/// compares the UTC calendar date only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "operator", rename_all = "lowercase")]
pub enum TimestampMatcher {
    Day { value: DateTime<Utc> },
    Before { value: DateTime<Utc> },
    After { value: DateTime<Utc> },
    Between {
        after: DateTime<Utc>,
        before: DateTime<Utc>,
    },
}

impl TimestampMatcher {
    pub fn is_match(&self, observed: &DateTime<Utc>) -> bool {
        match self {
            Self::Day { value } => observed.date_naive() == value.date_naive(),
            Self::Before { value } => observed < value,
            Self::After { value } => observed > value,
            Self::Between { after, before } => after <= observed && observed <= before,
        }
    }

    pub fn check(
        &self,
        field: &'static str,
        observed: Option<&prost_types::Timestamp>,
    ) -> Result<(), CheckError> {
        let Some(observed) = observed else {
            return Err(CheckError::absent(field, self));
        };
        let converted = u32::try_from(observed.nanos)
            .ok()
            .and_then(|nanos| DateTime::from_timestamp(observed.seconds, nanos));
        match converted {
            Some(time) if self.is_match(&time) => Ok(()),
            Some(time) => Err(CheckError::TimestampMismatch {
                field,
                observed: time.to_rfc3339(),
                expected: self.to_string(),
            }),
            None => Err(CheckError::TimestampMismatch {
                field,
                observed: format!("{}s+{}ns (out of range)", observed.seconds, observed.nanos),
                expected: self.to_string(),
            }),
        }
    }
}

impl fmt::Display for TimestampMatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Day { value } => write!(f, "day({})", value.date_naive()),
            Self::Before { value } => write!(f, "before({})", value.to_rfc3339()),
            Self::After { value } => write!(f, "after({})", value.to_rfc3339()),
            Self::Between { after, before } => {
                write!(f, "between({}, {})", after.to_rfc3339(), before.to_rfc3339())
            }
        }
    }
}

/// Matches a `google.protobuf.Duration` slot. `Less` and `Greater` are
/// strict; `Between` includes both ends. Negative durations never match.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "operator", rename_all = "lowercase")]
pub enum DurationMatcher {
    Less { value: Duration },
    Greater { value: Duration },
    Between { lower: Duration, upper: Duration },
}

impl DurationMatcher {
    pub fn is_match(&self, observed: Duration) -> bool {
        match self {
            Self::Less { value } => observed < *value,
            Self::Greater { value } => observed > *value,
            Self::Between { lower, upper } => *lower <= observed && observed <= *upper,
        }
    }

    pub fn check(
        &self,
        field: &'static str,
        observed: Option<&prost_types::Duration>,
    ) -> Result<(), CheckError> {
        let Some(observed) = observed else {
            return Err(CheckError::absent(field, self));
        };
        let converted = u64::try_from(observed.seconds)
            .ok()
            .zip(u32::try_from(observed.nanos).ok())
            .map(|(seconds, nanos)| Duration::new(seconds, nanos));
        match converted {
            Some(duration) if self.is_match(duration) => Ok(()),
            Some(duration) => Err(CheckError::DurationMismatch {
                field,
                observed: format!("{duration:?}"),
                expected: self.to_string(),
            }),
            None => Err(CheckError::DurationMismatch {
                field,
                observed: format!("{}s{}ns (negative)", observed.seconds, observed.nanos),
                expected: self.to_string(),
            }),
        }
    }
}

impl fmt::Display for DurationMatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Less { value } => write!(f, "less({value:?})"),
            Self::Greater { value } => write!(f, "greater({value:?})"),
            Self::Between { lower, upper } => write!(f, "between({lower:?}, {upper:?})"),
        }
    }
}
