//! Runtime support for checkers emitted by `eventcheck-gen`.
//!
//! Generated code only ever talks to this crate through [`prelude`]: leaf
//! matchers for strings, bytes and temporal values, the exact-equality
//! helpers for primitive slots, the three list-matching algorithms, and the
//! map/label checks. Every check returns `Result<(), CheckError>`; a mismatch
//! is an ordinary `Err`, never a panic.
//!
//! ```
//! use eventcheck::prelude::*;
//!
//! let expected = vec![StringMatcher::prefix("/usr/"), StringMatcher::full("/bin/sh")];
//! let observed = vec!["/bin/sh".to_string(), "/usr/bin/curl".to_string()];
//!
//! let check = |check: &StringMatcher, value: &String| check.check("value", value);
//! assert!(check_subset("StringListMatcher", &expected, &observed, check).is_ok());
//! assert!(check_ordered("StringListMatcher", &expected, &observed, check).is_err());
//! ```

mod bytes_matcher;
mod error;
pub mod list;
mod map;
mod scalar;
mod string_matcher;
mod time;

pub use bytes_matcher::{BytesMatcher, BytesOperator};
pub use error::CheckError;
pub use list::ListOperator;
pub use map::{check_labels, check_map, label_pairs, split_labels};
pub use scalar::{ExactEq, check_value, check_wrapper};
pub use string_matcher::{StringMatcher, StringOperator};
pub use time::{DurationMatcher, TimestampMatcher};

pub use prost_types;

/// Everything a generated checker module needs in scope.
pub mod prelude {
    pub use crate::list::{check_ordered, check_subset, check_unordered};
    pub use crate::{
        BytesMatcher, CheckError, DurationMatcher, ListOperator, StringMatcher, TimestampMatcher,
        check_labels, check_map, check_value, check_wrapper, label_pairs, prost_types,
    };
}
