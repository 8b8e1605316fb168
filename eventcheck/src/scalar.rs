use std::fmt::Debug;

use crate::CheckError;

/// Equality as checkers see it: exact, with no tolerance.
///
/// Floats compare by bit pattern, so `0.0` and `-0.0` differ and a NaN equals
/// a NaN with the same payload.
pub trait ExactEq {
    fn exact_eq(&self, other: &Self) -> bool;
}

macro_rules! exact_eq_by_value {
    ($($ty:ty),* $(,)?) => {
        $(
            impl ExactEq for $ty {
                fn exact_eq(&self, other: &Self) -> bool {
                    self == other
                }
            }
        )*
    };
}

exact_eq_by_value!(bool, i32, i64, u32, u64, String, Vec<u8>);

impl ExactEq for f32 {
    fn exact_eq(&self, other: &Self) -> bool {
        self.to_bits() == other.to_bits()
    }
}

impl ExactEq for f64 {
    fn exact_eq(&self, other: &Self) -> bool {
        self.to_bits() == other.to_bits()
    }
}

/// Check a primitive slot against the observed value.
pub fn check_value<T>(field: &'static str, expected: &T, observed: &T) -> Result<(), CheckError>
where
    T: ExactEq + Debug + ?Sized,
{
    if expected.exact_eq(observed) {
        return Ok(());
    }
    Err(CheckError::mismatch(field, observed, expected))
}

/// Check a boxed primitive. An absent value never satisfies a set constraint.
pub fn check_wrapper<T>(
    field: &'static str,
    expected: &T,
    observed: Option<&T>,
) -> Result<(), CheckError>
where
    T: ExactEq + Debug,
{
    match observed {
        Some(observed) => check_value(field, expected, observed),
        None => Err(CheckError::absent(field, format!("{expected:?}"))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn integers_compare_exactly() {
        assert!(check_value("pid", &42u32, &42u32).is_ok());
        let err = check_value("pid", &42u32, &43u32).unwrap_err();
        assert_eq!(err, CheckError::mismatch("pid", 43u32, 42u32));
    }

    #[test]
    fn negative_zero_is_not_zero() {
        assert!(check_value("ratio", &0.0f64, &-0.0f64).is_err());
        assert!(check_value("ratio", &0.0f32, &-0.0f32).is_err());
    }

    #[test]
    fn nan_matches_itself_by_bits() {
        assert!(check_value("ratio", &f64::NAN, &f64::NAN).is_ok());
    }

    #[test]
    fn wrapper_absent_fails() {
        let err = check_wrapper("uid", &0u32, None).unwrap_err();
        assert!(matches!(err, CheckError::Absent { field: "uid", .. }));
        assert!(check_wrapper("uid", &0u32, Some(&0u32)).is_ok());
        assert!(check_wrapper("uid", &0u32, Some(&1u32)).is_err());
    }

    #[test]
    fn wrapper_strings_compare_exactly() {
        let expected = "root".to_string();
        assert!(check_wrapper("user", &expected, Some(&"root".to_string())).is_ok());
        assert!(check_wrapper("user", &expected, Some(&"Root".to_string())).is_err());
    }

    proptest! {
        #[test]
        fn one_flipped_bit_flips_the_verdict(value in any::<f64>(), bit in 0u32..64) {
            let flipped = f64::from_bits(value.to_bits() ^ (1u64 << bit));
            prop_assert!(check_value("value", &value, &value).is_ok());
            prop_assert!(check_value("value", &value, &flipped).is_err());
        }

        #[test]
        fn f32_bits_decide(value in any::<f32>(), bit in 0u32..32) {
            let flipped = f32::from_bits(value.to_bits() ^ (1u32 << bit));
            prop_assert!(check_value("value", &value, &flipped).is_err());
        }
    }
}
