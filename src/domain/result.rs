//! Result type alias for fieldvisit
//!
//! This module provides a convenient Result type alias that uses
//! [`FieldVisitError`] as the error type.

use super::errors::FieldVisitError;

/// Result type alias for fieldvisit operations
///
/// # Examples
///
/// ```
/// use fieldvisit::domain::result::Result;
/// use fieldvisit::domain::errors::FieldVisitError;
///
/// fn example_function() -> Result<String> {
///     Ok("success".to_string())
/// }
///
/// fn failing_function() -> Result<()> {
///     Err(FieldVisitError::Validation("Invalid input".to_string()))
/// }
/// ```
pub type Result<T> = std::result::Result<T, FieldVisitError>;

/// Result of a mapping step; failures are always structural
pub type MappingResult<T> = std::result::Result<T, super::errors::MappingError>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::errors::{FieldVisitError, MappingError};

    #[test]
    fn test_result_with_question_mark() -> Result<()> {
        fn inner() -> Result<i32> {
            Ok(42)
        }

        let value = inner()?;
        assert_eq!(value, 42);
        Ok(())
    }

    #[test]
    fn test_mapping_result_lifts_into_result() {
        fn mapping() -> MappingResult<()> {
            Err(MappingError::missing("date", "general info"))
        }

        fn outer() -> Result<()> {
            mapping()?;
            Ok(())
        }

        assert!(matches!(outer(), Err(FieldVisitError::Mapping(_))));
    }
}
