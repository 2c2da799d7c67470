//! Type-intrinsic and pattern validation of configuration values.
use super::types::{KeyMeta, ValueType};
use crate::error::ValidationError;

/// Accepted spellings for `bool` values (compared case-insensitively).
const BOOL_WORDS: &[&str] = &["true", "false", "yes", "no", "1", "0", "on", "off"];

/// Spellings that `get_bool` treats as true (compared case-insensitively).
const TRUE_WORDS: &[&str] = &["true", "yes", "1", "on"];

/// Validate `value` against a key's metadata.
///
/// The type check runs first; the pattern, when present, is an unanchored
/// search so patterns must anchor themselves to constrain the whole value.
///
/// # Errors
///
/// Returns the first check that failed.
pub fn validate(meta: &KeyMeta, value: &str) -> Result<(), ValidationError> {
    check_type(meta.value_type, value)?;

    if let Some(pattern) = &meta.pattern
        && !pattern.is_match(value)
    {
        return Err(ValidationError::PatternMismatch {
            value: value.to_string(),
            pattern: pattern.as_str().to_string(),
        });
    }

    Ok(())
}

fn check_type(value_type: ValueType, value: &str) -> Result<(), ValidationError> {
    match value_type {
        ValueType::Int if !is_signed_int(value) => {
            Err(ValidationError::NotInteger(value.to_string()))
        }
        ValueType::Bool if !is_bool_word(value) => {
            Err(ValidationError::NotBoolean(value.to_string()))
        }
        _ => Ok(()),
    }
}

fn is_signed_int(value: &str) -> bool {
    is_unsigned_int(value.strip_prefix('-').unwrap_or(value))
}

fn is_bool_word(value: &str) -> bool {
    BOOL_WORDS.iter().any(|w| w.eq_ignore_ascii_case(value))
}

/// Interpret a stored value as a boolean: true only for `true|yes|1|on`.
#[must_use]
pub fn is_truthy(value: &str) -> bool {
    TRUE_WORDS.iter().any(|w| w.eq_ignore_ascii_case(value))
}

/// Return `true` if `value` is an unsigned decimal integer.
#[must_use]
pub fn is_unsigned_int(value: &str) -> bool {
    !value.is_empty() && value.bytes().all(|b| b.is_ascii_digit())
}
