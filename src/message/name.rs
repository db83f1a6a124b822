//! Message name rule: exactly two dotted segments of `[A-Za-z0-9_-]`.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::error::MessageError;

static NAME_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Za-z0-9_-]+\.[A-Za-z0-9_-]+$").expect("message name pattern is valid")
});

/// Checks `name` against the `<namespace>.<event>` rule.
///
/// # Example
/// ```
/// use eventbridge::validate_name;
///
/// assert!(validate_name("orders.created").is_ok());
/// assert!(validate_name("orders").is_err());
/// ```
pub fn validate_name(name: &str) -> Result<(), MessageError> {
    if NAME_PATTERN.is_match(name) {
        Ok(())
    } else {
        Err(MessageError::InvalidName {
            name: name.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accepts_two_segment_names() {
        for name in ["orders.created", "a.b", "user_profile.updated-v2", "A1.B2", "-._"] {
            assert!(validate_name(name).is_ok(), "{name} should be accepted");
        }
    }

    #[test]
    fn test_rejects_everything_else() {
        for name in [
            "",
            "test",
            ".created",
            "orders.",
            "orders.created.v2",
            "orders created.x",
            "orders.cre ated",
            "orders/created",
            "orders.created\n",
            "ordérs.created",
        ] {
            assert_eq!(
                validate_name(name),
                Err(MessageError::InvalidName {
                    name: name.to_string()
                }),
                "{name:?} should be rejected"
            );
        }
    }
}
