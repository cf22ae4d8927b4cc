use std::sync::LazyLock;

use regex::Regex;
use validator::{Validate, ValidationErrors, ValidationErrorsKind};

pub static EMAIL_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-zA-Z0-9_.+-]+@[a-zA-Z0-9-]+\.[a-zA-Z0-9-.]+$").unwrap());

/// Jordanian mobile numbers in international form.
pub static PHONE_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\+9627[789]\d{7}$").unwrap());

/// Validates and flattens every message into one ` | ` separated line.
pub fn check<T: Validate>(value: &T) -> Result<(), String> {
    value.validate().map_err(|errors| describe(&errors))
}

pub fn describe(errors: &ValidationErrors) -> String {
    let mut messages = Vec::new();
    collect(errors, &mut messages);

    messages.join(" | ")
}

fn collect(errors: &ValidationErrors, messages: &mut Vec<String>) {
    let mut fields: Vec<_> = errors.errors().iter().collect();
    fields.sort_by(|(left, _), (right, _)| left.cmp(right));

    for (field, kind) in fields {
        match kind {
            ValidationErrorsKind::Field(list) => {
                for error in list {
                    let message = match &error.message {
                        Some(message) => message.to_string(),
                        None => format!("Invalid {field}"),
                    };

                    if !messages.contains(&message) {
                        messages.push(message);
                    }
                }
            }
            ValidationErrorsKind::Struct(nested) => collect(nested, messages),
            ValidationErrorsKind::List(items) => {
                for nested in items.values() {
                    collect(nested, messages);
                }
            }
        }
    }
}

pub fn tidy(value: &mut String) {
    *value = value.trim().to_string();
}

/// Trims, and collapses blank optional text to `None`.
pub fn tidy_optional(value: &mut Option<String>) {
    *value = value
        .take()
        .map(|text| text.trim().to_string())
        .filter(|text| !text.is_empty());
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_emails() {
        assert!(EMAIL_PATTERN.is_match("hiker@example.com"));
        assert!(EMAIL_PATTERN.is_match("first.last+trail@mail.example.jo"));
        assert!(!EMAIL_PATTERN.is_match("no-at-sign.com"));
        assert!(!EMAIL_PATTERN.is_match("spaces in@example.com"));
        assert!(!EMAIL_PATTERN.is_match("missing@tld"));
    }

    #[test]
    fn test_phones() {
        assert!(PHONE_PATTERN.is_match("+962791234567"));
        assert!(PHONE_PATTERN.is_match("+962771234567"));
        assert!(PHONE_PATTERN.is_match("+962781234567"));
        assert!(!PHONE_PATTERN.is_match("+962761234567"));
        assert!(!PHONE_PATTERN.is_match("0791234567"));
        assert!(!PHONE_PATTERN.is_match("+9627912345678"));
    }

    #[test]
    fn test_tidy_optional() {
        let mut blank = Some("   ".to_string());
        tidy_optional(&mut blank);
        assert_eq!(blank, None);

        let mut padded = Some("  https://trails.jo ".to_string());
        tidy_optional(&mut padded);
        assert_eq!(padded.as_deref(), Some("https://trails.jo"));
    }
}
