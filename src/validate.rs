use std::collections::BTreeMap;
use std::sync::OnceLock;

use regex::Regex;
use rust_decimal::Decimal;

/// Field name → message, rendered into the 422 validation envelope.
pub type FieldErrors = BTreeMap<String, String>;

static EMAIL_REGEX: OnceLock<Regex> = OnceLock::new();

fn email_regex() -> &'static Regex {
    EMAIL_REGEX.get_or_init(|| {
        Regex::new(r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$")
            .expect("email regex is valid")
    })
}

/// Collect "<Field> is required" messages for every field that is absent or
/// blank. Validators never fail; they only report.
pub fn required(fields: &[(&str, Option<&str>)]) -> FieldErrors {
    let mut errors = FieldErrors::new();
    for (name, value) in fields {
        match value {
            Some(v) if !v.trim().is_empty() => {}
            _ => {
                errors.insert((*name).to_string(), format!("{} is required", label(name)));
            }
        }
    }
    errors
}

/// "first_name" → "First name", used when building messages.
pub fn label(field: &str) -> String {
    let spaced = field.replace('_', " ");
    let mut chars = spaced.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => spaced,
    }
}

pub fn email(value: &str) -> bool {
    email_regex().is_match(value)
}

/// At least 8 characters with an uppercase letter, a lowercase letter and a
/// digit.
pub fn password(value: &str) -> bool {
    value.len() >= 8
        && value.chars().any(|c| c.is_ascii_uppercase())
        && value.chars().any(|c| c.is_ascii_lowercase())
        && value.chars().any(|c| c.is_ascii_digit())
}

/// A phone number is anything carrying at least 7 digits once separators are
/// stripped.
pub fn phone(value: &str) -> bool {
    value.chars().filter(|c| c.is_ascii_digit()).count() >= 7
}

pub fn positive(value: Decimal) -> bool {
    value > Decimal::ZERO
}

/// Trim and HTML-escape free-text input before it is stored or echoed.
pub fn sanitize(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.trim().chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#039;"),
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn required_reports_missing_and_blank_fields() {
        let errors = required(&[
            ("email", None),
            ("first_name", Some("   ")),
            ("last_name", Some("Shrestha")),
        ]);

        assert_eq!(errors.len(), 2);
        assert_eq!(errors["email"], "Email is required");
        assert_eq!(errors["first_name"], "First name is required");
        assert!(!errors.contains_key("last_name"));
    }

    #[test]
    fn labels_capitalize_and_space_field_names() {
        assert_eq!(label("first_name"), "First name");
        assert_eq!(label("password_confirm"), "Password confirm");
        assert_eq!(label("q"), "Q");
    }

    #[test]
    fn email_accepts_plain_addresses() {
        assert!(email("ram.thapa@example.com"));
        assert!(email("a+tag@sub.domain.org"));
        assert!(!email("not-an-email"));
        assert!(!email("missing@tld"));
        assert!(!email("@example.com"));
    }

    #[test]
    fn password_requires_mixed_classes() {
        assert!(password("Str0ngPass"));
        assert!(!password("short1A"));
        assert!(!password("alllowercase1"));
        assert!(!password("ALLUPPERCASE1"));
        assert!(!password("NoDigitsHere"));
    }

    #[test]
    fn phone_counts_digits_only() {
        assert!(phone("981-234-5678"));
        assert!(phone("(977) 1 4412345"));
        assert!(!phone("12-34"));
        assert!(!phone("call me"));
    }

    #[test]
    fn positive_rejects_zero_and_negative() {
        assert!(positive(Decimal::new(1, 2))); // 0.01
        assert!(!positive(Decimal::ZERO));
        assert!(!positive(Decimal::new(-500, 2)));
    }

    #[test]
    fn sanitize_trims_and_escapes() {
        assert_eq!(
            sanitize("  <b>\"nice\" shoes</b> & more '  "),
            "&lt;b&gt;&quot;nice&quot; shoes&lt;/b&gt; &amp; more &#039;"
        );
        assert_eq!(sanitize("plain text"), "plain text");
    }
}
