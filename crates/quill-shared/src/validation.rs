//! Custom field validators used by the request DTOs.

use std::borrow::Cow;

use validator::ValidationError;

/// Lowercase ASCII words joined by single hyphens, e.g. `my-first-post`.
pub fn validate_slug(value: &str) -> Result<(), ValidationError> {
    let well_formed = !value.is_empty()
        && value
            .split('-')
            .all(|part| !part.is_empty() && part.bytes().all(|b| b.is_ascii_lowercase() || b.is_ascii_digit()));

    if well_formed {
        Ok(())
    } else {
        Err(ValidationError::new("slug").with_message(Cow::Borrowed(
            "Must contain only lowercase letters, digits and single hyphens",
        )))
    }
}

/// `#rgb` or `#rrggbb` hex color.
pub fn validate_color(value: &str) -> Result<(), ValidationError> {
    let hex = value.strip_prefix('#').unwrap_or("");
    if matches!(hex.len(), 3 | 6) && hex.bytes().all(|b| b.is_ascii_hexdigit()) {
        Ok(())
    } else {
        Err(ValidationError::new("color")
            .with_message(Cow::Borrowed("Must be a hex color like #6c757d")))
    }
}

/// Turn a title into a slug candidate.
pub fn slugify(title: &str) -> String {
    title
        .to_lowercase()
        .split(|c: char| !c.is_ascii_alphanumeric())
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join("-")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slug_rules() {
        assert!(validate_slug("hello-world").is_ok());
        assert!(validate_slug("rust2024").is_ok());
        assert!(validate_slug("Hello-World").is_err());
        assert!(validate_slug("hello--world").is_err());
        assert!(validate_slug("-hello").is_err());
        assert!(validate_slug("hello world").is_err());
        assert!(validate_slug("").is_err());
    }

    #[test]
    fn test_color_rules() {
        assert!(validate_color("#6c757d").is_ok());
        assert!(validate_color("#FFF").is_ok());
        assert!(validate_color("6c757d").is_err());
        assert!(validate_color("#12345").is_err());
        assert!(validate_color("#zzzzzz").is_err());
    }

    #[test]
    fn test_slugify() {
        assert_eq!(slugify("Hello, World!"), "hello-world");
        assert_eq!(slugify("  Rust & SeaORM 1.0 "), "rust-seaorm-1-0");
        assert!(validate_slug(&slugify("A Post About Things")).is_ok());
    }
}
