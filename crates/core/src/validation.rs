use std::fmt;
use std::sync::LazyLock;

use regex::Regex;

static HEX_COLOR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^#([A-Fa-f0-9]{6}|[A-Fa-f0-9]{3})$").expect("static pattern"));
static EMAIL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("static pattern"));

/// Client-side form constraints, checked before anything is dispatched.
pub trait Validate {
    fn validate(&self) -> Result<(), ValidationErrors>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationErrors {
    errors: Vec<FieldError>,
}

impl ValidationErrors {
    pub fn single(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            errors: vec![FieldError {
                field: field.into(),
                message: message.into(),
            }],
        }
    }

    pub fn errors(&self) -> &[FieldError] {
        &self.errors
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    /// First message reported for `field`, for inline rendering next to the input.
    pub fn for_field(&self, field: &str) -> Option<&str> {
        self.errors
            .iter()
            .find(|e| e.field == field)
            .map(|e| e.message.as_str())
    }

    pub fn merge(&mut self, other: ValidationErrors) {
        self.errors.extend(other.errors);
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, e) in self.errors.iter().enumerate() {
            if i > 0 {
                f.write_str("; ")?;
            }
            write!(f, "{}: {}", e.field, e.message)?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationErrors {}

/// Accumulates field errors so a form reports every problem at once.
#[derive(Debug, Default)]
pub struct Checker {
    errors: Vec<FieldError>,
}

impl Checker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, field: &str, message: impl Into<String>) -> &mut Self {
        self.errors.push(FieldError {
            field: field.to_string(),
            message: message.into(),
        });
        self
    }

    /// Character count (not bytes) within `min..=max`.
    pub fn length(&mut self, field: &str, value: &str, min: usize, max: usize) -> &mut Self {
        let len = value.chars().count();
        if len < min {
            if min == 1 {
                self.push(field, "Required");
            } else {
                self.push(field, format!("Must be at least {min} characters"));
            }
        } else if len > max {
            self.push(field, format!("Max {max} characters"));
        }
        self
    }

    pub fn max_length(&mut self, field: &str, value: Option<&str>, max: usize) -> &mut Self {
        if let Some(v) = value {
            if v.chars().count() > max {
                self.push(field, format!("Max {max} characters"));
            }
        }
        self
    }

    pub fn not_blank(&mut self, field: &str, value: &str) -> &mut Self {
        if value.trim().is_empty() {
            self.push(field, "Required");
        }
        self
    }

    /// Absent and empty values pass; anything else must parse as an absolute URL.
    pub fn optional_url(&mut self, field: &str, value: Option<&str>) -> &mut Self {
        match value {
            Some(v) if !v.is_empty() && url::Url::parse(v).is_err() => {
                self.push(field, "Must be a valid URL")
            }
            _ => self,
        }
    }

    pub fn hex_color(&mut self, field: &str, value: &str) -> &mut Self {
        if !HEX_COLOR.is_match(value) {
            self.push(field, "Invalid hex color");
        }
        self
    }

    pub fn email(&mut self, field: &str, value: &str) -> &mut Self {
        if !EMAIL.is_match(value) {
            self.push(field, "Must be a valid email");
        }
        self
    }

    pub fn nested(&mut self, prefix: &str, result: Result<(), ValidationErrors>) -> &mut Self {
        if let Err(inner) = result {
            for e in inner.errors {
                self.errors.push(FieldError {
                    field: format!("{prefix}.{}", e.field),
                    message: e.message,
                });
            }
        }
        self
    }

    /// Everything recorded so far, for forms that bail out on a missing value.
    pub fn into_errors(self) -> ValidationErrors {
        ValidationErrors {
            errors: self.errors,
        }
    }

    pub fn finish(&mut self) -> Result<(), ValidationErrors> {
        if self.errors.is_empty() {
            Ok(())
        } else {
            Err(ValidationErrors {
                errors: std::mem::take(&mut self.errors),
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn length_counts_chars_not_bytes() {
        let mut c = Checker::new();
        c.length("initials", "ÉÉÉÉÉ", 1, 5);
        assert!(c.finish().is_ok());
    }

    #[test]
    fn collects_every_failure() {
        let err = Checker::new()
            .length("title", "x", 2, 100)
            .optional_url("liveUrl", Some("not a url"))
            .hex_color("gradientFrom", "#12")
            .finish()
            .unwrap_err();
        assert_eq!(err.errors().len(), 3);
        assert_eq!(err.for_field("title"), Some("Must be at least 2 characters"));
        assert_eq!(err.for_field("gradientFrom"), Some("Invalid hex color"));
    }

    #[test]
    fn empty_optional_url_passes() {
        assert!(Checker::new().optional_url("imageUrl", Some("")).finish().is_ok());
        assert!(Checker::new().optional_url("imageUrl", None).finish().is_ok());
        assert!(
            Checker::new()
                .optional_url("imageUrl", Some("https://example.com/a.png"))
                .finish()
                .is_ok()
        );
    }

    #[test]
    fn hex_color_accepts_short_and_long_forms() {
        assert!(Checker::new().hex_color("c", "#fff").finish().is_ok());
        assert!(Checker::new().hex_color("c", "#A1b2C3").finish().is_ok());
        assert!(Checker::new().hex_color("c", "fff").finish().is_err());
    }

    #[test]
    fn email_shape() {
        assert!(Checker::new().email("email", "me@site.dev").finish().is_ok());
        assert!(Checker::new().email("email", "me@site").finish().is_err());
    }

    #[test]
    fn nested_prefixes_field_names() {
        let inner = Checker::new().not_blank("label", " ").finish();
        let err = Checker::new().nested("stats[2]", inner).finish().unwrap_err();
        assert_eq!(err.for_field("stats[2].label"), Some("Required"));
        assert_eq!(err.to_string(), "stats[2].label: Required");
    }
}
