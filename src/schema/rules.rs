use regex::Regex;
use reqwest::Url;
use serde_json::Value;
use std::sync::LazyLock;

use crate::domain::{FieldValue, ValidationError};

static EMAIL_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^[A-Z0-9_'+\-.]*[A-Z0-9_+\-]@([A-Z0-9][A-Z0-9\-]*\.)+[A-Z]{2,}$")
        .expect("email pattern is a valid regex")
});

/// Value kind and constraints for one field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldKind {
    /// Any string, empty included.
    Text,
    /// String of at most `max_len` UTF-16 code units.
    BoundedText { max_len: usize },
    Email,
    /// Absolute URL.
    Url,
    /// Checkbox or toggle; may be absent.
    OptionalFlag,
    /// Radio/select-backed string. Membership in `options` is only
    /// checked when `strict` is set.
    Choice { options: Vec<String>, strict: bool },
    /// Number input submitted as a string. The integer range is only
    /// checked when `strict` is set.
    NumberText { min: i64, max: i64, strict: bool },
    /// List of strings, e.g. uploaded file URLs.
    TextList,
}

/// A named rule binding one form field to its kind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldRule {
    name: String,
    kind: FieldKind,
}

impl FieldRule {
    pub fn new(name: impl Into<String>, kind: FieldKind) -> Self {
        Self {
            name: name.into(),
            kind,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Checks a raw value. `Ok(None)` means an optional field was absent.
    pub fn check(&self, raw: Option<&Value>) -> Result<Option<FieldValue>, ValidationError> {
        let Some(raw) = raw else {
            return match self.kind {
                FieldKind::OptionalFlag => Ok(None),
                _ => Err(ValidationError::Required),
            };
        };

        match &self.kind {
            FieldKind::Text => expect_string(raw).map(|s| Some(FieldValue::Text(s.to_string()))),
            FieldKind::BoundedText { max_len } => {
                let text = expect_string(raw)?;
                // Browsers and the client-side validator count UTF-16 units
                if text.encode_utf16().count() > *max_len {
                    return Err(ValidationError::TooLong { max: *max_len });
                }
                Ok(Some(FieldValue::Text(text.to_string())))
            }
            FieldKind::Email => {
                let text = expect_string(raw)?;
                if !is_email(text) {
                    return Err(ValidationError::InvalidEmail);
                }
                Ok(Some(FieldValue::Text(text.to_string())))
            }
            FieldKind::Url => {
                let text = expect_string(raw)?;
                if !is_absolute_url(text) {
                    return Err(ValidationError::InvalidUrl);
                }
                Ok(Some(FieldValue::Text(text.to_string())))
            }
            FieldKind::OptionalFlag => match raw {
                Value::Bool(flag) => Ok(Some(FieldValue::Flag(*flag))),
                other => Err(ValidationError::InvalidType {
                    expected: "boolean",
                    received: type_name(other),
                }),
            },
            FieldKind::Choice { options, strict } => {
                let text = expect_string(raw)?;
                if *strict && !options.iter().any(|option| option == text) {
                    return Err(ValidationError::InvalidOption {
                        expected: options
                            .iter()
                            .map(|option| format!("'{}'", option))
                            .collect::<Vec<_>>()
                            .join(" | "),
                        received: text.to_string(),
                    });
                }
                Ok(Some(FieldValue::Text(text.to_string())))
            }
            FieldKind::NumberText { min, max, strict } => {
                let text = expect_string(raw)?;
                if *strict {
                    let number: i64 = text.trim().parse().map_err(|_| ValidationError::InvalidType {
                        expected: "number",
                        received: "string",
                    })?;
                    if number < *min || number > *max {
                        return Err(ValidationError::OutOfRange {
                            min: *min,
                            max: *max,
                        });
                    }
                }
                Ok(Some(FieldValue::Text(text.to_string())))
            }
            FieldKind::TextList => {
                let Value::Array(items) = raw else {
                    return Err(ValidationError::InvalidType {
                        expected: "array",
                        received: type_name(raw),
                    });
                };
                let items = items
                    .iter()
                    .map(|item| expect_string(item).map(str::to_string))
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(Some(FieldValue::List(items)))
            }
        }
    }
}

fn expect_string(raw: &Value) -> Result<&str, ValidationError> {
    raw.as_str().ok_or(ValidationError::InvalidType {
        expected: "string",
        received: type_name(raw),
    })
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

fn is_email(text: &str) -> bool {
    !text.starts_with('.') && !text.contains("..") && EMAIL_PATTERN.is_match(text)
}

fn is_absolute_url(text: &str) -> bool {
    Url::parse(text).is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_email_grammar() {
        assert!(is_email("a@b.com"));
        assert!(is_email("first.last+tag@mail.example.org"));
        assert!(!is_email("not-an-email"));
        assert!(!is_email("a@b"));
        assert!(!is_email(".a@b.com"));
        assert!(!is_email("a..b@c.com"));
        assert!(!is_email(""));
    }

    #[test]
    fn test_url_grammar() {
        assert!(is_absolute_url("https://example.com"));
        assert!(is_absolute_url("http://localhost:8080/path?q=1"));
        assert!(!is_absolute_url("example"));
        assert!(!is_absolute_url("/relative/path"));
        assert!(!is_absolute_url(""));
    }

    #[test]
    fn test_bounded_text_counts_utf16_units() {
        let rule = FieldRule::new("username", FieldKind::BoundedText { max_len: 5 });
        assert!(rule.check(Some(&json!("héllo"))).is_ok());
        assert_eq!(
            rule.check(Some(&json!("héllo!"))),
            Err(ValidationError::TooLong { max: 5 })
        );
        // Each emoji is a surrogate pair: six units
        assert_eq!(
            rule.check(Some(&json!("😀😀😀"))),
            Err(ValidationError::TooLong { max: 5 })
        );
        assert!(rule.check(Some(&json!("😀😀"))).is_ok());
    }

    #[test]
    fn test_number_text_range() {
        let loose = FieldRule::new(
            "experience",
            FieldKind::NumberText {
                min: 5,
                max: 13,
                strict: false,
            },
        );
        assert!(loose.check(Some(&json!("40"))).is_ok());

        let strict = FieldRule::new(
            "experience",
            FieldKind::NumberText {
                min: 5,
                max: 13,
                strict: true,
            },
        );
        assert_eq!(
            strict.check(Some(&json!("13"))),
            Ok(Some(FieldValue::Text("13".into())))
        );
        assert!(strict.check(Some(&json!("5"))).is_ok());
        assert_eq!(
            strict.check(Some(&json!("4"))),
            Err(ValidationError::OutOfRange { min: 5, max: 13 })
        );
        assert_eq!(
            strict.check(Some(&json!("14"))).unwrap_err().to_string(),
            "Number must be between 5 and 13"
        );
        assert_eq!(
            strict.check(Some(&json!("lots"))),
            Err(ValidationError::InvalidType {
                expected: "number",
                received: "string"
            })
        );
    }

    #[test]
    fn test_optional_flag() {
        let rule = FieldRule::new("offers", FieldKind::OptionalFlag);
        assert_eq!(rule.check(None), Ok(None));
        assert_eq!(rule.check(Some(&json!(false))), Ok(Some(FieldValue::Flag(false))));
        assert_eq!(
            rule.check(Some(&json!("on"))),
            Err(ValidationError::InvalidType {
                expected: "boolean",
                received: "string"
            })
        );
    }

    #[test]
    fn test_choice_permissive_and_strict() {
        let options = vec!["a".to_string(), "b".to_string()];
        let loose = FieldRule::new(
            "pick",
            FieldKind::Choice {
                options: options.clone(),
                strict: false,
            },
        );
        assert!(loose.check(Some(&json!("zzz"))).is_ok());

        let strict = FieldRule::new("pick", FieldKind::Choice { options, strict: true });
        assert!(strict.check(Some(&json!("a"))).is_ok());
        let err = strict.check(Some(&json!("zzz"))).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Invalid option. Expected 'a' | 'b', received 'zzz'"
        );
    }

    #[test]
    fn test_text_list() {
        let rule = FieldRule::new("cover", FieldKind::TextList);
        assert_eq!(
            rule.check(Some(&json!(["u1", "u2"]))),
            Ok(Some(FieldValue::List(vec!["u1".into(), "u2".into()])))
        );
        assert!(rule.check(Some(&json!([1]))).is_err());
        assert!(rule.check(Some(&json!("u1"))).is_err());
    }
}
