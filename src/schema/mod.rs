//! Declarative field rules for the profile form.
//!
//! A [`FormSchema`] is an ordered list of [`FieldRule`]s keyed by field name.
//! Validation is a pure function from the raw field map to either a complete
//! [`FormPayload`] or the full set of per-field errors, never both.

use serde_json::{Map, Value};
use std::collections::BTreeMap;

mod rules;

pub use rules::{FieldKind, FieldRule};

use crate::config::FormSettings;
use crate::domain::profile::{EXPERIENCE_RANGE, PUSH_NOTIFICATION_OPTIONS, SATISFACTION_RATINGS};
use crate::domain::{FieldErrors, FormPayload};


#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormSchema {
    rules: Vec<FieldRule>,
}

impl FormSchema {
    pub fn new(rules: Vec<FieldRule>) -> Self {
        Self { rules }
    }

    /// Rules for the profile settings form.
    pub fn profile(settings: &FormSettings) -> Self {
        let choice = |options: &[&str]| FieldKind::Choice {
            options: options.iter().map(|o| o.to_string()).collect(),
            strict: settings.strict_choices,
        };

        Self::new(vec![
            FieldRule::new(
                "username",
                FieldKind::BoundedText {
                    max_len: settings.username_max_len,
                },
            ),
            FieldRule::new("password", FieldKind::Text),
            FieldRule::new("about", FieldKind::Text),
            FieldRule::new("color", FieldKind::Text),
            FieldRule::new("photo", FieldKind::Text),
            FieldRule::new("cover", FieldKind::TextList),
            FieldRule::new("firstName", FieldKind::Text),
            FieldRule::new("lastName", FieldKind::Text),
            FieldRule::new("email", FieldKind::Email),
            FieldRule::new("birthday", FieldKind::Text),
            // Options come from the fetched reference table, not the schema.
            FieldRule::new("country", FieldKind::Text),
            FieldRule::new("phone", FieldKind::Text),
            FieldRule::new("url", FieldKind::Url),
            FieldRule::new("streetAddress", FieldKind::Text),
            FieldRule::new("city", FieldKind::Text),
            FieldRule::new("region", FieldKind::Text),
            FieldRule::new("postalCode", FieldKind::Text),
            FieldRule::new("comments", FieldKind::OptionalFlag),
            FieldRule::new("candidates", FieldKind::OptionalFlag),
            FieldRule::new("offers", FieldKind::OptionalFlag),
            FieldRule::new("pushNotifications", choice(PUSH_NOTIFICATION_OPTIONS)),
            FieldRule::new("rating", choice(SATISFACTION_RATINGS)),
            FieldRule::new(
                "experience",
                FieldKind::NumberText {
                    min: EXPERIENCE_RANGE.0,
                    max: EXPERIENCE_RANGE.1,
                    strict: settings.strict_choices,
                },
            ),
        ])
    }

    /// Validates `raw` against every rule. Keys without a rule are dropped.
    pub fn validate(&self, raw: &Map<String, Value>) -> Result<FormPayload, FieldErrors> {
        let mut fields = BTreeMap::new();
        let mut errors = BTreeMap::new();

        for rule in &self.rules {
            match rule.check(raw.get(rule.name())) {
                Ok(Some(value)) => {
                    fields.insert(rule.name().to_string(), value);
                }
                Ok(None) => {}
                Err(error) => {
                    errors.insert(rule.name().to_string(), error);
                }
            }
        }

        if errors.is_empty() {
            Ok(FormPayload::from_fields(fields))
        } else {
            Err(FieldErrors::from_errors(errors))
        }
    }
}
