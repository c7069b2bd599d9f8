//! Typed view of a validated profile submission and the option sets the
//! form offers for its choice-backed fields.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Push notification radio options.
pub const PUSH_NOTIFICATION_OPTIONS: &[&str] = &["push-everything", "push-email", "push-nothing"];

/// Satisfaction slider stops.
pub const SATISFACTION_RATINGS: &[&str] = &["3", "4", "5", "6", "7", "8"];

/// Inclusive bounds of the "overall experience" number input.
pub const EXPERIENCE_RANGE: (i64, i64) = (5, 13);

pub const DEFAULT_COUNTRY: &str = "Afghanistan";

/// Validated profile as handed to the submission sink.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProfileSettings {
    // Account
    pub username: String,
    pub password: String,

    // Profile
    pub about: String,
    /// Hex color preference, e.g. `#1F2937`.
    pub color: String,
    pub photo: String,
    /// File URLs returned by the upload collaborator.
    pub cover: Vec<String>,

    // Personal information
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub birthday: String,
    pub country: String,
    pub phone: String,
    pub url: String,
    pub street_address: String,
    pub city: String,
    pub region: String,
    pub postal_code: String,

    // Notifications
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comments: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub candidates: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub offers: Option<bool>,
    pub push_notifications: String,

    // Feedback
    pub rating: String,
    pub experience: String,
}

impl ProfileSettings {
    pub fn json_schema() -> schemars::schema::RootSchema {
        schemars::schema_for!(ProfileSettings)
    }
}
