use reqwest::Url;
use thiserror::Error;

use crate::config::{ColorSettings, CountriesSettings, FormSettings, Settings, UploadSettings};

const MAX_DEBOUNCE_MS: u64 = 10_000;

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("Missing required field: {0}")]
    MissingField(String),

    #[error("Invalid value for {field}: {reason}")]
    InvalidValue { field: String, reason: String },
}

pub struct SettingsValidator;

impl SettingsValidator {
    pub fn validate(settings: &Settings) -> Result<(), Vec<SettingsError>> {
        let mut errors = Vec::new();

        // Validate countries settings
        if let Err(e) = Self::validate_countries(&settings.countries) {
            errors.extend(e);
        }

        // Validate color settings
        if let Err(e) = Self::validate_color(&settings.color) {
            errors.extend(e);
        }

        // Validate form settings
        if let Err(e) = Self::validate_form(&settings.form) {
            errors.extend(e);
        }

        // Validate upload settings
        if let Err(e) = Self::validate_upload(&settings.upload) {
            errors.extend(e);
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    fn validate_countries(countries: &CountriesSettings) -> Result<(), Vec<SettingsError>> {
        let mut errors = Vec::new();

        if countries.endpoint.is_empty() {
            errors.push(SettingsError::MissingField("countries.endpoint".to_string()));
        } else {
            match Url::parse(&countries.endpoint) {
                Ok(url) if matches!(url.scheme(), "http" | "https") => {}
                Ok(url) => errors.push(SettingsError::InvalidValue {
                    field: "countries.endpoint".to_string(),
                    reason: format!("Unsupported scheme '{}'", url.scheme()),
                }),
                Err(e) => errors.push(SettingsError::InvalidValue {
                    field: "countries.endpoint".to_string(),
                    reason: e.to_string(),
                }),
            }
        }

        if countries.timeout_seconds == 0 {
            errors.push(SettingsError::InvalidValue {
                field: "countries.timeout_seconds".to_string(),
                reason: "Timeout must be greater than 0".to_string(),
            });
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    fn validate_color(color: &ColorSettings) -> Result<(), Vec<SettingsError>> {
        let mut errors = Vec::new();

        if !is_hex_color(&color.initial) {
            errors.push(SettingsError::InvalidValue {
                field: "color.initial".to_string(),
                reason: format!("'{}' is not a #rrggbb color", color.initial),
            });
        }

        // 0 is allowed: emission still waits for the next scheduler turn
        if color.debounce_ms > MAX_DEBOUNCE_MS {
            errors.push(SettingsError::InvalidValue {
                field: "color.debounce_ms".to_string(),
                reason: format!("Debounce must be at most {} ms", MAX_DEBOUNCE_MS),
            });
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    fn validate_form(form: &FormSettings) -> Result<(), Vec<SettingsError>> {
        let mut errors = Vec::new();

        if form.username_max_len == 0 {
            errors.push(SettingsError::InvalidValue {
                field: "form.username_max_len".to_string(),
                reason: "Maximum length must be greater than 0".to_string(),
            });
        }

        if form.default_country.is_empty() {
            errors.push(SettingsError::MissingField("form.default_country".to_string()));
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    fn validate_upload(upload: &UploadSettings) -> Result<(), Vec<SettingsError>> {
        if upload.api_key.is_empty() {
            return Err(vec![SettingsError::MissingField("upload.api_key".to_string())]);
        }
        Ok(())
    }
}

fn is_hex_color(value: &str) -> bool {
    value.len() == 7
        && value.starts_with('#')
        && value[1..].chars().all(|c| c.is_ascii_hexdigit())
}
