use config::{Config, File};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

pub mod validator;

use crate::adapters::color_state::DEFAULT_COLOR;
use crate::cli::Cli;
use crate::domain::profile::DEFAULT_COUNTRY;

pub const DEFAULT_COUNTRIES_ENDPOINT: &str =
    "https://restcountries.com/v2/all?fields=name,callingCodes";

#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq, Eq)]
pub struct Settings {
    #[serde(default)]
    pub countries: CountriesSettings,
    #[serde(default)]
    pub color: ColorSettings,
    #[serde(default)]
    pub form: FormSettings,
    #[serde(default)]
    pub upload: UploadSettings,
}

/// Where and how the countries reference table is fetched
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
pub struct CountriesSettings {
    #[serde(default = "default_endpoint")]
    pub endpoint: String,
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u64,
}

impl Default for CountriesSettings {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            timeout_seconds: default_timeout(),
        }
    }
}

impl CountriesSettings {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
pub struct ColorSettings {
    /// Value held by the color store before any edit propagates
    #[serde(default = "default_color")]
    pub initial: String,
    /// Quiet period before a color edit reaches the store
    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,
}

impl Default for ColorSettings {
    fn default() -> Self {
        Self {
            initial: default_color(),
            debounce_ms: default_debounce_ms(),
        }
    }
}

impl ColorSettings {
    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
pub struct FormSettings {
    #[serde(default = "default_username_max_len")]
    pub username_max_len: usize,
    #[serde(default = "default_country")]
    pub default_country: String,
    /// Reject choice values outside the offered option set
    #[serde(default)]
    pub strict_choices: bool,
}

impl Default for FormSettings {
    fn default() -> Self {
        Self {
            username_max_len: default_username_max_len(),
            default_country: default_country(),
            strict_choices: false,
        }
    }
}

/// Client-side key handed to the upload collaborator
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
pub struct UploadSettings {
    #[serde(default = "default_upload_key")]
    pub api_key: String,
}

impl Default for UploadSettings {
    fn default() -> Self {
        Self {
            api_key: default_upload_key(),
        }
    }
}

fn default_endpoint() -> String {
    DEFAULT_COUNTRIES_ENDPOINT.to_string()
}

fn default_timeout() -> u64 {
    10
}

fn default_color() -> String {
    DEFAULT_COLOR.to_string()
}

fn default_debounce_ms() -> u64 {
    100
}

fn default_username_max_len() -> usize {
    5
}

fn default_country() -> String {
    DEFAULT_COUNTRY.to_string()
}

fn default_upload_key() -> String {
    "free".to_string()
}

impl Settings {
    pub fn new() -> Result<Self, anyhow::Error> {
        Self::from_root(".")
    }

    /// Create settings from CLI arguments (config file, then CLI overrides)
    pub fn new_with_cli(cli: &Cli) -> Result<Self, anyhow::Error> {
        let mut settings = Self::load(&cli.config)?;

        // CLI > config file > defaults
        settings.apply_cli_overrides(cli);

        settings.validate()?;
        Ok(settings)
    }

    /// Load `profile-form.{toml,json,yaml}` from `root`, if present.
    pub fn from_root(root: &str) -> Result<Self, anyhow::Error> {
        let config_path = Path::new(root).join("profile-form");
        let settings = Self::load(&config_path)?;
        settings.validate()?;
        Ok(settings)
    }

    fn load(path: &Path) -> Result<Self, anyhow::Error> {
        let s = Config::builder()
            .add_source(File::from(path).required(false))
            .set_default("countries.endpoint", DEFAULT_COUNTRIES_ENDPOINT)?
            .set_default("color.debounce_ms", default_debounce_ms() as i64)?
            .build()?;

        Ok(s.try_deserialize()?)
    }

    fn apply_cli_overrides(&mut self, cli: &Cli) {
        if let Some(endpoint) = &cli.countries_endpoint {
            self.countries.endpoint = endpoint.clone();
        }
        if let Some(debounce_ms) = cli.debounce_ms {
            self.color.debounce_ms = debounce_ms;
        }
        if cli.strict_choices {
            self.form.strict_choices = true;
        }
    }

    fn validate(&self) -> Result<(), anyhow::Error> {
        validator::SettingsValidator::validate(self).map_err(|errors| {
            let error_messages: Vec<String> = errors.iter().map(|e| e.to_string()).collect();
            anyhow::anyhow!(
                "Configuration validation failed:\n{}",
                error_messages.join("\n")
            )
        })
    }
}
