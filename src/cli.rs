use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Profile settings form - validate a profile submission and resolve its derived values
#[derive(Parser, Debug, Clone)]
#[command(name = "profile-form", version, about, long_about = None)]
pub struct Cli {
    /// Path to the configuration file
    #[arg(short, long, env = "PROFILE_FORM_CONFIG", default_value = "profile-form.toml")]
    pub config: PathBuf,

    /// Countries reference endpoint
    #[arg(long, env = "PROFILE_FORM_COUNTRIES_ENDPOINT")]
    pub countries_endpoint: Option<String>,

    /// Quiet period in milliseconds before a color edit reaches the color store
    #[arg(long, env = "PROFILE_FORM_DEBOUNCE_MS")]
    pub debounce_ms: Option<u64>,

    /// Reject choice values outside the offered option set
    #[arg(long)]
    pub strict_choices: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Validate a JSON field map and hand the payload to the log sink
    Submit {
        /// JSON object of raw field values
        #[arg(short, long)]
        input: PathBuf,

        /// Color edits applied in order before submitting
        #[arg(long = "color")]
        colors: Vec<String>,

        /// Country selection (overrides the configured default)
        #[arg(long)]
        country: Option<String>,
    },

    /// Fetch the countries table and print the calling code for a country
    Lookup {
        #[arg(long)]
        country: String,
    },

    /// Print the JSON Schema of a validated profile
    Schema,
}
