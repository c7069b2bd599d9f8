use anyhow::Context;
use clap::Parser;
use profile_form::adapters::color_state::ColorStore;
use profile_form::adapters::country_loader::{CountryDirectory, CountryLoader, RestCountriesSource};
use profile_form::adapters::scope::Scope;
use profile_form::adapters::submission_sink::LogSink;
use profile_form::cli::{Cli, Command};
use profile_form::config::Settings;
use profile_form::domain::{CallingCodeLookup, ProfileSettings};
use profile_form::form::ProfileForm;
use serde_json::Value;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();
    let settings = Settings::new_with_cli(&cli)?;

    match &cli.command {
        Command::Submit {
            input,
            colors,
            country,
        } => submit(&settings, input, colors, country.as_deref()).await,
        Command::Lookup { country } => lookup(&settings, country).await,
        Command::Schema => {
            let schema = serde_json::to_string_pretty(&ProfileSettings::json_schema())?;
            println!("{}", schema);
            Ok(())
        }
    }
}

async fn submit(
    settings: &Settings,
    input: &Path,
    colors: &[String],
    country: Option<&str>,
) -> anyhow::Result<()> {
    let content = std::fs::read_to_string(input)
        .with_context(|| format!("Failed to read {}", input.display()))?;
    let raw = match serde_json::from_str::<Value>(&content)? {
        Value::Object(map) => map,
        other => anyhow::bail!("Expected a JSON object of fields, got {}", other),
    };

    let source = Arc::new(RestCountriesSource::new(&settings.countries)?);
    let color_store = ColorStore::from_settings(&settings.color);
    let mut form = ProfileForm::mount(settings, color_store.clone(), source, Arc::new(LogSink::new()));

    form.countries_loaded().await;
    if let Some(country) = country {
        form.select_country(country);
    }
    info!(country = form.selected_country(), prefix = %form.calling_code().prefix(), "country selected");

    for color in colors {
        form.edit_color(color.as_str());
    }
    if !colors.is_empty() {
        // Let the last edit settle into the color store
        tokio::time::sleep(settings.color.debounce() + Duration::from_millis(10)).await;
        info!(color = %color_store.color(), "color preference stored");
    }

    let result = form.submit(raw);
    form.unmount();

    match result {
        Ok(_) => Ok(()),
        Err(errors) => {
            for (field, error) in errors.iter() {
                warn!(field, "{}", error);
            }
            Err(anyhow::anyhow!(errors))
        }
    }
}

async fn lookup(settings: &Settings, country: &str) -> anyhow::Result<()> {
    let source = Arc::new(RestCountriesSource::new(&settings.countries)?);
    let loader = CountryLoader::new(source, CountryDirectory::new());
    let scope = Scope::new();

    if let Some(handle) = loader.activate(scope.token()) {
        handle.await?;
    }

    let table = loader.directory().snapshot();
    match table.resolve_calling_code(country) {
        CallingCodeLookup::Found(code) => {
            println!("+{}", code);
            Ok(())
        }
        CallingCodeLookup::NoMatch => match table.similar_names(country).next() {
            Some(name) => anyhow::bail!("No country named '{}', did you mean '{}'?", country, name),
            None => anyhow::bail!("No country named '{}' among {} countries", country, table.len()),
        },
        CallingCodeLookup::Loading | CallingCodeLookup::Unavailable => {
            anyhow::bail!("Countries table could not be loaded from {}", settings.countries.endpoint)
        }
    }
}
