use profile_form::config::{Settings, DEFAULT_COUNTRIES_ENDPOINT};
use std::fs;
use tempfile::TempDir;

#[test]
fn test_defaults_without_config_file() -> anyhow::Result<()> {
    let temp_dir = TempDir::new()?;

    let settings = Settings::from_root(temp_dir.path().to_str().unwrap())?;

    assert_eq!(settings.countries.endpoint, DEFAULT_COUNTRIES_ENDPOINT);
    assert_eq!(settings.countries.timeout_seconds, 10);
    assert_eq!(settings.color.initial, "#1F2937");
    assert_eq!(settings.color.debounce_ms, 100);
    assert_eq!(settings.form.username_max_len, 5);
    assert_eq!(settings.form.default_country, "Afghanistan");
    assert!(!settings.form.strict_choices);
    assert_eq!(settings.upload.api_key, "free");
    Ok(())
}

#[test]
fn test_load_toml_config() -> anyhow::Result<()> {
    let temp_dir = TempDir::new()?;
    let root = temp_dir.path();

    let config_toml = r##"
[countries]
endpoint = "http://localhost:9000/v2/all"
timeout_seconds = 3

[color]
initial = "#000000"
debounce_ms = 250

[form]
username_max_len = 12
default_country = "Norway"
strict_choices = true
"##;
    fs::write(root.join("profile-form.toml"), config_toml)?;

    let settings = Settings::from_root(root.to_str().unwrap())?;

    assert_eq!(settings.countries.endpoint, "http://localhost:9000/v2/all");
    assert_eq!(settings.countries.timeout_seconds, 3);
    assert_eq!(settings.color.initial, "#000000");
    assert_eq!(settings.color.debounce_ms, 250);
    assert_eq!(settings.form.username_max_len, 12);
    assert_eq!(settings.form.default_country, "Norway");
    assert!(settings.form.strict_choices);
    // Section not present in the file keeps its defaults
    assert_eq!(settings.upload.api_key, "free");
    Ok(())
}

#[test]
fn test_invalid_config_is_rejected() -> anyhow::Result<()> {
    let temp_dir = TempDir::new()?;
    let root = temp_dir.path();

    let config_toml = r##"
[color]
initial = "blue"

[form]
username_max_len = 0
"##;
    fs::write(root.join("profile-form.toml"), config_toml)?;

    let err = Settings::from_root(root.to_str().unwrap()).unwrap_err();
    let message = err.to_string();
    assert!(message.contains("Configuration validation failed"));
    assert!(message.contains("color.initial"));
    assert!(message.contains("form.username_max_len"));
    Ok(())
}
