//! # profile-form
//!
//! Validation and derived-state core of a profile settings form.
//!
//! ## Components
//!
//! - **Schema**: declarative field rules, validated as a pure function into
//!   a [`FormPayload`](domain::FormPayload) or per-field errors
//! - **Debouncer**: forwards the last color edit of a quiet window to the
//!   shared [`ColorStore`](adapters::color_state::ColorStore)
//! - **Countries**: one-shot fetch of the calling-code reference table,
//!   guarded against results arriving after unmount
//! - **Form**: [`ProfileForm`](form::ProfileForm) binds the above per mount
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use profile_form::adapters::color_state::ColorStore;
//! use profile_form::adapters::country_loader::RestCountriesSource;
//! use profile_form::adapters::submission_sink::LogSink;
//! use profile_form::config::Settings;
//! use profile_form::form::ProfileForm;
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> anyhow::Result<()> {
//!     let settings = Settings::new()?;
//!     let source = Arc::new(RestCountriesSource::new(&settings.countries)?);
//!     let mut form = ProfileForm::mount(&settings, ColorStore::default(), source, Arc::new(LogSink::new()));
//!
//!     form.countries_loaded().await;
//!     form.select_country("Canada");
//!     println!("{}", form.calling_code().prefix());
//!     Ok(())
//! }
//! ```

pub mod adapters;
pub mod cli;
pub mod config;
pub mod domain;
pub mod form;
pub mod schema;
