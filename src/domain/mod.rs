use async_trait::async_trait;

pub mod country;
pub mod payload;
pub mod profile;

pub use country::{lookup_calling_code, CallingCodeLookup, CountryRecord, CountryTable, LoadState};
pub use payload::{FieldErrors, FieldValue, FormPayload, ValidationError};
pub use profile::ProfileSettings;

use crate::adapters::country_loader::FetchError;

/// Provider of the countries reference dataset.
#[async_trait]
pub trait CountrySource: Send + Sync {
    async fn fetch(&self) -> Result<Vec<CountryRecord>, FetchError>;
}

/// Receiver of validated submissions.
pub trait SubmissionSink: Send + Sync {
    fn deliver(&self, payload: &FormPayload);
}
