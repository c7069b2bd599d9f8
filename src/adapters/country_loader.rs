use async_trait::async_trait;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use super::scope::ScopeToken;
use crate::config::CountriesSettings;
use crate::domain::{CountryRecord, CountrySource, CountryTable};

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Countries endpoint returned status {status}")]
    Status { status: u16 },

    #[error("Failed to decode countries response: {0}")]
    Decode(String),
}

/// Fetches the reference table from a restcountries-style endpoint.
pub struct RestCountriesSource {
    client: reqwest::Client,
    endpoint: String,
}

impl RestCountriesSource {
    pub fn new(settings: &CountriesSettings) -> Result<Self, FetchError> {
        let client = reqwest::Client::builder()
            .timeout(settings.timeout())
            .build()?;

        Ok(Self {
            client,
            endpoint: settings.endpoint.clone(),
        })
    }
}

#[async_trait]
impl CountrySource for RestCountriesSource {
    async fn fetch(&self) -> Result<Vec<CountryRecord>, FetchError> {
        let response = self.client.get(&self.endpoint).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                status: status.as_u16(),
            });
        }

        let records: Vec<CountryRecord> = response
            .json()
            .await
            .map_err(|e| FetchError::Decode(e.to_string()))?;

        Ok(drop_records_without_codes(records))
    }
}

/// Keeps only records that carry at least one calling code.
pub fn drop_records_without_codes(records: Vec<CountryRecord>) -> Vec<CountryRecord> {
    records
        .into_iter()
        .filter(|record| {
            if record.calling_codes.is_empty() {
                warn!(country = %record.name, "skipping country without calling codes");
                return false;
            }
            true
        })
        .collect()
}

/// Read side of the reference table. Cloning shares the same table.
#[derive(Debug, Clone)]
pub struct CountryDirectory {
    tx: Arc<watch::Sender<CountryTable>>,
}

impl Default for CountryDirectory {
    fn default() -> Self {
        let (tx, _rx) = watch::channel(CountryTable::default());
        Self { tx: Arc::new(tx) }
    }
}

impl CountryDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn snapshot(&self) -> CountryTable {
        self.tx.borrow().clone()
    }

    fn replace(&self, records: Vec<CountryRecord>) {
        self.tx.send_replace(CountryTable::loaded(records));
    }

    fn mark_failed(&self) {
        self.tx.send_modify(|table| *table = table.mark_failed());
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    /// The table was replaced with this many records.
    Replaced(usize),
    /// The fetch failed; the table kept its previous records.
    Failed,
    /// The owning scope ended before the result arrived.
    Stale,
    /// A later fetch was issued before this one resolved.
    Superseded,
}

/// Applies a fetch result to `directory`, unless `scope` has ended.
pub fn apply_result(
    directory: &CountryDirectory,
    scope: &ScopeToken,
    result: Result<Vec<CountryRecord>, FetchError>,
) -> LoadOutcome {
    if !scope.is_alive() {
        debug!("form unmounted before countries arrived, discarding result");
        return LoadOutcome::Stale;
    }

    match result {
        Ok(records) => {
            let count = records.len();
            directory.replace(records);
            info!(count, "countries reference table loaded");
            LoadOutcome::Replaced(count)
        }
        Err(e) => {
            warn!("Failed to load countries: {}", e);
            directory.mark_failed();
            LoadOutcome::Failed
        }
    }
}

/// One-shot loader for the countries reference table.
///
/// Every fetch takes a generation number. Only the most recently issued
/// fetch may write the table; older results are dropped as superseded.
pub struct CountryLoader {
    source: Arc<dyn CountrySource>,
    directory: CountryDirectory,
    activated: AtomicBool,
    generation: Arc<AtomicU64>,
}

impl CountryLoader {
    pub fn new(source: Arc<dyn CountrySource>, directory: CountryDirectory) -> Self {
        Self {
            source,
            directory,
            activated: AtomicBool::new(false),
            generation: Arc::new(AtomicU64::new(0)),
        }
    }

    pub fn directory(&self) -> &CountryDirectory {
        &self.directory
    }

    /// Issues the initial fetch. Later calls are no-ops and return `None`.
    pub fn activate(&self, scope: ScopeToken) -> Option<JoinHandle<LoadOutcome>> {
        if self.activated.swap(true, Ordering::SeqCst) {
            debug!("countries already requested for this mount");
            return None;
        }
        Some(self.spawn_load(scope))
    }

    /// Explicit refetch; the table is replaced wholesale on success.
    pub fn reload(&self, scope: ScopeToken) -> JoinHandle<LoadOutcome> {
        self.activated.store(true, Ordering::SeqCst);
        self.spawn_load(scope)
    }

    fn spawn_load(&self, scope: ScopeToken) -> JoinHandle<LoadOutcome> {
        let source = self.source.clone();
        let directory = self.directory.clone();
        let latest = self.generation.clone();
        let generation = latest.fetch_add(1, Ordering::SeqCst) + 1;

        tokio::spawn(async move {
            let result = source.fetch().await;
            if latest.load(Ordering::SeqCst) != generation {
                debug!(generation, "newer countries fetch issued, discarding result");
                return LoadOutcome::Superseded;
            }
            apply_result(&directory, &scope, result)
        })
    }
}
