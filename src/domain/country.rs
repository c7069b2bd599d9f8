use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// One entry of the countries reference table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CountryRecord {
    pub name: String,
    /// Never empty once decoded by a `CountrySource`.
    #[serde(rename = "callingCodes")]
    pub calling_codes: Vec<String>,
}

impl CountryRecord {
    pub fn new(name: impl Into<String>, calling_codes: &[&str]) -> Self {
        Self {
            name: name.into(),
            calling_codes: calling_codes.iter().map(|c| c.to_string()).collect(),
        }
    }
}

/// Returns the first calling code of the first record named `selected`.
///
/// Linear scan, no ordering assumed. An empty table and a missing name
/// both yield `None`; callers that need to tell them apart use
/// [`CountryTable::resolve_calling_code`].
pub fn lookup_calling_code<'a>(selected: &str, table: &'a [CountryRecord]) -> Option<&'a str> {
    table
        .iter()
        .find(|record| record.name == selected)
        .and_then(|record| record.calling_codes.first())
        .map(String::as_str)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadState {
    /// No fetch has completed yet.
    Pending,
    Loaded,
    /// The first fetch failed; the table is still empty.
    Failed,
}

/// Snapshot of the reference table as exposed to readers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CountryTable {
    records: Arc<[CountryRecord]>,
    state: LoadState,
}

impl Default for CountryTable {
    fn default() -> Self {
        Self {
            records: Arc::from(Vec::new()),
            state: LoadState::Pending,
        }
    }
}

impl CountryTable {
    pub fn loaded(records: Vec<CountryRecord>) -> Self {
        Self {
            records: Arc::from(records),
            state: LoadState::Loaded,
        }
    }

    /// Marks a failed fetch without touching the records.
    pub fn mark_failed(&self) -> Self {
        let state = match self.state {
            LoadState::Loaded => LoadState::Loaded,
            _ => LoadState::Failed,
        };
        Self {
            records: self.records.clone(),
            state,
        }
    }

    pub fn records(&self) -> &[CountryRecord] {
        &self.records
    }

    pub fn state(&self) -> LoadState {
        self.state
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Country names in table order, for populating a selector.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.records.iter().map(|record| record.name.as_str())
    }

    /// Names that match `selected` ignoring case, for "did you mean" hints.
    pub fn similar_names<'a>(&'a self, selected: &'a str) -> impl Iterator<Item = &'a str> + 'a {
        let selected = selected.trim();
        self.names()
            .filter(move |name| name.eq_ignore_ascii_case(selected) && *name != selected)
    }

    pub fn resolve_calling_code(&self, selected: &str) -> CallingCodeLookup {
        match self.state {
            LoadState::Pending => CallingCodeLookup::Loading,
            LoadState::Failed => CallingCodeLookup::Unavailable,
            LoadState::Loaded => match lookup_calling_code(selected, &self.records) {
                Some(code) => CallingCodeLookup::Found(code.to_string()),
                None => CallingCodeLookup::NoMatch,
            },
        }
    }
}

/// Calling code resolution that keeps "not loaded" apart from "no match".
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CallingCodeLookup {
    Loading,
    Unavailable,
    NoMatch,
    Found(String),
}

impl CallingCodeLookup {
    pub fn code(&self) -> Option<&str> {
        match self {
            CallingCodeLookup::Found(code) => Some(code),
            _ => None,
        }
    }

    /// Phone prefix as rendered next to the phone input, e.g. `+1`.
    pub fn prefix(&self) -> String {
        format!("+{}", self.code().unwrap_or_default())
    }
}
