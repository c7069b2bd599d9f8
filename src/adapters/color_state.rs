use std::sync::Arc;
use tokio::sync::watch;
use tracing::debug;

use crate::config::ColorSettings;

pub const DEFAULT_COLOR: &str = "#1F2937";

/// Current color preference plus how many times it has been written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColorState {
    pub color: String,
    pub revision: u64,
}

/// Shared color preference.
///
/// Holds exactly one value. `set_color` is the only mutation and overwrites
/// unconditionally; readers hold a [`ColorSubscription`] and cannot write.
#[derive(Debug, Clone)]
pub struct ColorStore {
    tx: Arc<watch::Sender<ColorState>>,
}

impl ColorStore {
    pub fn new(initial: impl Into<String>) -> Self {
        let (tx, _rx) = watch::channel(ColorState {
            color: initial.into(),
            revision: 0,
        });
        Self { tx: Arc::new(tx) }
    }

    /// Store seeded with the configured `color.initial`.
    pub fn from_settings(settings: &ColorSettings) -> Self {
        Self::new(settings.initial.clone())
    }

    pub fn set_color(&self, value: impl Into<String>) {
        let value = value.into();
        self.tx.send_modify(|state| {
            state.color = value;
            state.revision += 1;
        });
        debug!(color = %self.tx.borrow().color, "color store updated");
    }

    pub fn color(&self) -> String {
        self.tx.borrow().color.clone()
    }

    pub fn state(&self) -> ColorState {
        self.tx.borrow().clone()
    }

    pub fn subscribe(&self) -> ColorSubscription {
        ColorSubscription {
            rx: self.tx.subscribe(),
        }
    }
}

impl Default for ColorStore {
    fn default() -> Self {
        Self::new(DEFAULT_COLOR)
    }
}

/// Read-only view of the color store.
#[derive(Debug, Clone)]
pub struct ColorSubscription {
    rx: watch::Receiver<ColorState>,
}

impl ColorSubscription {
    pub fn current(&self) -> ColorState {
        self.rx.borrow().clone()
    }

    /// Waits for the next write. Returns `None` once every store handle is gone.
    pub async fn changed(&mut self) -> Option<ColorState> {
        self.rx.changed().await.ok()?;
        Some(self.rx.borrow_and_update().clone())
    }
}
