//! # Settings Store
//!
//! Owns the current [`Settings`] and notifies subscribers on every change.
//!
//! There is one logical writer; updates are synchronous and last-writer-wins.
//! Subscribers get a `tokio::sync::watch` receiver, so a burst of updates is
//! observed as "something changed, here is the latest value".

use tokio::sync::watch;

use crate::settings::{Settings, SettingsPatch};

/// Shared, observable settings state.
#[derive(Debug)]
pub struct SettingsStore {
    tx: watch::Sender<Settings>,
}

impl SettingsStore {
    pub fn new(initial: Settings) -> Self {
        let (tx, _rx) = watch::channel(initial.normalized());
        Self { tx }
    }

    /// A copy of the current settings.
    pub fn snapshot(&self) -> Settings {
        self.tx.borrow().clone()
    }

    /// Merge `patch` into the current settings and notify subscribers.
    ///
    /// Returns the settings after the merge.
    pub fn update(&self, patch: SettingsPatch) -> Settings {
        self.tx.send_modify(|settings| patch.apply(settings));
        self.snapshot()
    }

    /// Replace everything with the defaults.
    pub fn reset(&self) -> Settings {
        self.tx.send_replace(Settings::default());
        tracing::debug!("settings reset to defaults");
        self.snapshot()
    }

    pub fn subscribe(&self) -> watch::Receiver<Settings> {
        self.tx.subscribe()
    }
}

impl Default for SettingsStore {
    fn default() -> Self {
        Self::new(Settings::default())
    }
}
