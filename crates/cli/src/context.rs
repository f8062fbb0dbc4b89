//! Application context - wires everything together

use anyhow::Context;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use usdi_core::{Clock, ManualClock};
use usdi_events::{EventStore, JournalRecord};
use usdi_oracle::MockOracle;
use usdi_vault::{ProtocolConfig, VaultController};

/// Application context - controller, simulated clock and oracle, journal
pub struct AppContext {
    pub controller: VaultController,
    pub clock: Arc<ManualClock>,
    pub oracle: Arc<MockOracle>,
    pub event_store: EventStore,
    journal_path: PathBuf,
}

impl AppContext {
    /// Genesis deployment from `config`, journaling under `data_path/journal`
    pub fn new(data_path: impl AsRef<Path>, config: &ProtocolConfig) -> anyhow::Result<Self> {
        let journal_path = data_path.as_ref().join("journal");
        std::fs::create_dir_all(&journal_path)
            .with_context(|| format!("creating {}", journal_path.display()))?;

        let event_store = EventStore::new(&journal_path)?;
        let clock = Arc::new(ManualClock::new(config.start_time));
        let oracle = Arc::new(MockOracle::with_prices(config.initial_prices()?));
        let controller = VaultController::from_config(config, clock.clone(), oracle.clone())?;

        Ok(Self {
            controller,
            clock,
            oracle,
            event_store,
            journal_path,
        })
    }

    pub fn journal_path(&self) -> &Path {
        &self.journal_path
    }

    /// Journal everything the controller committed since the last call
    pub fn commit(&mut self) -> anyhow::Result<Vec<JournalRecord>> {
        let events = self.controller.drain_events();
        if events.is_empty() {
            return Ok(Vec::new());
        }
        Ok(self.event_store.record(self.clock.now(), events)?)
    }
}
