//! Command implementations.

pub mod chat;
pub mod exposure;
pub mod market;
pub mod narratives;
pub mod setup;

pub use self::chat::{execute_chat, execute_explain};
pub use self::exposure::{execute_exposure, execute_import};
pub use self::market::{execute_asset, execute_graph, execute_overview};
pub use self::narratives::{execute_decay, execute_list, execute_show};
pub use self::setup::execute_init;

use crate::config::Config;
use crate::error::{CliError, Result};
use crate::output::Formatter;
use chrono::{DateTime, Utc};
use narrative_domain::{Narrative, NarrativeStore, Portfolio};
use narrative_ingest::import_portfolio;
use narrative_store::{sample_portfolio, InMemoryStore};
use std::path::{Path, PathBuf};

/// Everything a command needs: settings, the loaded catalog and the clock.
pub struct Context {
    /// Effective configuration
    pub config: Config,
    /// Output formatter
    pub formatter: Formatter,
    /// Loaded catalog
    pub store: InMemoryStore,
    /// The instant every decay figure is computed at
    pub now: DateTime<Utc>,
}

impl Context {
    /// Load the catalog named by `catalog`, the config, or the bundled sample.
    pub fn load(
        config: Config,
        formatter: Formatter,
        catalog: Option<PathBuf>,
        now: DateTime<Utc>,
    ) -> Result<Self> {
        let store = match catalog.as_ref().or(config.catalog.as_ref()) {
            Some(path) => InMemoryStore::from_path(path)?,
            None => InMemoryStore::sample(now)?,
        };

        Ok(Self {
            config,
            formatter,
            store,
            now,
        })
    }

    /// Look up a narrative, failing on an unknown id.
    pub fn narrative(&self, id: &str) -> Result<&Narrative> {
        self.store
            .get_narrative(id)
            .ok_or_else(|| CliError::not_found("Narrative", id))
    }

    /// Portfolio from `path`, the configured file, or the sample.
    pub fn portfolio(&self, path: Option<&Path>) -> Result<Portfolio> {
        match path.or(self.config.portfolio.as_deref()) {
            Some(path) => Ok(import_portfolio(path, None, self.now, &self.config.import)?),
            None => Ok(sample_portfolio(self.now)),
        }
    }
}
