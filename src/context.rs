use crate::aggregate::Timeframe;
use crate::ingest::{list_csv_files, load_candles};
use crate::models::{Candle, Theme};
use crate::persistence::KvStore;
use crate::workbench::Workbench;
use anyhow::{Context, Result};
use log::info;
use std::path::PathBuf;

/// Resolved invocation settings shared by every command: where the
/// historical data lives, where persisted state goes, and the current
/// display configuration. Passed explicitly into each recomputation instead
/// of living in ambient globals.
#[derive(Debug, Clone)]
pub struct AppContext {
    pub data_dir: PathBuf,
    pub state_dir: PathBuf,
    pub base_timeframe: Timeframe,
    pub timeframe: Timeframe,
    pub theme: Theme,
}

impl AppContext {
    pub fn state_store(&self) -> Result<KvStore> {
        KvStore::open(&self.state_dir)
    }

    /// Ingests every CSV file under the data directory (name order) into the
    /// base candle series. Any ingestion-level failure aborts the load.
    pub async fn load_base_candles(&self) -> Result<Vec<Candle>> {
        let paths = list_csv_files(&self.data_dir).with_context(|| {
            format!("failed to list data directory {}", self.data_dir.display())
        })?;
        let candles = load_candles(&paths).await?;
        info!(
            "Loaded {} candle(s) from {} source file(s)",
            candles.len(),
            paths.len()
        );
        Ok(candles)
    }

    /// Builds a workbench over the ingested data with persisted marks and
    /// rules restored.
    pub async fn workbench(&self) -> Result<Workbench> {
        let candles = self.load_base_candles().await?;
        Workbench::open(
            self.state_store()?,
            candles,
            self.base_timeframe,
            self.timeframe,
            self.theme,
        )
    }
}
