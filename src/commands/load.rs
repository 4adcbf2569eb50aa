use crate::context::AppContext;
use anyhow::Result;
use log::info;

/// Ingests the data directory and reports on the merged series without
/// touching persisted state.
pub async fn run(app: &AppContext) -> Result<()> {
    let candles = app.load_base_candles().await?;

    let first = candles.first().map(|c| c.time).unwrap_or_default();
    let last = candles.last().map(|c| c.time).unwrap_or_default();
    info!(
        "Series spans {} .. {} ({} candle(s))",
        first,
        last,
        candles.len()
    );
    println!(
        "Loaded {} candle(s), {} .. {}",
        candles.len(),
        first,
        last
    );
    Ok(())
}
