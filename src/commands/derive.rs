use crate::commands::print_snapshot;
use crate::context::AppContext;
use anyhow::Result;
use log::info;

/// Runs the full pipeline (ingest, aggregate, indicators, derivation) and
/// prints the result for the active timeframe.
pub async fn run(app: &AppContext) -> Result<()> {
    let bench = app.workbench().await?;
    let snapshot = bench.recompute();

    info!(
        "Derived {} trade(s) from {} mark(s) on the {} grid ({} candle(s))",
        snapshot.trades.len(),
        bench.marks().len(),
        bench.timeframe().label(),
        snapshot.candles.len()
    );
    print_snapshot(&snapshot);
    Ok(())
}
