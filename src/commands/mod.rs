pub mod derive;
pub mod load;
pub mod mark;
pub mod rules;

use crate::workbench::Snapshot;

/// Prints the marker list and derived trade table, the CLI stand-in for the
/// chart overlay and tooltip rendering.
pub(crate) fn print_snapshot(snapshot: &Snapshot) {
    if snapshot.markers.is_empty() {
        println!("No marks set.");
        return;
    }

    println!("Markers:");
    for marker in &snapshot.markers {
        println!(
            "  {} {} {} {} {}",
            marker.time,
            marker.side.as_str(),
            marker.shape.as_str(),
            marker.color,
            marker.label
        );
    }

    if snapshot.trades.is_empty() {
        println!("No derived trades (no mark matches a candle in the active series).");
        return;
    }

    println!("Derived trades:");
    println!("  time | side | entry | stop | target | rule");
    for trade in &snapshot.trades {
        let rule = trade.rule_snapshot;
        println!(
            "  {} | {} | {:.8} | {:.8} | {:.8} | entry={} stop={} atr_x={} tp_x={}",
            trade.mark_time,
            trade.direction.as_str(),
            trade.entry_price,
            trade.stop_loss_price,
            trade.take_profit_price,
            rule.entry_price_source.as_str(),
            rule.stop_loss_source.as_str(),
            rule.atr_multiple,
            rule.take_profit_multiple
        );
    }

    let excluded = snapshot.markers.len() - snapshot.trades.len();
    if excluded > 0 {
        println!(
            "({} mark(s) have no candle in the active series and are not shown)",
            excluded
        );
    }
}
