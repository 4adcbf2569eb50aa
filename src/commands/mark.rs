use crate::commands::print_snapshot;
use crate::context::AppContext;
use crate::marks::MarkStore;
use crate::models::{Direction, Mark};
use crate::persistence::MARKS_KEY;
use anyhow::Result;
use log::info;

/// Adds an entry mark (the CLI's stand-in for a chart click) and prints the
/// recomputed trade list.
pub async fn add(app: &AppContext, time: i64, direction: Direction) -> Result<()> {
    let mut bench = app.workbench().await?;
    match bench.add_mark(time, direction)? {
        Some(snapshot) => {
            info!("Added {} mark at {}", direction.as_str(), time);
            print_snapshot(&snapshot);
        }
        None => println!("A mark already exists at {}; nothing changed.", time),
    }
    Ok(())
}

/// Removes the mark at the given position in the sorted list and prints the
/// recomputed trade list.
pub async fn remove(app: &AppContext, index: usize) -> Result<()> {
    let mut bench = app.workbench().await?;
    let snapshot = bench.remove_mark(index)?;
    info!("Removed mark #{}", index);
    print_snapshot(&snapshot);
    Ok(())
}

/// Lists the stored marks. Reads the key-value store directly so the list is
/// available even when no data directory is present.
pub fn list(app: &AppContext) -> Result<()> {
    let store = app.state_store()?;
    let marks = MarkStore::from_marks(store.load_or_default::<Vec<Mark>>(MARKS_KEY)?);
    if marks.is_empty() {
        println!("No marks stored.");
        return Ok(());
    }
    for (index, mark) in marks.marks().iter().enumerate() {
        println!(
            "{:3}  {}  {}  {}",
            index,
            mark.time,
            mark.direction.as_str(),
            mark.meta.label
        );
    }
    Ok(())
}
