use crate::models::{Direction, DisplayMeta, Mark, MarkerShape, MarkerView, Theme};
use anyhow::{anyhow, Result};
use chrono::DateTime;

/// Ordered, deduplicated collection of user entry marks.
#[derive(Debug, Clone, Default)]
pub struct MarkStore {
    marks: Vec<Mark>,
}

impl MarkStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Restores a persisted collection, re-establishing the ordering and
    /// uniqueness invariants in case the stored data predates them.
    pub fn from_marks(mut marks: Vec<Mark>) -> Self {
        marks.sort_by_key(|mark| mark.time);
        marks.dedup_by_key(|mark| mark.time);
        Self { marks }
    }

    /// Inserts a mark at `time`. Returns false (leaving the collection
    /// unchanged) when a mark at that exact timestamp already exists.
    pub fn add(&mut self, time: i64, direction: Direction, theme: Theme) -> bool {
        let index = self.marks.partition_point(|mark| mark.time < time);
        if self.marks.get(index).is_some_and(|mark| mark.time == time) {
            return false;
        }
        self.marks.insert(
            index,
            Mark {
                time,
                direction,
                meta: display_meta(time, direction, theme),
            },
        );
        true
    }

    /// Removes the mark at the given ordinal position in the sorted sequence.
    pub fn remove(&mut self, index: usize) -> Result<Mark> {
        if index >= self.marks.len() {
            return Err(anyhow!(
                "Mark index {} out of bounds ({} mark(s))",
                index,
                self.marks.len()
            ));
        }
        Ok(self.marks.remove(index))
    }

    pub fn marks(&self) -> &[Mark] {
        &self.marks
    }

    pub fn len(&self) -> usize {
        self.marks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.marks.is_empty()
    }

    /// Flattens the collection into the marker records the chart renders.
    pub fn markers(&self) -> Vec<MarkerView> {
        self.marks
            .iter()
            .map(|mark| MarkerView {
                time: mark.time,
                side: mark.direction,
                color: mark.meta.color.clone(),
                shape: mark.meta.shape,
                label: mark.meta.label.clone(),
            })
            .collect()
    }
}

fn display_meta(time: i64, direction: Direction, theme: Theme) -> DisplayMeta {
    let color = match (direction, theme) {
        (Direction::Long, Theme::Dark) => "#26a69a",
        (Direction::Long, Theme::Light) => "#1b5e20",
        (Direction::Short, Theme::Dark) => "#ef5350",
        (Direction::Short, Theme::Light) => "#b71c1c",
    };
    let shape = match direction {
        Direction::Long => MarkerShape::ArrowUp,
        Direction::Short => MarkerShape::ArrowDown,
    };
    DisplayMeta {
        color: color.to_string(),
        shape,
        label: format_label(time),
    }
}

fn format_label(time: i64) -> String {
    DateTime::from_timestamp(time, 0)
        .map(|dt| dt.format("%Y-%m-%d %H:%M").to_string())
        .unwrap_or_else(|| time.to_string())
}
