use chrono::NaiveDate;

use super::GridGeometry;
use crate::models::event::Event;
use crate::utils::time::{TimeRange, MINUTES_PER_DAY};

/// Shift `range` so it starts at interval `index`, keeping its duration.
///
/// Returns `None` when the moved range would run past 23:59.
pub fn move_to(geometry: &GridGeometry, range: TimeRange, index: u32) -> Option<TimeRange> {
    let start = geometry.slot_start(index);
    let end = start.checked_add(range.duration())?;
    if end >= MINUTES_PER_DAY {
        return None;
    }
    Some(TimeRange::new(start, end))
}

/// State of an in-progress drag of one event.
#[derive(Debug, Clone, PartialEq)]
pub struct DragContext {
    pub event_id: String,
    pub original_date: NaiveDate,
    pub original_range: TimeRange,
    pub hovered_date: Option<NaiveDate>,
    pub hovered_index: Option<u32>,
}

impl DragContext {
    pub fn from_event(event: &Event) -> Self {
        Self {
            event_id: event.id.clone(),
            original_date: event.date,
            original_range: event.time_range(),
            hovered_date: None,
            hovered_index: None,
        }
    }

    pub fn update_hover(&mut self, date: NaiveDate, index: u32) {
        self.hovered_date = Some(date);
        self.hovered_index = Some(index);
    }

    /// Date and range the event would land on if dropped now.
    pub fn hovered_times(&self, geometry: &GridGeometry) -> Option<(NaiveDate, TimeRange)> {
        let date = self.hovered_date?;
        let range = move_to(geometry, self.original_range, self.hovered_index?)?;
        Some((date, range))
    }

    pub fn is_unchanged(&self, date: NaiveDate, range: TimeRange) -> bool {
        date == self.original_date && range == self.original_range
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::slots::TimeGrid;

    fn geometry() -> GridGeometry {
        GridGeometry::new(TimeGrid::default(), 60.0)
    }

    #[test]
    fn test_move_preserves_duration() {
        let range = TimeRange::new(9 * 60, 10 * 60 + 30);
        let moved = move_to(&geometry(), range, 28).unwrap();
        assert_eq!(moved, TimeRange::new(14 * 60, 15 * 60 + 30));
        assert_eq!(moved.duration(), range.duration());
    }

    #[test]
    fn test_move_past_midnight_rejected() {
        let range = TimeRange::new(9 * 60, 11 * 60);
        assert!(move_to(&geometry(), range, 45).is_none());
        assert!(move_to(&geometry(), range, 43).is_some());
    }

    #[test]
    fn test_hovered_times_need_a_hover() {
        let date = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let event = Event::new("Focus", date, "09:00".parse().unwrap(), "10:00".parse().unwrap(), "c")
            .unwrap();
        let mut ctx = DragContext::from_event(&event);
        assert!(ctx.hovered_times(&geometry()).is_none());

        let next_day = date.succ_opt().unwrap();
        ctx.update_hover(next_day, 20);
        let (hover_date, range) = ctx.hovered_times(&geometry()).unwrap();
        assert_eq!(hover_date, next_day);
        assert_eq!(range, TimeRange::new(600, 660));
        assert!(!ctx.is_unchanged(hover_date, range));
    }
}
