// Event resize
//
// Top handle moves the start to the top edge of the hovered slot, bottom
// handle moves the end to the bottom edge.

use chrono::NaiveDate;

use super::GridGeometry;
use crate::models::event::Event;
use crate::utils::time::{TimeRange, MINUTES_PER_DAY};

/// Height of the grab zone at each edge of an event block.
pub const HANDLE_ZONE_HEIGHT: f32 = 20.0;

/// Which edge of the event is being resized
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ResizeHandle {
    /// Adjusts start time
    Top,
    /// Adjusts end time
    Bottom,
}

/// Which handle, if any, sits under `pointer_y` for an event block drawn at
/// `top` with `height` pixels. Small blocks split into halves.
pub fn handle_at(top: f32, height: f32, pointer_y: f32) -> Option<ResizeHandle> {
    if height <= 0.0 || pointer_y < top || pointer_y > top + height {
        return None;
    }

    let zone = if height < HANDLE_ZONE_HEIGHT * 2.5 {
        height / 2.0
    } else {
        HANDLE_ZONE_HEIGHT
    };

    if pointer_y <= top + zone {
        Some(ResizeHandle::Top)
    } else if pointer_y >= top + height - zone {
        Some(ResizeHandle::Bottom)
    } else {
        None
    }
}

/// Move one boundary of `range` to interval `index`.
///
/// Returns `None` when the new boundary would meet or cross the fixed one,
/// when nothing changes, or when the end would run past 23:59.
pub fn resize(
    geometry: &GridGeometry,
    range: TimeRange,
    handle: ResizeHandle,
    index: u32,
) -> Option<TimeRange> {
    let resized = match handle {
        ResizeHandle::Top => {
            let start = geometry.slot_start(index);
            if start >= range.end {
                return None;
            }
            TimeRange::new(start, range.end)
        }
        ResizeHandle::Bottom => {
            // end at the bottom edge of the slot under the pointer, so the
            // grabbed slot stays inside the event
            let end = geometry.slot_end(index);
            if end <= range.start || end >= MINUTES_PER_DAY {
                return None;
            }
            TimeRange::new(range.start, end)
        }
    };

    (resized != range).then_some(resized)
}

/// State of an in-progress resize of one event.
#[derive(Clone, Debug, PartialEq)]
pub struct ResizeContext {
    pub event_id: String,
    pub handle: ResizeHandle,
    pub date: NaiveDate,
    pub original_range: TimeRange,
    pub hovered_index: Option<u32>,
}

impl ResizeContext {
    pub fn from_event(event: &Event, handle: ResizeHandle) -> Self {
        Self {
            event_id: event.id.clone(),
            handle,
            date: event.date,
            original_range: event.time_range(),
            hovered_index: None,
        }
    }

    pub fn update_hover(&mut self, index: u32) {
        self.hovered_index = Some(index);
    }

    pub fn hovered_times(&self, geometry: &GridGeometry) -> Option<TimeRange> {
        resize(geometry, self.original_range, self.handle, self.hovered_index?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::slots::TimeGrid;

    fn geometry() -> GridGeometry {
        GridGeometry::new(TimeGrid::default(), 60.0)
    }

    fn nine_to_ten() -> TimeRange {
        TimeRange::new(540, 600)
    }

    #[test]
    fn test_top_resize_extends_start() {
        let resized = resize(&geometry(), nine_to_ten(), ResizeHandle::Top, 16).unwrap();
        assert_eq!(resized, TimeRange::new(480, 600));
    }

    #[test]
    fn test_top_resize_past_end_rejected() {
        assert!(resize(&geometry(), nine_to_ten(), ResizeHandle::Top, 20).is_none());
        assert!(resize(&geometry(), nine_to_ten(), ResizeHandle::Top, 22).is_none());
    }

    #[test]
    fn test_top_resize_to_last_possible_slot() {
        let resized = resize(&geometry(), nine_to_ten(), ResizeHandle::Top, 19).unwrap();
        assert_eq!(resized, TimeRange::new(570, 600));
    }

    #[test]
    fn test_bottom_resize_uses_slot_bottom() {
        let resized = resize(&geometry(), nine_to_ten(), ResizeHandle::Bottom, 21).unwrap();
        assert_eq!(resized, TimeRange::new(540, 660));

        let shrunk = resize(&geometry(), nine_to_ten(), ResizeHandle::Bottom, 18).unwrap();
        assert_eq!(shrunk, TimeRange::new(540, 570));
    }

    #[test]
    fn test_bottom_resize_before_start_rejected() {
        assert!(resize(&geometry(), nine_to_ten(), ResizeHandle::Bottom, 17).is_none());
    }

    #[test]
    fn test_bottom_resize_to_midnight_rejected() {
        assert!(resize(&geometry(), nine_to_ten(), ResizeHandle::Bottom, 47).is_none());
    }

    #[test]
    fn test_noop_resize_is_none() {
        assert!(resize(&geometry(), nine_to_ten(), ResizeHandle::Top, 18).is_none());
        assert!(resize(&geometry(), nine_to_ten(), ResizeHandle::Bottom, 19).is_none());
    }

    #[test]
    fn test_handle_at() {
        assert_eq!(handle_at(100.0, 120.0, 105.0), Some(ResizeHandle::Top));
        assert_eq!(handle_at(100.0, 120.0, 215.0), Some(ResizeHandle::Bottom));
        assert_eq!(handle_at(100.0, 120.0, 160.0), None);
        assert_eq!(handle_at(100.0, 30.0, 110.0), Some(ResizeHandle::Top));
        assert_eq!(handle_at(100.0, 30.0, 120.0), Some(ResizeHandle::Bottom));
        assert_eq!(handle_at(100.0, 30.0, 90.0), None);
    }
}
