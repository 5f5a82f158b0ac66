use chrono::NaiveDate;

use super::{DragContext, GridGeometry, ResizeContext, ResizeHandle};
use crate::models::event::{Event, EventPatch};
use crate::utils::time::TimeRange;

/// A pointer position inside a day column.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerSample {
    pub date: NaiveDate,
    /// Pixels from the top of the column.
    pub offset: f32,
}

#[derive(Debug, Clone, PartialEq)]
enum Gesture {
    Drag(DragContext),
    Resize(ResizeContext),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GestureKind {
    Drag,
    Resize(ResizeHandle),
}

/// The result of a completed gesture, ready to be sent to the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GestureCommit {
    pub event_id: String,
    pub kind: GestureKind,
    pub date: NaiveDate,
    pub range: TimeRange,
}

impl GestureCommit {
    /// The update to send for this commit; `None` if the range cannot be
    /// expressed as wall-clock times.
    pub fn to_patch(&self) -> Option<EventPatch> {
        let (start, end) = self.range.to_clock()?;
        Some(EventPatch::reschedule(self.date, start, end))
    }
}

/// Owns the single drag or resize gesture in progress.
///
/// Pointer moves only record the latest sample. The preview is recomputed at
/// most once per [`GestureManager::animation_frame`], so samples superseded
/// between two frames are never processed.
#[derive(Debug, Default)]
pub struct GestureManager {
    geometry: GridGeometry,
    active: Option<Gesture>,
    pending: Option<PointerSample>,
    preview: Option<(NaiveDate, TimeRange)>,
    recomputations: u64,
}

impl GestureManager {
    pub fn new(geometry: GridGeometry) -> Self {
        Self {
            geometry,
            ..Self::default()
        }
    }

    pub fn geometry(&self) -> &GridGeometry {
        &self.geometry
    }

    pub fn begin_drag(&mut self, event: &Event) {
        log::debug!("Drag started for event {}", event.id);
        self.start(Gesture::Drag(DragContext::from_event(event)));
    }

    pub fn begin_resize(&mut self, event: &Event, handle: ResizeHandle) {
        log::debug!("Resize ({:?}) started for event {}", handle, event.id);
        self.start(Gesture::Resize(ResizeContext::from_event(event, handle)));
    }

    fn start(&mut self, gesture: Gesture) {
        self.active = Some(gesture);
        self.pending = None;
        self.preview = None;
    }

    pub fn is_active(&self) -> bool {
        self.active.is_some()
    }

    /// Id of the event being dragged or resized.
    pub fn active_event_id(&self) -> Option<&str> {
        match self.active.as_ref()? {
            Gesture::Drag(ctx) => Some(&ctx.event_id),
            Gesture::Resize(ctx) => Some(&ctx.event_id),
        }
    }

    pub fn kind(&self) -> Option<GestureKind> {
        match self.active.as_ref()? {
            Gesture::Drag(_) => Some(GestureKind::Drag),
            Gesture::Resize(ctx) => Some(GestureKind::Resize(ctx.handle)),
        }
    }

    /// Record the latest pointer position. Ignored when idle.
    pub fn pointer_moved(&mut self, sample: PointerSample) {
        if self.active.is_some() {
            self.pending = Some(sample);
        }
    }

    /// Apply the latest pending sample. Returns `true` when the preview was
    /// recomputed.
    pub fn animation_frame(&mut self) -> bool {
        let Some(sample) = self.pending.take() else {
            return false;
        };
        let geometry = self.geometry;
        let index = geometry.interval_index(sample.offset);

        self.preview = match self.active.as_mut() {
            Some(Gesture::Drag(ctx)) => {
                ctx.update_hover(sample.date, index);
                ctx.hovered_times(&geometry)
            }
            Some(Gesture::Resize(ctx)) => {
                ctx.update_hover(index);
                ctx.hovered_times(&geometry).map(|range| (ctx.date, range))
            }
            None => return false,
        };
        self.recomputations += 1;
        true
    }

    /// Where the event would land if released now.
    pub fn preview(&self) -> Option<(NaiveDate, TimeRange)> {
        self.preview
    }

    pub fn recomputations(&self) -> u64 {
        self.recomputations
    }

    /// End the gesture on pointer-up.
    ///
    /// Any sample not yet seen by a frame is applied first. Yields nothing
    /// when the drop position is invalid or identical to the start.
    pub fn finish(&mut self) -> Option<GestureCommit> {
        self.animation_frame();
        let gesture = self.active.take()?;
        let preview = self.preview.take();

        let (date, range) = preview?;
        let commit = match gesture {
            Gesture::Drag(ctx) => {
                if ctx.is_unchanged(date, range) {
                    return None;
                }
                GestureCommit {
                    event_id: ctx.event_id,
                    kind: GestureKind::Drag,
                    date,
                    range,
                }
            }
            Gesture::Resize(ctx) => GestureCommit {
                event_id: ctx.event_id,
                kind: GestureKind::Resize(ctx.handle),
                date,
                range,
            },
        };

        log::debug!(
            "Gesture committed for event {}: {} {}",
            commit.event_id,
            commit.date,
            commit.range
        );
        Some(commit)
    }

    /// Discard the gesture without committing.
    pub fn cancel(&mut self) {
        if let Some(id) = self.active_event_id() {
            log::debug!("Gesture cancelled for event {}", id);
        }
        self.active = None;
        self.pending = None;
        self.preview = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::slots::TimeGrid;

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 4, 8).unwrap()
    }

    fn event() -> Event {
        Event::builder()
            .id("evt")
            .title("Review")
            .date(date())
            .start_time("09:00".parse().unwrap())
            .end_time("10:00".parse().unwrap())
            .calendar_id("work")
            .build()
            .unwrap()
    }

    fn manager() -> GestureManager {
        GestureManager::new(GridGeometry::new(TimeGrid::default(), 60.0))
    }

    fn at(offset: f32) -> PointerSample {
        PointerSample {
            date: date(),
            offset,
        }
    }

    #[test]
    fn test_pointer_moves_are_coalesced_per_frame() {
        let mut gestures = manager();
        gestures.begin_drag(&event());

        for offset in [100.0, 200.0, 300.0, 660.0] {
            gestures.pointer_moved(at(offset));
        }
        assert_eq!(gestures.recomputations(), 0);

        assert!(gestures.animation_frame());
        assert!(!gestures.animation_frame());
        assert_eq!(gestures.recomputations(), 1);
        assert_eq!(gestures.preview(), Some((date(), TimeRange::new(660, 720))));
    }

    #[test]
    fn test_finish_drag_commits_and_clears() {
        let mut gestures = manager();
        gestures.begin_drag(&event());
        gestures.pointer_moved(at(660.0));

        let commit = gestures.finish().unwrap();
        assert_eq!(commit.event_id, "evt");
        assert_eq!(commit.kind, GestureKind::Drag);
        assert_eq!(commit.range, TimeRange::new(660, 720));
        assert!(!gestures.is_active());

        let patch = commit.to_patch().unwrap();
        assert_eq!(patch.start_time, Some("11:00".parse().unwrap()));
    }

    #[test]
    fn test_drop_on_original_slot_is_not_committed() {
        let mut gestures = manager();
        gestures.begin_drag(&event());
        gestures.pointer_moved(at(545.0));
        assert!(gestures.finish().is_none());
    }

    #[test]
    fn test_invalid_resize_is_not_committed() {
        let mut gestures = manager();
        gestures.begin_resize(&event(), ResizeHandle::Top);
        gestures.pointer_moved(at(700.0));
        assert!(gestures.finish().is_none());
        assert!(!gestures.is_active());
    }

    #[test]
    fn test_resize_bottom_commit() {
        let mut gestures = manager();
        gestures.begin_resize(&event(), ResizeHandle::Bottom);
        gestures.pointer_moved(at(635.0));
        let commit = gestures.finish().unwrap();
        assert_eq!(commit.kind, GestureKind::Resize(ResizeHandle::Bottom));
        assert_eq!(commit.range, TimeRange::new(540, 660));
    }

    #[test]
    fn test_cancel_discards() {
        let mut gestures = manager();
        gestures.begin_drag(&event());
        gestures.pointer_moved(at(660.0));
        gestures.cancel();
        assert!(gestures.finish().is_none());
        assert!(gestures.active_event_id().is_none());
    }

    #[test]
    fn test_moves_ignored_when_idle() {
        let mut gestures = manager();
        gestures.pointer_moved(at(100.0));
        assert!(!gestures.animation_frame());
    }
}
