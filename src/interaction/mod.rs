//! Pointer interaction on the day/week grid.
//!
//! [`GridGeometry`] maps a vertical pixel offset inside a day column to an
//! interval index and back. The drag and resize contexts turn that index into
//! a new time range for the grabbed event, and [`GestureManager`] owns the
//! transient state of the one gesture that can be in progress.

mod drag;
mod gesture;
mod geometry;
mod resize;

pub use drag::{move_to, DragContext};
pub use geometry::GridGeometry;
pub use gesture::{GestureCommit, GestureKind, GestureManager, PointerSample};
pub use resize::{handle_at, resize, ResizeContext, ResizeHandle, HANDLE_ZONE_HEIGHT};
