use crate::services::slots::TimeGrid;
use crate::utils::time::MINUTES_PER_HOUR;

/// Pixel layout of a day column.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridGeometry {
    pub grid: TimeGrid,
    /// Height of one hour row in pixels.
    pub cell_height: f32,
}

impl Default for GridGeometry {
    fn default() -> Self {
        Self {
            grid: TimeGrid::default(),
            cell_height: 60.0,
        }
    }
}

impl GridGeometry {
    pub fn new(grid: TimeGrid, cell_height: f32) -> Self {
        Self { grid, cell_height }
    }

    pub fn pixels_per_interval(&self) -> f32 {
        self.cell_height / self.grid.intervals_per_hour() as f32
    }

    /// Height of the whole column.
    pub fn max_offset(&self) -> f32 {
        self.cell_height * self.grid.hours() as f32
    }

    /// Interval index under `offset` pixels from the top of the column.
    ///
    /// The offset is clamped to `[0, max_offset]` and the index to the last
    /// interval, so the bottom edge maps to the final slot rather than one
    /// past it.
    pub fn interval_index(&self, offset: f32) -> u32 {
        let ppi = self.pixels_per_interval();
        if !offset.is_finite() || !ppi.is_finite() || ppi <= 0.0 {
            return 0;
        }

        let clamped = offset.clamp(0.0, self.max_offset());
        let index = (clamped / ppi).floor() as u32;
        index.min(self.grid.total_intervals().saturating_sub(1))
    }

    /// Minute offset at the top edge of interval `index`.
    pub fn slot_start(&self, index: u32) -> u32 {
        self.grid.minute_at(index)
    }

    /// Minute offset at the bottom edge of interval `index`.
    pub fn slot_end(&self, index: u32) -> u32 {
        self.grid.minute_at(index + 1)
    }

    /// Pixel offset of `minute` within the column, for rendering.
    pub fn offset_of(&self, minute: u32) -> f32 {
        let from_top = minute.saturating_sub(self.grid.first_minute()) as f32;
        from_top / MINUTES_PER_HOUR as f32 * self.cell_height
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    fn geometry() -> GridGeometry {
        GridGeometry::new(
            TimeGrid {
                start_hour: 8,
                end_hour: 17,
                interval_minutes: 30,
            },
            60.0,
        )
    }

    #[test_case(0.0, 0 ; "top")]
    #[test_case(29.9, 0 ; "inside first")]
    #[test_case(30.0, 1 ; "second")]
    #[test_case(-40.0, 0 ; "negative clamps")]
    #[test_case(600.0, 19 ; "bottom edge is last slot")]
    #[test_case(10_000.0, 19 ; "overflow clamps")]
    #[test_case(f32::NAN, 0 ; "nan")]
    fn test_interval_index(offset: f32, expected: u32) {
        assert_eq!(geometry().interval_index(offset), expected);
    }

    #[test]
    fn test_pixels_per_interval() {
        assert_eq!(geometry().pixels_per_interval(), 30.0);
        assert_eq!(geometry().max_offset(), 600.0);
    }

    #[test]
    fn test_slot_edges() {
        let g = geometry();
        assert_eq!(g.slot_start(0), 8 * 60);
        assert_eq!(g.slot_end(0), 8 * 60 + 30);
        assert_eq!(g.slot_start(19), 17 * 60 + 30);
    }

    #[test]
    fn test_offset_of_is_inverse_of_index() {
        let g = geometry();
        let offset = g.offset_of(9 * 60 + 30);
        assert_eq!(offset, 90.0);
        assert_eq!(g.slot_start(g.interval_index(offset)), 9 * 60 + 30);
    }

    #[test]
    fn test_zero_cell_height_maps_to_zero() {
        let g = GridGeometry::new(TimeGrid::default(), 0.0);
        assert_eq!(g.interval_index(100.0), 0);
    }
}
