use std::fmt;

use super::ClockTime;

/// Half-open time-of-day interval `[start, end)` in minutes since midnight.
///
/// `end` may equal [`super::MINUTES_PER_DAY`] so that a slot ending at
/// midnight is representable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimeRange {
    pub start: u32,
    pub end: u32,
}

impl TimeRange {
    pub fn new(start: u32, end: u32) -> Self {
        Self { start, end }
    }

    pub fn from_clock(start: ClockTime, end: ClockTime) -> Self {
        Self::new(start.minutes(), end.minutes())
    }

    pub fn duration(&self) -> u32 {
        self.end.saturating_sub(self.start)
    }

    pub fn is_empty(&self) -> bool {
        self.end <= self.start
    }

    /// Half-open overlap test. Empty ranges never overlap anything and
    /// touching boundaries (`a.end == b.start`) are not an overlap.
    pub fn overlaps(&self, other: &TimeRange) -> bool {
        !self.is_empty()
            && !other.is_empty()
            && self.start < other.end
            && self.end > other.start
    }

    pub fn contains(&self, minute: u32) -> bool {
        self.start <= minute && minute < self.end
    }

    /// Convert back to wall-clock times; `None` if either end leaves the day.
    pub fn to_clock(&self) -> Option<(ClockTime, ClockTime)> {
        Some((
            ClockTime::from_minutes(self.start)?,
            ClockTime::from_minutes(self.end)?,
        ))
    }
}

impl fmt::Display for TimeRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}-{}",
            super::minutes_to_time(self.start),
            super::minutes_to_time(self.end)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_overlap_boundaries() {
        let a = TimeRange::new(540, 600);
        let b = TimeRange::new(570, 630);
        let c = TimeRange::new(600, 660);

        assert!(a.overlaps(&b));
        assert!(b.overlaps(&a));
        assert!(!a.overlaps(&c));
        assert!(!c.overlaps(&a));
    }

    #[test]
    fn test_empty_range_never_overlaps() {
        let empty = TimeRange::new(570, 570);
        let wide = TimeRange::new(0, 1440);
        assert!(!empty.overlaps(&wide));
        assert!(!wide.overlaps(&empty));
    }

    #[test]
    fn test_display() {
        assert_eq!(TimeRange::new(540, 1440).to_string(), "09:00-24:00");
    }

    #[test]
    fn test_to_clock_rejects_midnight_end() {
        assert!(TimeRange::new(540, 1440).to_clock().is_none());
        assert!(TimeRange::new(540, 600).to_clock().is_some());
    }
}
