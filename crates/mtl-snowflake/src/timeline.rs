use crate::error::{Error, Result};

/// Per-timeline progress marks plus the active timeline pointer.
///
/// Each slot holds the greatest time offset issued on that timeline. The
/// active slot only moves forward while it is active; an abandoned slot stays
/// frozen at the offset recorded when the generator left it.
///
/// The tracker is owned by a single generator and only touched while its lock
/// is held.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TimelineTracker {
    progress: Box<[i64]>,
    current: usize,
}

impl TimelineTracker {
    /// Creates `count` timelines, all at progress 0, with timeline 0 active.
    ///
    /// # Panics
    ///
    /// Panics if `count` is zero.
    #[must_use]
    pub fn new(count: usize) -> Self {
        assert!(count > 0, "at least one timeline is required");
        Self {
            progress: vec![0; count].into_boxed_slice(),
            current: 0,
        }
    }

    /// Number of timelines.
    #[must_use]
    pub fn len(&self) -> usize {
        self.progress.len()
    }

    /// Always `false`; a tracker has at least one timeline.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.progress.is_empty()
    }

    /// Index of the active timeline.
    #[must_use]
    pub const fn current(&self) -> usize {
        self.current
    }

    /// Makes `idx` the active timeline.
    ///
    /// # Panics
    ///
    /// Panics if `idx` is out of range.
    pub fn switch_to(&mut self, idx: usize) {
        assert!(idx < self.progress.len(), "timeline {idx} out of range");
        self.current = idx;
    }

    /// Progress of timeline `idx`.
    ///
    /// # Panics
    ///
    /// Panics if `idx` is out of range.
    #[must_use]
    pub fn progress_of(&self, idx: usize) -> i64 {
        self.progress[idx]
    }

    /// Records `value` as the latest offset observed on timeline `idx`.
    ///
    /// # Panics
    ///
    /// Panics if `idx` is out of range.
    pub fn set_progress(&mut self, idx: usize, value: i64) {
        self.progress[idx] = value;
    }

    /// All progress marks, indexed by timeline.
    #[must_use]
    pub fn progress(&self) -> &[i64] {
        &self.progress
    }

    /// Picks the timeline to resume on after the clock regressed to
    /// `cur_time`.
    ///
    /// Chooses the greatest progress that is still strictly below `cur_time`,
    /// the smallest backward gap. Ties go to the lowest index. A linear scan is
    /// fine since there are only a handful of timelines.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ClockRegressionExhausted`] if every timeline has
    /// progress at or beyond `cur_time`.
    pub fn find_suitable(&self, cur_time: i64) -> Result<usize> {
        let mut found: Option<(usize, i64)> = None;
        for (idx, &progress) in self.progress.iter().enumerate() {
            if progress >= cur_time {
                continue;
            }
            match found {
                Some((_, best)) if best >= progress => {}
                _ => found = Some((idx, progress)),
            }
        }

        found
            .map(|(idx, _)| idx)
            .ok_or(Error::ClockRegressionExhausted { offset: cur_time })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tracker_with(progress: &[i64]) -> TimelineTracker {
        let mut tracker = TimelineTracker::new(progress.len());
        for (idx, &value) in progress.iter().enumerate() {
            tracker.set_progress(idx, value);
        }
        tracker
    }

    #[test]
    fn starts_at_zero_on_timeline_zero() {
        let tracker = TimelineTracker::new(4);
        assert_eq!(tracker.len(), 4);
        assert_eq!(tracker.current(), 0);
        assert_eq!(tracker.progress(), &[0, 0, 0, 0]);
    }

    #[test]
    fn picks_greatest_progress_below_current_time() {
        let tracker = tracker_with(&[500, 120, 90, 130]);
        assert_eq!(tracker.find_suitable(125), Ok(1));
        assert_eq!(tracker.find_suitable(131), Ok(3));
        assert_eq!(tracker.find_suitable(100), Ok(2));
    }

    #[test]
    fn equal_progress_does_not_qualify() {
        let tracker = tracker_with(&[200, 100]);
        assert_eq!(
            tracker.find_suitable(100),
            Err(Error::ClockRegressionExhausted { offset: 100 })
        );
        assert_eq!(tracker.find_suitable(101), Ok(1));
    }

    #[test]
    fn ties_go_to_the_lowest_index() {
        let tracker = tracker_with(&[300, 50, 50, 10]);
        assert_eq!(tracker.find_suitable(60), Ok(1));
    }

    #[test]
    fn single_timeline_is_exhausted_by_any_regression() {
        let tracker = tracker_with(&[1_000]);
        assert!(matches!(
            tracker.find_suitable(900),
            Err(Error::ClockRegressionExhausted { offset: 900 })
        ));
    }

    #[test]
    fn switch_freezes_previous_progress() {
        let mut tracker = tracker_with(&[1_000, 0]);
        tracker.set_progress(0, 400);
        let next = tracker.find_suitable(400).unwrap();
        tracker.switch_to(next);
        tracker.set_progress(next, 401);

        assert_eq!(tracker.current(), 1);
        assert_eq!(tracker.progress(), &[400, 401]);
    }

    #[test]
    #[should_panic(expected = "out of range")]
    fn switch_rejects_unknown_timeline() {
        TimelineTracker::new(2).switch_to(2);
    }
}
