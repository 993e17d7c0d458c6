use core::{cmp::Ordering, fmt, time::Duration};
use std::sync::Arc;

#[cfg(feature = "tracing")]
use tracing::instrument;

use crate::{
    error::{Error, Result},
    generator::Mutex,
    id::IdFields,
    layout::BitLayout,
    settings::{MAX_WAIT_UNITS, Settings},
    time::{SystemClock, TimeSource},
    timeline::TimelineTracker,
};

/// Mutable generator state. Only touched with the generator lock held.
#[derive(Debug)]
pub(crate) struct GeneratorState {
    pub(crate) timelines: TimelineTracker,
    pub(crate) seq: i64,
}

/// A lock-based, multi-timeline Snowflake ID generator.
///
/// Every call to [`TimelineGenerator::generate`] runs as one critical section
/// over the timeline progress, the active timeline and the sequence counter.
/// When the wall clock jumps backward by more than [`MAX_WAIT_UNITS`], the
/// generator leaves the active timeline frozen at its high-water mark and
/// resumes on the timeline whose progress is closest below the regressed
/// time.
///
/// ## Features
/// - ✅ Thread-safe
/// - ✅ Survives up to `2^timeline_bits - 1` backward jumps that land before
///   the abandoned timelines' progress
/// - ✅ Any 41/9/1/12-style layout summing to 63 bits
///
/// ## Blocking
/// Two waits happen while the lock is held: catching up a backward gap of at
/// most [`MAX_WAIT_UNITS`], and waiting out an exhausted sequence until the
/// next time unit. Concurrent callers queue behind the waiting one.
///
/// Clones share the same state and lock.
///
/// [`MAX_WAIT_UNITS`]: crate::MAX_WAIT_UNITS
pub struct TimelineGenerator<T = SystemClock>
where
    T: TimeSource,
{
    #[cfg(feature = "cache-padded")]
    state: Arc<crossbeam_utils::CachePadded<Mutex<GeneratorState>>>,
    #[cfg(not(feature = "cache-padded"))]
    state: Arc<Mutex<GeneratorState>>,
    settings: Settings,
    layout: BitLayout,
    node_id: i64,
    time: T,
}

impl TimelineGenerator<SystemClock> {
    /// Creates a generator with [`Settings::default`] on the system clock.
    ///
    /// # Errors
    ///
    /// See [`TimelineGenerator::with_time_source`].
    ///
    /// # Example
    /// ```
    /// use mtl_snowflake::TimelineGenerator;
    ///
    /// let generator = TimelineGenerator::new(7).unwrap();
    /// let id = generator.generate().unwrap();
    /// assert_eq!(generator.decompose(id).node_id, 7);
    /// ```
    pub fn new(node_id: i64) -> Result<Self> {
        Self::with_settings(node_id, Settings::default())
    }

    /// Creates a generator with custom settings on the system clock.
    ///
    /// # Errors
    ///
    /// See [`TimelineGenerator::with_time_source`].
    pub fn with_settings(node_id: i64, settings: Settings) -> Result<Self> {
        Self::with_time_source(node_id, settings, SystemClock)
    }
}

impl<T> TimelineGenerator<T>
where
    T: TimeSource,
{
    /// Creates a generator reading time from `time`.
    ///
    /// All timelines start at progress 0 with timeline 0 active and the
    /// sequence at 0.
    ///
    /// # Errors
    ///
    /// - [`Error::InvalidBitWidths`] if the widths do not sum to 63
    /// - [`Error::TooManyTimelines`] if `timeline_bits` exceeds
    ///   [`BitLayout::MAX_TIMELINE_BITS`]
    /// - [`Error::NodeIdOutOfRange`] if `node_id` is not in
    ///   `0..=2^node_bits - 1`
    /// - [`Error::EpochInFuture`] if the epoch is later than `time` reports
    /// - [`Error::EpochTooOld`] if the current offset does not fit in the time
    ///   field
    pub fn with_time_source(node_id: i64, settings: Settings, time: T) -> Result<Self> {
        let layout = settings.layout()?;

        if !(0..=layout.max_node_id()).contains(&node_id) {
            return Err(Error::NodeIdOutOfRange {
                node_id,
                max: layout.max_node_id(),
            });
        }

        let offset_now = settings.offset_of(time.now_nanos());
        if offset_now < 0 {
            return Err(Error::EpochInFuture {
                offset: offset_now.saturating_neg(),
            });
        }
        if offset_now > layout.max_time() {
            return Err(Error::EpochTooOld {
                offset: offset_now,
                max: layout.max_time(),
            });
        }

        let state = GeneratorState {
            timelines: TimelineTracker::new(layout.timeline_count()),
            seq: 0,
        };

        Ok(Self {
            #[cfg(feature = "cache-padded")]
            state: Arc::new(crossbeam_utils::CachePadded::new(Mutex::new(state))),
            #[cfg(not(feature = "cache-padded"))]
            state: Arc::new(Mutex::new(state)),
            settings,
            layout,
            node_id,
            time,
        })
    }

    /// Generates the next identifier.
    ///
    /// Holds the generator lock for the whole call, including any wait.
    ///
    /// # Errors
    ///
    /// - [`Error::ClockBeforeEpoch`] if the clock regressed behind the epoch
    /// - [`Error::ClockRegressionExhausted`] if no timeline is behind the
    ///   regressed clock
    /// - [`Error::TimeOverflow`] if the offset no longer fits in the time field
    /// - [`Error::LockPoisoned`] if another thread panicked inside the lock
    ///   (std mutex only)
    ///
    /// # Example
    /// ```
    /// use mtl_snowflake::TimelineGenerator;
    ///
    /// let generator = TimelineGenerator::new(0).unwrap();
    /// let a = generator.generate().unwrap();
    /// let b = generator.generate().unwrap();
    /// assert_ne!(a, b);
    /// assert!(a >= 0 && b >= 0);
    /// ```
    #[cfg_attr(feature = "tracing", instrument(level = "trace", skip(self)))]
    pub fn generate(&self) -> Result<i64> {
        let mut guard = {
            #[cfg(feature = "parking-lot")]
            {
                self.state.lock()
            }
            #[cfg(not(feature = "parking-lot"))]
            {
                self.state.lock()?
            }
        };
        let state = &mut *guard;

        let mut cur_time = self.offset_now();
        loop {
            let timeline = state.timelines.current();
            let progress = state.timelines.progress_of(timeline);

            match cur_time.cmp(&progress) {
                Ordering::Less => {
                    if cur_time < 0 {
                        #[cfg(feature = "tracing")]
                        tracing::error!(offset = cur_time, "clock regressed behind the epoch");
                        return Err(Error::ClockBeforeEpoch { offset: cur_time });
                    }

                    if progress - cur_time <= MAX_WAIT_UNITS {
                        #[cfg(feature = "tracing")]
                        tracing::debug!(
                            gap = progress - cur_time,
                            "small clock regression, waiting to catch up"
                        );
                        self.wait_until(progress);
                        cur_time = self.offset_now();
                    } else {
                        self.switch_timeline(state, cur_time)?;
                    }
                    // Re-evaluate: a catch-up may still fall short, a switch
                    // lands strictly above the new timeline's progress.
                }
                Ordering::Equal => {
                    state.seq = (state.seq + 1) & self.layout.max_seq();
                    if state.seq == 0 {
                        #[cfg(feature = "tracing")]
                        tracing::debug!(offset = cur_time, "sequence exhausted, waiting for next time unit");
                        self.wait_until(progress + 1);
                        cur_time = self.offset_now();
                        if cur_time <= progress {
                            // Still inside (or behind) the exhausted unit.
                            state.seq = self.layout.max_seq();
                            continue;
                        }
                    }
                    break;
                }
                Ordering::Greater => {
                    state.seq = 0;
                    break;
                }
            }
        }

        let timeline = state.timelines.current();
        state.timelines.set_progress(timeline, cur_time);

        if cur_time > self.layout.max_time() {
            #[cfg(feature = "tracing")]
            tracing::error!(offset = cur_time, max = self.layout.max_time(), "time field overflow");
            return Err(Error::TimeOverflow {
                offset: cur_time,
                max: self.layout.max_time(),
            });
        }

        Ok(self
            .layout
            .compose(cur_time, self.node_id, timeline as i64, state.seq))
    }

    /// Splits `id` into its fields using this generator's layout.
    #[must_use]
    pub const fn decompose(&self, id: i64) -> IdFields {
        self.layout.decompose(id)
    }

    /// Renders `id` as `YYYYMMDDhhmmss` + milliseconds + the zero-padded
    /// lower (node, timeline, sequence) bits, in UTC.
    #[cfg_attr(docsrs, doc(cfg(feature = "readable")))]
    #[cfg(feature = "readable")]
    #[must_use]
    pub fn to_readable(&self, id: i64) -> String {
        crate::readable::to_readable(&self.layout, &self.settings, id)
    }

    pub const fn node_id(&self) -> i64 {
        self.node_id
    }

    pub const fn settings(&self) -> &Settings {
        &self.settings
    }

    pub const fn layout(&self) -> &BitLayout {
        &self.layout
    }

    /// Index of the active timeline.
    ///
    /// # Errors
    ///
    /// Returns [`Error::LockPoisoned`] if the lock is poisoned (std mutex
    /// only).
    pub fn current_timeline(&self) -> Result<usize> {
        #[cfg(feature = "parking-lot")]
        let state = self.state.lock();
        #[cfg(not(feature = "parking-lot"))]
        let state = self.state.lock()?;
        Ok(state.timelines.current())
    }

    /// Snapshot of every timeline's progress.
    ///
    /// # Errors
    ///
    /// Returns [`Error::LockPoisoned`] if the lock is poisoned (std mutex
    /// only).
    pub fn timeline_progress(&self) -> Result<Vec<i64>> {
        #[cfg(feature = "parking-lot")]
        let state = self.state.lock();
        #[cfg(not(feature = "parking-lot"))]
        let state = self.state.lock()?;
        Ok(state.timelines.progress().to_vec())
    }

    /// Leaves the active timeline at its high-water mark and resumes on the
    /// closest timeline below `cur_time`.
    #[cold]
    #[inline(never)]
    fn switch_timeline(&self, state: &mut GeneratorState, cur_time: i64) -> Result<()> {
        let next = match state.timelines.find_suitable(cur_time) {
            Ok(next) => next,
            Err(e) => {
                #[cfg(feature = "tracing")]
                tracing::error!(
                    offset = cur_time,
                    progress = ?state.timelines.progress(),
                    "clock regression exhausted every timeline"
                );
                return Err(e);
            }
        };

        #[cfg(feature = "tracing")]
        {
            let abandoned = state.timelines.current();
            tracing::warn!(
                from = abandoned,
                to = next,
                frozen_at = state.timelines.progress_of(abandoned),
                offset = cur_time,
                "clock moved backward, switching timeline"
            );
        }

        state.timelines.switch_to(next);
        state.seq = 0;
        Ok(())
    }

    fn offset_now(&self) -> i64 {
        self.settings.offset_of(self.time.now_nanos())
    }

    /// Sleeps until the first nanosecond of time unit `offset`.
    fn wait_until(&self, offset: i64) {
        let target = self.settings.nanos_of(offset);
        let remaining = target.saturating_sub(self.time.now_nanos());
        if let Ok(nanos) = u64::try_from(remaining) {
            if nanos > 0 {
                self.time.sleep(Duration::from_nanos(nanos));
            }
        }
    }
}

impl<T> Clone for TimelineGenerator<T>
where
    T: TimeSource + Clone,
{
    fn clone(&self) -> Self {
        Self {
            state: Arc::clone(&self.state),
            settings: self.settings,
            layout: self.layout,
            node_id: self.node_id,
            time: self.time.clone(),
        }
    }
}

impl<T> fmt::Debug for TimelineGenerator<T>
where
    T: TimeSource,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TimelineGenerator")
            .field("node_id", &self.node_id)
            .field("settings", &self.settings)
            .field("layout", &self.layout)
            .finish_non_exhaustive()
    }
}
