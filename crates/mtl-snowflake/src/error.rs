/// A result type defaulting to this crate's [`Error`].
pub type Result<T, E = Error> = core::result::Result<T, E>;

/// All error variants that `mtl-snowflake` can emit.
///
/// Errors fall into four families:
///
/// - **config**: [`Error::InvalidBitWidths`], [`Error::TooManyTimelines`],
///   [`Error::NodeIdOutOfRange`].
///   Only raised at construction.
/// - **clock**: [`Error::EpochInFuture`], [`Error::EpochTooOld`],
///   [`Error::ClockBeforeEpoch`]. The epoch and the wall clock disagree.
/// - [`Error::ClockRegressionExhausted`]: every timeline is ahead of the
///   regressed clock.
/// - [`Error::TimeOverflow`]: the time field cannot hold the current offset.
///
/// None of them are retried internally. A call either yields an identifier or
/// exactly one of these errors.
#[derive(Clone, Debug, PartialEq, Eq, Hash, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    /// The four field widths do not add up to 63 bits.
    #[error(
        "bit widths must sum to 63, got time({time}) + node({node}) + timeline({timeline}) + seq({seq}) = {sum}"
    )]
    InvalidBitWidths {
        time: u8,
        node: u8,
        timeline: u8,
        seq: u8,
        sum: u32,
    },

    /// The timeline field asks for more timelines than can be tracked.
    #[error("timeline_bits ({timeline_bits}) must be at most {max}")]
    TooManyTimelines { timeline_bits: u8, max: u8 },

    /// The node id does not fit in the configured node field.
    #[error("node id {node_id} must be within 0..={max} (2^node_bits - 1)")]
    NodeIdOutOfRange { node_id: i64, max: i64 },

    /// The epoch is later than the clock reading taken at construction.
    #[error("epoch must not be later than the current time (now is {offset} time units before it)")]
    EpochInFuture { offset: i64 },

    /// The epoch is so far in the past that the current offset does not fit in
    /// the time field.
    #[error("offset {offset} since epoch exceeds the time field maximum {max}; use more time bits or a more recent epoch")]
    EpochTooOld { offset: i64, max: i64 },

    /// During generation the clock fell behind the epoch itself.
    #[error("clock regressed behind the epoch (offset {offset}); check the system clock or pick an earlier epoch")]
    ClockBeforeEpoch { offset: i64 },

    /// No timeline has progress strictly below the regressed clock.
    #[error("clock regressed too often: no timeline is behind offset {offset}; add timelines or stabilize clock sync")]
    ClockRegressionExhausted { offset: i64 },

    /// The elapsed time since the epoch outgrew the time field.
    #[error("offset {offset} since epoch exceeds the time field maximum {max}")]
    TimeOverflow { offset: i64, max: i64 },

    /// The generator lock was **poisoned** by a panicking holder.
    ///
    /// With the `parking-lot` feature mutexes do not poison, so this variant is
    /// not available.
    #[cfg_attr(docsrs, doc(cfg(not(feature = "parking-lot"))))]
    #[cfg(not(feature = "parking-lot"))]
    #[error("generator lock was poisoned")]
    LockPoisoned,
}

impl Error {
    /// Whether this error stems from invalid construction parameters.
    #[must_use]
    pub const fn is_config_error(&self) -> bool {
        matches!(
            self,
            Self::InvalidBitWidths { .. }
                | Self::TooManyTimelines { .. }
                | Self::NodeIdOutOfRange { .. }
        )
    }

    /// Whether this error stems from the epoch and the clock disagreeing.
    #[must_use]
    pub const fn is_clock_error(&self) -> bool {
        matches!(
            self,
            Self::EpochInFuture { .. } | Self::EpochTooOld { .. } | Self::ClockBeforeEpoch { .. }
        )
    }
}

#[cfg(not(feature = "parking-lot"))]
use crate::generator::{MutexGuard, PoisonError};
#[cfg(not(feature = "parking-lot"))]
impl<T> From<PoisonError<MutexGuard<'_, T>>> for Error {
    fn from(_: PoisonError<MutexGuard<'_, T>>) -> Self {
        Self::LockPoisoned
    }
}
