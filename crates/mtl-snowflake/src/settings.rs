use crate::{error::Result, layout::BitLayout};

/// Nanoseconds per time unit. Offsets are quantized to milliseconds.
pub const TIME_UNIT_NANOS: i64 = 1_000_000;

/// Largest backward gap, in time units, that is absorbed by sleeping instead
/// of switching timelines.
pub const MAX_WAIT_UNITS: i64 = 1;

/// Default epoch: Wednesday, June 10, 2020 00:00:00 UTC, in nanoseconds since
/// the Unix epoch.
pub const DEFAULT_EPOCH: i64 = 1_591_747_200_000_000_000;

/// 41 time bits last roughly 69 years at millisecond resolution.
pub const DEFAULT_TIME_BITS: u8 = 41;
/// 9 node bits allow 512 nodes.
pub const DEFAULT_NODE_BITS: u8 = 9;
/// 1 timeline bit gives two timelines, enough for the common single backward
/// step of an NTP correction.
pub const DEFAULT_TIMELINE_BITS: u8 = 1;
/// 12 sequence bits allow 4096 identifiers per millisecond per node.
pub const DEFAULT_SEQ_BITS: u8 =
    BitLayout::ID_BITS as u8 - DEFAULT_TIME_BITS - DEFAULT_NODE_BITS - DEFAULT_TIMELINE_BITS;

/// Default generator settings (41/9/1/12 from [`DEFAULT_EPOCH`]).
pub const DEFAULT_SETTINGS: Settings = Settings {
    time_bits: DEFAULT_TIME_BITS,
    node_bits: DEFAULT_NODE_BITS,
    timeline_bits: DEFAULT_TIMELINE_BITS,
    seq_bits: DEFAULT_SEQ_BITS,
    epoch: DEFAULT_EPOCH,
};

/// Immutable generator configuration.
///
/// The four widths must add up to 63; the top bit of every identifier stays
/// zero so identifiers are non-negative as `i64`.
///
/// # Example
/// ```
/// use mtl_snowflake::Settings;
///
/// let settings = Settings::default().with_node_bits(8).with_timeline_bits(2);
/// assert!(settings.layout().is_ok());
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Settings {
    /// Width of the time field.
    pub time_bits: u8,
    /// Width of the node id field.
    pub node_bits: u8,
    /// Width of the timeline field.
    pub timeline_bits: u8,
    /// Width of the sequence field.
    pub seq_bits: u8,
    /// Reference instant, in nanoseconds since the Unix epoch.
    pub epoch: i64,
}

impl Default for Settings {
    fn default() -> Self {
        DEFAULT_SETTINGS
    }
}

impl Settings {
    #[must_use]
    pub const fn with_time_bits(mut self, bits: u8) -> Self {
        self.time_bits = bits;
        self
    }

    #[must_use]
    pub const fn with_node_bits(mut self, bits: u8) -> Self {
        self.node_bits = bits;
        self
    }

    #[must_use]
    pub const fn with_timeline_bits(mut self, bits: u8) -> Self {
        self.timeline_bits = bits;
        self
    }

    #[must_use]
    pub const fn with_seq_bits(mut self, bits: u8) -> Self {
        self.seq_bits = bits;
        self
    }

    /// Sets the epoch in nanoseconds since the Unix epoch.
    #[must_use]
    pub const fn with_epoch(mut self, epoch_nanos: i64) -> Self {
        self.epoch = epoch_nanos;
        self
    }

    /// Sets the epoch in milliseconds since the Unix epoch.
    #[must_use]
    pub const fn with_epoch_millis(self, epoch_millis: i64) -> Self {
        self.with_epoch(epoch_millis.saturating_mul(TIME_UNIT_NANOS))
    }

    /// Derives the bit layout, validating the widths.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidBitWidths`] if the widths do not sum to 63 and
    /// [`Error::TooManyTimelines`] if the timeline field is too wide.
    ///
    /// [`Error::InvalidBitWidths`]: crate::Error::InvalidBitWidths
    /// [`Error::TooManyTimelines`]: crate::Error::TooManyTimelines
    pub fn layout(&self) -> Result<BitLayout> {
        BitLayout::new(
            self.time_bits,
            self.node_bits,
            self.timeline_bits,
            self.seq_bits,
        )
    }

    /// Converts a clock reading into whole time units since the epoch.
    ///
    /// Readings before the epoch floor to negative offsets, so anything even
    /// slightly earlier than the epoch is reported as behind it.
    #[must_use]
    pub const fn offset_of(&self, unix_nanos: i64) -> i64 {
        unix_nanos
            .saturating_sub(self.epoch)
            .div_euclid(TIME_UNIT_NANOS)
    }

    /// Converts an offset back to the first nanosecond of that time unit.
    #[must_use]
    pub const fn nanos_of(&self, offset: i64) -> i64 {
        self.epoch
            .saturating_add(offset.saturating_mul(TIME_UNIT_NANOS))
    }
}
