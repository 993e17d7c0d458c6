//! # Bit layout
//!
//! Identifiers are packed from **MSB to LSB**:
//!
//! ```text
//!  Bit Index:  63     62                                                0
//!              +------+-----------+------------+--------------+---------+
//!  Field:      | sign |  time (T) |  node (N)  | timeline (L) | seq (S) |
//!              +------+-----------+------------+--------------+---------+
//!              |<----------------- MSB -- 64 bits -- LSB -------------->|
//! ```
//!
//! `T + N + L + S == 63`. The sign bit is always zero.

use crate::{
    error::{Error, Result},
    id::IdFields,
};

/// Shift amounts, masks and maxima derived from the four field widths.
///
/// Computed once by the generator and never mutated.
///
/// # Example
/// ```
/// use mtl_snowflake::BitLayout;
///
/// let layout = BitLayout::new(41, 9, 1, 12).unwrap();
/// assert_eq!(layout.timeline_shift(), 12);
/// assert_eq!(layout.node_shift(), 13);
/// assert_eq!(layout.time_shift(), 22);
/// assert_eq!(layout.max_node_id(), 511);
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct BitLayout {
    time_bits: u8,
    node_bits: u8,
    timeline_bits: u8,
    seq_bits: u8,

    time_shift: u32,
    node_shift: u32,
    timeline_shift: u32,

    max_time: i64,
    max_node_id: i64,
    max_timeline: i64,
    max_seq: i64,
}

/// `2^bits - 1`, valid for every width up to 63.
const fn field_max(bits: u8) -> i64 {
    ((1_u64 << bits) - 1) as i64
}

impl BitLayout {
    /// Payload width of an identifier. The 64th bit is the reserved sign bit.
    pub const ID_BITS: u32 = 63;

    /// Widest timeline field accepted. Every timeline owns a progress slot, so
    /// this caps the tracker at 65 536 entries.
    pub const MAX_TIMELINE_BITS: u8 = 16;

    /// Derives the layout from the four field widths.
    ///
    /// # Errors
    ///
    /// - [`Error::InvalidBitWidths`] unless the widths sum to exactly 63
    /// - [`Error::TooManyTimelines`] if `timeline_bits` exceeds
    ///   [`BitLayout::MAX_TIMELINE_BITS`]
    pub const fn new(time_bits: u8, node_bits: u8, timeline_bits: u8, seq_bits: u8) -> Result<Self> {
        let sum = time_bits as u32 + node_bits as u32 + timeline_bits as u32 + seq_bits as u32;
        if sum != Self::ID_BITS {
            return Err(Error::InvalidBitWidths {
                time: time_bits,
                node: node_bits,
                timeline: timeline_bits,
                seq: seq_bits,
                sum,
            });
        }
        if timeline_bits > Self::MAX_TIMELINE_BITS {
            return Err(Error::TooManyTimelines {
                timeline_bits,
                max: Self::MAX_TIMELINE_BITS,
            });
        }

        let timeline_shift = seq_bits as u32;
        let node_shift = timeline_shift + timeline_bits as u32;
        let time_shift = node_shift + node_bits as u32;

        Ok(Self {
            time_bits,
            node_bits,
            timeline_bits,
            seq_bits,
            time_shift,
            node_shift,
            timeline_shift,
            max_time: field_max(time_bits),
            max_node_id: field_max(node_bits),
            max_timeline: field_max(timeline_bits),
            max_seq: field_max(seq_bits),
        })
    }

    pub const fn time_bits(&self) -> u8 {
        self.time_bits
    }

    pub const fn node_bits(&self) -> u8 {
        self.node_bits
    }

    pub const fn timeline_bits(&self) -> u8 {
        self.timeline_bits
    }

    pub const fn seq_bits(&self) -> u8 {
        self.seq_bits
    }

    pub const fn time_shift(&self) -> u32 {
        self.time_shift
    }

    pub const fn node_shift(&self) -> u32 {
        self.node_shift
    }

    pub const fn timeline_shift(&self) -> u32 {
        self.timeline_shift
    }

    /// The sequence always sits in the least-significant bits.
    pub const fn seq_shift(&self) -> u32 {
        0
    }

    pub const fn time_mask(&self) -> i64 {
        self.max_time << self.time_shift
    }

    pub const fn node_mask(&self) -> i64 {
        self.max_node_id << self.node_shift
    }

    pub const fn timeline_mask(&self) -> i64 {
        self.max_timeline << self.timeline_shift
    }

    pub const fn seq_mask(&self) -> i64 {
        self.max_seq
    }

    /// Largest representable time offset, `2^time_bits - 1`.
    pub const fn max_time(&self) -> i64 {
        self.max_time
    }

    /// Largest valid node id, `2^node_bits - 1`.
    pub const fn max_node_id(&self) -> i64 {
        self.max_node_id
    }

    /// Largest timeline index, `2^timeline_bits - 1`.
    pub const fn max_timeline(&self) -> i64 {
        self.max_timeline
    }

    /// Largest sequence value, `2^seq_bits - 1`.
    pub const fn max_seq(&self) -> i64 {
        self.max_seq
    }

    /// Number of independent timelines, `2^timeline_bits`.
    pub const fn timeline_count(&self) -> usize {
        1 << self.timeline_bits
    }

    /// Mask covering everything below the time field (node, timeline and
    /// sequence).
    pub const fn lower_mask(&self) -> i64 {
        field_max(self.time_shift as u8)
    }

    /// Packs already-validated field values into an identifier.
    ///
    /// Each value is masked to its width, so out-of-range input can never
    /// bleed into a neighbouring field.
    pub const fn compose(&self, time: i64, node_id: i64, timeline: i64, seq: i64) -> i64 {
        ((time & self.max_time) << self.time_shift)
            | ((node_id & self.max_node_id) << self.node_shift)
            | ((timeline & self.max_timeline) << self.timeline_shift)
            | (seq & self.max_seq)
    }

    /// Splits an identifier back into its fields.
    ///
    /// Never fails: every 63-bit value is structurally decomposable, whether or
    /// not a generator actually issued it. The sign bit is ignored.
    pub const fn decompose(&self, id: i64) -> IdFields {
        IdFields {
            time: (id & self.time_mask()) >> self.time_shift,
            node_id: (id & self.node_mask()) >> self.node_shift,
            timeline: (id & self.timeline_mask()) >> self.timeline_shift,
            seq: id & self.seq_mask(),
        }
    }
}
