use core::fmt;

/// The logical fields of an identifier, as recovered by
/// [`BitLayout::decompose`].
///
/// A read-only projection. Decomposing succeeds for any value, even one no
/// generator ever produced.
///
/// [`BitLayout::decompose`]: crate::BitLayout::decompose
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct IdFields {
    /// Time units since the epoch.
    pub time: i64,
    pub node_id: i64,
    pub timeline: i64,
    pub seq: i64,
}

impl fmt::Display for IdFields {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "time={} node_id={} timeline={} seq={}",
            self.time, self.node_id, self.timeline, self.seq
        )
    }
}
