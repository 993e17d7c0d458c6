//! Human-readable rendering of identifiers.
//!
//! Purely presentational: the output carries no uniqueness guarantees beyond
//! those of the identifier it was rendered from.

use chrono::{DateTime, Utc};

use crate::{layout::BitLayout, settings::Settings};

/// Renders `id` as a calendar timestamp followed by its lower bits.
///
/// The format is `YYYYMMDDhhmmss`, then the 3-digit millisecond, then the
/// node, timeline and sequence bits as one decimal number zero-padded to the
/// digit count of their largest possible value. Time is rendered in UTC.
///
/// # Example
/// ```
/// use mtl_snowflake::{Settings, to_readable};
///
/// let settings = Settings::default();
/// let layout = settings.layout().unwrap();
/// let id = layout.compose(1_234, 5, 1, 7);
/// assert_eq!(to_readable(&layout, &settings, id), "202006100000012340045063");
/// ```
#[must_use]
pub fn to_readable(layout: &BitLayout, settings: &Settings, id: i64) -> String {
    let time = layout.decompose(id).time;
    let issued: DateTime<Utc> = DateTime::<Utc>::from_timestamp_nanos(settings.nanos_of(time));

    let lower_mask = layout.lower_mask();
    let lower = id & lower_mask;
    let width = lower_mask.to_string().len();

    format!(
        "{}{:03}{:0width$}",
        issued.format("%Y%m%d%H%M%S"),
        issued.timestamp_subsec_millis(),
        lower,
    )
}
