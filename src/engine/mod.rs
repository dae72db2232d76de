//! Pure read-side computations over a fleet snapshot. Nothing here does I/O,
//! holds state between calls, or fails: malformed intervals are neutralised
//! by `Span::new` before they get here.

mod availability;
mod free_spans;
mod intervals;
mod summary;

pub use availability::{calculate_availability, category_availability, slot_counts};
pub use free_spans::category_free_spans;
pub use intervals::{covers, merge_overlapping, normalize_within, subtract_intervals};
pub use summary::fleet_summary;
