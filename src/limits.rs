use crate::model::Ms;

/// Karts accepted in one fleet snapshot.
pub const MAX_KARTS: usize = 10_000;

/// Bookings + maintenance windows on a single kart.
pub const MAX_INTERVALS_PER_KART: usize = 50_000;

pub const MAX_ID_LEN: usize = 256;

/// 1970-01-01T00:00:00Z
pub const MIN_VALID_TIMESTAMP_MS: Ms = 0;

/// 2200-01-01T00:00:00Z
pub const MAX_VALID_TIMESTAMP_MS: Ms = 7_258_118_400_000;

/// Longest request line the query protocol will buffer.
pub const MAX_LINE_LEN: usize = 64 * 1024;
