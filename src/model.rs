use serde::{Deserialize, Serialize};

/// Unix milliseconds — the only time type.
pub type Ms = i64;

pub const MINUTE_MS: Ms = 60_000;
pub const HOUR_MS: Ms = 60 * MINUTE_MS;
pub const DAY_MS: Ms = 24 * HOUR_MS;

/// Half-open interval `[start, end)`.
///
/// Inverted bounds collapse to the empty span `[start, start)`, so a span
/// coming off the wire can never claim more time than it covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "RawSpan")]
pub struct Span {
    pub start: Ms,
    pub end: Ms,
}

#[derive(Deserialize)]
struct RawSpan {
    start: Ms,
    end: Ms,
}

impl From<RawSpan> for Span {
    fn from(raw: RawSpan) -> Self {
        Span::new(raw.start, raw.end)
    }
}

impl Span {
    pub fn new(start: Ms, end: Ms) -> Self {
        Self {
            start,
            end: end.max(start),
        }
    }

    pub fn duration_ms(&self) -> Ms {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start >= self.end
    }

    pub fn overlaps(&self, other: &Span) -> bool {
        self.start < other.end && other.start < self.end
    }

    pub fn contains_instant(&self, t: Ms) -> bool {
        self.start <= t && t < self.end
    }

    /// Intersection with `window`, or `None` when nothing is left.
    pub fn clip(&self, window: &Span) -> Option<Span> {
        let clipped = Span::new(self.start.max(window.start), self.end.min(window.end));
        (!clipped.is_empty()).then_some(clipped)
    }
}

pub const CATEGORY_COUNT: usize = 3;

/// Kart size class. Reporting order follows declaration order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Junior,
    Senior,
    Double,
}

impl Category {
    pub const ALL: [Category; CATEGORY_COUNT] = [Category::Junior, Category::Senior, Category::Double];

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Category::Junior => "junior",
            Category::Senior => "senior",
            Category::Double => "double",
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KartStatus {
    Available,
    /// Pulled from the fleet for servicing; not offerable on any slot.
    Maintenance,
    Retired,
}

/// A kart as supplied by the fleet/booking system.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Kart {
    pub id: String,
    pub category: Category,
    pub status: KartStatus,
    #[serde(default)]
    pub bookings: Vec<Span>,
    #[serde(default)]
    pub maintenance: Vec<Span>,
}

impl Kart {
    pub fn new(id: impl Into<String>, category: Category) -> Self {
        Self {
            id: id.into(),
            category,
            status: KartStatus::Available,
            bookings: Vec::new(),
            maintenance: Vec::new(),
        }
    }

    pub fn is_offerable(&self) -> bool {
        self.status == KartStatus::Available
    }

    /// Bookings and maintenance windows alike — both take the kart out of the pool.
    pub fn occupancy(&self) -> impl Iterator<Item = &Span> {
        self.bookings.iter().chain(self.maintenance.iter())
    }

    pub fn interval_count(&self) -> usize {
        self.bookings.len() + self.maintenance.len()
    }
}

/// A fixed point in the venue's day.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimeSlot {
    pub minute_of_day: u32,
    pub label: String,
    /// Absolute instant of this slot on the evaluated day.
    pub at: Ms,
}

// ── Query result types ───────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AvailabilitySlot {
    pub time: String,
    pub category: Category,
    pub available: bool,
    pub available_count: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategorySummary {
    pub category: Category,
    pub total: u32,
    pub offerable: u32,
}
