use chrono::NaiveDate;

use crate::model::*;
use crate::schedule::Schedule;

use super::intervals::{normalize_within, subtract_intervals};

/// Spans inside the operating window during which at least `min_available`
/// karts of `category` are free, for booking a whole heat at once.
///
/// Sweep line over each offerable kart's free spans: +1 where a kart frees
/// up, -1 where it stops being free. Starts sort before ends at the same
/// instant, so a handover between two karts never splits a span.
pub fn category_free_spans(
    karts: &[Kart],
    date: NaiveDate,
    schedule: &Schedule,
    category: Category,
    min_available: usize,
    min_duration_ms: Option<Ms>,
) -> Vec<Span> {
    let candidates: Vec<&Kart> = karts
        .iter()
        .filter(|k| k.category == category && k.is_offerable())
        .collect();
    if min_available == 0 || min_available > candidates.len() {
        return Vec::new();
    }
    let window = schedule.operating_window(date);

    let mut events: Vec<(Ms, bool)> = Vec::new();
    for kart in candidates {
        let occupied = normalize_within(kart.occupancy(), &window);
        for s in subtract_intervals(&[window], &occupied) {
            events.push((s.start, true));
            events.push((s.end, false));
        }
    }

    events.sort_by(|a, b| a.0.cmp(&b.0).then(b.1.cmp(&a.1)));

    let mut free = Vec::new();
    let mut count: usize = 0;
    let mut seg_start: Option<Ms> = None;

    for &(time, frees_up) in &events {
        if frees_up {
            count += 1;
            if count == min_available {
                seg_start = Some(time);
            }
            continue;
        }
        if count == min_available
            && let Some(start) = seg_start.take()
            && time > start
        {
            let span = Span::new(start, time);
            if min_duration_ms.is_none_or(|d| span.duration_ms() >= d) {
                free.push(span);
            }
        }
        count -= 1;
    }

    free
}
