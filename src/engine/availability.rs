use chrono::NaiveDate;

use crate::model::*;
use crate::schedule::Schedule;

use super::intervals::{covers, normalize_within};

// ── Availability Algorithm ────────────────────────────────────────

/// Free-kart counts per slot, indexed `[slot][category]`.
///
/// Karts whose status is not `available` are skipped outright. For the rest,
/// bookings and maintenance are clipped to `day` and merged, so a kart is
/// either occupied at a slot instant or not — overlapping entries never count
/// twice, and empty or inverted entries never occupy.
pub fn slot_counts(karts: &[Kart], slots: &[TimeSlot], day: &Span) -> Vec<[u32; CATEGORY_COUNT]> {
    let mut counts = vec![[0u32; CATEGORY_COUNT]; slots.len()];

    for kart in karts.iter().filter(|k| k.is_offerable()) {
        let occupied = normalize_within(kart.occupancy(), day);
        let cat = kart.category.index();
        for (slot, row) in slots.iter().zip(counts.iter_mut()) {
            if !covers(&occupied, slot.at) {
                row[cat] += 1;
            }
        }
    }

    counts
}

/// Availability of every category at every slot of `date`.
/// Slot-major order; categories follow `Category::ALL` within a slot.
pub fn calculate_availability(
    karts: &[Kart],
    date: NaiveDate,
    schedule: &Schedule,
) -> Vec<AvailabilitySlot> {
    emit(karts, date, schedule, &Category::ALL)
}

/// Availability of one category at every slot of `date`.
pub fn category_availability(
    karts: &[Kart],
    date: NaiveDate,
    schedule: &Schedule,
    category: Category,
) -> Vec<AvailabilitySlot> {
    emit(karts, date, schedule, &[category])
}

fn emit(
    karts: &[Kart],
    date: NaiveDate,
    schedule: &Schedule,
    categories: &[Category],
) -> Vec<AvailabilitySlot> {
    let slots = schedule.slots(date);
    let day = schedule.day_window(date);
    let counts = slot_counts(karts, &slots, &day);

    let mut out = Vec::with_capacity(slots.len() * categories.len());
    for (slot, row) in slots.iter().zip(&counts) {
        for &category in categories {
            let available_count = row[category.index()];
            out.push(AvailabilitySlot {
                time: slot.label.clone(),
                category,
                available: available_count > 0,
                available_count,
            });
        }
    }
    out
}
