use crate::model::*;

/// Merge sorted overlapping/adjacent intervals into disjoint intervals.
pub fn merge_overlapping(sorted: &[Span]) -> Vec<Span> {
    let mut merged: Vec<Span> = Vec::new();
    for &span in sorted {
        if let Some(last) = merged.last_mut()
            && span.start <= last.end {
                last.end = last.end.max(span.end);
                continue;
            }
        merged.push(span);
    }
    merged
}

/// Remove sorted `to_remove` spans from sorted, disjoint `base` spans.
///
/// Used to turn a kart's merged occupancy into its free time inside the
/// operating window. The removal cursor only moves forward, so the whole
/// pass is linear in the two inputs.
pub fn subtract_intervals(base: &[Span], to_remove: &[Span]) -> Vec<Span> {
    let mut result = Vec::new();
    let mut ri = 0;

    for &b in base {
        let mut current_start = b.start;
        let current_end = b.end;

        while ri < to_remove.len() && to_remove[ri].end <= current_start {
            ri += 1;
        }

        let mut j = ri;
        while j < to_remove.len() && to_remove[j].start < current_end {
            let r = &to_remove[j];
            if r.start > current_start {
                result.push(Span::new(current_start, r.start));
            }
            current_start = current_start.max(r.end);
            j += 1;
        }

        if current_start < current_end {
            result.push(Span::new(current_start, current_end));
        }
    }

    result
}

/// Clip `spans` to `window`, drop what falls outside or is empty, then sort
/// and merge. The result is disjoint and sorted by start.
pub fn normalize_within<'a>(spans: impl IntoIterator<Item = &'a Span>, window: &Span) -> Vec<Span> {
    let mut clipped: Vec<Span> = spans.into_iter().filter_map(|s| s.clip(window)).collect();
    clipped.sort_by_key(|s| s.start);
    merge_overlapping(&clipped)
}

/// Instant lookup in sorted, disjoint spans.
pub fn covers(disjoint: &[Span], t: Ms) -> bool {
    // Only the last span starting at or before `t` can contain it.
    let idx = disjoint.partition_point(|s| s.start <= t);
    idx > 0 && disjoint[idx - 1].contains_instant(t)
}
