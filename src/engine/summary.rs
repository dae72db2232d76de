use crate::model::*;

/// Per-category fleet size and how many karts are offerable at all.
/// No slot of a category can report more free karts than its `offerable`.
pub fn fleet_summary(karts: &[Kart]) -> Vec<CategorySummary> {
    let mut summary: Vec<CategorySummary> = Category::ALL
        .iter()
        .map(|&category| CategorySummary {
            category,
            total: 0,
            offerable: 0,
        })
        .collect();

    for kart in karts {
        let entry = &mut summary[kart.category.index()];
        entry.total += 1;
        if kart.is_offerable() {
            entry.offerable += 1;
        }
    }

    summary
}
