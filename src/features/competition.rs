//! Competition-pressure features.

/// Whole months since the nearest competitor opened, clamped at zero.
///
/// Missing open dates are treated as month/year 0 before the subtraction;
/// the clamp is the single safety net for both that convention and
/// competitors opening in the future. Applied identically at training and
/// inference, so the convention is part of the model contract rather than
/// a per-call fixup.
pub fn months_open(
    year: i32,
    month: u32,
    open_since_year: Option<i32>,
    open_since_month: Option<u32>,
) -> f32 {
    let since_year = open_since_year.unwrap_or(0);
    let since_month = open_since_month.unwrap_or(0) as i32;
    let months = (year - since_year) * 12 + (month as i32 - since_month);
    months.max(0) as f32
}

/// Median of the present competition distances.
///
/// Even-length inputs average the two middle values. Returns `None` when no
/// store has a recorded distance; the caller substitutes 0.0 and logs.
pub fn distance_median(values: impl Iterator<Item = f32>) -> Option<f32> {
    let mut sorted: Vec<f32> = values.filter(|v| v.is_finite()).collect();
    if sorted.is_empty() {
        return None;
    }
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));

    let mid = sorted.len() / 2;
    Some(if sorted.len() % 2 == 1 {
        sorted[mid]
    } else {
        (sorted[mid - 1] + sorted[mid]) / 2.0
    })
}
