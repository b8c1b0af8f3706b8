//! Windowing and summary statistics shared by every model
//!
//! All models read the *tail* of the check-in sequence. Routing every window
//! through [`tail`] keeps the off-by-one behavior identical across models.

/// Last `n` items of a slice (the whole slice when it is shorter)
pub fn tail<T>(items: &[T], n: usize) -> &[T] {
    &items[items.len().saturating_sub(n)..]
}

/// Arithmetic mean, `None` for an empty series
pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}

/// Mean of a series, falling back to `default` when it is empty
pub fn mean_or(values: &[f64], default: f64) -> f64 {
    mean(values).unwrap_or(default)
}

/// Population standard deviation (divides by n, not n - 1)
pub fn std_dev(values: &[f64]) -> f64 {
    let Some(mu) = mean(values) else {
        return 0.0;
    };
    let variance = values.iter().map(|v| (v - mu).powi(2)).sum::<f64>() / values.len() as f64;
    variance.sqrt()
}

/// Pearson correlation coefficient over paired series.
///
/// Returns 0 when either series has zero variance or the lengths differ.
/// The result is clamped to [-1, 1] to absorb floating point drift.
pub fn pearson(xs: &[f64], ys: &[f64]) -> f64 {
    if xs.len() != ys.len() || xs.is_empty() {
        return 0.0;
    }
    let mean_x = mean_or(xs, 0.0);
    let mean_y = mean_or(ys, 0.0);

    let mut num = 0.0;
    let mut sum_sq_x = 0.0;
    let mut sum_sq_y = 0.0;
    for (x, y) in xs.iter().zip(ys) {
        let dx = x - mean_x;
        let dy = y - mean_y;
        num += dx * dy;
        sum_sq_x += dx * dx;
        sum_sq_y += dy * dy;
    }

    let denom = sum_sq_x.sqrt() * sum_sq_y.sqrt();
    if denom == 0.0 {
        return 0.0;
    }
    (num / denom).clamp(-1.0, 1.0)
}

/// Round to the nearest integer with halves rounded toward +∞.
///
/// `f64::round` rounds halves away from zero, which would report a load
/// delta of -2.5 as -3; scores and deltas here use -2.
pub fn round_half_up(value: f64) -> f64 {
    (value + 0.5).floor()
}

/// Round to a fixed number of decimals (half-up)
pub fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    round_half_up(value * factor) / factor
}

/// Clamp to `[min, max]` and round, the final step of every composite score
pub fn clamp_round(value: f64, min: f64, max: f64) -> f64 {
    round_half_up(value.clamp(min, max))
}

/// [`clamp_round`] into the 0-100 score range as an integer
pub fn score(value: f64) -> u8 {
    let value = if value.is_nan() { 0.0 } else { value };
    clamp_round(value, 0.0, 100.0) as u8
}

/// Count of trailing elements satisfying `predicate`, scanning backward
pub fn trailing_count<T>(items: &[T], predicate: impl Fn(&T) -> bool) -> u32 {
    items.iter().rev().take_while(|item| predicate(*item)).count() as u32
}
