pub mod category;
pub mod enhance;
pub mod matcher;
pub mod similarity;

/// `part / total` as a percentage rounded to one decimal; 0 when `total` is 0.
#[allow(clippy::cast_precision_loss)]
pub fn percentage(part: usize, total: usize) -> f64 {
    if total == 0 {
        return 0.0;
    }
    round_to(part as f64 / total as f64 * 100.0, 1)
}

/// Round half away from zero to `places` decimals.
pub fn round_to(value: f64, places: i32) -> f64 {
    let factor = 10f64.powi(places);
    (value * factor).round() / factor
}
