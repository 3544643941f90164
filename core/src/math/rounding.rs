/// Rounds `value` to `places` decimal digits.
///
/// Goes through exact decimal formatting rather than `(v * 10^n).round()`, so
/// values such as `2.675` (stored as `2.67499..`) round down the same way a
/// correctly-rounded decimal conversion does. Exact ties go to even.
pub fn round_to_places(value: f64, places: usize) -> f64 {
    if !value.is_finite() {
        return value;
    }
    format!("{:.*}", places, value).parse().unwrap_or(value)
}
