// =============================================================================
// Exponential Moving Average (EMA)
// =============================================================================
//
// EMA gives more weight to recent prices, making it more responsive to new
// information than the Simple Moving Average (SMA).
//
// Formula:
//   multiplier = 2 / (span + 1)
//   EMA_t      = value_t * multiplier + EMA_{t-1} * (1 - multiplier)
//
// The very first EMA value is seeded with the first observed value, with no
// warm-up bias correction.  The output therefore has the same length as the
// input and is defined from index 0.
// =============================================================================

/// Compute the EMA series for `values` with the given `span`.
///
/// Returns a vector aligned one-to-one with the input: `out[0] == values[0]`
/// (seeding rule) and every subsequent element follows the recurrence.
///
/// # Edge cases
/// - `span == 0` => empty vec (division by zero guard)
/// - empty input => empty vec
/// - A non-finite intermediate value truncates the series; downstream
///   consumers should not trust a broken tail.
pub fn calculate_ema(values: &[f64], span: usize) -> Vec<f64> {
    if span == 0 || values.is_empty() {
        return Vec::new();
    }

    let multiplier = 2.0 / (span + 1) as f64;

    let seed = values[0];
    if !seed.is_finite() {
        return Vec::new();
    }

    let mut result = Vec::with_capacity(values.len());
    result.push(seed);

    let mut prev_ema = seed;
    for &value in &values[1..] {
        let ema = value * multiplier + prev_ema * (1.0 - multiplier);
        if !ema.is_finite() {
            break;
        }
        result.push(ema);
        prev_ema = ema;
    }

    result
}
