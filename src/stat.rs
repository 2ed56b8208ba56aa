/// Sort a sample in ascending numeric order
///
/// NaN values sort after every number.
pub fn sort_ascending(sample: &mut [f64]) {
    sample.sort_by(|a, b| a.total_cmp(b));
}

/// Linearly interpolated quantile of an already sorted sample (R-7)
///
/// An empty sample has no quantiles and yields NaN.
pub fn quantile_sorted(sorted_sample: &[f64], p: f64) -> f64 {
    let n = sorted_sample.len();
    if n == 0 || p.is_nan() {
        return f64::NAN;
    }
    if p <= 0.0 || n < 2 {
        return sorted_sample[0];
    }
    if p >= 1.0 {
        return sorted_sample[n - 1];
    }

    let i = (n - 1) as f64 * p;
    let i0 = i.floor() as usize;
    let value0 = sorted_sample[i0];
    let value1 = sorted_sample[i0 + 1];
    value0 + (value1 - value0) * (i - i0 as f64)
}

pub fn float_median(sorted_sample: &[f64]) -> f64 {
    quantile_sorted(sorted_sample, 0.5)
}

/// Largest value of a sample
///
/// Unlike `f64::max`, a single NaN makes the result NaN, so a bad value
/// shows up in the scale domain instead of being skipped. Empty samples
/// yield NaN.
pub fn float_max(sample: impl IntoIterator<Item = f64>) -> f64 {
    let mut max: Option<f64> = None;
    for v in sample {
        if v.is_nan() {
            return f64::NAN;
        }
        max = Some(match max {
            Some(m) if m >= v => m,
            _ => v,
        });
    }
    max.unwrap_or(f64::NAN)
}
