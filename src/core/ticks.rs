//! Nice tick generation for continuous domains.

const E10: f64 = 7.071_067_811_865_476; // sqrt(50)
const E5: f64 = 3.162_277_660_168_379_5; // sqrt(10)
const E2: f64 = std::f64::consts::SQRT_2;

/// Integer tick bounds and signed increment.
///
/// A negative increment encodes `1 / -inc` steps to keep sub-unit ticks exact.
fn tick_spec(start: f64, stop: f64, count: f64) -> (f64, f64, f64) {
    let step = (stop - start) / count.max(0.0);
    let power = step.log10().floor();
    let error = step / 10f64.powf(power);
    let factor = if error >= E10 {
        10.0
    } else if error >= E5 {
        5.0
    } else if error >= E2 {
        2.0
    } else {
        1.0
    };

    let (mut i1, mut i2, inc);
    if power < 0.0 {
        let positive = 10f64.powf(-power) / factor;
        i1 = (start * positive).round();
        i2 = (stop * positive).round();
        if i1 / positive < start {
            i1 += 1.0;
        }
        if i2 / positive > stop {
            i2 -= 1.0;
        }
        inc = -positive;
    } else {
        let positive = 10f64.powf(power) * factor;
        i1 = (start / positive).round();
        i2 = (stop / positive).round();
        if i1 * positive < start {
            i1 += 1.0;
        }
        if i2 * positive > stop {
            i2 -= 1.0;
        }
        inc = positive;
    }

    if i2 < i1 && (0.5..2.0).contains(&count) {
        return tick_spec(start, stop, count * 2.0);
    }
    (i1, i2, inc)
}

/// Returns roughly `count` evenly spaced, human-friendly values inside the domain.
///
/// Values are ordered in the same direction as `start -> stop`.
#[must_use]
pub fn nice_ticks(start: f64, stop: f64, count: usize) -> Vec<f64> {
    if count == 0 || !start.is_finite() || !stop.is_finite() {
        return Vec::new();
    }
    if start == stop {
        return vec![start];
    }

    let reverse = stop < start;
    let (lo, hi) = if reverse { (stop, start) } else { (start, stop) };
    let (i1, i2, inc) = tick_spec(lo, hi, count as f64);
    if !(i2 >= i1) {
        return Vec::new();
    }

    let n = (i2 - i1) as usize + 1;
    let value_at = |i: f64| if inc < 0.0 { i / -inc } else { i * inc };
    if reverse {
        (0..n).map(|i| value_at(i2 - i as f64)).collect()
    } else {
        (0..n).map(|i| value_at(i1 + i as f64)).collect()
    }
}

/// Signed distance between adjacent ticks for the same inputs as `nice_ticks`.
#[must_use]
pub fn tick_step(start: f64, stop: f64, count: usize) -> f64 {
    if count == 0 || !start.is_finite() || !stop.is_finite() || start == stop {
        return 0.0;
    }
    let reverse = stop < start;
    let (lo, hi) = if reverse { (stop, start) } else { (start, stop) };
    let (_, _, inc) = tick_spec(lo, hi, count as f64);
    let magnitude = if inc < 0.0 { 1.0 / -inc } else { inc };
    if reverse { -magnitude } else { magnitude }
}

/// Evenly stepped values in `[start, stop)`, excluding `stop`.
///
/// Mirrors the usual `range(start, stop, step)` helper; the element count is
/// `ceil((stop - start) / step)`.
#[must_use]
pub fn stepped_range(start: f64, stop: f64, step: f64) -> Vec<f64> {
    if !start.is_finite() || !stop.is_finite() || !step.is_finite() || step == 0.0 {
        return Vec::new();
    }
    let count = ((stop - start) / step).ceil();
    if !(count > 0.0) {
        return Vec::new();
    }
    (0..count as usize)
        .map(|i| start + i as f64 * step)
        .collect()
}
