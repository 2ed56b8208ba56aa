//! Mappings from data space to pixel space
//!
//! Tick placement and domain rounding follow d3-scale, so charts line up
//! with the ones d3 draws for the same data.

use std::collections::HashMap;

use crate::*;

const E10: f64 = 7.0710678118654755; // sqrt(50)
const E5: f64 = 3.1622776601683795; // sqrt(10)
const E2: f64 = 1.4142135623730951; // sqrt(2)

pub const DEFAULT_TICK_COUNT: usize = 10;

/// Continuous scale: `[lo, hi]` onto `[r0, r1]`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearScale {
    domain: (f64, f64),
    range: (f64, f64),
}

impl LinearScale {
    pub fn new(domain: (f64, f64), range: (f64, f64)) -> Self {
        if domain.0 == domain.1 {
            tracing::warn!(
                "degenerate scale domain [{}, {}], positions will not be finite",
                domain.0,
                domain.1
            );
        }
        LinearScale { domain, range }
    }

    pub fn domain(&self) -> (f64, f64) {
        self.domain
    }

    pub fn range(&self) -> (f64, f64) {
        self.range
    }

    pub fn map(&self, v: f64) -> f64 {
        let (lo, hi) = self.domain;
        let (r0, r1) = self.range;
        r0 + (v - lo) / (hi - lo) * (r1 - r0)
    }

    /// Extend the domain so it starts and ends on round tick steps
    ///
    /// The domain only changes once the step settles; otherwise the scale
    /// comes back as it was.
    pub fn nice(self, count: usize) -> Self {
        let (mut start, mut stop) = self.domain;
        let reversed = stop < start;
        if reversed {
            std::mem::swap(&mut start, &mut stop);
        }

        let mut prestep = None;
        for _ in 0..10 {
            let step = tick_increment(start, stop, count as f64);
            if prestep == Some(step) {
                let domain = if reversed { (stop, start) } else { (start, stop) };
                return LinearScale::new(domain, self.range);
            }
            if step > 0.0 {
                start = (start / step).floor() * step;
                stop = (stop / step).ceil() * step;
            } else if step < 0.0 {
                start = (start * step).ceil() / step;
                stop = (stop * step).floor() / step;
            } else {
                break;
            }
            prestep = Some(step);
        }

        self
    }

    /// Roughly `count` round values spanning the domain
    pub fn ticks(&self, count: usize) -> Vec<f64> {
        ticks(self.domain.0, self.domain.1, count as f64)
    }
}

/// Rounds halves up, as `Math.round` does
fn js_round(x: f64) -> f64 {
    (x + 0.5).floor()
}

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
        let inv = 10f64.powf(-power) / factor;
        i1 = js_round(start * inv);
        i2 = js_round(stop * inv);
        if i1 / inv < start {
            i1 += 1.0;
        }
        if i2 / inv > stop {
            i2 -= 1.0;
        }
        inc = -inv;
    } else {
        inc = 10f64.powf(power) * factor;
        i1 = js_round(start / inc);
        i2 = js_round(stop / inc);
        if i1 * inc < start {
            i1 += 1.0;
        }
        if i2 * inc > stop {
            i2 -= 1.0;
        }
    }

    if i2 < i1 && 0.5 <= count && count < 2.0 {
        return tick_spec(start, stop, count * 2.0);
    }
    (i1, i2, inc)
}

/// Step between ticks; negative values are the inverse of a fractional step
fn tick_increment(start: f64, stop: f64, count: f64) -> f64 {
    tick_spec(start, stop, count).2
}

/// Round tick values in `[start, stop]`
pub fn ticks(start: f64, stop: f64, count: f64) -> Vec<f64> {
    if !(count > 0.0) || start.is_nan() || stop.is_nan() {
        return Vec::new();
    }
    if start == stop {
        return vec![start];
    }

    let reverse = stop < start;
    let (lo, hi) = if reverse { (stop, start) } else { (start, stop) };
    let (i1, i2, inc) = tick_spec(lo, hi, count);
    if !(i2 >= i1) || !inc.is_finite() {
        return Vec::new();
    }

    let n = (i2 - i1 + 1.0) as usize;
    let mut out = (0..n)
        .map(|i| {
            let i = i1 + i as f64;
            if inc < 0.0 {
                i / -inc
            } else {
                i * inc
            }
        })
        .collect::<Vec<_>>();
    if reverse {
        out.reverse();
    }
    out
}

/// Discrete scale: one padded band per key
#[derive(Debug, Clone, PartialEq)]
pub struct BandScale {
    keys: Vec<String>,
    range: (f64, f64),
    padding_inner: f64,
    step: f64,
    start: f64,
}

impl BandScale {
    /// Bands with the same inner and outer padding
    pub fn new(keys: Vec<String>, range: (f64, f64), padding: f64) -> ChartResult<Self> {
        Self::with_padding(keys, range, padding, padding)
    }

    pub fn with_padding(
        keys: Vec<String>,
        range: (f64, f64),
        padding_inner: f64,
        padding_outer: f64,
    ) -> ChartResult<Self> {
        if !(0.0..1.0).contains(&padding_inner) {
            return Err(ChartError::InvalidPadding(padding_inner));
        }
        if !(padding_outer >= 0.0) {
            return Err(ChartError::InvalidPadding(padding_outer));
        }

        let n = keys.len() as f64;
        let (r0, r1) = range;
        let step = if keys.is_empty() {
            r1 - r0
        } else {
            (r1 - r0) / (n - padding_inner + 2.0 * padding_outer)
        };
        let start = r0 + (r1 - r0 - step * (n - padding_inner)) * 0.5;

        Ok(BandScale {
            keys,
            range,
            padding_inner,
            step,
            start,
        })
    }

    pub fn keys(&self) -> &[String] {
        &self.keys
    }

    pub fn range(&self) -> (f64, f64) {
        self.range
    }

    /// Distance between the starts of two consecutive bands
    pub fn step(&self) -> f64 {
        self.step
    }

    /// Usable width of each band
    pub fn bandwidth(&self) -> f64 {
        self.step * (1.0 - self.padding_inner)
    }

    /// Start of the band for `key`
    pub fn map(&self, key: &str) -> Option<f64> {
        self.keys
            .iter()
            .position(|k| k == key)
            .map(|i| self.start + i as f64 * self.step)
    }
}

/// Assigns palette colours to keys in first-seen order
#[derive(Debug, Clone)]
pub struct OrdinalScale {
    palette: Vec<String>,
    domain: Vec<String>,
    index: HashMap<String, usize>,
}

impl OrdinalScale {
    pub fn new(palette: Vec<String>) -> Self {
        let palette = if palette.is_empty() {
            CATEGORY10.iter().map(|c| c.to_string()).collect()
        } else {
            palette
        };
        OrdinalScale {
            palette,
            domain: Vec::new(),
            index: HashMap::new(),
        }
    }

    /// Colour for `key`, giving it the next palette slot if it is new
    pub fn color(&mut self, key: &str) -> &str {
        let idx = match self.index.get(key) {
            Some(idx) => *idx,
            None => {
                let idx = self.domain.len();
                self.domain.push(key.to_string());
                self.index.insert(key.to_string(), idx);
                idx
            }
        };
        &self.palette[idx % self.palette.len()]
    }

    /// Colour already given to `key`
    pub fn get(&self, key: &str) -> Option<&str> {
        self.index
            .get(key)
            .map(|idx| self.palette[idx % self.palette.len()].as_str())
    }

    /// Keys seen so far, in order
    pub fn domain(&self) -> &[String] {
        &self.domain
    }
}
