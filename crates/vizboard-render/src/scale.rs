//! Band, point, linear, ordinal and size scales with d3-compatible arithmetic.
//!
//! Scales are rebuilt on every render and never fail: empty or degenerate domains collapse to
//! the middle of their range.

use rustc_hash::FxHashMap;
use vizboard_core::{DomainKey, Scalar};

/// Default tick count for linear axes (d3 `scale.ticks()` / `scale.nice()`).
pub const DEFAULT_TICK_COUNT: usize = 10;

/// Distinct present values in first-seen order.
pub fn distinct<'a>(values: impl IntoIterator<Item = &'a Scalar>) -> Vec<Scalar> {
    let mut seen: FxHashMap<DomainKey, ()> = FxHashMap::default();
    let mut out = Vec::new();
    for v in values {
        if seen.insert(v.key(), ()).is_none() {
            out.push(v.clone());
        }
    }
    out
}

fn index_domain(domain: &[Scalar]) -> FxHashMap<DomainKey, usize> {
    domain
        .iter()
        .enumerate()
        .map(|(i, v)| (v.key(), i))
        .collect()
}

/// Ordinal-to-band scale (`d3.scaleBand().padding(0.2)`), range `[0, width]`.
#[derive(Debug, Clone)]
pub struct BandScale {
    domain: Vec<Scalar>,
    index: FxHashMap<DomainKey, usize>,
    start: f64,
    step: f64,
    bandwidth: f64,
}

impl BandScale {
    pub const PADDING: f64 = 0.2;

    pub fn new(domain: Vec<Scalar>, width: f64) -> Self {
        let n = domain.len() as f64;
        let padding_inner = Self::PADDING;
        let padding_outer = Self::PADDING;
        let align = 0.5;
        let step = width / (n - padding_inner + padding_outer * 2.0).max(1.0);
        let start = (width - step * (n - padding_inner)) * align;
        let bandwidth = step * (1.0 - padding_inner);
        Self {
            index: index_domain(&domain),
            domain,
            start,
            step,
            bandwidth,
        }
    }

    /// Left edge of the band for `value`, or `None` for values outside the domain.
    pub fn position(&self, value: &Scalar) -> Option<f64> {
        let i = *self.index.get(&value.key())?;
        Some(self.start + self.step * i as f64)
    }

    pub fn bandwidth(&self) -> f64 {
        self.bandwidth
    }

    pub fn step(&self) -> f64 {
        self.step
    }

    pub fn domain(&self) -> &[Scalar] {
        &self.domain
    }
}

/// Ordinal-to-point scale (`d3.scalePoint().padding(0.5)`), range `[0, width]`.
#[derive(Debug, Clone)]
pub struct PointScale {
    domain: Vec<Scalar>,
    index: FxHashMap<DomainKey, usize>,
    start: f64,
    step: f64,
}

impl PointScale {
    pub const PADDING: f64 = 0.5;

    pub fn new(domain: Vec<Scalar>, width: f64) -> Self {
        let n = domain.len() as f64;
        // A point scale is a band scale with zero bandwidth and the padding applied outside.
        let step = width / (n - 1.0 + Self::PADDING * 2.0).max(1.0);
        let start = (width - step * (n - 1.0)) * 0.5;
        Self {
            index: index_domain(&domain),
            domain,
            start,
            step,
        }
    }

    pub fn position(&self, value: &Scalar) -> Option<f64> {
        let i = *self.index.get(&value.key())?;
        Some(self.start + self.step * i as f64)
    }

    pub fn step(&self) -> f64 {
        self.step
    }

    pub fn domain(&self) -> &[Scalar] {
        &self.domain
    }
}

/// Continuous linear scale.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearScale {
    domain: (f64, f64),
    range: (f64, f64),
}

impl LinearScale {
    pub fn new(domain: (f64, f64), range: (f64, f64)) -> Self {
        Self { domain, range }
    }

    /// Domain `[min, max]` over `values`, or `[0, 0]` when there are none.
    pub fn extent(values: impl IntoIterator<Item = f64>) -> (f64, f64) {
        let mut lo = f64::INFINITY;
        let mut hi = f64::NEG_INFINITY;
        for v in values {
            if v.is_finite() {
                lo = lo.min(v);
                hi = hi.max(v);
            }
        }
        if lo > hi { (0.0, 0.0) } else { (lo, hi) }
    }

    pub fn domain(&self) -> (f64, f64) {
        self.domain
    }

    pub fn range(&self) -> (f64, f64) {
        self.range
    }

    /// Extends the domain to round tick boundaries (`scale.nice(count)`).
    ///
    /// The domain only changes once the tick increment converges, at most 10 iterations.
    pub fn nice(mut self, count: usize) -> Self {
        let (mut d0, mut d1) = self.domain;
        let reversed = d1 < d0;
        if reversed {
            std::mem::swap(&mut d0, &mut d1);
        }
        let (mut start, mut stop) = (d0, d1);
        let mut prestep: Option<f64> = None;
        for _ in 0..10 {
            let Some(step) = tick_increment(start, stop, count as f64) else {
                break;
            };
            if prestep == Some(step) {
                self.domain = if reversed {
                    (stop, start)
                } else {
                    (start, stop)
                };
                return self;
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

    /// Maps a domain value into the range; a zero-width domain maps to the range midpoint.
    pub fn map(&self, v: f64) -> f64 {
        let (d0, d1) = self.domain;
        let (r0, r1) = self.range;
        let span = d1 - d0;
        let t = if span == 0.0 || !span.is_finite() {
            0.5
        } else {
            (v - d0) / span
        };
        r0 + (r1 - r0) * t
    }

    pub fn ticks(&self, count: usize) -> Vec<f64> {
        d3_ticks(self.domain.0, self.domain.1, count)
    }

    /// Spacing between adjacent ticks, used to pick label precision.
    pub fn tick_step(&self, count: usize) -> f64 {
        tick_step(self.domain.0, self.domain.1, count as f64)
    }
}

fn tick_spec(start: f64, stop: f64, count: f64) -> Option<(i64, i64, f64)> {
    if !(count > 0.0) {
        return None;
    }

    let step = (stop - start) / count.max(0.0);
    if !step.is_finite() || step == 0.0 {
        return None;
    }
    let power = step.log10().floor();
    let error = step / 10f64.powf(power);
    let e10 = 50f64.sqrt();
    let e5 = 10f64.sqrt();
    let e2 = 2f64.sqrt();
    let factor = if error >= e10 {
        10.0
    } else if error >= e5 {
        5.0
    } else if error >= e2 {
        2.0
    } else {
        1.0
    };

    let (i1, i2, inc) = if power < 0.0 {
        let inc = 10f64.powf(-power) / factor;
        let mut i1 = (start * inc).round() as i64;
        let mut i2 = (stop * inc).round() as i64;
        if (i1 as f64) / inc < start {
            i1 += 1;
        }
        if (i2 as f64) / inc > stop {
            i2 -= 1;
        }
        (i1, i2, -inc)
    } else {
        let inc = 10f64.powf(power) * factor;
        let mut i1 = (start / inc).round() as i64;
        let mut i2 = (stop / inc).round() as i64;
        if (i1 as f64) * inc < start {
            i1 += 1;
        }
        if (i2 as f64) * inc > stop {
            i2 -= 1;
        }
        (i1, i2, inc)
    };

    if i2 < i1 && (0.5..2.0).contains(&count) {
        return tick_spec(start, stop, count * 2.0);
    }

    if !inc.is_finite() || inc == 0.0 {
        return None;
    }

    Some((i1, i2, inc))
}

/// Signed tick increment: positive steps are multiplied, negative ones are reciprocal divisors.
pub(crate) fn tick_increment(start: f64, stop: f64, count: f64) -> Option<f64> {
    tick_spec(start, stop, count).map(|(_, _, inc)| inc)
}

pub(crate) fn tick_step(start: f64, stop: f64, count: f64) -> f64 {
    let reverse = stop < start;
    let inc = if reverse {
        tick_increment(stop, start, count)
    } else {
        tick_increment(start, stop, count)
    };
    let Some(inc) = inc else {
        return 0.0;
    };
    let step = if inc < 0.0 { 1.0 / -inc } else { inc };
    if reverse { -step } else { step }
}

pub fn d3_ticks(start: f64, stop: f64, count: usize) -> Vec<f64> {
    if !start.is_finite() || !stop.is_finite() {
        return Vec::new();
    }
    let count = count as f64;
    if !(count > 0.0) {
        return Vec::new();
    }
    if start == stop {
        return vec![start];
    }

    let reverse = stop < start;
    let (a, b) = if reverse { (stop, start) } else { (start, stop) };
    let Some((i1, i2, inc)) = tick_spec(a, b, count) else {
        return Vec::new();
    };
    if i2 < i1 {
        return Vec::new();
    }

    let n = (i2 - i1 + 1).max(0) as usize;
    let value = |i: i64| {
        if inc < 0.0 {
            i as f64 / -inc
        } else {
            i as f64 * inc
        }
    };
    if reverse {
        (0..n).map(|i| value(i2 - i as i64)).collect()
    } else {
        (0..n).map(|i| value(i1 + i as i64)).collect()
    }
}

/// `d3.scaleOrdinal()` over a palette with implicit domain growth.
///
/// Keys are `Option<DomainKey>` so an absent value gets its own slot, like `undefined` would.
#[derive(Debug, Clone)]
pub struct OrdinalScale {
    palette: Vec<String>,
    domain: Vec<Scalar>,
    index: FxHashMap<Option<DomainKey>, usize>,
    next: usize,
}

impl OrdinalScale {
    pub fn new(palette: Vec<String>, domain: Vec<Scalar>) -> Self {
        let index: FxHashMap<Option<DomainKey>, usize> = domain
            .iter()
            .enumerate()
            .map(|(i, v)| (Some(v.key()), i))
            .collect();
        Self {
            palette,
            next: domain.len(),
            domain,
            index,
        }
    }

    /// Explicit domain (values known when the scale was built).
    pub fn domain(&self) -> &[Scalar] {
        &self.domain
    }

    pub fn color(&mut self, value: Option<&Scalar>) -> String {
        let key = value.map(Scalar::key);
        let idx = match self.index.get(&key) {
            Some(idx) => *idx,
            None => {
                let idx = self.next;
                self.next += 1;
                self.index.insert(key, idx);
                idx
            }
        };
        self.palette_color(idx)
    }

    pub fn palette_color(&self, idx: usize) -> String {
        if self.palette.is_empty() {
            return vizboard_core::DEFAULT_PALETTE[idx % vizboard_core::DEFAULT_PALETTE.len()]
                .to_string();
        }
        self.palette[idx % self.palette.len()].clone()
    }
}

/// Marker radius for scatter points.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SizeScale {
    Constant(f64),
    Linear(LinearScale),
}

impl SizeScale {
    pub const DEFAULT_RADIUS: f64 = 6.0;
    pub const RANGE: (f64, f64) = (4.0, 20.0);

    /// Un-niced linear scale over the observed size values, or a constant radius when no size
    /// dimension is bound.
    pub fn new(values: Option<&[f64]>) -> Self {
        match values {
            None => Self::Constant(Self::DEFAULT_RADIUS),
            Some(values) => Self::Linear(LinearScale::new(
                LinearScale::extent(values.iter().copied()),
                Self::RANGE,
            )),
        }
    }

    pub fn radius(&self, value: Option<f64>) -> f64 {
        match (self, value) {
            (Self::Constant(r), _) => *r,
            (Self::Linear(scale), Some(v)) => scale.map(v),
            (Self::Linear(_), None) => Self::DEFAULT_RADIUS,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn band_scale_matches_d3_padding() {
        let scale = BandScale::new(vec![Scalar::from("A"), Scalar::from("B")], 510.0);
        let step = 510.0 / 2.2;
        assert!((scale.step() - step).abs() < 1e-9);
        assert!((scale.bandwidth() - step * 0.8).abs() < 1e-9);
        let a = scale.position(&Scalar::from("A")).unwrap();
        let b = scale.position(&Scalar::from("B")).unwrap();
        assert!((a - step * 0.2).abs() < 1e-9);
        assert!((b - a - step).abs() < 1e-9);
        assert!(scale.position(&Scalar::from("C")).is_none());
    }

    #[test]
    fn point_scale_centers_single_value() {
        let scale = PointScale::new(vec![Scalar::Number(1.0)], 400.0);
        assert_eq!(scale.position(&Scalar::Number(1.0)), Some(200.0));

        let scale = PointScale::new(
            vec![Scalar::Number(1.0), Scalar::Number(2.0), Scalar::Number(3.0)],
            300.0,
        );
        assert_eq!(scale.position(&Scalar::Number(1.0)), Some(50.0));
        assert_eq!(scale.position(&Scalar::Number(3.0)), Some(250.0));
    }

    #[test]
    fn nice_rounds_outward() {
        let scale = LinearScale::new((0.0, 97.0), (300.0, 0.0)).nice(10);
        assert_eq!(scale.domain(), (0.0, 100.0));
        let scale = LinearScale::new((-3.2, 8.7), (0.0, 1.0)).nice(10);
        assert_eq!(scale.domain(), (-4.0, 9.0));
        let scale = LinearScale::new((0.13, 0.87), (0.0, 1.0)).nice(10);
        assert_eq!(scale.domain(), (0.1, 0.9));
    }

    #[test]
    fn degenerate_domain_maps_to_midpoint() {
        let scale = LinearScale::new((0.0, 0.0), (300.0, 0.0)).nice(10);
        assert_eq!(scale.domain(), (0.0, 0.0));
        assert_eq!(scale.map(42.0), 150.0);
        assert_eq!(scale.ticks(10), vec![0.0]);
    }

    #[test]
    fn ticks_follow_d3() {
        assert_eq!(
            d3_ticks(0.0, 30.0, 5),
            vec![0.0, 5.0, 10.0, 15.0, 20.0, 25.0, 30.0]
        );
        assert_eq!(d3_ticks(0.0, 30.0, 10).len(), 16);
        assert_eq!(d3_ticks(0.0, 1.0, 5), vec![0.0, 0.2, 0.4, 0.6, 0.8, 1.0]);
        assert_eq!(tick_step(0.0, 1.0, 10.0), 0.1);
    }

    #[test]
    fn ordinal_scale_grows_implicitly_and_cycles() {
        let palette = vec!["#a".to_string(), "#b".to_string()];
        let mut scale = OrdinalScale::new(palette, vec![Scalar::from("x")]);
        assert_eq!(scale.color(Some(&Scalar::from("x"))), "#a");
        assert_eq!(scale.color(Some(&Scalar::from("y"))), "#b");
        assert_eq!(scale.color(None), "#a");
        assert_eq!(scale.color(Some(&Scalar::from("y"))), "#b");
        assert_eq!(scale.domain().len(), 1);
    }

    #[test]
    fn size_scale_spans_4_to_20() {
        let scale = SizeScale::new(Some(&[1.0, 3.0, 5.0][..]));
        assert_eq!(scale.radius(Some(1.0)), 4.0);
        assert_eq!(scale.radius(Some(5.0)), 20.0);
        assert_eq!(scale.radius(None), 6.0);
        assert_eq!(SizeScale::new(None).radius(Some(100.0)), 6.0);
    }

    #[test]
    fn distinct_keeps_first_seen_order() {
        let values = [
            Scalar::from("b"),
            Scalar::from("a"),
            Scalar::from("b"),
            Scalar::Number(1.0),
        ];
        let d = distinct(values.iter());
        assert_eq!(
            d,
            vec![Scalar::from("b"), Scalar::from("a"), Scalar::Number(1.0)]
        );
    }
}
