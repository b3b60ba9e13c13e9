//! Scales that map data values onto pixel ranges.
//!
//! Linear scales follow the usual "nice" rounding: the domain is widened
//! outward to multiples of a 1/2/5 × 10^k step chosen for roughly `count`
//! ticks. Time scales work on UTC milliseconds so daily data and brush
//! selections that fall between midnights share one representation.

use chrono::{DateTime, Datelike, Duration, NaiveDate, NaiveTime, Utc, Weekday};

const E10: f64 = 7.0710678118654755; // sqrt(50)
const E5: f64 = 3.1622776601683795; // sqrt(10)
const E2: f64 = 1.4142135623730951; // sqrt(2)

/// Default tick count used by `nice()`.
pub const DEFAULT_TICKS: usize = 10;

/// `(min, max)` over the finite values, or `None` when there are none.
pub fn extent<I>(values: I) -> Option<(f64, f64)>
where
    I: IntoIterator<Item = f64>,
{
    values
        .into_iter()
        .filter(|v| v.is_finite())
        .fold(None, |acc, v| match acc {
            None => Some((v, v)),
            Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
        })
}

fn step_factor(error: f64) -> f64 {
    if error >= E10 {
        10.0
    } else if error >= E5 {
        5.0
    } else if error >= E2 {
        2.0
    } else {
        1.0
    }
}

/// Signed tick increment: positive is the step itself, negative is
/// `-1 / step` for sub-unit steps.
fn tick_increment(start: f64, stop: f64, count: usize) -> f64 {
    let step = (stop - start) / count.max(1) as f64;
    let power = step.log10().floor();
    let error = step / 10f64.powf(power);
    let factor = step_factor(error);
    if power >= 0.0 {
        factor * 10f64.powf(power)
    } else {
        -(10f64.powf(-power)) / factor
    }
}

/// Absolute tick step between `start` and `stop`.
pub fn tick_step(start: f64, stop: f64, count: usize) -> f64 {
    let step0 = (stop - start).abs() / count.max(1) as f64;
    let step1 = 10f64.powf(step0.log10().floor());
    let step = step1 * step_factor(step0 / step1);
    if stop < start {
        -step
    } else {
        step
    }
}

/// Evenly spaced round values in `[start, stop]`.
pub fn ticks(start: f64, stop: f64, count: usize) -> Vec<f64> {
    if count == 0 || !start.is_finite() || !stop.is_finite() {
        return Vec::new();
    }
    if start == stop {
        return vec![start];
    }
    let reverse = stop < start;
    let (lo, hi) = if reverse { (stop, start) } else { (start, stop) };

    let step = (hi - lo) / count as f64;
    let power = step.log10().floor();
    let factor = step_factor(step / 10f64.powf(power));

    let mut out = Vec::new();
    if power < 0.0 {
        let inc = 10f64.powf(-power) / factor;
        let mut i1 = (lo * inc).round();
        let mut i2 = (hi * inc).round();
        if i1 / inc < lo {
            i1 += 1.0;
        }
        if i2 / inc > hi {
            i2 -= 1.0;
        }
        let mut i = i1;
        while i <= i2 {
            out.push(i / inc);
            i += 1.0;
        }
    } else {
        let inc = 10f64.powf(power) * factor;
        let mut i1 = (lo / inc).round();
        let mut i2 = (hi / inc).round();
        if i1 * inc < lo {
            i1 += 1.0;
        }
        if i2 * inc > hi {
            i2 -= 1.0;
        }
        let mut i = i1;
        while i <= i2 {
            out.push(i * inc);
            i += 1.0;
        }
    }
    if reverse {
        out.reverse();
    }
    out
}

/// Widen `(start, stop)` outward to round tick multiples.
pub fn nice_domain(start: f64, stop: f64, count: usize) -> (f64, f64) {
    if !start.is_finite() || !stop.is_finite() || start == stop {
        return (start, stop);
    }
    let reverse = stop < start;
    let (mut lo, mut hi) = if reverse { (stop, start) } else { (start, stop) };

    let mut prestep: Option<f64> = None;
    for _ in 0..10 {
        let step = tick_increment(lo, hi, count);
        if prestep == Some(step) || !step.is_finite() {
            break;
        }
        if step > 0.0 {
            lo = (lo / step).floor() * step;
            hi = (hi / step).ceil() * step;
        } else if step < 0.0 {
            lo = (lo * step).ceil() / step;
            hi = (hi * step).floor() / step;
        } else {
            break;
        }
        prestep = Some(step);
    }

    if reverse {
        (hi, lo)
    } else {
        (lo, hi)
    }
}

/// Continuous linear mapping `domain -> range`.
///
/// A collapsed domain maps every input to the middle of the range.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearScale {
    domain: (f64, f64),
    range: (f64, f64),
}

impl LinearScale {
    pub fn new(domain: (f64, f64), range: (f64, f64)) -> Self {
        Self { domain, range }
    }

    pub fn domain(&self) -> (f64, f64) {
        self.domain
    }

    pub fn range(&self) -> (f64, f64) {
        self.range
    }

    pub fn with_domain(mut self, domain: (f64, f64)) -> Self {
        self.domain = domain;
        self
    }

    pub fn with_range(mut self, range: (f64, f64)) -> Self {
        self.range = range;
        self
    }

    /// Round the domain outward for about [`DEFAULT_TICKS`] ticks.
    pub fn nice(self) -> Self {
        self.nice_with(DEFAULT_TICKS)
    }

    pub fn nice_with(mut self, count: usize) -> Self {
        self.domain = nice_domain(self.domain.0, self.domain.1, count);
        self
    }

    pub fn map(&self, value: f64) -> f64 {
        let (d0, d1) = self.domain;
        let (r0, r1) = self.range;
        let span = d1 - d0;
        let t = if span == 0.0 { 0.5 } else { (value - d0) / span };
        r0 + t * (r1 - r0)
    }

    pub fn invert(&self, px: f64) -> f64 {
        let (d0, d1) = self.domain;
        let (r0, r1) = self.range;
        let span = r1 - r0;
        let t = if span == 0.0 { 0.5 } else { (px - r0) / span };
        d0 + t * (d1 - d0)
    }

    pub fn ticks(&self, count: usize) -> Vec<f64> {
        ticks(self.domain.0, self.domain.1, count)
    }
}

/// Square-root scale, used for bubble radii so area tracks the value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SqrtScale {
    inner: LinearScale,
}

fn signed_sqrt(v: f64) -> f64 {
    v.signum() * v.abs().sqrt()
}

impl SqrtScale {
    pub fn new(domain: (f64, f64), range: (f64, f64)) -> Self {
        Self {
            inner: LinearScale::new((signed_sqrt(domain.0), signed_sqrt(domain.1)), range),
        }
    }

    pub fn map(&self, value: f64) -> f64 {
        self.inner.map(signed_sqrt(value))
    }
}

/// Discrete mapping from string keys onto a cycling list of outputs.
#[derive(Debug, Clone, PartialEq)]
pub struct OrdinalScale<T> {
    domain: Vec<String>,
    range: Vec<T>,
}

impl<T: Clone> OrdinalScale<T> {
    pub fn new(domain: Vec<String>, range: Vec<T>) -> Self {
        Self { domain, range }
    }

    pub fn domain(&self) -> &[String] {
        &self.domain
    }

    /// Output for `key`. Unknown keys take the slot the next new key would
    /// have been assigned.
    pub fn get(&self, key: &str) -> Option<T> {
        if self.range.is_empty() {
            return None;
        }
        let index = self
            .domain
            .iter()
            .position(|k| k == key)
            .unwrap_or(self.domain.len());
        Some(self.range[index % self.range.len()].clone())
    }
}

const DAY_MS: i64 = 86_400_000;
const WEEK_MS: i64 = 7 * DAY_MS;
const MONTH_MS: i64 = 30 * DAY_MS;
const YEAR_MS: i64 = 365 * DAY_MS;

/// Midnight UTC of `date`, in milliseconds since the epoch.
pub fn date_ms(date: NaiveDate) -> i64 {
    date.and_time(NaiveTime::MIN).and_utc().timestamp_millis()
}

/// Milliseconds since the epoch as a UTC timestamp.
pub fn ms_datetime(ms: i64) -> DateTime<Utc> {
    DateTime::from_timestamp_millis(ms).unwrap_or_default()
}

/// Calendar interval used for time ticks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickInterval {
    Days(u32),
    Weeks,
    Months(u32),
    Years(i32),
}

const TIME_INTERVALS: [(TickInterval, i64); 6] = [
    (TickInterval::Days(1), DAY_MS),
    (TickInterval::Days(2), 2 * DAY_MS),
    (TickInterval::Weeks, WEEK_MS),
    (TickInterval::Months(1), MONTH_MS),
    (TickInterval::Months(3), 3 * MONTH_MS),
    (TickInterval::Years(1), YEAR_MS),
];

impl TickInterval {
    /// Interval giving about `count` ticks across `[start, stop]` (ms).
    pub fn for_span(start: i64, stop: i64, count: usize) -> Self {
        let target = (stop - start).abs() as f64 / count.max(1) as f64;
        let i = TIME_INTERVALS.partition_point(|(_, d)| (*d as f64) <= target);
        if i == TIME_INTERVALS.len() {
            let years = tick_step(
                start as f64 / YEAR_MS as f64,
                stop as f64 / YEAR_MS as f64,
                count,
            )
            .abs()
            .round()
            .max(1.0);
            return TickInterval::Years(years as i32);
        }
        if i == 0 {
            return TickInterval::Days(1);
        }
        let (below, below_ms) = TIME_INTERVALS[i - 1];
        let (above, above_ms) = TIME_INTERVALS[i];
        if target / (below_ms as f64) < (above_ms as f64) / target {
            below
        } else {
            above
        }
    }

    fn contains(self, date: NaiveDate) -> bool {
        match self {
            TickInterval::Days(k) => date.day0() % k.max(1) == 0,
            TickInterval::Weeks => date.weekday() == Weekday::Sun,
            TickInterval::Months(k) => date.day() == 1 && date.month0() % k.max(1) == 0,
            TickInterval::Years(k) => {
                date.day() == 1 && date.month() == 1 && date.year().rem_euclid(k.max(1)) == 0
            }
        }
    }

    /// Boundary dates of this interval within `[start, stop]` (ms).
    pub fn range(self, start: i64, stop: i64) -> Vec<NaiveDate> {
        let (lo, hi) = if stop < start { (stop, start) } else { (start, stop) };
        let first = ms_datetime(lo).date_naive();
        let first = if date_ms(first) < lo {
            first + Duration::days(1)
        } else {
            first
        };
        let last = ms_datetime(hi).date_naive();

        first
            .iter_days()
            .take_while(|d| *d <= last)
            .filter(|d| self.contains(*d))
            .collect()
    }
}

/// Tick label at the coarsest calendar boundary the date sits on.
pub fn time_tick_label(date: NaiveDate) -> String {
    if date.day() != 1 {
        if date.weekday() != Weekday::Sun {
            date.format("%a %d").to_string()
        } else {
            date.format("%b %d").to_string()
        }
    } else if date.month() != 1 {
        date.format("%B").to_string()
    } else {
        date.format("%Y").to_string()
    }
}

/// Linear mapping from UTC milliseconds to pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimeScale {
    domain: (i64, i64),
    range: (f64, f64),
}

impl TimeScale {
    pub fn new(domain: (i64, i64), range: (f64, f64)) -> Self {
        Self { domain, range }
    }

    pub fn from_dates(start: NaiveDate, stop: NaiveDate, range: (f64, f64)) -> Self {
        Self::new((date_ms(start), date_ms(stop)), range)
    }

    pub fn domain(&self) -> (i64, i64) {
        self.domain
    }

    pub fn range(&self) -> (f64, f64) {
        self.range
    }

    pub fn with_domain(mut self, domain: (i64, i64)) -> Self {
        self.domain = domain;
        self
    }

    fn linear(&self) -> LinearScale {
        LinearScale::new((self.domain.0 as f64, self.domain.1 as f64), self.range)
    }

    pub fn map(&self, ms: i64) -> f64 {
        self.linear().map(ms as f64)
    }

    pub fn map_date(&self, date: NaiveDate) -> f64 {
        self.map(date_ms(date))
    }

    /// Pixel to timestamp, rounded to the nearest millisecond.
    pub fn invert(&self, px: f64) -> i64 {
        self.linear().invert(px).round() as i64
    }

    pub fn ticks(&self, count: usize) -> Vec<NaiveDate> {
        let (start, stop) = self.domain;
        TickInterval::for_span(start, stop, count).range(start, stop)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-12
    }

    #[test]
    fn nice_rounds_outward() {
        assert_eq!(nice_domain(0.013, 0.047, 10), (0.01, 0.05));
        assert_eq!(nice_domain(1.1, 10.7, 10), (1.0, 11.0));
        assert_eq!(nice_domain(-0.0012, 0.0021, 10), (-0.0015, 0.0025));
        let (lo, hi) = nice_domain(123.4, 987.6, 10);
        assert_eq!((lo, hi), (100.0, 1000.0));
    }

    #[test]
    fn nice_keeps_collapsed_domain() {
        assert_eq!(nice_domain(5.0, 5.0, 10), (5.0, 5.0));
        assert_eq!(nice_domain(0.0, 0.0, 10), (0.0, 0.0));
        assert_eq!(nice_domain(-0.02, -0.02, 10), (-0.02, -0.02));
    }

    #[test]
    fn collapsed_domain_maps_to_range_middle() {
        let s = LinearScale::new((0.018, 0.018), (0.0, 600.0)).nice();
        assert_eq!(s.domain(), (0.018, 0.018));
        assert!(approx(s.map(0.018), 300.0));
    }

    #[test]
    fn ticks_are_round() {
        assert_eq!(ticks(0.0, 1.0, 5), vec![0.0, 0.2, 0.4, 0.6, 0.8, 1.0]);
        assert_eq!(ticks(0.0, 10.0, 6), vec![0.0, 2.0, 4.0, 6.0, 8.0, 10.0]);
        assert_eq!(ticks(3.0, 3.0, 5), vec![3.0]);
        assert!(ticks(0.0, 1.0, 0).is_empty());
    }

    #[test]
    fn linear_map_and_invert() {
        let s = LinearScale::new((0.0, 10.0), (100.0, 0.0));
        assert!(approx(s.map(0.0), 100.0));
        assert!(approx(s.map(2.5), 75.0));
        assert!(approx(s.invert(75.0), 2.5));
        let flat = LinearScale::new((3.0, 3.0), (0.0, 50.0));
        assert!(approx(flat.map(3.0), 25.0));
    }

    #[test]
    fn sqrt_scale_endpoints() {
        let s = SqrtScale::new((0.0, 100.0), (5.0, 16.0));
        assert!(approx(s.map(0.0), 5.0));
        assert!(approx(s.map(100.0), 16.0));
        assert!(approx(s.map(25.0), 5.0 + 11.0 * 0.5));
    }

    #[test]
    fn ordinal_cycles_and_handles_unknown() {
        let s = OrdinalScale::new(vec!["a".into(), "b".into(), "c".into()], vec![1, 2]);
        assert_eq!(s.get("a"), Some(1));
        assert_eq!(s.get("b"), Some(2));
        assert_eq!(s.get("c"), Some(1));
        assert_eq!(s.get("zzz"), Some(2));
    }

    #[test]
    fn extent_skips_non_finite() {
        assert_eq!(extent([3.0, f64::NAN, -1.0, 7.0]), Some((-1.0, 7.0)));
        assert_eq!(extent(std::iter::empty()), None);
    }

    #[test]
    fn time_invert_roundtrips_to_the_millisecond() {
        let d0 = NaiveDate::from_ymd_opt(2019, 1, 2).unwrap();
        let d1 = NaiveDate::from_ymd_opt(2024, 12, 31).unwrap();
        let s = TimeScale::from_dates(d0, d1, (0.0, 850.0));
        let mid = NaiveDate::from_ymd_opt(2021, 1, 1).unwrap();
        assert_eq!(s.invert(s.map_date(mid)), date_ms(mid));
        assert_eq!(s.invert(0.0), date_ms(d0));
        assert_eq!(s.invert(850.0), date_ms(d1));
    }

    #[test]
    fn time_ticks_pick_calendar_boundaries() {
        let d0 = NaiveDate::from_ymd_opt(2019, 1, 2).unwrap();
        let d1 = NaiveDate::from_ymd_opt(2024, 12, 31).unwrap();
        let s = TimeScale::from_dates(d0, d1, (0.0, 850.0));
        let t = s.ticks(6);
        assert_eq!(t.first(), Some(&NaiveDate::from_ymd_opt(2020, 1, 1).unwrap()));
        assert!(t.iter().all(|d| d.month() == 1 && d.day() == 1));

        let q0 = NaiveDate::from_ymd_opt(2021, 1, 1).unwrap();
        let q1 = NaiveDate::from_ymd_opt(2021, 12, 31).unwrap();
        let t = TimeScale::from_dates(q0, q1, (0.0, 850.0)).ticks(6);
        assert!(t.iter().all(|d| d.day() == 1 && d.month0() % 3 == 0));
        assert_eq!(t.len(), 4);
    }

    #[test]
    fn tick_labels() {
        let d = |y, m, day| NaiveDate::from_ymd_opt(y, m, day).unwrap();
        assert_eq!(time_tick_label(d(2021, 1, 1)), "2021");
        assert_eq!(time_tick_label(d(2021, 4, 1)), "April");
        assert_eq!(time_tick_label(d(2021, 4, 4)), "Apr 04");
        assert_eq!(time_tick_label(d(2021, 4, 6)), "Tue 06");
    }
}
