use chrono::{DateTime, Datelike, Duration, Months, Timelike, Utc};
use serde::{Deserialize, Serialize};

use crate::core::primitives::{datetime_to_millis, millis_to_datetime, utc_date};
use crate::core::scale::{LinearScale, extent};
use crate::core::ticks::tick_step;
use crate::error::{ChartError, ChartResult};

const DURATION_SECOND: f64 = 1_000.0;
const DURATION_MINUTE: f64 = DURATION_SECOND * 60.0;
const DURATION_HOUR: f64 = DURATION_MINUTE * 60.0;
const DURATION_DAY: f64 = DURATION_HOUR * 24.0;
const DURATION_WEEK: f64 = DURATION_DAY * 7.0;
const DURATION_MONTH: f64 = DURATION_DAY * 30.0;
const DURATION_YEAR: f64 = DURATION_DAY * 365.0;

/// Calendar interval used to place time ticks, in UTC.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TimeInterval {
    Millisecond(u32),
    Second(u32),
    Minute(u32),
    Hour(u32),
    Day(u32),
    Week,
    Month(u32),
    Year(u32),
}

const TICK_INTERVALS: [(TimeInterval, f64); 18] = [
    (TimeInterval::Second(1), DURATION_SECOND),
    (TimeInterval::Second(5), 5.0 * DURATION_SECOND),
    (TimeInterval::Second(15), 15.0 * DURATION_SECOND),
    (TimeInterval::Second(30), 30.0 * DURATION_SECOND),
    (TimeInterval::Minute(1), DURATION_MINUTE),
    (TimeInterval::Minute(5), 5.0 * DURATION_MINUTE),
    (TimeInterval::Minute(15), 15.0 * DURATION_MINUTE),
    (TimeInterval::Minute(30), 30.0 * DURATION_MINUTE),
    (TimeInterval::Hour(1), DURATION_HOUR),
    (TimeInterval::Hour(3), 3.0 * DURATION_HOUR),
    (TimeInterval::Hour(6), 6.0 * DURATION_HOUR),
    (TimeInterval::Hour(12), 12.0 * DURATION_HOUR),
    (TimeInterval::Day(1), DURATION_DAY),
    (TimeInterval::Day(2), 2.0 * DURATION_DAY),
    (TimeInterval::Week, DURATION_WEEK),
    (TimeInterval::Month(1), DURATION_MONTH),
    (TimeInterval::Month(3), 3.0 * DURATION_MONTH),
    (TimeInterval::Year(1), DURATION_YEAR),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TimeUnit {
    Millisecond,
    Second,
    Minute,
    Hour,
    Day,
    Week,
    Month,
    Year,
}

impl TimeUnit {
    fn floor(self, time: DateTime<Utc>) -> DateTime<Utc> {
        let millis = time.timestamp_millis();
        let floor_to = |unit: i64| {
            DateTime::from_timestamp_millis(millis.div_euclid(unit) * unit).unwrap_or(time)
        };
        match self {
            Self::Millisecond => time,
            Self::Second => floor_to(1_000),
            Self::Minute => floor_to(60_000),
            Self::Hour => floor_to(3_600_000),
            Self::Day => floor_to(86_400_000),
            Self::Week => {
                let day = Self::Day.floor(time);
                day - Duration::days(i64::from(day.weekday().num_days_from_sunday()))
            }
            Self::Month => utc_date(time.year(), time.month(), 1).unwrap_or(time),
            Self::Year => utc_date(time.year(), 1, 1).unwrap_or(time),
        }
    }

    fn offset(self, time: DateTime<Utc>) -> Option<DateTime<Utc>> {
        match self {
            Self::Millisecond => time.checked_add_signed(Duration::milliseconds(1)),
            Self::Second => time.checked_add_signed(Duration::seconds(1)),
            Self::Minute => time.checked_add_signed(Duration::minutes(1)),
            Self::Hour => time.checked_add_signed(Duration::hours(1)),
            Self::Day => time.checked_add_signed(Duration::days(1)),
            Self::Week => time.checked_add_signed(Duration::weeks(1)),
            Self::Month => time.checked_add_months(Months::new(1)),
            Self::Year => time.checked_add_months(Months::new(12)),
        }
    }

    fn ceil(self, time: DateTime<Utc>) -> Option<DateTime<Utc>> {
        let floored = self.floor(time - Duration::milliseconds(1));
        self.offset(floored)
    }
}

impl TimeInterval {
    fn unit(self) -> TimeUnit {
        match self {
            Self::Millisecond(_) => TimeUnit::Millisecond,
            Self::Second(_) => TimeUnit::Second,
            Self::Minute(_) => TimeUnit::Minute,
            Self::Hour(_) => TimeUnit::Hour,
            Self::Day(_) => TimeUnit::Day,
            Self::Week => TimeUnit::Week,
            Self::Month(_) => TimeUnit::Month,
            Self::Year(_) => TimeUnit::Year,
        }
    }

    /// Whether `time` (already on a unit boundary) is one of this interval's ticks.
    fn accepts(self, time: DateTime<Utc>) -> bool {
        let every = |field: i64, step: u32| step <= 1 || field.rem_euclid(i64::from(step)) == 0;
        match self {
            Self::Millisecond(step) => every(time.timestamp_millis(), step),
            Self::Second(step) => every(i64::from(time.second()), step),
            Self::Minute(step) => every(i64::from(time.minute()), step),
            Self::Hour(step) => every(i64::from(time.hour()), step),
            Self::Day(step) => every(i64::from(time.day()) - 1, step),
            Self::Week => true,
            Self::Month(step) => every(i64::from(time.month0()), step),
            Self::Year(step) => every(i64::from(time.year()), step),
        }
    }

    /// Picks the interval yielding roughly `count` ticks over `[start, stop]` (millis).
    #[must_use]
    pub fn for_span(start: f64, stop: f64, count: usize) -> Self {
        let target = (stop - start).abs() / count.max(1) as f64;
        let index = TICK_INTERVALS.partition_point(|(_, duration)| *duration <= target);

        if index == TICK_INTERVALS.len() {
            let step = tick_step(start / DURATION_YEAR, stop / DURATION_YEAR, count)
                .abs()
                .max(1.0);
            return Self::Year(step as u32);
        }
        if index == 0 {
            let step = tick_step(start, stop, count).abs().max(1.0);
            return Self::Millisecond(step as u32);
        }

        let (previous, previous_duration) = TICK_INTERVALS[index - 1];
        let (next, next_duration) = TICK_INTERVALS[index];
        if target / previous_duration < next_duration / target {
            previous
        } else {
            next
        }
    }

    /// All ticks of this interval within `[start, stop]`, ascending.
    #[must_use]
    pub fn range(self, start: DateTime<Utc>, stop: DateTime<Utc>) -> Vec<DateTime<Utc>> {
        let unit = self.unit();
        let mut ticks = Vec::new();
        let Some(mut cursor) = unit.ceil(start) else {
            return ticks;
        };
        while cursor <= stop {
            if self.accepts(cursor) {
                ticks.push(cursor);
            }
            match unit.offset(cursor) {
                Some(next) => cursor = next,
                None => break,
            }
        }
        ticks
    }
}

/// Continuous UTC time scale mapping instants to a pixel range.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TimeScale {
    linear: LinearScale,
}

impl TimeScale {
    pub fn new(domain: (DateTime<Utc>, DateTime<Utc>), range: (f64, f64)) -> ChartResult<Self> {
        let linear = LinearScale::new(
            (datetime_to_millis(domain.0), datetime_to_millis(domain.1)),
            range,
        )?;
        Ok(Self { linear })
    }

    /// Fits the domain to exactly `[earliest, latest]` of `times`.
    pub fn fit<I>(times: I, range: (f64, f64)) -> ChartResult<Self>
    where
        I: IntoIterator<Item = DateTime<Utc>>,
    {
        let (min, max) = extent(times.into_iter().map(datetime_to_millis))?;
        Ok(Self {
            linear: LinearScale::new((min, max), range)?,
        })
    }

    pub fn domain(self) -> ChartResult<(DateTime<Utc>, DateTime<Utc>)> {
        let (start, end) = self.linear.domain();
        Ok((millis_to_datetime(start)?, millis_to_datetime(end)?))
    }

    #[must_use]
    pub fn range(self) -> (f64, f64) {
        self.linear.range()
    }

    #[must_use]
    pub fn map(self, time: DateTime<Utc>) -> f64 {
        self.linear.map(datetime_to_millis(time))
    }

    pub fn invert(self, pixel: f64) -> ChartResult<DateTime<Utc>> {
        if !pixel.is_finite() {
            return Err(ChartError::InvalidData("pixel must be finite".to_owned()));
        }
        millis_to_datetime(self.linear.invert(pixel))
    }

    /// Calendar-aligned ticks, ordered like the domain.
    #[must_use]
    pub fn ticks(self, count: usize) -> Vec<DateTime<Utc>> {
        let (start, stop) = self.linear.domain();
        let reverse = stop < start;
        let (lo, hi) = if reverse { (stop, start) } else { (start, stop) };
        let (Ok(lo_time), Ok(hi_time)) = (millis_to_datetime(lo), millis_to_datetime(hi)) else {
            return Vec::new();
        };

        let mut ticks = TimeInterval::for_span(lo, hi, count).range(lo_time, hi_time);
        if reverse {
            ticks.reverse();
        }
        ticks
    }
}

/// Multi-scale label: the coarsest calendar field that still distinguishes `time`.
#[must_use]
pub fn multi_scale_format(time: DateTime<Utc>) -> String {
    if TimeUnit::Second.floor(time) < time {
        format!(".{:03}", time.timestamp_subsec_millis())
    } else if TimeUnit::Minute.floor(time) < time {
        time.format(":%S").to_string()
    } else if TimeUnit::Hour.floor(time) < time {
        time.format("%I:%M").to_string()
    } else if TimeUnit::Day.floor(time) < time {
        time.format("%I %p").to_string()
    } else if TimeUnit::Month.floor(time) < time {
        if TimeUnit::Week.floor(time) < time {
            time.format("%a %d").to_string()
        } else {
            time.format("%b %d").to_string()
        }
    } else if TimeUnit::Year.floor(time) < time {
        time.format("%B").to_string()
    } else {
        time.format("%Y").to_string()
    }
}
