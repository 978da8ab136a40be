//! Daily-to-monthly and daily-to-weekly OHLCV resampling
//!
//! Buckets are labeled with the period end (calendar month-end, Friday of the
//! week) so that resampling an already resampled series is a no-op.

use crate::models::Bar;
use chrono::{DateTime, Datelike, Duration, TimeZone, Utc};
use std::collections::HashMap;
use tracing::debug;

pub struct Resampler;

impl Resampler {
    /// Aggregate daily bars into calendar months labeled with the month-end day
    pub fn monthly(data: Vec<Bar>) -> Vec<Bar> {
        Self::aggregate_buckets(data, Self::bucket_month_end)
    }

    /// Aggregate daily bars into Friday-ending weeks
    ///
    /// Saturday and Sunday bars roll forward into the following week, the
    /// rest of the week rolls up to its Friday.
    pub fn weekly(data: Vec<Bar>) -> Vec<Bar> {
        Self::aggregate_buckets(data, Self::bucket_week_friday)
    }

    fn aggregate_buckets(data: Vec<Bar>, bucket: fn(DateTime<Utc>) -> DateTime<Utc>) -> Vec<Bar> {
        if data.is_empty() {
            return vec![];
        }

        debug!("Resampling {} daily bars", data.len());

        let mut buckets: HashMap<DateTime<Utc>, Vec<Bar>> = HashMap::new();
        for bar in data {
            buckets.entry(bucket(bar.time)).or_default().push(bar);
        }

        let mut result: Vec<Bar> = buckets
            .into_iter()
            .map(|(bucket_time, bars)| Self::aggregate_ohlcv(bars, bucket_time))
            .collect();

        result.sort_by_key(|b| b.time);

        debug!("Resampled into {} bars", result.len());
        result
    }

    /// Last calendar day of the bar's month, at 00:00:00
    fn bucket_month_end(time: DateTime<Utc>) -> DateTime<Utc> {
        let (next_year, next_month) = if time.month() == 12 {
            (time.year() + 1, 1)
        } else {
            (time.year(), time.month() + 1)
        };
        // First day of the following month minus one day; in-range by construction
        let first_of_next = Utc
            .with_ymd_and_hms(next_year, next_month, 1, 0, 0, 0)
            .unwrap();
        first_of_next - Duration::days(1)
    }

    /// Friday ending the bar's week, at 00:00:00
    fn bucket_week_friday(time: DateTime<Utc>) -> DateTime<Utc> {
        // Mon=0 .. Sun=6; Friday is 4. Saturday/Sunday wrap to the next Friday.
        let weekday = time.weekday().num_days_from_monday() as i64;
        let days_to_friday = (4 - weekday).rem_euclid(7);
        let friday = time.date_naive() + Duration::days(days_to_friday);
        Utc.from_utc_datetime(&friday.and_hms_opt(0, 0, 0).unwrap())
    }

    /// Standard OHLCV aggregation for one bucket:
    /// open = first, high = max, low = min, close = last, volume = sum
    fn aggregate_ohlcv(mut bars: Vec<Bar>, bucket_time: DateTime<Utc>) -> Bar {
        bars.sort_by_key(|b| b.time);

        let open = bars[0].open;
        let close = bars[bars.len() - 1].close;
        let high = bars.iter().map(|b| b.high).fold(f64::NEG_INFINITY, f64::max);
        let low = bars.iter().map(|b| b.low).fold(f64::INFINITY, f64::min);
        let volume = bars.iter().map(|b| b.volume).sum();

        Bar::new(bucket_time, open, high, low, close, volume)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn daily_bar(y: i32, m: u32, d: u32, close: f64, volume: u64) -> Bar {
        Bar::new(
            Utc.with_ymd_and_hms(y, m, d, 0, 0, 0).unwrap(),
            close - 1.0,
            close + 2.0,
            close - 2.0,
            close,
            volume,
        )
    }

    #[test]
    fn test_bucket_month_end() {
        let t = Utc.with_ymd_and_hms(2026, 2, 10, 0, 0, 0).unwrap();
        assert_eq!(
            Resampler::bucket_month_end(t),
            Utc.with_ymd_and_hms(2026, 2, 28, 0, 0, 0).unwrap()
        );

        let t = Utc.with_ymd_and_hms(2025, 12, 31, 0, 0, 0).unwrap();
        assert_eq!(
            Resampler::bucket_month_end(t),
            Utc.with_ymd_and_hms(2025, 12, 31, 0, 0, 0).unwrap()
        );
    }

    #[test]
    fn test_bucket_week_friday() {
        // Wednesday 2026-08-26 -> Friday 2026-08-28
        let t = Utc.with_ymd_and_hms(2026, 8, 26, 0, 0, 0).unwrap();
        assert_eq!(
            Resampler::bucket_week_friday(t),
            Utc.with_ymd_and_hms(2026, 8, 28, 0, 0, 0).unwrap()
        );
        // Friday maps to itself
        let t = Utc.with_ymd_and_hms(2026, 8, 28, 0, 0, 0).unwrap();
        assert_eq!(Resampler::bucket_week_friday(t), t);
        // Saturday rolls into the next week
        let t = Utc.with_ymd_and_hms(2026, 8, 29, 0, 0, 0).unwrap();
        assert_eq!(
            Resampler::bucket_week_friday(t),
            Utc.with_ymd_and_hms(2026, 9, 4, 0, 0, 0).unwrap()
        );
    }

    #[test]
    fn test_monthly_aggregation() {
        let bars = vec![
            daily_bar(2026, 1, 5, 100.0, 1000),
            daily_bar(2026, 1, 20, 110.0, 2000),
            daily_bar(2026, 2, 3, 105.0, 3000),
        ];

        let monthly = Resampler::monthly(bars);
        assert_eq!(monthly.len(), 2);

        let jan = &monthly[0];
        assert_eq!(jan.time, Utc.with_ymd_and_hms(2026, 1, 31, 0, 0, 0).unwrap());
        assert_eq!(jan.open, 99.0); // first bar's open
        assert_eq!(jan.close, 110.0); // last bar's close
        assert_eq!(jan.high, 112.0); // max high
        assert_eq!(jan.low, 98.0); // min low
        assert_eq!(jan.volume, 3000);
    }

    #[test]
    fn test_weekly_aggregation() {
        // Mon 2026-08-24 through Wed 2026-08-26 belong to Friday 2026-08-28
        let bars = vec![
            daily_bar(2026, 8, 24, 50.0, 100),
            daily_bar(2026, 8, 25, 52.0, 100),
            daily_bar(2026, 8, 26, 51.0, 100),
            // Following Monday: new week
            daily_bar(2026, 8, 31, 53.0, 100),
        ];

        let weekly = Resampler::weekly(bars);
        assert_eq!(weekly.len(), 2);
        assert_eq!(
            weekly[0].time,
            Utc.with_ymd_and_hms(2026, 8, 28, 0, 0, 0).unwrap()
        );
        assert_eq!(weekly[0].open, 49.0);
        assert_eq!(weekly[0].close, 51.0);
        assert_eq!(weekly[0].volume, 300);
        assert_eq!(
            weekly[1].time,
            Utc.with_ymd_and_hms(2026, 9, 4, 0, 0, 0).unwrap()
        );
    }

    #[test]
    fn test_resampling_is_idempotent() {
        let bars = vec![
            daily_bar(2026, 1, 5, 100.0, 1000),
            daily_bar(2026, 1, 20, 110.0, 2000),
            daily_bar(2026, 2, 3, 105.0, 3000),
            daily_bar(2026, 2, 27, 108.0, 1500),
        ];

        let monthly = Resampler::monthly(bars.clone());
        assert_eq!(Resampler::monthly(monthly.clone()), monthly);

        let weekly = Resampler::weekly(bars);
        assert_eq!(Resampler::weekly(weekly.clone()), weekly);
    }

    #[test]
    fn test_empty_input() {
        assert!(Resampler::monthly(vec![]).is_empty());
        assert!(Resampler::weekly(vec![]).is_empty());
    }
}
