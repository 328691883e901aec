//! Property tests for the metrics engine.

mod common;

use chrono::Duration;
use common::*;
use proptest::prelude::*;
use stockdash::domain::metrics::{
    ChangeDirection, DerivedMetrics, change, change_direction, change_percent, latest_close,
    latest_snapshot, position_value,
};

fn series_from(closes: &[f64]) -> PriceSeries {
    let start = date(2020, 1, 1);
    let bars = closes
        .iter()
        .enumerate()
        .map(|(i, &close)| PriceBar {
            date: start + Duration::days(i as i64),
            open: close,
            high: close,
            low: close,
            close,
            volume: 10_000.0,
        })
        .collect();
    PriceSeries::new(bars).unwrap()
}

fn closes(min_len: usize) -> impl Strategy<Value = Vec<f64>> {
    prop::collection::vec(0.01f64..1_000_000.0, min_len..40)
}

proptest! {
    #[test]
    fn latest_close_is_last_bar_close(values in closes(1)) {
        let series = series_from(&values);
        prop_assert_eq!(latest_close(&series), values.last().copied());
    }

    #[test]
    fn short_series_have_no_change(values in closes(0).prop_map(|mut v| { v.truncate(1); v })) {
        let series = series_from(&values);
        prop_assert_eq!(change(&series), None);
        prop_assert_eq!(change_percent(&series), None);
        prop_assert_eq!(change_direction(&series), ChangeDirection::Unavailable);
    }

    #[test]
    fn change_percent_is_change_over_prior_close(values in closes(2)) {
        let series = series_from(&values);
        let prior = values[values.len() - 2];
        let delta = change(&series).unwrap();
        let pct = change_percent(&series).unwrap();
        let expected = delta / prior * 100.0;
        prop_assert!((pct - expected).abs() <= 1e-9 * expected.abs().max(1.0));
    }

    #[test]
    fn zero_prior_close_has_no_percent(mut values in closes(2)) {
        let n = values.len();
        values[n - 2] = 0.0;
        let series = series_from(&values);
        prop_assert_eq!(change_percent(&series), None);
        prop_assert_eq!(change(&series), Some(values[n - 1]));
    }

    #[test]
    fn direction_follows_sign_of_change(values in closes(0)) {
        let series = series_from(&values);
        let expected = match change(&series) {
            None => ChangeDirection::Unavailable,
            Some(c) if c >= 0.0 => ChangeDirection::Up,
            Some(_) => ChangeDirection::Down,
        };
        prop_assert_eq!(change_direction(&series), expected);
    }

    #[test]
    fn non_positive_quantity_has_no_value(values in closes(0), q in -1_000.0f64..=0.0) {
        let series = series_from(&values);
        prop_assert_eq!(position_value(&series, Some(q)), None);
        prop_assert_eq!(position_value(&series, None), None);
    }

    #[test]
    fn position_value_is_close_times_quantity(values in closes(1), q in 1.0f64..10_000.0) {
        let series = series_from(&values);
        let expected = latest_close(&series).unwrap() * q;
        prop_assert_eq!(position_value(&series, Some(q)), Some(expected));
    }

    #[test]
    fn snapshot_has_five_one_decimal_fields(values in closes(1)) {
        let snapshot = latest_snapshot(&series_from(&values)).unwrap();
        prop_assert_eq!(snapshot.fields.len(), 5);
        for (_, value) in &snapshot.fields {
            let (_, decimals) = value.split_once('.').unwrap();
            prop_assert_eq!(decimals.len(), 1);
        }
    }

    #[test]
    fn computing_twice_is_identical(values in closes(0), q in prop::option::of(-10.0f64..1_000.0)) {
        let series = series_from(&values);
        prop_assert_eq!(DerivedMetrics::compute(&series, q), DerivedMetrics::compute(&series, q));
    }
}

#[test]
fn empty_series_has_no_snapshot() {
    assert!(latest_snapshot(&PriceSeries::empty()).is_none());
}
