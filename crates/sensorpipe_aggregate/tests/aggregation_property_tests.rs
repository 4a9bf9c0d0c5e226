// Property-based tests for grouping and averaging

use proptest::prelude::*;
use sensorpipe_aggregate::{HourlyAggregator, SensorReading, aggregate};

// Readings with one decimal place, like the sensors export.
fn arb_measurement() -> impl Strategy<Value = Option<f64>> {
    prop_oneof![
        1 => Just(None),
        4 => (-500i32..500).prop_map(|t| Some(t as f64 / 10.0)),
    ]
}

fn sorted_mean(mut values: Vec<f64>) -> Option<f64> {
    values.sort_by(f64::total_cmp);
    (!values.is_empty()).then(|| values.iter().sum::<f64>() / values.len() as f64)
}

fn arb_reading() -> impl Strategy<Value = SensorReading> {
    (
        prop::sample::select(vec!["A", "B", "Lab 3"]),
        prop_oneof![1 => Just(None), 9 => (0u32..24).prop_map(Some)],
        arb_measurement(),
        arb_measurement(),
        arb_measurement(),
    )
        .prop_map(|(location, hour, temperature_c, humidity_pct, co2_ppm)| SensorReading {
            location: location.to_string(),
            hour,
            temperature_c,
            humidity_pct,
            co2_ppm,
        })
}

proptest! {
    #[test]
    fn aggregation_is_invariant_under_row_permutation(
        (rows, shuffled) in prop::collection::vec(arb_reading(), 0..60)
            .prop_flat_map(|rows| (Just(rows.clone()), Just(rows).prop_shuffle()))
    ) {
        prop_assert_eq!(aggregate(&rows), aggregate(&shuffled));
    }

    #[test]
    fn partitioned_folding_matches_single_pass(
        rows in prop::collection::vec(arb_reading(), 0..60),
        split in 0usize..60,
    ) {
        let split = split.min(rows.len());
        let mut left: HourlyAggregator = rows[..split].iter().collect();
        left.merge(rows[split..].iter().collect());
        prop_assert_eq!(left.finish(), aggregate(&rows));
    }

    #[test]
    fn averages_are_means_of_non_missing_values(
        rows in prop::collection::vec(arb_reading(), 0..60)
    ) {
        for group in aggregate(&rows) {
            let members: Vec<_> = rows
                .iter()
                .filter(|r| r.location == group.location && r.hour == Some(group.hour))
                .collect();
            prop_assert!(!members.is_empty());

            let temps: Vec<f64> = members.iter().filter_map(|r| r.temperature_c).collect();
            prop_assert_eq!(group.avg_temperature_c, sorted_mean(temps));

            let co2: Vec<f64> = members.iter().filter_map(|r| r.co2_ppm).collect();
            prop_assert_eq!(group.avg_co2_ppm, sorted_mean(co2));
        }
    }
}
