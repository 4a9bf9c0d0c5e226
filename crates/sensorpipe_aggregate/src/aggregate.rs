use crate::normalize::SensorReading;

use std::collections::BTreeMap;

/// Mean over the non-missing values of one field.
///
/// Values are summed in sorted order when the mean is taken, so the result does not
/// depend on the order rows arrived in or how partitions were merged.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Mean {
    values: Vec<f64>,
}

impl Mean {
    pub fn push(&mut self, value: Option<f64>) {
        if let Some(v) = value {
            self.values.push(v);
        }
    }

    pub fn merge(&mut self, other: Mean) {
        self.values.extend(other.values);
    }

    pub fn count(&self) -> usize {
        self.values.len()
    }

    /// `None` if no value was ever pushed.
    pub fn value(&self) -> Option<f64> {
        if self.values.is_empty() {
            return None;
        }
        let mut sorted = self.values.clone();
        sorted.sort_by(f64::total_cmp);
        Some(sorted.iter().sum::<f64>() / sorted.len() as f64)
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
struct GroupState {
    temperature_c: Mean,
    co2_ppm: Mean,
}

/// One output row: the averages of a `(location, hour)` group.
#[derive(Debug, Clone, PartialEq)]
pub struct HourlyAggregate {
    pub location: String,
    pub hour: u32,
    pub avg_temperature_c: Option<f64>,
    pub avg_co2_ppm: Option<f64>,
}

/// Partial aggregation state. Partitions of the input can be folded separately and merged.
#[derive(Debug, Clone, Default)]
pub struct HourlyAggregator {
    groups: BTreeMap<(String, u32), GroupState>,
    unassigned: usize,
}

impl HourlyAggregator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Folds one reading into its group. Readings without an hour are counted and dropped.
    pub fn push(&mut self, reading: &SensorReading) {
        let Some(hour) = reading.hour else {
            self.unassigned += 1;
            return;
        };

        let state = self
            .groups
            .entry((reading.location.clone(), hour))
            .or_default();
        state.temperature_c.push(reading.temperature_c);
        state.co2_ppm.push(reading.co2_ppm);
    }

    pub fn merge(&mut self, other: HourlyAggregator) {
        self.unassigned += other.unassigned;
        for (key, theirs) in other.groups {
            let ours = self.groups.entry(key).or_default();
            ours.temperature_c.merge(theirs.temperature_c);
            ours.co2_ppm.merge(theirs.co2_ppm);
        }
    }

    /// Readings excluded because their timestamp could not be bucketed.
    pub fn unassigned(&self) -> usize {
        self.unassigned
    }

    /// Groups ordered by `(location, hour)`.
    pub fn finish(self) -> Vec<HourlyAggregate> {
        self.groups
            .into_iter()
            .map(|((location, hour), state)| HourlyAggregate {
                location,
                hour,
                avg_temperature_c: state.temperature_c.value(),
                avg_co2_ppm: state.co2_ppm.value(),
            })
            .collect()
    }
}

impl<'a> FromIterator<&'a SensorReading> for HourlyAggregator {
    fn from_iter<I: IntoIterator<Item = &'a SensorReading>>(iter: I) -> Self {
        let mut agg = Self::new();
        for reading in iter {
            agg.push(reading);
        }
        agg
    }
}

/// Groups readings by `(location, hour)` and averages temperature and CO2.
pub fn aggregate<'a>(readings: impl IntoIterator<Item = &'a SensorReading>) -> Vec<HourlyAggregate> {
    readings.into_iter().collect::<HourlyAggregator>().finish()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reading(location: &str, hour: Option<u32>, temp: Option<f64>, co2: Option<f64>) -> SensorReading {
        SensorReading {
            location: location.to_string(),
            hour,
            temperature_c: temp,
            humidity_pct: Some(40.0),
            co2_ppm: co2,
        }
    }

    #[test]
    fn mean_ignores_missing_values() {
        let mut mean = Mean::default();
        mean.push(Some(20.0));
        mean.push(None);
        mean.push(Some(22.0));
        assert_eq!(mean.value(), Some(21.0));
    }

    #[test]
    fn empty_mean_is_missing_not_zero() {
        let mut mean = Mean::default();
        mean.push(None);
        assert_eq!(mean.value(), None);
    }

    #[test]
    fn fields_are_averaged_independently() {
        let rows = [
            reading("A", Some(9), None, Some(500.0)),
            reading("A", Some(9), None, Some(300.0)),
        ];
        let out = aggregate(&rows);
        assert_eq!(
            out,
            vec![HourlyAggregate {
                location: "A".into(),
                hour: 9,
                avg_temperature_c: None,
                avg_co2_ppm: Some(400.0),
            }]
        );
    }

    #[test]
    fn groups_are_ordered_by_location_then_hour() {
        let rows = [
            reading("B", Some(1), Some(1.0), Some(1.0)),
            reading("A", Some(17), Some(1.0), Some(1.0)),
            reading("A", Some(9), Some(1.0), Some(1.0)),
        ];
        let keys: Vec<_> = aggregate(&rows)
            .into_iter()
            .map(|g| (g.location, g.hour))
            .collect();
        assert_eq!(
            keys,
            vec![("A".to_string(), 9), ("A".to_string(), 17), ("B".to_string(), 1)]
        );
    }

    #[test]
    fn unassigned_readings_are_counted_and_excluded() {
        let mut agg = HourlyAggregator::new();
        agg.push(&reading("A", None, Some(99.0), Some(99.0)));
        agg.push(&reading("A", Some(3), Some(1.0), Some(2.0)));
        assert_eq!(agg.unassigned(), 1);

        let out = agg.finish();
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].avg_temperature_c, Some(1.0));
    }

    #[test]
    fn mean_does_not_depend_on_arrival_order() {
        let forward = [0.1, 0.2, 0.3].map(|t| reading("A", Some(9), Some(t), None));
        let backward = [0.3, 0.2, 0.1].map(|t| reading("A", Some(9), Some(t), None));
        assert_eq!(aggregate(&forward), aggregate(&backward));
    }

    #[test]
    fn merge_order_does_not_change_the_mean() {
        let mut a = Mean::default();
        a.push(Some(0.1));
        let mut b = Mean::default();
        b.push(Some(0.2));
        b.push(Some(0.3));

        let mut ab = a.clone();
        ab.merge(b.clone());
        let mut ba = b;
        ba.merge(a);

        assert_eq!(ab.count(), 3);
        assert_eq!(ab.value(), ba.value());
    }

    #[test]
    fn merged_partitions_equal_single_pass() {
        let rows = [
            reading("A", Some(9), Some(20.0), Some(410.0)),
            reading("A", Some(9), Some(22.0), None),
            reading("B", Some(9), None, Some(430.0)),
            reading("A", None, Some(5.0), Some(5.0)),
        ];

        let mut left: HourlyAggregator = rows[..2].iter().collect();
        let right: HourlyAggregator = rows[2..].iter().collect();
        left.merge(right);

        assert_eq!(left.unassigned(), 1);
        assert_eq!(left.finish(), aggregate(&rows));
    }
}
