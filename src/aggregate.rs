use std::collections::HashMap;

use crate::stat::*;
use crate::*;

/// Order statistics of one group
#[derive(serde::Serialize, Clone, Copy, PartialEq, Debug)]
pub struct QuartileSummary {
    pub q1: f64,
    pub median: f64,
    pub q3: f64,
    pub iqr: f64,
}

impl QuartileSummary {
    /// Summarize an ascending sample
    pub fn from_sorted(sorted_sample: &[f64]) -> Self {
        let q1 = quantile_sorted(sorted_sample, 0.25);
        let median = float_median(sorted_sample);
        let q3 = quantile_sorted(sorted_sample, 0.75);
        QuartileSummary {
            q1,
            median,
            q3,
            iqr: q3 - q1,
        }
    }

    /// Whiskers at `factor` IQRs beyond the box, wherever the data is
    pub fn whiskers(&self, factor: f64) -> Whiskers {
        Whiskers {
            lower: self.q1 - factor * self.iqr,
            upper: self.q3 + factor * self.iqr,
        }
    }
}

#[derive(serde::Serialize, Clone, Copy, PartialEq, Debug)]
pub struct Whiskers {
    pub lower: f64,
    pub upper: f64,
}

/// All the values of one group, sorted
#[derive(Clone, Debug)]
pub struct Group {
    pub key: String,
    pub values: Vec<f64>,
    pub summary: QuartileSummary,
}

impl Group {
    fn new(key: String, mut values: Vec<f64>) -> Self {
        sort_ascending(&mut values);
        let summary = QuartileSummary::from_sorted(&values);
        Group {
            key,
            values,
            summary,
        }
    }

    /// Whiskers of the box
    ///
    /// Unclipped whiskers reach the theoretical bound. Clipped whiskers stop
    /// at the furthest observation inside it; with no such observation they
    /// collapse onto the box edge.
    pub fn whiskers(&self, factor: f64, clip_to_observed_range: bool) -> Whiskers {
        let bounds = self.summary.whiskers(factor);
        if !clip_to_observed_range {
            return bounds;
        }

        let upper = self
            .values
            .iter()
            .copied()
            .filter(|v| *v <= bounds.upper && *v >= self.summary.q3)
            .last()
            .unwrap_or(self.summary.q3);
        let lower = self
            .values
            .iter()
            .copied()
            .find(|v| *v >= bounds.lower && *v <= self.summary.q1)
            .unwrap_or(self.summary.q1);

        Whiskers { lower, upper }
    }

    /// Observations past the whiskers
    pub fn outliers(&self, whiskers: Whiskers) -> impl Iterator<Item = f64> + '_ {
        self.values
            .iter()
            .copied()
            .filter(move |v| *v < whiskers.lower || *v > whiskers.upper)
    }
}

/// Group records by their key and summarize `field` in each group
///
/// Groups come out in the order their key first shows up in `records`.
pub fn aggregate<'a>(records: impl IntoIterator<Item = &'a Record>, field: ChartField) -> Vec<Group> {
    let mut index: HashMap<&str, usize> = HashMap::new();
    let mut partitions: Vec<(&str, Vec<f64>)> = Vec::new();

    for record in records {
        let idx = *index.entry(record.group.as_str()).or_insert_with(|| {
            partitions.push((record.group.as_str(), Vec::new()));
            partitions.len() - 1
        });
        partitions[idx].1.push(record.field(field));
    }

    partitions
        .into_iter()
        .map(|(key, values)| Group::new(key.to_string(), values))
        .collect()
}
