//! Aggregate statistics over a record set.
//!
//! This module provides pure functions that summarize water-quality
//! parameters, typically over the output of the filter engine. Inputs are
//! plain records - no storage dependencies.

use crate::record::DataRecord;

/// Summary of one numeric parameter across the records that report it.
#[derive(Debug, Clone, PartialEq)]
pub struct ParameterStats {
    /// Number of records reporting this parameter
    pub count: u64,
    pub min: f64,
    pub max: f64,
    /// Arithmetic mean of the reported values
    pub mean: f64,
}

/// Computed statistics for a set of readings.
#[derive(Debug, Clone, PartialEq)]
pub struct ReadingStats {
    /// Total number of records, including ones with no parameters
    pub record_count: u64,
    /// Records that carry location text
    pub located_count: u64,
    /// `None` when no record reports pH
    pub ph: Option<ParameterStats>,
    pub turbidity: Option<ParameterStats>,
    pub temperature: Option<ParameterStats>,
}

impl ReadingStats {
    /// Compute statistics from any sequence of records.
    ///
    /// NaN values are skipped, matching the filter engine's treatment of
    /// them as missing.
    pub fn compute<I>(records: I) -> Self
    where
        I: IntoIterator,
        I::Item: DataRecord,
    {
        let mut record_count: u64 = 0;
        let mut located_count: u64 = 0;
        let mut ph = Accumulator::default();
        let mut turbidity = Accumulator::default();
        let mut temperature = Accumulator::default();

        for record in records {
            record_count += 1;
            if record.location().is_some_and(|l| !l.trim().is_empty()) {
                located_count += 1;
            }
            ph.push(record.ph());
            turbidity.push(record.turbidity());
            temperature.push(record.temperature());
        }

        ReadingStats {
            record_count,
            located_count,
            ph: ph.finish(),
            turbidity: turbidity.finish(),
            temperature: temperature.finish(),
        }
    }
}

#[derive(Default)]
struct Accumulator {
    count: u64,
    sum: f64,
    min: f64,
    max: f64,
}

impl Accumulator {
    fn push(&mut self, value: Option<f64>) {
        let Some(v) = value.filter(|v| !v.is_nan()) else {
            return;
        };
        if self.count == 0 {
            self.min = v;
            self.max = v;
        } else {
            self.min = self.min.min(v);
            self.max = self.max.max(v);
        }
        self.sum += v;
        self.count += 1;
    }

    fn finish(self) -> Option<ParameterStats> {
        if self.count == 0 {
            return None;
        }
        Some(ParameterStats {
            count: self.count,
            min: self.min,
            max: self.max,
            mean: self.sum / self.count as f64,
        })
    }
}
