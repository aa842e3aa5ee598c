use serde::Serialize;
use std::io;

use crate::metaheuristic::Cost;

#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq)]
pub struct Sample {
    pub iteration: usize,
    pub cost: Cost,
}

/// Cost samples taken every `sample_stride` iterations.
#[derive(Debug, Clone, PartialEq)]
pub struct Trajectory {
    sample_stride: usize,
    samples: Vec<Sample>,
}

impl Trajectory {
    pub fn new(sample_stride: usize) -> Self {
        Trajectory {
            sample_stride: sample_stride.max(1),
            samples: Vec::new(),
        }
    }

    /// Records the cost after the given 0-based iteration if it falls on the stride.
    pub fn record(&mut self, iteration: usize, cost: Cost) {
        if iteration % self.sample_stride == 0 {
            self.samples.push(Sample { iteration, cost });
        }
    }

    pub fn samples(&self) -> &[Sample] {
        &self.samples
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn last(&self) -> Option<&Sample> {
        self.samples.last()
    }

    pub fn into_points(self) -> Vec<(usize, Cost)> {
        self.samples
            .into_iter()
            .map(|sample| (sample.iteration, sample.cost))
            .collect()
    }

    /// Writes `iteration,cost` rows with a header.
    pub fn write_csv<W: io::Write>(&self, writer: W) -> Result<(), csv::Error> {
        let mut writer = csv::Writer::from_writer(writer);
        for sample in self.samples.iter() {
            writer.serialize(sample)?;
        }
        writer.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn record_respects_stride() {
        let mut trajectory = Trajectory::new(3);
        for i in 0..7 {
            trajectory.record(i, 100 - i as Cost);
        }

        assert_eq!(trajectory.clone().into_points(), vec![(0, 100), (3, 97), (6, 94)]);
        assert_eq!(trajectory.last(), Some(&Sample { iteration: 6, cost: 94 }));
    }

    #[test]
    fn write_csv_works() {
        let mut trajectory = Trajectory::new(1);
        trajectory.record(0, 12);
        trajectory.record(1, 9);

        let mut buffer = Vec::new();
        trajectory.write_csv(&mut buffer).unwrap();

        assert_eq!(String::from_utf8(buffer).unwrap(), "iteration,cost\n0,12\n1,9\n");
    }
}
