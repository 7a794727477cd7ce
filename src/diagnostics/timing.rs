use serde::Serialize;
use std::time::Instant;

/// Phase of a fit.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Stage {
    /// Column ranges and deviations shared by every attempt.
    ColumnSummaries,
    /// One run of the E/M loop, numbered by the restarts preceding it.
    Attempt(usize),
}

#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StageTiming {
    pub stage: Stage,
    pub elapsed_ms: f64,
}

/// Wall-clock cost of a fit, split by phase.
#[derive(Clone, Debug, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TimingBreakdown {
    pub total_ms: f64,
    pub stages: Vec<StageTiming>,
}

impl TimingBreakdown {
    /// Record the time elapsed since `start` for `stage`.
    pub fn record(&mut self, stage: Stage, start: Instant) {
        self.stages.push(StageTiming {
            stage,
            elapsed_ms: elapsed_ms(start),
        });
    }

    pub fn num_attempts(&self) -> usize {
        self.attempts().count()
    }

    /// Time spent in attempts that ended in a restart. Only the last attempt
    /// can have succeeded.
    pub fn failed_attempts_ms(&self) -> f64 {
        let attempts: Vec<f64> = self.attempts().map(|t| t.elapsed_ms).collect();
        match attempts.split_last() {
            Some((_, failed)) => failed.iter().sum(),
            None => 0.0,
        }
    }

    fn attempts(&self) -> impl Iterator<Item = &StageTiming> {
        self.stages
            .iter()
            .filter(|t| matches!(t.stage, Stage::Attempt(_)))
    }
}

pub fn elapsed_ms(start: Instant) -> f64 {
    start.elapsed().as_secs_f64() * 1000.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn failed_attempts_exclude_the_last_one() {
        let mut timing = TimingBreakdown::default();
        assert_eq!(timing.failed_attempts_ms(), 0.0);
        timing.record(Stage::ColumnSummaries, Instant::now());
        for (restart, ms) in [2.0, 3.0, 10.0].into_iter().enumerate() {
            timing.stages.push(StageTiming {
                stage: Stage::Attempt(restart),
                elapsed_ms: ms,
            });
        }
        assert_eq!(timing.num_attempts(), 3);
        assert_eq!(timing.failed_attempts_ms(), 5.0);
    }
}
