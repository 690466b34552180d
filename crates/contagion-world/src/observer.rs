//! Frame sinks and the per-iteration count accumulator.

use crate::simulation::Frame;
use contagion_core::{Result, SimulationConfig, StateCounts};
use serde::{Deserialize, Serialize};
use tracing::{debug, event, info, Level};

/// A surface that receives each frame of a run
pub trait FrameSink {
    fn render(&mut self, frame: &Frame) -> Result<()>;
}

impl<F> FrameSink for F
where
    F: FnMut(&Frame) -> Result<()>,
{
    fn render(&mut self, frame: &Frame) -> Result<()> {
        self(frame)
    }
}

/// Discards every frame
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSink;

impl FrameSink for NullSink {
    fn render(&mut self, _frame: &Frame) -> Result<()> {
        Ok(())
    }
}

/// Keeps every frame it receives
#[derive(Debug, Default)]
pub struct RecordingSink {
    pub frames: Vec<Frame>,
}

impl FrameSink for RecordingSink {
    fn render(&mut self, frame: &Frame) -> Result<()> {
        self.frames.push(frame.clone());
        Ok(())
    }
}

/// Per-iteration state counts, in iteration order
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CountSeries {
    counts: Vec<StateCounts>,
}

impl CountSeries {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            counts: Vec::with_capacity(capacity),
        }
    }

    pub fn push(&mut self, counts: StateCounts) {
        self.counts.push(counts);
    }

    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &StateCounts> + '_ {
        self.counts.iter()
    }

    pub fn healthy(&self) -> Vec<usize> {
        self.counts.iter().map(|c| c.healthy).collect()
    }

    pub fn infected(&self) -> Vec<usize> {
        self.counts.iter().map(|c| c.infected).collect()
    }

    pub fn immune(&self) -> Vec<usize> {
        self.counts.iter().map(|c| c.immune).collect()
    }

    pub fn final_counts(&self) -> Option<StateCounts> {
        self.counts.last().copied()
    }

    /// Iteration with the most infected cells; earliest wins ties
    pub fn peak_infected(&self) -> Option<(usize, usize)> {
        self.counts
            .iter()
            .enumerate()
            .map(|(i, c)| (i, c.infected))
            .fold(None, |best, (i, infected)| match best {
                Some((_, peak)) if peak >= infected => best,
                _ => Some((i, infected)),
            })
    }
}

impl Extend<StateCounts> for CountSeries {
    fn extend<I: IntoIterator<Item = StateCounts>>(&mut self, iter: I) {
        self.counts.extend(iter);
    }
}

/// Forwards frames to a sink and accumulates their counts.
///
/// Shared by every loop that drives a [`crate::Simulation`], paced or not.
pub struct RunRecorder {
    config: SimulationConfig,
    series: CountSeries,
}

impl RunRecorder {
    pub fn new(config: SimulationConfig) -> Self {
        let series = CountSeries::with_capacity(config.steps);
        Self { config, series }
    }

    /// Render one frame, then record its counts
    pub fn record(&mut self, frame: &Frame, sink: &mut dyn FrameSink) -> Result<()> {
        debug!(
            iteration = frame.iteration,
            healthy = frame.counts.healthy,
            infected = frame.counts.infected,
            immune = frame.counts.immune,
            "Observed frame"
        );
        sink.render(frame)?;
        self.series.push(frame.counts);
        Ok(())
    }

    /// Frames recorded so far
    pub fn recorded(&self) -> usize {
        self.series.len()
    }

    /// Build the report and log its summary
    pub fn finish(self) -> RunReport {
        let report = RunReport::new(self.config, self.series);
        report.summary.emit();
        report
    }
}

/// Aggregate statistics for a finished run
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RunSummary {
    pub total_iterations: usize,
    pub peak_infected: usize,
    pub peak_iteration: usize,
    pub final_healthy: usize,
    pub final_infected: usize,
    pub final_immune: usize,
    /// Fraction of cells infected at some point during the run
    pub attack_rate: f64,
}

impl RunSummary {
    pub fn from_series(cell_count: usize, series: &CountSeries) -> Self {
        let Some(last) = series.final_counts() else {
            return Self::default();
        };
        let (peak_iteration, peak_infected) = series.peak_infected().unwrap_or((0, 0));
        let attack_rate = if cell_count > 0 {
            (last.immune + last.infected) as f64 / cell_count as f64
        } else {
            0.0
        };

        Self {
            total_iterations: series.len(),
            peak_infected,
            peak_iteration,
            final_healthy: last.healthy,
            final_infected: last.infected,
            final_immune: last.immune,
            attack_rate,
        }
    }

    /// Log the summary as structured events
    pub fn emit(&self) {
        info!(
            event = "run_summary",
            total_iterations = self.total_iterations,
            peak_infected = self.peak_infected,
            peak_iteration = self.peak_iteration,
            final_healthy = self.final_healthy,
            final_infected = self.final_infected,
            final_immune = self.final_immune,
            attack_rate = format!("{:.2}%", self.attack_rate * 100.0),
            "Simulation complete"
        );

        event!(
            Level::INFO,
            gauge_name = "final_immune",
            gauge_value = self.final_immune,
            "Final immune population gauge"
        );
    }
}

/// Everything a run produced, ready for charting or serialization
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunReport {
    pub config: SimulationConfig,
    pub series: CountSeries,
    pub summary: RunSummary,
}

impl RunReport {
    pub fn new(config: SimulationConfig, series: CountSeries) -> Self {
        let summary = RunSummary::from_series(config.cell_count(), &series);
        Self {
            config,
            series,
            summary,
        }
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::simulation::Simulation;
    use contagion_core::Error;

    fn series(rows: &[(usize, usize, usize)]) -> CountSeries {
        let mut series = CountSeries::new();
        series.extend(rows.iter().map(|&(h, i, m)| StateCounts::new(h, i, m)));
        series
    }

    #[test]
    fn test_series_columns() {
        let s = series(&[(24, 1, 0), (20, 4, 1), (12, 8, 5)]);
        assert_eq!(s.healthy(), vec![24, 20, 12]);
        assert_eq!(s.infected(), vec![1, 4, 8]);
        assert_eq!(s.immune(), vec![0, 1, 5]);
        assert_eq!(s.final_counts(), Some(StateCounts::new(12, 8, 5)));
    }

    #[test]
    fn test_peak_infected_prefers_earliest() {
        let s = series(&[(8, 1, 0), (5, 3, 1), (2, 3, 4), (2, 0, 7)]);
        assert_eq!(s.peak_infected(), Some((1, 3)));
        assert_eq!(CountSeries::new().peak_infected(), None);
    }

    #[test]
    fn test_summary_from_series() {
        let s = series(&[(24, 1, 0), (20, 4, 1), (12, 8, 5)]);
        let summary = RunSummary::from_series(25, &s);
        assert_eq!(summary.total_iterations, 3);
        assert_eq!(summary.peak_infected, 8);
        assert_eq!(summary.peak_iteration, 2);
        assert_eq!(summary.final_healthy, 12);
        assert!((summary.attack_rate - 13.0 / 25.0).abs() < 1e-12);
    }

    #[test]
    fn test_recorder_matches_observe() {
        let config = SimulationConfig {
            size: 9,
            infection_probability: 0.5,
            steps: 6,
            seed: Some(17),
        };

        let mut recorder = RunRecorder::new(config.clone());
        for frame in Simulation::new(config.clone()).unwrap().take(4) {
            recorder.record(&frame, &mut NullSink).unwrap();
        }
        assert_eq!(recorder.recorded(), 4);
        let partial = recorder.finish();

        let full = Simulation::new(config).unwrap().observe(&mut NullSink).unwrap();
        assert_eq!(partial.series.len(), 4);
        assert_eq!(partial.summary.total_iterations, 4);
        let head: Vec<_> = full.series.iter().take(4).copied().collect();
        assert_eq!(partial.series.iter().copied().collect::<Vec<_>>(), head);
    }

    #[test]
    fn test_recorder_stops_on_sink_error() {
        let config = SimulationConfig {
            size: 3,
            infection_probability: 0.5,
            steps: 2,
            seed: Some(4),
        };
        let mut failing = |_: &Frame| Err::<(), _>(Error::Render("closed".to_string()));
        let mut recorder = RunRecorder::new(config.clone());
        let frame = Simulation::new(config).unwrap().next().unwrap();

        assert!(recorder.record(&frame, &mut failing).is_err());
        assert_eq!(recorder.recorded(), 0);
    }

    #[test]
    fn test_summary_of_empty_series() {
        let summary = RunSummary::from_series(25, &CountSeries::new());
        assert_eq!(summary, RunSummary::default());
    }

    #[test]
    fn test_recording_sink_receives_every_frame() {
        let config = SimulationConfig {
            size: 7,
            infection_probability: 0.5,
            steps: 5,
            seed: Some(3),
        };
        let mut sink = RecordingSink::default();
        Simulation::new(config).unwrap().observe(&mut sink).unwrap();

        let iterations: Vec<_> = sink.frames.iter().map(|f| f.iteration).collect();
        assert_eq!(iterations, vec![0, 1, 2, 3, 4]);
    }

    #[test]
    fn test_closure_sink_error_stops_run() {
        let config = SimulationConfig {
            size: 5,
            infection_probability: 1.0,
            steps: 10,
            seed: Some(1),
        };
        let mut seen = 0;
        let mut sink = |frame: &Frame| {
            seen += 1;
            if frame.iteration == 2 {
                Err(Error::Render("surface closed".to_string()))
            } else {
                Ok(())
            }
        };

        let result = Simulation::new(config).unwrap().observe(&mut sink);
        assert!(matches!(result, Err(Error::Render(_))));
        assert_eq!(seen, 3);
    }

    #[test]
    fn test_report_serialization() {
        let config = SimulationConfig {
            size: 5,
            infection_probability: 1.0,
            steps: 3,
            seed: Some(9),
        };
        let report = Simulation::new(config).unwrap().observe(&mut NullSink).unwrap();
        let json = report.to_json().unwrap();
        let restored: RunReport = serde_json::from_str(&json).unwrap();
        assert_eq!(restored.series, report.series);
        assert_eq!(restored.summary, report.summary);
    }
}
