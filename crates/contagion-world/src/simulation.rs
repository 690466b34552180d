//! Simulation engine driving the grid through a fixed number of iterations.

use crate::grid::Grid;
use crate::observer::{FrameSink, RunRecorder, RunReport};
use contagion_core::{Result, SimulationConfig, StateCounts};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use std::sync::Arc;
use tracing::{info, instrument, trace};

/// One observed iteration
#[derive(Debug, Clone)]
pub struct Frame {
    pub iteration: usize,
    pub grid: Arc<Grid>,
    /// Counts for `grid`, taken before it is advanced
    pub counts: StateCounts,
}

/// Iterates over the frames of a run.
///
/// The grid is only advanced when the next frame is requested, so a frame's
/// snapshot is never touched after it has been handed out.
pub struct Simulation {
    grid: Arc<Grid>,
    config: SimulationConfig,
    rng: ChaCha8Rng,
    iteration: usize,
}

impl Simulation {
    pub fn new(config: SimulationConfig) -> Result<Self> {
        config.validate()?;

        let rng = match config.seed {
            Some(seed) => ChaCha8Rng::seed_from_u64(seed),
            None => ChaCha8Rng::from_entropy(),
        };
        let grid = Arc::new(Grid::initial(config.size)?);

        Ok(Self {
            grid,
            config,
            rng,
            iteration: 0,
        })
    }

    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    /// Index of the next frame to be produced
    pub fn iteration(&self) -> usize {
        self.iteration
    }

    /// Run every remaining iteration, forwarding each frame to `sink`
    #[instrument(skip_all, fields(size = self.config.size, steps = self.config.steps))]
    pub fn observe(self, sink: &mut dyn FrameSink) -> Result<RunReport> {
        let config = self.config.clone();
        info!(
            "Starting simulation: {}x{} grid, p = {}, {} steps",
            config.size, config.size, config.infection_probability, config.steps
        );

        let mut recorder = RunRecorder::new(config);
        for frame in self {
            recorder.record(&frame, sink)?;
        }
        Ok(recorder.finish())
    }

    fn advance(&mut self) {
        let next = self
            .grid
            .step(self.config.infection_probability, &mut self.rng);
        trace!(iteration = self.iteration, "Advanced grid");
        self.grid = Arc::new(next);
    }
}

impl Iterator for Simulation {
    type Item = Frame;

    fn next(&mut self) -> Option<Frame> {
        if self.iteration >= self.config.steps {
            return None;
        }
        if self.iteration > 0 {
            self.advance();
        }

        let frame = Frame {
            iteration: self.iteration,
            grid: Arc::clone(&self.grid),
            counts: self.grid.count_states(),
        };
        self.iteration += 1;
        Some(frame)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.config.steps.saturating_sub(self.iteration);
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for Simulation {}
