//! Grid engine and observation loop.
//!
//! This crate implements the toroidal infection grid, its update rule, and the
//! loop that turns a configuration into a sequence of observed frames.

pub mod grid;
pub mod observer;
pub mod simulation;

pub use grid::Grid;
pub use observer::{
    CountSeries, FrameSink, NullSink, RecordingSink, RunRecorder, RunReport, RunSummary,
};
pub use simulation::{Frame, Simulation};
