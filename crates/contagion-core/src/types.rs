//! Core type definitions for the simulation.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Health state of a single cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum CellState {
    #[default]
    Healthy,
    Infected,
    Immune,
}

impl CellState {
    pub fn all() -> [CellState; 3] {
        [CellState::Healthy, CellState::Infected, CellState::Immune]
    }

    /// Legend label used by renderers
    pub fn label(&self) -> &'static str {
        match self {
            CellState::Healthy => "Blood (healthy)",
            CellState::Infected => "Bacteria (infected)",
            CellState::Immune => "Immune",
        }
    }

    /// Display color as an RGB triple
    pub fn color(&self) -> (u8, u8, u8) {
        match self {
            CellState::Healthy => (255, 0, 0),
            CellState::Infected => (128, 0, 128),
            CellState::Immune => (211, 211, 211),
        }
    }
}

impl fmt::Display for CellState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// (row, col) address on the grid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Position {
    pub row: i32,
    pub col: i32,
}

impl Position {
    pub fn new(row: i32, col: i32) -> Self {
        Self { row, col }
    }

    pub fn add(&self, drow: i32, dcol: i32) -> Self {
        Self {
            row: self.row + drow,
            col: self.col + dcol,
        }
    }

    /// Apply toroidal wrapping for a square grid of side `size`
    pub fn wrap(&self, size: i32) -> Self {
        Self {
            row: self.row.rem_euclid(size),
            col: self.col.rem_euclid(size),
        }
    }

    /// Up, down, left, right
    pub fn von_neumann(&self) -> [Position; 4] {
        [
            self.add(-1, 0),
            self.add(1, 0),
            self.add(0, -1),
            self.add(0, 1),
        ]
    }
}

/// Number of cells in each state for one grid snapshot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct StateCounts {
    pub healthy: usize,
    pub infected: usize,
    pub immune: usize,
}

impl StateCounts {
    pub fn new(healthy: usize, infected: usize, immune: usize) -> Self {
        Self {
            healthy,
            infected,
            immune,
        }
    }

    pub fn record(&mut self, state: CellState) {
        match state {
            CellState::Healthy => self.healthy += 1,
            CellState::Infected => self.infected += 1,
            CellState::Immune => self.immune += 1,
        }
    }

    pub fn get(&self, state: CellState) -> usize {
        match state {
            CellState::Healthy => self.healthy,
            CellState::Infected => self.infected,
            CellState::Immune => self.immune,
        }
    }

    pub fn total(&self) -> usize {
        self.healthy + self.infected + self.immune
    }
}

impl FromIterator<CellState> for StateCounts {
    fn from_iter<I: IntoIterator<Item = CellState>>(iter: I) -> Self {
        let mut counts = StateCounts::default();
        for state in iter {
            counts.record(state);
        }
        counts
    }
}
