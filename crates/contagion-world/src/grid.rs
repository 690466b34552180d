//! Toroidal cell grid and the infection update rule.

use contagion_core::{check_grid_size, CellState, Error, Position, Result, StateCounts};
use rand::Rng;
use serde::{Deserialize, Serialize};

/// A square toroidal grid of cell states, stored row-major
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "GridData")]
pub struct Grid {
    size: usize,
    cells: Vec<CellState>,
}

/// Unchecked wire form of a [`Grid`]
#[derive(Deserialize)]
struct GridData {
    size: usize,
    cells: Vec<CellState>,
}

impl TryFrom<GridData> for Grid {
    type Error = Error;

    fn try_from(data: GridData) -> Result<Self> {
        Grid::from_cells(data.size, data.cells)
    }
}

impl Grid {
    /// All-healthy grid of side `size`
    pub fn new(size: usize) -> Result<Self> {
        check_grid_size(size)?;
        Ok(Self {
            size,
            cells: vec![CellState::Healthy; size * size],
        })
    }

    /// Starting configuration: healthy everywhere except the center cell
    pub fn initial(size: usize) -> Result<Self> {
        let mut grid = Self::new(size)?;
        let center = (size / 2) as i32;
        grid.set(Position::new(center, center), CellState::Infected);
        Ok(grid)
    }

    pub fn from_cells(size: usize, cells: Vec<CellState>) -> Result<Self> {
        check_grid_size(size)?;
        if cells.len() != size * size {
            return Err(Error::InvalidConfig(format!(
                "expected {} cells for a {}x{} grid, got {}",
                size * size,
                size,
                size,
                cells.len()
            )));
        }
        Ok(Self { size, cells })
    }

    pub fn size(&self) -> usize {
        self.size
    }

    /// Get cell state at position (with toroidal wrapping)
    pub fn get(&self, pos: Position) -> CellState {
        self.cells[self.pos_to_index(pos)]
    }

    /// Set cell state at position (with toroidal wrapping)
    pub fn set(&mut self, pos: Position, state: CellState) {
        let index = self.pos_to_index(pos);
        self.cells[index] = state;
    }

    /// Number of infected cells among the four orthogonal neighbors
    pub fn infected_neighbors(&self, pos: Position) -> u8 {
        pos.von_neumann()
            .into_iter()
            .filter(|n| self.get(*n) == CellState::Infected)
            .count() as u8
    }

    /// Compute the next generation.
    ///
    /// Every transition reads from `self` only, so the result does not depend
    /// on the order cells are visited. One uniform draw in `[0, 1)` is taken
    /// per cell in row-major order, whether or not the cell can be infected.
    pub fn step<R: Rng + ?Sized>(&self, infection_probability: f64, rng: &mut R) -> Grid {
        let cells = self
            .cells
            .iter()
            .enumerate()
            .map(|(index, &state)| {
                let roll: f64 = rng.gen();
                match state {
                    CellState::Healthy
                        if self.infected_neighbors(self.index_to_pos(index)) > 0
                            && roll < infection_probability =>
                    {
                        CellState::Infected
                    }
                    CellState::Infected => CellState::Immune,
                    other => other,
                }
            })
            .collect();

        Grid {
            size: self.size,
            cells,
        }
    }

    /// Tally cells per state
    pub fn count_states(&self) -> StateCounts {
        self.cells.iter().copied().collect()
    }

    /// Row slices, top to bottom
    pub fn rows(&self) -> impl Iterator<Item = &[CellState]> + '_ {
        self.cells.chunks(self.size)
    }

    /// Iterator over all cells with positions
    pub fn iter(&self) -> impl Iterator<Item = (Position, CellState)> + '_ {
        self.cells
            .iter()
            .enumerate()
            .map(move |(i, state)| (self.index_to_pos(i), *state))
    }

    fn pos_to_index(&self, pos: Position) -> usize {
        let wrapped = pos.wrap(self.size as i32);
        wrapped.row as usize * self.size + wrapped.col as usize
    }

    fn index_to_pos(&self, index: usize) -> Position {
        Position::new((index / self.size) as i32, (index % self.size) as i32)
    }
}
