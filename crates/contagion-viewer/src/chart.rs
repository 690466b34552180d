//! Text line chart of state counts over the run.

use crate::render::color;
use contagion_core::CellState;
use contagion_world::CountSeries;
use crossterm::style::Stylize;

const TITLE: &str = "Evolution of States in the Simulation";
const X_LABEL: &str = "Iteration";
const Y_LABEL: &str = "Number of Cells";

pub struct SummaryChart {
    /// Plot rows between 0 and the full cell count
    pub height: usize,
    pub color: bool,
}

impl Default for SummaryChart {
    fn default() -> Self {
        Self {
            height: 20,
            color: true,
        }
    }
}

fn marker(state: CellState) -> char {
    match state {
        CellState::Healthy => 'o',
        CellState::Infected => '*',
        CellState::Immune => '+',
    }
}

impl SummaryChart {
    pub fn render(&self, series: &CountSeries, cell_count: usize) -> String {
        let mut out = format!("{}\n", TITLE);

        if series.is_empty() {
            out.push_str("(no iterations recorded)\n");
            return out;
        }

        let height = self.height.max(2);
        let width = series.len();
        let mut plot = vec![vec![None; width]; height];

        for state in CellState::all() {
            for (x, counts) in series.iter().enumerate() {
                let row = height - 1 - self.level(counts.get(state), cell_count, height);
                plot[row][x] = Some(state);
            }
        }

        let label_width = cell_count.to_string().len();
        out.push_str(&format!("{}\n", Y_LABEL));
        for (r, row) in plot.iter().enumerate() {
            let label = if r == 0 {
                cell_count.to_string()
            } else if r == height - 1 {
                "0".to_string()
            } else if r == (height - 1) / 2 {
                (cell_count * (height - 1 - r) / (height - 1)).to_string()
            } else {
                String::new()
            };
            out.push_str(&format!("{:>w$} |", label, w = label_width));
            for cell in row {
                match cell {
                    Some(state) => out.push_str(&format!("{} ", self.paint(*state))),
                    None => out.push_str("  "),
                }
            }
            out.push('\n');
        }

        out.push_str(&format!(
            "{:>w$} +{}\n",
            "",
            "-".repeat(width * 2),
            w = label_width
        ));
        let last = (width - 1).to_string();
        let gap = (width * 2).saturating_sub(1 + last.len() + X_LABEL.len()).max(2);
        out.push_str(&format!(
            "{:>w$}  0{:^gap$}{}\n",
            "",
            X_LABEL,
            if width > 1 { last.as_str() } else { "" },
            w = label_width,
            gap = gap
        ));

        let legend = CellState::all()
            .iter()
            .map(|s| format!("{} {}", self.paint(*s), s.label()))
            .collect::<Vec<_>>()
            .join("   ");
        out.push_str(&legend);
        out.push('\n');
        out
    }

    fn level(&self, value: usize, cell_count: usize, height: usize) -> usize {
        if cell_count == 0 {
            return 0;
        }
        ((value * (height - 1) + cell_count / 2) / cell_count).min(height - 1)
    }

    fn paint(&self, state: CellState) -> String {
        if self.color {
            marker(state).with(color(state)).to_string()
        } else {
            marker(state).to_string()
        }
    }
}
