//! Configuration types for the simulation.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};

/// Simulation parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationConfig {
    /// Side length of the square grid
    pub size: usize,
    /// Chance that a healthy cell with an infected neighbor catches the infection (0.0 to 1.0)
    pub infection_probability: f64,
    /// Number of iterations to observe
    pub steps: usize,
    /// Random seed for reproducibility; `None` seeds from entropy
    pub seed: Option<u64>,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            size: 50,
            infection_probability: 0.5,
            steps: 50,
            seed: None,
        }
    }
}

impl SimulationConfig {
    pub fn validate(&self) -> Result<()> {
        check_grid_size(self.size)?;
        if !(0.0..=1.0).contains(&self.infection_probability) {
            return Err(Error::InvalidConfig(format!(
                "infection probability {} is outside [0, 1]",
                self.infection_probability
            )));
        }
        Ok(())
    }

    /// Total number of cells on the grid
    pub fn cell_count(&self) -> usize {
        self.size * self.size
    }
}

/// Side length must be positive and addressable with `i32` positions
pub fn check_grid_size(size: usize) -> Result<()> {
    if size == 0 {
        return Err(Error::InvalidConfig(
            "grid size must be at least 1".to_string(),
        ));
    }
    if i32::try_from(size).is_err() {
        return Err(Error::InvalidConfig(format!("grid size {} is too large", size)));
    }
    Ok(())
}

/// Presentation settings for the viewer
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DisplayConfig {
    /// Delay between rendered frames (milliseconds)
    pub frame_interval_ms: u64,
    /// Print the run report as JSON after the summary chart
    pub print_report_json: bool,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            frame_interval_ms: 300,
            print_report_json: false,
        }
    }
}

/// Viewer configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ViewerConfig {
    pub simulation: SimulationConfig,
    pub display: DisplayConfig,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_configs() {
        let config = SimulationConfig::default();
        assert_eq!(config.size, 50);
        assert_eq!(config.infection_probability, 0.5);
        assert_eq!(config.steps, 50);
        assert!(config.validate().is_ok());

        let display = DisplayConfig::default();
        assert_eq!(display.frame_interval_ms, 300);
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let zero = SimulationConfig {
            size: 0,
            ..Default::default()
        };
        assert!(matches!(zero.validate(), Err(Error::InvalidConfig(_))));

        for p in [-0.1, 1.5, f64::NAN] {
            let config = SimulationConfig {
                infection_probability: p,
                ..Default::default()
            };
            assert!(config.validate().is_err(), "probability {} accepted", p);
        }
    }

    #[test]
    fn test_check_grid_size() {
        assert!(check_grid_size(1).is_ok());
        assert!(matches!(check_grid_size(0), Err(Error::InvalidConfig(_))));
        assert!(matches!(
            check_grid_size(i32::MAX as usize + 1),
            Err(Error::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_validate_accepts_bounds() {
        for p in [0.0, 1.0] {
            let config = SimulationConfig {
                size: 1,
                infection_probability: p,
                steps: 0,
                seed: Some(7),
            };
            assert!(config.validate().is_ok());
        }
    }

    #[test]
    fn test_config_serialization() {
        let config = ViewerConfig::default();
        let json = serde_json::to_string(&config).unwrap();
        let deserialized: ViewerConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(config.simulation, deserialized.simulation);
        assert_eq!(
            config.display.frame_interval_ms,
            deserialized.display.frame_interval_ms
        );
    }
}
