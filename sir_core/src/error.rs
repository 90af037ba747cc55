//! Error types for the simulation engine.

use thiserror::Error;

/// Errors that can occur when running the SIR recurrence.
#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum SimulationError {
    /// Total population N = S0 + I0 is not a positive finite number,
    /// so the per-capita infection term is undefined.
    #[error("degenerate parameters: total population {population} must be positive")]
    DegenerateParameters { population: f64 },
    
    /// Horizon of zero days; a trajectory always holds at least the initial point.
    #[error("simulation horizon must be at least one day")]
    EmptyHorizon,
}

impl SimulationError {
    /// Creates a degenerate-population error.
    pub fn degenerate(population: f64) -> Self {
        Self::DegenerateParameters { population }
    }
    
    /// Returns true if this is the degenerate-population case.
    pub fn is_degenerate(&self) -> bool {
        matches!(self, Self::DegenerateParameters { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    
    #[test]
    fn test_error_messages() {
        let err = SimulationError::degenerate(0.0);
        assert!(err.is_degenerate());
        assert_eq!(
            err.to_string(),
            "degenerate parameters: total population 0 must be positive"
        );
        assert!(!SimulationError::EmptyHorizon.is_degenerate());
    }
}
