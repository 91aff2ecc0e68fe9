use thiserror::Error;

use crate::components::EntityKind;

pub type Result<T> = std::result::Result<T, EcologyError>;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum EcologyError {
    #[error("no living {0} to choose from")]
    EmptyPopulation(EntityKind),

    #[error("coordinate ({x}, {y}) lies outside a grid of edge {edge}")]
    OutOfBounds { x: usize, y: usize, edge: usize },

    #[error("grid invariant violated: {0}")]
    InvariantViolation(String),

    #[error("grid edge length must be positive")]
    InvalidEdge,

    #[error("simulation already ended: the forest is gone")]
    SimulationEnded,
}
