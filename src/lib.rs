pub mod components;
pub mod engine;
pub mod error;
pub mod grid;
pub mod report;
pub mod rng;
pub mod scenario;
pub mod systems;

pub use components::{Entity, EntityId, EntityKind, LifeStage, Position, Species};
pub use engine::{Simulation, TickSummary};
pub use error::{EcologyError, Result};
pub use grid::Grid;
pub use report::{AnnualReport, Census, MonthlyActivity, Population, SimDate};
pub use rng::RngManager;
pub use scenario::{Scenario, ScenarioLoader, SeedingConfig};
