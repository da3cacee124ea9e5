//! Generalized Game of Life engine on a bounded, non-wrapping grid.

mod cell;
mod config;
mod error;
mod grid;
mod rules;
mod stats;
mod strategy;

pub use cell::{Cell, CellState, MaturityThresholds};
pub use config::GridConfig;
pub use error::GridError;
pub use grid::{Grid, Simulation};
pub use rules::{NeighbourSet, RuleKind};
pub use stats::{ClickReport, GenerationStats, SeedReport};
pub use strategy::{EvolutionStrategy, MAX_AGE, MutationTable};
