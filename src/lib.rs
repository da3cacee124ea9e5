//! Generalized Conway's Game of Life simulation core with per-cell survival
//! rules (B23/S23 by default), age tracking and localized re-seeding.

pub mod newlife;
pub use newlife::{
    Cell, CellState, EvolutionStrategy, GenerationStats, Grid, GridConfig, GridError, RuleKind,
    Simulation,
};
