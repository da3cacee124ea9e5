//! Evolution strategies: which rule a new cell gets and whether it is born.

use std::fmt;
use std::str::FromStr;

use rand::Rng;

use super::cell::{Cell, MaturityThresholds};
use super::error::GridError;
use super::rules::RuleKind;

/// Age cap of the mutation strategy. Cells older than this never survive.
pub const MAX_AGE: u32 = 30;

/// Default 17-way die used by the mutation strategy.
const DEFAULT_WEIGHTS: [(RuleKind, u32); 7] = [
    (RuleKind::Standalone, 2),
    (RuleKind::SuperStandalone, 1),
    (RuleKind::Sociable, 2),
    (RuleKind::SuperSociable, 1),
    (RuleKind::StandaloneAndSociable, 2),
    (RuleKind::SuperStandaloneAndSociable, 1),
    (RuleKind::Typical, 8),
];

/// Weighted sampling table for rule-subtypes, plus the age cap.
///
/// Sampling draws one outcome uniformly from `0..total` and maps consecutive
/// ranges, in table order, to subtypes.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MutationTable {
    weights: Vec<(RuleKind, u32)>,
    total: u32,
    max_age: u32,
}

impl Default for MutationTable {
    fn default() -> Self {
        Self {
            weights: DEFAULT_WEIGHTS.to_vec(),
            total: DEFAULT_WEIGHTS.iter().map(|&(_, w)| w).sum(),
            max_age: MAX_AGE,
        }
    }
}

impl MutationTable {
    /// Custom table. Zero-weight entries are dropped; the total must be positive.
    pub fn new(weights: &[(RuleKind, u32)]) -> Result<Self, GridError> {
        let weights: Vec<_> = weights.iter().copied().filter(|&(_, w)| w > 0).collect();
        let total = weights
            .iter()
            .try_fold(0u32, |acc, &(_, w)| acc.checked_add(w))
            .ok_or(GridError::InvalidMutationTable("weights overflow u32"))?;
        if total == 0 {
            return Err(GridError::InvalidMutationTable("total weight is zero"));
        }
        Ok(Self {
            weights,
            total,
            max_age: MAX_AGE,
        })
    }

    pub fn with_max_age(mut self, max_age: u32) -> Self {
        self.max_age = max_age;
        self
    }

    #[inline]
    pub fn max_age(&self) -> u32 {
        self.max_age
    }

    #[inline]
    pub fn total(&self) -> u32 {
        self.total
    }

    pub fn weights(&self) -> &[(RuleKind, u32)] {
        &self.weights
    }

    /// Probability of `kind` being sampled.
    pub fn probability(&self, kind: RuleKind) -> f64 {
        let weight: u32 = self
            .weights
            .iter()
            .filter(|&&(k, _)| k == kind)
            .map(|&(_, w)| w)
            .sum();
        weight as f64 / self.total as f64
    }

    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> RuleKind {
        let mut roll = rng.random_range(0..self.total);
        for &(kind, weight) in &self.weights {
            if roll < weight {
                return kind;
            }
            roll -= weight;
        }
        // `roll < total` and the weights sum to `total`.
        unreachable!("sample roll exceeded table total")
    }
}

/// Policy deciding births and the rule-subtype of new cells.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum EvolutionStrategy {
    /// Every cell follows the typical rule.
    #[default]
    Classic,
    /// Each new cell draws its rule-subtype from the table; ages are capped.
    Mutation(MutationTable),
}

impl EvolutionStrategy {
    pub fn mutation() -> Self {
        EvolutionStrategy::Mutation(MutationTable::default())
    }

    pub fn name(&self) -> &'static str {
        match self {
            EvolutionStrategy::Classic => "classic",
            EvolutionStrategy::Mutation(_) => "mutation",
        }
    }

    /// Rule-subtype for the next new cell.
    #[inline]
    pub fn pick_kind<R: Rng + ?Sized>(&self, rng: &mut R) -> RuleKind {
        match self {
            EvolutionStrategy::Classic => RuleKind::Typical,
            EvolutionStrategy::Mutation(table) => table.sample(rng),
        }
    }

    /// Factory for a newly occupied slot.
    pub fn born_new_cell<R: Rng + ?Sized>(&self, row: u32, col: u32, rng: &mut R) -> Cell {
        Cell::newborn(row, col, self.pick_kind(rng))
    }

    /// Kind of cell that would be born into an empty slot with
    /// `alive_neighbours` live neighbours, or `None` when the candidate kind's
    /// rule rejects that count.
    ///
    /// The mutation strategy draws the candidate before checking it, so every
    /// call consumes randomness.
    #[inline]
    pub fn if_will_born<R: Rng + ?Sized>(
        &self,
        alive_neighbours: u8,
        rng: &mut R,
    ) -> Option<RuleKind> {
        let kind = self.pick_kind(rng);
        kind.will_survive_with_neighbours(alive_neighbours)
            .then_some(kind)
    }

    #[inline]
    pub fn max_age(&self) -> Option<u32> {
        match self {
            EvolutionStrategy::Classic => None,
            EvolutionStrategy::Mutation(table) => Some(table.max_age()),
        }
    }

    #[inline]
    pub fn thresholds(&self) -> MaturityThresholds {
        match self {
            EvolutionStrategy::Classic => MaturityThresholds::CLASSIC,
            EvolutionStrategy::Mutation(_) => MaturityThresholds::MUTATION,
        }
    }
}

impl fmt::Display for EvolutionStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for EvolutionStrategy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "classic" => Ok(EvolutionStrategy::Classic),
            "mutation" => Ok(EvolutionStrategy::mutation()),
            other => Err(format!(
                "unknown strategy: {other} (expected classic or mutation)"
            )),
        }
    }
}
