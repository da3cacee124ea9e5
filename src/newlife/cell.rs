//! A single automaton unit and its rendering classification.

use super::rules::RuleKind;

/// Lifecycle classification used by renderers.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CellState {
    Newborn,
    Grown,
    Mature,
    LongLiving,
    Dying,
    Empty,
}

/// Age boundaries between GROWN, MATURE and LONG_LIVING.
///
/// A surviving cell is GROWN while `age < grown_below`, MATURE while
/// `age < mature_below`, and LONG_LIVING afterwards.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MaturityThresholds {
    pub grown_below: u32,
    pub mature_below: u32,
}

impl MaturityThresholds {
    pub const CLASSIC: Self = Self {
        grown_below: 5,
        mature_below: 50,
    };
    pub const MUTATION: Self = Self {
        grown_below: 5,
        mature_below: 15,
    };

    #[inline]
    pub fn classify(self, age: u32) -> CellState {
        if age < self.grown_below {
            CellState::Grown
        } else if age < self.mature_below {
            CellState::Mature
        } else {
            CellState::LongLiving
        }
    }
}

/// An occupied slot. Coordinates never change after birth; a rebirth at the
/// same position replaces the value instead of resetting it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Cell {
    row: u32,
    col: u32,
    age: u32,
    kind: RuleKind,
}

impl Cell {
    pub(crate) fn newborn(row: u32, col: u32, kind: RuleKind) -> Self {
        Self {
            row,
            col,
            age: 0,
            kind,
        }
    }

    #[inline]
    pub fn row(&self) -> u32 {
        self.row
    }

    #[inline]
    pub fn col(&self) -> u32 {
        self.col
    }

    #[inline]
    pub fn age(&self) -> u32 {
        self.age
    }

    #[inline]
    pub fn kind(&self) -> RuleKind {
        self.kind
    }

    /// Survival decision for a given live-neighbour count.
    ///
    /// `max_age` is the age cap of the owning strategy; a cell older than the
    /// cap never survives, whatever its rule says.
    #[inline]
    pub fn will_survive(&self, alive_neighbours: u8, max_age: Option<u32>) -> bool {
        if max_age.is_some_and(|cap| self.age > cap) {
            return false;
        }
        self.kind.will_survive_with_neighbours(alive_neighbours)
    }

    /// Rendering state given whether the cell survives this tick.
    pub fn state(&self, will_survive: bool, thresholds: MaturityThresholds) -> CellState {
        if self.age == 0 {
            CellState::Newborn
        } else if !will_survive {
            CellState::Dying
        } else {
            thresholds.classify(self.age)
        }
    }

    #[inline]
    pub(crate) fn grow_older(&mut self) {
        self.age = self.age.saturating_add(1);
    }
}
