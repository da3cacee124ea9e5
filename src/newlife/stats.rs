//! Per-call statistics reported by the grid.

use std::fmt;

/// Outcome of one generation advance.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct GenerationStats {
    /// Counter value before the advance.
    pub generation: u64,
    pub born: usize,
    pub survived: usize,
    pub died: usize,
    pub alive: usize,
    /// `alive / (width * height) * 100`.
    pub alive_percent: f64,
    /// Mean age of live cells after the advance, `0` when none are alive.
    pub average_age: f64,
}

impl GenerationStats {
    pub(crate) fn finish(&mut self, cell_count: usize, age_sum: u64) {
        self.alive_percent = if cell_count == 0 {
            0.0
        } else {
            self.alive as f64 / cell_count as f64 * 100.0
        };
        self.average_age = if self.alive == 0 {
            0.0
        } else {
            age_sum as f64 / self.alive as f64
        };
    }
}

impl fmt::Display for GenerationStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "generation {}: born {}, survived {}, died {}, alive {} ({:.2}%), average age {:.2}",
            self.generation,
            self.born,
            self.survived,
            self.died,
            self.alive,
            self.alive_percent,
            self.average_age
        )
    }
}

/// Outcome of a random seeding pass.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SeedReport {
    pub generation: u64,
    pub born: usize,
}

/// Outcome of a click seeding.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ClickReport {
    /// Positions inside the ellipse whose draw succeeded.
    pub candidates: usize,
    /// Candidates that actually received a new cell.
    pub born: usize,
}

#[cfg(test)]
mod tests {
    use super::GenerationStats;

    #[test]
    fn percent_and_average_age() {
        let mut stats = GenerationStats {
            alive: 4,
            ..GenerationStats::default()
        };
        stats.finish(16, 10);
        assert_eq!(stats.alive_percent, 25.0);
        assert_eq!(stats.average_age, 2.5);
    }

    #[test]
    fn empty_board_has_zero_average_age() {
        let mut stats = GenerationStats::default();
        stats.finish(9, 0);
        assert_eq!(stats.alive_percent, 0.0);
        assert_eq!(stats.average_age, 0.0);
    }
}
