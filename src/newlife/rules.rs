//! Rule-subtypes and their accepted neighbour counts.
//!
//! A rule is pure data: the set of Moore-neighbour counts (0..=8) under which a
//! live cell survives and an empty slot can be born into. Dispatch goes through
//! the bitmask, never through per-subtype code.

use std::fmt;
use std::str::FromStr;

/// Bitmask over neighbour counts 0..=8. Bit `n` set means count `n` is accepted.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct NeighbourSet(u16);

impl NeighbourSet {
    pub const EMPTY: Self = Self(0);

    /// Build a set from a list of counts. Counts above 8 are ignored.
    pub const fn from_counts(counts: &[u8]) -> Self {
        let mut mask = 0u16;
        let mut i = 0;
        while i < counts.len() {
            if counts[i] <= 8 {
                mask |= 1u16 << counts[i];
            }
            i += 1;
        }
        Self(mask)
    }

    #[inline(always)]
    pub const fn contains(self, count: u8) -> bool {
        count <= 8 && (self.0 >> count) & 1 == 1
    }

    #[inline]
    pub const fn bits(self) -> u16 {
        self.0
    }

    pub fn counts(self) -> impl Iterator<Item = u8> {
        (0u8..=8).filter(move |&n| self.contains(n))
    }
}

impl fmt::Display for NeighbourSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("{")?;
        for (i, n) in self.counts().enumerate() {
            if i > 0 {
                f.write_str(",")?;
            }
            write!(f, "{n}")?;
        }
        f.write_str("}")
    }
}

/// The seven named survival/birth policies.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum RuleKind {
    Typical,
    Standalone,
    SuperStandalone,
    Sociable,
    SuperSociable,
    StandaloneAndSociable,
    SuperStandaloneAndSociable,
}

impl RuleKind {
    pub const ALL: [RuleKind; 7] = [
        RuleKind::Typical,
        RuleKind::Standalone,
        RuleKind::SuperStandalone,
        RuleKind::Sociable,
        RuleKind::SuperSociable,
        RuleKind::StandaloneAndSociable,
        RuleKind::SuperStandaloneAndSociable,
    ];

    /// Neighbour counts that keep a cell of this kind alive (and let one be born).
    #[inline]
    pub const fn neighbours(self) -> NeighbourSet {
        match self {
            RuleKind::Typical => NeighbourSet::from_counts(&[2, 3]),
            RuleKind::Standalone => NeighbourSet::from_counts(&[1, 2, 3]),
            RuleKind::SuperStandalone => NeighbourSet::from_counts(&[0, 1, 2, 3]),
            RuleKind::Sociable => NeighbourSet::from_counts(&[2, 3, 4]),
            RuleKind::SuperSociable => NeighbourSet::from_counts(&[2, 3, 4, 5]),
            RuleKind::StandaloneAndSociable => NeighbourSet::from_counts(&[1, 2, 3, 4]),
            RuleKind::SuperStandaloneAndSociable => {
                NeighbourSet::from_counts(&[0, 1, 2, 3, 4, 5])
            }
        }
    }

    #[inline(always)]
    pub const fn will_survive_with_neighbours(self, count: u8) -> bool {
        self.neighbours().contains(count)
    }

    pub const fn name(self) -> &'static str {
        match self {
            RuleKind::Typical => "typical",
            RuleKind::Standalone => "standalone",
            RuleKind::SuperStandalone => "super-standalone",
            RuleKind::Sociable => "sociable",
            RuleKind::SuperSociable => "super-sociable",
            RuleKind::StandaloneAndSociable => "standalone-and-sociable",
            RuleKind::SuperStandaloneAndSociable => "super-standalone-and-sociable",
        }
    }
}

impl fmt::Display for RuleKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for RuleKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase().replace('_', "-");
        RuleKind::ALL
            .into_iter()
            .find(|kind| kind.name() == wanted)
            .ok_or_else(|| format!("unknown rule kind: {s}"))
    }
}
