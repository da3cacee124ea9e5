//! Bounded grid, generation advance and seeding.
//!
//! Cells live in two dense row-major buffers indexed by `row * width + col`.
//! A tick reads only the current buffer and writes the other one, then flips
//! `phase`. Each tick runs in three passes:
//! 1. neighbour counts from the current snapshot (rows split across the pool
//!    for large boards),
//! 2. survive/birth decisions, serially, so random draws stay in row-major
//!    order whatever the thread count,
//! 3. construction of the next snapshot, checking every decision against the
//!    (alive, alive-next) transition matrix.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rayon::prelude::*;
use tracing::{debug, error, info};

use super::cell::{Cell, CellState};
use super::config::GridConfig;
use super::error::GridError;
use super::rules::RuleKind;
use super::stats::{ClickReport, GenerationStats, SeedReport};
use super::strategy::EvolutionStrategy;

/// Below this many cells neighbour counting stays on the calling thread.
const PARALLEL_MIN_CELLS: usize = 65_536;

/// Decision for one slot, taken from the previous snapshot.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Fate {
    Vacant,
    Born(RuleKind),
    Survives,
    Dies,
}

/// Entry points a driver calls on timer ticks and input events.
pub trait Simulation {
    fn advance_tick(&mut self) -> Result<GenerationStats, GridError>;
    fn seed_random(&mut self) -> SeedReport;
    fn seed_click(&mut self, x: i64, y: i64) -> ClickReport;
}

pub struct Grid<R = StdRng> {
    config: GridConfig,
    strategy: EvolutionStrategy,
    width: usize,
    height: usize,
    bufs: [Vec<Option<Cell>>; 2],
    phase: usize,
    /// Scratch: live-neighbour count per slot for the tick in progress.
    counts: Vec<u8>,
    /// Scratch: decision per slot for the tick in progress.
    fates: Vec<Fate>,
    generation: u64,
    last_stats: Option<GenerationStats>,
    pool: rayon::ThreadPool,
    rng: R,
}

impl Grid<StdRng> {
    /// Build a grid whose generator is seeded from `config.seed`, or from OS
    /// entropy when no seed is set.
    pub fn new(config: GridConfig, strategy: EvolutionStrategy) -> Result<Self, GridError> {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        Self::with_rng(config, strategy, rng)
    }
}

impl<R: Rng> Grid<R> {
    /// Build a grid drawing all randomness from `rng`.
    pub fn with_rng(
        config: GridConfig,
        strategy: EvolutionStrategy,
        rng: R,
    ) -> Result<Self, GridError> {
        config.validate()?;
        let threads = config.resolve_thread_count();
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(threads)
            .build()?;
        let (width, height) = (config.width, config.height);
        let cells = config.cell_count();
        debug!(
            width,
            height,
            threads,
            strategy = strategy.name(),
            "created life grid"
        );

        Ok(Self {
            config,
            strategy,
            width,
            height,
            bufs: [vec![None; cells], vec![None; cells]],
            phase: 0,
            counts: vec![0; cells],
            fates: vec![Fate::Vacant; cells],
            generation: 0,
            last_stats: None,
            pool,
            rng,
        })
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    pub fn strategy(&self) -> &EvolutionStrategy {
        &self.strategy
    }

    /// Number of seed and advance calls so far.
    #[inline]
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn last_stats(&self) -> Option<&GenerationStats> {
        self.last_stats.as_ref()
    }

    /// Current snapshot, row-major.
    #[inline]
    pub fn cells(&self) -> &[Option<Cell>] {
        &self.bufs[self.phase]
    }

    /// One row of the current snapshot, or `None` past the last row.
    pub fn row(&self, row: usize) -> Option<&[Option<Cell>]> {
        let start = self.index(row, 0)?;
        Some(&self.cells()[start..start + self.width])
    }

    #[inline]
    fn index(&self, row: usize, col: usize) -> Option<usize> {
        (row < self.height && col < self.width).then(|| row * self.width + col)
    }

    pub fn cell(&self, row: usize, col: usize) -> Option<&Cell> {
        self.index(row, col)
            .and_then(|i| self.bufs[self.phase][i].as_ref())
    }

    pub fn is_alive(&self, row: usize, col: usize) -> bool {
        self.cell(row, col).is_some()
    }

    pub fn population(&self) -> usize {
        self.cells().iter().filter(|slot| slot.is_some()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.population() == 0
    }

    pub fn for_each_live<F: FnMut(&Cell)>(&self, mut f: F) {
        for cell in self.cells().iter().flatten() {
            f(cell);
        }
    }

    /// Live cells among the clamped Moore neighbourhood. Positions outside
    /// the grid have no neighbours.
    pub fn alive_neighbours(&self, row: usize, col: usize) -> u8 {
        if self.index(row, col).is_none() {
            return 0;
        }
        count_at(self.cells(), self.width, self.height, row, col)
    }

    /// Whether the occupant of `(row, col)` survives the next advance.
    /// Empty and out-of-range positions report `false`.
    pub fn will_survive(&self, row: usize, col: usize) -> bool {
        self.cell(row, col).is_some_and(|cell| {
            cell.will_survive(self.alive_neighbours(row, col), self.strategy.max_age())
        })
    }

    pub fn cell_state(&self, row: usize, col: usize) -> CellState {
        match self.cell(row, col) {
            None => CellState::Empty,
            Some(cell) => cell.state(self.will_survive(row, col), self.strategy.thresholds()),
        }
    }

    /// Occupy `(row, col)` with a newborn from the strategy factory, or clear
    /// it. Returns `false` when the position is outside the grid.
    pub fn set_cell(&mut self, row: usize, col: usize, alive: bool) -> bool {
        let Some(i) = self.index(row, col) else {
            return false;
        };
        let cell = alive.then(|| {
            self.strategy
                .born_new_cell(row as u32, col as u32, &mut self.rng)
        });
        self.bufs[self.phase][i] = cell;
        true
    }

    /// Place a newborn of an explicit rule-subtype.
    pub fn insert_cell(&mut self, row: usize, col: usize, kind: RuleKind) -> bool {
        let Some(i) = self.index(row, col) else {
            return false;
        };
        self.bufs[self.phase][i] = Some(Cell::newborn(row as u32, col as u32, kind));
        true
    }

    pub fn clear(&mut self) {
        self.bufs[self.phase].fill(None);
    }

    /// Independently occupy every slot with probability `birth_probability`,
    /// replacing the whole snapshot.
    ///
    /// Bumps the generation counter even though no generation is advanced.
    pub fn fill_random(&mut self) -> SeedReport {
        let p = self.config.birth_probability;
        let width = self.width;
        let current = &mut self.bufs[self.phase];
        let mut born = 0usize;
        for (i, slot) in current.iter_mut().enumerate() {
            *slot = if self.rng.random::<f64>() < p {
                born += 1;
                let (row, col) = (i / width, i % width);
                Some(
                    self.strategy
                        .born_new_cell(row as u32, col as u32, &mut self.rng),
                )
            } else {
                None
            };
        }

        let report = SeedReport {
            generation: self.generation,
            born,
        };
        info!(generation = report.generation, born, "random seeding");
        self.generation += 1;
        report
    }

    /// Re-seed an elliptical patch centred on column `x`, row `y`.
    ///
    /// Each position inside the ellipse draws against
    /// `click_birth_probability`; a successful draw replaces the slot with a
    /// newborn only when the slot is already occupied. Empty slots never gain
    /// a cell here.
    pub fn make_random_birth(&mut self, x: i64, y: i64) -> ClickReport {
        let radius = i64::from(self.config.click_birth_radius);
        let p = self.config.click_birth_probability;
        let mut report = ClickReport::default();

        let col_from = x.saturating_sub(radius).max(0);
        let col_to = x.saturating_add(radius).min(self.width as i64 - 1);
        let row_from = y.saturating_sub(radius).max(0);
        let row_to = y.saturating_add(radius).min(self.height as i64 - 1);

        for row in row_from..=row_to {
            for col in col_from..=col_to {
                let (Some(dx), Some(dy)) = (col.checked_sub(x), row.checked_sub(y)) else {
                    continue;
                };
                if !inside_ellipse(dx, dy, radius, radius) {
                    continue;
                }
                if self.rng.random::<f64>() >= p {
                    continue;
                }
                report.candidates += 1;
                let i = row as usize * self.width + col as usize;
                if self.bufs[self.phase][i].is_some() {
                    let cell = self
                        .strategy
                        .born_new_cell(row as u32, col as u32, &mut self.rng);
                    self.bufs[self.phase][i] = Some(cell);
                    report.born += 1;
                }
            }
        }

        info!(
            x,
            y,
            radius,
            candidates = report.candidates,
            born = report.born,
            "click seeding"
        );
        report
    }

    /// Advance one generation.
    ///
    /// On an internal consistency failure the previous snapshot and the
    /// generation counter are left untouched.
    pub fn next_generation(&mut self) -> Result<GenerationStats, GridError> {
        let (width, height) = (self.width, self.height);
        let current = &self.bufs[self.phase];

        if current.len() >= PARALLEL_MIN_CELLS && self.pool.current_num_threads() > 1 {
            let counts = &mut self.counts;
            self.pool.install(|| {
                counts
                    .par_chunks_mut(width)
                    .enumerate()
                    .for_each(|(row, out)| count_row(current, width, height, row, out));
            });
        } else {
            for (row, out) in self.counts.chunks_mut(width).enumerate() {
                count_row(current, width, height, row, out);
            }
        }

        let max_age = self.strategy.max_age();
        for ((fate, slot), &n) in self.fates.iter_mut().zip(current).zip(&self.counts) {
            *fate = match slot {
                Some(cell) if cell.will_survive(n, max_age) => Fate::Survives,
                Some(_) => Fate::Dies,
                None => match self.strategy.if_will_born(n, &mut self.rng) {
                    Some(kind) => Fate::Born(kind),
                    None => Fate::Vacant,
                },
            };
        }

        let mut stats = GenerationStats {
            generation: self.generation,
            ..GenerationStats::default()
        };
        let mut age_sum = 0u64;
        let (current, next) = split_phase(&mut self.bufs, self.phase);
        for (i, (&fate, dst)) in self.fates.iter().zip(next.iter_mut()).enumerate() {
            let (row, col) = (i / width, i % width);
            *dst = match (current[i], fate) {
                (Some(mut cell), Fate::Survives) => {
                    check_coords(&cell, row, col)?;
                    cell.grow_older();
                    stats.survived += 1;
                    age_sum += u64::from(cell.age());
                    Some(cell)
                }
                (Some(cell), Fate::Dies) => {
                    check_coords(&cell, row, col)?;
                    stats.died += 1;
                    None
                }
                (None, Fate::Born(kind)) => {
                    stats.born += 1;
                    Some(Cell::newborn(row as u32, col as u32, kind))
                }
                (None, Fate::Vacant) => None,
                (occupant, fate) => {
                    return Err(consistency_failure(
                        row,
                        col,
                        format!(
                            "alive ({}) and alive next ({fate:?}) combination",
                            occupant.is_some()
                        ),
                    ));
                }
            };
        }

        self.phase ^= 1;
        stats.alive = stats.born + stats.survived;
        stats.finish(width * height, age_sum);
        info!(
            generation = stats.generation,
            born = stats.born,
            survived = stats.survived,
            died = stats.died,
            alive = stats.alive,
            alive_percent = stats.alive_percent,
            average_age = stats.average_age,
            "generation advanced"
        );
        self.generation += 1;
        self.last_stats = Some(stats);
        Ok(stats)
    }
}

impl<R: Rng> Simulation for Grid<R> {
    fn advance_tick(&mut self) -> Result<GenerationStats, GridError> {
        self.next_generation()
    }

    fn seed_random(&mut self) -> SeedReport {
        self.fill_random()
    }

    fn seed_click(&mut self, x: i64, y: i64) -> ClickReport {
        self.make_random_birth(x, y)
    }
}

/// `(dx/rh)^2 + (dy/rv)^2 <= 1`. A zero radius admits only offset zero on
/// that axis.
fn inside_ellipse(dx: i64, dy: i64, radius_h: i64, radius_v: i64) -> bool {
    match (axis_term(dx, radius_h), axis_term(dy, radius_v)) {
        (Some(h), Some(v)) => h + v <= 1.0,
        _ => false,
    }
}

#[inline]
fn axis_term(offset: i64, radius: i64) -> Option<f64> {
    if radius == 0 {
        return (offset == 0).then_some(0.0);
    }
    let t = offset as f64 / radius as f64;
    Some(t * t)
}

#[inline(always)]
fn count_at(
    cells: &[Option<Cell>],
    width: usize,
    height: usize,
    row: usize,
    col: usize,
) -> u8 {
    let row_from = row.saturating_sub(1);
    let row_to = (row + 1).min(height - 1);
    let col_from = col.saturating_sub(1);
    let col_to = (col + 1).min(width - 1);
    let mut alive = 0u8;
    for r in row_from..=row_to {
        let base = r * width;
        for c in col_from..=col_to {
            if (r != row || c != col) && cells[base + c].is_some() {
                alive += 1;
            }
        }
    }
    alive
}

fn count_row(cells: &[Option<Cell>], width: usize, height: usize, row: usize, out: &mut [u8]) {
    for (col, n) in out.iter_mut().enumerate() {
        *n = count_at(cells, width, height, row, col);
    }
}

fn split_phase<T>(bufs: &mut [Vec<T>; 2], phase: usize) -> (&[T], &mut [T]) {
    let (first, second) = bufs.split_at_mut(1);
    if phase == 0 {
        (&first[0], &mut second[0])
    } else {
        (&second[0], &mut first[0])
    }
}

fn check_coords(cell: &Cell, row: usize, col: usize) -> Result<(), GridError> {
    if cell.row() as usize == row && cell.col() as usize == col {
        return Ok(());
    }
    Err(consistency_failure(
        row,
        col,
        format!("occupant claims position [{}, {}]", cell.row(), cell.col()),
    ))
}

fn consistency_failure(row: usize, col: usize, detail: String) -> GridError {
    error!(critical = true, row, col, %detail, "invalid cell transition");
    GridError::InternalConsistency { row, col, detail }
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    use super::{Fate, Grid, inside_ellipse, split_phase};
    use crate::newlife::cell::{Cell, CellState};
    use crate::newlife::config::GridConfig;
    use crate::newlife::error::GridError;
    use crate::newlife::rules::RuleKind;
    use crate::newlife::strategy::EvolutionStrategy;

    fn classic(width: usize, height: usize) -> Grid {
        Grid::new(
            GridConfig::new(width, height).seed(0x5EED).thread_count(1),
            EvolutionStrategy::Classic,
        )
        .expect("valid grid")
    }

    fn full(grid: &mut Grid) {
        for row in 0..grid.height() {
            for col in 0..grid.width() {
                grid.insert_cell(row, col, RuleKind::Typical);
            }
        }
    }

    #[test]
    fn neighbour_counts_are_clamped_at_edges() {
        let mut grid = classic(5, 5);
        full(&mut grid);
        for (row, col) in [(0, 0), (0, 4), (4, 0), (4, 4)] {
            assert_eq!(grid.alive_neighbours(row, col), 3, "corner ({row},{col})");
        }
        for (row, col) in [(0, 2), (2, 0), (4, 2), (2, 4)] {
            assert_eq!(grid.alive_neighbours(row, col), 5, "edge ({row},{col})");
        }
        assert_eq!(grid.alive_neighbours(2, 2), 8);
        assert_eq!(grid.alive_neighbours(9, 9), 0);
    }

    #[test]
    fn single_row_and_single_cell_grids() {
        let mut grid = classic(1, 1);
        grid.insert_cell(0, 0, RuleKind::Typical);
        assert_eq!(grid.alive_neighbours(0, 0), 0);
        grid.next_generation().expect("advance");
        assert!(grid.is_empty());

        let mut grid = classic(4, 1);
        full(&mut grid);
        assert_eq!(grid.alive_neighbours(0, 0), 1);
        assert_eq!(grid.alive_neighbours(0, 1), 2);
    }

    #[test]
    fn out_of_range_edits_are_ignored() {
        let mut grid = classic(3, 3);
        assert!(!grid.set_cell(3, 0, true));
        assert!(!grid.insert_cell(0, 3, RuleKind::Typical));
        assert!(grid.is_empty());
        assert_eq!(grid.cell_state(7, 7), CellState::Empty);
    }

    #[test]
    fn rows_are_bounded() {
        let mut grid = classic(4, 4);
        grid.insert_cell(3, 2, RuleKind::Typical);
        let last = grid.row(3).expect("last row");
        assert_eq!(last.len(), 4);
        assert_eq!(last.iter().filter(|slot| slot.is_some()).count(), 1);
        assert!(last[2].is_some());
        assert!(grid.row(4).is_none());
        assert!(grid.row(usize::MAX).is_none());
    }

    #[test]
    fn failed_advance_leaves_snapshot_untouched() {
        let mut grid = classic(3, 3);
        grid.insert_cell(0, 0, RuleKind::Typical);
        grid.insert_cell(0, 1, RuleKind::Typical);
        // Corrupt a slot with a cell that belongs elsewhere.
        let phase = grid.phase;
        grid.bufs[phase][4] = Some(Cell::newborn(2, 2, RuleKind::Typical));
        let before: Vec<_> = grid.cells().to_vec();

        let err = grid.next_generation().unwrap_err();
        assert!(matches!(
            err,
            GridError::InternalConsistency { row: 1, col: 1, .. }
        ));
        assert!(!err.is_configuration());
        assert_eq!(grid.generation(), 0);
        assert_eq!(grid.cells(), &before[..]);
        assert!(grid.last_stats().is_none());
    }

    #[test]
    fn split_phase_reads_current_and_writes_other() {
        let mut bufs = [vec![1, 1], vec![2, 2]];
        let (current, next) = split_phase(&mut bufs, 1);
        assert_eq!(current, &[2, 2]);
        next[0] = 7;
        assert_eq!(bufs[0], vec![7, 1]);
    }

    #[test]
    fn ellipse_membership() {
        assert!(inside_ellipse(0, 0, 0, 0));
        assert!(!inside_ellipse(1, 0, 0, 0));
        assert!(inside_ellipse(3, 0, 3, 3));
        assert!(inside_ellipse(2, 2, 3, 3));
        assert!(!inside_ellipse(3, 1, 3, 3));
        assert!(!inside_ellipse(-3, -3, 3, 3));
    }

    #[test]
    fn fates_are_all_written_each_tick() {
        let mut grid = Grid::with_rng(
            GridConfig::new(6, 4).thread_count(1),
            EvolutionStrategy::mutation(),
            StdRng::seed_from_u64(3),
        )
        .expect("valid grid");
        grid.fill_random();
        grid.next_generation().expect("advance");
        let occupied = grid
            .fates
            .iter()
            .filter(|f| matches!(f, Fate::Survives | Fate::Dies))
            .count();
        let stats = grid.last_stats().copied().expect("stats");
        assert_eq!(occupied, stats.survived + stats.died);
    }
}
