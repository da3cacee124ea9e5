//! Grid construction parameters.

use super::error::GridError;

const DEFAULT_WIDTH: usize = 500;
const DEFAULT_HEIGHT: usize = 500;
const DEFAULT_BIRTH_PROBABILITY: f64 = 0.5;
const DEFAULT_CLICK_BIRTH_PROBABILITY: f64 = 0.5;
const DEFAULT_CLICK_BIRTH_RADIUS: u32 = 10;

/// Configuration for a [`Grid`](super::Grid) instance.
///
/// Use `GridConfig::default()` for a 500x500 board, or customise individual
/// knobs via the builder methods. Nothing is checked until
/// [`validate`](Self::validate), which grid construction calls.
#[derive(Clone, Debug)]
pub struct GridConfig {
    pub width: usize,
    pub height: usize,
    /// Per-cell probability of occupation during random seeding.
    pub birth_probability: f64,
    /// Per-position probability of a rebirth inside a click ellipse.
    pub click_birth_probability: f64,
    /// Ellipse radius, in cells, on both axes.
    pub click_birth_radius: u32,
    /// Seed for the grid's generator. `None` draws from OS entropy.
    pub seed: Option<u64>,
    /// Threads for the neighbour-count pool.
    /// `None` means auto-detect (available parallelism).
    pub thread_count: Option<usize>,
    /// Hard upper bound on threads regardless of auto-detection.
    pub max_threads: Option<usize>,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            width: DEFAULT_WIDTH,
            height: DEFAULT_HEIGHT,
            birth_probability: DEFAULT_BIRTH_PROBABILITY,
            click_birth_probability: DEFAULT_CLICK_BIRTH_PROBABILITY,
            click_birth_radius: DEFAULT_CLICK_BIRTH_RADIUS,
            seed: None,
            thread_count: None,
            max_threads: None,
        }
    }
}

impl GridConfig {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            ..Self::default()
        }
    }

    pub fn birth_probability(mut self, p: f64) -> Self {
        self.birth_probability = p;
        self
    }

    pub fn click_birth_probability(mut self, p: f64) -> Self {
        self.click_birth_probability = p;
        self
    }

    pub fn click_birth_radius(mut self, radius: u32) -> Self {
        self.click_birth_radius = radius;
        self
    }

    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Set an explicit thread count for the compute pool.
    pub fn thread_count(mut self, n: usize) -> Self {
        self.thread_count = Some(n.max(1));
        self
    }

    /// Set a hard upper bound on threads.
    pub fn max_threads(mut self, n: usize) -> Self {
        self.max_threads = Some(n.max(1));
        self
    }

    pub fn cell_count(&self) -> usize {
        self.width.saturating_mul(self.height)
    }

    pub fn validate(&self) -> Result<(), GridError> {
        if self.width == 0
            || self.height == 0
            || self.width > u32::MAX as usize
            || self.height > u32::MAX as usize
        {
            return Err(GridError::InvalidDimensions {
                width: self.width,
                height: self.height,
            });
        }
        check_probability("birth_probability", self.birth_probability)?;
        check_probability("click_birth_probability", self.click_birth_probability)?;
        Ok(())
    }

    /// Resolve the pool size, falling back to available parallelism.
    pub(crate) fn resolve_thread_count(&self) -> usize {
        let mut threads = self.thread_count.unwrap_or_else(|| {
            std::thread::available_parallelism()
                .map(|n| n.get())
                .unwrap_or(1)
        });
        if let Some(cap) = self.max_threads {
            threads = threads.min(cap);
        }
        threads.max(1)
    }
}

fn check_probability(name: &'static str, value: f64) -> Result<(), GridError> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(GridError::InvalidProbability { name, value })
    }
}
