use std::time::Instant;

use new_life::{EvolutionStrategy, Grid, GridConfig};

fn bench_grid(
    size: usize,
    strategy: EvolutionStrategy,
    threads: usize,
    iterations: u64,
) -> (f64, usize) {
    let config = GridConfig::new(size, size)
        .birth_probability(0.42)
        .seed(0x5EED_1234_ABCD_EF01)
        .thread_count(threads);
    let mut grid = match Grid::new(config, strategy) {
        Ok(grid) => grid,
        Err(err) => panic!("bench grid {size}x{size}: {err}"),
    };
    grid.fill_random();

    let start = Instant::now();
    for _ in 0..iterations {
        if let Err(err) = grid.next_generation() {
            panic!("advance failed: {err}");
        }
    }
    let total_ms = start.elapsed().as_secs_f64() * 1000.0;
    (total_ms, grid.population())
}

fn main() {
    let threads = std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1);
    let scales: &[(usize, u64)] = &[
        (128, 200), // below parallel threshold
        (256, 200), // at threshold
        (512, 100),
        (1024, 50),
        (2048, 20),
    ];

    println!(
        "{:<10} {:<9} {:>8} {:>8} {:>12} {:>10} {:>10}",
        "Grid", "Mode", "Threads", "Iters", "Total(ms)", "Avg(ms)", "Pop"
    );
    println!("{}", "-".repeat(74));

    for &(size, iters) in scales {
        for strategy in [EvolutionStrategy::Classic, EvolutionStrategy::mutation()] {
            for pool in [1, threads] {
                let name = strategy.name();
                let (total_ms, pop) = bench_grid(size, strategy.clone(), pool, iters);
                let avg_ms = total_ms / iters as f64;
                println!(
                    "{:<10} {:<9} {:>8} {:>8} {:>12.1} {:>10.4} {:>10}",
                    format!("{}x{}", size, size),
                    name,
                    pool,
                    iters,
                    total_ms,
                    avg_ms,
                    pop
                );
            }
        }
    }
}
