#[cfg(feature = "mimalloc-global")]
#[global_allocator]
static GLOBAL_ALLOCATOR: mimalloc::MiMalloc = mimalloc::MiMalloc;

use std::process::ExitCode;
use std::time::{Duration, Instant};

use new_life::{CellState, EvolutionStrategy, Grid, GridConfig, Simulation};
use tracing_subscriber::EnvFilter;

const DEFAULT_GENERATIONS: u64 = 100;

const USAGE: &str = "usage: new-life [--width N] [--height N] [--mode classic|mutation] \
[--generations N] [--birth-probability P] [--click-probability P] [--click-radius N] \
[--click X,Y]... [--seed N] [--threads N] [--period-ms N] [--render] [--debug]";

struct MainArgs {
    config: GridConfig,
    strategy: EvolutionStrategy,
    generations: u64,
    clicks: Vec<(i64, i64)>,
    period: Duration,
    render: bool,
    debug: bool,
}

fn parse_args() -> Result<MainArgs, String> {
    let args: Vec<String> = std::env::args().collect();
    let mut parsed = MainArgs {
        config: GridConfig::default(),
        strategy: EvolutionStrategy::Classic,
        generations: DEFAULT_GENERATIONS,
        clicks: Vec::new(),
        period: Duration::ZERO,
        render: false,
        debug: false,
    };
    let next_arg = |i: usize, flag: &str| -> Result<&str, String> {
        args.get(i)
            .map(String::as_str)
            .ok_or_else(|| format!("{flag} requires a value"))
    };
    fn number<T: std::str::FromStr>(value: &str, flag: &str) -> Result<T, String> {
        value
            .parse()
            .map_err(|_| format!("{flag} got an invalid value: {value}"))
    }

    let mut i = 1;
    while i < args.len() {
        let flag = args[i].as_str();
        match flag {
            "--width" => {
                i += 1;
                parsed.config.width = number(next_arg(i, flag)?, flag)?;
            }
            "--height" => {
                i += 1;
                parsed.config.height = number(next_arg(i, flag)?, flag)?;
            }
            "--mode" => {
                i += 1;
                parsed.strategy = next_arg(i, flag)?.parse()?;
            }
            "--generations" => {
                i += 1;
                parsed.generations = number(next_arg(i, flag)?, flag)?;
            }
            "--birth-probability" => {
                i += 1;
                parsed.config.birth_probability = number(next_arg(i, flag)?, flag)?;
            }
            "--click-probability" => {
                i += 1;
                parsed.config.click_birth_probability = number(next_arg(i, flag)?, flag)?;
            }
            "--click-radius" => {
                i += 1;
                parsed.config.click_birth_radius = number(next_arg(i, flag)?, flag)?;
            }
            "--click" => {
                i += 1;
                let value = next_arg(i, flag)?;
                let (x, y) = value
                    .split_once(',')
                    .ok_or_else(|| format!("--click expects X,Y, got {value}"))?;
                parsed
                    .clicks
                    .push((number(x.trim(), flag)?, number(y.trim(), flag)?));
            }
            "--seed" => {
                i += 1;
                parsed.config.seed = Some(number(next_arg(i, flag)?, flag)?);
            }
            "--threads" => {
                i += 1;
                let n: usize = number(next_arg(i, flag)?, flag)?;
                parsed.config = parsed.config.thread_count(n);
            }
            "--period-ms" => {
                i += 1;
                parsed.period = Duration::from_millis(number(next_arg(i, flag)?, flag)?);
            }
            "--render" => parsed.render = true,
            "-d" | "--debug" => parsed.debug = true,
            other => return Err(format!("unknown argument: {other}")),
        }
        i += 1;
    }
    Ok(parsed)
}

fn init_logging(debug: bool) {
    let default_level = if debug { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn glyph(state: CellState) -> char {
    match state {
        CellState::Newborn => '+',
        CellState::Grown => 'o',
        CellState::Mature => 'O',
        CellState::LongLiving => '@',
        CellState::Dying => 'x',
        CellState::Empty => '.',
    }
}

fn render(grid: &Grid) {
    let mut out = String::with_capacity((grid.width() + 1) * grid.height());
    for row in 0..grid.height() {
        for col in 0..grid.width() {
            out.push(glyph(grid.cell_state(row, col)));
        }
        out.push('\n');
    }
    println!("{out}");
}

fn run(args: MainArgs) -> Result<(), new_life::GridError> {
    let mut grid = Grid::new(args.config, args.strategy)?;
    grid.seed_random();
    for &(x, y) in &args.clicks {
        grid.seed_click(x, y);
    }
    if args.render {
        render(&grid);
    }

    let mut total = Duration::ZERO;
    for _ in 0..args.generations {
        let start = Instant::now();
        let stats = grid.advance_tick()?;
        total += start.elapsed();
        println!("{stats}");
        if args.render {
            render(&grid);
        }
        if !args.period.is_zero() {
            std::thread::sleep(args.period);
        }
    }

    if args.generations > 0 {
        let total_ms = total.as_secs_f64() * 1000.0;
        let avg_ms = total_ms / args.generations as f64;
        println!(
            "\n--- Summary ({} generations, {}x{} {}) ---",
            args.generations,
            grid.width(),
            grid.height(),
            grid.strategy()
        );
        println!("{total_ms:.3} ms total, {avg_ms:.6} ms/generation");
    }
    Ok(())
}

fn main() -> ExitCode {
    let args = match parse_args() {
        Ok(args) => args,
        Err(message) => {
            eprintln!("{message}\n{USAGE}");
            return ExitCode::from(2);
        }
    };
    init_logging(args.debug);
    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::error!(%err, "simulation aborted");
            ExitCode::FAILURE
        }
    }
}
