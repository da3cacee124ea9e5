use new_life::newlife::{
    Cell, EvolutionStrategy, Grid, GridConfig, GridError, RuleKind, Simulation,
};

fn grid_with(config: GridConfig) -> Grid {
    Grid::new(config.thread_count(1), EvolutionStrategy::Classic).expect("valid grid")
}

fn in_ellipse(row: usize, col: usize, x: i64, y: i64, radius: i64) -> bool {
    let (dx, dy) = (col as i64 - x, row as i64 - y);
    if radius == 0 {
        return dx == 0 && dy == 0;
    }
    let (h, v) = (dx as f64 / radius as f64, dy as f64 / radius as f64);
    h * h + v * v <= 1.0
}

fn snapshot(grid: &Grid) -> Vec<Option<Cell>> {
    grid.cells().to_vec()
}

#[test]
fn zero_probability_seeds_nothing() {
    let mut grid = grid_with(GridConfig::new(20, 15).birth_probability(0.0).seed(1));
    grid.insert_cell(3, 3, RuleKind::Typical);

    let report = grid.seed_random();

    assert_eq!(report.born, 0);
    assert!(grid.is_empty());
}

#[test]
fn full_probability_occupies_every_slot_as_newborns() {
    let mut grid = grid_with(GridConfig::new(20, 15).birth_probability(1.0).seed(1));

    let report = grid.seed_random();

    assert_eq!(report.born, 300);
    assert_eq!(grid.population(), 300);
    for row in 0..grid.height() {
        for col in 0..grid.width() {
            let cell = grid.cell(row, col).expect("occupied");
            assert_eq!((cell.row() as usize, cell.col() as usize), (row, col));
            assert_eq!(cell.age(), 0);
        }
    }
}

#[test]
fn partial_probability_is_roughly_proportional() {
    let mut grid = grid_with(GridConfig::new(100, 100).birth_probability(0.25).seed(77));
    let report = grid.fill_random();
    assert!(
        (2_200..=2_800).contains(&report.born),
        "born {}",
        report.born
    );
    assert_eq!(report.born, grid.population());
}

#[test]
fn generation_counter_counts_seeds_and_ticks() {
    let mut grid = grid_with(GridConfig::new(10, 10).birth_probability(0.4).seed(8));
    assert_eq!(grid.generation(), 0);

    let report = grid.seed_random();
    assert_eq!(report.generation, 0);
    assert_eq!(grid.generation(), 1);

    for expected in 1..=5u64 {
        let stats = grid.advance_tick().expect("advance");
        assert_eq!(stats.generation, expected);
        assert_eq!(grid.generation(), expected + 1);
    }

    let report = grid.seed_random();
    assert_eq!(report.generation, 6);
    assert_eq!(grid.generation(), 7);

    grid.seed_click(5, 5);
    assert_eq!(grid.generation(), 7);
}

#[test]
fn click_with_certain_birth_only_rebirths_occupied_slots() {
    let (x, y, radius) = (12i64, 9i64, 5u32);
    let mut grid = grid_with(
        GridConfig::new(30, 20)
            .birth_probability(0.5)
            .click_birth_probability(1.0)
            .click_birth_radius(radius)
            .seed(0xC11C),
    );
    grid.fill_random();
    // Let survivors age so rebirths are visible.
    grid.next_generation().expect("advance");
    grid.next_generation().expect("advance");
    let before = snapshot(&grid);

    let report = grid.seed_click(x, y);

    let mut in_area = 0;
    let mut occupied_in_area = 0;
    for row in 0..grid.height() {
        for col in 0..grid.width() {
            let i = row * grid.width() + col;
            let after = grid.cells()[i];
            if in_ellipse(row, col, x, y, radius as i64) {
                in_area += 1;
                assert_eq!(after.is_some(), before[i].is_some(), "({row},{col})");
                if let Some(cell) = after {
                    occupied_in_area += 1;
                    assert_eq!(cell.age(), 0, "({row},{col}) was not reborn");
                }
            } else {
                assert_eq!(after, before[i], "({row},{col}) outside the ellipse changed");
            }
        }
    }
    assert_eq!(report.candidates, in_area);
    assert_eq!(report.born, occupied_in_area);
    assert!(occupied_in_area > 0);
}

#[test]
fn click_with_zero_probability_changes_nothing() {
    let mut grid = grid_with(
        GridConfig::new(16, 16)
            .birth_probability(0.5)
            .click_birth_probability(0.0)
            .click_birth_radius(6)
            .seed(4),
    );
    grid.fill_random();
    let before = snapshot(&grid);

    let report = grid.make_random_birth(8, 8);

    assert_eq!(report.candidates, 0);
    assert_eq!(report.born, 0);
    assert!(snapshot(&grid) == before);
}

#[test]
fn click_never_populates_an_empty_board() {
    let mut grid = grid_with(
        GridConfig::new(16, 16)
            .click_birth_probability(1.0)
            .click_birth_radius(20)
            .seed(4),
    );
    let report = grid.make_random_birth(8, 8);
    assert_eq!(report.candidates, 256);
    assert_eq!(report.born, 0);
    assert!(grid.is_empty());
}

#[test]
fn zero_radius_click_touches_only_the_centre() {
    let mut grid = grid_with(
        GridConfig::new(5, 5)
            .birth_probability(1.0)
            .click_birth_probability(1.0)
            .click_birth_radius(0)
            .seed(2),
    );
    grid.fill_random();
    grid.next_generation().expect("advance");
    let before = snapshot(&grid);

    let report = grid.make_random_birth(0, 0);

    assert_eq!(report.candidates, 1);
    assert_eq!(report.born, 1);
    assert_eq!(grid.cell(0, 0).map(|c| c.age()), Some(0));
    assert_eq!(&grid.cells()[1..], &before[1..]);
}

#[test]
fn clicks_are_clamped_to_the_grid() {
    let radius = 4i64;
    let mut grid = grid_with(
        GridConfig::new(10, 10)
            .birth_probability(1.0)
            .click_birth_probability(1.0)
            .click_birth_radius(radius as u32)
            .seed(6),
    );
    grid.fill_random();

    // Centre outside the top-left corner: only the in-bounds part of the
    // ellipse is visited.
    let report = grid.make_random_birth(-2, -1);
    let expected = (0..10)
        .flat_map(|row| (0..10).map(move |col| (row, col)))
        .filter(|&(row, col)| in_ellipse(row, col, -2, -1, radius))
        .count();
    assert_eq!(report.candidates, expected);
    assert_eq!(report.born, expected);

    let report = grid.make_random_birth(1_000, -1_000);
    assert_eq!(report.candidates, 0);
    assert_eq!(grid.population(), 100);
}

#[test]
fn extreme_click_centres_are_ignored() {
    let mut grid = grid_with(
        GridConfig::new(10, 10)
            .birth_probability(0.5)
            .click_birth_probability(1.0)
            .click_birth_radius(u32::MAX)
            .seed(12),
    );
    grid.fill_random();
    let before = snapshot(&grid);

    for (x, y) in [(i64::MAX, i64::MIN), (i64::MAX, 0), (0, i64::MIN), (i64::MIN, i64::MAX)] {
        let report = grid.seed_click(x, y);
        assert_eq!(report.candidates, 0, "({x},{y})");
        assert_eq!(report.born, 0, "({x},{y})");
    }
    assert!(snapshot(&grid) == before);
}

#[test]
fn invalid_configuration_is_rejected_at_construction() {
    let err = Grid::new(GridConfig::new(0, 10), EvolutionStrategy::Classic)
        .err()
        .expect("zero width rejected");
    assert!(matches!(err, GridError::InvalidDimensions { width: 0, height: 10 }));

    let err = Grid::new(
        GridConfig::new(10, 10).click_birth_probability(1.5),
        EvolutionStrategy::mutation(),
    )
    .err()
    .expect("probability rejected");
    assert!(err.is_configuration());
    assert!(err.to_string().contains("click_birth_probability"));
}
