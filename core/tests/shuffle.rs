use piece_perfect_core::board::grid_targets;
use piece_perfect_core::shuffle::{derangement, has_fixed_point};
use piece_perfect_core::DrawArea;
use rand::rngs::StdRng;
use rand::SeedableRng;

fn area() -> DrawArea {
    DrawArea {
        x: 120.0,
        y: 40.0,
        width: 600.0,
        height: 480.0,
    }
}

#[test]
fn no_piece_starts_on_its_target() {
    for rows in 1..=8 {
        for cols in 1..=8 {
            if rows * cols == 1 {
                continue;
            }
            let targets = grid_targets(&area(), rows, cols);
            let mut rng = StdRng::seed_from_u64(u64::from(rows * 31 + cols));
            let assigned = derangement(&targets, 2.0, &mut rng);
            assert_eq!(assigned.len(), targets.len());
            assert!(!has_fixed_point(&targets, &assigned, 2.0), "{rows}x{cols}");
        }
    }
}

#[test]
fn degenerate_layout_falls_back_to_shift() {
    // Every target sits within tolerance of every other, so no shuffle can
    // ever succeed.
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();
    let targets = vec![(0.0, 0.0), (0.5, 0.5), (1.0, 1.0)];
    let mut rng = StdRng::seed_from_u64(11);
    let assigned = derangement(&targets, 2.0, &mut rng);
    assert_eq!(assigned, vec![(0.5, 0.5), (1.0, 1.0), (0.0, 0.0)]);
}
