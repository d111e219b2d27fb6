use piece_perfect_core::geometry::{
    edge_points, piece_outline, tab_margin, EdgeOrientation, PathCommand,
};
use piece_perfect_core::{Tab, TabMap};
use rand::rngs::StdRng;
use rand::SeedableRng;

fn close(a: (f32, f32), b: (f32, f32)) -> bool {
    (a.0 - b.0).abs() < 1e-3 && (a.1 - b.1).abs() < 1e-3
}

#[test]
fn shared_edges_are_negated_and_perimeter_is_flat() {
    for seed in 0..20u64 {
        let mut rng = StdRng::seed_from_u64(seed);
        let rows = 2 + (seed % 6) as u32;
        let cols = 2 + ((seed * 7) % 6) as u32;
        let map = TabMap::generate(rows, cols, &mut rng);
        for row in 0..rows {
            for col in 0..cols {
                let cell = map.get(row, col).unwrap();
                if col + 1 < cols {
                    let right = map.get(row, col + 1).unwrap();
                    assert_eq!(cell.right.sign(), -right.left.sign());
                    assert_ne!(cell.right, Tab::Flat);
                } else {
                    assert_eq!(cell.right, Tab::Flat);
                }
                if row + 1 < rows {
                    let below = map.get(row + 1, col).unwrap();
                    assert_eq!(cell.bottom.sign(), -below.top.sign());
                    assert_ne!(cell.bottom, Tab::Flat);
                } else {
                    assert_eq!(cell.bottom, Tab::Flat);
                }
                if row == 0 {
                    assert_eq!(cell.top, Tab::Flat);
                }
                if col == 0 {
                    assert_eq!(cell.left, Tab::Flat);
                }
            }
        }
    }
}

#[test]
fn neighbouring_outlines_meet_on_shared_edge() {
    let (w, h) = (120.0, 90.0);
    for tab in [Tab::Convex, Tab::Concave] {
        let a_right: Vec<(f32, f32)> = edge_points(EdgeOrientation::Right, tab, w, h);
        let b_left: Vec<(f32, f32)> = edge_points(EdgeOrientation::Left, tab.opposite(), w, h)
            .into_iter()
            .map(|(x, y)| (x + w, y))
            .collect();
        assert_eq!(a_right.len(), 6);
        assert_eq!(a_right.len(), b_left.len());
        for (a, b) in a_right.iter().zip(b_left.iter().rev()) {
            assert!(close(*a, *b), "{a:?} != {b:?}");
        }
    }
}

#[test]
fn vertical_neighbours_meet_on_shared_edge() {
    let (w, h) = (80.0, 100.0);
    let a_bottom = edge_points(EdgeOrientation::Bottom, Tab::Concave, w, h);
    let b_top: Vec<(f32, f32)> = edge_points(EdgeOrientation::Top, Tab::Convex, w, h)
        .into_iter()
        .map(|(x, y)| (x, y + h))
        .collect();
    for (a, b) in a_bottom.iter().zip(b_top.iter().rev()) {
        assert!(close(*a, *b), "{a:?} != {b:?}");
    }
}

#[test]
fn convex_tabs_stay_inside_margin() {
    let (w, h) = (60.0, 90.0);
    let margin = tab_margin(w, h);
    let mut rng = StdRng::seed_from_u64(5);
    let map = TabMap::generate(3, 3, &mut rng);
    let tabs = map.get(1, 1).unwrap();
    for command in piece_outline(tabs, w, h) {
        if let PathCommand::CubicTo { c1x, c1y, c2x, c2y, .. } = command {
            for (x, y) in [(c1x, c1y), (c2x, c2y)] {
                assert!(x >= -margin && x <= w + margin);
                assert!(y >= -margin && y <= h + margin);
            }
        }
    }
}
