use rand::seq::SliceRandom;
use rand::Rng;
use tracing::warn;

use crate::piece::same_spot;

pub const MAX_SHUFFLE_ATTEMPTS: usize = 10_000;

pub fn has_fixed_point(targets: &[(f32, f32)], assigned: &[(f32, f32)], tolerance: f32) -> bool {
    targets
        .iter()
        .zip(assigned.iter())
        .any(|(target, start)| same_spot(*target, *start, tolerance))
}

/// Start positions for each piece such that no piece begins on its own
/// target. Boards with fewer than two pieces are returned as-is.
pub fn derangement<R: Rng + ?Sized>(
    targets: &[(f32, f32)],
    tolerance: f32,
    rng: &mut R,
) -> Vec<(f32, f32)> {
    if targets.len() <= 1 {
        return targets.to_vec();
    }
    let mut assigned = targets.to_vec();
    for _ in 0..MAX_SHUFFLE_ATTEMPTS {
        assigned.shuffle(rng);
        if !has_fixed_point(targets, &assigned, tolerance) {
            return assigned;
        }
    }
    warn!(
        pieces = targets.len(),
        "shuffle attempts exhausted, falling back to cyclic shift"
    );
    let mut shifted = targets.to_vec();
    shifted.rotate_left(1);
    shifted
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn single_piece_is_untouched() {
        let mut rng = StdRng::seed_from_u64(1);
        assert_eq!(derangement(&[(5.0, 5.0)], 2.0, &mut rng), vec![(5.0, 5.0)]);
    }

    #[test]
    fn two_pieces_swap() {
        let mut rng = StdRng::seed_from_u64(9);
        let targets = [(0.0, 0.0), (50.0, 0.0)];
        assert_eq!(
            derangement(&targets, 2.0, &mut rng),
            vec![(50.0, 0.0), (0.0, 0.0)]
        );
    }

    #[test]
    fn output_is_a_permutation() {
        let mut rng = StdRng::seed_from_u64(77);
        let targets: Vec<(f32, f32)> = (0..12).map(|i| (i as f32 * 10.0, 0.0)).collect();
        let mut assigned = derangement(&targets, 2.0, &mut rng);
        assigned.sort_by(|a, b| a.0.total_cmp(&b.0));
        assert_eq!(assigned, targets);
    }
}
