//! Neighborhood predicates must not depend on orientation.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use vastu_skeleton::TemplateMatcher;
use vastu_skeleton::topology::{
    CubeSymmetry, NEIGHBORHOOD_MASK, Occupancy, count_background_components, count_branches,
    count_foreground_components, is_end_point, is_simple_point,
};

/// Random neighborhoods with the center set.
///
/// `density` is the probability of each neighbor being occupied; sparse
/// draws exercise the end-point cases, dense ones the simple-point cases.
fn random_occupancies(seed: u64, count: usize, density: f64) -> Vec<Occupancy> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..count)
        .map(|_| {
            let mut bits = 0u32;
            for bit in 0..27 {
                if NEIGHBORHOOD_MASK & (1 << bit) != 0 && rng.gen_bool(density) {
                    bits |= 1 << bit;
                }
            }
            Occupancy::new(bits).with_center()
        })
        .collect()
}

#[test]
fn test_predicates_invariant_under_cube_symmetries() {
    let mut samples = random_occupancies(7, 200, 0.15);
    samples.extend(random_occupancies(11, 200, 0.5));
    samples.extend(random_occupancies(13, 100, 0.85));

    for occ in samples {
        let simple = is_simple_point(occ);
        let end = is_end_point(occ);
        let branches = count_branches(occ);
        let foreground = count_foreground_components(occ);
        let background = count_background_components(occ);

        for symmetry in CubeSymmetry::all() {
            let mapped = symmetry.apply(occ);
            assert_eq!(mapped.count_neighbors(), occ.count_neighbors());
            assert_eq!(is_simple_point(mapped), simple, "{:?} under {:?}", occ, symmetry);
            assert_eq!(is_end_point(mapped), end, "{:?} under {:?}", occ, symmetry);
            assert_eq!(count_branches(mapped), branches);
            assert_eq!(count_foreground_components(mapped), foreground);
            assert_eq!(count_background_components(mapped), background);
        }
    }
}

#[test]
fn test_symmetry_round_trip() {
    for occ in random_occupancies(3, 50, 0.4) {
        for symmetry in CubeSymmetry::all() {
            assert_eq!(symmetry.inverse().apply(symmetry.apply(occ)), occ);
        }
    }
}

#[test]
fn test_pruning_templates_cover_every_tip_orientation() {
    let matcher = TemplateMatcher::pruning_templates();
    assert_eq!(matcher.len(), 26);

    for bit in 0..27u32 {
        if bit == 13 {
            continue;
        }
        let tip = Occupancy::new(1 << bit).with_center();
        assert!(matcher.matches(tip), "tip with neighbor bit {}", bit);
        assert!(is_end_point(tip));
    }
}

#[test]
fn test_pruning_templates_reject_interior_cells() {
    let matcher = TemplateMatcher::pruning_templates();
    for occ in random_occupancies(17, 300, 0.3) {
        if occ.count_neighbors() >= 2 {
            assert!(!matcher.matches(occ));
        }
    }
    assert!(!matcher.matches(Occupancy::CENTER));
}
