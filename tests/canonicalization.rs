use proptest::prelude::*;

use troika_trail_cores::state::TroikaState;
use troika_trail_cores::trail::TrailCore;
use troika_trail_cores::weight::Weight;

fn trail_with_single_active_trit(x: u8, y: u8, z: u8, dz: u8) -> TrailCore {
    let mut a = TroikaState::ZERO;
    a.set_trit(x % 9, y % 3, z % 27, 1);
    a = a.translate(dz);
    let b = a.l();
    TrailCore {
        states: vec![a, b],
        w_min_rev: Weight::from_active_trytes(a.get_nr_active_trytes()),
        transition_weights: vec![],
        w_min_dir: Weight::from_active_trytes(b.get_nr_active_trytes()),
    }
}

proptest! {
    #[test]
    fn canonicalization_is_translation_invariant(
        x in 0u8..9, y in 0u8..3, z in 0u8..27, dz in 0u8..27,
    ) {
        let base = trail_with_single_active_trit(x, y, z, 0);
        let shifted = trail_with_single_active_trit(x, y, z, dz);
        prop_assert_eq!(base.make_canonical(), shifted.make_canonical());
    }

    #[test]
    fn canonicalization_is_idempotent(
        x in 0u8..9, y in 0u8..3, z in 0u8..27, dz in 0u8..27,
    ) {
        let trail = trail_with_single_active_trit(x, y, z, dz);
        let once = trail.make_canonical();
        let twice = once.make_canonical();
        prop_assert_eq!(once, twice);
    }

    #[test]
    fn canonical_form_still_passes_the_invariant_checker(
        x in 0u8..9, y in 0u8..3, z in 0u8..27, dz in 0u8..27,
    ) {
        let trail = trail_with_single_active_trit(x, y, z, dz);
        prop_assert!(trail.make_canonical().check().is_ok());
    }
}
