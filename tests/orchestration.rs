use troika_trail_cores::orchestrate::{kk, kn, nk, nn};
use troika_trail_cores::weight::Weight;

#[test]
fn every_profile_produces_only_three_round_checked_cores_within_budget() {
    let t3 = Weight::new(10, 10);
    for trails in [kk(1, 1, t3), kn(1, 1, t3), nk(1, 1, t3), nn(1, 1, t3)] {
        for trail in &trails {
            assert_eq!(trail.nr_rounds(), 3);
            assert!(trail.check().is_ok());
            assert!(trail.total_weight() <= t3);
        }
    }
}

#[test]
fn kn_and_nk_are_not_simply_mirrors_of_an_empty_search() {
    let t3 = Weight::new(12, 12);
    assert!(!kn(1, 1, t3).is_empty());
    assert!(!nk(1, 1, t3).is_empty());
}
