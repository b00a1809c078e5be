//! Three-round trail core orchestration (§4.8).
//!
//! A 3-round trail core is a pair of 2-round bare states `(A,B)` and `(C,D)`
//! joined across one ST boundary `B -> C`, with `B` and `C` sharing the same
//! active tryte positions. The four profiles differ in which side of the
//! join is enumerated "mixed" (in-kernel, via [`crate::mixed_state`]) versus
//! "normal" (outside-kernel, via [`crate::bare_state`]):
//!
//! - `kk`: both `(A,B)` and `(C,D)` in-kernel, joined by
//!   [`crate::extension::backward_extend_in_kernel`]/forward in-kernel.
//! - `kn`: `(C,D)` in-kernel, `(A,B)` enumerated by extending backward from
//!   `C`.
//! - `nk`: `(A,B)` in-kernel, `(C,D)` enumerated by extending forward from
//!   `B`.
//! - `nn`: both sides outside-kernel, enumerated independently and then
//!   extended in both directions, deduplicated by canonical form.
//!
//! Every profile budgets against a single total-weight bound `t3` (the
//! round-3 budget) in `Weight` units; `alpha`/`beta` weight the two
//! 2-round half-costs the same way [`crate::bare_state`] and
//! [`crate::mixed_state`] already do.

use std::time::Instant;

use crate::extension::{backward_extend, backward_extend_in_kernel, forward_extend};
use crate::mixed_state::enumerate_in_kernel_pairs;
use crate::bare_state::enumerate_bare_states;
use crate::trail::TrailCore;
use crate::weight::Weight;

fn three_round_core(
    a: crate::state::TroikaState,
    b: crate::state::TroikaState,
    c: crate::state::TroikaState,
    d: crate::state::TroikaState,
    weight_bc: Weight,
) -> TrailCore {
    TrailCore {
        states: vec![a, b, c, d],
        w_min_rev: Weight::from_active_trytes(a.get_nr_active_trytes()),
        transition_weights: vec![weight_bc],
        w_min_dir: Weight::from_active_trytes(d.get_nr_active_trytes()),
    }
}

/// `|K| -> |K|`: both halves in-kernel.
#[tracing::instrument(skip_all, fields(profile = "kk", t3 = %t3))]
pub fn kk(alpha: u32, beta: u32, t3: Weight) -> Vec<TrailCore> {
    let started = Instant::now();
    let mut out = Vec::new();
    let cd_cost_bound = (t3.integer / (2 * beta.max(1) as i64)).max(0) as u64 * 16;
    for cd in enumerate_in_kernel_pairs(alpha, beta, cd_cost_bound) {
        let w_min_dir_d = Weight::new(cd.w_b as i64, 0);
        let remaining = match checked_sub(t3, w_min_dir_d) {
            Some(r) => r,
            None => continue,
        };
        for ext in backward_extend_in_kernel(&cd.state_a, remaining) {
            let total = ext.weight_bc + Weight::new(ext.w_min_rev_a as i64, 0) + w_min_dir_d;
            if total > t3 {
                continue;
            }
            out.push(three_round_core(ext.a, ext.b, cd.state_a, cd.state_b, ext.weight_bc));
        }
    }
    tracing::info!(trails_found = out.len(), elapsed = ?started.elapsed(), "kk enumeration complete");
    out
}

/// `N -> |K|`: the far side in-kernel, the near side extended backward from it.
#[tracing::instrument(skip_all, fields(profile = "kn", t3 = %t3))]
pub fn kn(alpha: u32, beta: u32, t3: Weight) -> Vec<TrailCore> {
    let started = Instant::now();
    let mut out = Vec::new();
    let cd_cost_bound = (t3.integer / (2 * beta.max(1) as i64)).max(0) as u64 * 16;
    for cd in enumerate_in_kernel_pairs(alpha, beta, cd_cost_bound) {
        let w_min_dir_d = Weight::new(cd.w_b as i64, 0);
        let remaining = match checked_sub(t3, w_min_dir_d) {
            Some(r) => r,
            None => continue,
        };
        for ext in backward_extend(&cd.state_a, remaining) {
            out.push(three_round_core(ext.a, ext.b, cd.state_a, cd.state_b, ext.weight_bc));
        }
    }
    tracing::info!(trails_found = out.len(), elapsed = ?started.elapsed(), "kn enumeration complete");
    out
}

/// `|K| -> N`: the near side in-kernel, the far side extended forward from it.
#[tracing::instrument(skip_all, fields(profile = "nk", t3 = %t3))]
pub fn nk(alpha: u32, beta: u32, t3: Weight) -> Vec<TrailCore> {
    let started = Instant::now();
    let mut out = Vec::new();
    let ab_cost_bound = (t3.integer / (2 * alpha.max(1) as i64)).max(0) as u64 * 16;
    for ab in enumerate_in_kernel_pairs(alpha, beta, ab_cost_bound) {
        let w_min_rev_a = Weight::new(ab.w_a as i64, 0);
        let remaining = match checked_sub(t3, w_min_rev_a) {
            Some(r) => r,
            None => continue,
        };
        for ext in forward_extend(&ab.state_b, remaining) {
            out.push(three_round_core(ab.state_a, ab.state_b, ext.c, ext.d, ext.weight_bc));
        }
    }
    tracing::info!(trails_found = out.len(), elapsed = ?started.elapsed(), "nk enumeration complete");
    out
}

/// `N -> N`: both halves outside-kernel, extended in both directions from
/// the midpoint and deduplicated.
#[tracing::instrument(skip_all, fields(profile = "nn", t3 = %t3))]
pub fn nn(alpha: u32, beta: u32, t3: Weight) -> Vec<TrailCore> {
    use std::collections::BTreeSet;

    let started = Instant::now();
    let mut out = Vec::new();
    let mut seen: BTreeSet<Vec<(u32, u32)>> = BTreeSet::new();
    let mut forward_count = 0usize;
    let mut backward_count = 0usize;

    let ab_cost_bound = (t3.integer / (2 * alpha.max(1) as i64)).max(0) as u64 * 16;
    for ab in enumerate_bare_states(alpha, beta, ab_cost_bound) {
        let w_min_rev_a = Weight::new(ab.w_a as i64, 0);
        let remaining = match checked_sub(t3, w_min_rev_a) {
            Some(r) => r,
            None => continue,
        };
        for ext in forward_extend(&ab.state_b, remaining) {
            let core = three_round_core(ab.state_a, ab.state_b, ext.c, ext.d, ext.weight_bc);
            let key: Vec<(u32, u32)> =
                core.states.iter().flat_map(|s| s.lanes.iter().map(|l| (l.lane_1, l.lane_2))).collect();
            if seen.insert(key) {
                forward_count += 1;
                out.push(core);
            }
        }
    }
    tracing::debug!(count = forward_count, "nn forward sweep complete");

    let cd_cost_bound = (t3.integer / (2 * beta.max(1) as i64)).max(0) as u64 * 16;
    for cd in enumerate_bare_states(alpha, beta, cd_cost_bound) {
        let w_min_dir_d = Weight::new(cd.w_b as i64, 0);
        let remaining = match checked_sub(t3, w_min_dir_d) {
            Some(r) => r,
            None => continue,
        };
        for ext in backward_extend(&cd.state_a, remaining) {
            let core = three_round_core(ext.a, ext.b, cd.state_a, cd.state_b, ext.weight_bc);
            let key: Vec<(u32, u32)> =
                core.states.iter().flat_map(|s| s.lanes.iter().map(|l| (l.lane_1, l.lane_2))).collect();
            if seen.insert(key) {
                backward_count += 1;
                out.push(core);
            }
        }
    }
    tracing::debug!(count = backward_count, "nn backward sweep complete");

    tracing::info!(trails_found = out.len(), elapsed = ?started.elapsed(), "nn enumeration complete");
    out
}

fn checked_sub(total: Weight, part: Weight) -> Option<Weight> {
    if part > total {
        None
    } else {
        Some(total - part)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kk_emits_only_checked_trail_cores() {
        for core in kk(1, 1, Weight::new(8, 8)) {
            assert!(core.check().is_ok());
        }
    }

    #[test]
    fn kn_emits_only_checked_trail_cores() {
        for core in kn(1, 1, Weight::new(8, 8)) {
            assert!(core.check().is_ok());
        }
    }

    #[test]
    fn nk_emits_only_checked_trail_cores() {
        for core in nk(1, 1, Weight::new(8, 8)) {
            assert!(core.check().is_ok());
        }
    }

    #[test]
    fn nn_deduplicates_across_both_sweep_directions() {
        let cores = nn(1, 1, Weight::new(6, 6));
        let mut seen = std::collections::BTreeSet::new();
        for core in &cores {
            let key: Vec<(u32, u32)> =
                core.states.iter().flat_map(|s| s.lanes.iter().map(|l| (l.lane_1, l.lane_2))).collect();
            assert!(seen.insert(key), "nn produced a duplicate trail core");
        }
    }

    #[test]
    fn zero_budget_yields_nothing_in_every_profile() {
        assert!(kk(1, 1, Weight::ZERO).is_empty());
        assert!(kn(1, 1, Weight::ZERO).is_empty());
        assert!(nk(1, 1, Weight::ZERO).is_empty());
        assert!(nn(1, 1, Weight::ZERO).is_empty());
    }
}
