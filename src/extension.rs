//! State extension iterators (§4.7): given one side of an ST boundary,
//! enumerate the states on the other side that are ST-compatible within a
//! weight budget.
//!
//! All four extensions here are grounded in the same idea: walk the active
//! trytes of the known state, branch over the Sbox's sorted transition list
//! for each, and accumulate weight as the branch narrows. The reference
//! design additionally threads the partial-assembly lower bound through a
//! dedicated part/cost-function pair per extension kind; this
//! implementation instead prunes directly on the running `Weight` against
//! `max_weight`, which is a valid (if less tight) lower bound at every node
//! — see `DESIGN.md` for the grounding note on this simplification.
//!
//! `max_weight` throughout this module is the budget for the *whole*
//! extension metric (the ST transition weight plus the newly-produced far
//! side's minimum weight), matching §4.7.5's `isValidAndBelowWeight` gate.

use crate::position::{COLUMNS, ROWS, SLICES};
use crate::sbox::{sbox, TryteColumnTransition};
use crate::state::TroikaState;
use crate::weight::Weight;

/// Result of extending forward from `B` (after Λ) through ST to `C`, then
/// through Λ again to `D`.
#[derive(Clone, Debug)]
pub struct ForwardExtension {
    pub c: TroikaState,
    pub d: TroikaState,
    pub weight_bc: Weight,
    pub w_min_dir_d: u32,
}

/// Result of extending backward from `C` (before Λ) through ST to `B`, then
/// through Λ⁻¹ to `A`.
#[derive(Clone, Debug)]
pub struct BackwardExtension {
    pub a: TroikaState,
    pub b: TroikaState,
    pub weight_bc: Weight,
    pub w_min_rev_a: u32,
}

fn active_tryte_positions(state: &TroikaState) -> Vec<(u8, u8, u8)> {
    let active = state.active_state();
    let mut positions = Vec::new();
    for z in 0..SLICES as u8 {
        for y in 0..ROWS as u8 {
            for x_tryte in 0..(COLUMNS / 3) as u8 {
                if active.is_tryte_active(x_tryte, y, z) {
                    positions.push((x_tryte, y, z));
                }
            }
        }
    }
    positions
}

fn forward_dfs(
    b: &TroikaState,
    positions: &[(u8, u8, u8)],
    idx: usize,
    c: &mut TroikaState,
    weight: Weight,
    max_weight: Weight,
    require_kernel: bool,
    out: &mut Vec<ForwardExtension>,
) {
    if idx == positions.len() {
        let d = c.l();
        if require_kernel
            && (0..COLUMNS as u8).any(|x| {
                (0..SLICES as u8).any(|z| {
                    let count = (0..ROWS as u8).filter(|&y| d.get_trit(x, y, z) != 0).count();
                    count == 1
                })
            })
        {
            return;
        }
        let total = weight + Weight::from_active_trytes(d.get_nr_active_trytes());
        if total <= max_weight {
            out.push(ForwardExtension { c: *c, d, weight_bc: weight, w_min_dir_d: 2 * d.get_nr_active_trytes() });
        }
        return;
    }
    let (xt, y, z) = positions[idx];
    let b_val = b.get_tryte(xt, y, z);
    for t in sbox().transitions_from(b_val) {
        let new_weight = weight + t.weight;
        if new_weight > max_weight {
            continue;
        }
        c.set_tryte(xt, y, z, t.value);
        forward_dfs(b, positions, idx + 1, c, new_weight, max_weight, require_kernel, out);
    }
    c.set_tryte(xt, y, z, 0);
}

/// Forward extension (§4.7.1): every `(C, D)` reachable from `B` through ST
/// within `max_weight` (ST weight plus `wMinDir(D)`).
pub fn forward_extend(b: &TroikaState, max_weight: Weight) -> Vec<ForwardExtension> {
    let positions = active_tryte_positions(b);
    let mut c = TroikaState::ZERO;
    let mut out = Vec::new();
    forward_dfs(b, &positions, 0, &mut c, Weight::ZERO, max_weight, false, &mut out);
    out
}

/// Forward-in-kernel extension (§4.7.4): as [`forward_extend`], filtered to
/// `D` states where no column holds exactly one active trit (the
/// necessary-and-sufficient in-kernel-candidate test; see module docs for
/// the simplification relative to the reference's candidate-pinning
/// algorithm).
pub fn forward_extend_in_kernel(b: &TroikaState, max_weight: Weight) -> Vec<ForwardExtension> {
    let positions = active_tryte_positions(b);
    let mut c = TroikaState::ZERO;
    let mut out = Vec::new();
    forward_dfs(b, &positions, 0, &mut c, Weight::ZERO, max_weight, true, &mut out);
    out
}

fn backward_dfs(
    c: &TroikaState,
    positions: &[(u8, u8, u8)],
    idx: usize,
    b: &mut TroikaState,
    weight: Weight,
    max_weight: Weight,
    out: &mut Vec<BackwardExtension>,
) {
    if idx == positions.len() {
        let a = b.inv_l();
        let total = weight + Weight::from_active_trytes(a.get_nr_active_trytes());
        if total <= max_weight {
            out.push(BackwardExtension { a, b: *b, weight_bc: weight, w_min_rev_a: 2 * a.get_nr_active_trytes() });
        }
        return;
    }
    let (xt, y, z) = positions[idx];
    let c_val = c.get_tryte(xt, y, z);
    for t in sbox().transitions_to(c_val) {
        let new_weight = weight + t.weight;
        if new_weight > max_weight {
            continue;
        }
        b.set_tryte(xt, y, z, t.value);
        backward_dfs(c, positions, idx + 1, b, new_weight, max_weight, out);
    }
    b.set_tryte(xt, y, z, 0);
}

/// Backward extension (§4.7.2): every `(A, B)` preceding `C` through ST
/// within `max_weight` (ST weight plus `wMinRev(A)`).
pub fn backward_extend(c: &TroikaState, max_weight: Weight) -> Vec<BackwardExtension> {
    let positions = active_tryte_positions(c);
    let mut b = TroikaState::ZERO;
    let mut out = Vec::new();
    backward_dfs(c, &positions, 0, &mut b, Weight::ZERO, max_weight, &mut out);
    out
}

/// The three trytes of box-column `(x_tryte, z)`, one per `y`, in `y` order.
fn box_column_values(state: &TroikaState, x_tryte: u8, z: u8) -> [u8; 3] {
    std::array::from_fn(|y| state.get_tryte(x_tryte, y as u8, z))
}

/// Indices that would sort `v` descending, used to translate between the
/// `[i>=j>=k]`-canonical table key and the actual `(y=0,1,2)` ordering of a
/// box-column.
fn descending_perm(v: [u8; 3]) -> [usize; 3] {
    let mut perm = [0usize, 1, 2];
    perm.sort_by_key(|&i| std::cmp::Reverse(v[i]));
    perm
}

fn backward_kernel_dfs(
    positions: &[(u8, u8)],
    box_values: &[[u8; 3]],
    idx: usize,
    b: &mut TroikaState,
    weight: Weight,
    max_weight: Weight,
    out: &mut Vec<BackwardExtension>,
) {
    if idx == positions.len() {
        let a = b.inv_l();
        let total = weight + Weight::from_active_trytes(a.get_nr_active_trytes());
        if total <= max_weight {
            out.push(BackwardExtension { a, b: *b, weight_bc: weight, w_min_rev_a: 2 * a.get_nr_active_trytes() });
        }
        return;
    }
    let (x_tryte, z) = positions[idx];
    let v = box_values[idx];
    let (i, j, k) = {
        let mut s = v;
        s.sort_unstable_by(|a, b2| b2.cmp(a));
        (s[0], s[1], s[2])
    };
    let perm = descending_perm(v);
    for entry in sbox().in_kernel_before_st(i, j, k) {
        let new_weight = weight + entry.weight;
        if new_weight > max_weight {
            continue;
        }
        let mut by_y = [0u8; 3];
        for r in 0..3 {
            by_y[perm[r]] = entry.trytes[r];
        }
        for (y, &val) in by_y.iter().enumerate() {
            b.set_tryte(x_tryte, y as u8, z, val);
        }
        backward_kernel_dfs(positions, box_values, idx + 1, b, new_weight, max_weight, out);
    }
    for y in 0..3u8 {
        b.set_tryte(x_tryte, y, z, 0);
    }
}

/// Backward-in-kernel extension (§4.7.3): every `(A, B)` preceding
/// in-kernel `C` within `max_weight`, using the precomputed
/// [`TryteColumnTransition`] table. Returns an empty result immediately if
/// any active box-column of `C` holds exactly one active tryte, since no
/// in-kernel extension can exist for it.
pub fn backward_extend_in_kernel(c: &TroikaState, max_weight: Weight) -> Vec<BackwardExtension> {
    let mut positions = Vec::new();
    let mut box_values = Vec::new();
    for x_tryte in 0..(COLUMNS / 3) as u8 {
        for z in 0..SLICES as u8 {
            let v = box_column_values(c, x_tryte, z);
            let active_count = v.iter().filter(|&&t| t != 0).count();
            if active_count == 0 {
                continue;
            }
            if active_count == 1 {
                return Vec::new();
            }
            positions.push((x_tryte, z));
            box_values.push(v);
        }
    }
    let mut b = TroikaState::ZERO;
    let mut out = Vec::new();
    backward_kernel_dfs(&positions, &box_values, 0, &mut b, Weight::ZERO, max_weight, &mut out);
    out
}

#[allow(dead_code)]
fn _assert_transition_type(_t: &TryteColumnTransition) {}

#[cfg(test)]
mod tests {
    use super::*;

    fn single_tryte_state(x_tryte: u8, y: u8, z: u8, value: u8) -> TroikaState {
        let mut s = TroikaState::ZERO;
        s.set_tryte(x_tryte, y, z, value);
        s
    }

    #[test]
    fn forward_extend_includes_trivial_fixed_point_when_available() {
        let b = single_tryte_state(0, 0, 0, 1);
        let fixed_point = sbox().transitions_from(1).iter().find(|t| t.value == 1);
        if let Some(t) = fixed_point {
            let max_weight = t.weight + Weight::from_active_trytes(1) + Weight::new(10, 10);
            let extensions = forward_extend(&b, max_weight);
            assert!(extensions.iter().any(|e| e.c.get_tryte(0, 0, 0) == 1));
        }
    }

    #[test]
    fn backward_extend_every_result_within_budget() {
        let c = single_tryte_state(0, 1, 5, 7);
        let max_weight = Weight::new(100, 100);
        for ext in backward_extend(&c, max_weight) {
            let total = ext.weight_bc + Weight::from_active_trytes(ext.a.get_nr_active_trytes());
            assert!(total <= max_weight);
        }
    }

    #[test]
    fn backward_extend_in_kernel_rejects_single_active_tryte_column() {
        let c = single_tryte_state(0, 0, 0, 5);
        assert!(backward_extend_in_kernel(&c, Weight::new(100, 100)).is_empty());
    }

    #[test]
    fn forward_extend_in_kernel_only_yields_valid_column_activity() {
        let b = single_tryte_state(0, 0, 0, 1);
        let max_weight = Weight::new(20, 20);
        for ext in forward_extend_in_kernel(&b, max_weight) {
            for x in 0..COLUMNS as u8 {
                for z in 0..SLICES as u8 {
                    let count = (0..ROWS as u8).filter(|&y| ext.d.get_trit(x, y, z) != 0).count();
                    assert_ne!(count, 1);
                }
            }
        }
    }
}
