//! In-kernel 2-round state enumeration (the `|K|` mode of §4.5).
//!
//! Enumerates pairs `(A, B = Λ(A))` one active column at a time, restricted
//! to column values with zero trit-sum parity (so every active column of
//! `A` is automatically a valid in-kernel column — a column value with
//! parity 0 has either 2 or 3 nonzero trits, never exactly 1, so the "every
//! active column has 2 or 3 active trits" filter of §4.5 falls out of the
//! parity restriction directly rather than needing a separate mask check).
//! A pair is only projected once `B` is *also* in the kernel, matching the
//! `|K||K|` contract consumed by the KK orchestrator.
//!
//! Like [`crate::bare_state`], this enumerates concrete column values
//! directly rather than separating an activity-pattern tree from a later
//! value-completion pass; see `DESIGN.md` for the grounding note on this
//! simplification relative to §4.5's unit shape `(position, y-mask)`.

use crate::position::{COLUMNS, SLICES};
use crate::state::TroikaState;
use crate::state_iterator::in_kernel_column_values;
use crate::traversal::{BoundedTraversal, Sibling, UnitTree};
use crate::tryte_table;

const NR_POSITIONS: u16 = (COLUMNS * SLICES) as u16;

#[inline]
fn position_xz(position: u16) -> (u8, u8) {
    let z = position / COLUMNS as u16;
    let x = position % COLUMNS as u16;
    (x as u8, z as u8)
}

/// One active in-kernel column placement: position `z*9+x`, and a column
/// value drawn from [`in_kernel_column_values`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct KernelColumnUnit {
    pub position: u16,
    pub value_idx: usize,
}

#[derive(Clone, Debug, Default)]
pub struct MixedKernelCache {
    pub state_a: TroikaState,
}

/// A candidate in-kernel 2-round state pair within budget.
#[derive(Clone, Debug)]
pub struct MixedKernelState {
    pub state_a: TroikaState,
    pub state_b: TroikaState,
    pub w_a: u32,
    pub w_b: u32,
}

pub struct MixedKernelTree {
    pub alpha: u32,
    pub beta: u32,
}

impl MixedKernelTree {
    fn values() -> &'static [u8] {
        in_kernel_column_values()
    }
}

impl UnitTree for MixedKernelTree {
    type Unit = KernelColumnUnit;
    type Cache = MixedKernelCache;
    type Output = MixedKernelState;

    fn first_child(&self, units: &[Self::Unit], _cache: &Self::Cache) -> Option<Self::Unit> {
        let next_position = units.last().map(|u| u.position + 1).unwrap_or(0);
        if next_position >= NR_POSITIONS {
            None
        } else {
            Some(KernelColumnUnit { position: next_position, value_idx: 0 })
        }
    }

    fn next_sibling(
        &self,
        _units: &[Self::Unit],
        _cache: &Self::Cache,
        current: &Self::Unit,
    ) -> Sibling<Self::Unit> {
        if current.value_idx + 1 < Self::values().len() {
            Sibling::Next(KernelColumnUnit { position: current.position, value_idx: current.value_idx + 1 })
        } else if current.position + 1 < NR_POSITIONS {
            Sibling::Next(KernelColumnUnit { position: current.position + 1, value_idx: 0 })
        } else {
            Sibling::NoMore
        }
    }

    fn is_canonical(&self, units: &[Self::Unit]) -> bool {
        // The first placed column must sit at z=0: any pattern whose first
        // active column has z>0 is a non-canonical z-translation of one
        // that does.
        match units.first() {
            None => true,
            Some(first) => position_xz(first.position).1 == 0,
        }
    }

    fn push(&self, unit: &Self::Unit, cache: &mut Self::Cache) {
        let (x, z) = position_xz(unit.position);
        let value = Self::values()[unit.value_idx];
        let [t0, t1, t2] = tryte_table::TRITS[value as usize];
        cache.state_a.set_trit(x, 0, z, t0);
        cache.state_a.set_trit(x, 1, z, t1);
        cache.state_a.set_trit(x, 2, z, t2);
    }

    fn pop(&self, unit: &Self::Unit, cache: &mut Self::Cache) {
        let (x, z) = position_xz(unit.position);
        cache.state_a.set_trit(x, 0, z, 0);
        cache.state_a.set_trit(x, 1, z, 0);
        cache.state_a.set_trit(x, 2, z, 0);
    }

    fn cost(&self, _units: &[Self::Unit], cache: &Self::Cache) -> u64 {
        let w_a = 2 * cache.state_a.get_nr_active_trytes() as u64;
        let w_b = 2 * cache.state_a.l().get_nr_active_trytes() as u64;
        self.alpha as u64 * w_a + self.beta as u64 * w_b
    }

    fn project(&self, units: &[Self::Unit], cache: &Self::Cache) -> Option<Self::Output> {
        if units.is_empty() {
            return None;
        }
        let state_b = cache.state_a.l();
        if !state_b.is_in_kernel() {
            // Not a terminal match at this node, but the search keeps
            // descending from here — a longer pattern may still land B
            // back in the kernel.
            return None;
        }
        Some(MixedKernelState {
            state_a: cache.state_a,
            state_b,
            w_a: 2 * cache.state_a.get_nr_active_trytes(),
            w_b: 2 * state_b.get_nr_active_trytes(),
        })
    }
}

/// Enumerate every `|K||K|` 2-round state pair within
/// `alpha*wA + beta*wB <= max_cost`, both `A` and `Λ(A)` in the kernel.
pub fn enumerate_in_kernel_pairs(alpha: u32, beta: u32, max_cost: u64) -> BoundedTraversal<MixedKernelTree> {
    let tree = MixedKernelTree { alpha, beta };
    BoundedTraversal::new(tree, MixedKernelCache::default(), max_cost)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_emitted_pair_has_both_sides_in_kernel() {
        for pair in enumerate_in_kernel_pairs(1, 1, 8).take(20) {
            assert!(pair.state_a.is_in_kernel());
            assert!(pair.state_b.is_in_kernel());
        }
    }

    #[test]
    fn zero_budget_yields_nothing() {
        assert_eq!(enumerate_in_kernel_pairs(1, 1, 0).count(), 0);
    }
}
