//! The Troika Sbox: its difference distribution table and the derived
//! compatibility tables used to drive extension iterators.
//!
//! The tables are built once behind a [`std::sync::OnceLock`] and handed out
//! as a `&'static Sbox` — the idiomatic replacement for the reference
//! implementation's static-initialization side-effect flag (see the
//! "source patterns requiring re-architecture" notes).

use std::sync::OnceLock;

use crate::tryte_table::{self, HAMMING_WEIGHT};
use crate::weight::Weight;

/// The fixed Troika Sbox permutation over tryte values `0..27`.
pub const SBOX: [u8; 27] = [
    6, 25, 17, 5, 15, 10, 4, 20, 24, 0, 1, 2, 9, 22, 26, 18, 16, 14, 3, 13, 23, 7, 11, 12, 8, 21, 19,
];

/// One possible output difference compatible with a given input difference
/// (or vice versa), with its transition weight.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Transition {
    pub value: u8,
    pub weight: Weight,
}

/// A single in-kernel output tryte-column (three sorted tryte values) that a
/// given box-column before ST can transition to, ordered ascending by cost.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TryteColumnTransition {
    pub trytes: [u8; 3],
    pub weight: Weight,
}

impl TryteColumnTransition {
    /// `2*hammingWeight + weight`, the ordering key used to sort candidate
    /// in-kernel tryte-columns so extension iterators can prune on the
    /// cheapest-remaining-candidate bound.
    pub fn cost(&self) -> i64 {
        let hamming: u32 = self.trytes.iter().map(|&t| HAMMING_WEIGHT[t as usize] as u32).sum();
        2 * hamming as i64 + self.weight.integer + self.weight.log_part
    }
}

pub struct Sbox {
    ddt: [[u8; 27]; 27],
    /// `output_diff[in]` = every `(out, weight)` pair reachable from `in`, sorted by weight.
    output_diff: Vec<Vec<Transition>>,
    /// `input_diff[out]` = every `(in, weight)` pair that reaches `out`, sorted by weight.
    input_diff: Vec<Vec<Transition>>,
    /// For a fixed in-kernel input box-column `(i,j,k)` with `i>=j>=k`, the
    /// in-kernel output box-columns it can transition to, sorted ascending
    /// by cost.
    in_kernel_before_st: Vec<Vec<TryteColumnTransition>>,
}

fn ddt_weight(count: u8) -> Weight {
    Weight::from_ddt_value(count)
}

fn build_ddt() -> [[u8; 27]; 27] {
    let mut ddt = [[0u8; 27]; 27];
    for x in 0..27u8 {
        for din in 0..27u8 {
            let dout = tryte_table::sub(SBOX[tryte_table::add(x, din) as usize], SBOX[x as usize]);
            ddt[dout as usize][din as usize] += 1;
        }
    }
    ddt
}

fn build_output_diff(ddt: &[[u8; 27]; 27]) -> Vec<Vec<Transition>> {
    let mut table = vec![Vec::new(); 27];
    for din in 0..27usize {
        let mut entries: Vec<Transition> = (0..27usize)
            .filter_map(|dout| {
                let count = ddt[dout][din];
                if count == 0 {
                    None
                } else {
                    Some(Transition { value: dout as u8, weight: ddt_weight(count) })
                }
            })
            .collect();
        entries.sort_by_key(|t| (t.weight.integer, t.weight.log_part));
        table[din] = entries;
    }
    table
}

fn build_input_diff(ddt: &[[u8; 27]; 27]) -> Vec<Vec<Transition>> {
    let mut table = vec![Vec::new(); 27];
    for dout in 0..27usize {
        let mut entries: Vec<Transition> = (0..27usize)
            .filter_map(|din| {
                let count = ddt[dout][din];
                if count == 0 {
                    None
                } else {
                    Some(Transition { value: din as u8, weight: ddt_weight(count) })
                }
            })
            .collect();
        entries.sort_by_key(|t| (t.weight.integer, t.weight.log_part));
        table[dout] = entries;
    }
    table
}

fn is_in_kernel_tryte_sum(a: u8, b: u8, c: u8) -> bool {
    // A box-column is in-kernel iff the trit-wise sum of its three trytes is
    // all-zero (every one of the three trit lanes sums to 0 mod 3).
    let sum = tryte_table::add(tryte_table::add(a, b), c);
    sum == 0
}

fn box_column_index(a: u8, b: u8, c: u8) -> (u8, u8, u8) {
    let mut v = [a, b, c];
    v.sort_unstable_by(|x, y| y.cmp(x));
    (v[0], v[1], v[2])
}

fn build_in_kernel_before_st(
    input_diff: &[Vec<Transition>],
) -> Vec<Vec<TryteColumnTransition>> {
    // Indexed by a flattened (i>=j>=k) key; built densely over all 27^3
    // combinations then grouped by the sorted output key.
    use std::collections::BTreeMap;
    let mut grouped: BTreeMap<(u8, u8, u8), Vec<TryteColumnTransition>> = BTreeMap::new();

    for a in 0..27u8 {
        for b in 0..27u8 {
            for c in 0..27u8 {
                if a < b || b < c {
                    continue;
                }
                if !is_in_kernel_tryte_sum(a, b, c) {
                    continue;
                }
                // For every combination of one compatible input difference
                // per tryte, check whether the resulting input box-column is
                // itself in-kernel; if so record it as a candidate for this
                // output key with the summed weight.
                for ta in &input_diff[a as usize] {
                    for tb in &input_diff[b as usize] {
                        for tc in &input_diff[c as usize] {
                            if !is_in_kernel_tryte_sum(ta.value, tb.value, tc.value) {
                                continue;
                            }
                            let weight = ta.weight + tb.weight + tc.weight;
                            let key = box_column_index(a, b, c);
                            let (i, j, k) = box_column_index(ta.value, tb.value, tc.value);
                            grouped.entry(key).or_default().push(TryteColumnTransition {
                                trytes: [i, j, k],
                                weight,
                            });
                        }
                    }
                }
            }
        }
    }

    let mut table = vec![Vec::new(); 27 * 27 * 27];
    for ((i, j, k), mut entries) in grouped {
        entries.sort_by_key(|t| t.cost());
        entries.dedup_by_key(|t| t.trytes);
        table[flatten_box_key(i, j, k)] = entries;
    }
    table
}

#[inline]
fn flatten_box_key(i: u8, j: u8, k: u8) -> usize {
    i as usize * 27 * 27 + j as usize * 27 + k as usize
}

impl Sbox {
    pub fn ddt(&self, dout: u8, din: u8) -> u8 {
        self.ddt[dout as usize][din as usize]
    }

    pub fn transitions_from(&self, din: u8) -> &[Transition] {
        &self.output_diff[din as usize]
    }

    pub fn transitions_to(&self, dout: u8) -> &[Transition] {
        &self.input_diff[dout as usize]
    }

    /// In-kernel input box-columns compatible with in-kernel output
    /// box-column `(i,j,k)` (`i>=j>=k`), sorted ascending by cost.
    pub fn in_kernel_before_st(&self, i: u8, j: u8, k: u8) -> &[TryteColumnTransition] {
        let (i, j, k) = box_column_index(i, j, k);
        &self.in_kernel_before_st[flatten_box_key(i, j, k)]
    }

    /// Check ST-compatibility of `in_state` against `out_state` over the
    /// given active tryte positions, accumulating the transition weight.
    /// Fails closed at the first incompatible tryte.
    pub fn are_st_compatible(
        &self,
        input_trytes: impl IntoIterator<Item = (u8, u8)>,
        weight: &mut Weight,
    ) -> bool {
        for (din, dout) in input_trytes {
            match self
                .transitions_from(din)
                .iter()
                .find(|t| t.value == dout)
            {
                Some(t) => *weight += t.weight,
                None => return false,
            }
        }
        true
    }

    pub fn is_in_kernel_tryte_column(a: u8, b: u8, c: u8) -> bool {
        is_in_kernel_tryte_sum(a, b, c)
    }
}

static SBOX_TABLES: OnceLock<Sbox> = OnceLock::new();

/// The process-wide Sbox tables, built on first use.
pub fn sbox() -> &'static Sbox {
    SBOX_TABLES.get_or_init(|| {
        let ddt = build_ddt();
        let output_diff = build_output_diff(&ddt);
        let input_diff = build_input_diff(&ddt);
        let in_kernel_before_st = build_in_kernel_before_st(&input_diff);
        Sbox { ddt, output_diff, input_diff, in_kernel_before_st }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ddt_rows_and_columns_sum_to_27() {
        let s = sbox();
        for dout in 0..27u8 {
            let row_sum: u32 = (0..27u8).map(|din| s.ddt(dout, din) as u32).sum();
            assert_eq!(row_sum, 27);
        }
        for din in 0..27u8 {
            let col_sum: u32 = (0..27u8).map(|dout| s.ddt(dout, din) as u32).sum();
            assert_eq!(col_sum, 27);
        }
    }

    #[test]
    fn zero_difference_maps_to_zero_with_zero_weight() {
        let s = sbox();
        let transitions = s.transitions_from(0);
        let zero = transitions.iter().find(|t| t.value == 0).unwrap();
        assert_eq!(zero.weight, Weight::ZERO);
    }

    #[test]
    fn sbox_is_a_permutation() {
        let mut seen = [false; 27];
        for &v in SBOX.iter() {
            assert!(!seen[v as usize], "sbox is not injective");
            seen[v as usize] = true;
        }
    }
}
