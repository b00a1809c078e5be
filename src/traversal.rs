//! Generic depth-first, weight-bounded tree traversal engine.
//!
//! Every enumerator in this crate (bare states, mixed states, the KK
//! activity-pattern tree) is an instantiation of the same shape: a path of
//! "units" built one at a time, a mutable cache kept in sync with the path
//! via push/pop, a cost bound pruning the search, and a canonicity check
//! that keeps only one representative per symmetry class. This module
//! captures that shape once as a trait plus a driving iterator, instead of
//! letting each enumerator hand-roll its own DFS.
//!
//! The reference algorithm signals "no more siblings at this level" by
//! throwing an exception (`EndOfSet`). That control-flow technique doesn't
//! translate well to Rust; here sibling iteration returns a plain
//! [`Sibling`] enum and the driver matches on it explicitly.

/// Outcome of asking a [`UnitTree`] for the next sibling of the current unit.
pub enum Sibling<U> {
    /// A sibling exists; push it as the new current unit after popping.
    Next(U),
    /// No further sibling exists at this level; pop back to the parent.
    NoMore,
}

/// The policy object driving one traversal: how to grow a unit path and
/// when to stop growing it.
pub trait UnitTree {
    type Unit: Clone;
    type Cache;
    type Output;

    /// First child of the current path, if any unit can be appended at all
    /// (independent of cost — the engine checks cost after pushing).
    fn first_child(&self, units: &[Self::Unit], cache: &Self::Cache) -> Option<Self::Unit>;

    /// Next sibling of `current`, the last unit of `units`.
    fn next_sibling(
        &self,
        units: &[Self::Unit],
        cache: &Self::Cache,
        current: &Self::Unit,
    ) -> Sibling<Self::Unit>;

    /// Whether `units` is the canonical representative of its symmetry
    /// class (e.g. the smallest z-translation). Non-canonical paths are
    /// pruned as soon as they're detected, not merely excluded from output.
    fn is_canonical(&self, units: &[Self::Unit]) -> bool;

    /// Incorporate `unit` (the new last element of the path) into `cache`.
    fn push(&self, unit: &Self::Unit, cache: &mut Self::Cache);

    /// Undo the effect of the most recent `push`.
    fn pop(&self, unit: &Self::Unit, cache: &mut Self::Cache);

    /// Lower bound on the cost of any completion of `units`. The traversal
    /// backtracks as soon as this exceeds `max_cost`.
    fn cost(&self, units: &[Self::Unit], cache: &Self::Cache) -> u64;

    /// Materialize `units`/`cache` as an output value, or `None` if this
    /// path is an internal node with no associated output (e.g. still
    /// missing required structure).
    fn project(&self, units: &[Self::Unit], cache: &Self::Cache) -> Option<Self::Output>;
}

/// Drives a [`UnitTree`] depth-first, yielding one [`UnitTree::Output`] per
/// canonical node within the cost bound, including the root if it projects
/// to `Some`.
pub struct BoundedTraversal<T: UnitTree> {
    tree: T,
    units: Vec<T::Unit>,
    cache: T::Cache,
    max_cost: u64,
    started: bool,
    done: bool,
}

impl<T: UnitTree> BoundedTraversal<T> {
    pub fn new(tree: T, cache: T::Cache, max_cost: u64) -> Self {
        BoundedTraversal { tree, units: Vec::new(), cache, max_cost, started: false, done: false }
    }

    fn within_budget(&self) -> bool {
        self.tree.cost(&self.units, &self.cache) <= self.max_cost
    }

    /// Try to descend to a first child whose cost fits the budget, trying
    /// successive siblings of that child until one fits or none remain.
    fn descend(&mut self) -> bool {
        let Some(mut candidate) = self.tree.first_child(&self.units, &self.cache) else {
            return false;
        };
        loop {
            self.units.push(candidate.clone());
            self.tree.push(&candidate, &mut self.cache);
            if self.within_budget() {
                return true;
            }
            self.tree.pop(&candidate, &mut self.cache);
            let popped = self.units.pop().expect("just pushed");
            match self.tree.next_sibling(&self.units, &self.cache, &popped) {
                Sibling::Next(next) => candidate = next,
                Sibling::NoMore => return false,
            }
        }
    }

    /// Move to the next sibling of the current unit, climbing to ancestors
    /// as siblings are exhausted. Returns `false` once the whole tree is
    /// exhausted.
    fn advance(&mut self) -> bool {
        loop {
            let Some(current) = self.units.last().cloned() else {
                return false;
            };
            self.tree.pop(&current, &mut self.cache);
            self.units.pop();
            match self.tree.next_sibling(&self.units, &self.cache, &current) {
                Sibling::Next(next) => {
                    self.units.push(next.clone());
                    self.tree.push(&next, &mut self.cache);
                    if self.within_budget() {
                        return true;
                    }
                    // The sibling itself is over budget; keep climbing by
                    // popping it and trying its own next sibling.
                    let popped = self.units.pop().expect("just pushed");
                    self.tree.pop(&popped, &mut self.cache);
                    self.units.push(popped);
                    continue;
                }
                Sibling::NoMore => continue,
            }
        }
    }
}

impl<T: UnitTree> Iterator for BoundedTraversal<T> {
    type Item = T::Output;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        loop {
            let moved = if !self.started {
                self.started = true;
                // The empty path is always "visited"; its projection (if
                // any) is yielded before descending.
                true
            } else if self.descend() {
                true
            } else if self.advance() {
                true
            } else {
                self.done = true;
                return None;
            };

            if !moved {
                self.done = true;
                return None;
            }

            if !self.tree.is_canonical(&self.units) {
                continue;
            }
            if let Some(out) = self.tree.project(&self.units, &self.cache) {
                return Some(out);
            }
            // No output at this node; keep descending/advancing from here.
            if self.descend() {
                if !self.tree.is_canonical(&self.units) {
                    continue;
                }
                if let Some(out) = self.tree.project(&self.units, &self.cache) {
                    return Some(out);
                }
                continue;
            }
            if !self.advance() {
                self.done = true;
                return None;
            }
        }
    }
}
