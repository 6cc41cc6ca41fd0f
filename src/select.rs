//! Bounded top-N selection for one result row
//!
//! Candidates are ranked by score, higher first, with the smaller column
//! winning ties. A min-heap of at most N entries keeps the current best; its
//! root is the weakest survivor and is evicted when something better arrives.

use std::cmp::{Ordering, Reverse};
use std::collections::BinaryHeap;

use crate::matrix::Scalar;

/// A `(column, score)` pair ordered by rank
#[derive(Debug, Clone, Copy)]
struct Ranked<T> {
    col: usize,
    score: T,
}

impl<T: PartialOrd> Ord for Ranked<T> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.score
            .partial_cmp(&other.score)
            .unwrap_or(Ordering::Equal)
            .then_with(|| other.col.cmp(&self.col))
    }
}

impl<T: PartialOrd> PartialOrd for Ranked<T> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<T: PartialOrd> PartialEq for Ranked<T> {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl<T: PartialOrd> Eq for Ranked<T> {}

/// Keeps the N best candidates of a row that reach the lower bound
///
/// The heap allocation is reused across rows.
#[derive(Debug)]
pub struct TopNSelector<T> {
    n: usize,
    lower_bound: T,
    heap: BinaryHeap<Reverse<Ranked<T>>>,
}

impl<T: Scalar> TopNSelector<T> {
    /// Creates a selector keeping at most `n` entries with score `>= lower_bound`
    ///
    /// `n` must be at least 1; callers validate it.
    pub fn new(n: usize, lower_bound: T) -> Self {
        debug_assert!(n >= 1, "top-N selector needs n >= 1");
        Self {
            n,
            lower_bound,
            // +1 so a push-then-pop never reallocates
            heap: BinaryHeap::with_capacity(n.saturating_add(1).min(4096)),
        }
    }

    pub fn n(&self) -> usize {
        self.n
    }

    /// Selects from `candidates` into `out`, best first
    ///
    /// `out` is cleared first. Returns how many candidates reached the lower
    /// bound before the N cap was applied.
    pub fn select(&mut self, candidates: &[(usize, T)], out: &mut Vec<(usize, T)>) -> usize {
        out.clear();
        self.heap.clear();

        let mut passed = 0;
        for &(col, score) in candidates {
            // Written as a negated `>=` so incomparable scores are skipped too
            if !(score >= self.lower_bound) {
                continue;
            }
            passed += 1;

            let candidate = Ranked { col, score };
            if self.heap.len() < self.n {
                self.heap.push(Reverse(candidate));
            } else if let Some(mut weakest) = self.heap.peek_mut() {
                if candidate > weakest.0 {
                    *weakest = Reverse(candidate);
                }
            }
        }

        out.extend(self.heap.drain().map(|Reverse(r)| (r.col, r.score)));
        out.sort_unstable_by(|x, y| {
            Ranked { col: y.0, score: y.1 }.cmp(&Ranked { col: x.0, score: x.1 })
        });
        passed
    }
}
