//! Undirected lookup over distance constraints.
//!
//! Pairs are keyed by the lexicographically ordered endpoint ids, so `(a, b)`
//! and `(b, a)` hit the same entry. Duplicates are kept in input order and
//! collapsed according to `DuplicatePolicy` at lookup time.
//!
//! Lookups only see usable measurements (finite and positive). Anything else
//! counts as a missing edge for placement and is reported by the metrics
//! cross-check instead.

use std::collections::HashMap;

use crate::cfg::DuplicatePolicy;
use crate::model::DistanceConstraint;
use crate::units::Unit;

/// Borrowed index over a constraint slice, expressed in one working unit.
#[derive(Clone, Debug)]
pub struct ConstraintSet<'a> {
    constraints: &'a [DistanceConstraint],
    by_pair: HashMap<(&'a str, &'a str), Vec<usize>>,
    unit: Unit,
    policy: DuplicatePolicy,
}

/// Finite and strictly positive.
#[inline]
pub fn is_usable_distance(d: f64) -> bool {
    d.is_finite() && d > 0.0
}

#[inline]
fn pair_key<'s>(a: &'s str, b: &'s str) -> (&'s str, &'s str) {
    if a <= b {
        (a, b)
    } else {
        (b, a)
    }
}

impl<'a> ConstraintSet<'a> {
    pub fn new(constraints: &'a [DistanceConstraint], unit: Unit, policy: DuplicatePolicy) -> Self {
        let mut by_pair: HashMap<(&'a str, &'a str), Vec<usize>> = HashMap::new();
        for (k, c) in constraints.iter().enumerate() {
            by_pair
                .entry(pair_key(&c.point_a_id, &c.point_b_id))
                .or_default()
                .push(k);
        }
        Self {
            constraints,
            by_pair,
            unit,
            policy,
        }
    }

    #[inline]
    pub fn unit(&self) -> Unit {
        self.unit
    }

    /// Distance between `a` and `b` in the working unit, if usably measured.
    pub fn between(&self, a: &str, b: &str) -> Option<f64> {
        let idx = self.by_pair.get(&pair_key(a, b))?;
        let mut usable = idx
            .iter()
            .map(|&k| self.constraints[k].distance_in(self.unit))
            .filter(|d| is_usable_distance(*d));
        match self.policy {
            DuplicatePolicy::FirstMatch => usable.next(),
            DuplicatePolicy::Average => {
                let (sum, n) = usable.fold((0.0, 0usize), |(s, n), d| (s + d, n + 1));
                (n > 0).then(|| sum / n as f64)
            }
        }
    }

    /// First constraint stored for the unordered pair.
    pub fn first(&self, a: &str, b: &str) -> Option<&'a DistanceConstraint> {
        let idx = self.by_pair.get(&pair_key(a, b))?;
        idx.first().map(|&k| &self.constraints[k])
    }

    /// Unordered pairs measured more than once, with their multiplicity.
    pub fn duplicates(&self) -> Vec<((&'a str, &'a str), usize)> {
        let mut out: Vec<_> = self
            .by_pair
            .iter()
            .filter(|(_, v)| v.len() > 1)
            .map(|(k, v)| (*k, v.len()))
            .collect();
        out.sort();
        out
    }

    pub fn iter(&self) -> impl Iterator<Item = &'a DistanceConstraint> {
        self.constraints.iter()
    }

    pub fn len(&self) -> usize {
        self.constraints.len()
    }

    pub fn is_empty(&self) -> bool {
        self.constraints.is_empty()
    }
}
