//! Discrete probability distributions keyed by allele, genotype or phenotype label.

use crate::genetics::genotype::GenotypeKey;
use crate::genetics::model::AlleleId;
use rand::Rng;
use serde::Serialize;
use std::borrow::Borrow;
use std::collections::btree_map;
use std::collections::BTreeMap;

/// Probability mass per key, iterated in key order
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Distribution<K: Ord> {
    entries: BTreeMap<K, f64>,
}

/// Allele transmitted by one parent
pub type AlleleDistribution = Distribution<AlleleId>;
/// Offspring genotype for one gene
pub type GenotypeDistribution = Distribution<GenotypeKey>;
/// Offspring phenotype label (per gene or joint)
pub type PhenotypeDistribution = Distribution<String>;

impl<K: Ord> Default for Distribution<K> {
    fn default() -> Self {
        Self {
            entries: BTreeMap::new(),
        }
    }
}

impl<K: Ord> Distribution<K> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add mass to a key, accumulating with any existing mass
    pub fn add(&mut self, key: K, probability: f64) {
        *self.entries.entry(key).or_insert(0.0) += probability;
    }

    /// Mass stored for `key` (0 when absent)
    pub fn probability<Q>(&self, key: &Q) -> f64
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.entries.get(key).copied().unwrap_or(0.0)
    }

    pub fn contains<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.entries.contains_key(key)
    }

    pub fn total(&self) -> f64 {
        self.entries.values().sum()
    }

    /// Rescale so the masses sum to 1 (no-op for an empty or zero-mass distribution)
    pub fn normalize(&mut self) {
        let total = self.total();
        if total > 0.0 {
            for value in self.entries.values_mut() {
                *value /= total;
            }
        }
    }

    pub fn normalized(mut self) -> Self {
        self.normalize();
        self
    }

    pub fn scale(&mut self, factor: f64) {
        for value in self.entries.values_mut() {
            *value *= factor;
        }
    }

    /// Normalize, then express masses as percentages summing to 100
    pub fn to_percentages(mut self) -> Self {
        self.normalize();
        self.scale(100.0);
        self
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> btree_map::Iter<'_, K, f64> {
        self.entries.iter()
    }

    pub fn keys(&self) -> btree_map::Keys<'_, K, f64> {
        self.entries.keys()
    }

    /// Key with the highest mass (first in key order on ties)
    pub fn most_likely(&self) -> Option<(&K, f64)> {
        self.entries
            .iter()
            .fold(None, |best: Option<(&K, f64)>, (key, &value)| match best {
                Some((_, best_value)) if best_value >= value => best,
                _ => Some((key, value)),
            })
    }

    /// Draw a key in proportion to its mass.
    ///
    /// Rounding fall-through lands on the last key; empty or zero-mass
    /// distributions yield `None`.
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> Option<&K> {
        let total = self.total();
        if total <= 0.0 {
            return None;
        }

        let target = rng.gen::<f64>() * total;
        let mut cumulative = 0.0;
        for (key, value) in &self.entries {
            cumulative += value;
            if target < cumulative {
                return Some(key);
            }
        }
        self.entries.keys().next_back()
    }

    pub fn as_map(&self) -> &BTreeMap<K, f64> {
        &self.entries
    }

    pub fn into_map(self) -> BTreeMap<K, f64> {
        self.entries
    }
}

impl<K: Ord> FromIterator<(K, f64)> for Distribution<K> {
    fn from_iter<I: IntoIterator<Item = (K, f64)>>(iter: I) -> Self {
        let mut distribution = Self::new();
        for (key, probability) in iter {
            distribution.add(key, probability);
        }
        distribution
    }
}

impl<K: Ord> IntoIterator for Distribution<K> {
    type Item = (K, f64);
    type IntoIter = btree_map::IntoIter<K, f64>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

impl<'a, K: Ord> IntoIterator for &'a Distribution<K> {
    type Item = (&'a K, &'a f64);
    type IntoIter = btree_map::Iter<'a, K, f64>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}
