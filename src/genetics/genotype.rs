//! Stored genotypes and the canonical keys the exact calculator buckets them under.

use crate::genetics::model::{AlleleId, IndexedGene};
use serde::{Deserialize, Serialize, Serializer};
use std::cmp::Ordering;
use std::fmt;

/// Zero to two allele ids for one gene.
///
/// Diploid genotypes keep maternal then paternal order; hemizygous genotypes
/// (male X, male Y) hold one allele; a female's Y-linked genotype is empty.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Genotype(Vec<AlleleId>);

impl Genotype {
    pub fn new(alleles: Vec<AlleleId>) -> Self {
        Self(alleles)
    }

    pub fn empty() -> Self {
        Self(Vec::new())
    }

    pub fn homozygous(allele: impl Into<String>) -> Self {
        let allele = allele.into();
        Self(vec![allele.clone(), allele])
    }

    pub fn hemizygous(allele: impl Into<String>) -> Self {
        Self(vec![allele.into()])
    }

    pub fn alleles(&self) -> &[AlleleId] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn first(&self) -> Option<&str> {
        self.0.first().map(String::as_str)
    }

    /// Second stored allele, falling back to the first for single-allele genotypes
    pub fn second(&self) -> Option<&str> {
        self.0.last().map(String::as_str)
    }

    pub fn get(&self, position: usize) -> Option<&str> {
        self.0.get(position).map(String::as_str)
    }

    pub fn contains(&self, allele_id: &str) -> bool {
        self.0.iter().any(|allele| allele == allele_id)
    }

    /// Two stored copies of `allele_id`
    pub fn is_homozygous_for(&self, allele_id: &str) -> bool {
        self.0.len() == 2 && self.0.iter().all(|allele| allele == allele_id)
    }

    /// Exactly one of two stored positions equals `allele_id`
    pub fn is_heterozygous_for(&self, allele_id: &str) -> bool {
        self.0.len() == 2 && self.0.iter().filter(|allele| *allele == allele_id).count() == 1
    }

    /// Single stored copy equal to `allele_id`
    pub fn is_hemizygous_for(&self, allele_id: &str) -> bool {
        self.0.len() == 1 && self.0[0] == allele_id
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }
}

impl From<Vec<AlleleId>> for Genotype {
    fn from(alleles: Vec<AlleleId>) -> Self {
        Self(alleles)
    }
}

impl fmt::Display for Genotype {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for allele in &self.0 {
            f.write_str(allele)?;
        }
        Ok(())
    }
}

/// Structured genotype label used by exact distributions.
///
/// Two ids are kept apart instead of concatenated, so "A"+"AB" and "AA"+"B"
/// never collide.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum GenotypeKey {
    Hemizygous(AlleleId),
    Diploid(AlleleId, AlleleId),
}

impl GenotypeKey {
    /// Canonical diploid key: descending dominance rank, ties alphabetical
    pub fn diploid(gene: &IndexedGene, a: &str, b: &str) -> Self {
        let ordering = gene
            .rank(b)
            .cmp(&gene.rank(a))
            .then_with(|| a.cmp(b));
        match ordering {
            Ordering::Greater => GenotypeKey::Diploid(b.to_string(), a.to_string()),
            _ => GenotypeKey::Diploid(a.to_string(), b.to_string()),
        }
    }

    pub fn hemizygous(allele: impl Into<String>) -> Self {
        GenotypeKey::Hemizygous(allele.into())
    }

    pub fn is_hemizygous(&self) -> bool {
        matches!(self, GenotypeKey::Hemizygous(_))
    }

    /// Stored genotype this key stands for
    pub fn to_genotype(&self) -> Genotype {
        match self {
            GenotypeKey::Hemizygous(allele) => Genotype::hemizygous(allele.clone()),
            GenotypeKey::Diploid(a, b) => Genotype::new(vec![a.clone(), b.clone()]),
        }
    }
}

impl fmt::Display for GenotypeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GenotypeKey::Hemizygous(allele) => f.write_str(allele),
            GenotypeKey::Diploid(a, b) => write!(f, "{}{}", a, b),
        }
    }
}

/// Serialized as a string map key; diploid alleles are separated by "/"
impl Serialize for GenotypeKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        match self {
            GenotypeKey::Hemizygous(allele) => serializer.serialize_str(allele),
            GenotypeKey::Diploid(a, b) => serializer.collect_str(&format_args!("{}/{}", a, b)),
        }
    }
}
