//! Individuals: a sex plus one normalized genotype per gene.

use crate::genetics::genotype::Genotype;
use crate::genetics::model::GeneId;
use crate::genetics::sex::Sex;
use serde::Serialize;
use std::collections::BTreeMap;

/// A normalized individual.
///
/// Only the engine builds these, so every model gene has an entry whose
/// allele count matches its chromosome and the individual's sex.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Individual {
    sex: Sex,
    genotypes: BTreeMap<GeneId, Genotype>,
}

impl Individual {
    pub(crate) fn from_parts(sex: Sex, genotypes: BTreeMap<GeneId, Genotype>) -> Self {
        Self { sex, genotypes }
    }

    pub fn sex(&self) -> Sex {
        self.sex
    }

    pub fn genotype(&self, gene_id: &str) -> Option<&Genotype> {
        self.genotypes.get(gene_id)
    }

    pub fn genotypes(&self) -> &BTreeMap<GeneId, Genotype> {
        &self.genotypes
    }

    pub fn is_male(&self) -> bool {
        self.sex == Sex::Male
    }
}
