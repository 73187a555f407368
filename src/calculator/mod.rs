//! Exact cross calculator: full genotype and phenotype distributions
//! instead of single stochastic samples.
//!
//! Each gene runs through the chain
//! genotype pair → allele PMF pair → genotype PMF → phenotype PMF,
//! and joint distributions multiply independent per-gene phenotype PMFs.

pub mod distribution;

pub use distribution::{AlleleDistribution, Distribution, GenotypeDistribution, PhenotypeDistribution};

use crate::error::{GeneticsError, Result};
use crate::genetics::genotype::{Genotype, GenotypeKey};
use crate::genetics::individual::Individual;
use crate::genetics::model::{ChromosomeType, GeneId, GeneticModel, IndexedGene};
use crate::genetics::sex::Sex;
use crate::phenotype::{self, ModifierChain};
use serde::Serialize;
use std::collections::{BTreeMap, HashSet};

/// Separator between per-gene labels in a joint phenotype label
pub const JOINT_SEPARATOR: &str = " + ";

/// Joint enumerations above this many combinations are logged as warnings
const LARGE_JOINT_ENUMERATION: usize = 10_000;

/// Genotype and phenotype distributions for one gene of a cross
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct TraitResult {
    pub genotypic_ratios: GenotypeDistribution,
    pub phenotypic_ratios: PhenotypeDistribution,
}

impl TraitResult {
    fn to_percentages(self) -> Self {
        Self {
            genotypic_ratios: self.genotypic_ratios.to_percentages(),
            phenotypic_ratios: self.phenotypic_ratios.to_percentages(),
        }
    }
}

/// Punnett-square enumeration over a frozen genetic model
#[derive(Clone, Copy, Debug)]
pub struct ExactCalculator<'e> {
    model: &'e GeneticModel,
    chain: &'e ModifierChain,
    max_joint_genes: Option<usize>,
}

impl<'e> ExactCalculator<'e> {
    pub fn new(model: &'e GeneticModel, chain: &'e ModifierChain) -> Self {
        Self {
            model,
            chain,
            max_joint_genes: None,
        }
    }

    /// Cap on the number of genes a joint request may combine
    pub fn with_max_joint_genes(mut self, limit: Option<usize>) -> Self {
        self.max_joint_genes = limit;
        self
    }

    /// Allele PMF one parent transmits for `gene`.
    ///
    /// A male transmits his single X or Y allele with certainty along the
    /// paths where that chromosome is inherited; a female transmits nothing
    /// for Y-linked genes.
    pub fn gamete_probabilities(&self, gene: &IndexedGene, genotype: &Genotype, sex: Sex) -> AlleleDistribution {
        let mut pmf = AlleleDistribution::new();

        match (gene.chromosome(), sex) {
            (ChromosomeType::Y, Sex::Female) => {}
            (ChromosomeType::X, Sex::Male) | (ChromosomeType::Y, Sex::Male) => {
                if let Some(allele) = genotype.first() {
                    pmf.add(allele.to_string(), 1.0);
                }
            }
            _ => {
                let share = 1.0 / genotype.len().max(1) as f64;
                for allele in genotype.iter() {
                    pmf.add(allele.to_string(), share);
                }
            }
        }

        pmf
    }

    /// Cartesian product of two allele PMFs, bucketed by canonical genotype.
    ///
    /// When exactly one side is empty (a Y-linked gene), each allele of the
    /// other side becomes a hemizygous bucket.
    pub fn combine_gametes(
        &self,
        gene: &IndexedGene,
        first: &AlleleDistribution,
        second: &AlleleDistribution,
    ) -> GenotypeDistribution {
        match (first.is_empty(), second.is_empty()) {
            (true, true) => GenotypeDistribution::new(),
            (false, true) | (true, false) => {
                let present = if first.is_empty() { second } else { first };
                present
                    .iter()
                    .map(|(allele, &p)| (GenotypeKey::hemizygous(allele.clone()), p))
                    .collect()
            }
            (false, false) => {
                let mut genotypes = GenotypeDistribution::new();
                for (a, &p) in first {
                    for (b, &q) in second {
                        genotypes.add(GenotypeKey::diploid(gene, a, b), p * q);
                    }
                }
                genotypes
            }
        }
    }

    /// Label each genotype bucket through dominance and the modifier chain.
    ///
    /// Hemizygous buckets are expressed as males, diploid buckets as females.
    /// Diploid buckets keep canonical order, so an Incomplete gene's blend
    /// weight applies to the higher-ranked allele.
    pub fn genotypes_to_phenotypes(
        &self,
        gene: &IndexedGene,
        genotypes: &GenotypeDistribution,
    ) -> Result<PhenotypeDistribution> {
        let mut phenotypes = PhenotypeDistribution::new();

        for (key, &probability) in genotypes {
            let sex = if key.is_hemizygous() { Sex::Male } else { Sex::Female };
            let mut genotype_map = BTreeMap::new();
            genotype_map.insert(gene.id().to_string(), key.to_genotype());
            let individual = Individual::from_parts(sex, genotype_map);

            let expressed = phenotype::express(self.model, self.chain, &individual)?;
            phenotypes.add(expressed.label(), probability);
        }

        Ok(phenotypes)
    }

    /// Normalized genotype and phenotype distributions for one gene.
    ///
    /// A Y-linked gene crossed between two males is a validation error.
    pub fn cross_gene(&self, gene: &IndexedGene, parent1: &Individual, parent2: &Individual) -> Result<TraitResult> {
        if gene.chromosome() == ChromosomeType::Y && parent1.is_male() && parent2.is_male() {
            return Err(GeneticsError::validation(format!(
                "Gene '{}' is Y-linked; a cross needs at most one male parent",
                gene.id()
            )));
        }

        let first = self.gamete_probabilities(gene, parent_genotype(parent1, gene)?, parent1.sex());
        let second = self.gamete_probabilities(gene, parent_genotype(parent2, gene)?, parent2.sex());

        let genotypic_ratios = self.combine_gametes(gene, &first, &second).normalized();
        let phenotypic_ratios = self
            .genotypes_to_phenotypes(gene, &genotypic_ratios)?
            .normalized();

        log::debug!(
            "Gene '{}': {} genotype(s), {} phenotype(s)",
            gene.id(),
            genotypic_ratios.len(),
            phenotypic_ratios.len()
        );

        Ok(TraitResult {
            genotypic_ratios,
            phenotypic_ratios,
        })
    }

    /// Per-gene distributions for a cross.
    ///
    /// An empty `gene_ids` selects every gene in the model; repeated ids are
    /// computed once; unknown ids are validation errors.
    pub fn calculate_cross<S: AsRef<str>>(
        &self,
        parent1: &Individual,
        parent2: &Individual,
        gene_ids: &[S],
        as_percentages: bool,
    ) -> Result<BTreeMap<GeneId, TraitResult>> {
        let mut results = BTreeMap::new();

        for gene in self.requested_genes(gene_ids)? {
            let result = self.cross_gene(gene, parent1, parent2)?;
            let result = if as_percentages { result.to_percentages() } else { result };
            results.insert(gene.id().to_string(), result);
        }

        Ok(results)
    }

    /// Joint phenotype distribution across the requested genes.
    ///
    /// Labels are the per-gene labels in request order joined with
    /// `JOINT_SEPARATOR`; probabilities are products of the per-gene
    /// probabilities. Genes with an empty distribution contribute no label.
    pub fn calculate_joint_phenotypes<S: AsRef<str>>(
        &self,
        parent1: &Individual,
        parent2: &Individual,
        gene_ids: &[S],
        as_percentages: bool,
    ) -> Result<PhenotypeDistribution> {
        let genes = self.requested_genes(gene_ids)?;

        if let Some(limit) = self.max_joint_genes {
            if genes.len() > limit {
                return Err(GeneticsError::validation(format!(
                    "Joint phenotype request covers {} genes, limit is {}",
                    genes.len(),
                    limit
                )));
            }
        }

        let mut per_gene = Vec::with_capacity(genes.len());
        for gene in &genes {
            let phenotypes = self.cross_gene(gene, parent1, parent2)?.phenotypic_ratios;
            if !phenotypes.is_empty() {
                per_gene.push(phenotypes);
            }
        }
        if per_gene.is_empty() {
            return Ok(PhenotypeDistribution::new());
        }

        let combinations: usize = per_gene.iter().map(Distribution::len).product();
        if combinations > LARGE_JOINT_ENUMERATION {
            log::warn!(
                "Joint phenotype enumeration over {} genes yields {} combinations",
                per_gene.len(),
                combinations
            );
        } else {
            log::debug!("Joint phenotype enumeration: {} combinations", combinations);
        }

        let joint = per_gene
            .iter()
            .fold(vec![(Vec::<&str>::new(), 1.0)], |partial, phenotypes| {
                partial
                    .iter()
                    .flat_map(|(labels, p)| {
                        phenotypes.iter().map(move |(label, q)| {
                            let mut labels = labels.clone();
                            labels.push(label.as_str());
                            (labels, p * q)
                        })
                    })
                    .collect()
            })
            .into_iter()
            .map(|(labels, p)| (labels.join(JOINT_SEPARATOR), p))
            .collect::<PhenotypeDistribution>()
            .normalized();

        Ok(if as_percentages { joint.to_percentages() } else { joint })
    }

    fn requested_genes<S: AsRef<str>>(&self, gene_ids: &[S]) -> Result<Vec<&'e IndexedGene>> {
        if gene_ids.is_empty() {
            return Ok(self.model.genes().iter().collect());
        }

        let mut seen = HashSet::new();
        let mut genes = Vec::with_capacity(gene_ids.len());
        for gene_id in gene_ids.iter().map(AsRef::as_ref) {
            let gene = self.model.require_gene(gene_id)?;
            if seen.insert(gene_id) {
                genes.push(gene);
            }
        }
        Ok(genes)
    }
}

fn parent_genotype<'a>(parent: &'a Individual, gene: &IndexedGene) -> Result<&'a Genotype> {
    parent.genotype(gene.id()).ok_or_else(|| {
        GeneticsError::consistency(format!("Parent missing genotype for gene '{}'", gene.id()))
    })
}
