//! Stochastic meiosis: one gamete per call, honoring linkage and sex chromosomes.

use crate::error::{GeneticsError, Result};
use crate::genetics::genotype::Genotype;
use crate::genetics::individual::Individual;
use crate::genetics::model::{AlleleId, ChromosomeType, GeneId, GeneticModel, IndexedGene};
use crate::genetics::sex::Sex;
use rand::Rng;
use std::collections::HashMap;

/// One allele per transmitted gene plus the sex determinant carried
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Gamete {
    alleles: HashMap<GeneId, AlleleId>,
    carries_x: bool,
    carries_y: bool,
}

impl Gamete {
    pub fn allele(&self, gene_id: &str) -> Option<&str> {
        self.alleles.get(gene_id).map(String::as_str)
    }

    pub fn carries_x(&self) -> bool {
        self.carries_x
    }

    pub fn carries_y(&self) -> bool {
        self.carries_y
    }

    pub fn len(&self) -> usize {
        self.alleles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.alleles.is_empty()
    }

    /// Allele for a gene the gamete is expected to carry
    pub fn require_allele(&self, gene_id: &str) -> Result<&str> {
        self.allele(gene_id).ok_or_else(|| {
            GeneticsError::consistency(format!("Gamete missing allele for gene '{}'", gene_id))
        })
    }
}

/// Whether a gene on `chromosome` is transmitted by a parent of `sex`
/// whose gamete carries the X determinant (`passes_x`) or the Y.
pub fn transmits(chromosome: ChromosomeType, sex: Sex, passes_x: bool) -> bool {
    match (chromosome, sex) {
        (ChromosomeType::Autosomal, _) => true,
        (ChromosomeType::X, Sex::Female) => true,
        (ChromosomeType::X, Sex::Male) => passes_x,
        (ChromosomeType::Y, Sex::Female) => false,
        (ChromosomeType::Y, Sex::Male) => !passes_x,
    }
}

/// Draws gametes from individuals of one genetic model
#[derive(Clone, Copy, Debug)]
pub struct GameteGenerator<'m> {
    model: &'m GeneticModel,
}

impl<'m> GameteGenerator<'m> {
    pub fn new(model: &'m GeneticModel) -> Self {
        Self { model }
    }

    /// Generate one gamete from `parent`
    pub fn generate<R: Rng + ?Sized>(&self, parent: &Individual, rng: &mut R) -> Result<Gamete> {
        let sex = parent.sex();
        let passes_x = match sex {
            Sex::Female => true,
            Sex::Male => rng.gen_bool(0.5),
        };

        let mut gamete = Gamete {
            alleles: HashMap::with_capacity(self.model.gene_count()),
            carries_x: passes_x,
            carries_y: !passes_x,
        };

        for group in self.model.linkage_groups() {
            // Homolog currently being walked; None until the anchor is drawn
            let mut homolog: Option<usize> = None;

            for gene in self.model.group_members(group) {
                let genotype = stored_genotype(parent, gene)?;
                if !transmits(gene.chromosome(), sex, passes_x) {
                    continue;
                }

                let allele = if genotype.len() >= 2 {
                    let position = match homolog {
                        None => rng.gen_range(0..2),
                        Some(previous) => {
                            if rng.gen_bool(gene.recombination_probability()) {
                                log::trace!(
                                    "Crossover before gene '{}' in linkage group {}",
                                    gene.id(),
                                    group.id
                                );
                                1 - previous
                            } else {
                                previous
                            }
                        }
                    };
                    homolog = Some(position);
                    genotype.get(position)
                } else {
                    genotype.first()
                };

                gamete
                    .alleles
                    .insert(gene.id().to_string(), eligible_allele(gene, allele)?);
            }
        }

        for gene in self.model.genes() {
            if gene.linkage_group().is_some() {
                continue;
            }
            let genotype = stored_genotype(parent, gene)?;
            if !transmits(gene.chromosome(), sex, passes_x) {
                continue;
            }

            let allele = if genotype.len() >= 2 {
                genotype.get(rng.gen_range(0..2))
            } else {
                genotype.first()
            };

            gamete
                .alleles
                .insert(gene.id().to_string(), eligible_allele(gene, allele)?);
        }

        Ok(gamete)
    }
}

fn stored_genotype<'a>(parent: &'a Individual, gene: &IndexedGene) -> Result<&'a Genotype> {
    parent.genotype(gene.id()).ok_or_else(|| {
        GeneticsError::consistency(format!("Individual missing genotype for gene '{}'", gene.id()))
    })
}

fn eligible_allele(gene: &IndexedGene, allele: Option<&str>) -> Result<AlleleId> {
    allele.map(str::to_string).ok_or_else(|| {
        GeneticsError::consistency(format!(
            "Gene '{}' has no stored allele to transmit",
            gene.id()
        ))
    })
}
