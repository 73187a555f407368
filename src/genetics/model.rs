//! Gene, allele and epistasis definitions plus the lookup indices built from them.
//!
//! Definitions are plain serde records read from configuration. `GeneticModel`
//! validates them once and freezes them together with the indices every other
//! component reads: gene by id, allele by id per gene, linkage-group membership
//! and linkage-group trait ids.

use crate::error::{GeneticsError, Result};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

pub type GeneId = String;
pub type AlleleId = String;
pub type TraitId = String;

/// Where a gene lives, which decides how many copies each sex carries
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChromosomeType {
    #[default]
    Autosomal,
    #[serde(alias = "x_linked", alias = "xlinked", alias = "X")]
    X,
    #[serde(alias = "y_linked", alias = "ylinked", alias = "Y")]
    Y,
}

impl ChromosomeType {
    pub fn is_sex_linked(self) -> bool {
        self != ChromosomeType::Autosomal
    }
}

/// How two different alleles of one gene combine into a trait
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DominancePattern {
    #[default]
    Complete,
    #[serde(alias = "codominance")]
    Codominant,
    Incomplete,
}

/// Genotype condition an epistasis rule checks on its regulator gene
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AlleleRequirement {
    #[default]
    Present,
    Homozygous,
    Heterozygous,
    Hemizygous,
}

/// What an epistasis rule does to its target trait once triggered
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EpistasisAction {
    #[default]
    #[serde(alias = "mask_trait", alias = "masktrait")]
    Mask,
    #[serde(alias = "modify_trait", alias = "modifytrait")]
    Modify,
}

/// Contribution of one allele to one trait
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AlleleEffect {
    pub trait_id: TraitId,
    #[serde(default)]
    pub magnitude: f64,
    /// Qualitative descriptor; empty for purely quantitative effects
    #[serde(default, alias = "descriptor")]
    pub description: String,
    /// Descriptor used when this allele is blended under incomplete dominance
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub intermediate_descriptor: Option<String>,
}

impl AlleleEffect {
    pub fn new(trait_id: impl Into<String>, magnitude: f64, description: impl Into<String>) -> Self {
        Self {
            trait_id: trait_id.into(),
            magnitude,
            description: description.into(),
            intermediate_descriptor: None,
        }
    }

    pub fn with_intermediate(mut self, descriptor: impl Into<String>) -> Self {
        self.intermediate_descriptor = Some(descriptor.into());
        self
    }

    /// Intermediate descriptor, if set and non-empty
    pub fn intermediate(&self) -> Option<&str> {
        self.intermediate_descriptor
            .as_deref()
            .filter(|descriptor| !descriptor.is_empty())
    }
}

/// One variant of a gene
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Allele {
    pub id: AlleleId,
    /// Higher rank dominates lower rank
    #[serde(default)]
    pub dominance_rank: i32,
    #[serde(default)]
    pub effects: Vec<AlleleEffect>,
}

impl Allele {
    pub fn new(id: impl Into<String>, dominance_rank: i32) -> Self {
        Self {
            id: id.into(),
            dominance_rank,
            effects: Vec::new(),
        }
    }

    pub fn with_effect(mut self, effect: AlleleEffect) -> Self {
        self.effects.push(effect);
        self
    }
}

fn default_half() -> f64 {
    0.5
}

/// Gene definition as read from configuration
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Gene {
    pub id: GeneId,
    #[serde(default)]
    pub chromosome: ChromosomeType,
    #[serde(default)]
    pub dominance: DominancePattern,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub linkage_group: Option<u32>,
    /// Chance the transmitted homolog switches relative to the previous linked gene
    #[serde(default = "default_half")]
    pub recombination_probability: f64,
    /// Weight of the first allele when blending (incomplete dominance only)
    #[serde(default = "default_half")]
    pub incomplete_blend_weight: f64,
    /// Falls back to the first listed allele when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_allele_id: Option<AlleleId>,
    pub alleles: Vec<Allele>,
}

impl Gene {
    pub fn new(
        id: impl Into<String>,
        chromosome: ChromosomeType,
        dominance: DominancePattern,
        alleles: Vec<Allele>,
    ) -> Self {
        Self {
            id: id.into(),
            chromosome,
            dominance,
            linkage_group: None,
            recombination_probability: default_half(),
            incomplete_blend_weight: default_half(),
            default_allele_id: None,
            alleles,
        }
    }

    pub fn with_default_allele(mut self, allele_id: impl Into<String>) -> Self {
        self.default_allele_id = Some(allele_id.into());
        self
    }

    pub fn with_linkage(mut self, group: u32, recombination_probability: f64) -> Self {
        self.linkage_group = Some(group);
        self.recombination_probability = recombination_probability;
        self
    }

    pub fn with_blend_weight(mut self, weight: f64) -> Self {
        self.incomplete_blend_weight = weight;
        self
    }
}

/// One gene's genotype overriding or scaling another trait
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EpistasisRule {
    pub regulator_gene: GeneId,
    pub triggering_allele: AlleleId,
    #[serde(default)]
    pub requirement: AlleleRequirement,
    #[serde(default)]
    pub action: EpistasisAction,
    pub target_trait: TraitId,
    #[serde(default = "default_modifier")]
    pub modifier: f64,
    #[serde(default, alias = "override_description")]
    pub override_descriptor: String,
    #[serde(default)]
    pub override_value: f64,
}

fn default_modifier() -> f64 {
    1.0
}

impl EpistasisRule {
    /// Rule that replaces the target trait entirely when triggered
    pub fn mask(
        regulator_gene: impl Into<String>,
        triggering_allele: impl Into<String>,
        requirement: AlleleRequirement,
        target_trait: impl Into<String>,
        override_descriptor: impl Into<String>,
        override_value: f64,
    ) -> Self {
        Self {
            regulator_gene: regulator_gene.into(),
            triggering_allele: triggering_allele.into(),
            requirement,
            action: EpistasisAction::Mask,
            target_trait: target_trait.into(),
            modifier: default_modifier(),
            override_descriptor: override_descriptor.into(),
            override_value,
        }
    }

    /// Rule that scales the target trait's quantitative value when triggered
    pub fn modify(
        regulator_gene: impl Into<String>,
        triggering_allele: impl Into<String>,
        requirement: AlleleRequirement,
        target_trait: impl Into<String>,
        modifier: f64,
        override_descriptor: impl Into<String>,
    ) -> Self {
        Self {
            regulator_gene: regulator_gene.into(),
            triggering_allele: triggering_allele.into(),
            requirement,
            action: EpistasisAction::Modify,
            target_trait: target_trait.into(),
            modifier,
            override_descriptor: override_descriptor.into(),
            override_value: 0.0,
        }
    }
}

/// A validated gene together with its allele index
#[derive(Clone, Debug)]
pub struct IndexedGene {
    definition: Gene,
    allele_index: HashMap<AlleleId, usize>,
    default_allele: AlleleId,
    trait_ids: Vec<TraitId>,
}

impl IndexedGene {
    fn build(definition: Gene) -> Result<Self> {
        if definition.alleles.is_empty() {
            return Err(GeneticsError::configuration(format!(
                "Gene '{}' must define at least one allele",
                definition.id
            )));
        }

        let mut allele_index = HashMap::with_capacity(definition.alleles.len());
        for (position, allele) in definition.alleles.iter().enumerate() {
            if allele_index.insert(allele.id.clone(), position).is_some() {
                return Err(GeneticsError::configuration(format!(
                    "Duplicate allele id '{}' in gene '{}'",
                    allele.id, definition.id
                )));
            }
        }

        let default_allele = match &definition.default_allele_id {
            Some(id) if !id.is_empty() => {
                if !allele_index.contains_key(id) {
                    return Err(GeneticsError::configuration(format!(
                        "Gene '{}' default allele '{}' is not defined",
                        definition.id, id
                    )));
                }
                id.clone()
            }
            _ => definition.alleles[0].id.clone(),
        };

        for (name, value) in [
            ("recombination_probability", definition.recombination_probability),
            ("incomplete_blend_weight", definition.incomplete_blend_weight),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(GeneticsError::configuration(format!(
                    "Gene '{}' {} must be within [0, 1], got {}",
                    definition.id, name, value
                )));
            }
        }

        let trait_ids = gather_trait_ids(&definition);

        Ok(Self {
            definition,
            allele_index,
            default_allele,
            trait_ids,
        })
    }

    pub fn definition(&self) -> &Gene {
        &self.definition
    }

    pub fn id(&self) -> &str {
        &self.definition.id
    }

    pub fn chromosome(&self) -> ChromosomeType {
        self.definition.chromosome
    }

    pub fn dominance(&self) -> DominancePattern {
        self.definition.dominance
    }

    pub fn linkage_group(&self) -> Option<u32> {
        self.definition.linkage_group
    }

    pub fn recombination_probability(&self) -> f64 {
        self.definition.recombination_probability
    }

    pub fn blend_weight(&self) -> f64 {
        self.definition.incomplete_blend_weight
    }

    /// Resolved default allele id
    pub fn default_allele(&self) -> &str {
        &self.default_allele
    }

    pub fn alleles(&self) -> &[Allele] {
        &self.definition.alleles
    }

    /// Traits this gene's alleles touch, in first-seen order (the gene id if none)
    pub fn trait_ids(&self) -> &[TraitId] {
        &self.trait_ids
    }

    pub fn allele(&self, allele_id: &str) -> Option<&Allele> {
        self.allele_index
            .get(allele_id)
            .map(|&position| &self.definition.alleles[position])
    }

    pub fn has_allele(&self, allele_id: &str) -> bool {
        self.allele_index.contains_key(allele_id)
    }

    /// Look up an allele, reporting unknown ids as validation errors
    pub fn require_allele(&self, allele_id: &str) -> Result<&Allele> {
        self.allele(allele_id).ok_or_else(|| {
            GeneticsError::validation(format!(
                "Allele '{}' is not defined for gene '{}'",
                allele_id,
                self.id()
            ))
        })
    }

    /// Dominance rank of an allele (0 for unknown ids)
    pub fn rank(&self, allele_id: &str) -> i32 {
        self.allele(allele_id)
            .map(|allele| allele.dominance_rank)
            .unwrap_or(0)
    }
}

fn gather_trait_ids(gene: &Gene) -> Vec<TraitId> {
    let mut trait_ids: Vec<TraitId> = Vec::new();
    for effect in gene.alleles.iter().flat_map(|allele| &allele.effects) {
        if !effect.trait_id.is_empty() && !trait_ids.contains(&effect.trait_id) {
            trait_ids.push(effect.trait_id.clone());
        }
    }
    if trait_ids.is_empty() {
        trait_ids.push(gene.id.clone());
    }
    trait_ids
}

/// Genes modeled as physically linked on one chromosome
#[derive(Clone, Debug)]
pub struct LinkageGroup {
    pub id: u32,
    /// Positions into `GeneticModel::genes`, in configuration order
    pub genes: Vec<usize>,
    /// Union of member trait ids, in member order
    pub trait_ids: Vec<TraitId>,
}

/// Frozen configuration snapshot plus every lookup index the engine needs
#[derive(Clone, Debug)]
pub struct GeneticModel {
    genes: Vec<IndexedGene>,
    gene_index: HashMap<GeneId, usize>,
    linkage_groups: Vec<LinkageGroup>,
    epistasis: Vec<EpistasisRule>,
}

impl GeneticModel {
    /// Validate definitions and build all indices
    pub fn build(genes: Vec<Gene>, epistasis: Vec<EpistasisRule>) -> Result<Self> {
        let mut indexed = Vec::with_capacity(genes.len());
        let mut gene_index = HashMap::with_capacity(genes.len());
        let mut groups: BTreeMap<u32, LinkageGroup> = BTreeMap::new();

        for gene in genes {
            let gene = IndexedGene::build(gene)?;
            let position = indexed.len();

            if gene_index.insert(gene.id().to_string(), position).is_some() {
                return Err(GeneticsError::configuration(format!(
                    "Duplicate gene id '{}'",
                    gene.id()
                )));
            }

            if let Some(group_id) = gene.linkage_group() {
                let group = groups.entry(group_id).or_insert_with(|| LinkageGroup {
                    id: group_id,
                    genes: Vec::new(),
                    trait_ids: Vec::new(),
                });
                group.genes.push(position);
                for trait_id in gene.trait_ids() {
                    if !group.trait_ids.contains(trait_id) {
                        group.trait_ids.push(trait_id.clone());
                    }
                }
            }

            indexed.push(gene);
        }

        for rule in &epistasis {
            let regulator = gene_index
                .get(&rule.regulator_gene)
                .map(|&position| &indexed[position])
                .ok_or_else(|| {
                    GeneticsError::configuration(format!(
                        "Epistasis rule references unknown regulator gene '{}'",
                        rule.regulator_gene
                    ))
                })?;
            if !regulator.has_allele(&rule.triggering_allele) {
                return Err(GeneticsError::configuration(format!(
                    "Epistasis rule references allele '{}' not defined for gene '{}'",
                    rule.triggering_allele, rule.regulator_gene
                )));
            }
        }

        Ok(Self {
            genes: indexed,
            gene_index,
            linkage_groups: groups.into_values().collect(),
            epistasis,
        })
    }

    /// All genes in configuration order
    pub fn genes(&self) -> &[IndexedGene] {
        &self.genes
    }

    pub fn gene(&self, gene_id: &str) -> Option<&IndexedGene> {
        self.gene_index
            .get(gene_id)
            .map(|&position| &self.genes[position])
    }

    /// Look up a gene, reporting unknown ids as validation errors
    pub fn require_gene(&self, gene_id: &str) -> Result<&IndexedGene> {
        self.gene(gene_id)
            .ok_or_else(|| GeneticsError::validation(format!("Unknown gene id: {}", gene_id)))
    }

    /// Linkage groups in ascending group id
    pub fn linkage_groups(&self) -> &[LinkageGroup] {
        &self.linkage_groups
    }

    /// Member genes of a linkage group, in configuration order
    pub fn group_members<'a>(
        &'a self,
        group: &'a LinkageGroup,
    ) -> impl Iterator<Item = &'a IndexedGene> + 'a {
        group.genes.iter().map(move |&position| &self.genes[position])
    }

    pub fn epistasis(&self) -> &[EpistasisRule] {
        &self.epistasis
    }

    pub fn gene_count(&self) -> usize {
        self.genes.len()
    }

    /// Gene ids in configuration order
    pub fn gene_ids(&self) -> impl Iterator<Item = &str> {
        self.genes.iter().map(|gene| gene.id())
    }
}
