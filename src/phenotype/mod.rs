//! Phenotype expression: dominance resolution followed by the modifier chain.

pub mod coat;
pub mod descriptors;
pub mod dominance;
pub mod modifiers;

pub use coat::CatCoatOverride;
pub use modifiers::{ModifierChain, ModifierStage, PhenotypeOverride};

use crate::error::Result;
use crate::genetics::individual::Individual;
use crate::genetics::model::{GeneticModel, TraitId};
use serde::Serialize;
use std::collections::BTreeMap;

/// One allele effect (or a blend of several) headed for a trait
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct TraitContribution {
    pub trait_id: TraitId,
    pub magnitude: f64,
    pub descriptor: String,
}

impl TraitContribution {
    pub fn new(trait_id: impl Into<String>, magnitude: f64, descriptor: impl Into<String>) -> Self {
        Self {
            trait_id: trait_id.into(),
            magnitude,
            descriptor: descriptor.into(),
        }
    }
}

/// Accumulated expression of a single trait
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct TraitExpression {
    pub quantitative: f64,
    pub descriptors: Vec<String>,
}

impl TraitExpression {
    /// A non-empty descriptor is appended; otherwise the magnitude is summed
    pub fn add(&mut self, magnitude: f64, descriptor: &str) {
        if descriptor.is_empty() {
            self.quantitative += magnitude;
        } else {
            self.descriptors.push(descriptor.to_string());
        }
    }

    /// Replace the whole expression with one value and optional descriptor
    pub fn overwrite(&mut self, quantitative: f64, descriptor: &str) {
        self.quantitative = quantitative;
        self.descriptors.clear();
        if !descriptor.is_empty() {
            self.descriptors.push(descriptor.to_string());
        }
    }

    /// Descriptors joined with ", ", or the quantitative value if there are none
    pub fn summary(&self) -> String {
        if self.descriptors.is_empty() {
            format!("{}", self.quantitative)
        } else {
            self.descriptors.join(", ")
        }
    }
}

/// Trait expressions of one individual, ordered by trait id
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct Phenotype {
    pub traits: BTreeMap<TraitId, TraitExpression>,
}

impl Phenotype {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, trait_id: &str) -> Option<&TraitExpression> {
        self.traits.get(trait_id)
    }

    /// Expression for `trait_id`, created empty if absent
    pub fn entry(&mut self, trait_id: &str) -> &mut TraitExpression {
        self.traits.entry(trait_id.to_string()).or_default()
    }

    pub fn contribute(&mut self, contribution: &TraitContribution) {
        self.entry(&contribution.trait_id)
            .add(contribution.magnitude, &contribution.descriptor);
    }

    pub fn remove(&mut self, trait_id: &str) -> Option<TraitExpression> {
        self.traits.remove(trait_id)
    }

    pub fn len(&self) -> usize {
        self.traits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.traits.is_empty()
    }

    /// Summary of one trait, if expressed
    pub fn summary(&self, trait_id: &str) -> Option<String> {
        self.get(trait_id).map(TraitExpression::summary)
    }

    /// Canonical label: a lone trait's summary, or "trait: summary" pairs joined with "; "
    pub fn label(&self) -> String {
        match self.traits.len() {
            0 => "Unknown".to_string(),
            1 => self
                .traits
                .values()
                .next()
                .map(TraitExpression::summary)
                .unwrap_or_default(),
            _ => self
                .traits
                .iter()
                .map(|(trait_id, expression)| format!("{}: {}", trait_id, expression.summary()))
                .collect::<Vec<_>>()
                .join("; "),
        }
    }
}

/// Express an individual's phenotype.
///
/// Genes without a stored genotype (or with an empty one, such as a
/// female's Y-linked gene) contribute nothing; the modifier chain runs after
/// every gene has been resolved.
pub fn express(model: &GeneticModel, chain: &ModifierChain, individual: &Individual) -> Result<Phenotype> {
    let mut phenotype = Phenotype::new();

    for gene in model.genes() {
        let genotype = match individual.genotype(gene.id()) {
            Some(genotype) if !genotype.is_empty() => genotype,
            _ => continue,
        };
        for contribution in dominance::resolve(gene, genotype)? {
            phenotype.contribute(&contribution);
        }
    }

    chain.apply(model, individual, &mut phenotype);
    Ok(phenotype)
}
