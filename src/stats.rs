//! Statistics over repeated stochastic matings of one parent pair.

use crate::calculator::PhenotypeDistribution;
use crate::genetics::model::TraitId;
use crate::genetics::sex::Sex;
use crate::phenotype::Phenotype;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

/// Per-trait observations across simulated offspring
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct TraitSummary {
    /// Offspring expressing this trait
    pub observations: usize,
    /// Mean quantitative value over those offspring
    pub mean_quantitative: f64,
    /// Offspring count per descriptor ("" for offspring with no descriptor)
    pub descriptor_counts: BTreeMap<String, usize>,
}

impl TraitSummary {
    fn record(&mut self, quantitative: f64, descriptors: &[String]) {
        self.observations += 1;
        // Running mean
        self.mean_quantitative += (quantitative - self.mean_quantitative) / self.observations as f64;
        if descriptors.is_empty() {
            *self.descriptor_counts.entry(String::new()).or_insert(0) += 1;
        } else {
            for descriptor in descriptors {
                *self.descriptor_counts.entry(descriptor.clone()).or_insert(0) += 1;
            }
        }
    }
}

/// Aggregate of a batch of simulated offspring
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct SimulationSummary {
    /// Offspring recorded
    pub simulations: usize,
    pub sex_counts: BTreeMap<Sex, usize>,
    pub traits: BTreeMap<TraitId, TraitSummary>,
    /// Offspring count per full phenotype label
    pub phenotype_counts: BTreeMap<String, usize>,
}

impl SimulationSummary {
    /// Create new empty summary
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one offspring
    pub fn record(&mut self, sex: Sex, phenotype: &Phenotype) {
        self.simulations += 1;
        *self.sex_counts.entry(sex).or_insert(0) += 1;

        for (trait_id, expression) in &phenotype.traits {
            self.traits
                .entry(trait_id.clone())
                .or_default()
                .record(expression.quantitative, &expression.descriptors);
        }

        *self.phenotype_counts.entry(phenotype.label()).or_insert(0) += 1;
    }

    pub fn count(&self, sex: Sex) -> usize {
        self.sex_counts.get(&sex).copied().unwrap_or(0)
    }

    /// Fraction of offspring of the given sex
    pub fn sex_fraction(&self, sex: Sex) -> f64 {
        if self.simulations == 0 {
            0.0
        } else {
            self.count(sex) as f64 / self.simulations as f64
        }
    }

    /// Observed phenotype label frequencies, comparable with exact distributions
    pub fn phenotype_frequencies(&self) -> PhenotypeDistribution {
        self.phenotype_counts
            .iter()
            .map(|(label, &count)| (label.clone(), count as f64))
            .collect::<PhenotypeDistribution>()
            .normalized()
    }

    /// Save summary to a YAML file
    pub fn save_yaml<P: AsRef<Path>>(&self, path: P) -> crate::Result<()> {
        std::fs::write(path, serde_yaml::to_string(self)?)?;
        Ok(())
    }

    /// Format summary as a one-line string
    pub fn summary(&self) -> String {
        format!(
            "N:{:5} | ♀:{:5} | ♂:{:5} | Traits:{:3} | Phenotypes:{:3}",
            self.simulations,
            self.count(Sex::Female),
            self.count(Sex::Male),
            self.traits.len(),
            self.phenotype_counts.len(),
        )
    }
}
