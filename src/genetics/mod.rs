//! Genetics module - gene model, genotypes, individuals and meiosis.

pub mod genotype;
pub mod individual;
pub mod meiosis;
pub mod model;
pub mod normalizer;
pub mod sex;

pub use genotype::{Genotype, GenotypeKey};
pub use individual::Individual;
pub use meiosis::{Gamete, GameteGenerator};
pub use model::{
    Allele, AlleleEffect, AlleleId, AlleleRequirement, ChromosomeType, DominancePattern,
    EpistasisAction, EpistasisRule, Gene, GeneId, GeneticModel, IndexedGene, LinkageGroup, TraitId,
};
pub use normalizer::normalize;
pub use sex::Sex;
