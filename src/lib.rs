//! # Mendelian
//!
//! Mendelian inheritance engine with stochastic matings and exact cross
//! probabilities.
//!
//! ## Features
//!
//! - **Sex-linked**: autosomal, X-linked and Y-linked genes
//! - **Dominance**: complete, codominant and incomplete (blended) alleles
//! - **Epistasis**: regulator genes masking or scaling other traits
//! - **Linkage**: chained recombination inside linkage groups
//! - **Exact**: Punnett-square genotype, phenotype and joint distributions
//! - **Reproducible**: seeded random number generation
//!
//! ## Quick Start
//!
//! ```rust
//! use mendelian::{Allele, AlleleEffect, ChromosomeType, DominancePattern, Engine, EngineConfig, Gene, Sex};
//! use std::collections::HashMap;
//!
//! let eye_color = Gene::new(
//!     "eye_color",
//!     ChromosomeType::Autosomal,
//!     DominancePattern::Complete,
//!     vec![
//!         Allele::new("B", 1).with_effect(AlleleEffect::new("eye_color", 1.0, "Brown")),
//!         Allele::new("b", 0).with_effect(AlleleEffect::new("eye_color", 0.0, "Blue")),
//!     ],
//! );
//! let engine = Engine::new(EngineConfig::new(vec![eye_color], Vec::new())).unwrap();
//!
//! let mut genotype = HashMap::new();
//! genotype.insert("eye_color", vec!["B", "b"]);
//! let mother = engine.create_individual(Sex::Female, &genotype).unwrap();
//! let father = engine.create_individual(Sex::Male, &genotype).unwrap();
//!
//! // One stochastic offspring
//! let child = engine.mate_with_seed(&mother, &father, 42).unwrap();
//! println!("{:?}", engine.express_phenotype(&child).unwrap());
//!
//! // Exact distributions
//! let cross = engine.calculate_cross(&mother, &father, &["eye_color"], true).unwrap();
//! assert_eq!(cross["eye_color"].phenotypic_ratios.probability("Brown"), 75.0);
//! ```
//!
//! ## Configuration
//!
//! ```rust,no_run
//! use mendelian::Engine;
//!
//! let engine = Engine::from_file("configs/human_traits.yaml").unwrap();
//! println!("{} genes", engine.model().gene_count());
//! ```

pub mod calculator;
pub mod config;
pub mod engine;
pub mod error;
pub mod genetics;
pub mod phenotype;
pub mod stats;

// Re-export main types
pub use calculator::{
    AlleleDistribution, Distribution, ExactCalculator, GenotypeDistribution, PhenotypeDistribution,
    TraitResult,
};
pub use config::EngineConfig;
pub use engine::Engine;
pub use error::{GeneticsError, Result};
pub use genetics::{
    Allele, AlleleEffect, AlleleRequirement, ChromosomeType, DominancePattern, EpistasisAction,
    EpistasisRule, Gene, Genotype, GenotypeKey, Individual, Sex,
};
pub use phenotype::{CatCoatOverride, Phenotype, PhenotypeOverride, TraitExpression};
pub use stats::SimulationSummary;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
