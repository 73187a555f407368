//! Configuration for the inheritance engine.
//!
//! Supports YAML configuration files with sensible defaults. Gene and
//! epistasis definitions are the frozen snapshot an `Engine` is built from.

use crate::error::{GeneticsError, Result};
use crate::genetics::model::{EpistasisRule, Gene, GeneticModel};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Main configuration structure
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Gene definitions, in the order genes are processed
    #[serde(default)]
    pub genes: Vec<Gene>,
    #[serde(default)]
    pub epistasis: Vec<EpistasisRule>,
    #[serde(default)]
    pub calculator: CalculatorConfig,
    #[serde(default)]
    pub simulation: SimulationConfig,
}

/// Exact calculator limits
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CalculatorConfig {
    /// Largest gene count accepted by a joint-phenotype request (unbounded if unset)
    #[serde(default)]
    pub max_joint_genes: Option<usize>,
}

/// Repeated-mating summary settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// Matings per summary
    pub simulations: usize,
    /// Seed for reproducible summaries (fresh entropy if unset)
    pub seed: Option<u64>,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            simulations: 100,
            seed: None,
        }
    }
}

impl EngineConfig {
    pub fn new(genes: Vec<Gene>, epistasis: Vec<EpistasisRule>) -> Self {
        Self {
            genes,
            epistasis,
            ..Self::default()
        }
    }

    /// Load configuration from a YAML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&contents)
    }

    /// Parse and validate configuration from YAML text
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        let config: EngineConfig = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_yaml(&self) -> Result<String> {
        Ok(serde_yaml::to_string(self)?)
    }

    /// Save configuration to a YAML file
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        std::fs::write(path, self.to_yaml()?)?;
        Ok(())
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<()> {
        self.build_model().map(|_| ())
    }

    /// Validate and build the frozen genetic model
    pub fn build_model(&self) -> Result<GeneticModel> {
        let model = GeneticModel::build(self.genes.clone(), self.epistasis.clone())?;

        if self.simulation.simulations == 0 {
            return Err(GeneticsError::configuration(
                "simulation.simulations must be > 0",
            ));
        }
        if self.calculator.max_joint_genes == Some(0) {
            return Err(GeneticsError::configuration(
                "calculator.max_joint_genes must be > 0 when set",
            ));
        }
        Ok(model)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::genetics::model::{AlleleRequirement, ChromosomeType, DominancePattern, EpistasisAction};

    const YAML: &str = r#"
genes:
  - id: coat
    chromosome: x_linked
    dominance: codominance
    alleles:
      - id: XB
        dominance_rank: 1
        effects:
          - trait_id: coat_color
            magnitude: 1.0
            description: Black
      - id: XO
        dominance_rank: 1
        effects:
          - trait_id: coat_color
            description: Orange
  - id: albino
    alleles:
      - id: C
        dominance_rank: 1
      - id: c
epistasis:
  - regulator_gene: albino
    triggering_allele: c
    requirement: homozygous
    action: mask_trait
    target_trait: coat_color
    override_descriptor: White
calculator:
  max_joint_genes: 4
"#;

    #[test]
    fn test_default_config_valid() {
        let config = EngineConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.simulation.simulations, 100);
        assert!(config.calculator.max_joint_genes.is_none());
    }

    #[test]
    fn test_parse_with_aliases_and_defaults() {
        let config = EngineConfig::from_yaml_str(YAML).unwrap();

        let coat = &config.genes[0];
        assert_eq!(coat.chromosome, ChromosomeType::X);
        assert_eq!(coat.dominance, DominancePattern::Codominant);
        assert_eq!(coat.recombination_probability, 0.5);
        assert_eq!(coat.incomplete_blend_weight, 0.5);
        assert!(coat.default_allele_id.is_none());
        assert_eq!(coat.alleles[1].effects[0].magnitude, 0.0);

        let albino = &config.genes[1];
        assert_eq!(albino.chromosome, ChromosomeType::Autosomal);
        assert_eq!(albino.alleles[1].dominance_rank, 0);

        let rule = &config.epistasis[0];
        assert_eq!(rule.requirement, AlleleRequirement::Homozygous);
        assert_eq!(rule.action, EpistasisAction::Mask);
        assert_eq!(rule.modifier, 1.0);

        assert_eq!(config.calculator.max_joint_genes, Some(4));
        assert_eq!(config.simulation.simulations, 100);
    }

    #[test]
    fn test_invalid_gene_rejected() {
        let yaml = "genes:\n  - id: empty\n    alleles: []\n";
        let err = EngineConfig::from_yaml_str(yaml).unwrap_err();
        assert!(err.is_configuration());
    }

    #[test]
    fn test_malformed_yaml_rejected() {
        let err = EngineConfig::from_yaml_str("genes: [").unwrap_err();
        assert!(matches!(err, GeneticsError::Yaml(_)));
    }

    #[test]
    fn test_zero_simulations_rejected() {
        let mut config = EngineConfig::default();
        config.simulation.simulations = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_save_and_load() {
        let config = EngineConfig::from_yaml_str(YAML).unwrap();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("engine.yaml");

        config.save(&path).unwrap();
        let loaded = EngineConfig::from_file(&path).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_missing_file() {
        let err = EngineConfig::from_file("/nonexistent/engine.yaml").unwrap_err();
        assert!(matches!(err, GeneticsError::Io(_)));
    }
}
