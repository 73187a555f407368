//! The inheritance engine: individuals, matings, phenotypes and exact crosses.

use crate::calculator::{ExactCalculator, PhenotypeDistribution, TraitResult};
use crate::config::EngineConfig;
use crate::error::{GeneticsError, Result};
use crate::genetics::genotype::{Genotype, GenotypeKey};
use crate::genetics::individual::Individual;
use crate::genetics::meiosis::GameteGenerator;
use crate::genetics::model::{ChromosomeType, GeneId, GeneticModel};
use crate::genetics::normalizer::normalize;
use crate::genetics::sex::{assign_parent_roles, Sex};
use crate::phenotype::{self, ModifierChain, Phenotype, PhenotypeOverride};
use crate::stats::SimulationSummary;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use rayon::prelude::*;
use std::borrow::Borrow;
use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::hash::Hash;
use std::path::Path;
use std::sync::Arc;

/// Immutable engine built once from configuration.
///
/// Every operation takes `&self`, and stochastic ones take a caller-owned
/// generator, so one engine can be shared across threads.
#[derive(Clone, Debug)]
pub struct Engine {
    config: EngineConfig,
    model: GeneticModel,
    chain: ModifierChain,
}

impl Engine {
    /// Create engine with the standard modifier chain
    pub fn new(config: EngineConfig) -> Result<Self> {
        Self::with_chain(config, ModifierChain::standard())
    }

    /// Create engine whose modifier chain includes a domain override stage
    pub fn with_override(config: EngineConfig, domain: Arc<dyn PhenotypeOverride>) -> Result<Self> {
        Self::with_chain(config, ModifierChain::with_override(domain))
    }

    fn with_chain(config: EngineConfig, chain: ModifierChain) -> Result<Self> {
        let model = config.build_model()?;
        log::debug!(
            "Engine ready: {} genes, {} linkage groups, {} epistasis rules",
            model.gene_count(),
            model.linkage_groups().len(),
            model.epistasis().len()
        );
        Ok(Self { config, model, chain })
    }

    /// Load configuration from a YAML file and build the engine
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::new(EngineConfig::from_file(path)?)
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn model(&self) -> &GeneticModel {
        &self.model
    }

    pub fn chain(&self) -> &ModifierChain {
        &self.chain
    }

    /// Build a normalized individual.
    ///
    /// Genes missing from `provided` get their defaults; gene ids unknown
    /// to the model are rejected.
    pub fn create_individual<K, A>(&self, sex: Sex, provided: &HashMap<K, Vec<A>>) -> Result<Individual>
    where
        K: Borrow<str> + Eq + Hash,
        A: AsRef<str>,
    {
        for gene_id in provided.keys() {
            self.model.require_gene(gene_id.borrow())?;
        }

        let mut genotypes = BTreeMap::new();
        for gene in self.model.genes() {
            let alleles: &[A] = provided.get(gene.id()).map(Vec::as_slice).unwrap_or(&[]);
            genotypes.insert(gene.id().to_string(), normalize(gene, alleles, sex)?);
        }

        Ok(Individual::from_parts(sex, genotypes))
    }

    /// Produce one offspring from a male and a female parent (either order).
    ///
    /// The maternal gamete is drawn first; the child is male iff the paternal
    /// gamete carries the Y determinant.
    pub fn mate<R: Rng + ?Sized>(&self, parent_a: &Individual, parent_b: &Individual, rng: &mut R) -> Result<Individual> {
        let (mother, father) = assign_parent_roles((parent_a.sex(), parent_a), (parent_b.sex(), parent_b))?;

        let generator = GameteGenerator::new(&self.model);
        let maternal = generator.generate(mother, rng)?;
        let paternal = generator.generate(father, rng)?;

        let sex = if paternal.carries_y() { Sex::Male } else { Sex::Female };

        let mut genotypes = BTreeMap::new();
        for gene in self.model.genes() {
            let id = gene.id();
            let alleles = match (gene.chromosome(), sex) {
                (ChromosomeType::Autosomal, _) | (ChromosomeType::X, Sex::Female) => vec![
                    maternal.require_allele(id)?.to_string(),
                    paternal.require_allele(id)?.to_string(),
                ],
                (ChromosomeType::X, Sex::Male) => vec![maternal.require_allele(id)?.to_string()],
                (ChromosomeType::Y, Sex::Male) => vec![paternal.require_allele(id)?.to_string()],
                (ChromosomeType::Y, Sex::Female) => Vec::new(),
            };
            genotypes.insert(id.to_string(), Genotype::new(alleles));
        }

        Ok(Individual::from_parts(sex, genotypes))
    }

    /// Mate with a generator seeded from `seed`
    pub fn mate_with_seed(&self, parent_a: &Individual, parent_b: &Individual, seed: u64) -> Result<Individual> {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        self.mate(parent_a, parent_b, &mut rng)
    }

    /// Express an individual's phenotype through dominance and the modifier chain
    pub fn express_phenotype(&self, individual: &Individual) -> Result<Phenotype> {
        phenotype::express(&self.model, &self.chain, individual)
    }

    /// Exact calculator bound to this engine's model, chain and limits
    pub fn calculator(&self) -> ExactCalculator<'_> {
        ExactCalculator::new(&self.model, &self.chain).with_max_joint_genes(self.config.calculator.max_joint_genes)
    }

    /// Per-gene genotype and phenotype distributions for a cross
    pub fn calculate_cross<S: AsRef<str>>(
        &self,
        parent1: &Individual,
        parent2: &Individual,
        gene_ids: &[S],
        as_percentages: bool,
    ) -> Result<BTreeMap<GeneId, TraitResult>> {
        self.calculator()
            .calculate_cross(parent1, parent2, gene_ids, as_percentages)
    }

    /// Joint phenotype distribution across several genes of a cross
    pub fn calculate_joint_phenotypes<S: AsRef<str>>(
        &self,
        parent1: &Individual,
        parent2: &Individual,
        gene_ids: &[S],
        as_percentages: bool,
    ) -> Result<PhenotypeDistribution> {
        self.calculator()
            .calculate_joint_phenotypes(parent1, parent2, gene_ids, as_percentages)
    }

    /// Every canonical genotype a gene admits, in key order.
    ///
    /// X-linked genes also list their hemizygous (male) genotypes; Y-linked
    /// genes list only hemizygous ones.
    pub fn possible_genotypes(&self, gene_id: &str) -> Result<Vec<GenotypeKey>> {
        let gene = self.model.require_gene(gene_id)?;
        let alleles = gene.alleles();
        let mut keys = BTreeSet::new();

        for (i, first) in alleles.iter().enumerate() {
            if gene.chromosome() != ChromosomeType::Y {
                for second in &alleles[i..] {
                    keys.insert(GenotypeKey::diploid(gene, &first.id, &second.id));
                }
            }
            if gene.chromosome().is_sex_linked() {
                keys.insert(GenotypeKey::hemizygous(first.id.clone()));
            }
        }

        Ok(keys.into_iter().collect())
    }

    /// Summarize repeated matings using the configured count and seed
    pub fn simulate_cross(&self, parent_a: &Individual, parent_b: &Individual) -> Result<SimulationSummary> {
        let seed = self
            .config
            .simulation
            .seed
            .unwrap_or_else(|| rand::thread_rng().gen());
        self.simulate_cross_with(parent_a, parent_b, self.config.simulation.simulations, seed)
    }

    /// Summarize `simulations` matings.
    ///
    /// Matings run in parallel, each on its own ChaCha stream of `seed`, and
    /// are folded in index order, so a seed always yields the same summary.
    pub fn simulate_cross_with(
        &self,
        parent_a: &Individual,
        parent_b: &Individual,
        simulations: usize,
        seed: u64,
    ) -> Result<SimulationSummary> {
        if simulations == 0 {
            return Err(GeneticsError::validation("simulations must be > 0"));
        }
        assign_parent_roles((parent_a.sex(), ()), (parent_b.sex(), ()))?;

        let offspring: Vec<(Sex, Phenotype)> = (0..simulations)
            .into_par_iter()
            .map(|index| {
                let mut rng = ChaCha8Rng::seed_from_u64(seed);
                rng.set_stream(index as u64);
                let child = self.mate(parent_a, parent_b, &mut rng)?;
                let phenotype = self.express_phenotype(&child)?;
                Ok((child.sex(), phenotype))
            })
            .collect::<Result<Vec<_>>>()?;

        let mut summary = SimulationSummary::new();
        for (sex, phenotype) in &offspring {
            summary.record(*sex, phenotype);
        }

        log::info!("{}", summary.summary());
        Ok(summary)
    }
}
