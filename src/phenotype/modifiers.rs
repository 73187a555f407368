//! Post-dominance phenotype modifiers: epistasis, an optional domain
//! override and linkage-group compositing, always applied in that order.

use crate::genetics::genotype::Genotype;
use crate::genetics::individual::Individual;
use crate::genetics::model::{AlleleRequirement, EpistasisAction, EpistasisRule, GeneticModel};
use crate::phenotype::Phenotype;
use std::fmt;
use std::sync::Arc;

/// Swappable, domain-specific rewrite of an expressed phenotype
pub trait PhenotypeOverride: Send + Sync + fmt::Debug {
    fn name(&self) -> &str;

    fn apply(&self, individual: &Individual, phenotype: &mut Phenotype);
}

/// One step of the modifier chain
#[derive(Clone, Debug)]
pub enum ModifierStage {
    Epistasis,
    DomainOverride(Arc<dyn PhenotypeOverride>),
    LinkageComposite,
}

impl ModifierStage {
    pub fn name(&self) -> &str {
        match self {
            ModifierStage::Epistasis => "epistasis",
            ModifierStage::DomainOverride(domain) => domain.name(),
            ModifierStage::LinkageComposite => "linkage_composite",
        }
    }

    fn apply(&self, model: &GeneticModel, individual: &Individual, phenotype: &mut Phenotype) {
        match self {
            ModifierStage::Epistasis => apply_epistasis(model.epistasis(), individual, phenotype),
            ModifierStage::DomainOverride(domain) => domain.apply(individual, phenotype),
            ModifierStage::LinkageComposite => composite_linkage(model, phenotype),
        }
    }
}

/// Ordered modifier stages run after dominance resolution
#[derive(Clone, Debug)]
pub struct ModifierChain {
    stages: Vec<ModifierStage>,
}

impl Default for ModifierChain {
    fn default() -> Self {
        Self::standard()
    }
}

impl ModifierChain {
    /// Epistasis then linkage compositing
    pub fn standard() -> Self {
        Self {
            stages: vec![ModifierStage::Epistasis, ModifierStage::LinkageComposite],
        }
    }

    /// Epistasis, the given override, then linkage compositing
    pub fn with_override(domain: Arc<dyn PhenotypeOverride>) -> Self {
        Self {
            stages: vec![
                ModifierStage::Epistasis,
                ModifierStage::DomainOverride(domain),
                ModifierStage::LinkageComposite,
            ],
        }
    }

    pub fn stages(&self) -> &[ModifierStage] {
        &self.stages
    }

    pub fn apply(&self, model: &GeneticModel, individual: &Individual, phenotype: &mut Phenotype) {
        for stage in &self.stages {
            stage.apply(model, individual, phenotype);
        }
    }
}

/// Whether `genotype` satisfies a rule's requirement on its triggering allele
pub fn requirement_met(rule: &EpistasisRule, genotype: &Genotype) -> bool {
    let allele = rule.triggering_allele.as_str();
    match rule.requirement {
        AlleleRequirement::Present => genotype.contains(allele),
        AlleleRequirement::Homozygous => genotype.is_homozygous_for(allele),
        AlleleRequirement::Heterozygous => genotype.is_heterozygous_for(allele),
        AlleleRequirement::Hemizygous => genotype.is_hemizygous_for(allele),
    }
}

/// Apply every triggered rule in configuration order
pub fn apply_epistasis(rules: &[EpistasisRule], individual: &Individual, phenotype: &mut Phenotype) {
    for rule in rules {
        let triggered = individual
            .genotype(&rule.regulator_gene)
            .map(|genotype| requirement_met(rule, genotype))
            .unwrap_or(false);
        if !triggered {
            continue;
        }

        let expression = phenotype.entry(&rule.target_trait);
        match rule.action {
            EpistasisAction::Mask => {
                expression.overwrite(rule.override_value, &rule.override_descriptor);
            }
            EpistasisAction::Modify => {
                expression.quantitative *= rule.modifier;
                if !rule.override_descriptor.is_empty() {
                    expression.descriptors.push(rule.override_descriptor.clone());
                }
            }
        }
    }
}

/// Merge the traits of each linkage group into one composite trait.
///
/// Groups need at least two member genes and at least two expressed traits;
/// the composite id joins the merged trait ids with "_".
pub fn composite_linkage(model: &GeneticModel, phenotype: &mut Phenotype) {
    for group in model.linkage_groups() {
        if group.genes.len() < 2 {
            continue;
        }

        let mut pieces = Vec::new();
        let mut merged = Vec::new();
        for trait_id in &group.trait_ids {
            if let Some(expression) = phenotype.get(trait_id) {
                let piece = if expression.descriptors.is_empty() {
                    expression.summary()
                } else {
                    expression.descriptors.join("/")
                };
                pieces.push(piece);
                merged.push(trait_id.as_str());
            }
        }
        if pieces.len() < 2 {
            continue;
        }

        let composite_id = merged.join("_");
        for trait_id in &merged {
            phenotype.remove(trait_id);
        }
        phenotype.entry(&composite_id).overwrite(0.0, &pieces.join(", "));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::genetics::model::{Allele, AlleleEffect, ChromosomeType, DominancePattern, Gene};
    use crate::genetics::sex::Sex;
    use std::collections::BTreeMap;

    fn individual(entries: &[(&str, Genotype)]) -> Individual {
        let genotypes: BTreeMap<_, _> = entries
            .iter()
            .map(|(gene, genotype)| (gene.to_string(), genotype.clone()))
            .collect();
        Individual::from_parts(Sex::Female, genotypes)
    }

    fn het(a: &str, b: &str) -> Genotype {
        Genotype::new(vec![a.to_string(), b.to_string()])
    }

    #[test]
    fn test_requirement_kinds() {
        let rule = |requirement| EpistasisRule::mask("g", "c", requirement, "coat", "", 0.0);

        assert!(requirement_met(&rule(AlleleRequirement::Present), &het("C", "c")));
        assert!(!requirement_met(&rule(AlleleRequirement::Homozygous), &het("C", "c")));
        assert!(requirement_met(&rule(AlleleRequirement::Homozygous), &Genotype::homozygous("c")));
        assert!(requirement_met(&rule(AlleleRequirement::Heterozygous), &het("c", "C")));
        assert!(!requirement_met(&rule(AlleleRequirement::Heterozygous), &Genotype::homozygous("c")));
        assert!(requirement_met(&rule(AlleleRequirement::Hemizygous), &Genotype::hemizygous("c")));
        assert!(!requirement_met(&rule(AlleleRequirement::Hemizygous), &Genotype::homozygous("c")));
    }

    #[test]
    fn test_mask_overwrites_target() {
        let rules = vec![EpistasisRule::mask(
            "albino",
            "c",
            AlleleRequirement::Homozygous,
            "coat_color",
            "White",
            0.0,
        )];
        let mut phenotype = Phenotype::new();
        phenotype.entry("coat_color").add(0.0, "Black");
        phenotype.entry("coat_color").add(2.0, "");

        apply_epistasis(&rules, &individual(&[("albino", Genotype::homozygous("c"))]), &mut phenotype);

        let coat = phenotype.get("coat_color").unwrap();
        assert_eq!(coat.quantitative, 0.0);
        assert_eq!(coat.descriptors, vec!["White".to_string()]);
    }

    #[test]
    fn test_modify_scales_target() {
        let rules = vec![EpistasisRule::modify(
            "dwarf",
            "d",
            AlleleRequirement::Present,
            "height",
            0.5,
            "Dwarfed",
        )];
        let mut phenotype = Phenotype::new();
        phenotype.entry("height").add(10.0, "");

        apply_epistasis(&rules, &individual(&[("dwarf", het("D", "d"))]), &mut phenotype);

        let height = phenotype.get("height").unwrap();
        assert_eq!(height.quantitative, 5.0);
        assert_eq!(height.descriptors, vec!["Dwarfed".to_string()]);
    }

    #[test]
    fn test_rule_without_regulator_does_not_fire() {
        let rules = vec![EpistasisRule::mask("albino", "c", AlleleRequirement::Present, "coat_color", "White", 0.0)];
        let mut phenotype = Phenotype::new();
        phenotype.entry("coat_color").add(0.0, "Black");

        apply_epistasis(&rules, &individual(&[]), &mut phenotype);
        assert_eq!(phenotype.summary("coat_color").unwrap(), "Black");
    }

    fn linked_model() -> GeneticModel {
        let gene = |id: &str, trait_id: &str, upper: &str, lower: &str| {
            Gene::new(
                id,
                ChromosomeType::Autosomal,
                DominancePattern::Complete,
                vec![
                    Allele::new(upper, 1).with_effect(AlleleEffect::new(trait_id, 1.0, upper)),
                    Allele::new(lower, 0).with_effect(AlleleEffect::new(trait_id, 0.0, "")),
                ],
            )
            .with_linkage(1, 0.1)
        };
        GeneticModel::build(
            vec![gene("body", "body_color", "Grey", "black"), gene("wing", "wing_shape", "Long", "vestigial")],
            Vec::new(),
        )
        .unwrap()
    }

    #[test]
    fn test_linkage_composite() {
        let model = linked_model();
        let mut phenotype = Phenotype::new();
        phenotype.entry("body_color").add(0.0, "Grey");
        phenotype.entry("body_color").add(0.0, "Speckled");
        phenotype.entry("wing_shape").add(0.0, "");
        phenotype.entry("eye_color").add(0.0, "Red");

        composite_linkage(&model, &mut phenotype);

        assert!(phenotype.get("body_color").is_none());
        assert!(phenotype.get("wing_shape").is_none());
        assert_eq!(phenotype.summary("body_color_wing_shape").unwrap(), "Grey/Speckled, 0");
        assert_eq!(phenotype.summary("eye_color").unwrap(), "Red");
    }

    #[test]
    fn test_linkage_composite_needs_two_traits() {
        let model = linked_model();
        let mut phenotype = Phenotype::new();
        phenotype.entry("body_color").add(0.0, "Grey");

        composite_linkage(&model, &mut phenotype);
        assert_eq!(phenotype.summary("body_color").unwrap(), "Grey");
    }

    #[derive(Debug)]
    struct Shout;

    impl PhenotypeOverride for Shout {
        fn name(&self) -> &str {
            "shout"
        }

        fn apply(&self, _individual: &Individual, phenotype: &mut Phenotype) {
            for expression in phenotype.traits.values_mut() {
                for descriptor in expression.descriptors.iter_mut() {
                    *descriptor = descriptor.to_uppercase();
                }
            }
        }
    }

    #[test]
    fn test_chain_order() {
        let chain = ModifierChain::with_override(Arc::new(Shout));
        let names: Vec<&str> = chain.stages().iter().map(ModifierStage::name).collect();
        assert_eq!(names, vec!["epistasis", "shout", "linkage_composite"]);

        let model = GeneticModel::build(
            vec![Gene::new("albino", ChromosomeType::Autosomal, DominancePattern::Complete, vec![Allele::new("c", 0)])],
            vec![EpistasisRule::mask("albino", "c", AlleleRequirement::Homozygous, "coat", "white", 0.0)],
        )
        .unwrap();
        let mut phenotype = Phenotype::new();
        chain.apply(&model, &individual(&[("albino", Genotype::homozygous("c"))]), &mut phenotype);

        // the override sees what epistasis wrote
        assert_eq!(phenotype.summary("coat").unwrap(), "WHITE");
    }
}
