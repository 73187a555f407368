//! Dominance resolution: a stored genotype becomes trait contributions.

use crate::error::Result;
use crate::genetics::genotype::Genotype;
use crate::genetics::model::{Allele, AlleleEffect, DominancePattern, IndexedGene, TraitId};
use crate::phenotype::descriptors::combine_descriptors;
use crate::phenotype::TraitContribution;

/// Resolve one gene's genotype under its dominance pattern.
///
/// Single-allele genotypes express that allele; empty genotypes express
/// nothing. Unknown allele ids are validation errors.
pub fn resolve(gene: &IndexedGene, genotype: &Genotype) -> Result<Vec<TraitContribution>> {
    let (first, second) = match (genotype.first(), genotype.second()) {
        (Some(first), Some(second)) => {
            (gene.require_allele(first)?, gene.require_allele(second)?)
        }
        _ => return Ok(Vec::new()),
    };

    if first.id == second.id {
        return Ok(effects_of(first));
    }

    let contributions = match gene.dominance() {
        DominancePattern::Complete => {
            if second.dominance_rank > first.dominance_rank {
                effects_of(second)
            } else {
                effects_of(first)
            }
        }
        DominancePattern::Codominant => match first.dominance_rank.cmp(&second.dominance_rank) {
            std::cmp::Ordering::Greater => effects_of(first),
            std::cmp::Ordering::Less => effects_of(second),
            std::cmp::Ordering::Equal => codominant(first, second),
        },
        DominancePattern::Incomplete => incomplete(first, second, gene.blend_weight()),
    };

    Ok(contributions)
}

fn effects_of(allele: &Allele) -> Vec<TraitContribution> {
    allele
        .effects
        .iter()
        .map(|effect| {
            TraitContribution::new(
                effect.trait_id.clone(),
                effect.magnitude,
                effect.description.clone(),
            )
        })
        .collect()
}

/// Trait ids touched by both alleles, first allele's traits first
fn trait_order(first: &Allele, second: &Allele) -> Vec<TraitId> {
    let mut order: Vec<TraitId> = Vec::new();
    for effect in first.effects.iter().chain(&second.effects) {
        if !order.contains(&effect.trait_id) {
            order.push(effect.trait_id.clone());
        }
    }
    order
}

fn codominant(first: &Allele, second: &Allele) -> Vec<TraitContribution> {
    trait_order(first, second)
        .into_iter()
        .map(|trait_id| {
            let effects: Vec<&AlleleEffect> = first
                .effects
                .iter()
                .chain(&second.effects)
                .filter(|effect| effect.trait_id == trait_id)
                .collect();
            let magnitude =
                effects.iter().map(|effect| effect.magnitude).sum::<f64>() / effects.len() as f64;
            let descriptors: Vec<&str> = effects
                .iter()
                .map(|effect| effect.description.as_str())
                .collect();
            TraitContribution::new(trait_id, magnitude, combine_descriptors(&descriptors))
        })
        .collect()
}

fn effect_for<'a>(allele: &'a Allele, trait_id: &str) -> Option<&'a AlleleEffect> {
    allele.effects.iter().find(|effect| effect.trait_id == trait_id)
}

fn incomplete(first: &Allele, second: &Allele, weight: f64) -> Vec<TraitContribution> {
    trait_order(first, second)
        .into_iter()
        .map(|trait_id| {
            let a = effect_for(first, &trait_id);
            let b = effect_for(second, &trait_id);

            let magnitude = weight * a.map_or(0.0, |e| e.magnitude)
                + (1.0 - weight) * b.map_or(0.0, |e| e.magnitude);

            let intermediate = a
                .and_then(AlleleEffect::intermediate)
                .or_else(|| b.and_then(AlleleEffect::intermediate));
            let descriptor = match intermediate {
                Some(intermediate) => intermediate.to_string(),
                None => {
                    let pieces: Vec<&str> = [a, b]
                        .into_iter()
                        .flatten()
                        .map(|effect| effect.description.as_str())
                        .filter(|description| !description.is_empty())
                        .collect();
                    if pieces.is_empty() {
                        String::new()
                    } else {
                        format!("blend({})", pieces.join(", "))
                    }
                }
            };

            TraitContribution::new(trait_id, magnitude, descriptor)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::genetics::model::{ChromosomeType, Gene, GeneticModel};

    fn model(dominance: DominancePattern, alleles: Vec<Allele>) -> GeneticModel {
        GeneticModel::build(
            vec![Gene::new("g", ChromosomeType::Autosomal, dominance, alleles).with_blend_weight(0.5)],
            Vec::new(),
        )
        .unwrap()
    }

    fn pair(a: &str, b: &str) -> Genotype {
        Genotype::new(vec![a.to_string(), b.to_string()])
    }

    fn eye_alleles() -> Vec<Allele> {
        vec![
            Allele::new("B", 1).with_effect(AlleleEffect::new("eye_color", 1.0, "Brown")),
            Allele::new("b", 0).with_effect(AlleleEffect::new("eye_color", 0.0, "Blue")),
        ]
    }

    #[test]
    fn test_complete_homozygous_expresses_allele() {
        let model = model(DominancePattern::Complete, eye_alleles());
        let gene = model.gene("g").unwrap();

        let out = resolve(gene, &pair("b", "b")).unwrap();
        assert_eq!(out, vec![TraitContribution::new("eye_color", 0.0, "Blue")]);
    }

    #[test]
    fn test_complete_dominant_wins_either_order() {
        let model = model(DominancePattern::Complete, eye_alleles());
        let gene = model.gene("g").unwrap();

        assert_eq!(resolve(gene, &pair("b", "B")).unwrap()[0].descriptor, "Brown");
        assert_eq!(resolve(gene, &pair("B", "b")).unwrap()[0].descriptor, "Brown");
    }

    #[test]
    fn test_complete_tie_uses_stored_order() {
        let alleles = vec![
            Allele::new("R", 0).with_effect(AlleleEffect::new("shape", 0.0, "Round")),
            Allele::new("W", 0).with_effect(AlleleEffect::new("shape", 0.0, "Wrinkled")),
        ];
        let model = model(DominancePattern::Complete, alleles);
        let gene = model.gene("g").unwrap();

        assert_eq!(resolve(gene, &pair("W", "R")).unwrap()[0].descriptor, "Wrinkled");
    }

    #[test]
    fn test_codominant_merges_descriptors() {
        let alleles = vec![
            Allele::new("A", 1).with_effect(AlleleEffect::new("blood_type", 1.0, "A")),
            Allele::new("B", 1).with_effect(AlleleEffect::new("blood_type", 3.0, "B")),
            Allele::new("O", 0).with_effect(AlleleEffect::new("blood_type", 0.0, "O")),
        ];
        let model = model(DominancePattern::Codominant, alleles);
        let gene = model.gene("g").unwrap();

        let out = resolve(gene, &pair("B", "A")).unwrap();
        assert_eq!(out, vec![TraitContribution::new("blood_type", 2.0, "AB")]);

        assert_eq!(resolve(gene, &pair("O", "B")).unwrap()[0].descriptor, "B");
    }

    #[test]
    fn test_codominant_quantitative_average() {
        let alleles = vec![
            Allele::new("H1", 0).with_effect(AlleleEffect::new("height", 2.0, "")),
            Allele::new("H2", 0).with_effect(AlleleEffect::new("height", 4.0, "")),
        ];
        let model = model(DominancePattern::Codominant, alleles);
        let gene = model.gene("g").unwrap();

        let out = resolve(gene, &pair("H1", "H2")).unwrap();
        assert_eq!(out, vec![TraitContribution::new("height", 3.0, "")]);
    }

    #[test]
    fn test_incomplete_blend() {
        let alleles = vec![
            Allele::new("R", 1).with_effect(AlleleEffect::new("flower", 1.0, "Red").with_intermediate("Pink")),
            Allele::new("W", 0).with_effect(AlleleEffect::new("flower", 0.0, "White")),
        ];
        let model = model(DominancePattern::Incomplete, alleles);
        let gene = model.gene("g").unwrap();

        let out = resolve(gene, &pair("R", "W")).unwrap();
        assert_eq!(out, vec![TraitContribution::new("flower", 0.5, "Pink")]);

        let out = resolve(gene, &pair("W", "W")).unwrap();
        assert_eq!(out[0].descriptor, "White");
    }

    #[test]
    fn test_incomplete_synthesized_descriptor() {
        let alleles = vec![
            Allele::new("T", 1)
                .with_effect(AlleleEffect::new("height", 10.0, "Tall"))
                .with_effect(AlleleEffect::new("vigor", 4.0, "")),
            Allele::new("t", 0).with_effect(AlleleEffect::new("height", 2.0, "Short")),
        ];
        let model = GeneticModel::build(
            vec![Gene::new("g", ChromosomeType::Autosomal, DominancePattern::Incomplete, alleles).with_blend_weight(0.75)],
            Vec::new(),
        )
        .unwrap();
        let gene = model.gene("g").unwrap();

        let out = resolve(gene, &pair("T", "t")).unwrap();
        assert_eq!(out[0], TraitContribution::new("height", 8.0, "blend(Tall, Short)"));
        assert_eq!(out[1], TraitContribution::new("vigor", 3.0, ""));
    }

    #[test]
    fn test_hemizygous_and_empty() {
        let model = model(DominancePattern::Complete, eye_alleles());
        let gene = model.gene("g").unwrap();

        assert_eq!(resolve(gene, &Genotype::hemizygous("b")).unwrap()[0].descriptor, "Blue");
        assert!(resolve(gene, &Genotype::empty()).unwrap().is_empty());
        assert!(resolve(gene, &pair("B", "Z")).unwrap_err().is_validation());
    }
}
