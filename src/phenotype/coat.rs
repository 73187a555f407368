//! Cat coat color override: dominant white masking, X-linked black/orange
//! (tortoiseshell in heterozygous females) and recessive dilution.

use crate::genetics::genotype::Genotype;
use crate::genetics::individual::Individual;
use crate::genetics::sex::Sex;
use crate::phenotype::descriptors::{normalized_token, strip_non_alnum};
use crate::phenotype::modifiers::PhenotypeOverride;
use crate::phenotype::Phenotype;
use serde::{Deserialize, Serialize};

/// Gene and trait ids the override reads and writes
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CatCoatOverride {
    pub white_gene: String,
    pub black_orange_gene: String,
    pub dilute_gene: String,
    pub coat_trait: String,
    pub pigment_trait: String,
}

impl Default for CatCoatOverride {
    fn default() -> Self {
        Self {
            white_gene: "white_masking".to_string(),
            black_orange_gene: "black_orange".to_string(),
            dilute_gene: "dilute".to_string(),
            coat_trait: "coat_color".to_string(),
            pigment_trait: "pigment_intensity".to_string(),
        }
    }
}

#[derive(Debug, Default, Clone, Copy)]
struct Pigments {
    black: bool,
    orange: bool,
}

impl CatCoatOverride {
    pub fn new() -> Self {
        Self::default()
    }

    fn has_dominant_white(genotype: &Genotype) -> bool {
        genotype.iter().any(|allele| {
            strip_non_alnum(allele) == "W"
                || matches!(normalized_token(allele).as_str(), "WHITE" | "WMASK")
        })
    }

    /// Two copies of the recessive "d" allele
    fn is_dilute(genotype: &Genotype) -> bool {
        genotype.len() == 2 && genotype.iter().all(|allele| strip_non_alnum(allele) == "d")
    }

    fn pigments(genotype: &Genotype) -> Pigments {
        let mut pigments = Pigments::default();
        for allele in genotype.iter() {
            match normalized_token(allele).as_str() {
                "XB" | "B" => pigments.black = true,
                "XO" | "O" => pigments.orange = true,
                _ => {}
            }
        }
        pigments
    }

    fn coat_descriptor(sex: Sex, pigments: Pigments, dilute: bool) -> Option<String> {
        let color = match (sex, pigments.black, pigments.orange) {
            (Sex::Female, true, true) => {
                if dilute {
                    "Dilute Tortoiseshell"
                } else {
                    "Tortoiseshell"
                }
            }
            (_, true, _) => {
                if dilute {
                    "Blue"
                } else {
                    "Black"
                }
            }
            (_, false, true) => {
                if dilute {
                    "Cream"
                } else {
                    "Orange"
                }
            }
            (_, false, false) => return None,
        };
        let sex_label = match sex {
            Sex::Female => "Female",
            Sex::Male => "Male",
        };
        Some(format!("{} {}", color, sex_label))
    }
}

impl PhenotypeOverride for CatCoatOverride {
    fn name(&self) -> &str {
        "cat_coat"
    }

    fn apply(&self, individual: &Individual, phenotype: &mut Phenotype) {
        let white = individual.genotype(&self.white_gene);
        let black_orange = individual.genotype(&self.black_orange_gene);
        let dilute = individual
            .genotype(&self.dilute_gene)
            .filter(|genotype| !genotype.is_empty());

        if white.is_none() && black_orange.is_none() && dilute.is_none() {
            return;
        }

        let is_dilute = dilute.map(Self::is_dilute).unwrap_or(false);

        let coat = if white.map(Self::has_dominant_white).unwrap_or(false) {
            Some("Solid White".to_string())
        } else {
            black_orange
                .filter(|genotype| !genotype.is_empty())
                .and_then(|genotype| {
                    Self::coat_descriptor(individual.sex(), Self::pigments(genotype), is_dilute)
                })
        };

        if let Some(coat) = coat {
            phenotype.entry(&self.coat_trait).overwrite(0.0, &coat);
        }

        if dilute.is_some() {
            let intensity = if is_dilute { "Dilute" } else { "Dense" };
            phenotype.entry(&self.pigment_trait).overwrite(0.0, intensity);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    fn cat(sex: Sex, entries: &[(&str, &[&str])]) -> Individual {
        let genotypes: BTreeMap<_, _> = entries
            .iter()
            .map(|(gene, alleles)| {
                (
                    gene.to_string(),
                    Genotype::new(alleles.iter().map(|a| a.to_string()).collect()),
                )
            })
            .collect();
        Individual::from_parts(sex, genotypes)
    }

    fn coat(individual: &Individual) -> Phenotype {
        let mut phenotype = Phenotype::new();
        phenotype.entry("coat_color").add(0.0, "Black");
        CatCoatOverride::new().apply(individual, &mut phenotype);
        phenotype
    }

    #[test]
    fn test_tortoiseshell_female() {
        let phenotype = coat(&cat(Sex::Female, &[("black_orange", &["XB", "XO"])]));
        assert_eq!(phenotype.summary("coat_color").unwrap(), "Tortoiseshell Female");
        assert!(phenotype.get("pigment_intensity").is_none());
    }

    #[test]
    fn test_male_single_x() {
        let phenotype = coat(&cat(Sex::Male, &[("black_orange", &["X^O"])]));
        assert_eq!(phenotype.summary("coat_color").unwrap(), "Orange Male");
    }

    #[test]
    fn test_dilution() {
        let phenotype = coat(&cat(
            Sex::Female,
            &[("black_orange", &["XB", "XO"]), ("dilute", &["d", "d"])],
        ));
        assert_eq!(phenotype.summary("coat_color").unwrap(), "Dilute Tortoiseshell Female");
        assert_eq!(phenotype.summary("pigment_intensity").unwrap(), "Dilute");

        let phenotype = coat(&cat(Sex::Male, &[("black_orange", &["XB"]), ("dilute", &["D", "d"])]));
        assert_eq!(phenotype.summary("coat_color").unwrap(), "Black Male");
        assert_eq!(phenotype.summary("pigment_intensity").unwrap(), "Dense");
    }

    #[test]
    fn test_white_masks_everything() {
        let phenotype = coat(&cat(
            Sex::Male,
            &[("white_masking", &["W", "w"]), ("black_orange", &["XO"])],
        ));
        assert_eq!(phenotype.summary("coat_color").unwrap(), "Solid White");
    }

    #[test]
    fn test_unrelated_individual_untouched() {
        let phenotype = coat(&cat(Sex::Female, &[("eye_color", &["B", "b"])]));
        assert_eq!(phenotype.summary("coat_color").unwrap(), "Black");
    }
}
