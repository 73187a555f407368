//! Fills in defaults and validates a caller-supplied genotype.

use crate::error::{GeneticsError, Result};
use crate::genetics::genotype::Genotype;
use crate::genetics::model::{ChromosomeType, IndexedGene};
use crate::genetics::sex::Sex;

/// Normalize `provided` alleles for one gene given the carrier's sex.
///
/// Autosomal genes and female X genes end up with two alleles, male X and Y
/// genes with one, female Y genes with none. Normalizing an already
/// normalized genotype returns it unchanged.
pub fn normalize<A: AsRef<str>>(gene: &IndexedGene, provided: &[A], sex: Sex) -> Result<Genotype> {
    for allele in provided {
        gene.require_allele(allele.as_ref())?;
    }

    let owned = |allele: &A| allele.as_ref().to_string();

    match (gene.chromosome(), sex) {
        (ChromosomeType::Autosomal, _) | (ChromosomeType::X, Sex::Female) => diploid(gene, provided),
        (ChromosomeType::X, Sex::Male) => match provided {
            [] => Ok(Genotype::hemizygous(gene.default_allele())),
            [allele] => Ok(Genotype::hemizygous(owned(allele))),
            _ => Err(GeneticsError::validation(format!(
                "Gene '{}': male must supply exactly one X-linked allele",
                gene.id()
            ))),
        },
        (ChromosomeType::Y, Sex::Female) => {
            if provided.is_empty() {
                Ok(Genotype::empty())
            } else {
                Err(GeneticsError::validation(format!(
                    "Gene '{}': female cannot carry Y-linked gene",
                    gene.id()
                )))
            }
        }
        (ChromosomeType::Y, Sex::Male) => match provided {
            [] => Ok(Genotype::hemizygous(gene.default_allele())),
            [allele] => Ok(Genotype::hemizygous(owned(allele))),
            _ => Err(GeneticsError::validation(format!(
                "Gene '{}': male must supply exactly one Y-linked allele",
                gene.id()
            ))),
        },
    }
}

fn diploid<A: AsRef<str>>(gene: &IndexedGene, provided: &[A]) -> Result<Genotype> {
    match provided {
        [] => Ok(Genotype::homozygous(gene.default_allele())),
        [allele] => Ok(Genotype::homozygous(allele.as_ref())),
        [first, second] => Ok(Genotype::new(vec![
            first.as_ref().to_string(),
            second.as_ref().to_string(),
        ])),
        _ => Err(GeneticsError::validation(format!(
            "Gene '{}' accepts at most two alleles, got {}",
            gene.id(),
            provided.len()
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::genetics::model::{Allele, DominancePattern, Gene, GeneticModel};

    fn model() -> GeneticModel {
        let alleles = || vec![Allele::new("A", 1), Allele::new("a", 0)];
        GeneticModel::build(
            vec![
                Gene::new("auto", ChromosomeType::Autosomal, DominancePattern::Complete, alleles()),
                Gene::new("xgene", ChromosomeType::X, DominancePattern::Complete, alleles())
                    .with_default_allele("a"),
                Gene::new("ygene", ChromosomeType::Y, DominancePattern::Complete, alleles()),
            ],
            Vec::new(),
        )
        .unwrap()
    }

    fn ids(genotype: &Genotype) -> Vec<&str> {
        genotype.iter().collect()
    }

    #[test]
    fn test_autosomal_rules() {
        let model = model();
        let gene = model.gene("auto").unwrap();
        let none: [&str; 0] = [];

        assert_eq!(ids(&normalize(gene, &none, Sex::Male).unwrap()), vec!["A", "A"]);
        assert_eq!(ids(&normalize(gene, &["a"], Sex::Female).unwrap()), vec!["a", "a"]);
        assert_eq!(ids(&normalize(gene, &["a", "A"], Sex::Male).unwrap()), vec!["a", "A"]);
        assert!(normalize(gene, &["A", "a", "A"], Sex::Male).unwrap_err().is_validation());
        assert!(normalize(gene, &["Z"], Sex::Male).unwrap_err().is_validation());
    }

    #[test]
    fn test_x_linked_rules() {
        let model = model();
        let gene = model.gene("xgene").unwrap();
        let none: [&str; 0] = [];

        assert_eq!(ids(&normalize(gene, &none, Sex::Female).unwrap()), vec!["a", "a"]);
        assert_eq!(ids(&normalize(gene, &["A", "a"], Sex::Female).unwrap()), vec!["A", "a"]);
        assert_eq!(ids(&normalize(gene, &none, Sex::Male).unwrap()), vec!["a"]);
        assert_eq!(ids(&normalize(gene, &["A"], Sex::Male).unwrap()), vec!["A"]);

        let err = normalize(gene, &["A", "a"], Sex::Male).unwrap_err();
        assert!(err.to_string().contains("male must supply exactly one X-linked allele"));
    }

    #[test]
    fn test_y_linked_rules() {
        let model = model();
        let gene = model.gene("ygene").unwrap();
        let none: [&str; 0] = [];

        assert!(normalize(gene, &none, Sex::Female).unwrap().is_empty());
        let err = normalize(gene, &["A"], Sex::Female).unwrap_err();
        assert!(err.to_string().contains("female cannot carry Y-linked gene"));

        assert_eq!(ids(&normalize(gene, &none, Sex::Male).unwrap()), vec!["A"]);
        assert_eq!(ids(&normalize(gene, &["a"], Sex::Male).unwrap()), vec!["a"]);
        assert!(normalize(gene, &["A", "A"], Sex::Male).is_err());
    }

    #[test]
    fn test_idempotent() {
        let model = model();
        let inputs: Vec<(&str, Vec<&str>, Sex)> = vec![
            ("auto", vec![], Sex::Female),
            ("auto", vec!["a"], Sex::Male),
            ("auto", vec!["a", "A"], Sex::Female),
            ("xgene", vec!["A"], Sex::Male),
            ("xgene", vec!["A", "a"], Sex::Female),
            ("ygene", vec![], Sex::Male),
            ("ygene", vec![], Sex::Female),
        ];

        for (gene_id, provided, sex) in inputs {
            let gene = model.gene(gene_id).unwrap();
            let once = normalize(gene, &provided, sex).unwrap();
            let twice = normalize(gene, once.alleles(), sex).unwrap();
            assert_eq!(once, twice, "gene {} not idempotent", gene_id);
        }
    }
}
