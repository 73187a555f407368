//! Biological sex and parent role assignment for matings.

use crate::error::{GeneticsError, Result};
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Biological sex for sexual reproduction
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Sex {
    #[serde(alias = "male", alias = "M", alias = "m")]
    Male,
    #[serde(alias = "female", alias = "F", alias = "f")]
    Female,
}

impl Sex {
    /// Draw a sex with equal odds from the supplied generator
    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        if rng.gen_bool(0.5) {
            Sex::Male
        } else {
            Sex::Female
        }
    }

    /// Get display character
    pub fn char(&self) -> char {
        match self {
            Sex::Male => '♂',
            Sex::Female => '♀',
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Sex::Male => "male",
            Sex::Female => "female",
        }
    }

    pub fn opposite(&self) -> Self {
        match self {
            Sex::Male => Sex::Female,
            Sex::Female => Sex::Male,
        }
    }
}

impl std::fmt::Display for Sex {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Order a pair of parents as (mother, father).
///
/// Either argument order is accepted; two parents of the same sex are rejected.
pub fn assign_parent_roles<T>(first: (Sex, T), second: (Sex, T)) -> Result<(T, T)> {
    match (first.0, second.0) {
        (Sex::Female, Sex::Male) => Ok((first.1, second.1)),
        (Sex::Male, Sex::Female) => Ok((second.1, first.1)),
        _ => Err(GeneticsError::validation(
            "Mating requires one male and one female parent.",
        )),
    }
}
