use crate::calendar::InvalidDateError;
use thiserror::Error;

/// Échecs fatals du moteur ; tout survient avant la moindre affectation.
///
/// L'impossibilité de pourvoir un créneau n'est jamais une erreur : elle
/// se traduit en recours externes dans le planning produit.
#[derive(Error, Debug)]
pub enum EngineError {
    #[error(transparent)]
    InvalidDate(#[from] InvalidDateError),
    #[error("invalid limits: {0}")]
    InvalidLimits(&'static str),
}
