mod assignment;
mod state;
mod types;
mod util;

pub use types::EngineError;

use crate::calendar;
use crate::model::{Plan, Schedule};

/// Génère le planning du mois demandé à partir d'un plan.
///
/// Passe avant déterministe : à entrées identiques (ordre des membres
/// compris), planning identique à l'octet près. Échoue uniquement à la
/// validation, avant toute affectation ; les créneaux impossibles à
/// pourvoir reçoivent la sentinelle externe, jamais une erreur.
pub fn generate_schedule(plan: &Plan, month: u32, year: i32) -> Result<Schedule, EngineError> {
    plan.limits.validate().map_err(EngineError::InvalidLimits)?;
    let days = calendar::month_days(month, year)?;
    Ok(assignment::assign(
        &days,
        &plan.slots,
        &plan.workers,
        &plan.limits,
    ))
}
