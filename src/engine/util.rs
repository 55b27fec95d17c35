use crate::model::ShiftSlot;
use chrono::{Duration, NaiveDate, NaiveDateTime};

/// Début du créneau en datetime absolu (le jour courant, heure pleine).
pub(super) fn slot_start(date: NaiveDate, slot: &ShiftSlot) -> NaiveDateTime {
    date.and_hms_opt(slot.start_hour, 0, 0)
        .expect("slot start_hour validated to 0..=23")
}

/// Fin du créneau en datetime absolu ; un créneau qui déborde minuit
/// (ou se termine à 24h) finit le jour suivant.
pub(super) fn slot_end(date: NaiveDate, slot: &ShiftSlot) -> NaiveDateTime {
    slot_start(date, slot) + Duration::hours(slot.duration_hours())
}

/// Repos entre la fin du dernier poste et le début du prochain, en heures.
/// Négatif si les deux se chevauchent ; le passage de minuit est porté par
/// les datetimes absolus, aucun rattrapage de 24h à faire.
pub(super) fn rest_gap_hours(prev_end: NaiveDateTime, next_start: NaiveDateTime) -> i64 {
    (next_start - prev_end).num_hours()
}
