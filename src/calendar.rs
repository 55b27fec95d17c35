use chrono::{Datelike, NaiveDate, Weekday};
use thiserror::Error;

/// Couple mois/année ne correspondant à aucun mois calendaire.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("invalid month/year: {month:02}/{year}")]
pub struct InvalidDateError {
    pub month: u32,
    pub year: i32,
}

/// Jour du mois cible, avec son jour de semaine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MonthDay {
    pub date: NaiveDate,
    /// Position 1..=jours-du-mois.
    pub day: u32,
    pub weekday: Weekday,
}

/// Énumère les jours du mois, du 1er au dernier inclus, en ordre.
///
/// Pure fonction de (mois, année) ; aucun état, re-parcourable à volonté.
pub fn month_days(month: u32, year: i32) -> Result<Vec<MonthDay>, InvalidDateError> {
    let first =
        NaiveDate::from_ymd_opt(year, month, 1).ok_or(InvalidDateError { month, year })?;

    let mut days = Vec::with_capacity(31);
    let mut current = first;
    while current.month() == month {
        days.push(MonthDay {
            date: current,
            day: current.day(),
            weekday: current.weekday(),
        });
        current = current
            .succ_opt()
            .ok_or(InvalidDateError { month, year })?;
    }
    Ok(days)
}
