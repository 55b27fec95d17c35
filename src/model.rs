use chrono::{NaiveDate, Weekday};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

/// Identifiant fort pour Worker
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct WorkerId(String);

impl WorkerId {
    pub fn new<S: AsRef<str>>(s: S) -> Self {
        Self(s.as_ref().to_owned())
    }
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for WorkerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Membre de l'équipe postée.
///
/// `unavailable` liste les jours où la personne ne peut prendre aucun poste.
/// `preferred_slots` liste les index de créneaux acceptés ; un ensemble vide
/// signifie "tous les créneaux" (défaut ouvert, volontaire).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Worker {
    pub id: WorkerId,
    pub display_name: String,
    #[serde(default, skip_serializing_if = "BTreeSet::is_empty")]
    pub unavailable: BTreeSet<NaiveDate>,
    #[serde(default, skip_serializing_if = "BTreeSet::is_empty")]
    pub preferred_slots: BTreeSet<usize>,
}

impl Worker {
    pub fn new<I: AsRef<str>, D: Into<String>>(id: I, display_name: D) -> Self {
        Self {
            id: WorkerId::new(id),
            display_name: display_name.into(),
            unavailable: BTreeSet::new(),
            preferred_slots: BTreeSet::new(),
        }
    }

    pub fn available_on(&self, date: NaiveDate) -> bool {
        !self.unavailable.contains(&date)
    }

    /// Ensemble vide = tous les créneaux acceptés.
    pub fn accepts_slot(&self, slot_index: usize) -> bool {
        self.preferred_slots.is_empty() || self.preferred_slots.contains(&slot_index)
    }
}

/// Créneau journalier (heures entières, effectif requis).
///
/// `end_hour == 24` désigne minuit en fin de journée ;
/// `end_hour <= start_hour` (ex. 22→6) déborde sur le jour suivant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShiftSlot {
    pub start_hour: u32,
    pub end_hour: u32,
    pub headcount: u32,
}

impl ShiftSlot {
    /// Crée un créneau en validant bornes et effectif.
    pub fn new(start_hour: u32, end_hour: u32, headcount: u32) -> Result<Self, String> {
        let slot = Self {
            start_hour,
            end_hour,
            headcount,
        };
        slot.validate()?;
        Ok(slot)
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.start_hour > 23 {
            return Err("slot start_hour must be in 0..=23".to_string());
        }
        if self.end_hour < 1 || self.end_hour > 24 {
            return Err("slot end_hour must be in 1..=24".to_string());
        }
        if self.end_hour == self.start_hour {
            return Err("slot cannot be empty (end_hour == start_hour)".to_string());
        }
        if self.headcount == 0 {
            return Err("slot headcount must be > 0".to_string());
        }
        Ok(())
    }

    /// Durée en heures (gère le débordement sur le jour suivant).
    pub fn duration_hours(&self) -> i64 {
        let mut d = i64::from(self.end_hour) - i64::from(self.start_hour);
        if d <= 0 {
            d += 24;
        }
        d
    }

    pub fn wraps_midnight(&self) -> bool {
        self.end_hour <= self.start_hour
    }

    /// Libellé d'affichage, `24` rendu comme `00h` (ex. `16h-00h`).
    pub fn label(&self) -> String {
        let end = if self.end_hour == 24 { 0 } else { self.end_hour };
        format!("{:02}h-{:02}h", self.start_hour, end)
    }
}

/// Bornes de charge et de repos appliquées par le moteur d'affectation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Limits {
    pub max_hours_per_day: u32,
    pub max_hours_per_week: u32,
    pub max_shifts_per_day: u32,
    pub min_rest_hours_between_shifts: u32,
    pub rest_days_per_week: u32,
    /// Durée nominale d'un poste, utilisée pour la réserve de repos hebdomadaire.
    pub hours_per_shift: u32,
    /// Jour qui remet les compteurs hebdomadaires à zéro.
    #[serde(default = "default_week_start")]
    pub week_starts_on: Weekday,
}

fn default_week_start() -> Weekday {
    Weekday::Mon
}

impl Default for Limits {
    fn default() -> Self {
        Self {
            max_hours_per_day: 8,
            max_hours_per_week: 40,
            max_shifts_per_day: 1,
            min_rest_hours_between_shifts: 12,
            rest_days_per_week: 1,
            hours_per_shift: 8,
            week_starts_on: Weekday::Mon,
        }
    }
}

impl Limits {
    /// Les plafonds doivent être strictement positifs ; les durées de repos
    /// peuvent être nulles. La cohérence croisée entre `max_hours_per_week`
    /// et `hours_per_shift × (7 − rest_days_per_week)` n'est pas vérifiée :
    /// un couple incohérent produit simplement plus de recours externes.
    pub fn validate(&self) -> Result<(), &'static str> {
        if self.max_hours_per_day == 0 {
            return Err("max_hours_per_day must be > 0");
        }
        if self.max_hours_per_week == 0 {
            return Err("max_hours_per_week must be > 0");
        }
        if self.max_shifts_per_day == 0 {
            return Err("max_shifts_per_day must be > 0");
        }
        if self.hours_per_shift == 0 {
            return Err("hours_per_shift must be > 0");
        }
        Ok(())
    }

    /// Seuil de déverrouillage de rotation : heures hebdomadaires à partir
    /// desquelles un membre doit redevenir libre de créneau.
    pub fn rotation_release_threshold(&self) -> i64 {
        i64::from(self.max_hours_per_week)
            - i64::from(self.rest_days_per_week) * i64::from(self.hours_per_shift)
    }
}

/// Plan complet : l'équipe, les créneaux du jour, les bornes.
///
/// L'ordre de `workers` est significatif : il départage les égalités
/// d'heures hebdomadaires lors de l'affectation.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Plan {
    pub workers: Vec<Worker>,
    pub slots: Vec<ShiftSlot>,
    #[serde(default)]
    pub limits: Limits,
}

impl Plan {
    pub fn find_worker<'a>(&'a self, id: &WorkerId) -> Option<&'a Worker> {
        self.workers.iter().find(|w| &w.id == id)
    }
    pub fn find_worker_mut(&mut self, id: &WorkerId) -> Option<&mut Worker> {
        self.workers.iter_mut().find(|w| &w.id == id)
    }

    pub fn validate(&self) -> Result<(), String> {
        self.limits.validate().map_err(str::to_string)?;
        if self.slots.is_empty() {
            return Err("plan must define at least one shift slot".to_string());
        }
        for slot in &self.slots {
            slot.validate()?;
        }
        let mut seen = BTreeSet::new();
        for w in &self.workers {
            if !seen.insert(&w.id) {
                return Err(format!("duplicate worker id: {}", w.id));
            }
            if let Some(&idx) = w.preferred_slots.iter().next_back() {
                if idx >= self.slots.len() {
                    return Err(format!(
                        "worker {} prefers slot {idx} but plan only has {} slots",
                        w.id,
                        self.slots.len()
                    ));
                }
            }
        }
        Ok(())
    }
}

/// Sentinelle de recours externe, telle qu'elle apparaît dans les exports.
pub const EXTERNAL_LABEL: &str = "(External)";

/// Occupant d'une unité d'effectif : un membre interne, ou le recours externe
/// quand aucun membre éligible ne reste.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Assignee {
    Internal(WorkerId),
    External,
}

impl Assignee {
    pub fn as_str(&self) -> &str {
        match self {
            Assignee::Internal(id) => id.as_str(),
            Assignee::External => EXTERNAL_LABEL,
        }
    }

    pub fn is_external(&self) -> bool {
        matches!(self, Assignee::External)
    }
}

impl fmt::Display for Assignee {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for Assignee {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Assignee {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Ok(if s == EXTERNAL_LABEL {
            Assignee::External
        } else {
            Assignee::Internal(WorkerId::new(s))
        })
    }
}

/// Affectations d'un créneau pour une date donnée ; `assigned` contient
/// exactement `headcount` entrées, dans l'ordre d'attribution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlotAssignment {
    pub slot_index: usize,
    pub assigned: Vec<Assignee>,
}

/// Journée planifiée, créneaux dans l'ordre de déclaration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DaySchedule {
    pub date: NaiveDate,
    pub slots: Vec<SlotAssignment>,
}

/// Planning complet du mois, jours en ordre chronologique.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Schedule {
    pub days: Vec<DaySchedule>,
}

impl Schedule {
    pub fn day(&self, date: NaiveDate) -> Option<&DaySchedule> {
        self.days.iter().find(|d| d.date == date)
    }

    /// Affectations internes d'un membre, en ordre chronologique
    /// (ordre des jours puis des créneaux).
    pub fn assignments_of<'a>(
        &'a self,
        worker: &'a WorkerId,
    ) -> impl Iterator<Item = (NaiveDate, usize)> + 'a {
        self.days.iter().flat_map(move |day| {
            day.slots.iter().filter_map(move |slot| {
                slot.assigned
                    .iter()
                    .any(|a| matches!(a, Assignee::Internal(id) if id == worker))
                    .then_some((day.date, slot.slot_index))
            })
        })
    }
}
