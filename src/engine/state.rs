use crate::model::Limits;
use chrono::{NaiveDate, NaiveDateTime};

/// Compteurs courants d'un membre pendant un parcours du mois.
#[derive(Debug, Clone, Default)]
pub(super) struct WorkerState {
    /// Heures cumulées depuis la dernière borne de semaine.
    pub weekly_hours: i64,
    /// Verrou de rotation : créneau tenu cette semaine, `None` = libre.
    pub current_slot: Option<usize>,
    /// Fin du dernier poste travaillé, pour le repos inter-postes.
    pub last_shift_end: Option<NaiveDateTime>,
    pub last_slot: Option<usize>,
    /// Dernier jour sans aucune affectation.
    pub last_rest_date: Option<NaiveDate>,
    pub shifts_today: u32,
    pub hours_today: i64,
}

/// État d'un parcours, possédé exclusivement par ce parcours : une table
/// de compteurs indexée par la position du membre dans la liste d'entrée.
/// Créé au départ, jeté à l'arrivée ; jamais global, jamais persisté.
#[derive(Debug)]
pub(super) struct RunState {
    workers: Vec<WorkerState>,
}

impl RunState {
    pub fn new(worker_count: usize) -> Self {
        Self {
            workers: vec![WorkerState::default(); worker_count],
        }
    }

    pub fn get(&self, index: usize) -> &WorkerState {
        &self.workers[index]
    }

    pub fn get_mut(&mut self, index: usize) -> &mut WorkerState {
        &mut self.workers[index]
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut WorkerState> {
        self.workers.iter_mut()
    }

    /// Borne de semaine : remise à zéro des cumuls hebdomadaires.
    pub fn reset_week(&mut self) {
        for w in &mut self.workers {
            w.weekly_hours = 0;
        }
    }

    /// Remise à zéro des compteurs journaliers.
    pub fn reset_day(&mut self) {
        for w in &mut self.workers {
            w.shifts_today = 0;
            w.hours_today = 0;
        }
    }

    /// Déverrouille la rotation des membres arrivés à la réserve de repos
    /// hebdomadaire : ils ne doivent plus rester collés à un créneau qui
    /// les pousserait au-delà du plafond.
    pub fn release_rotation_locks(&mut self, limits: &Limits) {
        let threshold = limits.rotation_release_threshold();
        for w in &mut self.workers {
            if w.weekly_hours >= threshold {
                w.current_slot = None;
            }
        }
    }
}
