use super::state::RunState;
use super::util;
use crate::calendar::MonthDay;
use crate::model::{Assignee, DaySchedule, Limits, Schedule, ShiftSlot, SlotAssignment, Worker};

/// Parcours avant unique sur les jours du mois, créneaux dans l'ordre de
/// déclaration. Aucun retour en arrière : une unité d'effectif sans candidat
/// éligible reçoit la sentinelle externe.
pub(super) fn assign(
    days: &[MonthDay],
    slots: &[ShiftSlot],
    workers: &[Worker],
    limits: &Limits,
) -> Schedule {
    let mut state = RunState::new(workers.len());
    let mut out = Vec::with_capacity(days.len());

    for day in days {
        if day.weekday == limits.week_starts_on {
            state.reset_week();
        }
        state.reset_day();
        state.release_rotation_locks(limits);

        let mut day_slots = Vec::with_capacity(slots.len());
        for (slot_index, slot) in slots.iter().enumerate() {
            day_slots.push(fill_slot(day, slot_index, slot, workers, &mut state, limits));
        }

        for ws in state.iter_mut() {
            if ws.shifts_today == 0 {
                ws.last_rest_date = Some(day.date);
            }
        }

        out.push(DaySchedule {
            date: day.date,
            slots: day_slots,
        });
    }

    Schedule { days: out }
}

/// Pourvoit un créneau : liste ordonnée des candidats éligibles, puis
/// attribution des unités d'effectif dans cet ordre.
fn fill_slot(
    day: &MonthDay,
    slot_index: usize,
    slot: &ShiftSlot,
    workers: &[Worker],
    state: &mut RunState,
    limits: &Limits,
) -> SlotAssignment {
    let mut candidates: Vec<usize> = (0..workers.len())
        .filter(|&index| eligible(index, day, slot_index, slot, workers, state, limits))
        .collect();
    // Équilibrage de charge : le moins chargé de la semaine d'abord.
    // Tri stable, l'ordre de la liste d'entrée départage les égalités.
    candidates.sort_by_key(|&index| state.get(index).weekly_hours);

    let mut assigned = Vec::with_capacity(slot.headcount as usize);
    for unit in 0..slot.headcount as usize {
        match candidates.get(unit) {
            Some(&index) => {
                record_assignment(index, day, slot_index, slot, state);
                assigned.push(Assignee::Internal(workers[index].id.clone()));
            }
            None => assigned.push(Assignee::External),
        }
    }

    SlotAssignment {
        slot_index,
        assigned,
    }
}

fn eligible(
    index: usize,
    day: &MonthDay,
    slot_index: usize,
    slot: &ShiftSlot,
    workers: &[Worker],
    state: &RunState,
    limits: &Limits,
) -> bool {
    let worker = &workers[index];
    let ws = state.get(index);
    let duration = slot.duration_hours();

    if !worker.available_on(day.date) {
        return false;
    }

    // Continuité de rotation : un membre verrouillé sur un autre créneau
    // cette semaine n'est pas tiré ailleurs.
    if ws.current_slot.is_some_and(|held| held != slot_index) {
        return false;
    }

    if !worker.accepts_slot(slot_index) {
        return false;
    }

    if ws.weekly_hours + duration > i64::from(limits.max_hours_per_week) {
        return false;
    }

    if ws.shifts_today >= limits.max_shifts_per_day
        || ws.hours_today + duration > i64::from(limits.max_hours_per_day)
    {
        return false;
    }

    if let Some(prev_end) = ws.last_shift_end {
        let gap = util::rest_gap_hours(prev_end, util::slot_start(day.date, slot));
        if gap < i64::from(limits.min_rest_hours_between_shifts) {
            return false;
        }
    }

    true
}

fn record_assignment(
    index: usize,
    day: &MonthDay,
    slot_index: usize,
    slot: &ShiftSlot,
    state: &mut RunState,
) {
    let duration = slot.duration_hours();
    let ws = state.get_mut(index);
    ws.weekly_hours += duration;
    ws.hours_today += duration;
    ws.shifts_today += 1;
    ws.current_slot = Some(slot_index);
    ws.last_slot = Some(slot_index);
    ws.last_shift_end = Some(util::slot_end(day.date, slot));
}
