use crate::model::{Schedule, ShiftSlot, Worker};
use anyhow::{bail, Context};
use chrono::NaiveDate;
use csv::{ReaderBuilder, WriterBuilder};
use std::collections::BTreeSet;
use std::fmt::Write as _;
use std::fs;
use std::path::Path;

/// Import de membres depuis CSV: header `id,display_name[,unavailable][,preferred_slots]`
///
/// `unavailable` : dates `YYYY-MM-DD` séparées par `;`.
/// `preferred_slots` : index de créneaux séparés par `;` (vide = tous).
pub fn import_workers_csv<P: AsRef<Path>>(path: P) -> anyhow::Result<Vec<Worker>> {
    let mut rdr = ReaderBuilder::new().has_headers(true).from_path(path)?;
    let mut out = Vec::new();
    for rec in rdr.records() {
        let rec = rec?;
        let id = rec.get(0).context("missing id")?.trim();
        let display = rec.get(1).context("missing display_name")?.trim();
        if id.is_empty() || display.is_empty() {
            bail!("invalid worker row (empty)");
        }
        let mut worker = Worker::new(id, display.to_string());
        if let Some(dates) = rec.get(2) {
            let dates = dates.trim();
            if !dates.is_empty() {
                worker.unavailable = parse_dates(dates)
                    .with_context(|| format!("invalid unavailable value for id {id}"))?;
            }
        }
        if let Some(slots) = rec.get(3) {
            let slots = slots.trim();
            if !slots.is_empty() {
                worker.preferred_slots = parse_slot_indices(slots)
                    .with_context(|| format!("invalid preferred_slots value for id {id}"))?;
            }
        }
        out.push(worker);
    }
    Ok(out)
}

/// Dates `YYYY-MM-DD` séparées par `;`.
pub fn parse_dates(raw: &str) -> anyhow::Result<BTreeSet<NaiveDate>> {
    raw.split(';')
        .filter(|chunk| !chunk.trim().is_empty())
        .map(|chunk| {
            let chunk = chunk.trim();
            NaiveDate::parse_from_str(chunk, "%Y-%m-%d")
                .with_context(|| format!("invalid date: {chunk}"))
        })
        .collect()
}

/// Index de créneaux séparés par `;`.
pub fn parse_slot_indices(raw: &str) -> anyhow::Result<BTreeSet<usize>> {
    raw.split(';')
        .filter(|chunk| !chunk.trim().is_empty())
        .map(|chunk| {
            let chunk = chunk.trim();
            chunk
                .parse::<usize>()
                .with_context(|| format!("invalid slot index: {chunk}"))
        })
        .collect()
}

/// Listing compact du planning : une ligne par jour, une sous-ligne par
/// créneau, occupants joints par des virgules.
pub fn render_schedule(schedule: &Schedule, slots: &[ShiftSlot]) -> String {
    let mut out = String::new();
    for day in &schedule.days {
        let _ = writeln!(out, "{}:", day.date.format("%Y-%m-%d"));
        for slot_assignment in &day.slots {
            let label = slots
                .get(slot_assignment.slot_index)
                .map(ShiftSlot::label)
                .unwrap_or_else(|| format!("slot {}", slot_assignment.slot_index));
            let joined = slot_assignment
                .assigned
                .iter()
                .map(|a| a.as_str())
                .collect::<Vec<_>>()
                .join(", ");
            let _ = writeln!(out, " {label}: {joined}");
        }
    }
    out
}

/// Export JSON du planning (jolie mise en forme)
pub fn export_schedule_json<P: AsRef<Path>>(path: P, schedule: &Schedule) -> anyhow::Result<()> {
    let s = serde_json::to_string_pretty(schedule)?;
    fs::write(path, s)?;
    Ok(())
}

/// Export CSV du planning : lignes = jours, colonnes = libellés de créneaux,
/// cellules = occupants joints par des virgules.
pub fn export_schedule_csv<P: AsRef<Path>>(
    path: P,
    schedule: &Schedule,
    slots: &[ShiftSlot],
) -> anyhow::Result<()> {
    let mut w = WriterBuilder::new().has_headers(true).from_path(path)?;
    let mut header = vec!["date".to_string()];
    header.extend(slots.iter().map(ShiftSlot::label));
    w.write_record(&header)?;
    for day in &schedule.days {
        let mut row = vec![day.date.format("%Y-%m-%d").to_string()];
        for slot_assignment in &day.slots {
            row.push(
                slot_assignment
                    .assigned
                    .iter()
                    .map(|a| a.as_str())
                    .collect::<Vec<_>>()
                    .join(", "),
            );
        }
        w.write_record(&row)?;
    }
    w.flush()?;
    Ok(())
}
