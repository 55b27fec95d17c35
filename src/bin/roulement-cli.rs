#![forbid(unsafe_code)]
use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use roulement::{
    engine::generate_schedule,
    io,
    model::{Plan, ShiftSlot, Worker},
    storage::{JsonStorage, Storage},
};
#[cfg(feature = "logging")]
use tracing_subscriber::{fmt::Subscriber, EnvFilter};

/// CLI minimaliste de planning posté (sans base de données)
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Cli {
    /// Active les logs (feature `logging`)
    #[arg(long, global = true)]
    log: bool,

    /// Fichier JSON de plan
    #[arg(long, global = true, default_value = "plan.json")]
    plan: String,

    #[command(subcommand)]
    cmd: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Créer un plan de départ (3×8 classique : 08-16 ×2, 16-24 ×2, 00-08 ×1)
    Init {
        /// Écrase un plan existant
        #[arg(long)]
        force: bool,
    },

    /// Ajouter un membre à l'équipe
    AddWorker {
        #[arg(long)]
        id: String,
        #[arg(long)]
        name: String,
        /// Dates indisponibles `YYYY-MM-DD` séparées par `;`
        #[arg(long)]
        unavailable: Option<String>,
        /// Index de créneaux acceptés séparés par `;` (vide = tous)
        #[arg(long)]
        prefers: Option<String>,
    },

    /// Importer des membres depuis un CSV
    ImportWorkers {
        #[arg(long)]
        csv: String,
    },

    /// Remplacer les créneaux du jour, ex. `8-16x2,16-24x2,0-8x1`
    SetSlots {
        #[arg(long)]
        slots: String,
    },

    /// Générer le planning d'un mois et l'afficher
    Generate {
        /// Mois cible (1-12)
        #[arg(long)]
        month: u32,
        #[arg(long)]
        year: i32,
        #[arg(long)]
        out_csv: Option<String>,
        #[arg(long)]
        out_json: Option<String>,
    },

    /// Lister l'équipe et les créneaux du plan
    List,

    /// Vérifier la cohérence du plan
    Check,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    #[cfg(feature = "logging")]
    if cli.log {
        let _ = Subscriber::builder()
            .with_env_filter(EnvFilter::from_default_env())
            .try_init();
    }

    let storage = JsonStorage::open(&cli.plan)?;

    let code = match cli.cmd {
        Commands::Init { force } => {
            if storage.exists() && !force {
                bail!("plan already exists: {} (use --force)", cli.plan);
            }
            let plan = starter_plan()?;
            storage.save(&plan)?;
            println!("Plan written to {}", cli.plan);
            0
        }
        Commands::AddWorker {
            id,
            name,
            unavailable,
            prefers,
        } => {
            let mut plan = load_or_default(&storage);
            let mut worker = Worker::new(id.as_str(), name);
            if let Some(raw) = unavailable {
                worker.unavailable = io::parse_dates(&raw)?;
            }
            if let Some(raw) = prefers {
                worker.preferred_slots = io::parse_slot_indices(&raw)?;
            }
            if plan.find_worker(&worker.id).is_some() {
                bail!("worker already in plan: {id}");
            }
            plan.workers.push(worker);
            storage.save(&plan)?;
            0
        }
        Commands::ImportWorkers { csv } => {
            let mut plan = load_or_default(&storage);
            let workers = io::import_workers_csv(csv)?;
            plan.workers.extend(workers);
            storage.save(&plan)?;
            0
        }
        Commands::SetSlots { slots } => {
            let mut plan = load_or_default(&storage);
            plan.slots = parse_slot_specs(&slots)?;
            storage.save(&plan)?;
            0
        }
        Commands::Generate {
            month,
            year,
            out_csv,
            out_json,
        } => {
            let plan = storage.load()?;
            let schedule = generate_schedule(&plan, month, year)?;
            if let Some(path) = out_csv {
                io::export_schedule_csv(path, &schedule, &plan.slots)?;
            }
            if let Some(path) = out_json {
                io::export_schedule_json(path, &schedule)?;
            }
            print!("{}", io::render_schedule(&schedule, &plan.slots));
            0
        }
        Commands::List => {
            let plan = storage.load()?;
            for (index, slot) in plan.slots.iter().enumerate() {
                println!("slot {index} | {} | x{}", slot.label(), slot.headcount);
            }
            for w in &plan.workers {
                let prefers = if w.preferred_slots.is_empty() {
                    "all".to_string()
                } else {
                    w.preferred_slots
                        .iter()
                        .map(usize::to_string)
                        .collect::<Vec<_>>()
                        .join(";")
                };
                println!(
                    "{} | {} | unavailable: {} | prefers: {}",
                    w.id,
                    w.display_name,
                    w.unavailable.len(),
                    prefers
                );
            }
            0
        }
        Commands::Check => {
            let plan = storage.load()?;
            match plan.validate() {
                Ok(()) => {
                    println!("OK: plan is consistent");
                    0
                }
                Err(msg) => {
                    eprintln!("Invalid plan: {msg}");
                    // Code 2 = WARNING/INCOMPLETE
                    2
                }
            }
        }
    };

    std::process::exit(code);
}

fn load_or_default(storage: &JsonStorage) -> Plan {
    storage.load().unwrap_or_default()
}

fn starter_plan() -> Result<Plan> {
    Ok(Plan {
        slots: parse_slot_specs("8-16x2,16-24x2,0-8x1")?,
        ..Plan::default()
    })
}

/// Liste de créneaux `début-finxEffectif` séparés par des virgules.
fn parse_slot_specs(raw: &str) -> Result<Vec<ShiftSlot>> {
    let mut out = Vec::new();
    for chunk in raw.split(',').filter(|c| !c.trim().is_empty()) {
        let chunk = chunk.trim();
        let (range, headcount) = chunk
            .split_once('x')
            .with_context(|| format!("invalid slot spec (missing x): {chunk}"))?;
        let (start, end) = range
            .split_once('-')
            .with_context(|| format!("invalid slot spec (missing -): {chunk}"))?;
        let start: u32 = start
            .trim()
            .parse()
            .with_context(|| format!("invalid start hour: {chunk}"))?;
        let end: u32 = end
            .trim()
            .parse()
            .with_context(|| format!("invalid end hour: {chunk}"))?;
        let headcount: u32 = headcount
            .trim()
            .parse()
            .with_context(|| format!("invalid headcount: {chunk}"))?;
        out.push(ShiftSlot::new(start, end, headcount).map_err(anyhow::Error::msg)?);
    }
    if out.is_empty() {
        bail!("no slot specs given");
    }
    Ok(out)
}
