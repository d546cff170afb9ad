//! Terminal front end for the appointment store.
//!
//! # Responsibility
//! - Map each subcommand onto one core store operation.
//! - Print list rows and overlap warnings; exit non-zero on failure.

use appointment_core::{
    default_log_level, init_logging, time_slots, AppointmentCommand, AppointmentDraft,
    AppointmentStore, CommandOutcome, OverlapPolicy, StoreConfig, StoreError,
    DEFAULT_SLOT_STEP_MINUTES,
};
use clap::{Args, Parser, Subcommand};
use std::error::Error;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

#[derive(Parser)]
#[command(name = "appointments", about = "Manage a personal appointment list")]
struct Cli {
    /// Backing JSON file.
    #[arg(long, global = true, default_value = appointment_core::DEFAULT_FILE_NAME)]
    file: PathBuf,
    /// Reject new appointments that overlap existing ones instead of warning.
    #[arg(long, global = true)]
    block_overlaps: bool,
    /// Write rolling logs to this directory.
    #[arg(long, global = true)]
    log_dir: Option<PathBuf>,
    /// Log level; only meaningful with `--log-dir`.
    #[arg(long, global = true, requires = "log_dir")]
    log_level: Option<String>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List appointments sorted by start.
    List,
    /// Add an appointment.
    Add(CandidateArgs),
    /// Show which appointments a slot would overlap, without adding it.
    Check(CandidateArgs),
    /// Delete by id, or by row with `--index`.
    Delete {
        #[arg(required_unless_present = "index", conflicts_with = "index")]
        id: Option<uuid::Uuid>,
        /// Zero-based row as shown by `list`.
        #[arg(long)]
        index: Option<usize>,
    },
    /// Print start-time choices for one day.
    Slots {
        #[arg(long, default_value_t = DEFAULT_SLOT_STEP_MINUTES)]
        step: u32,
    },
    /// Print core version.
    Version,
}

#[derive(Args)]
struct CandidateArgs {
    #[arg(long)]
    title: String,
    /// `YYYY-MM-DDTHH:MM`, `YYYY-MM-DD HH:MM` or `dd/mm/YYYY HH:MM`.
    #[arg(long)]
    start: String,
    #[arg(long, required_unless_present = "duration")]
    end: Option<String>,
    /// Minutes, used when `--end` is not given.
    #[arg(long)]
    duration: Option<String>,
}

impl From<CandidateArgs> for AppointmentDraft {
    fn from(value: CandidateArgs) -> Self {
        Self {
            title: value.title,
            start: value.start,
            end: value.end,
            duration_minutes: value.duration,
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    if let Some(log_dir) = &cli.log_dir {
        if let Err(err) = start_logging(log_dir, cli.log_level.as_deref()) {
            eprintln!("warning: logging disabled: {err}");
        }
    }

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<(), Box<dyn Error>> {
    let policy = if cli.block_overlaps {
        OverlapPolicy::Block
    } else {
        OverlapPolicy::Warn
    };
    let config = StoreConfig::default()
        .with_file(cli.file)
        .with_policy(policy);

    match cli.command {
        Commands::Version => {
            println!("appointment_core version={}", appointment_core::core_version());
            Ok(())
        }
        Commands::Slots { step } => {
            for slot in time_slots(step)? {
                println!("{slot}");
            }
            Ok(())
        }
        Commands::List => {
            let store = AppointmentStore::from_config(&config);
            warn_load_issue(store.load_issue());
            if store.is_empty() {
                println!("No appointments.");
            }
            for (index, appointment) in store.appointments().iter().enumerate() {
                println!("{index:>3}  {}  {appointment}", appointment.id);
            }
            Ok(())
        }
        Commands::Check(args) => {
            let candidate = AppointmentDraft::from(args).parse()?;
            let store = AppointmentStore::from_config(&config);
            warn_load_issue(store.load_issue());
            let conflicts = store.check(&candidate);
            if conflicts.is_empty() {
                println!("Slot is free.");
            }
            for conflict in conflicts {
                println!("overlaps: {conflict}");
            }
            Ok(())
        }
        Commands::Add(args) => {
            let mut store = AppointmentStore::from_config(&config);
            warn_load_issue(store.load_issue());
            let outcome = store
                .execute(AppointmentCommand::Add(args.into()))
                .inspect_err(print_overlap)?;
            for conflict in outcome.conflicts() {
                eprintln!("warning: overlaps {conflict}");
            }
            print_outcome(&outcome);
            Ok(())
        }
        Commands::Delete { id, index } => {
            let command = match (id, index) {
                (Some(id), _) => AppointmentCommand::Delete(id),
                (None, Some(index)) => AppointmentCommand::DeleteAt(index),
                (None, None) => return Err("provide an id or --index".into()),
            };
            let mut store = AppointmentStore::from_config(&config);
            warn_load_issue(store.load_issue());
            let outcome = store.execute(command)?;
            print_outcome(&outcome);
            Ok(())
        }
    }
}

fn start_logging(log_dir: &Path, level: Option<&str>) -> Result<(), String> {
    let absolute = std::path::absolute(log_dir).map_err(|err| err.to_string())?;
    init_logging(
        level.unwrap_or_else(|| default_log_level()),
        &absolute.to_string_lossy(),
    )
}

fn warn_load_issue(issue: Option<&str>) {
    if let Some(issue) = issue {
        eprintln!("warning: could not load saved appointments, starting empty: {issue}");
    }
}

fn print_overlap(err: &StoreError) {
    if let StoreError::Overlap(conflicts) = err {
        for conflict in conflicts {
            eprintln!("overlaps: {conflict}");
        }
    }
}

fn print_outcome(outcome: &CommandOutcome) {
    match outcome {
        CommandOutcome::Added { appointment, .. } => {
            println!("added {}  {appointment}", appointment.id)
        }
        CommandOutcome::Deleted { appointment } => {
            println!("deleted {}  {appointment}", appointment.id)
        }
    }
}
