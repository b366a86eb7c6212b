//! Terminal front end for the user data recorder.
//!
//! Renders the records list and the entry form as text and forwards
//! the user's input to the core view-state controller.

mod render;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use log::info;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use userdata_core::{
    core_version, default_log_level, init_logging, RecordId, RecordsState, RecordsViewModel,
    SqliteRecordStore, StoreRecordRepository, UiState,
};

type ViewModel = RecordsViewModel<StoreRecordRepository<SqliteRecordStore>>;

#[derive(Parser, Debug)]
#[command(name = "userdata")]
#[command(about = "Record and list personal data entries")]
struct Args {
    /// SQLite database file, created on first use
    #[arg(long, default_value = "userdata.sqlite3")]
    db: PathBuf,

    /// Absolute directory for rolling log files; logging is off when omitted
    #[arg(long)]
    log_dir: Option<PathBuf>,

    /// trace|debug|info|warn|error
    #[arg(long)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Show all records, newest first
    List,
    /// Validate and save one entry
    Add {
        #[arg(long, default_value = "", allow_hyphen_values = true)]
        name: String,
        #[arg(long, default_value = "", allow_hyphen_values = true)]
        age: String,
        #[arg(long, default_value = "", allow_hyphen_values = true)]
        dob: String,
        #[arg(long, default_value = "", allow_hyphen_values = true)]
        address: String,
    },
    /// Print the core library version
    Version,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<ExitCode> {
    let args = Args::parse();

    if let Some(log_dir) = &args.log_dir {
        let level = args.log_level.as_deref().unwrap_or(default_log_level());
        init_logging(level, &log_dir.to_string_lossy()).context("failed to start logging")?;
    }

    match args.command {
        Command::Version => {
            println!("userdata_core version={}", core_version());
            Ok(ExitCode::SUCCESS)
        }
        Command::List => {
            let view_model = open_view_model(&args.db)?;
            let mut records = view_model.records_state();
            let state = records
                .loaded()
                .await
                .context("failed to load records")?;
            print!("{}", render::render_records(&state));
            Ok(ExitCode::SUCCESS)
        }
        Command::Add {
            name,
            age,
            dob,
            address,
        } => {
            let view_model = open_view_model(&args.db)?;
            add_entry(&view_model, name, age, dob, address).await
        }
    }
}

fn open_view_model(path: &Path) -> Result<ViewModel> {
    let store = SqliteRecordStore::open(path)
        .with_context(|| format!("failed to open database `{}`", path.display()))?;
    info!("event=cli_open module=cli status=ok");
    Ok(RecordsViewModel::new(StoreRecordRepository::new(store)))
}

async fn add_entry(
    view_model: &ViewModel,
    name: String,
    age: String,
    dob: String,
    address: String,
) -> Result<ExitCode> {
    let mut records = view_model.records_state();
    let before = records
        .loaded()
        .await
        .context("failed to load records")?;
    let newest_before = newest_id(&before);

    view_model.update_name(name);
    view_model.update_age(age);
    view_model.update_dob(dob);
    view_model.update_address(address);
    view_model.submit().await.context("failed to save entry")?;

    let form = view_model.form_snapshot();
    if form.has_errors() {
        eprint!("{}", render::render_form(&form));
        return Ok(ExitCode::FAILURE);
    }

    let after = records
        .wait_for(|state| newest_id(state) > newest_before)
        .await
        .context("failed to reload records after saving")?;
    println!("Saved.");
    print!("{}", render::render_records(&after));
    Ok(ExitCode::SUCCESS)
}

fn newest_id(state: &RecordsState) -> Option<RecordId> {
    match state {
        UiState::Success(items) => items.first().map(|item| item.id),
        UiState::Loading | UiState::Empty => None,
    }
}
