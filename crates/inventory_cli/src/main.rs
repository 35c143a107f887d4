//! Command-line front end for the inventory store.
//!
//! # Responsibility
//! - Collect raw field text from the operator and hand it to core services.
//! - Confirm destructive actions before calling into the store.
//! - Render records and turn core errors into actionable messages.
//!
//! # Invariants
//! - The storage session is opened once per invocation and always closed.
//! - Data errors end the command with a message, never a panic.

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use inventory_core::db::schema::schema_version;
use inventory_core::{
    default_log_level, init_logging, open_db, InventoryRecord, InventoryService, ItemFields,
    ItemId, SqliteItemRepository, StorageSession, DEFAULT_DB_FILE_NAME,
};
use log::info;
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tabled::settings::Style;
use tabled::{Table, Tabled};

#[derive(Parser)]
#[command(name = "inventory")]
#[command(version)]
#[command(about = "Keep a local inventory of items, their quantities and where they are stored")]
struct Cli {
    /// Path to the inventory database file
    #[arg(long, global = true, default_value = DEFAULT_DB_FILE_NAME)]
    db: PathBuf,

    /// Directory for rolling log files (defaults to ./logs)
    #[arg(long, global = true)]
    log_dir: Option<PathBuf>,

    /// Log level: trace, debug, info, warn or error
    #[arg(long, global = true)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create the inventory store if needed and report its schema version
    Init,

    /// Add a new item
    Add(FieldArgs),

    /// List items, optionally keeping only those matching a search text
    List {
        /// Case-insensitive text searched in every column
        #[arg(short, long)]
        filter: Option<String>,
    },

    /// Show a single item
    Show {
        id: ItemId,
    },

    /// Replace every field of an existing item
    Update {
        id: ItemId,

        #[command(flatten)]
        fields: FieldArgs,
    },

    /// Delete an item
    Delete {
        id: ItemId,

        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },

    /// Write all items to a CSV file
    Export {
        path: PathBuf,
    },
}

#[derive(Args)]
struct FieldArgs {
    #[arg(long)]
    date: String,

    #[arg(long)]
    name: String,

    #[arg(long = "type")]
    kind: String,

    /// Whole number, 0 or more
    #[arg(long, allow_hyphen_values = true)]
    quantity: String,

    #[arg(long)]
    room: String,

    #[arg(long)]
    cabinet: String,
}

impl From<FieldArgs> for ItemFields {
    fn from(args: FieldArgs) -> Self {
        ItemFields::new(
            args.date,
            args.name,
            args.kind,
            args.quantity,
            args.room,
            args.cabinet,
        )
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    if let Err(err) = start_logging(cli.log_dir.as_deref(), cli.log_level.as_deref()) {
        eprintln!("warning: logging disabled: {err:#}");
    }

    let session = open_db(&cli.db)
        .with_context(|| format!("cannot open inventory store `{}`", cli.db.display()))?;

    let outcome = execute(&session, &cli.db, cli.command);
    let closed = session
        .close()
        .context("failed to close inventory store cleanly");

    outcome?;
    closed
}

fn start_logging(log_dir: Option<&Path>, level: Option<&str>) -> Result<()> {
    let cwd = std::env::current_dir().context("cannot resolve working directory")?;
    let log_dir = match log_dir {
        Some(dir) => cwd.join(dir),
        None => cwd.join("logs"),
    };

    init_logging(level.unwrap_or_else(|| default_log_level()), &log_dir).map_err(anyhow::Error::msg)
}

fn execute(session: &StorageSession, db_path: &Path, command: Commands) -> Result<()> {
    let service = InventoryService::new(SqliteItemRepository::new(session.connection()));

    match command {
        Commands::Init => {
            info!("event=cli_command module=cli status=start command=init");
            println!(
                "inventory store ready at {} (schema version {})",
                db_path.display(),
                schema_version()
            );
        }
        Commands::Add(fields) => {
            info!("event=cli_command module=cli status=start command=add");
            let id = service.add_item(fields.into()).context("item not added")?;
            println!("added item {id}");
        }
        Commands::List { filter } => {
            info!("event=cli_command module=cli status=start command=list");
            let items = match filter.as_deref() {
                Some(text) => service.filter_items(text)?,
                None => service.list_items()?,
            };
            print_items(&items);
        }
        Commands::Show { id } => {
            info!("event=cli_command module=cli status=start command=show id={id}");
            match service.get_item(id)? {
                Some(item) => print_items(std::slice::from_ref(&item)),
                None => bail!("inventory item not found: {id}"),
            }
        }
        Commands::Update { id, fields } => {
            info!("event=cli_command module=cli status=start command=update id={id}");
            service
                .update_item(id, fields.into())
                .with_context(|| format!("item {id} not updated"))?;
            println!("updated item {id}");
        }
        Commands::Delete { id, yes } => {
            info!("event=cli_command module=cli status=start command=delete id={id}");
            if !yes && !confirm(&format!("Delete item {id}?"))? {
                println!("nothing deleted");
                return Ok(());
            }
            if service.delete_item(id)? {
                println!("deleted item {id}");
            } else {
                println!("item {id} does not exist; nothing deleted");
            }
        }
        Commands::Export { path } => {
            info!("event=cli_command module=cli status=start command=export");
            let rows = service
                .export_csv(&path)
                .with_context(|| format!("export to `{}` failed", path.display()))?;
            println!("exported {rows} items to {}", path.display());
        }
    }

    Ok(())
}

fn confirm(prompt: &str) -> Result<bool> {
    print!("{prompt} [y/N] ");
    io::stdout().flush()?;

    let mut answer = String::new();
    io::stdin().lock().read_line(&mut answer)?;
    Ok(is_yes(&answer))
}

fn is_yes(answer: &str) -> bool {
    matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes")
}

#[derive(Tabled)]
struct ItemRow {
    id: ItemId,
    date: String,
    name: String,
    #[tabled(rename = "type")]
    kind: String,
    quantity: u32,
    room: String,
    cabinet: String,
}

impl From<&InventoryRecord> for ItemRow {
    fn from(item: &InventoryRecord) -> Self {
        Self {
            id: item.id,
            date: item.date.clone(),
            name: item.name.clone(),
            kind: item.kind.clone(),
            quantity: item.quantity,
            room: item.room.clone(),
            cabinet: item.cabinet.clone(),
        }
    }
}

fn print_items(items: &[InventoryRecord]) {
    if items.is_empty() {
        println!("no items");
        return;
    }
    println!("{}", items_table(items));
}

fn items_table(items: &[InventoryRecord]) -> String {
    let rows: Vec<ItemRow> = items.iter().map(ItemRow::from).collect();
    Table::new(rows).with(Style::rounded()).to_string()
}
