//! `messbook` command-line front end.
//!
//! # Responsibility
//! - Map subcommands onto `messbook_core` ledger operations.
//! - Resolve storage and logging configuration for one process run.
//!
//! # Invariants
//! - Every mutating command persists before the process exits.
//! - Reports and exports are computed from the state as loaded for this run.

mod config;
mod render;

use anyhow::{bail, Context, Result};
use chrono::{Local, NaiveDate};
use clap::{Parser, Subcommand};
use config::{Config, GlobalOpts, Storage};
use log::{info, warn};
use messbook_core::db::open_db;
use messbook_core::export::render_report;
use messbook_core::service::calendar::{parse_date, parse_month};
use messbook_core::{
    core_version, export_report, init_logging, parse_amount, parse_meals, shift_month,
    ExpenseEdit, ExportFormat, KeyValueStore, LedgerError, MemberEdit, MemoryKeyValueStore,
    MessBook, MonthGrid, SqliteKeyValueStore, Theme,
};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "messbook")]
#[command(about = "Split shared household groceries and bills by meals, and plan who shops when")]
struct Cli {
    #[command(flatten)]
    global: GlobalOpts,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show totals, cost per meal and what each member owes or receives
    Report,
    /// Manage members, their grocery spending and meal counts
    Member {
        #[command(subcommand)]
        action: MemberAction,
    },
    /// Manage shared non-grocery bills
    Expense {
        #[command(subcommand)]
        action: ExpenseAction,
    },
    /// Shopper-of-the-day calendar
    Calendar {
        #[command(subcommand)]
        action: CalendarAction,
    },
    /// Light/dark preference used for exported reports
    Theme {
        #[command(subcommand)]
        action: ThemeAction,
    },
    /// Write the current report to `mess-report-<date>.<ext>`
    Export {
        /// Document format: txt|json
        #[arg(short, long, default_value = "txt")]
        format: ExportFormat,

        /// Directory to write into (defaults to the current directory)
        #[arg(short, long)]
        out_dir: Option<PathBuf>,
    },
    /// Print the core library version
    Version,
}

#[derive(Subcommand)]
enum MemberAction {
    /// List members in insertion order
    List,
    /// Add a member; omitted fields start empty or zero
    Add {
        #[arg(long)]
        name: Option<String>,
        /// Grocery spending; unparseable input counts as 0
        #[arg(long, allow_hyphen_values = true)]
        spending: Option<String>,
        /// Meals eaten; unparseable input counts as 0
        #[arg(long, allow_hyphen_values = true)]
        meals: Option<String>,
    },
    /// Edit fields of an existing member
    Set {
        id: String,
        #[arg(long)]
        name: Option<String>,
        #[arg(long, allow_hyphen_values = true)]
        spending: Option<String>,
        #[arg(long, allow_hyphen_values = true)]
        meals: Option<String>,
    },
    /// Remove a member by id
    Remove { id: String },
}

#[derive(Subcommand)]
enum ExpenseAction {
    /// List shared expenses
    List,
    /// Add an expense; omitted fields start empty or zero
    Add {
        #[arg(long)]
        name: Option<String>,
        #[arg(long, allow_hyphen_values = true)]
        amount: Option<String>,
    },
    /// Edit fields of an existing expense
    Set {
        id: String,
        #[arg(long)]
        name: Option<String>,
        #[arg(long, allow_hyphen_values = true)]
        amount: Option<String>,
    },
    /// Remove an expense by id
    Remove { id: String },
}

#[derive(Subcommand)]
enum CalendarAction {
    /// Show a month grid with assigned shoppers
    Show {
        /// Month to show (YYYY-MM, defaults to the current month)
        #[arg(short, long)]
        month: Option<String>,

        /// Months to move forward (or backward when negative)
        #[arg(long, default_value_t = 0, allow_hyphen_values = true)]
        offset: i32,
    },
    /// Assign a named member as shopper; "" or "-" clears the day
    Assign { date: String, name: String },
    /// Show who shops on a date
    Get { date: String },
}

#[derive(Subcommand)]
enum ThemeAction {
    Show,
    Toggle,
    Set { theme: Theme },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = Config::resolve(&cli.global)?;
    start_logging(&config);

    match &config.storage {
        Storage::Memory => run(cli.command, &config, MemoryKeyValueStore::new()),
        Storage::File(path) => {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                std::fs::create_dir_all(parent).with_context(|| {
                    format!("Failed to create data directory {}", parent.display())
                })?;
            }
            let conn = open_db(path)
                .with_context(|| format!("Failed to open ledger at {}", path.display()))?;
            run(cli.command, &config, SqliteKeyValueStore::new(&conn))
        }
    }
}

fn start_logging(config: &Config) {
    if let Err(err) = init_logging(&config.log_level, &config.log_dir) {
        eprintln!("warning: logging disabled: {err}");
    }
}

fn run<S: KeyValueStore>(command: Commands, config: &Config, store: S) -> Result<()> {
    let mut book = MessBook::open(store);
    let today = Local::now().date_naive();
    info!("event=cli_command module=cli status=start");

    match command {
        Commands::Report => cmd_report(&book, today),
        Commands::Member { action } => cmd_member(&mut book, action),
        Commands::Expense { action } => cmd_expense(&mut book, action),
        Commands::Calendar { action } => cmd_calendar(&mut book, action, config, today),
        Commands::Theme { action } => cmd_theme(&mut book, action),
        Commands::Export { format, out_dir } => cmd_export(&book, format, out_dir, today),
        Commands::Version => {
            println!("messbook {}", core_version());
            Ok(())
        }
    }
}

fn cmd_report<S: KeyValueStore>(book: &MessBook<S>, today: NaiveDate) -> Result<()> {
    let rendered = render_report(&book.report(), book.theme(), today);
    for line in &rendered.lines {
        println!("{line}");
    }
    Ok(())
}

fn member_edits(
    name: Option<String>,
    spending: Option<String>,
    meals: Option<String>,
) -> Vec<MemberEdit> {
    let mut edits = Vec::new();
    if let Some(name) = name {
        edits.push(MemberEdit::Name(name));
    }
    if let Some(raw) = spending {
        edits.push(MemberEdit::Spending(parse_amount(&raw)));
    }
    if let Some(raw) = meals {
        edits.push(MemberEdit::Meals(parse_meals(&raw)));
    }
    edits
}

fn expense_edits(name: Option<String>, amount: Option<String>) -> Vec<ExpenseEdit> {
    let mut edits = Vec::new();
    if let Some(name) = name {
        edits.push(ExpenseEdit::Name(name));
    }
    if let Some(raw) = amount {
        edits.push(ExpenseEdit::Amount(parse_amount(&raw)));
    }
    edits
}

/// `-` is accepted as a shell-friendly spelling of "no shopper".
fn shopper_name(raw: String) -> String {
    if raw.trim() == "-" {
        String::new()
    } else {
        raw
    }
}

fn cmd_member<S: KeyValueStore>(book: &mut MessBook<S>, action: MemberAction) -> Result<()> {
    match action {
        MemberAction::List => render::print_members(book.members()),
        MemberAction::Add {
            name,
            spending,
            meals,
        } => {
            let id = book.add_member()?;
            for edit in member_edits(name, spending, meals) {
                book.update_member(&id, edit)?;
            }
            println!("Added member {id}");
        }
        MemberAction::Set {
            id,
            name,
            spending,
            meals,
        } => {
            let edits = member_edits(name, spending, meals);
            if edits.is_empty() {
                bail!("Nothing to update. Pass --name, --spending or --meals");
            }
            for edit in edits {
                if !book.update_member(&id, edit)? {
                    println!("No member with id {id}; nothing changed");
                    return Ok(());
                }
            }
            println!("Updated member {id}");
        }
        MemberAction::Remove { id } => {
            if book.remove_member(&id)? {
                println!("Removed member {id}");
            } else {
                println!("No member with id {id}; nothing changed");
            }
        }
    }
    Ok(())
}

fn cmd_expense<S: KeyValueStore>(book: &mut MessBook<S>, action: ExpenseAction) -> Result<()> {
    match action {
        ExpenseAction::List => render::print_expenses(book.expenses()),
        ExpenseAction::Add { name, amount } => {
            let id = book.add_expense()?;
            for edit in expense_edits(name, amount) {
                book.update_expense(&id, edit)?;
            }
            println!("Added expense {id}");
        }
        ExpenseAction::Set { id, name, amount } => {
            let edits = expense_edits(name, amount);
            if edits.is_empty() {
                bail!("Nothing to update. Pass --name or --amount");
            }
            for edit in edits {
                if !book.update_expense(&id, edit)? {
                    println!("No expense with id {id}; nothing changed");
                    return Ok(());
                }
            }
            println!("Updated expense {id}");
        }
        ExpenseAction::Remove { id } => {
            if book.remove_expense(&id)? {
                println!("Removed expense {id}");
            } else {
                println!("No expense with id {id}; nothing changed");
            }
        }
    }
    Ok(())
}

fn cmd_calendar<S: KeyValueStore>(
    book: &mut MessBook<S>,
    action: CalendarAction,
    config: &Config,
    today: NaiveDate,
) -> Result<()> {
    match action {
        CalendarAction::Show { month, offset } => {
            let base = match month {
                Some(value) => parse_month(&value).map_err(anyhow::Error::msg)?,
                None => today,
            };
            let grid = MonthGrid::for_month(shift_month(base, offset), config.week_start, today);
            render::print_calendar(&grid, book.assignments());

            let names = book.assignable_names();
            if names.is_empty() {
                println!("\nNo named members to assign yet.");
            } else {
                println!("\nAssignable: {}", names.join(", "));
            }
        }
        CalendarAction::Assign { date, name } => {
            let date = parse_date(&date).map_err(anyhow::Error::msg)?;
            let name = shopper_name(name);
            match book.assign_shopper(date, &name) {
                Ok(()) if name.is_empty() => println!("Cleared shopper for {date}"),
                Ok(()) => println!("{name} shops on {date}"),
                Err(LedgerError::UnknownShopper(unknown)) => {
                    bail!(
                        "`{unknown}` is not a named member. Choose one of: {}",
                        book.assignable_names().join(", ")
                    );
                }
                Err(err) => return Err(err.into()),
            }
        }
        CalendarAction::Get { date } => {
            let date = parse_date(&date).map_err(anyhow::Error::msg)?;
            match book.assignment(date) {
                Some(name) => println!("{date}: {name}"),
                None => println!("{date}: unassigned"),
            }
        }
    }
    Ok(())
}

fn cmd_theme<S: KeyValueStore>(book: &mut MessBook<S>, action: ThemeAction) -> Result<()> {
    match action {
        ThemeAction::Show => println!("{}", book.theme()),
        ThemeAction::Toggle => println!("{}", book.toggle_theme()?),
        ThemeAction::Set { theme } => {
            book.set_theme(theme)?;
            println!("{theme}");
        }
    }
    Ok(())
}

/// Export failures are reported but do not fail the command.
fn cmd_export<S: KeyValueStore>(
    book: &MessBook<S>,
    format: ExportFormat,
    out_dir: Option<PathBuf>,
    today: NaiveDate,
) -> Result<()> {
    let out_dir = out_dir.unwrap_or_else(|| PathBuf::from("."));
    match export_report(&book.report(), book.theme(), today, format, &out_dir) {
        Ok(exported) => println!("Saved {}", exported.path.display()),
        Err(err) => {
            warn!("event=cli_export module=cli status=error");
            eprintln!("Export failed: {err}");
        }
    }
    Ok(())
}
