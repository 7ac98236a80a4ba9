// cli.rs - command line entry points: serve, migrations, report utilities
use std::io::Write;
use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use thiserror::Error;

use crate::app::{self, MigrationError};
use crate::core;
use crate::reports::{
    self, CatalogSource, FetchError, GroupFilter, HttpReportSource, ReportError, ReportSource, ReportTable, Row,
    UnknownGroup,
};
use crate::views::{PreviewAction, PreviewSession, PreviewStatus, TableAction, TableView};

#[derive(Debug, Error)]
pub enum CliError {
    #[error("Checking migration status failed")]
    MigrationStatusCheckFailed { #[source] source: MigrationError },

    #[error("Running migrations failed")]
    MigrationRunFailed { #[source] source: MigrationError },

    #[error("Invalid report group")]
    InvalidGroup { #[from] source: UnknownGroup },

    #[error("Report export failed")]
    ExportFailed { #[from] source: ReportError },

    #[error("Report preview setup failed")]
    PreviewSetupFailed { #[from] source: FetchError },

    #[error("Report preview failed: {0}")]
    PreviewFailed(String),

    #[error("Writing output failed")]
    OutputFailed { #[from] source: std::io::Error },
}

#[derive(Debug, Parser)]
#[command(name = "hradmin")]
#[command(about = "HR and payroll administration server", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Start the HTTP server (default)
    Serve,
    /// Database migration utility
    Migrate {
        #[command(subcommand)]
        command: MigrateCommand,
    },
    /// Report catalog utilities
    Reports {
        #[command(subcommand)]
        command: ReportsCommand,
    },
}

#[derive(Debug, Subcommand)]
pub enum MigrateCommand {
    /// List all available migrations
    List,
    /// Check if there are pending migrations
    Status,
    /// Run all pending migrations
    Run,
}

#[derive(Debug, Subcommand)]
pub enum ReportsCommand {
    /// List catalog entries
    List {
        /// Report group (employee, checks, jobs, salary, timecards or all)
        #[arg(short, long, default_value = "all")]
        group: String,
    },
    /// Write a report as CSV
    Export {
        /// Report id, e.g. employee-directory
        id: String,
        /// Seed for the row generator (defaults to reports.default_seed)
        #[arg(short, long)]
        seed: Option<String>,
        /// Output file; stdout when omitted
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Preview a report with filters applied, locally or from a running server
    Preview {
        /// Report id
        id: String,
        /// Server base URL, e.g. http://127.0.0.1:3000; generates locally when omitted
        #[arg(long)]
        base_url: Option<String>,
        /// Seed for local generation (defaults to reports.default_seed)
        #[arg(short, long, conflicts_with = "base_url")]
        seed: Option<String>,
        /// Case-insensitive text filter
        #[arg(short, long)]
        query: Option<String>,
        /// Inclusive start date (YYYY-MM-DD)
        #[arg(long)]
        start: Option<NaiveDate>,
        /// Inclusive end date (YYYY-MM-DD)
        #[arg(long)]
        end: Option<NaiveDate>,
        /// Column to sort by
        #[arg(long)]
        sort: Option<String>,
        /// Sort descending
        #[arg(long, requires = "sort")]
        desc: bool,
        /// Print CSV instead of an aligned table
        #[arg(long)]
        csv: bool,
    },
}

/// Options for `reports preview` once the source is chosen.
struct PreviewOptions {
    query: Option<String>,
    start: Option<NaiveDate>,
    end: Option<NaiveDate>,
    sort: Option<String>,
    desc: bool,
    csv: bool,
}

pub async fn run_cli(context: &core::Context, command: Command) -> Result<(), CliError> {
    match command {
        Command::Serve => Ok(()),
        Command::Migrate { command } => run_migrate(context, command).await,
        Command::Reports { command } => run_reports(context, command).await,
    }
}

async fn run_migrate(context: &core::Context, command: MigrateCommand) -> Result<(), CliError> {
    match command {
        MigrateCommand::List => {
            let migrations = app::list_migrations();
            if migrations.is_empty() {
                println!("No migrations found.");
            } else {
                println!("Available migrations:");
                for (i, migration) in migrations.iter().enumerate() {
                    println!("{}. {}", i + 1, migration);
                }
            }
        }
        MigrateCommand::Status => match app::check_pending_migrations(&context.db).await {
            Ok(true) => println!("There are pending migrations that need to be applied."),
            Ok(false) => println!("Database is up to date. No pending migrations."),
            Err(MigrationError::NoMigrationsApplied) => println!("No migrations have been applied yet."),
            Err(e) => return Err(CliError::MigrationStatusCheckFailed { source: e }),
        },
        MigrateCommand::Run => {
            app::run_migrations(&context.db)
                .await
                .map_err(|e| CliError::MigrationRunFailed { source: e })?;
            println!("Migrations applied successfully.");
        }
    }
    Ok(())
}

async fn run_reports(context: &core::Context, command: ReportsCommand) -> Result<(), CliError> {
    match command {
        ReportsCommand::List { group } => {
            let filter = group.parse::<GroupFilter>()?;
            for report in reports::by_group(filter) {
                println!("{:<24} {:<10} {}", report.id, report.group.as_str(), report.title);
            }
        }
        ReportsCommand::Export { id, seed, output } => {
            let report = reports::lookup(&id).ok_or_else(|| ReportError::NotFound(id.clone()))?;
            let seed = seed.unwrap_or_else(|| context.settings.reports.default_seed.clone());
            let table = reports::generate(report, &seed)?;
            let csv = reports::to_csv(&table.columns, &table.rows);
            match output {
                Some(path) => {
                    std::fs::write(&path, csv)?;
                    println!("Wrote {} rows to {}", table.len(), path.display());
                }
                None => std::io::stdout().write_all(csv.as_bytes())?,
            }
        }
        ReportsCommand::Preview { id, base_url, seed, query, start, end, sort, desc, csv } => {
            let options = PreviewOptions { query, start, end, sort, desc, csv };
            match base_url {
                Some(base_url) => {
                    let source = HttpReportSource::new(context.http_client.clone(), &base_url)?;
                    run_preview(source, &id, options).await?;
                }
                None => {
                    let seed = seed.unwrap_or_else(|| context.settings.reports.default_seed.clone());
                    run_preview(CatalogSource::new(seed), &id, options).await?;
                }
            }
        }
    }
    Ok(())
}

async fn run_preview<S: ReportSource>(source: S, id: &str, options: PreviewOptions) -> Result<(), CliError> {
    let mut session = PreviewSession::new(source);
    session.open(id).await;
    session.dispatch(PreviewAction::SetQuery(options.query.unwrap_or_default()));
    session.dispatch(PreviewAction::SetStartDate(options.start));
    session.dispatch(PreviewAction::SetEndDate(options.end));

    let state = session.state();
    if let PreviewStatus::Failed { message } = &state.status {
        return Err(CliError::PreviewFailed(message.clone()));
    }

    let mut view = TableView::default();
    if let Some(column) = options.sort {
        view = view.reduce(TableAction::ToggleSort(column.clone()));
        if options.desc {
            view = view.reduce(TableAction::ToggleSort(column));
        }
    }

    let columns = state.table().map(|t| t.columns.clone()).unwrap_or_default();
    let rows = view.apply(state.visible_rows());
    eprintln!("{} of {} rows match", rows.len(), state.table().map_or(0, ReportTable::len));

    let output = if options.csv {
        reports::to_csv(&columns, rows)
    } else {
        render_table(&columns, &rows)
    };
    std::io::stdout().write_all(output.as_bytes())?;
    Ok(())
}

/// Left-aligned text grid using display formatting for each cell.
fn render_table(columns: &[String], rows: &[&Row]) -> String {
    let cells: Vec<Vec<String>> = rows
        .iter()
        .map(|row| {
            columns
                .iter()
                .map(|column| row.get(column).map(reports::format_cell).unwrap_or_default())
                .collect()
        })
        .collect();

    let widths: Vec<usize> = columns
        .iter()
        .enumerate()
        .map(|(i, column)| {
            cells
                .iter()
                .map(|line| line[i].chars().count())
                .fold(column.chars().count(), usize::max)
        })
        .collect();

    let mut out = String::new();
    for line in std::iter::once(columns.to_vec()).chain(cells) {
        let padded: Vec<String> = line
            .iter()
            .zip(widths.iter().copied())
            .map(|(cell, width)| format!("{cell:<width$}"))
            .collect();
        out.push_str(padded.join("  ").trim_end());
        out.push('\n');
    }
    out
}
