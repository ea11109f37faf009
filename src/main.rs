use budgeteer::application::orchestrator::Orchestrator;
use budgeteer::interfaces::csv::command_reader::CommandReader;
use budgeteer::interfaces::text::report_writer::ReportWriter;
use clap::Parser;
use miette::{IntoDiagnostic, Result};
use std::fs::File;
use std::io::{self, Write};
use std::path::PathBuf;
use tracing::warn;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Input commands CSV file
    input: PathBuf,

    /// Emit the final totals snapshot as JSON instead of the text report.
    #[arg(long)]
    json: bool,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();

    // In JSON mode the streaming view is muted so stdout carries only the
    // final snapshot.
    let stream: Box<dyn Write> = if cli.json {
        Box::new(io::sink())
    } else {
        Box::new(io::stdout().lock())
    };
    let mut view = ReportWriter::new(stream);
    if !cli.json {
        view.write_heading().into_diagnostic()?;
    }

    let mut orchestrator = Orchestrator::new(view);
    let file = File::open(&cli.input).into_diagnostic()?;
    for command in CommandReader::new(file).commands() {
        match command {
            Ok(command) => {
                orchestrator.apply(command).into_diagnostic()?;
            }
            Err(e) => warn!("skipping command: {e}"),
        }
    }

    let (ledger, view) = orchestrator.into_parts();
    drop(view.into_inner());

    if cli.json {
        let snapshot = serde_json::to_string_pretty(&ledger.totals()).into_diagnostic()?;
        println!("{snapshot}");
    } else {
        let stdout = io::stdout();
        let mut report = ReportWriter::new(stdout.lock());
        report
            .write_report(ledger.incomes(), ledger.expenses(), &ledger.totals())
            .into_diagnostic()?;
    }

    Ok(())
}
