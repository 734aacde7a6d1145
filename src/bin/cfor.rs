use anyhow::{Context, Result};
use cfor::api::{CompletionClient, ModelCatalog};
use cfor::app::{failure_message, App, TerminalInjector};
use cfor::config::Config;
use cfor::cost::{CostFileNotFound, CostLedger};
use cfor::logging;
use cfor::runtime::TerminalFrontend;
use cfor::ui::cost_table::format_cost_table;
use clap::{ArgGroup, Parser};
use std::process::ExitCode;

/// (What's the) command for ...?
#[derive(Debug, Parser)]
#[command(name = "cfor", version, about)]
#[command(group(ArgGroup::new("mode").required(true).args(["question", "costs"])))]
struct Cli {
    /// What you want to do, in plain words
    question: Option<String>,

    /// Print the API cost ledger and exit
    #[arg(long)]
    costs: bool,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    if let Err(error) = logging::init() {
        eprintln!("warning: logging disabled: {error:#}");
    }

    match run(cli).await {
        Ok(code) => code,
        Err(error) => {
            tracing::error!(error = %format!("{error:#}"), "startup failed");
            eprintln!("{error:#}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<ExitCode> {
    if cli.costs {
        return print_costs();
    }
    let Some(question) = cli.question else {
        return Ok(ExitCode::FAILURE);
    };

    let config = Config::load()?;
    config.validate()?;

    let catalog = ModelCatalog::openai();
    let client = CompletionClient::new(&config, catalog.clone())?;
    let ledger = CostLedger::default_location()?;
    let mut app = App::new(client, TerminalFrontend::new(), TerminalInjector, ledger);

    match app.run(&question).await {
        Ok(finish) => {
            tracing::info!(?finish, "done");
            Ok(ExitCode::SUCCESS)
        }
        Err(error) => {
            tracing::error!(%error, "run failed");
            eprintln!("{}", failure_message(&error, &catalog));
            Ok(ExitCode::FAILURE)
        }
    }
}

fn print_costs() -> Result<ExitCode> {
    let ledger = CostLedger::default_location()?;
    let costs = match ledger.read_costs() {
        Ok(costs) => costs,
        Err(error) if error.downcast_ref::<CostFileNotFound>().is_some() => {
            println!("No costs recorded yet.");
            return Ok(ExitCode::SUCCESS);
        }
        Err(error) => return Err(error).context("failed to read the cost ledger"),
    };

    for line in format_cost_table(&costs) {
        println!("{line}");
    }
    Ok(ExitCode::SUCCESS)
}
