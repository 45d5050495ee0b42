use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use savings_optimizer::api::{AppState, run_http_server};
use savings_optimizer::catalog::{AccountCatalogProvider, BuiltinCatalog, JsonFileCatalog};
use savings_optimizer::config::{DEFAULT_ISA_ANNUAL_LIMIT, DEFAULT_SOLVER_TIMEOUT_MS, OptimizerConfig};
use savings_optimizer::core::{OptimizationOutcome, OptimizationRequest, Optimizer};

#[derive(Parser, Debug)]
#[command(
    name = "savings-optimizer",
    about = "Allocate savings across accounts to maximise annual interest within ISA limits"
)]
struct Cli {
    #[arg(
        long,
        global = true,
        env = "ISA_ANNUAL_LIMIT",
        default_value_t = DEFAULT_ISA_ANNUAL_LIMIT,
        help = "Annual ISA subscription allowance"
    )]
    isa_limit: f64,
    #[arg(
        long,
        global = true,
        env = "SOLVER_TIMEOUT_MS",
        default_value_t = DEFAULT_SOLVER_TIMEOUT_MS,
        help = "Give up on a single solve after this many milliseconds"
    )]
    solver_timeout_ms: u64,
    #[arg(
        long,
        global = true,
        env = "SAVINGS_CATALOG",
        help = "JSON file of savings accounts; defaults to the built-in sample catalog"
    )]
    catalog: Option<PathBuf>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run the HTTP API.
    Serve {
        #[arg(long, env = "PORT", default_value_t = 8080)]
        port: u16,
    },
    /// Optimize a single amount and print the allocation.
    Optimize {
        #[arg(long)]
        total_investment: f64,
        #[arg(long, default_value_t = 0.0, help = "ISA allowance already used this tax year")]
        isa_allowance_used: f64,
    },
}

#[tokio::main]
async fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    let config = match OptimizerConfig::new(cli.isa_limit, cli.solver_timeout_ms) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{e}");
            std::process::exit(1);
        }
    };
    let catalog: Arc<dyn AccountCatalogProvider> = match cli.catalog {
        Some(path) => Arc::new(JsonFileCatalog::new(path)),
        None => Arc::new(BuiltinCatalog),
    };
    let optimizer = Optimizer::new(config);

    match cli.command {
        Command::Serve { port } => {
            if let Err(e) = run_http_server(port, AppState::new(optimizer, catalog)).await {
                eprintln!("Server error: {e}");
                std::process::exit(1);
            }
        }
        Command::Optimize {
            total_investment,
            isa_allowance_used,
        } => {
            let request = OptimizationRequest {
                total_investment,
                isa_allowance_used,
            };
            let result = catalog
                .accounts()
                .map_err(|e| e.to_string())
                .and_then(|accounts| {
                    optimizer
                        .optimize(&accounts, &request)
                        .map_err(|e| e.to_string())
                });
            match result {
                Ok(outcome) => print_report(total_investment, &outcome),
                Err(msg) => {
                    eprintln!("{msg}");
                    std::process::exit(1);
                }
            }
        }
    }
}

fn print_report(total_investment: f64, outcome: &OptimizationOutcome) {
    println!("Total investment: £{total_investment:.2}");
    println!("Status: {}", outcome.status);
    if let Some(message) = &outcome.message {
        println!("Detail: {message}");
    }
    if !outcome.status.is_optimal() {
        return;
    }
    println!("Total estimated return: £{:.2}", outcome.total_return);
    println!();
    println!(
        "{:<32} {:>12} {:>7} {:<12} {:>4}",
        "Account", "Amount", "AER", "Term", "ISA"
    );
    println!("{}", "-".repeat(72));
    for investment in &outcome.investments {
        println!(
            "{:<32} {:>12.2} {:>6.2}% {:<12} {:>4}",
            investment.account_name,
            investment.amount,
            investment.aer,
            investment.term,
            if investment.is_isa { "yes" } else { "no" }
        );
    }
}
