//! Cadastro CLI
//!
//! Command-line interface for the employee registry

use std::path::PathBuf;

use cadastro_core::logging_facility;
use cadastro_engine::CadastroConfig;
use clap::{Parser, Subcommand};

mod commands;
mod terminal;

#[derive(Debug, Parser)]
#[command(name = "cadastro")]
#[command(about = "Cadastro - Employee registry over a local database", long_about = None)]
struct Cli {
    /// Database file (overrides configuration)
    #[arg(long, global = true)]
    db: Option<PathBuf>,

    /// Print records as JSON
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Register a new employee
    Add(commands::register::AddArgs),
    /// List every employee
    List,
    /// Show one employee
    Show(commands::query::ShowArgs),
    /// Find employees by an indexed field
    Find(commands::query::FindArgs),
    /// Change fields of an employee
    Update(commands::register::UpdateArgs),
    /// Remove an employee
    Delete(commands::register::DeleteArgs),
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let config = match CadastroConfig::load() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    };
    logging_facility::init(config.profile());

    let ctx = commands::Context::new(&config, cli.db, cli.json);
    let succeeded = match cli.command {
        Commands::Add(args) => commands::register::add(&ctx, args).await,
        Commands::List => commands::query::list(&ctx).await,
        Commands::Show(args) => commands::query::show(&ctx, args).await,
        Commands::Find(args) => commands::query::find(&ctx, args).await,
        Commands::Update(args) => commands::register::update(&ctx, args).await,
        Commands::Delete(args) => commands::register::delete(&ctx, args).await,
    };

    if !succeeded {
        std::process::exit(1);
    }
}
