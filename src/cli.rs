//! Command line entry point of the `petclinic` binary.
//!
//! ```sh
//! petclinic start -p 8080
//! petclinic routes
//! PETCLINIC_ENV=production petclinic seed
//! ```

use clap::{Parser, Subcommand};
use colored::Colorize;

use crate::{
    boot,
    clinic::seed,
    controller::ListRoutes,
    environment::{resolve_from_env, Environment, DEFAULT_ENVIRONMENT},
    logger, Result,
};

#[derive(Parser)]
#[command(version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Specify the environment
    #[arg(short, long, global = true, help = &format!("Specify the environment [default: {}]", DEFAULT_ENVIRONMENT))]
    environment: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start an app
    Start {
        /// server bind address
        #[arg(short, long, action)]
        binding: Option<String>,
        /// server port address
        #[arg(short, long, action)]
        port: Option<i32>,
    },
    /// Describe all application endpoints
    Routes {},
    /// Load the sample clinic records into the configured store
    Seed {},
}

/// Parses the command line and runs the selected command.
///
/// # Errors
/// Fails when the configuration cannot be loaded or the command fails.
pub async fn main() -> Result<()> {
    let cli = Cli::parse();
    let environment: Environment = cli.environment.unwrap_or_else(resolve_from_env).into();
    let config = environment.load()?;
    logger::init(&config.logger)?;

    match cli.command {
        Commands::Start { binding, port } => {
            let binding = binding.unwrap_or_else(|| config.server.binding.clone());
            let port = port.unwrap_or(config.server.port);
            let ctx = boot::create_context(&environment, config).await?;
            println!(
                "{} listening on http://{binding}:{port} ({})",
                "petclinic".bold(),
                environment.to_string().green()
            );
            boot::start(ctx, &binding, port).await?;
        }
        Commands::Routes {} => show_list_routes(&boot::list_routes(&config)),
        Commands::Seed {} => {
            let ctx = boot::create_context(&environment, config).await?;
            let summary = seed::run(&ctx.services()).await?;
            if summary.is_empty() {
                println!("{}", "store already holds records, nothing seeded".yellow());
            } else {
                println!(
                    "seeded {} pet types, {} specialties, {} vets, {} owners, {} pets, {} visits",
                    summary.pet_types,
                    summary.specialties,
                    summary.vets,
                    summary.owners,
                    summary.pets,
                    summary.visits
                );
            }
        }
    }
    Ok(())
}

fn show_list_routes(routes: &[ListRoutes]) {
    for route in routes {
        let actions_str = route
            .actions
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(",");
        println!("[{}] {}", actions_str.bold(), route.uri.green());
    }
}
