mod cli;
mod commands;
mod config;
mod output;

use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use colored::Colorize;
use tracing_subscriber::EnvFilter;

use wardfhir_client::FhirClientConfig;

use cli::{Cli, Commands};
use output::print_error;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = run().await {
        print_error(&format!("{e:#}"));
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    let cli = Cli::parse();
    let profile = &cli.profile;
    let format = cli.format.unwrap_or_default();

    match &cli.command {
        Commands::Login(args) => {
            let server = config::resolve_server(&cli.server, profile)?;
            commands::auth::login(&server, args, profile).await?;
        }
        Commands::Logout => {
            commands::auth::logout()?;
        }
        Commands::Whoami => {
            commands::auth::whoami(profile)?;
        }
        Commands::Config(args) => match &args.command {
            cli::ConfigCommands::Show => {
                let cfg = config::load_profile(profile)?;
                println!("{}: {}", "Profile".cyan(), profile);
                println!(
                    "{}: {}",
                    "Server".cyan(),
                    cfg.server.as_deref().unwrap_or("(not set)")
                );
                println!(
                    "{}: {}",
                    "API user".cyan(),
                    cfg.api_user.as_deref().unwrap_or("(not set)")
                );
            }
            cli::ConfigCommands::Set(set_args) => {
                let mut cfg = config::load_profile(profile)?;
                match set_args.key.as_str() {
                    "server" => cfg.server = Some(set_args.value.clone()),
                    "api_user" => cfg.api_user = Some(set_args.value.clone()),
                    "api_key" => cfg.api_key = Some(set_args.value.clone()),
                    other => {
                        anyhow::bail!(
                            "Unknown config key: {other}. Valid keys: server, api_user, api_key"
                        )
                    }
                }
                config::save_profile(profile, &cfg)?;
                output::print_success(&format!("Set {} = {}", set_args.key, set_args.value));
            }
        },
        Commands::Get(args) => {
            let config = make_config(&cli, profile)?;
            commands::crud::get(config, &args.reference, format).await?;
        }
        Commands::Create(args) => {
            let config = make_config(&cli, profile)?;
            commands::crud::create(config, args, format).await?;
        }
        Commands::Update(args) => {
            let config = make_config(&cli, profile)?;
            commands::crud::update(config, &args.reference, &args.file, format).await?;
        }
        Commands::Delete(args) => {
            let config = make_config(&cli, profile)?;
            commands::crud::delete(config, &args.reference).await?;
        }
        Commands::Search(args) => {
            let config = make_config(&cli, profile)?;
            commands::search::search(config, args, format).await?;
        }
    }

    Ok(())
}

/// One shared config per invocation: server from flags/env/profile,
/// credentials from the profile, token from the store (Bearer wins).
fn make_config(cli: &Cli, profile: &str) -> Result<Arc<FhirClientConfig>> {
    let server = config::resolve_server(&cli.server, profile)?;
    let profile_cfg = config::load_profile(profile)?;

    let mut builder = FhirClientConfig::builder(server)
        .token_store(commands::auth::token_store()?);
    if let (Some(api_user), Some(api_key)) = (&profile_cfg.api_user, &profile_cfg.api_key) {
        builder = builder.credentials(api_user, api_key);
    }
    Ok(Arc::new(builder.build()?))
}
