//! Technician dashboard backend: scoped appointment views plus CSV, JSON and
//! chart exports.

mod config;
mod database;
mod error;
mod export;
mod models;
mod protocol;
mod query;
mod schema;
mod session;
mod technician;
mod utils;

use actix_web::{middleware, web, App, HttpServer};
use clap::{Parser, Subcommand};
use tracing_subscriber::{fmt, EnvFilter};

use crate::{config::Config, session::{RequireLogin, SessionKeys}};

#[derive(Debug, Parser)]
#[command(name = "techdesk", about = "Technician appointment dashboard", version)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Run the HTTP server (the default).
    Serve,
    /// Print the Argon2 hash to store in `technicians.password`.
    HashPassword { password: String },
}

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    if let Some(Command::HashPassword { password }) = cli.command {
        println!("{}", technician::utils::hash_password(&password)?);
        return Ok(());
    }

    let config = Config::from_env()?;
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::new(&config.log_filter))
        .try_init()
    {
        eprintln!("tracing init failed: {}", e);
    }
    if config.session_secret_generated {
        tracing::warn!("SESSION_SECRET not set, sessions will not survive a restart");
    }

    let pool = database::build_pool(&config);
    let keys = SessionKeys::new(&config.session_secret, config.session_max_age_secs)?;

    tracing::info!(address = %config.bind_address, "starting server");
    HttpServer::new(move || {
        App::new()
            .wrap(middleware::Logger::default())
            .app_data(web::Data::new(pool.clone()))
            .app_data(web::Data::new(keys.clone()))
            .configure(technician::config_public)
            .service(
                web::scope("")
                    .wrap(RequireLogin)
                    .configure(technician::config)
                    .configure(export::config),
            )
    })
    .bind(config.bind_address)?
    .run()
    .await?;

    Ok(())
}
