use std::process;

use clap::{Parser, Subcommand};
use datahive_harness::{exit_code, flows_for, run_flows, AppConfig, AppError, Harness, Target};
use dh_adapters::ScenarioCatalogue;
use log::error;
use serde_json::json;

/// Flujos de verificación de la integración DataHive.
#[derive(Debug, Parser)]
#[command(name = "datahive-harness", version)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Lista los escenarios disponibles.
    List,
    /// Flujo completo de autenticación (5 pasos).
    Auth,
    /// Sólo la sonda de disponibilidad del warehouse.
    Health,
    /// Sólo la emisión del JWT.
    Jwt,
    /// Un escenario del catálogo (`list` muestra las claves).
    Scenario { key: String },
    /// Autenticación y todos los escenarios.
    All,
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let cli = Cli::parse();
    match run(cli.command) {
        Ok(code) => process::exit(code),
        Err(e) => {
            error!("{e}");
            eprintln!("[datahive-harness] {e}");
            process::exit(e.exit_code());
        }
    }
}

fn run(command: Command) -> Result<i32, AppError> {
    let catalogue = ScenarioCatalogue::builtin();
    let target = match command {
        Command::List => {
            for s in catalogue.iter() {
                println!("{:<20} UEN {}  notice {}  {}", s.key, s.uen, s.notice_no, s.label);
            }
            return Ok(0);
        }
        Command::Auth => Target::Auth,
        Command::Health => Target::Health,
        Command::Jwt => Target::Jwt,
        Command::Scenario { key } => Target::Scenario(key),
        Command::All => Target::All,
    };
    let config = AppConfig::from_env()?;
    if !config.test_enabled {
        return Err(AppError::Disabled);
    }
    let harness = Harness::from_config(config)?;
    let flows = flows_for(&target, &harness, &catalogue)?;
    let reports = run_flows(&flows);

    let out = match reports.as_slice() {
        [single] => serde_json::to_string_pretty(single)?,
        many => serde_json::to_string_pretty(&json!({ "generatedAt": chrono::Utc::now(), "reports": many }))?,
    };
    println!("{out}");
    Ok(exit_code(&reports))
}
