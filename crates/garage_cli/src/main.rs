//! CLI smoke entry point.
//!
//! # Responsibility
//! - Load store configuration from the environment and open the database.
//! - Print deterministic probe lines for quick local sanity checks.

use garage_core::db::migrations::schema_version;
use garage_core::db::open_db_with_config;
use garage_core::{init_logging, StoreConfig};
use std::process::ExitCode;

fn main() -> ExitCode {
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("garage_cli error: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let config = StoreConfig::from_env()?;
    if let Some(log) = config.log.as_ref() {
        init_logging(log)?;
    }

    let conn = open_db_with_config(&config)?;
    let mode = match config.db_path.as_deref() {
        Some(path) => format!("file:{}", path.display()),
        None => "memory".to_string(),
    };

    println!("garage_core ping={}", garage_core::ping());
    println!("garage_core version={}", garage_core::core_version());
    println!("garage_core db={mode} schema_version={}", schema_version(&conn)?);
    log::info!("event=cli_probe module=cli status=ok");
    Ok(())
}
