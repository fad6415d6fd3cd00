//! CLI smoke entry point.
//!
//! # Responsibility
//! - Verify `projects_core` wiring against the configured database file.
//! - Print the project list in `id: name` form.

use projects_core::{init_logging, open_project_service, AppConfig};
use std::process::ExitCode;

fn main() -> ExitCode {
    let config = match AppConfig::from_env() {
        Ok(config) => config,
        Err(err) => {
            eprintln!("configuration error: {err}");
            return ExitCode::FAILURE;
        }
    };

    if let Some(log) = config.log.as_ref() {
        if let Err(err) = init_logging(log) {
            eprintln!("logging disabled: {err}");
        }
    }

    println!("projects_core version={}", projects_core::core_version());
    println!("database={}", config.db.path.display());

    let service = open_project_service(&config.db);
    match service.list() {
        Ok(projects) => {
            println!("Projects:");
            for project in projects {
                println!(
                    "   {}: {}",
                    project.project_id.unwrap_or_default(),
                    project.project_name
                );
            }
            ExitCode::SUCCESS
        }
        Err(err) => {
            log::error!("event=cli_list module=cli status=error error={err}");
            eprintln!("Error: {err}");
            ExitCode::FAILURE
        }
    }
}
