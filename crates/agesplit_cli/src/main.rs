//! CLI smoke entry point.
//!
//! # Responsibility
//! - Wire both partition stores, load sample people and print where each
//!   one landed.
//!
//! Usage: `agesplit_cli [ADULTS_DB MINORS_DB]`. Without arguments both stores
//! are in-memory. Set `AGESPLIT_LOG_DIR` to an absolute path to enable file
//! logging.

use agesplit_core::seed::load_sample_people;
use agesplit_core::{
    default_log_level, init_logging, open_repository, RoutingService, StoreConfig, SystemClock,
};
use std::process::ExitCode;

fn main() -> ExitCode {
    if let Ok(log_dir) = std::env::var("AGESPLIT_LOG_DIR") {
        if let Err(err) = init_logging(default_log_level(), &log_dir) {
            eprintln!("logging disabled: {err}");
        }
    }

    let args: Vec<String> = std::env::args().skip(1).collect();
    let config = match args.as_slice() {
        [] => StoreConfig::in_memory(),
        [adults, minors] => StoreConfig::files(adults, minors),
        _ => {
            eprintln!("usage: agesplit_cli [ADULTS_DB MINORS_DB]");
            return ExitCode::from(2);
        }
    };

    let repo = match open_repository(&config, SystemClock) {
        Ok(repo) => repo,
        Err(err) => {
            eprintln!("failed to open stores: {err}");
            return ExitCode::FAILURE;
        }
    };
    let service = RoutingService::new(repo);

    let saved = match load_sample_people(&service) {
        Ok(saved) => saved,
        Err(err) => {
            eprintln!("failed to load sample people: {err}");
            return ExitCode::FAILURE;
        }
    };

    println!("agesplit_core version={}", agesplit_core::core_version());
    for entry in &saved {
        println!(
            "{:<20} age={:>3} id={:>3} -> {}",
            entry.person.display_name(),
            entry.decision.age_years,
            entry.person.id.unwrap_or_default(),
            entry.decision.partition
        );
    }

    let counts = service.counts();
    println!(
        "adults={} minors={} total={}",
        counts.adults, counts.minors, counts.total
    );
    ExitCode::SUCCESS
}
