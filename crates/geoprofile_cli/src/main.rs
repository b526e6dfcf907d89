//! CLI smoke entry point.
//!
//! # Responsibility
//! - Provide a minimal executable to verify `geoprofile_core` linkage.
//! - Keep output deterministic for quick local sanity checks.

use geoprofile_core::seed::sample_profiles;
use geoprofile_core::{ProfileService, SearchField};

fn main() {
    println!("geoprofile_core ping={}", geoprofile_core::ping());
    println!("geoprofile_core version={}", geoprofile_core::core_version());

    let mut args = std::env::args().skip(1);
    let query = args.next().unwrap_or_default();
    let field = args
        .next()
        .map(|raw| SearchField::parse_lenient(&raw))
        .unwrap_or_default();

    let directory = match ProfileService::seeded(sample_profiles()) {
        Ok(directory) => directory,
        Err(err) => {
            eprintln!("seed failed: {err}");
            std::process::exit(1);
        }
    };
    match directory.search(&query, field) {
        Ok(profiles) => {
            println!("profiles field={field} matches={}", profiles.len());
            for profile in profiles {
                println!(
                    "{}\t{}\t{}, {}",
                    profile.id, profile.name, profile.address.city, profile.address.state
                );
            }
        }
        Err(err) => {
            eprintln!("search failed: {err}");
            std::process::exit(1);
        }
    }
}
