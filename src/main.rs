// SPDX-FileCopyrightText: 2021-2025 Robin Vobruba <hoijui.quaero@gmail.com>
//
// SPDX-License-Identifier: AGPL-3.0-or-later

mod cli;

use std::path::PathBuf;

use clap::crate_name;
use cli_utils::{logging, BoxResult};
use flow_kg::{merge, named_graph, settings, settings::Settings, validation};
use tracing::instrument;
use tracing_subscriber::filter::LevelFilter;

#[allow(clippy::print_stdout)]
fn print_version_and_exit(quiet: bool) {
    if !quiet {
        print!("{} ", clap::crate_name!());
    }
    println!("{}", flow_kg::VERSION);
    std::process::exit(0);
}

#[allow(clippy::print_stdout)]
fn print_verdict(scope: &str, outcome: &validation::ValidationOutcome, quiet: bool) {
    println!("{scope} conforms: {}", outcome.conforms);
    if !quiet {
        println!("{}", outcome.report_text);
    }
}

fn run_build(settings: &Settings) -> BoxResult<()> {
    let written = named_graph::run(settings)?;
    for graph_file in written {
        tracing::debug!("- {}", graph_file.display());
    }
    Ok(())
}

fn run_merge(settings: &Settings) -> BoxResult<()> {
    let outcome = merge::run(settings)?;
    tracing::info!(
        "Merged graph holds {} statements from {} named graphs.",
        outcome.merged.len(),
        outcome.index.len()
    );
    Ok(())
}

fn run_validate(settings: &Settings, quiet: bool) -> BoxResult<()> {
    let outcome = validation::run_per_batch(settings)?;
    print_verdict("Per-batch union", &outcome, quiet);
    Ok(())
}

fn run_validate_global(settings: &Settings, quiet: bool) -> BoxResult<()> {
    let outcome = validation::run_global(settings)?;
    print_verdict("Merged graph", &outcome, quiet);
    Ok(())
}

#[instrument]
fn main() -> BoxResult<()> {
    let log_reload_handle = logging::setup(crate_name!())?;
    let args = cli::args_matcher().get_matches();

    let quiet = args.get_flag(cli::A_L_QUIET);
    let version = args.get_flag(cli::A_L_VERSION);
    if version {
        print_version_and_exit(quiet);
    }

    let verbose = args.get_flag(cli::A_L_VERBOSE);

    let log_level = if verbose {
        LevelFilter::TRACE
    } else if quiet {
        LevelFilter::WARN
    } else {
        LevelFilter::INFO
    };
    logging::set_log_level_tracing(&log_reload_handle, log_level)?;

    let config_file = args.get_one::<PathBuf>(cli::A_L_CONFIG);
    let run_settings = settings::load(config_file.map(PathBuf::as_path))?;

    match args.subcommand_name() {
        Some(cli::SC_BUILD) => run_build(&run_settings)?,
        Some(cli::SC_MERGE) => run_merge(&run_settings)?,
        Some(cli::SC_VALIDATE) => run_validate(&run_settings, quiet)?,
        Some(cli::SC_VALIDATE_GLOBAL) => run_validate_global(&run_settings, quiet)?,
        Some(cli::SC_RUN) => {
            tracing::info!("Stage 1/4: building the named graphs ...");
            run_build(&run_settings)?;
            tracing::info!("Stage 2/4: merging ...");
            run_merge(&run_settings)?;
            tracing::info!("Stage 3/4: validating the per-batch union ...");
            run_validate(&run_settings, quiet)?;
            tracing::info!("Stage 4/4: validating the merged graph ...");
            run_validate_global(&run_settings, quiet)?;
        }
        Some(other) => return Err(format!("Unknown command '{other}'").into()),
        None => return Err("No command given; see --help".into()),
    }

    Ok(())
}
