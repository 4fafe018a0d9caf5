// SPDX-FileCopyrightText: 2021-2025 Robin Vobruba <hoijui.quaero@gmail.com>
//
// SPDX-License-Identifier: AGPL-3.0-or-later

use std::path::PathBuf;

use clap::{command, value_parser, Arg, ArgAction, Command, ValueHint};
use const_format::formatcp;

pub const A_L_VERSION: &str = "version";
pub const A_S_VERSION: char = 'V';
pub const A_L_QUIET: &str = "quiet";
pub const A_S_QUIET: char = 'q';
pub const A_L_VERBOSE: &str = "verbose";
pub const A_S_VERBOSE: char = 'v';
pub const A_L_CONFIG: &str = "config";
pub const A_S_CONFIG: char = 'c';

pub const SC_BUILD: &str = "build";
pub const SC_MERGE: &str = "merge";
pub const SC_VALIDATE: &str = "validate";
pub const SC_VALIDATE_GLOBAL: &str = "validate-global";
pub const SC_RUN: &str = "run";

fn arg_version() -> Arg {
    Arg::new(A_L_VERSION)
        .help(formatcp!(
            "Print version information and exit. \
May be combined with --{A_L_QUIET}, \
to really only output the version string."
        ))
        .short(A_S_VERSION)
        .long(A_L_VERSION)
        .action(ArgAction::SetTrue)
        .global(true)
}

fn arg_quiet() -> Arg {
    Arg::new(A_L_QUIET)
        .help("Minimize or suppress output to stdout, and only log warnings and errors")
        .long_help(
            "Minimize or suppress output to stdout, \
and only log warnings and errors. \
The validation verdict is still printed.",
        )
        .short(A_S_QUIET)
        .long(A_L_QUIET)
        .action(ArgAction::SetTrue)
        .conflicts_with(A_L_VERBOSE)
        .global(true)
}

fn arg_verbose() -> Arg {
    Arg::new(A_L_VERBOSE)
        .help("More verbose log output")
        .long_help("More verbose log output; useful for debugging.")
        .short(A_S_VERBOSE)
        .long(A_L_VERBOSE)
        .action(ArgAction::SetTrue)
        .global(true)
}

fn arg_config() -> Arg {
    Arg::new(A_L_CONFIG)
        .help("Configuration file to load on top of the defaults")
        .long_help(
            "Configuration file (YAML, TOML, JSON, ...) to load \
on top of the defaults and an optional 'config.*' file in the working directory. \
Environment variables prefixed with 'FLOW_KG_' override both.",
        )
        .num_args(1)
        .value_parser(value_parser!(PathBuf))
        .value_name("FILE")
        .value_hint(ValueHint::FilePath)
        .short(A_S_CONFIG)
        .long(A_L_CONFIG)
        .action(ArgAction::Set)
        .global(true)
}

static ARGS: [fn() -> Arg; 4] = [arg_version, arg_quiet, arg_verbose, arg_config];

fn subcommands() -> [Command; 5] {
    [
        Command::new(SC_BUILD)
            .about("Converts the tabular records of each dataset into a named graph"),
        Command::new(SC_MERGE)
            .about("Merges all named graphs into one graph, and writes the graph index"),
        Command::new(SC_VALIDATE)
            .about("Validates the union of all named graphs against the shapes"),
        Command::new(SC_VALIDATE_GLOBAL)
            .about("Validates the merged graph against the shapes"),
        Command::new(SC_RUN).about(formatcp!(
            "Runs {SC_BUILD}, {SC_MERGE}, {SC_VALIDATE} and {SC_VALIDATE_GLOBAL}, in this order"
        )),
    ]
}

#[must_use]
pub fn args_matcher() -> Command {
    command!()
        .about("Builds, merges and validates a provenance knowledge graph from tabular video metadata.")
        .bin_name(clap::crate_name!())
        .help_expected(true)
        .disable_version_flag(true)
        .args(ARGS.iter().map(|arg_creator| arg_creator()))
        .subcommands(subcommands())
        .arg_required_else_help(true)
}
