// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! CLI module - Command line interface definitions and handlers

pub mod completions;
pub mod list;
pub mod run;

use clap::Parser;
use clap_complete::Shell;
use std::path::PathBuf;

/// apicli - call HTTP APIs described by collection files
#[derive(Parser, Debug)]
#[command(name = "apicli")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Collection name; lists collections when omitted
    pub collection: Option<String>,

    /// Operation name; lists the collection's operations when omitted
    pub operation: Option<String>,

    /// Operation params as NAME=VALUE
    pub params: Vec<String>,

    /// Named environment to load (<collection>.env.<ENV>)
    #[arg(short, long)]
    pub env: Option<String>,

    /// Pick one of the collection's environments interactively
    #[arg(long, conflicts_with = "env")]
    pub pick_env: bool,

    /// Never prompt for params
    #[arg(long)]
    pub no_input: bool,

    /// Print the request instead of sending it
    #[arg(long)]
    pub dry_run: bool,

    /// Escape param values as JSON string content in JSON bodies
    #[arg(long)]
    pub strict_json: bool,

    /// Directory holding collections and environments [default: ~/.apicli]
    #[arg(long, env = "APICLI_HOME")]
    pub config_dir: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,

    /// Disable colored output
    #[arg(long)]
    pub no_color: bool,

    /// Print shell completions and exit
    #[arg(long, value_enum, value_name = "SHELL")]
    pub completions: Option<Shell>,
}
