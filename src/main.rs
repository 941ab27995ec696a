// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! apicli - command-line HTTP client driven by API collection files
//!
//! A collection is a JSON file describing a base URL, shared parameter
//! groups and operations. Operation parameters are filled from environment
//! files, `name=value` arguments and interactive prompts.

mod cli;
mod collection;
mod config;
mod error;
mod http;
mod output;
mod params;
mod prompt;
mod store;

use anyhow::Result;
use clap::Parser;
use cli::Cli;
use colored::Colorize;
use config::Config;
use std::io::IsTerminal;
use std::process::ExitCode;
use store::CollectionStore;
use tracing_subscriber::filter::Directive;
use tracing_subscriber::EnvFilter;

const LOG_LEVEL_ENV: &str = "APICLI_LOG_LEVEL";

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    if cli.no_color {
        colored::control::set_override(false);
    }
    init_tracing(cli.verbose);

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("{}", format!("{err:#}").red());
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<()> {
    if let Some(shell) = cli.completions {
        cli::completions::execute(shell);
        return Ok(());
    }

    let config = Config::load(cli.config_dir)?;
    let store = CollectionStore::new(config.config_dir());

    let Some(collection) = cli.collection else {
        return cli::list::collections(&store);
    };

    let Some(operation) = cli.operation else {
        return cli::list::operations(&store, &collection);
    };

    let interactive = !cli.no_input && std::io::stdin().is_terminal();

    cli::run::execute(
        cli::run::RunOptions {
            collection,
            operation,
            params: cli.params,
            env: cli.env,
            pick_env: cli.pick_env,
            interactive,
            dry_run: cli.dry_run,
            strict_json: cli.strict_json,
            verbose: cli.verbose,
            no_color: cli.no_color,
        },
        &config,
    )
    .await
}

/// Log to stderr; `--verbose` forces debug, otherwise `APICLI_LOG_LEVEL`
/// (default `warn`).
fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_env(LOG_LEVEL_ENV).unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    let filter = ["reqwest", "hyper", "rustls", "h2"]
        .iter()
        .filter_map(|target| format!("{target}=warn").parse::<Directive>().ok())
        .fold(filter, |filter, directive| filter.add_directive(directive));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
