// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Perform a collection operation

use crate::config::Config;
use crate::http::{build_request_data_with, BuildOptions, Client, RequestData, Response, Transport};
use crate::output::{format_request, format_response_body, format_response_headers, format_status_line};
use crate::params::{parse_param_value_strings, resolve, ParamSources};
use crate::prompt::{PromptParam, Prompter, TerminalPrompter};
use crate::store::CollectionStore;
use anyhow::Result;

pub struct RunOptions {
    pub collection: String,
    pub operation: String,
    pub params: Vec<String>,
    pub env: Option<String>,
    pub pick_env: bool,
    pub interactive: bool,
    pub dry_run: bool,
    pub strict_json: bool,
    pub verbose: bool,
    pub no_color: bool,
}

/// What happened to the built request
#[derive(Debug)]
pub enum Outcome {
    DryRun(RequestData),
    Sent(RequestData, Response),
}

pub async fn execute(options: RunOptions, config: &Config) -> Result<()> {
    let store = CollectionStore::new(config.config_dir());
    let client = Client::new(&config.settings.http)?;

    match perform_operation(&options, &store, &TerminalPrompter, &client).await? {
        Outcome::DryRun(request) => {
            print!("{}", format_request(&request));
        }
        Outcome::Sent(_, response) => {
            if options.verbose {
                eprintln!("{}", format_status_line(&response, !options.no_color));
                eprint!("{}", format_response_headers(&response));
            }
            println!("{}", format_response_body(&response.body));
        }
    }

    Ok(())
}

/// Load, resolve and build; send unless this is a dry run. Nothing reaches
/// the transport until every required param is resolved.
pub async fn perform_operation<T>(
    options: &RunOptions,
    store: &CollectionStore,
    prompter: &dyn Prompter,
    transport: &T,
) -> Result<Outcome>
where
    T: Transport + Sync + ?Sized,
{
    let collection = store.load_collection(&options.collection)?;
    let operation = collection.operation(&options.operation)?;

    let cli = parse_param_value_strings(&options.params)?;

    let environment = match (&options.env, options.pick_env && options.interactive) {
        (Some(env), _) => Some(env.clone()),
        (None, true) => {
            let environments = store.list_environments(&collection.name)?;
            if environments.is_empty() {
                None
            } else {
                Some(prompter.ask_for_option("Pick an environment", &environments)?)
            }
        }
        (None, false) => None,
    };
    let env = store.load_env(&collection.name, environment.as_deref())?;

    let mut sources = ParamSources {
        env,
        cli,
        prompted: Vec::new(),
    };

    if options.interactive {
        let fields: Vec<PromptParam> = operation
            .params
            .iter()
            .map(|param| PromptParam {
                name: param.name.clone(),
                default_value: param.default.clone(),
                optional: param.optional,
                disabled: sources.is_supplied(&param.name),
            })
            .collect();
        if fields.iter().any(|field| !field.disabled) {
            sources.prompted = prompter.ask_for_params("Provide the operation params", &fields)?;
        }
    }

    let values = resolve(operation, &sources)?;
    let request = build_request_data_with(
        operation,
        &values,
        BuildOptions {
            strict_json: options.strict_json,
        },
    )?;

    if options.dry_run {
        return Ok(Outcome::DryRun(request));
    }

    let response = transport.execute(&request).await?;
    Ok(Outcome::Sent(request, response))
}
