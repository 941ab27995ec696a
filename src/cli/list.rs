// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! List collections, operations and environments

use crate::output::format_operations;
use crate::store::CollectionStore;
use anyhow::Result;
use colored::Colorize;

pub fn collections(store: &CollectionStore) -> Result<()> {
    let collections = store.list_collections()?;

    if collections.is_empty() {
        println!("{}", "There are no collections available".yellow());
        println!("Add <name>.json files to {}", store.dir().display());
        return Ok(());
    }

    for collection in collections {
        println!("{collection}");
    }
    Ok(())
}

pub fn operations(store: &CollectionStore, collection_name: &str) -> Result<()> {
    let collection = store.load_collection(collection_name)?;

    if !collection.description.is_empty() {
        println!("{}", collection.description.cyan());
    }
    if !collection.base_url.is_empty() {
        println!("Base URL: {}", collection.base_url);
    }

    if collection.operations.is_empty() {
        println!("{}", "The collection is empty".yellow());
    } else {
        println!("{}", format_operations(&collection));
    }

    let environments = store.list_environments(collection_name)?;
    if !environments.is_empty() {
        println!();
        println!("Environments: {}", environments.join(", "));
    }

    Ok(())
}
