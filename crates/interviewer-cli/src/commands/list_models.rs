//! The `interviewer list-models` command.

use std::path::PathBuf;

use anyhow::Result;
use comfy_table::{Cell, Table};

use interviewer_providers::create_provider;

pub fn execute(provider_filter: Option<String>, config_path: Option<PathBuf>) -> Result<()> {
    let config = interviewer_providers::config::load_config_from(config_path.as_deref())?;

    let mut names: Vec<&String> = config.providers.keys().collect();
    names.sort();

    let mut table = Table::new();
    table.set_header(vec!["Provider", "Model", "Name", "Context", "Input $/1K", "Output $/1K"]);
    let mut found_any = false;

    for name in names {
        if provider_filter.as_ref().is_some_and(|filter| filter != name) {
            continue;
        }

        let provider = match create_provider(name, &config.providers[name], config.request_timeout()) {
            Ok(provider) => provider,
            Err(e) => {
                eprintln!("Skipping {name}: {e:#}");
                continue;
            }
        };
        for model in provider.available_models() {
            found_any = true;
            let marker = if *name == config.default_provider && model.id == config.default_model {
                " (default)"
            } else {
                ""
            };
            table.add_row(vec![
                Cell::new(name),
                Cell::new(format!("{}{marker}", model.id)),
                Cell::new(&model.name),
                Cell::new(format!("{}K", model.max_context / 1000)),
                Cell::new(format!("{:.6}", model.cost_per_1k_input)),
                Cell::new(format!("{:.6}", model.cost_per_1k_output)),
            ]);
        }
    }

    if found_any {
        println!("{table}");
    } else {
        println!("No providers configured. Run `interviewer init` to create a config file.");
    }

    Ok(())
}
