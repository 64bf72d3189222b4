//! Parameter listing command.

#![allow(clippy::print_literal)] // Table headers use literal strings intentionally

use std::path::Path;

use clap::Args;
use serde::Serialize;

use super::common::load_config;

#[derive(Args)]
pub struct ParamsArgs {
    /// Only list parameters whose id contains this text
    #[arg(value_name = "FILTER")]
    filter: Option<String>,

    /// Print the listing as JSON
    #[arg(long)]
    json: bool,
}

#[derive(Debug, Serialize)]
struct ParamInfo {
    id: &'static str,
    name: &'static str,
    min: f32,
    max: f32,
    default: f32,
    stepped: bool,
    value: f32,
}

pub fn run(config_path: Option<&Path>, args: ParamsArgs) -> anyhow::Result<()> {
    let config = load_config(config_path, &[])?;
    let store = config.build_store()?;

    let params: Vec<ParamInfo> = store
        .descriptors()
        .filter(|d| args.filter.as_deref().is_none_or(|f| d.id.contains(f)))
        .map(|d| ParamInfo {
            id: d.id,
            name: d.name,
            min: d.min,
            max: d.max,
            default: d.default,
            stepped: d.stepped,
            value: store.get(d.id).unwrap_or(d.default),
        })
        .collect();

    if args.json {
        println!("{}", serde_json::to_string_pretty(&params)?);
        return Ok(());
    }

    if params.is_empty() {
        println!("No parameters match.");
        return Ok(());
    }

    println!(
        "  {:22}  {:22}  {:>9}  {:>9}  {:>9}  {:>9}",
        "Id", "Name", "Min", "Max", "Default", "Value"
    );
    println!(
        "  {:22}  {:22}  {:>9}  {:>9}  {:>9}  {:>9}",
        "--", "----", "---", "---", "-------", "-----"
    );
    for p in &params {
        let marker = if p.value == p.default { "" } else { " *" };
        println!(
            "  {:22}  {:22}  {:>9.3}  {:>9.3}  {:>9.3}  {:>9.3}{}",
            p.id, p.name, p.min, p.max, p.default, p.value, marker
        );
    }
    println!();
    println!("{} parameters (* = overridden by config)", params.len());
    Ok(())
}
