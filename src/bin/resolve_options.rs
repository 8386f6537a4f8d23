//! Compatibility query CLI.
//!
//! Loads a technology catalog, applies the given selections, and prints the
//! options in the target subcategory that stay compatible with every
//! selection. Designed so form backends and scripts can answer "what can I
//! still pick here?" without linking the library.

use anyhow::{Context, Result, bail};
use serde_json::Value;
use stackfit::{
    CategoryId, SelectionSet, TechnologyIndex, default_catalog_path, filter_compatible,
    parse_selection_pair, selections_from_json,
};
use std::env;
use std::path::PathBuf;

fn main() {
    if let Err(err) = run() {
        eprintln!("{err:#}");
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let args = CliArgs::parse()?;

    let catalog_path = match args.catalog {
        Some(path) => path,
        None => default_catalog_path()?,
    };
    let index = TechnologyIndex::load(&catalog_path)?;

    if args.list_categories {
        return print_categories(&index, args.pretty);
    }

    let Some(target) = args.target else {
        bail!("--target <subcategory> is required (or use --list-categories)");
    };

    let options = filter_compatible(&index, &args.selections, &target);
    let value = serde_json::to_value(&options)?;
    print_value(&value, args.pretty)
}

fn print_categories(index: &TechnologyIndex, pretty: bool) -> Result<()> {
    let mut listing = serde_json::Map::new();
    for subcategory in index.topology().subcategories() {
        let domain = index
            .topology()
            .parent_of(subcategory)
            .map(|domain| domain.as_str().to_string())
            .unwrap_or_default();
        let options = index
            .topology()
            .options_for(subcategory)
            .unwrap_or(&[])
            .iter()
            .map(|name| Value::String(name.0.clone()))
            .collect::<Vec<_>>();
        listing.insert(
            subcategory.0.clone(),
            serde_json::json!({"domain": domain, "options": options}),
        );
    }
    print_value(&Value::Object(listing), pretty)
}

fn print_value(value: &Value, pretty: bool) -> Result<()> {
    if pretty {
        println!("{}", serde_json::to_string_pretty(value)?);
    } else {
        println!("{}", serde_json::to_string(value)?);
    }
    Ok(())
}

struct CliArgs {
    catalog: Option<PathBuf>,
    selections: SelectionSet,
    target: Option<CategoryId>,
    list_categories: bool,
    pretty: bool,
}

impl CliArgs {
    fn parse() -> Result<Self> {
        let mut args = env::args_os().skip(1);
        let mut catalog: Option<PathBuf> = None;
        let mut selections = SelectionSet::new();
        let mut target: Option<CategoryId> = None;
        let mut list_categories = false;
        let mut pretty = false;

        while let Some(arg_os) = args.next() {
            let arg = arg_os
                .into_string()
                .map_err(|_| anyhow::anyhow!("argument is not valid UTF-8"))?;
            match arg.as_str() {
                "--catalog" => {
                    let path = next_value(&mut args, "--catalog")?;
                    if catalog.is_some() {
                        bail!("--catalog may only be provided once");
                    }
                    catalog = Some(PathBuf::from(path));
                }
                "--select" => {
                    let raw = next_value(&mut args, "--select")?;
                    let (category, name) = parse_selection_pair(&raw)?;
                    selections.select(category, name);
                }
                "--selections-json" => {
                    let raw = next_value(&mut args, "--selections-json")?;
                    let value: Value = serde_json::from_str(&raw)
                        .with_context(|| format!("invalid JSON for --selections-json: {raw}"))?;
                    for (category, name) in selections_from_json(&value)?.iter() {
                        selections.select(category.clone(), name.clone());
                    }
                }
                "--target" => {
                    let raw = next_value(&mut args, "--target")?;
                    if target.is_some() {
                        bail!("--target may only be provided once");
                    }
                    target = Some(CategoryId(raw));
                }
                "--list-categories" => {
                    list_categories = true;
                }
                "--pretty" => {
                    pretty = true;
                }
                "--help" | "-h" => {
                    print_usage();
                    std::process::exit(0);
                }
                other => bail!("unknown flag: {other}"),
            }
        }

        Ok(CliArgs {
            catalog,
            selections,
            target,
            list_categories,
            pretty,
        })
    }
}

fn next_value(args: &mut impl Iterator<Item = std::ffi::OsString>, flag: &str) -> Result<String> {
    args.next()
        .map(|os| {
            os.into_string()
                .map_err(|_| anyhow::anyhow!("value for {flag} is not valid UTF-8"))
        })
        .transpose()?
        .ok_or_else(|| anyhow::anyhow!("missing value for {flag}"))
}

fn print_usage() {
    println!(
        "usage: resolve-options [--catalog FILE] [--select SUBCATEGORY=NAME]... \\
                       [--selections-json OBJECT] --target SUBCATEGORY [--pretty]
       resolve-options [--catalog FILE] --list-categories [--pretty]

Prints the technologies in the target subcategory compatible with every
selection, as a JSON array. Without selections the full option list is
printed. The catalog defaults to the shipped snapshot; override with
--catalog or STACKFIT_CATALOG."
    );
}
