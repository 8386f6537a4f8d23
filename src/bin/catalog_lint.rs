//! Catalog consistency checker.
//!
//! Loads a catalog with full schema validation, then runs the advisory lint
//! over the compatibility graph. The resolver silently returns empty lists
//! when data is missing, so this is the tool that tells catalog authors where
//! those empty results will come from.

use anyhow::{Result, bail};
use stackfit::{TechnologyIndex, default_catalog_path, lint_catalog};
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
    let findings = lint_catalog(&index);

    if findings.is_empty() {
        println!("ok: {} lints clean", catalog_path.display());
        return Ok(());
    }

    for finding in &findings {
        println!("{finding}");
    }
    bail!(
        "{} lint finding(s) in {}",
        findings.len(),
        catalog_path.display()
    );
}

struct CliArgs {
    catalog: Option<PathBuf>,
}

impl CliArgs {
    fn parse() -> Result<Self> {
        let mut args = env::args_os().skip(1);
        let mut catalog: Option<PathBuf> = None;

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
                "--help" | "-h" => {
                    print_usage();
                    std::process::exit(0);
                }
                other => bail!("unknown flag: {other}"),
            }
        }

        Ok(CliArgs { catalog })
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
        "usage: catalog-lint [--catalog FILE]

Validates the catalog against its JSON Schema, then reports advisory
findings: dangling compatibility references, options missing from topology
lists, and duplicate list entries. Exits non-zero when findings exist."
    );
}
