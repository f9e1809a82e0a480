//! Variant Forge - Entry Point
//!
//! Loads the catalogs, composes items from the command line and prints
//! them as JSON.

use std::path::{Path, PathBuf};

use anyhow::{anyhow, bail, Context, Result};

use variant_forge::data::paths::{resolve_data_dir, ASSETS_DATA_DIR};
use variant_forge::data::{export_default_data, DataManager};
use variant_forge::items::{compose_with_flavor, ItemCategory, VariantChoice};
use variant_forge::{export_json, to_persistable_payload};

const USAGE: &str = "\
Usage:
  variant-forge [--data DIR] list [bases|variants] [CATEGORY]
  variant-forge [--data DIR] compose BASE [VARIANT[=OPTION]]... [--payload]
  variant-forge [--data DIR] export-defaults

Categories: weapon, armor, shield, ammunition";

/// Parsed command line
struct Args {
    data_dir: Option<PathBuf>,
    command: Vec<String>,
    payload: bool,
}

fn parse_args(raw: impl IntoIterator<Item = String>) -> Result<Args> {
    let mut args = Args {
        data_dir: None,
        command: Vec::new(),
        payload: false,
    };
    let mut iter = raw.into_iter();
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--data" => {
                let dir = iter.next().ok_or_else(|| anyhow!("--data needs a directory"))?;
                args.data_dir = Some(PathBuf::from(dir));
            }
            "--payload" => args.payload = true,
            "-h" | "--help" => {
                args.command = vec!["help".to_string()];
                return Ok(args);
            }
            _ => args.command.push(arg),
        }
    }
    Ok(args)
}

fn parse_category(raw: &str) -> Result<ItemCategory> {
    ItemCategory::parse(raw).ok_or_else(|| anyhow!("unknown category '{}'", raw))
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or("warn")
    )
    .init();

    let args = parse_args(std::env::args().skip(1))?;
    log::debug!("Starting Variant Forge v{}", env!("CARGO_PKG_VERSION"));

    let Some((command, rest)) = args.command.split_first() else {
        println!("{}", USAGE);
        return Ok(());
    };

    match command.as_str() {
        "help" => println!("{}", USAGE),
        "export-defaults" => {
            let dir = args
                .data_dir
                .clone()
                .unwrap_or_else(|| PathBuf::from(ASSETS_DATA_DIR));
            export_default_data(&dir)
                .with_context(|| format!("exporting catalogs to {}", dir.display()))?;
            println!("Wrote default catalogs to {}", dir.display());
        }
        "list" => {
            let manager = load(args.data_dir.as_deref());
            run_list(&manager, rest)?;
        }
        "compose" => {
            let manager = load(args.data_dir.as_deref());
            run_compose(&manager, rest, args.payload)?;
        }
        other => bail!("unknown command '{}'\n\n{}", other, USAGE),
    }

    Ok(())
}

fn load(data_dir: Option<&Path>) -> DataManager {
    let dir = resolve_data_dir(data_dir);
    log::info!("Using catalog directory {}", dir.display());
    DataManager::load_from_dir(&dir)
}

fn run_list(manager: &DataManager, rest: &[String]) -> Result<()> {
    let (what, category) = match rest {
        [] => ("bases", None),
        [what] if what == "bases" || what == "variants" => (what.as_str(), None),
        [category] => ("bases", Some(parse_category(category)?)),
        [what, category] => (what.as_str(), Some(parse_category(category)?)),
        _ => bail!("too many arguments to list\n\n{}", USAGE),
    };

    let json = match what {
        "bases" => {
            let pool = manager.base_pool(category);
            if pool.is_degraded() {
                eprintln!("Warning: no mundane bases matched, showing relaxed results");
            }
            serde_json::to_string_pretty(&pool.items)?
        }
        "variants" => serde_json::to_string_pretty(&manager.load_variants(category))?,
        other => bail!("can only list bases or variants, not '{}'", other),
    };
    println!("{}", json);
    Ok(())
}

fn run_compose(manager: &DataManager, rest: &[String], payload: bool) -> Result<()> {
    let (base_name, picks) = rest
        .split_first()
        .ok_or_else(|| anyhow!("compose needs a base item\n\n{}", USAGE))?;
    let base = manager
        .find_base(base_name)
        .ok_or_else(|| anyhow!("no eligible base item named '{}'", base_name))?;

    let mut choices = Vec::new();
    for pick in picks {
        let (name, option) = match pick.split_once('=') {
            Some((name, option)) => (name, Some(option)),
            None => (pick.as_str(), None),
        };
        // Prefer the definition for this base's category; others are kept so
        // composition can report them
        let variant = manager
            .find_variant_for(name, base.category)
            .or_else(|| manager.find_variant(name))
            .ok_or_else(|| anyhow!("no variant named '{}'", name))?;
        let choice = match option {
            Some(option) => VariantChoice::with_option(variant.clone(), option),
            None => VariantChoice::new(variant.clone()),
        };
        choices.push(choice);
    }

    let item = compose_with_flavor(&base, &choices, Some(&manager.flavor))?;
    for warning in &item.warnings {
        log::warn!("{}", warning);
    }

    let json = if payload {
        serde_json::to_string_pretty(&to_persistable_payload(&item))?
    } else {
        export_json(&item)?
    };
    println!("{}", json);
    Ok(())
}
