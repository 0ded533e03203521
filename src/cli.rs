use std::io::Write;
use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use clap::Parser;
use gridcalc_core::storage::write_cells;
use gridcalc_core::{FormulaEngine, Sheet};
use tracing::debug;

use crate::config::load_engine_config;

/// Apply `[target]=expression` formulas to a sheet of cells.
///
/// Statements in one FORMULA are joined with `||` and applied in order.
#[derive(Parser, Debug)]
#[command(name = "gridcalc", version, about)]
pub struct Args {
    /// Formula batches, e.g. `[A.3]=[A.1]+[A.2]||[B.1]=SUM([A.1:A.3])`.
    #[arg(value_name = "FORMULA")]
    pub formulas: Vec<String>,

    /// Load cells from a CSV grid (first line is A.1, B.1, ...).
    #[arg(long, value_name = "FILE")]
    pub cells: Option<PathBuf>,

    /// Set a cell before applying formulas (repeatable).
    #[arg(long = "set", value_name = "ID=VALUE", value_parser = parse_assignment)]
    pub set: Vec<(String, String)>,

    /// Re-apply FORMULAS whenever ID receives a computed value (repeatable).
    #[arg(long = "on-change", value_name = "ID=FORMULAS", value_parser = parse_assignment)]
    pub on_change: Vec<(String, String)>,

    /// Engine config file (TOML). Defaults to the per-user config.toml.
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Ignore the per-user config file.
    #[arg(long, conflicts_with = "config")]
    pub no_config: bool,

    /// Write the sheet to a CSV file instead of stdout.
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Save results back to the --cells file instead of printing them.
    #[arg(short = 'i', long, requires = "cells", conflicts_with = "output")]
    pub in_place: bool,

    /// Log applied formulas to stderr.
    #[arg(short, long)]
    pub verbose: bool,
}

/// Split `ID=VALUE` on the first `=`.
fn parse_assignment(raw: &str) -> std::result::Result<(String, String), String> {
    let (id, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected ID=VALUE, got `{}`", raw))?;
    let id = id.trim();
    if id.is_empty() {
        return Err(format!("missing cell id in `{}`", raw));
    }
    Ok((id.to_string(), value.to_string()))
}

pub fn run(args: Args) -> Result<()> {
    if args.formulas.is_empty() && args.cells.is_none() && args.set.is_empty() {
        bail!("nothing to do: pass a FORMULA, --cells or --set");
    }

    let config = load_engine_config(args.config.as_deref(), args.no_config)?;
    debug!(?config, "engine config");
    let engine = FormulaEngine::with_config(config);

    let mut sheet = Sheet::new();
    if let Some(path) = &args.cells {
        sheet
            .load_csv(path)
            .with_context(|| format!("failed to load cells from {}", path.display()))?;
    }
    for (id, value) in args.set {
        sheet.set(id, value);
    }
    for (id, formulae) in args.on_change {
        sheet.on_cell_changed_formula(id, formulae);
    }

    for formula in &args.formulas {
        sheet
            .apply(&engine, formula)
            .with_context(|| format!("failed to apply `{}`", formula))?;
    }

    match &args.output {
        Some(path) => sheet
            .save_csv(path)
            .with_context(|| format!("failed to write {}", path.display()))?,
        None if args.in_place => sheet.save().context("failed to save cells in place")?,
        None => {
            let stdout = std::io::stdout();
            let mut out = stdout.lock();
            write_cells(&mut out, &sheet)?;
            out.flush()?;
        }
    }
    Ok(())
}
