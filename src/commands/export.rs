// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//! Export command - writes the taxonomy as JSON Lines

use crate::export::{records, write_jsonl};
use anyhow::{Context, Result};
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;
use tracing::info;

/// Arguments for the export command
pub struct ExportArgs<'a> {
    /// Migrations directory
    pub root: &'a Path,
    /// Only export this ecosystem
    pub ecosystem: Option<&'a str>,
    /// Replay only migrations named before this string
    pub max_date: Option<&'a str>,
    /// Output file
    pub output: &'a Path,
}

/// Run the export command
pub fn run(args: &ExportArgs<'_>) -> Result<()> {
    info!("Exporting to {}", args.output.display());

    let taxonomy = super::load_or_report(args.root, args.max_date)?;

    // Build every row before the output file is created
    let rows = records(&taxonomy, args.ecosystem)?;

    let file = File::create(args.output)
        .with_context(|| format!("Failed to create {}", args.output.display()))?;
    write_jsonl(&rows, BufWriter::new(file))
        .with_context(|| format!("Failed to write {}", args.output.display()))?;

    info!("Wrote {} records to {}", rows.len(), args.output.display());
    Ok(())
}
