// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//
//! Command implementations

pub mod completions;
pub mod export;
pub mod validate;

use crate::error::LoadError;
use crate::graph::Taxonomy;
use crate::migrations;
use anyhow::{Context, Result};
use std::path::Path;

/// Load the taxonomy, printing every replay error to stderr on failure
pub(crate) fn load_or_report(root: &Path, max_date: Option<&str>) -> Result<Taxonomy> {
    match migrations::load(root, max_date) {
        Ok(taxonomy) => Ok(taxonomy),
        Err(LoadError::ValidationFailed { errors }) => {
            for error in &errors {
                eprintln!("{error}");
            }
            anyhow::bail!("Validation failed with {} error(s)", errors.len())
        }
        Err(err) => Err(err).with_context(|| format!("Failed to load migrations from {}", root.display())),
    }
}
