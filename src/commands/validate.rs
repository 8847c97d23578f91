// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//! Validate command - replays every migration and reports totals

use crate::types::TaxonomyStats;
use anyhow::Result;
use owo_colors::OwoColorize;
use std::path::Path;
use tracing::info;

/// Render the statistics block printed after a clean replay
#[must_use]
pub fn render_stats(stats: &TaxonomyStats, color: bool) -> String {
    let bar = if color {
        "┃".magenta().to_string()
    } else {
        "┃".to_string()
    };

    [
        (stats.migration_count, "Migrations"),
        (stats.eco_count, "Ecosystems"),
        (stats.repo_count, "Repos"),
        (stats.tag_count, "Tags"),
        (stats.eco_connections_count, "Connections"),
    ]
    .iter()
    .map(|(count, label)| format!("{bar} {count:<6} {label}\n"))
    .collect()
}

/// Run the validate command
pub fn run(root: &Path, json: bool, color: bool) -> Result<()> {
    info!("Validating migrations in {}", root.display());

    let taxonomy = super::load_or_report(root, None)?;
    let stats = taxonomy.stats();

    if json {
        println!("{}", serde_json::to_string(&stats)?);
    } else {
        print!("{}", render_stats(&stats, color));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_stats_plain() {
        let stats = TaxonomyStats {
            migration_count: 3,
            eco_count: 12,
            repo_count: 1500,
            tag_count: 4,
            eco_connections_count: 2,
        };
        let out = render_stats(&stats, false);
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines[0], "┃ 3      Migrations");
        assert_eq!(lines[2], "┃ 1500   Repos");
        assert_eq!(lines.len(), 5);
    }

    #[test]
    fn test_render_stats_colored() {
        let out = render_stats(&TaxonomyStats::default(), true);
        assert!(out.starts_with("\u{1b}[35m┃\u{1b}[39m"));
    }
}
