// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//! Migration discovery and replay
//!
//! A migrations directory holds flat files named `YYYY-MM-DDTHHMMSS_*.txt`.
//! They are replayed oldest first into an empty [`Taxonomy`]. A bad line
//! is recorded and skipped; the load as a whole only fails once every file
//! has been replayed, so one pass reports every defect.

use crate::command::{Command, KEYWORD_LEN};
use crate::error::{LoadError, ReplayError, TaxonomyError};
use crate::graph::Taxonomy;
use crate::lexer;
use crate::timestamp;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, trace};
use walkdir::WalkDir;

/// Number of leading filename characters that decide replay order
const SORT_PREFIX_LEN: usize = 19;

/// First `n` characters of `s`
fn char_prefix(s: &str, n: usize) -> &str {
    s.char_indices().nth(n).map_or(s, |(i, _)| &s[..i])
}

/// Blank, or first non-blank character is `#`
fn is_comment(line: &str) -> bool {
    line.trim_start().chars().next().map_or(true, |c| c == '#')
}

/// List the migration files under `root`, in replay order
///
/// Only regular files (or links to them) directly inside `root` whose name
/// carries a valid timestamp are kept. With `max_date`, only names that sort
/// strictly before it survive; the comparison is on the raw strings, so a
/// bare year such as `2015` works as a cutoff.
///
/// # Errors
///
/// [`LoadError::ReadDir`] when the directory cannot be listed.
pub fn discover(root: &Path, max_date: Option<&str>) -> Result<Vec<PathBuf>, LoadError> {
    let mut found: Vec<(String, PathBuf)> = Vec::new();

    for entry in WalkDir::new(root).min_depth(1).max_depth(1).follow_links(true) {
        let entry = match entry {
            Ok(entry) => entry,
            // Only a failure on the directory itself is fatal
            Err(source) if source.depth() == 0 => {
                return Err(LoadError::ReadDir {
                    path: root.to_path_buf(),
                    source,
                });
            }
            Err(err) => {
                debug!(error = %err, "skipping unreadable directory entry");
                continue;
            }
        };
        if !entry.file_type().is_file() {
            continue;
        }
        let Some(name) = entry.file_name().to_str() else {
            continue;
        };
        if !timestamp::has_valid_timestamp(name) {
            debug!(file = name, "skipping file without migration timestamp");
            continue;
        }
        if max_date.is_some_and(|cutoff| name >= cutoff) {
            continue;
        }
        found.push((name.to_owned(), entry.into_path()));
    }

    found.sort_by(|(a, _), (b, _)| {
        char_prefix(a, SORT_PREFIX_LEN)
            .cmp(char_prefix(b, SORT_PREFIX_LEN))
            .then_with(|| a.cmp(b))
    });

    Ok(found.into_iter().map(|(_, path)| path).collect())
}

/// Interpret one non-comment line
fn replay_line(taxonomy: &mut Taxonomy, line: &str) -> Result<(), TaxonomyError> {
    let split_at = line
        .char_indices()
        .nth(KEYWORD_LEN)
        .map_or(line.len(), |(i, _)| i);
    let (keyword, rest) = line.split_at(split_at);

    let tokens = lexer::split(rest)?;
    if let Some(command) = Command::parse(keyword, tokens)? {
        trace!(keyword = command.keyword(), "applying");
        command.apply(taxonomy)?;
    }
    Ok(())
}

/// Replay the text of one migration into `taxonomy`
///
/// Returns the line errors met; `path` only labels them.
pub fn replay_source(taxonomy: &mut Taxonomy, source: &str, path: &Path) -> Vec<ReplayError> {
    let mut errors = Vec::new();

    for (index, line) in source.split('\n').enumerate() {
        let line = line.strip_suffix('\r').unwrap_or(line);
        if is_comment(line) || line.chars().count() < KEYWORD_LEN {
            continue;
        }
        if let Err(error) = replay_line(taxonomy, line) {
            let record = ReplayError {
                error,
                line: index + 1,
                path: path.to_path_buf(),
            };
            debug!(%record, "migration line rejected");
            errors.push(record);
        }
    }

    errors
}

/// Read and replay one migration file, counting it as replayed
///
/// # Errors
///
/// [`LoadError::ReadFile`] when the file cannot be read as UTF-8 text.
pub fn replay_file(taxonomy: &mut Taxonomy, path: &Path) -> Result<Vec<ReplayError>, LoadError> {
    let source = fs::read_to_string(path).map_err(|source| LoadError::ReadFile {
        path: path.to_path_buf(),
        source,
    })?;
    let errors = replay_source(taxonomy, &source, path);
    taxonomy.record_migration();
    Ok(errors)
}

/// Build a taxonomy by replaying every migration under `root`
///
/// # Errors
///
/// [`LoadError::ReadDir`] / [`LoadError::ReadFile`] on I/O failure, and
/// [`LoadError::ValidationFailed`] carrying every recorded line error when
/// any line was rejected.
pub fn load(root: &Path, max_date: Option<&str>) -> Result<Taxonomy, LoadError> {
    let files = discover(root, max_date)?;
    info!(root = %root.display(), count = files.len(), "replaying migrations");

    let mut taxonomy = Taxonomy::new();
    let mut errors = Vec::new();

    for path in &files {
        debug!(file = %path.display(), "replaying");
        errors.extend(replay_file(&mut taxonomy, path)?);
    }

    if errors.is_empty() {
        Ok(taxonomy)
    } else {
        Err(LoadError::ValidationFailed { errors })
    }
}
