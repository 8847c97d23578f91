// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//! JSON Lines export of the ecosystem hierarchy
//!
//! One record per (ecosystem reached, repository) pair:
//!
//! ```text
//! {"eco_name":"Bitcoin","branch":["Lightning"],"repo_url":"https://github.com/lightningnetwork/lnd","tags":["#protocol"]}
//! ```
//!
//! `eco_name` is the top-level ecosystem being exported and `branch` the
//! path of descendant names from it down to the ecosystem owning the repo.

use caseless::default_case_fold_str;
use crate::error::{ExportError, TaxonomyError};
use crate::graph::Taxonomy;
use crate::types::{EcoId, RepoId};
use serde::Serialize;
use serde_json::ser::Formatter;
use std::cmp::Ordering;
use std::io::{self, Write};
use tracing::info;

/// One exported row
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExportRecord<'a> {
    /// Top-level ecosystem requested
    pub eco_name: &'a str,
    /// Descendant names leading to the owning ecosystem, empty at the top
    pub branch: Vec<&'a str>,
    /// Repository URL
    pub repo_url: &'a str,
    /// Tags for this (ecosystem, repository) pair
    pub tags: Vec<&'a str>,
}

/// Case-insensitive order with an exact tiebreak
///
/// Uses full Unicode case folding, so `ß` sorts as `ss` and `ﬁ` as `fi`.
fn folded_order(a: &str, b: &str) -> Ordering {
    default_case_fold_str(a)
        .cmp(&default_case_fold_str(b))
        .then_with(|| a.cmp(b))
}

struct Walk<'a, 'r> {
    taxonomy: &'a Taxonomy,
    top: &'a str,
    branch: Vec<&'a str>,
    path: Vec<EcoId>,
    out: &'r mut Vec<ExportRecord<'a>>,
}

impl<'a> Walk<'a, '_> {
    fn tags(&self, eco: EcoId, repo: RepoId) -> Vec<&'a str> {
        let taxonomy = self.taxonomy;
        let mut tags: Vec<&'a str> = taxonomy
            .tags_of(eco, repo)
            .into_iter()
            .flatten()
            .filter_map(|&tag| taxonomy.tag_name(tag))
            .collect();
        tags.sort_by(|a, b| folded_order(a, b));
        tags
    }

    fn visit(&mut self, eco: EcoId) -> Result<(), TaxonomyError> {
        let taxonomy = self.taxonomy;

        let mut repos: Vec<(RepoId, &'a str)> = taxonomy
            .repos_of(eco)
            .into_iter()
            .flatten()
            .filter_map(|&repo| taxonomy.repo_url(repo).map(|url| (repo, url)))
            .collect();
        repos.sort_by(|(_, a), (_, b)| folded_order(a, b));

        for (repo, repo_url) in repos {
            let tags = self.tags(eco, repo);
            self.out.push(ExportRecord {
                eco_name: self.top,
                branch: self.branch.clone(),
                repo_url,
                tags,
            });
        }

        let mut children: Vec<(EcoId, &'a str)> = taxonomy
            .children_of(eco)
            .into_iter()
            .flatten()
            .filter_map(|&child| taxonomy.eco_name(child).map(|name| (child, name)))
            .collect();
        children.sort_by(|(_, a), (_, b)| folded_order(a, b));

        self.path.push(eco);
        for (child, name) in children {
            if self.path.contains(&child) {
                return Err(TaxonomyError::EcosystemCycle(name.to_owned()));
            }
            self.branch.push(name);
            self.visit(child)?;
            self.branch.pop();
        }
        self.path.pop();
        Ok(())
    }
}

/// Build the export rows for one ecosystem, or for every ecosystem
///
/// With `None` each live ecosystem is its own top level, in
/// case-insensitive name order, so a shared sub-ecosystem appears once per
/// top-level path that reaches it.
///
/// # Errors
///
/// [`TaxonomyError::InvalidEcosystem`] for an unknown requested name and
/// [`TaxonomyError::EcosystemCycle`] when traversal loops back on itself.
pub fn records<'a>(taxonomy: &'a Taxonomy, ecosystem: Option<&str>) -> Result<Vec<ExportRecord<'a>>, TaxonomyError> {
    let tops: Vec<(&'a str, EcoId)> = match ecosystem {
        Some(name) => {
            let id = taxonomy
                .eco_id(name)
                .ok_or_else(|| TaxonomyError::InvalidEcosystem(name.to_owned()))?;
            let name = taxonomy
                .eco_name(id)
                .ok_or_else(|| TaxonomyError::InvalidEcosystem(name.to_owned()))?;
            vec![(name, id)]
        }
        None => {
            let mut all: Vec<_> = taxonomy.ecosystems().collect();
            all.sort_by(|(a, _), (b, _)| folded_order(a, b));
            all
        }
    };

    let mut out = Vec::new();
    for (top, id) in tops {
        Walk {
            taxonomy,
            top,
            branch: Vec::new(),
            path: Vec::new(),
            out: &mut out,
        }
        .visit(id)?;
    }
    Ok(out)
}

/// `serde_json` formatter emitting ASCII only
///
/// Anything outside printable ASCII becomes a `\uXXXX` escape, using a
/// surrogate pair above U+FFFF.
struct AsciiFormatter;

impl Formatter for AsciiFormatter {
    fn write_string_fragment<W>(&mut self, writer: &mut W, fragment: &str) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        let mut start = 0;
        for (i, c) in fragment.char_indices() {
            if (' '..='~').contains(&c) {
                continue;
            }
            writer.write_all(fragment[start..i].as_bytes())?;
            let mut units = [0u16; 2];
            for unit in c.encode_utf16(&mut units) {
                write!(writer, "\\u{unit:04x}")?;
            }
            start = i + c.len_utf8();
        }
        writer.write_all(fragment[start..].as_bytes())
    }
}

/// Serialize records as newline-terminated compact JSON objects
///
/// # Errors
///
/// I/O or serialization failure.
pub fn write_jsonl<W: Write>(records: &[ExportRecord<'_>], mut writer: W) -> Result<(), ExportError> {
    for record in records {
        let mut ser = serde_json::Serializer::with_formatter(&mut writer, AsciiFormatter);
        record.serialize(&mut ser)?;
        writer.write_all(b"\n")?;
    }
    writer.flush()?;
    Ok(())
}

/// Export the taxonomy as JSON Lines into `writer`
///
/// Every row is built before the first byte is written, so a failed export
/// leaves `writer` untouched. Returns the number of rows written.
///
/// # Errors
///
/// See [`records`] and [`write_jsonl`].
pub fn export_jsonl<W: Write>(taxonomy: &Taxonomy, ecosystem: Option<&str>, writer: W) -> Result<usize, ExportError> {
    let rows = records(taxonomy, ecosystem)?;
    write_jsonl(&rows, writer)?;
    info!(rows = rows.len(), ecosystem = ecosystem.unwrap_or("*"), "exported taxonomy");
    Ok(rows.len())
}
