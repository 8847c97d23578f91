// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//
//! Crypto Ecosystems library - taxonomy of open source ecosystems
//!
//! The taxonomy is never edited directly. It is rebuilt on every run by
//! replaying an ordered, append-only log of timestamped migration files
//! against an empty [`graph::Taxonomy`], then exported as JSON Lines.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod command;
pub mod commands;
pub mod config;
pub mod error;
pub mod export;
pub mod graph;
pub mod lexer;
pub mod migrations;
pub mod timestamp;

/// Core data types shared by the store, the loader and the exporter
pub mod types {
    use serde::{Deserialize, Serialize};
    use std::fmt;

    // =========================================================================
    // Surrogate IDs
    // =========================================================================

    macro_rules! surrogate_id {
        ($(#[$meta:meta])* $name:ident) => {
            $(#[$meta])*
            #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
            pub struct $name(u32);

            impl $name {
                /// Raw numeric value of this ID
                #[must_use]
                pub fn get(self) -> u32 {
                    self.0
                }
            }

            impl From<u32> for $name {
                fn from(raw: u32) -> Self {
                    Self(raw)
                }
            }

            impl fmt::Display for $name {
                fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                    write!(f, "{}", self.0)
                }
            }
        };
    }

    surrogate_id!(
        /// Ecosystem identity, stable across renames
        EcoId
    );
    surrogate_id!(
        /// Repository identity, stable across renames
        RepoId
    );
    surrogate_id!(
        /// Tag identity
        TagId
    );

    // =========================================================================
    // Statistics
    // =========================================================================

    /// Summary counts reported by `ce validate`
    #[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
    pub struct TaxonomyStats {
        /// Migration files replayed by the last load
        pub migration_count: usize,
        /// Live ecosystems
        pub eco_count: usize,
        /// Live repositories
        pub repo_count: usize,
        /// Interned tags
        pub tag_count: usize,
        /// Live parent to child edges
        pub eco_connections_count: usize,
    }
}

/// Prelude for common imports
pub mod prelude {
    pub use crate::command::Command;
    pub use crate::error::{ExportError, LoadError, ReplayError, TaxonomyError};
    pub use crate::graph::Taxonomy;
    pub use crate::types::*;
}
