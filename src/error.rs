// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//! Error types for replay, load and export

use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// A typed domain condition raised while lexing, interpreting or applying a
/// migration command, or while traversing the graph for export.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TaxonomyError {
    /// A quoted token was never closed
    #[error("unterminated quote")]
    UnterminatedQuote,

    /// `ecoadd` arity
    #[error("ecoadd requires exactly one parameter")]
    EcoAddRequiresOneParameter,
    /// `repadd` arity
    #[error("repadd requires at least two parameters")]
    RepAddRequiresAtLeastTwoParameters,
    /// `ecocon` arity
    #[error("ecocon requires exactly two parameters")]
    EcoConRequiresExactlyTwoParameters,
    /// `ecodis` arity
    #[error("ecodis requires exactly two parameters")]
    EcoDisRequiresExactlyTwoParameters,
    /// `ecorem` arity
    #[error("ecorem requires exactly one parameter")]
    EcoRemRequiresOneParameter,
    /// `repmov` arity
    #[error("repmov requires exactly two parameters")]
    RepMovRequiresExactlyTwoParameters,
    /// `ecomov` arity
    #[error("ecomov requires exactly two parameters")]
    EcoMovRequiresExactlyTwoParameters,
    /// `reprem` arity
    #[error("reprem requires exactly two parameters")]
    RepRemRequiresExactlyTwoParameters,

    /// Named ecosystem does not exist
    #[error("ecosystem '{0}' does not exist")]
    InvalidEcosystem(String),
    /// Parent side of a connection does not exist
    #[error("parent ecosystem '{0}' does not exist")]
    InvalidParentEcosystem(String),
    /// Child side of a connection does not exist
    #[error("child ecosystem '{0}' does not exist")]
    InvalidChildEcosystem(String),
    /// Source of an ecosystem rename does not exist
    #[error("source ecosystem '{0}' does not exist")]
    InvalidSourceEcosystem(String),
    /// Destination of an ecosystem rename is taken
    #[error("destination ecosystem '{0}' already exists")]
    DestinationEcosystemAlreadyExists(String),
    /// Source of a repository move does not exist
    #[error("source repo '{0}' does not exist")]
    InvalidSourceRepo(String),
    /// Named repository does not exist
    #[error("repo '{0}' does not exist")]
    InvalidRepo(String),

    /// Repository removal from an ecosystem that holds none
    #[error("ecosystem '{0}' has no repos")]
    EcosystemHasNoRepos(String),
    /// Disconnect from a parent that holds no children
    #[error("parent ecosystem '{0}' has no children")]
    ParentEcosystemHasNoChildren(String),

    /// Export traversal came back to an ecosystem already on the current path
    #[error("ecosystem '{0}' is its own ancestor")]
    EcosystemCycle(String),
}

impl TaxonomyError {
    /// Stable name of this condition, used in replay reports
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::UnterminatedQuote => "UnterminatedQuote",
            Self::EcoAddRequiresOneParameter => "EcoAddRequiresOneParameter",
            Self::RepAddRequiresAtLeastTwoParameters => "RepAddRequiresAtLeastTwoParameters",
            Self::EcoConRequiresExactlyTwoParameters => "EcoConRequiresExactlyTwoParameters",
            Self::EcoDisRequiresExactlyTwoParameters => "EcoDisRequiresExactlyTwoParameters",
            Self::EcoRemRequiresOneParameter => "EcoRemRequiresOneParameter",
            Self::RepMovRequiresExactlyTwoParameters => "RepMovRequiresExactlyTwoParameters",
            Self::EcoMovRequiresExactlyTwoParameters => "EcoMovRequiresExactlyTwoParameters",
            Self::RepRemRequiresExactlyTwoParameters => "RepRemRequiresExactlyTwoParameters",
            Self::InvalidEcosystem(_) => "InvalidEcosystem",
            Self::InvalidParentEcosystem(_) => "InvalidParentEcosystem",
            Self::InvalidChildEcosystem(_) => "InvalidChildEcosystem",
            Self::InvalidSourceEcosystem(_) => "InvalidSourceEcosystem",
            Self::DestinationEcosystemAlreadyExists(_) => "DestinationEcosystemAlreadyExists",
            Self::InvalidSourceRepo(_) => "InvalidSourceRepo",
            Self::InvalidRepo(_) => "InvalidRepo",
            Self::EcosystemHasNoRepos(_) => "EcosystemHasNoRepos",
            Self::ParentEcosystemHasNoChildren(_) => "ParentEcosystemHasNoChildren",
            Self::EcosystemCycle(_) => "EcosystemCycle",
        }
    }
}

/// One failed migration line, recorded during replay
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReplayError {
    /// What went wrong
    pub error: TaxonomyError,
    /// 1-based line number within the migration file
    pub line: usize,
    /// Migration file the line came from
    pub path: PathBuf,
}

impl fmt::Display for ReplayError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}:{}: error.{}: {}",
            self.path.display(),
            self.line,
            self.error.kind(),
            self.error
        )
    }
}

/// Failure to build a taxonomy from a migrations directory
#[derive(Debug, Error)]
pub enum LoadError {
    /// The migrations directory could not be listed
    #[error("cannot read migrations directory {}", path.display())]
    ReadDir {
        /// Directory being listed
        path: PathBuf,
        /// Underlying error
        #[source]
        source: walkdir::Error,
    },

    /// A migration file could not be read
    #[error("cannot read migration {}", path.display())]
    ReadFile {
        /// File being read
        path: PathBuf,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },

    /// Replay finished with at least one recorded line error
    #[error("validation failed with {} error(s)", errors.len())]
    ValidationFailed {
        /// Every recorded line error, in replay order
        errors: Vec<ReplayError>,
    },
}

/// Failure to export the taxonomy
#[derive(Debug, Error)]
pub enum ExportError {
    /// Unknown requested ecosystem, or a cycle met during traversal
    #[error(transparent)]
    Taxonomy(#[from] TaxonomyError),

    /// Writing the output failed
    #[error("failed to write export")]
    Io(#[from] std::io::Error),

    /// Serializing a record failed
    #[error("failed to serialize export record")]
    Json(#[from] serde_json::Error),
}
