// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//! Migration commands
//!
//! Every migration line is a six-character keyword followed by arguments.
//! [`Command::parse`] checks arity per keyword and [`Command::apply`]
//! dispatches to the matching [`Taxonomy`] mutation.

use crate::error::TaxonomyError;
use crate::graph::Taxonomy;

/// Length of every command keyword
pub const KEYWORD_LEN: usize = 6;

/// One validated migration command
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// `ecoadd <name>`
    EcoAdd {
        /// Ecosystem to create
        name: String,
    },
    /// `repadd <eco> <url> [tags...]`
    RepAdd {
        /// Owning ecosystem
        eco: String,
        /// Repository URL
        url: String,
        /// Tags scoped to this (eco, url) pair
        tags: Vec<String>,
    },
    /// `ecocon <parent> <child>`
    EcoCon {
        /// Parent ecosystem
        parent: String,
        /// Child ecosystem
        child: String,
    },
    /// `ecodis <parent> <child>`
    EcoDis {
        /// Parent ecosystem
        parent: String,
        /// Child ecosystem
        child: String,
    },
    /// `ecorem <name>`
    EcoRem {
        /// Ecosystem to remove
        name: String,
    },
    /// `repmov <src> <dst>`
    RepMov {
        /// Current URL
        src: String,
        /// New URL, merged into if it already exists
        dst: String,
    },
    /// `ecomov <src> <dst>`
    EcoMov {
        /// Current name
        src: String,
        /// New name, must be free
        dst: String,
    },
    /// `reprem <eco> <url>`
    RepRem {
        /// Ecosystem to detach from
        eco: String,
        /// Repository URL
        url: String,
    },
}

/// Take exactly `N` tokens or fail with `err`
fn exactly<const N: usize>(tokens: Vec<String>, err: TaxonomyError) -> Result<[String; N], TaxonomyError> {
    <[String; N]>::try_from(tokens).map_err(|_| err)
}

impl Command {
    /// Build a command from its keyword and argument tokens
    ///
    /// Returns `Ok(None)` for keywords this tool does not know; such lines
    /// are inert.
    ///
    /// # Errors
    ///
    /// The keyword's arity error when the token count is wrong.
    pub fn parse(keyword: &str, tokens: Vec<String>) -> Result<Option<Self>, TaxonomyError> {
        let command = match keyword {
            "ecoadd" => {
                let [name] = exactly::<1>(tokens, TaxonomyError::EcoAddRequiresOneParameter)?;
                Self::EcoAdd { name }
            }
            "repadd" => {
                let mut tokens = tokens.into_iter();
                let (Some(eco), Some(url)) = (tokens.next(), tokens.next()) else {
                    return Err(TaxonomyError::RepAddRequiresAtLeastTwoParameters);
                };
                Self::RepAdd { eco, url, tags: tokens.collect() }
            }
            "ecocon" => {
                let [parent, child] = exactly::<2>(tokens, TaxonomyError::EcoConRequiresExactlyTwoParameters)?;
                Self::EcoCon { parent, child }
            }
            "ecodis" => {
                let [parent, child] = exactly::<2>(tokens, TaxonomyError::EcoDisRequiresExactlyTwoParameters)?;
                Self::EcoDis { parent, child }
            }
            "ecorem" => {
                let [name] = exactly::<1>(tokens, TaxonomyError::EcoRemRequiresOneParameter)?;
                Self::EcoRem { name }
            }
            "repmov" => {
                let [src, dst] = exactly::<2>(tokens, TaxonomyError::RepMovRequiresExactlyTwoParameters)?;
                Self::RepMov { src, dst }
            }
            "ecomov" => {
                let [src, dst] = exactly::<2>(tokens, TaxonomyError::EcoMovRequiresExactlyTwoParameters)?;
                Self::EcoMov { src, dst }
            }
            "reprem" => {
                let [eco, url] = exactly::<2>(tokens, TaxonomyError::RepRemRequiresExactlyTwoParameters)?;
                Self::RepRem { eco, url }
            }
            _ => return Ok(None),
        };
        Ok(Some(command))
    }

    /// The keyword this command is written with
    #[must_use]
    pub fn keyword(&self) -> &'static str {
        match self {
            Self::EcoAdd { .. } => "ecoadd",
            Self::RepAdd { .. } => "repadd",
            Self::EcoCon { .. } => "ecocon",
            Self::EcoDis { .. } => "ecodis",
            Self::EcoRem { .. } => "ecorem",
            Self::RepMov { .. } => "repmov",
            Self::EcoMov { .. } => "ecomov",
            Self::RepRem { .. } => "reprem",
        }
    }

    /// Apply this command to the taxonomy
    ///
    /// # Errors
    ///
    /// Whatever referential or structural error the mutation raises.
    pub fn apply(&self, taxonomy: &mut Taxonomy) -> Result<(), TaxonomyError> {
        match self {
            Self::EcoAdd { name } => {
                taxonomy.add_eco(name);
                Ok(())
            }
            Self::RepAdd { eco, url, tags } => taxonomy.add_repo(eco, url, tags.as_slice()).map(|_| ()),
            Self::EcoCon { parent, child } => taxonomy.connect_eco(parent, child),
            Self::EcoDis { parent, child } => taxonomy.disconnect_eco(parent, child),
            Self::EcoRem { name } => taxonomy.remove_eco(name),
            Self::RepMov { src, dst } => taxonomy.move_repo(src, dst),
            Self::EcoMov { src, dst } => taxonomy.move_eco(src, dst),
            Self::RepRem { eco, url } => taxonomy.remove_repo(eco, url),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn toks(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| (*s).to_owned()).collect()
    }

    #[test]
    fn test_parse_each_keyword() {
        assert_eq!(
            Command::parse("ecoadd", toks(&["Bitcoin"])).unwrap(),
            Some(Command::EcoAdd { name: "Bitcoin".into() })
        );
        assert_eq!(
            Command::parse("ecocon", toks(&["Bitcoin", "Lightning"])).unwrap(),
            Some(Command::EcoCon { parent: "Bitcoin".into(), child: "Lightning".into() })
        );
        assert_eq!(
            Command::parse("reprem", toks(&["Bitcoin", "https://x"])).unwrap(),
            Some(Command::RepRem { eco: "Bitcoin".into(), url: "https://x".into() })
        );
    }

    #[test]
    fn test_repadd_collects_trailing_tags() {
        let cmd = Command::parse("repadd", toks(&["Bitcoin", "https://x", "#protocol", "#wallet"]))
            .unwrap()
            .unwrap();
        assert_eq!(
            cmd,
            Command::RepAdd {
                eco: "Bitcoin".into(),
                url: "https://x".into(),
                tags: toks(&["#protocol", "#wallet"]),
            }
        );
        assert_eq!(cmd.keyword(), "repadd");
    }

    #[test]
    fn test_arity_errors_are_per_keyword() {
        let cases = [
            ("ecoadd", vec![], TaxonomyError::EcoAddRequiresOneParameter),
            ("ecoadd", toks(&["a", "b"]), TaxonomyError::EcoAddRequiresOneParameter),
            ("repadd", toks(&["OnlyOneArg"]), TaxonomyError::RepAddRequiresAtLeastTwoParameters),
            ("ecocon", toks(&["a"]), TaxonomyError::EcoConRequiresExactlyTwoParameters),
            ("ecodis", toks(&["a", "b", "c"]), TaxonomyError::EcoDisRequiresExactlyTwoParameters),
            ("ecorem", vec![], TaxonomyError::EcoRemRequiresOneParameter),
            ("repmov", toks(&["a"]), TaxonomyError::RepMovRequiresExactlyTwoParameters),
            ("ecomov", toks(&["a"]), TaxonomyError::EcoMovRequiresExactlyTwoParameters),
            ("reprem", toks(&["a"]), TaxonomyError::RepRemRequiresExactlyTwoParameters),
        ];
        for (keyword, tokens, expected) in cases {
            assert_eq!(Command::parse(keyword, tokens), Err(expected), "{keyword}");
        }
    }

    #[test]
    fn test_unknown_keyword_is_inert() {
        assert_eq!(Command::parse("foobar", toks(&["x"])).unwrap(), None);
        assert_eq!(Command::parse("ECOADD", toks(&["x"])).unwrap(), None);
    }

    #[test]
    fn test_apply_dispatches() {
        let mut tax = Taxonomy::new();
        Command::EcoAdd { name: "A".into() }.apply(&mut tax).unwrap();
        Command::RepAdd { eco: "A".into(), url: "https://x".into(), tags: vec![] }
            .apply(&mut tax)
            .unwrap();
        let err = Command::EcoCon { parent: "A".into(), child: "B".into() }
            .apply(&mut tax)
            .unwrap_err();
        assert_eq!(err, TaxonomyError::InvalidChildEcosystem("B".into()));
        assert_eq!(tax.stats().repo_count, 1);
    }
}
