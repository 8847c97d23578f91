// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//! Shell-like tokenizer for migration command arguments
//!
//! - whitespace separates tokens
//! - `'` or `"` at the start of a token opens a quoted token that runs to
//!   the next unescaped matching quote; the quotes are dropped
//! - `\` escapes the next character, inside or outside quotes; the
//!   backslash is dropped and the character kept as-is
//! - a trailing `\` with nothing after it is kept literally

use crate::error::TaxonomyError;

/// Split a command's argument string into tokens
///
/// # Errors
///
/// Returns [`TaxonomyError::UnterminatedQuote`] when a quoted token runs to
/// the end of input without its closing quote.
pub fn split(input: &str) -> Result<Vec<String>, TaxonomyError> {
    let mut tokens = Vec::new();
    let mut chars = input.chars().peekable();

    loop {
        while chars.next_if(|c| c.is_whitespace()).is_some() {}

        let Some(&first) = chars.peek() else {
            break;
        };

        let mut token = String::new();

        if first == '"' || first == '\'' {
            chars.next();
            let mut closed = false;
            while let Some(c) = chars.next() {
                if c == first {
                    closed = true;
                    break;
                }
                if c == '\\' {
                    if let Some(escaped) = chars.next() {
                        token.push(escaped);
                        continue;
                    }
                }
                token.push(c);
            }
            if !closed {
                return Err(TaxonomyError::UnterminatedQuote);
            }
        } else {
            while let Some(c) = chars.next_if(|c| !c.is_whitespace()) {
                if c == '\\' {
                    if let Some(escaped) = chars.next() {
                        token.push(escaped);
                        continue;
                    }
                }
                token.push(c);
            }
        }

        tokens.push(token);
    }

    Ok(tokens)
}
