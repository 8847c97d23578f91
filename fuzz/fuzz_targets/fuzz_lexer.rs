// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
#![no_main]

use crypto_ecosystems::lexer;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &str| {
    if let Ok(tokens) = lexer::split(data) {
        assert!(tokens.len() <= data.chars().count());
    }
});
