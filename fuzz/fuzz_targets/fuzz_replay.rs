// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
#![no_main]

use crypto_ecosystems::export::records;
use crypto_ecosystems::graph::Taxonomy;
use crypto_ecosystems::migrations;
use libfuzzer_sys::fuzz_target;
use std::path::Path;

fuzz_target!(|data: &str| {
    let mut taxonomy = Taxonomy::new();
    let errors = migrations::replay_source(&mut taxonomy, data, Path::new("fuzz"));
    for error in &errors {
        assert!(error.line >= 1);
    }
    // Cycles are reported, never looped on
    let _ = records(&taxonomy, None);
});
