// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell

use anyhow::Result;
use clap_complete::Shell;

/// Write a completion script for `shell` to stdout
pub fn run(shell: Shell, cli: &mut clap::Command) -> Result<()> {
    let name = cli.get_name().to_string();
    clap_complete::generate(shell, cli, name, &mut std::io::stdout());
    Ok(())
}
