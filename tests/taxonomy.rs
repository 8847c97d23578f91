// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//! Replay scenarios over real migration directories

use crypto_ecosystems::error::{LoadError, TaxonomyError};
use crypto_ecosystems::export::{export_jsonl, records};
use crypto_ecosystems::graph::Taxonomy;
use crypto_ecosystems::migrations;
use std::fs;
use tempfile::TempDir;

// =============================================================================
// Test Helpers
// =============================================================================

/// Write migration files into a fresh directory
fn migrations_dir(files: &[(&str, &str)]) -> TempDir {
    let dir = TempDir::new().unwrap();
    for (name, body) in files {
        fs::write(dir.path().join(name), body).unwrap();
    }
    dir
}

fn load(files: &[(&str, &str)]) -> Taxonomy {
    let dir = migrations_dir(files);
    migrations::load(dir.path(), None).unwrap()
}

fn repo_urls(tax: &Taxonomy, eco: &str) -> Vec<String> {
    let id = tax.eco_id(eco).unwrap();
    let mut urls: Vec<String> = tax
        .repos_of(id)
        .into_iter()
        .flatten()
        .map(|&r| tax.repo_url(r).unwrap().to_owned())
        .collect();
    urls.sort();
    urls
}

fn child_names(tax: &Taxonomy, eco: &str) -> Vec<String> {
    let id = tax.eco_id(eco).unwrap();
    let mut names: Vec<String> = tax
        .children_of(id)
        .into_iter()
        .flatten()
        .map(|&c| tax.eco_name(c).unwrap().to_owned())
        .collect();
    names.sort();
    names
}

// =============================================================================
// Replay
// =============================================================================

#[test]
fn test_load_single_ecosystem() {
    let tax = load(&[(
        "2009-01-03T181505_bitcoin.txt",
        "# Genesis\n\
         ecoadd Bitcoin\n\
         repadd Bitcoin https://github.com/bitcoin/bitcoin #protocol\n\
         repadd Bitcoin https://github.com/bitcoin/bips\n\
         repadd Bitcoin https://github.com/bitcoin-core/gui #protocol\n",
    )]);

    let stats = tax.stats();
    assert_eq!(stats.migration_count, 1);
    assert_eq!(stats.eco_count, 1);
    assert_eq!(stats.repo_count, 3);
    assert_eq!(stats.tag_count, 1);
    assert_eq!(repo_urls(&tax, "Bitcoin").len(), 3);
}

#[test]
fn test_time_ordering() {
    // Created newest first so listing order disagrees with replay order
    let tax = load(&[
        (
            "2021-06-01T000000_add_parity.txt",
            "repadd Ethereum https://github.com/openethereum/parity-ethereum\n",
        ),
        (
            "2020-01-01T000000_rename.txt",
            "repmov https://github.com/ethereum/cpp-ethereum https://github.com/ethereum/aleth\n",
        ),
        (
            "2015-07-30T153000_ethereum.txt",
            "ecoadd Ethereum\nrepadd Ethereum https://github.com/ethereum/cpp-ethereum\n",
        ),
    ]);

    let stats = tax.stats();
    assert_eq!(stats.migration_count, 3);
    assert_eq!(stats.eco_count, 1);
    assert_eq!(stats.repo_count, 2);
    assert_eq!(
        repo_urls(&tax, "Ethereum"),
        [
            "https://github.com/ethereum/aleth",
            "https://github.com/openethereum/parity-ethereum"
        ]
    );
}

#[test]
fn test_ecosystem_disconnect() {
    let tax = load(&[
        (
            "2021-01-01T000000_setup.txt",
            "ecoadd Polygon\necoadd Solana\necoadd DeGods\necoadd y00ts\necoadd \"Magic Eden\"\n\
             ecocon Polygon DeGods\necocon Polygon y00ts\necocon Solana DeGods\n\
             repadd DeGods https://github.com/degods/contracts\n",
        ),
        (
            "2023-03-29T000000_bridge.txt",
            "ecodis Polygon y00ts\necodis Solana DeGods\n",
        ),
    ]);

    let stats = tax.stats();
    assert_eq!(stats.migration_count, 2);
    assert_eq!(stats.eco_count, 5);
    assert_eq!(stats.repo_count, 1);
    assert_eq!(child_names(&tax, "Polygon"), ["DeGods"]);
    assert!(child_names(&tax, "Solana").is_empty());
}

#[test]
fn test_ecosystem_rename() {
    let tax = load(&[(
        "2022-11-09T000000_multiversx.txt",
        "ecoadd Elrond\necoadd \"Elrond Wallets\"\n\
         ecocon Elrond \"Elrond Wallets\"\n\
         repadd Elrond https://github.com/multiversx/mx-chain-go\n\
         repadd \"Elrond Wallets\" https://github.com/multiversx/mx-wallet\n\
         ecomov Elrond MultiversX\n",
    )]);

    let stats = tax.stats();
    assert_eq!(stats.eco_count, 2);
    assert_eq!(stats.repo_count, 2);
    assert!(tax.eco_id("Elrond").is_none());
    assert_eq!(child_names(&tax, "MultiversX"), ["Elrond Wallets"]);
}

#[test]
fn test_repo_removals() {
    let tax = load(&[
        (
            "2020-01-01T000000_setup.txt",
            "ecoadd Ethereum\necoadd Polygon\n\
             repadd Ethereum https://github.com/ethereum/go-ethereum #client\n\
             repadd Ethereum https://github.com/ethereum/solidity\n\
             repadd Ethereum https://github.com/ethereum/remix\n\
             repadd Polygon https://github.com/maticnetwork/bor\n\
             repadd Polygon https://github.com/maticnetwork/heimdall\n\
             repadd Polygon https://github.com/maticnetwork/contracts\n",
        ),
        (
            "2020-06-01T000000_cleanup.txt",
            "reprem Ethereum https://github.com/ethereum/solidity\n\
             reprem Ethereum https://github.com/ethereum/remix\n",
        ),
    ]);

    let stats = tax.stats();
    assert_eq!(stats.eco_count, 2);
    // detaching never forgets the repository itself
    assert_eq!(stats.repo_count, 6);
    assert_eq!(repo_urls(&tax, "Ethereum"), ["https://github.com/ethereum/go-ethereum"]);
}

#[test]
fn test_repo_rename_with_existing_destination() {
    let tax = load(&[(
        "2014-04-18T000000_monero.txt",
        "ecoadd Monero\necoadd Aeon\n\
         repadd Monero https://github.com/monero-project/bitmonero\n\
         repadd Monero https://github.com/monero-project/monero-gui\n\
         repadd Aeon https://github.com/monero-project/bitmonero\n\
         repadd Monero https://github.com/monero-project/monero\n\
         repmov https://github.com/monero-project/bitmonero https://github.com/monero-project/monero\n",
    )]);

    let stats = tax.stats();
    assert_eq!(stats.eco_count, 2);
    assert_eq!(stats.repo_count, 2);
    assert!(tax.repo_id("https://github.com/monero-project/bitmonero").is_none());
    assert_eq!(repo_urls(&tax, "Monero").len(), 2);
    assert_eq!(repo_urls(&tax, "Aeon"), ["https://github.com/monero-project/monero"]);
}

#[test]
fn test_ecosystem_removal() {
    let tax = load(&[(
        "2023-02-01T000000_magic_eden.txt",
        "ecoadd Bitcoin\necoadd Solana\necoadd \"Magic Eden\"\n\
         ecoadd \"Magic Eden Wallet\"\necoadd Ordinals\necoadd Lightning\n\
         ecocon Bitcoin \"Magic Eden\"\necocon \"Magic Eden\" \"Magic Eden Wallet\"\n\
         repadd \"Magic Eden\" https://github.com/magiceden/sdk\n\
         repadd \"Magic Eden Wallet\" https://github.com/magiceden/wallet\n\
         ecorem \"Magic Eden\"\n",
    )]);

    let stats = tax.stats();
    assert_eq!(stats.eco_count, 5);
    assert_eq!(stats.repo_count, 2);
    assert!(tax.eco_id("Magic Eden").is_none());
    assert!(child_names(&tax, "Bitcoin").is_empty());
    let wallet = tax.eco_id("Magic Eden Wallet").unwrap();
    assert!(tax.parents_of(wallet).is_none());
}

#[test]
fn test_date_filtering() {
    let dir = migrations_dir(&[
        ("2009-01-03T000000_bitcoin.txt", "ecoadd Bitcoin\n"),
        ("2012-06-01T000000_ethereum.txt", "ecoadd Ethereum\n"),
        ("2015-07-30T000000_polygon.txt", "ecoadd Polygon\n"),
        ("2020-01-01T000000_solana.txt", "ecoadd Solana\n"),
    ]);

    for (cutoff, expected) in [("2011", 1), ("2013", 2), ("2015-08-01", 3), ("2099", 4)] {
        let stats = migrations::load(dir.path(), Some(cutoff)).unwrap().stats();
        assert_eq!(stats.migration_count, expected, "cutoff {cutoff}");
        assert_eq!(stats.eco_count, expected, "cutoff {cutoff}");
    }
}

// =============================================================================
// Error Aggregation
// =============================================================================

#[test]
fn test_errors_are_collected_across_files() {
    let dir = migrations_dir(&[
        (
            "2020-01-01T000000_first.txt",
            "ecoadd Bitcoin\nrepadd OnlyOneArg\necoadd Ethereum\n",
        ),
        (
            "2020-01-02T000000_second.txt",
            "\n# comment\necocon Bitcoin Nowhere\necoadd 'Broken\n",
        ),
    ]);

    let Err(LoadError::ValidationFailed { errors }) = migrations::load(dir.path(), None) else {
        panic!("expected validation failure");
    };

    assert_eq!(errors.len(), 3);
    assert_eq!(errors[0].error, TaxonomyError::RepAddRequiresAtLeastTwoParameters);
    assert_eq!(errors[0].line, 2);
    assert!(errors[0].path.ends_with("2020-01-01T000000_first.txt"));

    assert_eq!(errors[1].error, TaxonomyError::InvalidChildEcosystem("Nowhere".into()));
    assert_eq!(errors[1].line, 3);
    assert!(errors[1].path.ends_with("2020-01-02T000000_second.txt"));

    assert_eq!(errors[2].error, TaxonomyError::UnterminatedQuote);
    assert_eq!(errors[2].line, 4);
}

#[test]
fn test_scenario_d_report_format() {
    let dir = migrations_dir(&[("2024-01-16T020000_bad.txt", "ecoadd X\nrepadd OnlyOneArg\n")]);
    let Err(LoadError::ValidationFailed { errors }) = migrations::load(dir.path(), None) else {
        panic!("expected validation failure");
    };
    let report = errors[0].to_string();
    assert!(report.ends_with(
        "2024-01-16T020000_bad.txt:2: error.RepAddRequiresAtLeastTwoParameters: repadd requires at least two parameters"
    ));
}

#[test]
fn test_untimestamped_files_are_ignored() {
    let dir = migrations_dir(&[
        ("2020-01-01T000000_ok.txt", "ecoadd Bitcoin\n"),
        ("invalid-name.txt", "this is not a migration\nrepadd OnlyOneArg\n"),
        ("2023-02-29T000000_not_a_day.txt", "ecoadd Ghost\n"),
    ]);
    let stats = migrations::load(dir.path(), None).unwrap().stats();
    assert_eq!(stats.migration_count, 1);
    assert_eq!(stats.eco_count, 1);
}

// =============================================================================
// Export
// =============================================================================

#[test]
fn test_scenario_a_nested_export() {
    let tax = load(&[
        (
            "2009-01-03T000000_bitcoin.txt",
            "ecoadd Bitcoin\nrepadd Bitcoin https://github.com/bitcoin/bitcoin #protocol\n",
        ),
        (
            "2018-01-01T000000_lightning.txt",
            "ecoadd Lightning\nrepadd Lightning https://github.com/lightningnetwork/lnd\necocon Bitcoin Lightning\n",
        ),
    ]);

    let mut out = Vec::new();
    let rows = export_jsonl(&tax, Some("Bitcoin"), &mut out).unwrap();
    assert_eq!(rows, 2);
    assert_eq!(
        String::from_utf8(out).unwrap(),
        concat!(
            r##"{"eco_name":"Bitcoin","branch":[],"repo_url":"https://github.com/bitcoin/bitcoin","tags":["#protocol"]}"##,
            "\n",
            r##"{"eco_name":"Bitcoin","branch":["Lightning"],"repo_url":"https://github.com/lightningnetwork/lnd","tags":[]}"##,
            "\n",
        )
    );
}

#[test]
fn test_export_shared_sub_ecosystem_once_per_root() {
    let tax = load(&[(
        "2020-01-01T000000_shared.txt",
        "ecoadd Ethereum\necoadd Polygon\necoadd Uniswap\n\
         ecocon Ethereum Uniswap\necocon Polygon Uniswap\n\
         repadd Uniswap https://github.com/Uniswap/v3-core\n",
    )]);

    let rows = records(&tax, None).unwrap();
    let seen: Vec<(&str, Vec<&str>)> = rows.iter().map(|r| (r.eco_name, r.branch.clone())).collect();
    assert_eq!(
        seen,
        [
            ("Ethereum", vec!["Uniswap"]),
            ("Polygon", vec!["Uniswap"]),
            ("Uniswap", vec![]),
        ]
    );
}

#[test]
fn test_export_after_merge_keeps_tags() {
    let tax = load(&[(
        "2020-01-01T000000_merge.txt",
        "ecoadd Monero\n\
         repadd Monero https://old/a #wallet\n\
         repadd Monero https://new/a #node\n\
         repmov https://old/a https://new/a\n",
    )]);

    let rows = records(&tax, Some("Monero")).unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].repo_url, "https://new/a");
    assert_eq!(rows[0].tags, ["#node", "#wallet"]);
}
