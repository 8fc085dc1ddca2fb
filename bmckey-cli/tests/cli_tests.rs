use bmckey_cli::{log_level, run, BinaryCommand, Cli, Command};
use bmckey_net::Oui;
use clap::Parser;
use pretty_assertions::assert_eq;
use tracing::Level;

const OOB_MAC: &str = "3c:ec:ef:12:34:56";
const BINARY_KEY: &str = "AAYAAAAAAAAAAAAAAAAAAExLCU/N0RxxvG7ZACnE9iyfm1zRK6acy5rtKA01mFtnuCkFSJQtmsmoAN7KVyfxVbUpwPvJNKc2tkQbezXSbITnPSKnp8i9uG+C8DB+9oISsuTL8L0v07TOOsAnrSq4fR4mAhwANTYsmoLYmpqhVDLH/VVisfqVFSZu72vTDf2rjYESalQNawzIH8qjEhS2dzDUTm4RWf122JiPTSccbg2V8b4XXLRSefvc4ctVmCVvmrWRX+Aosgn9z0VS5V1ABhitiDjBd4NK34wOoGtn0vTwdiAfjMH95U5Q+c4hCjWsUnTrlUrdH5OQgtCDGi7Nag==";
const JSON_LICENSE: &str = r#"{"ProductKey":{"Node":{"LicenseID":"1","LicenseName":"SFT-OOB-LIC","CreateDate":"20200921"},"Signature":"OAaLKLy5IEK9WnIdnyA9ew89qTKQrm1eu+Q84CbwjR7XG7JGYccec+3vS3y/kQRRej3DcNVQPWsasX86ROTT+LZFsNY2mIEbQ6+Y/Tmv6+jwYgbQjEN6CjI7ahyKcebN12+3cLvPZyRf3kDqgtcpfuw3Qeg8BbhhyHQk29yNp+NG0XbKn02sHTrskvAGgG0GGlDCT5YmNa0gDSMzsvt/eH9nskb5opQNE3j7MAMXbjpI7xVHRbmB2N5iSu8gQUj0/pmk615ztM/uB54ur3GninJRU74S9Kotz+JunJg4pprGyQW544ggmzklmtr3zCA3GK/d929eZsVk5p8UxXG7wQ=="}}"#;

fn run_args(args: &[&str]) -> anyhow::Result<String> {
    let cli = Cli::try_parse_from(std::iter::once("bmckey").chain(args.iter().copied()))?;
    run(&cli)
}

// ── Global options ───────────────────────────────────────────────

#[test]
fn verbosity_maps_to_levels() {
    assert_eq!(log_level(0), Level::WARN);
    assert_eq!(log_level(1), Level::INFO);
    assert_eq!(log_level(2), Level::DEBUG);
    assert_eq!(log_level(9), Level::TRACE);

    let cli = Cli::try_parse_from(["bmckey", "-vv", "oob", "encode", OOB_MAC]).unwrap();
    assert_eq!(cli.verbose, 2);
}

#[test]
fn search_flags_shape_options() {
    let cli = Cli::try_parse_from([
        "bmckey", "--workers", "3", "--oui", "3c:ec:ef", "--oui", "002590", "oob", "bruteforce",
        "CE27-F641-9B04-6B24-5D04-5D32",
    ])
    .unwrap();
    let options = cli.search_options();
    assert_eq!(options.workers, 3);
    assert_eq!(
        options.blocks,
        vec![Oui::new([0x3c, 0xec, 0xef]), Oui::new([0x00, 0x25, 0x90])]
    );
}

#[test]
fn global_flags_accepted_after_subcommand() {
    let cli = Cli::try_parse_from(["bmckey", "oob", "encode", OOB_MAC, "-v", "--workers", "2"])
        .unwrap();
    assert_eq!(cli.verbose, 1);
    assert_eq!(cli.workers, Some(2));
}

#[test]
fn invalid_mac_is_a_usage_error() {
    assert!(Cli::try_parse_from(["bmckey", "oob", "encode", "not-a-mac"]).is_err());
}

// ── OOB ──────────────────────────────────────────────────────────

#[test]
fn oob_encode_prints_key() {
    assert_eq!(run_args(&["oob", "encode", OOB_MAC]).unwrap(), "CE27-F641-9B04-6B24-5D04-5D32");
}

#[test]
fn oob_bruteforce_in_one_block() {
    let out = run_args(&[
        "--oui", "3cecef", "--workers", "2", "oob", "bruteforce", "CE27F6419B046B245D045D32",
    ])
    .unwrap();
    assert_eq!(out, "found match! mac = '3cecef123456'");
}

// ── JSON ─────────────────────────────────────────────────────────

#[test]
fn json_verify_ok() {
    let out = run_args(&["json", "verify", "AC1F6B3DDAEC", JSON_LICENSE]).unwrap();
    assert_eq!(out, "signature verified ok");
}

#[test]
fn json_verify_wrong_mac_fails_with_context() {
    let err = run_args(&["json", "verify", "AC1F6B3DDAED", JSON_LICENSE]).unwrap_err();
    assert_eq!(err.to_string(), "product key verification failed");
    assert_eq!(err.root_cause().to_string(), "license verification failed");
}

#[test]
fn json_list_ids() {
    let out = run_args(&["json", "listswid"]).unwrap();
    let lines: Vec<&str> = out.lines().collect();
    assert_eq!(lines.len(), 7);
    assert!(lines[0].starts_with("License SKU"));
    assert!(lines[2].starts_with("SFT-OOB-LIC"));
    assert!(lines[6].ends_with('5'));
}

// ── Binary ───────────────────────────────────────────────────────

#[test]
fn binary_encode_all_key() {
    let out = run_args(&[
        "binary",
        "encode",
        "--sku",
        "SFT-DCMS-SINGLE",
        "--creation-date",
        "2000-01-01T00:00:00Z",
        "3cecef123456",
    ])
    .unwrap();
    assert_eq!(out, BINARY_KEY);
}

#[test]
fn binary_encode_defaults_to_reserved() {
    let encoded = run_args(&["binary", "encode", "3cecef123456"]).unwrap();
    let out = run_args(&["binary", "decode", "3cecef123456", &encoded]).unwrap();
    let value: serde_json::Value = serde_json::from_str(&out).unwrap();
    assert_eq!(value["software_identifier"]["display_name"], "Reserved");
    assert_eq!(value["software_identifier"]["id"], 0);
    assert_eq!(value["invoice_number"], "none");
    assert_eq!(value["expiration_date"], "1970-01-01T00:00:00Z");
}

#[test]
fn nonjson_alias_and_explicit_fields() {
    let out = run_args(&[
        "nonjson",
        "encode",
        "--id",
        "D2",
        "--software-version",
        "1.2",
        "--invoice-number",
        "INV-42",
        "--creation-date",
        "2024-03-01T00:00:00Z",
        "--expiration-date",
        "2025-03-01T00:00:00Z",
        "--property",
        "01ee",
        "ac:1f:6b:3d:da:ec",
    ])
    .unwrap();

    let by_sku = run_args(&[
        "binary",
        "encode",
        "--sku",
        "SFT-SDDC-SINGLE",
        "--software-version",
        "1.2",
        "--invoice-number",
        "INV-42",
        "--creation-date",
        "2024-03-01T01:00:00+01:00",
        "--expiration-date",
        "2025-03-01T00:00:00Z",
        "--property",
        "01EE",
        "ac1f6b3ddaec",
    ])
    .unwrap();
    assert_eq!(out, by_sku);
}

#[test]
fn binary_encode_rejects_two_identifier_selectors() {
    let parsed = Cli::try_parse_from([
        "bmckey", "binary", "encode", "--sku", "SFT-SUM-LIC", "--id", "3", OOB_MAC,
    ]);
    assert!(parsed.is_err());
}

#[test]
fn binary_encode_rejects_unknown_identifier() {
    assert!(run_args(&["binary", "encode", "--display-name", "NOPE", OOB_MAC]).is_err());
    assert!(run_args(&["binary", "encode", "--id", "0B", OOB_MAC]).is_err());
}

#[test]
fn binary_encode_rejects_bad_property() {
    let err = run_args(&["binary", "encode", "--property", "xyz", OOB_MAC]).unwrap_err();
    assert!(err.to_string().contains("not hex"));
}

#[test]
fn binary_decode_prints_json() {
    let out = run_args(&["binary", "decode", "3cecef123456", BINARY_KEY]).unwrap();
    let value: serde_json::Value = serde_json::from_str(&out).unwrap();
    assert_eq!(value["software_identifier"]["display_name"], "ALL");
    assert_eq!(value["software_version"], "none");
    assert_eq!(value["secret_data"], "76aa41c893a4e32a34203d8d47b0faab");
    assert_eq!(value["checksum"], 0xab);
}

#[test]
fn binary_decode_wrong_mac_fails() {
    let err = run_args(&["binary", "decode", "3cecef123457", BINARY_KEY]).unwrap_err();
    assert_eq!(err.to_string(), "failed to decode product key");
}

#[test]
fn binary_list_ids_parses_both_names() {
    let cli = Cli::try_parse_from(["bmckey", "binary", "list-ids"]).unwrap();
    assert!(matches!(cli.command, Command::Binary(BinaryCommand::ListIds)));

    let out = run_args(&["binary", "listswid"]).unwrap();
    assert_eq!(out.lines().count(), 13);
    assert!(out
        .lines()
        .any(|l| l.split_whitespace().eq(["SFT-SDDC-SINGLE", "SFT-SDDC-SINGLE", "210"])));
    assert!(out.lines().any(|l| l.trim_start().starts_with("Reserved")));
}
