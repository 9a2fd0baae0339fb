mod common;

use std::path::PathBuf;

use bulkdns::cli::{Cli, Command, parse_domains, read_domains, run_with};
use bulkdns::error::BulkError;
use bulkdns::gateway::ProviderError;
use bulkdns::{ErrorPolicy, Operation};
use clap::Parser;
use common::{MockGateway, numbered_records, record};

fn lines(bytes: &[u8]) -> Vec<String> {
    String::from_utf8_lossy(bytes)
        .lines()
        .map(String::from)
        .collect()
}

fn domains(list: &[&str]) -> Vec<String> {
    list.iter().map(|d| (*d).to_string()).collect()
}

#[test]
fn parse_domains_skips_blank_and_comment_lines() {
    let content = "example.com\n\n  # staging\n  example.org  \r\nexample.net";

    assert_eq!(
        parse_domains(content),
        vec!["example.com", "example.org", "example.net"]
    );
}

#[test]
fn read_domains_from_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("domains.txt");
    std::fs::write(&path, "example.com\nexample.org\n").unwrap();

    assert_eq!(
        read_domains(&path).unwrap(),
        vec!["example.com", "example.org"]
    );
}

#[test]
fn read_domains_missing_file() {
    let err = read_domains(&PathBuf::from("/nonexistent/domains.txt")).unwrap_err();

    assert!(matches!(err, BulkError::FileNotFound(_)));
}

#[test]
fn parse_add_records_command() {
    let cli = Cli::try_parse_from([
        "bulkdns",
        "add-records",
        "--type",
        "TXT",
        "--name",
        "foo",
        "--content",
        "bar",
        "domains.txt",
        "--strict",
        "--page-size",
        "50",
    ])
    .unwrap();

    assert_eq!(
        cli.command,
        Command::AddRecords {
            record_type: "TXT".into(),
            name: "foo".into(),
            content: "bar".into(),
            domains: PathBuf::from("domains.txt"),
        }
    );
    assert_eq!(cli.policy(), ErrorPolicy::Strict);
    assert_eq!(cli.page_size.get(), 50);
    assert_eq!(cli.command.operation(), Operation::AddRecords);
}

#[test]
fn parse_defaults() {
    let cli = Cli::try_parse_from(["bulkdns", "list-records", "domains.txt"]).unwrap();

    assert_eq!(cli.page_size.get(), 20);
    assert_eq!(cli.policy(), ErrorPolicy::Report);
    assert_eq!(cli.timeout, 30);
    assert_eq!(cli.log_level, "warn");
    assert_eq!(cli.command.domains_file(), PathBuf::from("domains.txt"));
}

#[test]
fn parse_add_records_name_defaults_to_apex() {
    let cli = Cli::try_parse_from([
        "bulkdns",
        "add-records",
        "--type",
        "A",
        "--content",
        "192.0.2.1",
        "domains.txt",
    ])
    .unwrap();

    assert!(matches!(cli.command, Command::AddRecords { ref name, .. } if name.is_empty()));
}

#[test]
fn parse_rejects_zero_page_size() {
    let result = Cli::try_parse_from(["bulkdns", "--page-size", "0", "list-records", "d.txt"]);

    assert!(result.is_err());
}

#[test]
fn parse_edit_requires_old_content() {
    let result = Cli::try_parse_from([
        "bulkdns",
        "edit-records",
        "--type",
        "TXT",
        "--new-content",
        "baz",
        "domains.txt",
    ]);

    assert!(result.is_err());
}

#[test]
fn output_path_explicit_and_default() {
    let cli = Cli::try_parse_from([
        "bulkdns",
        "delete-domains",
        "domains.txt",
        "--output",
        "out.csv",
    ])
    .unwrap();
    assert_eq!(cli.output_path(), PathBuf::from("out.csv"));

    let cli = Cli::try_parse_from(["bulkdns", "delete-domains", "domains.txt"]).unwrap();
    let path = cli.output_path().display().to_string();
    assert!(path.starts_with("delete-domains-"));
    assert!(path.ends_with(".csv"));
}

#[test]
fn run_edit_records_end_to_end() {
    let mut records = numbered_records(20, "example.com");
    records.push(record("R345", "TXT", "foo.example.com", "bar"));
    let gw = MockGateway::with_zone("example.com").records(records);
    let cli = Cli::try_parse_from([
        "bulkdns",
        "edit-records",
        "--type",
        "TXT",
        "--name",
        "foo",
        "--old-content",
        "bar",
        "--new-content",
        "new bar",
        "domains.txt",
    ])
    .unwrap();

    let (csv, console) = run_with(
        &cli,
        &gw,
        &domains(&["example.com", "example.org"]),
        Vec::new(),
        Vec::new(),
    )
    .unwrap();

    assert_eq!(
        lines(&csv),
        vec![
            "zone name,status,record id",
            "example.com,edited,R345",
            "example.org,failed: zone not found: example.org,",
        ]
    );
    assert_eq!(
        lines(&console),
        vec![
            "edited [1]: example.com R345",
            "failed [2]: example.org: zone not found: example.org",
        ]
    );
    assert_eq!(gw.pages_requested(), vec![1, 2]);
}

#[test]
fn run_delete_all_records_numbers_every_record() {
    let gw = MockGateway::with_zone("example.com").records(numbered_records(3, "example.com"));
    let cli = Cli::try_parse_from(["bulkdns", "delete-all-records", "domains.txt"]).unwrap();

    let (csv, _) = run_with(&cli, &gw, &domains(&["example.com"]), Vec::new(), Vec::new()).unwrap();

    assert_eq!(
        lines(&csv),
        vec![
            "zone name,record id,status",
            "example.com,DNS RECORD ID 1,deleted",
            "example.com,DNS RECORD ID 2,deleted",
            "example.com,DNS RECORD ID 3,deleted",
        ]
    );
}

#[test]
fn run_add_domains_reports_existing_zone() {
    let gw = MockGateway {
        create_zone_error: Some(ProviderError::new(
            Some(1061),
            "example.com already exists",
        )),
        ..MockGateway::default()
    };
    let cli = Cli::try_parse_from(["bulkdns", "add-domains", "domains.txt", "--strict"]).unwrap();

    let (csv, _) = run_with(&cli, &gw, &domains(&["example.com"]), Vec::new(), Vec::new()).unwrap();

    assert_eq!(
        lines(&csv)[1],
        "example.com,failed: zone already exists: example.com already exists,,,"
    );
}

#[test]
fn run_strict_stops_at_fatal_error() {
    let gw = MockGateway {
        lookup_error: Some(ProviderError::transport("connection refused")),
        ..MockGateway::with_zone("example.com")
    };
    let cli = Cli::try_parse_from(["bulkdns", "list-records", "domains.txt", "--strict"]).unwrap();

    let err = run_with(
        &cli,
        &gw,
        &domains(&["example.com", "example.org"]),
        Vec::new(),
        Vec::new(),
    )
    .unwrap_err();

    assert!(matches!(err, BulkError::Provider(_)));
    assert_eq!(gw.calls().len(), 1);
}
