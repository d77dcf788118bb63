use super::*;
use crate::command_runner::fake::FakeRunner;
use crate::command_runner::CommandOutput;
use std::fs;
use tempfile::tempdir;

const METADATA_CMD: &str = "security find-internet-password -s aws-cli -g";
const SECRET_CMD: &str = "security find-internet-password -s aws-cli -w";
const LIST_CMD: &str = "aws s3api list-buckets --query Buckets[].Name --output text";
const BILLING_CMD: &str = "aws ce get-cost-and-usage --time-period Start=2026-10-01,End=2026-10-20 \
--granularity MONTHLY --metrics UnblendedCost --region us-east-1 --output json";

fn options(billing: bool) -> LoginOptions {
    LoginOptions {
        billing,
        today: NaiveDate::from_ymd_opt(2026, 10, 19).unwrap(),
    }
}

fn keychain_runner() -> FakeRunner {
    FakeRunner::new()
        .on(
            METADATA_CMD,
            CommandOutput::success("attributes:\n    \"acct\"<blob>=\"AKIAEXAMPLE\"\n"),
        )
        .on(SECRET_CMD, CommandOutput::success("abc123\n"))
}

fn run(runner: &FakeRunner, home: Option<&Path>, billing: bool) -> (Result<(), LoginError>, String) {
    let mut out = Vec::new();
    let result = run_login(
        runner,
        &LoginConfig::default(),
        home,
        options(billing),
        &mut out,
    );
    (result, String::from_utf8(out).unwrap())
}

#[test]
fn test_full_run_without_billing() {
    let home = tempdir().unwrap();
    let runner = keychain_runner()
        .on(LIST_CMD, CommandOutput::success("bucket-a\n"))
        .on(
            "aws s3 ls s3://bucket-a --recursive --summarize",
            CommandOutput::success("Total Objects: 1\n   Total Size: 42\n"),
        );

    let (result, output) = run(&runner, Some(home.path()), false);

    assert!(result.is_ok());
    assert_eq!(
        output,
        "Retrieving AWS credentials from Keychain...\n\
AWS Access Key ID: AKIAEXAMPLE\n\
Setting AWS CLI credentials...\n\
AWS CLI credentials set from KeyChain.\n\
\n\
==== S3 Bucket Usage (bytes) ====\n\
bucket-a: 42 bytes\n"
    );
    assert!(!runner.calls().iter().any(|c| c.contains(" ce ")));

    let written = fs::read_to_string(home.path().join(".aws/credentials")).unwrap();
    assert_eq!(
        written,
        "[default]\naws_access_key_id = AKIAEXAMPLE\naws_secret_access_key = abc123\n"
    );
}

#[test]
fn test_billing_runs_before_storage() {
    let home = tempdir().unwrap();
    let runner = keychain_runner()
        .on(
            BILLING_CMD,
            CommandOutput::success(
                r#"{"ResultsByTime":[{"Total":{"UnblendedCost":{"Amount":"12.34","Unit":"USD"}}}]}"#,
            ),
        )
        .on(LIST_CMD, CommandOutput::success(""));

    let (result, output) = run(&runner, Some(home.path()), true);

    assert!(result.is_ok());
    let billing_pos = output.find("Current month AWS cost: 12.34 USD").unwrap();
    let storage_pos = output.find("==== S3 Bucket Usage (bytes) ====").unwrap();
    assert!(output.contains("\n==== AWS Billing for Current Month ====\n"));
    assert!(billing_pos < storage_pos);
    assert_eq!(runner.calls(), vec![METADATA_CMD, SECRET_CMD, BILLING_CMD, LIST_CMD]);
}

#[test]
fn test_secret_never_printed() {
    let home = tempdir().unwrap();
    let runner = keychain_runner().on(LIST_CMD, CommandOutput::success(""));

    let (_, output) = run(&runner, Some(home.path()), false);

    assert!(!output.contains("abc123"));
}

#[test]
fn test_lookup_failure_stops_before_write() {
    let home = tempdir().unwrap();
    let runner = FakeRunner::new().on(METADATA_CMD, CommandOutput::failure(44, "not found"));

    let (result, output) = run(&runner, Some(home.path()), true);

    assert!(matches!(result, Err(LoginError::Lookup { .. })));
    assert_eq!(output, "Retrieving AWS credentials from Keychain...\n");
    assert!(!home.path().join(".aws").exists());
    assert_eq!(runner.calls(), vec![METADATA_CMD]);
}

#[test]
fn test_missing_home_is_write_failure() {
    let runner = keychain_runner();

    let (result, output) = run(&runner, None, false);

    let err = result.unwrap_err();
    assert!(matches!(err, LoginError::Io { .. }));
    assert_eq!(
        err.user_message(),
        "Error writing credentials: Could not determine home directory"
    );
    assert!(output.ends_with("Setting AWS CLI credentials...\n"));
}

#[test]
fn test_report_failures_do_not_fail_run() {
    let home = tempdir().unwrap();
    let runner = keychain_runner()
        .on(BILLING_CMD, CommandOutput::failure(254, "AccessDenied"))
        .on(LIST_CMD, CommandOutput::failure(255, "AccessDenied"));

    let (result, output) = run(&runner, Some(home.path()), true);

    assert!(result.is_ok());
    assert!(output.contains(billing::UNAVAILABLE_MESSAGE));
    assert!(output.ends_with("(Could not list S3 buckets: exit status 255)\n"));
}

#[test]
fn test_custom_config_is_used() {
    let home = tempdir().unwrap();
    let config = LoginConfig {
        keychain_service: "work-aws".to_string(),
        profile: "work".to_string(),
        aws_command: "/opt/aws".to_string(),
        ..LoginConfig::default()
    };
    let runner = FakeRunner::new()
        .on(
            "security find-internet-password -s work-aws -g",
            CommandOutput::success("\"acct\"<blob>=\"AKIAWORK\"\n"),
        )
        .on(
            "security find-internet-password -s work-aws -w",
            CommandOutput::success("s3cr3t"),
        )
        .on(
            "/opt/aws s3api list-buckets --query Buckets[].Name --output text",
            CommandOutput::success(""),
        );

    let mut out = Vec::new();
    run_login(&runner, &config, Some(home.path()), options(false), &mut out).unwrap();

    let written = fs::read_to_string(home.path().join(".aws/credentials")).unwrap();
    assert!(written.starts_with("[work]\naws_access_key_id = AKIAWORK\n"));
}
