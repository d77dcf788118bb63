//! Per-bucket S3 storage usage.
//!
//! Bucket names come from `aws s3api list-buckets`; each bucket's size from the
//! summary trailer of `aws s3 ls --recursive --summarize`. One bucket failing
//! does not stop the scan.

use crate::command_runner::{args, CommandRunner};
use crate::error::ReportError;
use std::io::{self, Write};
use tracing::{debug, warn};

const TOTAL_SIZE_MARKER: &str = "Total Size:";

/// Size of one bucket as reported by the AWS CLI.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BucketUsage {
    pub bucket: String,
    pub total_size_bytes: String,
}

/// Lists bucket names in the order the CLI returns them.
pub fn list_buckets(
    runner: &dyn CommandRunner,
    aws_command: &str,
) -> Result<Vec<String>, ReportError> {
    if !runner.is_available(aws_command) {
        warn!(aws_command, "AWS CLI not found on PATH");
        return Err(ReportError::CommandFailed {
            reason: format!("{} not found on PATH", aws_command),
        });
    }

    let output = runner
        .run(
            aws_command,
            &args([
                "s3api",
                "list-buckets",
                "--query",
                "Buckets[].Name",
                "--output",
                "text",
            ]),
        )
        .map_err(|e| ReportError::CommandFailed {
            reason: format!("{:#}", e),
        })?;

    if !output.success {
        return Err(ReportError::CommandFailed {
            reason: output.failure_reason(),
        });
    }

    let buckets: Vec<String> = output
        .combined
        .split_whitespace()
        .map(String::from)
        .collect();
    debug!(count = buckets.len(), "listed buckets");
    Ok(buckets)
}

/// Runs the recursive summary listing for one bucket.
pub fn bucket_usage(
    runner: &dyn CommandRunner,
    aws_command: &str,
    bucket: &str,
) -> Result<BucketUsage, ReportError> {
    let output = runner
        .run(
            aws_command,
            &args([
                "s3".to_string(),
                "ls".to_string(),
                format!("s3://{}", bucket),
                "--recursive".to_string(),
                "--summarize".to_string(),
            ]),
        )
        .map_err(|e| ReportError::CommandFailed {
            reason: format!("{:#}", e),
        })?;

    if !output.success {
        return Err(ReportError::CommandFailed {
            reason: output.failure_reason(),
        });
    }

    Ok(BucketUsage {
        bucket: bucket.to_string(),
        total_size_bytes: parse_total_size(&output.combined),
    })
}

/// Extracts the byte count from a `Total Size: <n> Bytes` summary line.
///
/// Falls back to `"0"` when the summary is absent (e.g. an empty bucket listing
/// from an older CLI).
pub fn parse_total_size(listing: &str) -> String {
    listing
        .lines()
        .rev()
        .filter(|line| line.contains(TOTAL_SIZE_MARKER))
        .find_map(|line| line.split_whitespace().nth(2))
        .unwrap_or("0")
        .to_string()
}

/// Prints `<bucket>: <size> bytes` for every bucket.
pub fn report_storage_usage(
    runner: &dyn CommandRunner,
    aws_command: &str,
    out: &mut dyn Write,
) -> io::Result<()> {
    let buckets = match list_buckets(runner, aws_command) {
        Ok(buckets) => buckets,
        Err(e) => {
            warn!("bucket listing failed: {}", e);
            return writeln!(out, "(Could not list S3 buckets: {})", e);
        }
    };

    for bucket in &buckets {
        match bucket_usage(runner, aws_command, bucket) {
            Ok(usage) => writeln!(out, "{}: {} bytes", usage.bucket, usage.total_size_bytes)?,
            Err(e) => {
                warn!(bucket = bucket.as_str(), "bucket size query failed: {}", e);
                writeln!(out, "  {}: error retrieving bucket size: {}", bucket, e)?;
            }
        }
    }
    Ok(())
}

#[cfg(test)]
#[path = "tests/storage_usage_tests.rs"]
mod tests;
