//!
//! This module implements the CLI surface for s3up: flag parsing, config
//! loading, wiring the real S3 and HTTP clients into the core pipeline, and
//! printing one outcome line per input.
//!
//! All pipeline logic (resolution, keys, URLs, concurrency) lives in
//! `s3up-core`; this module is glue.
//!
//! ## Output contract
//! - stdout: `uploaded <url>` for every successful upload.
//! - stderr: `failed to upload object: <cause>` for every failed one.
//!
//! Per-file failures do not make [`run`] fail; only setup errors do.
use std::ffi::OsString;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{bail, Result};
use clap::{CommandFactory, Parser};
use s3up_core::config::RunOptions;
use s3up_core::fetch::HttpFetcher;
use s3up_core::{run_all, RunSummary, UploadContext, UploadResult};

use crate::load_config::{default_config_path, load_config, select_bucket};
use crate::s3::S3Store;

/// Upload local files or remote URLs to an S3 bucket.
#[derive(Parser, Debug)]
#[clap(
    name = "s3up",
    version,
    about = "Upload local files or remote URLs to an S3 bucket and print their URLs",
    override_usage = "s3up [-p] [-t] [-bucket <name>] <file-or-url>..."
)]
pub struct Cli {
    /// Private upload: do not request a public-read ACL
    #[clap(short = 'p', long = "private")]
    pub private: bool,

    /// Add the current unix timestamp to every key
    #[clap(short = 't', long = "timestamp")]
    pub timestamp: bool,

    /// Bucket entry from the credentials file to upload into
    #[clap(short = 'b', long = "bucket", default_value = "default")]
    pub bucket: String,

    /// Credentials file to use instead of ~/.s3up-credentials.toml
    #[clap(long)]
    pub config: Option<PathBuf>,

    /// Local files or http(s) URLs to upload
    pub files: Vec<String>,
}

impl Cli {
    pub fn run_options(&self) -> RunOptions {
        RunOptions {
            private: self.private,
            add_timestamp: self.timestamp,
            target_bucket: self.bucket.clone(),
        }
    }
}

/// Rewrites the single-dash `-bucket` form into clap's `--bucket`.
/// Arguments after a `--` terminator are left alone.
pub fn normalise_args<I>(args: I) -> Vec<OsString>
where
    I: IntoIterator<Item = OsString>,
{
    let mut terminated = false;
    args.into_iter()
        .map(|arg| {
            if terminated {
                return arg;
            }
            match arg.to_str() {
                Some("--") => {
                    terminated = true;
                    arg
                }
                Some("-bucket") => OsString::from("--bucket"),
                Some(s) if s.starts_with("-bucket=") => OsString::from(format!("-{s}")),
                _ => arg,
            }
        })
        .collect()
}

/// Prints the outcome line for one upload.
pub fn report_result(result: &UploadResult) {
    match &result.outcome {
        Ok(url) => println!("uploaded {url}"),
        Err(e) => eprintln!("failed to upload object: {e}"),
    }
}

/// Async CLI entrypoint for integration tests and main().
pub async fn run(cli: Cli) -> Result<RunSummary> {
    if cli.files.is_empty() {
        bail!("{}", Cli::command().render_help());
    }

    let options = cli.run_options();
    tracing::info!(
        files = cli.files.len(),
        private = options.private,
        timestamp = options.add_timestamp,
        bucket = %options.target_bucket,
        "Starting upload run"
    );

    let config_path = match &cli.config {
        Some(path) => path.clone(),
        None => default_config_path()?,
    };
    let credentials = load_config(&config_path)?;
    let bucket = select_bucket(&credentials, &options.target_bucket)?;

    let store = S3Store::new(
        &credentials.access_key_id,
        &credentials.secret_access_key,
        &bucket.region,
    )
    .await;

    let ctx = Arc::new(UploadContext::new(
        options,
        bucket,
        Arc::new(store),
        Arc::new(HttpFetcher::new()),
    ));

    let results = run_all(cli.files, ctx, report_result).await;
    Ok(RunSummary::from_results(&results))
}
