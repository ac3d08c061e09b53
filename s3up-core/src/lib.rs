#![doc = "s3up-core: core upload pipeline for s3up."]

//! This crate holds everything between "a list of identifiers" and "a list of
//! upload results": content resolution, key and URL derivation, the per-file
//! upload task and the concurrent dispatcher. The CLI crate supplies the real
//! S3 client and the parsed configuration.
//!
//! # Usage
//! Build an [`upload::UploadContext`] from [`config::RunOptions`], the selected
//! [`config::BucketConfig`] and implementations of [`contract::ObjectStore`] and
//! [`contract::RemoteFetcher`], then call [`dispatch::run_all`].

pub mod config;
pub mod contract;
pub mod dispatch;
pub mod error;
pub mod fetch;
pub mod key;
pub mod resolve;
pub mod upload;
pub mod url;

pub use dispatch::{run_all, RunSummary};
pub use upload::{UploadContext, UploadResult};
