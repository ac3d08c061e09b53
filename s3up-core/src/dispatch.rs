//! Concurrent fan-out/fan-in over every input identifier.
//!
//! One task is spawned per identifier, with no cap. Each task sends exactly one
//! [`UploadResult`] through a channel whose capacity equals the number of
//! inputs, so sending never waits on the collector. The collector hands every
//! result to a callback as it arrives and stops once all senders are gone.
//!
//! A panic inside an upload is caught in its task and turned into a failure
//! result for that identifier, so a run with N inputs always yields N results.
//! The tasks live in a [`JoinSet`] and are joined explicitly before returning.

use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;

use futures::FutureExt;
use tokio::sync::mpsc;
use tokio::task::JoinSet;
use tracing::{debug, error, info};

use crate::error::UploadError;
use crate::upload::{upload, UploadContext, UploadResult};

/// Success/failure counts for a finished run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub total: usize,
    pub succeeded: usize,
    pub failed: usize,
}

impl RunSummary {
    pub fn from_results(results: &[UploadResult]) -> Self {
        let succeeded = results.iter().filter(|r| r.is_success()).count();
        Self {
            total: results.len(),
            succeeded,
            failed: results.len() - succeeded,
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(msg) = payload.downcast_ref::<&str>() {
        msg.to_string()
    } else if let Some(msg) = payload.downcast_ref::<String>() {
        msg.clone()
    } else {
        "task panicked".to_string()
    }
}

/// Runs one upload, converting a panic into a failure result.
async fn guarded_upload(identifier: String, ctx: &UploadContext) -> UploadResult {
    match AssertUnwindSafe(upload(identifier.clone(), ctx))
        .catch_unwind()
        .await
    {
        Ok(result) => result,
        Err(payload) => {
            let reason = panic_message(payload.as_ref());
            error!(identifier = %identifier, reason = %reason, "Upload task panicked");
            UploadResult::failed(
                identifier.clone(),
                None,
                UploadError::TaskFailed { identifier, reason },
            )
        }
    }
}

/// Upload every identifier concurrently. Results come back in arrival order.
pub async fn run_all<F>(
    identifiers: Vec<String>,
    ctx: Arc<UploadContext>,
    mut on_result: F,
) -> Vec<UploadResult>
where
    F: FnMut(&UploadResult),
{
    let total = identifiers.len();
    if total == 0 {
        return Vec::new();
    }

    info!(total, bucket = %ctx.bucket.name, "Dispatching uploads");

    let (tx, mut rx) = mpsc::channel::<UploadResult>(total);
    let mut tasks = JoinSet::new();

    for identifier in identifiers {
        let tx = tx.clone();
        let ctx = Arc::clone(&ctx);
        tasks.spawn(async move {
            let result = guarded_upload(identifier, &ctx).await;
            if tx.send(result).await.is_err() {
                error!("Result channel closed before send");
            }
        });
    }
    drop(tx);

    let mut results = Vec::with_capacity(total);
    while let Some(result) = rx.recv().await {
        debug!(identifier = %result.identifier, ok = result.is_success(), "Collected result");
        on_result(&result);
        results.push(result);
    }
    rx.close();

    while let Some(joined) = tasks.join_next().await {
        if let Err(e) = joined {
            error!(error = %e, "Upload task did not complete");
        }
    }

    let summary = RunSummary::from_results(&results);
    info!(
        total = summary.total,
        succeeded = summary.succeeded,
        failed = summary.failed,
        "All uploads finished"
    );
    results
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{BucketConfig, RunOptions, Visibility};
    use crate::contract::{BoxError, MockObjectStore, MockRemoteFetcher, ObjectStore, PutObjectRequest};

    fn context(store: MockObjectStore) -> Arc<UploadContext> {
        let mut fetcher = MockRemoteFetcher::new();
        fetcher.expect_get().never();
        Arc::new(UploadContext::new(
            RunOptions::default(),
            BucketConfig {
                region: "us-east-1".into(),
                name: "b".into(),
                visibility: Visibility::Public,
                use_custom_domain: false,
            },
            Arc::new(store),
            Arc::new(fetcher),
        ))
    }

    #[tokio::test]
    async fn empty_input_yields_no_results() {
        let mut store = MockObjectStore::new();
        store.expect_put_object().never();

        let mut seen = 0;
        let results = run_all(Vec::new(), context(store), |_| seen += 1).await;
        assert!(results.is_empty());
        assert_eq!(seen, 0);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn every_input_yields_exactly_one_result() {
        let dir = tempfile::tempdir().unwrap();
        let mut identifiers = Vec::new();
        for i in 0..25 {
            let path = dir.path().join(format!("file{i}.txt"));
            std::fs::write(&path, format!("body {i}")).unwrap();
            identifiers.push(path.to_string_lossy().into_owned());
        }
        // Missing inputs fail without touching the store.
        identifiers.push("missing-one.txt".into());
        identifiers.push("missing-two.txt".into());

        let mut store = MockObjectStore::new();
        store.expect_put_object().times(25).returning(|_| Ok(()));

        let mut seen = Vec::new();
        let results = run_all(identifiers.clone(), context(store), |r| {
            seen.push(r.identifier.clone())
        })
        .await;

        assert_eq!(results.len(), identifiers.len());
        let mut got: Vec<_> = results.iter().map(|r| r.identifier.clone()).collect();
        got.sort();
        let mut want = identifiers.clone();
        want.sort();
        assert_eq!(got, want);

        seen.sort();
        assert_eq!(seen, want);

        let summary = RunSummary::from_results(&results);
        assert_eq!(summary.succeeded, 25);
        assert_eq!(summary.failed, 2);
    }

    /// Blocks every PUT until `parties` PUTs are in flight at once.
    struct GatedStore {
        barrier: tokio::sync::Barrier,
    }

    #[async_trait::async_trait]
    impl ObjectStore for GatedStore {
        async fn put_object(&self, _req: PutObjectRequest) -> Result<(), BoxError> {
            self.barrier.wait().await;
            Ok(())
        }
    }

    #[tokio::test]
    async fn all_uploads_are_in_flight_at_once() {
        const FILES: usize = 8;
        let dir = tempfile::tempdir().unwrap();
        let identifiers: Vec<String> = (0..FILES)
            .map(|i| {
                let path = dir.path().join(format!("gate{i}.txt"));
                std::fs::write(&path, b"x").unwrap();
                path.to_string_lossy().into_owned()
            })
            .collect();

        let base = context(MockObjectStore::new());
        let ctx = Arc::new(UploadContext::new(
            base.options.clone(),
            base.bucket.clone(),
            Arc::new(GatedStore {
                barrier: tokio::sync::Barrier::new(FILES),
            }),
            Arc::clone(&base.fetcher),
        ));

        // A capped or sequential dispatcher never gets all PUTs past the barrier.
        let results = tokio::time::timeout(
            std::time::Duration::from_secs(10),
            run_all(identifiers, ctx, |_| {}),
        )
        .await
        .expect("uploads did not run concurrently");

        assert_eq!(results.len(), FILES);
        assert!(results.iter().all(|r| r.is_success()));
    }

    struct ExplodingStore;

    #[async_trait::async_trait]
    impl ObjectStore for ExplodingStore {
        async fn put_object(&self, _req: PutObjectRequest) -> Result<(), BoxError> {
            panic!("store exploded");
        }
    }

    #[tokio::test]
    async fn panicking_task_still_reports_failure() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("explode.txt");
        std::fs::write(&path, b"boom").unwrap();
        let identifier = path.to_string_lossy().into_owned();

        let ctx = context(MockObjectStore::new());
        let ctx = Arc::new(UploadContext::new(
            ctx.options.clone(),
            ctx.bucket.clone(),
            Arc::new(ExplodingStore),
            Arc::clone(&ctx.fetcher),
        ));

        let results = run_all(vec![identifier.clone()], ctx, |_| {}).await;

        assert_eq!(results.len(), 1);
        assert_eq!(results[0].identifier, identifier);
        assert!(matches!(
            results[0].error(),
            Some(UploadError::TaskFailed { reason, .. }) if reason == "store exploded"
        ));
    }
}
