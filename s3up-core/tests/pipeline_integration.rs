use std::sync::{Arc, Mutex};

use s3up_core::config::{BucketConfig, RunOptions, Visibility};
use s3up_core::contract::{FetchResponse, MockObjectStore, MockRemoteFetcher, PutObjectRequest};
use s3up_core::{run_all, RunSummary, UploadContext};
use tempfile::tempdir;

fn bucket() -> BucketConfig {
    BucketConfig {
        region: "us-east-1".into(),
        name: "b".into(),
        visibility: Visibility::Public,
        use_custom_domain: false,
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn local_file_and_url_both_upload_with_derived_keys() {
    let dir = tempdir().unwrap();
    let local = dir.path().join("a.txt");
    std::fs::write(&local, b"local body").unwrap();
    let local = local.to_string_lossy().into_owned();

    let mut fetcher = MockRemoteFetcher::new();
    fetcher
        .expect_get()
        .withf(|url| url == "http://x/y.txt")
        .times(1)
        .returning(|_| {
            Ok(FetchResponse {
                status: 200,
                body: b"remote body".to_vec(),
            })
        });

    // Record every PUT so the request shape can be checked after the run.
    let puts: Arc<Mutex<Vec<PutObjectRequest>>> = Arc::new(Mutex::new(Vec::new()));
    let recorded = Arc::clone(&puts);
    let mut store = MockObjectStore::new();
    store.expect_put_object().times(2).returning(move |req| {
        recorded.lock().unwrap().push(req);
        Ok(())
    });

    let ctx = Arc::new(UploadContext::new(
        RunOptions::default(),
        bucket(),
        Arc::new(store),
        Arc::new(fetcher),
    ));

    let results = run_all(vec![local, "http://x/y.txt".to_string()], ctx, |_| {}).await;

    assert_eq!(results.len(), 2);
    assert!(results.iter().all(|r| r.is_success()));

    let mut keys: Vec<_> = results.iter().filter_map(|r| r.key.clone()).collect();
    keys.sort();
    assert_eq!(keys, vec!["a.txt".to_string(), "y.txt".to_string()]);

    let mut urls: Vec<_> = results.iter().filter_map(|r| r.url().map(str::to_string)).collect();
    urls.sort();
    assert_eq!(
        urls,
        vec![
            "http://b.s3.amazonaws.com/a.txt".to_string(),
            "http://b.s3.amazonaws.com/y.txt".to_string(),
        ]
    );

    let puts = puts.lock().unwrap();
    let remote = puts.iter().find(|p| p.key == "y.txt").expect("remote object was put");
    assert_eq!(remote.body, b"remote body");
    assert_eq!(remote.bucket, "b");
}

#[tokio::test]
async fn mixed_failures_are_all_reported() {
    let dir = tempdir().unwrap();
    let ok = dir.path().join("ok.png");
    std::fs::write(&ok, b"png").unwrap();
    let rejected = dir.path().join("rejected.png");
    std::fs::write(&rejected, b"png").unwrap();

    let mut fetcher = MockRemoteFetcher::new();
    fetcher.expect_get().times(1).returning(|_| {
        Ok(FetchResponse {
            status: 404,
            body: Vec::new(),
        })
    });

    let mut store = MockObjectStore::new();
    store
        .expect_put_object()
        .withf(|req| req.key == "rejected.png")
        .returning(|_| Err("AccessDenied".into()));
    store
        .expect_put_object()
        .withf(|req| req.key == "ok.png")
        .returning(|_| Ok(()));

    let ctx = Arc::new(UploadContext::new(
        RunOptions {
            add_timestamp: false,
            ..RunOptions::default()
        },
        bucket(),
        Arc::new(store),
        Arc::new(fetcher),
    ));

    let identifiers = vec![
        ok.to_string_lossy().into_owned(),
        rejected.to_string_lossy().into_owned(),
        "https://example.com/missing.png".to_string(),
        "not-here.png".to_string(),
    ];

    let mut failures = Vec::new();
    let results = run_all(identifiers, ctx, |r| {
        if let Some(e) = r.error() {
            failures.push(format!("failed to upload object: {e}"));
        }
    })
    .await;

    assert_eq!(results.len(), 4);
    assert_eq!(
        RunSummary::from_results(&results),
        RunSummary {
            total: 4,
            succeeded: 1,
            failed: 3
        }
    );
    assert_eq!(failures.len(), 3);
    assert!(failures.iter().any(|f| f.contains("AccessDenied")));
    assert!(failures
        .iter()
        .any(|f| f.contains("not found: https://example.com/missing.png")));
}
