//! End-to-end adapter scenarios over the in-memory store and CDN.
//!
//! These exercise the filesystem contract and the write → invalidate
//! protocol without requiring actual S3 or CloudFront access.

use std::sync::Arc;

use bytes::Bytes;
use cirrus_volume::cdn::MemoryCdn;
use cirrus_volume::store::MemoryObjectStore;
use cirrus_volume::{CdnControl, VolumeAdapter, VolumeSettings};

fn settings() -> VolumeSettings {
    VolumeSettings::new("assets", "eu-west-1").with_subfolder("sub")
}

fn adapter(
    store: &Arc<MemoryObjectStore>,
    cdn: Option<&Arc<MemoryCdn>>,
    settings: VolumeSettings,
) -> VolumeAdapter {
    let cdn = cdn.map(|cdn| cdn.clone() as Arc<dyn CdnControl>);
    VolumeAdapter::with_components(settings, store.clone(), cdn).unwrap()
}

#[tokio::test]
async fn write_then_read_round_trips_and_delete_removes() {
    let store = Arc::new(MemoryObjectStore::new());
    let volume = adapter(&store, None, settings());

    let contents = Bytes::from_static(b"\x89PNG data");
    volume
        .write("photos/img.png", contents.clone(), None)
        .await
        .unwrap();

    assert_eq!(volume.read("photos/img.png").await.unwrap(), contents);

    volume.delete("photos/img.png").await.unwrap();
    let err = volume.read("photos/img.png").await.unwrap_err();
    assert!(err.is_not_found());

    // Deleting again still succeeds.
    volume.delete("photos/img.png").await.unwrap();
}

#[tokio::test]
async fn rename_moves_content_and_clears_the_source() {
    let store = Arc::new(MemoryObjectStore::new());
    let volume = adapter(&store, None, settings());

    let original = Bytes::from_static(b"original bytes");
    volume.write("a.bin", original.clone(), None).await.unwrap();

    volume.rename("a.bin", "b.bin").await.unwrap();

    assert!(volume.read("a.bin").await.unwrap_err().is_not_found());
    assert_eq!(volume.read("b.bin").await.unwrap(), original);
}

#[tokio::test]
async fn copy_leaves_the_source_in_place() {
    let store = Arc::new(MemoryObjectStore::new());
    let volume = adapter(&store, None, settings());

    let original = Bytes::from_static(b"copy me");
    volume.write("a.bin", original.clone(), None).await.unwrap();
    volume.copy("a.bin", "b.bin").await.unwrap();

    assert_eq!(volume.read("a.bin").await.unwrap(), original);
    assert_eq!(volume.read("b.bin").await.unwrap(), original);
}

#[tokio::test]
async fn write_triggers_exactly_one_invalidation_with_unique_references() {
    let store = Arc::new(MemoryObjectStore::new());
    let cdn = Arc::new(MemoryCdn::new());
    let volume = adapter(
        &store,
        Some(&cdn),
        settings().with_cf_distribution_id("E2EXAMPLE"),
    );

    volume
        .write("photos/img.png", Bytes::from_static(b"v1"), None)
        .await
        .unwrap();

    let requests = cdn.requests();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].distribution_id, "E2EXAMPLE");
    assert_eq!(requests[0].paths, ["/photos/img.png"]);

    volume
        .write("photos/img.png", Bytes::from_static(b"v2"), None)
        .await
        .unwrap();

    let requests = cdn.requests();
    assert_eq!(requests.len(), 2);
    assert_ne!(requests[0].caller_reference, requests[1].caller_reference);
}

#[tokio::test]
async fn rename_invalidates_destination_and_source() {
    let store = Arc::new(MemoryObjectStore::new());
    let cdn = Arc::new(MemoryCdn::new());
    let volume = adapter(
        &store,
        Some(&cdn),
        settings().with_cf_distribution_id("E2EXAMPLE"),
    );

    volume
        .write("old/name.png", Bytes::from_static(b"x"), None)
        .await
        .unwrap();
    volume.rename("old/name.png", "new/name.png").await.unwrap();

    let paths: Vec<String> = cdn
        .requests()
        .into_iter()
        .flat_map(|request| request.paths)
        .collect();
    assert_eq!(paths, ["/old/name.png", "/new/name.png", "/old/name.png"]);
}

#[tokio::test]
async fn failed_invalidation_surfaces_after_a_durable_write() {
    let store = Arc::new(MemoryObjectStore::new());
    let cdn = Arc::new(MemoryCdn::new());
    let volume = adapter(
        &store,
        Some(&cdn),
        settings().with_cf_distribution_id("E2EXAMPLE"),
    );

    cdn.fail_with("distribution is misconfigured");

    let contents = Bytes::from_static(b"durable");
    let err = volume
        .write("photos/img.png", contents.clone(), None)
        .await
        .unwrap_err();

    assert!(err.is_invalidation());
    assert!(err.to_string().contains("photos/img.png"));

    // The write itself was durable despite the surfaced error.
    assert_eq!(volume.read("photos/img.png").await.unwrap(), contents);
}
