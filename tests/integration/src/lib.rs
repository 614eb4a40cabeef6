//! Integration tests for the CloudPilot server.
//!
//! These tests require a running server at `localhost:5000` (pointed at a
//! local stack via `AWS_ENDPOINT_URL`, or at a real account). They are
//! marked `#[ignore]` so they don't run during normal `cargo test`.
//!
//! Run them with:
//! ```text
//! cargo test -p cloudpilot-integration -- --ignored
//! ```

use std::io::{Cursor, Write};
use std::sync::Once;

use zip::write::SimpleFileOptions;

static INIT: Once = Once::new();

/// Initialize tracing (once).
fn init_tracing() {
    INIT.call_once(|| {
        tracing_subscriber::fmt()
            .with_env_filter(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
            )
            .with_test_writer()
            .init();
    });
}

/// Base URL for the server.
#[must_use]
pub fn base_url() -> String {
    std::env::var("CLOUDPILOT_URL").unwrap_or_else(|_| "http://localhost:5000".to_owned())
}

/// Create an HTTP client for the tests.
#[must_use]
pub fn http_client() -> reqwest::Client {
    init_tracing();
    reqwest::Client::new()
}

/// Generate a unique bucket name for a test.
#[must_use]
pub fn test_bucket_name(prefix: &str) -> String {
    let id = uuid::Uuid::new_v4().to_string()[..8].to_owned();
    format!("test-{prefix}-{id}")
}

/// Build an in-memory zip archive from (path, contents) pairs.
#[must_use]
pub fn build_site_zip(entries: &[(&str, &[u8])]) -> Vec<u8> {
    let mut writer = zip::ZipWriter::new(Cursor::new(Vec::new()));
    let options = SimpleFileOptions::default();
    for (name, data) in entries {
        writer.start_file(*name, options).expect("start file");
        writer.write_all(data).expect("write file");
    }
    writer.finish().expect("finish zip").into_inner()
}

/// Delete a bucket, ignoring failures (cleanup helper).
pub async fn cleanup_bucket(client: &reqwest::Client, bucket: &str) {
    let _ = client
        .post(format!("{}/s3/delete_bucket", base_url()))
        .json(&serde_json::json!({ "bucket_name": bucket }))
        .send()
        .await;
}

mod test_buckets;
mod test_deploy;
mod test_health;
