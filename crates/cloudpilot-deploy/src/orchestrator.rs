//! The website deployment orchestrator.
//!
//! [`WebsiteDeployer::deploy`] drives an explicit state machine:
//!
//! ```text
//! Created -> BucketReady -> FilesUploaded -> HostingConfigured -> PolicySet
//!                                                  -> (optional) DistributionAttached
//! ```
//!
//! Bucket setup, hosting configuration, and policy application are fatal on
//! failure and abort the deployment with the state recorded on the error.
//! Per-file uploads are best-effort: one file's failure never halts the
//! others, and every attempt produces exactly one [`UploadOutcome`] in
//! archive encounter order. Distribution provisioning failures are reported
//! as a warning on the result, never as a deployment failure.
//!
//! Nothing is retried; re-running a deployment is safe because bucket
//! creation, hosting configuration, and policy application all have replace
//! semantics and uploads overwrite objects under the same key.

use std::fmt;
use std::sync::Arc;

use bytes::Bytes;
use futures::StreamExt;
use tracing::{debug, info, warn};

use cloudpilot_core::provider::{
    DistributionOrigin, DistributionProvisioner, DistributionRequest, DistributionSummary,
    ObjectStore, OriginAccessIdentity,
};
use cloudpilot_core::{AwsRegion, ProviderError};

use crate::archive::{ArchiveEntry, unpack};
use crate::content_type::classify;
use crate::error::DeployError;
use crate::policy::AccessPolicy;

/// Default bound on concurrent per-file uploads.
pub const DEFAULT_UPLOAD_CONCURRENCY: usize = 8;

/// The bucket a deployment targets. Immutable for the duration of one
/// deployment.
#[derive(Debug, Clone)]
pub struct BucketTarget {
    /// Bucket name.
    pub name: String,
    /// Region the bucket is created in when it does not exist yet.
    pub region: AwsRegion,
    /// Index document served for directory requests.
    pub index_document: String,
    /// Error document served for missing keys.
    pub error_document: String,
}

impl BucketTarget {
    /// A target with the conventional index and error documents.
    #[must_use]
    pub fn new(name: impl Into<String>, region: AwsRegion) -> Self {
        Self {
            name: name.into(),
            region,
            index_document: "index.html".to_owned(),
            error_document: "error.html".to_owned(),
        }
    }
}

/// How the deployed site is exposed to readers.
#[derive(Debug, Clone)]
pub enum AccessMode {
    /// The bucket itself is world-readable.
    PublicRead,
    /// Reads are scoped to a content-delivery access identity.
    Identity(OriginAccessIdentity),
}

/// One deployment request.
#[derive(Debug, Clone)]
pub struct DeploymentRequest {
    /// The uploaded archive bytes.
    pub archive: Bytes,
    /// The file name the archive was uploaded under, if known.
    pub archive_name: Option<String>,
    /// Target bucket.
    pub target: BucketTarget,
    /// Access policy variant to attach.
    pub access: AccessMode,
    /// Whether to front the site with a content-delivery distribution.
    pub attach_distribution: bool,
}

/// States of the deployment pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DeployStage {
    /// Nothing has happened yet.
    Created,
    /// The target bucket exists.
    BucketReady,
    /// Every archive entry has produced an upload outcome.
    FilesUploaded,
    /// Static-website hosting is configured.
    HostingConfigured,
    /// The access policy is attached.
    PolicySet,
    /// A distribution fronts the site.
    DistributionAttached,
}

impl DeployStage {
    /// Stage name as a static string.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Created => "created",
            Self::BucketReady => "bucket_ready",
            Self::FilesUploaded => "files_uploaded",
            Self::HostingConfigured => "hosting_configured",
            Self::PolicySet => "policy_set",
            Self::DistributionAttached => "distribution_attached",
        }
    }
}

impl fmt::Display for DeployStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Whether one file upload succeeded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum UploadStatus {
    /// The object was stored.
    Success,
    /// The store rejected the upload.
    Failed,
}

/// The outcome of one file upload attempt, in archive encounter order.
#[derive(Debug, Clone, serde::Serialize)]
pub struct UploadOutcome {
    /// Object key relative to the bucket root.
    pub path: String,
    /// Media type the file was uploaded with.
    pub content_type: String,
    /// Whether the upload succeeded.
    pub status: UploadStatus,
    /// The store's error message for failed uploads.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_detail: Option<String>,
}

impl UploadOutcome {
    /// Whether this outcome is a success.
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.status == UploadStatus::Success
    }
}

/// Terminal artifact of a deployment.
#[derive(Debug, Clone, serde::Serialize)]
pub struct DeploymentResult {
    /// The deployed bucket.
    pub bucket: String,
    /// Keys of successfully uploaded files, in archive encounter order.
    pub uploaded_paths: Vec<String>,
    /// Public website URL for the bucket.
    pub website_url: String,
    /// Whether the access policy was attached.
    pub policy_applied: bool,
    /// Upload outcomes that failed, in archive encounter order.
    pub failures: Vec<UploadOutcome>,
    /// The created distribution, when one was requested and provisioned.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub distribution: Option<DistributionSummary>,
    /// Warning recorded when distribution provisioning failed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub distribution_warning: Option<String>,
}

impl DeploymentResult {
    /// Whether the site is hosted but one or more files failed to upload.
    #[must_use]
    pub fn is_partial_failure(&self) -> bool {
        !self.failures.is_empty()
    }
}

/// Sequences bucket setup, archive unpacking, per-file uploads, hosting
/// configuration, policy attachment, and optional distribution provisioning
/// into one deployment.
#[derive(Clone)]
pub struct WebsiteDeployer {
    store: Arc<dyn ObjectStore>,
    cdn: Option<Arc<dyn DistributionProvisioner>>,
    concurrency: usize,
}

impl fmt::Debug for WebsiteDeployer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WebsiteDeployer")
            .field("concurrency", &self.concurrency)
            .field("cdn", &self.cdn.as_ref().map(|_| "..."))
            .finish_non_exhaustive()
    }
}

impl WebsiteDeployer {
    /// Create a deployer over the given object store.
    #[must_use]
    pub fn new(store: Arc<dyn ObjectStore>) -> Self {
        Self {
            store,
            cdn: None,
            concurrency: DEFAULT_UPLOAD_CONCURRENCY,
        }
    }

    /// Attach a distribution provisioner for deployments that request one.
    #[must_use]
    pub fn with_cdn(mut self, cdn: Arc<dyn DistributionProvisioner>) -> Self {
        self.cdn = Some(cdn);
        self
    }

    /// Override the bound on concurrent per-file uploads.
    #[must_use]
    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency.max(1);
        self
    }

    /// Run one deployment to completion.
    ///
    /// # Errors
    ///
    /// Returns a [`DeployError`] when the archive is unreadable or when a
    /// bucket-setup, hosting, or policy call fails. Per-file upload failures
    /// and distribution provisioning failures are reported on the returned
    /// [`DeploymentResult`] instead.
    pub async fn deploy(&self, request: DeploymentRequest) -> Result<DeploymentResult, DeployError> {
        let target = &request.target;
        let mut stage = DeployStage::Created;

        // Created -> BucketReady. Fatal: nothing is useful without a bucket.
        self.ensure_bucket(target)
            .await
            .map_err(|e| DeployError::at(stage, e))?;
        stage = DeployStage::BucketReady;
        debug!(bucket = %target.name, stage = %stage, "bucket ready");

        // BucketReady -> FilesUploaded. Best-effort per file.
        let entries = unpack(request.archive.clone(), request.archive_name.as_deref())?;
        let outcomes = self.upload_entries(&target.name, entries).await;
        stage = DeployStage::FilesUploaded;
        debug!(
            bucket = %target.name,
            stage = %stage,
            attempted = outcomes.len(),
            failed = outcomes.iter().filter(|o| !o.is_success()).count(),
            "uploads finished",
        );

        // FilesUploaded -> HostingConfigured. Fatal: the caller must be told
        // the site is not servable.
        self.store
            .put_bucket_website(&target.name, &target.index_document, &target.error_document)
            .await
            .map_err(|e| DeployError::at(stage, e))?;
        stage = DeployStage::HostingConfigured;

        // HostingConfigured -> PolicySet. Fatal, same reason.
        let policy = match &request.access {
            AccessMode::PublicRead => AccessPolicy::public_read(&target.name),
            AccessMode::Identity(identity) => {
                AccessPolicy::identity_scoped(&target.name, &identity.canonical_user_id)
            }
        };
        self.store
            .put_bucket_policy(&target.name, &policy.to_json())
            .await
            .map_err(|e| DeployError::at(stage, e))?;
        stage = DeployStage::PolicySet;

        let region = match self.store.bucket_location(&target.name).await {
            Ok(region) => region,
            Err(e) => {
                warn!(bucket = %target.name, error = %e, "bucket location lookup failed, using target region");
                target.region.clone()
            }
        };
        let website_url = region.website_url(&target.name);

        // PolicySet -> DistributionAttached, only when requested. Never
        // fatal and never rolled back.
        let (distribution, distribution_warning) = if request.attach_distribution {
            match self.attach_distribution(&request, &region).await {
                Ok(summary) => {
                    stage = DeployStage::DistributionAttached;
                    (Some(summary), None)
                }
                Err(e) => {
                    warn!(bucket = %target.name, error = %e, "distribution provisioning failed");
                    (None, Some(e.to_string()))
                }
            }
        } else {
            (None, None)
        };

        let (uploaded_paths, failures): (Vec<_>, Vec<_>) =
            outcomes.into_iter().partition(UploadOutcome::is_success);

        let result = DeploymentResult {
            bucket: target.name.clone(),
            uploaded_paths: uploaded_paths.into_iter().map(|o| o.path).collect(),
            website_url,
            policy_applied: true,
            failures,
            distribution,
            distribution_warning,
        };

        info!(
            bucket = %result.bucket,
            stage = %stage,
            uploaded = result.uploaded_paths.len(),
            failed = result.failures.len(),
            partial = result.is_partial_failure(),
            "deployment finished",
        );

        Ok(result)
    }

    /// Verify the target bucket exists, creating it when it does not.
    async fn ensure_bucket(&self, target: &BucketTarget) -> Result<(), ProviderError> {
        if self.store.bucket_exists(&target.name).await? {
            debug!(bucket = %target.name, "bucket already exists");
            return Ok(());
        }
        self.store.create_bucket(&target.name, &target.region).await
    }

    /// Upload every entry on a bounded concurrent pool, preserving archive
    /// encounter order in the returned outcomes.
    async fn upload_entries(&self, bucket: &str, entries: Vec<ArchiveEntry>) -> Vec<UploadOutcome> {
        let mut indexed: Vec<(usize, UploadOutcome)> =
            futures::stream::iter(entries.into_iter().enumerate().map(|(index, entry)| {
                let store = Arc::clone(&self.store);
                let bucket = bucket.to_owned();
                async move { (index, upload_entry(store.as_ref(), &bucket, entry).await) }
            }))
            .buffer_unordered(self.concurrency)
            .collect()
            .await;

        // Completion order is nondeterministic; encounter order is the contract.
        indexed.sort_by_key(|(index, _)| *index);
        indexed.into_iter().map(|(_, outcome)| outcome).collect()
    }

    /// Provision a distribution in front of the deployed site.
    async fn attach_distribution(
        &self,
        request: &DeploymentRequest,
        region: &AwsRegion,
    ) -> Result<DistributionSummary, ProviderError> {
        let Some(cdn) = &self.cdn else {
            return Err(ProviderError::api(
                "cloudfront",
                "no distribution provisioner configured",
            ));
        };

        let bucket = &request.target.name;
        let distribution_request = match &request.access {
            AccessMode::PublicRead => DistributionRequest {
                origin_domain: region.website_domain(bucket),
                origin: DistributionOrigin::Website,
                comment: format!("Distribution for {bucket} website"),
                default_root_object: Some(request.target.index_document.clone()),
            },
            AccessMode::Identity(identity) => DistributionRequest {
                origin_domain: format!("{bucket}.s3.amazonaws.com"),
                origin: DistributionOrigin::BucketWithIdentity {
                    access_identity_id: identity.id.clone(),
                },
                comment: format!("Distribution for {bucket}"),
                default_root_object: Some(request.target.index_document.clone()),
            },
        };

        cdn.create_distribution(distribution_request).await
    }
}

/// Upload one archive entry, classifying its media type first. Every attempt
/// produces exactly one outcome.
async fn upload_entry(store: &dyn ObjectStore, bucket: &str, entry: ArchiveEntry) -> UploadOutcome {
    let content_type = classify(&entry.relative_path);
    match store
        .put_object(bucket, &entry.relative_path, entry.content, content_type)
        .await
    {
        Ok(()) => UploadOutcome {
            path: entry.relative_path,
            content_type: content_type.to_owned(),
            status: UploadStatus::Success,
            error_detail: None,
        },
        Err(e) => {
            warn!(bucket = %bucket, path = %entry.relative_path, error = %e, "file upload failed");
            UploadOutcome {
                path: entry.relative_path,
                content_type: content_type.to_owned(),
                status: UploadStatus::Failed,
                error_detail: Some(e.to_string()),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::{HashMap, HashSet};
    use std::io::{Cursor, Write};
    use std::sync::Mutex;

    use async_trait::async_trait;
    use cloudpilot_core::ProviderResult;
    use cloudpilot_core::provider::{BucketStats, BucketSummary, ObjectSummary};
    use zip::write::SimpleFileOptions;

    use super::*;

    fn build_zip(entries: &[(&str, &[u8])]) -> Bytes {
        let mut writer = zip::ZipWriter::new(Cursor::new(Vec::new()));
        let options = SimpleFileOptions::default();
        for (name, data) in entries {
            writer.start_file(*name, options).expect("start file");
            writer.write_all(data).expect("write file");
        }
        Bytes::from(writer.finish().expect("finish zip").into_inner())
    }

    fn site_zip() -> Bytes {
        build_zip(&[
            ("index.html", b"<html></html>"),
            ("style.css", b"body {}"),
            ("img/logo.png", b"\x89PNG"),
        ])
    }

    /// In-memory object store with per-path failure injection.
    #[derive(Default)]
    struct FakeStore {
        buckets: Mutex<HashMap<String, HashMap<String, (Bytes, String)>>>,
        policies: Mutex<HashMap<String, String>>,
        website_configs: Mutex<HashMap<String, (String, String)>>,
        fail_paths: HashSet<String>,
        fail_create: bool,
        fail_website: bool,
        fail_policy: bool,
    }

    #[async_trait]
    impl ObjectStore for FakeStore {
        async fn create_bucket(&self, bucket: &str, _region: &AwsRegion) -> ProviderResult<()> {
            if self.fail_create {
                return Err(ProviderError::api("s3", "bucket name already taken"));
            }
            self.buckets
                .lock()
                .expect("lock")
                .entry(bucket.to_owned())
                .or_default();
            Ok(())
        }

        async fn bucket_exists(&self, bucket: &str) -> ProviderResult<bool> {
            Ok(self.buckets.lock().expect("lock").contains_key(bucket))
        }

        async fn delete_bucket(&self, bucket: &str) -> ProviderResult<()> {
            self.buckets.lock().expect("lock").remove(bucket);
            Ok(())
        }

        async fn list_buckets(&self) -> ProviderResult<Vec<BucketSummary>> {
            Ok(Vec::new())
        }

        async fn list_objects(&self, _bucket: &str) -> ProviderResult<Vec<ObjectSummary>> {
            Ok(Vec::new())
        }

        async fn bucket_stats(&self, _bucket: &str) -> ProviderResult<BucketStats> {
            Ok(BucketStats::default())
        }

        async fn bucket_location(&self, _bucket: &str) -> ProviderResult<AwsRegion> {
            Ok(AwsRegion::default())
        }

        async fn put_object(
            &self,
            bucket: &str,
            key: &str,
            body: Bytes,
            content_type: &str,
        ) -> ProviderResult<()> {
            if self.fail_paths.contains(key) {
                return Err(ProviderError::api("s3", format!("upload rejected: {key}")));
            }
            self.buckets
                .lock()
                .expect("lock")
                .entry(bucket.to_owned())
                .or_default()
                .insert(key.to_owned(), (body, content_type.to_owned()));
            Ok(())
        }

        async fn put_bucket_website(
            &self,
            bucket: &str,
            index_document: &str,
            error_document: &str,
        ) -> ProviderResult<()> {
            if self.fail_website {
                return Err(ProviderError::api("s3", "website configuration rejected"));
            }
            self.website_configs.lock().expect("lock").insert(
                bucket.to_owned(),
                (index_document.to_owned(), error_document.to_owned()),
            );
            Ok(())
        }

        async fn put_bucket_policy(&self, bucket: &str, policy_json: &str) -> ProviderResult<()> {
            if self.fail_policy {
                return Err(ProviderError::api("s3", "policy rejected"));
            }
            self.policies
                .lock()
                .expect("lock")
                .insert(bucket.to_owned(), policy_json.to_owned());
            Ok(())
        }
    }

    /// Distribution provisioner with a failure switch.
    struct FakeCdn {
        fail: bool,
    }

    #[async_trait]
    impl DistributionProvisioner for FakeCdn {
        async fn create_origin_access_identity(
            &self,
            comment: &str,
        ) -> ProviderResult<OriginAccessIdentity> {
            Ok(OriginAccessIdentity {
                id: "OAI123".to_owned(),
                canonical_user_id: "canonical-123".to_owned(),
                comment: comment.to_owned(),
            })
        }

        async fn origin_access_identity(&self, id: &str) -> ProviderResult<OriginAccessIdentity> {
            Ok(OriginAccessIdentity {
                id: id.to_owned(),
                canonical_user_id: "canonical-123".to_owned(),
                comment: String::new(),
            })
        }

        async fn create_distribution(
            &self,
            request: DistributionRequest,
        ) -> ProviderResult<DistributionSummary> {
            if self.fail {
                return Err(ProviderError::api("cloudfront", "distribution quota exceeded"));
            }
            Ok(DistributionSummary {
                id: "E123".to_owned(),
                domain_name: format!("d111.cloudfront.net ({})", request.origin_domain),
                status: "InProgress".to_owned(),
            })
        }
    }

    fn request(archive: Bytes) -> DeploymentRequest {
        DeploymentRequest {
            archive,
            archive_name: Some("website.zip".to_owned()),
            target: BucketTarget::new("demo-site", AwsRegion::default()),
            access: AccessMode::PublicRead,
            attach_distribution: false,
        }
    }

    #[tokio::test]
    async fn test_should_deploy_site_in_encounter_order() {
        let store = Arc::new(FakeStore::default());
        let deployer = WebsiteDeployer::new(Arc::clone(&store) as Arc<dyn ObjectStore>);

        let result = deployer.deploy(request(site_zip())).await.expect("deploy");

        assert_eq!(
            result.uploaded_paths,
            vec!["index.html", "style.css", "img/logo.png"]
        );
        assert!(result.failures.is_empty());
        assert!(result.policy_applied);
        assert_eq!(
            result.website_url,
            "http://demo-site.s3-website-us-east-1.amazonaws.com"
        );

        let buckets = store.buckets.lock().expect("lock");
        let objects = buckets.get("demo-site").expect("bucket");
        assert_eq!(objects.get("index.html").expect("object").1, "text/html");
        assert_eq!(objects.get("style.css").expect("object").1, "text/css");
        assert_eq!(objects.get("img/logo.png").expect("object").1, "image/png");
    }

    #[tokio::test]
    async fn test_should_attach_public_read_policy_and_hosting() {
        let store = Arc::new(FakeStore::default());
        let deployer = WebsiteDeployer::new(Arc::clone(&store) as Arc<dyn ObjectStore>);

        deployer.deploy(request(site_zip())).await.expect("deploy");

        let policies = store.policies.lock().expect("lock");
        let policy: serde_json::Value =
            serde_json::from_str(policies.get("demo-site").expect("policy")).expect("json");
        assert_eq!(policy["Statement"][0]["Principal"], "*");

        let configs = store.website_configs.lock().expect("lock");
        assert_eq!(
            configs.get("demo-site").expect("config"),
            &("index.html".to_owned(), "error.html".to_owned())
        );
    }

    #[tokio::test]
    async fn test_should_record_per_file_failures_without_halting() {
        let store = Arc::new(FakeStore {
            fail_paths: HashSet::from(["style.css".to_owned()]),
            ..FakeStore::default()
        });
        let deployer = WebsiteDeployer::new(Arc::clone(&store) as Arc<dyn ObjectStore>);

        let result = deployer.deploy(request(site_zip())).await.expect("deploy");

        assert_eq!(result.uploaded_paths, vec!["index.html", "img/logo.png"]);
        assert_eq!(result.failures.len(), 1);
        assert_eq!(result.failures[0].path, "style.css");
        assert_eq!(result.failures[0].status, UploadStatus::Failed);
        assert!(result.failures[0].error_detail.as_deref().is_some());
        assert!(result.is_partial_failure());
        assert!(result.policy_applied);
    }

    #[tokio::test]
    async fn test_should_report_success_when_every_upload_fails() {
        let store = Arc::new(FakeStore {
            fail_paths: HashSet::from([
                "index.html".to_owned(),
                "style.css".to_owned(),
                "img/logo.png".to_owned(),
            ]),
            ..FakeStore::default()
        });
        let deployer = WebsiteDeployer::new(Arc::clone(&store) as Arc<dyn ObjectStore>);

        let result = deployer.deploy(request(site_zip())).await.expect("deploy");

        assert!(result.uploaded_paths.is_empty());
        assert_eq!(result.failures.len(), 3);
        assert!(result.policy_applied);
    }

    #[tokio::test]
    async fn test_should_abort_before_uploads_when_bucket_creation_fails() {
        let store = Arc::new(FakeStore {
            fail_create: true,
            ..FakeStore::default()
        });
        let deployer = WebsiteDeployer::new(Arc::clone(&store) as Arc<dyn ObjectStore>);

        let err = deployer.deploy(request(site_zip())).await.unwrap_err();

        assert_eq!(err.stage(), Some(DeployStage::Created));
        assert!(store.buckets.lock().expect("lock").is_empty());
    }

    #[tokio::test]
    async fn test_should_fail_when_hosting_configuration_fails() {
        let store = Arc::new(FakeStore {
            fail_website: true,
            ..FakeStore::default()
        });
        let deployer = WebsiteDeployer::new(Arc::clone(&store) as Arc<dyn ObjectStore>);

        let err = deployer.deploy(request(site_zip())).await.unwrap_err();
        assert_eq!(err.stage(), Some(DeployStage::FilesUploaded));
    }

    #[tokio::test]
    async fn test_should_fail_when_policy_attachment_fails() {
        let store = Arc::new(FakeStore {
            fail_policy: true,
            ..FakeStore::default()
        });
        let deployer = WebsiteDeployer::new(Arc::clone(&store) as Arc<dyn ObjectStore>);

        let err = deployer.deploy(request(site_zip())).await.unwrap_err();
        assert_eq!(err.stage(), Some(DeployStage::HostingConfigured));
    }

    #[tokio::test]
    async fn test_should_drop_traversal_entries_from_result_entirely() {
        let archive = build_zip(&[
            ("../../etc/passwd", b"root"),
            ("index.html", b"<html></html>"),
        ]);
        let store = Arc::new(FakeStore::default());
        let deployer = WebsiteDeployer::new(Arc::clone(&store) as Arc<dyn ObjectStore>);

        let result = deployer.deploy(request(archive)).await.expect("deploy");

        assert_eq!(result.uploaded_paths, vec!["index.html"]);
        assert!(result.failures.is_empty());
    }

    #[tokio::test]
    async fn test_should_be_idempotent_across_reruns() {
        let store = Arc::new(FakeStore::default());
        let deployer = WebsiteDeployer::new(Arc::clone(&store) as Arc<dyn ObjectStore>);

        let first = deployer.deploy(request(site_zip())).await.expect("deploy");
        let second = deployer.deploy(request(site_zip())).await.expect("deploy");

        assert_eq!(first.uploaded_paths, second.uploaded_paths);
        let buckets = store.buckets.lock().expect("lock");
        assert_eq!(buckets.get("demo-site").expect("bucket").len(), 3);
    }

    #[tokio::test]
    async fn test_should_attach_distribution_when_requested() {
        let store = Arc::new(FakeStore::default());
        let deployer = WebsiteDeployer::new(Arc::clone(&store) as Arc<dyn ObjectStore>)
            .with_cdn(Arc::new(FakeCdn { fail: false }));

        let mut req = request(site_zip());
        req.attach_distribution = true;
        let result = deployer.deploy(req).await.expect("deploy");

        let distribution = result.distribution.expect("distribution");
        assert_eq!(distribution.id, "E123");
        assert!(
            distribution
                .domain_name
                .contains("demo-site.s3-website-us-east-1.amazonaws.com")
        );
        assert!(result.distribution_warning.is_none());
    }

    #[tokio::test]
    async fn test_should_warn_instead_of_failing_when_distribution_fails() {
        let store = Arc::new(FakeStore::default());
        let deployer = WebsiteDeployer::new(Arc::clone(&store) as Arc<dyn ObjectStore>)
            .with_cdn(Arc::new(FakeCdn { fail: true }));

        let mut req = request(site_zip());
        req.attach_distribution = true;
        let result = deployer.deploy(req).await.expect("deploy");

        assert!(result.distribution.is_none());
        assert!(
            result
                .distribution_warning
                .as_deref()
                .is_some_and(|w| w.contains("quota"))
        );
        assert_eq!(result.uploaded_paths.len(), 3);
        assert!(result.policy_applied);
    }

    #[tokio::test]
    async fn test_should_fail_on_corrupt_archive_before_touching_hosting() {
        let store = Arc::new(FakeStore::default());
        let deployer = WebsiteDeployer::new(Arc::clone(&store) as Arc<dyn ObjectStore>);

        let err = deployer
            .deploy(request(Bytes::from_static(b"not a zip")))
            .await
            .unwrap_err();

        assert!(matches!(err, DeployError::Archive(_)));
        assert!(store.website_configs.lock().expect("lock").is_empty());
    }

    #[tokio::test]
    async fn test_should_use_identity_scoped_policy_for_identity_access() {
        let store = Arc::new(FakeStore::default());
        let deployer = WebsiteDeployer::new(Arc::clone(&store) as Arc<dyn ObjectStore>);

        let mut req = request(site_zip());
        req.access = AccessMode::Identity(OriginAccessIdentity {
            id: "OAI123".to_owned(),
            canonical_user_id: "canonical-123".to_owned(),
            comment: String::new(),
        });
        deployer.deploy(req).await.expect("deploy");

        let policies = store.policies.lock().expect("lock");
        let policy: serde_json::Value =
            serde_json::from_str(policies.get("demo-site").expect("policy")).expect("json");
        assert_eq!(
            policy["Statement"][0]["Principal"]["CanonicalUser"],
            "canonical-123"
        );
    }
}
