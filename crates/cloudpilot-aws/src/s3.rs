//! S3-backed object store.

use async_trait::async_trait;
use aws_sdk_s3::primitives::ByteStream;
use aws_sdk_s3::types::{
    BucketLocationConstraint, CreateBucketConfiguration, Delete, ErrorDocument, IndexDocument,
    ObjectIdentifier, WebsiteConfiguration,
};
use bytes::Bytes;
use tracing::debug;

use cloudpilot_core::provider::{BucketStats, BucketSummary, ObjectStore, ObjectSummary};
use cloudpilot_core::{AwsRegion, ProviderError, ProviderResult};

use crate::error::{build_error, sdk_error};

/// Object store backed by the AWS S3 API.
#[derive(Debug, Clone)]
pub struct AwsObjectStore {
    client: aws_sdk_s3::Client,
}

impl AwsObjectStore {
    /// Wrap an S3 client.
    #[must_use]
    pub fn new(client: aws_sdk_s3::Client) -> Self {
        Self { client }
    }

    /// Delete every object in a bucket, page by page.
    async fn delete_bucket_contents(&self, bucket: &str) -> ProviderResult<()> {
        let mut pages = self
            .client
            .list_objects_v2()
            .bucket(bucket)
            .into_paginator()
            .send();

        while let Some(page) = pages.next().await {
            let page = page.map_err(|e| sdk_error("s3", e))?;

            let objects: Vec<ObjectIdentifier> = page
                .contents()
                .iter()
                .filter_map(|obj| obj.key().map(ToOwned::to_owned))
                .map(|key| {
                    ObjectIdentifier::builder()
                        .key(key)
                        .build()
                        .map_err(|e| build_error("s3", e))
                })
                .collect::<ProviderResult<_>>()?;

            if objects.is_empty() {
                continue;
            }

            let count = objects.len();
            let delete = Delete::builder()
                .set_objects(Some(objects))
                .build()
                .map_err(|e| build_error("s3", e))?;

            self.client
                .delete_objects()
                .bucket(bucket)
                .delete(delete)
                .send()
                .await
                .map_err(|e| sdk_error("s3", e))?;

            debug!(bucket = %bucket, deleted = count, "deleted bucket contents page");
        }

        Ok(())
    }
}

/// Map a reported location constraint to a region; the default region is
/// reported as an absent or empty constraint.
fn location_to_region(constraint: Option<&str>) -> AwsRegion {
    match constraint {
        Some(region) if !region.is_empty() => AwsRegion::new(region),
        _ => AwsRegion::default(),
    }
}

#[async_trait]
impl ObjectStore for AwsObjectStore {
    async fn create_bucket(&self, bucket: &str, region: &AwsRegion) -> ProviderResult<()> {
        let mut request = self.client.create_bucket().bucket(bucket);

        // The default region rejects an explicit location constraint.
        if !region.is_default() {
            request = request.create_bucket_configuration(
                CreateBucketConfiguration::builder()
                    .location_constraint(BucketLocationConstraint::from(region.as_str()))
                    .build(),
            );
        }

        request.send().await.map_err(|e| sdk_error("s3", e))?;
        debug!(bucket = %bucket, region = %region, "create_bucket completed");
        Ok(())
    }

    async fn bucket_exists(&self, bucket: &str) -> ProviderResult<bool> {
        match self.client.head_bucket().bucket(bucket).send().await {
            Ok(_) => Ok(true),
            Err(e) if e.as_service_error().is_some_and(|se| se.is_not_found()) => Ok(false),
            Err(e) => Err(sdk_error("s3", e)),
        }
    }

    async fn delete_bucket(&self, bucket: &str) -> ProviderResult<()> {
        self.delete_bucket_contents(bucket).await?;
        self.client
            .delete_bucket()
            .bucket(bucket)
            .send()
            .await
            .map_err(|e| sdk_error("s3", e))?;
        debug!(bucket = %bucket, "delete_bucket completed");
        Ok(())
    }

    async fn list_buckets(&self) -> ProviderResult<Vec<BucketSummary>> {
        let response = self
            .client
            .list_buckets()
            .send()
            .await
            .map_err(|e| sdk_error("s3", e))?;

        Ok(response
            .buckets()
            .iter()
            .map(|bucket| BucketSummary {
                name: bucket.name().unwrap_or_default().to_owned(),
                creation_date: bucket.creation_date().map(ToString::to_string),
            })
            .collect())
    }

    async fn list_objects(&self, bucket: &str) -> ProviderResult<Vec<ObjectSummary>> {
        let response = self
            .client
            .list_objects_v2()
            .bucket(bucket)
            .send()
            .await
            .map_err(|e| sdk_error("s3", e))?;

        Ok(response
            .contents()
            .iter()
            .map(|obj| ObjectSummary {
                key: obj.key().unwrap_or_default().to_owned(),
                size: obj.size().unwrap_or(0),
                last_modified: obj.last_modified().map(ToString::to_string),
            })
            .collect())
    }

    async fn bucket_stats(&self, bucket: &str) -> ProviderResult<BucketStats> {
        let mut pages = self
            .client
            .list_objects_v2()
            .bucket(bucket)
            .into_paginator()
            .send();

        let mut stats = BucketStats::default();
        while let Some(page) = pages.next().await {
            let page = page.map_err(|e| {
                if e.as_service_error().is_some_and(|se| se.is_no_such_bucket()) {
                    ProviderError::NoSuchBucket(bucket.to_owned())
                } else {
                    sdk_error("s3", e)
                }
            })?;

            for obj in page.contents() {
                stats.object_count += 1;
                stats.size_bytes += obj.size().unwrap_or(0);
            }
        }

        Ok(stats)
    }

    async fn bucket_location(&self, bucket: &str) -> ProviderResult<AwsRegion> {
        let response = self
            .client
            .get_bucket_location()
            .bucket(bucket)
            .send()
            .await
            .map_err(|e| sdk_error("s3", e))?;

        Ok(location_to_region(
            response.location_constraint().map(|c| c.as_str()),
        ))
    }

    async fn put_object(
        &self,
        bucket: &str,
        key: &str,
        body: Bytes,
        content_type: &str,
    ) -> ProviderResult<()> {
        self.client
            .put_object()
            .bucket(bucket)
            .key(key)
            .content_type(content_type)
            .body(ByteStream::from(body))
            .send()
            .await
            .map_err(|e| sdk_error("s3", e))?;
        debug!(bucket = %bucket, key = %key, content_type = %content_type, "put_object completed");
        Ok(())
    }

    async fn put_bucket_website(
        &self,
        bucket: &str,
        index_document: &str,
        error_document: &str,
    ) -> ProviderResult<()> {
        let configuration = WebsiteConfiguration::builder()
            .index_document(
                IndexDocument::builder()
                    .suffix(index_document)
                    .build()
                    .map_err(|e| build_error("s3", e))?,
            )
            .error_document(
                ErrorDocument::builder()
                    .key(error_document)
                    .build()
                    .map_err(|e| build_error("s3", e))?,
            )
            .build();

        self.client
            .put_bucket_website()
            .bucket(bucket)
            .website_configuration(configuration)
            .send()
            .await
            .map_err(|e| sdk_error("s3", e))?;
        debug!(bucket = %bucket, "put_bucket_website completed");
        Ok(())
    }

    async fn put_bucket_policy(&self, bucket: &str, policy_json: &str) -> ProviderResult<()> {
        self.client
            .put_bucket_policy()
            .bucket(bucket)
            .policy(policy_json)
            .send()
            .await
            .map_err(|e| sdk_error("s3", e))?;
        debug!(bucket = %bucket, "put_bucket_policy completed");
        Ok(())
    }
}
