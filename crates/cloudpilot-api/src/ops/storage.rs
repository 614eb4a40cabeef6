//! Object storage handlers.

use tracing::info;

use cloudpilot_core::AwsRegion;
use cloudpilot_core::ProviderError;
use cloudpilot_deploy::classify;
use cloudpilot_deploy::policy::AccessPolicy;
use cloudpilot_http::body::ApiBody;
use cloudpilot_http::multipart::{extract_boundary, parse_multipart};
use cloudpilot_http::response::ok_json;
use cloudpilot_model::input::{
    BucketInput, CreateBucketInput, EnableStaticWebsiteInput, SetBucketPolicyInput,
};
use cloudpilot_model::output::{
    BucketInfoResponse, EnableStaticWebsiteResponse, ListBucketsResponse, ListObjectsResponse,
    MessageResponse, UploadObjectResponse,
};
use cloudpilot_model::{ApiError, ApiResult};

use crate::handler::{CloudPilot, parse_json, require, require_query};

impl CloudPilot {
    /// `POST /s3/create_bucket`
    pub(crate) async fn create_bucket(&self, body: &[u8]) -> ApiResult<http::Response<ApiBody>> {
        let input: CreateBucketInput = parse_json(body)?;
        let bucket = require(input.bucket_name, "bucket_name")?;
        let region = input
            .region
            .map_or_else(|| self.config.default_region.clone(), AwsRegion::new);

        self.store.create_bucket(&bucket, &region).await?;
        info!(bucket = %bucket, region = %region, "created bucket");
        Ok(ok_json(&MessageResponse::new(format!(
            "Bucket {bucket} created"
        ))))
    }

    /// `GET /s3/list_buckets`
    pub(crate) async fn list_buckets(&self) -> ApiResult<http::Response<ApiBody>> {
        let buckets = self.store.list_buckets().await?;
        Ok(ok_json(&ListBucketsResponse { buckets }))
    }

    /// `GET /s3/bucket_info`
    pub(crate) async fn bucket_info(
        &self,
        parts: &http::request::Parts,
    ) -> ApiResult<http::Response<ApiBody>> {
        let bucket = require_query(parts, "bucket_name")?;

        // A missing bucket reports zeros rather than an error so the console
        // can poll buckets that are still being created.
        let stats = match self.store.bucket_stats(&bucket).await {
            Ok(stats) => stats,
            Err(ProviderError::NoSuchBucket(_)) => cloudpilot_core::provider::BucketStats::default(),
            Err(e) => return Err(e.into()),
        };

        Ok(ok_json(&BucketInfoResponse {
            bucket_name: bucket,
            size: stats.size_bytes,
            objects: stats.object_count,
        }))
    }

    /// `POST /s3/upload`
    pub(crate) async fn upload_object(
        &self,
        parts: &http::request::Parts,
        body: &[u8],
    ) -> ApiResult<http::Response<ApiBody>> {
        let form = parse_form(parts, body)?;
        let Some(file) = form.file("file") else {
            return Err(ApiError::invalid_request("No file part"));
        };
        let bucket = require(form.field("bucket_name").map(ToOwned::to_owned), "bucket_name")?;

        let filename = sanitize_filename(file.filename.as_deref().unwrap_or_default());
        if filename.is_empty() {
            return Err(ApiError::invalid_request("Invalid filename"));
        }

        let content_type = file
            .content_type
            .clone()
            .unwrap_or_else(|| classify(&filename).to_owned());

        self.store
            .put_object(&bucket, &filename, file.data.clone(), &content_type)
            .await?;

        info!(bucket = %bucket, key = %filename, "uploaded object");
        Ok(ok_json(&UploadObjectResponse {
            message: "File uploaded successfully".to_owned(),
            url: format!("https://{bucket}.s3.amazonaws.com/{filename}"),
            filename,
        }))
    }

    /// `POST /s3/delete_bucket`
    pub(crate) async fn delete_bucket(&self, body: &[u8]) -> ApiResult<http::Response<ApiBody>> {
        let input: BucketInput = parse_json(body)?;
        let bucket = require(input.bucket_name, "bucket_name")?;

        self.store.delete_bucket(&bucket).await?;
        info!(bucket = %bucket, "deleted bucket");
        Ok(ok_json(&MessageResponse::new(format!(
            "Bucket {bucket} deleted"
        ))))
    }

    /// `GET /s3/list_objects`
    pub(crate) async fn list_objects(
        &self,
        parts: &http::request::Parts,
    ) -> ApiResult<http::Response<ApiBody>> {
        let bucket = require_query(parts, "bucket_name")?;

        let mut objects = self.store.list_objects(&bucket).await?;
        objects.sort_by(|a, b| b.last_modified.cmp(&a.last_modified));

        Ok(ok_json(&ListObjectsResponse {
            bucket_name: bucket,
            objects,
        }))
    }

    /// `POST /s3/enable_static_website`
    pub(crate) async fn enable_static_website(
        &self,
        body: &[u8],
    ) -> ApiResult<http::Response<ApiBody>> {
        let input: EnableStaticWebsiteInput = parse_json(body)?;
        let bucket = require(input.bucket_name, "bucket_name")?;
        let index_document = input.index_document.unwrap_or_else(|| "index.html".to_owned());
        let error_document = input.error_document.unwrap_or_else(|| "error.html".to_owned());

        self.store
            .put_bucket_website(&bucket, &index_document, &error_document)
            .await?;
        self.store
            .put_bucket_policy(&bucket, &AccessPolicy::public_read(&bucket).to_json())
            .await?;

        let region = self.store.bucket_location(&bucket).await?;
        info!(bucket = %bucket, region = %region, "enabled static website hosting");
        Ok(ok_json(&EnableStaticWebsiteResponse {
            message: "Static website hosting enabled".to_owned(),
            website_url: region.website_url(&bucket),
        }))
    }

    /// `POST /set_s3_bucket_policy`
    pub(crate) async fn set_bucket_policy(&self, body: &[u8]) -> ApiResult<http::Response<ApiBody>> {
        let input: SetBucketPolicyInput = parse_json(body)?;
        let bucket = require(input.bucket_name, "bucket_name")?;
        let oai_id = require(input.oai_id, "oai_id")?;

        let identity = self.cdn.origin_access_identity(&oai_id).await?;
        let policy = AccessPolicy::identity_scoped(&bucket, &identity.canonical_user_id);
        self.store
            .put_bucket_policy(&bucket, &policy.to_json())
            .await?;

        info!(bucket = %bucket, oai_id = %oai_id, "set identity-scoped bucket policy");
        Ok(ok_json(&MessageResponse::new(format!(
            "Bucket policy set for {bucket}"
        ))))
    }
}

/// Parse a multipart form from the request parts and body.
pub(crate) fn parse_form(
    parts: &http::request::Parts,
    body: &[u8],
) -> ApiResult<cloudpilot_http::multipart::MultipartForm> {
    let content_type = parts
        .headers
        .get(http::header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .ok_or_else(|| ApiError::invalid_request("missing Content-Type header"))?;

    let boundary = extract_boundary(content_type)?;
    parse_multipart(body, &boundary)
}

/// Reduce a client-supplied file name to a safe object key: the base name
/// with anything outside `[A-Za-z0-9._-]` removed.
pub(crate) fn sanitize_filename(name: &str) -> String {
    let base = name.rsplit(['/', '\\']).next().unwrap_or(name);
    base.chars()
        .filter(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-'))
        .collect()
}
