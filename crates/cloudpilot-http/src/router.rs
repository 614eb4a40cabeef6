//! Request routing: fixed route table plus query-string helpers.
//!
//! Routes are a closed table of method + path pairs; there are no path
//! parameters. Bucket-addressing operations carry the bucket in the body or
//! query string, so resolution only needs the method and the literal path.

use http::Method;

use cloudpilot_model::{ApiError, ApiOperation};

/// Look up the operation and expected method for a path.
fn route(path: &str) -> Option<(Method, ApiOperation)> {
    use ApiOperation as Op;

    Some(match path {
        // Object storage
        "/s3/create_bucket" => (Method::POST, Op::CreateBucket),
        "/s3/list_buckets" => (Method::GET, Op::ListBuckets),
        "/s3/bucket_info" => (Method::GET, Op::BucketInfo),
        "/s3/upload" => (Method::POST, Op::UploadObject),
        "/s3/delete_bucket" => (Method::POST, Op::DeleteBucket),
        "/s3/list_objects" => (Method::GET, Op::ListObjects),
        "/s3/upload_website" => (Method::POST, Op::UploadWebsite),
        "/s3/enable_static_website" => (Method::POST, Op::EnableStaticWebsite),
        "/set_s3_bucket_policy" => (Method::POST, Op::SetBucketPolicy),

        // Content delivery
        "/create_cloudfront_oai" => (Method::POST, Op::CreateOriginAccessIdentity),
        "/create_cloudfront_distribution" => (Method::POST, Op::CreateDistribution),
        "/cloudfront/create_distribution_for_website" => {
            (Method::POST, Op::CreateDistributionForWebsite)
        }

        // Compute
        "/create_instance" => (Method::POST, Op::CreateInstance),
        "/start_instance" => (Method::POST, Op::StartInstance),
        "/stop_instance" => (Method::POST, Op::StopInstance),
        "/terminate_instance" => (Method::POST, Op::TerminateInstance),
        "/reboot_instance" => (Method::POST, Op::RebootInstance),
        "/monitor_instance" => (Method::POST, Op::MonitorInstance),
        "/unmonitor_instance" => (Method::POST, Op::UnmonitorInstance),
        "/describe_instances" => (Method::GET, Op::DescribeInstances),

        // Metrics
        "/cloudwatch/get_metrics" => (Method::GET, Op::GetMetrics),
        "/cloudwatch/get_alarms" => (Method::GET, Op::GetAlarms),
        "/cloudwatch/get_service_health" => (Method::GET, Op::GetServiceHealth),
        "/cloudwatch/get_insights" => (Method::GET, Op::GetInsights),

        _ => return None,
    })
}

/// Resolve a request method and path to an API operation.
///
/// # Errors
///
/// Returns `NotFound` for unknown paths and `MethodNotAllowed` for known
/// paths requested with the wrong method.
pub fn resolve(method: &Method, path: &str) -> Result<ApiOperation, ApiError> {
    let Some((expected, operation)) = route(path) else {
        return Err(ApiError::not_found(path));
    };
    if *method != expected {
        return Err(ApiError::method_not_allowed(method.as_str()));
    }
    Ok(operation)
}

/// Parse a query string into key-value pairs.
#[must_use]
pub fn parse_query(query: &str) -> Vec<(String, String)> {
    form_urlencoded::parse(query.as_bytes())
        .map(|(k, v)| (k.into_owned(), v.into_owned()))
        .collect()
}

/// Get the value of a query parameter by name.
#[must_use]
pub fn query_value<'a>(params: &'a [(String, String)], key: &str) -> Option<&'a str> {
    params
        .iter()
        .find(|(k, _)| k == key)
        .map(|(_, v)| v.as_str())
}
