//! Bucket lifecycle integration tests.

#[cfg(test)]
mod tests {
    use crate::{base_url, cleanup_bucket, http_client, test_bucket_name};

    #[tokio::test]
    #[ignore = "requires running server"]
    async fn test_should_create_list_and_delete_bucket() {
        let client = http_client();
        let bucket = test_bucket_name("crud");

        let resp = client
            .post(format!("{}/s3/create_bucket", base_url()))
            .json(&serde_json::json!({ "bucket_name": bucket }))
            .send()
            .await
            .expect("create_bucket");
        assert!(resp.status().is_success(), "create should succeed");

        let listed: serde_json::Value = client
            .get(format!("{}/s3/list_buckets", base_url()))
            .send()
            .await
            .expect("list_buckets")
            .json()
            .await
            .expect("json");
        let names: Vec<&str> = listed["buckets"]
            .as_array()
            .expect("buckets array")
            .iter()
            .filter_map(|b| b["name"].as_str())
            .collect();
        assert!(names.contains(&bucket.as_str()), "should contain {bucket}");

        cleanup_bucket(&client, &bucket).await;
    }

    #[tokio::test]
    #[ignore = "requires running server"]
    async fn test_should_reject_create_without_bucket_name() {
        let client = http_client();

        let resp = client
            .post(format!("{}/s3/create_bucket", base_url()))
            .json(&serde_json::json!({}))
            .send()
            .await
            .expect("request sends");
        assert_eq!(resp.status(), 400);

        let body: serde_json::Value = resp.json().await.expect("json");
        assert!(body["error"].as_str().is_some());
    }

    #[tokio::test]
    #[ignore = "requires running server"]
    async fn test_should_report_zeros_for_unknown_bucket_info() {
        let client = http_client();
        let bucket = test_bucket_name("ghost");

        let body: serde_json::Value = client
            .get(format!("{}/s3/bucket_info", base_url()))
            .query(&[("bucket_name", bucket.as_str())])
            .send()
            .await
            .expect("bucket_info")
            .json()
            .await
            .expect("json");

        assert_eq!(body["size"], 0);
        assert_eq!(body["objects"], 0);
    }
}
