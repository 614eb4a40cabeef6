//! Service-level integration tests.

#[cfg(test)]
mod tests {
    use crate::{base_url, http_client};

    #[tokio::test]
    #[ignore = "requires running server"]
    async fn test_should_report_health() {
        let client = http_client();

        let body: serde_json::Value = client
            .get(format!("{}/health", base_url()))
            .send()
            .await
            .expect("health")
            .json()
            .await
            .expect("json");

        assert_eq!(body["status"], "running");
        assert_eq!(body["service"], "cloudpilot");
    }

    #[tokio::test]
    #[ignore = "requires running server"]
    async fn test_should_return_404_with_error_body_for_unknown_route() {
        let client = http_client();

        let resp = client
            .get(format!("{}/nope", base_url()))
            .send()
            .await
            .expect("request sends");
        assert_eq!(resp.status(), 404);

        let body: serde_json::Value = resp.json().await.expect("json");
        assert!(body["error"].as_str().is_some());
    }

    #[tokio::test]
    #[ignore = "requires running server"]
    async fn test_should_report_service_health_snapshot() {
        let client = http_client();

        let body: serde_json::Value = client
            .get(format!("{}/cloudwatch/get_service_health", base_url()))
            .send()
            .await
            .expect("get_service_health")
            .json()
            .await
            .expect("json");

        assert_eq!(body["health_metrics"]["S3"]["status"], "healthy");
        assert_eq!(body["health_metrics"]["EC2"]["status"], "healthy");
    }
}
