//! Website deployment pipeline integration tests.

#[cfg(test)]
mod tests {
    use reqwest::multipart;

    use crate::{base_url, build_site_zip, cleanup_bucket, http_client, test_bucket_name};

    fn site_form(bucket: &str, archive: Vec<u8>) -> multipart::Form {
        multipart::Form::new()
            .text("bucket_name", bucket.to_owned())
            .part(
                "website",
                multipart::Part::bytes(archive)
                    .file_name("website.zip")
                    .mime_str("application/zip")
                    .expect("valid mime"),
            )
    }

    #[tokio::test]
    #[ignore = "requires running server"]
    async fn test_should_deploy_site_and_report_files_in_order() {
        let client = http_client();
        let bucket = test_bucket_name("deploy");
        let archive = build_site_zip(&[
            ("index.html", b"<html></html>" as &[u8]),
            ("style.css", b"body {}"),
            ("img/logo.png", b"\x89PNG"),
        ]);

        let body: serde_json::Value = client
            .post(format!("{}/s3/upload_website", base_url()))
            .multipart(site_form(&bucket, archive))
            .send()
            .await
            .expect("upload_website")
            .json()
            .await
            .expect("json");

        assert_eq!(body["message"], "Website uploaded successfully");
        assert_eq!(
            body["files"],
            serde_json::json!(["index.html", "style.css", "img/logo.png"])
        );
        assert_eq!(body["policy_applied"], true);
        assert!(
            body["website_url"]
                .as_str()
                .is_some_and(|url| url.starts_with(&format!("http://{bucket}.s3-website-")))
        );

        cleanup_bucket(&client, &bucket).await;
    }

    #[tokio::test]
    #[ignore = "requires running server"]
    async fn test_should_be_idempotent_across_redeploys() {
        let client = http_client();
        let bucket = test_bucket_name("redeploy");
        let entries: &[(&str, &[u8])] = &[("index.html", b"<html></html>")];

        for _ in 0..2 {
            let body: serde_json::Value = client
                .post(format!("{}/s3/upload_website", base_url()))
                .multipart(site_form(&bucket, build_site_zip(entries)))
                .send()
                .await
                .expect("upload_website")
                .json()
                .await
                .expect("json");
            assert_eq!(body["files"], serde_json::json!(["index.html"]));
        }

        let info: serde_json::Value = client
            .get(format!("{}/s3/bucket_info", base_url()))
            .query(&[("bucket_name", bucket.as_str())])
            .send()
            .await
            .expect("bucket_info")
            .json()
            .await
            .expect("json");
        assert_eq!(info["objects"], 1, "redeploy must not accumulate objects");

        cleanup_bucket(&client, &bucket).await;
    }

    #[tokio::test]
    #[ignore = "requires running server"]
    async fn test_should_drop_traversal_entries_from_deployment() {
        let client = http_client();
        let bucket = test_bucket_name("traversal");
        let archive = build_site_zip(&[
            ("../../etc/passwd", b"root" as &[u8]),
            ("index.html", b"<html></html>"),
        ]);

        let body: serde_json::Value = client
            .post(format!("{}/s3/upload_website", base_url()))
            .multipart(site_form(&bucket, archive))
            .send()
            .await
            .expect("upload_website")
            .json()
            .await
            .expect("json");

        assert_eq!(body["files"], serde_json::json!(["index.html"]));
        assert_eq!(body["failures"], serde_json::json!([]));

        cleanup_bucket(&client, &bucket).await;
    }

    #[tokio::test]
    #[ignore = "requires running server"]
    async fn test_should_reject_corrupt_archive() {
        let client = http_client();
        let bucket = test_bucket_name("corrupt");

        let resp = client
            .post(format!("{}/s3/upload_website", base_url()))
            .multipart(site_form(&bucket, b"not a zip".to_vec()))
            .send()
            .await
            .expect("request sends");

        assert_eq!(resp.status(), 400);
    }

    #[tokio::test]
    #[ignore = "requires running server"]
    async fn test_should_enable_static_website_after_manual_uploads() {
        let client = http_client();
        let bucket = test_bucket_name("hosting");

        client
            .post(format!("{}/s3/create_bucket", base_url()))
            .json(&serde_json::json!({ "bucket_name": bucket }))
            .send()
            .await
            .expect("create_bucket");

        let body: serde_json::Value = client
            .post(format!("{}/s3/enable_static_website", base_url()))
            .json(&serde_json::json!({ "bucket_name": bucket }))
            .send()
            .await
            .expect("enable_static_website")
            .json()
            .await
            .expect("json");

        assert_eq!(body["message"], "Static website hosting enabled");
        assert!(body["website_url"].as_str().is_some());

        cleanup_bucket(&client, &bucket).await;
    }
}
