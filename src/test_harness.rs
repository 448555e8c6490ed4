//! Integration test harness for a mock platform server
//!
//! This module provides utilities for running integration tests against a
//! mock reporting platform instead of requiring real infrastructure.

use mockito::{Mock, Server, ServerGuard};
use serde_json::json;

/// A test harness that sets up a mock platform server
pub struct TestHarness {
    pub server: ServerGuard,
}

impl TestHarness {
    /// Create a new test harness with a mock server
    pub async fn new() -> Self {
        let server = Server::new_async().await;
        Self { server }
    }

    /// Get the mock server URL
    pub fn url(&self) -> String {
        self.server.url()
    }

    /// Mock a service endpoint answering with a success envelope
    pub fn mock_post_success(&mut self, service: &str, code: i64, msg: &str) -> Mock {
        self.server
            .mock("POST", format!("/api/{}", service).as_str())
            .match_header(
                "authorization",
                mockito::Matcher::Regex(r"Bearer .+".to_string()),
            )
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(json!({"code": code, "msg": msg, "data": null}).to_string())
            .create()
    }

    /// Mock a service endpoint that additionally asserts the exact JSON
    /// body it receives
    pub fn mock_post_expecting(
        &mut self,
        service: &str,
        expected_body: serde_json::Value,
    ) -> Mock {
        self.server
            .mock("POST", format!("/api/{}", service).as_str())
            .match_header(
                "authorization",
                mockito::Matcher::Regex(r"Bearer .+".to_string()),
            )
            .match_body(mockito::Matcher::Json(expected_body))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(json!({"code": 0, "msg": "ok", "data": null}).to_string())
            .create()
    }

    /// Mock a service endpoint answering with a failure status
    pub fn mock_post_failure(&mut self, service: &str, status: usize, error_message: &str) -> Mock {
        self.server
            .mock("POST", format!("/api/{}", service).as_str())
            .with_status(status)
            .with_header("content-type", "application/json")
            .with_body(json!({"error": error_message}).to_string())
            .create()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::FieldType;
    use crate::registry::{FieldDef, Shape, VariantDescriptor, VariantRegistry};
    use crate::service_client::ServiceClient;
    use crate::uploader::Uploader;
    use serde_json::{json, Value};

    fn test_registry() -> VariantRegistry {
        let mut registry = VariantRegistry::new();
        registry.register(VariantDescriptor::new(
            "NewbornVisit",
            vec![
                Shape::new(vec![
                    FieldDef::new("id", FieldType::Int),
                    FieldDef::new("name", FieldType::Text),
                    FieldDef::new("weight", FieldType::Double),
                    FieldDef::new("visitTime", FieldType::Date),
                ]),
                Shape::new(vec![
                    FieldDef::new("id", FieldType::Int),
                    FieldDef::new("name", FieldType::Text),
                ]),
            ],
        ));
        registry
    }

    fn uploader_for(harness: &TestHarness) -> Uploader {
        Uploader::new(
            test_registry(),
            ServiceClient::new(harness.url(), "test-access-token".to_string()),
        )
    }

    #[tokio::test]
    async fn test_upload_rows_success_returns_envelope_json() {
        let mut harness = TestHarness::new().await;
        let _mock = harness.mock_post_success("uploadNewbornVisit", 0, "上传成功");

        let uploader = uploader_for(&harness);
        let rows = vec![
            json!([1, "甲", 3.2, "2024-03-05 08:30:00"]),
            json!([2, "乙", null, null]),
        ];

        let result = uploader
            .upload_rows("NewbornVisit", "uploadNewbornVisit", &rows)
            .await;

        assert!(!result.starts_with("ERROR"));
        let envelope: Value = serde_json::from_str(&result).unwrap();
        assert_eq!(envelope["code"], 0);
        assert_eq!(envelope["msg"], "上传成功");
        assert!(envelope["data"].is_null());
    }

    #[tokio::test]
    async fn test_upload_rows_posts_sequence_numbered_batch() {
        let mut harness = TestHarness::new().await;
        let mock = harness.mock_post_expecting(
            "uploadNewbornVisit",
            json!([
                {"id": 1, "name": "甲", "weight": 3.2, "visitTime": "2024-03-05 08:30:00", "seqNum": 1},
                {"id": 2, "name": "乙", "weight": null, "visitTime": null, "seqNum": 2}
            ]),
        );

        let uploader = uploader_for(&harness);
        let rows = vec![
            json!([1, "甲", 3.2, "2024-03-05 08:30:00"]),
            json!([2, "乙", null, null]),
        ];

        let result = uploader
            .upload_rows("NewbornVisit", "uploadNewbornVisit", &rows)
            .await;

        assert!(!result.starts_with("ERROR"), "got: {}", result);
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_mismatched_row_is_dropped_and_keeps_its_sequence_number() {
        let mut harness = TestHarness::new().await;
        // Row 2 has the wrong arity: the batch carries rows 1 and 3 only,
        // with seqNum 1 and 3.
        let mock = harness.mock_post_expecting(
            "uploadNewbornVisit",
            json!([
                {"id": 1, "name": "甲", "seqNum": 1},
                {"id": 3, "name": "丙", "seqNum": 3}
            ]),
        );

        let uploader = uploader_for(&harness);
        let rows = vec![
            json!([1, "甲"]),
            json!([2, "乙", 3.1]),
            json!([3, "丙"]),
        ];

        let result = uploader
            .upload_rows("NewbornVisit", "uploadNewbornVisit", &rows)
            .await;

        assert!(!result.starts_with("ERROR"), "got: {}", result);
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_upload_json_matches_fields_by_name() {
        let mut harness = TestHarness::new().await;
        let mock = harness.mock_post_expecting(
            "uploadNewbornVisit",
            json!([
                {"id": 7, "name": "丁", "weight": 3.4, "visitTime": "2024-03-05 08:30:00", "seqNum": 1}
            ]),
        );

        let uploader = uploader_for(&harness);
        let objects = vec![json!({
            "visitTime": "2024-03-05 08:30:00",
            "weight": 3.4,
            "name": "丁",
            "id": 7,
            "ignoredKey": "dropped"
        })];

        let result = uploader
            .upload_json("NewbornVisit", "uploadNewbornVisit", &objects)
            .await;

        assert!(!result.starts_with("ERROR"), "got: {}", result);
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_upload_json_missing_fields_become_null() {
        let mut harness = TestHarness::new().await;
        let mock = harness.mock_post_expecting(
            "uploadNewbornVisit",
            json!([
                {"id": 7, "name": null, "weight": null, "visitTime": null, "seqNum": 1}
            ]),
        );

        let uploader = uploader_for(&harness);
        let objects = vec![json!({"id": 7})];

        let result = uploader
            .upload_json("NewbornVisit", "uploadNewbornVisit", &objects)
            .await;

        assert!(!result.starts_with("ERROR"), "got: {}", result);
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_rows_and_json_produce_the_same_batch() {
        let expected = json!([
            {"id": 1, "name": "甲", "weight": 3.2, "visitTime": "2024-03-05 08:30:00", "seqNum": 1},
            {"id": 2, "name": "乙", "weight": null, "visitTime": null, "seqNum": 2}
        ]);

        let mut rows_harness = TestHarness::new().await;
        let rows_mock = rows_harness.mock_post_expecting("uploadNewbornVisit", expected.clone());
        let uploader = uploader_for(&rows_harness);
        let rows = vec![
            json!([1, "甲", 3.2, "2024-03-05 08:30:00"]),
            json!([2, "乙", null, null]),
        ];
        let result = uploader
            .upload_rows("NewbornVisit", "uploadNewbornVisit", &rows)
            .await;
        assert!(!result.starts_with("ERROR"), "got: {}", result);
        rows_mock.assert_async().await;

        let mut json_harness = TestHarness::new().await;
        let json_mock = json_harness.mock_post_expecting("uploadNewbornVisit", expected);
        let uploader = uploader_for(&json_harness);
        let objects = vec![
            json!({"id": 1, "name": "甲", "weight": 3.2, "visitTime": "2024-03-05 08:30:00"}),
            json!({"id": 2, "name": "乙", "weight": null, "visitTime": null}),
        ];
        let result = uploader
            .upload_json("NewbornVisit", "uploadNewbornVisit", &objects)
            .await;
        assert!(!result.starts_with("ERROR"), "got: {}", result);
        json_mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_server_failure_yields_error_text() {
        let mut harness = TestHarness::new().await;
        let _mock = harness.mock_post_failure("uploadNewbornVisit", 500, "Internal server error");

        let uploader = uploader_for(&harness);
        let rows = vec![json!([1, "甲"])];

        let result = uploader
            .upload_rows("NewbornVisit", "uploadNewbornVisit", &rows)
            .await;

        assert!(result.starts_with("ERROR - "));
        assert!(result.contains("500"));
    }

    #[tokio::test]
    async fn test_undecodable_envelope_yields_error_text() {
        let mut harness = TestHarness::new().await;
        let _mock = harness
            .server
            .mock("POST", "/api/uploadNewbornVisit")
            .with_status(200)
            .with_header("content-type", "text/plain")
            .with_body("not json")
            .create();

        let uploader = uploader_for(&harness);
        let rows = vec![json!([1, "甲"])];

        let result = uploader
            .upload_rows("NewbornVisit", "uploadNewbornVisit", &rows)
            .await;

        assert!(result.starts_with("ERROR - "));
    }
}
