// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

use reqwest::header::CONTENT_TYPE;
use reqwest::{Response, Url};
use std::time::Duration;

use crate::errors;
use crate::flusher::ShippingError;
use crate::point::DataPoint;

/// HTTP client for the metrics intake endpoint.
///
/// Ships a batch as a JSON array in a single POST. Status evaluation is left
/// to the caller; only payload preparation and transport failures surface as
/// [`ShippingError`] here.
#[derive(Clone, Debug)]
pub struct IntakeApi {
    client: reqwest::Client,
    endpoint: Url,
}

impl IntakeApi {
    pub fn new(endpoint: Url, request_timeout: Duration) -> Result<Self, errors::Creation> {
        let client = reqwest::Client::builder()
            .timeout(request_timeout)
            .build()?;
        Ok(Self { client, endpoint })
    }

    pub async fn ship_points(&self, batch: &[DataPoint]) -> Result<Response, ShippingError> {
        let body = serde_json::to_vec(batch)
            .map_err(|e| ShippingError::Payload(e.to_string()))?;
        self.client
            .post(self.endpoint.clone())
            .header(CONTENT_TYPE, "application/json")
            .body(body)
            .send()
            .await
            .map_err(|e| ShippingError::Destination(e.status(), e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::{Matcher, Server};
    use serde_json::json;
    use std::collections::HashMap;

    #[tokio::test]
    async fn test_ship_points_posts_json_array() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("POST", "/api/put")
            .match_header("content-type", "application/json")
            .match_body(Matcher::Json(json!([{
                "metric": "test.metric",
                "timestamp": 1_700_000_000,
                "value": 42,
                "tags": {"host": "web01"}
            }])))
            .with_status(204)
            .create_async()
            .await;

        let intake = IntakeApi::new(
            Url::parse(&format!("{}/api/put", server.url())).unwrap(),
            Duration::from_secs(1),
        )
        .unwrap();

        let batch = vec![DataPoint::with_timestamp(
            "test.metric",
            json!(42),
            1_700_000_000,
            HashMap::from([("host".to_string(), "web01".to_string())]),
        )];

        let response = intake.ship_points(&batch).await.expect("request failed");
        assert_eq!(response.status(), reqwest::StatusCode::NO_CONTENT);
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_unreachable_endpoint_is_a_destination_error() {
        // nothing listens on port 1
        let intake = IntakeApi::new(
            Url::parse("http://127.0.0.1:1/api/put").unwrap(),
            Duration::from_millis(250),
        )
        .unwrap();

        let result = intake.ship_points(&[]).await;
        match result {
            Err(ShippingError::Destination(status, _)) => assert!(status.is_none()),
            other => panic!("expected destination error, got {other:?}"),
        }
    }
}
