//! Supabase REST client (storage + PostgREST)

use super::{CloudConfig, CloudError, CloudResult, OrderCloud, OrderRecord};
use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use std::time::Duration;

/// HTTP client for one Supabase project
#[derive(Debug, Clone)]
pub struct SupabaseClient {
    client: Client,
    config: CloudConfig,
}

impl SupabaseClient {
    pub fn new(config: CloudConfig) -> CloudResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()?;

        tracing::info!(url = %config.url, bucket = %config.bucket, "Supabase client ready");
        Ok(Self { client, config })
    }

    pub fn config(&self) -> &CloudConfig {
        &self.config
    }

    /// Public URL of an object in the bucket
    pub fn public_url(&self, file_name: &str) -> String {
        format!(
            "{}/storage/v1/object/public/{}/{}",
            self.config.url, self.config.bucket, file_name
        )
    }

    /// Realtime websocket endpoint for this project
    pub fn realtime_url(&self) -> String {
        let ws_url = self
            .config
            .url
            .replace("https://", "wss://")
            .replace("http://", "ws://");
        format!(
            "{}/realtime/v1/websocket?apikey={}&vsn=1.0.0",
            ws_url, self.config.key
        )
    }

    fn object_url(&self, file_name: &str) -> String {
        format!(
            "{}/storage/v1/object/{}/{}",
            self.config.url, self.config.bucket, file_name
        )
    }

    fn authorized(&self, request: RequestBuilder) -> RequestBuilder {
        request
            .bearer_auth(&self.config.key)
            .header("apikey", &self.config.key)
    }
}

#[async_trait]
impl OrderCloud for SupabaseClient {
    async fn upload(
        &self,
        file_name: &str,
        bytes: Vec<u8>,
        content_type: &str,
    ) -> CloudResult<String> {
        let response = self
            .authorized(self.client.post(self.object_url(file_name)))
            .header(reqwest::header::CONTENT_TYPE, content_type)
            .body(bytes)
            .send()
            .await?;
        check_status(response, file_name).await?;

        tracing::info!(file = %file_name, "Uploaded to storage");
        Ok(self.public_url(file_name))
    }

    async fn download(&self, file_name: &str) -> CloudResult<Vec<u8>> {
        let response = self
            .authorized(self.client.get(self.object_url(file_name)))
            .send()
            .await?;
        let response = check_status(response, file_name).await?;
        let bytes = response.bytes().await?;

        tracing::debug!(file = %file_name, size = bytes.len(), "Downloaded from storage");
        Ok(bytes.to_vec())
    }

    async fn insert_order(&self, record: &OrderRecord) -> CloudResult<()> {
        let url = format!("{}/rest/v1/{}", self.config.url, self.config.orders_table);
        let response = self
            .authorized(self.client.post(url))
            .header("Prefer", "return=minimal")
            .json(record)
            .send()
            .await?;
        check_status(response, &self.config.orders_table).await?;

        tracing::debug!(order_id = record.id, "Order row inserted");
        Ok(())
    }
}

/// Map non-success responses to [`CloudError`]
async fn check_status(response: Response, what: &str) -> CloudResult<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    if is_not_found(status, &body) {
        return Err(CloudError::NotFound(what.to_string()));
    }
    Err(CloudError::Http {
        status: status.as_u16(),
        body,
    })
}

/// Storage reports a missing object as 404, or as 400 with a
/// `not_found` / "Object not found" body
fn is_not_found(status: StatusCode, body: &str) -> bool {
    if status == StatusCode::NOT_FOUND {
        return true;
    }
    let body = body.to_lowercase();
    status == StatusCode::BAD_REQUEST
        && (body.contains("not_found") || body.contains("not found"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client() -> SupabaseClient {
        SupabaseClient::new(CloudConfig {
            url: "https://abc.supabase.co".into(),
            key: "service-key".into(),
            bucket: "orders".into(),
            orders_table: "orders".into(),
        })
        .unwrap()
    }

    #[test]
    fn test_urls() {
        let c = client();
        assert_eq!(
            c.public_url("order_3.txt"),
            "https://abc.supabase.co/storage/v1/object/public/orders/order_3.txt"
        );
        assert_eq!(
            c.object_url("order_3.txt"),
            "https://abc.supabase.co/storage/v1/object/orders/order_3.txt"
        );
        assert_eq!(
            c.realtime_url(),
            "wss://abc.supabase.co/realtime/v1/websocket?apikey=service-key&vsn=1.0.0"
        );
    }

    #[test]
    fn test_not_found_detection() {
        assert!(is_not_found(StatusCode::NOT_FOUND, ""));
        assert!(is_not_found(
            StatusCode::BAD_REQUEST,
            r#"{"statusCode":"404","error":"not_found","message":"Object not found"}"#
        ));
        assert!(!is_not_found(StatusCode::BAD_REQUEST, "invalid key"));
        assert!(!is_not_found(StatusCode::INTERNAL_SERVER_ERROR, "not found"));
    }
}
