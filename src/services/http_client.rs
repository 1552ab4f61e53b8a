// src/services/http_client.rs
use log::info;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::{Error, Result};
use crate::models::ApiResponse;

/// The portal rejects requests without a browser user agent.
const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) \
     AppleWebKit/537.36 (KHTML, like Gecko) Chrome/141.0.0.0 Safari/537.36 Edg/141.0.0.0";

/// Thin POST-JSON-get-JSON wrapper around the portal endpoints.
pub struct ApiClient {
    client: Client,
}

impl ApiClient {
    pub fn new() -> Result<Self> {
        let client = Client::builder().user_agent(USER_AGENT).build()?;
        Ok(ApiClient { client })
    }

    /// Issues a POST and decodes the portal's `{status, msg?, data?}`
    /// envelope. HTTP-level failures are `Transport`, an undecodable body is
    /// `Parse`. The envelope's own `status` is left for the caller to check.
    pub async fn post_json<T: DeserializeOwned>(
        &self,
        url: &str,
        body: Option<&Value>,
    ) -> Result<ApiResponse<T>> {
        info!("POST {}", url);
        let mut request = self.client.post(url);
        if let Some(body) = body {
            request = request.json(body);
        } else {
            request = request.header("Content-Type", "application/json");
        }
        let response = request.send().await?.error_for_status()?;
        let text = response.text().await?;
        serde_json::from_str(&text).map_err(|e| Error::parse(url, e))
    }
}
