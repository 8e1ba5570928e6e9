//! HTTPS implementation of the thermostat client

use async_trait::async_trait;
use reqwest::header::{ACCEPT, CONTENT_TYPE};
use reqwest::{Client, RequestBuilder, StatusCode};

use super::{DeviceActionResult, Thermostat};
use crate::Result;
use crate::config::DeviceConfig;

const TEMPERATURE_RESOURCE: &str = "temperature";
const THERMOSTAT_RESOURCE: &str = "thermostat";

/// Reason reported when the getter receives a non-200 status
const STATUS_FAILURE: &str = "failure";

/// Reason reported when the getter receives 200 without a body
const EMPTY_RESPONSE: &str = "empty response";

/// Thermostat reached over HTTP(S)
#[derive(Debug, Clone)]
pub struct HttpThermostat {
    client: Client,
    config: DeviceConfig,
}

impl HttpThermostat {
    /// Create a client for the configured device
    ///
    /// # Errors
    ///
    /// Returns error if the HTTP client cannot be initialized
    pub fn new(config: DeviceConfig) -> Result<Self> {
        let client = Client::builder().build()?;
        Ok(Self { client, config })
    }

    /// PUT a raw value; any received response counts as success
    async fn put(&self, resource: &str, value: &str) -> DeviceActionResult {
        let url = self.config.resource_url(resource);
        tracing::debug!(%url, value, "updating device");

        let result = with_headers(self.client.put(&url))
            .body(value.to_string())
            .send()
            .await;

        match result {
            Ok(response) => {
                let status = response.status();
                if status.is_success() {
                    tracing::info!(%url, status = status.as_u16(), "device updated");
                } else {
                    // The setter contract ignores the status code
                    tracing::warn!(
                        %url,
                        status = status.as_u16(),
                        "device returned non-success status, reporting success"
                    );
                }
                DeviceActionResult::Success
            }
            Err(e) => {
                tracing::warn!(%url, error = %e, "device update failed");
                DeviceActionResult::Failure(format!("failure:{e}"))
            }
        }
    }
}

#[async_trait]
impl Thermostat for HttpThermostat {
    async fn set_temperature(&self, value: &str) -> DeviceActionResult {
        self.put(TEMPERATURE_RESOURCE, value).await
    }

    async fn set_mode(&self, value: &str) -> DeviceActionResult {
        self.put(THERMOSTAT_RESOURCE, value).await
    }

    async fn get_temperature(&self) -> DeviceActionResult {
        let url = self.config.resource_url(TEMPERATURE_RESOURCE);
        tracing::debug!(%url, "reading device temperature");

        let mut response = match with_headers(self.client.get(&url)).send().await {
            Ok(r) => r,
            Err(e) => {
                tracing::warn!(%url, error = %e, "device read failed");
                return DeviceActionResult::Failure(format!("failure:{e}"));
            }
        };

        let status = response.status();
        tracing::info!(%url, status = status.as_u16(), "device responded");
        if status != StatusCode::OK {
            return DeviceActionResult::Failure(STATUS_FAILURE.to_string());
        }

        // Only the first chunk of the body is the reading
        match response.chunk().await {
            Ok(Some(bytes)) => {
                let reading = String::from_utf8_lossy(&bytes).trim().to_string();
                if reading.is_empty() {
                    DeviceActionResult::Failure(EMPTY_RESPONSE.to_string())
                } else {
                    DeviceActionResult::Value(reading)
                }
            }
            Ok(None) => DeviceActionResult::Failure(EMPTY_RESPONSE.to_string()),
            Err(e) => {
                tracing::warn!(%url, error = %e, "failed to read device response body");
                DeviceActionResult::Failure(format!("failure:{e}"))
            }
        }
    }
}

/// Headers sent with every device request
fn with_headers(builder: RequestBuilder) -> RequestBuilder {
    builder
        .header(ACCEPT, "*/*")
        .header(CONTENT_TYPE, "text/plain")
}
