use reqwest::Method;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

use super::transport::{ ApiRequest, RawResponse, ReqwestTransport, Transport };
use crate::configs::ApiConfig;
use crate::error::ApiError;

const DEFAULT_HEADERS: &[(&str, &str)] = &[("Content-Type", "application/json")];
const NO_CONTENT: u16 = 204;

/// Caller-supplied request settings, merged with the defaults on each call.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RequestOptions {
    pub method: Method,
    pub headers: Vec<(String, String)>,
    pub body: Option<String>,
}

impl RequestOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn method(mut self, method: Method) -> Self {
        self.method = method;
        self
    }

    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    pub fn body(mut self, body: impl Into<String>) -> Self {
        self.body = Some(body.into());
        self
    }

    pub fn json<B: Serialize + ?Sized>(self, body: &B) -> Result<Self, ApiError> {
        let body = serde_json::to_string(body).map_err(|e| ApiError::InvalidRequest(e.to_string()))?;
        Ok(self.body(body))
    }

    /// Default headers overlaid with the caller's. Names compare
    /// case-insensitively and the caller's value wins.
    pub fn merged_headers(&self) -> Vec<(String, String)> {
        let mut merged: Vec<(String, String)> = DEFAULT_HEADERS.iter()
            .map(|(name, value)| (name.to_string(), value.to_string()))
            .collect();

        for (name, value) in &self.headers {
            match merged.iter_mut().find(|(existing, _)| existing.eq_ignore_ascii_case(name)) {
                Some(entry) => *entry = (name.clone(), value.clone()),
                None => merged.push((name.clone(), value.clone())),
            }
        }
        merged
    }

    fn into_request(self, url: String) -> ApiRequest {
        let headers = self.merged_headers();
        ApiRequest { method: self.method, url, headers, body: self.body }
    }
}

/// JSON client for the configured API origin.
pub struct ApiClient<T: Transport = ReqwestTransport> {
    config: ApiConfig,
    transport: T,
}

impl ApiClient<ReqwestTransport> {
    pub fn new(config: ApiConfig) -> Self {
        Self::with_transport(config, ReqwestTransport::default())
    }

    pub fn from_env() -> Self {
        Self::new(ApiConfig::from_env())
    }
}

impl<T: Transport> ApiClient<T> {
    pub fn with_transport(config: ApiConfig, transport: T) -> Self {
        Self { config, transport }
    }

    pub fn config(&self) -> &ApiConfig {
        &self.config
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Requests `<base_url><endpoint>` and parses the JSON response.
    ///
    /// Returns `Ok(None)` for `204 No Content`. Every failure is logged with
    /// the endpoint before being returned.
    pub async fn fetch<R: DeserializeOwned>(
        &self,
        endpoint: &str,
        options: RequestOptions
    ) -> Result<Option<R>, ApiError> {
        let result = self.execute(endpoint, options).await;
        if let Err(e) = &result {
            log::error!("API request to {} failed: {}", endpoint, e);
        }
        result
    }

    pub async fn get<R: DeserializeOwned>(&self, endpoint: &str) -> Result<Option<R>, ApiError> {
        self.fetch(endpoint, RequestOptions::new()).await
    }

    pub async fn post_json<B, R>(&self, endpoint: &str, body: &B) -> Result<Option<R>, ApiError>
        where B: Serialize + ?Sized, R: DeserializeOwned
    {
        let options = match RequestOptions::new().method(Method::POST).json(body) {
            Ok(options) => options,
            Err(e) => {
                log::error!("API request to {} failed: {}", endpoint, e);
                return Err(e);
            }
        };
        self.fetch(endpoint, options).await
    }

    async fn execute<R: DeserializeOwned>(
        &self,
        endpoint: &str,
        options: RequestOptions
    ) -> Result<Option<R>, ApiError> {
        let base_url = self.config.base_url().ok_or(ApiError::Configuration)?;
        let request = options.into_request(format!("{}{}", base_url, endpoint));
        log::debug!("{} {}", request.method, request.url);

        let response = self.transport.send(request).await?;
        if !response.is_success() {
            return Err(http_error(&response));
        }
        if response.status == NO_CONTENT {
            return Ok(None);
        }
        Ok(Some(serde_json::from_slice(&response.body)?))
    }
}

/// Builds the error for a failed status, preferring a `message` field in a
/// JSON body over the status text.
fn http_error(response: &RawResponse) -> ApiError {
    let message = serde_json::from_slice::<Value>(&response.body)
        .ok()
        .and_then(|body| body.get("message").and_then(message_text))
        .unwrap_or_else(|| response.status_text.clone());

    ApiError::Http { status: response.status, message }
}

fn message_text(value: &Value) -> Option<String> {
    match value {
        Value::Null | Value::Bool(false) => None,
        Value::String(s) if s.is_empty() => None,
        Value::String(s) => Some(s.clone()),
        Value::Number(n) if n.as_f64() == Some(0.0) => None,
        other => Some(other.to_string()),
    }
}
