use crate::constants::API_URL_ENV;

/// Settings the fetch wrapper needs. Passed explicitly to [`crate::api::ApiClient`].
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ApiConfig {
    pub base_url: Option<String>,
}

impl ApiConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self { base_url: Some(base_url.into()) }
    }

    /// Reads `API_URL` from the environment, falling back to the value baked in
    /// at compile time (the only source in the browser).
    pub fn from_env() -> Self {
        let base_url = std::env
            ::var(API_URL_ENV)
            .ok()
            .filter(|url| !url.trim().is_empty())
            .or_else(|| compiled_api_url().map(str::to_string));

        match &base_url {
            Some(url) => log::info!("Using API base URL: {}", url),
            None => log::warn!("{} not set, API requests will fail", API_URL_ENV),
        }

        Self { base_url }
    }

    /// The configured base URL, ignoring blank values.
    pub fn base_url(&self) -> Option<&str> {
        self.base_url.as_deref().filter(|url| !url.trim().is_empty())
    }
}

fn compiled_api_url() -> Option<&'static str> {
    option_env!("API_URL").filter(|url| !url.trim().is_empty())
}
