use crate::api::{ApiVersion, ImageApi};
use crate::config::AppConfig;
use crate::envelope::{self, ListOutcome};
use crate::error::AppError;
use async_trait::async_trait;
use std::time::Duration;
use url::Url;

/// Talks to the archive backend over HTTP.
pub struct HttpImageApi {
    client: reqwest::Client,
    list_url: Url,
    version: ApiVersion,
}

impl HttpImageApi {
    pub fn new(config: &AppConfig) -> Result<Self, AppError> {
        let base = Url::parse(&config.api_base_url)?;
        Self::with_base(
            base,
            config.api_version,
            Duration::from_secs(config.request_timeout_secs),
        )
    }

    pub fn with_base(mut base: Url, version: ApiVersion, timeout: Duration) -> Result<Self, AppError> {
        // `join` drops the last path segment unless the base ends in a slash.
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }
        let list_url = base.join(list_path(version))?;
        log::debug!("Creating {:?} image API client for URL: {}", version, list_url);

        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self { client, list_url, version })
    }
}

fn list_path(version: ApiVersion) -> &'static str {
    match version {
        ApiVersion::V1 => "images",
        ApiVersion::V2 => "api/v1/image/",
    }
}

#[async_trait]
impl ImageApi for HttpImageApi {
    async fn list_images(&self, query: Option<&str>) -> Result<ListOutcome, AppError> {
        log::debug!("Listing images with query: {:?}", query);

        let mut request = self.client.get(self.list_url.clone());
        if let Some(q) = query {
            request = request.query(&[("q", q)]);
        }

        let response = request.send().await?;
        let status = response.status();
        let body = response.bytes().await?;
        log::trace!("Backend answered {} with {} bytes", status, body.len());

        if !status.is_success() {
            let message = envelope::error_message(status.as_u16(), status.canonical_reason(), &body);
            log::warn!("Image listing failed with {}: {}", status, message);
            return Err(AppError::Api { status: status.as_u16(), message });
        }

        match self.version {
            ApiVersion::V1 => envelope::parse_v1(&body),
            ApiVersion::V2 => envelope::parse_v2(&body),
        }
    }
}
