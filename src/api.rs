use crate::envelope::ListOutcome;
use crate::error::AppError;
use async_trait::async_trait;
use serde::Deserialize;

/// Which backend generation the view talks to.
#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum ApiVersion {
    /// `GET /images`, flat page body.
    V1,
    /// `GET /api/v1/image/`, status/data envelope.
    #[default]
    V2,
}

#[async_trait]
pub trait ImageApi: Send + Sync {
    /// Lists images, filtered by `query` when one is given.
    ///
    /// `Err` is a transport or HTTP failure; an envelope with a non-success
    /// status is `Ok(ListOutcome::Failure)`.
    async fn list_images(&self, query: Option<&str>) -> Result<ListOutcome, AppError>;
}
