mod handle;
mod service;

use crate::error::EnhanceError;
use crate::model::{EnhancementRequest, EnhancementResult, ENHANCE_PATH};
use async_trait::async_trait;

pub use handle::RequestHandle;
pub(crate) use service::is_pdf;
pub use service::ServiceClient;

/// Transport seam between the controller and the enhancement service.
#[async_trait]
pub trait ResumeService: Send + Sync {
    /// POST a JSON body to `path`. Implementations must return
    /// `EnhanceError::Cancelled` instead of a response once `handle` is cancelled.
    async fn post_json(
        &self,
        path: &str,
        body: serde_json::Value,
        handle: &RequestHandle,
    ) -> Result<serde_json::Value, EnhanceError>;

    async fn enhance(
        &self,
        request: &EnhancementRequest,
        handle: &RequestHandle,
    ) -> Result<EnhancementResult, EnhanceError> {
        let body = serde_json::to_value(request)?;
        let value = self.post_json(ENHANCE_PATH, body, handle).await?;
        Ok(serde_json::from_value(value)?)
    }
}
