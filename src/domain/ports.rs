use crate::utils::error::Result;
use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

/// Destination for uploaded image files.
pub trait Storage: Send + Sync {
    fn write_file(
        &self,
        path: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<()>> + Send;
}

/// External multimodal model: image plus instruction text in, free text out.
#[async_trait]
pub trait VisionClient: Send + Sync {
    /// Returns the trimmed response text, or a `ConfigError`/`ModelError`.
    async fn invoke(
        &self,
        image_data: &[u8],
        mime_type: &str,
        prompt: &str,
        cancel: &CancellationToken,
    ) -> Result<String>;

    fn model_name(&self) -> &str;

    /// Whether a usable credential was configured.
    fn is_configured(&self) -> bool;
}
