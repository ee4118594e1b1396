use async_trait::async_trait;

use crate::error::FinscopeError;
use crate::types::EncodedImage;

/// A multimodal inference endpoint that turns an image and a prompt into text.
///
/// Implementations must map every transport or upstream failure to
/// [`FinscopeError::Request`].
#[async_trait]
pub trait VisionClient: Send + Sync {
    /// Provider name (e.g., "gemini", "openai").
    fn name(&self) -> &str;

    /// Send the image with the prompt and return the raw response text.
    async fn describe(&self, image: &EncodedImage, prompt: &str) -> Result<String, FinscopeError>;
}
