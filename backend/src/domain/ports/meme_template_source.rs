//! Port for the external meme image service.
use async_trait::async_trait;

use crate::domain::{MemeSpec, MemeTemplate};

use super::define_port_error;

define_port_error! {
    /// Errors raised while talking to the meme service.
    pub enum MemeTemplateSourceError {
        /// The request could not be sent or timed out.
        Transport { message: String } => "meme service transport failed: {message}",
        /// The service answered with a non-success status.
        Status { status: u16 } => "meme service returned status {status}",
        /// The response body did not match the expected shape.
        Decode { message: String } => "meme service response malformed: {message}",
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MemeTemplateSource: Send + Sync {
    /// Templates offered by the service.
    async fn list_templates(&self) -> Result<Vec<MemeTemplate>, MemeTemplateSourceError>;

    /// Final image URL for a captioned template.
    fn build_image_url(&self, spec: &MemeSpec) -> String;
}
