//! Reqwest-backed memegen adapter.
//!
//! Lists templates over HTTP and builds caption image URLs locally. Image
//! URLs are never fetched by the backend; browsers load them directly.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode, Url};

use super::dto::TemplateDto;
use crate::domain::ports::{MemeTemplateSource, MemeTemplateSourceError};
use crate::domain::{MemeSpec, MemeTemplate};

const BLANK_CAPTION: &str = "_";
const IMAGE_EXTENSION: &str = ".png";

/// Memegen client bound to one service base URL.
pub struct MemegenHttpSource {
    client: Client,
    base: Url,
}

impl MemegenHttpSource {
    /// Build an adapter using a reqwest client with an explicit request
    /// timeout.
    ///
    /// # Errors
    ///
    /// Returns [`MemeTemplateSourceError::Transport`] when the base URL
    /// cannot carry path segments or the client cannot be constructed.
    pub fn new(base: Url, timeout: Duration) -> Result<Self, MemeTemplateSourceError> {
        if base.cannot_be_a_base() {
            return Err(MemeTemplateSourceError::transport(format!(
                "memegen base URL {base} cannot carry a path"
            )));
        }
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|error| MemeTemplateSourceError::transport(error.to_string()))?;
        Ok(Self { client, base })
    }

    fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty();
            path.extend(segments);
        }
        url
    }
}

#[async_trait]
impl MemeTemplateSource for MemegenHttpSource {
    async fn list_templates(&self) -> Result<Vec<MemeTemplate>, MemeTemplateSourceError> {
        let response = self
            .client
            .get(self.endpoint(&["templates", ""]))
            .header(reqwest::header::ACCEPT, "application/json")
            .send()
            .await
            .map_err(map_transport_error)?;

        let status = response.status();
        if !status.is_success() {
            return Err(map_status_error(status));
        }
        let body = response.bytes().await.map_err(map_transport_error)?;
        parse_templates(body.as_ref())
    }

    fn build_image_url(&self, spec: &MemeSpec) -> String {
        let bottom = format!("{}{IMAGE_EXTENSION}", caption(spec.bottom_text()));
        self.endpoint(&["images", spec.template_id(), caption(spec.top_text()), bottom.as_str()])
            .to_string()
    }
}

fn caption(text: &str) -> &str {
    if text.trim().is_empty() {
        BLANK_CAPTION
    } else {
        text
    }
}

fn parse_templates(body: &[u8]) -> Result<Vec<MemeTemplate>, MemeTemplateSourceError> {
    let decoded: Vec<TemplateDto> = serde_json::from_slice(body).map_err(|error| {
        MemeTemplateSourceError::decode(format!("invalid template listing: {error}"))
    })?;
    Ok(decoded
        .into_iter()
        .filter_map(TemplateDto::into_domain)
        .collect())
}

fn map_transport_error(error: reqwest::Error) -> MemeTemplateSourceError {
    MemeTemplateSourceError::transport(error.to_string())
}

fn map_status_error(status: StatusCode) -> MemeTemplateSourceError {
    MemeTemplateSourceError::status(status.as_u16())
}
