//! DTOs for decoding the memegen template listing.

use serde::Deserialize;

use crate::domain::MemeTemplate;

#[derive(Debug, Deserialize)]
pub(super) struct TemplateDto {
    pub(super) id: String,
    #[serde(default)]
    pub(super) name: String,
}

impl TemplateDto {
    /// Templates without an identifier cannot be rendered and are dropped.
    pub(super) fn into_domain(self) -> Option<MemeTemplate> {
        let id = self.id.trim();
        if id.is_empty() {
            return None;
        }
        let name = match self.name.trim() {
            "" => id.to_owned(),
            name => name.to_owned(),
        };
        Some(MemeTemplate {
            id: id.to_owned(),
            name,
        })
    }
}
