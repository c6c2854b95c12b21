//! Kudos and their optional meme attachments.

use std::fmt;

use super::{AuditStamp, KudoId, MemeId, UserId};

/// Maximum length of a kudo message.
pub const KUDO_MESSAGE_MAX: usize = 2000;
/// Maximum length of a single meme caption.
pub const MEME_CAPTION_MAX: usize = 200;
/// Maximum length of a meme template identifier.
pub const MEME_TEMPLATE_ID_MAX: usize = 64;

/// Validation errors raised while building kudo values.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum KudoValidationError {
    #[error("message must not be empty")]
    EmptyMessage,
    #[error("message must be at most {max} characters")]
    MessageTooLong { max: usize },
    #[error("meme template must not be empty")]
    EmptyTemplate,
    #[error("meme template may only contain letters, digits, '-' or '_'")]
    InvalidTemplate,
    #[error("meme captions must be at most {max} characters")]
    CaptionTooLong { max: usize },
}

/// Trimmed, non-empty kudo text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KudoMessage(String);

impl KudoMessage {
    pub fn new(raw: impl AsRef<str>) -> Result<Self, KudoValidationError> {
        let trimmed = raw.as_ref().trim();
        if trimmed.is_empty() {
            return Err(KudoValidationError::EmptyMessage);
        }
        if trimmed.chars().count() > KUDO_MESSAGE_MAX {
            return Err(KudoValidationError::MessageTooLong {
                max: KUDO_MESSAGE_MAX,
            });
        }
        Ok(Self(trimmed.to_owned()))
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for KudoMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Validated request to caption a meme template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemeSpec {
    template_id: String,
    top_text: String,
    bottom_text: String,
}

impl MemeSpec {
    /// Validate a template identifier and its two captions.
    ///
    /// # Examples
    /// ```
    /// use kudotrio::domain::MemeSpec;
    ///
    /// let spec = MemeSpec::new("buzz", "kudos", "kudos everywhere").unwrap();
    /// assert_eq!(spec.template_id(), "buzz");
    /// assert!(MemeSpec::new("../etc", "", "").is_err());
    /// ```
    pub fn new(
        template_id: impl AsRef<str>,
        top_text: impl AsRef<str>,
        bottom_text: impl AsRef<str>,
    ) -> Result<Self, KudoValidationError> {
        let template_id = template_id.as_ref().trim();
        if template_id.is_empty() {
            return Err(KudoValidationError::EmptyTemplate);
        }
        if template_id.chars().count() > MEME_TEMPLATE_ID_MAX
            || !template_id
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
        {
            return Err(KudoValidationError::InvalidTemplate);
        }
        let top_text = top_text.as_ref().trim();
        let bottom_text = bottom_text.as_ref().trim();
        if top_text.chars().count() > MEME_CAPTION_MAX
            || bottom_text.chars().count() > MEME_CAPTION_MAX
        {
            return Err(KudoValidationError::CaptionTooLong {
                max: MEME_CAPTION_MAX,
            });
        }
        Ok(Self {
            template_id: template_id.to_owned(),
            top_text: top_text.to_owned(),
            bottom_text: bottom_text.to_owned(),
        })
    }

    pub fn template_id(&self) -> &str {
        &self.template_id
    }

    pub fn top_text(&self) -> &str {
        &self.top_text
    }

    pub fn bottom_text(&self) -> &str {
        &self.bottom_text
    }
}

/// Meme attached to a kudo with its resolved image URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Meme {
    pub id: MemeId,
    pub kudo_id: KudoId,
    pub spec: MemeSpec,
    pub image_url: String,
}

/// Persisted kudo. Kudos are never edited after creation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Kudo {
    pub id: KudoId,
    pub sender_id: UserId,
    pub receiver_id: UserId,
    pub message: KudoMessage,
    pub meme: Option<Meme>,
    pub audit: AuditStamp,
}

/// Raw kudo submission as received from an inbound adapter.
///
/// `receiver_id` is `None` when the submitter did not pick anyone.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CreateKudoRequest {
    pub receiver_id: Option<UserId>,
    pub message: String,
    pub meme: Option<MemeRequest>,
}

/// Raw meme fields accompanying a [`CreateKudoRequest`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MemeRequest {
    pub template_id: String,
    pub top_text: String,
    pub bottom_text: String,
}

/// Template offered by the meme service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemeTemplate {
    pub id: String,
    pub name: String,
}

/// A user the current user may send a kudo to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecipientChoice {
    pub id: UserId,
    pub display_name: String,
}

/// Choices offered when composing a kudo.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KudoComposeOptions {
    pub recipients: Vec<RecipientChoice>,
    pub templates: Vec<MemeTemplate>,
}
