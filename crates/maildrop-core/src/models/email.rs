/// Email request models
use crate::error::MaildropError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::str::FromStr;
use typed_builder::TypedBuilder;

/// Ordered list of recipient addresses
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecipientList(Vec<String>);

impl RecipientList {
    pub fn new(addresses: Vec<String>) -> Self {
        Self(addresses)
    }

    /// Splits a comma-joined string, trimming entries and dropping empty ones
    pub fn from_comma_separated(joined: &str) -> Self {
        Self(
            joined
                .split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
                .collect(),
        )
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &String> {
        self.0.iter()
    }

    pub fn as_slice(&self) -> &[String] {
        &self.0
    }

    /// `None` for an empty list, so absent recipients serialize as null
    pub fn non_empty(&self) -> Option<&Self> {
        (!self.is_empty()).then_some(self)
    }
}

impl From<Vec<String>> for RecipientList {
    fn from(addresses: Vec<String>) -> Self {
        Self(addresses)
    }
}

impl From<Vec<&str>> for RecipientList {
    fn from(addresses: Vec<&str>) -> Self {
        Self(addresses.into_iter().map(str::to_string).collect())
    }
}

impl From<&str> for RecipientList {
    fn from(joined: &str) -> Self {
        Self::from_comma_separated(joined)
    }
}

impl FromStr for RecipientList {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::from_comma_separated(s))
    }
}

/// Attachment supplied inline by the caller
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttachmentContent {
    pub filename: String,
    pub content_type: String,
    pub content: Vec<u8>,
}

impl AttachmentContent {
    pub fn new(
        filename: impl Into<String>,
        content_type: impl Into<String>,
        content: impl Into<Vec<u8>>,
    ) -> Self {
        Self {
            filename: filename.into(),
            content_type: content_type.into(),
            content: content.into(),
        }
    }
}

/// Links a send to the user and resource that triggered it
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Association {
    pub user_id: Option<String>,
    pub resource_type: Option<String>,
    pub resource_id: Option<String>,
}

/// A single outbound email, consumed once by the composer
#[derive(Debug, Clone, TypedBuilder)]
pub struct EmailRequest {
    #[builder(default, setter(into, strip_option))]
    pub from_email: Option<String>,
    #[builder(default, setter(into))]
    pub to: RecipientList,
    #[builder(default, setter(into))]
    pub cc: RecipientList,
    #[builder(default, setter(into))]
    pub bcc: RecipientList,
    #[builder(default, setter(into))]
    pub reply_to: RecipientList,
    #[builder(default, setter(into, strip_option))]
    pub subject: Option<String>,
    #[builder(default, setter(into, strip_option))]
    pub plaintext_body: Option<String>,
    #[builder(default, setter(into, strip_option))]
    pub html_body: Option<String>,
    /// Inline attachments, uploaded before `files`
    #[builder(default)]
    pub attachments: Vec<AttachmentContent>,
    /// Local file paths attached by their final path segment
    #[builder(default)]
    pub files: Vec<String>,
    #[builder(default)]
    pub headers: BTreeMap<String, String>,
    #[builder(default)]
    pub association: Association,
}

impl EmailRequest {
    /// Rejects requests with no recipient in any of to, cc, bcc or reply-to
    pub fn validate(&self) -> Result<(), MaildropError> {
        if self.to.is_empty()
            && self.cc.is_empty()
            && self.bcc.is_empty()
            && self.reply_to.is_empty()
        {
            return Err(MaildropError::Validation(
                "Fields 'to', 'cc', 'bcc' and 'reply_to' can't all be empty".to_string(),
            ));
        }

        Ok(())
    }
}
