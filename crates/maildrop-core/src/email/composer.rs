/// Email composer: stages content in the blob store and emits the send event
use crate::constants::{ATTACHMENT_CONTENT, EMAIL_EVENT_TYPE, HTML_CONTENT, PLAINTEXT_CONTENT};
use crate::email::keys::{content_key, file_name_from_path, folder_name_at};
use crate::error::MaildropError;
use crate::models::{EmailRequest, EventEnvelope, MaildropConfig, SendEmailEvent};
use crate::services::broker::{AmqpBroker, MessageBroker};
use crate::services::events::EventPublisher;
use crate::services::s3::{
    BlobStore, S3BlobStore, resolve_content_type, upload_bytes, upload_file, upload_string,
};
use crate::utils::logging::{redact_email, redact_recipients, redact_subject};
use crate::utils::sanitization::{is_safe_key_component, sanitize_content_name};
use chrono::{DateTime, Utc};
use std::borrow::Cow;
use std::sync::Arc;
use tracing::{info, warn};
use uuid::Uuid;

/// Validates, acquires the configured bucket, and sends `request`
///
/// Validation runs before the bucket is acquired, so a request without
/// recipients never touches S3 or the broker.
pub async fn send_email(
    config: &MaildropConfig,
    request: EmailRequest,
) -> Result<bool, MaildropError> {
    request.validate()?;

    let store = S3BlobStore::connect(config).await?;
    let broker = AmqpBroker::from_config(&config.broker);

    EmailComposer::from_config(Arc::new(store), Arc::new(broker), config)
        .send(request)
        .await
}

pub struct EmailComposer {
    store: Arc<dyn BlobStore>,
    publisher: EventPublisher,
    sanitize_content_names: bool,
}

impl EmailComposer {
    pub fn new(
        store: Arc<dyn BlobStore>,
        broker: Arc<dyn MessageBroker>,
        exchange: impl Into<String>,
    ) -> Self {
        Self {
            store,
            publisher: EventPublisher::new(broker, exchange),
            sanitize_content_names: false,
        }
    }

    pub fn from_config(
        store: Arc<dyn BlobStore>,
        broker: Arc<dyn MessageBroker>,
        config: &MaildropConfig,
    ) -> Self {
        Self::new(store, broker, config.broker.exchange.clone())
            .with_sanitized_content_names(config.sanitize_content_names)
    }

    pub fn with_sanitized_content_names(mut self, enabled: bool) -> Self {
        self.sanitize_content_names = enabled;
        self
    }

    /// Sends `request` under a fresh email id
    pub async fn send(&self, request: EmailRequest) -> Result<bool, MaildropError> {
        self.send_at(request, Uuid::new_v4(), Utc::now()).await
    }

    /// Sends `request` with an explicit email id and clock reading
    ///
    /// The email id names the object folder and becomes the event's task id.
    /// Blobs written before a later failure are left in place.
    #[tracing::instrument(
        name = "maildrop.send_email",
        skip_all,
        fields(email_id = %email_id)
    )]
    pub async fn send_at(
        &self,
        request: EmailRequest,
        email_id: Uuid,
        now: DateTime<Utc>,
    ) -> Result<bool, MaildropError> {
        request.validate()?;

        let EmailRequest {
            from_email,
            to,
            cc,
            bcc,
            reply_to,
            subject,
            plaintext_body,
            html_body,
            attachments,
            files,
            headers,
            association,
        } = request;

        let folder = folder_name_at(now, email_id);
        info!(
            to = %redact_recipients(to.iter()),
            from = %redact_email(from_email.as_deref().unwrap_or_default()),
            subject = %redact_subject(subject.as_deref().unwrap_or_default()),
            attachments = attachments.len(),
            files = files.len(),
            "Uploading email"
        );

        let store = self.store.as_ref();

        let html_body_key = upload_string(
            store,
            &content_key(&folder, HTML_CONTENT, ""),
            html_body.as_deref(),
            mime::TEXT_HTML_UTF_8.as_ref(),
        )
        .await?;

        let plaintext_body_key = upload_string(
            store,
            &content_key(&folder, PLAINTEXT_CONTENT, ""),
            plaintext_body.as_deref(),
            mime::TEXT_PLAIN_UTF_8.as_ref(),
        )
        .await?;

        let mut attachments_keys = Vec::with_capacity(attachments.len() + files.len());
        for attachment in attachments {
            let key = content_key(
                &folder,
                ATTACHMENT_CONTENT,
                &self.content_name(&attachment.filename),
            );
            let content_type = resolve_content_type(&attachment.content_type);
            if let Some(key) = upload_bytes(store, &key, attachment.content, &content_type).await? {
                attachments_keys.push(key);
            }
        }

        for path in &files {
            let key = content_key(
                &folder,
                ATTACHMENT_CONTENT,
                &self.content_name(file_name_from_path(path)),
            );
            if let Some(key) = upload_file(store, &key, path).await? {
                attachments_keys.push(key);
            }
        }

        let mut event = SendEmailEvent {
            from_email,
            to: to.non_empty().cloned(),
            cc: cc.non_empty().cloned(),
            bcc: bcc.non_empty().cloned(),
            reply_to: reply_to.non_empty().cloned(),
            subject,
            plaintext_body_key,
            html_body_key,
            attachments_keys,
            headers: (!headers.is_empty()).then_some(headers),
            user_id: None,
            resource_type: None,
            resource_id: None,
            task_id: email_id.to_string(),
        };
        event.set_association(association);

        info!(
            folder = %folder,
            html = event.html_body_key.is_some(),
            plaintext = event.plaintext_body_key.is_some(),
            attachments = event.attachments_keys.len(),
            "Staged email content"
        );

        let envelope =
            EventEnvelope::with_task_id(email_id, EMAIL_EVENT_TYPE, vec![], event.into_kwargs()?);
        let sent = self.publisher.publish_envelope(&envelope).await?;

        info!("Sent email event");
        Ok(sent)
    }

    fn content_name<'a>(&self, name: &'a str) -> Cow<'a, str> {
        if self.sanitize_content_names {
            return Cow::Owned(sanitize_content_name(name));
        }

        if !is_safe_key_component(name) {
            warn!(name = %name, "Content name changes the object key path");
        }
        Cow::Borrowed(name)
    }
}
