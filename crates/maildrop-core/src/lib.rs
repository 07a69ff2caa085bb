/// Maildrop Core - stages outbound email content and emits send events
///
/// Bodies and attachments are uploaded to an S3 bucket, and a single
/// `send_email` event referencing the uploaded keys is published over AMQP
/// for a downstream sender to pick up.
pub mod constants;
pub mod email;
pub mod error;
pub mod models;
pub mod services;
pub mod utils;

// Re-export commonly used types
pub use email::composer::{EmailComposer, send_email};
pub use error::{ErrorKind, MaildropError};
pub use models::{AttachmentContent, EmailRequest, MaildropConfig, RecipientList};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
