/// Application constants
///
/// Fixed names shared with the downstream email consumer. Changing any of
/// the event or key constants breaks compatibility with existing consumers.
// ============================================================================
// Object Store
// ============================================================================
/// Default bucket holding staged email content
pub const DEFAULT_BUCKET_NAME: &str = "zc-mp-email";

/// Key label for the HTML body
pub const HTML_CONTENT: &str = "html";

/// Key label for the plaintext body
pub const PLAINTEXT_CONTENT: &str = "plaintext";

/// Key label for attachments, suffixed with `_{filename}`
pub const ATTACHMENT_CONTENT: &str = "attachment";

/// Content type used when an attachment declares none, or an invalid one
pub const FALLBACK_CONTENT_TYPE: &str = "application/octet-stream";

/// Maximum length of a sanitized content name
pub const MAX_CONTENT_NAME_LENGTH: usize = 255;

// ============================================================================
// Events
// ============================================================================

/// Event type consumed by the email sender
pub const EMAIL_EVENT_TYPE: &str = "send_email";

/// Task name carried in every event envelope
pub const EVENT_TASK_NAME: &str = "microservice.event";

/// Default exchange events are published to
pub const DEFAULT_EVENT_EXCHANGE: &str = "microservice-events";

/// Routing key used for event publishes (fanout-style exchange)
pub const EVENT_ROUTING_KEY: &str = "";

/// Content type of published events
pub const EVENT_CONTENT_TYPE: &str = "application/json";

/// Content encoding of published events
pub const EVENT_CONTENT_ENCODING: &str = "utf-8";

/// AMQP delivery mode for persistent messages
pub const PERSISTENT_DELIVERY_MODE: u8 = 2;

/// Default timeout for broker connect and publish, in seconds
pub const DEFAULT_BROKER_TIMEOUT_SECS: u64 = 5;

// ============================================================================
// Logging
// ============================================================================

/// Log target for event emission records
pub const LOG_TARGET_EVENTS: &str = "microservice_event";

// ============================================================================
// Testing Constants
// ============================================================================
