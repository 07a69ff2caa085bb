/// External service clients: object storage and message broker
pub mod broker;
pub mod events;
pub mod s3;

// Re-export service traits
pub use broker::{AmqpBroker, MessageBroker};
pub use events::EventPublisher;
pub use s3::{BlobStore, S3BlobStore};
