/// Data models for Maildrop
pub mod config;
pub mod email;
pub mod events;

// Re-export commonly used types
pub use config::*;
pub use email::*;
pub use events::*;
