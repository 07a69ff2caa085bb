/// Email staging: object key naming and the send orchestration
pub mod composer;
pub mod keys;

pub use composer::{EmailComposer, send_email};
