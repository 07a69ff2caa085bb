/// Event envelope and payloads published to the broker
use super::email::{Association, RecipientList};
use crate::constants::EVENT_TASK_NAME;
use crate::error::MaildropError;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use uuid::Uuid;

/// Task-style envelope wrapping every published event
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventEnvelope {
    pub task: String,
    pub id: String,
    /// Event type first, followed by any positional arguments
    pub args: Vec<Value>,
    pub kwargs: Map<String, Value>,
}

impl EventEnvelope {
    /// Builds an envelope with a freshly generated task id
    pub fn new(event_type: &str, args: Vec<Value>, kwargs: Map<String, Value>) -> Self {
        Self::with_task_id(Uuid::new_v4(), event_type, args, kwargs)
    }

    /// Builds an envelope whose `id` and `kwargs.task_id` are both `task_id`
    pub fn with_task_id(
        task_id: Uuid,
        event_type: &str,
        args: Vec<Value>,
        mut kwargs: Map<String, Value>,
    ) -> Self {
        let id = task_id.to_string();
        kwargs.insert("task_id".to_string(), Value::String(id.clone()));

        let mut all_args = Vec::with_capacity(args.len() + 1);
        all_args.push(Value::String(event_type.to_string()));
        all_args.extend(args);

        Self {
            task: EVENT_TASK_NAME.to_string(),
            id,
            args: all_args,
            kwargs,
        }
    }

    pub fn event_type(&self) -> Option<&str> {
        self.args.first().and_then(Value::as_str)
    }

    /// Reads a string keyword argument, used for log context
    pub fn kwarg_str(&self, name: &str) -> Option<&str> {
        self.kwargs.get(name).and_then(Value::as_str)
    }

    pub fn to_json(&self) -> Result<Vec<u8>, MaildropError> {
        Ok(serde_json::to_vec(self)?)
    }
}

/// Keyword arguments of the `send_email` event
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SendEmailEvent {
    pub from_email: Option<String>,
    pub to: Option<RecipientList>,
    pub cc: Option<RecipientList>,
    pub bcc: Option<RecipientList>,
    pub reply_to: Option<RecipientList>,
    pub subject: Option<String>,
    pub plaintext_body_key: Option<String>,
    pub html_body_key: Option<String>,
    pub attachments_keys: Vec<String>,
    pub headers: Option<BTreeMap<String, String>>,
    pub user_id: Option<String>,
    pub resource_type: Option<String>,
    pub resource_id: Option<String>,
    pub task_id: String,
}

impl SendEmailEvent {
    pub fn set_association(&mut self, association: Association) {
        self.user_id = association.user_id;
        self.resource_type = association.resource_type;
        self.resource_id = association.resource_id;
    }

    /// Converts the payload into envelope keyword arguments
    pub fn into_kwargs(self) -> Result<Map<String, Value>, MaildropError> {
        match serde_json::to_value(self)? {
            Value::Object(map) => Ok(map),
            other => Err(MaildropError::Validation(format!(
                "send_email payload must serialize to an object, got {}",
                other
            ))),
        }
    }
}
