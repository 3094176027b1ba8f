//! Typed webhook event payloads.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// An authenticated webhook event.
///
/// Produced only by `construct_event` after the signature has been checked.
/// `T` is the type of `data.object`; it defaults to raw JSON.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WebhookEvent<T = Value> {
    /// Unique event identifier
    pub id: String,
    /// Event type, e.g. `charge.succeeded`
    #[serde(rename = "type")]
    pub event_type: String,
    /// The object the event is about
    pub data: EventData<T>,
    /// Creation time in Unix seconds
    pub created: i64,
    /// Whether the event comes from live mode
    #[serde(default)]
    pub livemode: bool,
    /// API version used to render `data`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_version: Option<String>,
    /// Deliveries still pending for this event
    #[serde(default)]
    pub pending_webhooks: u32,
    /// The API request that caused the event, if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request: Option<EventRequest>,
}

impl<T> WebhookEvent<T> {
    /// Returns true if the event has the given type.
    #[must_use]
    pub fn is(&self, event_type: &str) -> bool {
        self.event_type == event_type
    }
}

/// Payload of an event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventData<T = Value> {
    /// The affected object
    pub object: T,
    /// Values changed by an update event
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub previous_attributes: Option<Value>,
}

/// The API request behind an event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventRequest {
    /// Request identifier; absent for dashboard-initiated changes
    #[serde(default)]
    pub id: Option<String>,
    /// Idempotency key of the request
    #[serde(default)]
    pub idempotency_key: Option<String>,
}
