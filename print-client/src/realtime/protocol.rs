//! Phoenix channel frames used by Supabase Realtime
//!
//! Every frame is a JSON object `{topic, event, payload, ref}`:
//! ```json
//! {"topic":"realtime:public:orders","event":"phx_join","payload":{...},"ref":"1"}
//! {"topic":"phoenix","event":"heartbeat","payload":{},"ref":"2"}
//! {"topic":"realtime:public:orders","event":"postgres_changes",
//!  "payload":{"data":{"type":"INSERT","record":{"id":12,"status":"new"}}},"ref":null}
//! ```

use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

/// Topic carrying heartbeats
pub const PHOENIX_TOPIC: &str = "phoenix";

pub const EVENT_JOIN: &str = "phx_join";
pub const EVENT_REPLY: &str = "phx_reply";
pub const EVENT_HEARTBEAT: &str = "heartbeat";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PhoenixMessage {
    pub topic: String,
    pub event: String,
    #[serde(default)]
    pub payload: Value,
    #[serde(rename = "ref", default)]
    pub msg_ref: Option<String>,
}

/// Channel topic for a table in the `public` schema
pub fn channel_topic(table: &str) -> String {
    format!("realtime:public:{}", table)
}

impl PhoenixMessage {
    /// Join the table channel, asking for INSERT changes only
    pub fn join(table: &str, access_token: &str, msg_ref: u64) -> Self {
        Self {
            topic: channel_topic(table),
            event: EVENT_JOIN.to_string(),
            payload: json!({
                "config": {
                    "broadcast": {"self": false},
                    "presence": {"key": ""},
                    "postgres_changes": [
                        {"event": "INSERT", "schema": "public", "table": table}
                    ]
                },
                "access_token": access_token
            }),
            msg_ref: Some(msg_ref.to_string()),
        }
    }

    pub fn heartbeat(msg_ref: u64) -> Self {
        Self {
            topic: PHOENIX_TOPIC.to_string(),
            event: EVENT_HEARTBEAT.to_string(),
            payload: json!({}),
            msg_ref: Some(msg_ref.to_string()),
        }
    }

    pub fn to_text(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}

/// What an incoming frame means for the listener
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChannelEvent {
    /// A row was inserted; carries its `id`
    Inserted(u64),
    /// Join acknowledged
    Joined,
    /// Server refused the subscription
    Rejected(String),
    /// Server closed the channel
    Closed,
    /// Heartbeat replies, presence, anything else
    Ignored,
}

/// Interpret a text frame received on `topic`
pub fn parse_frame(text: &str, topic: &str) -> ChannelEvent {
    let Ok(msg) = serde_json::from_str::<PhoenixMessage>(text) else {
        return ChannelEvent::Ignored;
    };
    if msg.topic != topic {
        return ChannelEvent::Ignored;
    }

    let payload = &msg.payload;
    match msg.event.as_str() {
        EVENT_REPLY => match payload["status"].as_str() {
            Some("ok") => ChannelEvent::Joined,
            Some("error") => ChannelEvent::Rejected(reason(&payload["response"])),
            _ => ChannelEvent::Ignored,
        },
        "system" if payload["status"] == "error" => ChannelEvent::Rejected(reason(payload)),
        "postgres_changes" => inserted_id(&payload["data"]),
        // Older servers send the change itself as the event
        "INSERT" => inserted_id(payload),
        "phx_close" | "phx_error" => ChannelEvent::Closed,
        _ => ChannelEvent::Ignored,
    }
}

fn inserted_id(change: &Value) -> ChannelEvent {
    if change["type"] != "INSERT" {
        return ChannelEvent::Ignored;
    }
    match record_id(&change["record"]["id"]) {
        Some(id) => ChannelEvent::Inserted(id),
        None => ChannelEvent::Ignored,
    }
}

/// Ids arrive as numbers, or as strings for bigint columns
fn record_id(value: &Value) -> Option<u64> {
    match value {
        Value::Number(n) => n.as_u64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn reason(value: &Value) -> String {
    value["reason"]
        .as_str()
        .or_else(|| value["message"].as_str())
        .map(str::to_string)
        .unwrap_or_else(|| value.to_string())
}
