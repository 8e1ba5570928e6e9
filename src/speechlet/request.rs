//! Inbound voice platform request envelope

use std::collections::HashMap;

use serde::Deserialize;
use serde_json::{Map, Value};

use crate::Result;

/// Top-level request envelope posted by the voice platform
#[derive(Debug, Clone, Deserialize)]
pub struct RequestEnvelope {
    /// Envelope schema version
    #[serde(default)]
    pub version: Option<String>,

    /// Session the request belongs to
    pub session: Session,

    /// The classified request
    pub request: SpeechletRequest,
}

impl RequestEnvelope {
    /// Parse an envelope from its JSON form
    ///
    /// # Errors
    ///
    /// Returns error if the JSON does not describe a supported request
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Parse an envelope from raw request bytes
    ///
    /// # Errors
    ///
    /// Returns error if the bytes are not JSON describing a supported request
    pub fn from_slice(bytes: &[u8]) -> Result<Self> {
        Ok(serde_json::from_slice(bytes)?)
    }
}

/// Platform-owned session, read-only to the skill
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    /// Session identifier
    pub session_id: String,

    /// Whether this request starts the session
    #[serde(rename = "new", default)]
    pub is_new: bool,

    /// Attributes carried between requests of the session
    #[serde(default)]
    pub attributes: Option<Map<String, Value>>,

    /// Application the request was addressed to
    pub application: Application,
}

/// Application the request was addressed to
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Application {
    pub application_id: String,
}

/// Request classified by the platform, tagged by `type`
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all_fields = "camelCase")]
pub enum SpeechletRequest {
    /// User opened the skill without asking for anything
    LaunchRequest { request_id: String },

    /// User asked for something specific
    IntentRequest {
        request_id: String,
        #[serde(default)]
        intent: Option<Intent>,
    },

    /// Session was closed by the platform or the user
    SessionEndedRequest {
        request_id: String,
        #[serde(default)]
        reason: Option<String>,
    },
}

impl SpeechletRequest {
    /// Identifier of this request
    #[must_use]
    pub fn request_id(&self) -> &str {
        match self {
            Self::LaunchRequest { request_id }
            | Self::IntentRequest { request_id, .. }
            | Self::SessionEndedRequest { request_id, .. } => request_id,
        }
    }
}

/// Classified utterance with its extracted slots
#[derive(Debug, Clone, Deserialize)]
pub struct Intent {
    pub name: String,

    #[serde(default)]
    pub slots: HashMap<String, Slot>,
}

impl Intent {
    /// Value of a slot, if present and non-empty
    #[must_use]
    pub fn slot_value(&self, slot: &str) -> Option<&str> {
        self.slots
            .get(slot)
            .and_then(|s| s.value.as_deref())
            .filter(|v| !v.is_empty())
    }
}

/// Named parameter extracted from speech
#[derive(Debug, Clone, Deserialize)]
pub struct Slot {
    #[serde(default)]
    pub value: Option<String>,
}
