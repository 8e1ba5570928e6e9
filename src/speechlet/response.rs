//! Outbound speech response envelope and its builders

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Envelope schema version emitted with every response
pub const RESPONSE_VERSION: &str = "1.0";

/// Prefix applied to card titles and content
const CARD_PREFIX: &str = "SessionSpeechlet - ";

/// Full response returned to the voice platform
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResponseEnvelope {
    pub version: String,
    pub session_attributes: Map<String, Value>,
    pub response: SpeechletResponse,
}

/// Spoken text, visual card and session continuation flag
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpeechletResponse {
    pub output_speech: OutputSpeech,
    pub card: Card,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reprompt: Option<Reprompt>,
    pub should_end_session: bool,
}

/// Text to be spoken
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutputSpeech {
    #[serde(rename = "type")]
    pub kind: SpeechKind,
    pub text: String,
}

impl OutputSpeech {
    fn plain(text: &str) -> Self {
        Self {
            kind: SpeechKind::PlainText,
            text: text.to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SpeechKind {
    PlainText,
}

/// Card shown in the companion app
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Card {
    #[serde(rename = "type")]
    pub kind: CardKind,
    pub title: String,
    pub content: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CardKind {
    Simple,
}

/// Speech used when the user does not answer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Reprompt {
    pub output_speech: OutputSpeech,
}

/// Build the speech portion of a response
#[must_use]
pub fn build_speechlet_response(
    title: &str,
    output: &str,
    reprompt: Option<&str>,
    should_end_session: bool,
) -> SpeechletResponse {
    SpeechletResponse {
        output_speech: OutputSpeech::plain(output),
        card: Card {
            kind: CardKind::Simple,
            title: format!("{CARD_PREFIX}{title}"),
            content: format!("{CARD_PREFIX}{output}"),
        },
        reprompt: reprompt.map(|text| Reprompt {
            output_speech: OutputSpeech::plain(text),
        }),
        should_end_session,
    }
}

/// Wrap a speech response in the platform envelope
#[must_use]
pub fn build_response(
    session_attributes: Map<String, Value>,
    speechlet: SpeechletResponse,
) -> ResponseEnvelope {
    ResponseEnvelope {
        version: RESPONSE_VERSION.to_string(),
        session_attributes,
        response: speechlet,
    }
}
