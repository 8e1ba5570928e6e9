//! Voice platform envelope types
//!
//! Only the fields the skill reads or writes are modelled; everything else in
//! the platform's envelope is ignored on input and never emitted.

mod request;
mod response;

pub use request::{Application, Intent, RequestEnvelope, Session, Slot, SpeechletRequest};
pub use response::{
    Card, CardKind, OutputSpeech, RESPONSE_VERSION, Reprompt, ResponseEnvelope, SpeechKind,
    SpeechletResponse, build_response, build_speechlet_response,
};
