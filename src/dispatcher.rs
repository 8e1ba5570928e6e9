//! Intent dispatcher
//!
//! Routes a request envelope by request type and intent name, runs at most one
//! device action, and renders the result as a speech response. The outcome of
//! an invocation is the single value `handle` resolves to.

use std::sync::Arc;

use serde_json::{Map, Value};

use crate::config::Config;
use crate::device::{DeviceActionResult, HttpThermostat, Thermostat};
use crate::speechlet::{
    Intent, RequestEnvelope, ResponseEnvelope, Session, SpeechletRequest, SpeechletResponse,
    build_response, build_speechlet_response,
};
use crate::{Error, Result};

/// Slot carrying the requested temperature
pub const TEMPERATURE_SLOT: &str = "Temperature";

/// Slot carrying the requested thermostat mode
pub const STATE_SLOT: &str = "State";

const WELCOME_TITLE: &str = "Welcome";
const WELCOME_SPEECH: &str =
    "Welcome to the Nest Manager app.  You can get and set the temperature.";
const WELCOME_REPROMPT: &str = "I don't understand.  Say help for assistance";

const HELP_SPEECH: &str = "You can get and set the temperature, here are some examples.    \
    Set the temperature to seventy two.  \
    Set the a c to seventy five. \
    What is the temperature. \
    How hot is it in here?";

const SET_TEMPERATURE_FAILED: &str = "There was an error setting the temperature";
const SET_MODE_DONE: &str = "Done.";
const SET_MODE_FAILED: &str = "There was an error setting the thermostat";
const GET_TEMPERATURE_FAILED: &str = "Failed to get the temperature.";

/// Action an intent name resolves to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IntentAction {
    /// `AirConditionIntent`: set the target temperature
    SetTemperature,
    /// `ThermostatIntent`: set the thermostat mode
    SetMode,
    /// `TemperatureIntent`: read the current temperature
    GetTemperature,
    /// `HelpIntent`: explain usage
    Help,
}

impl IntentAction {
    /// Resolve an intent name
    ///
    /// # Errors
    ///
    /// Returns `UnrecognizedIntent` for names outside the dispatch table
    pub fn from_name(name: &str) -> Result<Self> {
        match name {
            "AirConditionIntent" => Ok(Self::SetTemperature),
            "ThermostatIntent" => Ok(Self::SetMode),
            "TemperatureIntent" => Ok(Self::GetTemperature),
            "HelpIntent" => Ok(Self::Help),
            other => Err(Error::UnrecognizedIntent(other.to_string())),
        }
    }

    /// Intent name this action is registered under
    #[must_use]
    pub const fn intent_name(self) -> &'static str {
        match self {
            Self::SetTemperature => "AirConditionIntent",
            Self::SetMode => "ThermostatIntent",
            Self::GetTemperature => "TemperatureIntent",
            Self::Help => "HelpIntent",
        }
    }
}

/// Value an invocation resolves to
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    /// Speech response to return to the platform
    Respond(ResponseEnvelope),
    /// Acknowledge without content (session ended)
    NoContent,
}

/// Routes platform requests to thermostat actions
pub struct IntentDispatcher {
    thermostat: Arc<dyn Thermostat>,
    application_id: Option<String>,
}

impl IntentDispatcher {
    /// Create a dispatcher that accepts requests from any application
    #[must_use]
    pub fn new(thermostat: Arc<dyn Thermostat>) -> Self {
        Self {
            thermostat,
            application_id: None,
        }
    }

    /// Create a dispatcher backed by the configured HTTP thermostat
    ///
    /// # Errors
    ///
    /// Returns error if the HTTP client cannot be initialized
    pub fn from_config(config: &Config) -> Result<Self> {
        let thermostat = HttpThermostat::new(config.device.clone())?;
        Ok(Self::new(Arc::new(thermostat)).application_id(config.skill.application_id.clone()))
    }

    /// Only accept requests addressed to this application ID
    #[must_use]
    pub fn application_id(mut self, id: Option<String>) -> Self {
        self.application_id = id;
        self
    }

    /// Handle one platform invocation
    ///
    /// # Errors
    ///
    /// Returns `InvalidApplication` when the request targets another
    /// application, `UnrecognizedIntent` / `MissingSlot` / `MalformedRequest`
    /// when the intent cannot be dispatched. Device failures are not errors.
    pub async fn handle(&self, envelope: &RequestEnvelope) -> Result<Outcome> {
        let session = &envelope.session;
        tracing::debug!(
            application_id = %session.application.application_id,
            "received request"
        );

        self.verify_application(session)?;

        let request_id = envelope.request.request_id();
        if session.is_new {
            tracing::info!(
                request_id,
                session_id = %session.session_id,
                "session started"
            );
        }

        let attributes = session.attributes.clone().unwrap_or_default();

        match &envelope.request {
            SpeechletRequest::LaunchRequest { .. } => {
                tracing::info!(request_id, session_id = %session.session_id, "launch");
                Ok(Outcome::Respond(welcome_response(attributes)))
            }
            SpeechletRequest::IntentRequest { intent, .. } => {
                let intent = intent.as_ref().ok_or_else(|| {
                    Error::MalformedRequest("intent request without intent".to_string())
                })?;
                tracing::info!(
                    request_id,
                    session_id = %session.session_id,
                    intent = %intent.name,
                    "intent"
                );

                let speechlet = self.on_intent(intent).await?;
                Ok(Outcome::Respond(build_response(attributes, speechlet)))
            }
            SpeechletRequest::SessionEndedRequest { reason, .. } => {
                tracing::info!(
                    request_id,
                    session_id = %session.session_id,
                    reason = ?reason,
                    "session ended"
                );
                Ok(Outcome::NoContent)
            }
        }
    }

    /// Dispatch a JSON request envelope and render the response as pretty JSON
    ///
    /// Resolves to `None` when the request is acknowledged without content.
    ///
    /// # Errors
    ///
    /// Returns `Serialization` if the envelope cannot be parsed, otherwise the
    /// same errors as [`Self::handle`].
    pub async fn handle_json(&self, json: &str) -> Result<Option<String>> {
        let envelope = RequestEnvelope::from_json(json)?;

        match self.handle(&envelope).await? {
            Outcome::Respond(response) => Ok(Some(serde_json::to_string_pretty(&response)?)),
            Outcome::NoContent => Ok(None),
        }
    }

    fn verify_application(&self, session: &Session) -> Result<()> {
        match &self.application_id {
            Some(expected) if *expected != session.application.application_id => {
                tracing::warn!(
                    application_id = %session.application.application_id,
                    "rejecting request for unknown application"
                );
                Err(Error::InvalidApplication(
                    session.application.application_id.clone(),
                ))
            }
            _ => Ok(()),
        }
    }

    async fn on_intent(&self, intent: &Intent) -> Result<SpeechletResponse> {
        let action = IntentAction::from_name(&intent.name)?;

        let speechlet = match action {
            IntentAction::SetTemperature => {
                let value = required_slot(intent, TEMPERATURE_SLOT)?;
                let result = self.thermostat.set_temperature(value).await;
                build_speechlet_response(
                    &intent.name,
                    &set_temperature_speech(value, &result),
                    Some(""),
                    false,
                )
            }
            IntentAction::SetMode => {
                let value = required_slot(intent, STATE_SLOT)?;
                let result = self.thermostat.set_mode(value).await;
                build_speechlet_response(&intent.name, set_mode_speech(&result), Some(""), false)
            }
            IntentAction::GetTemperature => {
                let result = self.thermostat.get_temperature().await;
                build_speechlet_response(&intent.name, &get_temperature_speech(&result), None, false)
            }
            IntentAction::Help => build_speechlet_response(&intent.name, HELP_SPEECH, None, false),
        };

        Ok(speechlet)
    }
}

fn required_slot<'a>(intent: &'a Intent, slot: &'static str) -> Result<&'a str> {
    intent.slot_value(slot).ok_or(Error::MissingSlot(slot))
}

/// Response to a launch request, carrying the session attributes unchanged
#[must_use]
pub fn welcome_response(session_attributes: Map<String, Value>) -> ResponseEnvelope {
    build_response(
        session_attributes,
        build_speechlet_response(WELCOME_TITLE, WELCOME_SPEECH, Some(WELCOME_REPROMPT), false),
    )
}

/// Sentence for a set-temperature result
#[must_use]
pub fn set_temperature_speech(value: &str, result: &DeviceActionResult) -> String {
    match result {
        DeviceActionResult::Success => format!("I have set the temperature to {value}"),
        _ => SET_TEMPERATURE_FAILED.to_string(),
    }
}

/// Sentence for a set-mode result
#[must_use]
pub const fn set_mode_speech(result: &DeviceActionResult) -> &'static str {
    match result {
        DeviceActionResult::Success => SET_MODE_DONE,
        _ => SET_MODE_FAILED,
    }
}

/// Sentence for a get-temperature result
#[must_use]
pub fn get_temperature_speech(result: &DeviceActionResult) -> String {
    match result {
        DeviceActionResult::Value(reading) => format!("The temperature is {reading} degrees."),
        _ => GET_TEMPERATURE_FAILED.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn intent_table_round_trips_names() {
        for action in [
            IntentAction::SetTemperature,
            IntentAction::SetMode,
            IntentAction::GetTemperature,
            IntentAction::Help,
        ] {
            assert_eq!(IntentAction::from_name(action.intent_name()).unwrap(), action);
        }
    }

    #[test]
    fn unknown_intent_is_unrecognized() {
        let err = IntentAction::from_name("PizzaIntent").unwrap_err();
        assert!(matches!(err, Error::UnrecognizedIntent(name) if name == "PizzaIntent"));
    }

    #[test]
    fn intent_names_are_case_sensitive() {
        assert!(IntentAction::from_name("helpintent").is_err());
    }

    #[test]
    fn set_temperature_sentences() {
        assert_eq!(
            set_temperature_speech("72", &DeviceActionResult::Success),
            "I have set the temperature to 72"
        );
        assert_eq!(
            set_temperature_speech("72", &DeviceActionResult::Failure("failure:refused".into())),
            "There was an error setting the temperature"
        );
    }

    #[test]
    fn set_mode_sentences() {
        assert_eq!(set_mode_speech(&DeviceActionResult::Success), "Done.");
        assert_eq!(
            set_mode_speech(&DeviceActionResult::Failure("failure".into())),
            "There was an error setting the thermostat"
        );
    }

    #[test]
    fn get_temperature_sentences() {
        assert_eq!(
            get_temperature_speech(&DeviceActionResult::Value("68".into())),
            "The temperature is 68 degrees."
        );
        assert_eq!(
            get_temperature_speech(&DeviceActionResult::Failure("failure".into())),
            "Failed to get the temperature."
        );
    }

    #[test]
    fn welcome_keeps_session_open() {
        let welcome = welcome_response(Map::new());

        assert_eq!(welcome.version, "1.0");
        assert!(welcome.session_attributes.is_empty());
        assert!(!welcome.response.should_end_session);
        assert_eq!(welcome.response.card.title, "SessionSpeechlet - Welcome");
        assert_eq!(
            welcome.response.output_speech.text,
            "Welcome to the Nest Manager app.  You can get and set the temperature."
        );
        assert_eq!(
            welcome
                .response
                .reprompt
                .map(|r| r.output_speech.text)
                .as_deref(),
            Some("I don't understand.  Say help for assistance")
        );
    }

    #[test]
    fn welcome_echoes_session_attributes() {
        let mut attributes = Map::new();
        attributes.insert("lastMode".to_string(), Value::from("heat"));

        let welcome = welcome_response(attributes.clone());

        assert_eq!(welcome.session_attributes, attributes);
    }
}
