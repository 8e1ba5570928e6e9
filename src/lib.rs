//! Thermostat Skill - voice platform gateway for a remote thermostat
//!
//! This library maps voice platform intents to thermostat operations:
//! - Request envelope parsing and speech response building
//! - Intent dispatch with a fixed action table
//! - HTTP(S) client for the thermostat endpoint
//! - HTTP invocation endpoint for the voice platform
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────┐
//! │                  Voice Platform                      │
//! └────────────────────┬────────────────────────────────┘
//!                      │ POST /speechlet
//! ┌────────────────────▼────────────────────────────────┐
//! │                 Intent Dispatcher                    │
//! │   Launch  │  Intent table  │  Session end  │ Speech │
//! └────────────────────┬────────────────────────────────┘
//!                      │ PUT / GET
//! ┌────────────────────▼────────────────────────────────┐
//! │            Thermostat endpoint                       │
//! │   /nest/{device}/temperature/  │  /thermostat/      │
//! └─────────────────────────────────────────────────────┘
//! ```

pub mod api;
pub mod config;
pub mod device;
pub mod dispatcher;
pub mod error;
pub mod speechlet;

pub use config::Config;
pub use device::{DeviceActionResult, HttpThermostat, Thermostat};
pub use dispatcher::{IntentAction, IntentDispatcher, Outcome};
pub use error::{Error, Result};
pub use speechlet::{RequestEnvelope, ResponseEnvelope, SpeechletResponse};
