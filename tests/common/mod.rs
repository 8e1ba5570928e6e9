//! Shared test utilities
#![allow(dead_code)]

use std::sync::Arc;

use async_trait::async_trait;
use axum::{
    Router,
    extract::State,
    http::{HeaderMap, Method, StatusCode, Uri, header},
};
use serde_json::{Value, json};
use thermostat_skill::config::DeviceConfig;
use thermostat_skill::{DeviceActionResult, RequestEnvelope, Thermostat};
use tokio::net::TcpListener;
use tokio::sync::Mutex;

/// Application ID used by test envelopes
pub const APP_ID: &str = "amzn1.echo-sdk-ams.app.test";

/// Request received by the fake device endpoint
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub method: Method,
    pub path: String,
    pub accept: Option<String>,
    pub content_type: Option<String>,
    pub body: String,
}

#[derive(Clone)]
struct FakeDeviceState {
    status: StatusCode,
    body: String,
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
}

/// In-process thermostat endpoint answering every request with a fixed reply
pub struct FakeDevice {
    pub config: DeviceConfig,
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
}

impl FakeDevice {
    /// Requests received so far
    pub async fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().await.clone()
    }
}

async fn record(
    State(state): State<FakeDeviceState>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: String,
) -> (StatusCode, String) {
    let header_value = |name: header::HeaderName| {
        headers
            .get(name)
            .and_then(|v| v.to_str().ok())
            .map(String::from)
    };

    state.requests.lock().await.push(RecordedRequest {
        method,
        path: uri.path().to_string(),
        accept: header_value(header::ACCEPT),
        content_type: header_value(header::CONTENT_TYPE),
        body,
    });

    (state.status, state.body.clone())
}

/// Start a fake device replying with `status` and `body`
pub async fn spawn_device(status: u16, body: &str) -> FakeDevice {
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("failed to bind fake device");
    let addr = listener.local_addr().expect("fake device has no address");

    let requests = Arc::new(Mutex::new(Vec::new()));
    let state = FakeDeviceState {
        status: StatusCode::from_u16(status).expect("invalid status"),
        body: body.to_string(),
        requests: requests.clone(),
    };

    let app = Router::new().fallback(record).with_state(state);
    tokio::spawn(async move {
        axum::serve(listener, app).await.ok();
    });

    FakeDevice {
        config: device_config(&format!("http://{addr}")),
        requests,
    }
}

/// Device config pointing at a port nothing listens on
pub async fn unreachable_device() -> DeviceConfig {
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("failed to bind probe listener");
    let addr = listener.local_addr().expect("probe listener has no address");
    drop(listener);

    device_config(&format!("http://{addr}"))
}

fn device_config(base_url: &str) -> DeviceConfig {
    DeviceConfig {
        base_url: base_url.to_string(),
        path_prefix: "/nest".to_string(),
        device_id: "logikz".to_string(),
    }
}

/// Call made against the mock thermostat
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeviceCall {
    SetTemperature(String),
    SetMode(String),
    GetTemperature,
}

/// Thermostat that records calls and returns canned results
pub struct MockThermostat {
    setter_result: DeviceActionResult,
    getter_result: DeviceActionResult,
    calls: Mutex<Vec<DeviceCall>>,
}

impl MockThermostat {
    pub fn new() -> Self {
        Self::with_results(
            DeviceActionResult::Success,
            DeviceActionResult::Value("70".to_string()),
        )
    }

    pub fn with_results(setter: DeviceActionResult, getter: DeviceActionResult) -> Self {
        Self {
            setter_result: setter,
            getter_result: getter,
            calls: Mutex::new(Vec::new()),
        }
    }

    pub async fn calls(&self) -> Vec<DeviceCall> {
        self.calls.lock().await.clone()
    }
}

#[async_trait]
impl Thermostat for MockThermostat {
    async fn set_temperature(&self, value: &str) -> DeviceActionResult {
        self.calls
            .lock()
            .await
            .push(DeviceCall::SetTemperature(value.to_string()));
        self.setter_result.clone()
    }

    async fn set_mode(&self, value: &str) -> DeviceActionResult {
        self.calls
            .lock()
            .await
            .push(DeviceCall::SetMode(value.to_string()));
        self.setter_result.clone()
    }

    async fn get_temperature(&self) -> DeviceActionResult {
        self.calls.lock().await.push(DeviceCall::GetTemperature);
        self.getter_result.clone()
    }
}

/// Thermostat whose every action panics
pub struct PanickingThermostat;

#[async_trait]
impl Thermostat for PanickingThermostat {
    async fn set_temperature(&self, _value: &str) -> DeviceActionResult {
        panic!("device exploded")
    }

    async fn set_mode(&self, _value: &str) -> DeviceActionResult {
        panic!("device exploded")
    }

    async fn get_temperature(&self) -> DeviceActionResult {
        panic!("device exploded")
    }
}

fn session(app_id: &str, is_new: bool) -> Value {
    json!({
        "new": is_new,
        "sessionId": "session-1",
        "application": { "applicationId": app_id },
        "attributes": {},
        "user": { "userId": "user-1" }
    })
}

/// Launch request JSON
pub fn launch_json(app_id: &str) -> Value {
    json!({
        "version": "1.0",
        "session": session(app_id, true),
        "request": { "type": "LaunchRequest", "requestId": "request-launch" }
    })
}

/// Intent request JSON with the given slots
pub fn intent_json(app_id: &str, name: &str, slots: &[(&str, &str)]) -> Value {
    let slots: serde_json::Map<String, Value> = slots
        .iter()
        .map(|(slot, value)| {
            (
                (*slot).to_string(),
                json!({ "name": slot, "value": value }),
            )
        })
        .collect();

    json!({
        "version": "1.0",
        "session": session(app_id, false),
        "request": {
            "type": "IntentRequest",
            "requestId": "request-intent",
            "intent": { "name": name, "slots": slots }
        }
    })
}

/// Session ended request JSON
pub fn session_ended_json(app_id: &str) -> Value {
    json!({
        "version": "1.0",
        "session": session(app_id, false),
        "request": {
            "type": "SessionEndedRequest",
            "requestId": "request-end",
            "reason": "USER_INITIATED"
        }
    })
}

/// Parse request JSON into an envelope
pub fn envelope(value: Value) -> RequestEnvelope {
    serde_json::from_value(value).expect("invalid test envelope")
}
