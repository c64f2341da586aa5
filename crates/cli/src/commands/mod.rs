pub mod book;
pub mod config;
pub mod doctor;
pub mod join;
pub mod migrate;
pub mod playlist;
pub mod quote;

use royal_core::config::{AppConfig, LoadOptions};
use royal_core::errors::{ApplicationError, InterfaceError};
use serde::Serialize;
use serde_json::Value;
use tokio::runtime::Runtime;
use uuid::Uuid;

#[derive(Debug, Clone)]
pub struct CommandResult {
    pub exit_code: u8,
    pub output: String,
}

#[derive(Debug, Serialize)]
struct CommandOutcome {
    command: String,
    status: String,
    error_class: Option<String>,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    data: Option<Value>,
}

impl CommandResult {
    pub fn success(command: &str, message: impl Into<String>) -> Self {
        Self::success_with_data(command, message, Value::Null)
    }

    pub fn success_with_data(command: &str, message: impl Into<String>, data: Value) -> Self {
        let payload = CommandOutcome {
            command: command.to_string(),
            status: "ok".to_string(),
            error_class: None,
            message: message.into(),
            data: (!data.is_null()).then_some(data),
        };
        Self { exit_code: 0, output: serialize_payload(payload) }
    }

    pub fn failure(
        command: &str,
        error_class: &str,
        message: impl Into<String>,
        exit_code: u8,
    ) -> Self {
        Self::failure_with_data(command, error_class, message, exit_code, Value::Null)
    }

    pub fn failure_with_data(
        command: &str,
        error_class: &str,
        message: impl Into<String>,
        exit_code: u8,
        data: Value,
    ) -> Self {
        let payload = CommandOutcome {
            command: command.to_string(),
            status: "error".to_string(),
            error_class: Some(error_class.to_string()),
            message: message.into(),
            data: (!data.is_null()).then_some(data),
        };
        Self { exit_code, output: serialize_payload(payload) }
    }

    /// Maps an operation failure onto the shared error classes. `message` is
    /// the text the client would see; the detail goes into `data`.
    pub fn from_application_error(
        command: &str,
        error: ApplicationError,
        message: &str,
    ) -> Self {
        let interface = error.into_interface(Uuid::new_v4().to_string());
        let (error_class, exit_code) = match &interface {
            InterfaceError::BadRequest { .. } => ("bad_request", 1),
            InterfaceError::Misconfigured { .. } => ("configuration_missing", 4),
            InterfaceError::ServiceUnavailable { .. } => ("service_unavailable", 5),
            InterfaceError::InvalidFormat { .. } => ("invalid_format", 6),
        };
        let data = serde_json::json!({
            "detail": interface.to_string(),
            "correlation_id": interface.correlation_id(),
        });
        Self::failure_with_data(command, error_class, message, exit_code, data)
    }
}

pub(crate) fn load_config(command: &str) -> Result<AppConfig, CommandResult> {
    AppConfig::load(LoadOptions::default()).map_err(|error| {
        CommandResult::failure(
            command,
            "config_validation",
            format!("configuration issue: {error}"),
            2,
        )
    })
}

pub(crate) fn build_runtime(command: &str) -> Result<Runtime, CommandResult> {
    tokio::runtime::Builder::new_current_thread().enable_all().build().map_err(|error| {
        CommandResult::failure(
            command,
            "runtime_init",
            format!("failed to initialize async runtime: {error}"),
            3,
        )
    })
}

fn serialize_payload(payload: CommandOutcome) -> String {
    serde_json::to_string(&payload).unwrap_or_else(|error| {
        format!(
            "{{\"command\":\"unknown\",\"status\":\"error\",\"error_class\":\"serialization\",\"message\":\"{}\"}}",
            error.to_string().replace('\\', "\\\\").replace('"', "\\\"")
        )
    })
}
