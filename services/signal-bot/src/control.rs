//! start/stop commands for the orchestrator

use crate::orchestrator::{Orchestrator, OrchestratorError, StartOutcome, StopOutcome};
use axum::http::StatusCode;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use thiserror::Error;
use tracing::{error, info};

/// Control command accepted by the control surface
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ControlCommand {
    Start,
    Stop,
}

impl ControlCommand {
    pub fn parse(action: &str) -> Result<Self, ControlError> {
        match action {
            "start" => Ok(Self::Start),
            "stop" => Ok(Self::Stop),
            other => Err(ControlError::InvalidAction(other.to_string())),
        }
    }
}

impl FromStr for ControlCommand {
    type Err = ControlError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

#[derive(Debug, Error)]
pub enum ControlError {
    /// Unrecognized action; reported to the caller, never fatal
    #[error("Invalid action: {0}")]
    InvalidAction(String),

    #[error(transparent)]
    Orchestrator(#[from] OrchestratorError),
}

/// Body returned for every control request
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ControlResponse {
    pub success: bool,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ControlResponse {
    pub fn ok(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
            error: None,
        }
    }

    pub fn invalid_action() -> Self {
        Self {
            success: false,
            message: "invalid action".to_string(),
            error: None,
        }
    }

    pub fn server_error(detail: impl Into<String>) -> Self {
        Self {
            success: false,
            message: "server error".to_string(),
            error: Some(detail.into()),
        }
    }
}

/// Apply a command to the orchestrator
pub fn execute(
    orchestrator: &Orchestrator,
    command: ControlCommand,
) -> Result<ControlResponse, ControlError> {
    let message = match command {
        ControlCommand::Start => match orchestrator.start()? {
            StartOutcome::Started => "bot started",
            StartOutcome::AlreadyRunning => "bot already running",
        },
        ControlCommand::Stop => match orchestrator.stop() {
            StopOutcome::Stopped => "bot stopped",
            StopOutcome::AlreadyStopped => "bot already stopped",
        },
    };
    Ok(ControlResponse::ok(message))
}

/// Parse and apply a raw action, mapping every error to its response
pub fn handle_action(orchestrator: &Orchestrator, action: &str) -> (StatusCode, ControlResponse) {
    match ControlCommand::parse(action).and_then(|command| execute(orchestrator, command)) {
        Ok(response) => {
            info!(action, message = %response.message, "Control command applied");
            (StatusCode::OK, response)
        }
        Err(ControlError::InvalidAction(action)) => {
            info!(action = %action, "Rejected control command");
            (StatusCode::OK, ControlResponse::invalid_action())
        }
        Err(e) => {
            error!(error = %e, "Control command failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                ControlResponse::server_error(e.to_string()),
            )
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_is_case_sensitive() {
        assert_eq!(ControlCommand::parse("start").ok(), Some(ControlCommand::Start));
        assert!(matches!(
            ControlCommand::parse("START"),
            Err(ControlError::InvalidAction(_))
        ));
    }

    #[test]
    fn test_error_field_omitted_on_success() -> Result<(), serde_json::Error> {
        let body = serde_json::to_value(ControlResponse::ok("bot started"))?;
        assert_eq!(body, serde_json::json!({"success": true, "message": "bot started"}));
        Ok(())
    }
}
