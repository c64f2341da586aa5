use thiserror::Error;

use crate::flows::FlowTransitionError;

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum DomainError {
    #[error(transparent)]
    FlowTransition(#[from] FlowTransitionError),
    #[error("unknown event type `{0}`")]
    UnknownEventType(String),
    #[error("track count {requested} must be between {min} and {max} in steps of {step}")]
    InvalidTrackCount { requested: u32, min: u32, max: u32, step: u32 },
    #[error("domain invariant violation: {0}")]
    InvariantViolation(String),
}

/// Failure classes surfaced by any user-triggered operation.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum ApplicationError {
    #[error(transparent)]
    Domain(#[from] DomainError),
    #[error("configuration missing: {0}")]
    Configuration(String),
    #[error("integration failure: {0}")]
    Integration(String),
    #[error("invalid response shape: {0}")]
    InvalidResponse(String),
}

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum InterfaceError {
    #[error("bad request: {message}")]
    BadRequest { message: String, correlation_id: String },
    #[error("not configured: {message}")]
    Misconfigured { message: String, correlation_id: String },
    #[error("service unavailable: {message}")]
    ServiceUnavailable { message: String, correlation_id: String },
    #[error("invalid format: {message}")]
    InvalidFormat { message: String, correlation_id: String },
}

impl InterfaceError {
    pub fn user_message(&self) -> &'static str {
        match self {
            Self::BadRequest { .. } => {
                "The request could not be processed. Check inputs and try again."
            }
            Self::Misconfigured { .. } => {
                "This feature is not configured yet. Please contact the site owner."
            }
            Self::ServiceUnavailable { .. } => "Something went wrong. Please try again.",
            Self::InvalidFormat { .. } => "The AI returned an invalid format. Please try again.",
        }
    }

    pub fn correlation_id(&self) -> &str {
        match self {
            Self::BadRequest { correlation_id, .. }
            | Self::Misconfigured { correlation_id, .. }
            | Self::ServiceUnavailable { correlation_id, .. }
            | Self::InvalidFormat { correlation_id, .. } => correlation_id,
        }
    }
}

impl ApplicationError {
    pub fn into_interface(self, correlation_id: impl Into<String>) -> InterfaceError {
        let correlation_id = correlation_id.into();
        let mut mapped = InterfaceError::from(self);
        match &mut mapped {
            InterfaceError::BadRequest { correlation_id: id, .. }
            | InterfaceError::Misconfigured { correlation_id: id, .. }
            | InterfaceError::ServiceUnavailable { correlation_id: id, .. }
            | InterfaceError::InvalidFormat { correlation_id: id, .. } => *id = correlation_id,
        }
        mapped
    }
}

impl From<ApplicationError> for InterfaceError {
    fn from(value: ApplicationError) -> Self {
        let correlation_id = "unassigned".to_owned();
        match value {
            ApplicationError::Domain(error) => {
                Self::BadRequest { message: error.to_string(), correlation_id }
            }
            ApplicationError::Configuration(message) => {
                Self::Misconfigured { message, correlation_id }
            }
            ApplicationError::Integration(message) => {
                Self::ServiceUnavailable { message, correlation_id }
            }
            ApplicationError::InvalidResponse(message) => {
                Self::InvalidFormat { message, correlation_id }
            }
        }
    }
}
