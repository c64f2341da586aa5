use serde::{Deserialize, Serialize};

use crate::errors::DomainError;

/// Mailing-list signup row: `{ email, phone | null }`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Lead {
    pub email: String,
    pub phone: Option<String>,
}

impl Lead {
    pub fn new(email: &str, phone: Option<&str>) -> Result<Self, DomainError> {
        let email = email.trim();
        if email.is_empty() {
            return Err(DomainError::InvariantViolation("lead email is required".to_string()));
        }

        let phone = phone.map(str::trim).filter(|phone| !phone.is_empty()).map(str::to_string);
        Ok(Self { email: email.to_string(), phone })
    }
}
