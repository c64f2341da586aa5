use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::domain::quote::deposit_percent;
use crate::errors::DomainError;

pub const BUSINESS_NAME: &str = "Royal Events Worldwide";

/// Formatted service agreement text returned by the drafting model.
///
/// Opaque: the only check is that something came back.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String")]
pub struct ContractDocument(String);

impl TryFrom<String> for ContractDocument {
    type Error = DomainError;

    fn try_from(text: String) -> Result<Self, Self::Error> {
        Self::new(text)
    }
}

impl ContractDocument {
    pub fn new(text: impl Into<String>) -> Result<Self, DomainError> {
        let text = text.into();
        if text.trim().is_empty() {
            return Err(DomainError::InvariantViolation("contract text is empty".to_string()));
        }
        Ok(Self(text))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

/// Fixed terms written into every agreement.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BusinessTerms {
    pub business_name: String,
    pub payment: String,
    pub travel: String,
    pub amenities: String,
    pub security: String,
    pub equipment_usage: String,
    pub cancellation: String,
}

impl BusinessTerms {
    /// `deposit_fraction` is the same fraction the quote's deposit was priced
    /// with, so the clause and the financial section agree.
    pub fn standard(overtime_rate: Decimal, deposit_fraction: Decimal) -> Self {
        Self {
            business_name: BUSINESS_NAME.to_string(),
            payment: format!(
                "The {}% deposit is non-refundable and required to secure the event date. \
                 The remaining balance must be paid upon the DJ's arrival. Overtime is billed \
                 at ${:.2} per additional hour and must be paid on the spot.",
                deposit_percent(deposit_fraction),
                overtime_rate
            ),
            travel: "All round-trip transportation costs must be paid for by the client. The \
                     fee is an estimate and the final cost will be based on actual receipts."
                .to_string(),
            amenities: "The DJ must be provided with complimentary non-alcoholic drinks and a \
                        meal."
                .to_string(),
            security: "The client must ensure the DJ and equipment are in a secure location, \
                       safe from harm or theft."
                .to_string(),
            equipment_usage: "Only the DJ or authorized personnel may operate the DJ equipment \
                              (including microphones). Unauthorized use is prohibited."
                .to_string(),
            cancellation: "Cancellations by the client within 14 days of the event date will \
                           forfeit the deposit."
                .to_string(),
        }
    }

    /// Numbered `(title, body)` clauses in agreement order.
    pub fn clauses(&self) -> Vec<(&'static str, &str)> {
        vec![
            ("Payment", self.payment.as_str()),
            ("Travel", self.travel.as_str()),
            ("Amenities", self.amenities.as_str()),
            ("Security", self.security.as_str()),
            ("Equipment Usage", self.equipment_usage.as_str()),
            ("Cancellation", self.cancellation.as_str()),
        ]
    }
}
