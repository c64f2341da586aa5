use std::sync::Arc;

use royal_core::domain::booking::BookingInput;
use royal_core::domain::contract::{BusinessTerms, ContractDocument};
use royal_core::domain::quote::Quote;
use royal_core::errors::ApplicationError;
use royal_core::pricing::PricingSchedule;
use rust_decimal::Decimal;
use thiserror::Error;
use tracing::{error, info};
use uuid::Uuid;

use crate::llm::{LlmClient, LlmError};
use crate::prompts::{contract_prompt, PromptError};

pub const CONTRACT_FAILURE_MESSAGE: &str =
    "Failed to generate contract. Please check your API key and try again.";

#[derive(Debug, Error)]
pub enum ContractError {
    #[error(transparent)]
    Prompt(#[from] PromptError),
    #[error(transparent)]
    Llm(#[from] LlmError),
    #[error("AI endpoint returned an empty contract")]
    EmptyContract,
}

impl ContractError {
    /// Every drafting failure reads the same to the client.
    pub fn user_message(&self) -> &'static str {
        CONTRACT_FAILURE_MESSAGE
    }
}

impl From<ContractError> for ApplicationError {
    fn from(value: ContractError) -> Self {
        match value {
            ContractError::Llm(error) => error.into(),
            other => Self::Integration(other.to_string()),
        }
    }
}

/// Drafts service agreements from a booking and its quote.
pub struct ContractDrafter {
    llm: Arc<dyn LlmClient>,
    terms: BusinessTerms,
    deposit_fraction: Decimal,
}

impl ContractDrafter {
    pub fn new(llm: Arc<dyn LlmClient>, terms: BusinessTerms, deposit_fraction: Decimal) -> Self {
        Self { llm, terms, deposit_fraction }
    }

    pub fn from_schedule(llm: Arc<dyn LlmClient>, schedule: &PricingSchedule) -> Self {
        let terms = BusinessTerms::standard(schedule.overtime_rate, schedule.deposit_fraction);
        Self::new(llm, terms, schedule.deposit_fraction)
    }

    pub fn terms(&self) -> &BusinessTerms {
        &self.terms
    }

    pub async fn draft(
        &self,
        booking: &BookingInput,
        quote: &Quote,
    ) -> Result<ContractDocument, ContractError> {
        let correlation_id = Uuid::new_v4().to_string();
        info!(
            event_name = "ai.contract.requested",
            correlation_id = %correlation_id,
            event_type = booking.event_type.label(),
            total = %quote.total,
            "drafting service agreement"
        );

        let prompt = contract_prompt(booking, quote, &self.terms, self.deposit_fraction)?;
        let text = match self.llm.complete(&prompt).await {
            Ok(text) => text,
            Err(err) => {
                error!(
                    event_name = "ai.contract.failed",
                    correlation_id = %correlation_id,
                    error = %err,
                    "contract generation failed"
                );
                return Err(err.into());
            }
        };

        let contract = ContractDocument::new(text).map_err(|_| {
            error!(
                event_name = "ai.contract.empty",
                correlation_id = %correlation_id,
                "contract generation returned no text"
            );
            ContractError::EmptyContract
        })?;

        info!(
            event_name = "ai.contract.drafted",
            correlation_id = %correlation_id,
            chars = contract.as_str().len(),
            "service agreement drafted"
        );
        Ok(contract)
    }
}
