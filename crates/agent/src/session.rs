use std::sync::Arc;

use royal_core::config::AppConfig;
use royal_core::domain::booking::BookingInput;
use royal_core::domain::playlist::{Playlist, PlaylistRequest};
use royal_core::domain::quote::Quote;
use royal_core::errors::{ApplicationError, DomainError};
use royal_core::flows::{
    BookingWizard, FlowState, FlowTransitionError, TransitionOutcome, WizardCommand,
};
use royal_core::payment::PaymentLink;
use royal_core::pricing::{DeterministicPricingEngine, PricingEngine};
use thiserror::Error;
use tracing::info;

use crate::contract::{ContractDrafter, ContractError};
use crate::llm::LlmClient;
use crate::playlist::{PlaylistError, PlaylistGenerator};

#[derive(Debug, Error)]
pub enum BookingError {
    #[error(transparent)]
    Flow(#[from] FlowTransitionError),
    #[error(transparent)]
    Contract(#[from] ContractError),
    #[error("booking details cannot be edited while {state:?}")]
    NotEditable { state: FlowState },
}

impl BookingError {
    pub fn user_message(&self) -> &'static str {
        match self {
            Self::Contract(error) => error.user_message(),
            Self::Flow(FlowTransitionError::MissingRequiredFields { .. }) => {
                "Please fill out all required fields."
            }
            Self::Flow(FlowTransitionError::InvalidTransition { .. })
            | Self::NotEditable { .. } => "That step is not available right now.",
        }
    }
}

impl From<BookingError> for ApplicationError {
    fn from(value: BookingError) -> Self {
        match value {
            BookingError::Flow(error) => DomainError::from(error).into(),
            BookingError::Contract(error) => error.into(),
            BookingError::NotEditable { .. } => {
                DomainError::InvariantViolation(value.to_string()).into()
            }
        }
    }
}

/// One client's pass through the booking wizard.
///
/// The quote is always derived from the current form values; nothing caches it.
/// Operations take `&mut self`, so a session has at most one draft in flight.
pub struct BookingSession {
    booking: BookingInput,
    wizard: BookingWizard,
    pricing: Arc<dyn PricingEngine>,
    drafter: ContractDrafter,
    payment_link_base: String,
}

impl BookingSession {
    pub fn new(
        pricing: Arc<dyn PricingEngine>,
        drafter: ContractDrafter,
        payment_link_base: impl Into<String>,
    ) -> Self {
        Self {
            booking: BookingInput::default(),
            wizard: BookingWizard::default(),
            pricing,
            drafter,
            payment_link_base: payment_link_base.into(),
        }
    }

    pub fn from_config(config: &AppConfig, llm: Arc<dyn LlmClient>) -> Self {
        let pricing = Arc::new(DeterministicPricingEngine::new(config.pricing.clone()));
        let drafter = ContractDrafter::from_schedule(llm, &config.pricing);
        Self::new(pricing, drafter, config.payment.link_base.clone())
    }

    pub fn booking(&self) -> &BookingInput {
        &self.booking
    }

    pub fn wizard(&self) -> &BookingWizard {
        &self.wizard
    }

    pub fn state(&self) -> FlowState {
        self.wizard.state()
    }

    pub fn quote(&self) -> Quote {
        self.pricing.quote_booking(&self.booking)
    }

    /// Applies a form edit and returns the recomputed quote.
    pub fn edit_booking<F>(&mut self, edit: F) -> Result<Quote, BookingError>
    where
        F: FnOnce(&mut BookingInput),
    {
        let state = self.wizard.state();
        if state != FlowState::Form {
            return Err(BookingError::NotEditable { state });
        }
        edit(&mut self.booking);
        Ok(self.quote())
    }

    /// Drafts a contract for the current form. On any failure the session
    /// stays on the form.
    pub async fn draft_contract(&mut self) -> Result<TransitionOutcome, BookingError> {
        self.wizard.ensure_ready_to_draft(&self.booking.missing_required_fields())?;

        let quote = self.quote();
        let contract = self.drafter.draft(&self.booking, &quote).await?;
        Ok(self.wizard.apply(WizardCommand::ContractDrafted(contract))?)
    }

    pub fn discard_draft(&mut self) -> Result<TransitionOutcome, BookingError> {
        Ok(self.wizard.apply(WizardCommand::DiscardDraft)?)
    }

    /// Confirms the reviewed contract. The payment link is only offered when a
    /// handle was entered.
    pub fn confirm_booking(&mut self) -> Result<TransitionOutcome, BookingError> {
        let deposit = self.quote().deposit;
        let payment_link =
            PaymentLink::build(&self.payment_link_base, &self.booking.payment_handle, deposit);
        let outcome = self.wizard.apply(WizardCommand::ConfirmBooking { payment_link })?;

        info!(
            event_name = "booking.confirmed",
            deposit = %deposit,
            payment_link = self.payment_link().is_some(),
            "booking confirmed"
        );
        Ok(outcome)
    }

    pub fn payment_link(&self) -> Option<&PaymentLink> {
        self.wizard.confirmation().and_then(|confirmation| confirmation.payment_link.as_ref())
    }

    /// Returns to an empty form, keeping only the payment handle.
    pub fn start_new_booking(&mut self) -> Result<TransitionOutcome, BookingError> {
        let outcome = self.wizard.apply(WizardCommand::StartNewBooking)?;
        self.booking.reset_for_next_booking();
        Ok(outcome)
    }
}

/// Holds the last good playlist; a failed attempt leaves it untouched.
pub struct PlaylistSession {
    generator: PlaylistGenerator,
    playlist: Option<Playlist>,
}

impl PlaylistSession {
    pub fn new(generator: PlaylistGenerator) -> Self {
        Self { generator, playlist: None }
    }

    pub fn playlist(&self) -> Option<&Playlist> {
        self.playlist.as_ref()
    }

    /// Numbered `n. title - artist` lines for copying.
    pub fn export_text(&self) -> Option<String> {
        self.playlist.as_ref().map(Playlist::numbered_text)
    }

    pub async fn generate(
        &mut self,
        request: &PlaylistRequest,
    ) -> Result<&Playlist, PlaylistError> {
        let playlist = self.generator.generate(request).await?;
        Ok(self.playlist.insert(playlist))
    }
}
