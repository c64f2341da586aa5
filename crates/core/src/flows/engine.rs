use thiserror::Error;

use crate::domain::contract::ContractDocument;
use crate::flows::states::{
    BookingWizard, Confirmation, FlowAction, FlowEvent, FlowState, TransitionOutcome,
    WizardCommand,
};

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum FlowTransitionError {
    #[error("missing required fields before transition from {state:?}: {missing_fields:?}")]
    MissingRequiredFields { state: FlowState, missing_fields: Vec<String> },
    #[error("invalid transition from {state:?} using event {event:?}")]
    InvalidTransition { state: FlowState, event: FlowEvent },
}

impl BookingWizard {
    pub fn state(&self) -> FlowState {
        match self {
            Self::Form => FlowState::Form,
            Self::ContractReview(_) => FlowState::ContractReview,
            Self::Confirmed(_) => FlowState::Confirmed,
        }
    }

    pub fn contract(&self) -> Option<&ContractDocument> {
        match self {
            Self::Form => None,
            Self::ContractReview(contract) => Some(contract),
            Self::Confirmed(confirmation) => Some(&confirmation.contract),
        }
    }

    pub fn confirmation(&self) -> Option<&Confirmation> {
        match self {
            Self::Confirmed(confirmation) => Some(confirmation),
            _ => None,
        }
    }

    /// Checks that a draft may be requested right now, before any call goes out.
    pub fn ensure_ready_to_draft(
        &self,
        missing_fields: &[String],
    ) -> Result<(), FlowTransitionError> {
        let state = self.state();
        if state != FlowState::Form {
            return Err(FlowTransitionError::InvalidTransition {
                state,
                event: FlowEvent::ContractDrafted,
            });
        }
        if !missing_fields.is_empty() {
            return Err(FlowTransitionError::MissingRequiredFields {
                state,
                missing_fields: missing_fields.to_vec(),
            });
        }
        Ok(())
    }

    /// Applies a command. On error the wizard is left where it was.
    pub fn apply(
        &mut self,
        command: WizardCommand,
    ) -> Result<TransitionOutcome, FlowTransitionError> {
        use FlowAction::{
            DiscardContract, ResetFormKeepingPaymentHandle, ShowContract, ShowPaymentLink,
        };

        let from = self.state();
        let event = command.event();

        let (next, actions) = match (std::mem::take(self), command) {
            (Self::Form, WizardCommand::ContractDrafted(contract)) => {
                (Self::ContractReview(contract), vec![ShowContract])
            }
            (Self::ContractReview(_), WizardCommand::DiscardDraft) => {
                (Self::Form, vec![DiscardContract])
            }
            (Self::ContractReview(contract), WizardCommand::ConfirmBooking { payment_link }) => {
                (Self::Confirmed(Confirmation { contract, payment_link }), vec![ShowPaymentLink])
            }
            (Self::Confirmed(_), WizardCommand::StartNewBooking) => {
                (Self::Form, vec![ResetFormKeepingPaymentHandle])
            }
            (current, _) => {
                *self = current;
                return Err(FlowTransitionError::InvalidTransition { state: from, event });
            }
        };

        *self = next;
        Ok(TransitionOutcome { from, to: self.state(), event, actions })
    }
}
