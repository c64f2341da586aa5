use serde::{Deserialize, Serialize};

use crate::domain::contract::ContractDocument;
use crate::payment::PaymentLink;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum FlowState {
    Form,
    ContractReview,
    Confirmed,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum FlowEvent {
    ContractDrafted,
    DraftDiscarded,
    BookingConfirmed,
    NewBookingStarted,
}

/// A wizard event together with whatever it carries forward.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum WizardCommand {
    ContractDrafted(ContractDocument),
    DiscardDraft,
    ConfirmBooking { payment_link: Option<PaymentLink> },
    StartNewBooking,
}

impl WizardCommand {
    pub fn event(&self) -> FlowEvent {
        match self {
            Self::ContractDrafted(_) => FlowEvent::ContractDrafted,
            Self::DiscardDraft => FlowEvent::DraftDiscarded,
            Self::ConfirmBooking { .. } => FlowEvent::BookingConfirmed,
            Self::StartNewBooking => FlowEvent::NewBookingStarted,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Confirmation {
    pub contract: ContractDocument,
    pub payment_link: Option<PaymentLink>,
}

/// Booking wizard position. Review and confirmation always hold the drafted
/// contract, so a confirmation without a contract cannot be built.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum BookingWizard {
    #[default]
    Form,
    ContractReview(ContractDocument),
    Confirmed(Confirmation),
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum FlowAction {
    ShowContract,
    DiscardContract,
    ShowPaymentLink,
    ResetFormKeepingPaymentHandle,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransitionOutcome {
    pub from: FlowState,
    pub to: FlowState,
    pub event: FlowEvent,
    pub actions: Vec<FlowAction>,
}
