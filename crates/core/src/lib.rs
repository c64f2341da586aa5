pub mod config;
pub mod domain;
pub mod errors;
pub mod flows;
pub mod payment;
pub mod pricing;

pub use domain::booking::{BookingInput, EventType};
pub use domain::contract::{BusinessTerms, ContractDocument};
pub use domain::lead::Lead;
pub use domain::playlist::{Playlist, PlaylistRequest, Song};
pub use domain::quote::{Quote, QuoteLine, QuoteLineKind};
pub use errors::{ApplicationError, DomainError, InterfaceError};
pub use flows::{BookingWizard, FlowState, WizardCommand};
pub use payment::PaymentLink;
pub use pricing::{DeterministicPricingEngine, PricingEngine, PricingSchedule, QuoteInput};
