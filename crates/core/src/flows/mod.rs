pub mod engine;
pub mod states;

pub use engine::FlowTransitionError;
pub use states::{
    BookingWizard, Confirmation, FlowAction, FlowEvent, FlowState, TransitionOutcome,
    WizardCommand,
};
