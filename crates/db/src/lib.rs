pub mod capture;
pub mod connection;
pub mod migrations;
pub mod repositories;

pub use capture::{open_lead_store, LeadCapture, LeadOutcome};
pub use connection::{connect, connect_with_settings, DbPool};
pub use repositories::{
    HostedLeadStore, InMemoryLeadStore, LeadStore, LeadStoreError, SqlLeadStore,
};
