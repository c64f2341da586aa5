use async_trait::async_trait;
use thiserror::Error;

use royal_core::domain::lead::Lead;

pub mod hosted;
pub mod lead;
pub mod memory;

pub use hosted::HostedLeadStore;
pub use lead::SqlLeadStore;
pub use memory::InMemoryLeadStore;

#[derive(Debug, Error)]
pub enum LeadStoreError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),
    #[error("lead store request failed: {0}")]
    Transport(String),
    #[error("lead store rejected insert with status {status}: {body}")]
    Rejected { status: u16, body: String },
    #[error("lead store is misconfigured: {0}")]
    Misconfigured(String),
}

/// Single-insert sink for mailing-list signups.
#[async_trait]
pub trait LeadStore: Send + Sync {
    fn backend(&self) -> &'static str;
    async fn insert(&self, lead: &Lead) -> Result<(), LeadStoreError>;
}
