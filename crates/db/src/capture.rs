use std::sync::Arc;

use royal_core::config::{LeadBackend, LeadsConfig};
use royal_core::domain::lead::Lead;
use serde::Serialize;
use tracing::{error, info, warn};

use crate::connection::connect_with_settings;
use crate::migrations::run_pending;
use crate::repositories::{HostedLeadStore, LeadStore, LeadStoreError, SqlLeadStore};

pub const JOINED_MESSAGE: &str = "Welcome to the Royal Circle! 💎";
pub const NOT_CONFIGURED_MESSAGE: &str = "Error: Database connection is not configured.";
pub const FAILED_MESSAGE: &str = "Something went wrong. Please try again.";
pub const INVALID_EMAIL_MESSAGE: &str = "Please enter your email address.";

/// Result of one signup attempt. None of these are fatal.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LeadOutcome {
    Joined,
    InvalidEmail,
    NotConfigured,
    Failed,
}

impl LeadOutcome {
    pub fn user_message(self) -> &'static str {
        match self {
            Self::Joined => JOINED_MESSAGE,
            Self::InvalidEmail => INVALID_EMAIL_MESSAGE,
            Self::NotConfigured => NOT_CONFIGURED_MESSAGE,
            Self::Failed => FAILED_MESSAGE,
        }
    }

    pub fn is_success(self) -> bool {
        matches!(self, Self::Joined)
    }
}

/// Mailing-list signup. A missing store is a reportable outcome, not an error.
#[derive(Clone)]
pub struct LeadCapture {
    store: Option<Arc<dyn LeadStore>>,
}

impl LeadCapture {
    pub fn new(store: Option<Arc<dyn LeadStore>>) -> Self {
        Self { store }
    }

    pub fn unconfigured() -> Self {
        Self { store: None }
    }

    pub fn is_configured(&self) -> bool {
        self.store.is_some()
    }

    pub async fn join(&self, email: &str, phone: Option<&str>) -> LeadOutcome {
        let Ok(lead) = Lead::new(email, phone) else {
            return LeadOutcome::InvalidEmail;
        };

        let Some(store) = &self.store else {
            warn!(event_name = "leads.insert.not_configured", "lead store is not configured");
            return LeadOutcome::NotConfigured;
        };

        match store.insert(&lead).await {
            Ok(()) => {
                info!(
                    event_name = "leads.insert.succeeded",
                    backend = store.backend(),
                    has_phone = lead.phone.is_some(),
                    "lead captured"
                );
                LeadOutcome::Joined
            }
            Err(err) => {
                error!(
                    event_name = "leads.insert.failed",
                    backend = store.backend(),
                    error = %err,
                    "lead insert failed"
                );
                LeadOutcome::Failed
            }
        }
    }
}

/// Builds the configured store. `Ok(None)` means leads are disabled or the
/// hosted backend lacks its url or key.
pub async fn open_lead_store(
    config: &LeadsConfig,
) -> Result<Option<Arc<dyn LeadStore>>, LeadStoreError> {
    match config.backend {
        LeadBackend::Disabled => Ok(None),
        LeadBackend::Hosted => {
            if !config.hosted_ready() {
                return Ok(None);
            }
            let (Some(url), Some(anon_key)) = (config.url.as_deref(), config.anon_key.clone())
            else {
                return Ok(None);
            };
            let store = HostedLeadStore::new(url, anon_key, &config.table)?;
            Ok(Some(Arc::new(store)))
        }
        LeadBackend::Sqlite => {
            let url = config.url.as_deref().map(str::trim).unwrap_or_default();
            if url.is_empty() {
                return Err(LeadStoreError::Misconfigured("sqlite url is missing".to_string()));
            }
            let pool = connect_with_settings(url, config.max_connections, 30).await?;
            run_pending(&pool).await?;
            Ok(Some(Arc::new(SqlLeadStore::new(pool))))
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use async_trait::async_trait;
    use royal_core::config::{AppConfig, LeadBackend};
    use royal_core::domain::lead::Lead;

    use super::{
        open_lead_store, LeadCapture, LeadOutcome, FAILED_MESSAGE, JOINED_MESSAGE,
        NOT_CONFIGURED_MESSAGE,
    };
    use crate::repositories::{InMemoryLeadStore, LeadStore, LeadStoreError};

    struct BrokenStore;

    #[async_trait]
    impl LeadStore for BrokenStore {
        fn backend(&self) -> &'static str {
            "broken"
        }

        async fn insert(&self, _lead: &Lead) -> Result<(), LeadStoreError> {
            Err(LeadStoreError::Transport("connection refused".to_string()))
        }
    }

    #[tokio::test]
    async fn join_inserts_email_and_null_phone() {
        let store = Arc::new(InMemoryLeadStore::default());
        let capture = LeadCapture::new(Some(store.clone()));

        let outcome = capture.join(" vip@example.com ", Some("")).await;

        assert_eq!(outcome, LeadOutcome::Joined);
        assert_eq!(outcome.user_message(), JOINED_MESSAGE);
        assert_eq!(store.leads().await, vec![Lead::new("vip@example.com", None).expect("lead")]);
    }

    #[tokio::test]
    async fn missing_store_is_reported_not_raised() {
        let outcome = LeadCapture::unconfigured().join("vip@example.com", None).await;

        assert_eq!(outcome, LeadOutcome::NotConfigured);
        assert_eq!(outcome.user_message(), NOT_CONFIGURED_MESSAGE);
    }

    #[tokio::test]
    async fn store_failure_yields_retry_message() {
        let outcome = LeadCapture::new(Some(Arc::new(BrokenStore))).join("a@b.co", None).await;

        assert_eq!(outcome, LeadOutcome::Failed);
        assert_eq!(outcome.user_message(), FAILED_MESSAGE);
    }

    #[tokio::test]
    async fn blank_email_never_reaches_the_store() {
        let store = Arc::new(InMemoryLeadStore::default());
        let outcome = LeadCapture::new(Some(store.clone())).join("   ", Some("555")).await;

        assert_eq!(outcome, LeadOutcome::InvalidEmail);
        assert!(store.leads().await.is_empty());
    }

    #[tokio::test]
    async fn hosted_backend_without_credentials_opens_nothing() {
        let config = AppConfig::default();
        assert_eq!(config.leads.backend, LeadBackend::Hosted);

        let store = open_lead_store(&config.leads).await.expect("no error");
        assert!(store.is_none());
    }

    #[tokio::test]
    async fn sqlite_backend_runs_migrations_and_accepts_inserts() {
        let mut config = AppConfig::default().leads;
        config.backend = LeadBackend::Sqlite;
        config.url = Some("sqlite::memory:".to_string());

        let store = open_lead_store(&config).await.expect("open").expect("store configured");
        assert_eq!(store.backend(), "sqlite");

        let outcome = LeadCapture::new(Some(store)).join("vip@example.com", None).await;
        assert_eq!(outcome, LeadOutcome::Joined);
    }
}
