use chrono::{DateTime, Utc};
use sqlx::Row;
use uuid::Uuid;

use royal_core::domain::lead::Lead;

use super::{LeadStore, LeadStoreError};
use crate::DbPool;

/// A lead as persisted by the local store.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StoredLead {
    pub id: String,
    pub lead: Lead,
    pub created_at: DateTime<Utc>,
}

pub struct SqlLeadStore {
    pool: DbPool,
}

impl SqlLeadStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    /// Newest first.
    pub async fn recent(&self, limit: u32) -> Result<Vec<StoredLead>, LeadStoreError> {
        let rows = sqlx::query(
            "SELECT id, email, phone, created_at
             FROM leads
             ORDER BY created_at DESC, id DESC
             LIMIT ?",
        )
        .bind(i64::from(limit))
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(row_to_stored_lead).collect()
    }

    pub async fn count(&self) -> Result<i64, LeadStoreError> {
        let count = sqlx::query("SELECT COUNT(*) AS count FROM leads")
            .fetch_one(&self.pool)
            .await?
            .try_get::<i64, _>("count")?;
        Ok(count)
    }
}

fn row_to_stored_lead(row: &sqlx::sqlite::SqliteRow) -> Result<StoredLead, LeadStoreError> {
    let id: String = row.try_get("id")?;
    let email: String = row.try_get("email")?;
    let phone: Option<String> = row.try_get("phone")?;
    let created_at_str: String = row.try_get("created_at")?;

    let created_at = DateTime::parse_from_rfc3339(&created_at_str)
        .map(|dt| dt.with_timezone(&Utc))
        .unwrap_or_else(|_| Utc::now());

    Ok(StoredLead { id, lead: Lead { email, phone }, created_at })
}

#[async_trait::async_trait]
impl LeadStore for SqlLeadStore {
    fn backend(&self) -> &'static str {
        "sqlite"
    }

    async fn insert(&self, lead: &Lead) -> Result<(), LeadStoreError> {
        sqlx::query("INSERT INTO leads (id, email, phone, created_at) VALUES (?, ?, ?, ?)")
            .bind(Uuid::new_v4().to_string())
            .bind(&lead.email)
            .bind(lead.phone.as_deref())
            .bind(Utc::now().to_rfc3339())
            .execute(&self.pool)
            .await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use royal_core::domain::lead::Lead;

    use super::SqlLeadStore;
    use crate::migrations::run_pending;
    use crate::repositories::LeadStore;
    use crate::{connect_with_settings, DbPool};

    async fn pool() -> DbPool {
        let pool = connect_with_settings("sqlite::memory:", 1, 30).await.expect("connect");
        run_pending(&pool).await.expect("run migrations");
        pool
    }

    #[tokio::test]
    async fn insert_persists_email_and_nullable_phone() {
        let store = SqlLeadStore::new(pool().await);

        let vip = Lead::new("vip@example.com", Some("555-0100")).expect("lead");
        let quiet = Lead::new("quiet@example.com", None).expect("lead");
        store.insert(&vip).await.expect("insert with phone");
        store.insert(&quiet).await.expect("insert without phone");

        assert_eq!(store.count().await.expect("count"), 2);

        let recent = store.recent(10).await.expect("recent");
        let stored_quiet = recent
            .iter()
            .find(|stored| stored.lead.email == "quiet@example.com")
            .expect("quiet lead stored");
        assert_eq!(stored_quiet.lead, quiet);
        assert!(recent.iter().any(|stored| stored.lead.phone.as_deref() == Some("555-0100")));
    }

    #[tokio::test]
    async fn duplicate_emails_are_accepted() {
        let store = SqlLeadStore::new(pool().await);
        let lead = Lead::new("again@example.com", None).expect("lead");

        store.insert(&lead).await.expect("first insert");
        store.insert(&lead).await.expect("second insert");

        assert_eq!(store.count().await.expect("count"), 2);
    }
}
