use tokio::sync::RwLock;

use royal_core::domain::lead::Lead;

use super::{LeadStore, LeadStoreError};

#[derive(Default)]
pub struct InMemoryLeadStore {
    leads: RwLock<Vec<Lead>>,
}

impl InMemoryLeadStore {
    pub async fn leads(&self) -> Vec<Lead> {
        self.leads.read().await.clone()
    }
}

#[async_trait::async_trait]
impl LeadStore for InMemoryLeadStore {
    fn backend(&self) -> &'static str {
        "memory"
    }

    async fn insert(&self, lead: &Lead) -> Result<(), LeadStoreError> {
        let mut leads = self.leads.write().await;
        leads.push(lead.clone());
        Ok(())
    }
}
