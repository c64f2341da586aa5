use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION};
use reqwest::Client;
use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;

use royal_core::domain::lead::Lead;

use super::{LeadStore, LeadStoreError};

/// Hosted table behind a PostgREST-style endpoint: `POST {url}/rest/v1/{table}`.
pub struct HostedLeadStore {
    client: Client,
    insert_url: String,
    anon_key: SecretString,
}

#[derive(Serialize)]
struct LeadRow<'a> {
    email: &'a str,
    phone: Option<&'a str>,
}

impl HostedLeadStore {
    pub fn new(url: &str, anon_key: SecretString, table: &str) -> Result<Self, LeadStoreError> {
        let client =
            Client::builder().build().map_err(|err| LeadStoreError::Transport(err.to_string()))?;
        let insert_url = format!("{}/rest/v1/{}", url.trim().trim_end_matches('/'), table.trim());
        Ok(Self { client, insert_url, anon_key })
    }

    pub fn insert_url(&self) -> &str {
        &self.insert_url
    }

    fn build_headers(&self) -> Result<HeaderMap, LeadStoreError> {
        let key = self.anon_key.expose_secret();
        let invalid_key = |_| LeadStoreError::Misconfigured("invalid anon key".to_string());

        let mut headers = HeaderMap::new();
        headers.insert("apikey", HeaderValue::from_str(key).map_err(invalid_key)?);
        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_str(&format!("Bearer {key}")).map_err(invalid_key)?,
        );
        headers.insert("Prefer", HeaderValue::from_static("return=minimal"));
        Ok(headers)
    }
}

#[async_trait::async_trait]
impl LeadStore for HostedLeadStore {
    fn backend(&self) -> &'static str {
        "hosted"
    }

    async fn insert(&self, lead: &Lead) -> Result<(), LeadStoreError> {
        let rows = [LeadRow { email: &lead.email, phone: lead.phone.as_deref() }];
        let response = self
            .client
            .post(&self.insert_url)
            .headers(self.build_headers()?)
            .json(&rows)
            .send()
            .await
            .map_err(|err| LeadStoreError::Transport(err.to_string()))?;

        let status = response.status();
        if status.is_success() {
            return Ok(());
        }

        let body = response.text().await.unwrap_or_default();
        Err(LeadStoreError::Rejected { status: status.as_u16(), body })
    }
}
