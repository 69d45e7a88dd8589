pub mod error;
pub mod types;

pub use error::{AnnuaireError, Result};
pub use types::{ContactRecord, ContactsResponse};

use std::time::Duration;

pub struct AnnuaireClient {
    client: reqwest::Client,
    base_url: String,
    token: Option<String>,
}

impl AnnuaireClient {
    pub fn new(base_url: &str, token: Option<&str>, timeout: Duration, user_agent: &str) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(user_agent)
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            token: token.map(String::from),
        })
    }

    /// Fetch contact records for a set of organization identifiers.
    /// Identifiers the directory does not know are simply absent from the map.
    pub async fn lookup(&self, ids: &[String]) -> Result<ContactsResponse> {
        if ids.is_empty() {
            return Ok(ContactsResponse::new());
        }

        let endpoint = format!("{}/contacts", self.base_url);
        let joined = ids.join(",");

        let mut request = self.client.get(&endpoint).query(&[("ids", joined.as_str())]);
        if let Some(ref token) = self.token {
            request = request.bearer_auth(token);
        }

        let resp = request.send().await?;

        let status = resp.status();
        if !status.is_success() {
            let message = resp.text().await.unwrap_or_default();
            return Err(AnnuaireError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let body = resp.text().await?;
        let contacts: ContactsResponse = serde_json::from_str(&body)?;
        tracing::debug!(requested = ids.len(), found = contacts.len(), "Directory lookup complete");

        Ok(contacts)
    }
}
