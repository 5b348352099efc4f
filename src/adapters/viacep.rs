use crate::domain::model::ViaCepRecord;
use crate::domain::ports::RemoteLookup;
use crate::utils::error::{CepError, Result};
use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;

pub const DEFAULT_BASE_URL: &str = "http://www.viacep.com.br/ws";

/// Client for the ViaCEP address service (`{base_url}/{code}/json/`).
pub struct ViaCepClient {
    client: Client,
    base_url: String,
}

impl ViaCepClient {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    pub fn endpoint(&self, code: &str) -> String {
        format!("{}/{}/json/", self.base_url, code)
    }
}

#[async_trait]
impl RemoteLookup for ViaCepClient {
    async fn fetch(&self, code: &str) -> Result<ViaCepRecord> {
        let url = self.endpoint(code);
        tracing::debug!("Making API request to: {}", url);

        let response = self.client.get(&url).send().await?;
        let status = response.status();
        tracing::debug!("API response status: {}", status);

        if !status.is_success() {
            return Err(CepError::RemoteTransportError {
                code: code.to_string(),
                message: format!("HTTP status {}", status),
            });
        }

        Ok(response.json::<ViaCepRecord>().await?)
    }
}
