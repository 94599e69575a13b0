use crate::domain::checkout::BuyerProfile;
use anyhow::{anyhow, Result};
use serde::Deserialize;

#[async_trait::async_trait]
pub trait ProfileApi: Send + Sync {
    async fn fetch(&self, token: &str) -> Result<Option<BuyerProfile>>;

    async fn update(&self, token: &str, profile: &BuyerProfile) -> Result<()>;
}

#[derive(Debug, Deserialize)]
struct ProfileResponse {
    #[allow(dead_code)]
    success: bool,
    data: Option<BuyerProfile>,
}

pub struct HttpProfileClient {
    pub base_url: String,
    pub timeout_ms: u64,
    pub client: reqwest::Client,
}

impl HttpProfileClient {
    fn timeout(&self) -> std::time::Duration {
        std::time::Duration::from_millis(self.timeout_ms)
    }
}

#[async_trait::async_trait]
impl ProfileApi for HttpProfileClient {
    async fn fetch(&self, token: &str) -> Result<Option<BuyerProfile>> {
        let resp = self
            .client
            .get(format!("{}/users/profile", self.base_url))
            .bearer_auth(token)
            .timeout(self.timeout())
            .send()
            .await?;

        if resp.status() == reqwest::StatusCode::UNAUTHORIZED {
            return Ok(None);
        }
        if !resp.status().is_success() {
            return Err(anyhow!("profile read failed: HTTP_{}", resp.status().as_u16()));
        }

        let body: ProfileResponse = resp.json().await?;
        Ok(body.data)
    }

    async fn update(&self, token: &str, profile: &BuyerProfile) -> Result<()> {
        let resp = self
            .client
            .put(format!("{}/users/profile", self.base_url))
            .bearer_auth(token)
            .json(profile)
            .timeout(self.timeout())
            .send()
            .await?;

        if !resp.status().is_success() {
            return Err(anyhow!("profile update failed: HTTP_{}", resp.status().as_u16()));
        }
        Ok(())
    }
}
