use crate::domain::order::{CreateOrderResponse, OrderSnapshot};
use anyhow::{anyhow, Result};
use serde::Deserialize;
use serde_json::json;

#[async_trait::async_trait]
pub trait OrdersApi: Send + Sync {
    async fn delivery_districts(&self) -> Result<Vec<String>>;

    async fn delivery_times(&self) -> Result<Vec<String>>;

    async fn create_order(&self, snapshot: &OrderSnapshot) -> Result<String>;

    async fn submit_payment_proof(&self, order_id: &str, payment_proof: &str, token: &str) -> Result<()>;

    async fn healthcheck(&self) -> bool;
}

#[derive(Debug, Deserialize)]
struct ListResponse {
    #[allow(dead_code)]
    success: bool,
    data: Vec<String>,
}

pub struct HttpOrdersClient {
    pub base_url: String,
    pub timeout_ms: u64,
    pub client: reqwest::Client,
}

impl HttpOrdersClient {
    fn timeout(&self) -> std::time::Duration {
        std::time::Duration::from_millis(self.timeout_ms)
    }

    async fn fetch_list(&self, path: &str) -> Result<Vec<String>> {
        let resp = self
            .client
            .get(format!("{}{}", self.base_url, path))
            .timeout(self.timeout())
            .send()
            .await?;

        if !resp.status().is_success() {
            return Err(anyhow!("HTTP_{} from {}", resp.status().as_u16(), path));
        }

        let body: ListResponse = resp.json().await?;
        Ok(body.data)
    }
}

#[async_trait::async_trait]
impl OrdersApi for HttpOrdersClient {
    async fn delivery_districts(&self) -> Result<Vec<String>> {
        self.fetch_list("/orders/delivery/districts").await
    }

    async fn delivery_times(&self) -> Result<Vec<String>> {
        self.fetch_list("/orders/delivery/times").await
    }

    async fn create_order(&self, snapshot: &OrderSnapshot) -> Result<String> {
        let resp = self
            .client
            .post(format!("{}/orders/create", self.base_url))
            .json(snapshot)
            .timeout(self.timeout())
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(anyhow!(
                "order creation failed: HTTP_{} {}",
                status.as_u16(),
                body.chars().take(200).collect::<String>()
            ));
        }

        let body: CreateOrderResponse = resp.json().await?;
        if !body.success {
            return Err(anyhow!("order creation rejected by orders API"));
        }
        Ok(body.data.id)
    }

    async fn submit_payment_proof(&self, order_id: &str, payment_proof: &str, token: &str) -> Result<()> {
        let resp = self
            .client
            .post(format!("{}/orders/{}/payment-proof", self.base_url, order_id))
            .bearer_auth(token)
            .json(&json!({ "paymentProof": payment_proof }))
            .timeout(self.timeout())
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(anyhow!(
                "payment proof submission failed: HTTP_{} {}",
                status.as_u16(),
                body.chars().take(200).collect::<String>()
            ));
        }
        Ok(())
    }

    async fn healthcheck(&self) -> bool {
        self.fetch_list("/orders/delivery/times").await.is_ok()
    }
}
