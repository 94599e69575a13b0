use crate::domain::checkout::{PaymentMethod, PaymentOutcome};
use crate::processors::{MethodProcessor, ProcessorRequest};
use anyhow::Result;
use std::time::Duration;

pub struct WalletProcessor {
    pub provider: PaymentMethod,
    pub delay: Duration,
}

#[async_trait::async_trait]
impl MethodProcessor for WalletProcessor {
    fn name(&self) -> &'static str {
        match self.provider {
            PaymentMethod::Nagad => "nagad",
            PaymentMethod::Rocket => "rocket",
            _ => "bkash",
        }
    }

    async fn process(&self, _request: &ProcessorRequest) -> Result<PaymentOutcome> {
        tokio::time::sleep(self.delay).await;
        Ok(PaymentOutcome::Success)
    }
}
