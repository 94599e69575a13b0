use crate::domain::checkout::{PaymentMethod, PaymentOutcome};
use crate::processors::{MethodProcessor, ProcessorRequest};
use anyhow::Result;
use std::time::Duration;

pub struct OfflineProcessor {
    pub method: PaymentMethod,
    pub delay: Duration,
}

#[async_trait::async_trait]
impl MethodProcessor for OfflineProcessor {
    fn name(&self) -> &'static str {
        match self.method {
            PaymentMethod::BankTransfer => "bank_transfer",
            _ => "cash_on_delivery",
        }
    }

    async fn process(&self, _request: &ProcessorRequest) -> Result<PaymentOutcome> {
        tokio::time::sleep(self.delay).await;
        Ok(PaymentOutcome::Success)
    }
}
