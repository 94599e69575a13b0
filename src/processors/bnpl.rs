use crate::domain::checkout::{PaymentMethod, PaymentOutcome};
use crate::processors::{MethodProcessor, ProcessorRequest};
use anyhow::Result;
use std::time::Duration;

pub struct BnplProcessor {
    pub provider: PaymentMethod,
    pub delay: Duration,
}

#[async_trait::async_trait]
impl MethodProcessor for BnplProcessor {
    fn name(&self) -> &'static str {
        match self.provider {
            PaymentMethod::Affirm => "affirm",
            _ => "klarna",
        }
    }

    async fn process(&self, _request: &ProcessorRequest) -> Result<PaymentOutcome> {
        tokio::time::sleep(self.delay).await;
        Ok(PaymentOutcome::Success)
    }
}
