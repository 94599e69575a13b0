use crate::domain::checkout::PaymentOutcome;
use crate::processors::{MethodProcessor, ProcessorRequest};
use anyhow::{anyhow, Result};
use std::time::Duration;

pub const STEP_UP_PREFIX: &str = "4000";

// One entry per number; the upstream table mapped 4000000000000002 to two
// different outcomes, resolved here to DECLINED (first match wins).
pub const TEST_CARD_TABLE: &[(&str, PaymentOutcome)] = &[
    ("4242424242424242", PaymentOutcome::Success),
    ("4000000000000002", PaymentOutcome::Declined),
    ("4000000000009995", PaymentOutcome::InsufficientFunds),
    ("4000000000000069", PaymentOutcome::ExpiredCard),
    ("4000000000000127", PaymentOutcome::IncorrectCvc),
    ("4242424242424241", PaymentOutcome::IncorrectNumber),
];

pub fn strip_formatting(number: &str) -> String {
    number.chars().filter(|c| c.is_ascii_digit()).collect()
}

pub fn lookup_outcome(number: &str) -> PaymentOutcome {
    let digits = strip_formatting(number);
    let base = TEST_CARD_TABLE
        .iter()
        .find(|(n, _)| *n == digits)
        .map(|(_, outcome)| *outcome)
        .unwrap_or(PaymentOutcome::Success);

    if base == PaymentOutcome::Success && digits.starts_with(STEP_UP_PREFIX) {
        PaymentOutcome::StepUpRequired
    } else {
        base
    }
}

pub struct CardProcessor {
    pub delay: Duration,
}

#[async_trait::async_trait]
impl MethodProcessor for CardProcessor {
    fn name(&self) -> &'static str {
        "card"
    }

    async fn process(&self, request: &ProcessorRequest) -> Result<PaymentOutcome> {
        let card = request
            .card
            .as_ref()
            .ok_or_else(|| anyhow!("card details missing for card payment"))?;

        tokio::time::sleep(self.delay).await;
        Ok(lookup_outcome(&card.card_number))
    }
}
