use crate::domain::checkout::{CardInput, PaymentMethod, PaymentOutcome};
use anyhow::Result;
use std::time::Duration;

pub mod bnpl;
pub mod card;
pub mod offline;
pub mod wallet;

#[derive(Debug, Clone)]
pub struct ProcessorRequest {
    pub method: PaymentMethod,
    pub amount: f64,
    pub currency: String,
    pub card: Option<CardInput>,
}

#[async_trait::async_trait]
pub trait MethodProcessor: Send + Sync {
    fn name(&self) -> &'static str;

    async fn process(&self, request: &ProcessorRequest) -> Result<PaymentOutcome>;
}

pub fn processor_for(method: PaymentMethod, delay: Duration) -> Box<dyn MethodProcessor> {
    match method {
        PaymentMethod::Card => Box::new(card::CardProcessor { delay }),
        PaymentMethod::Bkash | PaymentMethod::Nagad | PaymentMethod::Rocket => {
            Box::new(wallet::WalletProcessor { provider: method, delay })
        }
        PaymentMethod::Klarna | PaymentMethod::Affirm => {
            Box::new(bnpl::BnplProcessor { provider: method, delay })
        }
        PaymentMethod::BankTransfer | PaymentMethod::CashOnDelivery => {
            Box::new(offline::OfflineProcessor { method, delay })
        }
    }
}
