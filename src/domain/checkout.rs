use chrono::{Datelike, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentMethod {
    Card,
    Bkash,
    Nagad,
    Rocket,
    BankTransfer,
    CashOnDelivery,
    Klarna,
    Affirm,
}

impl PaymentMethod {
    pub fn is_wallet(&self) -> bool {
        matches!(self, PaymentMethod::Bkash | PaymentMethod::Nagad | PaymentMethod::Rocket)
    }

    pub fn is_bnpl(&self) -> bool {
        matches!(self, PaymentMethod::Klarna | PaymentMethod::Affirm)
    }

    pub fn label(&self) -> &'static str {
        match self {
            PaymentMethod::Card => "Credit / Debit Card",
            PaymentMethod::Bkash => "bKash",
            PaymentMethod::Nagad => "Nagad",
            PaymentMethod::Rocket => "Rocket",
            PaymentMethod::BankTransfer => "Bank Transfer",
            PaymentMethod::CashOnDelivery => "Cash on Delivery",
            PaymentMethod::Klarna => "Klarna",
            PaymentMethod::Affirm => "Affirm",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductRef {
    pub product_id: String,
    pub name: String,
    pub unit_price: f64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BuyerProfile {
    pub name: String,
    pub contact_number: String,
    pub location: Option<String>,
    pub country: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CardInput {
    pub card_number: String,
    pub expiry: String,
    pub cvv: String,
    pub cardholder_name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InstallmentPlan {
    pub months: u32,
    pub flat_fee: f64,
    pub description: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentOutcome {
    Success,
    Declined,
    InsufficientFunds,
    ExpiredCard,
    IncorrectCvc,
    IncorrectNumber,
    StepUpRequired,
}

impl PaymentOutcome {
    pub fn code(&self) -> &'static str {
        match self {
            PaymentOutcome::Success => "SUCCESS",
            PaymentOutcome::Declined => "DECLINED",
            PaymentOutcome::InsufficientFunds => "INSUFFICIENT_FUNDS",
            PaymentOutcome::ExpiredCard => "EXPIRED_CARD",
            PaymentOutcome::IncorrectCvc => "INCORRECT_CVC",
            PaymentOutcome::IncorrectNumber => "INCORRECT_NUMBER",
            PaymentOutcome::StepUpRequired => "STEP_UP_REQUIRED",
        }
    }

    pub fn decline_message(&self) -> &'static str {
        match self {
            PaymentOutcome::Declined => "your card was declined",
            PaymentOutcome::InsufficientFunds => "your card has insufficient funds",
            PaymentOutcome::ExpiredCard => "your card has expired",
            PaymentOutcome::IncorrectCvc => "your card's security code is incorrect",
            PaymentOutcome::IncorrectNumber => "your card number is incorrect",
            _ => "payment was not completed",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StepUpChallenge {
    pub attempts: u32,
    pub verified: bool,
}

impl StepUpChallenge {
    pub fn new() -> Self {
        Self { attempts: 0, verified: false }
    }
}

impl Default for StepUpChallenge {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CheckoutPhase {
    Idle,
    Validating,
    Processing,
    StepUp,
    Verifying,
    Succeeded,
    Failed,
}

impl CheckoutPhase {
    pub fn accepts_submit(&self) -> bool {
        matches!(self, CheckoutPhase::Idle | CheckoutPhase::Failed)
    }

    pub fn accepts_edit(&self) -> bool {
        matches!(self, CheckoutPhase::Idle | CheckoutPhase::Failed)
    }
}

#[derive(Debug, Clone)]
pub struct CheckoutContext {
    pub product: ProductRef,
    pub quantity: i64,
    pub purchase_date: Option<NaiveDate>,
    pub delivery_time: Option<String>,
    pub delivery_location: Option<String>,
    pub message: String,
    pub buyer: BuyerProfile,
    pub currency: String,
    pub payment_method: PaymentMethod,
    pub card: CardInput,
    pub installment_plan: Option<InstallmentPlan>,
}

impl CheckoutContext {
    pub fn new(product: ProductRef) -> Self {
        Self {
            product,
            quantity: 1,
            purchase_date: None,
            delivery_time: None,
            delivery_location: None,
            message: String::new(),
            buyer: BuyerProfile::default(),
            currency: "USD".to_string(),
            payment_method: PaymentMethod::CashOnDelivery,
            card: CardInput::default(),
            installment_plan: None,
        }
    }

    pub fn set_payment_method(&mut self, method: PaymentMethod) {
        if method != self.payment_method {
            self.card = CardInput::default();
            if !method.is_bnpl() {
                self.installment_plan = None;
            }
        }
        self.payment_method = method;
    }

    pub fn set_purchase_date(
        &mut self,
        date: NaiveDate,
        today: NaiveDate,
        no_delivery: Weekday,
    ) -> Result<(), &'static str> {
        if date < today {
            return Err("purchase date cannot be in the past");
        }
        if date.weekday() == no_delivery {
            return Err("no deliveries on the selected weekday");
        }
        self.purchase_date = Some(date);
        Ok(())
    }
}
