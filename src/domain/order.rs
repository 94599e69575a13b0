use crate::domain::checkout::{
    BuyerProfile, CheckoutPhase, PaymentMethod, ProductRef,
};
use crate::pricing::Totals;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderSnapshot {
    pub product_id: String,
    pub quantity: i64,
    pub purchase_date: NaiveDate,
    pub delivery_time: String,
    pub delivery_location: String,
    pub message: String,
    pub payment_method: PaymentMethod,
    pub total_amount: f64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateOrderResponse {
    pub success: bool,
    pub data: CreatedOrder,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreatedOrder {
    #[serde(rename = "_id")]
    pub id: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OpenCheckoutRequest {
    pub product_id: String,
    pub product_name: String,
    pub unit_price: f64,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateCheckoutRequest {
    pub quantity: Option<i64>,
    pub purchase_date: Option<NaiveDate>,
    pub delivery_time: Option<String>,
    pub delivery_location: Option<String>,
    pub message: Option<String>,
    pub name: Option<String>,
    pub contact_number: Option<String>,
    pub location: Option<String>,
    pub country: Option<String>,
    pub currency: Option<String>,
    pub payment_method: Option<PaymentMethod>,
    pub card_number: Option<String>,
    pub expiry: Option<String>,
    pub cvv: Option<String>,
    pub cardholder_name: Option<String>,
    pub installment_months: Option<u32>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct VerifyOtpRequest {
    pub otp: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentProofRequest {
    pub payment_proof: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SubmitStatus {
    Success,
    StepUpRequired,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitResponse {
    pub status: SubmitStatus,
    pub order_id: Option<String>,
    pub payment_method: PaymentMethod,
    pub total_amount: f64,
    pub currency: String,
    pub monthly_amount: Option<f64>,
    pub profile_synced: Option<bool>,
    pub awaiting_payment_proof: bool,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutView {
    pub phase: CheckoutPhase,
    pub product: ProductRef,
    pub quantity: i64,
    pub purchase_date: Option<NaiveDate>,
    pub delivery_time: Option<String>,
    pub delivery_location: Option<String>,
    pub message: String,
    pub buyer: BuyerProfile,
    pub currency: String,
    pub payment_method: PaymentMethod,
    pub installment_months: Option<u32>,
    pub totals: Totals,
    pub order_id: Option<String>,
    pub awaiting_payment_proof: bool,
    pub payment_proof_submitted: bool,
}
