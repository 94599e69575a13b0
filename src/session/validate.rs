use crate::domain::checkout::{CardInput, CheckoutContext, PaymentMethod};
use crate::processors::card::strip_formatting;
use chrono::{Datelike, NaiveDate, Weekday};

pub const MAX_QUANTITY: i64 = 99;
pub const MAX_MESSAGE_LEN: usize = 500;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub field: &'static str,
    pub message: String,
}

fn field_err(field: &'static str, message: &str) -> FieldError {
    FieldError {
        field,
        message: message.to_string(),
    }
}

pub fn clamp_quantity(quantity: i64) -> i64 {
    quantity.clamp(1, MAX_QUANTITY)
}

pub fn validate_submit(
    ctx: &CheckoutContext,
    today: NaiveDate,
    no_delivery: Weekday,
) -> Result<(), FieldError> {
    if ctx.buyer.name.trim().is_empty() {
        return Err(field_err("name", "buyer name is required"));
    }
    if ctx.buyer.contact_number.trim().is_empty() {
        return Err(field_err("contactNumber", "contact number is required"));
    }

    let date = ctx
        .purchase_date
        .ok_or_else(|| field_err("purchaseDate", "purchase date is required"))?;
    if date < today {
        return Err(field_err("purchaseDate", "purchase date cannot be in the past"));
    }
    if date.weekday() == no_delivery {
        return Err(field_err("purchaseDate", "no deliveries on the selected weekday"));
    }

    if ctx.delivery_time.as_deref().map_or(true, |t| t.trim().is_empty()) {
        return Err(field_err("deliveryTime", "delivery time is required"));
    }
    if ctx.delivery_location.as_deref().map_or(true, |l| l.trim().is_empty()) {
        return Err(field_err("deliveryLocation", "delivery location is required"));
    }
    if ctx.message.chars().count() > MAX_MESSAGE_LEN {
        return Err(field_err("message", "message must be 500 characters or fewer"));
    }

    if ctx.payment_method == PaymentMethod::Card {
        validate_card(&ctx.card)?;
    }

    Ok(())
}

pub fn validate_card(card: &CardInput) -> Result<(), FieldError> {
    let digits = strip_formatting(&card.card_number);
    if digits.len() != 16 {
        return Err(field_err("cardNumber", "card number must be 16 digits"));
    }
    if !is_valid_expiry(&card.expiry) {
        return Err(field_err("expiry", "expiry must be in MM/YY format"));
    }
    let cvv_ok = (3..=4).contains(&card.cvv.len()) && card.cvv.chars().all(|c| c.is_ascii_digit());
    if !cvv_ok {
        return Err(field_err("cvv", "security code must be 3 or 4 digits"));
    }
    if card.cardholder_name.trim().is_empty() {
        return Err(field_err("cardholderName", "cardholder name is required"));
    }
    Ok(())
}

fn is_valid_expiry(expiry: &str) -> bool {
    let bytes = expiry.as_bytes();
    if bytes.len() != 5 || bytes[2] != b'/' {
        return false;
    }
    let (mm, yy) = (&expiry[..2], &expiry[3..]);
    let month_ok = mm.parse::<u32>().map_or(false, |m| (1..=12).contains(&m));
    month_ok && yy.chars().all(|c| c.is_ascii_digit())
}
