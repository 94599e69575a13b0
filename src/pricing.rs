use crate::domain::checkout::{CheckoutContext, InstallmentPlan, PaymentMethod};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CurrencyRate {
    pub code: String,
    pub symbol: String,
    pub rate: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PricingConfig {
    pub rates: Vec<CurrencyRate>,
    pub cod_fee: f64,
    pub klarna_plans: Vec<InstallmentPlan>,
    pub affirm_plans: Vec<InstallmentPlan>,
}

impl Default for PricingConfig {
    fn default() -> Self {
        Self {
            rates: vec![
                rate("USD", "$", 1.0),
                rate("EUR", "€", 0.92),
                rate("GBP", "£", 0.79),
                rate("BDT", "৳", 109.50),
                rate("INR", "₹", 83.20),
            ],
            cod_fee: 2.99,
            klarna_plans: vec![
                plan(3, 1.99, "3 interest-free monthly payments"),
                plan(6, 2.99, "6 monthly payments"),
                plan(12, 4.99, "12 monthly payments"),
            ],
            affirm_plans: vec![
                plan(3, 2.49, "3 monthly payments"),
                plan(6, 3.49, "6 monthly payments"),
                plan(12, 5.99, "12 monthly payments"),
            ],
        }
    }
}

fn rate(code: &str, symbol: &str, value: f64) -> CurrencyRate {
    CurrencyRate {
        code: code.to_string(),
        symbol: symbol.to_string(),
        rate: value,
    }
}

fn plan(months: u32, flat_fee: f64, description: &str) -> InstallmentPlan {
    InstallmentPlan {
        months,
        flat_fee,
        description: description.to_string(),
    }
}

impl PricingConfig {
    pub fn rate(&self, code: &str) -> Option<f64> {
        self.rates.iter().find(|r| r.code == code).map(|r| r.rate)
    }

    pub fn plans_for(&self, method: PaymentMethod) -> &[InstallmentPlan] {
        match method {
            PaymentMethod::Klarna => &self.klarna_plans,
            PaymentMethod::Affirm => &self.affirm_plans,
            _ => &[],
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Totals {
    pub base: f64,
    pub converted: f64,
    pub surcharge: f64,
    pub total: f64,
    pub currency: String,
    pub monthly_amount: Option<f64>,
}

pub fn method_surcharge(
    pricing: &PricingConfig,
    method: PaymentMethod,
    plan: Option<&InstallmentPlan>,
) -> f64 {
    match method {
        PaymentMethod::CashOnDelivery => pricing.cod_fee,
        m if m.is_bnpl() => plan.map(|p| p.flat_fee).unwrap_or(0.0),
        _ => 0.0,
    }
}

pub fn monthly_amount(converted: f64, plan: &InstallmentPlan) -> f64 {
    (converted + plan.flat_fee) / plan.months as f64
}

pub fn compute_total(ctx: &CheckoutContext, pricing: &PricingConfig) -> Totals {
    let base = ctx.product.unit_price * ctx.quantity as f64;
    let converted = base * pricing.rate(&ctx.currency).unwrap_or(1.0);
    let surcharge = method_surcharge(pricing, ctx.payment_method, ctx.installment_plan.as_ref());
    let total = converted + surcharge;
    let monthly = if ctx.payment_method.is_bnpl() {
        ctx.installment_plan.as_ref().map(|p| monthly_amount(converted, p))
    } else {
        None
    };

    Totals {
        base,
        converted,
        surcharge,
        total,
        currency: ctx.currency.clone(),
        monthly_amount: monthly,
    }
}
