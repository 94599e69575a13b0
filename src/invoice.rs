use crate::domain::checkout::CheckoutContext;
use crate::pricing::Totals;
use chrono::{DateTime, Utc};
use std::fmt::Write;

#[derive(Debug, Clone)]
pub struct InvoiceDocument {
    pub file_name: String,
    pub content_type: &'static str,
    pub body: String,
}

pub fn render(
    ctx: &CheckoutContext,
    order_id: &str,
    totals: &Totals,
    issued_at: DateTime<Utc>,
) -> InvoiceDocument {
    let mut body = String::new();
    let _ = writeln!(body, "INVOICE");
    let _ = writeln!(body, "Order: {order_id}");
    let _ = writeln!(body, "Issued: {}", issued_at.format("%Y-%m-%d %H:%M UTC"));
    let _ = writeln!(body);
    let _ = writeln!(body, "Billed to: {}", ctx.buyer.name);
    let _ = writeln!(body, "Contact:   {}", ctx.buyer.contact_number);
    if let Some(location) = &ctx.buyer.location {
        let _ = writeln!(body, "Location:  {location}");
    }
    let _ = writeln!(body);
    let _ = writeln!(
        body,
        "{} x {} @ {:.2} USD",
        ctx.product.name, ctx.quantity, ctx.product.unit_price
    );
    let _ = writeln!(body, "Subtotal ({}): {:.2}", totals.currency, totals.converted);
    if totals.surcharge > 0.0 {
        let _ = writeln!(body, "Surcharge:     {:.2}", totals.surcharge);
    }
    let _ = writeln!(body, "Total:         {:.2} {}", totals.total, totals.currency);
    if let Some(monthly) = totals.monthly_amount {
        let plan_months = ctx.installment_plan.as_ref().map(|p| p.months).unwrap_or(0);
        let _ = writeln!(body, "Installments:  {plan_months} x {monthly:.2}");
    }
    let _ = writeln!(body);
    let _ = writeln!(body, "Payment method: {}", ctx.payment_method.label());

    InvoiceDocument {
        file_name: format!("invoice-{order_id}.txt"),
        content_type: "text/plain; charset=utf-8",
        body,
    }
}
