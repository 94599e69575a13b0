use crate::clients::orders::OrdersApi;
use crate::clients::profile::ProfileApi;
use crate::domain::checkout::{
    CheckoutContext, CheckoutPhase, PaymentMethod, PaymentOutcome, ProductRef, StepUpChallenge,
};
use crate::domain::order::{
    CheckoutView, OrderSnapshot, SubmitResponse, SubmitStatus, UpdateCheckoutRequest,
};
use crate::invoice::{self, InvoiceDocument};
use crate::pricing::{compute_total, PricingConfig, Totals};
use crate::processors::{processor_for, ProcessorRequest};
use crate::session::validate::{clamp_quantity, validate_submit, FieldError, MAX_MESSAGE_LEN};
use chrono::Weekday;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use uuid::Uuid;

pub const TEST_OTP: &str = "123456";

#[derive(Debug)]
pub enum CheckoutError {
    NoActiveCheckout,
    AlreadyInFlight,
    AlreadyCompleted,
    Validation(FieldError),
    GatewayDeclined {
        outcome: PaymentOutcome,
        message: String,
    },
    InvalidOtp,
    NoChallengeOpen,
    LoginRequired,
    ProofNotExpected,
    Persistence(String),
    Cancelled,
    Internal(anyhow::Error),
}

#[derive(Debug, Clone)]
pub struct CheckoutSession {
    pub context: CheckoutContext,
    pub phase: CheckoutPhase,
    pub attempt_id: Option<Uuid>,
    pub challenge: Option<StepUpChallenge>,
    pub order_id: Option<String>,
    pub profile_synced: Option<bool>,
    pub payment_proof_submitted: bool,
}

impl CheckoutSession {
    fn new(context: CheckoutContext) -> Self {
        Self {
            context,
            phase: CheckoutPhase::Idle,
            attempt_id: None,
            challenge: None,
            order_id: None,
            profile_synced: None,
            payment_proof_submitted: false,
        }
    }
}

#[derive(Clone)]
pub struct CheckoutService {
    pricing: Arc<PricingConfig>,
    orders: Arc<dyn OrdersApi>,
    profiles: Arc<dyn ProfileApi>,
    gateway_delay: Duration,
    no_delivery_weekday: Weekday,
    session: Arc<Mutex<Option<CheckoutSession>>>,
}

impl CheckoutService {
    pub fn new(
        pricing: Arc<PricingConfig>,
        orders: Arc<dyn OrdersApi>,
        profiles: Arc<dyn ProfileApi>,
        gateway_delay: Duration,
        no_delivery_weekday: Weekday,
    ) -> Self {
        Self {
            pricing,
            orders,
            profiles,
            gateway_delay,
            no_delivery_weekday,
            session: Arc::new(Mutex::new(None)),
        }
    }

    pub async fn open(
        &self,
        product: ProductRef,
        token: Option<&str>,
    ) -> Result<CheckoutView, CheckoutError> {
        let mut context = CheckoutContext::new(product);

        if let Some(token) = token {
            match self.profiles.fetch(token).await {
                Ok(Some(profile)) => context.buyer = profile,
                Ok(None) => {}
                Err(e) => tracing::warn!(error = %e, "profile prefill failed, continuing without it"),
            }
        }

        let session = CheckoutSession::new(context);
        let view = self.build_view(&session);
        let mut guard = self.session.lock().await;
        *guard = Some(session);
        Ok(view)
    }

    pub async fn view(&self) -> Result<CheckoutView, CheckoutError> {
        let guard = self.session.lock().await;
        let session = guard.as_ref().ok_or(CheckoutError::NoActiveCheckout)?;
        Ok(self.build_view(session))
    }

    pub async fn quote(&self) -> Result<Totals, CheckoutError> {
        let guard = self.session.lock().await;
        let session = guard.as_ref().ok_or(CheckoutError::NoActiveCheckout)?;
        Ok(compute_total(&session.context, &self.pricing))
    }

    pub async fn update(&self, req: &UpdateCheckoutRequest) -> Result<CheckoutView, CheckoutError> {
        let mut guard = self.session.lock().await;
        let session = guard.as_mut().ok_or(CheckoutError::NoActiveCheckout)?;

        if session.phase == CheckoutPhase::Succeeded {
            return Err(CheckoutError::AlreadyCompleted);
        }
        if !session.phase.accepts_edit() {
            return Err(CheckoutError::AlreadyInFlight);
        }

        self.apply_update(&mut session.context, req)?;
        if session.phase == CheckoutPhase::Failed {
            session.phase = CheckoutPhase::Idle;
        }
        Ok(self.build_view(session))
    }

    fn apply_update(
        &self,
        ctx: &mut CheckoutContext,
        req: &UpdateCheckoutRequest,
    ) -> Result<(), CheckoutError> {
        if let Some(method) = req.payment_method {
            ctx.set_payment_method(method);
        }
        if let Some(quantity) = req.quantity {
            ctx.quantity = quantity;
        }
        if let Some(date) = req.purchase_date {
            let today = chrono::Utc::now().date_naive();
            ctx.set_purchase_date(date, today, self.no_delivery_weekday)
                .map_err(|message| {
                    CheckoutError::Validation(FieldError {
                        field: "purchaseDate",
                        message: message.to_string(),
                    })
                })?;
        }
        if let Some(time) = &req.delivery_time {
            ctx.delivery_time = Some(time.clone());
        }
        if let Some(location) = &req.delivery_location {
            ctx.delivery_location = Some(location.clone());
        }
        if let Some(message) = &req.message {
            if message.chars().count() > MAX_MESSAGE_LEN {
                return Err(CheckoutError::Validation(FieldError {
                    field: "message",
                    message: "message must be 500 characters or fewer".to_string(),
                }));
            }
            ctx.message = message.clone();
        }
        if let Some(name) = &req.name {
            ctx.buyer.name = name.clone();
        }
        if let Some(contact) = &req.contact_number {
            ctx.buyer.contact_number = contact.clone();
        }
        if let Some(location) = &req.location {
            ctx.buyer.location = Some(location.clone());
        }
        if let Some(country) = &req.country {
            ctx.buyer.country = Some(country.clone());
        }
        if let Some(currency) = &req.currency {
            if self.pricing.rate(currency).is_none() {
                return Err(CheckoutError::Validation(FieldError {
                    field: "currency",
                    message: format!("unsupported currency {currency}"),
                }));
            }
            ctx.currency = currency.clone();
        }
        if let Some(number) = &req.card_number {
            ctx.card.card_number = number.clone();
        }
        if let Some(expiry) = &req.expiry {
            ctx.card.expiry = expiry.clone();
        }
        if let Some(cvv) = &req.cvv {
            ctx.card.cvv = cvv.clone();
        }
        if let Some(holder) = &req.cardholder_name {
            ctx.card.cardholder_name = holder.clone();
        }
        if let Some(months) = req.installment_months {
            let plan = self
                .pricing
                .plans_for(ctx.payment_method)
                .iter()
                .find(|p| p.months == months)
                .cloned()
                .ok_or_else(|| {
                    CheckoutError::Validation(FieldError {
                        field: "installmentMonths",
                        message: format!("no {months}-month plan for the selected method"),
                    })
                })?;
            ctx.installment_plan = Some(plan);
        }
        Ok(())
    }

    pub async fn submit(&self, token: Option<&str>) -> Result<SubmitResponse, CheckoutError> {
        let (context, attempt_id) = {
            let mut guard = self.session.lock().await;
            let session = guard.as_mut().ok_or(CheckoutError::NoActiveCheckout)?;

            if session.phase == CheckoutPhase::Succeeded {
                return Err(CheckoutError::AlreadyCompleted);
            }
            if !session.phase.accepts_submit() {
                return Err(CheckoutError::AlreadyInFlight);
            }

            session.phase = CheckoutPhase::Validating;
            session.context.quantity = clamp_quantity(session.context.quantity);

            let today = chrono::Utc::now().date_naive();
            if let Err(e) = validate_submit(&session.context, today, self.no_delivery_weekday) {
                session.phase = CheckoutPhase::Idle;
                return Err(CheckoutError::Validation(e));
            }

            let attempt_id = Uuid::new_v4();
            session.attempt_id = Some(attempt_id);
            session.phase = CheckoutPhase::Processing;
            (session.context.clone(), attempt_id)
        };

        let totals = compute_total(&context, &self.pricing);
        let processor = processor_for(context.payment_method, self.gateway_delay);
        let request = ProcessorRequest {
            method: context.payment_method,
            amount: totals.total,
            currency: context.currency.clone(),
            card: (context.payment_method == PaymentMethod::Card).then(|| context.card.clone()),
        };

        let outcome = processor
            .process(&request)
            .await
            .map_err(CheckoutError::Internal)?;

        {
            let mut guard = self.session.lock().await;
            let session = match guard.as_mut() {
                Some(s) if s.attempt_id == Some(attempt_id) => s,
                _ => return Err(CheckoutError::Cancelled),
            };

            match outcome {
                PaymentOutcome::Success => {}
                PaymentOutcome::StepUpRequired => {
                    session.phase = CheckoutPhase::StepUp;
                    session.challenge = Some(StepUpChallenge::new());
                    return Ok(SubmitResponse {
                        status: SubmitStatus::StepUpRequired,
                        order_id: None,
                        payment_method: context.payment_method,
                        total_amount: totals.total,
                        currency: totals.currency.clone(),
                        monthly_amount: totals.monthly_amount,
                        profile_synced: None,
                        awaiting_payment_proof: false,
                    });
                }
                declined => {
                    session.phase = CheckoutPhase::Failed;
                    return Err(CheckoutError::GatewayDeclined {
                        outcome: declined,
                        message: declined.decline_message().to_string(),
                    });
                }
            }
        }

        self.finalize(attempt_id, token).await
    }

    pub async fn verify_otp(
        &self,
        otp: &str,
        token: Option<&str>,
    ) -> Result<SubmitResponse, CheckoutError> {
        let attempt_id = {
            let mut guard = self.session.lock().await;
            let session = guard.as_mut().ok_or(CheckoutError::NoActiveCheckout)?;
            if session.phase != CheckoutPhase::StepUp {
                return Err(CheckoutError::NoChallengeOpen);
            }
            let challenge = session.challenge.as_mut().ok_or(CheckoutError::NoChallengeOpen)?;

            challenge.attempts += 1;
            if otp != TEST_OTP {
                return Err(CheckoutError::InvalidOtp);
            }
            challenge.verified = true;
            session.phase = CheckoutPhase::Verifying;
            session.attempt_id.ok_or(CheckoutError::NoChallengeOpen)?
        };

        tokio::time::sleep(self.gateway_delay).await;

        {
            let mut guard = self.session.lock().await;
            match guard.as_mut() {
                Some(s) if s.attempt_id == Some(attempt_id) => s.challenge = None,
                _ => return Err(CheckoutError::Cancelled),
            }
        }

        self.finalize(attempt_id, token).await
    }

    async fn finalize(
        &self,
        attempt_id: Uuid,
        token: Option<&str>,
    ) -> Result<SubmitResponse, CheckoutError> {
        let (context, totals) = {
            let guard = self.session.lock().await;
            let session = match guard.as_ref() {
                Some(s) if s.attempt_id == Some(attempt_id) => s,
                _ => return Err(CheckoutError::Cancelled),
            };
            let totals = compute_total(&session.context, &self.pricing);
            (session.context.clone(), totals)
        };

        let profile_synced = match token {
            Some(token) => match self.profiles.update(token, &context.buyer).await {
                Ok(()) => true,
                Err(e) => {
                    tracing::warn!(error = %e, "profile update failed, order creation continues");
                    false
                }
            },
            None => false,
        };

        let snapshot = OrderSnapshot {
            product_id: context.product.product_id.clone(),
            quantity: context.quantity,
            purchase_date: context.purchase_date.unwrap_or_else(|| chrono::Utc::now().date_naive()),
            delivery_time: context.delivery_time.clone().unwrap_or_default(),
            delivery_location: context.delivery_location.clone().unwrap_or_default(),
            message: context.message.clone(),
            payment_method: context.payment_method,
            total_amount: totals.total,
        };

        let order_id = match self.orders.create_order(&snapshot).await {
            Ok(id) => id,
            Err(e) => {
                let mut guard = self.session.lock().await;
                if let Some(session) = guard.as_mut() {
                    if session.attempt_id == Some(attempt_id) {
                        session.phase = CheckoutPhase::Failed;
                    }
                }
                return Err(CheckoutError::Persistence(e.to_string()));
            }
        };

        let awaiting_proof = context.payment_method == PaymentMethod::BankTransfer;

        let mut guard = self.session.lock().await;
        let session = match guard.as_mut() {
            Some(s) if s.attempt_id == Some(attempt_id) => s,
            _ => return Err(CheckoutError::Cancelled),
        };
        session.phase = CheckoutPhase::Succeeded;
        session.challenge = None;
        session.order_id = Some(order_id.clone());
        session.profile_synced = Some(profile_synced);

        tracing::info!(order_id = %order_id, method = ?context.payment_method, "checkout finalized");

        Ok(SubmitResponse {
            status: SubmitStatus::Success,
            order_id: Some(order_id),
            payment_method: context.payment_method,
            total_amount: totals.total,
            currency: totals.currency,
            monthly_amount: totals.monthly_amount,
            profile_synced: Some(profile_synced),
            awaiting_payment_proof: awaiting_proof,
        })
    }

    pub async fn submit_payment_proof(
        &self,
        payment_proof: &str,
        token: Option<&str>,
    ) -> Result<(), CheckoutError> {
        let token = token.ok_or(CheckoutError::LoginRequired)?;
        if payment_proof.trim().is_empty() {
            return Err(CheckoutError::Validation(FieldError {
                field: "paymentProof",
                message: "payment proof reference is required".to_string(),
            }));
        }

        let order_id = {
            let guard = self.session.lock().await;
            let session = guard.as_ref().ok_or(CheckoutError::NoActiveCheckout)?;
            if session.phase != CheckoutPhase::Succeeded
                || session.context.payment_method != PaymentMethod::BankTransfer
            {
                return Err(CheckoutError::ProofNotExpected);
            }
            session.order_id.clone().ok_or(CheckoutError::ProofNotExpected)?
        };

        self.orders
            .submit_payment_proof(&order_id, payment_proof, token)
            .await
            .map_err(|e| CheckoutError::Persistence(e.to_string()))?;

        let mut guard = self.session.lock().await;
        if let Some(session) = guard.as_mut() {
            if session.order_id.as_deref() == Some(order_id.as_str()) {
                session.payment_proof_submitted = true;
            }
        }
        Ok(())
    }

    pub async fn invoice(&self) -> Result<InvoiceDocument, CheckoutError> {
        let guard = self.session.lock().await;
        let session = guard.as_ref().ok_or(CheckoutError::NoActiveCheckout)?;
        if session.phase != CheckoutPhase::Succeeded {
            return Err(CheckoutError::NoActiveCheckout);
        }
        let order_id = session.order_id.as_deref().ok_or(CheckoutError::NoActiveCheckout)?;
        let totals = compute_total(&session.context, &self.pricing);
        Ok(invoice::render(&session.context, order_id, &totals, chrono::Utc::now()))
    }

    pub async fn cancel(&self) -> bool {
        let mut guard = self.session.lock().await;
        guard.take().is_some()
    }

    fn build_view(&self, session: &CheckoutSession) -> CheckoutView {
        let ctx = &session.context;
        CheckoutView {
            phase: session.phase,
            product: ctx.product.clone(),
            quantity: ctx.quantity,
            purchase_date: ctx.purchase_date,
            delivery_time: ctx.delivery_time.clone(),
            delivery_location: ctx.delivery_location.clone(),
            message: ctx.message.clone(),
            buyer: ctx.buyer.clone(),
            currency: ctx.currency.clone(),
            payment_method: ctx.payment_method,
            installment_months: ctx.installment_plan.as_ref().map(|p| p.months),
            totals: compute_total(ctx, &self.pricing),
            order_id: session.order_id.clone(),
            awaiting_payment_proof: ctx.payment_method == PaymentMethod::BankTransfer
                && session.phase == CheckoutPhase::Succeeded
                && !session.payment_proof_submitted,
            payment_proof_submitted: session.payment_proof_submitted,
        }
    }
}
