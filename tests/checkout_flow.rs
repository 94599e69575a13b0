use anyhow::{bail, Result};
use checkout_engine::clients::orders::OrdersApi;
use checkout_engine::clients::profile::ProfileApi;
use checkout_engine::domain::checkout::{BuyerProfile, PaymentMethod, ProductRef};
use checkout_engine::domain::order::{OrderSnapshot, SubmitStatus, UpdateCheckoutRequest};
use checkout_engine::pricing::PricingConfig;
use checkout_engine::session::checkout_service::{CheckoutError, CheckoutService};
use chrono::{Datelike, Duration as ChronoDuration, NaiveDate, Weekday};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

struct FakeOrders {
    created: AtomicUsize,
    fail_create: AtomicBool,
    snapshots: Mutex<Vec<OrderSnapshot>>,
    proofs: Mutex<Vec<(String, String, String)>>,
}

impl FakeOrders {
    fn new() -> Arc<Self> {
        Arc::new(Self {
            created: AtomicUsize::new(0),
            fail_create: AtomicBool::new(false),
            snapshots: Mutex::new(Vec::new()),
            proofs: Mutex::new(Vec::new()),
        })
    }
}

#[async_trait::async_trait]
impl OrdersApi for FakeOrders {
    async fn delivery_districts(&self) -> Result<Vec<String>> {
        Ok(vec!["Dhaka".to_string(), "Khulna".to_string()])
    }

    async fn delivery_times(&self) -> Result<Vec<String>> {
        Ok(vec!["Morning".to_string(), "Evening".to_string()])
    }

    async fn create_order(&self, snapshot: &OrderSnapshot) -> Result<String> {
        if self.fail_create.load(Ordering::SeqCst) {
            bail!("order creation failed: HTTP_500");
        }
        let n = self.created.fetch_add(1, Ordering::SeqCst) + 1;
        self.snapshots.lock().unwrap().push(snapshot.clone());
        Ok(format!("order-{n}"))
    }

    async fn submit_payment_proof(&self, order_id: &str, payment_proof: &str, token: &str) -> Result<()> {
        self.proofs.lock().unwrap().push((
            order_id.to_string(),
            payment_proof.to_string(),
            token.to_string(),
        ));
        Ok(())
    }

    async fn healthcheck(&self) -> bool {
        true
    }
}

struct FakeProfiles {
    updates: AtomicUsize,
    fail_update: AtomicBool,
}

impl FakeProfiles {
    fn new() -> Arc<Self> {
        Arc::new(Self {
            updates: AtomicUsize::new(0),
            fail_update: AtomicBool::new(false),
        })
    }
}

#[async_trait::async_trait]
impl ProfileApi for FakeProfiles {
    async fn fetch(&self, _token: &str) -> Result<Option<BuyerProfile>> {
        Ok(Some(BuyerProfile {
            name: "Stored Buyer".to_string(),
            contact_number: "01799999999".to_string(),
            location: Some("Rajshahi".to_string()),
            country: Some("Bangladesh".to_string()),
        }))
    }

    async fn update(&self, _token: &str, _profile: &BuyerProfile) -> Result<()> {
        if self.fail_update.load(Ordering::SeqCst) {
            bail!("profile update failed: HTTP_500");
        }
        self.updates.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

fn service_with(delay_ms: u64) -> (CheckoutService, Arc<FakeOrders>, Arc<FakeProfiles>) {
    let orders = FakeOrders::new();
    let profiles = FakeProfiles::new();
    let service = CheckoutService::new(
        Arc::new(PricingConfig::default()),
        orders.clone(),
        profiles.clone(),
        Duration::from_millis(delay_ms),
        Weekday::Fri,
    );
    (service, orders, profiles)
}

fn product() -> ProductRef {
    ProductRef {
        product_id: "prod-1".to_string(),
        name: "Mango Crate".to_string(),
        unit_price: 20.0,
    }
}

fn delivery_date() -> NaiveDate {
    let mut date = chrono::Utc::now().date_naive() + ChronoDuration::days(1);
    while date.weekday() == Weekday::Fri {
        date += ChronoDuration::days(1);
    }
    date
}

async fn fill_required_fields(service: &CheckoutService, method: PaymentMethod) {
    let update = UpdateCheckoutRequest {
        quantity: Some(2),
        purchase_date: Some(delivery_date()),
        delivery_time: Some("Morning".to_string()),
        delivery_location: Some("Dhaka".to_string()),
        name: Some("Ayesha".to_string()),
        contact_number: Some("01711111111".to_string()),
        payment_method: Some(method),
        ..Default::default()
    };
    service.update(&update).await.unwrap();
}

#[tokio::test]
async fn cod_checkout_creates_one_order_with_surcharge() {
    let (service, orders, _) = service_with(0);
    service.open(product(), None).await.unwrap();
    fill_required_fields(&service, PaymentMethod::CashOnDelivery).await;

    let resp = service.submit(None).await.unwrap();
    assert_eq!(resp.status, SubmitStatus::Success);
    assert_eq!(resp.order_id.as_deref(), Some("order-1"));
    assert!((resp.total_amount - 42.99).abs() < 1e-9);
    assert_eq!(orders.created.load(Ordering::SeqCst), 1);

    let snapshots = orders.snapshots.lock().unwrap();
    assert_eq!(snapshots[0].payment_method, PaymentMethod::CashOnDelivery);
    assert!((snapshots[0].total_amount - 42.99).abs() < 1e-9);
}

#[tokio::test]
async fn card_success_finalizes_without_step_up() {
    let (service, orders, _) = service_with(0);
    service.open(product(), None).await.unwrap();
    fill_required_fields(&service, PaymentMethod::Card).await;
    let card = UpdateCheckoutRequest {
        card_number: Some("4242 4242 4242 4242".to_string()),
        expiry: Some("09/27".to_string()),
        cvv: Some("123".to_string()),
        cardholder_name: Some("Ayesha".to_string()),
        ..Default::default()
    };
    service.update(&card).await.unwrap();

    let resp = service.submit(None).await.unwrap();
    assert_eq!(resp.status, SubmitStatus::Success);
    assert_eq!(orders.created.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn declined_card_creates_no_order_and_allows_retry() {
    let (service, orders, _) = service_with(0);
    service.open(product(), None).await.unwrap();
    fill_required_fields(&service, PaymentMethod::Card).await;
    let declined = UpdateCheckoutRequest {
        card_number: Some("4000000000000002".to_string()),
        expiry: Some("09/27".to_string()),
        cvv: Some("123".to_string()),
        cardholder_name: Some("Ayesha".to_string()),
        ..Default::default()
    };
    service.update(&declined).await.unwrap();

    let err = service.submit(None).await.unwrap_err();
    assert!(matches!(err, CheckoutError::GatewayDeclined { .. }));
    assert_eq!(orders.created.load(Ordering::SeqCst), 0);

    let corrected = UpdateCheckoutRequest {
        card_number: Some("4242424242424242".to_string()),
        ..Default::default()
    };
    service.update(&corrected).await.unwrap();
    let resp = service.submit(None).await.unwrap();
    assert_eq!(resp.status, SubmitStatus::Success);
    assert_eq!(orders.created.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn step_up_challenge_retries_until_correct_otp() {
    let (service, orders, _) = service_with(0);
    service.open(product(), None).await.unwrap();
    fill_required_fields(&service, PaymentMethod::Card).await;
    let card = UpdateCheckoutRequest {
        card_number: Some("4000002500003155".to_string()),
        expiry: Some("09/27".to_string()),
        cvv: Some("123".to_string()),
        cardholder_name: Some("Ayesha".to_string()),
        ..Default::default()
    };
    service.update(&card).await.unwrap();

    let resp = service.submit(None).await.unwrap();
    assert_eq!(resp.status, SubmitStatus::StepUpRequired);
    assert!(resp.order_id.is_none());
    assert_eq!(orders.created.load(Ordering::SeqCst), 0);

    let err = service.verify_otp("000000", None).await.unwrap_err();
    assert!(matches!(err, CheckoutError::InvalidOtp));

    let err = service.verify_otp("999999", None).await.unwrap_err();
    assert!(matches!(err, CheckoutError::InvalidOtp));

    let resp = service.verify_otp("123456", None).await.unwrap();
    assert_eq!(resp.status, SubmitStatus::Success);
    assert_eq!(orders.created.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn double_submit_creates_exactly_one_order() {
    let (service, orders, _) = service_with(150);
    service.open(product(), None).await.unwrap();
    fill_required_fields(&service, PaymentMethod::Bkash).await;

    let racing = service.clone();
    let first = tokio::spawn(async move { racing.submit(None).await });
    tokio::time::sleep(Duration::from_millis(30)).await;

    let second = service.submit(None).await;
    assert!(matches!(second, Err(CheckoutError::AlreadyInFlight)));

    let first = first.await.unwrap().unwrap();
    assert_eq!(first.status, SubmitStatus::Success);
    assert_eq!(orders.created.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn cancel_before_gateway_resolves_leaves_no_order() {
    let (service, orders, _) = service_with(150);
    service.open(product(), None).await.unwrap();
    fill_required_fields(&service, PaymentMethod::Nagad).await;

    let racing = service.clone();
    let pending = tokio::spawn(async move { racing.submit(None).await });
    tokio::time::sleep(Duration::from_millis(30)).await;

    assert!(service.cancel().await);

    let result = pending.await.unwrap();
    assert!(matches!(result, Err(CheckoutError::Cancelled)));
    assert_eq!(orders.created.load(Ordering::SeqCst), 0);
    assert!(matches!(service.quote().await, Err(CheckoutError::NoActiveCheckout)));
}

#[tokio::test]
async fn validation_failure_has_no_side_effect() {
    let (service, orders, profiles) = service_with(0);
    service.open(product(), None).await.unwrap();
    let partial = UpdateCheckoutRequest {
        purchase_date: Some(delivery_date()),
        delivery_time: Some("Morning".to_string()),
        delivery_location: Some("Dhaka".to_string()),
        name: Some("Ayesha".to_string()),
        ..Default::default()
    };
    service.update(&partial).await.unwrap();

    let err = service.submit(Some("token")).await.unwrap_err();
    match err {
        CheckoutError::Validation(field) => assert_eq!(field.field, "contactNumber"),
        other => panic!("expected validation error, got {other:?}"),
    }
    assert_eq!(orders.created.load(Ordering::SeqCst), 0);
    assert_eq!(profiles.updates.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn quantity_clamps_at_submit() {
    let (service, orders, _) = service_with(0);
    service.open(product(), None).await.unwrap();
    fill_required_fields(&service, PaymentMethod::Bkash).await;
    let oversize = UpdateCheckoutRequest {
        quantity: Some(250),
        ..Default::default()
    };
    service.update(&oversize).await.unwrap();

    service.submit(None).await.unwrap();
    let snapshots = orders.snapshots.lock().unwrap();
    assert_eq!(snapshots[0].quantity, 99);
}

#[tokio::test]
async fn bank_transfer_requires_proof_with_session_token() {
    let (service, orders, _) = service_with(0);
    service.open(product(), None).await.unwrap();
    fill_required_fields(&service, PaymentMethod::BankTransfer).await;

    let resp = service.submit(Some("tok-1")).await.unwrap();
    assert!(resp.awaiting_payment_proof);

    let err = service.submit_payment_proof("TXN-778", None).await.unwrap_err();
    assert!(matches!(err, CheckoutError::LoginRequired));

    service.submit_payment_proof("TXN-778", Some("tok-1")).await.unwrap();
    let proofs = orders.proofs.lock().unwrap();
    assert_eq!(proofs.len(), 1);
    assert_eq!(proofs[0], ("order-1".to_string(), "TXN-778".to_string(), "tok-1".to_string()));
}

#[tokio::test]
async fn proof_is_rejected_for_non_bank_transfer_orders() {
    let (service, _, _) = service_with(0);
    service.open(product(), None).await.unwrap();
    fill_required_fields(&service, PaymentMethod::CashOnDelivery).await;
    service.submit(None).await.unwrap();

    let err = service.submit_payment_proof("TXN-1", Some("tok")).await.unwrap_err();
    assert!(matches!(err, CheckoutError::ProofNotExpected));
}

#[tokio::test]
async fn profile_update_failure_never_blocks_order() {
    let (service, orders, profiles) = service_with(0);
    profiles.fail_update.store(true, Ordering::SeqCst);
    service.open(product(), None).await.unwrap();
    fill_required_fields(&service, PaymentMethod::Rocket).await;

    let resp = service.submit(Some("tok-1")).await.unwrap();
    assert_eq!(resp.status, SubmitStatus::Success);
    assert_eq!(resp.profile_synced, Some(false));
    assert_eq!(orders.created.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn order_persistence_failure_aborts_and_allows_resubmit() {
    let (service, orders, _) = service_with(0);
    orders.fail_create.store(true, Ordering::SeqCst);
    service.open(product(), None).await.unwrap();
    fill_required_fields(&service, PaymentMethod::Bkash).await;

    let err = service.submit(None).await.unwrap_err();
    assert!(matches!(err, CheckoutError::Persistence(_)));

    orders.fail_create.store(false, Ordering::SeqCst);
    let resp = service.submit(None).await.unwrap();
    assert_eq!(resp.status, SubmitStatus::Success);
}

#[tokio::test]
async fn profile_prefill_seeds_buyer_when_token_present() {
    let (service, _, _) = service_with(0);
    let view = service.open(product(), Some("tok-1")).await.unwrap();
    assert_eq!(view.buyer.name, "Stored Buyer");

    let anonymous = service.open(product(), None).await.unwrap();
    assert!(anonymous.buyer.name.is_empty());
}

#[tokio::test]
async fn invoice_is_available_after_success() {
    let (service, _, _) = service_with(0);
    service.open(product(), None).await.unwrap();
    fill_required_fields(&service, PaymentMethod::CashOnDelivery).await;

    assert!(matches!(service.invoice().await, Err(CheckoutError::NoActiveCheckout)));

    service.submit(None).await.unwrap();
    let doc = service.invoice().await.unwrap();
    assert!(doc.body.contains("order-1"));
    assert!(doc.body.contains("42.99"));
}

#[tokio::test]
async fn past_purchase_date_is_rejected_without_mutation() {
    let (service, _, _) = service_with(0);
    service.open(product(), None).await.unwrap();

    let yesterday = chrono::Utc::now().date_naive() - ChronoDuration::days(1);
    let update = UpdateCheckoutRequest {
        purchase_date: Some(yesterday),
        ..Default::default()
    };
    let err = service.update(&update).await.unwrap_err();
    assert!(matches!(err, CheckoutError::Validation(_)));

    let view = service.view().await.unwrap();
    assert!(view.purchase_date.is_none());
}

#[tokio::test]
async fn completed_checkout_refuses_further_edits_and_submits() {
    let (service, _, _) = service_with(0);
    service.open(product(), None).await.unwrap();
    fill_required_fields(&service, PaymentMethod::Bkash).await;
    service.submit(None).await.unwrap();

    let update = UpdateCheckoutRequest {
        quantity: Some(5),
        ..Default::default()
    };
    assert!(matches!(service.update(&update).await, Err(CheckoutError::AlreadyCompleted)));
    assert!(matches!(service.submit(None).await, Err(CheckoutError::AlreadyCompleted)));
}
