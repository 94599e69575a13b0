pub mod config;
pub mod domain {
    pub mod checkout;
    pub mod order;
}
pub mod pricing;
pub mod processors;
pub mod clients {
    pub mod orders;
    pub mod profile;
}
pub mod invoice;
pub mod session {
    pub mod checkout_service;
    pub mod validate;
}
pub mod http {
    pub mod error;
    pub mod handlers {
        pub mod checkout;
        pub mod delivery;
        pub mod ops;
    }
}

#[derive(Clone)]
pub struct AppState {
    pub checkout_service: session::checkout_service::CheckoutService,
    pub orders_api: std::sync::Arc<dyn clients::orders::OrdersApi>,
}
