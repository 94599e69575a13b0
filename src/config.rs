#[derive(Clone)]
pub struct AppConfig {
    pub bind_addr: String,
    pub api_base_url: String,
    pub gateway_delay_ms: u64,
    pub no_delivery_weekday: String,
}

impl AppConfig {
    pub fn from_env() -> Self {
        Self {
            bind_addr: std::env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:3000".to_string()),
            api_base_url: std::env::var("API_BASE_URL")
                .unwrap_or_else(|_| "http://localhost:5000/api".to_string()),
            gateway_delay_ms: std::env::var("GATEWAY_DELAY_MS")
                .ok()
                .and_then(|s| s.parse::<u64>().ok())
                .unwrap_or(1200),
            no_delivery_weekday: std::env::var("NO_DELIVERY_WEEKDAY")
                .unwrap_or_else(|_| "FRIDAY".to_string()),
        }
    }

    pub fn no_delivery_weekday(&self) -> chrono::Weekday {
        match self.no_delivery_weekday.to_uppercase().as_str() {
            "MONDAY" => chrono::Weekday::Mon,
            "TUESDAY" => chrono::Weekday::Tue,
            "WEDNESDAY" => chrono::Weekday::Wed,
            "THURSDAY" => chrono::Weekday::Thu,
            "SATURDAY" => chrono::Weekday::Sat,
            "SUNDAY" => chrono::Weekday::Sun,
            _ => chrono::Weekday::Fri,
        }
    }
}
