use std::env;
use std::time::Duration;

/// Edge set for the order status machine. The platform historically accepts
/// any allow-listed value from any prior status; `Linear` restricts updates to
/// the happy path with cancellation from non-terminal states.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TransitionPolicy {
    #[default]
    Permissive,
    Linear,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub host: String,
    pub port: u16,
    pub notify_interval: Duration,
    pub retract_products_on_rejection: bool,
    pub order_transitions: TransitionPolicy,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let database_url = env::var("DATABASE_URL")?;
        let host = env::var("APP_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = env::var("APP_PORT")
            .ok()
            .and_then(|p| p.parse::<u16>().ok())
            .unwrap_or(3000);
        let notify_interval = env::var("NOTIFY_INTERVAL_SECS")
            .ok()
            .and_then(|s| s.parse::<u64>().ok())
            .map(Duration::from_secs)
            .unwrap_or_else(|| Duration::from_secs(30));
        let retract_products_on_rejection = env::var("RETRACT_PRODUCTS_ON_REJECTION")
            .map(|v| v == "true" || v == "1")
            .unwrap_or(false);
        let order_transitions = match env::var("ORDER_TRANSITIONS").as_deref() {
            Ok("linear") => TransitionPolicy::Linear,
            _ => TransitionPolicy::Permissive,
        };
        Ok(Self {
            database_url,
            host,
            port,
            notify_interval,
            retract_products_on_rejection,
            order_transitions,
        })
    }
}
