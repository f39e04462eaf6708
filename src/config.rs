use dotenvy::dotenv;
use eyre::Result;
use rust_decimal::Decimal;
use std::{env, str::FromStr, time::Duration};
use tracing::{info, warn};

/// Administrator id of the official hub.
pub const DEFAULT_ADMIN_ID: i64 = 6601027952;

#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub admin_id: i64,
    pub withdrawal: WithdrawalPolicy,
}

/// Rules applied to every withdrawal request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WithdrawalPolicy {
    pub min: Decimal,
    pub max: Option<Decimal>,
    /// Accepted requests per UTC day, counted across every caller of the
    /// process rather than per user. Off unless configured.
    pub daily_limit: Option<u32>,
    /// Simulated processing latency before the record is created.
    pub delay: Duration,
}

impl Default for WithdrawalPolicy {
    fn default() -> Self {
        Self {
            min: Decimal::new(1000, 2),
            max: None,
            daily_limit: None,
            delay: Duration::from_millis(1500),
        }
    }
}

impl WithdrawalPolicy {
    /// No latency and no daily cap; keeps only the amount bounds.
    pub fn instant() -> Self {
        Self {
            daily_limit: None,
            delay: Duration::ZERO,
            ..Self::default()
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: 8080,
            admin_id: DEFAULT_ADMIN_ID,
            withdrawal: WithdrawalPolicy::default(),
        }
    }
}

pub fn load() -> Result<Config> {
    dotenv().ok(); // .env is optional

    let cfg = from_vars(|key| env::var(key).ok());

    info!("Loaded config: {:?}", cfg);

    Ok(cfg)
}

/// Builds a config from a variable lookup, falling back to defaults.
pub fn from_vars(var: impl Fn(&str) -> Option<String>) -> Config {
    let defaults = Config::default();

    let port = parse_var(&var, "PORT").unwrap_or(defaults.port);
    let admin_id = parse_var(&var, "ADMIN_ID").unwrap_or(defaults.admin_id);

    let min = parse_var(&var, "WITHDRAWAL_MIN").unwrap_or(defaults.withdrawal.min);
    let max = parse_var(&var, "WITHDRAWAL_MAX");

    // shared by every caller of the process, 0 turns it off
    let daily_limit = match parse_var::<u32>(&var, "WITHDRAWAL_DAILY_LIMIT") {
        Some(0) => None,
        Some(n) => Some(n),
        None => defaults.withdrawal.daily_limit,
    };

    let delay = parse_var::<u64>(&var, "WITHDRAWAL_DELAY_MS")
        .map(Duration::from_millis)
        .unwrap_or(defaults.withdrawal.delay);

    Config {
        port,
        admin_id,
        withdrawal: WithdrawalPolicy {
            min,
            max,
            daily_limit,
            delay,
        },
    }
}

/// Missing or malformed values yield `None`.
fn parse_var<T: FromStr>(var: &impl Fn(&str) -> Option<String>, key: &str) -> Option<T> {
    let raw = var(key)?;
    match raw.trim().parse() {
        Ok(v) => Some(v),
        Err(_) => {
            warn!("Ignoring unparseable {}={:?}, using default", key, raw);
            None
        }
    }
}
