// src/payouts.rs
use rust_decimal::Decimal;
use serde::Serialize;

use crate::models::{GlobalPayout, PayoutStatus};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PayoutSnapshot {
    pub payouts: Vec<GlobalPayout>,
    pub total_processed: u64,
}

/// Read-only source of the public payout leaderboard.
///
/// The hub never writes to it and does not decide how often it refreshes.
pub trait PayoutFeed: Send + Sync {
    fn snapshot(&self) -> PayoutSnapshot;
}

/// Serves a fixed list; stands in until a live feed is wired up.
#[derive(Debug, Clone)]
pub struct FixturePayoutFeed {
    snapshot: PayoutSnapshot,
}

impl FixturePayoutFeed {
    pub fn new(payouts: Vec<GlobalPayout>, total_processed: u64) -> Self {
        Self {
            snapshot: PayoutSnapshot {
                payouts,
                total_processed,
            },
        }
    }
}

impl Default for FixturePayoutFeed {
    fn default() -> Self {
        let row = |id: &str, user: &str, cents: i64, network: &str, status: PayoutStatus, time: &str| GlobalPayout {
            id: id.to_string(),
            user: user.to_string(),
            amount: Decimal::new(cents, 2),
            network: network.to_string(),
            status,
            time: time.to_string(),
        };

        Self::new(
            vec![
                row("p1", "alex***", 850, "USDT BEP20", PayoutStatus::Completed, "2m ago"),
                row("p2", "mari***", 420, "USDT TON", PayoutStatus::Processing, "5m ago"),
                row("p3", "crypt***", 1000, "USDT BEP20", PayoutStatus::Completed, "11m ago"),
            ],
            12_480,
        )
    }
}

impl PayoutFeed for FixturePayoutFeed {
    fn snapshot(&self) -> PayoutSnapshot {
        self.snapshot.clone()
    }
}
