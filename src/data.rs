//! Read/write surface over the [`MockStore`].
//!
//! Every mutation goes through [`DataAccess`]; callers never touch the store.
//! The lock is held only for the duration of a single in-memory change and
//! never across an `.await`, so each call either lands completely or not at all.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use chrono::{NaiveDate, Utc};
use rust_decimal::Decimal;
use tracing::{debug, info};

use crate::config::WithdrawalPolicy;
use crate::error::{Error, Result};
use crate::models::{
    ActivityData, Balance, CategoryFilter, EarningBot, NewBot, NewSocial, NewVideo, SocialLink,
    VideoContent, WithdrawalRecord, WithdrawalStatus,
};
use crate::store::{fresh_id, MockStore};

/// Fallback color for platforms missing from [`SOCIAL_COLORS`].
pub const DEFAULT_SOCIAL_COLOR: &str = "bg-blue-500";

const SOCIAL_COLORS: &[(&str, &str)] = &[
    ("Telegram", "bg-[#24A1DE]"),
    ("YouTube", "bg-[#FF0000]"),
    ("X (Twitter)", "bg-[#000000]"),
    ("Instagram", "bg-gradient-to-tr from-[#f9ce34] via-[#ee2a7b] to-[#6228d7]"),
    ("Facebook", "bg-[#1877F2]"),
    ("Support", "bg-[#34B7F1]"),
];

pub fn social_color(platform: &str) -> &'static str {
    SOCIAL_COLORS
        .iter()
        .find(|(name, _)| *name == platform)
        .map(|(_, color)| *color)
        .unwrap_or(DEFAULT_SOCIAL_COLOR)
}

#[derive(Debug, Clone)]
pub struct DataAccess {
    store: Arc<Mutex<MockStore>>,
    policy: WithdrawalPolicy,
}

impl DataAccess {
    pub fn new(store: MockStore, policy: WithdrawalPolicy) -> Self {
        Self {
            store: Arc::new(Mutex::new(store)),
            policy,
        }
    }

    pub fn policy(&self) -> &WithdrawalPolicy {
        &self.policy
    }

    fn store(&self) -> MutexGuard<'_, MockStore> {
        // every mutation is a single assignment, a poisoned guard still holds a consistent store
        self.store.lock().unwrap_or_else(PoisonError::into_inner)
    }

    // ---------- bots ----------

    pub async fn list_bots(&self) -> Vec<EarningBot> {
        self.store().bots.clone()
    }

    pub async fn list_bots_in(&self, filter: CategoryFilter) -> Vec<EarningBot> {
        self.store()
            .bots
            .iter()
            .filter(|b| filter.matches(b.category))
            .cloned()
            .collect()
    }

    pub async fn add_bot(&self, bot: NewBot) -> EarningBot {
        let mut store = self.store();
        let id = fresh_id(|id| store.bots.iter().any(|b| b.id == id));
        let bot = EarningBot {
            id,
            name: bot.name,
            category: bot.category,
            description: bot.description,
            link: bot.link,
            icon: bot.icon,
            reward_rate: bot.reward_rate,
            is_premium: bot.is_premium,
        };
        store.bots.push(bot.clone());
        info!("Added bot {} ({})", bot.id, bot.name);
        bot
    }

    /// Unknown ids are ignored.
    pub async fn remove_bot(&self, id: &str) {
        let mut store = self.store();
        let before = store.bots.len();
        store.bots.retain(|b| b.id != id);
        debug!("remove_bot {}: {} removed", id, before - store.bots.len());
    }

    // ---------- socials ----------

    pub async fn list_socials(&self) -> Vec<SocialLink> {
        self.store().socials.clone()
    }

    pub async fn add_social(&self, social: NewSocial) -> SocialLink {
        let mut store = self.store();
        let id = fresh_id(|id| store.socials.iter().any(|s| s.id == id));
        let social = SocialLink {
            id,
            color: social_color(&social.platform).to_string(),
            platform: social.platform,
            name: social.name,
            link: social.link,
            icon: social.icon,
        };
        store.socials.push(social.clone());
        info!("Added social link {} ({})", social.id, social.platform);
        social
    }

    pub async fn remove_social(&self, id: &str) {
        let mut store = self.store();
        let before = store.socials.len();
        store.socials.retain(|s| s.id != id);
        debug!("remove_social {}: {} removed", id, before - store.socials.len());
    }

    // ---------- videos ----------

    pub async fn list_videos(&self) -> Vec<VideoContent> {
        self.store().videos.clone()
    }

    pub async fn add_video(&self, video: NewVideo) -> VideoContent {
        let mut store = self.store();
        let id = fresh_id(|id| store.videos.iter().any(|v| v.id == id));
        let video = VideoContent {
            id,
            title: video.title,
            topic: video.topic,
            link: video.link,
            reward: 0,
        };
        store.videos.push(video.clone());
        info!("Added video {} ({})", video.id, video.title);
        video
    }

    pub async fn remove_video(&self, id: &str) {
        let mut store = self.store();
        let before = store.videos.len();
        store.videos.retain(|v| v.id != id);
        debug!("remove_video {}: {} removed", id, before - store.videos.len());
    }

    // ---------- logo ----------

    pub async fn get_logo(&self) -> String {
        self.store().logo.clone()
    }

    pub async fn set_logo(&self, url: &str) -> String {
        let mut store = self.store();
        store.logo = url.to_string();
        info!("App logo set to {}", store.logo);
        store.logo.clone()
    }

    // ---------- wallet ----------

    pub async fn get_balance(&self) -> Balance {
        self.store().balance
    }

    pub async fn list_activity(&self) -> Vec<ActivityData> {
        self.store().activity.clone()
    }

    /// Most recent first.
    pub async fn list_withdrawal_history(&self) -> Vec<WithdrawalRecord> {
        self.store().withdrawals.clone()
    }

    /// Validates, waits out the simulated processing delay, then records a
    /// `Pending` request at the head of the history and debits the balance.
    ///
    /// Validation failures leave the store untouched.
    pub async fn request_withdrawal(&self, amount: Decimal, method: &str) -> Result<WithdrawalRecord> {
        let method = method.trim();
        self.validate_withdrawal(amount, method)?;
        self.check_daily_limit(Utc::now().date_naive())?;

        if !self.policy.delay.is_zero() {
            tokio::time::sleep(self.policy.delay).await;
        }

        let today = Utc::now().date_naive();
        let mut store = self.store();

        // another request may have used up the day while we slept
        let used = used_today(&store, today);
        if let Some(limit) = self.policy.daily_limit {
            if used >= limit {
                return Err(daily_limit_error(limit));
            }
        }

        let id = fresh_id(|id| store.withdrawals.iter().any(|w| w.id == id));
        let record = WithdrawalRecord {
            id,
            amount,
            status: WithdrawalStatus::Pending,
            date: today,
            method: method.to_string(),
        };
        store.withdrawals.insert(0, record.clone());
        store.withdrawals_today = (today, used + 1);
        store.balance.total -= amount;

        info!(
            "Withdrawal {} requested: ${} via {}",
            record.id, record.amount, record.method
        );
        Ok(record)
    }

    fn validate_withdrawal(&self, amount: Decimal, method: &str) -> Result<()> {
        if amount < self.policy.min || amount <= Decimal::ZERO {
            return Err(Error::validation(format!(
                "Minimum withdrawal is ${}",
                self.policy.min
            )));
        }
        if let Some(max) = self.policy.max {
            if amount > max {
                return Err(Error::validation(format!(
                    "Maximum withdrawal is ${} per transaction",
                    max
                )));
            }
        }
        if method.is_empty() {
            return Err(Error::validation("Withdrawal method is required"));
        }
        Ok(())
    }

    fn check_daily_limit(&self, today: NaiveDate) -> Result<()> {
        match self.policy.daily_limit {
            Some(limit) if used_today(&self.store(), today) >= limit => Err(daily_limit_error(limit)),
            _ => Ok(()),
        }
    }
}

impl Default for DataAccess {
    fn default() -> Self {
        Self::new(MockStore::seeded(), WithdrawalPolicy::default())
    }
}

fn used_today(store: &MockStore, today: NaiveDate) -> u32 {
    match store.withdrawals_today {
        (day, count) if day == today => count,
        _ => 0,
    }
}

fn daily_limit_error(limit: u32) -> Error {
    Error::validation(format!("Daily limit of {} withdrawals reached.", limit))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::TaskCategory;
    use std::time::Duration;

    fn data() -> DataAccess {
        DataAccess::new(MockStore::seeded(), WithdrawalPolicy::instant())
    }

    fn new_bot(name: &str) -> NewBot {
        NewBot {
            name: name.to_string(),
            category: TaskCategory::Tap,
            description: String::new(),
            link: format!("https://t.me/{}", name),
            icon: "🤖".to_string(),
            reward_rate: "High".to_string(),
            is_premium: false,
        }
    }

    #[tokio::test]
    async fn add_then_remove_bot_restores_seed_list() {
        let data = data();
        let original = data.list_bots().await;
        assert_eq!(original.len(), 2);

        let added = data.add_bot(new_bot("X")).await;
        let bots = data.list_bots().await;
        assert_eq!(bots.len(), 3);
        assert_eq!(bots.last().map(|b| b.name.as_str()), Some("X"));
        assert_eq!(bots.last().map(|b| b.id.as_str()), Some(added.id.as_str()));

        data.remove_bot(&added.id).await;
        assert_eq!(data.list_bots().await, original);
    }

    #[tokio::test]
    async fn added_ids_are_unique_within_collection() {
        let data = data();
        for i in 0..50 {
            data.add_bot(new_bot(&format!("bot{}", i))).await;
        }
        let bots = data.list_bots().await;
        let mut ids: Vec<_> = bots.iter().map(|b| b.id.clone()).collect();
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), bots.len());
    }

    #[tokio::test]
    async fn removing_unknown_id_is_a_no_op() {
        let data = data();
        let before = (data.list_bots().await, data.list_socials().await, data.list_videos().await);

        data.remove_bot("missing").await;
        data.remove_social("missing").await;
        data.remove_video("missing").await;

        let after = (data.list_bots().await, data.list_socials().await, data.list_videos().await);
        assert_eq!(before, after);
    }

    #[tokio::test]
    async fn category_filter_narrows_bot_list() {
        let data = data();
        let tap = data.list_bots_in(CategoryFilter::Only(TaskCategory::Tap)).await;
        assert_eq!(tap.len(), 1);
        assert_eq!(tap[0].name, "CryptoTap App");

        let quiz = data.list_bots_in(CategoryFilter::Only(TaskCategory::Quiz)).await;
        assert!(quiz.is_empty());

        assert_eq!(data.list_bots_in(CategoryFilter::All).await.len(), 2);
    }

    #[tokio::test]
    async fn social_color_comes_from_platform() {
        let data = data();
        let known = data
            .add_social(NewSocial {
                platform: "Facebook".into(),
                name: "Page".into(),
                link: "https://facebook.com/x".into(),
                icon: "📘".into(),
            })
            .await;
        assert_eq!(known.color, "bg-[#1877F2]");

        let unknown = data
            .add_social(NewSocial {
                platform: "Mastodon".into(),
                name: "Toots".into(),
                link: "https://mastodon.social/@x".into(),
                icon: "🐘".into(),
            })
            .await;
        assert_eq!(unknown.color, DEFAULT_SOCIAL_COLOR);
        assert_eq!(data.list_socials().await.len(), 4);
    }

    #[tokio::test]
    async fn added_video_always_has_zero_reward() {
        let data = data();
        let video = data
            .add_video(NewVideo {
                title: "Intro".into(),
                topic: "General".into(),
                link: "https://youtube.com/watch?v=1".into(),
            })
            .await;
        assert_eq!(video.reward, 0);
        assert!(data.list_videos().await.contains(&video));
    }

    #[tokio::test]
    async fn logo_round_trips() {
        let data = data();
        let url = "https://example.com/logo.svg";
        assert_eq!(data.set_logo(url).await, url);
        assert_eq!(data.get_logo().await, url);
    }

    #[tokio::test]
    async fn withdrawal_below_minimum_is_rejected_without_mutation() {
        let data = data();
        let before = data.list_withdrawal_history().await;

        let err = data
            .request_withdrawal(Decimal::new(5, 0), "USDT")
            .await
            .expect_err("$5 is below the $10 minimum");

        assert_eq!(err.to_string(), "Minimum withdrawal is $10.00");
        assert_eq!(data.list_withdrawal_history().await, before);
    }

    #[tokio::test]
    async fn valid_withdrawal_is_prepended_as_pending() {
        let data = data();
        let before = data.list_withdrawal_history().await;

        let record = data
            .request_withdrawal(Decimal::new(1250, 2), "Tether (USDT)")
            .await
            .expect("valid amount");

        let history = data.list_withdrawal_history().await;
        assert_eq!(history.len(), before.len() + 1);
        assert_eq!(history[0], record);
        assert_eq!(record.status, WithdrawalStatus::Pending);
        assert_eq!(record.date, Utc::now().date_naive());
        assert_eq!(&history[1..], before.as_slice());
    }

    #[tokio::test]
    async fn withdrawal_respects_maximum_and_method() {
        let policy = WithdrawalPolicy {
            min: Decimal::new(1, 2),
            max: Some(Decimal::new(1000, 2)),
            ..WithdrawalPolicy::instant()
        };
        let data = DataAccess::new(MockStore::seeded(), policy);

        let err = data
            .request_withdrawal(Decimal::new(1001, 2), "USDT")
            .await
            .expect_err("above max");
        assert_eq!(err.to_string(), "Maximum withdrawal is $10.00 per transaction");

        let err = data
            .request_withdrawal(Decimal::new(1, 2), "  ")
            .await
            .expect_err("no method");
        assert_eq!(err, Error::validation("Withdrawal method is required"));

        assert!(data.request_withdrawal(Decimal::new(1, 2), "USDT").await.is_ok());
    }

    #[tokio::test]
    async fn daily_limit_blocks_third_request() {
        let policy = WithdrawalPolicy {
            daily_limit: Some(2),
            ..WithdrawalPolicy::instant()
        };
        let data = DataAccess::new(MockStore::seeded(), policy);
        let amount = Decimal::new(10, 0);

        data.request_withdrawal(amount, "USDT").await.expect("first");
        data.request_withdrawal(amount, "USDT").await.expect("second");
        let err = data
            .request_withdrawal(amount, "USDT")
            .await
            .expect_err("third is over the limit");

        assert_eq!(err.to_string(), "Daily limit of 2 withdrawals reached.");
        assert_eq!(data.list_withdrawal_history().await.len(), 4);
    }

    #[tokio::test]
    async fn default_policy_has_no_daily_cap() {
        let policy = WithdrawalPolicy {
            delay: Duration::ZERO,
            ..WithdrawalPolicy::default()
        };
        let data = DataAccess::new(MockStore::seeded(), policy);
        let amount = Decimal::new(10, 0);

        for n in 1..=3 {
            let record = data
                .request_withdrawal(amount, "USDT")
                .await
                .unwrap_or_else(|e| panic!("request {} rejected: {}", n, e));
            assert_eq!(data.list_withdrawal_history().await[0], record);
        }
        assert_eq!(data.list_withdrawal_history().await.len(), 5);
    }

    #[tokio::test]
    async fn accepted_withdrawal_debits_total_balance() {
        let data = data();
        let before = data.get_balance().await;

        data.request_withdrawal(Decimal::new(5, 0), "USDT")
            .await
            .expect_err("below minimum");
        assert_eq!(data.get_balance().await, before);

        data.request_withdrawal(Decimal::new(1250, 2), "USDT")
            .await
            .expect("valid amount");
        let after = data.get_balance().await;
        assert_eq!(after.total, before.total - Decimal::new(1250, 2));
        assert_eq!(after.today, before.today);
    }

    #[tokio::test(start_paused = true)]
    async fn record_appears_only_after_the_delay() {
        let policy = WithdrawalPolicy {
            delay: Duration::from_millis(1500),
            ..WithdrawalPolicy::instant()
        };
        let data = DataAccess::new(MockStore::seeded(), policy);

        let pending = tokio::spawn({
            let data = data.clone();
            async move { data.request_withdrawal(Decimal::new(10, 0), "USDT").await }
        });

        tokio::task::yield_now().await;
        tokio::time::advance(Duration::from_millis(1000)).await;
        assert_eq!(data.list_withdrawal_history().await.len(), 2);
        assert!(!pending.is_finished());

        tokio::time::advance(Duration::from_millis(600)).await;
        let record = pending.await.expect("task").expect("valid amount");
        let history = data.list_withdrawal_history().await;
        assert_eq!(history.len(), 3);
        assert_eq!(history[0], record);
    }

    #[tokio::test(start_paused = true)]
    async fn daily_limit_is_rechecked_after_the_delay() {
        let policy = WithdrawalPolicy {
            daily_limit: Some(1),
            delay: Duration::from_millis(100),
            ..WithdrawalPolicy::default()
        };
        let data = DataAccess::new(MockStore::seeded(), policy);

        // both pass the up-front check before either one lands
        let requests: Vec<_> = (0..2)
            .map(|_| {
                let data = data.clone();
                tokio::spawn(async move { data.request_withdrawal(Decimal::new(10, 0), "USDT").await })
            })
            .collect();

        let mut outcomes = Vec::new();
        for request in requests {
            outcomes.push(request.await.expect("task"));
        }

        assert_eq!(outcomes.iter().filter(|r| r.is_ok()).count(), 1);
        let err = outcomes
            .into_iter()
            .find_map(|r| r.err())
            .expect("one request over the limit");
        assert_eq!(err.to_string(), "Daily limit of 1 withdrawals reached.");
        assert_eq!(data.list_withdrawal_history().await.len(), 3);
    }

    #[tokio::test]
    async fn clones_share_the_same_store() {
        let data = data();
        let other = data.clone();
        other.set_logo("https://example.com/a.png").await;
        assert_eq!(data.get_logo().await, "https://example.com/a.png");
    }
}
