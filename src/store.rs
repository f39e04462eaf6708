// src/store.rs
use chrono::NaiveDate;
use rand::Rng;
use rust_decimal::Decimal;

use crate::models::{
    ActivityData, Balance, EarningBot, SocialLink, TaskCategory, VideoContent, WithdrawalRecord,
    WithdrawalStatus,
};

pub const DEFAULT_LOGO: &str =
    "https://raw.githubusercontent.com/lucide-icons/lucide/main/icons/gem.svg";

const ID_ALPHABET: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";
const ID_LEN: usize = 9;

/// In-memory collections behind the data layer.
///
/// Nothing here survives a restart; every process starts from [`MockStore::seeded`].
#[derive(Debug, Clone)]
pub struct MockStore {
    pub bots: Vec<EarningBot>,
    pub socials: Vec<SocialLink>,
    pub videos: Vec<VideoContent>,
    /// Most recent first.
    pub withdrawals: Vec<WithdrawalRecord>,
    pub logo: String,
    pub balance: Balance,
    pub activity: Vec<ActivityData>,
    /// Requests accepted on a given day, for the daily withdrawal limit.
    pub withdrawals_today: (NaiveDate, u32),
}

impl MockStore {
    /// A store with no records at all.
    pub fn empty() -> Self {
        Self {
            bots: Vec::new(),
            socials: Vec::new(),
            videos: Vec::new(),
            withdrawals: Vec::new(),
            logo: DEFAULT_LOGO.to_string(),
            balance: Balance {
                total: Decimal::ZERO,
                today: Decimal::ZERO,
            },
            activity: Vec::new(),
            withdrawals_today: (NaiveDate::MIN, 0),
        }
    }

    /// The fixture data the mini-app ships with.
    pub fn seeded() -> Self {
        Self {
            bots: vec![
                EarningBot {
                    id: "1".into(),
                    name: "Reward Pro Bot".into(),
                    category: TaskCategory::Mining,
                    description: "Official Reward Software high-yield bot. Features instant FaucetPay USDT withdrawals.".into(),
                    link: "https://t.me/RewardProBot".into(),
                    icon: "🤖".into(),
                    reward_rate: "High".into(),
                    is_premium: true,
                },
                EarningBot {
                    id: "2".into(),
                    name: "CryptoTap App".into(),
                    category: TaskCategory::Tap,
                    description: "Tap and earn crypto instantly. Supports FaucetPay to USDT payments.".into(),
                    link: "https://t.me/CryptoTapBot".into(),
                    icon: "💎".into(),
                    reward_rate: "Medium".into(),
                    is_premium: false,
                },
            ],
            socials: vec![
                SocialLink {
                    id: "s1".into(),
                    platform: "Telegram".into(),
                    name: "Official Channel".into(),
                    link: "https://t.me/RewardSoftware".into(),
                    icon: "✈️".into(),
                    color: "bg-[#24A1DE]".into(),
                },
                SocialLink {
                    id: "s2".into(),
                    platform: "YouTube".into(),
                    name: "Official YouTube".into(),
                    link: "https://youtube.com/@RewardSoftware".into(),
                    icon: "📺".into(),
                    color: "bg-[#FF0000]".into(),
                },
            ],
            videos: vec![
                VideoContent {
                    id: "guide-1".into(),
                    title: "OFFICIAL: How to Start Earning with Reward Software".into(),
                    topic: "Official Guide".into(),
                    link: "https://www.youtube.com/@RewardSoftware".into(),
                    reward: 0,
                },
                VideoContent {
                    id: "guide-2".into(),
                    title: "WITHDRAWAL GUIDE: How to withdraw to FaucetPay USDT".into(),
                    topic: "Official Tutorial".into(),
                    link: "https://www.youtube.com/@RewardSoftware".into(),
                    reward: 0,
                },
            ],
            withdrawals: vec![
                seed_withdrawal("1", Decimal::new(500, 2), WithdrawalStatus::Completed, (2023, 10, 25), "Litecoin (LTC)"),
                seed_withdrawal("2", Decimal::new(150, 2), WithdrawalStatus::Pending, (2023, 10, 27), "Tether (USDT)"),
            ],
            balance: Balance {
                total: Decimal::new(125050, 2),
                today: Decimal::new(4520, 2),
            },
            activity: [
                ("Mon", 120),
                ("Tue", 180),
                ("Wed", 155),
                ("Thu", 250),
                ("Fri", 220),
                ("Sat", 305),
                ("Sun", 280),
            ]
            .into_iter()
            .map(|(day, earnings)| ActivityData {
                day: day.to_string(),
                earnings,
            })
            .collect(),
            ..Self::empty()
        }
    }
}

impl Default for MockStore {
    fn default() -> Self {
        Self::seeded()
    }
}

fn seed_withdrawal(
    id: &str,
    amount: Decimal,
    status: WithdrawalStatus,
    (y, m, d): (i32, u32, u32),
    method: &str,
) -> WithdrawalRecord {
    WithdrawalRecord {
        id: id.to_string(),
        amount,
        status,
        date: NaiveDate::from_ymd_opt(y, m, d).unwrap_or_default(),
        method: method.to_string(),
    }
}

/// Random base-36 token, redrawn while `taken` reports it as already in use.
pub fn fresh_id(taken: impl Fn(&str) -> bool) -> String {
    let mut rng = rand::thread_rng();
    loop {
        let id: String = (0..ID_LEN)
            .map(|_| ID_ALPHABET[rng.gen_range(0..ID_ALPHABET.len())] as char)
            .collect();
        if !taken(&id) {
            return id;
        }
    }
}
