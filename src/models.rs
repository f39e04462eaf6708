// src/models.rs
use std::{fmt, str::FromStr};

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::Error;

/// A mini-app user as asserted by the host. Nothing here is verified.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub first_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub photo_url: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TaskCategory {
    #[serde(rename = "Tap2Earn")]
    Tap,
    #[serde(rename = "Watch Ads")]
    Ads,
    #[serde(rename = "Quiz Earn")]
    Quiz,
    #[serde(rename = "Game Earn")]
    Game,
    #[serde(rename = "Mining Earn")]
    Mining,
    #[serde(rename = "Social Earn")]
    Social,
}

impl TaskCategory {
    pub const ALL: [TaskCategory; 6] = [
        TaskCategory::Tap,
        TaskCategory::Ads,
        TaskCategory::Quiz,
        TaskCategory::Game,
        TaskCategory::Mining,
        TaskCategory::Social,
    ];

    pub fn label(self) -> &'static str {
        match self {
            TaskCategory::Tap => "Tap2Earn",
            TaskCategory::Ads => "Watch Ads",
            TaskCategory::Quiz => "Quiz Earn",
            TaskCategory::Game => "Game Earn",
            TaskCategory::Mining => "Mining Earn",
            TaskCategory::Social => "Social Earn",
        }
    }
}

impl fmt::Display for TaskCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for TaskCategory {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        TaskCategory::ALL
            .into_iter()
            .find(|c| c.label() == s.trim())
            .ok_or_else(|| Error::validation(format!("Unknown category: {}", s)))
    }
}

/// Category selector on the bot list. `All` is a filter, never a bot category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CategoryFilter {
    #[default]
    All,
    Only(TaskCategory),
}

impl CategoryFilter {
    pub fn matches(self, category: TaskCategory) -> bool {
        match self {
            CategoryFilter::All => true,
            CategoryFilter::Only(c) => c == category,
        }
    }
}

impl FromStr for CategoryFilter {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().is_empty() || s.trim() == "All" {
            return Ok(CategoryFilter::All);
        }
        s.parse().map(CategoryFilter::Only)
    }
}

/// A partner offer listed on the home screen
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EarningBot {
    pub id: String,
    pub name: String,
    pub category: TaskCategory,
    pub description: String,
    pub link: String,
    pub icon: String,
    pub reward_rate: String,
    #[serde(default)]
    pub is_premium: bool,
}

/// Fields of a bot before the store assigns its id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewBot {
    pub name: String,
    pub category: TaskCategory,
    pub description: String,
    pub link: String,
    pub icon: String,
    pub reward_rate: String,
    #[serde(default)]
    pub is_premium: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SocialLink {
    pub id: String,
    pub platform: String,
    pub name: String,
    pub link: String,
    pub icon: String,
    pub color: String, // presentation token, derived from platform
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewSocial {
    pub platform: String,
    pub name: String,
    pub link: String,
    pub icon: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VideoContent {
    pub id: String,
    pub title: String,
    pub topic: String,
    pub link: String,
    pub reward: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewVideo {
    pub title: String,
    pub topic: String,
    pub link: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WithdrawalStatus {
    Completed,
    Pending,
    Rejected,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WithdrawalRecord {
    pub id: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub amount: Decimal,
    pub status: WithdrawalStatus,
    pub date: NaiveDate,
    pub method: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PayoutStatus {
    Processing,
    Completed,
}

/// One row of the public payout leaderboard
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GlobalPayout {
    pub id: String,
    pub user: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub amount: Decimal,
    pub network: String,
    pub status: PayoutStatus,
    pub time: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActivityData {
    pub day: String,
    pub earnings: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Balance {
    #[serde(with = "rust_decimal::serde::float")]
    pub total: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub today: Decimal,
}
