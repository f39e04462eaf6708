//! Admin gating and the admin console.
//!
//! Access is decided by an [`Authorizer`] looking at the host-supplied user.
//! The default [`AdminIdAuthorizer`] compares ids and trusts whatever id the
//! host claims, so this is not a security boundary.

use std::sync::Arc;

use serde::Deserialize;
use tracing::{info, warn};

use crate::data::DataAccess;
use crate::error::{Error, Result};
use crate::host::{current_user, Haptic, Host};
use crate::models::{EarningBot, NewBot, NewSocial, NewVideo, SocialLink, TaskCategory, VideoContent, User};

pub const ACCESS_DENIED: &str = "Access Denied: Administrative privileges required.";

pub trait Authorizer: Send + Sync {
    fn is_admin(&self, user: &User) -> bool;
}

#[derive(Debug, Clone, Copy)]
pub struct AdminIdAuthorizer {
    pub admin_id: i64,
}

impl Authorizer for AdminIdAuthorizer {
    fn is_admin(&self, user: &User) -> bool {
        user.id == self.admin_id
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdminAccess {
    Denied,
    Granted,
}

/// Screens of the mini-app.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Tab {
    #[default]
    Home,
    Social,
    Video,
    Withdrawal,
    Payouts,
    Admin,
}

#[derive(Clone)]
pub struct AdminGate {
    authorizer: Arc<dyn Authorizer>,
}

impl AdminGate {
    pub fn new(authorizer: impl Authorizer + 'static) -> Self {
        Self {
            authorizer: Arc::new(authorizer),
        }
    }

    pub fn with_admin_id(admin_id: i64) -> Self {
        Self::new(AdminIdAuthorizer { admin_id })
    }

    pub fn check(&self, user: &User) -> AdminAccess {
        if self.authorizer.is_admin(user) {
            AdminAccess::Granted
        } else {
            AdminAccess::Denied
        }
    }

    /// Re-resolves the user on every call; a denial is reported through the host.
    pub fn enter(&self, host: &dyn Host) -> AdminAccess {
        let user = current_user(host);
        let access = self.check(&user);
        if access == AdminAccess::Denied {
            warn!("Admin access denied for user {}", user.id);
            host.alert(ACCESS_DENIED);
        }
        access
    }

    /// The admin tab falls back to Home for everyone else.
    pub fn resolve_tab(&self, requested: Tab, host: &dyn Host) -> Tab {
        match requested {
            Tab::Admin if self.enter(host) == AdminAccess::Denied => Tab::Home,
            other => other,
        }
    }

    /// Console bound to `host`, or `None` when access is denied.
    pub fn open<'h>(&self, host: &'h dyn Host, data: &DataAccess) -> Option<AdminConsole<'h>> {
        match self.enter(host) {
            AdminAccess::Granted => Some(AdminConsole {
                host,
                data: data.clone(),
            }),
            AdminAccess::Denied => None,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct BotForm {
    pub name: String,
    pub link: String,
    pub category: TaskCategory,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub icon: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SocialForm {
    pub platform: String,
    pub name: String,
    pub link: String,
    #[serde(default)]
    pub icon: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct VideoForm {
    pub title: String,
    #[serde(default)]
    pub topic: String,
    pub link: String,
}

/// Privileged create/delete operations. Only [`AdminGate::open`] hands these out.
pub struct AdminConsole<'h> {
    host: &'h dyn Host,
    data: DataAccess,
}

impl AdminConsole<'_> {
    pub async fn deploy_bot(&self, form: BotForm) -> Result<EarningBot> {
        let name = required(&form.name, "Name, Link and Category are required")?;
        let link = required(&form.link, "Name, Link and Category are required")?;

        let bot = self
            .data
            .add_bot(NewBot {
                name,
                link,
                category: form.category,
                description: or_default(&form.description, "No description provided."),
                icon: or_default(&form.icon, "🤖"),
                reward_rate: "High".to_string(),
                is_premium: false,
            })
            .await;
        self.host.alert("Partner Bot deployed successfully!");
        Ok(bot)
    }

    pub async fn remove_bot(&self, id: &str) {
        self.host.vibrate(Haptic::Medium);
        self.data.remove_bot(id).await;
        self.host.alert("Bot removed from hub.");
    }

    pub async fn add_social(&self, form: SocialForm) -> Result<SocialLink> {
        let name = required(&form.name, "Name and Link are required")?;
        let link = required(&form.link, "Name and Link are required")?;

        let social = self
            .data
            .add_social(NewSocial {
                platform: form.platform,
                name,
                link,
                icon: or_default(&form.icon, "🔗"),
            })
            .await;
        self.host.alert("Social link added!");
        Ok(social)
    }

    pub async fn remove_social(&self, id: &str) {
        self.host.vibrate(Haptic::Medium);
        self.data.remove_social(id).await;
        self.host.alert("Social link removed.");
    }

    pub async fn add_video(&self, form: VideoForm) -> Result<VideoContent> {
        let title = required(&form.title, "Title and Link are required")?;
        let link = required(&form.link, "Title and Link are required")?;

        let video = self
            .data
            .add_video(NewVideo {
                title,
                topic: or_default(&form.topic, "General"),
                link,
            })
            .await;
        self.host.alert("Video resource added!");
        Ok(video)
    }

    pub async fn remove_video(&self, id: &str) {
        self.host.vibrate(Haptic::Medium);
        self.data.remove_video(id).await;
        self.host.alert("Video resource removed.");
    }

    pub async fn update_logo(&self, url: &str) -> Result<String> {
        let url = required(url, "Logo URL is required")?;
        let logo = self.data.set_logo(&url).await;
        info!("Logo updated by admin");
        self.host.alert("App Logo updated successfully!");
        Ok(logo)
    }
}

/// Blank means whitespace only; a non-blank value is kept as typed.
fn required(value: &str, msg: &str) -> Result<String> {
    if value.trim().is_empty() {
        return Err(Error::validation(msg));
    }
    Ok(value.to_string())
}

fn or_default(value: &str, default: &str) -> String {
    if value.trim().is_empty() {
        default.to_string()
    } else {
        value.to_string()
    }
}
