//! Capabilities the embedding chat host may provide.
//!
//! Identity coming from the host is taken at face value. Nothing in this
//! module verifies initData signatures; treat [`User::id`] as a claim.

use std::fmt;

use tracing::{debug, info, warn};

use crate::models::User;

pub const GUEST_USER_ID: i64 = 12345;

/// Intensity of a haptic cue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Haptic {
    #[default]
    Light,
    Medium,
    Heavy,
    Rigid,
    Soft,
}

impl fmt::Display for Haptic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Haptic::Light => "light",
            Haptic::Medium => "medium",
            Haptic::Heavy => "heavy",
            Haptic::Rigid => "rigid",
            Haptic::Soft => "soft",
        };
        f.write_str(s)
    }
}

/// Host-side collaborators. Implementations swallow their own failures.
pub trait Host: Send + Sync {
    /// The user the host claims is running the app, if any.
    fn user(&self) -> Option<User>;

    /// Opens a generic external URL.
    fn open_link(&self, url: &str);

    /// Opens a chat-app deep link inside the host.
    fn open_telegram_link(&self, url: &str);

    fn alert(&self, message: &str);

    fn vibrate(&self, style: Haptic);
}

/// Stand-in used when no host is present: no user, everything else is logged.
#[derive(Debug, Clone, Copy, Default)]
pub struct HeadlessHost;

impl Host for HeadlessHost {
    fn user(&self) -> Option<User> {
        None
    }

    fn open_link(&self, url: &str) {
        info!("open (new window): {}", url);
    }

    fn open_telegram_link(&self, url: &str) {
        // no in-host mechanism without a host
        self.open_link(url);
    }

    fn alert(&self, message: &str) {
        info!("alert: {}", message);
    }

    fn vibrate(&self, style: Haptic) {
        debug!("haptic {} ignored, no host", style);
    }
}

/// Host backed by a Telegram Mini-App `initData` query string.
///
/// Only the `user` field is read. Malformed data degrades to "no user".
#[derive(Debug, Clone, Default)]
pub struct InitDataHost {
    user: Option<User>,
}

impl InitDataHost {
    pub fn from_init_data(raw: &str) -> Self {
        let user = form_urlencoded::parse(raw.as_bytes())
            .find(|(key, _)| key == "user")
            .and_then(|(_, value)| match serde_json::from_str::<User>(&value) {
                Ok(user) => Some(user),
                Err(e) => {
                    warn!("Discarding unreadable initData user: {}", e);
                    None
                }
            });
        Self { user }
    }

    pub fn with_user(user: User) -> Self {
        Self { user: Some(user) }
    }
}

impl Host for InitDataHost {
    fn user(&self) -> Option<User> {
        self.user.clone()
    }

    fn open_link(&self, url: &str) {
        HeadlessHost.open_link(url);
    }

    fn open_telegram_link(&self, url: &str) {
        info!("open (in host): {}", url);
    }

    fn alert(&self, message: &str) {
        HeadlessHost.alert(message);
    }

    fn vibrate(&self, style: Haptic) {
        debug!("haptic {}", style);
    }
}

/// The fallback identity when the host supplies none.
pub fn guest_user() -> User {
    User {
        id: GUEST_USER_ID,
        first_name: "Reward Software".to_string(),
        last_name: None,
        username: Some("GuestUser".to_string()),
        photo_url: Some(
            "https://ui-avatars.com/api/?name=Reward+Software&background=3b82f6&color=fff"
                .to_string(),
        ),
    }
}

/// Never fails: no host user means the guest.
pub fn current_user(host: &dyn Host) -> User {
    host.user().unwrap_or_else(guest_user)
}

/// Whether a URL should open inside the chat host rather than a new window.
pub fn is_telegram_link(url: &str) -> bool {
    url.contains("t.me/") || url.starts_with("tg://")
}

/// Routes a URL to the matching opener on the host.
pub fn dispatch_link(host: &dyn Host, url: &str) {
    if is_telegram_link(url) {
        host.open_telegram_link(url);
    } else {
        host.open_link(url);
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use super::*;
    use std::sync::Mutex;

    /// Host that records every call, for assertions.
    #[derive(Default)]
    pub struct RecordingHost {
        pub user: Option<User>,
        pub opened: Mutex<Vec<String>>,
        pub opened_in_host: Mutex<Vec<String>>,
        pub alerts: Mutex<Vec<String>>,
        pub haptics: Mutex<Vec<Haptic>>,
    }

    impl RecordingHost {
        pub fn as_user(id: i64) -> Self {
            Self {
                user: Some(User {
                    id,
                    first_name: "Test".to_string(),
                    last_name: None,
                    username: None,
                    photo_url: None,
                }),
                ..Self::default()
            }
        }

        pub fn alerts(&self) -> Vec<String> {
            self.alerts.lock().unwrap().clone()
        }
    }

    impl Host for RecordingHost {
        fn user(&self) -> Option<User> {
            self.user.clone()
        }

        fn open_link(&self, url: &str) {
            self.opened.lock().unwrap().push(url.to_string());
        }

        fn open_telegram_link(&self, url: &str) {
            self.opened_in_host.lock().unwrap().push(url.to_string());
        }

        fn alert(&self, message: &str) {
            self.alerts.lock().unwrap().push(message.to_string());
        }

        fn vibrate(&self, style: Haptic) {
            self.haptics.lock().unwrap().push(style);
        }
    }
}
