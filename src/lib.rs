//! Backend for the Reward Software earn hub mini-app.
//!
//! All state lives in an in-memory [`store::MockStore`] reached only through
//! [`data::DataAccess`]. Identity is whatever the host claims; see [`host`].

pub mod admin;
pub mod api;
pub mod config;
pub mod data;
pub mod error;
pub mod host;
pub mod models;
pub mod payouts;
pub mod store;

pub use error::{Error, Result};
