//! Settlement workflow core for the store mini-app: order payment
//! lifecycle, balance withdrawals, and the operator review queues.
//!
//! The store backend is a remote service; everything here talks to it
//! through [`api::SettlementApi`] and treats its answers as the only
//! truth. After any mutating call the affected snapshot is refetched
//! rather than patched locally.

pub mod admin;
pub mod api;
pub mod api_client;
pub mod config;
pub mod error;
pub mod orders;
pub mod services;
pub mod state;
pub mod withdraw;

pub use api::{HttpSettlementApi, SettlementApi};
pub use config::Config;
pub use error::{SettlementError, ValidationError};
pub use state::AppState;
