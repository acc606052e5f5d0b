//! # Bounty Client
//!
//! Read side and transaction orchestration for the bug-bounty registry
//! contract.
//!
//! ## Overview
//!
//! - [`reader`]: enumerates bounties and keeps list/detail views fresh by polling
//! - [`create`]: the approve-then-post flow for new bounties
//! - [`actions`]: fix submission and voting
//!
//! The registry and the reward token are reached through the traits in
//! [`chain`], so the orchestration runs the same against a live network, a
//! local Soroban test environment or an in-memory fake.
//!
//! ## Bounty Lifecycle
//!
//! ```text
//! Open ──submit_fix──▶ Fix Submitted ──vote──▶ Voting ──quorum──▶ Resolved
//! ```
//!
//! Status is derived on the client from the stored fields
//! (see [`BountyRecord::status`]); the registry never stores it.
//!
//! ## Logging
//!
//! Everything is logged through `tracing`. Installing a subscriber is up to
//! the embedding application.

pub mod actions;
pub mod amount;
pub mod bounty;
pub mod chain;
pub mod config;
pub mod create;
pub mod error;
pub mod reader;
pub mod session;

#[cfg(test)]
mod testing;

pub use actions::{ActionKind, ActionState, BountyActions};
pub use amount::{display_reward, format_amount, parse_amount, AmountError};
pub use bounty::{approval_percentage, BountyRecord, BountyStatus};
pub use chain::{
    AccountId, BountyDraft, ChainError, ContractId, RegistryReader, RegistryWriter, RewardToken,
    TxReceipt,
};
pub use config::{ClientConfig, ConfigError, Deployment, Network, TokenInfo};
pub use create::{BountyForm, CreateBountyFlow, CreateStep, Phase};
pub use error::{ClientError, Result};
pub use reader::{enumerate_bounties, lookup_bounty, DetailView, FeedState, ListView, PollSchedule};
pub use session::Session;
