//! Seams to the on-chain collaborators: the bounty registry and the reward
//! token.
//!
//! Every write method submits a transaction and blocks until the network
//! reports it confirmed or failed. There is no client-side cancellation once
//! a write has been submitted, and no timeout beyond what the transport
//! enforces.

use crate::bounty::BountyRecord;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Failure reported by the chain transport or by a contract.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ChainError {
    #[error("transaction rejected by the signer")]
    Rejected,

    #[error("transaction reverted: {message}")]
    Reverted { code: Option<u32>, message: String },

    #[error("network error: {0}")]
    Transport(String),

    /// The call reached a contract but its answer did not have the expected shape.
    #[error("could not decode contract response: {0}")]
    Decode(String),

    #[error("no contract deployed at {0}")]
    MissingContract(String),
}

macro_rules! chain_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            pub fn new(value: impl Into<String>) -> Self {
                Self(value.into())
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// Empty or all-zero identifiers are placeholders for "not configured".
            pub fn is_unset(&self) -> bool {
                let raw = self.0.trim();
                let raw = raw.strip_prefix("0x").unwrap_or(raw);
                raw.is_empty() || raw.chars().all(|c| c == '0')
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(value: &str) -> Self {
                Self::new(value)
            }
        }
    };
}

chain_id! {
    /// A user account (wallet) address.
    AccountId
}

chain_id! {
    /// A deployed contract address.
    ContractId
}

/// Confirmation of a submitted transaction.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TxReceipt {
    pub hash: String,
}

/// Validated input for `RegistryWriter::post_bounty`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BountyDraft {
    pub title: String,
    pub description: String,
    pub issue_url: String,
    /// Reward in the token's smallest unit.
    pub reward: i128,
}

pub trait RegistryReader {
    fn bounty_count(&self, registry: &ContractId) -> Result<u64, ChainError>;

    fn bounty(&self, registry: &ContractId, bounty_id: u64) -> Result<BountyRecord, ChainError>;

    /// Per-voter record, when the registry exposes one. `Ok(None)` means the
    /// registry cannot answer and callers must rely on their own bookkeeping.
    fn has_voted(
        &self,
        _registry: &ContractId,
        _bounty_id: u64,
        _voter: &AccountId,
    ) -> Result<Option<bool>, ChainError> {
        Ok(None)
    }
}

pub trait RegistryWriter {
    fn post_bounty(
        &self,
        registry: &ContractId,
        poster: &AccountId,
        draft: &BountyDraft,
    ) -> Result<TxReceipt, ChainError>;

    fn submit_fix(
        &self,
        registry: &ContractId,
        submitter: &AccountId,
        bounty_id: u64,
        pr_link: &str,
    ) -> Result<TxReceipt, ChainError>;

    fn vote(
        &self,
        registry: &ContractId,
        voter: &AccountId,
        bounty_id: u64,
        approve: bool,
    ) -> Result<TxReceipt, ChainError>;
}

pub trait RewardToken {
    fn allowance(
        &self,
        token: &ContractId,
        owner: &AccountId,
        spender: &ContractId,
    ) -> Result<i128, ChainError>;

    fn approve(
        &self,
        token: &ContractId,
        owner: &AccountId,
        spender: &ContractId,
        amount: i128,
    ) -> Result<TxReceipt, ChainError>;
}
