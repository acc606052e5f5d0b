//! Read-side view of a bounty and the values derived from it.

use crate::chain::AccountId;
use crate::config::Network;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Client copy of a registry bounty. Never mutated locally; refreshed by
/// re-reading the registry.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BountyRecord {
    pub id: u64,
    pub title: String,
    pub description: String,
    pub issue_url: String,
    /// Reward in the token's smallest unit.
    pub reward: i128,
    pub submitter: Option<AccountId>,
    /// Empty until a fix has been submitted.
    pub fix_pr: String,
    pub resolved: bool,
    pub yes_votes: u64,
    pub no_votes: u64,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BountyStatus {
    Open,
    FixSubmitted,
    Voting,
    Resolved,
}

impl fmt::Display for BountyStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            BountyStatus::Open => "Open",
            BountyStatus::FixSubmitted => "Fix Submitted",
            BountyStatus::Voting => "Voting",
            BountyStatus::Resolved => "Resolved",
        })
    }
}

impl BountyRecord {
    pub fn has_fix(&self) -> bool {
        !self.fix_pr.is_empty()
    }

    pub fn total_votes(&self) -> u64 {
        self.yes_votes.saturating_add(self.no_votes)
    }

    /// Status derived from stored fields, first match wins:
    /// resolved, no fix, any votes, otherwise fix submitted.
    pub fn status(&self) -> BountyStatus {
        if self.resolved {
            BountyStatus::Resolved
        } else if !self.has_fix() {
            BountyStatus::Open
        } else if self.total_votes() > 0 {
            BountyStatus::Voting
        } else {
            BountyStatus::FixSubmitted
        }
    }

    pub fn approval_percentage(&self) -> u8 {
        approval_percentage(self.yes_votes, self.no_votes)
    }

    pub fn is_submitter(&self, account: &AccountId) -> bool {
        self.submitter.as_ref() == Some(account)
    }
}

/// `round(100 * yes / (yes + no))` with halves rounded up; 0 when nobody voted.
pub fn approval_percentage(yes: u64, no: u64) -> u8 {
    let total = u128::from(yes) + u128::from(no);
    if total == 0 {
        return 0;
    }
    let pct = (200 * u128::from(yes) + total) / (2 * total);
    // yes <= total keeps this in 0..=100
    pct as u8
}

/// `GABCDE...WXYZ`: first 6 and last 4 characters. Short inputs pass through.
pub fn short_address(address: &str) -> String {
    let chars: Vec<char> = address.chars().collect();
    if chars.len() <= 10 {
        return address.to_owned();
    }
    let head: String = chars[..6].iter().collect();
    let tail: String = chars[chars.len() - 4..].iter().collect();
    format!("{head}...{tail}")
}

/// Block explorer link for a confirmed transaction.
pub fn explorer_tx_url(network: Network, hash: &str) -> String {
    format!("{}/tx/{}", network.explorer_base(), hash)
}
