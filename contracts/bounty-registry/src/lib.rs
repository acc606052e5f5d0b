#![no_std]
//! # Bug Bounty Registry
//!
//! Escrow contract for bug bounties paid in a single reward token.
//!
//! ## Lifecycle
//!
//! ```text
//! post_bounty ──► Open ──submit_fix──► Fix Submitted ──vote──► Voting ──quorum──► Resolved
//! ```
//!
//! - A poster approves the registry on the reward token, then calls
//!   `post_bounty`. The reward is pulled into the contract with
//!   `transfer_from`, so the allowance must cover it.
//! - Any address may submit the single fix link a bounty accepts.
//! - Every address other than the fix submitter may vote once. When approvals
//!   reach the configured quorum and outnumber rejections, the bounty is
//!   resolved and the escrowed reward goes to the fix submitter.
//!
//! Bounty ids are positional: the n-th posted bounty has id `n - 1`, so a
//! reader can enumerate `[0, bounty_count())`.

mod events;
mod invariants;
mod reentrancy_guard;

use events::{
    emit_bounty_posted, emit_bounty_resolved, emit_fix_submitted, emit_registry_initialized,
    emit_voted, BountyPosted, BountyResolved, FixSubmitted, RegistryInitialized, Voted,
    EVENT_VERSION_V1,
};
use soroban_sdk::{contract, contracterror, contractimpl, contracttype, token, Address, Env, String};

/// Persistent entries are kept alive for roughly 30 days of ledgers.
const BOUNTY_TTL_THRESHOLD: u32 = 17_280;
const BOUNTY_TTL_EXTEND: u32 = 518_400;

#[contracterror]
#[derive(Copy, Clone, Debug, Eq, PartialEq, PartialOrd, Ord)]
#[repr(u32)]
pub enum Error {
    AlreadyInitialized = 1,
    NotInitialized = 2,
    BountyNotFound = 3,
    /// Reward is zero or negative
    InvalidAmount = 4,
    /// Title, description, issue link or fix link is empty
    EmptyField = 5,
    FixAlreadySubmitted = 6,
    BountyResolved = 7,
    /// Vote attempted before any fix was submitted
    NoFixPending = 8,
    /// The fix submitter cannot vote on their own fix
    SelfVote = 9,
    AlreadyVoted = 10,
    InvalidQuorum = 11,
    /// Poster has not approved the registry for the full reward
    InsufficientAllowance = 12,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Bounty {
    pub title: String,
    pub description: String,
    pub issue_url: String,
    /// Reward in the token's smallest unit. Fixed at creation.
    pub reward: i128,
    pub poster: Address,
    /// Set together with `fix_pr`; `None` while the bounty is open.
    pub submitter: Option<Address>,
    /// Empty until a fix is submitted; immutable afterwards.
    pub fix_pr: String,
    pub resolved: bool,
    pub yes_votes: u64,
    pub no_votes: u64,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct RegistryConfig {
    pub admin: Address,
    pub reward_token: Address,
    /// Approvals needed before a fix can be accepted.
    pub quorum: u64,
}

#[contracttype]
pub enum DataKey {
    Config,
    BountyCount,
    Bounty(u64),         // bounty_id
    Vote(u64, Address),  // (bounty_id, voter) -> approve
    ReentrancyGuard,
}

#[contract]
pub struct BountyRegistryContract;

#[contractimpl]
impl BountyRegistryContract {
    /// Initialize the registry with its admin, reward token and approval quorum.
    pub fn init(env: Env, admin: Address, reward_token: Address, quorum: u64) -> Result<(), Error> {
        if env.storage().instance().has(&DataKey::Config) {
            return Err(Error::AlreadyInitialized);
        }
        if quorum == 0 {
            return Err(Error::InvalidQuorum);
        }
        admin.require_auth();

        let config = RegistryConfig {
            admin: admin.clone(),
            reward_token: reward_token.clone(),
            quorum,
        };
        env.storage().instance().set(&DataKey::Config, &config);
        env.storage().instance().set(&DataKey::BountyCount, &0u64);

        emit_registry_initialized(
            &env,
            RegistryInitialized {
                version: EVENT_VERSION_V1,
                admin,
                reward_token,
                quorum,
                timestamp: env.ledger().timestamp(),
            },
        );
        Ok(())
    }

    /// Change the approval quorum. Admin only; applies to votes cast afterwards.
    pub fn set_quorum(env: Env, quorum: u64) -> Result<(), Error> {
        let mut config = Self::config(&env)?;
        config.admin.require_auth();
        if quorum == 0 {
            return Err(Error::InvalidQuorum);
        }
        config.quorum = quorum;
        env.storage().instance().set(&DataKey::Config, &config);
        Ok(())
    }

    /// Post a new bounty and escrow its reward.
    ///
    /// The registry must already hold an allowance of at least `reward` on the
    /// reward token for `poster`. Returns the new bounty id.
    ///
    /// # Reentrancy
    /// State (bounty record and count) is written before the inbound
    /// `transfer_from`, inside `reentrancy_guard::locked`.
    pub fn post_bounty(
        env: Env,
        poster: Address,
        title: String,
        description: String,
        issue_url: String,
        reward: i128,
    ) -> Result<u64, Error> {
        poster.require_auth();
        let config = Self::config(&env)?;

        if reward <= 0 {
            return Err(Error::InvalidAmount);
        }
        if title.len() == 0 || description.len() == 0 || issue_url.len() == 0 {
            return Err(Error::EmptyField);
        }

        let registry = env.current_contract_address();
        let token_client = token::Client::new(&env, &config.reward_token);
        if token_client.allowance(&poster, &registry) < reward {
            return Err(Error::InsufficientAllowance);
        }

        let bounty_id = reentrancy_guard::locked(&env, || {
            // EFFECTS
            let bounty_id = Self::bounty_count(env.clone());
            let bounty = Bounty {
                title: title.clone(),
                description,
                issue_url,
                reward,
                poster: poster.clone(),
                submitter: None,
                fix_pr: String::from_str(&env, ""),
                resolved: false,
                yes_votes: 0,
                no_votes: 0,
            };
            invariants::assert_bounty(&env, &bounty);
            Self::store_bounty(&env, bounty_id, &bounty);
            env.storage()
                .instance()
                .set(&DataKey::BountyCount, &(bounty_id + 1));

            // INTERACTION
            token_client.transfer_from(&registry, &poster, &registry, &reward);
            bounty_id
        });

        emit_bounty_posted(
            &env,
            BountyPosted {
                version: EVENT_VERSION_V1,
                bounty_id,
                poster,
                title,
                reward,
            },
        );
        Ok(bounty_id)
    }

    /// Attach a fix link to an open bounty. One fix per bounty.
    pub fn submit_fix(
        env: Env,
        submitter: Address,
        bounty_id: u64,
        pr_link: String,
    ) -> Result<(), Error> {
        submitter.require_auth();
        let mut bounty = Self::load_bounty(&env, bounty_id)?;

        if bounty.resolved {
            return Err(Error::BountyResolved);
        }
        if bounty.fix_pr.len() > 0 {
            return Err(Error::FixAlreadySubmitted);
        }
        if pr_link.len() == 0 {
            return Err(Error::EmptyField);
        }

        bounty.fix_pr = pr_link.clone();
        bounty.submitter = Some(submitter.clone());
        invariants::assert_bounty(&env, &bounty);
        Self::store_bounty(&env, bounty_id, &bounty);

        emit_fix_submitted(
            &env,
            FixSubmitted {
                version: EVENT_VERSION_V1,
                bounty_id,
                submitter,
                pr_link,
            },
        );
        Ok(())
    }

    /// Vote on the pending fix of a bounty.
    ///
    /// Each voter is recorded on chain, so a second vote from the same address
    /// fails with `AlreadyVoted`. When approvals reach the quorum and exceed
    /// rejections, the bounty is resolved and the reward is paid out.
    pub fn vote(env: Env, voter: Address, bounty_id: u64, approve: bool) -> Result<(), Error> {
        voter.require_auth();
        let config = Self::config(&env)?;
        let mut bounty = Self::load_bounty(&env, bounty_id)?;

        if bounty.resolved {
            return Err(Error::BountyResolved);
        }
        let submitter = match bounty.submitter.clone() {
            Some(submitter) => submitter,
            None => return Err(Error::NoFixPending),
        };
        if submitter == voter {
            return Err(Error::SelfVote);
        }
        let vote_key = DataKey::Vote(bounty_id, voter.clone());
        if env.storage().persistent().has(&vote_key) {
            return Err(Error::AlreadyVoted);
        }

        if approve {
            bounty.yes_votes += 1;
        } else {
            bounty.no_votes += 1;
        }
        let accepted = bounty.yes_votes >= config.quorum && bounty.yes_votes > bounty.no_votes;
        bounty.resolved = accepted;
        invariants::assert_bounty(&env, &bounty);

        reentrancy_guard::locked(&env, || {
            env.storage().persistent().set(&vote_key, &approve);
            env.storage()
                .persistent()
                .extend_ttl(&vote_key, BOUNTY_TTL_THRESHOLD, BOUNTY_TTL_EXTEND);
            Self::store_bounty(&env, bounty_id, &bounty);

            if accepted {
                token::Client::new(&env, &config.reward_token).transfer(
                    &env.current_contract_address(),
                    &submitter,
                    &bounty.reward,
                );
            }
        });

        emit_voted(
            &env,
            Voted {
                version: EVENT_VERSION_V1,
                bounty_id,
                voter,
                approve,
            },
        );
        if accepted {
            emit_bounty_resolved(
                &env,
                BountyResolved {
                    version: EVENT_VERSION_V1,
                    bounty_id,
                    winner: submitter,
                    reward: bounty.reward,
                    timestamp: env.ledger().timestamp(),
                },
            );
        }
        Ok(())
    }

    // ========================================================================
    // Views
    // ========================================================================

    /// Number of bounties ever posted. Valid ids are `[0, bounty_count)`.
    pub fn bounty_count(env: Env) -> u64 {
        env.storage()
            .instance()
            .get(&DataKey::BountyCount)
            .unwrap_or(0)
    }

    pub fn get_bounty(env: Env, bounty_id: u64) -> Result<Bounty, Error> {
        Self::load_bounty(&env, bounty_id)
    }

    /// Whether `voter` has already voted on `bounty_id`.
    pub fn has_voted(env: Env, bounty_id: u64, voter: Address) -> bool {
        env.storage()
            .persistent()
            .has(&DataKey::Vote(bounty_id, voter))
    }

    /// Re-check the stored record of `bounty_id` against the registry invariants.
    /// Returns `false` for unknown ids.
    pub fn verify_state(env: Env, bounty_id: u64) -> bool {
        match Self::load_bounty(&env, bounty_id) {
            Ok(bounty) => invariants::verify_bounty_invariants(&bounty),
            Err(_) => false,
        }
    }

    pub fn reward_token(env: Env) -> Result<Address, Error> {
        Ok(Self::config(&env)?.reward_token)
    }

    pub fn get_config(env: Env) -> Result<RegistryConfig, Error> {
        Self::config(&env)
    }

    // ========================================================================
    // Internal helpers
    // ========================================================================

    fn config(env: &Env) -> Result<RegistryConfig, Error> {
        env.storage()
            .instance()
            .get(&DataKey::Config)
            .ok_or(Error::NotInitialized)
    }

    fn load_bounty(env: &Env, bounty_id: u64) -> Result<Bounty, Error> {
        env.storage()
            .persistent()
            .get(&DataKey::Bounty(bounty_id))
            .ok_or(Error::BountyNotFound)
    }

    fn store_bounty(env: &Env, bounty_id: u64, bounty: &Bounty) {
        let key = DataKey::Bounty(bounty_id);
        env.storage().persistent().set(&key, bounty);
        env.storage()
            .persistent()
            .extend_ttl(&key, BOUNTY_TTL_THRESHOLD, BOUNTY_TTL_EXTEND);
    }
}

#[cfg(test)]
mod test_lifecycle;
