//! Fix submission and voting from a bounty's detail view.
//!
//! The client-side checks only gate the controls; the registry re-checks
//! everything and is the authority. Votes cast in this session are
//! remembered per account, and the registry's own per-voter record is
//! consulted as well when it exposes one.
//!
//! Writes block until the registry confirms. A UI that wants a spinner while
//! one is in flight registers [`BountyActions::on_transition`].

use crate::bounty::BountyRecord;
use crate::chain::{AccountId, RegistryReader, RegistryWriter, TxReceipt};
use crate::config::ClientConfig;
use crate::error::{ClientError, Result};
use crate::session::{write_target, Session};
use std::collections::HashSet;
use tracing::{error, info, warn};

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum ActionState {
    #[default]
    Idle,
    Pending,
    Confirmed(TxReceipt),
}

impl ActionState {
    pub fn is_pending(&self) -> bool {
        matches!(self, ActionState::Pending)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ActionKind {
    SubmitFix,
    Vote,
}

type Observer = Box<dyn FnMut(ActionKind, &ActionState)>;

#[derive(Default)]
pub struct BountyActions {
    fix: ActionState,
    vote: ActionState,
    voted: HashSet<(AccountId, u64)>,
    last_error: Option<String>,
    observer: Option<Observer>,
}

impl BountyActions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Called with every state a fix submission or vote enters.
    pub fn on_transition(&mut self, observer: impl FnMut(ActionKind, &ActionState) + 'static) {
        self.observer = Some(Box::new(observer));
    }

    pub fn fix_state(&self) -> &ActionState {
        &self.fix
    }

    pub fn vote_state(&self) -> &ActionState {
        &self.vote
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    pub fn has_voted_locally(&self, account: &AccountId, bounty_id: u64) -> bool {
        self.voted.contains(&(account.clone(), bounty_id))
    }

    pub fn can_submit_fix(&self, session: &Session, bounty: &BountyRecord) -> bool {
        session.is_connected() && !bounty.resolved && !bounty.has_fix()
    }

    pub fn can_vote(&self, session: &Session, bounty: &BountyRecord) -> bool {
        let Some(account) = session.account.as_ref() else {
            return false;
        };
        !bounty.resolved
            && bounty.has_fix()
            && !bounty.is_submitter(account)
            && !self.has_voted_locally(account, bounty.id)
    }

    pub fn submit_fix<W, F>(
        &mut self,
        session: &Session,
        config: &ClientConfig,
        registry: &W,
        bounty: &BountyRecord,
        pr_link: &str,
        on_success: F,
    ) -> Result<TxReceipt>
    where
        W: RegistryWriter + ?Sized,
        F: FnOnce(&TxReceipt),
    {
        self.last_error = None;

        let target = write_target(session, config)?;
        let pr_link = pr_link.trim();
        if pr_link.is_empty() {
            return Err(ClientError::EmptyField { field: "fix link" });
        }
        if bounty.resolved {
            return Err(ClientError::BountyResolved(bounty.id));
        }
        if bounty.has_fix() {
            return Err(ClientError::FixAlreadySubmitted(bounty.id));
        }

        self.set_state(ActionKind::SubmitFix, ActionState::Pending);
        match registry.submit_fix(target.registry, target.account, bounty.id, pr_link) {
            Ok(receipt) => {
                info!(tx = %receipt.hash, bounty_id = bounty.id, "Fix submitted");
                self.set_state(ActionKind::SubmitFix, ActionState::Confirmed(receipt.clone()));
                on_success(&receipt);
                Ok(receipt)
            }
            Err(err) => {
                let err = ClientError::SubmitFix(err);
                error!(bounty_id = bounty.id, error = %err, "Fix submission failed");
                self.set_state(ActionKind::SubmitFix, ActionState::Idle);
                self.last_error = Some(err.to_string());
                Err(err)
            }
        }
    }

    pub fn vote<W, F>(
        &mut self,
        session: &Session,
        config: &ClientConfig,
        registry: &W,
        bounty: &BountyRecord,
        approve: bool,
        on_success: F,
    ) -> Result<TxReceipt>
    where
        W: RegistryReader + RegistryWriter + ?Sized,
        F: FnOnce(&TxReceipt),
    {
        self.last_error = None;

        let target = write_target(session, config)?;
        if bounty.resolved {
            return Err(ClientError::BountyResolved(bounty.id));
        }
        if !bounty.has_fix() {
            return Err(ClientError::NoFixPending(bounty.id));
        }
        if bounty.is_submitter(target.account) {
            return Err(ClientError::SelfVote);
        }
        if self.has_voted_locally(target.account, bounty.id) {
            return Err(ClientError::AlreadyVoted(bounty.id));
        }

        match registry.has_voted(target.registry, bounty.id, target.account) {
            Ok(Some(true)) => {
                self.voted.insert((target.account.clone(), bounty.id));
                return Err(ClientError::AlreadyVoted(bounty.id));
            }
            Ok(_) => {}
            Err(err) => warn!(bounty_id = bounty.id, error = %err, "Vote record unavailable"),
        }

        self.set_state(ActionKind::Vote, ActionState::Pending);
        match registry.vote(target.registry, target.account, bounty.id, approve) {
            Ok(receipt) => {
                info!(tx = %receipt.hash, bounty_id = bounty.id, approve, "Vote cast");
                self.voted.insert((target.account.clone(), bounty.id));
                self.set_state(ActionKind::Vote, ActionState::Confirmed(receipt.clone()));
                on_success(&receipt);
                Ok(receipt)
            }
            Err(err) => {
                let err = ClientError::Vote(err);
                error!(bounty_id = bounty.id, error = %err, "Vote failed");
                self.set_state(ActionKind::Vote, ActionState::Idle);
                self.last_error = Some(err.to_string());
                Err(err)
            }
        }
    }

    fn set_state(&mut self, kind: ActionKind, state: ActionState) {
        let slot = match kind {
            ActionKind::SubmitFix => &mut self.fix,
            ActionKind::Vote => &mut self.vote,
        };
        *slot = state;
        if let Some(observer) = self.observer.as_mut() {
            observer(kind, slot);
        }
    }
}
