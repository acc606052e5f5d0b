//! In-memory registry and token used by the unit tests.

use crate::bounty::BountyRecord;
use crate::chain::{
    AccountId, BountyDraft, ChainError, ContractId, RegistryReader, RegistryWriter, RewardToken,
    TxReceipt,
};
use std::cell::RefCell;
use std::collections::HashSet;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Call {
    Count,
    Read(u64),
    HasVoted { bounty_id: u64, voter: String },
    Allowance { owner: String, spender: String },
    Approve { owner: String, spender: String, amount: i128 },
    Post { poster: String, title: String, reward: i128 },
    SubmitFix { submitter: String, bounty_id: u64, pr_link: String },
    Vote { voter: String, bounty_id: u64, approve: bool },
}

pub fn bounty(id: u64) -> BountyRecord {
    BountyRecord {
        id,
        title: format!("Bug #{id}"),
        description: "Steps to reproduce".into(),
        issue_url: format!("https://github.com/acme/app/issues/{id}"),
        reward: 100_000_000,
        submitter: None,
        fix_pr: String::new(),
        resolved: false,
        yes_votes: 0,
        no_votes: 0,
    }
}

/// How the fake answers `has_voted`.
#[derive(Clone, Debug, Default)]
pub enum VoteQuery {
    #[default]
    Answered,
    /// A registry with no per-voter record.
    Unsupported,
    Failing(ChainError),
}

#[derive(Default)]
struct State {
    bounties: Vec<BountyRecord>,
    failing_reads: HashSet<u64>,
    count_error: bool,
    allowance: i128,
    allowance_error: Option<ChainError>,
    approve_error: Option<ChainError>,
    post_error: Option<ChainError>,
    write_error: Option<ChainError>,
    vote_records: HashSet<(u64, String)>,
    vote_query: VoteQuery,
    calls: Vec<Call>,
    next_tx: u64,
}

impl State {
    fn receipt(&mut self) -> TxReceipt {
        self.next_tx += 1;
        TxReceipt {
            hash: format!("{:064x}", self.next_tx),
        }
    }
}

#[derive(Default)]
pub struct FakeChain {
    state: RefCell<State>,
}

impl FakeChain {
    pub fn with_bounties(count: u64) -> Self {
        let chain = Self::default();
        for id in 0..count {
            chain.push(bounty(id));
        }
        chain
    }

    pub fn push(&self, record: BountyRecord) {
        self.state.borrow_mut().bounties.push(record);
    }

    pub fn fail_read(&self, id: u64) {
        self.state.borrow_mut().failing_reads.insert(id);
    }

    pub fn fail_count(&self) {
        self.state.borrow_mut().count_error = true;
    }

    pub fn set_allowance(&self, amount: i128) {
        self.state.borrow_mut().allowance = amount;
    }

    pub fn fail_allowance(&self, err: ChainError) {
        self.state.borrow_mut().allowance_error = Some(err);
    }

    pub fn fail_approve(&self, err: ChainError) {
        self.state.borrow_mut().approve_error = Some(err);
    }

    pub fn fail_post(&self, err: ChainError) {
        self.state.borrow_mut().post_error = Some(err);
    }

    /// Fail fix submissions and votes.
    pub fn fail_writes(&self, err: ChainError) {
        self.state.borrow_mut().write_error = Some(err);
    }

    /// Clear every injected failure.
    pub fn heal(&self) {
        let mut state = self.state.borrow_mut();
        state.failing_reads.clear();
        state.count_error = false;
        state.allowance_error = None;
        state.approve_error = None;
        state.post_error = None;
        state.write_error = None;
    }

    /// Pretend `voter` voted on `bounty_id` in an earlier session.
    pub fn record_vote(&self, bounty_id: u64, voter: &str) {
        self.state
            .borrow_mut()
            .vote_records
            .insert((bounty_id, voter.to_owned()));
    }

    pub fn set_vote_query(&self, query: VoteQuery) {
        self.state.borrow_mut().vote_query = query;
    }

    pub fn calls(&self) -> Vec<Call> {
        self.state.borrow().calls.clone()
    }

    fn count_calls(&self, pred: impl Fn(&Call) -> bool) -> usize {
        self.state.borrow().calls.iter().filter(|c| pred(c)).count()
    }

    pub fn approvals(&self) -> usize {
        self.count_calls(|c| matches!(c, Call::Approve { .. }))
    }

    pub fn posts(&self) -> usize {
        self.count_calls(|c| matches!(c, Call::Post { .. }))
    }

    pub fn votes(&self) -> usize {
        self.count_calls(|c| matches!(c, Call::Vote { .. }))
    }

    pub fn count_reads(&self) -> usize {
        self.count_calls(|c| matches!(c, Call::Count))
    }
}

impl RegistryReader for FakeChain {
    fn bounty_count(&self, _registry: &ContractId) -> Result<u64, ChainError> {
        let mut state = self.state.borrow_mut();
        state.calls.push(Call::Count);
        if state.count_error {
            return Err(ChainError::Transport("count unavailable".into()));
        }
        Ok(state.bounties.len() as u64)
    }

    fn bounty(&self, _registry: &ContractId, bounty_id: u64) -> Result<BountyRecord, ChainError> {
        let mut state = self.state.borrow_mut();
        state.calls.push(Call::Read(bounty_id));
        if state.failing_reads.contains(&bounty_id) {
            return Err(ChainError::Transport(format!("read {bounty_id} failed")));
        }
        state
            .bounties
            .iter()
            .find(|b| b.id == bounty_id)
            .cloned()
            .ok_or(ChainError::Reverted {
                code: Some(3),
                message: "BountyNotFound".into(),
            })
    }

    fn has_voted(
        &self,
        _registry: &ContractId,
        bounty_id: u64,
        voter: &AccountId,
    ) -> Result<Option<bool>, ChainError> {
        let mut state = self.state.borrow_mut();
        state.calls.push(Call::HasVoted {
            bounty_id,
            voter: voter.to_string(),
        });
        match state.vote_query.clone() {
            VoteQuery::Answered => Ok(Some(
                state
                    .vote_records
                    .contains(&(bounty_id, voter.to_string())),
            )),
            VoteQuery::Unsupported => Ok(None),
            VoteQuery::Failing(err) => Err(err),
        }
    }
}

impl RegistryWriter for FakeChain {
    fn post_bounty(
        &self,
        _registry: &ContractId,
        poster: &AccountId,
        draft: &BountyDraft,
    ) -> Result<TxReceipt, ChainError> {
        let mut state = self.state.borrow_mut();
        state.calls.push(Call::Post {
            poster: poster.to_string(),
            title: draft.title.clone(),
            reward: draft.reward,
        });
        if let Some(err) = state.post_error.clone() {
            return Err(err);
        }
        if state.allowance < draft.reward {
            return Err(ChainError::Reverted {
                code: Some(12),
                message: "InsufficientAllowance".into(),
            });
        }
        state.allowance -= draft.reward;
        let id = state.bounties.len() as u64;
        state.bounties.push(BountyRecord {
            id,
            title: draft.title.clone(),
            description: draft.description.clone(),
            issue_url: draft.issue_url.clone(),
            reward: draft.reward,
            ..bounty(id)
        });
        Ok(state.receipt())
    }

    fn submit_fix(
        &self,
        _registry: &ContractId,
        submitter: &AccountId,
        bounty_id: u64,
        pr_link: &str,
    ) -> Result<TxReceipt, ChainError> {
        let mut state = self.state.borrow_mut();
        state.calls.push(Call::SubmitFix {
            submitter: submitter.to_string(),
            bounty_id,
            pr_link: pr_link.to_owned(),
        });
        if let Some(err) = state.write_error.clone() {
            return Err(err);
        }
        if let Some(b) = state.bounties.iter_mut().find(|b| b.id == bounty_id) {
            b.fix_pr = pr_link.to_owned();
            b.submitter = Some(submitter.clone());
        }
        Ok(state.receipt())
    }

    fn vote(
        &self,
        _registry: &ContractId,
        voter: &AccountId,
        bounty_id: u64,
        approve: bool,
    ) -> Result<TxReceipt, ChainError> {
        let mut state = self.state.borrow_mut();
        state.calls.push(Call::Vote {
            voter: voter.to_string(),
            bounty_id,
            approve,
        });
        if let Some(err) = state.write_error.clone() {
            return Err(err);
        }
        state.vote_records.insert((bounty_id, voter.to_string()));
        if let Some(b) = state.bounties.iter_mut().find(|b| b.id == bounty_id) {
            if approve {
                b.yes_votes += 1;
            } else {
                b.no_votes += 1;
            }
        }
        Ok(state.receipt())
    }
}

impl RewardToken for FakeChain {
    fn allowance(
        &self,
        _token: &ContractId,
        owner: &AccountId,
        spender: &ContractId,
    ) -> Result<i128, ChainError> {
        let mut state = self.state.borrow_mut();
        state.calls.push(Call::Allowance {
            owner: owner.to_string(),
            spender: spender.to_string(),
        });
        match state.allowance_error.clone() {
            Some(err) => Err(err),
            None => Ok(state.allowance),
        }
    }

    fn approve(
        &self,
        _token: &ContractId,
        owner: &AccountId,
        spender: &ContractId,
        amount: i128,
    ) -> Result<TxReceipt, ChainError> {
        let mut state = self.state.borrow_mut();
        state.calls.push(Call::Approve {
            owner: owner.to_string(),
            spender: spender.to_string(),
            amount,
        });
        if let Some(err) = state.approve_error.clone() {
            return Err(err);
        }
        state.allowance = amount;
        Ok(state.receipt())
    }
}
