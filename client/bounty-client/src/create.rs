//! Create-bounty flow: approve the reward, then post the bounty.
//!
//! ```text
//!            allowance short           confirmed            confirmed
//!   Form ─────────────────────▶ Approving ─────────▶ Posting ─────────▶ Success
//!    │ ▲      allowance ok                   ▲          │                  │
//!    │ └──────────── failure ────────────────┼──────────┘                  │
//!    └───────────────────────────────────────┘                             │
//!    ▲───────────────────── closed / display time elapsed ─────────────────┘
//! ```
//!
//! The post is never submitted unless the approval (when one is needed) has
//! confirmed. A confirmed approval whose post then fails is left in place;
//! the next attempt reads the allowance again and skips straight to posting.

use crate::amount::{parse_amount, AmountError};
use crate::chain::{BountyDraft, ChainError, RegistryWriter, RewardToken, TxReceipt};
use crate::config::{ClientConfig, TokenInfo};
use crate::error::{ClientError, Result};
use crate::session::{write_target, Session};
use std::time::{Duration, Instant};
use tracing::{debug, error, info, warn};

/// Raw, user-editable form fields.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct BountyForm {
    pub title: String,
    pub description: String,
    pub issue_url: String,
    /// Decimal amount in whole tokens, e.g. `"10.5"`.
    pub reward: String,
}

impl BountyForm {
    pub fn to_draft(&self, token: &TokenInfo) -> Result<BountyDraft> {
        let title = required("title", &self.title)?;
        let description = required("description", &self.description)?;
        let issue_url = required("issue link", &self.issue_url)?;

        let reward = parse_amount(&self.reward, token.decimals)?;
        if reward <= 0 {
            return Err(AmountError::NotPositive.into());
        }

        Ok(BountyDraft {
            title,
            description,
            issue_url,
            reward,
        })
    }
}

fn required(field: &'static str, value: &str) -> Result<String> {
    let value = value.trim();
    if value.is_empty() {
        return Err(ClientError::EmptyField { field });
    }
    Ok(value.to_owned())
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CreateStep {
    Form,
    Approving,
    Posting,
    Success { receipt: TxReceipt, at: Instant },
}

/// Payload-free view of [`CreateStep`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Phase {
    Form,
    Approving,
    Posting,
    Success,
}

impl Phase {
    pub fn name(self) -> &'static str {
        match self {
            Phase::Form => "Form",
            Phase::Approving => "Approving",
            Phase::Posting => "Posting",
            Phase::Success => "Success",
        }
    }

    pub fn can_transition_to(self, next: Phase) -> bool {
        matches!(
            (self, next),
            (Phase::Form, Phase::Approving)
                | (Phase::Form, Phase::Posting)
                | (Phase::Approving, Phase::Posting)
                | (Phase::Approving, Phase::Form)
                | (Phase::Posting, Phase::Success)
                | (Phase::Posting, Phase::Form)
                | (Phase::Success, Phase::Form)
        )
    }
}

impl CreateStep {
    pub fn phase(&self) -> Phase {
        match self {
            CreateStep::Form => Phase::Form,
            CreateStep::Approving => Phase::Approving,
            CreateStep::Posting => Phase::Posting,
            CreateStep::Success { .. } => Phase::Success,
        }
    }
}

type Observer = Box<dyn FnMut(Phase)>;

pub struct CreateBountyFlow {
    form: BountyForm,
    step: CreateStep,
    trail: Vec<Phase>,
    success_display: Duration,
    last_error: Option<String>,
    observer: Option<Observer>,
}

impl CreateBountyFlow {
    pub fn new(config: &ClientConfig) -> Self {
        Self {
            form: BountyForm::default(),
            step: CreateStep::Form,
            trail: Vec::new(),
            success_display: config.success_display(),
            last_error: None,
            observer: None,
        }
    }

    /// Called with every phase entered.
    pub fn on_transition(&mut self, observer: impl FnMut(Phase) + 'static) {
        self.observer = Some(Box::new(observer));
    }

    pub fn step(&self) -> &CreateStep {
        &self.step
    }

    pub fn form(&self) -> &BountyForm {
        &self.form
    }

    /// The form is editable only while nothing is in flight.
    pub fn form_mut(&mut self) -> Option<&mut BountyForm> {
        match self.step {
            CreateStep::Form => Some(&mut self.form),
            _ => None,
        }
    }

    /// Phases entered by the current or most recent attempt.
    pub fn trail(&self) -> &[Phase] {
        &self.trail
    }

    /// Message of the last aborted attempt, cleared when a new one starts.
    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    /// Run the whole flow, blocking on each transaction.
    ///
    /// `on_success` fires once the post confirms, whether or not an approval
    /// was needed. Any failure returns the flow to `Form` with the form
    /// contents intact.
    pub fn submit<W, T, F>(
        &mut self,
        session: &Session,
        config: &ClientConfig,
        registry: &W,
        token: &T,
        on_success: F,
    ) -> Result<TxReceipt>
    where
        W: RegistryWriter + ?Sized,
        T: RewardToken + ?Sized,
        F: FnOnce(&TxReceipt),
    {
        if self.step != CreateStep::Form {
            return Err(ClientError::Busy);
        }
        self.trail.clear();
        self.last_error = None;

        match self.run(session, config, registry, token) {
            Ok(receipt) => {
                on_success(&receipt);
                Ok(receipt)
            }
            Err(err) => {
                error!(error = %err, "Create bounty aborted");
                if self.step.phase() != Phase::Form {
                    self.transition(CreateStep::Form)?;
                }
                self.last_error = Some(err.to_string());
                Err(err)
            }
        }
    }

    fn run<W, T>(
        &mut self,
        session: &Session,
        config: &ClientConfig,
        registry: &W,
        token: &T,
    ) -> Result<TxReceipt>
    where
        W: RegistryWriter + ?Sized,
        T: RewardToken + ?Sized,
    {
        let target = write_target(session, config)?;
        let network = target.network;
        let token_id =
            target
                .deployment
                .reward_token()
                .ok_or(ClientError::TokenNotConfigured {
                    network,
                    env_var: network.token_env_var(),
                })?;
        let draft = self.form.to_draft(&config.token)?;

        let allowance = match token.allowance(token_id, target.account, target.registry) {
            Ok(allowance) => allowance,
            Err(ChainError::MissingContract(_)) => {
                return Err(ClientError::TokenNotDeployed {
                    network,
                    address: token_id.clone(),
                })
            }
            Err(ChainError::Decode(reason)) => {
                return Err(ClientError::TokenUnreadable {
                    network,
                    address: token_id.clone(),
                    reason,
                })
            }
            Err(err) => {
                warn!(token = %token_id, error = %err, "Allowance unknown, assuming zero");
                0
            }
        };

        if allowance < draft.reward {
            debug!(allowance, reward = draft.reward, "Allowance short, approving");
            self.transition(CreateStep::Approving)?;
            let receipt = token
                .approve(token_id, target.account, target.registry, draft.reward)
                .map_err(ClientError::Approval)?;
            info!(tx = %receipt.hash, amount = draft.reward, "Approval confirmed");
        }

        self.transition(CreateStep::Posting)?;
        let receipt = registry
            .post_bounty(target.registry, target.account, &draft)
            .map_err(ClientError::Post)?;
        info!(tx = %receipt.hash, %network, "Bounty posted");

        self.transition(CreateStep::Success {
            receipt: receipt.clone(),
            at: Instant::now(),
        })?;
        Ok(receipt)
    }

    /// Auto-close the success screen once it has been shown long enough.
    /// Returns whether the flow was reset.
    pub fn tick(&mut self, now: Instant) -> bool {
        let expired = match &self.step {
            CreateStep::Success { at, .. } => now.saturating_duration_since(*at) >= self.success_display,
            _ => false,
        };
        expired && self.reset().is_ok()
    }

    /// User dismissal. Clears the form before submission or after success;
    /// refused while a transaction is in flight.
    pub fn close(&mut self) -> Result<()> {
        match self.step {
            CreateStep::Form => {
                self.form = BountyForm::default();
                Ok(())
            }
            CreateStep::Success { .. } => self.reset(),
            CreateStep::Approving | CreateStep::Posting => Err(ClientError::Busy),
        }
    }

    fn reset(&mut self) -> Result<()> {
        self.transition(CreateStep::Form)?;
        self.form = BountyForm::default();
        Ok(())
    }

    fn transition(&mut self, next: CreateStep) -> Result<()> {
        let from = self.step.phase();
        let to = next.phase();
        if !from.can_transition_to(to) {
            return Err(ClientError::IllegalTransition {
                from: from.name(),
                to: to.name(),
            });
        }
        debug!(from = from.name(), to = to.name(), "Create bounty step");
        self.step = next;
        self.trail.push(to);
        if let Some(observer) = self.observer.as_mut() {
            observer(to);
        }
        Ok(())
    }
}
