use crate::amount::AmountError;
use crate::chain::{ChainError, ContractId};
use crate::config::{ConfigError, Network};
use thiserror::Error;

pub type Result<T, E = ClientError> = std::result::Result<T, E>;

/// Errors surfaced to the user by the orchestration layer.
///
/// `Display` output is short enough to show as a notification; the
/// underlying chain error, when there is one, is available via `source()`.
#[derive(Error, Debug)]
pub enum ClientError {
    #[error("connect a wallet first")]
    NotConnected,

    #[error("unsupported network \"{passphrase}\": switch to Stellar Testnet or Stellar Mainnet")]
    UnsupportedNetwork { passphrase: String },

    #[error("bounty registry is not configured for {network}")]
    RegistryNotConfigured { network: Network },

    #[error("reward token is not configured for {network}; set {env_var}")]
    TokenNotConfigured {
        network: Network,
        env_var: &'static str,
    },

    #[error("reward token contract not found at {address} on {network}")]
    TokenNotDeployed { network: Network, address: ContractId },

    #[error("reward token at {address} on {network} is not a readable token contract: {reason}")]
    TokenUnreadable {
        network: Network,
        address: ContractId,
        reason: String,
    },

    #[error("invalid reward: {0}")]
    Amount(#[from] AmountError),

    #[error("{field} must not be empty")]
    EmptyField { field: &'static str },

    #[error("token approval failed: {0}")]
    Approval(#[source] ChainError),

    #[error("posting bounty failed: {0}")]
    Post(#[source] ChainError),

    #[error("submitting fix failed: {0}")]
    SubmitFix(#[source] ChainError),

    #[error("vote failed: {0}")]
    Vote(#[source] ChainError),

    #[error("bounty {0} already has a fix")]
    FixAlreadySubmitted(u64),

    #[error("bounty {0} is already resolved")]
    BountyResolved(u64),

    #[error("bounty {0} has no fix to vote on")]
    NoFixPending(u64),

    #[error("you cannot vote on your own fix")]
    SelfVote,

    #[error("you already voted on bounty {0}")]
    AlreadyVoted(u64),

    #[error("another transaction is still in progress")]
    Busy,

    #[error("illegal transition from {from} to {to}")]
    IllegalTransition {
        from: &'static str,
        to: &'static str,
    },

    #[error(transparent)]
    Config(#[from] ConfigError),
}
