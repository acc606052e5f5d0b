//! Wallet session: the connected account and the network it is on.

use crate::chain::{AccountId, ContractId};
use crate::config::{ClientConfig, Deployment, Network};
use crate::error::{ClientError, Result};

/// Snapshot of the wallet connection. The embedding application replaces it
/// whenever the wallet reports an account or network change.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Session {
    pub account: Option<AccountId>,
    /// Network passphrase reported by the wallet.
    pub network: String,
}

impl Session {
    pub fn connected(account: impl Into<AccountId>, network: impl Into<String>) -> Self {
        Self {
            account: Some(account.into()),
            network: network.into(),
        }
    }

    pub fn disconnected() -> Self {
        Self::default()
    }

    pub fn is_connected(&self) -> bool {
        self.account.is_some()
    }

    pub fn require_account(&self) -> Result<&AccountId> {
        self.account.as_ref().ok_or(ClientError::NotConnected)
    }
}

/// Everything a write needs, checked before anything is submitted.
#[derive(Debug)]
pub(crate) struct WriteTarget<'a> {
    pub account: &'a AccountId,
    pub network: Network,
    pub deployment: &'a Deployment,
    pub registry: &'a ContractId,
}

pub(crate) fn write_target<'a>(
    session: &'a Session,
    config: &'a ClientConfig,
) -> Result<WriteTarget<'a>> {
    let account = session.require_account()?;
    let (network, deployment) = config.resolve(&session.network)?;
    let registry = deployment
        .registry()
        .ok_or(ClientError::RegistryNotConfigured { network })?;
    Ok(WriteTarget {
        account,
        network,
        deployment,
        registry,
    })
}
