//! Read side: enumerating bounties and keeping list/detail views fresh.
//!
//! The list and detail views poll independently. Each one refreshes when its
//! interval has elapsed or when the wallet moves to another network, so the
//! two are only eventually consistent with the registry and with each other.

use crate::bounty::BountyRecord;
use crate::chain::{ChainError, ContractId, RegistryReader};
use crate::config::ClientConfig;
use crate::session::Session;
use std::time::{Duration, Instant};
use tracing::{debug, warn};

/// Read every bounty, newest first.
///
/// A failed count aborts the batch; a failed read of a single index is
/// logged and that index is left out.
pub fn enumerate_bounties<R>(
    reader: &R,
    registry: &ContractId,
) -> Result<Vec<BountyRecord>, ChainError>
where
    R: RegistryReader + ?Sized,
{
    let count = reader.bounty_count(registry)?;
    let mut bounties = Vec::new();

    for id in (0..count).rev() {
        match reader.bounty(registry, id) {
            Ok(bounty) => bounties.push(bounty),
            Err(err) => warn!(bounty_id = id, error = %err, "Skipping unreadable bounty"),
        }
    }

    debug!(count, read = bounties.len(), "Enumerated bounties");
    Ok(bounties)
}

pub fn lookup_bounty<R>(
    reader: &R,
    registry: &ContractId,
    bounty_id: u64,
) -> Result<BountyRecord, ChainError>
where
    R: RegistryReader + ?Sized,
{
    reader.bounty(registry, bounty_id)
}

/// What a view has to show.
///
/// `Loaded` with an empty list is "connected, zero bounties", distinct from
/// `Loading` ("connected, nothing returned yet").
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FeedState<T> {
    Disconnected,
    Loading,
    Loaded(T),
}

impl<T> FeedState<T> {
    pub fn loaded(&self) -> Option<&T> {
        match self {
            FeedState::Loaded(value) => Some(value),
            _ => None,
        }
    }
}

/// Decides when a view should re-read the registry.
#[derive(Clone, Debug)]
pub struct PollSchedule {
    interval: Duration,
    last: Option<(Instant, String)>,
}

impl PollSchedule {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            last: None,
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Due if never run, if the network changed since the last run, or if
    /// the interval has elapsed.
    pub fn is_due(&self, now: Instant, network: &str) -> bool {
        match &self.last {
            None => true,
            Some((at, last_network)) => {
                last_network != network || now.saturating_duration_since(*at) >= self.interval
            }
        }
    }

    pub fn mark(&mut self, now: Instant, network: &str) {
        self.last = Some((now, network.to_owned()));
    }

    pub fn reset(&mut self) {
        self.last = None;
    }

    pub fn next_due(&self) -> Option<Instant> {
        self.last.as_ref().map(|(at, _)| *at + self.interval)
    }
}

/// Polling state shared by the list and detail views.
#[derive(Clone, Debug)]
struct Feed<T> {
    state: FeedState<T>,
    schedule: PollSchedule,
    network: Option<String>,
}

impl<T> Feed<T> {
    fn new(interval: Duration) -> Self {
        Self {
            state: FeedState::Disconnected,
            schedule: PollSchedule::new(interval),
            network: None,
        }
    }

    fn is_due(&self, session: &Session, now: Instant) -> bool {
        !session.is_connected() || self.schedule.is_due(now, &session.network)
    }

    fn refresh<F>(&mut self, session: &Session, config: &ClientConfig, now: Instant, load: F)
    where
        F: FnOnce(&ContractId) -> Result<T, ChainError>,
    {
        if !session.is_connected() {
            self.state = FeedState::Disconnected;
            self.network = None;
            self.schedule.reset();
            return;
        }

        if self.network.as_deref() != Some(session.network.as_str()) {
            debug!(network = %session.network, "Network changed, discarding stale data");
            self.state = FeedState::Loading;
            self.network = Some(session.network.clone());
        }
        self.schedule.mark(now, &session.network);

        let registry = match config.resolve(&session.network) {
            Ok((network, deployment)) => match deployment.registry() {
                Some(registry) => registry,
                None => {
                    warn!(%network, "No bounty registry configured");
                    return;
                }
            },
            Err(err) => {
                warn!(error = %err, "Cannot resolve bounty registry");
                return;
            }
        };

        match load(registry) {
            Ok(value) => self.state = FeedState::Loaded(value),
            Err(err) => warn!(registry = %registry, error = %err, "Registry read failed"),
        }
    }
}

/// All bounties, newest first.
#[derive(Clone, Debug)]
pub struct ListView {
    feed: Feed<Vec<BountyRecord>>,
}

impl ListView {
    pub fn new(config: &ClientConfig) -> Self {
        Self {
            feed: Feed::new(config.poll_interval()),
        }
    }

    pub fn state(&self) -> &FeedState<Vec<BountyRecord>> {
        &self.feed.state
    }

    pub fn schedule(&self) -> &PollSchedule {
        &self.feed.schedule
    }

    /// Refresh if due. Returns whether the registry was consulted.
    pub fn poll<R>(
        &mut self,
        session: &Session,
        config: &ClientConfig,
        reader: &R,
        now: Instant,
    ) -> bool
    where
        R: RegistryReader + ?Sized,
    {
        if !self.feed.is_due(session, now) {
            return false;
        }
        self.refresh(session, config, reader, now);
        session.is_connected()
    }

    /// Refresh unconditionally, e.g. after a confirmed write.
    pub fn refresh<R>(&mut self, session: &Session, config: &ClientConfig, reader: &R, now: Instant)
    where
        R: RegistryReader + ?Sized,
    {
        self.feed.refresh(session, config, now, |registry| {
            enumerate_bounties(reader, registry)
        });
    }
}

/// A single bounty addressed by id.
#[derive(Clone, Debug)]
pub struct DetailView {
    bounty_id: u64,
    feed: Feed<BountyRecord>,
}

impl DetailView {
    pub fn new(bounty_id: u64, config: &ClientConfig) -> Self {
        Self {
            bounty_id,
            feed: Feed::new(config.poll_interval()),
        }
    }

    pub fn bounty_id(&self) -> u64 {
        self.bounty_id
    }

    pub fn state(&self) -> &FeedState<BountyRecord> {
        &self.feed.state
    }

    pub fn bounty(&self) -> Option<&BountyRecord> {
        self.feed.state.loaded()
    }

    pub fn poll<R>(
        &mut self,
        session: &Session,
        config: &ClientConfig,
        reader: &R,
        now: Instant,
    ) -> bool
    where
        R: RegistryReader + ?Sized,
    {
        if !self.feed.is_due(session, now) {
            return false;
        }
        self.refresh(session, config, reader, now);
        session.is_connected()
    }

    pub fn refresh<R>(&mut self, session: &Session, config: &ClientConfig, reader: &R, now: Instant)
    where
        R: RegistryReader + ?Sized,
    {
        let bounty_id = self.bounty_id;
        self.feed.refresh(session, config, now, |registry| {
            lookup_bounty(reader, registry, bounty_id)
        });
    }
}
