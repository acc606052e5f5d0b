use soroban_sdk::{contracttype, symbol_short, Address, Env, String};

pub const EVENT_VERSION_V1: u32 = 1;

#[contracttype]
#[derive(Clone, Debug)]
pub struct RegistryInitialized {
    pub version: u32,
    pub admin: Address,
    pub reward_token: Address,
    pub quorum: u64,
    pub timestamp: u64,
}

pub fn emit_registry_initialized(env: &Env, event: RegistryInitialized) {
    let topics = (symbol_short!("init"),);
    env.events().publish(topics, event.clone());
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct BountyPosted {
    pub version: u32,
    pub bounty_id: u64,
    pub poster: Address,
    pub title: String,
    pub reward: i128,
}

pub fn emit_bounty_posted(env: &Env, event: BountyPosted) {
    let topics = (symbol_short!("b_post"), event.bounty_id);
    env.events().publish(topics, event.clone());
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct FixSubmitted {
    pub version: u32,
    pub bounty_id: u64,
    pub submitter: Address,
    pub pr_link: String,
}

pub fn emit_fix_submitted(env: &Env, event: FixSubmitted) {
    let topics = (symbol_short!("fix_sub"), event.bounty_id);
    env.events().publish(topics, event.clone());
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Voted {
    pub version: u32,
    pub bounty_id: u64,
    pub voter: Address,
    pub approve: bool,
}

pub fn emit_voted(env: &Env, event: Voted) {
    let topics = (symbol_short!("voted"), event.bounty_id);
    env.events().publish(topics, event.clone());
}

/// Event emitted when a fix is accepted and the reward leaves escrow
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct BountyResolved {
    pub version: u32,
    pub bounty_id: u64,
    pub winner: Address,
    pub reward: i128,
    pub timestamp: u64,
}

pub fn emit_bounty_resolved(env: &Env, event: BountyResolved) {
    let topics = (symbol_short!("b_res"), event.bounty_id);
    env.events().publish(topics, event.clone());
}
