use crate::Bounty;
use soroban_sdk::{symbol_short, Env, Symbol};

const INV_CALLS: Symbol = symbol_short!("InvCalls");

/// First invariant `bounty` breaks, if any.
fn violation(bounty: &Bounty) -> Option<&'static str> {
    if bounty.reward <= 0 {
        return Some("reward must be positive");
    }
    if (bounty.fix_pr.len() > 0) != bounty.submitter.is_some() {
        return Some("fix link and submitter must be set together");
    }
    if bounty.resolved && bounty.submitter.is_none() {
        return Some("resolved bounty must have a fix");
    }
    if bounty.submitter.is_none() && (bounty.yes_votes > 0 || bounty.no_votes > 0) {
        return Some("votes recorded without a fix");
    }
    None
}

/// Checked after every mutation, before the record is stored.
pub(crate) fn assert_bounty(env: &Env, bounty: &Bounty) {
    let calls: u32 = env.storage().instance().get(&INV_CALLS).unwrap_or(0);
    env.storage().instance().set(&INV_CALLS, &(calls + 1));

    if let Some(reason) = violation(bounty) {
        panic!("Invariant violated: {}", reason);
    }
}

pub(crate) fn verify_bounty_invariants(bounty: &Bounty) -> bool {
    violation(bounty).is_none()
}

#[cfg(test)]
pub(crate) fn call_count_for_test(env: &Env) -> u32 {
    env.storage().instance().get(&INV_CALLS).unwrap_or(0)
}
