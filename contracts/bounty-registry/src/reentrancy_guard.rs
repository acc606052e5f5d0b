//! Registry-wide lock around the code that moves reward tokens.
//!
//! Posting pulls the reward in with `transfer_from` and a resolving vote pays
//! it out with `transfer`. Both run inside [`locked`], so a token contract
//! that calls back into the registry mid-transfer finds the lock held.
//!
//! Soroban rolls back every storage write of a call that panics or returns
//! `Err`, so an aborted body never leaves the lock set.

use super::DataKey;
use soroban_sdk::Env;

/// Run `body` while holding the lock.
///
/// # Panics
/// Panics with `"Reentrancy detected"` if the lock is already held.
pub fn locked<T>(env: &Env, body: impl FnOnce() -> T) -> T {
    if is_held(env) {
        panic!("Reentrancy detected");
    }
    env.storage().instance().set(&DataKey::ReentrancyGuard, &true);
    let out = body();
    env.storage().instance().remove(&DataKey::ReentrancyGuard);
    out
}

pub fn is_held(env: &Env) -> bool {
    env.storage().instance().has(&DataKey::ReentrancyGuard)
}
