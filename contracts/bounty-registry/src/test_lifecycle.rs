use super::*;
use crate::test::TestSetup;
use soroban_sdk::{
    testutils::{Address as _, Events},
    Address,
};

#[test]
fn test_full_bounty_lifecycle_pays_fix_submitter() {
    let setup = TestSetup::with_quorum(2);
    let reviewer_a = Address::generate(&setup.env);
    let reviewer_b = Address::generate(&setup.env);
    let reviewer_c = Address::generate(&setup.env);

    // 1. Post
    let id = setup.post("Memory leak in parser", 7_000);
    assert_eq!(setup.token.balance(&setup.registry.address), 7_000);

    // 2. Submit fix
    let pr = setup.text("https://github.com/acme/app/pull/42");
    setup.registry.submit_fix(&setup.fixer, &id, &pr);
    let bounty = setup.registry.get_bounty(&id);
    assert_eq!(bounty.fix_pr, pr);
    assert_eq!(bounty.submitter, Some(setup.fixer.clone()));
    assert!(!bounty.resolved);

    // 3. Votes: one rejection, then two approvals reach the quorum
    setup.registry.vote(&reviewer_a, &id, &false);
    setup.registry.vote(&reviewer_b, &id, &true);
    assert!(!setup.registry.get_bounty(&id).resolved);
    setup.registry.vote(&reviewer_c, &id, &true);

    let bounty = setup.registry.get_bounty(&id);
    assert!(bounty.resolved);
    assert_eq!((bounty.yes_votes, bounty.no_votes), (2, 1));
    assert_eq!(setup.token.balance(&setup.fixer), 7_000);
    assert_eq!(setup.token.balance(&setup.registry.address), 0);
    assert!(setup.registry.verify_state(&id));
}

#[test]
fn test_submit_fix_twice_fails() {
    let setup = TestSetup::new();
    let id = setup.post("bug", 100);
    setup
        .registry
        .submit_fix(&setup.fixer, &id, &setup.text("https://example.com/pr/1"));

    let other = Address::generate(&setup.env);
    let result =
        setup
            .registry
            .try_submit_fix(&other, &id, &setup.text("https://example.com/pr/2"));
    assert_eq!(result, Err(Ok(Error::FixAlreadySubmitted)));

    let bounty = setup.registry.get_bounty(&id);
    assert_eq!(bounty.fix_pr, setup.text("https://example.com/pr/1"));
    assert_eq!(bounty.submitter, Some(setup.fixer.clone()));
}

#[test]
fn test_submit_fix_rejects_empty_link() {
    let setup = TestSetup::new();
    let id = setup.post("bug", 100);
    let result = setup
        .registry
        .try_submit_fix(&setup.fixer, &id, &setup.text(""));
    assert_eq!(result, Err(Ok(Error::EmptyField)));
}

#[test]
fn test_submit_fix_unknown_bounty() {
    let setup = TestSetup::new();
    let result = setup
        .registry
        .try_submit_fix(&setup.fixer, &9, &setup.text("https://example.com/pr/1"));
    assert_eq!(result, Err(Ok(Error::BountyNotFound)));
}

#[test]
fn test_submit_fix_on_resolved_bounty_fails() {
    let setup = TestSetup::with_quorum(1);
    let id = setup.post("bug", 100);
    setup
        .registry
        .submit_fix(&setup.fixer, &id, &setup.text("https://example.com/pr/1"));
    setup
        .registry
        .vote(&Address::generate(&setup.env), &id, &true);
    assert!(setup.registry.get_bounty(&id).resolved);

    let result = setup
        .registry
        .try_submit_fix(&setup.fixer, &id, &setup.text("https://example.com/pr/2"));
    assert_eq!(result, Err(Ok(Error::BountyResolved)));
}

#[test]
fn test_lifecycle_emits_events() {
    let setup = TestSetup::with_quorum(1);
    let id = setup.post("events", 10);
    assert!(!setup.env.events().all().is_empty());

    setup
        .registry
        .submit_fix(&setup.fixer, &id, &setup.text("https://example.com/pr/1"));
    assert!(!setup.env.events().all().is_empty());

    setup
        .registry
        .vote(&Address::generate(&setup.env), &id, &true);
    // vote, payout transfer and resolution
    assert!(setup.env.events().all().len() >= 2);
}

#[test]
fn test_failed_fix_submission_emits_no_event() {
    let setup = TestSetup::new();
    let id = setup.post("bug", 100);
    let before = setup.env.events().all().len();
    let _ = setup
        .registry
        .try_submit_fix(&setup.fixer, &id, &setup.text(""));
    assert!(setup.env.events().all().len() <= before);
}

#[test]
fn test_bounties_are_independent() {
    let setup = TestSetup::with_quorum(1);
    let first = setup.post("first", 100);
    let second = setup.post("second", 200);

    setup
        .registry
        .submit_fix(&setup.fixer, &second, &setup.text("https://example.com/pr/7"));
    setup
        .registry
        .vote(&Address::generate(&setup.env), &second, &true);

    let first_bounty = setup.registry.get_bounty(&first);
    assert!(!first_bounty.resolved);
    assert_eq!(first_bounty.fix_pr.len(), 0);
    assert!(setup.registry.get_bounty(&second).resolved);
    assert_eq!(setup.token.balance(&setup.registry.address), 100);
    assert_eq!(setup.token.balance(&setup.fixer), 200);
}
