//! Integration tests for the full game flow.
//!
//! These tests play complete games against the public API, from
//! registration to settlement or timeout recovery.

use rps_escrow_core::{
    config::ONE_DAY, AccountId, Call, CommitmentHash, Escrow, EscrowConfig, EscrowError,
    EscrowEvent, InMemoryLedger, Ledger, Move, Outcome, RecordStatus, Secret,
};

const GENESIS: u64 = 1_700_000_000;
const FUNDS: u64 = 10_000;

struct Table {
    escrow: Escrow<InMemoryLedger>,
    alice: AccountId,
    bob: AccountId,
}

fn table() -> Table {
    let mut ledger = InMemoryLedger::new(GENESIS);
    let alice = ledger.open_account(FUNDS);
    let bob = ledger.open_account(FUNDS);
    Table {
        escrow: Escrow::new(ledger, EscrowConfig::default()),
        alice,
        bob,
    }
}

fn supply(escrow: &Escrow<InMemoryLedger>) -> u128 {
    escrow.ledger().total_supply()
}

/// Play one full game and return the outcome recorded on the game key
fn play(t: &mut Table, alice_move: Move, bob_move: Move, stake: u64) -> Outcome {
    let alice_secret = Secret::random();
    let bob_secret = Secret::random();
    let game_key = Escrow::<InMemoryLedger>::hash_move(alice_move, &alice_secret);
    let bob_key = Escrow::<InMemoryLedger>::hash_move(bob_move, &bob_secret);

    // Phase 1: Alice registers, Bob matches
    t.escrow
        .register_challenge(Call::paying(t.alice, stake), game_key, 2 * ONE_DAY)
        .unwrap();
    t.escrow
        .accept_challenge(Call::paying(t.bob, stake), game_key, bob_key)
        .unwrap();
    assert_eq!(t.escrow.balance(), 2 * stake);

    // Phase 2: Both reveal
    let first = t
        .escrow
        .deposit_reveal(Call::from(t.bob), game_key, bob_move, bob_secret)
        .unwrap();
    assert!(first.rewards.is_none());
    let second = t
        .escrow
        .deposit_reveal(Call::from(t.alice), game_key, alice_move, alice_secret)
        .unwrap();
    let rewards = second.rewards.expect("second reveal resolves the game");
    assert_eq!(rewards.proposer_reward + rewards.counterparty_reward, 2 * stake);

    // Phase 3: Whoever is owed something claims it
    for player in [t.alice, t.bob] {
        match t.escrow.claim(Call::from(player), game_key) {
            Ok(claimed) => assert!(claimed.amount > 0),
            Err(EscrowError::ZeroCreditedBalance) => {}
            Err(err) => panic!("unexpected claim error: {}", err),
        }
    }

    t.escrow.record(&game_key).unwrap().outcome.unwrap()
}

#[test]
fn test_full_game_counterparty_wins() {
    let mut t = table();

    let outcome = play(&mut t, Move::Rock, Move::Paper, 1234);

    assert_eq!(outcome, Outcome::CounterpartyWins);
    assert_eq!(t.escrow.ledger().balance(&t.alice), FUNDS - 1234);
    assert_eq!(t.escrow.ledger().balance(&t.bob), FUNDS + 1234);
    assert_eq!(t.escrow.balance(), 0);
    assert_eq!(supply(&t.escrow), 2 * FUNDS as u128);
}

#[test]
fn test_full_game_proposer_wins() {
    let mut t = table();

    let outcome = play(&mut t, Move::Scissors, Move::Paper, 500);

    assert_eq!(outcome, Outcome::ProposerWins);
    assert_eq!(t.escrow.ledger().balance(&t.alice), FUNDS + 500);
    assert_eq!(t.escrow.ledger().balance(&t.bob), FUNDS - 500);
}

#[test]
fn test_full_game_draw() {
    let mut t = table();

    let outcome = play(&mut t, Move::Paper, Move::Paper, 700);

    assert_eq!(outcome, Outcome::Draw);
    assert_eq!(t.escrow.ledger().balance(&t.alice), FUNDS);
    assert_eq!(t.escrow.ledger().balance(&t.bob), FUNDS);
}

#[test]
fn test_every_move_pair_conserves_value() {
    let mut t = table();

    for a in Move::ALL {
        for b in Move::ALL {
            play(&mut t, a, b, 100);
            assert_eq!(t.escrow.balance(), 0);
            assert_eq!(t.escrow.escrowed_total(), 0);
        }
    }

    assert_eq!(
        t.escrow.ledger().balance(&t.alice) + t.escrow.ledger().balance(&t.bob),
        2 * FUNDS
    );
}

#[test]
fn test_unanswered_challenge_is_recovered() {
    let mut t = table();
    let secret = Secret::random();
    let game_key = CommitmentHash::new(Move::Rock, &secret);

    t.escrow
        .register_challenge(Call::paying(t.alice, 1001), game_key, ONE_DAY)
        .unwrap();

    // Nobody shows up; Bob cannot take Alice's stake and Alice has to wait
    t.escrow.ledger_mut().advance_time(ONE_DAY - 1);
    assert!(t
        .escrow
        .reclaim_timeout(Call::from(t.alice), game_key)
        .is_err());

    t.escrow.ledger_mut().advance_time(1);
    assert!(matches!(
        t.escrow.reclaim_timeout(Call::from(t.bob), game_key),
        Err(EscrowError::UnauthorizedParty(_))
    ));

    let reclaimed = t
        .escrow
        .reclaim_timeout(Call::from(t.alice), game_key)
        .unwrap();
    assert_eq!(reclaimed.amount, 1001);
    assert_eq!(t.escrow.ledger().balance(&t.alice), FUNDS);
    assert_eq!(
        t.escrow.record(&game_key).unwrap().status,
        RecordStatus::Reclaimed
    );

    let info = t.escrow.challenge(&game_key);
    assert_eq!(info.proposer, Some(t.alice));
    assert_eq!(info.stake, 0);
}

#[test]
fn test_silent_counterparty_cannot_strand_proposer() {
    let mut t = table();
    let alice_secret = Secret::random();
    let bob_secret = Secret::random();
    let game_key = CommitmentHash::new(Move::Paper, &alice_secret);
    let bob_key = CommitmentHash::new(Move::Rock, &bob_secret);

    t.escrow
        .register_challenge(Call::paying(t.alice, 300), game_key, ONE_DAY)
        .unwrap();
    t.escrow
        .accept_challenge(Call::paying(t.bob, 300), game_key, bob_key)
        .unwrap();
    t.escrow
        .deposit_reveal(Call::from(t.alice), game_key, Move::Paper, alice_secret)
        .unwrap();

    // Bob sees he lost and stays silent
    let deadline = t.escrow.challenge(&game_key).deadline;
    t.escrow
        .ledger_mut()
        .advance_time(deadline - GENESIS);

    t.escrow
        .reclaim_timeout(Call::from(t.alice), game_key)
        .unwrap();
    t.escrow.reclaim_timeout(Call::from(t.bob), bob_key).unwrap();

    assert_eq!(t.escrow.ledger().balance(&t.alice), FUNDS);
    assert_eq!(t.escrow.ledger().balance(&t.bob), FUNDS);
    assert_eq!(t.escrow.balance(), 0);
}

#[test]
fn test_event_log_serializes() {
    let mut t = table();
    play(&mut t, Move::Rock, Move::Scissors, 10);

    let json = serde_json::to_value(t.escrow.events()).unwrap();
    let events = json.as_array().unwrap();
    assert_eq!(events.first().unwrap()["event"], "challenge_created");
    assert_eq!(events.last().unwrap()["event"], "claimed");
    assert!(matches!(
        t.escrow.events().last(),
        Some(EscrowEvent::Claimed(c)) if c.player == t.alice && c.amount == 20
    ));
}
