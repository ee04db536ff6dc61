use firewall_defence_core::{config::STARTING_COINS, Timestamp};
use firewall_defence_system_economy::{interest_on, Economy, Payout};
use proptest::prelude::*;

fn at(millis: u64) -> Timestamp {
    Timestamp::from_millis(millis)
}

#[test]
fn session_starts_with_configured_balance() {
    let economy = Economy::new();
    assert_eq!(economy.coins(), STARTING_COINS);
    assert_eq!(economy.ledger().cumulative_earned, 0);
}

#[test]
fn interest_on_a_full_base_pays_twenty_after_ten_seconds() {
    let mut economy = Economy::with_coins(1_000);
    let _ = economy.tick(at(0));

    let payout = economy.tick(at(10_000));

    assert_eq!(payout.interest, 20);
    assert_eq!(economy.ledger().cumulative_interest, 20);
}

#[test]
fn passive_income_pays_once_per_interval() {
    let mut economy = Economy::with_coins(100);
    let _ = economy.tick(at(0));

    let mut total = 0;
    for step in 1..=40 {
        total += economy.tick(at(step * 50)).passive;
    }

    assert_eq!(total, 10, "two seconds of ticks pay two intervals");
    assert_eq!(economy.coins(), 110);
}

#[test]
fn passive_income_suspends_above_limit_until_spending() {
    let mut economy = Economy::with_coins(1_000);
    let _ = economy.tick(at(0));

    assert_eq!(economy.tick(at(1_000)).passive, 5);
    assert_eq!(economy.coins(), 1_005);

    assert_eq!(economy.tick(at(2_000)).passive, 0);
    assert_eq!(economy.tick(at(3_000)).passive, 0);
    assert_eq!(economy.coins(), 1_005);

    assert!(economy.try_spend(5));
    assert_eq!(economy.tick(at(4_000)).passive, 5);
}

#[test]
fn passive_income_stops_at_one_thousand_and_one() {
    let mut economy = Economy::with_coins(1_001);
    let _ = economy.tick(at(0));
    assert_eq!(economy.tick(at(1_000)), Payout { passive: 0, interest: 0 });
}

#[test]
fn wave_bonus_counts_as_earnings() {
    let mut economy = Economy::new();
    assert_eq!(economy.grant_wave_bonus(), 50);
    assert_eq!(economy.coins(), STARTING_COINS + 50);
    assert_eq!(economy.ledger().cumulative_earned, 50);
}

#[test]
fn spending_is_tracked() {
    let mut economy = Economy::new();
    assert!(economy.try_spend(100));
    assert!(economy.try_spend(50));
    assert!(!economy.try_spend(1));
    assert_eq!(economy.coins(), 0);
    assert_eq!(economy.ledger().cumulative_spent, 150);
}

proptest! {
    #[test]
    fn ledger_balances_after_any_sequence(
        start in 0u32..2_000,
        ops in prop::collection::vec((0u8..3, 0u32..400), 0..64),
    ) {
        let mut economy = Economy::with_coins(start);
        let mut now = 0u64;
        for (op, amount) in ops {
            match op {
                0 => {
                    let before = economy.coins();
                    let spent = economy.try_spend(amount);
                    prop_assert_eq!(spent, before >= amount);
                }
                1 => economy.credit(amount),
                _ => {
                    now += u64::from(amount) * 50;
                    let _ = economy.tick(Timestamp::from_millis(now));
                }
            }
        }

        let ledger = economy.ledger();
        prop_assert_eq!(
            u64::from(start) + ledger.cumulative_earned - ledger.cumulative_spent,
            u64::from(ledger.coins)
        );
        prop_assert!(ledger.cumulative_interest <= ledger.cumulative_earned);
    }

    #[test]
    fn interest_never_exceeds_capped_rate(coins in 0u32..100_000) {
        prop_assert!(interest_on(coins) <= 20);
        prop_assert!(interest_on(coins) <= coins / 50);
    }
}
