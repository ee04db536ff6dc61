#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Coin balance with passive income, capped interest and spend tracking.

use firewall_defence_core::{
    config::{
        INTEREST_INTERVAL, INTEREST_RATE, MAX_INTEREST_BASE, PASSIVE_INCOME,
        PASSIVE_INCOME_INTERVAL, PASSIVE_INCOME_LIMIT, STARTING_COINS, WAVE_BONUS,
    },
    EconomyLedger, Timestamp,
};

/// Coins credited by a single economy tick.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Payout {
    /// Coins from passive income.
    pub passive: u32,
    /// Coins from interest.
    pub interest: u32,
}

/// Player purse and its timers.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Economy {
    ledger: EconomyLedger,
    last_passive_at: Option<Timestamp>,
    last_interest_at: Option<Timestamp>,
}

impl Default for Economy {
    fn default() -> Self {
        Self::with_coins(STARTING_COINS)
    }
}

impl Economy {
    /// Creates an economy holding the starting balance.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an economy holding `coins`.
    #[must_use]
    pub fn with_coins(coins: u32) -> Self {
        Self {
            ledger: EconomyLedger {
                coins,
                ..EconomyLedger::default()
            },
            last_passive_at: None,
            last_interest_at: None,
        }
    }

    /// Coins currently available.
    #[must_use]
    pub fn coins(&self) -> u32 {
        self.ledger.coins
    }

    /// Cumulative figures for the session.
    #[must_use]
    pub fn ledger(&self) -> EconomyLedger {
        self.ledger
    }

    /// Deducts `amount` when the balance covers it.
    ///
    /// Returns `false` and leaves the balance untouched otherwise.
    pub fn try_spend(&mut self, amount: u32) -> bool {
        let Some(remaining) = self.ledger.coins.checked_sub(amount) else {
            return false;
        };
        self.ledger.coins = remaining;
        self.ledger.cumulative_spent += u64::from(amount);
        true
    }

    /// Adds `amount` coins to the balance.
    pub fn credit(&mut self, amount: u32) {
        self.ledger.coins = self.ledger.coins.saturating_add(amount);
        self.ledger.cumulative_earned += u64::from(amount);
    }

    /// Credits the wave-completion bonus and returns its size.
    pub fn grant_wave_bonus(&mut self) -> u32 {
        self.credit(WAVE_BONUS);
        WAVE_BONUS
    }

    /// Runs passive income and interest for the tick at `now`.
    ///
    /// Both timers anchor on the first tick, so nothing is paid out until a
    /// full interval has elapsed after it.
    pub fn tick(&mut self, now: Timestamp) -> Payout {
        let mut payout = Payout::default();

        match self.last_passive_at {
            None => self.last_passive_at = Some(now),
            Some(last) if now.is_due(Some(last), PASSIVE_INCOME_INTERVAL) => {
                self.last_passive_at = Some(now);
                if self.ledger.coins <= PASSIVE_INCOME_LIMIT {
                    self.credit(PASSIVE_INCOME);
                    payout.passive = PASSIVE_INCOME;
                }
            }
            Some(_) => {}
        }

        match self.last_interest_at {
            None => self.last_interest_at = Some(now),
            Some(last) if now.is_due(Some(last), INTEREST_INTERVAL) => {
                self.last_interest_at = Some(now);
                let interest = interest_on(self.ledger.coins);
                if interest > 0 {
                    self.credit(interest);
                    self.ledger.cumulative_interest += u64::from(interest);
                    payout.interest = interest;
                }
            }
            Some(_) => {}
        }

        payout
    }
}

/// Interest owed on `coins`, computed on a balance capped at the interest base.
#[must_use]
pub fn interest_on(coins: u32) -> u32 {
    let base = f64::from(coins.min(MAX_INTEREST_BASE));
    (base * INTEREST_RATE).floor() as u32
}
