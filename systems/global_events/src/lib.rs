#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Priority-based scheduler for timed global events.
//!
//! The scheduler keeps at most one pending entry per event kind. Entries are
//! created and activated only when a new wave begins; expiry is checked on
//! every tick. One-shot effects of an activation (wiping towers) are left to
//! the caller, which receives the list of kinds that activated.

use firewall_defence_core::{
    config::{EVENT_DEFERRAL_WAVES, FLOOD_COUNT_MULTIPLIER, FLOOD_HEALTH_MULTIPLIER},
    ActiveGlobalEvent, Event, EventMultipliers, GlobalEventKind, ScheduledGlobalEvent, Timestamp,
};
use rand::Rng;

/// Active and pending global events together with activation bookkeeping.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct GlobalEventScheduler {
    active: Vec<ActiveGlobalEvent>,
    scheduled: Vec<ScheduledGlobalEvent>,
    last_activation_wave: u32,
}

impl GlobalEventScheduler {
    /// Creates a scheduler with no active or pending events.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Events currently active, in activation order.
    #[must_use]
    pub fn active(&self) -> &[ActiveGlobalEvent] {
        &self.active
    }

    /// Pending entries sorted ascending by target wave.
    #[must_use]
    pub fn scheduled(&self) -> &[ScheduledGlobalEvent] {
        &self.scheduled
    }

    /// Wave of the most recent successful activation, zero when none happened.
    #[must_use]
    pub fn last_activation_wave(&self) -> u32 {
        self.last_activation_wave
    }

    /// Reports whether an event of `kind` applies at `now`.
    #[must_use]
    pub fn is_live(&self, kind: GlobalEventKind, now: Timestamp) -> bool {
        self.active
            .iter()
            .any(|event| event.kind == kind && event.is_live(now))
    }

    /// Folds every live event into the multipliers consumed by the spawner.
    #[must_use]
    pub fn multipliers(&self, now: Timestamp) -> EventMultipliers {
        let mut multipliers = EventMultipliers::NEUTRAL;
        if self.is_live(GlobalEventKind::Flood, now) {
            multipliers.count *= FLOOD_COUNT_MULTIPLIER;
            multipliers.health *= FLOOD_HEALTH_MULTIPLIER;
        }
        multipliers
    }

    /// Replaces the pending entry for `kind` with one targeting `wave`.
    pub fn pin(&mut self, kind: GlobalEventKind, wave: u32) {
        self.scheduled.retain(|entry| entry.kind != kind);
        self.scheduled.push(ScheduledGlobalEvent { kind, wave });
        self.sort_schedule();
    }

    /// Removes every active event that ran its full duration at `now`.
    pub fn expire(&mut self, now: Timestamp, out: &mut Vec<Event>) {
        self.active.retain(|event| {
            if event.has_expired(now) {
                log::debug!("global event {} expired", event.kind);
                out.push(Event::GlobalEventExpired { kind: event.kind });
                false
            } else {
                true
            }
        });
    }

    /// Runs scheduling and activation for the wave that just began.
    ///
    /// Returns the kinds that activated, in activation order.
    pub fn on_wave<R: Rng + ?Sized>(
        &mut self,
        wave: u32,
        now: Timestamp,
        rng: &mut R,
        out: &mut Vec<Event>,
    ) -> Vec<GlobalEventKind> {
        self.schedule(wave, rng);
        self.activate(wave, now, out)
    }

    fn schedule<R: Rng + ?Sized>(&mut self, wave: u32, rng: &mut R) {
        for kind in GlobalEventKind::ALL {
            if self.scheduled.iter().any(|entry| entry.kind == kind) {
                continue;
            }

            let definition = kind.definition();
            let last_wave = self.last_wave_for(kind);
            if wave.saturating_sub(last_wave) < definition.min_wave_interval {
                continue;
            }

            let target = wave
                + rng.gen_range(definition.min_wave_interval..=definition.max_wave_interval);
            log::debug!("global event {kind} scheduled for wave {target}");
            self.scheduled.push(ScheduledGlobalEvent { kind, wave: target });
        }
        self.sort_schedule();
    }

    fn last_wave_for(&self, kind: GlobalEventKind) -> u32 {
        let active = self
            .active
            .iter()
            .filter(|event| event.kind == kind)
            .map(|event| event.start_wave)
            .max()
            .unwrap_or(0);
        let scheduled = self
            .scheduled
            .iter()
            .filter(|entry| entry.kind == kind)
            .map(|entry| entry.wave)
            .max()
            .unwrap_or(0);
        active.max(scheduled).max(self.last_activation_wave)
    }

    fn activate(&mut self, wave: u32, now: Timestamp, out: &mut Vec<Event>) -> Vec<GlobalEventKind> {
        let mut candidates: Vec<GlobalEventKind> = self
            .scheduled
            .iter()
            .filter(|entry| entry.wave == wave)
            .map(|entry| entry.kind)
            .collect();
        candidates.sort_by_key(|kind| std::cmp::Reverse(kind.definition().priority));

        let mut activated = Vec::new();
        for kind in candidates {
            if self.is_blocked(kind) {
                let retry = wave + EVENT_DEFERRAL_WAVES;
                if let Some(entry) = self
                    .scheduled
                    .iter_mut()
                    .find(|entry| entry.kind == kind && entry.wave == wave)
                {
                    entry.wave = retry;
                }
                log::info!("global event {kind} deferred to wave {retry}");
                out.push(Event::GlobalEventDeferred { kind, wave: retry });
                continue;
            }

            self.active.push(ActiveGlobalEvent {
                kind,
                started_at: now,
                start_wave: wave,
                duration: kind.definition().duration,
            });
            self.last_activation_wave = wave;
            self.prune_conflicts(kind, out);

            log::info!("global event {kind} activated on wave {wave}");
            out.push(Event::GlobalEventActivated { kind, wave });
            activated.push(kind);
        }

        self.scheduled
            .retain(|entry| !activated.contains(&entry.kind));
        self.sort_schedule();
        activated
    }

    /// An active event blocks a candidate when the two cannot coexist and the
    /// active one has at least the candidate's priority.
    fn is_blocked(&self, candidate: GlobalEventKind) -> bool {
        let priority = candidate.definition().priority;
        self.active.iter().any(|event| {
            !can_coexist(candidate, event.kind) && event.kind.definition().priority >= priority
        })
    }

    fn prune_conflicts(&mut self, activated: GlobalEventKind, out: &mut Vec<Event>) {
        self.active.retain(|event| {
            if event.kind == activated || can_coexist(activated, event.kind) {
                return true;
            }
            log::info!("global event {} pruned by {activated}", event.kind);
            out.push(Event::GlobalEventPruned { kind: event.kind });
            false
        });
    }

    fn sort_schedule(&mut self) {
        self.scheduled.sort_by_key(|entry| entry.wave);
    }
}

/// Symmetric coexistence test between two kinds.
#[must_use]
pub fn can_coexist(a: GlobalEventKind, b: GlobalEventKind) -> bool {
    a.definition().allows(b) || b.definition().allows(a)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_kinds_are_mutually_exclusive() {
        assert!(!can_coexist(GlobalEventKind::DiskWipe, GlobalEventKind::Flood));
        assert!(!can_coexist(GlobalEventKind::Flood, GlobalEventKind::Flood));
    }

    #[test]
    fn pin_keeps_one_entry_per_kind() {
        let mut scheduler = GlobalEventScheduler::new();
        scheduler.pin(GlobalEventKind::Flood, 6);
        scheduler.pin(GlobalEventKind::DiskWipe, 4);
        scheduler.pin(GlobalEventKind::Flood, 3);

        let waves: Vec<(GlobalEventKind, u32)> = scheduler
            .scheduled()
            .iter()
            .map(|entry| (entry.kind, entry.wave))
            .collect();
        assert_eq!(
            waves,
            vec![(GlobalEventKind::Flood, 3), (GlobalEventKind::DiskWipe, 4)]
        );
    }

    #[test]
    fn last_wave_prefers_latest_source() {
        let mut scheduler = GlobalEventScheduler::new();
        scheduler.last_activation_wave = 4;
        scheduler.active.push(ActiveGlobalEvent {
            kind: GlobalEventKind::Flood,
            started_at: Timestamp::ZERO,
            start_wave: 7,
            duration: GlobalEventKind::Flood.definition().duration,
        });
        assert_eq!(scheduler.last_wave_for(GlobalEventKind::Flood), 7);
        assert_eq!(scheduler.last_wave_for(GlobalEventKind::DiskWipe), 4);
    }
}
