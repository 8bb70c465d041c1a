//! State shared between the sampler and the alerter.
//!
//! Both flags live in one atomic byte. The sampler is the only writer of the
//! alert bit; the mute bit is set by the alerter (or the edge watcher) and
//! cleared by the sampler. Leaving the alert band clears alert and mute in a
//! single read-modify-write, so the alerter can never see "no alert, still
//! muted" carried over from a previous alert.
//!
//! Writers use `Release`, readers `Acquire`. A published band is visible to
//! the alerter at its next snapshot, i.e. within one alerter iteration.

use portable_atomic::{AtomicU32, AtomicU8, Ordering};

use crate::thresholds::Band;

const ALERT: u8 = 1 << 0;
const MUTE: u8 = 1 << 1;

/// A consistent view of both flags.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Snapshot {
    pub alert: bool,
    pub muted: bool,
}

impl Snapshot {
    const fn from_bits(bits: u8) -> Self {
        Self {
            alert: bits & ALERT != 0,
            muted: bits & MUTE != 0,
        }
    }

    pub const fn mode(self) -> AlertMode {
        match (self.alert, self.muted) {
            (true, false) => AlertMode::Siren,
            (true, true) => AlertMode::Silent,
            (false, _) => AlertMode::Idle,
        }
    }
}

/// What the alerter renders for a given snapshot.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum AlertMode {
    /// Blink and sound the buzzer.
    Siren,
    /// Blink, buzzer held off.
    Silent,
    /// No alert: buzzer off, alerter heartbeat only.
    Idle,
}

/// Iteration counters. Diagnostic only, wrap on overflow.
#[derive(Debug, Default)]
pub struct LoopCounters {
    sampler: AtomicU32,
    alerter: AtomicU32,
    alert: AtomicU32,
}

impl LoopCounters {
    pub const fn new() -> Self {
        Self {
            sampler: AtomicU32::new(0),
            alerter: AtomicU32::new(0),
            alert: AtomicU32::new(0),
        }
    }

    /// Returns the new count.
    pub fn tick_sampler(&self) -> u32 {
        self.sampler.fetch_add(1, Ordering::Relaxed).wrapping_add(1)
    }

    pub fn tick_alerter(&self) -> u32 {
        self.alerter.fetch_add(1, Ordering::Relaxed).wrapping_add(1)
    }

    pub fn tick_alert(&self) -> u32 {
        self.alert.fetch_add(1, Ordering::Relaxed).wrapping_add(1)
    }

    pub fn sampler_loops(&self) -> u32 {
        self.sampler.load(Ordering::Relaxed)
    }

    pub fn alerter_loops(&self) -> u32 {
        self.alerter.load(Ordering::Relaxed)
    }

    /// Alerter iterations spent with the alert active.
    pub fn alert_loops(&self) -> u32 {
        self.alert.load(Ordering::Relaxed)
    }
}

#[derive(Debug, Default)]
pub struct SharedState {
    flags: AtomicU8,
    counters: LoopCounters,
}

impl SharedState {
    pub const fn new() -> Self {
        Self {
            flags: AtomicU8::new(0),
            counters: LoopCounters::new(),
        }
    }

    /// Record the band of the latest reading. Sampler only.
    ///
    /// Returns the flags as they were before the update.
    pub fn publish(&self, band: Band) -> Snapshot {
        let prev = if band.is_alert() {
            self.flags.fetch_or(ALERT, Ordering::Release)
        } else {
            self.flags.fetch_and(!(ALERT | MUTE), Ordering::Release)
        };
        Snapshot::from_bits(prev)
    }

    /// Silence the buzzer. Returns `true` if this call set the flag.
    pub fn request_mute(&self) -> bool {
        self.flags.fetch_or(MUTE, Ordering::AcqRel) & MUTE == 0
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot::from_bits(self.flags.load(Ordering::Acquire))
    }

    pub fn counters(&self) -> &LoopCounters {
        &self.counters
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_idle() {
        let state = SharedState::new();
        assert_eq!(state.snapshot(), Snapshot::default());
        assert_eq!(state.snapshot().mode(), AlertMode::Idle);
    }

    #[test]
    fn alert_band_sets_alert_only() {
        let state = SharedState::new();
        let prev = state.publish(Band::Alert);
        assert!(!prev.alert);
        assert_eq!(
            state.snapshot(),
            Snapshot {
                alert: true,
                muted: false
            }
        );
    }

    #[test]
    fn leaving_alert_clears_mute() {
        for band in [Band::Normal, Band::Cold] {
            let state = SharedState::new();
            state.publish(Band::Alert);
            assert!(state.request_mute());
            assert_eq!(state.snapshot().mode(), AlertMode::Silent);

            let prev = state.publish(band);
            assert!(prev.alert && prev.muted);
            assert_eq!(state.snapshot(), Snapshot::default());
        }
    }

    #[test]
    fn mute_does_not_touch_alert() {
        let state = SharedState::new();
        state.request_mute();
        assert!(!state.snapshot().alert);

        state.publish(Band::Alert);
        state.request_mute();
        assert!(state.snapshot().alert);
    }

    #[test]
    fn mute_reports_first_activation_only() {
        let state = SharedState::new();
        state.publish(Band::Alert);
        assert!(state.request_mute());
        assert!(!state.request_mute());
    }

    #[test]
    fn repeated_alert_keeps_mute() {
        let state = SharedState::new();
        state.publish(Band::Alert);
        state.request_mute();
        let before = state.snapshot();
        state.publish(Band::Alert);
        state.publish(Band::Alert);
        assert_eq!(state.snapshot(), before);
    }

    #[test]
    fn repeated_normal_is_stable() {
        let state = SharedState::new();
        state.publish(Band::Normal);
        let once = state.snapshot();
        state.publish(Band::Normal);
        assert_eq!(state.snapshot(), once);
        assert_eq!(once, Snapshot::default());
    }

    #[test]
    fn counters_tick_independently() {
        let state = SharedState::new();
        let c = state.counters();
        assert_eq!(c.tick_sampler(), 1);
        assert_eq!(c.tick_alerter(), 1);
        assert_eq!(c.tick_alerter(), 2);
        assert_eq!(c.tick_alert(), 1);
        assert_eq!(
            (c.sampler_loops(), c.alerter_loops(), c.alert_loops()),
            (1, 2, 1)
        );
    }
}
