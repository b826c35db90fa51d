#![forbid(unsafe_code)]

//! Haptic feedback capability.
//!
//! Haptics are best-effort: a host without a vibration motor uses
//! [`NoHaptics`], and widgets never observe whether a pulse was delivered.

use core::time::Duration;

/// Default pulse length used when a node joins a pattern.
pub const DEFAULT_PULSE: Duration = Duration::from_millis(50);

/// A platform vibration trigger.
pub trait Haptics {
    /// Request a single vibration pulse. Failures are swallowed.
    fn pulse(&mut self, duration: Duration);
}

/// Haptics for platforms without a vibration capability.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoHaptics;

impl Haptics for NoHaptics {
    fn pulse(&mut self, _duration: Duration) {}
}

impl<H: Haptics + ?Sized> Haptics for Box<H> {
    fn pulse(&mut self, duration: Duration) {
        (**self).pulse(duration);
    }
}

/// Haptics that records every pulse into a shared log.
///
/// Clones share the same log, so a test can keep one handle while the widget
/// owns the other.
#[cfg(any(test, feature = "test-helpers"))]
#[derive(Debug, Clone, Default)]
pub struct RecordingHaptics {
    pulses: std::rc::Rc<std::cell::RefCell<Vec<Duration>>>,
}

#[cfg(any(test, feature = "test-helpers"))]
impl RecordingHaptics {
    /// Create an empty recorder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of pulses requested so far.
    #[must_use]
    pub fn count(&self) -> usize {
        self.pulses.borrow().len()
    }

    /// Copy of every pulse requested so far.
    #[must_use]
    pub fn pulses(&self) -> Vec<Duration> {
        self.pulses.borrow().clone()
    }
}

#[cfg(any(test, feature = "test-helpers"))]
impl Haptics for RecordingHaptics {
    fn pulse(&mut self, duration: Duration) {
        self.pulses.borrow_mut().push(duration);
    }
}
