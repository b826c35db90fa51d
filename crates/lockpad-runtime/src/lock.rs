#![forbid(unsafe_code)]

//! Lock-screen flow: enroll a PIN or pattern once, verify it on later visits.
//!
//! # State machine
//!
//! ```text
//!            choose_pin            save_pin
//!   Setup ─────────────▶ PinSetup ─────────▶ PinLogin ──┐
//!     │  ◀───── back ───────┘                           │ match
//!     │      choose_pattern          save_pattern       ▼
//!     └──────────────▶ PatternSetup ─────────▶ PatternLogin ──▶ Unlocked
//!        ◀───── back ───────┘
//! ```
//!
//! [`LockScreen::open`] skips straight to a login screen when a secret is
//! already stored. A stored PIN wins over a stored pattern.
//!
//! The flow never draws anything. Hosts forward keypad presses and finished
//! pattern paths, then render whatever [`LockScreen::screen`] says.

use std::fmt;

use lockpad_widgets::{DigitCell, Path, PinPad};

use crate::config::LockConfig;
use crate::storage::{KeyValueStore, StorageError, load_json, save_json};

/// Which screen the lock is showing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Screen {
    /// Nothing enrolled; choose PIN or pattern.
    Setup,
    /// Entering a new PIN.
    PinSetup,
    /// Drawing a new pattern.
    PatternSetup,
    /// Verifying the stored PIN.
    PinLogin,
    /// Verifying the stored pattern.
    PatternLogin,
    /// Verified.
    Unlocked,
}

impl fmt::Display for Screen {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Setup => "setup",
            Self::PinSetup => "PIN setup",
            Self::PatternSetup => "pattern setup",
            Self::PinLogin => "PIN login",
            Self::PatternLogin => "pattern login",
            Self::Unlocked => "unlocked",
        };
        f.write_str(name)
    }
}

/// Errors reported by the lock flow.
///
/// The `Display` text of the user-facing variants is the message shown on
/// screen.
#[derive(Debug)]
pub enum LockError {
    /// Tried to save a PIN with the wrong number of digits.
    InvalidPin {
        /// Required digit count.
        expected: usize,
    },
    /// Tried to save a pattern with too few nodes.
    PatternTooShort {
        /// Nodes in the candidate.
        len: usize,
        /// Required minimum.
        min: usize,
    },
    /// The entered PIN does not match.
    IncorrectPin,
    /// The entered pattern does not match.
    IncorrectPattern,
    /// The operation does not apply to the current screen.
    WrongScreen(Screen),
    /// The store failed.
    Storage(StorageError),
}

impl fmt::Display for LockError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LockError::InvalidPin { expected } => {
                write!(f, "Please enter a valid {expected}-digit pin.")
            }
            LockError::PatternTooShort { min, .. } => {
                write!(f, "Pattern too short. Connect at least {min} dots")
            }
            LockError::IncorrectPin => f.write_str("Incorrect pin. Please try again."),
            LockError::IncorrectPattern => f.write_str("Incorrect pattern. Please try again."),
            LockError::WrongScreen(screen) => {
                write!(f, "operation not available on the {screen} screen")
            }
            LockError::Storage(e) => write!(f, "storage error: {e}"),
        }
    }
}

impl std::error::Error for LockError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            LockError::Storage(e) => Some(e),
            _ => None,
        }
    }
}

impl From<StorageError> for LockError {
    fn from(e: StorageError) -> Self {
        LockError::Storage(e)
    }
}

/// Result type for lock operations.
pub type LockResult<T> = Result<T, LockError>;

/// The lock-screen controller.
///
/// Owns the keypad state, the pattern candidate or attempt, and a handle to
/// the store. All transitions go through `&mut self`.
pub struct LockScreen<S: KeyValueStore> {
    store: S,
    config: LockConfig,
    screen: Screen,
    pin: PinPad,
    /// Candidate on `PatternSetup`, last attempt on `PatternLogin`.
    pattern: Option<Path>,
}

impl<S: KeyValueStore> fmt::Debug for LockScreen<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LockScreen")
            .field("store", &self.store.name())
            .field("screen", &self.screen)
            .field("pin_len", &self.pin.len())
            .field("pattern_len", &self.pattern.as_ref().map(Path::len))
            .finish()
    }
}

impl<S: KeyValueStore> LockScreen<S> {
    /// Open the lock over `store`, picking the first screen from what is
    /// already enrolled.
    ///
    /// An empty stored value counts as not enrolled.
    pub fn open(store: S, config: LockConfig) -> LockResult<Self> {
        let enrolled = |key: &str| -> LockResult<bool> {
            Ok(store.get(key)?.is_some_and(|v| !v.is_empty()))
        };
        let screen = if enrolled(config.keys.pin.as_str())? {
            Screen::PinLogin
        } else if enrolled(config.keys.pattern.as_str())? {
            Screen::PatternLogin
        } else {
            Screen::Setup
        };
        tracing::debug!(store = store.name(), %screen, "lock screen opened");

        let pin = PinPad::new(config.pin_length);
        Ok(Self {
            store,
            config,
            screen,
            pin,
            pattern: None,
        })
    }

    /// The screen currently shown.
    #[must_use]
    pub const fn screen(&self) -> Screen {
        self.screen
    }

    /// Whether the secret has been verified.
    #[must_use]
    pub fn is_unlocked(&self) -> bool {
        self.screen == Screen::Unlocked
    }

    /// Policy in effect.
    #[must_use]
    pub fn config(&self) -> &LockConfig {
        &self.config
    }

    /// The underlying store.
    #[must_use]
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Keypad state for the PIN screens.
    #[must_use]
    pub fn pin_pad(&self) -> &PinPad {
        &self.pin
    }

    /// Cells for the PIN display.
    #[must_use]
    pub fn pin_display(&self) -> Vec<DigitCell> {
        self.pin.display()
    }

    /// The pattern candidate (setup) or last failed attempt (login).
    #[must_use]
    pub fn pending_pattern(&self) -> Option<&Path> {
        self.pattern.as_ref()
    }

    // ── Setup ────────────────────────────────────────────────────────────

    /// Start enrolling a PIN.
    pub fn choose_pin(&mut self) -> LockResult<()> {
        self.require_screen(&[Screen::Setup])?;
        self.pin.clear();
        self.go(Screen::PinSetup);
        Ok(())
    }

    /// Start enrolling a pattern.
    pub fn choose_pattern(&mut self) -> LockResult<()> {
        self.require_screen(&[Screen::Setup])?;
        self.pattern = None;
        self.go(Screen::PatternSetup);
        Ok(())
    }

    /// Leave a setup screen, discarding pending input.
    pub fn back(&mut self) -> LockResult<()> {
        self.require_screen(&[Screen::PinSetup, Screen::PatternSetup])?;
        self.pin.clear();
        self.pattern = None;
        self.go(Screen::Setup);
        Ok(())
    }

    /// Persist the entered PIN and move to PIN login.
    pub fn save_pin(&mut self) -> LockResult<()> {
        self.require_screen(&[Screen::PinSetup])?;
        if self.pin.len() != self.config.pin_length {
            return Err(LockError::InvalidPin {
                expected: self.config.pin_length,
            });
        }
        let pin = self.pin.take();
        self.store.set(&self.config.keys.pin, &pin)?;
        tracing::info!(digits = pin.len(), "PIN enrolled");
        self.go(Screen::PinLogin);
        Ok(())
    }

    /// Persist the pattern candidate and move to pattern login.
    pub fn save_pattern(&mut self) -> LockResult<()> {
        self.require_screen(&[Screen::PatternSetup])?;
        let len = self.pattern.as_ref().map_or(0, Path::len);
        if len < self.config.min_pattern_len {
            return Err(LockError::PatternTooShort {
                len,
                min: self.config.min_pattern_len,
            });
        }
        if let Some(pattern) = self.pattern.take() {
            save_json(&self.store, &self.config.keys.pattern, &pattern)?;
            tracing::info!(nodes = pattern.len(), "pattern enrolled");
        }
        self.go(Screen::PatternLogin);
        Ok(())
    }

    // ── Keypad ───────────────────────────────────────────────────────────

    /// Press a keypad digit.
    ///
    /// Returns whether the digit was accepted. On PIN login a full, matching
    /// entry unlocks immediately; a full, wrong entry waits for
    /// [`submit_pin`](Self::submit_pin).
    pub fn press_key(&mut self, digit: char) -> LockResult<bool> {
        self.require_screen(&[Screen::PinSetup, Screen::PinLogin])?;
        if !self.pin.press(digit) {
            return Ok(false);
        }
        if self.screen == Screen::PinLogin && self.pin.is_complete() && self.pin_matches()? {
            self.unlock("pin");
        }
        Ok(true)
    }

    /// Delete the last entered digit.
    pub fn backspace(&mut self) -> LockResult<()> {
        self.require_screen(&[Screen::PinSetup, Screen::PinLogin])?;
        self.pin.backspace();
        Ok(())
    }

    /// Delete every entered digit.
    pub fn clear_pin(&mut self) -> LockResult<()> {
        self.require_screen(&[Screen::PinSetup, Screen::PinLogin])?;
        self.pin.clear();
        Ok(())
    }

    /// Show or mask the entered digits. Returns the new visibility.
    pub fn toggle_pin_visibility(&mut self) -> LockResult<bool> {
        self.require_screen(&[Screen::PinSetup, Screen::PinLogin])?;
        Ok(self.pin.toggle_visibility())
    }

    // ── Login ────────────────────────────────────────────────────────────

    /// Check the entered PIN.
    ///
    /// A mismatch clears the entry.
    pub fn submit_pin(&mut self) -> LockResult<()> {
        self.require_screen(&[Screen::PinLogin])?;
        if self.pin_matches()? {
            self.unlock("pin");
            return Ok(());
        }
        self.pin.clear();
        tracing::info!("PIN rejected");
        Err(LockError::IncorrectPin)
    }

    /// Feed a path finished on the pattern canvas.
    ///
    /// On pattern setup the path becomes the candidate. On pattern login a
    /// matching path unlocks and `true` is returned; otherwise the attempt is
    /// kept for [`submit_pattern`](Self::submit_pattern).
    pub fn pattern_completed(&mut self, path: &Path) -> LockResult<bool> {
        self.require_screen(&[Screen::PatternSetup, Screen::PatternLogin])?;
        if self.screen == Screen::PatternSetup {
            self.pattern = Some(path.clone());
            return Ok(false);
        }
        if self.pattern_matches(path)? {
            self.unlock("pattern");
            return Ok(true);
        }
        self.pattern = Some(path.clone());
        Ok(false)
    }

    /// Check the last pattern attempt.
    ///
    /// A mismatch discards the attempt; the host should reset its canvas.
    pub fn submit_pattern(&mut self) -> LockResult<()> {
        self.require_screen(&[Screen::PatternLogin])?;
        let attempt = self.pattern.take().unwrap_or_default();
        if self.pattern_matches(&attempt)? {
            self.unlock("pattern");
            return Ok(());
        }
        tracing::info!(nodes = attempt.len(), "pattern rejected");
        Err(LockError::IncorrectPattern)
    }

    // ── Internals ────────────────────────────────────────────────────────

    fn require_screen(&self, allowed: &[Screen]) -> LockResult<()> {
        if allowed.contains(&self.screen) {
            Ok(())
        } else {
            Err(LockError::WrongScreen(self.screen))
        }
    }

    fn go(&mut self, screen: Screen) {
        tracing::debug!(from = %self.screen, to = %screen, "lock screen transition");
        self.screen = screen;
    }

    fn unlock(&mut self, method: &str) {
        self.pin.clear();
        self.pattern = None;
        tracing::info!(method, "unlocked");
        self.go(Screen::Unlocked);
    }

    fn pin_matches(&self) -> LockResult<bool> {
        let stored = self.store.get(&self.config.keys.pin)?;
        Ok(stored.as_deref() == Some(self.pin.value()))
    }

    /// Exact comparison: same nodes in the same order.
    ///
    /// A stored pattern that fails to decode matches nothing.
    fn pattern_matches(&self, path: &Path) -> LockResult<bool> {
        match load_json::<Path, _>(&self.store, &self.config.keys.pattern) {
            Ok(stored) => Ok(stored.as_ref() == Some(path)),
            Err(StorageError::Serialization(msg)) => {
                tracing::warn!(
                    key = %self.config.keys.pattern,
                    error = %msg,
                    "stored pattern is corrupt, treating as absent"
                );
                Ok(false)
            }
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;

    fn path(ids: &[u8]) -> Path {
        Path::from_ids(ids.iter().copied()).unwrap()
    }

    fn fresh() -> LockScreen<MemoryStore> {
        LockScreen::open(MemoryStore::new(), LockConfig::default()).unwrap()
    }

    fn type_pin(lock: &mut LockScreen<MemoryStore>, pin: &str) {
        for d in pin.chars() {
            lock.press_key(d).unwrap();
        }
    }

    #[test]
    fn empty_store_opens_setup() {
        assert_eq!(fresh().screen(), Screen::Setup);
    }

    #[test]
    fn stored_pin_wins_over_pattern() {
        let store = MemoryStore::with_entries([("userPin", "1234"), ("userPattern", "[1,2,3,4]")]);
        let lock = LockScreen::open(store, LockConfig::default()).unwrap();
        assert_eq!(lock.screen(), Screen::PinLogin);
    }

    #[test]
    fn stored_pattern_opens_pattern_login() {
        let store = MemoryStore::with_entries([("userPattern", "[1,2,3,4]")]);
        let lock = LockScreen::open(store, LockConfig::default()).unwrap();
        assert_eq!(lock.screen(), Screen::PatternLogin);
    }

    #[test]
    fn empty_stored_values_count_as_not_enrolled() {
        let store = MemoryStore::with_entries([("userPin", "")]);
        let lock = LockScreen::open(store, LockConfig::default()).unwrap();
        assert_eq!(lock.screen(), Screen::Setup);

        let store = MemoryStore::with_entries([("userPin", ""), ("userPattern", "[1,2,3,4]")]);
        let lock = LockScreen::open(store, LockConfig::default()).unwrap();
        assert_eq!(lock.screen(), Screen::PatternLogin);

        let store = MemoryStore::with_entries([("userPattern", "")]);
        let lock = LockScreen::open(store, LockConfig::default()).unwrap();
        assert_eq!(lock.screen(), Screen::Setup);
    }

    #[test]
    fn keypad_edits_need_a_pin_screen() {
        let mut lock = fresh();
        assert!(matches!(lock.backspace(), Err(LockError::WrongScreen(Screen::Setup))));
        assert!(matches!(lock.clear_pin(), Err(LockError::WrongScreen(Screen::Setup))));
        assert!(matches!(
            lock.toggle_pin_visibility(),
            Err(LockError::WrongScreen(Screen::Setup))
        ));
        assert!(!lock.pin_pad().is_visible());

        lock.choose_pin().unwrap();
        type_pin(&mut lock, "12");
        lock.backspace().unwrap();
        assert_eq!(lock.pin_pad().value(), "1");
        assert!(lock.toggle_pin_visibility().unwrap());
        lock.clear_pin().unwrap();
        assert!(lock.pin_pad().value().is_empty());
    }

    #[test]
    fn pin_enrollment_and_auto_unlock() {
        let mut lock = fresh();
        lock.choose_pin().unwrap();
        type_pin(&mut lock, "4321");
        lock.save_pin().unwrap();
        assert_eq!(lock.screen(), Screen::PinLogin);
        assert_eq!(lock.store().get("userPin").unwrap().as_deref(), Some("4321"));
        assert!(lock.pin_pad().is_empty());

        type_pin(&mut lock, "4321");
        assert!(lock.is_unlocked());
    }

    #[test]
    fn short_pin_is_rejected() {
        let mut lock = fresh();
        lock.choose_pin().unwrap();
        type_pin(&mut lock, "12");
        let err = lock.save_pin().unwrap_err();
        assert_eq!(err.to_string(), "Please enter a valid 4-digit pin.");
        assert_eq!(lock.screen(), Screen::PinSetup);
        assert_eq!(lock.pin_pad().value(), "12");
    }

    #[test]
    fn wrong_pin_waits_for_submit_then_clears() {
        let store = MemoryStore::with_entries([("userPin", "1234")]);
        let mut lock = LockScreen::open(store, LockConfig::default()).unwrap();
        type_pin(&mut lock, "9999");
        assert_eq!(lock.screen(), Screen::PinLogin);
        let err = lock.submit_pin().unwrap_err();
        assert!(matches!(err, LockError::IncorrectPin));
        assert_eq!(err.to_string(), "Incorrect pin. Please try again.");
        assert!(lock.pin_pad().is_empty());
    }

    #[test]
    fn extra_keys_are_ignored_when_full() {
        let store = MemoryStore::with_entries([("userPin", "1234")]);
        let mut lock = LockScreen::open(store, LockConfig::default()).unwrap();
        type_pin(&mut lock, "9999");
        assert!(!lock.press_key('1').unwrap());
        lock.backspace().unwrap();
        assert!(lock.press_key('1').unwrap());
        assert_eq!(lock.pin_pad().value(), "9991");
    }

    #[test]
    fn pattern_enrollment_requires_min_len() {
        let mut lock = fresh();
        lock.choose_pattern().unwrap();

        let err = lock.save_pattern().unwrap_err();
        assert!(matches!(err, LockError::PatternTooShort { len: 0, min: 4 }));

        lock.pattern_completed(&path(&[1, 2, 3])).unwrap();
        let err = lock.save_pattern().unwrap_err();
        assert_eq!(err.to_string(), "Pattern too short. Connect at least 4 dots");

        lock.pattern_completed(&path(&[1, 5, 9, 6])).unwrap();
        lock.save_pattern().unwrap();
        assert_eq!(lock.screen(), Screen::PatternLogin);
        assert_eq!(
            lock.store().get("userPattern").unwrap().as_deref(),
            Some("[1,5,9,6]")
        );
    }

    #[test]
    fn matching_pattern_unlocks_on_completion() {
        let store = MemoryStore::with_entries([("userPattern", "[1,5,9,6]")]);
        let mut lock = LockScreen::open(store, LockConfig::default()).unwrap();
        assert!(!lock.pattern_completed(&path(&[1, 5, 9])).unwrap());
        assert!(lock.pattern_completed(&path(&[1, 5, 9, 6])).unwrap());
        assert!(lock.is_unlocked());
    }

    #[test]
    fn pattern_order_matters() {
        let store = MemoryStore::with_entries([("userPattern", "[1,5,9,6]")]);
        let mut lock = LockScreen::open(store, LockConfig::default()).unwrap();
        assert!(!lock.pattern_completed(&path(&[6, 9, 5, 1])).unwrap());
        let err = lock.submit_pattern().unwrap_err();
        assert_eq!(err.to_string(), "Incorrect pattern. Please try again.");
        assert!(lock.pending_pattern().is_none());
    }

    #[test]
    fn submit_without_attempt_is_incorrect() {
        let store = MemoryStore::with_entries([("userPattern", "[1,2,3,4]")]);
        let mut lock = LockScreen::open(store, LockConfig::default()).unwrap();
        assert!(matches!(
            lock.submit_pattern(),
            Err(LockError::IncorrectPattern)
        ));
    }

    #[test]
    fn back_discards_pending_input() {
        let mut lock = fresh();
        lock.choose_pattern().unwrap();
        lock.pattern_completed(&path(&[1, 2, 3, 4])).unwrap();
        lock.back().unwrap();
        assert_eq!(lock.screen(), Screen::Setup);
        assert!(lock.pending_pattern().is_none());

        lock.choose_pin().unwrap();
        type_pin(&mut lock, "12");
        lock.back().unwrap();
        assert!(lock.pin_pad().is_empty());
    }

    #[test]
    fn wrong_screen_is_reported() {
        let mut lock = fresh();
        let err = lock.save_pin().unwrap_err();
        assert!(matches!(err, LockError::WrongScreen(Screen::Setup)));
        assert_eq!(
            err.to_string(),
            "operation not available on the setup screen"
        );
        assert!(lock.press_key('1').is_err());
        assert!(lock.pattern_completed(&Path::new()).is_err());
        assert!(lock.back().is_err());
    }

    #[test]
    fn visibility_toggle_reaches_display() {
        let mut lock = fresh();
        lock.choose_pin().unwrap();
        lock.press_key('8').unwrap();
        assert_eq!(lock.pin_display()[0], DigitCell::Masked);
        assert!(lock.toggle_pin_visibility().unwrap());
        assert_eq!(lock.pin_display()[0], DigitCell::Visible('8'));
        lock.clear_pin().unwrap();
        assert_eq!(lock.pin_display()[0], DigitCell::Empty);
    }

    #[test]
    fn custom_pin_length() {
        let config = LockConfig::default().with_pin_length(6);
        let mut lock = LockScreen::open(MemoryStore::new(), config).unwrap();
        lock.choose_pin().unwrap();
        type_pin(&mut lock, "1234");
        assert_eq!(
            lock.save_pin().unwrap_err().to_string(),
            "Please enter a valid 6-digit pin."
        );
        type_pin(&mut lock, "56");
        lock.save_pin().unwrap();
    }

    #[test]
    fn storage_error_has_source() {
        let err = LockError::from(StorageError::Unavailable("quota".into()));
        assert!(std::error::Error::source(&err).is_some());
        assert_eq!(err.to_string(), "storage error: storage unavailable: quota");
    }

    #[test]
    #[tracing_test::traced_test]
    fn corrupt_pattern_never_matches() {
        let store = MemoryStore::with_entries([("userPattern", "[1,1,x")]);
        let mut lock = LockScreen::open(store, LockConfig::default()).unwrap();
        assert_eq!(lock.screen(), Screen::PatternLogin);
        assert!(!lock.pattern_completed(&path(&[1])).unwrap());
        assert!(logs_contain("stored pattern is corrupt"));
    }
}
