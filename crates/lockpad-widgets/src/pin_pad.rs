#![forbid(unsafe_code)]

//! Fixed-length numeric keypad state.
//!
//! [`PinPad`] holds the digits typed so far and whether they are shown in the
//! clear. Rendering is left to the host; [`PinPad::display`] yields one
//! [`DigitCell`] per slot so every host draws the same thing.

use std::fmt;
use std::mem;

/// Default number of digits in a PIN.
pub const DEFAULT_PIN_LENGTH: usize = 4;

/// One slot of the PIN display.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DigitCell {
    /// An entered digit, shown in the clear.
    Visible(char),
    /// An entered digit, hidden.
    Masked,
    /// Not yet entered.
    Empty,
}

impl fmt::Display for DigitCell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Visible(c) => write!(f, "{c}"),
            Self::Masked => f.write_str("•"),
            Self::Empty => f.write_str("_"),
        }
    }
}

/// Digits entered on a keypad with a fixed capacity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PinPad {
    digits: String,
    capacity: usize,
    visible: bool,
}

impl Default for PinPad {
    fn default() -> Self {
        Self::new(DEFAULT_PIN_LENGTH)
    }
}

impl PinPad {
    /// An empty, masked keypad accepting up to `capacity` digits.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        Self {
            digits: String::with_capacity(capacity),
            capacity,
            visible: false,
        }
    }

    /// Append `digit` if it is an ASCII digit and there is room.
    ///
    /// Returns whether the digit was accepted.
    pub fn press(&mut self, digit: char) -> bool {
        if !digit.is_ascii_digit() || self.is_complete() {
            return false;
        }
        self.digits.push(digit);
        true
    }

    /// Remove the last digit, if any.
    pub fn backspace(&mut self) -> Option<char> {
        self.digits.pop()
    }

    /// Remove every digit. Visibility is kept.
    pub fn clear(&mut self) {
        self.digits.clear();
    }

    /// Flip between showing and masking digits. Returns the new state.
    pub fn toggle_visibility(&mut self) -> bool {
        self.visible = !self.visible;
        self.visible
    }

    /// Whether digits are shown in the clear.
    #[must_use]
    pub const fn is_visible(&self) -> bool {
        self.visible
    }

    /// Digits entered so far.
    #[must_use]
    pub fn value(&self) -> &str {
        &self.digits
    }

    /// Number of digits entered.
    #[must_use]
    pub fn len(&self) -> usize {
        self.digits.len()
    }

    /// Whether no digit has been entered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.digits.is_empty()
    }

    /// Maximum number of digits.
    #[must_use]
    pub const fn capacity(&self) -> usize {
        self.capacity
    }

    /// Whether every slot is filled.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.digits.len() >= self.capacity
    }

    /// Move the entered digits out, leaving the keypad empty.
    pub fn take(&mut self) -> String {
        mem::take(&mut self.digits)
    }

    /// One cell per slot, in entry order.
    #[must_use]
    pub fn display(&self) -> Vec<DigitCell> {
        let mut cells: Vec<DigitCell> = self
            .digits
            .chars()
            .map(|c| {
                if self.visible {
                    DigitCell::Visible(c)
                } else {
                    DigitCell::Masked
                }
            })
            .collect();
        cells.resize(self.capacity, DigitCell::Empty);
        cells
    }

    /// [`display`](Self::display) rendered as text, e.g. `••__`.
    #[must_use]
    pub fn display_string(&self) -> String {
        self.display().iter().map(ToString::to_string).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn press_fills_up_to_capacity() {
        let mut pad = PinPad::default();
        for d in "12345".chars() {
            pad.press(d);
        }
        assert_eq!(pad.value(), "1234");
        assert!(pad.is_complete());
        assert!(!pad.press('9'));
    }

    #[test]
    fn non_digits_are_rejected() {
        let mut pad = PinPad::new(4);
        assert!(!pad.press('a'));
        assert!(!pad.press(' '));
        assert!(!pad.press('٣'));
        assert!(pad.is_empty());
    }

    #[test]
    fn backspace_and_clear() {
        let mut pad = PinPad::new(4);
        pad.press('1');
        pad.press('2');
        assert_eq!(pad.backspace(), Some('2'));
        assert_eq!(pad.value(), "1");
        pad.clear();
        assert!(pad.is_empty());
        assert_eq!(pad.backspace(), None);
    }

    #[test]
    fn display_masks_by_default() {
        let mut pad = PinPad::new(4);
        pad.press('7');
        pad.press('3');
        assert_eq!(
            pad.display(),
            vec![
                DigitCell::Masked,
                DigitCell::Masked,
                DigitCell::Empty,
                DigitCell::Empty
            ]
        );
        assert_eq!(pad.display_string(), "••__");
    }

    #[test]
    fn toggle_reveals_digits() {
        let mut pad = PinPad::new(4);
        pad.press('7');
        assert!(pad.toggle_visibility());
        assert_eq!(pad.display()[0], DigitCell::Visible('7'));
        assert_eq!(pad.display_string(), "7___");
        assert!(!pad.toggle_visibility());
    }

    #[test]
    fn clear_keeps_visibility() {
        let mut pad = PinPad::new(4);
        pad.toggle_visibility();
        pad.press('1');
        pad.clear();
        assert!(pad.is_visible());
    }

    #[test]
    fn take_empties() {
        let mut pad = PinPad::new(4);
        for d in "0042".chars() {
            pad.press(d);
        }
        assert_eq!(pad.take(), "0042");
        assert!(pad.is_empty());
        assert_eq!(pad.capacity(), 4);
    }

    #[test]
    fn display_always_has_capacity_cells() {
        for cap in [0, 1, 4, 6] {
            let pad = PinPad::new(cap);
            assert_eq!(pad.display().len(), cap);
        }
    }
}
