//! Transaction PIN entry
//!
//! Five single-digit slots with auto-advancing focus. This is an input
//! affordance only; whether the PIN is correct is decided by the backend.

use std::fmt;

use serde::Serialize;

pub const PIN_LENGTH: usize = 5;

/// A complete 5-digit transaction PIN. `Debug` never prints the digits.
#[derive(Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Pin(String);

impl Pin {
    /// Parse exactly five ASCII digits
    pub fn parse(s: &str) -> Option<Self> {
        (s.len() == PIN_LENGTH && s.bytes().all(|b| b.is_ascii_digit()))
            .then(|| Self(s.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Pin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Pin(*****)")
    }
}

/// PIN input state: one optional digit per slot plus the focused slot
#[derive(Clone, Default, PartialEq, Eq)]
pub struct PinPad {
    digits: [Option<u8>; PIN_LENGTH],
    focus: usize,
}

impl PinPad {
    pub fn new() -> Self {
        Self::default()
    }

    /// Slot that currently has focus
    pub fn focus(&self) -> usize {
        self.focus
    }

    /// Put `ch` into slot `index` and move focus to the next slot.
    ///
    /// Non-digits and out-of-range slots are ignored. Returns whether the
    /// input was accepted.
    pub fn input(&mut self, index: usize, ch: char) -> bool {
        if index >= PIN_LENGTH {
            return false;
        }
        let Some(digit) = ch.to_digit(10) else {
            return false;
        };
        self.digits[index] = Some(digit as u8);
        self.focus = (index + 1).min(PIN_LENGTH - 1);
        true
    }

    /// Type into the focused slot
    pub fn push(&mut self, ch: char) -> bool {
        self.input(self.focus, ch)
    }

    /// Backspace in slot `index`: clears a filled slot, or on an empty slot
    /// moves focus to the previous one.
    pub fn backspace(&mut self, index: usize) {
        if index >= PIN_LENGTH {
            return;
        }
        if self.digits[index].is_some() {
            self.digits[index] = None;
            self.focus = index;
        } else if index > 0 {
            self.focus = index - 1;
        }
    }

    pub fn filled(&self) -> usize {
        self.digits.iter().filter(|d| d.is_some()).count()
    }

    /// Confirm is enabled only when all five slots hold a digit
    pub fn is_complete(&self) -> bool {
        self.digits.iter().all(Option::is_some)
    }

    pub fn pin(&self) -> Option<Pin> {
        if !self.is_complete() {
            return None;
        }
        let s: String = self
            .digits
            .iter()
            .flatten()
            .map(|d| char::from(b'0' + d))
            .collect();
        Some(Pin(s))
    }
}

impl fmt::Debug for PinPad {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PinPad")
            .field("filled", &self.filled())
            .field("focus", &self.focus)
            .finish()
    }
}
