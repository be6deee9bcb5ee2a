//! Chat input validation.

use serde::{Deserialize, Serialize};

/// Longest message the widget accepts, in characters.
pub const MAX_MESSAGE_CHARS: usize = 2000;

/// Validity message attached to an over-long input.
pub const TOO_LONG_MESSAGE: &str = "Message too long (max 2000 characters)";

/// Outcome of validating the chat input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum InputValidation {
    /// Nothing but whitespace.
    Empty,
    /// More than [`MAX_MESSAGE_CHARS`] characters.
    TooLong,
    Valid,
}

impl InputValidation {
    pub fn send_enabled(&self) -> bool {
        matches!(self, InputValidation::Valid)
    }

    /// The custom validity message shown on the input, if any.
    pub fn validity_message(&self) -> Option<&'static str> {
        match self {
            InputValidation::TooLong => Some(TOO_LONG_MESSAGE),
            _ => None,
        }
    }
}

/// Classifies the raw input value.
///
/// Emptiness is judged on the trimmed value, length on the raw value.
pub fn validate_input(value: &str) -> InputValidation {
    if value.trim().is_empty() {
        InputValidation::Empty
    } else if value.chars().count() > MAX_MESSAGE_CHARS {
        InputValidation::TooLong
    } else {
        InputValidation::Valid
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn whitespace_is_empty() {
        assert_eq!(validate_input(""), InputValidation::Empty);
        assert_eq!(validate_input("   \t "), InputValidation::Empty);
        assert!(!validate_input("  ").send_enabled());
    }

    #[test]
    fn length_boundary() {
        let exact = "a".repeat(2000);
        let over = "a".repeat(2001);
        assert_eq!(validate_input(&exact), InputValidation::Valid);
        assert!(validate_input(&exact).send_enabled());
        assert_eq!(validate_input(&over), InputValidation::TooLong);
        assert!(!validate_input(&over).send_enabled());
        assert_eq!(
            validate_input(&over).validity_message(),
            Some(TOO_LONG_MESSAGE)
        );
    }

    #[test]
    fn length_counts_characters_not_bytes() {
        let accented = "é".repeat(2000);
        assert_eq!(validate_input(&accented), InputValidation::Valid);
    }
}
