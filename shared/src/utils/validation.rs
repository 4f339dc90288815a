//! Common validation utilities

use once_cell::sync::Lazy;
use regex::Regex;

static NUMERIC_CODE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[0-9]+$").unwrap());

/// Check that a handoff code is made of ASCII digits only
pub fn is_numeric_code(code: &str) -> bool {
    NUMERIC_CODE.is_match(code)
}

/// Check that a handoff code is numeric and exactly `length` digits long
pub fn is_valid_code(code: &str, length: usize) -> bool {
    code.len() == length && is_numeric_code(code)
}

/// Check that a single entered character is a digit
pub fn is_code_digit(value: char) -> bool {
    value.is_ascii_digit()
}

/// Mask a code for logging, keeping only the last digit
pub fn mask_code(code: &str) -> String {
    match code.chars().last() {
        Some(last) if code.len() > 1 => format!("{}{}", "*".repeat(code.len() - 1), last),
        _ => "*".repeat(code.len()),
    }
}
