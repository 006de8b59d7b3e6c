//! Field validators shared by site forms and the JSON API

use std::fmt;

/// Symbols accepted by the password policy
pub const PASSWORD_SYMBOLS: [char; 4] = ['!', '@', '#', '%'];

pub const PASSWORD_MIN_LEN: usize = 8;
pub const PASSWORD_MAX_LEN: usize = 20;

/// Password policy violations, reported in the order they are checked
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PasswordError {
    TooShort,
    TooLong,
    MissingDigit,
    MissingLowercase,
    MissingSymbol,
}

impl fmt::Display for PasswordError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PasswordError::TooShort => write!(
                f,
                "Password should be at least {} characters.",
                PASSWORD_MIN_LEN
            ),
            PasswordError::TooLong => write!(
                f,
                "Password should be no more than {} characters.",
                PASSWORD_MAX_LEN
            ),
            PasswordError::MissingDigit => write!(f, "Password should have at least one number."),
            PasswordError::MissingLowercase => {
                write!(f, "Password should have at least one lowercase letter.")
            }
            PasswordError::MissingSymbol => write!(
                f,
                "Password should have at least one of the symbols: ! @ # %"
            ),
        }
    }
}

impl std::error::Error for PasswordError {}

/// Validate a new account password
///
/// Length 8–20 inclusive, at least one digit, one lowercase letter and one
/// symbol from `! @ # %`. Uppercase letters are allowed but not required.
///
/// # Examples
/// ```
/// use atm_common::validators::{validate_password, PasswordError};
///
/// assert!(validate_password("goodpass1!").is_ok());
/// assert_eq!(validate_password("short1!"), Err(PasswordError::TooShort));
/// ```
pub fn validate_password(password: &str) -> Result<(), PasswordError> {
    let len = password.chars().count();
    if len < PASSWORD_MIN_LEN {
        return Err(PasswordError::TooShort);
    }
    if len > PASSWORD_MAX_LEN {
        return Err(PasswordError::TooLong);
    }
    if !password.chars().any(|c| c.is_ascii_digit()) {
        return Err(PasswordError::MissingDigit);
    }
    if !password.chars().any(|c| c.is_lowercase()) {
        return Err(PasswordError::MissingLowercase);
    }
    if !password.chars().any(|c| PASSWORD_SYMBOLS.contains(&c)) {
        return Err(PasswordError::MissingSymbol);
    }
    Ok(())
}

/// Minimal email syntax check: one `@`, non-empty local part, dotted domain
pub fn is_valid_email(email: &str) -> bool {
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    !local.is_empty()
        && !domain.contains('@')
        && !email.chars().any(char::is_whitespace)
        && domain
            .split('.')
            .filter(|part| !part.is_empty())
            .count()
            >= 2
        && !domain.starts_with('.')
        && !domain.ends_with('.')
}

/// Parse a rating into tenths
///
/// At most three digits in total and at most one of them after the decimal
/// point, so `99.9` is the largest accepted value.
pub fn parse_rating_tenths(input: &str) -> Result<i64, String> {
    let input = input.trim();
    let (negative, digits) = match input.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, input),
    };

    let (whole, fraction) = match digits.split_once('.') {
        Some((whole, fraction)) => (whole, fraction),
        None => (digits, ""),
    };

    let numeric = |s: &str| s.chars().all(|c| c.is_ascii_digit());
    if (whole.is_empty() && fraction.is_empty()) || !numeric(whole) || !numeric(fraction) {
        return Err("Enter a number.".to_string());
    }
    if fraction.len() > 1 {
        return Err("Ensure that there are no more than 1 decimal place.".to_string());
    }

    let whole = whole.trim_start_matches('0');
    if whole.len() > 2 {
        return Err("Ensure that there are no more than 2 digits before the decimal point.".to_string());
    }

    // Both parts are at most two ASCII digits here, so parsing cannot fail
    let whole_value: i64 = whole.parse().unwrap_or(0);
    let fraction_value: i64 = fraction.parse().unwrap_or(0);
    let tenths = whole_value * 10 + fraction_value;

    Ok(if negative { -tenths } else { tenths })
}
