//! # Validation Module
//!
//! Parsing and validation of everything the operator types.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: Terminal prompt (apps/counter)                               │
//! │  └── Raw text, nothing interpreted                                     │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: THIS MODULE                                                  │
//! │  ├── Strict: admin edits (names, prices, phone) → ValidationError      │
//! │  └── Forgiving: till inputs (quantity, delivery fee) → best value      │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Domain types                                                 │
//! │  └── Money cannot be NaN, quantities are unsigned                      │
//! │                                                                         │
//! │  Nothing in the catalog or cart changes before Layer 2 says OK.       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use slice_core::validation::{parse_ordinals, parse_price};
//!
//! assert!(parse_price("price", "5000").is_ok());
//! assert!(parse_price("price", "five").is_err());
//!
//! // "1, 3 x 9" against a list of 4: token "x" and out-of-range 9 skipped
//! assert_eq!(parse_ordinals("1, 3 x 9", 4), vec![0, 2]);
//! ```

use crate::error::ValidationError;
use crate::money::{Money, ParseMoneyError};
use crate::MAX_NAME_LEN;

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// String Validators
// =============================================================================

/// Validates a catalog name (item or drink) and returns it trimmed.
///
/// ## Rules
/// - Must not be empty after trimming
/// - At most [`MAX_NAME_LEN`] characters
///
/// ## Example
/// ```rust
/// use slice_core::validation::validate_name;
///
/// assert_eq!(validate_name("name", "  Fugazzeta ").unwrap(), "Fugazzeta");
/// assert!(validate_name("name", "   ").is_err());
/// ```
pub fn validate_name(field: &str, name: &str) -> ValidationResult<String> {
    let name = name.trim();

    if name.is_empty() {
        return Err(ValidationError::Required {
            field: field.to_string(),
        });
    }

    if name.chars().count() > MAX_NAME_LEN {
        return Err(ValidationError::TooLong {
            field: field.to_string(),
            max: MAX_NAME_LEN,
        });
    }

    Ok(name.to_string())
}

/// Validates the shop's contact phone and returns it as digits only.
///
/// Spaces, dashes, parentheses and a leading `+` are accepted and stripped,
/// since the chat link wants the bare international number.
///
/// ## Example
/// ```rust
/// use slice_core::validation::validate_phone;
///
/// assert_eq!(validate_phone("+54 9 11 5555-0000").unwrap(), "5491155550000");
/// assert!(validate_phone("call me").is_err());
/// ```
pub fn validate_phone(input: &str) -> ValidationResult<String> {
    let input = input.trim();

    if input.is_empty() {
        return Err(ValidationError::Required {
            field: "phone".to_string(),
        });
    }

    let mut digits = String::with_capacity(input.len());
    for (i, c) in input.chars().enumerate() {
        match c {
            '0'..='9' => digits.push(c),
            ' ' | '-' | '(' | ')' => {}
            '+' if i == 0 => {}
            _ => {
                return Err(ValidationError::InvalidFormat {
                    field: "phone".to_string(),
                    reason: "must contain only digits".to_string(),
                })
            }
        }
    }

    if digits.len() < 6 || digits.len() > 15 {
        return Err(ValidationError::InvalidFormat {
            field: "phone".to_string(),
            reason: "must have between 6 and 15 digits".to_string(),
        });
    }

    Ok(digits)
}

// =============================================================================
// Price Validators (strict, admin screen)
// =============================================================================

/// Parses a required, non-negative price.
///
/// ## Rules
/// - Must be present
/// - Must be a number (NaN and garbage rejected)
/// - Must not be negative; zero is allowed (free items)
pub fn parse_price(field: &str, input: &str) -> ValidationResult<Money> {
    let price = Money::parse(input).map_err(|e| match e {
        ParseMoneyError::Empty => ValidationError::Required {
            field: field.to_string(),
        },
        ParseMoneyError::NotANumber(_) | ParseMoneyError::OutOfRange(_) => ValidationError::InvalidFormat {
            field: field.to_string(),
            reason: e.to_string(),
        },
    })?;

    if price.is_negative() {
        return Err(ValidationError::Negative {
            field: field.to_string(),
        });
    }

    Ok(price)
}

/// Parses an optional price, falling back when absent or unreadable.
///
/// This is how the half price works: leave it blank and the half costs
/// the same as the whole.
///
/// ## Example
/// ```rust
/// use slice_core::money::Money;
/// use slice_core::validation::parse_optional_price;
///
/// let whole = Money::from_units(5000);
/// assert_eq!(parse_optional_price("half price", "", whole).unwrap(), whole);
/// assert_eq!(parse_optional_price("half price", "-", whole).unwrap(), whole);
/// assert_eq!(
///     parse_optional_price("half price", "3000", whole).unwrap(),
///     Money::from_units(3000)
/// );
/// assert!(parse_optional_price("half price", "-1", whole).is_err());
/// ```
pub fn parse_optional_price(field: &str, input: &str, fallback: Money) -> ValidationResult<Money> {
    match Money::parse(input) {
        Ok(price) if price.is_negative() => Err(ValidationError::Negative {
            field: field.to_string(),
        }),
        Ok(price) => Ok(price),
        Err(e @ ParseMoneyError::OutOfRange(_)) => Err(ValidationError::InvalidFormat {
            field: field.to_string(),
            reason: e.to_string(),
        }),
        Err(_) => Ok(fallback),
    }
}

/// Validates a surcharge rate in basis points.
///
/// ## Rules
/// - Must be between 0 and 10000 (0% to 100%)
pub fn validate_surcharge_bps(field: &str, bps: u32) -> ValidationResult<()> {
    if bps > 10_000 {
        return Err(ValidationError::InvalidFormat {
            field: field.to_string(),
            reason: "must be between 0 and 10000 basis points".to_string(),
        });
    }

    Ok(())
}

// =============================================================================
// Till Inputs (forgiving)
// =============================================================================

/// Reads a quantity typed into a cart line.
///
/// Anything that is not a whole number reads as 0, which removes the line.
///
/// ## User Workflow
/// ```text
/// ┌─────────────────────────────────────────────────────────────────────────┐
/// │  Cart: edit quantity                                                   │
/// │                                                                         │
/// │  "3"   → 3     line kept with quantity 3                               │
/// │  "0"   → 0     line removed                                            │
/// │  "-2"  → -2    line removed                                            │
/// │  "abc" → 0     line removed                                            │
/// │  "2.5" → 0     line removed                                            │
/// └─────────────────────────────────────────────────────────────────────────┘
/// ```
pub fn parse_quantity_input(input: &str) -> i64 {
    input.trim().parse::<i64>().unwrap_or(0)
}

/// Reads the delivery fee box. Garbage, negative or oversized input reads
/// as zero.
pub fn parse_delivery_fee_input(input: &str) -> Money {
    Money::parse(input)
        .map(Money::clamp_non_negative)
        .unwrap_or_else(|_| Money::zero())
}

/// Parses 1-based ordinals from free-form input into 0-based indices.
///
/// Tokens are separated by commas and/or whitespace. Tokens that are not
/// positive integers, or that point past `len`, are skipped. Order and
/// repeats are preserved: `"2 2"` means the second entry twice.
pub fn parse_ordinals(input: &str, len: usize) -> Vec<usize> {
    input
        .split(|c: char| c == ',' || c.is_whitespace())
        .filter(|token| !token.is_empty())
        .filter_map(|token| token.parse::<usize>().ok())
        .filter(|&ordinal| ordinal >= 1 && ordinal <= len)
        .map(|ordinal| ordinal - 1)
        .collect()
}

/// Reads a yes/no answer. Returns `None` when the answer is neither.
pub fn parse_yes_no(input: &str) -> Option<bool> {
    match input.trim().to_lowercase().as_str() {
        "y" | "yes" | "s" | "si" | "sí" => Some(true),
        "n" | "no" => Some(false),
        _ => None,
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
