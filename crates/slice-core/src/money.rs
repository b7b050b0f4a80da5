//! # Money Module
//!
//! Provides the `Money` type for handling monetary values safely.
//!
//! ## Why Decimal Money?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  THE FLOATING POINT PROBLEM                                             │
//! │                                                                         │
//! │  In floating point:                                                     │
//! │    0.1 + 0.2 = 0.30000000000000004  ❌ WRONG!                           │
//! │    NaN + 5000 = NaN                 ❌ poisons every total              │
//! │                                                                         │
//! │  Surcharges need more precision than the till shows:                   │
//! │    (8000 + 1000) × 5% = 450         ✅ exact                            │
//! │    (8333 + 0)    × 5% = 416.65      → shown as 417, kept as 416.65     │
//! │                                                                         │
//! │  OUR SOLUTION: rust_decimal                                             │
//! │    Exact base-10 arithmetic, no NaN, rounded ONCE at presentation      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use slice_core::money::Money;
//!
//! let price = Money::from_units(5000);
//! let doubled = price.multiply_quantity(2);
//! assert_eq!(doubled, Money::from_units(10000));
//!
//! // Operator input is parsed at the boundary; garbage never becomes money.
//! assert!(Money::parse("abc").is_err());
//! assert!(Money::parse("NaN").is_err());
//! ```

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Sub};
use std::str::FromStr;

use thiserror::Error;

use crate::types::SurchargeRate;
use crate::MAX_AMOUNT_UNITS;

// =============================================================================
// Money Type
// =============================================================================

/// A monetary amount in the shop's currency.
///
/// ## Design Decisions
/// - **Decimal, not f64**: NaN and binary fractions cannot exist
/// - **Signed**: only so `Sub` is total; every amount the engine produces is
///   non-negative
/// - **Full precision**: nothing rounds until [`Money::round_for_display`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Money(Decimal);

impl Money {
    /// Creates a Money value from whole currency units.
    ///
    /// ## Example
    /// ```rust
    /// use slice_core::money::Money;
    ///
    /// let price = Money::from_units(12000);
    /// assert_eq!(price.to_string(), "12000");
    /// ```
    #[inline]
    pub fn from_units(units: i64) -> Self {
        Money(Decimal::from(units))
    }

    /// Parses operator or document input.
    ///
    /// ## Rules
    /// - Surrounding whitespace is ignored
    /// - Plain decimal (`"3000"`, `"12.50"`) or scientific (`"1e3"`) notation
    /// - Empty, NaN, infinite or non-numeric input is rejected
    /// - Magnitude above [`MAX_AMOUNT_UNITS`] is rejected
    ///
    /// Sign is NOT checked here; callers decide whether negatives are allowed.
    ///
    /// ## Example
    /// ```rust
    /// use slice_core::money::{Money, ParseMoneyError};
    ///
    /// assert_eq!(Money::parse(" 1e3 ").unwrap(), Money::from_units(1000));
    /// assert!(matches!(Money::parse("1e20"), Err(ParseMoneyError::OutOfRange(_))));
    /// ```
    pub fn parse(input: &str) -> Result<Self, ParseMoneyError> {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return Err(ParseMoneyError::Empty);
        }

        let amount = Decimal::from_str(trimmed)
            .or_else(|_| Decimal::from_scientific(trimmed))
            .map_err(|_| ParseMoneyError::NotANumber(trimmed.to_string()))?;

        if amount.abs() > Decimal::from(MAX_AMOUNT_UNITS) {
            return Err(ParseMoneyError::OutOfRange(trimmed.to_string()));
        }

        Ok(Money(amount.normalize()))
    }

    /// Returns the exact decimal amount.
    #[inline]
    pub const fn amount(&self) -> Decimal {
        self.0
    }

    /// Returns zero money value.
    #[inline]
    pub const fn zero() -> Self {
        Money(Decimal::ZERO)
    }

    /// Checks if the value is zero.
    #[inline]
    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    /// Checks if the value is positive (greater than zero).
    #[inline]
    pub fn is_positive(&self) -> bool {
        self.0 > Decimal::ZERO
    }

    /// Checks if the value is negative (less than zero).
    #[inline]
    pub fn is_negative(&self) -> bool {
        self.0 < Decimal::ZERO
    }

    /// Clamps negative amounts to zero.
    #[inline]
    pub fn clamp_non_negative(self) -> Self {
        if self.is_negative() {
            Money::zero()
        } else {
            self
        }
    }

    /// Multiplies money by a quantity.
    ///
    /// ## Example
    /// ```rust
    /// use slice_core::money::Money;
    ///
    /// let unit_price = Money::from_units(3000);
    /// assert_eq!(unit_price.multiply_quantity(3), Money::from_units(9000));
    /// ```
    ///
    /// Saturates at the decimal range instead of overflowing.
    #[inline]
    pub fn multiply_quantity(&self, qty: u32) -> Self {
        Money(self.0.saturating_mul(Decimal::from(qty)))
    }

    /// Applies a surcharge rate and returns the surcharge amount, unrounded.
    ///
    /// ## Implementation
    /// `amount × bps / 10000`, exact in decimal. No rounding happens here:
    /// the till rounds once, when the total is shown.
    ///
    /// ## Example
    /// ```rust
    /// use slice_core::money::Money;
    /// use slice_core::types::SurchargeRate;
    ///
    /// let base = Money::from_units(9000);
    /// assert_eq!(base.apply_rate(SurchargeRate::from_bps(1000)), Money::from_units(900));
    ///
    /// let odd = Money::from_units(8333);
    /// assert_eq!(odd.apply_rate(SurchargeRate::from_bps(500)).to_string(), "416.65");
    /// ```
    pub fn apply_rate(&self, rate: SurchargeRate) -> Money {
        let factor = Decimal::from(rate.bps()) / Decimal::from(10_000);
        Money(self.0.saturating_mul(factor).normalize())
    }

    /// Rounds to the currency's minor-unit convention for display.
    ///
    /// Half-way values round away from zero (8332.5 → 8333), the way a
    /// cashier rounds. `decimals = 0` for currencies without cents.
    pub fn round_for_display(&self, decimals: u32) -> Money {
        Money(
            self.0
                .round_dp_with_strategy(decimals, RoundingStrategy::MidpointAwayFromZero),
        )
    }
}

// =============================================================================
// Parse Error
// =============================================================================

/// Why a piece of text is not a money amount.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseMoneyError {
    #[error("no amount given")]
    Empty,

    #[error("'{0}' is not a number")]
    NotANumber(String),

    #[error("'{0}' is larger than any amount the till accepts")]
    OutOfRange(String),
}

// =============================================================================
// Currency Formatting
// =============================================================================

/// How amounts are written on messages and tickets.
///
/// ## Example
/// ```rust
/// use slice_core::money::{CurrencyFormat, Money};
///
/// let ars = CurrencyFormat::new("$", 0);
/// assert_eq!(ars.format(Money::from_units(9900)), "$9900");
///
/// let usd = CurrencyFormat::new("$", 2);
/// assert_eq!(usd.format(Money::parse("12.5").unwrap()), "$12.50");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CurrencyFormat {
    pub symbol: String,
    pub decimals: u32,
}

impl CurrencyFormat {
    pub fn new(symbol: impl Into<String>, decimals: u32) -> Self {
        CurrencyFormat {
            symbol: symbol.into(),
            decimals,
        }
    }

    /// Rounds for display and renders with the currency symbol.
    pub fn format(&self, money: Money) -> String {
        let rounded = money.round_for_display(self.decimals).amount();
        let sign = if rounded.is_sign_negative() && !rounded.is_zero() {
            "-"
        } else {
            ""
        };
        format!(
            "{}{}{:.prec$}",
            sign,
            self.symbol,
            rounded.abs(),
            prec = self.decimals as usize
        )
    }
}

impl Default for CurrencyFormat {
    fn default() -> Self {
        CurrencyFormat::new("$", 0)
    }
}

// =============================================================================
// Trait Implementations
// =============================================================================

/// Shows the exact amount without trailing zeros (debugging and logs).
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.normalize())
    }
}

impl Default for Money {
    fn default() -> Self {
        Money::zero()
    }
}

// Arithmetic saturates at the decimal range. Parsed amounts are bounded far
// below it, so saturation only shows up on absurd quantities.
impl Add for Money {
    type Output = Self;

    #[inline]
    fn add(self, other: Self) -> Self {
        Money(self.0.saturating_add(other.0))
    }
}

impl AddAssign for Money {
    #[inline]
    fn add_assign(&mut self, other: Self) {
        self.0 = self.0.saturating_add(other.0);
    }
}

impl Sub for Money {
    type Output = Self;

    #[inline]
    fn sub(self, other: Self) -> Self {
        Money(self.0.saturating_sub(other.0))
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Self {
        iter.fold(Money::zero(), |acc, m| acc + m)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
