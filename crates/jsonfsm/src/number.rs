//! Incremental decimal accumulation for JSON numbers.
//!
//! Digits are folded into binary as they arrive, so a number of any length
//! costs O(1) memory and an overflow is detected at the first digit that
//! causes it.
//!
//! RFC 8259 notes that numbers such as `1E400` or
//! `3.141592653589793238462643383279` suggest the producer expects more
//! magnitude or precision than is widely available. The integer and
//! fraction fields are therefore capped at `2^53`, the largest magnitude an
//! IEEE-754 double holds exactly, and the exponent at the decimal range of
//! a double.

use core::fmt;

/// Ceiling for the integer and fraction accumulators.
pub const MUL_ADD_LIMIT: u64 = 1 << 53;

/// Largest accepted exponent.
pub const MAX_EXPONENT: i32 = 308;

/// Smallest accepted exponent (the decimal exponent of the smallest
/// subnormal double).
pub const MIN_EXPONENT: i32 = -324;

/// A complete JSON number, decoded without buffering its text.
///
/// The value is
/// `(-1)^negative * (integer + fraction / 10^fraction_digits) * 10^exponent`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Number {
    /// A leading `-` was present.
    pub negative: bool,
    /// Magnitude of the integer part.
    pub integer: u64,
    /// Fraction digits read as an integer (`0.05` gives `5`).
    pub fraction: u64,
    /// Number of digits after the decimal point, leading zeros included.
    pub fraction_digits: u32,
    /// Signed decimal exponent.
    pub exponent: i32,
}

impl Number {
    /// Whether the number was written without a fraction or exponent.
    #[must_use]
    pub fn is_integer(&self) -> bool {
        self.fraction_digits == 0 && self.exponent == 0
    }

    /// The value as an `i64`, if it was written as an integer.
    #[must_use]
    pub fn as_i64(&self) -> Option<i64> {
        if !self.is_integer() {
            return None;
        }
        // integer <= 2^53, always in range
        let magnitude = i64::try_from(self.integer).ok()?;
        Some(if self.negative { -magnitude } else { magnitude })
    }
}

/// Canonical decimal text: `-12.05e3`. Zero exponents and empty fractions
/// are omitted.
impl fmt::Display for Number {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.negative {
            f.write_str("-")?;
        }
        write!(f, "{}", self.integer)?;
        if self.fraction_digits > 0 {
            write!(
                f,
                ".{:0width$}",
                self.fraction,
                width = self.fraction_digits as usize
            )?;
        }
        if self.exponent != 0 {
            write!(f, "e{}", self.exponent)?;
        }
        Ok(())
    }
}

/// Which accumulator overflowed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Overflow {
    Integer,
    Fraction,
    Exponent,
}

impl Overflow {
    pub(crate) fn reason(self) -> &'static str {
        match self {
            Overflow::Integer => "Integer Overflow",
            Overflow::Fraction => "Fraction Overflow",
            Overflow::Exponent => "Exponent Overflow",
        }
    }
}

/// `acc * 10 + digit`, or `None` past [`MUL_ADD_LIMIT`].
#[inline]
pub(crate) fn mul_add(acc: u64, digit: u8) -> Option<u64> {
    let value = acc.checked_mul(10)?.checked_add(u64::from(digit))?;
    (value <= MUL_ADD_LIMIT).then_some(value)
}

/// Signed counterpart of [`mul_add`] for the exponent. The sign is applied
/// to every digit so a negative exponent accumulates downwards.
#[inline]
pub(crate) fn mul_add_signed(acc: i32, digit: u8, negative: bool) -> Option<i32> {
    let scaled = acc.checked_mul(10)?;
    let value = if negative {
        scaled.checked_sub(i32::from(digit))?
    } else {
        scaled.checked_add(i32::from(digit))?
    };
    (MIN_EXPONENT..=MAX_EXPONENT)
        .contains(&value)
        .then_some(value)
}

/// Per-number scratch state held by the parser between bytes.
#[derive(Debug, Default)]
pub(crate) struct Accumulator {
    negative: bool,
    integer: u64,
    fraction: u64,
    exponent: i32,
    fraction_digits: u32,
    exponent_negative: bool,
}

impl Accumulator {
    pub(crate) fn set_negative(&mut self) {
        self.negative = true;
    }

    pub(crate) fn set_exponent_negative(&mut self) {
        self.exponent_negative = true;
    }

    pub(crate) fn push_integer(&mut self, digit: u8) -> Result<(), Overflow> {
        self.integer = mul_add(self.integer, digit).ok_or(Overflow::Integer)?;
        Ok(())
    }

    pub(crate) fn push_fraction(&mut self, digit: u8) -> Result<(), Overflow> {
        self.fraction = mul_add(self.fraction, digit).ok_or(Overflow::Fraction)?;
        self.fraction_digits = self
            .fraction_digits
            .checked_add(1)
            .ok_or(Overflow::Fraction)?;
        Ok(())
    }

    pub(crate) fn push_exponent(&mut self, digit: u8) -> Result<(), Overflow> {
        self.exponent = mul_add_signed(self.exponent, digit, self.exponent_negative)
            .ok_or(Overflow::Exponent)?;
        Ok(())
    }

    pub(crate) fn number(&self) -> Number {
        Number {
            negative: self.negative,
            integer: self.integer,
            fraction: self.fraction,
            fraction_digits: self.fraction_digits,
            exponent: self.exponent,
        }
    }

    /// Clears every field, sign first, so the next number starts from zero.
    pub(crate) fn reset(&mut self) {
        self.negative = false;
        self.integer = 0;
        self.fraction = 0;
        self.exponent = 0;
        self.fraction_digits = 0;
        self.exponent_negative = false;
    }
}
