//! Fixed-point decimal values
//!
//! Z-Wave transports scaled readings as a raw integer plus a precision
//! exponent (the number of digits after the decimal point). The value is kept
//! in that form so nothing is lost to binary floating point.

use std::fmt;
use std::str::FromStr;

use crate::error::Error;

/// Largest precision the 3-bit precision field can carry
pub const MAX_PRECISION: u8 = 7;

/// A scaled integer: `mantissa / 10^precision`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Decimal {
    mantissa: i64,
    precision: u8,
}

impl Decimal {
    /// Create a decimal from a raw integer and a precision exponent
    ///
    /// # Examples
    ///
    /// ```
    /// use zwrust_types::Decimal;
    ///
    /// let value = Decimal::new(439, 1);
    /// assert_eq!(value.to_string(), "43.9");
    /// ```
    pub const fn new(mantissa: i64, precision: u8) -> Self {
        Self { mantissa, precision }
    }

    /// Raw integer as it appeared on the wire
    pub const fn mantissa(&self) -> i64 {
        self.mantissa
    }

    /// Number of digits after the decimal point
    pub const fn precision(&self) -> u8 {
        self.precision
    }

    /// Approximate value as a float
    pub fn to_f64(&self) -> f64 {
        self.mantissa as f64 / 10f64.powi(i32::from(self.precision))
    }

    /// Build a decimal from a float, rounding to `precision` digits
    pub fn from_f64(value: f64, precision: u8) -> Self {
        let precision = precision.min(MAX_PRECISION);
        let mantissa = (value * 10f64.powi(i32::from(precision))).round() as i64;
        Self { mantissa, precision }
    }

    /// Smallest wire size (1, 2 or 4 bytes) able to carry the mantissa
    pub fn wire_size(&self) -> Option<u8> {
        if i8::try_from(self.mantissa).is_ok() {
            Some(1)
        } else if i16::try_from(self.mantissa).is_ok() {
            Some(2)
        } else if i32::try_from(self.mantissa).is_ok() {
            Some(4)
        } else {
            None
        }
    }

    /// Compare numerically, ignoring representation differences
    ///
    /// `4.50` and `4.5` are numerically equal but not `==`.
    pub fn numeric_eq(&self, other: &Decimal) -> bool {
        let shift = self.precision.max(other.precision);
        let lhs = i128::from(self.mantissa) * 10i128.pow(u32::from(shift - self.precision));
        let rhs = i128::from(other.mantissa) * 10i128.pow(u32::from(shift - other.precision));
        lhs == rhs
    }
}

impl fmt::Display for Decimal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.precision == 0 {
            return write!(f, "{}", self.mantissa);
        }

        let divisor = 10u64.pow(u32::from(self.precision));
        let magnitude = self.mantissa.unsigned_abs();
        let sign = if self.mantissa < 0 { "-" } else { "" };

        write!(
            f,
            "{}{}.{:0width$}",
            sign,
            magnitude / divisor,
            magnitude % divisor,
            width = usize::from(self.precision)
        )
    }
}

impl FromStr for Decimal {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let (int_part, frac_part) = match trimmed.split_once('.') {
            Some((i, f)) => (i, f),
            None => (trimmed, ""),
        };

        let precision = u8::try_from(frac_part.len())
            .ok()
            .filter(|p| *p <= MAX_PRECISION)
            .ok_or_else(|| Error::Parse(format!("too many decimal places in {}", s)))?;

        let digits = format!("{}{}", int_part, frac_part);
        let mantissa = digits
            .parse::<i64>()
            .map_err(|e| Error::Parse(format!("{}: {}", s, e)))?;

        Ok(Self { mantissa, precision })
    }
}
