use crate::domain::operator::Operator;
use crate::error::CalculatorError;
use bigdecimal::num_bigint::BigInt;
use bigdecimal::{BigDecimal, RoundingMode, Signed, Zero};
use serde::{Deserialize, Serialize};
use std::num::NonZeroU64;
use std::str::FromStr;

/// Upper bound accepted for a configured precision.
pub const MAX_SIGNIFICANT_DIGITS: u32 = 1000;

/// Largest decimal exponent a value may carry, in either direction.
pub const MAX_EXPONENT: i64 = 999_999;

/// Number of significant digits kept by arithmetic results.
///
/// Rounding is half-even, so chained operations never drift through binary
/// floating point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub struct Precision(u32);

impl Precision {
    pub const DEFAULT: Self = Self(20);

    pub fn new(digits: u32) -> Result<Self, CalculatorError> {
        if (1..=MAX_SIGNIFICANT_DIGITS).contains(&digits) {
            Ok(Self(digits))
        } else {
            Err(CalculatorError::InvalidPrecision(digits))
        }
    }

    pub fn digits(&self) -> u32 {
        self.0
    }

    /// Rounds `value` to this precision, leaving shorter values untouched.
    pub fn round(&self, value: BigDecimal) -> BigDecimal {
        match NonZeroU64::new(u64::from(self.0)) {
            Some(prec) if value.digits() > prec.get() => {
                value.with_precision_round(prec, RoundingMode::HalfEven)
            }
            _ => value,
        }
    }
}

impl Default for Precision {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl TryFrom<u32> for Precision {
    type Error = CalculatorError;

    fn try_from(digits: u32) -> Result<Self, Self::Error> {
        Self::new(digits)
    }
}

impl From<Precision> for u32 {
    fn from(precision: Precision) -> Self {
        precision.0
    }
}

/// Parses a decimal operand without going through binary floating point.
///
/// Accepts plain (`"12.50"`) and scientific (`"1.5e3"`) notation; the
/// original text is kept in the error for the caller.
pub fn parse_operand(raw: &str) -> Result<BigDecimal, CalculatorError> {
    BigDecimal::from_str(raw.trim()).map_err(|_| CalculatorError::InvalidOperand(raw.to_string()))
}

// Exponent of the leading digit: 1234.5 -> 3, 0.001 -> -3
fn adjusted_exponent(value: &BigDecimal) -> i64 {
    let (_, scale) = value.as_bigint_and_exponent();
    value.digits() as i64 - 1 - scale
}

fn check_range(value: BigDecimal) -> Result<BigDecimal, CalculatorError> {
    if value.is_zero() || adjusted_exponent(&value).abs() <= MAX_EXPONENT {
        Ok(value)
    } else {
        Err(CalculatorError::Overflow)
    }
}

/// Divides `lhs` by a non-zero `rhs`, rounding the exact quotient once.
///
/// Exact quotients keep the smallest scale not below `lhs.scale - rhs.scale`
/// (`10 / 4 = 2.5`, `10 / 2 = 5`). Inexact ones are computed one digit past
/// the precision plus a sticky digit, so half-even never sees a false tie.
fn divide(lhs: &BigDecimal, rhs: &BigDecimal, precision: Precision) -> BigDecimal {
    let (lhs_int, lhs_scale) = lhs.as_bigint_and_exponent();
    let (rhs_int, rhs_scale) = rhs.as_bigint_and_exponent();
    let ideal_scale = lhs_scale - rhs_scale;

    if lhs_int.is_zero() {
        return BigDecimal::new(BigInt::zero(), ideal_scale.max(0));
    }

    let negative = lhs_int.is_negative() != rhs_int.is_negative();
    let shift = (u64::from(precision.digits()) + rhs.digits() + 1).saturating_sub(lhs.digits());
    let ten = BigInt::from(10u8);
    let scaled = lhs_int.abs() * ten.pow(shift as u32);
    let divisor = rhs_int.abs();

    let quotient = &scaled / &divisor;
    let remainder = &scaled % &divisor;
    let mut scale = ideal_scale + shift as i64;

    let mut digits = if remainder.is_zero() {
        let mut exact = quotient;
        while scale > ideal_scale && (&exact % &ten).is_zero() {
            exact /= &ten;
            scale -= 1;
        }
        exact
    } else {
        scale += 1;
        quotient * &ten + BigInt::from(1u8)
    };
    if negative {
        digits = -digits;
    }

    precision.round(BigDecimal::new(digits, scale))
}

/// Running state of one calculator session.
///
/// The operator supplied with a call is held back and applied against the
/// operand of the *next* call. `=` finalizes: the total is returned and the
/// state is cleared.
#[derive(Debug, Clone, PartialEq)]
pub struct AccumulatorState {
    pending: Option<Operator>,
    current: BigDecimal,
    precision: Precision,
}

impl Default for AccumulatorState {
    fn default() -> Self {
        Self::new(Precision::DEFAULT)
    }
}

impl AccumulatorState {
    pub fn new(precision: Precision) -> Self {
        Self {
            pending: None,
            current: BigDecimal::zero(),
            precision,
        }
    }

    pub fn pending(&self) -> Option<&Operator> {
        self.pending.as_ref()
    }

    pub fn current(&self) -> &BigDecimal {
        &self.current
    }

    pub fn precision(&self) -> Precision {
        self.precision
    }

    /// Clears the pending operator and zeroes the running value.
    pub fn reset(&mut self) -> String {
        self.pending = None;
        self.current = BigDecimal::zero();
        self.current.to_string()
    }

    /// Feeds one `(op, operand)` pair into the accumulator.
    ///
    /// On error nothing is mutated, so the session stays usable and the next
    /// call sees the same state as the failed one did.
    pub fn apply(&mut self, op: &str, operand: &str) -> Result<String, CalculatorError> {
        let num = check_range(parse_operand(operand)?)?;
        let next = Operator::parse(op);

        let current = match &self.pending {
            Some(pending) => check_range(self.evaluate(pending, num)?)?,
            None => num,
        };

        let finalize = next.as_ref().is_some_and(Operator::is_equals);
        self.current = current;
        self.pending = next;

        let result = self.current.to_string();
        if finalize {
            self.reset();
        }
        Ok(result)
    }

    fn evaluate(&self, op: &Operator, num: BigDecimal) -> Result<BigDecimal, CalculatorError> {
        let lhs = &self.current;
        let raw = match op {
            Operator::Add => lhs + &num,
            Operator::Subtract => lhs - &num,
            Operator::Multiply => lhs * &num,
            Operator::Divide => {
                if num.is_zero() {
                    return Err(CalculatorError::DivisionByZero);
                }
                return Ok(divide(lhs, &num, self.precision));
            }
            // `=` never stays pending past a call; both fall through untouched
            Operator::Equals | Operator::Unrecognized(_) => return Ok(lhs.clone()),
        };
        Ok(self.precision.round(raw))
    }
}
