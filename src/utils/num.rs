//! Numeric utilities: reading BSON numbers and the coercion rules of `$inc`/`$mul`.
//!
//! Guidelines
//! - `numeric_value` only recognises real BSON numbers; it is what comparison uses.
//! - `coerce` is lenient: strings are parsed, everything unparsable becomes zero.
//! - Arithmetic keeps integers integral while the result fits, and widens otherwise.

use bson::Bson;

/// A coerced operand for update arithmetic.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Number {
    Int32(i32),
    Int64(i64),
    Double(f64),
}

impl Number {
    const ZERO: Self = Self::Int32(0);

    #[must_use]
    pub fn as_f64(self) -> f64 {
        match self {
            Self::Int32(i) => f64::from(i),
            #[allow(clippy::cast_precision_loss)]
            Self::Int64(i) => i as f64,
            Self::Double(f) => f,
        }
    }

    fn as_i64(self) -> Option<i64> {
        match self {
            Self::Int32(i) => Some(i64::from(i)),
            Self::Int64(i) => Some(i),
            Self::Double(_) => None,
        }
    }

    fn combine(
        self,
        other: Self,
        int_op: fn(i64, i64) -> Option<i64>,
        float_op: fn(f64, f64) -> f64,
    ) -> Self {
        if let (Some(a), Some(b)) = (self.as_i64(), other.as_i64())
            && let Some(r) = int_op(a, b)
        {
            let both_narrow = matches!((self, other), (Self::Int32(_), Self::Int32(_)));
            return match i32::try_from(r) {
                Ok(n) if both_narrow => Self::Int32(n),
                _ => Self::Int64(r),
            };
        }
        Self::Double(float_op(self.as_f64(), other.as_f64()))
    }

    #[must_use]
    pub fn add(self, other: Self) -> Self {
        self.combine(other, i64::checked_add, |a, b| a + b)
    }

    #[must_use]
    pub fn mul(self, other: Self) -> Self {
        self.combine(other, i64::checked_mul, |a, b| a * b)
    }
}

impl From<Number> for Bson {
    fn from(n: Number) -> Self {
        match n {
            Number::Int32(i) => Self::Int32(i),
            Number::Int64(i) => Self::Int64(i),
            Number::Double(f) => Self::Double(f),
        }
    }
}

/// The float value of a BSON number, or `None` for any other kind.
#[must_use]
pub fn numeric_value(v: &Bson) -> Option<f64> {
    match v {
        Bson::Int32(i) => Some(f64::from(*i)),
        #[allow(clippy::cast_precision_loss)]
        Bson::Int64(i) => Some(*i as f64),
        Bson::Double(f) => Some(*f),
        Bson::Decimal128(d) => d.to_string().parse::<f64>().ok(),
        _ => None,
    }
}

/// Coerce any value to a number; missing, unparsable or non-numeric input is zero.
#[must_use]
pub fn coerce(v: Option<&Bson>) -> Number {
    let n = match v {
        Some(Bson::Int32(i)) => Number::Int32(*i),
        Some(Bson::Int64(i)) => Number::Int64(*i),
        Some(Bson::String(s)) => parse_numeric_str(s),
        Some(other) => numeric_value(other).map_or(Number::ZERO, Number::Double),
        None => Number::ZERO,
    };
    match n {
        Number::Double(f) if f.is_nan() => Number::ZERO,
        other => other,
    }
}

/// Read a string the way a JavaScript `Number()` cast does.
///
/// Accepts decimal literals, unsigned `0x`/`0o`/`0b` integers and the exact
/// spellings `Infinity`, `+Infinity` and `-Infinity`. Anything else is zero.
fn parse_numeric_str(s: &str) -> Number {
    let t = s.trim();
    match t {
        "" => return Number::ZERO,
        "Infinity" | "+Infinity" => return Number::Double(f64::INFINITY),
        "-Infinity" => return Number::Double(f64::NEG_INFINITY),
        _ => {}
    }
    let radix = match t.get(..2) {
        Some("0x" | "0X") => Some(16),
        Some("0o" | "0O") => Some(8),
        Some("0b" | "0B") => Some(2),
        _ => None,
    };
    if let Some(radix) = radix {
        return parse_radix(&t[2..], radix).map_or(Number::ZERO, Number::Double);
    }
    let unsigned = t.strip_prefix(['+', '-']).unwrap_or(t);
    if !unsigned.starts_with(|c: char| c.is_ascii_digit() || c == '.') {
        return Number::ZERO;
    }
    t.parse::<f64>().map_or(Number::ZERO, Number::Double)
}

fn parse_radix(digits: &str, radix: u32) -> Option<f64> {
    if digits.is_empty() {
        return None;
    }
    digits
        .chars()
        .try_fold(0.0_f64, |acc, c| c.to_digit(radix).map(|d| acc * f64::from(radix) + f64::from(d)))
}
