use std::{cmp::Ordering, fmt};

use arrow::datatypes::{DataType, TimeUnit, DECIMAL128_MAX_PRECISION, DECIMAL256_MAX_PRECISION};
use bigdecimal::BigDecimal;

/// Typed literal operand of a pushdown expression.
///
/// Dates and timestamps are already normalized to their integer encodings.
#[derive(Clone, Debug)]
pub enum Literal {
    /// Signed 64-bit integer.
    Long(i64),
    /// Boolean literal.
    Boolean(bool),
    /// UTF-8 string.
    String(String),
    /// 32-bit floating point.
    Float(f32),
    /// 64-bit floating point.
    Double(f64),
    /// Days since 1970-01-01.
    Date(i32),
    /// Microseconds since 1970-01-01T00:00:00.
    Timestamp(i64),
    /// Arbitrary-precision decimal carrying its own scale.
    Decimal(BigDecimal),
}

impl Literal {
    /// Arrow type this literal maps onto.
    ///
    /// Returns `None` for decimals whose precision or scale exceed what Arrow
    /// decimals can hold.
    #[must_use]
    pub fn data_type(&self) -> Option<DataType> {
        match self {
            Literal::Long(_) => Some(DataType::Int64),
            Literal::Boolean(_) => Some(DataType::Boolean),
            Literal::String(_) => Some(DataType::Utf8),
            Literal::Float(_) => Some(DataType::Float32),
            Literal::Double(_) => Some(DataType::Float64),
            Literal::Date(_) => Some(DataType::Date32),
            Literal::Timestamp(_) => Some(DataType::Timestamp(TimeUnit::Microsecond, None)),
            Literal::Decimal(value) => decimal_data_type(value),
        }
    }

    /// Scale of a decimal literal; `None` for every other kind.
    #[must_use]
    pub fn scale(&self) -> Option<i64> {
        match self {
            Literal::Decimal(value) => Some(value.as_bigint_and_exponent().1),
            _ => None,
        }
    }

    /// Compares two literals of the same kind.
    pub fn compare(&self, other: &Self) -> Option<Ordering> {
        use Literal::*;
        match (self, other) {
            (Long(lhs), Long(rhs)) => Some(lhs.cmp(rhs)),
            (Boolean(lhs), Boolean(rhs)) => Some(lhs.cmp(rhs)),
            (String(lhs), String(rhs)) => Some(lhs.cmp(rhs)),
            (Float(lhs), Float(rhs)) => lhs.partial_cmp(rhs),
            (Double(lhs), Double(rhs)) => lhs.partial_cmp(rhs),
            (Date(lhs), Date(rhs)) => Some(lhs.cmp(rhs)),
            (Timestamp(lhs), Timestamp(rhs)) => Some(lhs.cmp(rhs)),
            (Decimal(lhs), Decimal(rhs)) => Some(lhs.cmp(rhs)),
            _ => None,
        }
    }
}

fn decimal_data_type(value: &BigDecimal) -> Option<DataType> {
    let (unscaled, scale) = value.as_bigint_and_exponent();
    let scale = i8::try_from(scale).ok()?;
    let digits = unscaled.to_string().trim_start_matches('-').len();
    let precision = u8::try_from(digits.max(usize::from(scale.max(0).unsigned_abs()))).ok()?;
    if precision <= DECIMAL128_MAX_PRECISION {
        Some(DataType::Decimal128(precision, scale))
    } else if precision <= DECIMAL256_MAX_PRECISION {
        Some(DataType::Decimal256(precision, scale))
    } else {
        None
    }
}

impl PartialEq for Literal {
    fn eq(&self, other: &Self) -> bool {
        use Literal::*;
        match (self, other) {
            // Bitwise so that NaN literals still compare equal to themselves.
            (Float(lhs), Float(rhs)) => lhs.to_bits() == rhs.to_bits(),
            (Double(lhs), Double(rhs)) => lhs.to_bits() == rhs.to_bits(),
            // Scale is part of a decimal literal: 1.00 and 1 are different operands.
            (Decimal(lhs), Decimal(rhs)) => {
                lhs.as_bigint_and_exponent() == rhs.as_bigint_and_exponent()
            }
            _ => self.compare(other) == Some(Ordering::Equal),
        }
    }
}

impl fmt::Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Literal::Long(value) => write!(f, "{value}"),
            Literal::Boolean(value) => write!(f, "{value}"),
            Literal::String(value) => write!(f, "\"{value}\""),
            Literal::Float(value) => write!(f, "{value}"),
            Literal::Double(value) => write!(f, "{value}"),
            Literal::Date(days) => write!(f, "date({days})"),
            Literal::Timestamp(micros) => write!(f, "timestamp({micros})"),
            Literal::Decimal(value) => write!(f, "{value}"),
        }
    }
}

impl From<i64> for Literal {
    fn from(value: i64) -> Self {
        Literal::Long(value)
    }
}

impl From<bool> for Literal {
    fn from(value: bool) -> Self {
        Literal::Boolean(value)
    }
}

impl From<String> for Literal {
    fn from(value: String) -> Self {
        Literal::String(value)
    }
}

impl From<&str> for Literal {
    fn from(value: &str) -> Self {
        Literal::String(value.to_owned())
    }
}

impl From<f32> for Literal {
    fn from(value: f32) -> Self {
        Literal::Float(value)
    }
}

impl From<f64> for Literal {
    fn from(value: f64) -> Self {
        Literal::Double(value)
    }
}

impl From<BigDecimal> for Literal {
    fn from(value: BigDecimal) -> Self {
        Literal::Decimal(value)
    }
}
