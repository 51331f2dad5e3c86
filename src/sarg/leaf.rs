use std::{fmt, str::FromStr};

use chrono::{NaiveDate, NaiveDateTime};
use num_bigint::BigInt;

use crate::error::SargError;

/// Operator carried by a search-argument leaf.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PredicateOperator {
    /// `column = literal`.
    Equals,
    /// `column <=> literal`, where two NULLs compare equal.
    NullSafeEquals,
    /// `column < literal`.
    LessThan,
    /// `column <= literal`.
    LessThanEquals,
    /// `column IN (literals...)`.
    In,
    /// `column BETWEEN lower AND upper`, both ends inclusive.
    Between,
    /// `column IS NULL`.
    IsNull,
}

impl PredicateOperator {
    /// Tag naming the operator in the source engine.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            PredicateOperator::Equals => "EQUALS",
            PredicateOperator::NullSafeEquals => "NULL_SAFE_EQUALS",
            PredicateOperator::LessThan => "LESS_THAN",
            PredicateOperator::LessThanEquals => "LESS_THAN_EQUALS",
            PredicateOperator::In => "IN",
            PredicateOperator::Between => "BETWEEN",
            PredicateOperator::IsNull => "IS_NULL",
        }
    }
}

impl fmt::Display for PredicateOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PredicateOperator {
    type Err = SargError;

    fn from_str(tag: &str) -> Result<Self, Self::Err> {
        match tag {
            "EQUALS" => Ok(PredicateOperator::Equals),
            "NULL_SAFE_EQUALS" => Ok(PredicateOperator::NullSafeEquals),
            "LESS_THAN" => Ok(PredicateOperator::LessThan),
            "LESS_THAN_EQUALS" => Ok(PredicateOperator::LessThanEquals),
            "IN" => Ok(PredicateOperator::In),
            "BETWEEN" => Ok(PredicateOperator::Between),
            "IS_NULL" => Ok(PredicateOperator::IsNull),
            other => Err(SargError::unsupported_operator(other)),
        }
    }
}

/// Declared value type of a search-argument leaf.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PredicateType {
    /// Any integral column; literals are 64-bit.
    Long,
    /// Any floating-point column; literals are 64-bit.
    Float,
    /// Character columns.
    String,
    /// Calendar date.
    Date,
    /// Fixed-point decimal.
    Decimal,
    /// Zone-less timestamp.
    Timestamp,
    /// Boolean column.
    Boolean,
}

impl PredicateType {
    /// Tag naming the type in the source engine.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            PredicateType::Long => "LONG",
            PredicateType::Float => "FLOAT",
            PredicateType::String => "STRING",
            PredicateType::Date => "DATE",
            PredicateType::Decimal => "DECIMAL",
            PredicateType::Timestamp => "TIMESTAMP",
            PredicateType::Boolean => "BOOLEAN",
        }
    }
}

impl fmt::Display for PredicateType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PredicateType {
    type Err = SargError;

    fn from_str(tag: &str) -> Result<Self, Self::Err> {
        match tag {
            "LONG" => Ok(PredicateType::Long),
            "FLOAT" => Ok(PredicateType::Float),
            "STRING" => Ok(PredicateType::String),
            "DATE" => Ok(PredicateType::Date),
            "DECIMAL" => Ok(PredicateType::Decimal),
            "TIMESTAMP" => Ok(PredicateType::Timestamp),
            "BOOLEAN" => Ok(PredicateType::Boolean),
            other => Err(SargError::UnsupportedType {
                type_name: other.to_owned(),
            }),
        }
    }
}

/// Fixed-point decimal exactly as the source engine stores it.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct RawDecimal {
    /// Digits without the decimal point.
    pub unscaled: BigInt,
    /// Number of digits right of the decimal point.
    pub scale: i64,
}

impl RawDecimal {
    /// Creates a decimal worth `unscaled * 10^-scale`.
    #[must_use]
    pub fn new<U>(unscaled: U, scale: i64) -> Self
    where
        U: Into<BigInt>,
    {
        Self {
            unscaled: unscaled.into(),
            scale,
        }
    }
}

/// Literal payload stored on a leaf, before any normalization.
///
/// Equality compares floats by bit pattern, so `0.0` and `-0.0` are distinct
/// leaves and a NaN operand equals itself.
#[derive(Clone, Debug)]
pub enum RawLiteral {
    /// Integral value.
    Long(i64),
    /// Boolean value.
    Boolean(bool),
    /// String value.
    String(String),
    /// Floating-point value.
    Float(f64),
    /// Calendar date.
    Date(NaiveDate),
    /// Zone-less timestamp with nanosecond storage.
    Timestamp(NaiveDateTime),
    /// Fixed-point decimal.
    Decimal(RawDecimal),
}

impl RawLiteral {
    /// Name of the variant, used in diagnostics.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            RawLiteral::Long(_) => "long",
            RawLiteral::Boolean(_) => "boolean",
            RawLiteral::String(_) => "string",
            RawLiteral::Float(_) => "float",
            RawLiteral::Date(_) => "date",
            RawLiteral::Timestamp(_) => "timestamp",
            RawLiteral::Decimal(_) => "decimal",
        }
    }
}

impl PartialEq for RawLiteral {
    fn eq(&self, other: &Self) -> bool {
        use RawLiteral::*;
        match (self, other) {
            (Long(lhs), Long(rhs)) => lhs == rhs,
            (Boolean(lhs), Boolean(rhs)) => lhs == rhs,
            (String(lhs), String(rhs)) => lhs == rhs,
            (Float(lhs), Float(rhs)) => lhs.to_bits() == rhs.to_bits(),
            (Date(lhs), Date(rhs)) => lhs == rhs,
            (Timestamp(lhs), Timestamp(rhs)) => lhs == rhs,
            (Decimal(lhs), Decimal(rhs)) => lhs == rhs,
            _ => false,
        }
    }
}

impl From<i64> for RawLiteral {
    fn from(value: i64) -> Self {
        RawLiteral::Long(value)
    }
}

impl From<bool> for RawLiteral {
    fn from(value: bool) -> Self {
        RawLiteral::Boolean(value)
    }
}

impl From<String> for RawLiteral {
    fn from(value: String) -> Self {
        RawLiteral::String(value)
    }
}

impl From<&str> for RawLiteral {
    fn from(value: &str) -> Self {
        RawLiteral::String(value.to_owned())
    }
}

impl From<f64> for RawLiteral {
    fn from(value: f64) -> Self {
        RawLiteral::Float(value)
    }
}

impl From<NaiveDate> for RawLiteral {
    fn from(value: NaiveDate) -> Self {
        RawLiteral::Date(value)
    }
}

impl From<NaiveDateTime> for RawLiteral {
    fn from(value: NaiveDateTime) -> Self {
        RawLiteral::Timestamp(value)
    }
}

impl From<RawDecimal> for RawLiteral {
    fn from(value: RawDecimal) -> Self {
        RawLiteral::Decimal(value)
    }
}

/// Read access to a search-argument leaf.
///
/// `raw_literal` and `raw_literal_list` must hand back the value exactly as it
/// was stored on the leaf. Implementations backed by a host type that caches
/// converted literals (for example timestamps collapsed to milliseconds) must
/// expose the original value instead of the cache.
pub trait PredicateLeaf {
    /// Column the leaf tests.
    fn column_name(&self) -> &str;

    /// Comparison, membership or null-check operator.
    fn operator(&self) -> PredicateOperator;

    /// Declared type of the literal operand(s).
    fn literal_type(&self) -> PredicateType;

    /// Single literal operand; `None` for list and null-check operators.
    fn raw_literal(&self) -> Option<&RawLiteral>;

    /// Literal list operand; present for `IN` and `BETWEEN`.
    fn raw_literal_list(&self) -> Option<&[RawLiteral]>;
}

/// Owned search-argument leaf.
#[derive(Clone, Debug, PartialEq)]
pub struct LeafPredicate {
    operator: PredicateOperator,
    column: String,
    literal_type: PredicateType,
    literal: Option<RawLiteral>,
    literal_list: Option<Vec<RawLiteral>>,
}

impl LeafPredicate {
    /// Creates a leaf without operands.
    #[must_use]
    pub fn new<C>(operator: PredicateOperator, column: C, literal_type: PredicateType) -> Self
    where
        C: Into<String>,
    {
        Self {
            operator,
            column: column.into(),
            literal_type,
            literal: None,
            literal_list: None,
        }
    }

    /// Sets the single literal operand.
    #[must_use]
    pub fn with_literal<V>(mut self, literal: V) -> Self
    where
        V: Into<RawLiteral>,
    {
        self.literal = Some(literal.into());
        self
    }

    /// Sets the literal list operand.
    #[must_use]
    pub fn with_literal_list<I>(mut self, literals: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<RawLiteral>,
    {
        self.literal_list = Some(literals.into_iter().map(Into::into).collect());
        self
    }
}

impl PredicateLeaf for LeafPredicate {
    fn column_name(&self) -> &str {
        &self.column
    }

    fn operator(&self) -> PredicateOperator {
        self.operator
    }

    fn literal_type(&self) -> PredicateType {
        self.literal_type
    }

    fn raw_literal(&self) -> Option<&RawLiteral> {
        self.literal.as_ref()
    }

    fn raw_literal_list(&self) -> Option<&[RawLiteral]> {
        self.literal_list.as_deref()
    }
}

impl<T> PredicateLeaf for &T
where
    T: PredicateLeaf + ?Sized,
{
    fn column_name(&self) -> &str {
        (**self).column_name()
    }

    fn operator(&self) -> PredicateOperator {
        (**self).operator()
    }

    fn literal_type(&self) -> PredicateType {
        (**self).literal_type()
    }

    fn raw_literal(&self) -> Option<&RawLiteral> {
        (**self).raw_literal()
    }

    fn raw_literal_list(&self) -> Option<&[RawLiteral]> {
        (**self).raw_literal_list()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn operator_tags_round_trip() {
        for op in [
            PredicateOperator::Equals,
            PredicateOperator::NullSafeEquals,
            PredicateOperator::LessThan,
            PredicateOperator::LessThanEquals,
            PredicateOperator::In,
            PredicateOperator::Between,
            PredicateOperator::IsNull,
        ] {
            assert_eq!(op.to_string().parse::<PredicateOperator>(), Ok(op));
        }
        assert_eq!(
            "GREATER_THAN".parse::<PredicateOperator>(),
            Err(SargError::UnsupportedOperator {
                operator: "GREATER_THAN".to_owned()
            })
        );
    }

    #[test]
    fn type_tags_reject_unknown_names() {
        assert_eq!("DECIMAL".parse::<PredicateType>(), Ok(PredicateType::Decimal));
        assert_eq!(PredicateType::Timestamp.to_string(), "TIMESTAMP");
        assert_eq!(
            "INTERVAL".parse::<PredicateType>(),
            Err(SargError::UnsupportedType {
                type_name: "INTERVAL".to_owned()
            })
        );
    }

    #[test]
    fn leaf_predicate_exposes_stored_operands() {
        let leaf = LeafPredicate::new(PredicateOperator::In, "city", PredicateType::String)
            .with_literal_list(["a", "b"]);
        assert_eq!(leaf.column_name(), "city");
        assert_eq!(leaf.operator(), PredicateOperator::In);
        assert_eq!(leaf.literal_type(), PredicateType::String);
        assert_eq!(leaf.raw_literal(), None);
        assert_eq!(
            leaf.raw_literal_list(),
            Some(&[RawLiteral::from("a"), RawLiteral::from("b")][..])
        );

        let by_ref = &leaf;
        assert_eq!(PredicateLeaf::column_name(&by_ref), "city");
    }

    #[test]
    fn raw_literal_kinds() {
        assert_eq!(RawLiteral::from(1i64).kind(), "long");
        assert_eq!(RawLiteral::from(RawDecimal::new(5, 1)).kind(), "decimal");
        let date = NaiveDate::from_ymd_opt(2020, 1, 1).expect("date");
        assert_eq!(RawLiteral::from(date).kind(), "date");
    }

    #[test]
    fn raw_floats_compare_by_bits() {
        assert_ne!(RawLiteral::from(0.0f64), RawLiteral::from(-0.0f64));
        assert_eq!(RawLiteral::from(f64::NAN), RawLiteral::from(f64::NAN));
        assert_eq!(RawLiteral::from(1.5f64), RawLiteral::from(1.5f64));
        assert_ne!(RawLiteral::from(1i64), RawLiteral::from(1.0f64));
    }
}
