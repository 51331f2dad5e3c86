//! Normalization of stored leaf literals into pushdown literals.
//!
//! Dates become epoch days through calendar arithmetic, timestamps become
//! epoch microseconds computed from whole seconds plus sub-second digits, and
//! decimals keep their stored scale. Nothing passes through a millisecond or
//! floating-point intermediate.

use arrow::datatypes::Date32Type;
use bigdecimal::BigDecimal;
use chrono::{NaiveDate, NaiveDateTime};

use crate::{
    error::{Result, SargError},
    expr::Literal,
    sarg::{PredicateLeaf, PredicateType, RawDecimal, RawLiteral},
};

/// Normalizes the single literal operand of `leaf`.
pub(crate) fn leaf_to_literal<L>(leaf: &L) -> Result<Literal>
where
    L: PredicateLeaf + ?Sized,
{
    let raw = leaf.raw_literal().ok_or_else(|| {
        SargError::extraction(
            leaf.column_name(),
            format!("{} leaf carries no literal", leaf.operator()),
        )
    })?;
    normalize(leaf.column_name(), leaf.literal_type(), raw)
}

/// Normalizes every element of the literal list of `leaf`, keeping order.
pub(crate) fn leaf_to_literal_list<L>(leaf: &L) -> Result<Vec<Literal>>
where
    L: PredicateLeaf + ?Sized,
{
    normalize_all(leaf, raw_literal_list(leaf)?)
}

pub(crate) fn raw_literal_list<L>(leaf: &L) -> Result<&[RawLiteral]>
where
    L: PredicateLeaf + ?Sized,
{
    leaf.raw_literal_list().ok_or_else(|| {
        SargError::extraction(
            leaf.column_name(),
            format!("{} leaf carries no literal list", leaf.operator()),
        )
    })
}

pub(crate) fn normalize_all<L>(leaf: &L, raw: &[RawLiteral]) -> Result<Vec<Literal>>
where
    L: PredicateLeaf + ?Sized,
{
    raw.iter()
        .map(|value| normalize(leaf.column_name(), leaf.literal_type(), value))
        .collect()
}

fn normalize(column: &str, literal_type: PredicateType, raw: &RawLiteral) -> Result<Literal> {
    match (literal_type, raw) {
        (PredicateType::Long, RawLiteral::Long(value)) => Ok(Literal::Long(*value)),
        (PredicateType::Boolean, RawLiteral::Boolean(value)) => Ok(Literal::Boolean(*value)),
        (PredicateType::String, RawLiteral::String(value)) => Ok(Literal::String(value.clone())),
        (PredicateType::Float, RawLiteral::Float(value)) => Ok(Literal::Double(*value)),
        (PredicateType::Date, RawLiteral::Date(date)) => Ok(Literal::Date(days_from_date(*date))),
        // A date stored as a date-time keeps its calendar day; the time of day is dropped.
        (PredicateType::Date, RawLiteral::Timestamp(ts)) => {
            Ok(Literal::Date(days_from_date(ts.date())))
        }
        (PredicateType::Timestamp, RawLiteral::Timestamp(ts)) => {
            Ok(Literal::Timestamp(micros_from_timestamp(ts)))
        }
        (PredicateType::Decimal, RawLiteral::Decimal(decimal)) => {
            Ok(Literal::Decimal(decimal_from_raw(decimal)))
        }
        (expected, found) => Err(SargError::extraction(
            column,
            format!("expected {expected} literal, found {}", found.kind()),
        )),
    }
}

/// Days between 1970-01-01 and `date`.
pub(crate) fn days_from_date(date: NaiveDate) -> i32 {
    Date32Type::from_naive_date(date)
}

/// Microseconds between 1970-01-01T00:00:00 and `ts`, flooring sub-microsecond digits.
///
/// Every representable `NaiveDateTime` fits in an `i64` of microseconds.
pub(crate) fn micros_from_timestamp(ts: &NaiveDateTime) -> i64 {
    ts.and_utc().timestamp_micros()
}

/// Decimal worth `unscaled * 10^-scale`, keeping `scale` as is.
pub(crate) fn decimal_from_raw(decimal: &RawDecimal) -> BigDecimal {
    BigDecimal::new(decimal.unscaled.clone(), decimal.scale)
}

#[cfg(test)]
mod tests {
    use chrono::{DateTime, NaiveDate, NaiveDateTime};

    use super::*;
    use crate::sarg::{LeafPredicate, PredicateOperator};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
    }

    fn timestamp(secs: i64, nanos: u32) -> NaiveDateTime {
        DateTime::from_timestamp(secs, nanos)
            .expect("valid timestamp")
            .naive_utc()
    }

    #[test]
    fn dates_count_calendar_days() {
        assert_eq!(days_from_date(date(1970, 1, 1)), 0);
        assert_eq!(days_from_date(date(1970, 1, 2)), 1);
        assert_eq!(days_from_date(date(1969, 12, 31)), -1);
        assert_eq!(days_from_date(date(2015, 6, 24)), 16610);
    }

    #[test]
    fn timestamps_keep_microseconds() {
        assert_eq!(micros_from_timestamp(&timestamp(0, 0)), 0);
        assert_eq!(
            micros_from_timestamp(&timestamp(1_234, 567_891_000)),
            1_234_567_891
        );
        // Sub-microsecond digits are floored, also before the epoch.
        assert_eq!(micros_from_timestamp(&timestamp(0, 999)), 0);
        assert_eq!(micros_from_timestamp(&timestamp(-1, 999_999_999)), -1);
    }

    #[test]
    fn timestamp_extremes_fit_in_micros() {
        for ts in [NaiveDateTime::MIN, NaiveDateTime::MAX] {
            let micros = micros_from_timestamp(&ts);
            let restored = DateTime::from_timestamp_micros(micros).map(|dt| dt.naive_utc().date());
            assert_eq!(restored, Some(ts.date()));
        }
    }

    #[test]
    fn decimals_keep_their_scale() {
        let value = decimal_from_raw(&RawDecimal::new(12345, 2));
        assert_eq!(value.to_string(), "123.45");
        assert_eq!(value.as_bigint_and_exponent().1, 2);

        let trailing = decimal_from_raw(&RawDecimal::new(1000, 3));
        assert_eq!(trailing.as_bigint_and_exponent().1, 3);
        assert_eq!(trailing.to_string(), "1.000");
    }

    #[test]
    fn date_accepts_date_time_storage() {
        let leaf = LeafPredicate::new(PredicateOperator::Equals, "d", PredicateType::Date)
            .with_literal(date(2020, 2, 29).and_hms_opt(23, 59, 59).expect("time"));
        assert_eq!(
            leaf_to_literal(&leaf),
            Ok(Literal::Date(days_from_date(date(2020, 2, 29))))
        );
    }

    #[test]
    fn mismatched_storage_is_an_extraction_failure() {
        let leaf = LeafPredicate::new(PredicateOperator::Equals, "d", PredicateType::Decimal)
            .with_literal(5i64);
        assert_eq!(
            leaf_to_literal(&leaf),
            Err(SargError::ExtractionFailure {
                column: "d".to_owned(),
                reason: "expected DECIMAL literal, found long".to_owned(),
            })
        );
    }

    #[test]
    fn missing_operands_are_extraction_failures() {
        let leaf = LeafPredicate::new(PredicateOperator::Equals, "a", PredicateType::Long);
        assert!(matches!(
            leaf_to_literal(&leaf),
            Err(SargError::ExtractionFailure { .. })
        ));
        assert!(matches!(
            leaf_to_literal_list(&leaf),
            Err(SargError::ExtractionFailure { .. })
        ));
    }

    #[test]
    fn literal_lists_keep_order() {
        let leaf = LeafPredicate::new(PredicateOperator::In, "d", PredicateType::Date)
            .with_literal_list([date(1970, 1, 3), date(1970, 1, 1), date(1970, 1, 2)]);
        assert_eq!(
            leaf_to_literal_list(&leaf),
            Ok(vec![Literal::Date(2), Literal::Date(0), Literal::Date(1)])
        );
    }
}
