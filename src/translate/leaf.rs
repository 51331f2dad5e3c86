use super::literal::{leaf_to_literal, leaf_to_literal_list, normalize_all, raw_literal_list};
use crate::{
    error::{Result, SargError},
    expr::{self, Expression},
    observability::log_trace,
    option::FilterOption,
    sarg::{PredicateLeaf, PredicateOperator},
};

/// Translates `leaf` (stored at `index`) into the matching pushdown predicate.
pub(crate) fn translate_leaf<L>(index: usize, leaf: &L, option: &FilterOption) -> Result<Expression>
where
    L: PredicateLeaf + ?Sized,
{
    let column = leaf.column_name();
    let translated = match leaf.operator() {
        PredicateOperator::Equals => expr::equal(column, leaf_to_literal(leaf)?),
        PredicateOperator::LessThan => expr::less_than(column, leaf_to_literal(leaf)?),
        PredicateOperator::LessThanEquals => {
            expr::less_than_or_equal(column, leaf_to_literal(leaf)?)
        }
        PredicateOperator::In => expr::in_list(column, leaf_to_literal_list(leaf)?),
        PredicateOperator::Between => translate_between(index, leaf, option)?,
        PredicateOperator::IsNull => expr::is_null(column),
        PredicateOperator::NullSafeEquals => {
            return Err(SargError::unsupported_operator(leaf.operator()))
        }
    };
    log_trace!(
        component = "leaf",
        event = "leaf_translated",
        leaf = index,
        column = %column,
        operator = %leaf.operator(),
    );
    Ok(translated)
}

/// `BETWEEN` has no direct pushdown form; it becomes a closed interval.
fn translate_between<L>(index: usize, leaf: &L, option: &FilterOption) -> Result<Expression>
where
    L: PredicateLeaf + ?Sized,
{
    let raw = raw_literal_list(leaf)?;
    let arity_ok = if option.is_strict_between() {
        raw.len() == 2
    } else {
        raw.len() >= 2
    };
    if !arity_ok {
        return Err(SargError::malformed_leaf(
            index,
            format!(
                "BETWEEN on '{}' expects 2 values, got {}",
                leaf.column_name(),
                raw.len()
            ),
        ));
    }

    let mut bounds = normalize_all(leaf, &raw[..2])?.into_iter();
    match (bounds.next(), bounds.next()) {
        (Some(lower), Some(upper)) => Ok(expr::and(
            expr::greater_than_or_equal(leaf.column_name(), lower),
            expr::less_than_or_equal(leaf.column_name(), upper),
        )),
        _ => Err(SargError::malformed_leaf(index, "BETWEEN bounds missing")),
    }
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use bigdecimal::BigDecimal;

    use super::*;
    use crate::{
        expr::Literal,
        sarg::{LeafPredicate, PredicateType, RawDecimal},
    };

    fn translate(leaf: &LeafPredicate) -> Result<Expression> {
        translate_leaf(0, leaf, &FilterOption::default())
    }

    #[test]
    fn comparison_operators_map_one_to_one() {
        let eq = LeafPredicate::new(PredicateOperator::Equals, "a", PredicateType::Long)
            .with_literal(5i64);
        assert_eq!(translate(&eq), Ok(expr::equal("a", 5i64)));

        let lt = LeafPredicate::new(PredicateOperator::LessThan, "b", PredicateType::Float)
            .with_literal(1.5f64);
        assert_eq!(translate(&lt), Ok(expr::less_than("b", 1.5f64)));

        let le = LeafPredicate::new(PredicateOperator::LessThanEquals, "c", PredicateType::String)
            .with_literal("m");
        assert_eq!(translate(&le), Ok(expr::less_than_or_equal("c", "m")));

        let null = LeafPredicate::new(PredicateOperator::IsNull, "d", PredicateType::Boolean);
        assert_eq!(translate(&null), Ok(expr::is_null("d")));
    }

    #[test]
    fn in_translates_every_member() {
        let leaf = LeafPredicate::new(PredicateOperator::In, "col", PredicateType::String)
            .with_literal_list(["a", "b", "c"]);
        assert_eq!(translate(&leaf), Ok(expr::in_list("col", ["c", "b", "a"])));
    }

    #[test]
    fn between_expands_to_closed_interval() {
        let leaf = LeafPredicate::new(PredicateOperator::Between, "x", PredicateType::Long)
            .with_literal_list([10i64, 20]);
        assert_eq!(
            translate(&leaf),
            Ok(Expression::And(
                Box::new(expr::greater_than_or_equal("x", 10i64)),
                Box::new(expr::less_than_or_equal("x", 20i64)),
            ))
        );
    }

    #[test]
    fn between_on_decimals_keeps_scale() {
        let leaf = LeafPredicate::new(PredicateOperator::Between, "price", PredicateType::Decimal)
            .with_literal_list([RawDecimal::new(100, 2), RawDecimal::new(25050, 2)]);
        let Ok(Expression::And(lower, _)) = translate(&leaf) else {
            panic!("expected And");
        };
        let Expression::Predicate(lower) = *lower else {
            panic!("expected predicate");
        };
        let literal = &lower.literals()[0];
        assert_eq!(
            literal,
            &Literal::Decimal(BigDecimal::from_str("1.00").expect("decimal"))
        );
        assert_eq!(literal.scale(), Some(2));
    }

    #[test]
    fn between_arity_is_validated() {
        let short = LeafPredicate::new(PredicateOperator::Between, "x", PredicateType::Long)
            .with_literal_list([10i64]);
        assert_eq!(
            translate(&short),
            Err(SargError::MalformedLeaf {
                leaf: 0,
                reason: "BETWEEN on 'x' expects 2 values, got 1".to_owned(),
            })
        );

        let long = LeafPredicate::new(PredicateOperator::Between, "x", PredicateType::Long)
            .with_literal_list([10i64, 20, 30]);
        assert!(matches!(
            translate(&long),
            Err(SargError::MalformedLeaf { .. })
        ));

        let lenient = FilterOption::default().strict_between(false);
        assert_eq!(
            translate_leaf(0, &long, &lenient),
            Ok(expr::and(
                expr::greater_than_or_equal("x", 10i64),
                expr::less_than_or_equal("x", 20i64),
            ))
        );
        assert!(matches!(
            translate_leaf(0, &short, &lenient),
            Err(SargError::MalformedLeaf { .. })
        ));
    }

    #[test]
    fn null_safe_equals_is_unsupported() {
        let leaf = LeafPredicate::new(PredicateOperator::NullSafeEquals, "a", PredicateType::Long)
            .with_literal(1i64);
        assert_eq!(
            translate(&leaf),
            Err(SargError::UnsupportedOperator {
                operator: "NULL_SAFE_EQUALS".to_owned()
            })
        );
    }

    #[test]
    fn is_null_skips_literal_extraction() {
        let leaf = LeafPredicate::new(PredicateOperator::IsNull, "ts", PredicateType::Timestamp)
            .with_literal("not a timestamp");
        assert_eq!(translate(&leaf), Ok(expr::is_null("ts")));
    }
}
