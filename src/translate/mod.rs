//! Search-argument to pushdown-expression translation.
//!
//! The tree walk mirrors the source tree: every `and`/`or` child is folded
//! into the accumulator in declaration order, starting from the identity
//! constant, and every leaf is handed to the leaf translator. The first
//! failure aborts the whole translation.

mod leaf;
mod literal;

use crate::{
    error::{Result, SargError},
    expr::{self, Expression},
    observability::{log_debug, log_warn},
    option::FilterOption,
    sarg::{ExpressionTree, PredicateLeaf, SearchArgument},
};

/// Translates a search argument with default options.
pub fn generate_filter_expression<L>(sarg: &SearchArgument<L>) -> Result<Expression>
where
    L: PredicateLeaf,
{
    generate_filter_expression_with(sarg, FilterOption::default())
}

/// Translates a search argument with the supplied options.
pub fn generate_filter_expression_with<L>(
    sarg: &SearchArgument<L>,
    option: FilterOption,
) -> Result<Expression>
where
    L: PredicateLeaf,
{
    FilterTranslator::new(sarg.leaves())
        .with_option(option)
        .translate(sarg.expression())
}

/// Translates a search argument, returning `None` when it cannot be pushed down.
///
/// The failure is logged at warn level; callers are expected to evaluate the
/// filter without pushdown instead.
pub fn try_generate_filter_expression<L>(sarg: &SearchArgument<L>) -> Option<Expression>
where
    L: PredicateLeaf,
{
    match generate_filter_expression(sarg) {
        Ok(expression) => Some(expression),
        Err(error) => {
            log_warn!(
                component = "translate",
                event = "pushdown_skipped",
                error = %error,
            );
            None
        }
    }
}

/// Walks a search-argument tree against a borrowed slice of leaves.
#[derive(Debug, Clone, Copy)]
pub struct FilterTranslator<'a, L> {
    leaves: &'a [L],
    option: FilterOption,
}

impl<'a, L> FilterTranslator<'a, L>
where
    L: PredicateLeaf,
{
    /// Creates a translator resolving leaf indices against `leaves`.
    #[must_use]
    pub fn new(leaves: &'a [L]) -> Self {
        Self {
            leaves,
            option: FilterOption::default(),
        }
    }

    /// Replaces the translation options.
    #[must_use]
    pub fn with_option(self, option: FilterOption) -> Self {
        Self { option, ..self }
    }

    /// Translates `tree` into a freshly built pushdown expression.
    pub fn translate(&self, tree: &ExpressionTree) -> Result<Expression> {
        log_debug!(
            component = "translate",
            event = "translate_start",
            leaves = self.leaves.len(),
            tree = %tree,
        );
        match self.translate_node(tree, 1) {
            Ok(expression) => {
                log_debug!(
                    component = "translate",
                    event = "translate_complete",
                    expression = %expression,
                );
                Ok(expression)
            }
            Err(error) => {
                log_debug!(
                    component = "translate",
                    event = "translate_failed",
                    error = %error,
                );
                Err(error)
            }
        }
    }

    fn translate_node(&self, tree: &ExpressionTree, depth: usize) -> Result<Expression> {
        if let Some(limit) = self.option.depth_limit() {
            if depth > limit {
                return Err(SargError::DepthExceeded { limit });
            }
        }
        match tree {
            ExpressionTree::And(children) => children
                .iter()
                .try_fold(expr::always_true(), |acc, child| -> Result<Expression> {
                    Ok(expr::and(acc, self.translate_node(child, depth + 1)?))
                }),
            ExpressionTree::Or(children) => children
                .iter()
                .try_fold(expr::always_false(), |acc, child| -> Result<Expression> {
                    Ok(expr::or(acc, self.translate_node(child, depth + 1)?))
                }),
            ExpressionTree::Not(child) => Ok(expr::not(self.translate_node(child, depth + 1)?)),
            ExpressionTree::Leaf(index) => {
                let leaf = self.leaves.get(*index).ok_or_else(|| {
                    SargError::malformed_leaf(
                        *index,
                        format!("index out of range for {} leaves", self.leaves.len()),
                    )
                })?;
                leaf::translate_leaf(*index, leaf, &self.option)
            }
            ExpressionTree::Constant(_) => {
                Err(SargError::unsupported_operator(tree.operator_name()))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sarg::{LeafPredicate, PredicateOperator, PredicateType, TruthValue};

    fn leaves() -> Vec<LeafPredicate> {
        vec![
            LeafPredicate::new(PredicateOperator::Equals, "a", PredicateType::Long)
                .with_literal(1i64),
            LeafPredicate::new(PredicateOperator::IsNull, "b", PredicateType::String),
            LeafPredicate::new(PredicateOperator::LessThan, "c", PredicateType::Long)
                .with_literal(9i64),
        ]
    }

    fn translate(tree: &ExpressionTree) -> Result<Expression> {
        let leaves = leaves();
        FilterTranslator::new(&leaves).translate(tree)
    }

    #[test]
    fn empty_groups_yield_identity_constants() {
        assert_eq!(translate(&ExpressionTree::And(vec![])), Ok(expr::always_true()));
        assert_eq!(translate(&ExpressionTree::Or(vec![])), Ok(expr::always_false()));
    }

    #[test]
    fn and_or_fold_in_declaration_order() {
        let tree = ExpressionTree::and([
            ExpressionTree::leaf(0),
            ExpressionTree::leaf(1),
            ExpressionTree::leaf(2),
        ]);
        let expected = Expression::And(
            Box::new(Expression::And(
                Box::new(expr::equal("a", 1i64)),
                Box::new(expr::is_null("b")),
            )),
            Box::new(expr::less_than("c", 9i64)),
        );
        assert_eq!(translate(&tree), Ok(expected));

        let tree = ExpressionTree::or([ExpressionTree::leaf(2), ExpressionTree::leaf(0)]);
        assert_eq!(
            translate(&tree),
            Ok(expr::or(expr::less_than("c", 9i64), expr::equal("a", 1i64)))
        );
    }

    #[test]
    fn single_child_groups_collapse_to_the_child() {
        let tree = ExpressionTree::and([ExpressionTree::leaf(1)]);
        assert_eq!(translate(&tree), Ok(expr::is_null("b")));
    }

    #[test]
    fn not_wraps_child() {
        let tree = ExpressionTree::not(ExpressionTree::leaf(0));
        assert_eq!(
            translate(&tree),
            Ok(Expression::Not(Box::new(expr::equal("a", 1i64))))
        );
    }

    #[test]
    fn constant_nodes_are_rejected() {
        let tree = ExpressionTree::or([
            ExpressionTree::leaf(0),
            ExpressionTree::Constant(TruthValue::Yes),
        ]);
        assert_eq!(
            translate(&tree),
            Err(SargError::UnsupportedOperator {
                operator: "CONSTANT".to_owned()
            })
        );
    }

    #[test]
    fn leaf_index_out_of_range_is_malformed() {
        assert_eq!(
            translate(&ExpressionTree::leaf(3)),
            Err(SargError::MalformedLeaf {
                leaf: 3,
                reason: "index out of range for 3 leaves".to_owned(),
            })
        );
    }

    #[test]
    fn errors_surface_even_after_a_false_accumulator() {
        let leaves = vec![LeafPredicate::new(
            PredicateOperator::NullSafeEquals,
            "a",
            PredicateType::Long,
        )];
        let tree = ExpressionTree::and([
            ExpressionTree::Or(vec![]),
            ExpressionTree::leaf(0),
        ]);
        assert!(matches!(
            FilterTranslator::new(&leaves).translate(&tree),
            Err(SargError::UnsupportedOperator { .. })
        ));
    }

    #[test]
    fn depth_limit_is_enforced_when_configured() {
        let leaves = leaves();
        let tree = ExpressionTree::not(ExpressionTree::not(ExpressionTree::leaf(0)));

        let unlimited = FilterTranslator::new(&leaves).translate(&tree);
        assert!(unlimited.is_ok());

        let fits = FilterTranslator::new(&leaves)
            .with_option(FilterOption::default().max_depth(3))
            .translate(&tree);
        assert!(fits.is_ok());

        let too_deep = FilterTranslator::new(&leaves)
            .with_option(FilterOption::default().max_depth(2))
            .translate(&tree);
        assert_eq!(too_deep, Err(SargError::DepthExceeded { limit: 2 }));
    }

    #[test]
    fn try_generate_swallows_failures() {
        let sarg = SearchArgument::new(ExpressionTree::leaf(7), leaves());
        assert_eq!(try_generate_filter_expression(&sarg), None);

        let sarg = SearchArgument::new(ExpressionTree::leaf(1), leaves());
        assert_eq!(
            try_generate_filter_expression(&sarg),
            Some(expr::is_null("b"))
        );
    }
}
