//! Search arguments: the boolean filter trees handed over by the source engine.
//!
//! A search argument is a tree of `and`/`or`/`not` nodes whose leaves are
//! indices into a side list of [`PredicateLeaf`] values. Identical leaves are
//! shared, so several tree positions may point at the same index.

mod builder;
mod leaf;

use std::fmt;

pub use builder::SearchArgumentBuilder;
pub use leaf::{
    LeafPredicate, PredicateLeaf, PredicateOperator, PredicateType, RawDecimal, RawLiteral,
};

/// Three-valued truth constants a search-argument builder may fold to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TruthValue {
    /// Definitely true.
    Yes,
    /// Definitely false.
    No,
    /// Definitely NULL.
    Null,
    /// True or NULL.
    YesNull,
    /// False or NULL.
    NoNull,
    /// True or false.
    YesNo,
    /// Any outcome.
    YesNoNull,
}

impl TruthValue {
    /// Tag naming the value in the source engine.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            TruthValue::Yes => "YES",
            TruthValue::No => "NO",
            TruthValue::Null => "NULL",
            TruthValue::YesNull => "YES_NULL",
            TruthValue::NoNull => "NO_NULL",
            TruthValue::YesNo => "YES_NO",
            TruthValue::YesNoNull => "YES_NO_NULL",
        }
    }
}

/// Node of a search-argument tree.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum ExpressionTree {
    /// Conjunction over ordered children.
    And(Vec<ExpressionTree>),
    /// Disjunction over ordered children.
    Or(Vec<ExpressionTree>),
    /// Negation.
    Not(Box<ExpressionTree>),
    /// Reference to `leaves[index]`.
    Leaf(usize),
    /// Folded truth constant. Never translatable.
    Constant(TruthValue),
}

impl ExpressionTree {
    /// Conjunction over `children`.
    #[must_use]
    pub fn and<I>(children: I) -> Self
    where
        I: IntoIterator<Item = ExpressionTree>,
    {
        ExpressionTree::And(children.into_iter().collect())
    }

    /// Disjunction over `children`.
    #[must_use]
    pub fn or<I>(children: I) -> Self
    where
        I: IntoIterator<Item = ExpressionTree>,
    {
        ExpressionTree::Or(children.into_iter().collect())
    }

    /// Negation of `child`.
    #[must_use]
    pub fn not(child: ExpressionTree) -> Self {
        ExpressionTree::Not(Box::new(child))
    }

    /// Reference to the leaf at `index`.
    #[must_use]
    pub fn leaf(index: usize) -> Self {
        ExpressionTree::Leaf(index)
    }

    /// Tag naming the node's operator in the source engine.
    #[must_use]
    pub fn operator_name(&self) -> &'static str {
        match self {
            ExpressionTree::And(_) => "AND",
            ExpressionTree::Or(_) => "OR",
            ExpressionTree::Not(_) => "NOT",
            ExpressionTree::Leaf(_) => "LEAF",
            ExpressionTree::Constant(_) => "CONSTANT",
        }
    }
}

impl fmt::Display for ExpressionTree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExpressionTree::And(children) | ExpressionTree::Or(children) => {
                f.write_str(if matches!(self, ExpressionTree::And(_)) {
                    "and("
                } else {
                    "or("
                })?;
                for (idx, child) in children.iter().enumerate() {
                    if idx > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{child}")?;
                }
                f.write_str(")")
            }
            ExpressionTree::Not(child) => write!(f, "not({child})"),
            ExpressionTree::Leaf(index) => write!(f, "leaf-{index}"),
            ExpressionTree::Constant(value) => f.write_str(value.as_str()),
        }
    }
}

/// Filter tree plus the leaves it references.
#[derive(Clone, Debug, PartialEq)]
pub struct SearchArgument<L = LeafPredicate> {
    expression: ExpressionTree,
    leaves: Vec<L>,
}

impl<L> SearchArgument<L> {
    /// Pairs a tree with its leaves. Leaf indices are checked at translation.
    #[must_use]
    pub fn new(expression: ExpressionTree, leaves: Vec<L>) -> Self {
        Self { expression, leaves }
    }

    /// Root of the filter tree.
    #[must_use]
    pub fn expression(&self) -> &ExpressionTree {
        &self.expression
    }

    /// Leaves referenced by [`ExpressionTree::Leaf`] indices.
    #[must_use]
    pub fn leaves(&self) -> &[L] {
        &self.leaves
    }

    /// Splits the argument back into its parts.
    pub fn into_parts(self) -> (ExpressionTree, Vec<L>) {
        (self.expression, self.leaves)
    }
}

impl SearchArgument {
    /// Starts composing a search argument.
    #[must_use]
    pub fn builder() -> SearchArgumentBuilder {
        SearchArgumentBuilder::new()
    }
}

impl<L> fmt::Display for SearchArgument<L>
where
    L: PredicateLeaf,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (idx, leaf) in self.leaves.iter().enumerate() {
            write!(
                f,
                "leaf-{idx} = ({} {} {}), ",
                leaf.operator(),
                leaf.column_name(),
                leaf.literal_type()
            )?;
        }
        write!(f, "expr = {}", self.expression)
    }
}
