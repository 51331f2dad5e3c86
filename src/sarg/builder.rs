//! Builder for composing search arguments.

use super::{
    ExpressionTree, LeafPredicate, PredicateOperator, PredicateType, RawLiteral, SearchArgument,
    TruthValue,
};
use crate::error::{Result, SargError};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum BuilderCombine {
    Conjunction,
    Disjunction,
    Negation,
}

#[derive(Debug)]
struct Frame {
    combine: BuilderCombine,
    children: Vec<ExpressionTree>,
}

/// Builder for composing a search argument incrementally.
///
/// Groups are opened with `start_*` and closed with [`end`](Self::end); leaf
/// methods append to the innermost open group. Identical leaves share one
/// index. Misuse is reported by [`build`](Self::build).
#[derive(Debug, Default)]
pub struct SearchArgumentBuilder {
    stack: Vec<Frame>,
    root: Option<ExpressionTree>,
    leaves: Vec<LeafPredicate>,
    error: Option<SargError>,
}

impl SearchArgumentBuilder {
    /// Creates an empty builder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Opens an `AND` group.
    #[must_use]
    pub fn start_and(self) -> Self {
        self.open(BuilderCombine::Conjunction)
    }

    /// Opens an `OR` group.
    #[must_use]
    pub fn start_or(self) -> Self {
        self.open(BuilderCombine::Disjunction)
    }

    /// Opens a `NOT` group; it must receive exactly one child.
    #[must_use]
    pub fn start_not(self) -> Self {
        self.open(BuilderCombine::Negation)
    }

    /// Closes the innermost open group.
    #[must_use]
    pub fn end(mut self) -> Self {
        let Some(frame) = self.stack.pop() else {
            self.fail("end() called without an open group");
            return self;
        };
        let node = match frame.combine {
            BuilderCombine::Conjunction => ExpressionTree::And(frame.children),
            BuilderCombine::Disjunction => ExpressionTree::Or(frame.children),
            BuilderCombine::Negation => {
                let got = frame.children.len();
                let mut children = frame.children.into_iter();
                match (children.next(), got) {
                    (Some(child), 1) => ExpressionTree::not(child),
                    _ => {
                        self.fail(format!("NOT group expects exactly one child, got {got}"));
                        return self;
                    }
                }
            }
        };
        self.push_node(node);
        self
    }

    /// Adds `column = literal`.
    #[must_use]
    pub fn equals<C, V>(self, column: C, literal_type: PredicateType, literal: V) -> Self
    where
        C: Into<String>,
        V: Into<RawLiteral>,
    {
        self.push_leaf(
            LeafPredicate::new(PredicateOperator::Equals, column, literal_type)
                .with_literal(literal),
        )
    }

    /// Adds `column <=> literal`.
    #[must_use]
    pub fn null_safe_equals<C, V>(self, column: C, literal_type: PredicateType, literal: V) -> Self
    where
        C: Into<String>,
        V: Into<RawLiteral>,
    {
        self.push_leaf(
            LeafPredicate::new(PredicateOperator::NullSafeEquals, column, literal_type)
                .with_literal(literal),
        )
    }

    /// Adds `column < literal`.
    #[must_use]
    pub fn less_than<C, V>(self, column: C, literal_type: PredicateType, literal: V) -> Self
    where
        C: Into<String>,
        V: Into<RawLiteral>,
    {
        self.push_leaf(
            LeafPredicate::new(PredicateOperator::LessThan, column, literal_type)
                .with_literal(literal),
        )
    }

    /// Adds `column <= literal`.
    #[must_use]
    pub fn less_than_equals<C, V>(self, column: C, literal_type: PredicateType, literal: V) -> Self
    where
        C: Into<String>,
        V: Into<RawLiteral>,
    {
        self.push_leaf(
            LeafPredicate::new(PredicateOperator::LessThanEquals, column, literal_type)
                .with_literal(literal),
        )
    }

    /// Adds `column IN (literals...)`.
    #[must_use]
    pub fn in_list<C, I>(self, column: C, literal_type: PredicateType, literals: I) -> Self
    where
        C: Into<String>,
        I: IntoIterator,
        I::Item: Into<RawLiteral>,
    {
        self.push_leaf(
            LeafPredicate::new(PredicateOperator::In, column, literal_type)
                .with_literal_list(literals),
        )
    }

    /// Adds `column BETWEEN lower AND upper`.
    #[must_use]
    pub fn between<C, V>(self, column: C, literal_type: PredicateType, lower: V, upper: V) -> Self
    where
        C: Into<String>,
        V: Into<RawLiteral>,
    {
        self.push_leaf(
            LeafPredicate::new(PredicateOperator::Between, column, literal_type)
                .with_literal_list([lower, upper]),
        )
    }

    /// Adds `column IS NULL`.
    #[must_use]
    pub fn is_null<C>(self, column: C, literal_type: PredicateType) -> Self
    where
        C: Into<String>,
    {
        self.push_leaf(LeafPredicate::new(
            PredicateOperator::IsNull,
            column,
            literal_type,
        ))
    }

    /// Adds a folded truth constant.
    #[must_use]
    pub fn literal(mut self, value: TruthValue) -> Self {
        self.push_node(ExpressionTree::Constant(value));
        self
    }

    /// Adds an already-built leaf.
    #[must_use]
    pub fn leaf(self, leaf: LeafPredicate) -> Self {
        self.push_leaf(leaf)
    }

    /// Consumes the builder and returns the composed search argument.
    pub fn build(self) -> Result<SearchArgument> {
        if let Some(error) = self.error {
            return Err(error);
        }
        if !self.stack.is_empty() {
            return Err(SargError::MalformedTree {
                reason: format!("{} group(s) left open", self.stack.len()),
            });
        }
        let root = self.root.ok_or_else(|| SargError::MalformedTree {
            reason: "search argument has no expression".to_owned(),
        })?;
        Ok(SearchArgument::new(root, self.leaves))
    }

    fn open(mut self, combine: BuilderCombine) -> Self {
        self.stack.push(Frame {
            combine,
            children: Vec::new(),
        });
        self
    }

    fn push_leaf(mut self, leaf: LeafPredicate) -> Self {
        let index = match self.leaves.iter().position(|existing| *existing == leaf) {
            Some(index) => index,
            None => {
                self.leaves.push(leaf);
                self.leaves.len() - 1
            }
        };
        self.push_node(ExpressionTree::Leaf(index));
        self
    }

    fn push_node(&mut self, node: ExpressionTree) {
        if let Some(frame) = self.stack.last_mut() {
            frame.children.push(node);
        } else if self.root.is_none() {
            self.root = Some(node);
        } else {
            self.fail("multiple root expressions; wrap them in a group");
        }
    }

    fn fail(&mut self, reason: impl Into<String>) {
        if self.error.is_none() {
            self.error = Some(SargError::MalformedTree {
                reason: reason.into(),
            });
        }
    }
}
