//! Pushdown expressions produced by translation.
//!
//! Expressions are binary trees: `and`/`or` always take two operands and fold
//! away the `true`/`false` identity elements, the way a scan-time filter
//! builder composes them. Nothing else is rewritten.

mod literal;
mod visitor;

use std::{fmt, sync::Arc};

pub use literal::Literal;
pub use visitor::ExpressionVisitor;

/// Column named by a pushdown predicate.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Reference {
    /// Column name as it appears in the table schema.
    pub name: Arc<str>,
}

impl Reference {
    /// Creates a new column reference from a name.
    #[must_use]
    pub fn new<N>(name: N) -> Self
    where
        N: Into<Arc<str>>,
    {
        Self { name: name.into() }
    }

    /// Column name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }
}

impl From<&str> for Reference {
    fn from(value: &str) -> Self {
        Reference::new(value)
    }
}

impl From<String> for Reference {
    fn from(value: String) -> Self {
        Reference::new(value)
    }
}

impl fmt::Display for Reference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

/// Single-column predicate at the bottom of an expression tree.
#[derive(Clone, Debug)]
pub enum Predicate {
    /// `column == literal`.
    Equal(Reference, Literal),
    /// `column < literal`.
    LessThan(Reference, Literal),
    /// `column <= literal`.
    LessThanOrEqual(Reference, Literal),
    /// `column >= literal`.
    GreaterThanOrEqual(Reference, Literal),
    /// Membership in a literal set. Member order carries no meaning.
    In(Reference, Vec<Literal>),
    /// `column IS NULL`.
    IsNull(Reference),
}

impl Predicate {
    /// Column the predicate tests.
    #[must_use]
    pub fn reference(&self) -> &Reference {
        match self {
            Predicate::Equal(reference, _)
            | Predicate::LessThan(reference, _)
            | Predicate::LessThanOrEqual(reference, _)
            | Predicate::GreaterThanOrEqual(reference, _)
            | Predicate::In(reference, _)
            | Predicate::IsNull(reference) => reference,
        }
    }

    /// Literal operands in declaration order.
    #[must_use]
    pub fn literals(&self) -> &[Literal] {
        match self {
            Predicate::Equal(_, literal)
            | Predicate::LessThan(_, literal)
            | Predicate::LessThanOrEqual(_, literal)
            | Predicate::GreaterThanOrEqual(_, literal) => std::slice::from_ref(literal),
            Predicate::In(_, literals) => literals,
            Predicate::IsNull(_) => &[],
        }
    }
}

fn same_members(lhs: &[Literal], rhs: &[Literal]) -> bool {
    lhs.iter().all(|value| rhs.contains(value)) && rhs.iter().all(|value| lhs.contains(value))
}

impl PartialEq for Predicate {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Predicate::Equal(lc, lv), Predicate::Equal(rc, rv))
            | (Predicate::LessThan(lc, lv), Predicate::LessThan(rc, rv))
            | (Predicate::LessThanOrEqual(lc, lv), Predicate::LessThanOrEqual(rc, rv))
            | (Predicate::GreaterThanOrEqual(lc, lv), Predicate::GreaterThanOrEqual(rc, rv)) => {
                lc == rc && lv == rv
            }
            (Predicate::In(lc, lv), Predicate::In(rc, rv)) => lc == rc && same_members(lv, rv),
            (Predicate::IsNull(lc), Predicate::IsNull(rc)) => lc == rc,
            _ => false,
        }
    }
}

impl fmt::Display for Predicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Predicate::Equal(column, value) => write!(f, "{column} == {value}"),
            Predicate::LessThan(column, value) => write!(f, "{column} < {value}"),
            Predicate::LessThanOrEqual(column, value) => write!(f, "{column} <= {value}"),
            Predicate::GreaterThanOrEqual(column, value) => write!(f, "{column} >= {value}"),
            Predicate::In(column, values) => {
                write!(f, "{column} in (")?;
                for (idx, value) in values.iter().enumerate() {
                    if idx > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{value}")?;
                }
                f.write_str(")")
            }
            Predicate::IsNull(column) => write!(f, "is_null({column})"),
        }
    }
}

/// Boolean expression tree handed to a scan planner.
#[derive(Clone, Debug, PartialEq)]
pub enum Expression {
    /// Matches every row.
    AlwaysTrue,
    /// Matches no row.
    AlwaysFalse,
    /// Conjunction of two expressions.
    And(Box<Expression>, Box<Expression>),
    /// Disjunction of two expressions.
    Or(Box<Expression>, Box<Expression>),
    /// Logical negation.
    Not(Box<Expression>),
    /// Column predicate.
    Predicate(Predicate),
}

impl Expression {
    /// Accepts a visitor that folds the tree bottom-up.
    pub fn accept<V>(&self, visitor: &mut V) -> Result<V::Value, V::Error>
    where
        V: ExpressionVisitor + ?Sized,
    {
        visitor.visit_expression(self)
    }

    /// Distinct column names referenced by the expression, in first-seen order.
    #[must_use]
    pub fn referenced_columns(&self) -> Vec<Arc<str>> {
        let mut collector = ColumnCollector::default();
        match self.accept(&mut collector) {
            Ok(()) => collector.columns,
            Err(never) => match never {},
        }
    }
}

#[derive(Default)]
struct ColumnCollector {
    columns: Vec<Arc<str>>,
}

impl ExpressionVisitor for ColumnCollector {
    type Error = std::convert::Infallible;
    type Value = ();

    fn visit_constant(&mut self, _value: bool) -> Result<(), Self::Error> {
        Ok(())
    }

    fn visit_predicate(&mut self, predicate: &Predicate) -> Result<(), Self::Error> {
        let name = &predicate.reference().name;
        if !self.columns.iter().any(|seen| seen == name) {
            self.columns.push(Arc::clone(name));
        }
        Ok(())
    }

    fn combine_not(&mut self, _child: ()) -> Result<(), Self::Error> {
        Ok(())
    }

    fn combine_and(&mut self, _left: (), _right: ()) -> Result<(), Self::Error> {
        Ok(())
    }

    fn combine_or(&mut self, _left: (), _right: ()) -> Result<(), Self::Error> {
        Ok(())
    }
}

impl fmt::Display for Expression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expression::AlwaysTrue => f.write_str("true"),
            Expression::AlwaysFalse => f.write_str("false"),
            Expression::And(left, right) => write!(f, "({left} and {right})"),
            Expression::Or(left, right) => write!(f, "({left} or {right})"),
            Expression::Not(child) => write!(f, "not({child})"),
            Expression::Predicate(predicate) => write!(f, "{predicate}"),
        }
    }
}

impl From<Predicate> for Expression {
    fn from(value: Predicate) -> Self {
        Expression::Predicate(value)
    }
}

/// Expression matching every row.
#[must_use]
pub fn always_true() -> Expression {
    Expression::AlwaysTrue
}

/// Expression matching no row.
#[must_use]
pub fn always_false() -> Expression {
    Expression::AlwaysFalse
}

/// Conjunction; `true` operands disappear and a `false` operand wins.
#[must_use]
pub fn and(left: Expression, right: Expression) -> Expression {
    match (left, right) {
        (Expression::AlwaysFalse, _) | (_, Expression::AlwaysFalse) => Expression::AlwaysFalse,
        (Expression::AlwaysTrue, other) | (other, Expression::AlwaysTrue) => other,
        (left, right) => Expression::And(Box::new(left), Box::new(right)),
    }
}

/// Disjunction; `false` operands disappear and a `true` operand wins.
#[must_use]
pub fn or(left: Expression, right: Expression) -> Expression {
    match (left, right) {
        (Expression::AlwaysTrue, _) | (_, Expression::AlwaysTrue) => Expression::AlwaysTrue,
        (Expression::AlwaysFalse, other) | (other, Expression::AlwaysFalse) => other,
        (left, right) => Expression::Or(Box::new(left), Box::new(right)),
    }
}

/// Negation. Constants are flipped; any other child is wrapped as is.
#[must_use]
pub fn not(child: Expression) -> Expression {
    match child {
        Expression::AlwaysTrue => Expression::AlwaysFalse,
        Expression::AlwaysFalse => Expression::AlwaysTrue,
        other => Expression::Not(Box::new(other)),
    }
}

/// `column == value`.
#[must_use]
pub fn equal<C, V>(column: C, value: V) -> Expression
where
    C: Into<Reference>,
    V: Into<Literal>,
{
    Predicate::Equal(column.into(), value.into()).into()
}

/// `column < value`.
#[must_use]
pub fn less_than<C, V>(column: C, value: V) -> Expression
where
    C: Into<Reference>,
    V: Into<Literal>,
{
    Predicate::LessThan(column.into(), value.into()).into()
}

/// `column <= value`.
#[must_use]
pub fn less_than_or_equal<C, V>(column: C, value: V) -> Expression
where
    C: Into<Reference>,
    V: Into<Literal>,
{
    Predicate::LessThanOrEqual(column.into(), value.into()).into()
}

/// `column >= value`.
#[must_use]
pub fn greater_than_or_equal<C, V>(column: C, value: V) -> Expression
where
    C: Into<Reference>,
    V: Into<Literal>,
{
    Predicate::GreaterThanOrEqual(column.into(), value.into()).into()
}

/// `column IN (values...)`.
#[must_use]
pub fn in_list<C, I>(column: C, values: I) -> Expression
where
    C: Into<Reference>,
    I: IntoIterator,
    I::Item: Into<Literal>,
{
    Predicate::In(column.into(), values.into_iter().map(Into::into).collect()).into()
}

/// `column IS NULL`.
#[must_use]
pub fn is_null<C>(column: C) -> Expression
where
    C: Into<Reference>,
{
    Predicate::IsNull(column.into()).into()
}
