use super::{Expression, Predicate};

/// Visitor that folds an expression tree bottom-up into a custom value.
pub trait ExpressionVisitor {
    /// Error type used when the fold fails.
    type Error;
    /// Concrete value produced for each subtree.
    type Value;

    /// Evaluates `AlwaysTrue` (`true`) or `AlwaysFalse` (`false`).
    fn visit_constant(&mut self, value: bool) -> Result<Self::Value, Self::Error>;

    /// Evaluates a column predicate.
    fn visit_predicate(&mut self, predicate: &Predicate) -> Result<Self::Value, Self::Error>;

    /// Combines the result of a negated child.
    fn combine_not(&mut self, child: Self::Value) -> Result<Self::Value, Self::Error>;

    /// Combines both sides of an `and`.
    fn combine_and(
        &mut self,
        left: Self::Value,
        right: Self::Value,
    ) -> Result<Self::Value, Self::Error>;

    /// Combines both sides of an `or`.
    fn combine_or(
        &mut self,
        left: Self::Value,
        right: Self::Value,
    ) -> Result<Self::Value, Self::Error>;

    /// Walks the supplied expression, left operand before right.
    fn visit_expression(&mut self, expr: &Expression) -> Result<Self::Value, Self::Error> {
        match expr {
            Expression::AlwaysTrue => self.visit_constant(true),
            Expression::AlwaysFalse => self.visit_constant(false),
            Expression::Not(child) => {
                let child = self.visit_expression(child)?;
                self.combine_not(child)
            }
            Expression::And(left, right) => {
                let left = self.visit_expression(left)?;
                let right = self.visit_expression(right)?;
                self.combine_and(left, right)
            }
            Expression::Or(left, right) => {
                let left = self.visit_expression(left)?;
                let right = self.visit_expression(right)?;
                self.combine_or(left, right)
            }
            Expression::Predicate(predicate) => self.visit_predicate(predicate),
        }
    }
}
