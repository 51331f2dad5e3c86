use thiserror::Error;

/// Result alias used across the crate.
pub type Result<T, E = SargError> = std::result::Result<T, E>;

/// Failure raised while translating a search argument.
///
/// Every variant is terminal for the input that produced it: translation never
/// returns a partial expression.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SargError {
    /// The tree or a leaf uses an operator without a pushdown counterpart.
    #[error("Unsupported operator: {operator}")]
    UnsupportedOperator {
        /// Operator tag as named by the source engine.
        operator: String,
    },
    /// A leaf declares a value type outside the recognized set.
    #[error("Unsupported type: {type_name}")]
    UnsupportedType {
        /// Type tag as named by the source engine.
        type_name: String,
    },
    /// A structural precondition on a leaf reference does not hold.
    #[error("Malformed leaf {leaf}: {reason}")]
    MalformedLeaf {
        /// Index of the offending leaf.
        leaf: usize,
        /// What is wrong with it.
        reason: String,
    },
    /// The stored literal could not be read or normalized.
    #[error("Failed to extract literal for column '{column}': {reason}")]
    ExtractionFailure {
        /// Column the leaf predicates on.
        column: String,
        /// What was expected versus found.
        reason: String,
    },
    /// A search argument could not be assembled.
    #[error("Malformed expression tree: {reason}")]
    MalformedTree {
        /// Description of the misuse.
        reason: String,
    },
    /// The tree nests deeper than the configured limit.
    #[error("Expression tree exceeds maximum depth of {limit}")]
    DepthExceeded {
        /// Configured depth limit.
        limit: usize,
    },
}

impl SargError {
    pub(crate) fn unsupported_operator(operator: impl ToString) -> Self {
        SargError::UnsupportedOperator {
            operator: operator.to_string(),
        }
    }

    pub(crate) fn malformed_leaf(leaf: usize, reason: impl Into<String>) -> Self {
        SargError::MalformedLeaf {
            leaf,
            reason: reason.into(),
        }
    }

    pub(crate) fn extraction(column: &str, reason: impl Into<String>) -> Self {
        SargError::ExtractionFailure {
            column: column.to_owned(),
            reason: reason.into(),
        }
    }
}
