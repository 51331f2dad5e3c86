#![deny(missing_docs)]
//! Translation of search arguments into typed pushdown expressions.
//!
//! A search argument is the boolean filter tree a query engine hands to its
//! readers: `and`/`or`/`not` nodes over a side list of leaf predicates. This
//! crate rewrites it into an [`Expression`] whose literals are normalized to
//! one canonical encoding per type (epoch days for dates, epoch microseconds
//! for timestamps, scaled big decimals) so a scan planner can prune with it.
//!
//! Translation is pure and synchronous. It either yields a complete
//! expression or a [`SargError`]; callers usually treat the error as "cannot
//! be pushed down" and filter rows without it.
//!
//! ```
//! use sarg_pushdown::{expr, generate_filter_expression, PredicateType, SearchArgument};
//!
//! let sarg = SearchArgument::builder()
//!     .between("x", PredicateType::Long, 10i64, 20i64)
//!     .build()
//!     .unwrap();
//! let filter = generate_filter_expression(&sarg).unwrap();
//! assert_eq!(
//!     filter,
//!     expr::and(
//!         expr::greater_than_or_equal("x", 10i64),
//!         expr::less_than_or_equal("x", 20i64),
//!     )
//! );
//! ```

mod observability;

mod error;
/// Pushdown expression tree and its constructors.
pub mod expr;
mod option;
/// Source search-argument model.
pub mod sarg;
mod translate;

pub use crate::{
    error::{Result, SargError},
    expr::{Expression, Literal},
    option::FilterOption,
    sarg::{
        ExpressionTree, LeafPredicate, PredicateLeaf, PredicateOperator, PredicateType,
        RawDecimal, RawLiteral, SearchArgument, SearchArgumentBuilder, TruthValue,
    },
    translate::{
        generate_filter_expression, generate_filter_expression_with,
        try_generate_filter_expression, FilterTranslator,
    },
};
