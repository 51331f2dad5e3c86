//! Logging infrastructure for filter translation.
//!
//! Events are emitted through `tracing` with target "sarg_pushdown" and always
//! carry an `event` field for filtering.
//!
//! ## Library Integration
//!
//! The crate never initializes a global subscriber. Applications configure
//! tracing via `tracing_subscriber` or similar.
//!
//! ## Conventions
//!
//! - `event`: snake_case event name (required)
//! - `component`: subsystem (e.g., "translate", "leaf")
//! - Use `%` for Display, `?` for Debug formatting
//! - Leaf-level events stay at trace; one translation produces one per leaf

/// Target for all translation log events.
pub(crate) const SARG_TARGET: &str = "sarg_pushdown";

/// Macro for debug-level log events.
///
/// # Example
/// ```ignore
/// log_debug!(
///     component = "translate",
///     event = "translate_complete",
///     expression = %expr,
/// );
/// ```
macro_rules! log_debug {
    ($($field:tt)*) => {
        ::tracing::debug!(target: $crate::observability::SARG_TARGET, $($field)*)
    };
}

/// Macro for trace-level log events.
macro_rules! log_trace {
    ($($field:tt)*) => {
        ::tracing::trace!(target: $crate::observability::SARG_TARGET, $($field)*)
    };
}

/// Macro for warn-level log events.
macro_rules! log_warn {
    ($($field:tt)*) => {
        ::tracing::warn!(target: $crate::observability::SARG_TARGET, $($field)*)
    };
}

pub(crate) use log_debug;
pub(crate) use log_trace;
pub(crate) use log_warn;
