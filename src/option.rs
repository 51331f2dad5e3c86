/// Knobs controlling how a search argument is translated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FilterOption {
    pub(crate) max_depth: Option<usize>,
    pub(crate) strict_between: bool,
}

impl Default for FilterOption {
    fn default() -> Self {
        FilterOption {
            max_depth: None,
            strict_between: true,
        }
    }
}

impl FilterOption {
    /// Rejects trees nested deeper than `max_depth` with
    /// [`SargError::DepthExceeded`](crate::SargError::DepthExceeded).
    ///
    /// The root sits at depth 1. Unlimited by default.
    pub fn max_depth(self, max_depth: usize) -> Self {
        FilterOption {
            max_depth: Some(max_depth),
            ..self
        }
    }

    /// Removes any depth limit.
    pub fn unlimited_depth(self) -> Self {
        FilterOption {
            max_depth: None,
            ..self
        }
    }

    /// When `false`, a `BETWEEN` leaf carrying more than two values uses the
    /// first two instead of failing. Fewer than two values always fail.
    pub fn strict_between(self, strict_between: bool) -> Self {
        FilterOption {
            strict_between,
            ..self
        }
    }

    /// Configured depth limit, if any.
    pub fn depth_limit(&self) -> Option<usize> {
        self.max_depth
    }

    /// Whether `BETWEEN` requires exactly two values.
    pub fn is_strict_between(&self) -> bool {
        self.strict_between
    }
}
