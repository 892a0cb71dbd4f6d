use tracing::Span;

/// Logging scope for one fetch/parse/match/write pipeline.
///
/// Components take a `&RunContext` and enter its span while they log, so
/// every event of a run carries the run's name and nothing is shared across
/// runs.
#[derive(Debug, Clone)]
pub struct RunContext {
    span: Span,
}

impl RunContext {
    pub fn new(name: &str) -> Self {
        Self {
            span: tracing::info_span!("run", pipeline = %name),
        }
    }

    /// A context whose span is disabled; useful in tests and library calls
    /// that do not care about scoping.
    #[must_use]
    pub fn detached() -> Self {
        Self { span: Span::none() }
    }

    /// Enter the run span for the lifetime of the returned guard
    #[must_use]
    pub fn enter(&self) -> tracing::span::Entered<'_> {
        self.span.enter()
    }
}

impl Default for RunContext {
    fn default() -> Self {
        Self::detached()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_contexts_can_be_entered() {
        let ctx = RunContext::new("annotate");
        {
            let _guard = ctx.enter();
            tracing::info!("inside run");
        }
        let cloned = ctx.clone();
        drop(cloned.enter());

        let detached = RunContext::default();
        let _guard = detached.enter();
    }
}
