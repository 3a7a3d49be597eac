//! Error types for the component runtime.

use thiserror::Error;

/// Contract violations by the caller.
///
/// These are raised immediately and abort the in-progress render pass.
/// None of them are retried internally.
#[derive(Debug, Error)]
pub enum UsageError {
    #[error("hook `{0}` called outside an active render context")]
    NoActiveContext(&'static str),

    #[error("hook `{0}` is not enabled for this component")]
    HookDisabled(&'static str),

    #[error("renderer returned an invalid shape: {0}")]
    RendererShape(String),

    #[error("hydration target supplied but hydration is not enabled")]
    HydrationDisabled,

    #[error("render entry invoked after unmount")]
    Unmounted,
}

/// Top-level error type for the runtime.
///
/// Errors propagate to the caller of the render entry point (or the
/// triggering updater/event call). No partial-mutation guarantee is made
/// once one is raised.
#[derive(Debug, Error)]
pub enum RuntimeError {
    #[error("usage error: {0}")]
    Usage(#[from] UsageError),

    #[error("unstable hook order in the {accumulator} accumulator: {detail}")]
    UnstableHookOrder {
        accumulator: &'static str,
        detail: String,
    },

    #[error("backend does not support {capability}")]
    BackendUnsupported { capability: &'static str },
}

pub type Result<T> = std::result::Result<T, RuntimeError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_usage_error_wraps() {
        let err: RuntimeError = UsageError::NoActiveContext("state").into();
        assert!(matches!(
            err,
            RuntimeError::Usage(UsageError::NoActiveContext("state"))
        ));
        assert!(err.to_string().contains("state"));
    }

    #[test]
    fn test_unstable_hook_order_message() {
        let err = RuntimeError::UnstableHookOrder {
            accumulator: "state",
            detail: "expected 2 slot advances, got 1".to_string(),
        };
        let message = err.to_string();
        assert!(message.contains("state"));
        assert!(message.contains("expected 2"));
    }
}
