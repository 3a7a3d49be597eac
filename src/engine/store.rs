//! Context Store - thread-local unit registry and activation stack.
//!
//! The store is the only process-wide shared structure in the runtime: an
//! identity-keyed association from execution unit to context, plus the
//! active-unit stack that gives hooks their notion of "the current render".
//! Activation is save/restore: entering a unit pushes it, leaving pops it,
//! which is what lets a parent component's render call a child component's
//! factory without losing the parent's context afterwards.
//!
//! Entries are removed explicitly at teardown rather than relying on
//! reclamation semantics for correctness.

use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::rc::Rc;

use tracing::debug;

use crate::engine::context::Context;

/// Identity of an execution unit, the context-store key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct UnitId(usize);

thread_local! {
    /// Map execution unit to its context.
    static CONTEXTS: RefCell<HashMap<UnitId, Rc<RefCell<Context>>>> =
        RefCell::new(HashMap::new());

    /// Stack of active units; the top is "the calling execution unit".
    static ACTIVE: RefCell<Vec<UnitId>> = const { RefCell::new(Vec::new()) };

    /// Counter for generating unit identities.
    static NEXT_UNIT: Cell<usize> = const { Cell::new(0) };
}

// =============================================================================
// Unit Allocation & Registry
// =============================================================================

pub(crate) fn allocate_unit() -> UnitId {
    let unit = NEXT_UNIT.with(|next| {
        let id = next.get();
        next.set(id + 1);
        UnitId(id)
    });
    debug!(?unit, "allocated execution unit");
    unit
}

pub(crate) fn register(unit: UnitId, context: Rc<RefCell<Context>>) {
    CONTEXTS.with(|contexts| {
        contexts.borrow_mut().insert(unit, context);
    });
}

pub(crate) fn get(unit: UnitId) -> Option<Rc<RefCell<Context>>> {
    CONTEXTS.with(|contexts| contexts.borrow().get(&unit).cloned())
}

pub(crate) fn deregister(unit: UnitId) {
    CONTEXTS.with(|contexts| {
        contexts.borrow_mut().remove(&unit);
    });
    debug!(?unit, "deregistered execution unit");
}

/// Number of live contexts. Useful for leak checks in tests.
pub fn context_count() -> usize {
    CONTEXTS.with(|contexts| contexts.borrow().len())
}

// =============================================================================
// Activation
// =============================================================================

/// The currently active unit, if a render pass is in progress.
pub(crate) fn active_unit() -> Option<UnitId> {
    ACTIVE.with(|stack| stack.borrow().last().copied())
}

/// The currently active context.
pub(crate) fn active() -> Option<Rc<RefCell<Context>>> {
    active_unit().and_then(get)
}

/// Install `unit` as active for the duration of the returned guard.
///
/// The guard pops on drop, restoring the previously active unit even when
/// the pass aborts with an error.
pub(crate) fn activate(unit: UnitId) -> ActiveGuard {
    ACTIVE.with(|stack| stack.borrow_mut().push(unit));
    ActiveGuard { unit }
}

pub(crate) struct ActiveGuard {
    unit: UnitId,
}

impl Drop for ActiveGuard {
    fn drop(&mut self) {
        ACTIVE.with(|stack| {
            let popped = stack.borrow_mut().pop();
            debug_assert_eq!(popped, Some(self.unit));
        });
    }
}

// =============================================================================
// Reset (for testing)
// =============================================================================

/// Reset all store state (for testing).
pub fn reset_store() {
    CONTEXTS.with(|contexts| contexts.borrow_mut().clear());
    ACTIVE.with(|stack| stack.borrow_mut().clear());
    NEXT_UNIT.with(|next| next.set(0));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::memory::MemoryBackend;
    use crate::types::{HookOptions, Props, RenderOutput};

    fn dummy_context(unit: UnitId) -> Rc<RefCell<Context>> {
        let backend = MemoryBackend::new();
        Rc::new(RefCell::new(Context::new(
            unit,
            Rc::new(|_| Ok(RenderOutput::new("Frame"))),
            backend,
            HookOptions::ENABLE_ALL,
            None,
            Props::new(),
        )))
    }

    #[test]
    fn test_allocate_units_are_distinct() {
        reset_store();
        let a = allocate_unit();
        let b = allocate_unit();
        assert_ne!(a, b);
    }

    #[test]
    fn test_register_get_deregister() {
        reset_store();
        let unit = allocate_unit();
        register(unit, dummy_context(unit));
        assert!(get(unit).is_some());
        assert_eq!(context_count(), 1);

        deregister(unit);
        assert!(get(unit).is_none());
        assert_eq!(context_count(), 0);
    }

    #[test]
    fn test_activation_saves_and_restores() {
        reset_store();
        let parent = allocate_unit();
        let child = allocate_unit();

        assert_eq!(active_unit(), None);
        {
            let _outer = activate(parent);
            assert_eq!(active_unit(), Some(parent));
            {
                let _inner = activate(child);
                assert_eq!(active_unit(), Some(child));
            }
            assert_eq!(active_unit(), Some(parent));
        }
        assert_eq!(active_unit(), None);
    }
}
