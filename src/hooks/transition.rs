//! Transition hook - value-change-triggered timed mutations.

use std::rc::Rc;

use crate::engine::context::TransitionSlot;
use crate::error::{Result, RuntimeError};
use crate::types::{Completion, HookOptions, Timing, Value};

/// Register a transition descriptor for a property.
///
/// The descriptor is consulted by the diff policy: when the property's
/// value changes between renders, `calc` builds the timing parameters for
/// the backend's transition runner (and may register a completion
/// callback). The hook itself takes no further action.
///
/// Re-renders are an idempotent re-registration check: the property name
/// at this slot position must not change.
pub fn use_transition(
    property: impl Into<String>,
    calc: impl Fn(&Value, &mut dyn FnMut(Completion)) -> Timing + 'static,
) -> Result<()> {
    let context = super::active_context("transition")?;
    let mut ctx = context.borrow_mut();
    super::require_enabled(&ctx, HookOptions::TRANSITION, "transition")?;

    let property = property.into();
    let index = ctx.transitions.cursor();
    if ctx.transitions.next().is_none() {
        ctx.transitions.add(TransitionSlot {
            property,
            calc: Rc::new(calc),
        });
        return Ok(());
    }

    // A changed property name at the same slot position is conditional hook
    // usage by another name.
    match ctx.transitions.get(index) {
        Some(slot) if slot.property != property => Err(RuntimeError::UnstableHookOrder {
            accumulator: "transition",
            detail: format!(
                "property changed from `{stored}` to `{property}` at slot {index}",
                stored = slot.property
            ),
        }),
        _ => Ok(()),
    }
}
