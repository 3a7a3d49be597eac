//! Hooks - call-order-identified operations on the active context.
//!
//! Every hook reads or writes its dedicated accumulator inside the context
//! that is active for the calling execution unit. Calling one with no active
//! context, or one whose option flag is not enabled for the builder, is a
//! usage error naming the hook.
//!
//! Hook identity is call order: a component must call the same hooks in the
//! same relative order on every render, or the scheduler raises an unstable
//! hook order error when it freezes the accumulators.

mod animation;
mod effect;
mod event;
mod state;
mod subscription;
mod transition;

pub use animation::{AnimationHandle, use_animation};
pub use effect::use_effect;
pub use event::use_event;
pub use state::{StateUpdater, use_state};
pub use subscription::{SubscriptionUpdater, use_subscription};
pub use transition::use_transition;

use std::cell::RefCell;
use std::rc::Rc;

use crate::engine::context::Context;
use crate::engine::store;
use crate::error::{Result, UsageError};
use crate::render::RenderEntry;
use crate::types::HookOptions;

/// The context active for the calling execution unit.
pub(crate) fn active_context(hook: &'static str) -> Result<Rc<RefCell<Context>>> {
    store::active().ok_or_else(|| UsageError::NoActiveContext(hook).into())
}

/// Gate a hook on its option flag (bypassed by `ENABLE_ALL`).
pub(crate) fn require_enabled(
    context: &Context,
    flag: HookOptions,
    hook: &'static str,
) -> Result<()> {
    if context.hook_enabled(flag) {
        return Ok(());
    }
    Err(UsageError::HookDisabled(hook).into())
}

/// The scheduler's external re-render entry point for the active context.
pub fn use_trigger() -> Result<RenderEntry> {
    let context = active_context("trigger")?;
    let unit = context.borrow().unit();
    Ok(RenderEntry::new(unit))
}
