//! Animation hook - explicitly requested timed mutations.
//!
//! Unlike transitions, animations are not triggered by value change: the
//! caller invokes the returned handle with a target value, which lands in
//! the context's pending-animation scratch map. On the next render pass the
//! diff policy dispatches every animation descriptor registered under that
//! property with the pending value, and skips direct assignment for the
//! property. The scratch map is cleared at the end of the pass.

use std::rc::Rc;

use crate::engine::context::AnimationSlot;
use crate::engine::store::{self, UnitId};
use crate::error::{Result, UsageError};
use crate::types::{Completion, HookOptions, Timing, Value};

/// Register an animation descriptor and get its request handle.
///
/// Re-renders return the handle stored at this slot position.
pub fn use_animation(
    property: impl Into<String>,
    calc: impl Fn(&Value, &mut dyn FnMut(Completion)) -> Timing + 'static,
) -> Result<AnimationHandle> {
    let context = super::active_context("animation")?;
    let mut ctx = context.borrow_mut();
    super::require_enabled(&ctx, HookOptions::ANIMATION, "animation")?;

    let unit = ctx.unit();
    let property = property.into();
    let stored = ctx.animations.next().map(|slot| slot.property.clone());
    let property = match stored {
        Some(stored) => stored,
        None => {
            ctx.animations.add(AnimationSlot {
                property: property.clone(),
                calc: Rc::new(calc),
            });
            property
        }
    };

    Ok(AnimationHandle { unit, property })
}

/// The `perform` side of an animation hook.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnimationHandle {
    unit: UnitId,
    property: String,
}

impl AnimationHandle {
    pub fn property(&self) -> &str {
        &self.property
    }

    /// Record a pending animation target for the next render pass.
    ///
    /// Only writes the scratch map; the caller decides when to render.
    pub fn request(&self, value: impl Into<Value>) -> Result<()> {
        let context = store::get(self.unit).ok_or(UsageError::Unmounted)?;
        context
            .borrow_mut()
            .pending_animations
            .insert(self.property.clone(), value.into());
        Ok(())
    }
}
