//! State hook - per-component local state with a synchronous updater.

use crate::engine::context::StateSlot;
use crate::engine::store::{self, UnitId};
use crate::error::{Result, UsageError};
use crate::render::scheduler;
use crate::types::Value;

/// Read (or create) a state slot at the current call-order position.
///
/// First render: stores `initial` and returns it. Re-renders: returns the
/// committed value by slot position. The updater is equality-gated and
/// synchronously drives a complete new render pass before returning; there
/// is no batching, so N unequal updates produce N full passes.
pub fn use_state(initial: impl Into<Value>) -> Result<(Value, StateUpdater)> {
    let context = super::active_context("state")?;
    let mut ctx = context.borrow_mut();
    let unit = ctx.unit();

    let index = ctx.states.cursor();
    let existing = ctx.states.next().map(|slot| slot.value.clone());
    let value = match existing {
        Some(value) => value,
        None => {
            let value = initial.into();
            ctx.states.add(StateSlot {
                value: value.clone(),
            });
            value
        }
    };

    Ok((value, StateUpdater { unit, index }))
}

/// Handle to a state slot: `{unit, index}` rather than a captured closure,
/// so it stays `Copy` and holds no reference into the context.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StateUpdater {
    unit: UnitId,
    index: usize,
}

impl StateUpdater {
    /// Commit a new value.
    ///
    /// A no-op when the value equals the committed one. Otherwise mutates
    /// the slot and runs a full render pass to completion before returning.
    pub fn set(&self, value: impl Into<Value>) -> Result<()> {
        let value = value.into();
        let context = store::get(self.unit).ok_or(UsageError::Unmounted)?;

        {
            let mut ctx = context.borrow_mut();
            let slot = ctx
                .states
                .get_mut(self.index)
                .ok_or(UsageError::Unmounted)?;
            if slot.value == value {
                return Ok(());
            }
            slot.value = value;
        }

        scheduler::render_pass(self.unit).map(|_| ())
    }
}
