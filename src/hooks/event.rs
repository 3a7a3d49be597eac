//! Event hook - live event bindings on the host object.

use std::rc::Rc;

use crate::engine::context::EventSlot;
use crate::error::Result;
use crate::types::{HookOptions, Value};

/// Bind a callback to a named host event at the current call-order position.
///
/// First render: records the slot; the scheduler connects it to the host
/// object once it exists, after instantiate. Re-renders: releases the
/// previous live binding and replaces the callback; the scheduler rebinds
/// it after instantiate in the same render, so the binding always captures
/// the callback from the latest pass.
pub fn use_event(name: impl Into<String>, callback: impl Fn(&Value) + 'static) -> Result<()> {
    let context = super::active_context("event")?;
    let mut ctx = context.borrow_mut();
    super::require_enabled(&ctx, HookOptions::EVENT, "event")?;

    let name = name.into();
    let index = ctx.events.cursor();
    if ctx.events.next().is_none() {
        ctx.events.add(EventSlot {
            name,
            callback: Rc::new(callback),
            binding: None,
        });
        return Ok(());
    }

    let released = match ctx.events.get_mut(index) {
        Some(slot) => {
            slot.name = name;
            slot.callback = Rc::new(callback);
            slot.binding.take()
        }
        None => None,
    };
    drop(ctx);

    if let Some(disconnect) = released {
        disconnect();
    }
    Ok(())
}
