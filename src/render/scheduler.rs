//! Render Scheduler - one full render pass, start to finish.
//!
//! A pass runs to completion with no internal suspension point; the only
//! boundary is between passes, where the context sits idle awaiting the
//! next external call. Per pass: activate the context, reset accumulator
//! cursors, invoke the renderer, freeze the hook accumulators, instantiate
//! (first pass only) or reuse the host object, rebind event slots,
//! reconcile, run first-mount effects, clear the pending-animation map.
//!
//! Failure is immediate and pass-aborting; no partial application is
//! guaranteed once an ordering or contract violation is raised.

use std::cell::RefCell;
use std::rc::Rc;

use tracing::debug;

use crate::backend::HostObject;
use crate::engine::context::{Context, RenderState, UnmountSlot};
use crate::engine::store::{self, UnitId};
use crate::error::{Result, UsageError};
use crate::render::diff;
use crate::types::{self, Cleanup, EffectFn, HookOptions};

/// Drive one full render pass for the unit's context.
pub(crate) fn render_pass(unit: UnitId) -> Result<Rc<dyn HostObject>> {
    let context = store::get(unit).ok_or(UsageError::Unmounted)?;

    let (renderer, props, options, backend, hydrate, first) = {
        let mut ctx = context.borrow_mut();
        if ctx.state == RenderState::Unmounted {
            return Err(UsageError::Unmounted.into());
        }
        ctx.state = RenderState::Rendering;
        ctx.reset_cursors();
        (
            ctx.renderer.clone(),
            ctx.props.clone(),
            ctx.options,
            ctx.backend.clone(),
            ctx.hydrate.clone(),
            !ctx.mounted,
        )
    };
    debug!(?unit, first, "render pass");

    // Save/restore: the previously active context comes back even when the
    // pass aborts.
    let _active = store::activate(unit);

    let output = renderer(&props)?;
    types::check_output_shape(&output, hydrate.is_some())?;

    context.borrow_mut().freeze_hooks()?;

    let host: Rc<dyn HostObject> = if first {
        let host = match &hydrate {
            Some(target) => target.clone(),
            None => backend.instantiate(&output.kind, &output.props)?,
        };
        host.on_teardown(Box::new(move || teardown(unit)))?;
        context.borrow_mut().remember_object(&host);
        host
    } else {
        context
            .borrow()
            .previous_object()
            .ok_or(UsageError::Unmounted)?
    };

    rebind_events(&context, &host)?;

    diff::reconcile(&context, &host, &output.props)?;

    if first {
        // Flip before effects run: an updater called from an effect
        // re-enters as a non-first pass.
        context.borrow_mut().mounted = true;
        run_mount_effects(&context);
    }

    {
        let mut ctx = context.borrow_mut();
        if ctx.hook_enabled(HookOptions::ANIMATION) {
            ctx.pending_animations.clear();
        }
        // A nested teardown may already have moved the context on.
        if ctx.state == RenderState::Rendering {
            ctx.state = RenderState::Idle;
        }
    }

    Ok(host)
}

/// Connect every unbound event slot to the host object.
fn rebind_events(context: &Rc<RefCell<Context>>, host: &Rc<dyn HostObject>) -> Result<()> {
    let count = context.borrow().events.len();
    for index in 0..count {
        let unbound = {
            let ctx = context.borrow();
            match ctx.events.get(index) {
                Some(slot) if slot.binding.is_none() => {
                    Some((slot.name.clone(), slot.callback.clone()))
                }
                _ => None,
            }
        };
        let Some((name, callback)) = unbound else {
            continue;
        };
        let binding = host.connect(&name, callback)?;
        if let Some(slot) = context.borrow_mut().events.get_mut(index) {
            slot.binding = Some(binding);
        }
    }
    Ok(())
}

/// Run every effect once, collecting returned cleanups into the unmount
/// accumulator. Effects may call updaters, which re-enter the scheduler, so
/// no borrow is held while one runs.
fn run_mount_effects(context: &Rc<RefCell<Context>>) {
    let effects: Vec<EffectFn> = context
        .borrow()
        .effects
        .slots()
        .iter()
        .map(|slot| slot.run.clone())
        .collect();
    for run in effects {
        if let Some(cleanup) = run() {
            context.borrow_mut().unmounts.add(UnmountSlot {
                cleanup: Some(cleanup),
            });
        }
    }
}

/// React to the host object's teardown signal.
///
/// Children are torn down first (their contexts go with the parent's host
/// tree), then this context's unmount callbacks run exactly once, then the
/// unit leaves the store. No further renders are expected.
pub(crate) fn teardown(unit: UnitId) {
    let Some(context) = store::get(unit) else {
        return;
    };

    let children: Vec<UnitId> = {
        let mut ctx = context.borrow_mut();
        if ctx.state == RenderState::Unmounted {
            return;
        }
        ctx.state = RenderState::Unmounted;
        ctx.subcomponents.slots().iter().map(|s| s.unit).collect()
    };
    for child in children {
        teardown(child);
    }

    let cleanups: Vec<Cleanup> = context
        .borrow_mut()
        .unmounts
        .slots_mut()
        .iter_mut()
        .filter_map(|slot| slot.cleanup.take())
        .collect();
    for cleanup in cleanups {
        cleanup();
    }

    store::deregister(unit);
    debug!(?unit, "context unmounted");
}
