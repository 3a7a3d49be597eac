//! Effect hook - deferred first-mount side effects with optional deps.

use std::rc::Rc;

use crate::engine::context::EffectSlot;
use crate::error::Result;
use crate::types::{Cleanup, EffectFn, Value};

/// Register a side effect at the current call-order position.
///
/// First render: records `{run, deps}` and defers `run` until after the
/// first successful host-object application; a returned cleanup is collected
/// into the unmount accumulator. Re-renders with a deps list: on the first
/// positional inequality against the stored deps, `run` is invoked
/// immediately as a side effect of this render, with no new cleanup
/// registration. Without a deps list the effect never re-runs.
pub fn use_effect(
    run: impl Fn() -> Option<Cleanup> + 'static,
    deps: Option<Vec<Value>>,
) -> Result<()> {
    let context = super::active_context("effect")?;
    let mut ctx = context.borrow_mut();

    let index = ctx.effects.cursor();
    if ctx.effects.next().is_none() {
        ctx.effects.add(EffectSlot {
            run: Rc::new(run),
            deps,
        });
        return Ok(());
    }

    let rerun: Option<EffectFn> = match ctx.effects.get_mut(index) {
        Some(slot) => {
            let changed = match (&slot.deps, &deps) {
                (Some(stored), Some(new)) => {
                    stored.len() != new.len()
                        || stored.iter().zip(new.iter()).any(|(a, b)| a != b)
                }
                // A deps list appearing where none was stored counts as changed.
                (None, Some(_)) => true,
                (_, None) => false,
            };
            if changed {
                slot.deps = deps.clone();
                Some(slot.run.clone())
            } else {
                None
            }
        }
        None => None,
    };
    drop(ctx);

    if let Some(run) = rerun {
        // Cleanup returns are discarded on re-runs.
        let _ = run();
    }
    Ok(())
}
