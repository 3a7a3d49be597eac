//! Reconciliation - how each property of a render's output is applied.
//!
//! Backend-agnostic decision procedure over the render output and the live
//! host object. Numeric-keyed entries are nested render thunks and are
//! invoked, never compared. For each name-keyed entry, in priority order:
//!
//! 1. Subscription cell: bind a write-through listener, assign current value.
//! 2. Opaque/structured value: assign directly.
//! 3. Primitive-kind change (or no existing value): assign directly,
//!    no transition.
//! 4. Pending explicit-animation value: dispatch every animation descriptor
//!    under the name; direct assignment is skipped regardless of outcome.
//! 5. Unequal values: dispatch every transition descriptor under the name;
//!    assign directly only if none started.
//! 6. Equal values: no action.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use tracing::trace;

use crate::backend::{Backend, HostObject};
use crate::engine::context::{AnimationSlot, Context, TransitionSlot};
use crate::error::Result;
use crate::types::{Completion, PropEntry, PropKey, Props, TransitionCalc, Value, ValueKind};

/// Apply a property map to a host object (the backend contract's `mutate`).
pub(crate) fn reconcile(
    context: &Rc<RefCell<Context>>,
    host: &Rc<dyn HostObject>,
    props: &Props,
) -> Result<()> {
    // Snapshot descriptors and the pending map up front so no borrow is
    // held while child thunks and backend calls run.
    let (backend, transitions, animations, pending) = {
        let ctx = context.borrow();
        (
            ctx.backend.clone(),
            ctx.transitions.slots().to_vec(),
            ctx.animations.slots().to_vec(),
            ctx.pending_animations.clone(),
        )
    };

    for (key, entry) in props.iter() {
        match key {
            PropKey::Index(_) => {
                if let PropEntry::Child(child) = entry {
                    child.render()?;
                }
            }
            PropKey::Name(name) => {
                apply_property(&backend, host, name, entry, &transitions, &animations, &pending)?;
            }
        }
    }
    Ok(())
}

fn apply_property(
    backend: &Rc<dyn Backend>,
    host: &Rc<dyn HostObject>,
    name: &str,
    entry: &PropEntry,
    transitions: &[TransitionSlot],
    animations: &[AnimationSlot],
    pending: &HashMap<String, Value>,
) -> Result<()> {
    match entry {
        PropEntry::Child(child) => {
            // A nested render call under a string key is still a thunk.
            child.render()?;
            Ok(())
        }
        PropEntry::Subscription(cell) => {
            let target = host.clone();
            let property = name.to_string();
            cell.bind(
                name,
                Box::new(move |value: &Value| {
                    let _ = target.set(&property, value.clone());
                }),
            );
            host.set(name, cell.get())
        }
        PropEntry::Value(new) => {
            if new.kind() == ValueKind::Opaque {
                trace!(property = name, "structured pass-through");
                return host.set(name, new.clone());
            }

            let Some(existing) = host.get(name) else {
                return host.set(name, new.clone());
            };
            if existing.kind() != new.kind() {
                trace!(property = name, "kind boundary, assigning directly");
                return host.set(name, new.clone());
            }

            if let Some(target) = pending.get(name) {
                trace!(property = name, "dispatching pending animation");
                for slot in animations.iter().filter(|s| s.property == name) {
                    run_transition(backend, host, name, target, &slot.calc)?;
                }
                // Animation intentionally overrides the ordinary path.
                return Ok(());
            }

            if existing != *new {
                let mut started = false;
                for slot in transitions.iter().filter(|s| s.property == name) {
                    started |= run_transition(backend, host, name, new, &slot.calc)?;
                }
                if !started {
                    return host.set(name, new.clone());
                }
            }
            Ok(())
        }
    }
}

/// Transition runner: build timing parameters from the descriptor, start the
/// timed mutation, and forward any completion callback the calculator
/// registered.
pub(crate) fn run_transition(
    backend: &Rc<dyn Backend>,
    host: &Rc<dyn HostObject>,
    property: &str,
    target: &Value,
    calc: &TransitionCalc,
) -> Result<bool> {
    let mut on_complete: Option<Completion> = None;
    let timing = calc(target, &mut |done| on_complete = Some(done));
    backend.start_transition(host, property, target, timing, on_complete)
}
