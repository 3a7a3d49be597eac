//! Context - per-component-instance hook state.
//!
//! A `Context` owns everything one component instance accumulates across
//! renders: its current props, the nine named accumulators, a weak reference
//! to the previously produced host object, the per-render scratch map of
//! pending explicit-animation values, and the renderer itself. Contexts live
//! in the thread-local store (`engine::store`) and are destroyed when the
//! bound host object's teardown signal fires.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::{Rc, Weak};

use crate::backend::{Backend, HostObject};
use crate::engine::accumulator::Accumulator;
use crate::engine::store::UnitId;
use crate::error::Result;
use crate::types::{
    Cleanup, EffectFn, EventCallback, HookOptions, Props, Renderer, TransitionCalc, Value,
    WriteCallback,
};

// =============================================================================
// Render State
// =============================================================================

/// Lifecycle of a context: `Uninitialized → Rendering → Idle → … → Unmounted`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderState {
    Uninitialized,
    Rendering,
    Idle,
    Unmounted,
}

// =============================================================================
// Slots
// =============================================================================

pub(crate) struct StateSlot {
    pub value: Value,
}

pub(crate) struct EffectSlot {
    pub run: EffectFn,
    pub deps: Option<Vec<Value>>,
}

/// Unmount cleanup, taken exactly once at teardown.
pub(crate) struct UnmountSlot {
    pub cleanup: Option<Cleanup>,
}

pub(crate) struct EventSlot {
    pub name: String,
    pub callback: EventCallback,
    /// Live binding disconnect, present while bound to the host object.
    pub binding: Option<Cleanup>,
}

#[derive(Clone)]
pub(crate) struct TransitionSlot {
    pub property: String,
    pub calc: TransitionCalc,
}

#[derive(Clone)]
pub(crate) struct AnimationSlot {
    pub property: String,
    pub calc: TransitionCalc,
}

pub(crate) struct SubcomponentSlot {
    pub unit: UnitId,
}

pub(crate) struct SubscriptionSlot {
    pub cell: SubscriptionCell,
}

// =============================================================================
// Subscription Cell
// =============================================================================

/// A shared mutable value with a listener map.
///
/// Updates are equality-gated and propagate directly to every bound host
/// property without triggering a render pass. Listener maps are shared
/// between the cell and every host object bound to it; all access happens
/// on the single render/update call path.
#[derive(Clone)]
pub struct SubscriptionCell {
    inner: Rc<CellInner>,
}

struct CellInner {
    value: RefCell<Value>,
    listeners: RefCell<HashMap<String, WriteCallback>>,
}

impl SubscriptionCell {
    pub(crate) fn new(initial: Value) -> Self {
        Self {
            inner: Rc::new(CellInner {
                value: RefCell::new(initial),
                listeners: RefCell::new(HashMap::new()),
            }),
        }
    }

    pub fn get(&self) -> Value {
        self.inner.value.borrow().clone()
    }

    /// Equality-gated update: a no-op when the new value equals the current
    /// one, otherwise writes the cell and notifies every listener
    /// synchronously. Never triggers a render pass.
    pub fn set(&self, value: Value) {
        {
            let mut current = self.inner.value.borrow_mut();
            if *current == value {
                return;
            }
            *current = value.clone();
        }
        for write in self.inner.listeners.borrow().values() {
            write(&value);
        }
    }

    /// Install (or replace) the write-through listener for a host property.
    pub(crate) fn bind(&self, property: &str, write: WriteCallback) {
        self.inner
            .listeners
            .borrow_mut()
            .insert(property.to_string(), write);
    }

    pub fn listener_count(&self) -> usize {
        self.inner.listeners.borrow().len()
    }
}

impl PartialEq for SubscriptionCell {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }
}

impl std::fmt::Debug for SubscriptionCell {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SubscriptionCell")
            .field("value", &self.inner.value.borrow())
            .field("listeners", &self.inner.listeners.borrow().len())
            .finish()
    }
}

// =============================================================================
// Context
// =============================================================================

pub struct Context {
    pub(crate) unit: UnitId,
    pub(crate) props: Props,
    pub(crate) renderer: Renderer,
    pub(crate) backend: Rc<dyn Backend>,
    pub(crate) options: HookOptions,
    pub(crate) hydrate: Option<Rc<dyn HostObject>>,
    pub(crate) state: RenderState,
    pub(crate) mounted: bool,

    pub(crate) objects: Accumulator<Weak<dyn HostObject>>,
    pub(crate) states: Accumulator<StateSlot>,
    pub(crate) effects: Accumulator<EffectSlot>,
    pub(crate) unmounts: Accumulator<UnmountSlot>,
    pub(crate) events: Accumulator<EventSlot>,
    pub(crate) transitions: Accumulator<TransitionSlot>,
    pub(crate) animations: Accumulator<AnimationSlot>,
    pub(crate) subcomponents: Accumulator<SubcomponentSlot>,
    pub(crate) subscriptions: Accumulator<SubscriptionSlot>,

    /// Per-render scratch map of pending explicit-animation values.
    pub(crate) pending_animations: HashMap<String, Value>,
}

impl Context {
    pub(crate) fn new(
        unit: UnitId,
        renderer: Renderer,
        backend: Rc<dyn Backend>,
        options: HookOptions,
        hydrate: Option<Rc<dyn HostObject>>,
        props: Props,
    ) -> Self {
        Self {
            unit,
            props,
            renderer,
            backend,
            options,
            hydrate,
            state: RenderState::Uninitialized,
            mounted: false,
            objects: Accumulator::new("object"),
            states: Accumulator::new("state"),
            effects: Accumulator::new("effect"),
            unmounts: Accumulator::new("unmount"),
            events: Accumulator::new("event"),
            transitions: Accumulator::new("transition"),
            animations: Accumulator::new("animation"),
            subcomponents: Accumulator::new("subcomponent"),
            subscriptions: Accumulator::new("subscription"),
            pending_animations: HashMap::new(),
        }
    }

    pub fn unit(&self) -> UnitId {
        self.unit
    }

    pub fn render_state(&self) -> RenderState {
        self.state
    }

    pub(crate) fn reset_cursors(&mut self) {
        self.objects.reset();
        self.states.reset();
        self.effects.reset();
        self.unmounts.reset();
        self.events.reset();
        self.transitions.reset();
        self.animations.reset();
        self.subcomponents.reset();
        self.subscriptions.reset();
    }

    /// Freeze every accumulator except the object accumulator, which is
    /// populated by the backend rather than by renderer-driven hook calls.
    pub(crate) fn freeze_hooks(&mut self) -> Result<()> {
        self.states.freeze()?;
        self.effects.freeze()?;
        self.unmounts.freeze()?;
        self.events.freeze()?;
        self.transitions.freeze()?;
        self.animations.freeze()?;
        self.subcomponents.freeze()?;
        self.subscriptions.freeze()?;
        Ok(())
    }

    /// Record the produced host object without owning it beyond the host
    /// tree's own lifetime.
    pub(crate) fn remember_object(&mut self, host: &Rc<dyn HostObject>) {
        let weak = Rc::downgrade(host);
        if self.objects.is_empty() {
            self.objects.add(weak);
        } else {
            self.objects.set(0, weak);
        }
    }

    pub(crate) fn previous_object(&self) -> Option<Rc<dyn HostObject>> {
        self.objects.get(0).and_then(Weak::upgrade)
    }

    /// Whether a hook gated by `flag` may run under this context's options.
    pub(crate) fn hook_enabled(&self, flag: HookOptions) -> bool {
        self.options.contains(HookOptions::ENABLE_ALL) || self.options.contains(flag)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    #[test]
    fn test_subscription_cell_equality_gate() {
        let cell = SubscriptionCell::new(Value::from(1));
        let hits = Rc::new(Cell::new(0));

        let probe = hits.clone();
        cell.bind("Opacity", Box::new(move |_| probe.set(probe.get() + 1)));

        cell.set(Value::from(1));
        assert_eq!(hits.get(), 0);

        cell.set(Value::from(2));
        assert_eq!(hits.get(), 1);
        assert_eq!(cell.get(), Value::from(2));
    }

    #[test]
    fn test_subscription_cell_rebind_replaces_listener() {
        let cell = SubscriptionCell::new(Value::from(0));
        cell.bind("Size", Box::new(|_| {}));
        cell.bind("Size", Box::new(|_| {}));
        assert_eq!(cell.listener_count(), 1);
    }

    #[test]
    fn test_subscription_cell_shared_identity() {
        let cell = SubscriptionCell::new(Value::from(0));
        let alias = cell.clone();
        alias.set(Value::from(5));
        assert_eq!(cell.get(), Value::from(5));
        assert_eq!(cell, alias);
    }
}
