//! Component Builder - binds a backend and an option set to renderers.
//!
//! `Builder::new(backend, options)` fixes the backend and the enabled-hooks
//! set; `component(renderer)` produces a factory. Calling the factory with
//! props yields a render entry point.
//!
//! Composition is positional: when a factory call happens during a parent's
//! render, the builder does not create an independent top-level context.
//! It reuses (or creates, on the parent's first render) a slot in the
//! parent's subcomponent accumulator holding a nested context, updates that
//! context's props, and returns its existing entry point. The parent then
//! places the entry in its property map as a child thunk.

use std::cell::RefCell;
use std::rc::Rc;

use crate::backend::{Backend, HostObject};
use crate::engine::context::{Context, SubcomponentSlot};
use crate::engine::store::{self, UnitId};
use crate::error::{Result, UsageError};
use crate::render::scheduler;
use crate::types::{HookOptions, Props, RenderOutput, Renderer};

/// Factory of component factories over one backend + option set.
#[derive(Clone)]
pub struct Builder {
    backend: Rc<dyn Backend>,
    options: HookOptions,
}

impl Builder {
    pub fn new(backend: Rc<dyn Backend>, options: HookOptions) -> Self {
        Self { backend, options }
    }

    pub fn options(&self) -> HookOptions {
        self.options
    }

    /// Bind a renderer, producing a component factory.
    pub fn component(&self, renderer: impl Fn(&Props) -> Result<RenderOutput> + 'static) -> Component {
        Component {
            backend: self.backend.clone(),
            options: self.options,
            renderer: Rc::new(renderer),
            hydrate: None,
        }
    }
}

/// A component factory: renderer plus the builder's backend and options.
#[derive(Clone)]
pub struct Component {
    backend: Rc<dyn Backend>,
    options: HookOptions,
    renderer: Renderer,
    hydrate: Option<Rc<dyn HostObject>>,
}

impl std::fmt::Debug for Component {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Component")
            .field("options", &self.options)
            .field("hydrate", &self.hydrate)
            .finish_non_exhaustive()
    }
}

impl Component {
    /// Bind this component to an existing host object instead of creating
    /// one. Requires the `HYDRATION` option.
    pub fn hydrate(mut self, target: Rc<dyn HostObject>) -> Result<Component> {
        if !self.options.contains(HookOptions::HYDRATION) {
            return Err(UsageError::HydrationDisabled.into());
        }
        self.hydrate = Some(target);
        Ok(self)
    }

    /// Create (or, during a parent render, reuse) a context for these props
    /// and return its render entry point.
    pub fn instance(&self, props: Props) -> Result<RenderEntry> {
        let Some(parent) = store::active() else {
            return Ok(RenderEntry::new(self.register(props)));
        };

        // Factory call during a parent's render: this is composition, not an
        // independent top-level component.
        let reused = parent.borrow_mut().subcomponents.next().map(|slot| slot.unit);
        match reused {
            Some(unit) => {
                let child = store::get(unit).ok_or(UsageError::Unmounted)?;
                child.borrow_mut().props = props;
                Ok(RenderEntry::new(unit))
            }
            None => {
                let unit = self.register(props);
                parent
                    .borrow_mut()
                    .subcomponents
                    .add(SubcomponentSlot { unit });
                Ok(RenderEntry::new(unit))
            }
        }
    }

    fn register(&self, props: Props) -> UnitId {
        let unit = store::allocate_unit();
        let context = Context::new(
            unit,
            self.renderer.clone(),
            self.backend.clone(),
            self.options,
            self.hydrate.clone(),
            props,
        );
        store::register(unit, Rc::new(RefCell::new(context)));
        unit
    }
}

/// Render entry point: a handle into the owning context store rather than a
/// closure capture, invalidated when the unit unmounts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderEntry {
    unit: UnitId,
}

impl RenderEntry {
    pub(crate) fn new(unit: UnitId) -> Self {
        Self { unit }
    }

    pub fn unit(&self) -> UnitId {
        self.unit
    }

    /// Drive one full render pass and return the host object.
    pub fn render(&self) -> Result<Rc<dyn HostObject>> {
        scheduler::render_pass(self.unit)
    }
}
