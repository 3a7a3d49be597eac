//! In-memory reference backend.
//!
//! A host tree made of plain property maps, with disconnectable event
//! bindings, a one-shot teardown signal, and a manual transition clock.
//! This is the default host for the test suite and the smallest useful
//! backend for embedding the runtime: it fixes a backend + option set
//! without adding any logic of its own.
//!
//! # Example
//!
//! ```ignore
//! let backend = MemoryBackend::new();
//! let builder = Builder::new(backend.clone(), HookOptions::ENABLE_ALL);
//!
//! let counter = builder.component(|_props| {
//!     let (count, set_count) = use_state(0)?;
//!     use_event("Activated", move |_| {
//!         let _ = set_count.set(1);
//!     })?;
//!     Ok(RenderOutput::new("Frame").prop("Count", count))
//! });
//!
//! let host = counter.instance(Props::new())?.render()?;
//! backend.created(0).unwrap().emit("Activated", Value::from(0));
//! ```

use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::rc::Rc;

use crate::backend::{Backend, HostObject};
use crate::error::Result;
use crate::types::{Cleanup, Completion, EventCallback, PropEntry, PropKey, Props, Timing, Value};

// =============================================================================
// Memory Object
// =============================================================================

struct Connection {
    id: usize,
    callback: EventCallback,
}

/// A host object backed by an in-memory property map.
pub struct MemoryObject {
    kind: String,
    props: RefCell<HashMap<String, Value>>,
    /// Shared with disconnect closures, which outlive any `&self`.
    connections: Rc<RefCell<HashMap<String, Vec<Connection>>>>,
    next_connection: Cell<usize>,
    teardown: RefCell<Vec<Cleanup>>,
    torn_down: Cell<bool>,
    writes: Cell<usize>,
}

impl MemoryObject {
    pub fn new(kind: impl Into<String>) -> Rc<Self> {
        Rc::new(Self {
            kind: kind.into(),
            props: RefCell::new(HashMap::new()),
            connections: Rc::new(RefCell::new(HashMap::new())),
            next_connection: Cell::new(0),
            teardown: RefCell::new(Vec::new()),
            torn_down: Cell::new(false),
            writes: Cell::new(0),
        })
    }

    pub fn kind(&self) -> &str {
        &self.kind
    }

    /// Current value of a property (test-visible mirror of `HostObject::get`).
    pub fn property(&self, name: &str) -> Option<Value> {
        self.props.borrow().get(name).cloned()
    }

    /// Number of direct assignments performed on this object.
    pub fn write_count(&self) -> usize {
        self.writes.get()
    }

    pub fn connection_count(&self, event: &str) -> usize {
        self.connections
            .borrow()
            .get(event)
            .map(|list| list.len())
            .unwrap_or(0)
    }

    /// Fire a named event at every live binding.
    pub fn emit(&self, event: &str, payload: Value) {
        let callbacks: Vec<EventCallback> = self
            .connections
            .borrow()
            .get(event)
            .map(|list| list.iter().map(|c| c.callback.clone()).collect())
            .unwrap_or_default();
        for callback in callbacks {
            callback(&payload);
        }
    }

    /// Fire the teardown signal. Later calls are no-ops.
    pub fn teardown(&self) {
        if self.torn_down.replace(true) {
            return;
        }
        let callbacks: Vec<Cleanup> = self.teardown.borrow_mut().drain(..).collect();
        for callback in callbacks {
            callback();
        }
    }

    pub fn is_torn_down(&self) -> bool {
        self.torn_down.get()
    }
}

impl std::fmt::Debug for MemoryObject {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MemoryObject")
            .field("kind", &self.kind)
            .field("props", &self.props.borrow())
            .field("torn_down", &self.torn_down.get())
            .field("writes", &self.writes.get())
            .finish()
    }
}

impl HostObject for MemoryObject {
    fn get(&self, property: &str) -> Option<Value> {
        self.props.borrow().get(property).cloned()
    }

    fn set(&self, property: &str, value: Value) -> Result<()> {
        self.writes.set(self.writes.get() + 1);
        self.props.borrow_mut().insert(property.to_string(), value);
        Ok(())
    }

    fn connect(&self, event: &str, callback: EventCallback) -> Result<Cleanup> {
        let id = self.next_connection.get();
        self.next_connection.set(id + 1);
        self.connections
            .borrow_mut()
            .entry(event.to_string())
            .or_default()
            .push(Connection { id, callback });

        let connections = self.connections.clone();
        let event = event.to_string();
        Ok(Box::new(move || {
            if let Some(list) = connections.borrow_mut().get_mut(&event) {
                list.retain(|c| c.id != id);
            }
        }))
    }

    fn on_teardown(&self, callback: Cleanup) -> Result<()> {
        self.teardown.borrow_mut().push(callback);
        Ok(())
    }
}

// =============================================================================
// Memory Backend
// =============================================================================

/// A recorded, not-yet-settled transition.
struct PendingTransition {
    host: Rc<dyn HostObject>,
    property: String,
    target: Value,
    #[allow(dead_code)]
    timing: Timing,
    on_complete: Option<Completion>,
}

/// Backend over [`MemoryObject`] hosts with a manual transition clock.
pub struct MemoryBackend {
    created: RefCell<Vec<Rc<MemoryObject>>>,
    pending: RefCell<Vec<PendingTransition>>,
    accepting: Cell<bool>,
}

impl MemoryBackend {
    pub fn new() -> Rc<Self> {
        Rc::new(Self {
            created: RefCell::new(Vec::new()),
            pending: RefCell::new(Vec::new()),
            accepting: Cell::new(true),
        })
    }

    /// Whether `start_transition` reports transitions as started.
    pub fn set_accepting(&self, accepting: bool) {
        self.accepting.set(accepting);
    }

    pub fn created_count(&self) -> usize {
        self.created.borrow().len()
    }

    /// The `index`-th object instantiated through this backend.
    pub fn created(&self, index: usize) -> Option<Rc<MemoryObject>> {
        self.created.borrow().get(index).cloned()
    }

    pub fn pending_transitions(&self) -> usize {
        self.pending.borrow().len()
    }

    /// Complete every pending transition: apply the final value and run any
    /// completion callbacks. Returns how many were settled.
    pub fn settle(&self) -> usize {
        let pending: Vec<PendingTransition> = self.pending.borrow_mut().drain(..).collect();
        let count = pending.len();
        for transition in pending {
            let _ = transition.host.set(&transition.property, transition.target);
            if let Some(done) = transition.on_complete {
                done();
            }
        }
        count
    }
}

impl Backend for MemoryBackend {
    fn instantiate(&self, kind: &str, props: &Props) -> Result<Rc<dyn HostObject>> {
        let object = MemoryObject::new(kind);
        // Plain values only; subscriptions and children are the
        // reconciler's business.
        for (key, entry) in props.iter() {
            if let (PropKey::Name(name), PropEntry::Value(value)) = (key, entry) {
                object
                    .props
                    .borrow_mut()
                    .insert(name.clone(), value.clone());
            }
        }
        self.created.borrow_mut().push(object.clone());
        Ok(object)
    }

    fn start_transition(
        &self,
        host: &Rc<dyn HostObject>,
        property: &str,
        target: &Value,
        timing: Timing,
        on_complete: Option<Completion>,
    ) -> Result<bool> {
        if !self.accepting.get() {
            return Ok(false);
        }
        self.pending.borrow_mut().push(PendingTransition {
            host: host.clone(),
            property: property.to_string(),
            target: target.clone(),
            timing,
            on_complete,
        });
        Ok(true)
    }
}

// =============================================================================
// Tests
// =============================================================================
