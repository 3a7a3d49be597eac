//! Backend contract - the host-tree collaborator the core drives.
//!
//! The runtime is backend-agnostic: it never constructs host objects itself,
//! never assigns properties directly, and never runs timers. All of that goes
//! through these two traits. The reconciliation policy (`render::diff`)
//! decides *what* to apply; the backend decides *how*.
//!
//! A backend without timed-transition support simply inherits the default
//! `start_transition`, and any transition dispatch surfaces as
//! [`RuntimeError::BackendUnsupported`].

pub mod memory;

use std::rc::Rc;

use crate::error::{Result, RuntimeError};
use crate::types::{Cleanup, Completion, EventCallback, Props, Timing, Value};

/// A live host object with named properties and events.
pub trait HostObject: std::fmt::Debug {
    /// Current value of a property, if the host has one.
    fn get(&self, property: &str) -> Option<Value>;

    /// Direct property assignment.
    fn set(&self, property: &str, value: Value) -> Result<()>;

    /// Subscribe a callback to a named event. The returned cleanup releases
    /// the live binding.
    fn connect(&self, event: &str, callback: EventCallback) -> Result<Cleanup>;

    /// Subscribe to the teardown signal. The scheduler calls this exactly
    /// once per host object; the callback must run exactly once, when the
    /// object is torn down.
    fn on_teardown(&self, callback: Cleanup) -> Result<()>;
}

/// Factory and transition executor for a host tree.
pub trait Backend {
    /// Create a host object of `kind` with the given initial properties.
    fn instantiate(&self, kind: &str, props: &Props) -> Result<Rc<dyn HostObject>>;

    /// Start a timed mutation of `property` towards `target`.
    ///
    /// Returns whether a transition actually started; when it did and
    /// `on_complete` is present, the backend must run it on completion.
    /// The default implementation reports the capability as unsupported.
    fn start_transition(
        &self,
        host: &Rc<dyn HostObject>,
        property: &str,
        target: &Value,
        timing: Timing,
        on_complete: Option<Completion>,
    ) -> Result<bool> {
        let _ = (host, property, target, timing, on_complete);
        Err(RuntimeError::BackendUnsupported {
            capability: "timed transitions",
        })
    }
}
