//! # cinder
//!
//! Hook-based reactive component runtime for pluggable host trees.
//!
//! Callers describe UI as pure renderer functions returning a
//! `(kind, property-map)` pair; the runtime reconciles successive renders
//! against live host objects using call-order-indexed hooks for local
//! state, effects, event bindings, and animated transitions. The host tree
//! itself is a collaborator behind the [`backend`] traits: object creation,
//! property assignment, event subscription, and timed transitions all
//! belong to the backend.
//!
//! ## Architecture
//!
//! ```text
//! Builder → Scheduler → (renderer call) → Diff policy → backend
//! ```
//!
//! An external caller (event handler, state updater, or manual trigger)
//! invokes the scheduler; the scheduler activates a context for the
//! duration of the pass; hooks read and write that context's accumulators;
//! on completion the scheduler applies the reconciliation policy through
//! the backend and returns the host object.
//!
//! Hook identity across renders is derived purely from call order, so a
//! component must call the same hooks in the same relative order on every
//! render; conditional hook usage raises an unstable-hook-order error.
//! Updates are synchronous and unbatched: N updater calls produce N full
//! render passes.
//!
//! ## Modules
//!
//! - [`types`] - Property values, property maps, transition timing
//! - [`engine`] - Accumulators, contexts, and the context store
//! - [`hooks`] - The seven hook operations
//! - [`render`] - Builder, scheduler, and reconciliation policy
//! - [`backend`] - Host-tree contract plus the in-memory reference backend

pub mod backend;
pub mod engine;
pub mod error;
pub mod hooks;
pub mod render;
pub mod types;

// Re-export commonly used items

pub use error::{Result, RuntimeError, UsageError};

pub use types::{
    Cleanup, Completion, Easing, EventCallback, HookOptions, PropEntry, PropKey, Props,
    RenderOutput, Timing, Value, ValueKind,
};

pub use engine::{SubscriptionCell, UnitId, context_count, reset_store};

pub use hooks::{
    AnimationHandle, StateUpdater, SubscriptionUpdater, use_animation, use_effect, use_event,
    use_state, use_subscription, use_transition, use_trigger,
};

pub use render::{Builder, Component, RenderEntry};

pub use backend::{Backend, HostObject};
pub use backend::memory::{MemoryBackend, MemoryObject};
