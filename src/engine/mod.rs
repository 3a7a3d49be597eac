//! Engine - accumulators, contexts, and the context store.

pub mod accumulator;
pub mod context;
pub mod store;

pub use accumulator::Accumulator;
pub use context::{Context, RenderState, SubscriptionCell};
pub use store::{UnitId, context_count, reset_store};
